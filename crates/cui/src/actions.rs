use crate::app::App;
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.quit(),
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::Select(slot) => app.select(slot),
        InputAction::Pause => app.pause(),
        InputAction::Resume => app.resume(),
        InputAction::Continue => app.continue_set(),
    }
}
