use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    Select(usize),
    Pause,
    Resume,
    Continue,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Quit,
        KeyCode::Char(digit @ '1'..='9') => {
            InputAction::Select(digit as usize - '1' as usize)
        }
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('p') | KeyCode::Esc => InputAction::Pause,
        KeyCode::Char('r') => InputAction::Resume,
        KeyCode::Char('c') | KeyCode::Enter => InputAction::Continue,
        _ => InputAction::None,
    }
}
