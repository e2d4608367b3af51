use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;
use twinmatch_core::{SessionPhase, VisualRef};

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(10),
            Constraint::Length(7),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
        .split(root[1]);
    draw_problem(frame, body[0], app);
    draw_hand(frame, body[1], app);
    draw_events(frame, root[2], app);

    if app.phase() == SessionPhase::Summary {
        draw_summary_popup(frame, app);
    }
    if app.pause_overlay {
        draw_pause_popup(frame);
    }
    if app.show_help {
        draw_help_popup(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let round = app.session.round();
    let sets = app.session.config().rounds_per_set;
    let timer = match app.countdown {
        Some(seconds) => format!("{seconds}s"),
        None => "--".to_string(),
    };
    let lines = vec![
        Line::from(format!("Twinmatch | Hint: {}", app.next_hint()).bold()),
        Line::from(format!(
            "Score {}  Combo {}  Round {}/{}  Best {}  Time {}",
            round.score,
            round.combo_count,
            (round.rounds_played + 1).min(sets),
            sets,
            app.session.profile().best_score,
            timer
        )),
        Line::from(format!("Status: {}", app.status_line)),
    ];
    let block = Block::default().borders(Borders::ALL).title("Overview");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

fn draw_problem(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    if let Some(visual) = app.problem.as_ref() {
        lines.extend(card_lines(app, visual));
        if app.problem_same_art {
            lines.push(Line::from("(only one art for this card)".italic()));
        }
    } else {
        lines.push(Line::from("no problem card"));
    }
    let border = match app.feedback {
        Some(true) => Style::default().fg(Color::Green),
        Some(false) => Style::default().fg(Color::Red),
        None => Style::default(),
    };
    let title = match app.feedback {
        Some(true) => "Correct!",
        Some(false) => "Miss",
        None => "Problem",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn draw_hand(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title("Hand");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if app.hand.is_empty() {
        frame.render_widget(Paragraph::new("no cards dealt"), inner);
        return;
    }
    let count = app.hand.len() as u32;
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
        .split(inner);
    for (index, (visual, slot)) in app.hand.iter().zip(slots.iter()).enumerate() {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("[{}]", index + 1));
        frame.render_widget(
            Paragraph::new(card_lines(app, visual))
                .alignment(Alignment::Center)
                .block(block),
            *slot,
        );
    }
}

fn card_lines<'a>(app: &'a App, visual: &'a VisualRef) -> Vec<Line<'a>> {
    let mut lines: Vec<Line> = match app.art_for(visual) {
        Some(art) => art.iter().map(|row| Line::from(row.as_str())).collect(),
        None => Vec::new(),
    };
    lines.push(Line::from(visual.label().to_string().dim()));
    lines
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .event_log
        .iter()
        .rev()
        .take(visible)
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Events"));
    frame.render_widget(list, area);
}

fn draw_summary_popup(frame: &mut Frame, app: &App) {
    let Some(summary) = app.summary else {
        return;
    };
    let area = centered_rect(50, 40, frame.area());
    let verdict = if summary.new_record {
        Line::from("New high score!".bold().fg(Color::Yellow))
    } else {
        Line::from("No new record this time.")
    };
    let lines = vec![
        Line::from(format!("Best so far: {}", summary.best_score)),
        Line::from(format!("This set:    {}", summary.score)),
        verdict,
        Line::from(""),
        Line::from("c continue   q quit"),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Set complete")),
        area,
    );
}

fn draw_pause_popup(frame: &mut Frame) {
    let area = centered_rect(30, 20, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(vec![Line::from("Paused"), Line::from("r resume   q quit")])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(50, 50, frame.area());
    let lines = vec![
        Line::from("1-9    pick that hand slot"),
        Line::from("p/Esc  pause"),
        Line::from("r      resume"),
        Line::from("c      continue after a set"),
        Line::from("q      quit"),
        Line::from("?      close this help"),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Keys")),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
