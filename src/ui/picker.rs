//! Library picker: lists the quiz files available to load.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let title = Paragraph::new(format!(
        "Choose a quiz from {}",
        app.library().dir().display()
    ))
    .fg(Color::Cyan)
    .bold();
    frame.render_widget(title, chunks[0]);

    render_entries(frame, chunks[1], app);

    if let Some(notice) = app.notice() {
        let widget = Paragraph::new(notice)
            .wrap(Wrap { trim: true })
            .fg(Color::Red);
        frame.render_widget(widget, chunks[2]);
    }

    let controls = Paragraph::new("j/k navigate  ·  enter load  ·  esc back  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, chunks[3]);
}

fn render_entries(frame: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let is_selected = index == app.picker_cursor();
            let style = if is_selected {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if is_selected { ">" } else { " " };
            Line::from(vec![
                Span::styled(format!(" {} ", marker), style),
                Span::styled(entry.name.as_str(), style),
            ])
        })
        .collect();

    // Keep the cursor visible in long listings.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = app.picker_cursor().saturating_sub(visible.saturating_sub(1));

    let widget = Paragraph::new(lines)
        .scroll((scroll as u16, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Instant;

    use crate::app::App;
    use crate::data::QuizLibrary;
    use crate::ui::test_support::render_to_string;

    #[test]
    fn test_lists_library_files_and_load_errors() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("broken.csv"), "Question Text\nq\n").unwrap();

        let mut app = App::new(QuizLibrary::new(root.path()));
        app.open_picker();
        app.confirm_pick(Instant::now());

        let screen = render_to_string(&app, Instant::now());
        assert!(screen.contains("> broken.csv"));
        assert!(screen.contains("missing required column"));
    }
}
