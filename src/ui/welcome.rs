use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Fill(1),
    ])
    .split(area);

    let subtitle = match app.quiz_name() {
        Some(name) if app.has_quiz() => format!("{} · {} questions", name, app.loaded_count()),
        _ => format!("Library: {}", app.library().dir().display()),
    };
    let action = if app.has_quiz() {
        "to start"
    } else {
        "to choose a quiz"
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ RUNNER",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(subtitle, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from(action.fg(Color::DarkGray)),
        Line::from(""),
        Line::from("l library  ·  q quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, chunks[1]);
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use crate::app::App;
    use crate::data::QuizLibrary;
    use crate::models::QuestionRecord;
    use crate::ui::test_support::render_to_string;

    #[test]
    fn test_shows_loaded_quiz() {
        let app = App::with_questions(vec![QuestionRecord::new("q", ["a"], "1")], "big_data.csv");
        let screen = render_to_string(&app, Instant::now());

        assert!(screen.contains("QUIZ RUNNER"));
        assert!(screen.contains("big_data.csv · 1 questions"));
        assert!(screen.contains("to start"));
    }

    #[test]
    fn test_without_quiz_points_to_library() {
        let app = App::new(QuizLibrary::new("quizzes"));
        let screen = render_to_string(&app, Instant::now());

        assert!(screen.contains("Library: quizzes"));
        assert!(screen.contains("to choose a quiz"));
    }
}
