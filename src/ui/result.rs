use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::engine::Feedback;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let final_score = app.engine().final_score();
    let percentage = final_score.percentage();
    let grade_color = get_grade_color(percentage);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(
        frame,
        chunks[1],
        final_score.score,
        final_score.total,
        percentage,
        grade_color,
    );
    render_question_breakdown(frame, chunks[2], app, app.result_scroll());
    render_controls(frame, chunks[3]);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(
    frame: &mut Frame,
    area: Rect,
    score: usize,
    total: usize,
    percentage: f64,
    grade_color: Color,
) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ FINISHED",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Final score: {} / {}  ({:.0}%)", score, total, percentage),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, app: &App, scroll: usize) {
    let lines: Vec<Line> = app
        .engine()
        .outcomes()
        .iter()
        .zip(app.engine().questions())
        .enumerate()
        .map(|(index, (outcome, question))| {
            let (symbol, color) = match outcome {
                Some(Feedback::Correct) => ("+", Color::Green),
                Some(Feedback::Incorrect) => ("-", Color::Red),
                Some(Feedback::TimedOut) => ("~", Color::Red),
                None => ("?", Color::DarkGray),
            };

            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(truncate_question(&question.text), Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r restart  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::models::QuestionRecord;
    use crate::ui::test_support::render_to_string;

    #[test]
    fn test_summary_and_breakdown() {
        let now = Instant::now();
        let mut app = App::with_questions(
            vec![
                QuestionRecord::new("Is HDFS distributed?", ["yes", "no"], "1"),
                QuestionRecord::new("Is Spark a database?", ["yes", "no"], "2"),
            ],
            "big_data.csv",
        );
        app.start_or_pick(now);
        app.select_option(1);
        app.submit_answer();
        app.next_question(now);
        app.tick(now + std::time::Duration::from_secs(31));
        app.next_question(now);

        let screen = render_to_string(&app, now);
        assert!(screen.contains("Final score: 1 / 2  (50%)"));
        assert!(screen.contains(" +  1. Is HDFS distributed?"));
        assert!(screen.contains(" ~  2. Is Spark a database?"));
    }

    #[test]
    fn test_truncate_question() {
        let long = "x".repeat(QUESTION_PREVIEW_LENGTH + 5);
        assert_eq!(truncate_question(&long).chars().count(), QUESTION_PREVIEW_LENGTH + 3);
        assert_eq!(truncate_question("short"), "short");
        assert_eq!(get_grade_color(95.0), Color::Green);
    }
}
