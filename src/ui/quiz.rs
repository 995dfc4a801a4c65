use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, QuizPhase};
use crate::engine::{Feedback, Validation};
use crate::models::QuestionRecord;

/// Seconds left at which the countdown turns red.
const COUNTDOWN_WARNING_SECS: u64 = 5;

pub fn render(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let Some(question) = app.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_status(frame, chunks[0], app, now);
    render_question_text(frame, chunks[1], app.current_question_number(), question);
    render_options(frame, chunks[2], question, app);

    match app.phase() {
        QuizPhase::Reviewing(validation) => render_feedback(frame, chunks[3], validation),
        QuizPhase::Answering => {
            if let Some(notice) = app.notice() {
                render_notice(frame, chunks[3], notice);
            }
        }
    }

    render_controls(frame, chunks[4], app.phase());
}

fn render_status(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let snapshot = app.engine().score_snapshot();
    let score = Paragraph::new(format!("Score: {}/{}", snapshot.score, snapshot.answered))
        .fg(Color::Green)
        .bold();
    frame.render_widget(score, halves[0]);

    let progress = format!(
        "{}/{}",
        app.current_question_number(),
        app.total_questions()
    );
    let mut spans = Vec::with_capacity(2);
    if let Some(countdown) = app.countdown() {
        let secs = countdown.remaining_secs(now);
        let color = if secs <= COUNTDOWN_WARNING_SECS {
            Color::Red
        } else {
            Color::Yellow
        };
        spans.push(Span::styled(
            format!("Time left: {} s   ", secs),
            Style::default().fg(color).bold(),
        ));
    }
    spans.push(Span::styled(progress, Style::default().fg(Color::DarkGray)));

    let widget = Paragraph::new(Line::from(spans)).alignment(Alignment::Right);
    frame.render_widget(widget, halves[1]);
}

fn render_question_text(frame: &mut Frame, area: Rect, number: usize, question: &QuestionRecord) {
    let mut lines = vec![Line::from(Span::styled(
        format!("Q{}. {}", number, question.text),
        Style::default().fg(Color::White).bold(),
    ))];
    if !question.kind.is_empty() {
        lines.push(Line::from(question.kind.as_str().fg(Color::DarkGray)));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, question: &QuestionRecord, app: &App) {
    let reviewing = matches!(app.phase(), QuizPhase::Reviewing(_));
    let correct = question.correct_position().map(|position| position - 1);
    let mut lines: Vec<Line> = Vec::with_capacity(question.option_count() * 2);

    for (index, option) in question.option_texts().enumerate() {
        let is_selected = app.selected_option() == Some(index);
        let style = match (reviewing, Some(index) == correct, is_selected) {
            (true, true, _) => Style::default().fg(Color::Green).bold(),
            (true, false, true) => Style::default().fg(Color::Red).bold(),
            (_, _, true) => Style::default().fg(Color::Cyan).bold(),
            _ => Style::default().fg(Color::Gray),
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", index + 1), style),
            Span::styled(option, style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, validation: &Validation) {
    let color = match validation.feedback {
        Feedback::Correct => Color::Green,
        Feedback::Incorrect | Feedback::TimedOut => Color::Red,
    };

    let mut lines = vec![Line::from(Span::styled(
        validation.feedback.to_string(),
        Style::default().fg(color).bold(),
    ))];
    if !validation.explanation.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Explanation: {}", validation.explanation),
            Style::default().fg(Color::Blue).italic(),
        )));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_notice(frame: &mut Frame, area: Rect, notice: &str) {
    let widget = Paragraph::new(notice)
        .wrap(Wrap { trim: true })
        .fg(Color::Yellow);
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, phase: &QuizPhase) {
    let text = match phase {
        QuizPhase::Answering => "j/k or 1-5 select  ·  enter submit  ·  q quit",
        QuizPhase::Reviewing(_) => "enter next question  ·  q quit",
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::app::App;
    use crate::models::QuestionRecord;
    use crate::ui::test_support::render_to_string;

    fn app(now: Instant) -> App {
        let question = QuestionRecord::new("Which tool stores big tables?", ["HBase", "grep"], "1")
            .with_kind("Multiple Choice")
            .with_time_limit(12)
            .with_explanation("HBase is a wide-column store.");
        let mut app = App::with_questions(vec![question], "big_data.csv");
        app.start_or_pick(now);
        app
    }

    #[test]
    fn test_answering_screen_shows_question_and_countdown() {
        let now = Instant::now();
        let app = app(now);
        let screen = render_to_string(&app, now + Duration::from_millis(2500));

        assert!(screen.contains("Q1. Which tool stores big tables?"));
        assert!(screen.contains("1. HBase"));
        assert!(screen.contains("2. grep"));
        assert!(screen.contains("Time left: 10 s"));
        assert!(screen.contains("Score: 0/0"));
    }

    #[test]
    fn test_review_screen_shows_feedback_and_explanation() {
        let now = Instant::now();
        let mut app = app(now);
        app.tick(now + Duration::from_secs(12));

        let screen = render_to_string(&app, now + Duration::from_secs(12));
        assert!(screen.contains("Time's up!"));
        assert!(screen.contains("Explanation: HBase is a wide-column store."));
        assert!(screen.contains("Score: 0/1"));
        assert!(!screen.contains("Time left"));
    }
}
