//! # quiz-runner
//!
//! A terminal quiz runner for `;`-separated question files.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_runner::{Quiz, QuizError};
//!
//! fn main() -> Result<(), QuizError> {
//!     // Load questions from a quiz file
//!     let quiz = Quiz::from_csv("res/big_data.csv")?;
//!
//!     // Run the quiz in the terminal
//!     if let Some(result) = quiz.run()? {
//!         println!("{}/{}", result.score, result.total);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! The pieces are usable without the terminal as well:
//!
//! ```rust
//! use quiz_runner::{QuestionRecord, QuizEngine, Selection};
//!
//! let mut engine = QuizEngine::new();
//! engine.start(vec![QuestionRecord::new("2 + 2?", ["3", "4"], "2")]).unwrap();
//! assert!(engine.validate(Selection::Option(2), false).unwrap().is_correct);
//! assert!(!engine.advance().unwrap());
//! assert_eq!(engine.final_score().score, 1);
//! ```

mod app;
mod countdown;
mod data;
mod engine;
pub mod logging;
mod models;
pub mod terminal;
mod ui;

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

pub use app::{App, QuizPhase};
pub use countdown::Countdown;
pub use data::{
    load_questions, load_questions_from_reader, LibraryError, LoadError, QuizEntry, QuizLibrary,
    DEFAULT_LIBRARY_DIR, REQUIRED_COLUMNS,
};
pub use engine::{
    EngineError, EngineStatus, Feedback, FinalScore, QuizEngine, ScoreSnapshot, Selection,
    Validation,
};
pub use models::{AnswerOption, AppState, QuestionRecord, DEFAULT_TIME_LIMIT_SECS};

/// How often the event loop wakes up to refresh the countdown.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Error type for quiz operations.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// Error loading questions from file.
    #[error("Failed to load questions: {0}")]
    Load(#[from] LoadError),
    /// The quiz cannot be started or played on.
    #[error("{0}")]
    Engine(#[from] EngineError),
    /// Error reading or writing the quiz library.
    #[error("Quiz library error: {0}")]
    Library(#[from] LibraryError),
    /// IO error during quiz execution.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App,
}

impl Quiz {
    /// Create a quiz from already loaded questions.
    ///
    /// Fails with [`EngineError::EmptyQuiz`] when `questions` is empty.
    pub fn new<S: Into<String>>(questions: Vec<QuestionRecord>, name: S) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(EngineError::EmptyQuiz.into());
        }
        Ok(Self {
            app: App::with_questions(questions, name),
        })
    }

    /// Load a quiz from a `;`-separated file.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use quiz_runner::Quiz;
    ///
    /// let quiz = Quiz::from_csv("res/big_data.csv").expect("Failed to load quiz");
    /// ```
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, QuizError> {
        let mut app = App::default();
        app.load_quiz(path)?;
        Ok(Self { app })
    }

    /// A quiz that starts on the library picker.
    pub fn from_library(library: QuizLibrary) -> Self {
        Self {
            app: App::new(library),
        }
    }

    /// Library used when the player browses for another quiz.
    pub fn library(mut self, library: QuizLibrary) -> Self {
        self.app.set_library(library);
        self
    }

    /// Enable or disable per-question countdowns.
    pub fn timer(mut self, enabled: bool) -> Self {
        self.app.set_timer_enabled(enabled);
        self
    }

    /// Run the quiz in the terminal.
    ///
    /// Takes over the terminal until the player quits and returns the score
    /// of the last completed run, if any.
    pub fn run(mut self) -> Result<Option<FinalScore>, QuizError> {
        let mut session = terminal::TerminalSession::enter()?;
        let result = run_event_loop(session.terminal_mut(), &mut self.app);
        session.leave()?;
        result?;
        Ok(self.app.last_result())
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), QuizError> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|frame| ui::render(frame, app, Instant::now()))?;

        if !event::poll(TICK_RATE)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code, Instant::now()) {
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
pub fn handle_input(app: &mut App, key: KeyCode, now: Instant) -> bool {
    match app.state {
        AppState::Welcome => handle_welcome_input(app, key, now),
        AppState::Picker => handle_picker_input(app, key, now),
        AppState::Quiz => handle_quiz_input(app, key, now),
        AppState::Result => handle_result_input(app, key),
    }
}

fn handle_welcome_input(app: &mut App, key: KeyCode, now: Instant) -> bool {
    match key {
        KeyCode::Enter => {
            app.start_or_pick(now);
            false
        }
        KeyCode::Char('l') | KeyCode::Char('L') => {
            app.open_picker();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

fn handle_picker_input(app: &mut App, key: KeyCode, now: Instant) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.picker_previous();
            false
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.picker_next();
            false
        }
        KeyCode::Enter => {
            app.confirm_pick(now);
            false
        }
        KeyCode::Esc => {
            app.close_picker();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode, now: Instant) -> bool {
    if matches!(app.phase(), QuizPhase::Reviewing(_)) {
        return match key {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') => {
                app.next_question(now);
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => true,
            _ => false,
        };
    }

    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_option();
            false
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_option();
            false
        }
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(position) = c.to_digit(10) {
                app.select_option(position as usize);
            }
            false
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.submit_answer();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_results_down();
            false
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_results_up();
            false
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.restart();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::with_questions(
            vec![
                QuestionRecord::new("One?", ["a", "b"], "2"),
                QuestionRecord::new("Two?", ["a", "b", "c"], "1"),
            ],
            "keys.csv",
        )
    }

    #[test]
    fn test_keyboard_drives_a_full_quiz() {
        let now = Instant::now();
        let mut app = app();

        assert!(!handle_input(&mut app, KeyCode::Enter, now));
        assert_eq!(app.state, AppState::Quiz);

        handle_input(&mut app, KeyCode::Char('2'), now);
        handle_input(&mut app, KeyCode::Enter, now);
        handle_input(&mut app, KeyCode::Char('n'), now);

        handle_input(&mut app, KeyCode::Down, now);
        handle_input(&mut app, KeyCode::Enter, now);
        handle_input(&mut app, KeyCode::Enter, now);

        assert_eq!(app.state, AppState::Result);
        assert_eq!(app.last_result(), Some(FinalScore { score: 2, total: 2 }));

        handle_input(&mut app, KeyCode::Char('r'), now);
        assert_eq!(app.state, AppState::Welcome);
        assert!(handle_input(&mut app, KeyCode::Char('q'), now));
    }

    #[test]
    fn test_enter_without_selection_keeps_question_open() {
        let now = Instant::now();
        let mut app = app();
        handle_input(&mut app, KeyCode::Enter, now);
        handle_input(&mut app, KeyCode::Enter, now);

        assert_eq!(app.phase(), &QuizPhase::Answering);
        assert_eq!(app.engine().score_snapshot().answered, 0);
    }

    #[test]
    fn test_quiz_new_rejects_empty_questions() {
        assert!(matches!(
            Quiz::new(Vec::new(), "empty"),
            Err(QuizError::Engine(EngineError::EmptyQuiz))
        ));
    }
}
