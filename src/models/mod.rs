mod question;

pub use question::{AnswerOption, QuestionRecord, DEFAULT_TIME_LIMIT_SECS};

/// Screen currently shown by the terminal app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Welcome,
    Picker,
    Quiz,
    Result,
}
