//! Quiz session state: cursor, score and per-question outcomes.
//!
//! The engine performs no timing. Whoever drives it runs the countdown and
//! reports expiry through [`QuizEngine::validate`] with `timed_out = true`.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::QuestionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    NotStarted,
    InProgress,
    Finished,
}

/// What the player picked for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// 1-based position among the displayed options.
    Option(usize),
    /// Nothing picked. Only valid for a timed-out validation.
    None,
}

impl From<Option<usize>> for Selection {
    fn from(position: Option<usize>) -> Self {
        position.map_or(Selection::None, Selection::Option)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Correct,
    Incorrect,
    TimedOut,
}

impl Feedback {
    pub fn is_correct(self) -> bool {
        matches!(self, Feedback::Correct)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Correct => write!(f, "Correct!"),
            Feedback::Incorrect => write!(f, "Incorrect."),
            Feedback::TimedOut => write!(f, "Time's up!"),
        }
    }
}

/// Result of scoring one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub is_correct: bool,
    pub feedback: Feedback,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreSnapshot {
    pub score: usize,
    pub answered: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinalScore {
    pub score: usize,
    pub total: usize,
}

impl FinalScore {
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.score as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("quiz has no usable questions")]
    EmptyQuiz,
    #[error("an answer must be selected before validating")]
    InvalidSelection,
    #[error("question {} was already validated", .index + 1)]
    DoubleValidation { index: usize },
    #[error("question {} has not been validated yet", .index + 1)]
    NotValidated { index: usize },
    #[error("quiz has not been started")]
    NotInProgress,
    #[error("quiz is already finished")]
    Finished,
}

#[derive(Debug)]
pub struct QuizEngine {
    status: EngineStatus,
    questions: Vec<QuestionRecord>,
    current_index: usize,
    score: usize,
    answered_count: usize,
    outcomes: Vec<Option<Feedback>>,
}

impl QuizEngine {
    pub fn new() -> Self {
        Self {
            status: EngineStatus::NotStarted,
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            answered_count: 0,
            outcomes: Vec::new(),
        }
    }

    /// Begin a fresh session. Valid from any state.
    ///
    /// An empty question list leaves the engine untouched.
    pub fn start(&mut self, questions: Vec<QuestionRecord>) -> Result<(), EngineError> {
        if questions.is_empty() {
            return Err(EngineError::EmptyQuiz);
        }

        self.outcomes = vec![None; questions.len()];
        self.questions = questions;
        self.current_index = 0;
        self.score = 0;
        self.answered_count = 0;
        self.status = EngineStatus::InProgress;

        info!(total = self.questions.len(), "quiz started");
        Ok(())
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    pub fn current(&self) -> Option<&QuestionRecord> {
        match self.status {
            EngineStatus::InProgress => self.questions.get(self.current_index),
            _ => None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    /// Outcome per question, `None` for questions not reached.
    pub fn outcomes(&self) -> &[Option<Feedback>] {
        &self.outcomes
    }

    /// Whether the current question already has an outcome.
    pub fn is_validated(&self) -> bool {
        self.outcomes
            .get(self.current_index)
            .is_some_and(Option::is_some)
    }

    /// Score the current question.
    ///
    /// A timed-out validation is never correct, whatever `selection` holds.
    pub fn validate(
        &mut self,
        selection: Selection,
        timed_out: bool,
    ) -> Result<Validation, EngineError> {
        self.ensure_in_progress()?;
        let index = self.current_index;

        if self.is_validated() {
            return Err(EngineError::DoubleValidation { index });
        }

        let question = &self.questions[index];
        let feedback = match (selection, timed_out) {
            (_, true) => Feedback::TimedOut,
            (Selection::None, false) | (Selection::Option(0), false) => {
                return Err(EngineError::InvalidSelection);
            }
            (Selection::Option(position), false) => {
                let key = question.answer_key(position);
                if key.as_deref() == Some(question.correct_answer.as_str()) {
                    Feedback::Correct
                } else {
                    Feedback::Incorrect
                }
            }
        };

        let explanation = question.explanation.clone();
        if feedback.is_correct() {
            self.score += 1;
        }
        self.answered_count += 1;
        self.outcomes[index] = Some(feedback);

        debug!(
            question = index + 1,
            ?selection,
            ?feedback,
            score = self.score,
            answered = self.answered_count,
            "question validated"
        );

        Ok(Validation {
            is_correct: feedback.is_correct(),
            feedback,
            explanation,
        })
    }

    /// Move past the validated current question.
    ///
    /// Returns `false` once the last question is behind us; the engine is then
    /// finished.
    pub fn advance(&mut self) -> Result<bool, EngineError> {
        self.ensure_in_progress()?;
        if !self.is_validated() {
            return Err(EngineError::NotValidated {
                index: self.current_index,
            });
        }

        self.current_index += 1;
        if self.current_index < self.questions.len() {
            return Ok(true);
        }

        self.status = EngineStatus::Finished;
        info!(score = self.score, total = self.questions.len(), "quiz finished");
        Ok(false)
    }

    pub fn score_snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.score,
            answered: self.answered_count,
        }
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn final_score(&self) -> FinalScore {
        FinalScore {
            score: self.score,
            total: self.questions.len(),
        }
    }

    fn ensure_in_progress(&self) -> Result<(), EngineError> {
        match self.status {
            EngineStatus::InProgress => Ok(()),
            EngineStatus::NotStarted => Err(EngineError::NotInProgress),
            EngineStatus::Finished => Err(EngineError::Finished),
        }
    }
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new()
    }
}
