use std::time::Duration;

/// Time budget used when a row leaves `Time in seconds` empty or non-numeric.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 30;

/// One answer choice together with the `Option N` column it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    /// 1-based column position in the source file.
    pub column: usize,
    pub text: String,
}

/// A validated question row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub text: String,
    /// Free-form label such as "Multiple Choice". Not used for scoring.
    pub kind: String,
    pub options: Vec<AnswerOption>,
    /// String form of the 1-based `Option N` column holding the right answer.
    pub correct_answer: String,
    pub time_limit_secs: u32,
    pub explanation: String,
}

impl QuestionRecord {
    /// Builds a record whose options occupy consecutive columns starting at 1.
    pub fn new<S: Into<String>>(
        text: S,
        options: impl IntoIterator<Item = S>,
        correct_answer: S,
    ) -> Self {
        let options = options
            .into_iter()
            .enumerate()
            .map(|(index, text)| AnswerOption {
                column: index + 1,
                text: text.into(),
            })
            .collect();

        Self {
            text: text.into(),
            kind: String::new(),
            options,
            correct_answer: correct_answer.into(),
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            explanation: String::new(),
        }
    }

    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.time_limit_secs = secs;
        self
    }

    pub fn with_explanation<S: Into<String>>(mut self, explanation: S) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_kind<S: Into<String>>(mut self, kind: S) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn option_texts(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|option| option.text.as_str())
    }

    /// Answer key for the option shown at 1-based `position`.
    ///
    /// The key is the source column number, so a blank `Option 2` does not
    /// shift which option `Correct Answer = 3` refers to.
    pub fn answer_key(&self, position: usize) -> Option<String> {
        let option = self.options.get(position.checked_sub(1)?)?;
        Some(option.column.to_string())
    }

    /// 1-based display position of the correct option, if it exists.
    pub fn correct_position(&self) -> Option<usize> {
        self.options
            .iter()
            .position(|option| option.column.to_string() == self.correct_answer)
            .map(|index| index + 1)
    }

    /// Zero seconds means the question times out as soon as it is shown.
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(u64::from(self.time_limit_secs))
    }
}
