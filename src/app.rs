use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use crate::countdown::Countdown;
use crate::data::{load_questions, QuizEntry, QuizLibrary};
use crate::engine::{EngineError, FinalScore, QuizEngine, Selection, Validation};
use crate::models::{AppState, QuestionRecord};
use crate::QuizError;

const NO_SELECTION_NOTICE: &str = "Select an answer first.";

/// Where the player is within the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    Answering,
    Reviewing(Validation),
}

pub struct App {
    pub state: AppState,
    engine: QuizEngine,
    loaded: Vec<QuestionRecord>,
    quiz_name: Option<String>,
    library: QuizLibrary,
    entries: Vec<QuizEntry>,
    picker_cursor: usize,
    selected_option: Option<usize>,
    phase: QuizPhase,
    countdown: Option<Countdown>,
    timer_enabled: bool,
    notice: Option<String>,
    result_scroll: usize,
    last_result: Option<FinalScore>,
}

impl App {
    pub fn new(library: QuizLibrary) -> Self {
        Self {
            state: AppState::Welcome,
            engine: QuizEngine::new(),
            loaded: Vec::new(),
            quiz_name: None,
            library,
            entries: Vec::new(),
            picker_cursor: 0,
            selected_option: None,
            phase: QuizPhase::Answering,
            countdown: None,
            timer_enabled: true,
            notice: None,
            result_scroll: 0,
            last_result: None,
        }
    }

    pub fn with_questions<S: Into<String>>(questions: Vec<QuestionRecord>, name: S) -> Self {
        let mut app = Self::new(QuizLibrary::default());
        app.loaded = questions;
        app.quiz_name = Some(name.into());
        app
    }

    pub fn set_timer_enabled(&mut self, enabled: bool) {
        self.timer_enabled = enabled;
    }

    pub fn set_library(&mut self, library: QuizLibrary) {
        self.library = library;
    }

    /// Read a quiz file and keep its questions for the next start.
    ///
    /// A file without any question is refused so the current selection stays
    /// usable.
    pub fn load_quiz<P: AsRef<Path>>(&mut self, path: P) -> Result<(), QuizError> {
        let path = path.as_ref();
        let questions = load_questions(path)?;
        if questions.is_empty() {
            return Err(EngineError::EmptyQuiz.into());
        }

        self.loaded = questions;
        self.quiz_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(())
    }

    pub fn has_quiz(&self) -> bool {
        !self.loaded.is_empty()
    }

    pub fn quiz_name(&self) -> Option<&str> {
        self.quiz_name.as_deref()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.engine.current()
    }

    pub fn current_question_number(&self) -> usize {
        self.engine.current_index() + 1
    }

    pub fn total_questions(&self) -> usize {
        self.engine.total_questions()
    }

    /// 0-based index of the highlighted option, if any.
    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn last_result(&self) -> Option<FinalScore> {
        self.last_result
    }

    pub fn entries(&self) -> &[QuizEntry] {
        &self.entries
    }

    pub fn picker_cursor(&self) -> usize {
        self.picker_cursor
    }

    pub fn library(&self) -> &QuizLibrary {
        &self.library
    }

    /// Welcome screen action: start the loaded quiz, or browse the library.
    pub fn start_or_pick(&mut self, now: Instant) {
        if self.has_quiz() {
            self.start_quiz(now);
        } else {
            self.open_picker();
        }
    }

    pub fn open_picker(&mut self) {
        self.notice = None;
        match self.library.list() {
            Ok(entries) => {
                if entries.is_empty() {
                    self.notice = Some(format!(
                        "No quiz files found in {}.",
                        self.library.dir().display()
                    ));
                }
                self.entries = entries;
            }
            Err(err) => {
                warn!(error = %err, "cannot list quiz library");
                self.entries.clear();
                self.notice = Some(err.to_string());
            }
        }
        self.picker_cursor = 0;
        self.state = AppState::Picker;
    }

    pub fn close_picker(&mut self) {
        self.notice = None;
        self.state = AppState::Welcome;
    }

    pub fn picker_next(&mut self) {
        if !self.entries.is_empty() {
            self.picker_cursor = (self.picker_cursor + 1) % self.entries.len();
        }
    }

    pub fn picker_previous(&mut self) {
        let len = self.entries.len();
        if len > 0 {
            self.picker_cursor = (self.picker_cursor + len - 1) % len;
        }
    }

    /// Load the highlighted library entry and start it.
    ///
    /// Load failures stay on the picker with a message.
    pub fn confirm_pick(&mut self, now: Instant) {
        let Some(entry) = self.entries.get(self.picker_cursor).cloned() else {
            return;
        };

        match self.load_quiz(&entry.path) {
            Ok(()) => self.start_quiz(now),
            Err(err) => {
                warn!(path = %entry.path.display(), error = %err, "cannot load quiz");
                self.notice = Some(format!("{}: {}", entry.name, err));
            }
        }
    }

    pub fn start_quiz(&mut self, now: Instant) {
        if let Err(err) = self.engine.start(self.loaded.clone()) {
            self.notice = Some(err.to_string());
            return;
        }

        self.notice = None;
        self.last_result = None;
        self.result_scroll = 0;
        self.state = AppState::Quiz;
        self.begin_question(now);
    }

    fn begin_question(&mut self, now: Instant) {
        self.phase = QuizPhase::Answering;
        self.selected_option = None;
        self.notice = None;

        let index = self.engine.current_index();
        let limit = if self.timer_enabled {
            self.engine.current().map(QuestionRecord::time_limit)
        } else {
            None
        };
        self.countdown = limit.map(|limit| Countdown::start(index, limit, now));
    }

    fn option_count(&self) -> usize {
        self.engine.current().map_or(0, QuestionRecord::option_count)
    }

    fn is_answering(&self) -> bool {
        self.state == AppState::Quiz && self.phase == QuizPhase::Answering
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if !self.is_answering() || count == 0 {
            return;
        }
        self.selected_option = Some(match self.selected_option {
            Some(index) => (index + 1) % count,
            None => 0,
        });
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if !self.is_answering() || count == 0 {
            return;
        }
        self.selected_option = Some(match self.selected_option {
            Some(index) => (index + count - 1) % count,
            None => count - 1,
        });
    }

    /// Select by 1-based position, ignoring positions the question lacks.
    pub fn select_option(&mut self, position: usize) {
        if self.is_answering() && (1..=self.option_count()).contains(&position) {
            self.selected_option = Some(position - 1);
        }
    }

    pub fn submit_answer(&mut self) {
        if !self.is_answering() {
            return;
        }
        let Some(index) = self.selected_option else {
            self.notice = Some(NO_SELECTION_NOTICE.to_string());
            return;
        };

        self.countdown = None;
        self.record_validation(Selection::Option(index + 1), false);
    }

    /// Fire the countdown once it has run out for the question on screen.
    pub fn tick(&mut self, now: Instant) {
        if !self.is_answering() {
            return;
        }
        let Some(countdown) = self.countdown else {
            return;
        };

        if countdown.question_index() != self.engine.current_index() {
            self.countdown = None;
            return;
        }
        if !countdown.is_expired(now) {
            return;
        }

        self.countdown = None;
        info!(question = countdown.question_index() + 1, "time limit reached");
        let selection = Selection::from(self.selected_option.map(|index| index + 1));
        self.record_validation(selection, true);
    }

    fn record_validation(&mut self, selection: Selection, timed_out: bool) {
        match self.engine.validate(selection, timed_out) {
            Ok(validation) => {
                self.notice = None;
                self.phase = QuizPhase::Reviewing(validation);
            }
            Err(err) => {
                warn!(error = %err, "validation refused");
                self.notice = Some(err.to_string());
            }
        }
    }

    pub fn next_question(&mut self, now: Instant) {
        if self.state != AppState::Quiz || !matches!(self.phase, QuizPhase::Reviewing(_)) {
            return;
        }

        match self.engine.advance() {
            Ok(true) => self.begin_question(now),
            Ok(false) => {
                self.countdown = None;
                self.last_result = Some(self.engine.final_score());
                self.state = AppState::Result;
            }
            Err(err) => {
                warn!(error = %err, "cannot advance");
                self.notice = Some(err.to_string());
            }
        }
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn scroll_results_down(&mut self) {
        if self.result_scroll + 1 < self.engine.total_questions() {
            self.result_scroll += 1;
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    pub fn restart(&mut self) {
        self.state = AppState::Welcome;
        self.phase = QuizPhase::Answering;
        self.selected_option = None;
        self.countdown = None;
        self.notice = None;
        self.result_scroll = 0;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(QuizLibrary::default())
    }
}
