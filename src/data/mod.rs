mod library;
mod loader;

pub use library::{LibraryError, QuizEntry, QuizLibrary, DEFAULT_LIBRARY_DIR};
pub use loader::{load_questions, load_questions_from_reader, LoadError, REQUIRED_COLUMNS};
