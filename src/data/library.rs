//! Directory of quiz files the picker screen offers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Default library directory, relative to the working directory.
pub const DEFAULT_LIBRARY_DIR: &str = "res";

const QUIZ_EXTENSION: &str = "csv";

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a file", .0.display())]
    NotAFile(PathBuf),
    #[error("{} is already in the library", .0.display())]
    AlreadyInLibrary(PathBuf),
}

impl LibraryError {
    fn io<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A quiz file found in the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizEntry {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct QuizLibrary {
    dir: PathBuf,
}

impl QuizLibrary {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Quiz files in the library, sorted by file name.
    ///
    /// The directory is created when it does not exist yet.
    pub fn list(&self) -> Result<Vec<QuizEntry>, LibraryError> {
        self.ensure_dir()?;

        let read_dir = fs::read_dir(&self.dir).map_err(LibraryError::io("cannot read", &self.dir))?;
        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(LibraryError::io("cannot read", &self.dir))?;
            let path = entry.path();
            if !path.is_file() || !has_quiz_extension(&path) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(QuizEntry { name, path });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(dir = %self.dir.display(), count = entries.len(), "listed quiz library");
        Ok(entries)
    }

    /// Copy `source` into the library under its own file name.
    pub fn import<P: AsRef<Path>>(&self, source: P) -> Result<PathBuf, LibraryError> {
        let source = source.as_ref();
        if !source.is_file() {
            return Err(LibraryError::NotAFile(source.to_path_buf()));
        }
        let Some(file_name) = source.file_name() else {
            return Err(LibraryError::NotAFile(source.to_path_buf()));
        };

        self.ensure_dir()?;
        let dest = self.dir.join(file_name);
        if dest.exists() && is_same_file(source, &dest)? {
            return Err(LibraryError::AlreadyInLibrary(dest));
        }
        fs::copy(source, &dest).map_err(LibraryError::io("cannot copy into", &dest))?;

        info!(source = %source.display(), dest = %dest.display(), "imported quiz file");
        Ok(dest)
    }

    fn ensure_dir(&self) -> Result<(), LibraryError> {
        fs::create_dir_all(&self.dir).map_err(LibraryError::io("cannot create", &self.dir))
    }
}

impl Default for QuizLibrary {
    fn default() -> Self {
        Self::new(DEFAULT_LIBRARY_DIR)
    }
}

/// Copying a file onto itself truncates it, so both sides are resolved first.
fn is_same_file(source: &Path, dest: &Path) -> Result<bool, LibraryError> {
    let source = fs::canonicalize(source).map_err(LibraryError::io("cannot resolve", source))?;
    let dest_resolved = fs::canonicalize(dest).map_err(LibraryError::io("cannot resolve", dest))?;
    Ok(source == dest_resolved)
}

fn has_quiz_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(QUIZ_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_creates_missing_dir_and_filters_csv() {
        let root = tempfile::tempdir().unwrap();
        let library = QuizLibrary::new(root.path().join("res"));

        assert!(library.list().unwrap().is_empty());
        assert!(library.dir().is_dir());

        fs::write(library.dir().join("b.csv"), "").unwrap();
        fs::write(library.dir().join("a.CSV"), "").unwrap();
        fs::write(library.dir().join("notes.txt"), "").unwrap();
        fs::create_dir(library.dir().join("nested.csv")).unwrap();

        let names: Vec<_> = library.list().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["a.CSV", "b.csv"]);
    }

    #[test]
    fn test_import_copies_by_file_name() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("history.csv");
        fs::write(&source, "content").unwrap();

        let library = QuizLibrary::new(root.path().join("lib"));
        let dest = library.import(&source).unwrap();

        assert_eq!(dest, library.dir().join("history.csv"));
        assert_eq!(fs::read_to_string(dest).unwrap(), "content");
        assert!(source.exists());
    }

    #[test]
    fn test_import_of_library_file_leaves_it_intact() {
        let root = tempfile::tempdir().unwrap();
        let library = QuizLibrary::new(root.path());
        let path = root.path().join("quiz.csv");
        fs::write(&path, "Question Text;Question Type\nq;t\n").unwrap();

        let err = library.import(&path).unwrap_err();
        assert!(matches!(err, LibraryError::AlreadyInLibrary(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Question Text;Question Type\nq;t\n");

        let relative = root.path().join(".").join("quiz.csv");
        assert!(matches!(
            library.import(&relative),
            Err(LibraryError::AlreadyInLibrary(_))
        ));
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_import_replaces_other_file_with_same_name() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("quiz.csv");
        fs::write(&source, "new").unwrap();

        let library = QuizLibrary::new(root.path().join("lib"));
        fs::create_dir_all(library.dir()).unwrap();
        fs::write(library.dir().join("quiz.csv"), "old").unwrap();

        library.import(&source).unwrap();
        assert_eq!(fs::read_to_string(library.dir().join("quiz.csv")).unwrap(), "new");
    }

    #[test]
    fn test_import_rejects_missing_source() {
        let root = tempfile::tempdir().unwrap();
        let library = QuizLibrary::new(root.path());

        let err = library.import(root.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LibraryError::NotAFile(_)));
    }
}
