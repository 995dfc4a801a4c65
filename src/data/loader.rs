use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::models::{AnswerOption, DEFAULT_TIME_LIMIT_SECS, QuestionRecord};

/// Header names every quiz file must provide.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "Question Text",
    "Question Type",
    "Option 1",
    "Option 2",
    "Option 3",
    "Option 4",
    "Option 5",
    "Correct Answer",
    "Time in seconds",
    "Answer explanation",
];

const DELIMITER: u8 = b';';

/// Error raised while reading a quiz file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing required column \"{0}\"")]
    MissingColumn(&'static str),
    #[error("cannot read header row: {0}")]
    Header(#[source] csv::Error),
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("row {row}: question has no options")]
    NoOptions { row: usize },
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Question Text")]
    text: String,
    #[serde(rename = "Question Type")]
    kind: String,
    #[serde(rename = "Option 1")]
    option_1: String,
    #[serde(rename = "Option 2")]
    option_2: String,
    #[serde(rename = "Option 3")]
    option_3: String,
    #[serde(rename = "Option 4")]
    option_4: String,
    #[serde(rename = "Option 5")]
    option_5: String,
    #[serde(rename = "Correct Answer")]
    correct_answer: String,
    #[serde(rename = "Time in seconds")]
    time_limit: String,
    #[serde(rename = "Answer explanation")]
    explanation: String,
}

impl RawRow {
    fn into_record(self, row: usize) -> Result<QuestionRecord, LoadError> {
        let options: Vec<AnswerOption> = [
            self.option_1,
            self.option_2,
            self.option_3,
            self.option_4,
            self.option_5,
        ]
        .into_iter()
        .enumerate()
        .filter(|(_, text)| !text.is_empty())
        .map(|(index, text)| AnswerOption {
            column: index + 1,
            text,
        })
        .collect();

        if options.is_empty() {
            return Err(LoadError::NoOptions { row });
        }

        let record = QuestionRecord {
            text: self.text,
            kind: self.kind,
            options,
            correct_answer: self.correct_answer,
            time_limit_secs: parse_time_limit(&self.time_limit),
            explanation: self.explanation,
        };

        if record.correct_position().is_none() {
            warn!(
                row,
                correct_answer = %record.correct_answer,
                "correct answer does not match any option; question can never be answered correctly"
            );
        }

        Ok(record)
    }
}

/// Digits-only seconds, falling back to the default budget.
pub fn parse_time_limit(raw: &str) -> u32 {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return DEFAULT_TIME_LIMIT_SECS;
    }
    raw.parse().unwrap_or(DEFAULT_TIME_LIMIT_SECS)
}

/// Load every question from a `;`-separated quiz file, in file order.
pub fn load_questions<P: AsRef<Path>>(path: P) -> Result<Vec<QuestionRecord>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let questions = load_questions_from_reader(file)?;
    info!(path = %path.display(), count = questions.len(), "loaded quiz file");
    Ok(questions)
}

/// Same as [`load_questions`] for any byte source.
///
/// A source with no header line at all, or with a header and no data rows,
/// yields an empty list.
pub fn load_questions_from_reader<R: Read>(source: R) -> Result<Vec<QuestionRecord>, LoadError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .trim(Trim::All)
        .from_reader(source);

    let headers = reader.headers().map_err(LoadError::Header)?.clone();
    if is_blank_header(&headers) {
        debug!("quiz source is empty");
        return Ok(Vec::new());
    }
    check_columns(&headers)?;

    let mut questions = Vec::new();
    for (index, result) in reader.deserialize::<RawRow>().enumerate() {
        let row = index + 1;
        let raw = result.map_err(|source| LoadError::Row { row, source })?;
        questions.push(raw.into_record(row)?);
    }

    Ok(questions)
}

fn is_blank_header(headers: &StringRecord) -> bool {
    headers.iter().all(str::is_empty)
}

fn check_columns(headers: &StringRecord) -> Result<(), LoadError> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Question Text;Question Type;Option 1;Option 2;Option 3;Option 4;Option 5;Correct Answer;Time in seconds;Answer explanation";

    fn load(body: &str) -> Result<Vec<QuestionRecord>, LoadError> {
        let source = format!("{HEADER}\n{body}");
        load_questions_from_reader(source.as_bytes())
    }

    #[test]
    fn test_rows_keep_file_order() {
        let questions = load(
            "First?;Multiple Choice;a;b;;;;1;10;because\n\
             Second?;Multiple Choice;a;b;c;;;3;20;why not\n\
             Third?;Multiple Choice;x;y;;;;2;;\n",
        )
        .unwrap();

        let texts: Vec<_> = questions.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, ["First?", "Second?", "Third?"]);
        assert_eq!(questions[1].correct_answer, "3");
        assert_eq!(questions[1].explanation, "why not");
        assert_eq!(questions[0].kind, "Multiple Choice");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let questions = load("  Spaced?  ; MC ; one ;  two ;;;; 2 ; 15 ;  note \n").unwrap();
        let question = &questions[0];

        assert_eq!(question.text, "Spaced?");
        assert_eq!(question.kind, "MC");
        assert_eq!(question.option_texts().collect::<Vec<_>>(), ["one", "two"]);
        assert_eq!(question.correct_answer, "2");
        assert_eq!(question.time_limit_secs, 15);
        assert_eq!(question.explanation, "note");
    }

    #[test]
    fn test_blank_or_invalid_time_defaults_to_30() {
        let questions = load(
            "a;t;x;;;;;1;;e\n\
             b;t;x;;;;;1;soon;e\n\
             c;t;x;;;;;1;-5;e\n\
             d;t;x;;;;;1;4.5;e\n\
             e;t;x;;;;;1;0;e\n",
        )
        .unwrap();

        let limits: Vec<_> = questions.iter().map(|q| q.time_limit_secs).collect();
        assert_eq!(limits, [30, 30, 30, 30, 0]);
    }

    #[test]
    fn test_blank_options_are_dropped_in_order() {
        let questions = load("q;t;alpha;;gamma;;epsilon;3;;\n").unwrap();
        let question = &questions[0];

        assert_eq!(
            question.option_texts().collect::<Vec<_>>(),
            ["alpha", "gamma", "epsilon"]
        );
        let columns: Vec<_> = question.options.iter().map(|o| o.column).collect();
        assert_eq!(columns, [1, 3, 5]);
        assert_eq!(question.correct_position(), Some(2));
    }

    #[test]
    fn test_row_without_options_is_rejected() {
        let err = load("ok;t;a;;;;;1;;\nempty;t;;;;;;1;;\n").unwrap_err();
        assert!(matches!(err, LoadError::NoOptions { row: 2 }));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let source = "Question Text;Question Type;Option 1;Correct Answer\nq;t;a;1\n";
        let err = load_questions_from_reader(source.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Option 2")));
    }

    #[test]
    fn test_short_row_is_a_row_error() {
        let err = load("q;t;a;b\n").unwrap_err();
        assert!(matches!(err, LoadError::Row { row: 1, .. }));
    }

    #[test]
    fn test_empty_sources_yield_no_questions() {
        assert!(load_questions_from_reader(&b""[..]).unwrap().is_empty());
        assert!(load("").unwrap().is_empty());
    }

    #[test]
    fn test_extra_columns_and_reordering_are_accepted() {
        let source = "Answer explanation;Correct Answer;Time in seconds;Notes;Option 5;Option 4;Option 3;Option 2;Option 1;Question Type;Question Text\n\
                      why;1;12;ignored;;;;b;a;MC;Which?\n";
        let questions = load_questions_from_reader(source.as_bytes()).unwrap();

        assert_eq!(questions[0].text, "Which?");
        assert_eq!(questions[0].option_texts().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(questions[0].time_limit_secs, 12);
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = load_questions("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(err.to_string().contains("here.csv"));
    }

    #[test]
    fn test_parse_time_limit() {
        assert_eq!(parse_time_limit("45"), 45);
        assert_eq!(parse_time_limit(" 7 "), 7);
        assert_eq!(parse_time_limit(""), 30);
        assert_eq!(parse_time_limit("+5"), 30);
        assert_eq!(parse_time_limit("99999999999"), 30);
    }
}
