//! Delimited-text codec for persisting a record store
//!
//! One row per record: `id,name,age,grade_1,...,grade_n`. Grades occupy
//! every trailing column, so a three-column row is a record with an empty
//! grade list. There is no header row. Fields containing the delimiter or
//! a double quote are quoted, with embedded quotes doubled; rows are
//! strictly line-oriented, so fields cannot contain line breaks.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{RosterError, RosterResult};
use crate::store::{RecordStore, StudentRecord};

/// Default persistence file name
pub const DEFAULT_FILE: &str = "students.csv";

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Write every record in the store to `path`, one row per record in the
/// store's iteration order, truncating any existing content. The file is
/// open only for the duration of this call.
pub fn save(store: &RecordStore, path: &Path) -> RosterResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut rows = 0usize;
    for record in store.iter() {
        writeln!(writer, "{}", encode_row(record))?;
        rows += 1;
    }
    writer.flush()?;

    tracing::debug!(rows, path = %path.display(), "saved store");
    Ok(())
}

/// Read `path` into a freshly populated store. Fails with `FileNotFound`
/// if the path does not exist; callers treat that as "no prior data."
/// Any malformed row aborts the whole load, so the result is never a
/// partial import. Duplicate ids are not re-checked: the later row wins.
pub fn load(path: &Path) -> RosterResult<RecordStore> {
    if !path.exists() {
        return Err(RosterError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut store = RecordStore::new();
    for (index, line) in reader.lines().enumerate() {
        let mut line = line?;
        if line.ends_with('\r') {
            line.pop();
        }
        if line.is_empty() {
            continue;
        }

        let record = parse_row(&line, index + 1)?;
        if store.contains(&record.id) {
            tracing::debug!(id = %record.id, line = index + 1, "duplicate id in file, later row wins");
        }
        store.put(record);
    }

    tracing::debug!(rows = store.len(), path = %path.display(), "loaded store");
    Ok(store)
}

/// Encode one record as a delimited row
fn encode_row(record: &StudentRecord) -> String {
    let mut row = String::new();
    push_field(&mut row, &record.id);
    row.push(DELIMITER);
    push_field(&mut row, &record.name);
    row.push(DELIMITER);
    row.push_str(&record.age.to_string());
    for grade in &record.grades {
        row.push(DELIMITER);
        row.push_str(&grade.to_string());
    }
    row
}

/// Append a field, quoting it if it contains the delimiter or a quote
fn push_field(row: &mut String, field: &str) {
    if field.contains(DELIMITER) || field.contains(QUOTE) {
        row.push(QUOTE);
        for ch in field.chars() {
            if ch == QUOTE {
                row.push(QUOTE);
            }
            row.push(ch);
        }
        row.push(QUOTE);
    } else {
        row.push_str(field);
    }
}

/// Decode one row into a record. Column 0 is the id, column 1 the name,
/// column 2 the age; every remaining column is a grade.
fn parse_row(line: &str, line_number: usize) -> RosterResult<StudentRecord> {
    let columns = split_row(line, line_number)?;
    if columns.len() < 3 {
        return Err(RosterError::MalformedRow {
            line: line_number,
            reason: format!("expected at least 3 columns, got {}", columns.len()),
        });
    }

    let age = parse_int::<i32>(&columns[2], "age", line_number)?;
    let mut grades = Vec::with_capacity(columns.len() - 3);
    for column in &columns[3..] {
        grades.push(parse_int::<i32>(column, "grade", line_number)?);
    }

    Ok(StudentRecord {
        id: columns[0].clone(),
        name: columns[1].clone(),
        age,
        grades,
    })
}

/// Split a row into fields, honoring quoted fields with doubled quotes
fn split_row(line: &str, line_number: usize) -> RosterResult<Vec<String>> {
    let mut columns = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
        } else if ch == QUOTE && field.is_empty() {
            in_quotes = true;
        } else if ch == DELIMITER {
            columns.push(std::mem::take(&mut field));
        } else {
            field.push(ch);
        }
    }

    if in_quotes {
        return Err(RosterError::MalformedRow {
            line: line_number,
            reason: "unterminated quoted field".into(),
        });
    }

    columns.push(field);
    Ok(columns)
}

/// Strict integer parse; anything the type rejects is a malformed row
fn parse_int<T: FromStr>(field: &str, what: &str, line: usize) -> RosterResult<T> {
    field.parse().map_err(|_| RosterError::MalformedRow {
        line,
        reason: format!("non-integer {what} '{field}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_store() -> RecordStore {
        let mut store = RecordStore::new();
        store
            .add(StudentRecord::new("S1", "Ann", 20, vec![90, 85]))
            .unwrap();
        store
            .add(StudentRecord::new("S2", "Bob", 21, vec![]))
            .unwrap();
        store
            .add(StudentRecord::new("S3", "Cid", 22, vec![100, 60, 75]))
            .unwrap();
        store
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");

        let store = sample_store();
        save(&store, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.len(), store.len());
        for record in store.iter() {
            assert_eq!(loaded.get(&record.id), Some(record));
        }
    }

    #[test]
    fn test_empty_grade_list_is_a_three_column_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");

        let mut store = RecordStore::new();
        store
            .add(StudentRecord::new("S2", "Bob", 21, vec![]))
            .unwrap();
        save(&store, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "S2,Bob,21\n");

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.get("S2").unwrap().grades, Vec::<i32>::new());
    }

    #[test]
    fn test_fields_containing_delimiter_are_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");

        let mut store = RecordStore::new();
        store
            .add(StudentRecord::new("S1", "Doe, Jane \"JD\"", 20, vec![88]))
            .unwrap();
        save(&store, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "S1,\"Doe, Jane \"\"JD\"\"\",20,88\n");

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.get("S1").unwrap().name, "Doe, Jane \"JD\"");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.csv");

        let err = load(&path).unwrap_err();
        assert!(matches!(err, RosterError::FileNotFound { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_load_rejects_short_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(&path, "S1,Ann,20,90\nS2,Cid\n").unwrap();

        let err = load(&path).unwrap_err();
        match err {
            RosterError::MalformedRow { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("3 columns"));
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_non_integer_age_and_grade() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");

        std::fs::write(&path, "S1,Ann,twenty\n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, RosterError::MalformedRow { line: 1, .. }));

        std::fs::write(&path, "S1,Ann,20,90,eighty\n").unwrap();
        let err = load(&path).unwrap_err();
        match err {
            RosterError::MalformedRow { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("grade"));
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_load_aborts_whole_import_on_malformed_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(&path, "S1,Ann,20\nbroken\n").unwrap();

        assert!(load(&path).is_err());
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(&path, "S1,Ann,20,90\n\nS2,Bob,21\n").unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_load_lets_later_duplicate_row_win() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(&path, "S1,Ann,20,90\nS1,Anne,22,50\n").unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        let record = loaded.get("S1").unwrap();
        assert_eq!(record.name, "Anne");
        assert_eq!(record.age, 22);
        assert_eq!(record.grades, vec![50]);
    }

    #[test]
    fn test_load_rejects_unterminated_quote() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(&path, "S1,\"Ann,20\n").unwrap();

        let err = load(&path).unwrap_err();
        match err {
            RosterError::MalformedRow { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("unterminated"));
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_load_tolerates_crlf_line_endings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(&path, "S1,Ann,20,90\r\nS2,Bob,21\r\n").unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("S1").unwrap().grades, vec![90]);
    }

    #[test]
    fn test_save_preserves_iteration_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.csv");

        save(&sample_store(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let ids: Vec<&str> = text
            .lines()
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(ids, vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn test_save_fails_on_unwritable_path() {
        let dir = tempdir().unwrap();
        // A directory cannot be opened for writing as a file.
        let err = save(&sample_store(), dir.path()).unwrap_err();
        assert!(matches!(err, RosterError::Io(_)));
        assert!(!err.is_recoverable());
    }
}
