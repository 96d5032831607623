use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use super::table::{Answer, DuplicateName, SurveyTable};

/// Name of the column identifying each surveyed model.
pub const MODEL_COLUMN: &str = "Model / framework";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open survey table at {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed survey table: {0}")]
    Csv(#[from] csv::Error),
    #[error("survey table has no '{0}' column")]
    MissingModelColumn(String),
    #[error("survey row {0} has an empty model name")]
    EmptyModelName(usize),
    #[error("model '{0}' appears more than once in the survey table")]
    DuplicateModel(String),
    #[error("column '{0}' appears more than once in the survey table")]
    DuplicateColumn(String),
}

impl From<DuplicateName> for LoadError {
    fn from(value: DuplicateName) -> Self {
        match value {
            DuplicateName::Column(name) => LoadError::DuplicateColumn(name),
            DuplicateName::Model(name) => LoadError::DuplicateModel(name),
        }
    }
}

/// Load a semicolon-delimited survey table from disk.
pub fn load_survey(path: &Path) -> Result<SurveyTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_survey(file)
}

/// Parse a semicolon-delimited survey table.
///
/// The model column may sit anywhere; every other column becomes a survey
/// item. Blank cells stay blank and read as 0 during scoring.
pub fn read_survey<R: Read>(reader: R) -> Result<SurveyTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let model_idx = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == MODEL_COLUMN)
        .ok_or_else(|| LoadError::MissingModelColumn(MODEL_COLUMN.to_string()))?;

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != model_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        let model = record.get(model_idx).unwrap_or("").trim().to_string();
        if model.is_empty() {
            // Trailing separator-only lines are common in spreadsheet exports.
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            return Err(LoadError::EmptyModelName(line + 1));
        }
        let answers = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != model_idx)
            .map(|(_, cell)| Answer::parse(cell))
            .collect();
        rows.push((model, answers));
    }

    Ok(SurveyTable::new(columns, rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Model / framework;PV/pos;PV/def;Modeling language;other heat representation
EMMA;1;;GAMS;
oemof;1;1;Python;district heating
PyPSA;0;1;Python;
";

    #[test]
    fn test_read_survey_basic() {
        let table = read_survey(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.models(), &["EMMA", "oemof", "PyPSA"]);
        assert_eq!(
            table.columns(),
            &["PV/pos", "PV/def", "Modeling language", "other heat representation"]
        );
    }

    #[test]
    fn test_blank_cells_read_as_zero() {
        let table = read_survey(SAMPLE.as_bytes()).unwrap();
        let emma = table.row("EMMA").unwrap();
        assert_eq!(emma.answer("PV/def"), &Answer::Blank);
        assert_eq!(emma.value("PV/def"), 0.0);
        assert!(emma.flag("PV/pos"));
    }

    #[test]
    fn test_text_cells_kept() {
        let table = read_survey(SAMPLE.as_bytes()).unwrap();
        let oemof = table.row("oemof").unwrap();
        assert_eq!(oemof.text("Modeling language"), Some("Python"));
        assert!(oemof.is_answered("other heat representation"));
        assert!(!table.row("PyPSA").unwrap().is_answered("other heat representation"));
    }

    #[test]
    fn test_model_column_not_first() {
        let data = "a;Model / framework;b\n1;X;0\n";
        let table = read_survey(data.as_bytes()).unwrap();
        assert_eq!(table.columns(), &["a", "b"]);
        assert!(table.row("X").unwrap().flag("a"));
    }

    #[test]
    fn test_missing_model_column() {
        let data = "Name;a\nX;1\n";
        let err = read_survey(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingModelColumn(_)));
    }

    #[test]
    fn test_duplicate_model_rejected() {
        let data = "Model / framework;a\nX;1\nX;0\n";
        let err = read_survey(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateModel(ref m) if m == "X"));
    }

    #[test]
    fn test_separator_only_lines_skipped() {
        let data = "Model / framework;a\nX;1\n;\n";
        let table = read_survey(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_model_name_with_answers_rejected() {
        let data = "Model / framework;a\nX;1\n;1\n";
        let err = read_survey(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyModelName(2)));
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("flexrate_test_missing_survey.csv");
        let _ = std::fs::remove_file(&path);
        let err = load_survey(&path).unwrap_err();
        assert!(err.to_string().contains("failed to open survey table"));
    }
}
