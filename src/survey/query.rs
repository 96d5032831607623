use super::table::SurveyTable;

/// Number of models with each listed column set.
///
/// Flag columns count models whose value is 1; free-text columns (the
/// "other ..." answers) count every model that answered them.
pub fn column_totals(table: &SurveyTable, columns: &[String]) -> Vec<(String, usize)> {
    columns
        .iter()
        .map(|column| {
            let count = table
                .rows()
                .filter(|row| row.flag(column) || row.text(column).is_some())
                .count();
            (column.clone(), count)
        })
        .collect()
}

/// Columns between `first` and `last` inclusive, in file order.
pub fn column_span(table: &SurveyTable, first: &str, last: &str) -> Option<Vec<String>> {
    let columns = table.columns();
    let start = columns.iter().position(|c| c == first)?;
    let end = columns.iter().position(|c| c == last)?;
    if end < start {
        return None;
    }
    Some(columns[start..=end].to_vec())
}

/// How to match a model's answer in [`find_models`].
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Flag column equals 1.
    Set,
    /// Free-text cell contains the needle (case-insensitive).
    Contains(String),
}

/// Models whose answer in `column` satisfies the matcher, in file order.
pub fn find_models(table: &SurveyTable, column: &str, matcher: &Matcher) -> Vec<String> {
    table
        .rows()
        .filter(|row| match matcher {
            Matcher::Set => row.flag(column),
            Matcher::Contains(needle) => row
                .text(column)
                .is_some_and(|text| text.to_lowercase().contains(&needle.to_lowercase())),
        })
        .map(|row| row.model().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{read_survey, SurveyTable};

    fn sample() -> SurveyTable {
        let data = "\
Model / framework;EV/pos;EV/def;Modeling language;other spatial scope
EMMA;1;;GAMS;
oemof;1;1;Python;
PyPSA;;1;python, C;urban districts
";
        read_survey(data.as_bytes()).unwrap()
    }

    #[test]
    fn test_column_totals_flags_and_text() {
        let table = sample();
        let columns = vec![
            "EV/pos".to_string(),
            "EV/def".to_string(),
            "other spatial scope".to_string(),
        ];
        let totals = column_totals(&table, &columns);
        assert_eq!(
            totals,
            vec![
                ("EV/pos".to_string(), 2),
                ("EV/def".to_string(), 2),
                ("other spatial scope".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_column_span() {
        let table = sample();
        let span = column_span(&table, "EV/def", "other spatial scope").unwrap();
        assert_eq!(span, vec!["EV/def", "Modeling language", "other spatial scope"]);
        assert!(column_span(&table, "other spatial scope", "EV/pos").is_none());
        assert!(column_span(&table, "nope", "EV/pos").is_none());
    }

    #[test]
    fn test_find_models_set() {
        let table = sample();
        assert_eq!(find_models(&table, "EV/def", &Matcher::Set), vec!["oemof", "PyPSA"]);
    }

    #[test]
    fn test_find_models_contains_case_insensitive() {
        let table = sample();
        let found = find_models(
            &table,
            "Modeling language",
            &Matcher::Contains("Python".to_string()),
        );
        assert_eq!(found, vec!["oemof", "PyPSA"]);
    }
}
