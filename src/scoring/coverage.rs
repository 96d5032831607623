use serde::{Deserialize, Serialize};

use super::columns as col;
use super::error::ScoringError;
use super::score_table::CoverageTable;
use crate::survey::{ModelRow, SurveyTable};

/// Named list of technologies checked together, e.g. all storage types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TechnologyGroup {
    pub name: String,
    /// Survey item names; each is read as `<name>/pos` and `<name>/def`.
    pub technologies: Vec<String>,
}

impl TechnologyGroup {
    pub fn new(name: impl Into<String>, technologies: &[&str]) -> Self {
        Self {
            name: name.into(),
            technologies: technologies.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Share of listed technologies each model covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coverage {
    /// Representable through user configuration.
    pub possible: CoverageTable,
    /// Shipped ready to use.
    pub predefined: CoverageTable,
}

fn fraction(row: &ModelRow<'_>, columns: &[String]) -> f64 {
    let set = columns.iter().filter(|c| row.flag(c)).count();
    set as f64 / columns.len() as f64
}

/// Compute possible and predefined coverage for every model in the table.
///
/// The two fractions are independent: a technology marked predefined but not
/// possible counts only towards `predefined`.
pub fn coverage(table: &SurveyTable, groups: &[TechnologyGroup]) -> Result<Coverage, ScoringError> {
    let mut plan = Vec::with_capacity(groups.len());
    for group in groups {
        if group.technologies.is_empty() {
            return Err(ScoringError::EmptyRule(group.name.clone()));
        }
        let possible: Vec<String> = group.technologies.iter().map(|t| col::possible(t)).collect();
        let predefined: Vec<String> = group
            .technologies
            .iter()
            .map(|t| col::predefined(t))
            .collect();
        if let Some(column) = possible
            .iter()
            .chain(predefined.iter())
            .find(|c| !table.has_column(c))
        {
            return Err(ScoringError::MissingColumn {
                criterion: group.name.clone(),
                column: column.clone(),
            });
        }
        plan.push((group.name.as_str(), possible, predefined));
    }

    let names: Vec<String> = groups.iter().map(|g| g.name.clone()).collect();
    let mut result = Coverage {
        possible: CoverageTable::new(names.clone()),
        predefined: CoverageTable::new(names),
    };
    for row in table.rows() {
        for (name, possible, predefined) in &plan {
            result.possible.insert(row.model(), name, fraction(&row, possible));
            result
                .predefined
                .insert(row.model(), name, fraction(&row, predefined));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_table() -> SurveyTable {
        SurveyTable::from_values(
            &[
                "PHS/pos",
                "PHS/def",
                "Batteries/pos",
                "Batteries/def",
                "CAES/pos",
                "CAES/def",
                "Flywheels/pos",
                "Flywheels/def",
            ],
            &[
                ("half", &[1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0]),
                ("full", &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
                ("none", &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            ],
        )
        .unwrap()
    }

    fn storage_group() -> TechnologyGroup {
        TechnologyGroup::new("Storage", &["PHS", "Batteries", "CAES", "Flywheels"])
    }

    #[test]
    fn test_possible_ignores_predefined() {
        let result = coverage(&storage_table(), &[storage_group()]).unwrap();
        assert_eq!(result.possible.get("half", "Storage"), Some(0.5));
        assert_eq!(result.predefined.get("half", "Storage"), Some(0.5));
        assert_eq!(result.possible.get("full", "Storage"), Some(1.0));
        assert_eq!(result.predefined.get("none", "Storage"), Some(0.0));
    }

    #[test]
    fn test_multiple_groups() {
        let groups = vec![
            TechnologyGroup::new("Mechanical", &["PHS", "CAES", "Flywheels"]),
            TechnologyGroup::new("Electrochemical", &["Batteries"]),
        ];
        let result = coverage(&storage_table(), &groups).unwrap();
        assert_eq!(result.possible.columns(), &["Mechanical", "Electrochemical"]);
        assert_eq!(result.possible.get("half", "Mechanical"), Some(2.0 / 3.0));
        assert_eq!(result.possible.get("half", "Electrochemical"), Some(0.0));
        assert_eq!(result.predefined.get("half", "Electrochemical"), Some(1.0));
    }

    #[test]
    fn test_empty_group_fails() {
        let err = coverage(&storage_table(), &[TechnologyGroup::new("Nothing", &[])]).unwrap_err();
        assert_eq!(err, ScoringError::EmptyRule("Nothing".to_string()));
    }

    #[test]
    fn test_missing_column_fails() {
        let groups = vec![TechnologyGroup::new("Storage", &["PHS", "Caps"])];
        let err = coverage(&storage_table(), &groups).unwrap_err();
        assert_eq!(
            err,
            ScoringError::MissingColumn {
                criterion: "Storage".to_string(),
                column: "Caps/pos".to_string(),
            }
        );
    }
}
