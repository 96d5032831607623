use serde::{Deserialize, Serialize};

use super::diagnostic::DiagnosticSink;
use super::special::SpecialScorer;
use crate::survey::ModelRow;

/// One `(column, reward)` option of an alternatives rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Alternative {
    pub column: String,
    pub reward: f64,
}

impl Alternative {
    pub fn new(column: impl Into<String>, reward: f64) -> Self {
        Self {
            column: column.into(),
            reward,
        }
    }
}

/// How a criterion turns survey answers into a score in `[0, 1]`.
///
/// Example YAML:
/// ```yaml
/// photovoltaic:
///   alternatives:
///     - { column: "photovoltaic/def", reward: 1.0 }
///     - { column: "photovoltaic/pos", reward: 0.5 }
/// aging:
///   uniform: ["cycle aging", "calendrical aging"]
/// Heat:
///   special: heat_disaggregation
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionRule {
    /// Reward of the first listed column that is set; 0 if none is.
    /// Order matters: list the most valuable answer first.
    Alternatives(Vec<Alternative>),
    /// Share of listed columns that are set.
    Uniform(Vec<String>),
    Special(SpecialScorer),
}

impl CriterionRule {
    pub fn score(&self, row: &ModelRow<'_>, sink: &mut DiagnosticSink<'_>) -> f64 {
        match self {
            CriterionRule::Alternatives(options) => options
                .iter()
                .find(|alt| row.flag(&alt.column))
                .map_or(0.0, |alt| alt.reward),
            CriterionRule::Uniform(columns) => {
                if columns.is_empty() {
                    return 0.0;
                }
                let set = columns.iter().filter(|c| row.flag(c)).count();
                set as f64 / columns.len() as f64
            }
            CriterionRule::Special(scorer) => scorer.score(row, sink),
        }
    }

    /// Every survey column the rule reads.
    pub fn columns(&self) -> Vec<String> {
        match self {
            CriterionRule::Alternatives(options) => {
                options.iter().map(|alt| alt.column.clone()).collect()
            }
            CriterionRule::Uniform(columns) => columns.clone(),
            CriterionRule::Special(scorer) => scorer.columns(),
        }
    }

    /// Rules that read nothing cannot score anything.
    pub fn is_empty(&self) -> bool {
        match self {
            CriterionRule::Alternatives(options) => options.is_empty(),
            CriterionRule::Uniform(columns) => columns.is_empty(),
            CriterionRule::Special(_) => false,
        }
    }

    /// Shorthand for the common "predefined beats possible" technology rule.
    pub fn technology(tech: &str, predefined: f64, possible: f64) -> Self {
        CriterionRule::Alternatives(vec![
            Alternative::new(format!("{}/def", tech), predefined),
            Alternative::new(format!("{}/pos", tech), possible),
        ])
    }

    pub fn flag(column: &str) -> Self {
        CriterionRule::Alternatives(vec![Alternative::new(column, 1.0)])
    }

    pub fn uniform(columns: &[&str]) -> Self {
        CriterionRule::Uniform(columns.iter().map(|c| c.to_string()).collect())
    }
}
