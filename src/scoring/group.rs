use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ScoringError;

/// A named bundle of weighted criteria that is scored into one number.
///
/// Example YAML:
/// ```yaml
/// name: Operations
/// criteria:
///   efficiency: 1
///   ramping: 1
///   response time: 1
///   recovery time: 1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriterionGroup {
    pub name: String,
    /// Criterion name -> weight.
    pub criteria: BTreeMap<String, f64>,
}

impl CriterionGroup {
    pub fn new(name: impl Into<String>, criteria: &[(&str, f64)]) -> Self {
        Self {
            name: name.into(),
            criteria: criteria
                .iter()
                .map(|(criterion, weight)| (criterion.to_string(), *weight))
                .collect(),
        }
    }

    /// Same weight for every criterion.
    pub fn equal(name: impl Into<String>, criteria: &[&str]) -> Self {
        Self {
            name: name.into(),
            criteria: criteria.iter().map(|c| (c.to_string(), 1.0)).collect(),
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.criteria.values().sum()
    }

    /// Weights must be finite and non-negative, and add up to more than zero.
    pub fn check_weights(&self) -> Result<f64, ScoringError> {
        let invalid = |reason: String| ScoringError::InvalidWeighting {
            group: self.name.clone(),
            reason,
        };

        if self.criteria.is_empty() {
            return Err(invalid("no criteria".to_string()));
        }
        for (criterion, weight) in &self.criteria {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(invalid(format!(
                    "weight {} of '{}' must be a non-negative number",
                    weight, criterion
                )));
            }
        }
        let total = self.total_weight();
        if total <= 0.0 {
            return Err(invalid("weights add up to zero".to_string()));
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_weight() {
        let group = CriterionGroup::new("Solar", &[("concentrated solar", 1.0), ("photovoltaic", 2.0)]);
        assert_eq!(group.total_weight(), 3.0);
        assert_eq!(group.check_weights(), Ok(3.0));
    }

    #[test]
    fn test_empty_group_invalid() {
        let group = CriterionGroup::new("Empty", &[]);
        assert!(matches!(
            group.check_weights(),
            Err(ScoringError::InvalidWeighting { .. })
        ));
    }

    #[test]
    fn test_all_zero_weights_invalid() {
        let group = CriterionGroup::new("Zero", &[("a", 0.0), ("b", 0.0)]);
        let err = group.check_weights().unwrap_err();
        assert!(err.to_string().contains("add up to zero"));
    }

    #[test]
    fn test_negative_weight_invalid() {
        let group = CriterionGroup::new("Neg", &[("a", 2.0), ("b", -1.0)]);
        assert!(group.check_weights().is_err());
    }

    #[test]
    fn test_group_yaml() {
        let yaml = r#"
name: Operations
criteria:
  efficiency: 1
  ramping: 2.5
"#;
        let group: CriterionGroup = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(group.name, "Operations");
        assert_eq!(group.criteria["ramping"], 2.5);
        assert_eq!(group.total_weight(), 3.5);
    }
}
