use std::collections::HashSet;

use super::catalog::Catalog;
use super::config::Rubric;
use super::group::CriterionGroup;
use super::rule::CriterionRule;

fn validate_group(path: &str, group: &CriterionGroup, catalog: &Catalog, errors: &mut Vec<String>) {
    if let Err(e) = group.check_weights() {
        errors.push(format!("{}: {}", path, e));
    }
    for criterion in group.criteria.keys() {
        match catalog.get(criterion) {
            None => errors.push(format!(
                "{}.criteria.{}: not registered in the catalog",
                path, criterion
            )),
            Some(rule) if rule.is_empty() => errors.push(format!(
                "{}.criteria.{}: rule lists no survey columns",
                path, criterion
            )),
            Some(_) => {}
        }
    }
}

fn validate_rule(name: &str, rule: &CriterionRule, errors: &mut Vec<String>) {
    match rule {
        CriterionRule::Alternatives(options) => {
            if options.is_empty() {
                errors.push(format!("catalog.{}: alternatives must not be empty", name));
            }
            let mut seen = HashSet::new();
            for (i, alt) in options.iter().enumerate() {
                if !alt.reward.is_finite() || !(0.0..=1.0).contains(&alt.reward) {
                    errors.push(format!(
                        "catalog.{}.alternatives[{}].reward: {} must be between 0 and 1",
                        name, i, alt.reward
                    ));
                }
                if !seen.insert(alt.column.as_str()) {
                    errors.push(format!(
                        "catalog.{}.alternatives[{}].column: '{}' listed twice",
                        name, i, alt.column
                    ));
                }
            }
        }
        CriterionRule::Uniform(columns) => {
            if columns.is_empty() {
                errors.push(format!("catalog.{}: uniform must list at least one column", name));
            }
        }
        CriterionRule::Special(_) => {}
    }
}

/// Validate a rubric at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_rubric(rubric: &Rubric) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (name, rule) in &rubric.catalog {
        validate_rule(name, rule, &mut errors);
    }

    if let Some(threshold) = rubric.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            errors.push(format!("rubric.threshold: {} must be between 0 and 1", threshold));
        }
    }

    let catalog = rubric.catalog();

    if rubric.domains.is_empty() {
        errors.push("rubric.domains: at least one domain is required".to_string());
    }
    let mut domain_names = HashSet::new();
    for (d, domain) in rubric.domains.iter().enumerate() {
        if !domain_names.insert(domain.name.to_lowercase()) {
            errors.push(format!("rubric.domains[{}]: duplicate domain '{}'", d, domain.name));
        }
        if domain.overview.is_empty() {
            errors.push(format!(
                "rubric.domains[{}].overview: '{}' needs at least one group",
                d, domain.name
            ));
        }
        for (section, groups) in [("overview", &domain.overview), ("details", &domain.details)] {
            let mut group_names = HashSet::new();
            for (g, group) in groups.iter().enumerate() {
                let path = format!("rubric.domains[{}].{}[{}]", d, section, g);
                if !group_names.insert(group.name.as_str()) {
                    errors.push(format!("{}: duplicate group '{}'", path, group.name));
                }
                validate_group(&path, group, &catalog, &mut errors);
            }
        }
    }

    let mut tech_names = HashSet::new();
    for (i, tech) in rubric.technologies.iter().enumerate() {
        if tech.technologies.is_empty() {
            errors.push(format!(
                "rubric.technologies[{}]: '{}' lists no technologies",
                i, tech.name
            ));
        }
        if !tech_names.insert(tech.name.as_str()) {
            errors.push(format!(
                "rubric.technologies[{}]: duplicate group '{}'",
                i, tech.name
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
