use rayon::prelude::*;

use super::catalog::Catalog;
use super::diagnostic::{dedup, Diagnostic, DiagnosticSink};
use super::error::ScoringError;
use super::group::CriterionGroup;
use super::rule::CriterionRule;
use super::score_table::WeightedScoreTable;
use crate::survey::{ModelRow, SurveyTable};

/// Result of one aggregation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub scores: WeightedScoreTable,
    /// Non-fatal findings, at most one per (model, criterion, message).
    pub diagnostics: Vec<Diagnostic>,
}

/// A group whose criteria have all been resolved against the catalog.
#[derive(Debug)]
struct ResolvedGroup<'a> {
    name: &'a str,
    criteria: Vec<(&'a str, &'a CriterionRule, f64)>,
    total_weight: f64,
}

impl ResolvedGroup<'_> {
    /// Weighted mean of the criterion scores for one model.
    fn score(&self, row: &ModelRow<'_>, diagnostics: &mut Vec<Diagnostic>) -> f64 {
        let mut weighted_sum = 0.0;
        for (criterion, rule, weight) in &self.criteria {
            let mut sink = DiagnosticSink::new(row.model(), criterion, diagnostics);
            weighted_sum += weight * rule.score(row, &mut sink);
        }
        weighted_sum / self.total_weight
    }
}

/// Resolve every criterion of every group and check that the table has all
/// columns the resolved rules read. Nothing is scored until this passes.
fn resolve<'a>(
    groups: &'a [CriterionGroup],
    catalog: &'a Catalog,
    table: &SurveyTable,
) -> Result<Vec<ResolvedGroup<'a>>, ScoringError> {
    let mut resolved = Vec::with_capacity(groups.len());
    for group in groups {
        let mut criteria = Vec::with_capacity(group.criteria.len());
        for (criterion, weight) in &group.criteria {
            let rule = catalog.resolve(&group.name, criterion)?;
            if rule.is_empty() {
                return Err(ScoringError::EmptyRule(criterion.clone()));
            }
            if let Some(column) = rule.columns().into_iter().find(|c| !table.has_column(c)) {
                return Err(ScoringError::MissingColumn {
                    criterion: criterion.clone(),
                    column,
                });
            }
            criteria.push((criterion.as_str(), rule, *weight));
        }
        let total_weight = group.check_weights()?;
        resolved.push(ResolvedGroup {
            name: &group.name,
            criteria,
            total_weight,
        });
    }
    Ok(resolved)
}

/// Score each model against each group.
///
/// Every group score is the weighted mean of its criterion scores, so it
/// stays in `[0, 1]`. Configuration errors abort before any model is scored;
/// unanswered or odd survey answers only produce diagnostics.
pub fn score_groups(
    models: &[String],
    groups: &[CriterionGroup],
    catalog: &Catalog,
    table: &SurveyTable,
) -> Result<Evaluation, ScoringError> {
    let resolved = resolve(groups, catalog, table)?;

    let rows = models
        .iter()
        .map(|model| {
            table
                .row(model)
                .ok_or_else(|| ScoringError::UnknownModel(model.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Models are independent; each cell is computed sequentially inside its
    // worker so results do not depend on scheduling.
    let per_model: Vec<(Vec<f64>, Vec<Diagnostic>)> = rows
        .par_iter()
        .map(|row| {
            let mut diagnostics = Vec::new();
            let scores = resolved
                .iter()
                .map(|group| group.score(row, &mut diagnostics))
                .collect();
            (scores, diagnostics)
        })
        .collect();

    let mut scores = WeightedScoreTable::new(groups.iter().map(|g| g.name.clone()).collect());
    let mut diagnostics = Vec::new();
    for (row, (values, diags)) in rows.iter().zip(per_model) {
        for (group, value) in resolved.iter().zip(values) {
            scores.insert(row.model(), group.name, value);
        }
        diagnostics.extend(diags);
    }

    Ok(Evaluation {
        scores,
        diagnostics: dedup(diagnostics),
    })
}

/// [`score_groups`] over every model in the table.
pub fn score_all(
    groups: &[CriterionGroup],
    catalog: &Catalog,
    table: &SurveyTable,
) -> Result<Evaluation, ScoringError> {
    score_groups(table.models(), groups, catalog, table)
}
