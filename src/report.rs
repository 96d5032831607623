use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::scoring::{
    diagnostic::dedup, score_groups, Catalog, Diagnostic, Rubric, ScoreTable, ScoringError,
    WeightedScoreTable,
};
use crate::survey::SurveyTable;

/// Scores of one domain for every requested model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainReport {
    pub name: String,
    pub overview: WeightedScoreTable,
    pub details: WeightedScoreTable,
}

impl DomainReport {
    /// Overall rating: mean of the overview group scores.
    pub fn rating(&self, model: &str) -> Option<f64> {
        self.overview.mean(model)
    }

    pub fn ranking(&self) -> Vec<Ranked> {
        rank(
            self.overview
                .models()
                .filter_map(|m| self.rating(m).map(|r| (m.to_string(), r))),
        )
    }
}

/// Every domain of a rubric scored against the survey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub domains: Vec<DomainReport>,
    pub diagnostics: Vec<Diagnostic>,
}

/// One line of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub model: String,
    pub rating: f64,
}

/// Sort by rating, highest first. Equal ratings fall back to the model name.
pub fn rank(ratings: impl IntoIterator<Item = (String, f64)>) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = ratings
        .into_iter()
        .map(|(model, rating)| Ranked { model, rating })
        .collect();
    ranked.sort_by(|a, b| match b.rating.total_cmp(&a.rating) {
        Ordering::Equal => a.model.cmp(&b.model),
        other => other,
    });
    ranked
}

/// Entries rated strictly above `threshold`, ranking order kept.
pub fn above_threshold(ranking: &[Ranked], threshold: f64) -> Vec<Ranked> {
    ranking
        .iter()
        .filter(|r| r.rating > threshold)
        .cloned()
        .collect()
}

/// Score every domain of `rubric` for `models`.
///
/// Diagnostics from all domains are merged, reported once per model and
/// criterion, and ordered by the position of the model in `models`.
pub fn build_report(
    rubric: &Rubric,
    catalog: &Catalog,
    table: &SurveyTable,
    models: &[String],
) -> Result<Report, ScoringError> {
    let mut domains = Vec::with_capacity(rubric.domains.len());
    let mut diagnostics = Vec::new();

    for domain in &rubric.domains {
        let overview = score_groups(models, &domain.overview, catalog, table)?;
        let details = score_groups(models, &domain.details, catalog, table)?;
        diagnostics.extend(overview.diagnostics);
        diagnostics.extend(details.diagnostics);
        domains.push(DomainReport {
            name: domain.name.clone(),
            overview: overview.scores,
            details: details.scores,
        });
    }

    let position: HashMap<&str, usize> = models
        .iter()
        .enumerate()
        .map(|(i, m)| (m.as_str(), i))
        .collect();
    let mut diagnostics = dedup(diagnostics);
    diagnostics.sort_by_key(|d| position.get(d.model.as_str()).copied().unwrap_or(usize::MAX));

    Ok(Report {
        domains,
        diagnostics,
    })
}

impl Report {
    pub fn domain(&self, name: &str) -> Option<&DomainReport> {
        self.domains
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Domain ratings side by side, one column per domain.
    pub fn holistic(&self) -> ScoreTable {
        let mut table = ScoreTable::new(self.domains.iter().map(|d| d.name.clone()).collect());
        for domain in &self.domains {
            for model in domain.overview.models() {
                if let Some(rating) = domain.rating(model) {
                    table.insert(model, &domain.name, rating);
                }
            }
        }
        table
    }

    /// Models ranked by the mean of their domain ratings.
    pub fn holistic_ranking(&self) -> Vec<Ranked> {
        let holistic = self.holistic();
        rank(
            holistic
                .models()
                .filter_map(|m| holistic.mean(m).map(|r| (m.to_string(), r))),
        )
    }

    /// Per domain, the models whose rating exceeds `threshold`.
    pub fn high_representation(&self, threshold: f64) -> Vec<(String, Vec<Ranked>)> {
        self.domains
            .iter()
            .map(|d| (d.name.clone(), above_threshold(&d.ranking(), threshold)))
            .collect()
    }
}
