pub mod catalog;
pub mod columns;
pub mod config;
pub mod coverage;
pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod group;
pub mod rule;
pub mod score_table;
pub mod special;
pub mod validation;

pub use catalog::{Catalog, POSSIBLE_REWARD, PREDEFINED_REWARD};
pub use config::{Domain, Rubric, DEFAULT_THRESHOLD};
pub use coverage::{coverage, Coverage, TechnologyGroup};
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
pub use engine::{score_all, score_groups, Evaluation};
pub use error::ScoringError;
pub use group::CriterionGroup;
pub use rule::{Alternative, CriterionRule};
pub use score_table::{CoverageTable, ScoreTable, WeightedScoreTable};
pub use special::{Sector, SpecialScorer};
pub use validation::validate_rubric;
