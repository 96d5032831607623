use serde::{Deserialize, Serialize};

use super::columns as col;
use super::diagnostic::DiagnosticSink;
use crate::survey::ModelRow;

const THIRD: f64 = 1.0 / 3.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;
const SIXTH: f64 = 1.0 / 6.0;

/// Grid representation levels, highest first. Each entry lists the features
/// that must all be present as `[AC, DC, interconnector, transfer capacity]`.
/// The sets overlap, so the first match wins.
const GRID_LEVELS: [([bool; 4], f64); 9] = [
    ([true, true, true, true], 1.0),
    ([true, true, true, false], 0.86),
    ([true, true, false, true], 0.71),
    ([true, true, false, false], 0.57),
    ([true, false, false, true], 0.43),
    ([false, true, false, true], 0.43),
    ([true, false, false, false], 0.28),
    ([false, true, false, false], 0.28),
    ([false, false, false, true], 0.14),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    Heat,
    Transport,
}

impl Sector {
    pub fn name(self) -> &'static str {
        match self {
            Sector::Heat => "heat",
            Sector::Transport => "transport",
        }
    }
}

/// Scoring functions that combine several survey answers non-linearly.
///
/// Resolved once when the catalog is built (or a rubric file is parsed), so
/// scoring never dispatches on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialScorer {
    HeatDisaggregation,
    TransportDisaggregation,
    SectorCouplingSupply,
    SectorCouplingStorage,
    SectorCouplingDemand,
    DeferrableLoadMaturity,
    DecisionMakingMaturity,
    GridRepresentationMaturity,
}

impl SpecialScorer {
    pub fn score(self, row: &ModelRow<'_>, sink: &mut DiagnosticSink<'_>) -> f64 {
        match self {
            SpecialScorer::HeatDisaggregation => sector_disaggregation(row, Sector::Heat, sink),
            SpecialScorer::TransportDisaggregation => {
                sector_disaggregation(row, Sector::Transport, sink)
            }
            SpecialScorer::SectorCouplingSupply => sector_coupling_supply(row),
            SpecialScorer::SectorCouplingStorage => sector_coupling_storage(row),
            SpecialScorer::SectorCouplingDemand => sector_coupling_demand(row, sink),
            SpecialScorer::DeferrableLoadMaturity => deferrable_load_maturity(row, sink),
            SpecialScorer::DecisionMakingMaturity => decision_making_maturity(row, sink),
            SpecialScorer::GridRepresentationMaturity => grid_representation_maturity(row, sink),
        }
    }

    /// Every survey column the scorer reads.
    pub fn columns(self) -> Vec<String> {
        fn owned(cols: &[&str]) -> Vec<String> {
            cols.iter().map(|c| c.to_string()).collect()
        }
        fn sector(s: Sector) -> Vec<String> {
            let s = s.name();
            vec![
                col::end_disaggregated_tech(s),
                col::end_disaggregated_demand(s),
                col::exo_aggregated_demand(s),
                col::sector_excluded(s),
                col::other_representation(s),
            ]
        }
        let deferrable = [
            col::MDL_TIME_AND_TYPE,
            col::MDL_TYPE,
            col::MDL_TIME,
            col::MDL_FIXED,
            col::MDL_NONE,
        ];

        match self {
            SpecialScorer::HeatDisaggregation => sector(Sector::Heat),
            SpecialScorer::TransportDisaggregation => sector(Sector::Transport),
            SpecialScorer::SectorCouplingSupply => {
                let mut cols = owned(&col::CHP);
                cols.extend(owned(&[col::MINIMUM_LOAD, col::DISCRETE_EXPANSION]));
                cols
            }
            SpecialScorer::SectorCouplingStorage => {
                let mut cols = owned(&col::SECTOR_COUPLING_STORAGE);
                cols.extend(owned(&[
                    col::SELF_DISCHARGE,
                    col::CYCLE_AGING,
                    col::CALENDRICAL_AGING,
                    col::STORAGE_DYNAMIC,
                    col::STORAGE_FIXED,
                ]));
                cols
            }
            SpecialScorer::SectorCouplingDemand => {
                let mut cols = owned(&col::SECTOR_COUPLING_DEMAND);
                cols.extend(owned(&[col::SHIFTING_TIME, col::PRICE_ELASTICITY]));
                cols.extend(owned(&deferrable));
                cols
            }
            SpecialScorer::DeferrableLoadMaturity => owned(&deferrable),
            SpecialScorer::DecisionMakingMaturity => owned(&[
                col::PERFECT_FORESIGHT,
                col::ROLLING_HORIZON,
                col::AGENT_BASED,
                col::OTHER_DECISION_MAKING,
                col::NO_DECISION_MAKING,
            ]),
            SpecialScorer::GridRepresentationMaturity => {
                let mut cols = owned(&[col::AC_POWER_FLOW, col::DC_POWER_FLOW]);
                cols.extend(owned(&col::INTERCONNECTORS));
                cols.extend(owned(&[col::TRANSFER_CAPACITY, col::NO_GRID]));
                cols
            }
        }
    }
}

/// How far the heat or transport sector is broken down.
pub fn sector_disaggregation(
    row: &ModelRow<'_>,
    sector: Sector,
    sink: &mut DiagnosticSink<'_>,
) -> f64 {
    let s = sector.name();
    let tech = row.flag(&col::end_disaggregated_tech(s));
    let demand = row.flag(&col::end_disaggregated_demand(s));
    let exogenous = row.flag(&col::exo_aggregated_demand(s));
    let excluded = row.flag(&col::sector_excluded(s));

    if row.is_answered(&col::other_representation(s)) {
        sink.suspicious(format!("other {} representation given, check manually", s));
    }

    if tech && demand {
        1.0
    } else if tech || demand {
        TWO_THIRDS
    } else if exogenous {
        THIRD
    } else if excluded {
        0.0
    } else {
        sink.unspecified(format!("{} representation not specified", s));
        0.0
    }
}

pub fn sector_coupling_supply(row: &ModelRow<'_>) -> f64 {
    if !row.any_flag(&col::CHP) {
        return 0.0;
    }
    let mut score = 0.0;
    if row.flag(col::MINIMUM_LOAD) {
        score += 0.5;
    }
    if row.flag(col::DISCRETE_EXPANSION) {
        score += 0.5;
    }
    score
}

pub fn sector_coupling_storage(row: &ModelRow<'_>) -> f64 {
    if !row.any_flag(&col::SECTOR_COUPLING_STORAGE) {
        return 0.0;
    }
    let mut score = 0.0;
    if row.flag(col::SELF_DISCHARGE) {
        score += THIRD;
    }
    if row.flag(col::CYCLE_AGING) {
        score += SIXTH;
    }
    if row.flag(col::CALENDRICAL_AGING) {
        score += SIXTH;
    }
    if row.flag(col::STORAGE_DYNAMIC) {
        score += THIRD;
    } else if row.flag(col::STORAGE_FIXED) {
        score += SIXTH;
    }
    score
}

pub fn sector_coupling_demand(row: &ModelRow<'_>, sink: &mut DiagnosticSink<'_>) -> f64 {
    if !row.any_flag(&col::SECTOR_COUPLING_DEMAND) {
        return 0.0;
    }
    let mut score = 0.0;
    if row.flag(col::SHIFTING_TIME) {
        score += THIRD;
    }
    if row.flag(col::PRICE_ELASTICITY) {
        score += THIRD;
    }
    score + THIRD * deferrable_load_maturity(row, sink)
}

/// Maximum deferrable load: how the load that may be shifted is bounded.
pub fn deferrable_load_maturity(row: &ModelRow<'_>, sink: &mut DiagnosticSink<'_>) -> f64 {
    if row.flag(col::MDL_TIME_AND_TYPE) {
        1.0
    } else if row.flag(col::MDL_TYPE) {
        // Type-dependent without the combined answer is not rewarded.
        sink.suspicious("maximum deferrable load type-dependent, please check");
        0.0
    } else if row.flag(col::MDL_TIME) {
        TWO_THIRDS
    } else if row.flag(col::MDL_FIXED) {
        THIRD
    } else if row.flag(col::MDL_NONE) {
        0.0
    } else {
        sink.unspecified("maximum deferrable load not specified");
        0.0
    }
}

pub fn decision_making_maturity(row: &ModelRow<'_>, sink: &mut DiagnosticSink<'_>) -> f64 {
    let perfect = row.flag(col::PERFECT_FORESIGHT);
    let rolling = row.flag(col::ROLLING_HORIZON);
    let agent = row.flag(col::AGENT_BASED);

    if perfect && rolling && agent {
        1.0
    } else if agent && rolling {
        0.8
    } else if perfect && (rolling || agent) {
        0.6
    } else if agent || rolling {
        0.4
    } else if perfect {
        0.2
    } else if row.flag(col::NO_DECISION_MAKING) || row.is_answered(col::OTHER_DECISION_MAKING) {
        0.0
    } else {
        sink.unspecified("decision making not specified");
        0.0
    }
}

pub fn grid_representation_maturity(row: &ModelRow<'_>, sink: &mut DiagnosticSink<'_>) -> f64 {
    let present = [
        row.flag(col::AC_POWER_FLOW),
        row.flag(col::DC_POWER_FLOW),
        row.any_flag(&col::INTERCONNECTORS),
        row.flag(col::TRANSFER_CAPACITY),
    ];

    let level = GRID_LEVELS.iter().find(|(required, _)| {
        required
            .iter()
            .zip(present.iter())
            .all(|(need, has)| !need || *has)
    });
    if let Some((_, score)) = level {
        return *score;
    }

    if !row.flag(col::NO_GRID) {
        sink.unspecified("grid representation not specified");
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::diagnostic::{Diagnostic, DiagnosticKind};
    use crate::survey::SurveyTable;

    const EPS: f64 = 1e-12;

    /// Single-model table with the given columns set to 1.
    fn table_with(set: &[&str]) -> SurveyTable {
        let values = vec![1.0; set.len()];
        SurveyTable::from_values(set, &[("model", values.as_slice())]).unwrap()
    }

    fn run(scorer: SpecialScorer, set: &[&str]) -> (f64, Vec<Diagnostic>) {
        let table = table_with(set);
        let row = table.row("model").unwrap();
        let mut out = Vec::new();
        let mut sink = DiagnosticSink::new("model", "criterion", &mut out);
        let score = scorer.score(&row, &mut sink);
        (score, out)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_heat_disaggregation_levels() {
        let s = SpecialScorer::HeatDisaggregation;
        assert_close(
            run(s, &["end disaggregated heat tech", "end disaggregated heat dem"]).0,
            1.0,
        );
        assert_close(run(s, &["end disaggregated heat tech"]).0, 2.0 / 3.0);
        assert_close(run(s, &["end disaggregated heat dem"]).0, 2.0 / 3.0);
        assert_close(run(s, &["exo aggregated heat dem"]).0, 1.0 / 3.0);

        let (score, diags) = run(s, &["heat sector excluded"]);
        assert_eq!(score, 0.0);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_transport_disaggregation_unspecified() {
        let (score, diags) = run(SpecialScorer::TransportDisaggregation, &[]);
        assert_eq!(score, 0.0);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnspecifiedAnswer);
        assert!(diags[0].message.contains("transport"));
    }

    #[test]
    fn test_other_sector_representation_flagged_without_changing_score() {
        let table = SurveyTable::new(
            vec![
                "end disaggregated heat dem".to_string(),
                "other heat representation".to_string(),
            ],
            vec![(
                "model".to_string(),
                vec![
                    crate::survey::Answer::Number(1.0),
                    crate::survey::Answer::Text("district heating grids".to_string()),
                ],
            )],
        )
        .unwrap();
        let row = table.row("model").unwrap();
        let mut out = Vec::new();
        let mut sink = DiagnosticSink::new("model", "Heat", &mut out);
        let score = sector_disaggregation(&row, Sector::Heat, &mut sink);
        assert_close(score, 2.0 / 3.0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, DiagnosticKind::SuspiciousAnswer);
    }

    #[test]
    fn test_sector_coupling_supply_requires_chp() {
        let s = SpecialScorer::SectorCouplingSupply;
        assert_eq!(run(s, &["minimum load yes", "discrete expansion yes"]).0, 0.0);
        assert_eq!(run(s, &["CHP/pos"]).0, 0.0);
        assert_eq!(run(s, &["CHP/def", "minimum load yes"]).0, 0.5);
        assert_eq!(
            run(s, &["CHP/pos", "minimum load yes", "discrete expansion yes"]).0,
            1.0
        );
    }

    #[test]
    fn test_sector_coupling_storage_self_discharge_and_dynamic() {
        let (score, diags) = run(
            SpecialScorer::SectorCouplingStorage,
            &["Fuels (H2)/pos", "self discharge yes", "dynamic"],
        );
        assert_close(score, 1.0 / 3.0 + 1.0 / 3.0);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_sector_coupling_storage_dynamic_beats_fixed() {
        let s = SpecialScorer::SectorCouplingStorage;
        assert_close(run(s, &["V2Grid/def", "dynamic", "fixed/static"]).0, 1.0 / 3.0);
        assert_close(run(s, &["Heat storage/pos", "fixed/static"]).0, 1.0 / 6.0);
        assert_close(
            run(
                s,
                &[
                    "Heat storage/def",
                    "self discharge yes",
                    "cycle aging",
                    "calendrical aging",
                    "dynamic",
                ],
            )
            .0,
            1.0,
        );
        assert_eq!(run(s, &["self discharge yes", "dynamic"]).0, 0.0);
    }

    #[test]
    fn test_sector_coupling_demand_includes_deferrable_load() {
        let s = SpecialScorer::SectorCouplingDemand;
        assert_close(
            run(
                s,
                &[
                    "EV/pos",
                    "shifting time yes",
                    "price elasticity yes",
                    "time- and type-dependent",
                ],
            )
            .0,
            1.0,
        );
        assert_close(
            run(s, &["HP/def", "shifting time yes", "Time-dependent"]).0,
            1.0 / 3.0 + 2.0 / 9.0,
        );
    }

    #[test]
    fn test_sector_coupling_demand_without_technology_skips_diagnostics() {
        let (score, diags) = run(SpecialScorer::SectorCouplingDemand, &["shifting time yes"]);
        assert_eq!(score, 0.0);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_deferrable_load_levels() {
        let s = SpecialScorer::DeferrableLoadMaturity;
        assert_eq!(run(s, &["time- and type-dependent", "Time-dependent"]).0, 1.0);
        assert_close(run(s, &["Time-dependent"]).0, 2.0 / 3.0);
        assert_close(run(s, &["max def load fixed value"]).0, 1.0 / 3.0);

        // Type-dependent is checked before time-dependent.
        let (score, diags) = run(s, &["Time-dependent", "Type-dependent"]);
        assert_eq!(score, 0.0);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::SuspiciousAnswer);

        let (score, diags) = run(s, &["no max def load"]);
        assert_eq!(score, 0.0);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_deferrable_load_type_only_is_suspicious() {
        let (score, diags) = run(
            SpecialScorer::DeferrableLoadMaturity,
            &["Type-dependent", "max def load fixed value"],
        );
        assert_eq!(score, 0.0);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::SuspiciousAnswer);
    }

    #[test]
    fn test_deferrable_load_unspecified() {
        let (score, diags) = run(SpecialScorer::DeferrableLoadMaturity, &[]);
        assert_eq!(score, 0.0);
        assert_eq!(diags[0].kind, DiagnosticKind::UnspecifiedAnswer);
    }

    #[test]
    fn test_decision_making_levels() {
        let s = SpecialScorer::DecisionMakingMaturity;
        let pf = "perfect foresight";
        let rh = "rolling horizon / myopic foresight";
        let ab = "decision-/agentbased";
        assert_eq!(run(s, &[pf, rh, ab]).0, 1.0);
        assert_eq!(run(s, &[ab, rh]).0, 0.8);
        assert_eq!(run(s, &[pf, rh]).0, 0.6);
        assert_eq!(run(s, &[pf, ab]).0, 0.6);
        assert_eq!(run(s, &[ab]).0, 0.4);
        assert_eq!(run(s, &[rh]).0, 0.4);
        assert_eq!(run(s, &[pf]).0, 0.2);
    }

    #[test]
    fn test_decision_making_none_and_unspecified() {
        let s = SpecialScorer::DecisionMakingMaturity;
        let (score, diags) = run(s, &["no decision making"]);
        assert_eq!(score, 0.0);
        assert!(diags.is_empty());

        let (score, diags) = run(s, &[]);
        assert_eq!(score, 0.0);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnspecifiedAnswer);
    }

    #[test]
    fn test_decision_making_free_text_other() {
        let table = SurveyTable::new(
            vec![
                "perfect foresight".to_string(),
                "other decision making".to_string(),
            ],
            vec![(
                "model".to_string(),
                vec![
                    crate::survey::Answer::Blank,
                    crate::survey::Answer::Text("stochastic programming".to_string()),
                ],
            )],
        )
        .unwrap();
        let row = table.row("model").unwrap();
        let mut out = Vec::new();
        let mut sink = DiagnosticSink::new("model", "Decision making", &mut out);
        let score = decision_making_maturity(&row, &mut sink);
        assert_eq!(score, 0.0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_grid_levels() {
        let s = SpecialScorer::GridRepresentationMaturity;
        let ac = "AC PF";
        let dc = "DC PF";
        let ic = "interconnectors/pos";
        let tc = "transfer capacity";
        assert_eq!(run(s, &[ac, dc, ic, tc]).0, 1.0);
        assert_eq!(run(s, &[ac, dc, ic]).0, 0.86);
        assert_eq!(run(s, &[ac, dc, tc]).0, 0.71);
        assert_eq!(run(s, &[ac, dc]).0, 0.57);
        assert_eq!(run(s, &[ac, tc]).0, 0.43);
        assert_eq!(run(s, &[dc, tc]).0, 0.43);
        assert_eq!(run(s, &[ac]).0, 0.28);
        assert_eq!(run(s, &[dc, ic]).0, 0.28);
        assert_eq!(run(s, &[tc]).0, 0.14);
        assert_eq!(run(s, &["interconnectors/def", tc]).0, 0.14);
    }

    #[test]
    fn test_grid_no_grid_is_silent() {
        let (score, diags) = run(SpecialScorer::GridRepresentationMaturity, &["no grid"]);
        assert_eq!(score, 0.0);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_grid_interconnector_only_unspecified() {
        let (score, diags) = run(
            SpecialScorer::GridRepresentationMaturity,
            &["interconnectors/pos"],
        );
        assert_eq!(score, 0.0);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_columns_cover_reads() {
        let cols = SpecialScorer::SectorCouplingDemand.columns();
        assert!(cols.contains(&"EV/def".to_string()));
        assert!(cols.contains(&"time- and type-dependent".to_string()));
        let cols = SpecialScorer::TransportDisaggregation.columns();
        assert!(cols.contains(&"transport sector excluded".to_string()));
        assert_eq!(cols.len(), 5);
    }

    #[test]
    fn test_serde_names() {
        let parsed: SpecialScorer =
            serde_saphyr::from_str("grid_representation_maturity").unwrap();
        assert_eq!(parsed, SpecialScorer::GridRepresentationMaturity);
    }
}
