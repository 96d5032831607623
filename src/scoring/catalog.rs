use std::collections::{BTreeMap, HashMap};

use super::columns as col;
use super::error::ScoringError;
use super::rule::{Alternative, CriterionRule};
use super::special::SpecialScorer;

/// Reward for a technology that ships predefined.
pub const PREDEFINED_REWARD: f64 = 1.0;
/// Reward for a technology the user can add themselves.
pub const POSSIBLE_REWARD: f64 = 0.5;

/// Technology criteria and the survey item each one reads (`<item>/pos|def`).
const TECHNOLOGIES: &[(&str, &str)] = &[
    // Supply
    ("coal", "hard coal"),
    ("lignite", "lignite"),
    ("oil", "oil"),
    ("natural gas", "natural gas"),
    ("CCGT", "CCGT"),
    ("OCGT", "OCGT"),
    ("nuclear", "Nuclear"),
    ("bioenergy", "Bioenergy"),
    ("Hydro reservoir", "hydropower reservoir"),
    ("geothermal energy", "geothermal"),
    ("concentrated solar", "concentrated solar power"),
    ("photovoltaic", "photovoltaic"),
    ("wind onshore", "wind onshore"),
    ("wind offshore", "Wind-offshore"),
    ("river hydro", "Run-of-river hydro"),
    ("wave power", "wave power"),
    ("tidal power", "tidal power"),
    ("PEM-FC", "PEM-FC"),
    ("SOFC", "SOFC"),
    // Demand
    ("households", "households"),
    ("industrial load", "industrial load"),
    ("service sector", "service sector"),
    // Storage
    ("PHS", "PHS"),
    ("Batteries", "Batteries"),
    ("CAES", "CAES"),
    ("Caps", "Caps"),
    ("Flywheels", "Flywheels"),
    // Sector coupling
    ("CHP", "CHP"),
    ("P2G", "P2Gas"),
    ("P2H2", "P2H2"),
    ("HP", "HP"),
    ("EV", "EV"),
    ("Fuels", "Fuels (H2)"),
    ("Heat storage", "Heat storage"),
    ("V2G", "V2Grid"),
    // Network
    ("Distribution Grid", "Distribution Grid"),
    ("Transmission Grid", "Transmission Grid"),
    ("interconnectors", "interconnectors"),
    ("network extension", "network extension"),
    ("switches", "switches"),
    ("Smart Grid", "Smart Grid"),
    ("Microgrid", "Microgrid"),
];

/// Registry of criterion name -> scoring rule.
///
/// Immutable once built. Callers that want a different rubric layer their
/// own rules on top with [`Catalog::with_overrides`].
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    rules: HashMap<String, CriterionRule>,
}

impl Catalog {
    /// Catalog holding exactly the given rules, no defaults.
    pub fn from_rules(rules: impl IntoIterator<Item = (String, CriterionRule)>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// New catalog where `overrides` win over the entries of `self`.
    pub fn with_overrides(&self, overrides: &BTreeMap<String, CriterionRule>) -> Self {
        let mut rules = self.rules.clone();
        for (name, rule) in overrides {
            rules.insert(name.clone(), rule.clone());
        }
        Self { rules }
    }

    pub fn get(&self, criterion: &str) -> Option<&CriterionRule> {
        self.rules.get(criterion)
    }

    /// Look up a criterion referenced by `group`.
    pub fn resolve(&self, group: &str, criterion: &str) -> Result<&CriterionRule, ScoringError> {
        self.get(criterion)
            .ok_or_else(|| ScoringError::MissingCriterion {
                group: group.to_string(),
                criterion: criterion.to_string(),
            })
    }

    pub fn contains(&self, criterion: &str) -> bool {
        self.rules.contains_key(criterion)
    }

    /// Criterion names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for Catalog {
    /// The survey's built-in evaluation rubric.
    fn default() -> Self {
        let mut rules: HashMap<String, CriterionRule> = TECHNOLOGIES
            .iter()
            .map(|(name, item)| {
                (
                    name.to_string(),
                    CriterionRule::technology(item, PREDEFINED_REWARD, POSSIBLE_REWARD),
                )
            })
            .collect();

        let mut add = |name: &str, rule: CriterionRule| {
            rules.insert(name.to_string(), rule);
        };

        // Operational attributes shared by all domains
        add(
            "efficiency",
            CriterionRule::Alternatives(vec![
                Alternative::new(col::EFFICIENCY_FUNCTION, 1.0),
                Alternative::new(col::EFFICIENCY_FIXED, 0.5),
            ]),
        );
        add("ramping", CriterionRule::flag(col::RAMPING));
        add("response time", CriterionRule::flag(col::RESPONSE_TIME));
        add("recovery time", CriterionRule::flag(col::RECOVERY_TIME));

        // Supply
        add("minimum load", CriterionRule::flag(col::MINIMUM_LOAD));
        add(
            "discrete capacity expansion",
            CriterionRule::flag(col::DISCRETE_EXPANSION),
        );
        add(
            "curtailed operation",
            CriterionRule::flag(col::CURTAILED_OPERATION),
        );

        // Demand
        add(
            "maximum deferrable load",
            CriterionRule::Alternatives(vec![
                Alternative::new(col::MDL_TIME_AND_TYPE, 1.0),
                Alternative::new(col::MDL_TYPE, 2.0 / 3.0),
                Alternative::new(col::MDL_TIME, 2.0 / 3.0),
                Alternative::new(col::MDL_FIXED, 1.0 / 3.0),
            ]),
        );
        add("shifting time", CriterionRule::flag(col::SHIFTING_TIME));
        add("price elasticity", CriterionRule::flag(col::PRICE_ELASTICITY));

        // Storage
        add(
            "storage implementation",
            CriterionRule::Alternatives(vec![
                Alternative::new(col::STORAGE_DYNAMIC, 1.0),
                Alternative::new(col::STORAGE_FIXED, 0.5),
            ]),
        );
        add(
            "aging",
            CriterionRule::uniform(&[col::CYCLE_AGING, col::CALENDRICAL_AGING]),
        );
        add("self discharge", CriterionRule::flag(col::SELF_DISCHARGE));

        // Sector coupling
        add("Heat", CriterionRule::Special(SpecialScorer::HeatDisaggregation));
        add(
            "Transport",
            CriterionRule::Special(SpecialScorer::TransportDisaggregation),
        );
        add(
            "sector coupling supply",
            CriterionRule::Special(SpecialScorer::SectorCouplingSupply),
        );
        add(
            "sector coupling demand",
            CriterionRule::Special(SpecialScorer::SectorCouplingDemand),
        );
        add(
            "sector coupling storage",
            CriterionRule::Special(SpecialScorer::SectorCouplingStorage),
        );

        // Network
        add(
            "Grid representation",
            CriterionRule::Special(SpecialScorer::GridRepresentationMaturity),
        );
        add(
            "import",
            CriterionRule::Alternatives(vec![
                Alternative::new(col::IMPORT_FLOW_BASED, 1.0),
                Alternative::new(col::IMPORT_SIMPLIFIED, 0.5),
            ]),
        );
        add(
            "grid ancillary services",
            CriterionRule::uniform(&col::ANCILLARY_SERVICES),
        );

        // General scope
        add(
            "Decision making",
            CriterionRule::Special(SpecialScorer::DecisionMakingMaturity),
        );
        add("probability", CriterionRule::flag(col::PROBABILISTIC));
        add("social factors", CriterionRule::flag(col::SOCIAL));
        add("geographic scope", CriterionRule::uniform(&col::GEOGRAPHIC_SCOPE));
        add("temporal scope", CriterionRule::uniform(&col::TEMPORAL_SCOPE));
        add(
            "temporal resolution",
            CriterionRule::uniform(&col::TEMPORAL_RESOLUTION),
        );

        Self { rules }
    }
}
