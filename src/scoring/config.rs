use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::Catalog;
use super::coverage::TechnologyGroup;
use super::group::CriterionGroup;
use super::rule::CriterionRule;

/// Ratings above this count as high representation.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Evaluation rubric: which criteria are scored, how they are grouped and
/// weighted, and which technologies the coverage check looks at.
///
/// Every field falls back to the built-in rubric when omitted.
///
/// Example YAML:
/// ```yaml
/// threshold: 0.6
/// domains:
///   - name: Solar
///     overview:
///       - name: Technology Representation
///         criteria: { concentrated solar: 1, photovoltaic: 2 }
///       - name: Detailed Characteristics
///         criteria: { efficiency: 1, ramping: 1, recovery time: 1 }
/// catalog:
///   photovoltaic:
///     alternatives:
///       - { column: "photovoltaic/pos", reward: 1.0 }
///   ramping:
///     uniform: ["ramping yes", "response time yes"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Rubric {
    #[serde(default = "default_domains")]
    pub domains: Vec<Domain>,

    /// Technology groups for the coverage check
    #[serde(default = "default_technologies")]
    pub technologies: Vec<TechnologyGroup>,

    /// Rules layered over the built-in catalog. Entries here win.
    #[serde(default)]
    pub catalog: BTreeMap<String, CriterionRule>,

    /// High-representation cut-off for domain ratings (default: 0.7)
    #[serde(default)]
    pub threshold: Option<f64>,
}

impl Rubric {
    /// Built-in catalog with this rubric's overrides applied.
    pub fn catalog(&self) -> Catalog {
        Catalog::default().with_overrides(&self.catalog)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self {
            domains: default_domains(),
            technologies: default_technologies(),
            catalog: BTreeMap::new(),
            threshold: Some(DEFAULT_THRESHOLD),
        }
    }
}

/// A flexibility domain (supply, demand, ...).
///
/// The domain rating is the mean of the `overview` group scores. `details`
/// break the same criteria down further and do not feed the rating.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Domain {
    pub name: String,
    pub overview: Vec<CriterionGroup>,
    #[serde(default)]
    pub details: Vec<CriterionGroup>,
}

impl Domain {
    fn new(name: &str, overview: Vec<CriterionGroup>, details: Vec<CriterionGroup>) -> Self {
        Self {
            name: name.to_string(),
            overview,
            details,
        }
    }
}

const TECHNOLOGY_REPRESENTATION: &str = "Technology Representation";
const DETAILED_CHARACTERISTICS: &str = "Detailed Characteristics";
const OPERATIONS: [&str; 4] = ["efficiency", "ramping", "response time", "recovery time"];

fn with_operations(extra: &[&'static str]) -> Vec<&'static str> {
    let mut criteria = OPERATIONS.to_vec();
    criteria.extend_from_slice(extra);
    criteria
}

fn default_domains() -> Vec<Domain> {
    let supply_tech = [
        "coal",
        "lignite",
        "oil",
        "natural gas",
        "CCGT",
        "OCGT",
        "bioenergy",
        "Hydro reservoir",
        "geothermal energy",
        "concentrated solar",
        "photovoltaic",
        "wind onshore",
        "wind offshore",
        "river hydro",
        "wave power",
        "tidal power",
        "PEM-FC",
        "SOFC",
        "nuclear",
    ];
    let supply = Domain::new(
        "Supply",
        vec![
            CriterionGroup::equal(TECHNOLOGY_REPRESENTATION, &supply_tech),
            CriterionGroup::equal(
                DETAILED_CHARACTERISTICS,
                &with_operations(&[
                    "discrete capacity expansion",
                    "curtailed operation",
                    "minimum load",
                ]),
            ),
        ],
        vec![
            CriterionGroup::equal(
                "Conventional",
                &["coal", "lignite", "oil", "natural gas", "CCGT", "OCGT", "nuclear"],
            ),
            CriterionGroup::equal(
                "Dispatchable RES",
                &[
                    "bioenergy",
                    "Hydro reservoir",
                    "geothermal energy",
                    "concentrated solar",
                ],
            ),
            CriterionGroup::equal(
                "Variable RES",
                &[
                    "photovoltaic",
                    "wind onshore",
                    "wind offshore",
                    "river hydro",
                    "wave power",
                    "tidal power",
                ],
            ),
            CriterionGroup::equal("Fuel Cells", &["PEM-FC", "SOFC"]),
            CriterionGroup::equal(
                "Technology Specifications",
                &["curtailed operation", "minimum load"],
            ),
            CriterionGroup::equal("Operations", &OPERATIONS),
            CriterionGroup::equal("Discrete Expansion", &["discrete capacity expansion"]),
        ],
    );

    let demand = Domain::new(
        "Demand",
        vec![
            CriterionGroup::equal(
                TECHNOLOGY_REPRESENTATION,
                &["households", "industrial load", "service sector"],
            ),
            CriterionGroup::equal(
                DETAILED_CHARACTERISTICS,
                &with_operations(&[
                    "maximum deferrable load",
                    "shifting time",
                    "price elasticity",
                ]),
            ),
        ],
        vec![
            CriterionGroup::equal("Household", &["households"]),
            CriterionGroup::equal("Industry", &["industrial load"]),
            CriterionGroup::equal("Service", &["service sector"]),
            CriterionGroup::equal(
                "Technology Specifications",
                &["maximum deferrable load", "shifting time"],
            ),
            CriterionGroup::equal("Operations", &OPERATIONS),
            CriterionGroup::equal("Price Elasticity", &["price elasticity"]),
        ],
    );

    let storage = Domain::new(
        "Storage",
        vec![
            CriterionGroup::equal(
                TECHNOLOGY_REPRESENTATION,
                &["Batteries", "PHS", "CAES", "Caps", "Flywheels"],
            ),
            CriterionGroup::equal(
                DETAILED_CHARACTERISTICS,
                &with_operations(&["storage implementation", "aging", "self discharge"]),
            ),
        ],
        vec![
            CriterionGroup::equal("Long-term", &["PHS", "CAES"]),
            CriterionGroup::equal("Medium-term", &["Batteries"]),
            CriterionGroup::equal("Short-term", &["Caps", "Flywheels"]),
            CriterionGroup::equal("Technology Specifications", &["aging", "self discharge"]),
            CriterionGroup::equal("Storage Implementation", &["storage implementation"]),
            CriterionGroup::equal("Operations", &OPERATIONS),
        ],
    );

    let network = Domain::new(
        "Network",
        vec![
            CriterionGroup::equal(
                TECHNOLOGY_REPRESENTATION,
                &[
                    "Distribution Grid",
                    "Transmission Grid",
                    "network extension",
                    "switches",
                ],
            ),
            CriterionGroup::equal(
                DETAILED_CHARACTERISTICS,
                &["Grid representation", "import", "grid ancillary services"],
            ),
        ],
        vec![
            CriterionGroup::equal("Grid Types", &["Distribution Grid", "Transmission Grid"]),
            CriterionGroup::equal("Topology", &["network extension", "switches"]),
            CriterionGroup::equal("Grid Representation", &["Grid representation"]),
            CriterionGroup::equal("Import Export", &["import"]),
            CriterionGroup::equal("Ancillary Services", &["grid ancillary services"]),
        ],
    );

    // P2H2 stands in for all power-to-gas technologies here.
    let sector_coupling = Domain::new(
        "Sector Coupling",
        vec![
            CriterionGroup::equal(
                TECHNOLOGY_REPRESENTATION,
                &["P2H2", "HP", "EV", "Fuels", "Heat storage", "V2G", "CHP"],
            ),
            CriterionGroup::equal(
                DETAILED_CHARACTERISTICS,
                &with_operations(&[
                    "Heat",
                    "Transport",
                    "sector coupling supply",
                    "sector coupling demand",
                    "sector coupling storage",
                ]),
            ),
        ],
        vec![
            CriterionGroup::equal("Supply Technology", &["CHP"]),
            CriterionGroup::equal("Demand Technology", &["P2H2", "HP", "EV"]),
            CriterionGroup::equal("Storage Technology", &["Fuels", "Heat storage", "V2G"]),
            CriterionGroup::equal("Sector Representation", &["Heat", "Transport"]),
            CriterionGroup::equal(
                "Technology Specifications",
                &[
                    "sector coupling supply",
                    "sector coupling demand",
                    "sector coupling storage",
                ],
            ),
            CriterionGroup::equal("Operations", &OPERATIONS),
        ],
    );

    vec![supply, demand, storage, network, sector_coupling]
}

fn default_technologies() -> Vec<TechnologyGroup> {
    vec![
        TechnologyGroup::new(
            "Supply",
            &[
                "hard coal",
                "lignite",
                "oil",
                "natural gas",
                "CCGT",
                "OCGT",
                "CHP",
                "Bioenergy",
                "geothermal",
                "hydropower reservoir",
                "concentrated solar power",
                "photovoltaic",
                "wind onshore",
                "Wind-offshore",
                "Run-of-river hydro",
                "wave power",
                "tidal power",
                "PEM-FC",
                "SOFC",
                "Nuclear",
            ],
        ),
        TechnologyGroup::new("Demand", &["households", "industrial load", "service sector"]),
        TechnologyGroup::new("Storage", &["PHS", "Batteries", "CAES", "Caps", "Flywheels"]),
        TechnologyGroup::new(
            "Sector Coupling",
            &["P2Gas", "P2H2", "HP", "EV", "Fuels (H2)", "Heat storage", "V2Grid"],
        ),
        TechnologyGroup::new(
            "Network",
            &[
                "Distribution Grid",
                "Transmission Grid",
                "interconnectors",
                "network extension",
                "switches",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rubric() {
        let rubric = Rubric::default();
        let names: Vec<&str> = rubric.domains.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Supply", "Demand", "Storage", "Network", "Sector Coupling"]
        );
        for domain in &rubric.domains {
            assert_eq!(domain.overview.len(), 2, "{}", domain.name);
            assert!(!domain.details.is_empty());
        }
        assert_eq!(rubric.technologies.len(), 5);
        assert_eq!(rubric.threshold(), 0.7);
    }

    #[test]
    fn test_default_criteria_all_registered() {
        let rubric = Rubric::default();
        let catalog = rubric.catalog();
        for domain in &rubric.domains {
            for group in domain.overview.iter().chain(&domain.details) {
                for criterion in group.criteria.keys() {
                    assert!(
                        catalog.contains(criterion),
                        "{} / {}: '{}' not in catalog",
                        domain.name,
                        group.name,
                        criterion
                    );
                }
            }
        }
    }

    #[test]
    fn test_supply_overview_weights() {
        let rubric = Rubric::default();
        let supply = rubric.domain("supply").unwrap();
        assert_eq!(supply.overview[0].total_weight(), 19.0);
        assert_eq!(supply.overview[1].total_weight(), 7.0);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
threshold: 0.5
catalog:
  photovoltaic:
    alternatives:
      - { column: "photovoltaic/pos", reward: 1.0 }
"#;
        let rubric: Rubric = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(rubric.threshold(), 0.5);
        assert_eq!(rubric.domains, Rubric::default().domains);
        assert_eq!(
            rubric.catalog().get("photovoltaic"),
            Some(&CriterionRule::flag("photovoltaic/pos"))
        );
    }

    #[test]
    fn test_custom_domains_yaml() {
        let yaml = r#"
domains:
  - name: Solar
    overview:
      - name: Technology Representation
        criteria: { concentrated solar: 1, photovoltaic: 2 }
"#;
        let rubric: Rubric = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(rubric.domains.len(), 1);
        assert!(rubric.domains[0].details.is_empty());
        assert_eq!(rubric.threshold(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Rubric, _> = serde_saphyr::from_str("weights: {}");
        assert!(result.is_err());
    }

    #[test]
    fn test_rubric_serde_roundtrip() {
        let rubric = Rubric::default();
        let yaml = serde_saphyr::to_string(&rubric).unwrap();
        let parsed: Rubric = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(rubric, parsed);
    }
}
