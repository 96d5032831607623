//! Survey column names read by the built-in rules.

pub const CHP: [&str; 2] = ["CHP/pos", "CHP/def"];
pub const MINIMUM_LOAD: &str = "minimum load yes";
pub const DISCRETE_EXPANSION: &str = "discrete expansion yes";
pub const CURTAILED_OPERATION: &str = "curtailed operation yes";

pub const EFFICIENCY_FUNCTION: &str = "efficiency function";
pub const EFFICIENCY_FIXED: &str = "efficiency fixed value";
pub const RAMPING: &str = "ramping yes";
pub const RESPONSE_TIME: &str = "response time yes";
pub const RECOVERY_TIME: &str = "recovery time yes";

pub const SECTOR_COUPLING_STORAGE: [&str; 6] = [
    "Fuels (H2)/pos",
    "Fuels (H2)/def",
    "Heat storage/pos",
    "Heat storage/def",
    "V2Grid/pos",
    "V2Grid/def",
];
pub const SELF_DISCHARGE: &str = "self discharge yes";
pub const CYCLE_AGING: &str = "cycle aging";
pub const CALENDRICAL_AGING: &str = "calendrical aging";
pub const STORAGE_DYNAMIC: &str = "dynamic";
pub const STORAGE_FIXED: &str = "fixed/static";

pub const SECTOR_COUPLING_DEMAND: [&str; 8] = [
    "P2Gas/pos",
    "P2Gas/def",
    "P2H2/pos",
    "P2H2/def",
    "HP/pos",
    "HP/def",
    "EV/pos",
    "EV/def",
];
pub const SHIFTING_TIME: &str = "shifting time yes";
pub const PRICE_ELASTICITY: &str = "price elasticity yes";

pub const MDL_TIME_AND_TYPE: &str = "time- and type-dependent";
pub const MDL_TYPE: &str = "Type-dependent";
pub const MDL_TIME: &str = "Time-dependent";
pub const MDL_FIXED: &str = "max def load fixed value";
pub const MDL_NONE: &str = "no max def load";

pub const PERFECT_FORESIGHT: &str = "perfect foresight";
pub const ROLLING_HORIZON: &str = "rolling horizon / myopic foresight";
pub const AGENT_BASED: &str = "decision-/agentbased";
pub const OTHER_DECISION_MAKING: &str = "other decision making";
pub const NO_DECISION_MAKING: &str = "no decision making";

pub const AC_POWER_FLOW: &str = "AC PF";
pub const DC_POWER_FLOW: &str = "DC PF";
pub const INTERCONNECTORS: [&str; 2] = ["interconnectors/pos", "interconnectors/def"];
pub const TRANSFER_CAPACITY: &str = "transfer capacity";
pub const NO_GRID: &str = "no grid";

pub const IMPORT_FLOW_BASED: &str = "flow based";
pub const IMPORT_SIMPLIFIED: &str = "simplified";

pub const ANCILLARY_SERVICES: [&str; 8] = [
    "spinning reserve",
    "balancing energy",
    "sheddable loads",
    "Feed-in management",
    "redispatch",
    "power factor correction",
    "curtailment",
    "black start",
];

pub const GEOGRAPHIC_SCOPE: [&str; 8] = [
    "local (NUTS3)/used",
    "local (NUTS3)/pos",
    "regional (NUTS1-2)/pos",
    "regional (NUTS1-2)/used",
    "national/pos",
    "national/used",
    "international/pos",
    "international/used",
];
pub const TEMPORAL_SCOPE: [&str; 8] = [
    "very short/pos",
    "very short/used",
    "short/pos",
    "short/used",
    "intermediate/pos",
    "intermediate/used",
    "long/pos",
    "long/used",
];
pub const TEMPORAL_RESOLUTION: [&str; 8] = [
    "<hourly/used",
    "<hourly/pos",
    "hourly/pos",
    "hourly/used",
    "intermediate/pos",
    "intermediate/used",
    "annual/pos",
    "annual/used",
];

pub const PROBABILISTIC: &str = "prob yes";
pub const SOCIAL: &str = "social yes";

pub fn sector_excluded(sector: &str) -> String {
    format!("{} sector excluded", sector)
}

pub fn exo_aggregated_demand(sector: &str) -> String {
    format!("exo aggregated {} dem", sector)
}

pub fn end_disaggregated_demand(sector: &str) -> String {
    format!("end disaggregated {} dem", sector)
}

pub fn end_disaggregated_tech(sector: &str) -> String {
    format!("end disaggregated {} tech", sector)
}

pub fn other_representation(sector: &str) -> String {
    format!("other {} representation", sector)
}

/// `<tech>/pos` column.
pub fn possible(tech: &str) -> String {
    format!("{}/pos", tech)
}

/// `<tech>/def` column.
pub fn predefined(tech: &str) -> String {
    format!("{}/def", tech)
}
