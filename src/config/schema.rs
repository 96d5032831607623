use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scoring::Rubric;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Survey file used when none is given on the command line
    #[serde(default)]
    pub survey: Option<PathBuf>,

    /// Models to rate; all surveyed models when omitted
    #[serde(default)]
    pub models: Option<Vec<String>>,

    #[serde(default)]
    pub rubric: Option<Rubric>,
}

impl Config {
    /// Configured rubric, or the built-in one.
    pub fn effective_rubric(&self) -> Rubric {
        self.rubric.clone().unwrap_or_default()
    }
}
