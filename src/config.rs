//! Battle configuration, loaded from RON.

use crate::combatant::DEFAULT_ROSTER_CAPACITY;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BattleConfig {
    /// Maximum creatures per roster.
    pub roster_capacity: usize,
    /// Let players flee from champion battles.
    pub allow_champion_flee: bool,
    /// Fixed RNG seed; `None` uses the thread RNG.
    pub seed: Option<u64>,
    /// `tracing_subscriber::EnvFilter` directive for the binary.
    pub log_filter: String,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            roster_capacity: DEFAULT_ROSTER_CAPACITY,
            allow_champion_flee: false,
            seed: None,
            log_filter: "info".to_string(),
        }
    }
}

impl BattleConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }
}
