use crate::ElementType;
use serde::{Deserialize, Serialize};

/// Standing of a combatant. Champions guard an arena and cannot be fled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rank {
    #[default]
    Trainer,
    Champion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub name: String,
    pub element: ElementType,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTemplate {
    pub name: String,
    #[serde(default)]
    pub rank: Rank,
    /// Specialty type of a champion's arena, if any.
    #[serde(default)]
    pub specialty: Option<ElementType>,
    pub creatures: Vec<CreatureTemplate>,
}
