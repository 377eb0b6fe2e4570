use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Elemental type of a creature.
///
/// The three types form a closed advantage cycle: Fire beats Plant,
/// Plant beats Water and Water beats Fire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ElementType {
    Fire,
    Water,
    Plant,
}

/// Damage multiplier category for an attacking type against a defending type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Effectiveness {
    #[strum(serialize = "super effective")]
    SuperEffective,
    #[strum(serialize = "neutral")]
    Neutral,
    #[strum(serialize = "not very effective")]
    Resisted,
}

impl Effectiveness {
    pub fn multiplier(self) -> f64 {
        match self {
            Effectiveness::SuperEffective => 2.0,
            Effectiveness::Neutral => 1.0,
            Effectiveness::Resisted => 0.5,
        }
    }
}

/// Flat bonuses added on top of the level-derived base stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatAdjustment {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
}

impl ElementType {
    /// The type this one is super effective against.
    pub fn beats(self) -> ElementType {
        match self {
            ElementType::Fire => ElementType::Plant,
            ElementType::Plant => ElementType::Water,
            ElementType::Water => ElementType::Fire,
        }
    }

    /// Effectiveness of an attack of this type against `defending`.
    pub fn effectiveness_against(self, defending: ElementType) -> Effectiveness {
        if self.beats() == defending {
            Effectiveness::SuperEffective
        } else if defending.beats() == self {
            Effectiveness::Resisted
        } else {
            Effectiveness::Neutral
        }
    }

    /// Calculate type effectiveness multiplier for attacking type vs defending type
    /// Returns: 2.0 = Super Effective, 1.0 = Normal, 0.5 = Not Very Effective
    pub fn type_effectiveness(attacking: ElementType, defending: ElementType) -> f64 {
        attacking.effectiveness_against(defending).multiplier()
    }

    /// Per-type stat bonuses. Replaces one constructor per elemental subtype.
    pub fn stat_adjustment(self) -> StatAdjustment {
        match self {
            ElementType::Fire => StatAdjustment {
                speed: 2,
                ..StatAdjustment::default()
            },
            ElementType::Water => StatAdjustment {
                defense: 2,
                ..StatAdjustment::default()
            },
            ElementType::Plant => StatAdjustment {
                hp: 10,
                ..StatAdjustment::default()
            },
        }
    }
}
