use crate::battle::ai::{Behavior, HeuristicPolicy};
use crate::creature::Creature;
use crate::errors::{RosterError, SelectionError};
use schema::{ElementType, Rank};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default maximum number of creatures a combatant can carry.
pub const DEFAULT_ROSTER_CAPACITY: usize = 6;

/// What an action provider declares for its side this turn.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    // The index refers to the creature's position in the roster.
    Switch { index: usize },
    Flee,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Attack => write!(f, "Attack"),
            PlayerAction::Switch { index } => write!(f, "Switch to #{}", index + 1),
            PlayerAction::Flee => write!(f, "Flee"),
        }
    }
}

/// Decision procedure attached to an AI-controlled combatant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Heuristic,
}

impl PolicyKind {
    pub fn behavior(&self) -> &'static dyn Behavior {
        match self {
            PolicyKind::Heuristic => &HeuristicPolicy,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Combatant {
    pub name: String,
    pub rank: Rank,
    // Arena type for champions.
    pub specialty: Option<ElementType>,
    // None for player-controlled sides.
    pub policy: Option<PolicyKind>,
    roster: Vec<Creature>,
    active: Option<usize>,
    capacity: usize,
}

impl Combatant {
    /// Create a player-controlled combatant with an empty roster.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_ROSTER_CAPACITY)
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Combatant {
            name: name.into(),
            rank: Rank::Trainer,
            specialty: None,
            policy: None,
            roster: Vec::with_capacity(capacity),
            active: None,
            capacity,
        }
    }

    /// Create an AI-controlled trainer.
    pub fn npc(name: impl Into<String>) -> Self {
        Self::new(name).with_policy(PolicyKind::Heuristic)
    }

    /// Create an AI-controlled arena champion.
    pub fn champion(name: impl Into<String>, specialty: ElementType) -> Self {
        let mut champion = Self::npc(name);
        champion.rank = Rank::Champion;
        champion.specialty = Some(specialty);
        champion
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn is_champion(&self) -> bool {
        self.rank == Rank::Champion
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn roster(&self) -> &[Creature] {
        &self.roster
    }

    pub fn creature(&self, index: usize) -> Option<&Creature> {
        self.roster.get(index)
    }

    pub fn creature_mut(&mut self, index: usize) -> Option<&mut Creature> {
        self.roster.get_mut(index)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Get the currently active creature
    pub fn active_creature(&self) -> Option<&Creature> {
        self.active.and_then(|index| self.roster.get(index))
    }

    /// Get the currently active creature mutably
    pub fn active_creature_mut(&mut self) -> Option<&mut Creature> {
        self.active.and_then(|index| self.roster.get_mut(index))
    }

    /// Append a creature. The first creature added becomes active.
    pub fn add_creature(&mut self, creature: Creature) -> Result<(), RosterError> {
        if self.roster.len() >= self.capacity {
            return Err(RosterError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.roster.push(creature);
        if self.roster.len() == 1 {
            self.active = Some(0);
        }
        Ok(())
    }

    /// Check whether `index` could become the active creature, without changing anything.
    pub fn check_selection(&self, index: usize) -> Result<(), SelectionError> {
        let creature = self
            .roster
            .get(index)
            .ok_or(SelectionError::IndexOutOfRange(index))?;
        if creature.is_incapacitated() {
            return Err(SelectionError::TargetIncapacitated(index));
        }
        if self.active == Some(index) {
            return Err(SelectionError::AlreadyActive(index));
        }
        Ok(())
    }

    /// Make the creature at `index` active. On failure the active creature is unchanged.
    pub fn select_active(&mut self, index: usize) -> Result<(), SelectionError> {
        self.check_selection(index)?;
        self.active = Some(index);
        Ok(())
    }

    /// Activate the first creature still able to fight. Returns false, leaving
    /// no creature active, when the whole roster is down.
    pub fn auto_select_first_available(&mut self) -> bool {
        self.active = self.roster.iter().position(|c| !c.is_incapacitated());
        self.active.is_some()
    }

    /// True iff every creature in the roster is incapacitated.
    pub fn is_roster_defeated(&self) -> bool {
        self.roster.iter().all(Creature::is_incapacitated)
    }

    pub fn count_available(&self) -> usize {
        self.roster.iter().filter(|c| !c.is_incapacitated()).count()
    }

    /// Roster indices a switch could currently target.
    pub fn valid_switches(&self) -> Vec<usize> {
        (0..self.roster.len())
            .filter(|&index| self.check_selection(index).is_ok())
            .collect()
    }

    /// Restore every creature on the roster to full health.
    pub fn heal_team(&mut self) {
        for creature in &mut self.roster {
            creature.heal();
        }
        tracing::debug!(combatant = %self.name, "team healed");
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}/{} creatures available",
            self.name,
            self.count_available(),
            self.roster.len()
        )
    }
}
