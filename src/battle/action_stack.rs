use std::cmp::Reverse;
use std::collections::VecDeque;

use crate::battle::state::{BattleSession, Side};
use serde::{Deserialize, Serialize};

/// One side's declared intent for the current turn, consumed exactly once.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAction {
    Attack { actor: Side },
    Switch { actor: Side, target_index: usize },
}

impl TurnAction {
    pub fn actor(&self) -> Side {
        match self {
            TurnAction::Attack { actor } | TurnAction::Switch { actor, .. } => *actor,
        }
    }

    /// Switches resolve in tier 0, attacks in tier 1.
    pub fn priority_tier(&self) -> u8 {
        match self {
            TurnAction::Switch { .. } => 0,
            TurnAction::Attack { .. } => 1,
        }
    }
}

/// Ordered queue of the actions to execute this turn.
#[derive(Debug, Clone, Default)]
pub struct ActionStack {
    actions: VecDeque<TurnAction>,
}

impl ActionStack {
    /// Builds the action stack for a turn from the actions in declaration order.
    ///
    /// Switches come first in the order declared. Attacks follow, fastest
    /// active creature first; equal speeds keep declaration order.
    pub fn build(session: &BattleSession, declared: &[TurnAction]) -> Self {
        let mut ordered: Vec<TurnAction> = declared.to_vec();
        // sort_by_key is stable, which provides the declared-order tiebreak.
        ordered.sort_by_key(|action| {
            let speed = match action {
                TurnAction::Attack { actor } => Self::active_speed(session, *actor),
                TurnAction::Switch { .. } => 0,
            };
            (action.priority_tier(), Reverse(speed))
        });

        tracing::debug!(?ordered, "action order resolved");

        Self {
            actions: ordered.into(),
        }
    }

    fn active_speed(session: &BattleSession, side: Side) -> u16 {
        session
            .combatant(side)
            .active_creature()
            .map_or(0, |creature| creature.speed())
    }

    /// Removes and returns the next action to be executed from the front of the queue.
    pub fn pop_front(&mut self) -> Option<TurnAction> {
        self.actions.pop_front()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TurnAction> {
        self.actions.iter()
    }
}
