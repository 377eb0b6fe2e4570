//! Action sources for sides without an attached policy.

use std::collections::VecDeque;

use crate::battle::action_stack::TurnAction;
use crate::battle::ai::{Behavior, HeuristicPolicy};
use crate::battle::state::{BattleSession, Side};
use crate::combatant::PlayerAction;
use crate::errors::ActionError;

/// Supplies actions for a player-controlled side.
///
/// The engine calls `choose_action` once per turn and blocks until it returns.
/// Rejected actions are reported back through `action_rejected` and replaced
/// by an attack; the engine never asks twice in the same turn.
pub trait PlayerActionProvider {
    fn choose_action(&mut self, side: Side, session: &BattleSession) -> PlayerAction;

    /// Roster index to send out after a knockout. `None` picks the first available creature.
    fn choose_replacement(&mut self, _side: Side, _session: &BattleSession) -> Option<usize> {
        None
    }

    fn action_rejected(&mut self, _side: Side, _action: PlayerAction, _error: &ActionError) {}
}

/// Checks a provider's action against the current session.
///
/// Switch targets must be selectable and Flee is refused against a champion
/// unless the session allows it.
pub fn validate_player_action(
    session: &BattleSession,
    side: Side,
    action: PlayerAction,
) -> Result<(), ActionError> {
    match action {
        PlayerAction::Attack => Ok(()),
        PlayerAction::Switch { index } => {
            session.combatant(side).check_selection(index)?;
            Ok(())
        }
        PlayerAction::Flee => {
            if session.flee_permitted(side) {
                Ok(())
            } else {
                Err(ActionError::IllegalActionForContext(format!(
                    "cannot flee from champion {}",
                    session.combatant(side.opponent()).name
                )))
            }
        }
    }
}

/// Replays a fixed list of actions, then attacks forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    actions: VecDeque<PlayerAction>,
    replacements: VecDeque<usize>,
    rejections: Vec<(Side, PlayerAction, ActionError)>,
}

impl ScriptedProvider {
    pub fn new(actions: Vec<PlayerAction>) -> Self {
        Self {
            actions: actions.into(),
            ..Self::default()
        }
    }

    pub fn with_replacements(mut self, replacements: Vec<usize>) -> Self {
        self.replacements = replacements.into();
        self
    }

    pub fn rejections(&self) -> &[(Side, PlayerAction, ActionError)] {
        &self.rejections
    }
}

impl PlayerActionProvider for ScriptedProvider {
    fn choose_action(&mut self, _side: Side, _session: &BattleSession) -> PlayerAction {
        self.actions.pop_front().unwrap_or(PlayerAction::Attack)
    }

    fn choose_replacement(&mut self, _side: Side, _session: &BattleSession) -> Option<usize> {
        self.replacements.pop_front()
    }

    fn action_rejected(&mut self, side: Side, action: PlayerAction, error: &ActionError) {
        self.rejections.push((side, action, error.clone()));
    }
}

/// Lets the heuristic policy drive a side that has no policy of its own,
/// e.g. for AI-versus-AI simulations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyProvider;

impl PlayerActionProvider for PolicyProvider {
    fn choose_action(&mut self, side: Side, session: &BattleSession) -> PlayerAction {
        match HeuristicPolicy.decide_action(side, session) {
            TurnAction::Attack { .. } => PlayerAction::Attack,
            TurnAction::Switch { target_index, .. } => PlayerAction::Switch {
                index: target_index,
            },
        }
    }
}
