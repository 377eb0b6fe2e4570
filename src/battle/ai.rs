//! A module for defining AI behaviors for battle opponents.

use crate::battle::action_stack::TurnAction;
use crate::battle::state::{BattleSession, Side};
use crate::combatant::Combatant;
use crate::creature::Creature;
use ordered_float::OrderedFloat;
use schema::Effectiveness;

/// Below this fraction of max HP the policy looks for a replacement.
pub const LOW_HP_RATIO: f64 = 0.30;
const ADVANTAGE_BONUS: f64 = 200.0;
const DISADVANTAGE_PENALTY: f64 = 100.0;

/// A trait for any system that can decide on a battle action.
/// This provides a common interface for different AI strategies.
pub trait Behavior {
    /// Inspects the battle state and decides on the next action for the given side.
    fn decide_action(&self, side: Side, session: &BattleSession) -> TurnAction;
}

/// Deterministic switch-or-attack heuristic used by AI-controlled sides.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPolicy;

impl HeuristicPolicy {
    /// `hp% + 200` with a type advantage, `hp% - 100` with a type disadvantage.
    pub fn score_candidate(candidate: &Creature, opponent: &Creature) -> f64 {
        let mut score = candidate.hp_ratio() * 100.0;
        match candidate.element().effectiveness_against(opponent.element()) {
            Effectiveness::SuperEffective => score += ADVANTAGE_BONUS,
            Effectiveness::Resisted => score -= DISADVANTAGE_PENALTY,
            Effectiveness::Neutral => {}
        }
        score
    }

    /// Highest scoring creature still able to fight. Ties go to the earlier roster slot.
    pub fn best_candidate(combatant: &Combatant, opponent: &Creature) -> Option<usize> {
        let mut best: Option<(usize, OrderedFloat<f64>)> = None;
        for (index, candidate) in combatant.roster().iter().enumerate() {
            if candidate.is_incapacitated() {
                continue;
            }
            let score = OrderedFloat(Self::score_candidate(candidate, opponent));
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((index, score));
            }
        }
        best.map(|(index, _)| index)
    }

    /// True when the active creature's attacks are resisted by the opponent,
    /// which in the three-type cycle means the opponent hits it super effectively.
    fn at_type_disadvantage(active: &Creature, opponent: &Creature) -> bool {
        active
            .element()
            .effectiveness_against(opponent.element())
            .multiplier()
            < 1.0
    }
}

impl Behavior for HeuristicPolicy {
    fn decide_action(&self, side: Side, session: &BattleSession) -> TurnAction {
        let attack = TurnAction::Attack { actor: side };
        let player = session.combatant(side);

        let (Some(active), Some(opponent)) = (
            player.active_creature(),
            session.combatant(side.opponent()).active_creature(),
        ) else {
            return attack;
        };

        let low_hp = active.hp_ratio() < LOW_HP_RATIO;
        if !low_hp && !Self::at_type_disadvantage(active, opponent) {
            return attack;
        }

        match Self::best_candidate(player, opponent) {
            Some(index) if Some(index) != player.active_index() => {
                tracing::debug!(
                    combatant = %player.name,
                    from = %active.name,
                    to = index,
                    low_hp,
                    "policy chose to switch"
                );
                TurnAction::Switch {
                    actor: side,
                    target_index: index,
                }
            }
            _ => attack,
        }
    }
}
