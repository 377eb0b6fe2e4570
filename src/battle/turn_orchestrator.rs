//! Single-turn resolution: collect one action per side, order them, execute them.

use crate::battle::action_stack::{ActionStack, TurnAction};
use crate::battle::calculators::experience_for;
use crate::battle::events::{BattleEvent, Notifier};
use crate::battle::provider::{validate_player_action, PlayerActionProvider};
use crate::battle::rng::RandomSource;
use crate::battle::state::{BattleSession, Outcome, Side};
use crate::combatant::PlayerAction;
use crate::creature::{AttackOutcome, Creature};
use crate::errors::ActionError;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    CollectingActions,
    Ordering,
    Executing,
    Done,
}

/// External collaborators a turn needs.
pub struct TurnContext<'a> {
    pub provider: &'a mut dyn PlayerActionProvider,
    pub rng: &'a mut dyn RandomSource,
    pub notifier: &'a mut dyn Notifier,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ActionRecord {
    Switched {
        side: Side,
        from: Option<usize>,
        to: usize,
    },
    SwitchFailed {
        side: Side,
        target_index: usize,
        reason: String,
    },
    Attacked {
        side: Side,
        attacker: String,
        defender: String,
        outcome: AttackOutcome,
    },
    /// The actor was knocked out earlier this turn or had nobody to fight.
    Skipped { action: TurnAction },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Knockout {
    /// Side whose creature fell.
    pub side: Side,
    pub creature: String,
    pub experience_awarded: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForcedSwitch {
    pub side: Side,
    /// `None` when the side had nobody left to send out.
    pub replacement: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RejectedAction {
    pub side: Side,
    pub action: PlayerAction,
    pub reason: String,
}

/// Everything that happened during one turn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub turn_number: u32,
    pub phase: TurnPhase,
    pub actions: Vec<ActionRecord>,
    pub damage_dealt: [u32; 2],
    pub knockouts: Vec<Knockout>,
    pub forced_switches: Vec<ForcedSwitch>,
    pub rejected: Vec<RejectedAction>,
    pub fled: Option<Side>,
}

impl TurnReport {
    fn new(turn_number: u32) -> Self {
        Self {
            turn_number,
            phase: TurnPhase::CollectingActions,
            actions: Vec::new(),
            damage_dealt: [0, 0],
            knockouts: Vec::new(),
            forced_switches: Vec::new(),
            rejected: Vec::new(),
            fled: None,
        }
    }

    fn enter(&mut self, phase: TurnPhase) {
        tracing::trace!(turn = self.turn_number, ?phase, "turn phase");
        self.phase = phase;
    }

    pub fn damage_dealt_by(&self, side: Side) -> u32 {
        self.damage_dealt[side.index()]
    }
}

fn emit(ctx: &mut TurnContext<'_>, session: &BattleSession, event: BattleEvent) {
    ctx.notifier.notify(&event, session);
}

/// Main entry point for turn resolution.
///
/// Increments the turn counter, then runs CollectingActions → Ordering →
/// Executing → Done. Switches are applied while actions are collected. A Flee
/// from a provider-controlled side concludes the session during collection and
/// still closes the turn. Roster-defeat checks are left to the caller.
pub fn resolve_turn(session: &mut BattleSession, ctx: &mut TurnContext<'_>) -> TurnReport {
    let turn_number = session.advance_turn();
    let mut report = TurnReport::new(turn_number);
    emit(ctx, session, BattleEvent::TurnStarted { turn_number });

    // 1. Collect one declared action per side.
    let declared = match collect_actions(session, ctx, &mut report) {
        Some(declared) => declared,
        None => {
            report.enter(TurnPhase::Done);
            emit(ctx, session, BattleEvent::TurnEnded { turn_number });
            return report;
        }
    };

    // 2. Order attacks by the speed of whoever is now active.
    report.enter(TurnPhase::Ordering);
    let mut stack = ActionStack::build(session, &declared);

    // 3. Execute.
    report.enter(TurnPhase::Executing);
    let mut knocked_out = [false; 2];
    while let Some(action) = stack.pop_front() {
        let actor = action.actor();
        if knocked_out[actor.index()] {
            skip(session, ctx, &mut report, action);
            continue;
        }

        match action {
            TurnAction::Switch {
                actor,
                target_index,
            } => execute_switch(session, ctx, &mut report, actor, target_index),
            TurnAction::Attack { actor } => {
                execute_attack(session, ctx, &mut report, &mut knocked_out, actor)
            }
        }
    }

    // 4. Done.
    report.enter(TurnPhase::Done);
    emit(ctx, session, BattleEvent::TurnEnded { turn_number });
    report
}

/// Gathers one action per side in side order and applies any switch on the spot.
/// Returns the attacks left to order, or `None` if a side fled.
fn collect_actions(
    session: &mut BattleSession,
    ctx: &mut TurnContext<'_>,
    report: &mut TurnReport,
) -> Option<Vec<TurnAction>> {
    let mut declared = Vec::with_capacity(2);

    for side in Side::BOTH {
        let policy = session.combatant(side).policy;
        let chosen = match policy {
            Some(policy) => policy.behavior().decide_action(side, session),
            None => match provider_action(session, ctx, report, side) {
                PlayerAction::Flee => {
                    flee(session, ctx, report, side);
                    return None;
                }
                PlayerAction::Switch { index } => TurnAction::Switch {
                    actor: side,
                    target_index: index,
                },
                PlayerAction::Attack => TurnAction::Attack { actor: side },
            },
        };

        // Switches land now, so the next side decides against the incoming creature.
        if let TurnAction::Switch {
            actor,
            target_index,
        } = chosen
        {
            execute_switch(session, ctx, report, actor, target_index);
        }
        // Switching is free: the side still attacks with whoever is active.
        declared.push(TurnAction::Attack { actor: side });
    }

    Some(declared)
}

/// Asks the provider for an action and substitutes Attack for anything invalid.
fn provider_action(
    session: &BattleSession,
    ctx: &mut TurnContext<'_>,
    report: &mut TurnReport,
    side: Side,
) -> PlayerAction {
    let action = ctx.provider.choose_action(side, session);
    match validate_player_action(session, side, action) {
        Ok(()) => action,
        Err(error) => {
            reject(session, ctx, report, side, action, &error);
            PlayerAction::Attack
        }
    }
}

fn reject(
    session: &BattleSession,
    ctx: &mut TurnContext<'_>,
    report: &mut TurnReport,
    side: Side,
    action: PlayerAction,
    error: &ActionError,
) {
    tracing::warn!(%side, %action, %error, "action rejected");
    ctx.provider.action_rejected(side, action, error);
    report.rejected.push(RejectedAction {
        side,
        action,
        reason: error.to_string(),
    });
    emit(
        ctx,
        session,
        BattleEvent::ActionRejected {
            side,
            action,
            reason: error.to_string(),
        },
    );
}

fn flee(
    session: &mut BattleSession,
    ctx: &mut TurnContext<'_>,
    report: &mut TurnReport,
    side: Side,
) {
    report.fled = Some(side);
    session.conclude(Outcome::Fled);
    emit(ctx, session, BattleEvent::Fled { side });
}

fn skip(
    session: &BattleSession,
    ctx: &mut TurnContext<'_>,
    report: &mut TurnReport,
    action: TurnAction,
) {
    report.actions.push(ActionRecord::Skipped { action });
    emit(
        ctx,
        session,
        BattleEvent::ActionSkipped {
            side: action.actor(),
        },
    );
}

fn execute_switch(
    session: &mut BattleSession,
    ctx: &mut TurnContext<'_>,
    report: &mut TurnReport,
    side: Side,
    target_index: usize,
) {
    let combatant = session.combatant_mut(side);
    let from = combatant.active_index();
    let old_creature = combatant.active_creature().map(|c| c.name.clone());

    if let Err(error) = combatant.select_active(target_index) {
        report.actions.push(ActionRecord::SwitchFailed {
            side,
            target_index,
            reason: error.to_string(),
        });
        return;
    }

    let new_creature = combatant
        .active_creature()
        .map(|c| c.name.clone())
        .unwrap_or_default();
    report.actions.push(ActionRecord::Switched {
        side,
        from,
        to: target_index,
    });
    emit(
        ctx,
        session,
        BattleEvent::CreatureSwitched {
            side,
            old_creature,
            new_creature,
        },
    );
}

fn execute_attack(
    session: &mut BattleSession,
    ctx: &mut TurnContext<'_>,
    report: &mut TurnReport,
    knocked_out: &mut [bool; 2],
    actor: Side,
) {
    let (attacking, defending) = session.actor_and_target_mut(actor);
    let (Some(attacker), Some(defender)) = (
        attacking.active_creature(),
        defending.active_creature_mut(),
    ) else {
        skip(session, ctx, report, TurnAction::Attack { actor });
        return;
    };

    let attacker_name = attacker.name.clone();
    let defender_name = defender.name.clone();
    let outcome = Creature::resolve_attack(attacker, defender, &mut *ctx.rng);
    let experience = experience_for(defender);

    let damage = outcome.damage();
    session.record_damage(actor, damage);
    report.damage_dealt[actor.index()] += damage;

    emit(
        ctx,
        session,
        BattleEvent::AttackResolved {
            side: actor,
            attacker: attacker_name.clone(),
            defender: defender_name.clone(),
            outcome: outcome.clone(),
        },
    );
    let knockout = outcome.knocked_out();
    report.actions.push(ActionRecord::Attacked {
        side: actor,
        attacker: attacker_name.clone(),
        defender: defender_name.clone(),
        outcome,
    });

    if knockout {
        let loser = actor.opponent();
        knocked_out[loser.index()] = true;
        award_experience(
            session,
            ctx,
            report,
            actor,
            &attacker_name,
            defender_name,
            experience,
        );
        send_replacement(session, ctx, report, loser);
    }
}

fn award_experience(
    session: &mut BattleSession,
    ctx: &mut TurnContext<'_>,
    report: &mut TurnReport,
    winner: Side,
    winner_creature: &str,
    defeated_name: String,
    experience: u32,
) {
    let loser = winner.opponent();
    if let Some(creature) = session.combatant_mut(winner).active_creature_mut() {
        creature.gain_experience(experience);
    }
    session.record_experience(winner, experience);

    report.knockouts.push(Knockout {
        side: loser,
        creature: defeated_name.clone(),
        experience_awarded: experience,
    });
    emit(
        ctx,
        session,
        BattleEvent::CreatureFainted {
            side: loser,
            creature: defeated_name,
        },
    );
    emit(
        ctx,
        session,
        BattleEvent::ExperienceGained {
            side: winner,
            creature: winner_creature.to_string(),
            amount: experience,
        },
    );
}

/// Replaces a knocked out creature: the provider's pick for player sides,
/// the first available creature otherwise or when the pick is invalid.
fn send_replacement(
    session: &mut BattleSession,
    ctx: &mut TurnContext<'_>,
    report: &mut TurnReport,
    side: Side,
) {
    let mut replaced = false;

    if session.combatant(side).policy.is_none() {
        if let Some(index) = ctx.provider.choose_replacement(side, session) {
            match session.combatant_mut(side).select_active(index) {
                Ok(()) => replaced = true,
                Err(error) => reject(
                    session,
                    ctx,
                    report,
                    side,
                    PlayerAction::Switch { index },
                    &ActionError::InvalidSelection(error),
                ),
            }
        }
    }

    if !replaced {
        replaced = session.combatant_mut(side).auto_select_first_available();
    }

    let combatant = session.combatant(side);
    match (replaced, combatant.active_index(), combatant.active_creature()) {
        (true, Some(index), Some(creature)) => {
            let creature = creature.name.clone();
            report.forced_switches.push(ForcedSwitch {
                side,
                replacement: Some(index),
            });
            emit(ctx, session, BattleEvent::ReplacementSent { side, creature });
        }
        _ => {
            report.forced_switches.push(ForcedSwitch {
                side,
                replacement: None,
            });
            emit(ctx, session, BattleEvent::SideDefeated { side });
        }
    }
}
