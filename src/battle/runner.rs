use crate::battle::events::{BattleEvent, Notifier};
use crate::battle::provider::PlayerActionProvider;
use crate::battle::rng::RandomSource;
use crate::battle::state::{BattleSession, Outcome, SessionState, Side};
use crate::battle::turn_orchestrator::{resolve_turn, TurnContext, TurnReport};
use crate::combatant::Combatant;
use crate::config::BattleConfig;
use serde::{Deserialize, Serialize};

/// High-level battle driver: owns the session and loops turns until a
/// terminal condition is reached.
#[derive(Debug)]
pub struct BattleRunner {
    session: BattleSession,
    reports: Vec<TurnReport>,
}

/// Final statistics for a concluded battle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleSummary {
    pub battle_id: String,
    pub outcome: Outcome,
    pub turns: u32,
    pub damage_dealt: [u32; 2],
    pub experience_gained: [u32; 2],
}

/// Snapshot of one side for status displays.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SideInfo {
    pub name: String,
    pub active_creature: Option<String>,
    pub active_hp: Option<(u16, u16)>,
    pub available: usize,
    pub roster_size: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleInfo {
    pub battle_id: String,
    pub turn_number: u32,
    pub state: SessionState,
    pub sides: [SideInfo; 2],
}

impl SideInfo {
    fn of(combatant: &Combatant) -> Self {
        let active = combatant.active_creature();
        SideInfo {
            name: combatant.name.clone(),
            active_creature: active.map(|c| c.name.clone()),
            active_hp: active.map(|c| (c.current_hp(), c.max_hp())),
            available: combatant.count_available(),
            roster_size: combatant.roster().len(),
        }
    }
}

impl BattleInfo {
    pub fn from_session(session: &BattleSession) -> Self {
        BattleInfo {
            battle_id: session.battle_id.clone(),
            turn_number: session.turn_number(),
            state: session.state(),
            sides: Side::BOTH.map(|side| SideInfo::of(session.combatant(side))),
        }
    }
}

impl BattleRunner {
    pub fn new(battle_id: impl Into<String>, side_a: Combatant, side_b: Combatant) -> Self {
        Self::from_session(BattleSession::new(battle_id, side_a, side_b))
    }

    pub fn from_session(session: BattleSession) -> Self {
        Self {
            session,
            reports: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: &BattleConfig) -> Self {
        self.session.allow_champion_flee = config.allow_champion_flee;
        self
    }

    pub fn session(&self) -> &BattleSession {
        &self.session
    }

    /// Per-turn reports in resolution order.
    pub fn turn_reports(&self) -> &[TurnReport] {
        &self.reports
    }

    pub fn is_battle_ended(&self) -> bool {
        self.session.is_concluded()
    }

    pub fn get_winner(&self) -> Option<Side> {
        self.session.outcome().and_then(Outcome::winner)
    }

    pub fn get_battle_info(&self) -> BattleInfo {
        BattleInfo::from_session(&self.session)
    }

    /// Runs turns until one roster is defeated or a side flees.
    ///
    /// A side that is already fully defeated ends the battle before turn 1.
    pub fn run(
        &mut self,
        provider: &mut dyn PlayerActionProvider,
        rng: &mut dyn RandomSource,
        notifier: &mut dyn Notifier,
    ) -> Outcome {
        let mut ctx = TurnContext {
            provider,
            rng,
            notifier,
        };
        loop {
            if let Some(outcome) = self.run_turn(&mut ctx) {
                return outcome;
            }
        }
    }

    /// Resolves at most one turn. Returns the outcome once the battle is over.
    pub fn run_turn(&mut self, ctx: &mut TurnContext<'_>) -> Option<Outcome> {
        if let Some(outcome) = self.session.outcome() {
            return Some(outcome);
        }
        if self.session.state() == SessionState::Pending {
            self.start(ctx);
            if let Some(outcome) = self.check_termination(ctx) {
                return Some(outcome);
            }
        }

        let report = resolve_turn(&mut self.session, ctx);
        tracing::info!(
            battle_id = %self.session.battle_id,
            turn = report.turn_number,
            damage_a = report.damage_dealt_by(Side::A),
            damage_b = report.damage_dealt_by(Side::B),
            knockouts = report.knockouts.len(),
            "turn resolved"
        );
        self.reports.push(report);
        self.check_termination(ctx)
    }

    fn start(&mut self, ctx: &mut TurnContext<'_>) {
        self.session.begin();
        tracing::info!(
            battle_id = %self.session.battle_id,
            side_a = %self.session.combatant(Side::A).name,
            side_b = %self.session.combatant(Side::B).name,
            "battle started"
        );
        ctx.notifier
            .notify(&BattleEvent::BattleStarted, &self.session);

        for side in Side::BOTH {
            let combatant = self.session.combatant_mut(side);
            let needs_pick = combatant
                .active_creature()
                .map_or(true, |c| c.is_incapacitated());
            if needs_pick {
                combatant.auto_select_first_available();
            }

            let event = match self.session.combatant(side).active_creature() {
                Some(creature) => BattleEvent::CreatureSentOut {
                    side,
                    creature: creature.name.clone(),
                },
                None => BattleEvent::SideDefeated { side },
            };
            ctx.notifier.notify(&event, &self.session);
        }
    }

    /// Concludes the session if a side fled or a roster is defeated.
    fn check_termination(&mut self, ctx: &mut TurnContext<'_>) -> Option<Outcome> {
        let outcome = match self.session.outcome() {
            Some(outcome) => outcome,
            None => self.session.roster_outcome()?,
        };
        if !self.session.is_concluded() {
            self.session.conclude(outcome);
        }

        tracing::info!(
            battle_id = %self.session.battle_id,
            turns = self.session.turn_number(),
            ?outcome,
            "battle ended"
        );
        ctx.notifier
            .notify(&BattleEvent::BattleEnded { outcome }, &self.session);
        Some(outcome)
    }

    /// Statistics for the battle so far; `None` until it has concluded.
    pub fn summary(&self) -> Option<BattleSummary> {
        self.session.outcome().map(|outcome| self.summary_for(outcome))
    }

    fn summary_for(&self, outcome: Outcome) -> BattleSummary {
        BattleSummary {
            battle_id: self.session.battle_id.clone(),
            outcome,
            turns: self.session.turn_number(),
            damage_dealt: [
                self.session.damage_dealt(Side::A),
                self.session.damage_dealt(Side::B),
            ],
            experience_gained: [
                self.session.experience_gained(Side::A),
                self.session.experience_gained(Side::B),
            ],
        }
    }

    /// Hands both combatants (and their rosters) back to the caller.
    pub fn into_combatants(self) -> [Combatant; 2] {
        self.session.into_combatants()
    }
}

impl BattleSession {
    /// Runs a complete battle between two combatants and returns its outcome.
    pub fn start(
        side_a: Combatant,
        side_b: Combatant,
        provider: &mut dyn PlayerActionProvider,
        rng: &mut dyn RandomSource,
        notifier: &mut dyn Notifier,
    ) -> Outcome {
        BattleRunner::new("battle", side_a, side_b).run(provider, rng, notifier)
    }
}

/// Runs a configured battle to completion, returning its summary and the
/// combatants with their post-battle rosters.
pub fn run_battle(
    side_a: Combatant,
    side_b: Combatant,
    provider: &mut dyn PlayerActionProvider,
    rng: &mut dyn RandomSource,
    notifier: &mut dyn Notifier,
    config: &BattleConfig,
) -> (BattleSummary, [Combatant; 2]) {
    let battle_id = format!("{}-vs-{}", side_a.name, side_b.name);
    let mut runner = BattleRunner::new(battle_id, side_a, side_b).with_config(config);
    let outcome = runner.run(provider, rng, notifier);
    let summary = runner.summary_for(outcome);
    (summary, runner.into_combatants())
}
