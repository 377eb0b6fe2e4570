// In: src/lib.rs

//! Creature Arena Battle Engine
//!
//! Turn-by-turn creature battles: two combatants send out creatures with an
//! elemental type and fight until one roster is fully incapacitated. The
//! engine only emits events and reports; input and rendering are supplied by
//! the caller through the provider and notifier traits.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod combatant;
pub mod config;
pub mod creature;
pub mod errors;
pub mod roster_store;
pub mod teams;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{CreatureTemplate, Effectiveness, ElementType, Rank, StatAdjustment, TeamTemplate};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::events::{BattleEvent, EventBus, Notifier, TracingNotifier};
pub use battle::runner::{run_battle, BattleInfo, BattleRunner, BattleSummary, SideInfo};
pub use battle::state::{BattleSession, Outcome, SessionState, Side};
pub use battle::turn_orchestrator::{resolve_turn, TurnContext, TurnReport};

// Collaborator interfaces.
pub use battle::provider::{PlayerActionProvider, PolicyProvider, ScriptedProvider};
pub use battle::rng::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};
pub use roster_store::{JsonRosterStore, MemoryRosterStore, RosterStore};

// Core runtime types for a battle.
pub use combatant::{Combatant, PlayerAction, PolicyKind};
pub use creature::{AttackOutcome, Creature};

pub use config::BattleConfig;

// Crate-specific error and result types.
pub use errors::{
    ActionError, ConfigError, RosterError, SelectionError, StoreError, StoreResult, TemplateError,
    TemplateResult,
};
