use crate::battle::state::{BattleSession, Outcome, Side};
use crate::combatant::PlayerAction;
use crate::creature::AttackOutcome;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Battle lifecycle
    BattleStarted,
    CreatureSentOut {
        side: Side,
        creature: String,
    },
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded {
        turn_number: u32,
    },

    // Actions
    CreatureSwitched {
        side: Side,
        old_creature: Option<String>,
        new_creature: String,
    },
    AttackResolved {
        side: Side,
        attacker: String,
        defender: String,
        outcome: AttackOutcome,
    },
    ActionRejected {
        side: Side,
        action: PlayerAction,
        reason: String,
    },
    ActionSkipped {
        side: Side,
    },
    Fled {
        side: Side,
    },

    // Knockouts
    CreatureFainted {
        side: Side,
        creature: String,
    },
    ExperienceGained {
        side: Side,
        creature: String,
        amount: u32,
    },
    ReplacementSent {
        side: Side,
        creature: String,
    },

    // Battle End
    SideDefeated {
        side: Side,
    },
    BattleEnded {
        outcome: Outcome,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, session: &BattleSession) -> Option<String> {
        let name = |side: Side| session.combatant(side).name.as_str();

        match self {
            BattleEvent::BattleStarted => Some(format!(
                "{} challenges {}!",
                name(Side::A),
                name(Side::B)
            )),
            BattleEvent::CreatureSentOut { side, creature } => {
                Some(format!("{} sends out {}!", name(*side), creature))
            }
            BattleEvent::TurnStarted { turn_number } => {
                Some(format!("=== Turn {} ===", turn_number))
            }
            BattleEvent::TurnEnded { .. } => None,

            BattleEvent::CreatureSwitched {
                side,
                old_creature,
                new_creature,
            } => Some(format!(
                "{} recalls {} and sends {}!",
                name(*side),
                old_creature.as_deref().unwrap_or("nobody"),
                new_creature
            )),
            BattleEvent::AttackResolved {
                attacker, outcome, ..
            } => match outcome {
                AttackOutcome::Hit(hit) => Some(hit.narrative.clone()),
                AttackOutcome::Failed { reason } => {
                    Some(format!("{}'s attack failed: {}.", attacker, reason))
                }
            },
            BattleEvent::ActionRejected { side, action, reason } => Some(format!(
                "{} can't {}: {}",
                name(*side),
                action.to_string().to_lowercase(),
                reason
            )),
            BattleEvent::ActionSkipped { .. } => None,
            BattleEvent::Fled { side } => Some(format!("{} fled the battle!", name(*side))),

            BattleEvent::CreatureFainted { creature, .. } => {
                Some(format!("{} is knocked out!", creature))
            }
            BattleEvent::ExperienceGained {
                creature, amount, ..
            } => Some(format!("{} gained {} experience points!", creature, amount)),
            BattleEvent::ReplacementSent { side, creature } => {
                Some(format!("{} sends out {}!", name(*side), creature))
            }

            BattleEvent::SideDefeated { side } => {
                Some(format!("{} is out of usable creatures!", name(*side)))
            }
            BattleEvent::BattleEnded { outcome } => match outcome.winner() {
                Some(side) => Some(format!("{} has won the battle!", name(side))),
                None if *outcome == Outcome::Draw => {
                    Some("The battle ended in a draw!".to_string())
                }
                None => Some("The battle ended without a winner.".to_string()),
            },
        }
    }
}

/// Receives structured battle events for rendering or logging.
pub trait Notifier {
    fn notify(&mut self, event: &BattleEvent, session: &BattleSession);
}

/// Event bus for collecting battle events.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Print all events with a header. Handy in tests run with `--nocapture`.
    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        print!("{}", self);
    }
}

impl Notifier for EventBus {
    fn notify(&mut self, event: &BattleEvent, _session: &BattleSession) {
        self.push(event.clone());
    }
}

impl std::fmt::Display for EventBus {
    /// Format the EventBus for printing. Shows debug format of all events.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Forwards formatted events to `tracing`. Silent events are logged at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, event: &BattleEvent, session: &BattleSession) {
        match (event, event.format(session)) {
            (BattleEvent::ActionRejected { .. }, Some(text)) => {
                tracing::warn!(battle = %session.battle_id, "{}", text)
            }
            (_, Some(text)) => tracing::info!(battle = %session.battle_id, "{}", text),
            (_, None) => tracing::trace!(battle = %session.battle_id, ?event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;
    use crate::creature::{AttackFailure, Creature};
    use schema::ElementType;

    fn session() -> BattleSession {
        let mut a = Combatant::new("Sacha");
        a.add_creature(Creature::new("Salameche", ElementType::Fire, 5))
            .unwrap();
        let mut b = Combatant::npc("Regis");
        b.add_creature(Creature::new("Bulbizarre", ElementType::Plant, 5))
            .unwrap();
        BattleSession::new("test", a, b)
    }

    #[test]
    fn test_silent_events_return_none() {
        let session = session();
        let silent_events = vec![
            BattleEvent::TurnEnded { turn_number: 1 },
            BattleEvent::ActionSkipped { side: Side::B },
        ];
        for event in silent_events {
            assert!(
                event.format(&session).is_none(),
                "Event {:?} should be silent but returned text",
                event
            );
        }
    }

    #[test]
    fn test_event_text_samples() {
        let session = session();

        assert_eq!(
            BattleEvent::TurnStarted { turn_number: 5 }.format(&session),
            Some("=== Turn 5 ===".to_string())
        );
        assert_eq!(
            BattleEvent::AttackResolved {
                side: Side::A,
                attacker: "Salameche".to_string(),
                defender: "Bulbizarre".to_string(),
                outcome: AttackOutcome::Failed {
                    reason: AttackFailure::Missed
                },
            }
            .format(&session),
            Some("Salameche's attack failed: attack missed.".to_string())
        );
        assert_eq!(
            BattleEvent::BattleEnded {
                outcome: Outcome::WinnerB
            }
            .format(&session),
            Some("Regis has won the battle!".to_string())
        );
        assert_eq!(
            BattleEvent::BattleEnded {
                outcome: Outcome::Draw
            }
            .format(&session),
            Some("The battle ended in a draw!".to_string())
        );
        assert_eq!(
            BattleEvent::CreatureSwitched {
                side: Side::A,
                old_creature: Some("Salameche".to_string()),
                new_creature: "Carapuce".to_string(),
            }
            .format(&session),
            Some("Sacha recalls Salameche and sends Carapuce!".to_string())
        );
    }

    #[test]
    fn test_event_bus_collects_notifications() {
        let session = session();
        let mut bus = EventBus::new();
        bus.notify(&BattleEvent::BattleStarted, &session);
        bus.notify(&BattleEvent::TurnStarted { turn_number: 1 }, &session);

        assert_eq!(bus.len(), 2);
        assert!(format!("{}", bus).contains("TurnStarted"));
        bus.clear();
        assert!(bus.is_empty());
    }
}
