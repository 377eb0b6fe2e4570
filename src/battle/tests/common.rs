use crate::battle::events::EventBus;
use crate::battle::provider::PlayerActionProvider;
use crate::battle::rng::{RandomSource, ScriptedRandom};
use crate::battle::state::BattleSession;
use crate::battle::turn_orchestrator::{resolve_turn, TurnContext, TurnReport};
use crate::combatant::Combatant;
use crate::creature::Creature;
use schema::ElementType;

/// A builder for creating test creatures with common defaults.
///
/// # Example
/// ```ignore
/// let titan = TestCreatureBuilder::new("Titan", ElementType::Fire, 10)
///     .with_stats(500, 30, 50, 50)
///     .with_hp(120)
///     .build();
/// ```
pub struct TestCreatureBuilder {
    name: String,
    element: ElementType,
    level: u8,
    stats: Option<(u16, u16, u16, u16)>,
    current_hp: Option<u16>,
}

impl TestCreatureBuilder {
    pub fn new(name: &str, element: ElementType, level: u8) -> Self {
        Self {
            name: name.to_string(),
            element,
            level,
            stats: None,
            current_hp: None,
        }
    }

    /// Explicit `(max_hp, attack, defense, speed)` instead of the level formula.
    pub fn with_stats(mut self, max_hp: u16, attack: u16, defense: u16, speed: u16) -> Self {
        self.stats = Some((max_hp, attack, defense, speed));
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> Creature {
        let mut creature = match self.stats {
            Some((max_hp, attack, defense, speed)) => Creature::with_stats(
                self.name,
                self.element,
                self.level,
                max_hp,
                attack,
                defense,
                speed,
            ),
            None => Creature::new(self.name, self.element, self.level),
        };
        if let Some(hp) = self.current_hp {
            creature.set_hp(hp);
        }
        creature
    }
}

/// A level-10 fire creature that one-shots level-5 plants and barely feels their attacks.
pub fn titan() -> Creature {
    TestCreatureBuilder::new("Titan", ElementType::Fire, 10)
        .with_stats(500, 30, 50, 50)
        .build()
}

pub fn salameche() -> Creature {
    Creature::new("Salameche", ElementType::Fire, 5)
}

pub fn carapuce() -> Creature {
    Creature::new("Carapuce", ElementType::Water, 5)
}

pub fn bulbizarre() -> Creature {
    Creature::new("Bulbizarre", ElementType::Plant, 5)
}

/// Creates a player-controlled combatant (no policy) with the given roster.
pub fn create_test_player(name: &str, roster: Vec<Creature>) -> Combatant {
    let mut combatant = Combatant::new(name);
    for creature in roster {
        combatant
            .add_creature(creature)
            .expect("test roster should fit");
    }
    combatant
}

/// Creates an AI-controlled combatant with the given roster.
pub fn create_test_npc(name: &str, roster: Vec<Creature>) -> Combatant {
    let mut combatant = Combatant::npc(name);
    for creature in roster {
        combatant
            .add_creature(creature)
            .expect("test roster should fit");
    }
    combatant
}

pub fn create_test_battle(side_a: Combatant, side_b: Combatant) -> BattleSession {
    BattleSession::new("test_battle", side_a, side_b)
}

/// RNG that lets `attacks` attacks hit with maximum damage.
pub fn predictable_rng(attacks: usize) -> ScriptedRandom {
    ScriptedRandom::always_hit(attacks)
}

/// Resolves one turn with the given collaborators.
pub fn run_test_turn(
    session: &mut BattleSession,
    provider: &mut dyn PlayerActionProvider,
    rng: &mut dyn RandomSource,
    bus: &mut EventBus,
) -> TurnReport {
    let mut ctx = TurnContext {
        provider,
        rng,
        notifier: bus,
    };
    resolve_turn(session, &mut ctx)
}
