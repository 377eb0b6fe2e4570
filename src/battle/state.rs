use crate::combatant::Combatant;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two sides of a battle. Side A is conventionally the player.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "side A"),
            Side::B => write!(f, "side B"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Pending,
    InProgress,
    Concluded,
}

/// Terminal result of a battle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    WinnerA,
    WinnerB,
    /// Both rosters were fully defeated at the same time.
    Draw,
    /// A side fled; nobody wins.
    Fled,
}

impl Outcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::WinnerA => Some(Side::A),
            Outcome::WinnerB => Some(Side::B),
            Outcome::Draw | Outcome::Fled => None,
        }
    }
}

/// State of one battle between two combatants.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleSession {
    pub battle_id: String,
    sides: [Combatant; 2],
    turn_number: u32,
    state: SessionState,
    damage_dealt: [u32; 2],
    experience_gained: [u32; 2],
    outcome: Option<Outcome>,
    pub allow_champion_flee: bool,
}

impl BattleSession {
    pub fn new(id: impl Into<String>, side_a: Combatant, side_b: Combatant) -> Self {
        Self {
            battle_id: id.into(),
            sides: [side_a, side_b],
            turn_number: 0,
            state: SessionState::Pending,
            damage_dealt: [0, 0],
            experience_gained: [0, 0],
            outcome: None,
            allow_champion_flee: false,
        }
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        &self.sides[side.index()]
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        &mut self.sides[side.index()]
    }

    /// Split borrow: the acting side immutably and its opponent mutably.
    pub fn actor_and_target_mut(&mut self, actor: Side) -> (&Combatant, &mut Combatant) {
        let [a, b] = &mut self.sides;
        match actor {
            Side::A => (&*a, b),
            Side::B => (&*b, a),
        }
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn damage_dealt(&self, side: Side) -> u32 {
        self.damage_dealt[side.index()]
    }

    pub fn experience_gained(&self, side: Side) -> u32 {
        self.experience_gained[side.index()]
    }

    /// Set iff the session has concluded.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_concluded(&self) -> bool {
        self.state == SessionState::Concluded
    }

    /// Whether `side` may flee from its current opponent.
    pub fn flee_permitted(&self, side: Side) -> bool {
        self.allow_champion_flee || !self.combatant(side.opponent()).is_champion()
    }

    pub(crate) fn begin(&mut self) {
        if self.state == SessionState::Pending {
            self.state = SessionState::InProgress;
        }
    }

    pub(crate) fn advance_turn(&mut self) -> u32 {
        self.turn_number += 1;
        self.turn_number
    }

    pub(crate) fn record_damage(&mut self, side: Side, amount: u32) {
        let total = &mut self.damage_dealt[side.index()];
        *total = total.saturating_add(amount);
    }

    pub(crate) fn record_experience(&mut self, side: Side, amount: u32) {
        let total = &mut self.experience_gained[side.index()];
        *total = total.saturating_add(amount);
    }

    pub(crate) fn conclude(&mut self, outcome: Outcome) {
        self.state = SessionState::Concluded;
        self.outcome = Some(outcome);
    }

    /// Outcome implied by the rosters alone, if either side is fully defeated.
    pub fn roster_outcome(&self) -> Option<Outcome> {
        match (
            self.sides[0].is_roster_defeated(),
            self.sides[1].is_roster_defeated(),
        ) {
            (true, true) => Some(Outcome::Draw),
            (true, false) => Some(Outcome::WinnerB),
            (false, true) => Some(Outcome::WinnerA),
            (false, false) => None,
        }
    }

    pub fn into_combatants(self) -> [Combatant; 2] {
        self.sides
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::Creature;
    use schema::ElementType;

    fn session() -> BattleSession {
        let mut a = Combatant::new("Sacha");
        a.add_creature(Creature::new("Salameche", ElementType::Fire, 5))
            .unwrap();
        let mut b = Combatant::champion("Ondine", ElementType::Water);
        b.add_creature(Creature::new("Stari", ElementType::Water, 6))
            .unwrap();
        BattleSession::new("test", a, b)
    }

    #[test]
    fn test_roster_outcome() {
        let mut session = session();
        assert_eq!(session.roster_outcome(), None);

        session.combatant_mut(Side::B).creature_mut(0).unwrap().set_hp(0);
        assert_eq!(session.roster_outcome(), Some(Outcome::WinnerA));

        session.combatant_mut(Side::A).creature_mut(0).unwrap().set_hp(0);
        assert_eq!(session.roster_outcome(), Some(Outcome::Draw));
        assert_eq!(Outcome::Draw.winner(), None);
    }

    #[test]
    fn test_lifecycle_sets_outcome_only_on_conclusion() {
        let mut session = session();
        assert_eq!(session.state(), SessionState::Pending);
        assert_eq!(session.turn_number(), 0);

        session.begin();
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.outcome(), None);

        session.conclude(Outcome::Fled);
        assert!(session.is_concluded());
        assert_eq!(session.outcome(), Some(Outcome::Fled));
    }

    #[test]
    fn test_flee_from_champion_needs_permission() {
        let mut session = session();
        assert!(!session.flee_permitted(Side::A));
        assert!(session.flee_permitted(Side::B));

        session.allow_champion_flee = true;
        assert!(session.flee_permitted(Side::A));
    }
}
