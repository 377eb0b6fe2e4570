use crate::battle::calculators::{
    base_damage, final_damage, is_miss, VARIABILITY_MAX, VARIABILITY_MIN,
};
use crate::battle::rng::RandomSource;
use schema::{Effectiveness, ElementType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an attack did not land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackFailure {
    AttackerDown,
    TargetDown,
    Missed,
}

impl fmt::Display for AttackFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackFailure::AttackerDown => write!(f, "attacker down"),
            AttackFailure::TargetDown => write!(f, "target already down"),
            AttackFailure::Missed => write!(f, "attack missed"),
        }
    }
}

/// Details of an attack that connected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitReport {
    pub damage: u32,
    pub effectiveness: Effectiveness,
    pub knocked_out: bool,
    pub narrative: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttackOutcome {
    Failed { reason: AttackFailure },
    Hit(HitReport),
}

impl AttackOutcome {
    /// Damage dealt, zero for any failure.
    pub fn damage(&self) -> u32 {
        match self {
            AttackOutcome::Hit(hit) => hit.damage,
            AttackOutcome::Failed { .. } => 0,
        }
    }

    pub fn knocked_out(&self) -> bool {
        matches!(self, AttackOutcome::Hit(HitReport { knocked_out: true, .. }))
    }

    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            AttackOutcome::Failed {
                reason: AttackFailure::Missed
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CreatureRecord")]
pub struct Creature {
    pub name: String,
    element: ElementType,
    level: u8,
    max_hp: u16,
    current_hp: u16,
    attack: u16,
    defense: u16,
    speed: u16,
    incapacitated: bool,
    // Recorded only; there is no leveling.
    #[serde(default)]
    experience: u32,
}

/// Stored form of a creature, normalised on load. `incapacitated` is
/// rederived from HP, so a stored flag is ignored.
#[derive(Deserialize)]
struct CreatureRecord {
    name: String,
    element: ElementType,
    level: u8,
    max_hp: u16,
    current_hp: u16,
    attack: u16,
    defense: u16,
    speed: u16,
    #[serde(default)]
    experience: u32,
}

impl From<CreatureRecord> for Creature {
    fn from(record: CreatureRecord) -> Self {
        let mut creature = Creature::with_stats(
            record.name,
            record.element,
            record.level,
            record.max_hp,
            record.attack,
            record.defense,
            record.speed,
        );
        creature.current_hp = record.current_hp.min(creature.max_hp);
        creature.incapacitated = creature.current_hp == 0;
        creature.experience = record.experience;
        creature
    }
}

impl Creature {
    /// Create a creature with stats derived from its level and element.
    ///
    /// Base stats: HP = 20 + 5·lvl, Attack = 5 + 2·lvl, Defense = 3 + lvl,
    /// Speed = 3 + lvl. The element's stat adjustment is added on top.
    pub fn new(name: impl Into<String>, element: ElementType, level: u8) -> Self {
        let level = level.max(1);
        let lvl = u16::from(level);
        let bonus = element.stat_adjustment();
        let max_hp = 20 + lvl * 5 + bonus.hp;

        Creature {
            name: name.into(),
            element,
            level,
            max_hp,
            current_hp: max_hp,
            attack: 5 + lvl * 2 + bonus.attack,
            defense: 3 + lvl + bonus.defense,
            speed: 3 + lvl + bonus.speed,
            incapacitated: false,
            experience: 0,
        }
    }

    /// Create a creature with explicit stats, at full health.
    pub fn with_stats(
        name: impl Into<String>,
        element: ElementType,
        level: u8,
        max_hp: u16,
        attack: u16,
        defense: u16,
        speed: u16,
    ) -> Self {
        let max_hp = max_hp.max(1);
        Creature {
            name: name.into(),
            element,
            level: level.max(1),
            max_hp,
            current_hp: max_hp,
            attack: attack.max(1),
            defense: defense.max(1),
            speed: speed.max(1),
            incapacitated: false,
            experience: 0,
        }
    }

    pub fn element(&self) -> ElementType {
        self.element
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn max_hp(&self) -> u16 {
        self.max_hp
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn attack(&self) -> u16 {
        self.attack
    }

    pub fn defense(&self) -> u16 {
        self.defense
    }

    pub fn speed(&self) -> u16 {
        self.speed
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn is_incapacitated(&self) -> bool {
        self.incapacitated
    }

    /// Current HP as a fraction of max HP, in `[0, 1]`.
    pub fn hp_ratio(&self) -> f64 {
        f64::from(self.current_hp) / f64::from(self.max_hp)
    }

    /// Set current HP directly, clamped to `[0, max_hp]`. Keeps the
    /// incapacitated flag in sync.
    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp);
        self.incapacitated = self.current_hp == 0;
    }

    /// Subtract damage, clamped at zero. Returns true if this call knocked the creature out.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.incapacitated {
            return false;
        }
        let amount = amount.min(u32::from(self.current_hp)) as u16;
        self.current_hp -= amount;
        if self.current_hp == 0 {
            self.incapacitated = true;
            return true;
        }
        false
    }

    /// Restore to full health. Idempotent.
    pub fn heal(&mut self) {
        self.current_hp = self.max_hp;
        self.incapacitated = false;
    }

    pub fn gain_experience(&mut self, amount: u32) {
        self.experience = self.experience.saturating_add(amount);
    }

    /// Resolve one attack from `attacker` against `defender`.
    ///
    /// Draws an accuracy roll and then a damage spread from `rng`; no draws are
    /// made when either side is already down. `defender` is only mutated on a
    /// successful hit.
    pub fn resolve_attack(
        attacker: &Creature,
        defender: &mut Creature,
        rng: &mut dyn RandomSource,
    ) -> AttackOutcome {
        if attacker.is_incapacitated() {
            return AttackOutcome::Failed {
                reason: AttackFailure::AttackerDown,
            };
        }
        if defender.is_incapacitated() {
            return AttackOutcome::Failed {
                reason: AttackFailure::TargetDown,
            };
        }

        let accuracy_roll = rng.uniform(0.0, 1.0);
        if is_miss(accuracy_roll) {
            return AttackOutcome::Failed {
                reason: AttackFailure::Missed,
            };
        }

        let base = base_damage(attacker, defender);
        let effectiveness = attacker.element.effectiveness_against(defender.element);
        let variability = rng.uniform(VARIABILITY_MIN, VARIABILITY_MAX);
        let damage = final_damage(base, effectiveness, variability);

        let knocked_out = defender.take_damage(damage);

        let mut narrative = format!(
            "{} dealt {} damage to {}!",
            attacker.name, damage, defender.name
        );
        match effectiveness {
            Effectiveness::SuperEffective => narrative.push_str(" It's super effective!"),
            Effectiveness::Resisted => narrative.push_str(" It's not very effective..."),
            Effectiveness::Neutral => {}
        }
        if knocked_out {
            narrative.push_str(&format!(" {} is KO!", defender.name));
        }

        AttackOutcome::Hit(HitReport {
            damage,
            effectiveness,
            knocked_out,
            narrative,
        })
    }
}

impl fmt::Display for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) Lv.{} - HP: {}/{}",
            self.name, self.element, self.level, self.current_hp, self.max_hp
        )
    }
}
