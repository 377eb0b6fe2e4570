use crate::creature::Creature;
use schema::Effectiveness;

/// Accuracy rolls strictly above this value miss (5% miss chance).
pub const MISS_THRESHOLD: f64 = 0.95;
/// Inclusive bounds of the random damage spread.
pub const VARIABILITY_MIN: f64 = 0.85;
pub const VARIABILITY_MAX: f64 = 1.0;
/// Experience awarded per level of a knocked out creature.
pub const EXPERIENCE_PER_LEVEL: u32 = 10;

pub fn is_miss(accuracy_roll: f64) -> bool {
    accuracy_roll > MISS_THRESHOLD
}

/// `(attack * level / 5) - (defense / 2)`, never below 1.
pub fn base_damage(attacker: &Creature, defender: &Creature) -> u32 {
    let offense = i64::from(attacker.attack()) * i64::from(attacker.level()) / 5;
    let guard = i64::from(defender.defense()) / 2;
    (offense - guard).max(1) as u32
}

/// Applies the type multiplier and the damage spread to a base value.
/// A successful hit always deals at least 1 damage.
pub fn final_damage(base: u32, effectiveness: Effectiveness, variability: f64) -> u32 {
    let scaled = (f64::from(base) * effectiveness.multiplier() * variability).floor();
    (scaled as u32).max(1)
}

pub fn experience_for(defeated: &Creature) -> u32 {
    u32::from(defeated.level()) * EXPERIENCE_PER_LEVEL
}
