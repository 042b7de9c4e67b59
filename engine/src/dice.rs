use serde::{Deserialize, Serialize};

use crate::rng::RandomStream;

/// A dice expression (`count` dice of `faces` sides, plus `modifier`).
/// Pure value type; every damage and duration roll goes through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub count: u32,
    pub faces: u32,
    #[serde(default)]
    pub modifier: i32,
}

impl DiceRoll {
    pub fn new(count: u32, faces: u32, modifier: i32) -> Self {
        Self {
            count,
            faces,
            modifier,
        }
    }

    /// Highest total the dice alone can produce (modifier excluded).
    pub fn max_dice_value(&self) -> i32 {
        (self.count * self.faces) as i32
    }
}

/// Outcome of a d20 to-hit roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRoll {
    pub d20: i32,
    pub total: i32,
    pub critical: bool,
}

/// Sum of `count` independent dice plus the modifier.
pub fn roll_dice_total(stream: &mut RandomStream, roll: DiceRoll) -> i32 {
    let mut total = roll.modifier;
    for _ in 0..roll.count {
        total += stream.roll_die(roll.faces);
    }
    total
}

/// One d20 draw; `critical` when the raw die meets the threshold.
pub fn roll_attack(stream: &mut RandomStream, bonus: i32, crit_threshold: i32) -> AttackRoll {
    let d20 = stream.roll_die(20);
    AttackRoll {
        d20,
        total: d20 + bonus,
        critical: d20 >= crit_threshold,
    }
}

/// Exploding-max critical damage: the dice's maximum possible value plus one
/// full reroll of the same dice, plus modifier. Strictly more generous than
/// doubling a single roll, and reproduced exactly rather than approximated.
pub fn roll_critical_damage(stream: &mut RandomStream, roll: DiceRoll) -> i32 {
    let mut total = roll.max_dice_value() + roll.modifier;
    for _ in 0..roll.count {
        total += stream.roll_die(roll.faces);
    }
    total
}

/// One draw; succeeds when `draw * 100 < chance`.
pub fn check_percentage(stream: &mut RandomStream, chance: f64) -> bool {
    stream.next() * 100.0 < chance
}
