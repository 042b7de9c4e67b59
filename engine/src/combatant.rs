use serde::{Deserialize, Serialize};

use crate::conditions::{ConditionKind, StatusCondition};
use crate::dice::DiceRoll;

/// How many recent damage-received entries a combatant remembers. Consumed by
/// time-reversal heals, which undo the most recent hits.
pub const DAMAGE_HISTORY_WINDOW: usize = 5;

/// What a selected enemy ability does. Mirrors the player-side attack shapes
/// where the two overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityEffect {
    /// Straight attack with its own dice and to-hit bonus.
    Damage { dice: DiceRoll, bonus: i32 },
    /// Grant the enemy itself a condition (evasion/defense buffs).
    SelfBuff {
        condition: ConditionKind,
        rounds: u32,
        stacks: u32,
    },
    /// Attack that inflicts a condition on the player when it lands.
    Inflict {
        dice: DiceRoll,
        bonus: i32,
        condition: ConditionKind,
        rounds: u32,
        stacks: u32,
    },
    /// Snatch currency and leave the fight; the stolen amount is reported to
    /// the caller through the log, the wallet itself lives outside the core.
    StealAndFlee { amount_dice: DiceRoll },
    /// Heal back the damage recorded in the recent damage-received history.
    Rewind,
    /// Heavy swing that stuns the enemy itself when it misses.
    RecklessSmash {
        dice: DiceRoll,
        bonus: i32,
        self_stun_rounds: u32,
    },
}

/// One named special ability in an enemy's repertoire, with its gates:
/// a trigger probability, an optional low-health threshold, and an optional
/// per-combat use budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyAbility {
    pub name: String,
    pub effect: AbilityEffect,
    /// Percentage chance the enemy attempts this ability on its turn.
    pub chance: f64,
    /// If set, the ability is only considered at or below this health
    /// fraction (0.39 = usable from 39% health downward).
    #[serde(default)]
    pub health_threshold: Option<f64>,
    /// If set, decremented per use; the ability is skipped at zero.
    #[serde(default)]
    pub uses_remaining: Option<u32>,
}

/// Shared player/enemy combat state. Player-side derived stats and the
/// enemy-only bookkeeping (ability budgets, damage history, flee flag) live
/// in the same shape so strike resolution is symmetric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    pub stamina: i32,
    pub max_stamina: i32,
    pub attack_bonus: i32,
    pub attack_dice: DiceRoll,
    pub evasion: i32,
    pub damage_reduction: f64,
    #[serde(default)]
    pub conditions: Vec<StatusCondition>,
    #[serde(default)]
    pub abilities: Vec<EnemyAbility>,
    #[serde(default)]
    pub damage_taken_history: Vec<i32>,
    /// Set by the once-per-target finisher when it has been spent on this
    /// combatant.
    #[serde(default)]
    pub finisher_spent: bool,
    #[serde(default)]
    pub fled: bool,
}

impl Combatant {
    pub fn new(name: impl Into<String>, health: i32, stamina: i32) -> Self {
        Self {
            name: name.into(),
            health,
            max_health: health,
            stamina,
            max_stamina: stamina,
            attack_bonus: 0,
            attack_dice: DiceRoll::new(1, 4, 0),
            evasion: 10,
            damage_reduction: 0.0,
            conditions: Vec::new(),
            abilities: Vec::new(),
            damage_taken_history: Vec::new(),
            finisher_spent: false,
            fled: false,
        }
    }

    /// Alive means still standing and still present; a fled enemy no longer
    /// blocks victory and takes no further part in the encounter.
    pub fn is_alive(&self) -> bool {
        self.health > 0 && !self.fled
    }

    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f64 / self.max_health as f64
    }

    /// Apply already-mitigated damage: clamp at the zero floor and remember
    /// the amount actually lost in the rolling history.
    pub fn take_damage(&mut self, amount: i32) {
        let lost = amount.min(self.health);
        self.health -= lost;
        self.damage_taken_history.push(lost);
        if self.damage_taken_history.len() > DAMAGE_HISTORY_WINDOW {
            self.damage_taken_history.remove(0);
        }
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let gained = amount.max(0).min(self.max_health - self.health);
        self.health += gained;
        gained
    }

    /// Drain and sum the damage history (time-reversal heals).
    pub fn drain_damage_history(&mut self) -> i32 {
        let total = self.damage_taken_history.iter().sum();
        self.damage_taken_history.clear();
        total
    }
}
