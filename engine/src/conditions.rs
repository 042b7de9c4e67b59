use serde::{Deserialize, Serialize};

/// Per-round poison damage per stack.
pub const POISON_TICK_DAMAGE: i32 = 3;
/// Per-round bleed damage per stack.
pub const BLEED_TICK_DAMAGE: i32 = 2;
/// Evasion granted per Evasive stack.
pub const EVASIVE_BONUS: i32 = 3;
/// Damage reduction granted per Fortified stack.
pub const FORTIFIED_BONUS: f64 = 0.10;
/// Outgoing damage multiplier while Weakened.
pub const WEAKENED_MULTIPLIER: f64 = 0.9;
/// Outgoing damage multiplier while Empowered.
pub const EMPOWERED_MULTIPLIER: f64 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Poison,
    Bleed,
    Stun,
    Slow,
    Evasive,
    Fortified,
    Weakened,
    Empowered,
}

impl ConditionKind {
    /// Damage applied per tick per stack; zero for non-damaging conditions.
    pub fn tick_damage(self) -> i32 {
        match self {
            ConditionKind::Poison => POISON_TICK_DAMAGE,
            ConditionKind::Bleed => BLEED_TICK_DAMAGE,
            _ => 0,
        }
    }
}

/// A timed effect on one combatant. `rounds_remaining` only decreases at the
/// kind's designated tick phase and the condition is removed the moment it
/// reaches zero; `stacks` scales tick damage and modifier magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCondition {
    pub kind: ConditionKind,
    pub rounds_remaining: u32,
    pub stacks: u32,
}

impl StatusCondition {
    pub fn new(kind: ConditionKind, rounds_remaining: u32, stacks: u32) -> Self {
        Self {
            kind,
            rounds_remaining,
            stacks,
        }
    }
}

/// Re-application policy: refresh the duration to the incoming value and keep
/// the larger stack count. Durations never sum.
pub fn apply_condition(conditions: &mut Vec<StatusCondition>, incoming: StatusCondition) {
    if let Some(existing) = conditions.iter_mut().find(|c| c.kind == incoming.kind) {
        existing.rounds_remaining = incoming.rounds_remaining;
        existing.stacks = existing.stacks.max(incoming.stacks);
    } else {
        conditions.push(incoming);
    }
}

pub fn has_condition(conditions: &[StatusCondition], kind: ConditionKind) -> bool {
    conditions.iter().any(|c| c.kind == kind)
}

pub fn is_stunned(conditions: &[StatusCondition]) -> bool {
    has_condition(conditions, ConditionKind::Stun)
}

/// Extra evasion from active conditions.
pub fn evasion_bonus(conditions: &[StatusCondition]) -> i32 {
    conditions
        .iter()
        .filter(|c| c.kind == ConditionKind::Evasive)
        .map(|c| EVASIVE_BONUS * c.stacks as i32)
        .sum()
}

/// Extra damage reduction from active conditions (uncapped here; the damage
/// pipeline clamps the combined total at 0.95).
pub fn damage_reduction_bonus(conditions: &[StatusCondition]) -> f64 {
    conditions
        .iter()
        .filter(|c| c.kind == ConditionKind::Fortified)
        .map(|c| FORTIFIED_BONUS * c.stacks as f64)
        .sum()
}

/// Multiplier on outgoing damage from the attacker's own conditions.
pub fn outgoing_damage_multiplier(conditions: &[StatusCondition]) -> f64 {
    let mut mult = 1.0;
    if has_condition(conditions, ConditionKind::Weakened) {
        mult *= WEAKENED_MULTIPLIER;
    }
    if has_condition(conditions, ConditionKind::Empowered) {
        mult *= EMPOWERED_MULTIPLIER;
    }
    mult
}

/// Tick one damage-over-time kind: returns the total damage to apply
/// (`tick_damage * stacks`), decrements the duration, and removes the
/// condition at zero so it never lingers an extra tick.
pub fn tick_damage_over_time(conditions: &mut Vec<StatusCondition>, kind: ConditionKind) -> i32 {
    let mut total = 0;
    for c in conditions.iter_mut() {
        if c.kind == kind && c.rounds_remaining > 0 {
            total += kind.tick_damage() * c.stacks as i32;
            c.rounds_remaining -= 1;
        }
    }
    conditions.retain(|c| !(c.kind == kind && c.rounds_remaining == 0));
    total
}

/// Count down one non-damaging condition (stun after it eats a turn, slow
/// after its halving has been applied). Removed at zero like the DoTs.
pub fn tick_duration(conditions: &mut Vec<StatusCondition>, kind: ConditionKind) {
    for c in conditions.iter_mut() {
        if c.kind == kind && c.rounds_remaining > 0 {
            c.rounds_remaining -= 1;
        }
    }
    conditions.retain(|c| !(c.kind == kind && c.rounds_remaining == 0));
}

/// Owner-turn-start countdown for the modifier conditions.
pub fn tick_buffs(conditions: &mut Vec<StatusCondition>) {
    for kind in [
        ConditionKind::Evasive,
        ConditionKind::Fortified,
        ConditionKind::Weakened,
        ConditionKind::Empowered,
    ] {
        tick_duration(conditions, kind);
    }
}
