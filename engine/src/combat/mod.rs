mod enemy;
mod player;

pub use enemy::enemy_turn;
pub use player::player_attack;

use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;
use crate::conditions::{
    self, damage_reduction_bonus, evasion_bonus, is_stunned, tick_buffs, tick_damage_over_time,
    tick_duration, ConditionKind,
};
use crate::dice::{roll_attack, roll_critical_damage, roll_dice_total, DiceRoll};
use crate::rng::RandomStream;

/// Actions granted to the player at the top of each of their turns.
pub const MAX_ACTIONS_PER_TURN: i32 = 3;
/// Combined damage reduction can never exceed this; a confirmed hit always
/// lands for at least 1.
pub const MAX_DAMAGE_REDUCTION: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOwner {
    Player,
    Enemy,
}

/// The full turn-scoped state of one encounter. Created by `initiate_combat`,
/// mutated only by the transition functions (each of which clones first and
/// returns the new value), and frozen once `is_complete` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub combatant: Combatant,
    pub enemies: Vec<Combatant>,
    pub turn_owner: TurnOwner,
    pub round: u32,
    pub actions_remaining: i32,
    pub max_actions_per_turn: i32,
    pub special_encounter: bool,
    /// Append-only human-readable event log; with a fixed seed and action
    /// sequence it is byte-identical across replays, which is what makes an
    /// outcome independently auditable.
    pub log: Vec<String>,
    pub is_complete: bool,
    pub player_victory: bool,
}

/// Outcome of one player action, returned as a value. `success` is false for
/// rule violations and malformed definitions; nothing is thrown for either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub hit: bool,
    pub critical: bool,
    pub attack_roll: i32,
    pub damage: i32,
    pub healing: Option<i32>,
    pub message: String,
}

impl ActionResult {
    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            hit: false,
            critical: false,
            attack_roll: 0,
            damage: 0,
            healing: None,
            message: message.into(),
        }
    }
}

/// Everything one strike needs from its attacker. Player attacks and enemy
/// attacks both funnel through `resolve_strike` with one of these.
pub(crate) struct StrikeSpec<'a> {
    pub attacker_name: &'a str,
    pub bonus: i32,
    pub dice: DiceRoll,
    pub crit_threshold: i32,
    /// Generic multiplier on non-critical base damage only.
    pub noncrit_multiplier: f64,
    /// Weakened/Empowered multiplier from the attacker's own conditions.
    pub condition_multiplier: f64,
    /// The finisher's documented 4x class: exploding-max doubled again.
    pub double_critical: bool,
}

pub(crate) struct StrikeOutcome {
    pub hit: bool,
    pub critical: bool,
    pub attack_roll: i32,
    pub damage: i32,
    pub killed: bool,
}

/// One attack roll against one target, then the damage pipeline: crit path
/// uses exploding-max, non-crit applies the generic multiplier, then the
/// attacker's condition multiplier, then target damage reduction clamped at
/// 95%, floored, minimum 1 once the hit is confirmed.
pub(crate) fn resolve_strike(
    stream: &mut RandomStream,
    spec: &StrikeSpec,
    target: &mut Combatant,
    log: &mut Vec<String>,
) -> StrikeOutcome {
    let roll = roll_attack(stream, spec.bonus, spec.crit_threshold);
    let effective_evasion = target.evasion + evasion_bonus(&target.conditions);
    let hit = roll.total >= effective_evasion;
    log.push(format!(
        "[ATTACK][{}] d20={} total={} vs evasion {} → {}",
        spec.attacker_name,
        roll.d20,
        roll.total,
        effective_evasion,
        if !hit {
            "MISS"
        } else if roll.critical {
            "CRIT!"
        } else {
            "HIT"
        }
    ));
    if !hit {
        return StrikeOutcome {
            hit: false,
            critical: false,
            attack_roll: roll.total,
            damage: 0,
            killed: false,
        };
    }

    let base = if roll.critical {
        let exploded = roll_critical_damage(stream, spec.dice);
        let total = if spec.double_critical {
            exploded * 2
        } else {
            exploded
        };
        total as f64
    } else {
        roll_dice_total(stream, spec.dice) as f64 * spec.noncrit_multiplier
    };
    let reduction =
        (target.damage_reduction + damage_reduction_bonus(&target.conditions)).min(MAX_DAMAGE_REDUCTION);
    let mitigated = base * spec.condition_multiplier * (1.0 - reduction);
    let damage = (mitigated.floor() as i32).max(1);

    let was_alive = target.is_alive();
    target.take_damage(damage);
    let killed = was_alive && target.health <= 0;
    log.push(format!(
        "[DMG][{}] deals {} to {}{}",
        spec.attacker_name,
        damage,
        target.name,
        if killed { " — DOWN" } else { "" }
    ));

    StrikeOutcome {
        hit: true,
        critical: roll.critical,
        attack_roll: roll.total,
        damage,
        killed,
    }
}

/// Build the initial snapshot for an encounter. Action economy starts full;
/// terminal flags start false (though an empty enemy list completes at once).
pub fn initiate_combat(
    combatant: Combatant,
    enemies: Vec<Combatant>,
    is_special_encounter: bool,
) -> CombatSnapshot {
    let mut snapshot = CombatSnapshot {
        combatant,
        enemies,
        turn_owner: TurnOwner::Player,
        round: 1,
        actions_remaining: MAX_ACTIONS_PER_TURN,
        max_actions_per_turn: MAX_ACTIONS_PER_TURN,
        special_encounter: is_special_encounter,
        log: Vec::new(),
        is_complete: false,
        player_victory: false,
    };
    let roster = snapshot
        .enemies
        .iter()
        .map(|e| format!("{} ({} HP)", e.name, e.health))
        .collect::<Vec<_>>()
        .join(", ");
    snapshot.log.push(format!(
        "[START]{} {} vs {}",
        if is_special_encounter { " [SPECIAL]" } else { "" },
        snapshot.combatant.name,
        roster
    ));
    tracing::debug!(
        enemies = snapshot.enemies.len(),
        special = is_special_encounter,
        "combat initiated"
    );
    check_termination(&mut snapshot);
    snapshot
}

pub fn is_combat_complete(snapshot: &CombatSnapshot) -> bool {
    snapshot.is_complete
}

/// Victory/defeat detection, run after every mutating step. Sets the terminal
/// flags; once set, every transition function returns the snapshot untouched.
pub(crate) fn check_termination(snapshot: &mut CombatSnapshot) {
    if snapshot.is_complete {
        return;
    }
    if snapshot.enemies.iter().all(|e| !e.is_alive()) {
        snapshot.is_complete = true;
        snapshot.player_victory = true;
        snapshot.log.push(format!(
            "[END] victory — {} stands in round {}",
            snapshot.combatant.name, snapshot.round
        ));
        tracing::debug!(round = snapshot.round, "combat complete: victory");
    } else if snapshot.combatant.health <= 0 {
        snapshot.is_complete = true;
        snapshot.player_victory = false;
        snapshot.log.push(format!(
            "[END] defeat — {} falls in round {}",
            snapshot.combatant.name, snapshot.round
        ));
        tracing::debug!(round = snapshot.round, "combat complete: defeat");
    }
}

/// Start-of-player-turn phase: slow halving, stun check (a stunned player
/// forfeits the turn with no actions granted), then the owner-phase poison
/// tick — which can end the combat before any action is taken.
pub fn player_turn_start(snapshot: &CombatSnapshot) -> CombatSnapshot {
    let mut snap = snapshot.clone();
    if snap.is_complete {
        return snap;
    }
    if snap.turn_owner != TurnOwner::Player {
        snap.log
            .push("[TURN] ignored player_turn_start: enemy turn in progress".to_string());
        return snap;
    }

    let player = &mut snap.combatant;
    if is_stunned(&player.conditions) {
        snap.log.push(format!(
            "[TURN][{}] is stunned and forfeits the turn",
            player.name
        ));
        tick_duration(&mut player.conditions, ConditionKind::Stun);
        tick_owner_poison(player, &mut snap.log);
        snap.actions_remaining = 0;
        snap.turn_owner = TurnOwner::Enemy;
        check_termination(&mut snap);
        return snap;
    }

    tick_buffs(&mut player.conditions);
    if conditions::has_condition(&player.conditions, ConditionKind::Slow) {
        snap.actions_remaining /= 2;
        snap.log.push(format!(
            "[TURN][{}] is slowed: {} action(s) this turn",
            player.name, snap.actions_remaining
        ));
        tick_duration(&mut player.conditions, ConditionKind::Slow);
    }
    tick_owner_poison(player, &mut snap.log);
    check_termination(&mut snap);
    snap
}

/// Explicit manual turn end (the "end turn" action). Re-checks termination
/// before handing the turn over.
pub fn end_player_turn(snapshot: &CombatSnapshot) -> CombatSnapshot {
    let mut snap = snapshot.clone();
    if snap.is_complete {
        return snap;
    }
    check_termination(&mut snap);
    if snap.is_complete {
        return snap;
    }
    snap.log
        .push(format!("[TURN][{}] ends the turn", snap.combatant.name));
    snap.turn_owner = TurnOwner::Enemy;
    snap.actions_remaining = 0;
    snap
}

/// Enemy-turn-start phase: buff countdown and the poison tick over every
/// living enemy.
pub fn enemy_turn_start(snapshot: &CombatSnapshot) -> CombatSnapshot {
    let mut snap = snapshot.clone();
    if snap.is_complete {
        return snap;
    }
    for enemy in snap.enemies.iter_mut().filter(|e| e.is_alive()) {
        tick_buffs(&mut enemy.conditions);
        tick_owner_poison(enemy, &mut snap.log);
    }
    check_termination(&mut snap);
    snap
}

/// Enemy-turn-end phase: the bleed tick. Bleed runs here for every bearer,
/// the player included.
pub fn enemy_turn_end(snapshot: &CombatSnapshot) -> CombatSnapshot {
    let mut snap = snapshot.clone();
    if snap.is_complete {
        return snap;
    }
    for enemy in snap.enemies.iter_mut().filter(|e| e.is_alive()) {
        tick_bleed(enemy, &mut snap.log);
    }
    tick_bleed(&mut snap.combatant, &mut snap.log);
    check_termination(&mut snap);
    snap
}

fn tick_owner_poison(combatant: &mut Combatant, log: &mut Vec<String>) {
    let dmg = tick_damage_over_time(&mut combatant.conditions, ConditionKind::Poison);
    if dmg > 0 {
        combatant.take_damage(dmg);
        log.push(format!(
            "[COND][{}] takes {} poison damage ({} HP)",
            combatant.name, dmg, combatant.health
        ));
    }
}

fn tick_bleed(combatant: &mut Combatant, log: &mut Vec<String>) {
    let dmg = tick_damage_over_time(&mut combatant.conditions, ConditionKind::Bleed);
    if dmg > 0 {
        combatant.take_damage(dmg);
        log.push(format!(
            "[COND][{}] takes {} bleed damage ({} HP)",
            combatant.name, dmg, combatant.health
        ));
    }
}
