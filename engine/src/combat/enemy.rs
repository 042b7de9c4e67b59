use crate::combat::{check_termination, resolve_strike, CombatSnapshot, StrikeSpec, TurnOwner};
use crate::combatant::AbilityEffect;
use crate::conditions::{
    apply_condition, is_stunned, outgoing_damage_multiplier, tick_duration, ConditionKind,
    StatusCondition,
};
use crate::dice::{check_percentage, roll_dice_total, DiceRoll};
use crate::rng::RandomStream;

/// Default crit threshold for enemy attacks; enemies have no lowered-crit
/// weapons.
const ENEMY_CRIT_THRESHOLD: i32 = 20;

/// Run the enemy phase: living, non-stunned enemies act in encounter order,
/// each independently choosing a gated special ability or falling back to a
/// standard attack. When every enemy has acted the turn returns to the player
/// and the round counter increments.
pub fn enemy_turn(snapshot: &CombatSnapshot, stream: &mut RandomStream) -> CombatSnapshot {
    let mut snap = snapshot.clone();
    if snap.is_complete {
        return snap;
    }
    if snap.turn_owner != TurnOwner::Enemy {
        snap.log
            .push("[TURN] ignored enemy_turn: player turn in progress".to_string());
        return snap;
    }

    for idx in 0..snap.enemies.len() {
        if snap.is_complete {
            break;
        }
        if !snap.enemies[idx].is_alive() {
            continue;
        }
        if is_stunned(&snap.enemies[idx].conditions) {
            let enemy = &mut snap.enemies[idx];
            snap.log
                .push(format!("[TURN][{}] is stunned and does nothing", enemy.name));
            tick_duration(&mut enemy.conditions, ConditionKind::Stun);
            continue;
        }

        match select_ability(&mut snap, stream, idx) {
            Some(ability_idx) => execute_ability(&mut snap, stream, idx, ability_idx),
            None => standard_attack(&mut snap, stream, idx),
        }
        check_termination(&mut snap);
    }

    if !snap.is_complete {
        snap.turn_owner = TurnOwner::Player;
        snap.round += 1;
        snap.actions_remaining = snap.max_actions_per_turn;
        snap.log.push(format!("[ROUND] {} begins", snap.round));
    }
    snap
}

/// Walk the enemy's repertoire in order; the first ability that passes its
/// health-threshold gate, its use budget, and its probability gate wins.
/// Each considered ability costs exactly one draw, so selection replays
/// deterministically.
fn select_ability(
    snap: &mut CombatSnapshot,
    stream: &mut RandomStream,
    enemy_idx: usize,
) -> Option<usize> {
    let health_fraction = snap.enemies[enemy_idx].health_fraction();
    for ability_idx in 0..snap.enemies[enemy_idx].abilities.len() {
        let ability = &snap.enemies[enemy_idx].abilities[ability_idx];
        if let Some(threshold) = ability.health_threshold {
            if health_fraction > threshold {
                continue;
            }
        }
        if ability.uses_remaining == Some(0) {
            continue;
        }
        if check_percentage(stream, ability.chance) {
            return Some(ability_idx);
        }
    }
    None
}

fn execute_ability(
    snap: &mut CombatSnapshot,
    stream: &mut RandomStream,
    enemy_idx: usize,
    ability_idx: usize,
) {
    let ability = snap.enemies[enemy_idx].abilities[ability_idx].clone();
    if let Some(uses) = snap.enemies[enemy_idx].abilities[ability_idx]
        .uses_remaining
        .as_mut()
    {
        *uses -= 1;
    }
    let enemy_name = snap.enemies[enemy_idx].name.clone();
    snap.log
        .push(format!("[ABILITY][{}] uses '{}'", enemy_name, ability.name));
    tracing::debug!(enemy = %enemy_name, ability = %ability.name, "enemy ability");

    match ability.effect {
        AbilityEffect::Damage { dice, bonus } => {
            strike_player(snap, stream, enemy_idx, dice, bonus);
        }
        AbilityEffect::SelfBuff {
            condition,
            rounds,
            stacks,
        } => {
            let enemy = &mut snap.enemies[enemy_idx];
            apply_condition(
                &mut enemy.conditions,
                StatusCondition::new(condition, rounds, stacks),
            );
            snap.log.push(format!(
                "[COND][{}] gains {:?} for {} round(s)",
                enemy.name, condition, rounds
            ));
        }
        AbilityEffect::Inflict {
            dice,
            bonus,
            condition,
            rounds,
            stacks,
        } => {
            let hit = strike_player(snap, stream, enemy_idx, dice, bonus);
            if hit {
                apply_condition(
                    &mut snap.combatant.conditions,
                    StatusCondition::new(condition, rounds, stacks),
                );
                snap.log.push(format!(
                    "[COND][{}] is afflicted with {:?} for {} round(s)",
                    snap.combatant.name, condition, rounds
                ));
            }
        }
        AbilityEffect::StealAndFlee { amount_dice } => {
            let amount = roll_dice_total(stream, amount_dice).max(0);
            let enemy = &mut snap.enemies[enemy_idx];
            enemy.fled = true;
            snap.log.push(format!(
                "[STEAL][{}] snatches {} coin(s) and flees the fight",
                enemy.name, amount
            ));
        }
        AbilityEffect::Rewind => {
            let enemy = &mut snap.enemies[enemy_idx];
            let recovered = enemy.drain_damage_history();
            let gained = enemy.heal(recovered);
            snap.log.push(format!(
                "[HEAL][{}] rewinds its wounds, recovering {} HP ({} HP)",
                enemy.name, gained, enemy.health
            ));
        }
        AbilityEffect::RecklessSmash {
            dice,
            bonus,
            self_stun_rounds,
        } => {
            let hit = strike_player(snap, stream, enemy_idx, dice, bonus);
            if !hit {
                let enemy = &mut snap.enemies[enemy_idx];
                apply_condition(
                    &mut enemy.conditions,
                    StatusCondition::new(ConditionKind::Stun, self_stun_rounds, 1),
                );
                snap.log.push(format!(
                    "[COND][{}] overswings and is stunned for {} round(s)",
                    enemy.name, self_stun_rounds
                ));
            }
        }
    }
}

fn standard_attack(snap: &mut CombatSnapshot, stream: &mut RandomStream, enemy_idx: usize) {
    let dice = snap.enemies[enemy_idx].attack_dice;
    let bonus = snap.enemies[enemy_idx].attack_bonus;
    strike_player(snap, stream, enemy_idx, dice, bonus);
}

/// One enemy strike against the player through the shared damage pipeline.
/// Returns whether it landed.
fn strike_player(
    snap: &mut CombatSnapshot,
    stream: &mut RandomStream,
    enemy_idx: usize,
    dice: DiceRoll,
    bonus: i32,
) -> bool {
    let name = snap.enemies[enemy_idx].name.clone();
    let spec = StrikeSpec {
        attacker_name: &name,
        bonus,
        dice,
        crit_threshold: ENEMY_CRIT_THRESHOLD,
        noncrit_multiplier: 1.0,
        condition_multiplier: outgoing_damage_multiplier(&snap.enemies[enemy_idx].conditions),
        double_critical: false,
    };
    let outcome = resolve_strike(stream, &spec, &mut snap.combatant, &mut snap.log);
    outcome.hit
}
