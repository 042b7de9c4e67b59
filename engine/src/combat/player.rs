use crate::catalog::{AttackDefinition, AttackShape};
use crate::combat::{
    check_termination, resolve_strike, ActionResult, CombatSnapshot, StrikeOutcome, StrikeSpec,
    TurnOwner,
};
use crate::conditions::{apply_condition, is_stunned, outgoing_damage_multiplier, StatusCondition};
use crate::dice::check_percentage;
use crate::rng::RandomStream;

/// Resolve exactly one player action. Every rule violation and every
/// malformed definition comes back as an unsuccessful result value with the
/// snapshot unchanged apart from a log entry; the success path deducts
/// stamina, dispatches on the attack shape, spends the action cost, and
/// hands the turn over automatically when the budget runs out.
pub fn player_attack(
    snapshot: &CombatSnapshot,
    stream: &mut RandomStream,
    target_index: usize,
    attack: &AttackDefinition,
) -> (CombatSnapshot, ActionResult) {
    let mut snap = snapshot.clone();
    if snap.is_complete {
        return (snap, ActionResult::refused("combat is already over"));
    }
    if snap.turn_owner != TurnOwner::Player {
        return refuse(snap, "it is not the player's turn");
    }
    if is_stunned(&snap.combatant.conditions) {
        return refuse(snap, "the player is stunned");
    }
    match snap.enemies.get(target_index) {
        None => return refuse(snap, "no such target"),
        Some(target) if !target.is_alive() => return refuse(snap, "the target is already down"),
        Some(_) => {}
    }
    if !attack.is_well_formed() {
        // Data-integrity failure: a definition like this cannot have come
        // from the catalog. Same value treatment, logged for upstream
        // diagnosis.
        return refuse(snap, format!("malformed attack definition '{}'", attack.name));
    }
    if let AttackShape::Finisher = attack.shape {
        let target = &snap.enemies[target_index];
        if target.finisher_spent && !is_stunned(&target.conditions) {
            let reason = format!("'{}' was already used on {}", attack.name, target.name);
            return refuse(snap, reason);
        }
    }
    if snap.combatant.stamina < attack.stamina_cost {
        let reason = format!(
            "not enough stamina for '{}' ({} < {})",
            attack.name, snap.combatant.stamina, attack.stamina_cost
        );
        return refuse(snap, reason);
    }

    snap.combatant.stamina -= attack.stamina_cost;
    tracing::debug!(attack = %attack.name, target = target_index, "player action");

    let result = match attack.shape {
        AttackShape::Standard => standard_attack(&mut snap, stream, target_index, attack),
        AttackShape::MultiStrike {
            strikes,
            chain_requires_hit,
            frenzy_buff,
        } => multi_strike(
            &mut snap,
            stream,
            target_index,
            attack,
            strikes,
            chain_requires_hit,
            frenzy_buff,
        ),
        AttackShape::Area => area_attack(&mut snap, stream, attack),
        AttackShape::Leech { fraction } => leech_attack(&mut snap, stream, target_index, attack, fraction),
        AttackShape::Finisher => finisher_attack(&mut snap, stream, target_index, attack),
    };

    check_termination(&mut snap);
    snap.actions_remaining -= attack.action_cost;
    if snap.actions_remaining < 1 && !snap.is_complete {
        snap.log.push(format!(
            "[TURN][{}] is out of actions; enemy turn begins",
            snap.combatant.name
        ));
        snap.turn_owner = TurnOwner::Enemy;
    }
    (snap, result)
}

fn refuse(mut snap: CombatSnapshot, reason: impl Into<String>) -> (CombatSnapshot, ActionResult) {
    let reason = reason.into();
    snap.log.push(format!("[REFUSED] {}", reason));
    (snap, ActionResult::refused(reason))
}

fn player_spec<'a>(
    snap: &CombatSnapshot,
    attack: &'a AttackDefinition,
    name: &'a str,
    double_critical: bool,
) -> StrikeSpec<'a> {
    StrikeSpec {
        attacker_name: name,
        bonus: snap.combatant.attack_bonus,
        dice: attack.damage_dice,
        crit_threshold: attack.crit_threshold(),
        noncrit_multiplier: attack.damage_multiplier,
        condition_multiplier: outgoing_damage_multiplier(&snap.combatant.conditions),
        double_critical,
    }
}

/// One strike against one enemy plus the strike riders: percentage-gated
/// condition infliction on hit.
fn strike_enemy(
    snap: &mut CombatSnapshot,
    stream: &mut RandomStream,
    attack: &AttackDefinition,
    target_index: usize,
    double_critical: bool,
) -> StrikeOutcome {
    let name = snap.combatant.name.clone();
    let spec = player_spec(snap, attack, &name, double_critical);
    let outcome = resolve_strike(stream, &spec, &mut snap.enemies[target_index], &mut snap.log);
    if outcome.hit {
        maybe_inflict(snap, stream, attack, target_index);
    }
    outcome
}

fn maybe_inflict(
    snap: &mut CombatSnapshot,
    stream: &mut RandomStream,
    attack: &AttackDefinition,
    target_index: usize,
) {
    let Some(spec) = attack.inflicted_condition else {
        return;
    };
    let chance = attack.inflict_chance.unwrap_or(100.0);
    if check_percentage(stream, chance) {
        let target = &mut snap.enemies[target_index];
        apply_condition(
            &mut target.conditions,
            StatusCondition::new(spec.kind, spec.rounds, spec.stacks),
        );
        snap.log.push(format!(
            "[COND][{}] is afflicted with {:?} for {} round(s)",
            target.name, spec.kind, spec.rounds
        ));
    }
}

/// Cleave rider: a fraction of the primary damage splashes onto every other
/// living enemy. The primary hit was confirmed, so each share floors at 1.
fn maybe_cleave(
    snap: &mut CombatSnapshot,
    attack: &AttackDefinition,
    target_index: usize,
    primary_damage: i32,
) {
    let Some(ratio) = attack.cleave_ratio else {
        return;
    };
    if primary_damage <= 0 {
        return;
    }
    let share = ((primary_damage as f64 * ratio).floor() as i32).max(1);
    for (idx, enemy) in snap.enemies.iter_mut().enumerate() {
        if idx == target_index || !enemy.is_alive() {
            continue;
        }
        enemy.take_damage(share);
        snap.log.push(format!(
            "[DMG][{}] cleave hits {} for {}{}",
            snap.combatant.name,
            enemy.name,
            share,
            if enemy.health <= 0 { " — DOWN" } else { "" }
        ));
    }
}

/// Proc-chain rider: on a confirmed kill, a percentage-gated bonus strike
/// against a randomly selected remaining enemy at no resource cost.
fn maybe_proc_chain(
    snap: &mut CombatSnapshot,
    stream: &mut RandomStream,
    attack: &AttackDefinition,
) {
    let Some(proc) = attack.proc_chain else {
        return;
    };
    let alive: Vec<usize> = snap
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_alive())
        .map(|(i, _)| i)
        .collect();
    if alive.is_empty() {
        return;
    }
    if !check_percentage(stream, proc.chance) {
        return;
    }
    let pick = alive[stream.next_int(0, alive.len() as i32 - 1) as usize];
    snap.log.push(format!(
        "[PROC][{}] '{}' chains into a bonus strike at {}",
        snap.combatant.name, attack.name, snap.enemies[pick].name
    ));
    strike_enemy(snap, stream, attack, pick, false);
}

fn standard_attack(
    snap: &mut CombatSnapshot,
    stream: &mut RandomStream,
    target_index: usize,
    attack: &AttackDefinition,
) -> ActionResult {
    let outcome = strike_enemy(snap, stream, attack, target_index, false);
    if outcome.hit {
        maybe_cleave(snap, attack, target_index, outcome.damage);
    }
    if outcome.killed {
        maybe_proc_chain(snap, stream, attack);
    }
    ActionResult {
        success: true,
        hit: outcome.hit,
        critical: outcome.critical,
        attack_roll: outcome.attack_roll,
        damage: outcome.damage,
        healing: None,
        message: if outcome.hit {
            format!("'{}' hits for {}", attack.name, outcome.damage)
        } else {
            format!("'{}' misses", attack.name)
        },
    }
}

/// N sequential strikes at the chosen target. A strike against an enemy that
/// died mid-sequence is skipped, never the whole sequence; a chained variant
/// instead stops at the first miss. Landing enough strikes can grant the
/// frenzy self-buff.
fn multi_strike(
    snap: &mut CombatSnapshot,
    stream: &mut RandomStream,
    target_index: usize,
    attack: &AttackDefinition,
    strikes: u32,
    chain_requires_hit: bool,
    frenzy_buff: Option<crate::catalog::FrenzyBuff>,
) -> ActionResult {
    let mut hits = 0u32;
    let mut total_damage = 0;
    let mut any_crit = false;
    let mut last_roll = 0;
    let mut killed = false;

    for strike_no in 1..=strikes {
        if !snap.enemies[target_index].is_alive() {
            snap.log.push(format!(
                "[SKIP][{}] strike {} wasted on a downed target",
                snap.combatant.name, strike_no
            ));
            continue;
        }
        let outcome = strike_enemy(snap, stream, attack, target_index, false);
        last_roll = outcome.attack_roll;
        any_crit |= outcome.critical;
        killed |= outcome.killed;
        if outcome.hit {
            hits += 1;
            total_damage += outcome.damage;
        } else if chain_requires_hit {
            snap.log.push(format!(
                "[CHAIN][{}] '{}' breaks off after the miss",
                snap.combatant.name, attack.name
            ));
            break;
        }
    }

    if let Some(buff) = frenzy_buff {
        if hits >= buff.min_hits {
            apply_condition(
                &mut snap.combatant.conditions,
                StatusCondition::new(buff.condition, buff.rounds, buff.stacks),
            );
            snap.log.push(format!(
                "[COND][{}] lands {} strike(s) and gains {:?}",
                snap.combatant.name, hits, buff.condition
            ));
        }
    }
    if killed {
        maybe_proc_chain(snap, stream, attack);
    }

    ActionResult {
        success: true,
        hit: hits > 0,
        critical: any_crit,
        attack_roll: last_roll,
        damage: total_damage,
        healing: None,
        message: format!("'{}' lands {}/{} strikes for {}", attack.name, hits, strikes, total_damage),
    }
}

/// The single-strike resolution iterated over every currently-living enemy.
fn area_attack(
    snap: &mut CombatSnapshot,
    stream: &mut RandomStream,
    attack: &AttackDefinition,
) -> ActionResult {
    let mut hits = 0u32;
    let mut total_damage = 0;
    let mut any_crit = false;
    let mut last_roll = 0;

    for idx in 0..snap.enemies.len() {
        if !snap.enemies[idx].is_alive() {
            continue;
        }
        let outcome = strike_enemy(snap, stream, attack, idx, false);
        last_roll = outcome.attack_roll;
        any_crit |= outcome.critical;
        if outcome.hit {
            hits += 1;
            total_damage += outcome.damage;
        }
    }

    ActionResult {
        success: true,
        hit: hits > 0,
        critical: any_crit,
        attack_roll: last_roll,
        damage: total_damage,
        healing: None,
        message: format!("'{}' sweeps {} enem(ies) for {}", attack.name, hits, total_damage),
    }
}

/// Standard resolution plus a self-heal of a fixed fraction of damage dealt.
fn leech_attack(
    snap: &mut CombatSnapshot,
    stream: &mut RandomStream,
    target_index: usize,
    attack: &AttackDefinition,
    fraction: f64,
) -> ActionResult {
    let outcome = strike_enemy(snap, stream, attack, target_index, false);
    let mut healing = None;
    if outcome.damage > 0 {
        let gained = snap
            .combatant
            .heal((outcome.damage as f64 * fraction).floor() as i32);
        if gained > 0 {
            snap.log.push(format!(
                "[HEAL][{}] drains {} HP ({} HP)",
                snap.combatant.name, gained, snap.combatant.health
            ));
        }
        healing = Some(gained);
    }
    ActionResult {
        success: true,
        hit: outcome.hit,
        critical: outcome.critical,
        attack_roll: outcome.attack_roll,
        damage: outcome.damage,
        healing,
        message: if outcome.hit {
            format!("'{}' drains {} for {}", attack.name, snap.enemies[target_index].name, outcome.damage)
        } else {
            format!("'{}' misses", attack.name)
        },
    }
}

/// Once per target (unless the target is stunned, checked upstream). On a
/// critical the exploding-max result is doubled again — the 4x class, which
/// is distinct from the generic non-crit multiplier.
fn finisher_attack(
    snap: &mut CombatSnapshot,
    stream: &mut RandomStream,
    target_index: usize,
    attack: &AttackDefinition,
) -> ActionResult {
    snap.enemies[target_index].finisher_spent = true;
    let outcome = strike_enemy(snap, stream, attack, target_index, true);
    ActionResult {
        success: true,
        hit: outcome.hit,
        critical: outcome.critical,
        attack_roll: outcome.attack_roll,
        damage: outcome.damage,
        healing: None,
        message: if outcome.critical {
            format!("'{}' executes for {}", attack.name, outcome.damage)
        } else if outcome.hit {
            format!("'{}' hits for {}", attack.name, outcome.damage)
        } else {
            format!("'{}' misses", attack.name)
        },
    }
}
