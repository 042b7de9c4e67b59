use engine::catalog::{ConditionSpec, FrenzyBuff, ProcChain};
use engine::{
    initiate_combat, player_attack, AttackDefinition, AttackShape, Combatant, ConditionKind,
    DiceRoll, RandomStream,
};

fn player() -> Combatant {
    let mut p = Combatant::new("Hero", 40, 50);
    p.attack_bonus = 3;
    p.evasion = 13;
    p
}

fn enemy(name: &str, health: i32, evasion: i32) -> Combatant {
    let mut e = Combatant::new(name, health, 0);
    e.evasion = evasion;
    e
}

/// Deterministic base: one one-faced die, crits impossible, free to use.
fn attack(shape: AttackShape) -> AttackDefinition {
    AttackDefinition {
        name: "test".to_string(),
        damage_dice: DiceRoll::new(1, 1, 0),
        stamina_cost: 0,
        action_cost: 1,
        damage_multiplier: 1.0,
        crit_threshold_override: Some(21),
        inflicted_condition: None,
        inflict_chance: None,
        cleave_ratio: None,
        proc_chain: None,
        shape,
    }
}

fn attack_count(log: &[String]) -> usize {
    log.iter().filter(|l| l.starts_with("[ATTACK]")).count()
}

#[test]
fn chained_multi_strike_stops_at_the_first_miss() {
    let snap = initiate_combat(player(), vec![enemy("Wall", 50, 100)], false);
    let mut stream = RandomStream::from_seed(5);
    let def = attack(AttackShape::MultiStrike {
        strikes: 3,
        chain_requires_hit: true,
        frenzy_buff: None,
    });
    let (after, result) = player_attack(&snap, &mut stream, 0, &def);
    assert!(!result.hit);
    assert_eq!(result.damage, 0);
    assert_eq!(attack_count(&after.log), 1, "strike 2 must never roll");
}

#[test]
fn unchained_multi_strike_skips_a_downed_target_without_aborting() {
    let snap = initiate_combat(player(), vec![enemy("Frail", 1, -100)], false);
    let mut stream = RandomStream::from_seed(5);
    let def = attack(AttackShape::MultiStrike {
        strikes: 3,
        chain_requires_hit: false,
        frenzy_buff: None,
    });
    let (after, result) = player_attack(&snap, &mut stream, 0, &def);
    assert!(result.hit);
    assert_eq!(result.damage, 1, "only the killing strike lands");
    let skips = after.log.iter().filter(|l| l.starts_with("[SKIP]")).count();
    assert_eq!(skips, 2, "the remaining strikes are skipped, not aborted");
}

#[test]
fn frenzy_buff_triggers_on_enough_hits() {
    let snap = initiate_combat(player(), vec![enemy("Post", 50, -100)], false);
    let mut stream = RandomStream::from_seed(5);
    let def = attack(AttackShape::MultiStrike {
        strikes: 3,
        chain_requires_hit: false,
        frenzy_buff: Some(FrenzyBuff {
            min_hits: 2,
            condition: ConditionKind::Empowered,
            rounds: 2,
            stacks: 1,
        }),
    });
    let (after, result) = player_attack(&snap, &mut stream, 0, &def);
    assert_eq!(result.damage, 3);
    assert!(after
        .combatant
        .conditions
        .iter()
        .any(|c| c.kind == ConditionKind::Empowered));
}

#[test]
fn area_attack_strikes_every_living_enemy() {
    let roster = vec![
        enemy("A", 10, -100),
        enemy("B", 10, -100),
        enemy("C", 10, -100),
    ];
    let mut snap = initiate_combat(player(), roster, false);
    snap.enemies[1].health = 0;
    let mut stream = RandomStream::from_seed(5);
    let (after, result) = player_attack(&snap, &mut stream, 0, &attack(AttackShape::Area));
    assert_eq!(result.damage, 2, "two living targets, 1 each");
    assert_eq!(after.enemies[0].health, 9);
    assert_eq!(after.enemies[1].health, 0, "a downed enemy is not struck");
    assert_eq!(after.enemies[2].health, 9);
}

#[test]
fn leech_heals_a_fraction_of_damage_dealt() {
    let mut drained = player();
    drained.health = 10;
    let snap = initiate_combat(drained, vec![enemy("Prey", 50, -100)], false);
    let mut stream = RandomStream::from_seed(5);
    let def = AttackDefinition {
        damage_dice: DiceRoll::new(4, 1, 0),
        ..attack(AttackShape::Leech { fraction: 0.5 })
    };
    let (after, result) = player_attack(&snap, &mut stream, 0, &def);
    assert_eq!(result.damage, 4);
    assert_eq!(result.healing, Some(2));
    assert_eq!(after.combatant.health, 12);
}

#[test]
fn finisher_is_once_per_target_unless_stunned() {
    let snap = initiate_combat(player(), vec![enemy("Boss", 200, -100)], false);
    let mut stream = RandomStream::from_seed(5);
    let def = attack(AttackShape::Finisher);

    let (snap, first) = player_attack(&snap, &mut stream, 0, &def);
    assert!(first.success);
    assert!(snap.enemies[0].finisher_spent);

    let (snap, second) = player_attack(&snap, &mut stream, 0, &def);
    assert!(!second.success, "spent finisher must be refused");

    let mut stunned = snap.clone();
    stunned.enemies[0]
        .conditions
        .push(engine::StatusCondition::new(ConditionKind::Stun, 1, 1));
    stunned.actions_remaining = 3;
    let (_, third) = player_attack(&stunned, &mut stream, 0, &def);
    assert!(third.success, "a stunned target reopens the finisher");
}

#[test]
fn finisher_critical_doubles_the_exploding_max() {
    let snap = initiate_combat(player(), vec![enemy("Mark", 200, -100)], false);
    let mut stream = RandomStream::from_seed(5);
    // Always-crit 1d1: exploding max = 1 + 1 = 2, doubled again = 4.
    let def = AttackDefinition {
        crit_threshold_override: Some(1),
        ..attack(AttackShape::Finisher)
    };
    let (after, result) = player_attack(&snap, &mut stream, 0, &def);
    assert!(result.critical);
    assert_eq!(result.damage, 4);
    assert_eq!(after.enemies[0].health, 196);
}

#[test]
fn generic_multiplier_applies_to_noncrit_damage_only() {
    let snap = initiate_combat(player(), vec![enemy("Mark", 50, -100)], false);
    let mut stream = RandomStream::from_seed(5);
    let def = AttackDefinition {
        damage_multiplier: 3.0,
        ..attack(AttackShape::Standard)
    };
    let (_, result) = player_attack(&snap, &mut stream, 0, &def);
    assert_eq!(result.damage, 3);

    // Same dice on the always-crit path ignore the generic multiplier.
    let mut stream = RandomStream::from_seed(5);
    let crit_def = AttackDefinition {
        damage_multiplier: 3.0,
        crit_threshold_override: Some(1),
        ..attack(AttackShape::Standard)
    };
    let (_, crit) = player_attack(&snap, &mut stream, 0, &crit_def);
    assert!(crit.critical);
    assert_eq!(crit.damage, 2, "exploding max of 1d1, untripled");
}

#[test]
fn weakened_and_empowered_scale_outgoing_damage() {
    let mut weakened = player();
    weakened
        .conditions
        .push(engine::StatusCondition::new(ConditionKind::Weakened, 2, 1));
    let snap = initiate_combat(weakened, vec![enemy("Mark", 50, -100)], false);
    let mut stream = RandomStream::from_seed(5);
    let def = AttackDefinition {
        damage_dice: DiceRoll::new(10, 1, 0),
        ..attack(AttackShape::Standard)
    };
    // 10 * 0.9 = 9
    let (_, result) = player_attack(&snap, &mut stream, 0, &def);
    assert_eq!(result.damage, 9);

    let mut empowered = player();
    empowered
        .conditions
        .push(engine::StatusCondition::new(ConditionKind::Empowered, 2, 1));
    let snap = initiate_combat(empowered, vec![enemy("Mark", 50, -100)], false);
    let mut stream = RandomStream::from_seed(5);
    // 10 * 1.25 = 12.5, floored to 12
    let (_, result) = player_attack(&snap, &mut stream, 0, &def);
    assert_eq!(result.damage, 12);
}

#[test]
fn cleave_splashes_onto_other_living_enemies() {
    let roster = vec![enemy("A", 10, -100), enemy("B", 10, -100)];
    let snap = initiate_combat(player(), roster, false);
    let mut stream = RandomStream::from_seed(5);
    let def = AttackDefinition {
        damage_dice: DiceRoll::new(4, 1, 0),
        cleave_ratio: Some(0.5),
        ..attack(AttackShape::Standard)
    };
    let (after, result) = player_attack(&snap, &mut stream, 0, &def);
    assert_eq!(result.damage, 4);
    assert_eq!(after.enemies[0].health, 6);
    assert_eq!(after.enemies[1].health, 8, "half of 4 splashes across");
}

#[test]
fn guaranteed_infliction_lands_with_the_hit() {
    let snap = initiate_combat(player(), vec![enemy("Mark", 50, -100)], false);
    let mut stream = RandomStream::from_seed(5);
    let def = AttackDefinition {
        inflicted_condition: Some(ConditionSpec {
            kind: ConditionKind::Poison,
            rounds: 3,
            stacks: 1,
        }),
        inflict_chance: Some(100.0),
        ..attack(AttackShape::Standard)
    };
    let (after, _) = player_attack(&snap, &mut stream, 0, &def);
    assert!(after.enemies[0]
        .conditions
        .iter()
        .any(|c| c.kind == ConditionKind::Poison));

    let mut stream = RandomStream::from_seed(5);
    let never = AttackDefinition {
        inflict_chance: Some(0.0),
        ..def
    };
    let (after, _) = player_attack(&snap, &mut stream, 0, &never);
    assert!(after.enemies[0].conditions.is_empty());
}

#[test]
fn proc_chain_grants_a_bonus_strike_on_a_kill() {
    let roster = vec![enemy("Dying", 1, -100), enemy("Next", 10, -100)];
    let snap = initiate_combat(player(), roster, false);
    let mut stream = RandomStream::from_seed(5);
    let def = AttackDefinition {
        proc_chain: Some(ProcChain { chance: 100.0 }),
        ..attack(AttackShape::Standard)
    };
    let (after, _) = player_attack(&snap, &mut stream, 0, &def);
    assert_eq!(after.enemies[0].health, 0);
    assert_eq!(after.enemies[1].health, 9, "the chain strike carries over");
    assert!(after.log.iter().any(|l| l.starts_with("[PROC]")));
}

#[test]
fn proc_chain_needs_a_kill() {
    let roster = vec![enemy("Sturdy", 50, -100), enemy("Next", 10, -100)];
    let snap = initiate_combat(player(), roster, false);
    let mut stream = RandomStream::from_seed(5);
    let def = AttackDefinition {
        proc_chain: Some(ProcChain { chance: 100.0 }),
        ..attack(AttackShape::Standard)
    };
    let (after, _) = player_attack(&snap, &mut stream, 0, &def);
    assert_eq!(after.enemies[1].health, 10);
    assert!(!after.log.iter().any(|l| l.starts_with("[PROC]")));
}
