use engine::{
    check_percentage, roll_attack, roll_critical_damage, roll_dice_total, DiceRoll, RandomStream,
};

#[test]
fn dice_total_stays_within_bounds() {
    let mut stream = RandomStream::from_seed(42);
    let dd = DiceRoll::new(2, 6, 3);
    for _ in 0..200 {
        let total = roll_dice_total(&mut stream, dd);
        assert!((5..=15).contains(&total));
    }
}

#[test]
fn attack_roll_total_and_crit_flag_are_consistent() {
    let mut stream = RandomStream::from_seed(777);
    for _ in 0..200 {
        let atk = roll_attack(&mut stream, 5, 20);
        assert_eq!(atk.total, atk.d20 + 5);
        assert_eq!(atk.critical, atk.d20 >= 20);
    }
}

#[test]
fn crit_threshold_extremes() {
    let mut stream = RandomStream::from_seed(3);
    for _ in 0..50 {
        assert!(roll_attack(&mut stream, 0, 1).critical);
    }
    for _ in 0..50 {
        assert!(!roll_attack(&mut stream, 0, 21).critical);
    }
}

#[test]
fn critical_damage_is_exploding_max_not_a_double() {
    let mut stream = RandomStream::from_seed(42);
    let dd = DiceRoll::new(2, 6, 3);
    for _ in 0..200 {
        let crit = roll_critical_damage(&mut stream, dd);
        // max (12) + reroll (2..=12) + modifier (3)
        assert!((17..=27).contains(&crit));
        // Always at least dice-max plus one pip per die plus modifier, which
        // a low doubled roll would undercut.
        assert!(crit >= dd.max_dice_value() + 2 + 3);
    }
}

#[test]
fn single_faced_dice_are_fully_deterministic() {
    let mut stream = RandomStream::from_seed(9);
    let dd = DiceRoll::new(1, 1, 0);
    assert_eq!(roll_dice_total(&mut stream, dd), 1);
    assert_eq!(roll_critical_damage(&mut stream, dd), 2);
}

#[test]
fn percentage_check_extremes() {
    let mut stream = RandomStream::from_seed(11);
    for _ in 0..100 {
        assert!(check_percentage(&mut stream, 100.0));
    }
    for _ in 0..100 {
        assert!(!check_percentage(&mut stream, 0.0));
    }
}

#[test]
fn percentage_check_consumes_one_draw() {
    let mut stream = RandomStream::from_seed(5);
    check_percentage(&mut stream, 50.0);
    assert_eq!(stream.cursor().draws_consumed, 1);
}
