use serde::{Deserialize, Serialize};

use crate::combatant::{AbilityEffect, Combatant, EnemyAbility};
use crate::conditions::ConditionKind;
use crate::dice::DiceRoll;
use crate::rng::RandomStream;

/// Cosmetic epithets. Chosen through the combat stream so the whole encounter
/// reproduces from one seed.
const EPITHETS: &[&str] = &[
    "the Mangy", "the Grim", "One-Eye", "the Rusted", "Bonechewer", "the Pale", "Ashenfang",
    "the Crooked",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyTier {
    Scavenger,
    Raider,
    Warden,
    Overlord,
}

/// Deterministic enemy constructor. Stats come from the tier table; the only
/// randomized element is the cosmetic epithet, drawn from the same stream as
/// every combat roll.
pub fn spawn(tier: EnemyTier, stream: &mut RandomStream) -> Combatant {
    let epithet = EPITHETS[stream.next_int(0, EPITHETS.len() as i32 - 1) as usize];
    let mut enemy = match tier {
        EnemyTier::Scavenger => {
            let mut e = Combatant::new(format!("Scavenger {}", epithet), 18, 0);
            e.attack_bonus = 2;
            e.attack_dice = DiceRoll::new(1, 6, 0);
            e.evasion = 11;
            e.abilities = vec![EnemyAbility {
                name: "pocket-and-run".to_string(),
                effect: AbilityEffect::StealAndFlee {
                    amount_dice: DiceRoll::new(2, 10, 0),
                },
                chance: 15.0,
                health_threshold: Some(0.5),
                uses_remaining: Some(1),
            }];
            e
        }
        EnemyTier::Raider => {
            let mut e = Combatant::new(format!("Raider {}", epithet), 30, 0);
            e.attack_bonus = 4;
            e.attack_dice = DiceRoll::new(1, 8, 1);
            e.evasion = 12;
            e.damage_reduction = 0.10;
            e.abilities = vec![
                EnemyAbility {
                    name: "dirty blade".to_string(),
                    effect: AbilityEffect::Inflict {
                        dice: DiceRoll::new(1, 6, 0),
                        bonus: 4,
                        condition: ConditionKind::Bleed,
                        rounds: 3,
                        stacks: 1,
                    },
                    chance: 30.0,
                    health_threshold: None,
                    uses_remaining: None,
                },
                EnemyAbility {
                    name: "reckless smash".to_string(),
                    effect: AbilityEffect::RecklessSmash {
                        dice: DiceRoll::new(2, 6, 2),
                        bonus: 2,
                        self_stun_rounds: 1,
                    },
                    chance: 25.0,
                    health_threshold: Some(0.5),
                    uses_remaining: None,
                },
            ];
            e
        }
        EnemyTier::Warden => {
            let mut e = Combatant::new(format!("Warden {}", epithet), 45, 0);
            e.attack_bonus = 5;
            e.attack_dice = DiceRoll::new(1, 10, 2);
            e.evasion = 13;
            e.damage_reduction = 0.20;
            e.abilities = vec![
                EnemyAbility {
                    name: "shell up".to_string(),
                    effect: AbilityEffect::SelfBuff {
                        condition: ConditionKind::Fortified,
                        rounds: 2,
                        stacks: 2,
                    },
                    chance: 35.0,
                    health_threshold: Some(0.6),
                    uses_remaining: Some(2),
                },
                EnemyAbility {
                    name: "venom lash".to_string(),
                    effect: AbilityEffect::Inflict {
                        dice: DiceRoll::new(1, 8, 0),
                        bonus: 5,
                        condition: ConditionKind::Poison,
                        rounds: 3,
                        stacks: 1,
                    },
                    chance: 30.0,
                    health_threshold: None,
                    uses_remaining: None,
                },
            ];
            e
        }
        EnemyTier::Overlord => {
            let mut e = Combatant::new(format!("Overlord {}", epithet), 80, 0);
            e.attack_bonus = 7;
            e.attack_dice = DiceRoll::new(2, 8, 3);
            e.evasion = 14;
            e.damage_reduction = 0.25;
            e.abilities = vec![
                EnemyAbility {
                    name: "unmake the wound".to_string(),
                    effect: AbilityEffect::Rewind,
                    chance: 70.0,
                    health_threshold: Some(0.4),
                    uses_remaining: Some(1),
                },
                EnemyAbility {
                    name: "crushing verdict".to_string(),
                    effect: AbilityEffect::Damage {
                        dice: DiceRoll::new(3, 8, 4),
                        bonus: 7,
                    },
                    chance: 40.0,
                    health_threshold: None,
                    uses_remaining: None,
                },
                EnemyAbility {
                    name: "hobbling decree".to_string(),
                    effect: AbilityEffect::Inflict {
                        dice: DiceRoll::new(1, 6, 0),
                        bonus: 7,
                        condition: ConditionKind::Slow,
                        rounds: 2,
                        stacks: 1,
                    },
                    chance: 25.0,
                    health_threshold: None,
                    uses_remaining: Some(2),
                },
            ];
            e
        }
    };
    enemy.max_health = enemy.health;
    enemy
}

/// Spawn a whole encounter. A special encounter adds an Overlord behind the
/// requested roster.
pub fn spawn_encounter(
    tiers: &[EnemyTier],
    is_special_encounter: bool,
    stream: &mut RandomStream,
) -> Vec<Combatant> {
    let mut enemies: Vec<Combatant> = tiers.iter().map(|&t| spawn(t, stream)).collect();
    if is_special_encounter {
        enemies.push(spawn(EnemyTier::Overlord, stream));
    }
    enemies
}
