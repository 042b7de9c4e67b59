pub mod bestiary;
pub mod catalog;
pub mod combat;
pub mod combatant;
pub mod conditions;
pub mod dice;
pub mod rng;
pub mod session;

pub use catalog::{AttackCatalog, AttackDefinition, AttackShape, ConditionSpec};
pub use combat::{
    end_player_turn, enemy_turn, enemy_turn_end, enemy_turn_start, initiate_combat,
    is_combat_complete, player_attack, player_turn_start, ActionResult, CombatSnapshot, TurnOwner,
    MAX_ACTIONS_PER_TURN, MAX_DAMAGE_REDUCTION,
};
pub use combatant::{AbilityEffect, Combatant, EnemyAbility};
pub use conditions::{ConditionKind, StatusCondition};
pub use dice::{
    check_percentage, roll_attack, roll_critical_damage, roll_dice_total, AttackRoll, DiceRoll,
};
pub use rng::{RandomCursor, RandomStream};
pub use session::{MemorySessionStore, SessionRecord, SessionStore};
