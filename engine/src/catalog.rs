use std::{fs, path::Path};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::conditions::ConditionKind;
use crate::dice::DiceRoll;

/// Condition an attack inflicts on its target when the infliction check
/// passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    pub kind: ConditionKind,
    pub rounds: u32,
    #[serde(default = "default_stacks")]
    pub stacks: u32,
}

fn default_stacks() -> u32 {
    1
}

/// Self-buff granted by a multi-strike attack when enough strikes land.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrenzyBuff {
    pub min_hits: u32,
    pub condition: ConditionKind,
    pub rounds: u32,
    #[serde(default = "default_stacks")]
    pub stacks: u32,
}

/// Percentage-gated bonus strike granted on a confirmed kill, resolved
/// against a randomly selected remaining enemy at no resource cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcChain {
    pub chance: f64,
}

/// The dispatch variant for an attack's effect shape. New shapes are added
/// here rather than grown onto a name-matching chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackShape {
    /// One attack roll, one damage roll.
    Standard,
    /// N sequential single-strike resolutions against the chosen target.
    MultiStrike {
        strikes: u32,
        /// When true, a miss ends the sequence (strike 2 is conditional on
        /// strike 1 landing).
        #[serde(default)]
        chain_requires_hit: bool,
        #[serde(default)]
        frenzy_buff: Option<FrenzyBuff>,
    },
    /// The single-strike resolution iterated over every living enemy.
    Area,
    /// Standard resolution plus a self-heal of a fraction of damage dealt.
    Leech { fraction: f64 },
    /// Usable once per target unless the target is stunned; a critical hit
    /// doubles the exploding-max result again (the 4x class).
    Finisher,
}

impl Default for AttackShape {
    fn default() -> Self {
        AttackShape::Standard
    }
}

/// A validated attack. Always produced by the catalog (the equipment-legality
/// validator sits in front of it, outside the core); the engine never trusts
/// a definition arriving verbatim from a remote caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackDefinition {
    pub name: String,
    pub damage_dice: DiceRoll,
    pub stamina_cost: i32,
    #[serde(default = "default_action_cost")]
    pub action_cost: i32,
    /// Applies to non-critical base damage only; critical damage uses the
    /// exploding-max path untouched.
    #[serde(default = "default_multiplier")]
    pub damage_multiplier: f64,
    #[serde(default)]
    pub crit_threshold_override: Option<i32>,
    #[serde(default)]
    pub inflicted_condition: Option<ConditionSpec>,
    /// Percentage gate for the infliction; 100 when absent but a condition is
    /// present.
    #[serde(default)]
    pub inflict_chance: Option<f64>,
    /// Fraction of primary-target damage splashed onto other live enemies.
    #[serde(default)]
    pub cleave_ratio: Option<f64>,
    #[serde(default)]
    pub proc_chain: Option<ProcChain>,
    #[serde(default)]
    pub shape: AttackShape,
}

impl AttackDefinition {
    pub fn crit_threshold(&self) -> i32 {
        self.crit_threshold_override.unwrap_or(20)
    }

    /// Data-integrity screen: a definition with degenerate dice cannot have
    /// come from the catalog and is refused rather than resolved.
    pub fn is_well_formed(&self) -> bool {
        self.damage_dice.count > 0
            && self.damage_dice.faces > 0
            && self.stamina_cost >= 0
            && self.action_cost >= 1
    }
}

fn default_action_cost() -> i32 {
    1
}

fn default_multiplier() -> f64 {
    1.0
}

/// Name-keyed attack catalog, insertion-ordered so dumps and iteration are
/// deterministic. Plays the attack-validator role for the engine: `validate`
/// answers with the trusted definition or nothing.
#[derive(Debug, Clone, Default)]
pub struct AttackCatalog {
    attacks: IndexMap<String, AttackDefinition>,
}

impl AttackCatalog {
    /// The catalog shipped with the engine.
    pub fn builtin() -> Self {
        // Embedded content is validated by tests; a parse failure here is a
        // build defect, not a runtime condition.
        Self::from_json(include_str!("../content/attacks.json"))
            .expect("builtin attack catalog is valid")
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let list: Vec<AttackDefinition> =
            serde_json::from_str(text).context("failed to parse attack catalog JSON")?;
        Ok(Self::from_list(list))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let list: Vec<AttackDefinition> =
            serde_yaml::from_str(text).context("failed to parse attack catalog YAML")?;
        Ok(Self::from_list(list))
    }

    pub fn load_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read attack catalog: {}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            _ => Self::from_json(&text),
        }
    }

    fn from_list(list: Vec<AttackDefinition>) -> Self {
        let mut attacks = IndexMap::new();
        for attack in list {
            attacks.insert(attack.name.clone(), attack);
        }
        Self { attacks }
    }

    /// `Some` only for a known, well-formed attack. The equipment check that
    /// precedes this lives with the caller.
    pub fn validate(&self, name: &str) -> Option<&AttackDefinition> {
        self.attacks.get(name).filter(|a| a.is_well_formed())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttackDefinition> {
        self.attacks.values()
    }

    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }
}
