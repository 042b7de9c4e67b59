use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use engine::bestiary::{self, EnemyTier};
use engine::{
    end_player_turn, enemy_turn, enemy_turn_end, enemy_turn_start, initiate_combat,
    is_combat_complete, player_attack, player_turn_start, AttackCatalog, Combatant, CombatSnapshot,
    DiceRoll, RandomStream, TurnOwner,
};

#[derive(Copy, Clone, ValueEnum)]
enum Tier {
    Scavenger,
    Raider,
    Warden,
    Overlord,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Tier::Scavenger => "scavenger",
            Tier::Raider => "raider",
            Tier::Warden => "warden",
            Tier::Overlord => "overlord",
        })
    }
}

impl From<Tier> for EnemyTier {
    fn from(t: Tier) -> Self {
        match t {
            Tier::Scavenger => EnemyTier::Scavenger,
            Tier::Raider => EnemyTier::Raider,
            Tier::Warden => EnemyTier::Warden,
            Tier::Overlord => EnemyTier::Overlord,
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Roll dice from the deterministic stream
    Roll {
        /// Stream seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Die faces
        #[arg(long, default_value_t = 20)]
        faces: u32,
        /// Number of rolls
        #[arg(long, default_value_t = 5)]
        rolls: u32,
    },
    /// Resume a stream at a cursor and show the next draws
    Replay {
        /// Stream seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Draws already consumed
        #[arg(long, default_value_t = 0)]
        draws: u64,
        /// Draws to show after resuming
        #[arg(long, default_value_t = 5)]
        show: u32,
    },
    /// Dump the attack catalog as JSON (builtin or a file)
    Catalog {
        /// Optional catalog file (.json/.yaml) instead of the builtin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Run a scripted encounter end to end and print the combat log
    Simulate {
        /// Stream seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Enemy tiers in encounter order
        #[arg(long, value_enum, default_values_t = vec![Tier::Scavenger, Tier::Raider])]
        enemies: Vec<Tier>,
        /// Append an overlord behind the roster
        #[arg(long, default_value_t = false)]
        special: bool,
        /// Safety cap on rounds
        #[arg(long, default_value_t = 30)]
        max_rounds: u32,
    },
}

#[derive(Parser)]
#[command(name = "combat-cli")]
#[command(about = "Combat core harness")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn sample_player() -> Combatant {
    let mut player = Combatant::new("Drifter", 40, 60);
    player.attack_bonus = 3;
    player.attack_dice = DiceRoll::new(1, 6, 2);
    player.evasion = 13;
    player.damage_reduction = 0.05;
    player
}

/// Scripted player policy for the demo: heavy_blow when affordable, slash
/// otherwise, end the turn when neither fits.
fn pick_attack<'a>(catalog: &'a AttackCatalog, snap: &CombatSnapshot) -> Option<&'a engine::AttackDefinition> {
    for name in ["heavy_blow", "slash"] {
        if let Some(attack) = catalog.validate(name) {
            if snap.combatant.stamina >= attack.stamina_cost
                && snap.actions_remaining >= attack.action_cost
            {
                return Some(attack);
            }
        }
    }
    None
}

fn first_living_enemy(snap: &CombatSnapshot) -> Option<usize> {
    snap.enemies.iter().position(|e| e.is_alive())
}

fn simulate(seed: u64, tiers: Vec<Tier>, special: bool, max_rounds: u32) {
    let catalog = AttackCatalog::builtin();
    let mut stream = RandomStream::from_seed(seed);
    let tiers: Vec<EnemyTier> = tiers.into_iter().map(Into::into).collect();
    let enemies = bestiary::spawn_encounter(&tiers, special, &mut stream);
    let mut snap = initiate_combat(sample_player(), enemies, special);

    while !is_combat_complete(&snap) && snap.round <= max_rounds {
        snap = player_turn_start(&snap);
        while !is_combat_complete(&snap)
            && snap.turn_owner == TurnOwner::Player
            && snap.actions_remaining >= 1
        {
            let Some(target) = first_living_enemy(&snap) else {
                break;
            };
            match pick_attack(&catalog, &snap) {
                Some(attack) => {
                    let (next, _result) = player_attack(&snap, &mut stream, target, attack);
                    snap = next;
                }
                None => {
                    snap = end_player_turn(&snap);
                }
            }
        }
        if !is_combat_complete(&snap) && snap.turn_owner == TurnOwner::Player {
            snap = end_player_turn(&snap);
        }
        if is_combat_complete(&snap) {
            break;
        }
        snap = enemy_turn_start(&snap);
        snap = enemy_turn(&snap, &mut stream);
        snap = enemy_turn_end(&snap);
    }

    for line in &snap.log {
        println!("{}", line);
    }
    println!(
        "result: {} | rounds={} | player_hp={} | draws={}",
        if snap.player_victory { "victory" } else { "defeat" },
        snap.round,
        snap.combatant.health,
        stream.cursor().draws_consumed
    );
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Roll { seed, faces, rolls } => {
            let mut stream = RandomStream::from_seed(seed);
            for i in 1..=rolls {
                println!("roll {}: d{} = {}", i, faces, stream.roll_die(faces));
            }
        }
        Cmd::Replay { seed, draws, show } => {
            let mut stream = RandomStream::resume(engine::RandomCursor {
                seed,
                draws_consumed: draws,
            });
            println!("resumed seed={} at draw {}", seed, draws);
            for _ in 0..show {
                println!("next = {:.6}", stream.next());
            }
        }
        Cmd::Catalog { file } => {
            let catalog = match file {
                Some(path) => AttackCatalog::load_path(&path)?,
                None => AttackCatalog::builtin(),
            };
            let attacks: Vec<_> = catalog.iter().collect();
            println!("{}", serde_json::to_string_pretty(&attacks)?);
        }
        Cmd::Simulate {
            seed,
            enemies,
            special,
            max_rounds,
        } => simulate(seed, enemies, special, max_rounds),
    }
    Ok(())
}
