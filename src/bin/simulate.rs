use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use werewolf::players::{DecisionProvider, RandomProvider};
use werewolf::transcript::{LogSink, NullSink, TranscriptSink};
use werewolf::{GameConfig, GameError, GameResult, GameRunner, RoleRegistry, Team};

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Play batches of self-play games with random decision providers")]
struct Cli {
    /// Number of games to play
    #[arg(short, long, default_value_t = 100)]
    num_games: u32,

    /// RNG seed, for reproducible batches
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Discussion sub-rounds per day (overrides the config file)
    #[arg(short, long)]
    discussion_rounds: Option<u32>,

    /// JSON game configuration; a built-in six-player setup is used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log the full transcript of every game
    #[arg(short, long)]
    verbose: bool,
}

fn default_config() -> GameConfig {
    GameConfig {
        players: ["Alice", "Bob", "Carol", "Dave", "Erin", "Frank"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        role_distribution: BTreeMap::from([
            ("Werewolf".to_string(), 2),
            ("Seer".to_string(), 1),
            ("Doctor".to_string(), 1),
            ("Villager".to_string(), 2),
        ]),
        discussion_rounds: 2,
    }
}

fn load_config(cli: &Cli) -> GameResult<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                GameError::invalid_config(format!("cannot read {}: {e}", path.display()))
            })?;
            serde_json::from_str(&raw).map_err(|e| {
                GameError::invalid_config(format!("cannot parse {}: {e}", path.display()))
            })?
        }
        None => default_config(),
    };
    if let Some(rounds) = cli.discussion_rounds {
        config.discussion_rounds = rounds;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> GameResult<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "info" } else { "warn" }),
    )
    .init();

    let config = load_config(&cli)?;
    let registry = RoleRegistry::standard();
    let mut rng = XorShiftRng::seed_from_u64(cli.seed);

    let mut village_wins = 0u32;
    let mut werewolf_wins = 0u32;
    for game in 0..cli.num_games {
        let providers: HashMap<String, Box<dyn DecisionProvider>> = config
            .players
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    Box::new(RandomProvider::seeded(rng.gen::<u64>()))
                        as Box<dyn DecisionProvider>,
                )
            })
            .collect();
        let sink: Box<dyn TranscriptSink> = if cli.verbose {
            Box::new(LogSink)
        } else {
            Box::new(NullSink)
        };

        let mut runner = GameRunner::new(&config, &registry, providers, sink, &mut rng)?;
        let winner = runner.run().await?;
        log::info!("game {game}: {winner} team wins after {} rounds", runner.rounds());
        match winner {
            Team::Village => village_wins += 1,
            Team::Werewolf => werewolf_wins += 1,
        }
    }

    println!(
        "played {} games: village {village_wins}, werewolf {werewolf_wins}",
        cli.num_games
    );
    Ok(())
}
