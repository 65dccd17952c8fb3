use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use klondike::sim::{simulate, SimConfig};
use klondike::solver::{Solver, SolverConfig, Verdict, DEFAULT_NODE_BUDGET};
use klondike::{Game, DEFAULT_DRAW};
use log::LevelFilter;
use std::num::NonZeroU8;

#[derive(Parser)]
#[command(name = "klondike", about = "Deal, inspect, solve and simulate Klondike games")]
struct Cli {
    /// Log search progress at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Print machine-readable JSON instead of a board.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deal a game and show it with its legal moves.
    Deal {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = DEFAULT_DRAW)]
        draw: NonZeroU8,
    },
    /// Decode a hex-encoded state and show it.
    Show {
        state: String,
        #[arg(long, default_value_t = DEFAULT_DRAW)]
        draw: NonZeroU8,
    },
    /// Search one deal for a winning line.
    Solve {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = DEFAULT_DRAW)]
        draw: NonZeroU8,
        #[arg(long, default_value_t = DEFAULT_NODE_BUDGET)]
        budget: usize,
    },
    /// Search a batch of consecutive seeds in parallel.
    Simulate {
        #[arg(long, default_value_t = 100)]
        games: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = DEFAULT_DRAW)]
        draw: NonZeroU8,
        #[arg(long, default_value_t = 20_000)]
        budget: usize,
    },
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .context("initialize logger")
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}

fn from_hex(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    if text.len() % 2 != 0 {
        return Err(anyhow!("hex state has an odd number of digits"));
    }
    (0..text.len())
        .step_by(2)
        .map(|i| {
            text.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| anyhow!("invalid hex at offset {}", i))
        })
        .collect()
}

fn show(game: &Game, json: bool) -> Result<()> {
    let moves: Vec<_> = game.valid_moves().collect();
    if json {
        let value = serde_json::json!({
            "state": to_hex(&game.encode()),
            "draw": game.n_draw(),
            "won": game.is_won(),
            "moves": moves,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    println!("{}", game);
    println!();
    println!("State: {}", to_hex(&game.encode()));
    println!("Legal moves:");
    for (i, mv) in moves.iter().enumerate() {
        println!("  {:2}: {}", i + 1, mv);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Command::Deal { seed, draw } => show(&Game::seeded(draw, seed), cli.json),
        Command::Show { state, draw } => {
            let game = Game::decode(&from_hex(&state)?)
                .context("decode state")?
                .with_draw(draw);
            show(&game, cli.json)
        }
        Command::Solve { seed, draw, budget } => {
            let game = Game::seeded(draw, seed);
            let search = Solver::new(SolverConfig {
                node_budget: budget,
            })
            .solve(&game);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&search)?);
                return Ok(());
            }
            println!("Game: {}", game);
            println!();
            println!("Nodes visited: {}", search.nodes);
            match &search.verdict {
                Verdict::Solved(line) => {
                    println!("Winning line ({} moves):", line.len());
                    for (i, mv) in line.iter().enumerate() {
                        println!("  {:3}: {}", i + 1, mv);
                    }
                }
                Verdict::Unsolvable => println!("No winning line exists."),
                Verdict::Unknown => println!("Gave up after {} nodes.", budget),
            }
            Ok(())
        }
        Command::Simulate {
            games,
            seed,
            draw,
            budget,
        } => {
            let report = simulate(&SimConfig {
                games,
                first_seed: seed,
                n_draw: draw,
                solver: SolverConfig {
                    node_budget: budget,
                },
            })?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Games:      {}", report.games);
                println!("Solved:     {}", report.solved);
                println!("Unsolvable: {}", report.unsolvable);
                println!("Unknown:    {}", report.unknown);
                println!("Win rate:   {:.1}%", 100.0 * report.win_rate());
            }
            Ok(())
        }
    }
}
