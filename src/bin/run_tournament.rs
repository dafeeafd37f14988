//! Tournament simulator binary.
//!
//! Seats a field of bots on one shared strategy engine, runs the tournament
//! to a single winner, and carries the learned strategy table across runs
//! through a JSON snapshot.
//!
//! Usage: run_tournament [bots] [seed]

use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use poker_mtt_sim::strategy::StrategyEngine;
use poker_mtt_sim::tournament::{Tournament, TournamentConfig};

const SNAPSHOT_PATH: &str = "strategy_snapshot.json";

fn main() {
    env_logger::init();

    let bots: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(160);
    let seed: Option<u64> = std::env::args().nth(2).and_then(|s| s.parse().ok());

    let mut config = TournamentConfig::default();
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    println!("=== Poker MTT Sim ===");
    println!(
        "Field: {} bots, {} chips each, tables of {}\n",
        bots, config.starting_stack, config.players_per_table
    );

    let engine = Arc::new(StrategyEngine::new());
    match engine.load_from_file(SNAPSHOT_PATH) {
        Ok(true) => println!(
            "Resuming strategy from {} ({} context keys)",
            SNAPSHOT_PATH,
            engine.store().num_keys()
        ),
        Ok(false) => println!("No strategy snapshot found, starting fresh"),
        Err(e) => {
            eprintln!("Could not read {}: {}", SNAPSHOT_PATH, e);
            std::process::exit(1);
        }
    }

    let mut tournament = match Tournament::new(config, Arc::clone(&engine)) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    tournament.register_bots(bots);

    let start = Instant::now();
    let bar = ProgressBar::new(bots.saturating_sub(1) as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "round {msg:>4} [{bar:40.cyan/blue}] {pos}/{len} eliminated",
        )
        .expect("static template")
        .progress_chars("=>-"),
    );

    while !tournament.is_finished() {
        if let Err(e) = tournament.play_round() {
            bar.abandon();
            eprintln!("Tournament aborted in round {}: {}", tournament.round(), e);
            std::process::exit(1);
        }
        bar.set_position(tournament.eliminated_players().len() as u64);
        bar.set_message(tournament.round().to_string());
    }
    bar.finish();

    let result = tournament.finish();
    let elapsed = start.elapsed();

    println!("\n=== Results ===");
    println!("Rounds played: {}", result.rounds_played);
    println!("Total time: {:.2}s", elapsed.as_secs_f64());
    for (place, record) in result.standings.iter().take(3).enumerate() {
        let place = place as u32 + 1;
        let prize = result.payouts.get(&place).copied().unwrap_or(0);
        println!(
            "  {}. {} ({} chips) wins {}",
            place, record.name, record.stack, prize
        );
    }

    match engine.save_to_file(SNAPSHOT_PATH) {
        Ok(()) => println!("\nStrategy snapshot saved to {}", SNAPSHOT_PATH),
        Err(e) => eprintln!("\nCould not save strategy snapshot: {}", e),
    }
}
