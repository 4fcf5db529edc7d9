//! Headless Set table: one dealer and a table full of bots.
//!
//! Loads the game configuration from the environment and the command line,
//! runs a single game to completion (or until Ctrl+C), and prints the result.

mod config;
mod logging;
mod view;

use anyhow::Error;
use config::{CliOverrides, DealerConfig};
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;
use set_table::{GameConfig, GameManager, GameSummary};

const HELP: &str = "\
Run a Set table with bot players

USAGE:
  st_dealer [OPTIONS]

OPTIONS:
  --players     N          Number of bot players      [default: env SET_PLAYERS or 2]
  --timeout-ms  MS         Round timeout              [default: env SET_ROUND_TIMEOUT_MS or 60000]
  --seed        N          Seed for shuffles and bots [default: env SET_SEED or random]

FLAGS:
  --hints                  Log every legal set on the table at each deal
  --json                   Print the final summary as JSON
  -h, --help               Print help information

ENVIRONMENT:
  SET_DECK_SIZE, SET_TABLE_SIZE, SET_FEATURE_SIZE, SET_FEATURE_COUNT
  SET_WARNING_MS, SET_PLACE_DELAY_MS, SET_REMOVE_DELAY_MS
  SET_POINT_FREEZE_MS, SET_PENALTY_FREEZE_MS, SET_DISPLAY_TICK_MS
  SET_BOT_THINK_MS, SET_BOT_ACCURACY, SET_HINTS, SET_VIEW_CAPACITY
  RUST_LOG                 Log filter [default: info]
  (A .env file in the working directory is loaded first)
";

struct Args {
    overrides: CliOverrides,
    json: bool,
    unexpected: Vec<std::ffi::OsString>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        overrides: CliOverrides {
            players: pargs.opt_value_from_str("--players")?,
            round_timeout_ms: pargs.opt_value_from_str("--timeout-ms")?,
            seed: pargs.opt_value_from_str("--seed")?,
            hints: pargs.contains("--hints"),
        },
        json: pargs.contains("--json"),
        unexpected: Vec::new(),
    };

    Ok(Args {
        unexpected: pargs.finish(),
        ..args
    })
}

fn describe_game(game: &GameConfig) -> String {
    format!(
        "Starting Set table: {} players, {} cards, {} slots, {}ms rounds",
        game.player_count, game.deck_size, game.table_size, game.round_timeout_ms
    )
}

fn render(summary: &GameSummary) -> String {
    let mut out = format!(
        "Game over ({}) after {} round(s)\n",
        summary.reason, summary.rounds
    );
    for &(player, score) in &summary.scores {
        let mark = if summary.winners.contains(&player) {
            "  <- winner"
        } else {
            ""
        };
        out.push_str(&format!("  player {:>2}: {:>3}{}\n", player, score, mark));
    }
    out.push_str(&format!("Cards left in play: {}\n", summary.cards_left));
    out
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let args = parse_args()?;
    logging::init();
    if !args.unexpected.is_empty() {
        log::warn!("Ignoring unexpected arguments: {:?}", args.unexpected);
    }

    let config = DealerConfig::from_env(args.overrides)?;
    let mut manager = GameManager::new(config.game)?;
    info!("{}", describe_game(manager.config()));

    let view = view::spawn(manager.events().subscribe(config.view_capacity));

    // Catching signals for a clean stop.
    let shutdown = manager.shutdown_handle();
    set_handler(move || shutdown.terminate())?;

    manager.start()?;
    let summary = manager.wait().await?;

    // Dropping the manager drops the last event publisher, which ends the view.
    drop(manager);
    if let Err(e) = view.await {
        log::error!("Event view failed: {}", e);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render(&summary));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use set_table::EndReason;

    #[test]
    fn test_startup_line_reflects_manager_config() {
        let game = GameConfig {
            player_count: 3,
            round_timeout_ms: 5_000,
            ..GameConfig::default()
        };
        let manager = GameManager::new(game).unwrap();

        assert_eq!(
            describe_game(manager.config()),
            "Starting Set table: 3 players, 81 cards, 12 slots, 5000ms rounds"
        );
    }

    #[test]
    fn test_render_marks_winners() {
        let summary = GameSummary {
            reason: EndReason::Exhausted,
            rounds: 4,
            winners: vec![1],
            scores: vec![(0, 2), (1, 5)],
            cards_left: 6,
        };

        let text = render(&summary);
        assert!(text.starts_with("Game over (no sets left) after 4 round(s)"));
        assert!(text.contains("player  1:   5  <- winner"));
        assert!(!text.contains("player  0:   2  <- winner"));
        assert!(text.ends_with("Cards left in play: 6\n"));
    }
}
