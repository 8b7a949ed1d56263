//! Derby operator CLI
//!
//! JSON in, JSON out. Logs go to stderr so stdout stays machine-readable.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use derby_core::betting::{calculate_odds, place_odds, resolve, RaceSummary};
use derby_core::engine::{draw_field, RaceSimulator};
use derby_core::league::LeagueManager;
use derby_core::models::{outcome_schema, Map, Payout, RaceId, RaceOutcome, Racer, Wager};
use derby_core::DerbyConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "derby")]
#[command(about = "Run races, advance the league and settle wagers", long_about = None)]
struct Cli {
    /// YAML config file (falls back to DERBY_CONFIG_PATH, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one race and print the outcome
    Race {
        /// Roster JSON (array of racers)
        #[arg(long)]
        roster: PathBuf,

        /// Map JSON
        #[arg(long)]
        map: PathBuf,

        #[arg(long)]
        race_id: String,

        #[arg(long)]
        seed: u64,

        /// Draw up to `max_field` active racers from the roster instead of entering all of them
        #[arg(long, default_value = "false")]
        draw: bool,
    },

    /// Run one progression tick over a roster
    Advance {
        #[arg(long)]
        roster: PathBuf,

        /// JSON array of race outcomes since the last tick
        #[arg(long)]
        outcomes: Option<PathBuf>,

        #[arg(long)]
        seed: u64,
    },

    /// Generate extra newcomers for a short roster
    Recruit {
        #[arg(long)]
        roster: PathBuf,

        #[arg(long)]
        count: usize,

        #[arg(long)]
        seed: u64,
    },

    /// Settle wagers against an outcome
    Resolve {
        #[arg(long)]
        outcome: PathBuf,

        /// JSON array of wagers
        #[arg(long)]
        wagers: PathBuf,
    },

    /// Print odds for the active racers in a roster
    Odds {
        #[arg(long)]
        roster: PathBuf,

        /// Place odds instead of win odds
        #[arg(long, default_value = "false")]
        place: bool,
    },

    /// Print the JSON schema of a race outcome
    Schema,
}

#[derive(Serialize)]
struct Resolution {
    payouts: Vec<Payout>,
    summary: RaceSummary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Race {
            roster,
            map,
            race_id,
            seed,
            draw,
        } => {
            let roster: Vec<Racer> = read_json(&roster)?;
            let map: Map = read_json(&map)?;
            let entrants = if draw {
                draw_field(&roster, config.simulation.max_field, seed)
            } else {
                roster
            };

            let simulator = RaceSimulator::new(config.simulation);
            let outcome = simulator.simulate(RaceId(race_id), &entrants, &map, seed)?;
            tracing::info!(
                race_id = %outcome.race_id,
                digest = %outcome.digest(),
                "race complete"
            );
            write_json(out, &outcome)?;
        }

        Commands::Advance {
            roster,
            outcomes,
            seed,
        } => {
            let roster: Vec<Racer> = read_json(&roster)?;
            let outcomes: Vec<RaceOutcome> = match outcomes {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };

            let manager = LeagueManager::new(config.progression);
            let report = manager.advance(&roster, &outcomes, seed)?;
            tracing::info!(
                retirements = report.retirements.len(),
                newcomers = report.newcomers.len(),
                "progression tick complete"
            );
            write_json(out, &report)?;
        }

        Commands::Recruit {
            roster,
            count,
            seed,
        } => {
            let roster: Vec<Racer> = read_json(&roster)?;
            let manager = LeagueManager::new(config.progression);
            write_json(out, &manager.recruit(&roster, count, seed))?;
        }

        Commands::Resolve { outcome, wagers } => {
            let outcome: RaceOutcome = read_json(&outcome)?;
            let wagers: Vec<Wager> = read_json(&wagers)?;

            let payouts = resolve(&outcome, &wagers)?;
            let summary = RaceSummary::from_resolution(&outcome, &wagers, &payouts);
            write_json(out, &Resolution { payouts, summary })?;
        }

        Commands::Odds { roster, place } => {
            let roster: Vec<Racer> = read_json(&roster)?;
            let ids: Vec<_> = roster.iter().filter(|r| r.is_active()).map(|r| r.id).collect();
            let odds = if place {
                place_odds(&ids, config.betting.place_positions, config.betting.house_edge)
            } else {
                calculate_odds(&ids, config.betting.house_edge)
            };
            write_json(out, &odds)?;
        }

        Commands::Schema => {
            write_json(out, &outcome_schema())?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<DerbyConfig> {
    let config = match path {
        Some(path) => DerbyConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DerbyConfig::from_env_or_default()?,
    };
    Ok(config)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use derby_core::models::{Attributes, BettorId, Odds, RacerId, Segment, WagerId};
    use tempfile::TempDir;

    fn write_file<T: Serialize>(dir: &TempDir, name: &str, value: &T) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    fn run_args(args: &[&str]) -> Result<serde_json::Value> {
        let cli = Cli::try_parse_from(args)?;
        let mut buf = Vec::new();
        run(cli, &mut buf)?;
        Ok(serde_json::from_slice(&buf)?)
    }

    fn roster() -> Vec<Racer> {
        (1..=4)
            .map(|id| {
                Racer::new(
                    RacerId(id),
                    format!("Runner {}", id),
                    Attributes::new(50 + id as u8 * 5, 60, 55, 50),
                )
            })
            .collect()
    }

    fn map() -> Map {
        Map::new(
            "oval",
            vec![
                Segment::straight(100.0),
                Segment::curve(80.0),
                Segment::hazard(60.0, 60),
                Segment::straight(120.0),
            ],
        )
    }

    #[test]
    fn test_race_then_resolve() {
        let dir = TempDir::new().unwrap();
        let roster_path = write_file(&dir, "roster.json", &roster());
        let map_path = write_file(&dir, "map.json", &map());

        let outcome = run_args(&[
            "derby",
            "race",
            "--roster",
            roster_path.to_str().unwrap(),
            "--map",
            map_path.to_str().unwrap(),
            "--race-id",
            "R1",
            "--seed",
            "42",
        ])
        .unwrap();
        assert_eq!(outcome["race_id"], "R1");
        assert_eq!(outcome["finish_order"].as_array().unwrap().len(), 4);

        let outcome: RaceOutcome = serde_json::from_value(outcome).unwrap();
        let winner = outcome.finish_order[0];
        let outcome_path = write_file(&dir, "outcome.json", &outcome);
        let wagers = vec![Wager::win(
            WagerId(1),
            BettorId(9),
            RaceId::from("R1"),
            winner,
            10,
            Odds::from_hundredths(360),
        )];
        let wagers_path = write_file(&dir, "wagers.json", &wagers);

        let resolution = run_args(&[
            "derby",
            "resolve",
            "--outcome",
            outcome_path.to_str().unwrap(),
            "--wagers",
            wagers_path.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(resolution["payouts"][0]["amount"], 36);
        assert_eq!(resolution["summary"]["total_paid"], 36);
    }

    #[test]
    fn test_resolve_mismatch_fails() {
        let dir = TempDir::new().unwrap();
        let roster_path = write_file(&dir, "roster.json", &roster());
        let map_path = write_file(&dir, "map.json", &map());
        let outcome = run_args(&[
            "derby",
            "race",
            "--roster",
            roster_path.to_str().unwrap(),
            "--map",
            map_path.to_str().unwrap(),
            "--race-id",
            "R2",
            "--seed",
            "1",
        ])
        .unwrap();
        let outcome_path = write_file(&dir, "outcome.json", &outcome);
        let wagers = vec![Wager::win(
            WagerId(1),
            BettorId(1),
            RaceId::from("R1"),
            RacerId(1),
            10,
            Odds::EVEN,
        )];
        let wagers_path = write_file(&dir, "wagers.json", &wagers);

        let err = run_args(&[
            "derby",
            "resolve",
            "--outcome",
            outcome_path.to_str().unwrap(),
            "--wagers",
            wagers_path.to_str().unwrap(),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("Outcome mismatch"));
    }

    #[test]
    fn test_advance_without_outcomes() {
        let dir = TempDir::new().unwrap();
        let roster_path = write_file(&dir, "roster.json", &roster());

        let report = run_args(&[
            "derby",
            "advance",
            "--roster",
            roster_path.to_str().unwrap(),
            "--seed",
            "3",
        ])
        .unwrap();
        let updated = report["updated_roster"].as_array().unwrap();
        assert_eq!(updated.len(), 4);
        assert!(updated.iter().all(|r| r["age"] == 1));
    }

    #[test]
    fn test_odds_and_config_override() {
        let dir = TempDir::new().unwrap();
        let roster_path = write_file(&dir, "roster.json", &roster());
        let config_path = dir.path().join("derby.yaml");
        std::fs::write(&config_path, "betting:\n  house_edge: 0.2\n").unwrap();

        let odds = run_args(&[
            "derby",
            "--config",
            config_path.to_str().unwrap(),
            "odds",
            "--roster",
            roster_path.to_str().unwrap(),
        ])
        .unwrap();
        // 0.8 × 4
        assert_eq!(odds["1"], 3.2);
    }

    #[test]
    fn test_schema_describes_outcome() {
        let schema = run_args(&["derby", "schema"]).unwrap();
        assert_eq!(schema["title"], "RaceOutcome");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = run_args(&["derby", "odds", "--roster", "/nonexistent/roster.json"]).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/roster.json"));
    }
}
