//! Headless runner (default binary).
//!
//! Plays games with the autopilot, either as fast as possible or paced in
//! real time, and reports the outcome.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use connecting_squares::core::{BoardConfig, Game};
use connecting_squares::engine::{Autopilot, RunSummary, Session, StayOnScene};

/// Hard stop for headless runs that never end
const MAX_HEADLESS_TICKS: u64 = 50_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunArgs {
    seed: u64,
    turns: Option<u32>,
    config: Option<PathBuf>,
    realtime: bool,
    json: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            seed: 1,
            turns: None,
            config: None,
            realtime: false,
            json: false,
        }
    }
}

fn parse_args(args: &[String]) -> Result<RunArgs> {
    let mut out = RunArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                out.seed = v
                    .parse::<u64>()
                    .map_err(|_| anyhow!("invalid --seed value: {}", v))?;
            }
            "--turns" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --turns"))?;
                out.turns = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("invalid --turns value: {}", v))?,
                );
            }
            "--config" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                out.config = Some(PathBuf::from(v));
            }
            "--realtime" => out.realtime = true,
            "--json" => out.json = true,
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(out)
}

fn load_config(args: &RunArgs) -> Result<BoardConfig> {
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<BoardConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => BoardConfig::default(),
    };
    Ok(if args.realtime {
        config
    } else {
        config.headless()
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;
    let config = load_config(&args)?;

    let game = Game::new(config, args.seed).context("invalid board configuration")?;
    tracing::info!(seed = args.seed, realtime = args.realtime, "starting session");

    let mut session = Session::new(game, Autopilot::new(), StayOnScene);
    let limit = args.turns;
    let reached_limit = |game: &Game| limit.is_some_and(|turns| game.stats().turns >= turns);

    let summary = if args.realtime {
        session.run_realtime(reached_limit)
    } else {
        session.run_until(MAX_HEADLESS_TICKS, reached_limit)
    };

    if args.json {
        let snapshot = session.game().snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", describe(&summary));
    }
    Ok(())
}

fn describe(summary: &RunSummary) -> String {
    let outcome = summary
        .exit
        .map(|reason| reason.as_str())
        .unwrap_or("stopped");
    format!(
        "{}: turns={} regions={} cells={} ticks={}",
        outcome,
        summary.stats.turns,
        summary.stats.regions_cleared,
        summary.stats.cells_cleared,
        summary.ticks
    )
}
