//! headless: run the contagion engine without a renderer.
//!
//! Drives a [`SimHost`] with a synthetic clock of `frame_millis` per tick,
//! prints a progress line every few hundred ticks and optionally writes the
//! CSV output.  With `--restart-after-end` a fresh run starts as soon as the
//! pandemic is over, the way an unattended display would loop.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, info};
use log4rs::Config;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;

use ct_core::{EpiConfig, Millis};
use ct_output::{CsvWriter, SimOutputObserver};
use ct_sim::{SimHost, SimObserver, TickSummary, WorldSnapshot};
use ct_spatial::RTreeDetector;

// ISO 8601 timestamp and color coded level tag
const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Profile {
    /// Quarantined agents leave after a while; every agent tests itself.
    Finite,
    /// Quarantined agents stay; one random agent is tested at a time.
    Persistent,
}

#[derive(Parser, Debug)]
#[command(version, about = "Agent-based epidemic simulation with contact tracing")]
struct Args {
    /// Number of ticks to run.
    #[arg(long, default_value_t = 6_000)]
    ticks: u64,

    /// Override the RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Preset to start from.
    #[arg(long, value_enum, default_value_t = Profile::Finite)]
    profile: Profile,

    /// JSON file with configuration fields; replaces the profile.  Missing
    /// fields take the finite-quarantine defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for `agent_snapshots.csv` and `tick_summaries.csv`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write agent rows every this many ticks (0 = never).
    #[arg(long, default_value_t = 10)]
    snapshot_interval: u64,

    /// Print a progress line every this many ticks.
    #[arg(long, default_value_t = 500)]
    progress_every: u64,

    /// Start a fresh run as soon as the pandemic ends.
    #[arg(long)]
    restart_after_end: bool,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Progress printing plus optional CSV output.
struct HeadlessObserver {
    output:          Option<SimOutputObserver<CsvWriter>>,
    progress_every:  u64,
    ended_at:        Option<Millis>,
    peak_infectious: usize,
}

impl SimObserver for HeadlessObserver {
    fn wants_snapshot(&self) -> bool {
        self.output.as_ref().is_some_and(SimObserver::wants_snapshot)
    }

    fn on_snapshot(&mut self, snapshot: &WorldSnapshot) {
        if let Some(out) = self.output.as_mut() {
            out.on_snapshot(snapshot);
        }
    }

    fn on_tick_end(&mut self, s: &TickSummary) {
        self.peak_infectious = self.peak_infectious.max(s.infectious);
        if self.progress_every > 0 && s.tick.is_multiple_of(self.progress_every) {
            println!(
                "run {:>2} | tick {:>6} | {:>8} | pop {:>3} | S {:>3} I {:>3} Q {:>3}",
                s.run_id, s.tick, s.time.to_string(), s.population,
                s.susceptible, s.infectious, s.quarantined,
            );
        }
        if let Some(out) = self.output.as_mut() {
            out.on_tick_end(s);
        }
    }

    fn on_pandemic_end(&mut self, time: Millis) {
        println!("pandemic over at {time}");
        self.ended_at = Some(time);
    }

    fn on_stop(&mut self, time: Millis) {
        if let Some(out) = self.output.as_mut() {
            out.on_stop(time);
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn init_logging(level: LevelFilter) -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn load_config(args: &Args) -> Result<EpiConfig> {
    let mut config = match (&args.config, args.profile) {
        (Some(path), _) => read_config(path)?,
        (None, Profile::Finite) => EpiConfig::finite_quarantine(),
        (None, Profile::Persistent) => EpiConfig::persistent_quarantine(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

/// Where the configuration came from; a config file replaces the profile.
fn config_source(args: &Args) -> String {
    match &args.config {
        Some(path) => format!("config {}", path.display()),
        None => format!("profile {:?}", args.profile),
    }
}

fn read_config(path: &Path) -> Result<EpiConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level)?;

    let config = load_config(&args)?;
    info!(
        "{}: {} agents ({} infected), cap {}, seed {}",
        config_source(&args), config.initial_agents, config.initial_infections,
        config.max_population, config.seed,
    );

    let output = match &args.output {
        Some(dir) => Some(SimOutputObserver::new(CsvWriter::new(dir)?, args.snapshot_interval)),
        None => None,
    };
    let mut obs = HeadlessObserver {
        output,
        progress_every: args.progress_every,
        ended_at: None,
        peak_infectious: 0,
    };

    let frame = config.frame_millis;
    let mut host = SimHost::new(config, RTreeDetector::new())?;
    host.start(Millis::ZERO, &mut obs)?;

    let t0 = Instant::now();
    for tick in 1..=args.ticks {
        let now = Millis(tick * frame.0);
        host.tick(now, &mut obs);
        if args.restart_after_end && obs.ended_at.take().is_some() {
            host.start(now, &mut obs)?;
        }
    }
    host.stop(&mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.output.as_mut().and_then(|o| o.take_error()) {
        eprintln!("output error: {e}");
    }

    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  runs started    : {}", host.runs());
    println!("  peak infectious : {}", obs.peak_infectious);
    if let Some(sim) = host.sim() {
        let snap = sim.snapshot();
        println!("  last run        : {} agents at {}", snap.agents.len(), snap.time);
        match sim.index_case() {
            Some(id) => println!("  index case      : {id}"),
            None => println!("  index case      : none found"),
        }
        if sim.has_ended() {
            println!("  pandemic        : over");
        }
    }
    if let Some(dir) = &args.output {
        println!("  output          : {}", dir.display());
    }
    Ok(())
}
