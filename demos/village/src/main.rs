//! village: a small camp of NPCs driven by the ssd decision core.
//!
//! Agents start around a camp with berry bushes nearby, a few deer wandering
//! the map and a wolf circling at a distance.  Per-agent snapshots and
//! per-tick summaries are written as CSV.

mod world;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ssd_agent::{AgentStoreBuilder, Personality};
use ssd_behavior::SsdBehavior;
use ssd_core::{Position, SimConfig, SsdConfig, Tick};
use ssd_output::{CsvWriter, OutputWriter, SimOutputObserver};
use ssd_sim::{SimBuilder, SimObserver, SimSnapshot, TickReport};

use world::{CAMP, TICKS_PER_DAY, Village};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "village")]
#[command(about = "Run the ssd village demo", long_about = None)]
struct Args {
    /// Ticks to simulate
    #[arg(short, long, default_value_t = 240)]
    ticks: u64,

    /// Master RNG seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Number of villagers
    #[arg(short, long, default_value_t = 12)]
    agents: usize,

    /// JSON file overriding model constants (partial files are fine)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for the CSV files
    #[arg(short, long, default_value = "output/village")]
    out: PathBuf,

    /// Snapshot every N ticks (0 disables snapshots)
    #[arg(long, default_value_t = 1)]
    interval: u64,

    /// Compute-phase worker threads (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Cycle villagers through the twelve personality archetypes instead
    /// of drawing traits from the configured ranges
    #[arg(long)]
    archetypes: bool,
}

fn load_params(path: Option<&PathBuf>) -> Result<SsdConfig> {
    let Some(path) = path else {
        return Ok(SsdConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let params: SsdConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(params)
}

// ── Observer wrapper with running totals ──────────────────────────────────────

struct TallyObserver<W: OutputWriter> {
    inner:       SimOutputObserver<W>,
    leaps:       usize,
    hunts:       usize,
    hunts_won:   usize,
    shares:      usize,
    deaths:      usize,
    formed:      usize,
    dissolved:   usize,
    last_report: Option<TickReport>,
}

impl<W: OutputWriter> TallyObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self {
            inner,
            leaps:       0,
            hunts:       0,
            hunts_won:   0,
            shares:      0,
            deaths:      0,
            formed:      0,
            dissolved:   0,
            last_report: None,
        }
    }
}

impl<W: OutputWriter> SimObserver for TallyObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport) {
        self.leaps += report.leaps;
        self.hunts += report.hunts_resolved;
        self.hunts_won += report.hunts_succeeded;
        self.shares += report.shares;
        self.deaths += report.deaths;
        self.formed += report.boundaries_formed;
        self.dissolved += report.boundaries_dissolved;
        if report.tick.0 % TICKS_PER_DAY == TICKS_PER_DAY - 1 {
            info!(
                tick = %report.tick,
                alive = report.alive,
                boundaries = report.boundaries,
                mean_kappa = report.mean_kappa.unwrap_or(0.0),
                "day complete"
            );
        }
        self.inner.on_tick_end(report);
        self.last_report = Some(report.clone());
    }

    fn on_snapshot(&mut self, snapshot: &SimSnapshot<'_>) {
        self.inner.on_snapshot(snapshot);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let params = load_params(args.config.as_ref())?;

    println!("=== village: ssd decision core ===");
    println!("Agents: {}  |  Ticks: {}  |  Seed: {}", args.agents, args.ticks, args.seed);
    println!();

    // 1. Agents in a ring around the camp.
    let mut villagers = AgentStoreBuilder::new(args.agents, args.seed)
        .weights(params.alignment.initial_weights)
        .curiosity_range(params.drives.curiosity_min, params.drives.curiosity_max)
        .temperament_range(params.drives.temperament_min, params.drives.temperament_max);
    if args.archetypes {
        villagers = villagers.presets(&Personality::PRESETS);
    }
    let (store, rngs) = villagers.build();
    let positions: Vec<Position> = (0..args.agents)
        .map(|i| {
            let angle = i as f32 / args.agents.max(1) as f32 * std::f32::consts::TAU;
            CAMP.offset(3.0 * angle.cos(), 3.0 * angle.sin())
        })
        .collect();

    // 2. Run settings.
    let config = SimConfig {
        total_ticks:           args.ticks,
        seed:                  args.seed,
        num_threads:           args.threads,
        output_interval_ticks: args.interval,
    };

    // 3. Build sim.
    let mut sim = SimBuilder::new(config.clone(), store, rngs, SsdBehavior, Village::new(args.seed))
        .params(params)
        .positions(positions)
        .build()?;

    // 4. Output.
    let writer = CsvWriter::new(&args.out)?;
    let mut obs = TallyObserver::new(SimOutputObserver::new(writer));

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  alive              : {}", sim.agents.alive_count());
    println!("  deaths             : {}", obs.deaths);
    println!("  leaps              : {}", obs.leaps);
    println!("  hunts (won/total)  : {}/{}", obs.hunts_won, obs.hunts);
    println!("  meat shared        : {}", obs.shares);
    println!("  boundaries formed  : {} (dissolved {})", obs.formed, obs.dissolved);
    println!("  berries eaten      : {}", sim.environment.meals);
    println!("  deer taken         : {} ({} roaming)", sim.environment.captures, sim.environment.deer_count());
    if let Some(r) = &obs.last_report {
        println!("  final mean kappa   : {:.3}", r.mean_kappa.unwrap_or(0.0));
    }
    println!("  output             : {}", args.out.display());
    println!();

    // 7. Final agent table.
    println!(
        "{:<6} {:<8} {:<8} {:<10} {:<6} {:<10}",
        "Agent", "Health", "Hunger", "Boundary", "Leaps", "Action"
    );
    println!("{}", "-".repeat(52));
    let snapshot = sim.snapshot();
    for v in snapshot.living() {
        println!(
            "{:<6} {:<8.2} {:<8.2} {:<10} {:<6} {:<10}",
            v.agent.0,
            v.health,
            v.drives.hunger,
            v.boundary.map(|b| b.0.to_string()).unwrap_or_else(|| "-".into()),
            v.leaps,
            v.action.kind().as_str(),
        );
    }

    Ok(())
}
