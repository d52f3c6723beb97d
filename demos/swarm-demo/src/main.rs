//! swarm-demo: run a drone swarm scenario from a TOML file.
//!
//! Loads search areas, teams, and bridge requests from a scenario file,
//! runs the swarm in the deterministic harness, and writes CSV traces to the
//! output directory.  Re-running with the same seed reproduces every row.
//!
//! ```text
//! swarm-demo scenarios/two_teams.toml --output output/two_teams
//! RUST_LOG=swarm_bridge=debug swarm-demo scenarios/two_teams.toml --json
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

use swarm_core::{Position, SwarmConfig, Tick};
use swarm_coverage::CoverageParams;
use swarm_knowledge::KnowledgeExt;
use swarm_sim::{
    AgentTickReport, AreaSpec, BridgeSpec, CsvTraceObserver, PlatformParams, SimAgent, Swarm, SwarmBuilder,
    SwarmObserver, TickSummary,
};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "swarm-demo")]
#[command(about = "Run a drone swarm coverage and bridging scenario")]
struct Args {
    /// Scenario TOML file
    scenario: PathBuf,

    /// Override the scenario's RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the scenario's tick count
    #[arg(long)]
    ticks: Option<u64>,

    /// Directory for the CSV traces
    #[arg(long, default_value = "output/swarm-demo")]
    output: PathBuf,

    /// Log progress every N ticks (0 disables)
    #[arg(long, default_value_t = 60)]
    progress_every: u64,

    /// Emit logs as JSON lines
    #[arg(long)]
    json: bool,
}

// ── Scenario file ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Debug, Default)]
#[serde(default, deny_unknown_fields)]
struct ScenarioFile {
    config:                  SwarmConfig,
    coverage:                CoverageParams,
    platform:                PlatformParams,
    replication_delay_ticks: u64,
    initial_positions:       Option<Vec<Position>>,
    areas:                   Vec<AreaSpec>,
    bridges:                 Vec<BridgeSpec>,
}

fn load_scenario(path: &Path) -> Result<ScenarioFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let scenario: ScenarioFile =
        toml::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))?;
    if scenario.config.total_agents == 0 {
        bail!("scenario {} declares no agents", path.display());
    }
    Ok(scenario)
}

// ── Progress observer ─────────────────────────────────────────────────────────

/// Forwards to the CSV writer and logs a progress line every `every` ticks.
struct ProgressObserver {
    inner:      CsvTraceObserver,
    every:      u64,
    agent_rows: usize,
    tick_rows:  usize,
}

impl SwarmObserver for ProgressObserver {
    fn on_tick_start(&mut self, tick: Tick) {
        self.inner.on_tick_start(tick);
    }

    fn on_agent_tick(&mut self, tick: Tick, agent: &SimAgent, report: &AgentTickReport) {
        self.agent_rows += 1;
        if let Some((bridge, target)) = report.bridge.assigned {
            info!(agent = %agent.id, %bridge, %tick, lat = target.lat, lon = target.lon, "agent joined bridge");
        }
        self.inner.on_agent_tick(tick, agent, report);
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.tick_rows += 1;
        if self.every > 0 && summary.tick.0 % self.every == 0 {
            let covered: Vec<String> =
                summary.coverage.iter().map(|(area, pct)| format!("{}={pct:.1}%", area.0)).collect();
            info!(
                tick = summary.tick.0,
                advanced = summary.advanced,
                holding = summary.holding,
                completed = summary.completed,
                relays = summary.relays,
                coverage = %covered.join(" "),
                "progress"
            );
        }
        self.inner.on_tick_end(summary);
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        self.inner.on_run_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn init_tracing(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json);

    let mut scenario = load_scenario(&args.scenario)?;
    if let Some(seed) = args.seed {
        scenario.config.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        scenario.config.total_ticks = ticks;
    }
    info!(
        scenario = %args.scenario.display(),
        agents = scenario.config.total_agents,
        ticks = scenario.config.total_ticks,
        seed = scenario.config.seed,
        "loaded scenario"
    );

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating output directory {}", args.output.display()))?;

    let mut builder = SwarmBuilder::new(scenario.config)
        .areas(scenario.areas)
        .bridges(scenario.bridges)
        .coverage(scenario.coverage)
        .platform(scenario.platform)
        .replication_delay_ticks(scenario.replication_delay_ticks)
        .coverage_csv_dir(&args.output);
    if let Some(positions) = scenario.initial_positions {
        builder = builder.initial_positions(positions);
    }
    let mut swarm = builder.build().context("building swarm")?;

    let inner = CsvTraceObserver::new(&args.output).context("opening CSV traces")?;
    let mut obs = ProgressObserver { inner, every: args.progress_every, agent_rows: 0, tick_rows: 0 };

    let t0 = Instant::now();
    swarm.run(&mut obs).context("running swarm")?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        warn!(error = %e, "CSV output incomplete");
    }

    println!("Run complete in {:.3} s", elapsed.as_secs_f64());
    println!("  agent_trace.csv    : {} rows", obs.agent_rows);
    println!("  tick_summaries.csv : {} rows", obs.tick_rows);
    println!();
    print_final_state(&swarm);

    Ok(())
}

fn print_final_state(swarm: &Swarm) {
    println!("{:<8} {:<11} {:<13} {:>7} {:>9} {:<8}", "Agent", "Lat", "Lon", "Alt m", "Waypoint", "Role");
    println!("{}", "-".repeat(62));
    for agent in &swarm.agents {
        let position = agent.platform.position();
        let role = match (agent.kb.agent_bridge(agent.id), &agent.readiness) {
            (Some(bridge), _)   => format!("relay {}", bridge.0),
            (None, Some(r))     => r.kind().as_str().to_owned(),
            (None, None)        => "idle".to_owned(),
        };
        println!(
            "{:<8} {:<11.6} {:<13.6} {:>7.1} {:>9} {:<8}",
            agent.id.0,
            position.lat,
            position.lon,
            agent.platform.altitude_m(),
            agent.state.last_reached_waypoint_index,
            role,
        );
    }
    println!();
    for (area, percent) in swarm.coverage() {
        println!("Area {:<3} covered {percent:>6.2}%", area.0);
    }
}
