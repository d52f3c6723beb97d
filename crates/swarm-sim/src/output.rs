//! CSV trace output.
//!
//! Creates three files in the configured output directory:
//! - `agent_trace.csv`: one row per agent per tick
//! - `tick_summaries.csv`: one row per tick
//! - `coverage.csv`: one row per search area per tick

use std::fs::File;
use std::path::Path;

use csv::Writer;
use swarm_core::Tick;
use swarm_knowledge::KnowledgeExt;

use crate::{AgentTickReport, SimAgent, SwarmError, SwarmObserver, SwarmResult, TickSummary};

/// A [`SwarmObserver`] that writes every tick to CSV.
///
/// Errors from the writers are stored internally because observer methods
/// have no return value.  After `swarm.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct CsvTraceObserver {
    agents:     Writer<File>,
    summaries:  Writer<File>,
    coverage:   Writer<File>,
    finished:   bool,
    last_error: Option<SwarmError>,
}

impl CsvTraceObserver {
    /// Create (or truncate) the three CSV files in `dir` and write the
    /// header rows.
    pub fn new(dir: &Path) -> SwarmResult<Self> {
        let mut agents = Writer::from_path(dir.join("agent_trace.csv"))?;
        agents.write_record([
            "tick", "agent_id", "lat", "lon", "altitude_m", "outcome", "waypoint_index", "bridge_id",
        ])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "elapsed_secs", "advanced", "holding", "completed", "relays", "updates"])?;

        let mut coverage = Writer::from_path(dir.join("coverage.csv"))?;
        coverage.write_record(["tick", "area_id", "percent_covered"])?;

        Ok(Self {
            agents,
            summaries,
            coverage,
            finished:   false,
            last_error: None,
        })
    }

    /// Take the stored write error (if any) after `swarm.run()` returns.
    pub fn take_error(&mut self) -> Option<SwarmError> {
        self.last_error.take()
    }

    fn store_err(&mut self, result: SwarmResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn write_agent(&mut self, tick: Tick, agent: &SimAgent, report: &AgentTickReport) -> SwarmResult<()> {
        let position = agent.platform.position();
        let outcome = match (&report.readiness, report.bridge.assigned) {
            (_, Some(_))        => "joined_bridge",
            (Some(outcome), _)  => outcome.name(),
            (None, None)        => "idle",
        };
        let bridge = agent.kb.agent_bridge(agent.id).map(|b| b.0.to_string()).unwrap_or_default();
        self.agents.write_record(&[
            tick.0.to_string(),
            agent.id.0.to_string(),
            format!("{:.7}", position.lat),
            format!("{:.7}", position.lon),
            format!("{:.2}", agent.platform.altitude_m()),
            outcome.to_owned(),
            agent.state.last_reached_waypoint_index.to_string(),
            bridge,
        ])?;
        Ok(())
    }

    fn write_summary(&mut self, summary: &TickSummary) -> SwarmResult<()> {
        self.summaries.write_record(&[
            summary.tick.0.to_string(),
            format!("{:.3}", summary.elapsed_secs),
            summary.advanced.to_string(),
            summary.holding.to_string(),
            summary.completed.to_string(),
            summary.relays.to_string(),
            summary.updates.to_string(),
        ])?;
        for (area, percent) in &summary.coverage {
            self.coverage.write_record(&[summary.tick.0.to_string(), area.0.to_string(), format!("{percent:.4}")])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> SwarmResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.agents.flush()?;
        self.summaries.flush()?;
        self.coverage.flush()?;
        Ok(())
    }
}

impl SwarmObserver for CsvTraceObserver {
    fn on_agent_tick(&mut self, tick: Tick, agent: &SimAgent, report: &AgentTickReport) {
        let result = self.write_agent(tick, agent, report);
        self.store_err(result);
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        let result = self.write_summary(summary);
        self.store_err(result);
    }

    fn on_run_end(&mut self, _final_tick: Tick) {
        let result = self.finish();
        self.store_err(result);
    }
}
