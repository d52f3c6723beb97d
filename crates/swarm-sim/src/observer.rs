//! Swarm observer trait for progress reporting and data collection.

use swarm_core::{AreaId, Tick};

use crate::{AgentTickReport, SimAgent};

/// Aggregate counts for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickSummary {
    pub tick:         Tick,
    pub elapsed_secs: f64,
    /// Agents that flew to a new waypoint this tick.
    pub advanced:     usize,
    /// Agents holding at a waypoint or waiting for peers.
    pub holding:      usize,
    /// Agents whose pattern has finished.
    pub completed:    usize,
    /// Agents committed to a bridge.
    pub relays:       usize,
    /// Updates handed to the replication queue.
    pub updates:      usize,
    /// Percent of each search area covered so far.
    pub coverage:     Vec<(AreaId, f64)>,
}

/// Callbacks invoked by [`Swarm::run`][crate::Swarm::run] at key points in
/// the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SwarmObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, summary: &TickSummary) {
///         println!("{}: {} relays", summary.tick, summary.relays);
///     }
/// }
/// ```
pub trait SwarmObserver {
    /// Called at the very start of each tick, before replication delivery.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per agent, in ascending id order, after every agent has
    /// been evaluated.
    fn on_agent_tick(&mut self, _tick: Tick, _agent: &SimAgent, _report: &AgentTickReport) {}

    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Called once after the final tick completes.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// A [`SwarmObserver`] that does nothing.
pub struct NoopObserver;

impl SwarmObserver for NoopObserver {}
