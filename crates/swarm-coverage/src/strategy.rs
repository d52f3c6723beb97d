//! The `CoverageStrategy` trait: the capability set shared by every
//! waypoint generator.

use swarm_core::{Position, Region};

use crate::{CoverageKind, CoverageResult};

/// A stateful, lazily evaluated waypoint sequence over one agent's cell.
///
/// # Lifecycle
///
/// 1. [`initialize`](Self::initialize) once, with the search area and the
///    agent's rank among the `agents` available in it.  Returns the cell
///    this agent will cover.
/// 2. [`next_target`](Self::next_target) each time the previous waypoint
///    was reached (and the swarm allows advancing).
/// 3. Stop asking once [`is_final_waypoint`](Self::is_final_waypoint) is
///    `true`; the coordinator may then swap in a fresh strategy.
///
/// `Send` so agents can be evaluated on worker threads.
pub trait CoverageStrategy: Send {
    fn kind(&self) -> CoverageKind;

    fn initialize(&mut self, area: &Region, rank: usize, agents: usize) -> CoverageResult<Region>;

    /// Advance and return the next waypoint.
    fn next_target(&mut self) -> CoverageResult<Position>;

    /// `true` when the most recent waypoint ends this pattern.
    fn is_final_waypoint(&self) -> bool;

    /// Cell assigned by `initialize`, if it has run.
    fn cell(&self) -> Option<&Region>;
}

impl std::fmt::Debug for dyn CoverageStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverageStrategy")
            .field("kind", &self.kind())
            .field("cell", &self.cell())
            .field("final", &self.is_final_waypoint())
            .finish()
    }
}
