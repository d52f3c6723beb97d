//! `ReadinessCoordinator`: one agent's coverage state machine.
//!
//! # Tick
//!
//! ```text
//! refresh own status keys
//! not mobile, or busy bridging        → Unavailable
//! cell not initialized                → rank among available peers in the
//!                                       area, initialize the strategy, climb
//!                                       to the staggered altitude
//! altitude never reached              → Climbing
//! wait_for_peers                      → republish last reached index
//! first waypoint not selected         → index 0, fly to the first waypoint
//! GPS target reached and not waiting  → index += 1, publish, start waiting
//! waiting:
//!     final waypoint                  → switch to a follow-on pattern, or
//!                                       report Completed
//!     quorum met (or not gating)      → fly to the next waypoint
//! ```
//!
//! Every failure here is transient: it is logged at `debug` and the same
//! step runs again next tick with no state change.

use swarm_core::{Actuator, AgentId, MovementCommand, Position, Region, SwarmConfig};
use swarm_coverage::{CoverageKind, CoverageParams, CoverageStrategy};
use swarm_knowledge::{AgentField, Key, KnowledgeBase, KnowledgeExt, SwarmSnapshot};
use tracing::{debug, info, trace, warn};

use crate::{AgentState, ReadinessError, ReadinessResult, Telemetry, readiness_quorum_met};

/// What a single tick did.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// Not mobile, or busy with a bridge.  Nothing evaluated.
    Unavailable,
    /// Cell initialization failed this tick; retried next tick.
    CellPending,
    CellInitialized { cell: Region, rank: usize, agents: usize, altitude_m: f64 },
    /// Waiting for the staggered altitude to be reached once.
    Climbing,
    /// Flying towards, or holding at, the current waypoint.
    Holding,
    Advanced { index: i64, target: Position },
    /// The pattern finished and nothing follows it.
    Completed,
    Switched(CoverageKind),
}

impl TickOutcome {
    pub fn name(&self) -> &'static str {
        match self {
            TickOutcome::Unavailable             => "unavailable",
            TickOutcome::CellPending             => "cell_pending",
            TickOutcome::CellInitialized { .. }  => "cell_initialized",
            TickOutcome::Climbing                => "climbing",
            TickOutcome::Holding                 => "holding",
            TickOutcome::Advanced { .. }         => "advanced",
            TickOutcome::Completed               => "completed",
            TickOutcome::Switched(_)             => "switched",
        }
    }
}

pub struct ReadinessCoordinator {
    config:    SwarmConfig,
    params:    CoverageParams,
    strategy:  Box<dyn CoverageStrategy>,
    /// Consumed by the first switch.
    follow_on: Option<CoverageKind>,
}

impl ReadinessCoordinator {
    /// Coordinator for `agent` running `kind`.
    ///
    /// Fails only when `params` are invalid for `kind`.
    pub fn new(agent: AgentId, kind: CoverageKind, params: CoverageParams, config: &SwarmConfig) -> ReadinessResult<Self> {
        let strategy = params.build(kind, config.seed, agent)?;
        Ok(Self { config: config.clone(), follow_on: params.follow_on, params, strategy })
    }

    #[inline]
    pub fn kind(&self) -> CoverageKind {
        self.strategy.kind()
    }

    pub fn strategy(&self) -> &dyn CoverageStrategy {
        self.strategy.as_ref()
    }

    pub fn tick<K, A>(&mut self, state: &mut AgentState, kb: &mut K, telemetry: &Telemetry, actuator: &mut A) -> TickOutcome
    where
        K: KnowledgeBase + ?Sized,
        A: Actuator + ?Sized,
    {
        state.refresh(&*kb);
        if !state.is_available() {
            return TickOutcome::Unavailable;
        }

        if !state.cell_initialized {
            return match self.initialize_cell(state, kb, actuator) {
                Ok(outcome) => outcome,
                Err(e) => {
                    debug!(agent = %state.id, error = %e, "cell not initialized; retrying next tick");
                    TickOutcome::CellPending
                }
            };
        }

        if !state.altitude_latched {
            if !telemetry.altitude_reached {
                return TickOutcome::Climbing;
            }
            state.altitude_latched = true;
        }

        if self.config.wait_for_peers {
            publish_index(kb, state);
        }

        if !state.first_waypoint_selected {
            state.last_reached_waypoint_index = 0;
            publish_index(kb, state);
            return match self.advance(state, actuator) {
                Ok(target) => {
                    state.first_waypoint_selected = true;
                    TickOutcome::Advanced { index: 0, target }
                }
                Err(e) => {
                    debug!(agent = %state.id, error = %e, "first waypoint unavailable");
                    TickOutcome::Holding
                }
            };
        }

        if telemetry.gps_target_reached && !state.waiting {
            state.last_reached_waypoint_index += 1;
            publish_index(kb, state);
            state.waiting = true;
            trace!(agent = %state.id, index = state.last_reached_waypoint_index, "waypoint reached");
        }

        if !state.waiting {
            return TickOutcome::Holding;
        }

        if self.strategy.is_final_waypoint() {
            return self.finish_pattern(state, kb);
        }

        if self.config.wait_for_peers && !self.quorum_met(state, &*kb) {
            return TickOutcome::Holding;
        }

        match self.advance(state, actuator) {
            Ok(target) => {
                state.waiting = false;
                TickOutcome::Advanced { index: state.last_reached_waypoint_index, target }
            }
            Err(e) => {
                debug!(agent = %state.id, error = %e, "next waypoint unavailable");
                TickOutcome::Holding
            }
        }
    }

    // ── Steps ─────────────────────────────────────────────────────────────

    fn initialize_cell<K, A>(&mut self, state: &mut AgentState, kb: &mut K, actuator: &mut A) -> ReadinessResult<TickOutcome>
    where
        K: KnowledgeBase + ?Sized,
        A: Actuator + ?Sized,
    {
        let area = state.assigned_area.ok_or(ReadinessError::Unassigned(state.id))?;
        let region = kb.area_region(area)?;
        let snapshot = SwarmSnapshot::capture(&*kb);
        let (rank, agents) = snapshot.rank_in_area(state.id, area).ok_or(ReadinessError::NotAvailable(state.id))?;

        let cell = self.strategy.initialize(&region, rank, agents)?;
        let altitude_m = self.config.altitude_for_rank(rank);

        state.cell_region = Some(cell);
        state.cell_initialized = true;
        state.first_waypoint_selected = false;
        state.waiting = false;
        state.assigned_altitude = Some(altitude_m);
        kb.set_global(Key::Agent(state.id, AgentField::AssignedAltitude), altitude_m);
        actuator.execute(MovementCommand::MoveToAltitude(altitude_m));

        info!(agent = %state.id, %area, rank, agents, kind = %self.kind(), %cell, altitude_m, "coverage cell initialized");
        Ok(TickOutcome::CellInitialized { cell, rank, agents, altitude_m })
    }

    fn advance<A: Actuator + ?Sized>(&mut self, state: &mut AgentState, actuator: &mut A) -> ReadinessResult<Position> {
        let target = self.strategy.next_target()?;
        state.current_target = Some(target);
        actuator.execute(MovementCommand::MoveToGps(target));
        trace!(agent = %state.id, index = state.last_reached_waypoint_index, %target, "next waypoint");
        Ok(target)
    }

    fn quorum_met<K: KnowledgeBase + ?Sized>(&self, state: &AgentState, kb: &K) -> bool {
        let Some(area) = state.assigned_area else { return true };
        let snapshot = SwarmSnapshot::capture(kb);
        readiness_quorum_met(state.id, state.last_reached_waypoint_index, area, &snapshot)
    }

    /// Swap in the next pattern, if one was configured or requested.
    ///
    /// A configured follow-on is used once.  An external request without a
    /// configured follow-on restarts the current pattern.
    fn finish_pattern<K: KnowledgeBase + ?Sized>(&mut self, state: &mut AgentState, kb: &mut K) -> TickOutcome {
        let request_key = Key::Agent(state.id, AgentField::NextCoverageRequested);
        let requested = kb.get_bool(&request_key);
        let next = match (self.follow_on, requested) {
            (Some(kind), _)  => kind,
            (None, true)     => self.kind(),
            (None, false)    => return TickOutcome::Completed,
        };
        if requested {
            kb.set_global(request_key, false);
        }
        self.follow_on = None;

        match self.params.build(next, self.config.seed, state.id) {
            Ok(strategy) => {
                info!(agent = %state.id, from = %self.kind(), to = %next, "switching coverage pattern");
                self.strategy = strategy;
                state.reset_cell();
                TickOutcome::Switched(next)
            }
            Err(e) => {
                warn!(agent = %state.id, kind = %next, error = %e, "follow-on coverage rejected its parameters");
                TickOutcome::Completed
            }
        }
    }
}

impl std::fmt::Debug for ReadinessCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessCoordinator")
            .field("strategy", &self.strategy)
            .field("follow_on", &self.follow_on)
            .field("wait_for_peers", &self.config.wait_for_peers)
            .finish()
    }
}

fn publish_index<K: KnowledgeBase + ?Sized>(kb: &mut K, state: &AgentState) {
    kb.set_global(Key::Agent(state.id, AgentField::TargetIndex), state.last_reached_waypoint_index);
}
