//! The `Swarm` struct and its tick loop.

use std::collections::{BTreeMap, VecDeque};

use swarm_bridge::{BridgeCoordinator, BridgeReport};
use swarm_core::{AgentId, AreaId, BridgeId, RegionId, SwarmConfig, Tick};
use swarm_coverage::CoverageTracker;
use swarm_knowledge::{InMemoryKnowledge, Key, KnowledgeExt, Update};
use swarm_readiness::{AgentState, ReadinessCoordinator, TickOutcome};
use tracing::{debug, info};

use crate::{BridgeSpec, SimPlatform, SwarmObserver, SwarmResult, TickSummary};

// ── SimAgent ──────────────────────────────────────────────────────────────────

/// One simulated drone: its replica, its coordinators, and its airframe.
#[derive(Debug)]
pub struct SimAgent {
    pub id:        AgentId,
    pub state:     AgentState,
    /// `None` for agents not assigned to any search area.
    pub readiness: Option<ReadinessCoordinator>,
    pub bridge:    BridgeCoordinator,
    pub kb:        InMemoryKnowledge,
    pub platform:  SimPlatform,
}

/// What one agent did in one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentTickReport {
    pub bridge:    BridgeReport,
    pub readiness: Option<TickOutcome>,
}

impl SimAgent {
    /// Fly, publish telemetry, then run the bridge and coverage logic.
    ///
    /// Bridging runs first so an agent that joins a bridge this tick is
    /// already busy when its coverage logic looks.
    fn tick(&mut self, dt_secs: f64) -> AgentTickReport {
        self.platform.step(dt_secs);
        let telemetry = self.platform.telemetry();
        self.kb.publish_position(self.id, telemetry.position, telemetry.altitude_m);

        let bridge = self.bridge.tick(&mut self.kb, &mut self.platform);
        let readiness = self
            .readiness
            .as_mut()
            .map(|r| r.tick(&mut self.state, &mut self.kb, &telemetry, &mut self.platform));

        AgentTickReport { bridge, readiness }
    }
}

// ── Swarm ─────────────────────────────────────────────────────────────────────

/// Search areas tracked for percent-covered reporting.
#[derive(Debug)]
pub struct AreaTracker {
    pub area:    AreaId,
    pub tracker: CoverageTracker,
}

/// The simulation runner.
///
/// Each tick runs four phases:
///
/// 1. **Deliver**: replication batches due this tick are merged into every
///    replica, then operator bridge requests due this tick.
/// 2. **Agents** (optionally parallel with the `parallel` feature): every
///    agent steps its platform, publishes its position, and runs its
///    bridge and readiness coordinators against its own replica.
/// 3. **Replicate** (sequential, ascending `AgentId`): each replica's
///    outgoing writes are batched for delivery `1 + replication_delay_ticks`
///    ticks later.
/// 4. **Track**: airborne agents mark their sensor footprint on the
///    coverage trackers.
///
/// Create via [`SwarmBuilder`][crate::SwarmBuilder].
#[derive(Debug)]
pub struct Swarm {
    pub config: SwarmConfig,
    pub now:    Tick,
    pub agents: Vec<SimAgent>,
    pub areas:  Vec<AreaTracker>,

    pub(crate) replication_delay_ticks: u64,
    pub(crate) in_flight:               VecDeque<(Tick, Vec<Update>)>,
    /// Operator-side replica: owns bridge registrations.
    pub(crate) controller:              InMemoryKnowledge,
    pub(crate) requests:                BTreeMap<Tick, Vec<(BridgeId, BridgeSpec)>>,
    pub(crate) next_region:             u32,
}

impl Swarm {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: SwarmObserver>(&mut self, observer: &mut O) -> SwarmResult<()> {
        while self.now < self.config.end_tick() {
            self.step(observer)?;
        }
        self.finish(observer)
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SwarmObserver>(&mut self, n: u64, observer: &mut O) -> SwarmResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Flush trackers and notify the observer that the run is over.
    pub fn finish<O: SwarmObserver>(&mut self, observer: &mut O) -> SwarmResult<()> {
        for area in &mut self.areas {
            area.tracker.finish()?;
        }
        info!(ticks = self.now.0, "swarm run finished");
        observer.on_run_end(self.now);
        Ok(())
    }

    pub fn agent(&self, id: AgentId) -> Option<&SimAgent> {
        self.agents.get(id.index())
    }

    /// Percent covered per search area.
    pub fn coverage(&self) -> Vec<(AreaId, f64)> {
        self.areas.iter().map(|a| (a.area, a.tracker.percent_covered())).collect()
    }

    /// Replication batches not yet delivered.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SwarmObserver>(&mut self, observer: &mut O) -> SwarmResult<()> {
        let now = self.now;
        observer.on_tick_start(now);

        // ── Phase 1: deliver ──────────────────────────────────────────────
        while self.in_flight.front().is_some_and(|(due, _)| *due <= now) {
            if let Some((_, batch)) = self.in_flight.pop_front() {
                self.broadcast(&batch);
            }
        }
        if let Some(requests) = self.requests.remove(&now) {
            for (bridge, spec) in requests {
                self.inject_bridge(bridge, &spec);
            }
        }

        // ── Phase 2: agents ───────────────────────────────────────────────
        let reports = self.evaluate_agents();

        // ── Phase 3: replicate ────────────────────────────────────────────
        //
        // Drained in ascending AgentId order, so a later writer of the same
        // key wins on every replica regardless of the evaluation order.
        let batch: Vec<Update> = self.agents.iter_mut().flat_map(|a| a.kb.drain_outgoing()).collect();
        let updates = batch.len();
        if !batch.is_empty() {
            self.in_flight.push_back((now + 1 + self.replication_delay_ticks, batch));
        }

        // ── Phase 4: track ────────────────────────────────────────────────
        let elapsed_secs = now.0 as f64 * self.config.tick_duration_secs;
        for area in &mut self.areas {
            for agent in &self.agents {
                let altitude = agent.platform.altitude_m();
                if altitude > 0.0 {
                    area.tracker.observe(agent.platform.position(), altitude);
                }
            }
            area.tracker.record(now, elapsed_secs)?;
        }

        let mut summary = TickSummary { tick: now, elapsed_secs, updates, coverage: self.coverage(), ..TickSummary::default() };
        for (agent, report) in self.agents.iter().zip(&reports) {
            match report.readiness {
                Some(TickOutcome::Advanced { .. }) => summary.advanced += 1,
                Some(TickOutcome::Holding)         => summary.holding += 1,
                Some(TickOutcome::Completed)       => summary.completed += 1,
                _                                  => {}
            }
            if agent.kb.agent_bridge(agent.id).is_some() {
                summary.relays += 1;
            }
            observer.on_agent_tick(now, agent, report);
        }
        observer.on_tick_end(&summary);

        self.now = now + 1;
        Ok(())
    }

    fn evaluate_agents(&mut self) -> Vec<AgentTickReport> {
        let dt = self.config.tick_duration_secs;

        #[cfg(not(feature = "parallel"))]
        {
            self.agents.iter_mut().map(|agent| agent.tick(dt)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.agents.par_iter_mut().map(|agent| agent.tick(dt)).collect()
        }
    }

    fn broadcast(&mut self, batch: &[Update]) {
        for agent in &mut self.agents {
            agent.kb.merge_remote(batch);
        }
    }

    /// Register the bridge's regions and endpoints on the operator replica
    /// and push them, with the trigger, to every agent at once.
    fn inject_bridge(&mut self, bridge: BridgeId, spec: &BridgeSpec) {
        let source = self.allocate_region();
        let sink = self.allocate_region();
        self.controller.register_region(source, spec.source.into());
        self.controller.register_region(sink, spec.sink.into());
        self.controller.register_bridge(bridge, source, sink);
        self.controller.set_global(Key::BridgeRequested, true);

        let batch = self.controller.drain_outgoing();
        self.broadcast(&batch);
        info!(%bridge, tick = self.now.0, "bridge requested");
        debug!(%bridge, %source, %sink, "bridge regions registered");
    }

    fn allocate_region(&mut self) -> RegionId {
        let id = RegionId(self.next_region);
        self.next_region += 1;
        id
    }
}
