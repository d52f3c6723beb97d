//! Fluent builder for constructing a [`Swarm`].

use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;

use swarm_bridge::BridgeCoordinator;
use swarm_core::{Actuator, AgentId, AreaId, BridgeId, MovementCommand, Position, RegionId, SwarmConfig, Tick};
use swarm_coverage::{CoverageParams, CoverageTracker, TrackerParams};
use swarm_knowledge::{AgentField, InMemoryKnowledge, Key, KnowledgeBase, KnowledgeExt, Scope, Value};
use swarm_readiness::{AgentState, ReadinessCoordinator};
use tracing::info;

use crate::{AreaSpec, AreaTracker, BridgeSpec, PlatformParams, SimAgent, SimPlatform, Swarm, SwarmError, SwarmResult};

/// Fluent builder for [`Swarm`].
///
/// # Optional inputs (have defaults)
///
/// | Method                       | Default                                   |
/// |------------------------------|-------------------------------------------|
/// | `.areas(v)`                  | No search areas                           |
/// | `.bridges(v)`                | No bridge requests                        |
/// | `.coverage(p)`               | `CoverageParams::default()`               |
/// | `.platform(p)`               | `PlatformParams::default()`               |
/// | `.initial_positions(v)`      | Midpoint of the agent's area, else of the first area |
/// | `.replication_delay_ticks(n)`| 0 (writes visible on the next tick)       |
/// | `.tracker(p)`                | `TrackerParams::default()`                |
/// | `.coverage_csv_dir(d)`       | No per-area coverage CSV                  |
///
/// # Example
///
/// ```rust,ignore
/// let mut swarm = SwarmBuilder::new(config)
///     .areas(vec![AreaSpec::new(region, (0..4).map(AgentId), CoverageKind::Snake)])
///     .bridges(vec![bridge])
///     .build()?;
/// swarm.run(&mut NoopObserver)?;
/// ```
pub struct SwarmBuilder {
    config:       SwarmConfig,
    areas:        Vec<AreaSpec>,
    bridges:      Vec<BridgeSpec>,
    coverage:     CoverageParams,
    platform:     PlatformParams,
    positions:    Option<Vec<Position>>,
    delay_ticks:  u64,
    tracker:      TrackerParams,
    coverage_csv: Option<PathBuf>,
}

impl SwarmBuilder {
    pub fn new(config: SwarmConfig) -> Self {
        Self {
            config,
            areas:        Vec::new(),
            bridges:      Vec::new(),
            coverage:     CoverageParams::default(),
            platform:     PlatformParams::default(),
            positions:    None,
            delay_ticks:  0,
            tracker:      TrackerParams::default(),
            coverage_csv: None,
        }
    }

    /// Search areas, registered as `AreaId(0..)` in the order given.
    pub fn areas(mut self, areas: Vec<AreaSpec>) -> Self {
        self.areas = areas;
        self
    }

    /// Bridge requests, numbered `BridgeId(0..)` in the order given.
    pub fn bridges(mut self, bridges: Vec<BridgeSpec>) -> Self {
        self.bridges = bridges;
        self
    }

    pub fn coverage(mut self, params: CoverageParams) -> Self {
        self.coverage = params;
        self
    }

    pub fn platform(mut self, params: PlatformParams) -> Self {
        self.platform = params;
        self
    }

    /// Starting position of each agent (must be length `total_agents`).
    pub fn initial_positions(mut self, positions: Vec<Position>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Extra ticks before a write reaches peers.
    pub fn replication_delay_ticks(mut self, ticks: u64) -> Self {
        self.delay_ticks = ticks;
        self
    }

    pub fn tracker(mut self, params: TrackerParams) -> Self {
        self.tracker = params;
        self
    }

    /// Write `coverage_area_<id>.csv` per search area into `dir`.
    pub fn coverage_csv_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.coverage_csv = Some(dir.into());
        self
    }

    /// Validate inputs, seed every replica, and return a ready-to-run
    /// [`Swarm`].
    pub fn build(mut self) -> SwarmResult<Swarm> {
        self.config.validate()?;
        let agent_count = self.config.total_agents as usize;

        // ── Validate area membership ──────────────────────────────────────
        let mut area_of: Vec<Option<usize>> = vec![None; agent_count];
        for (a, spec) in self.areas.iter().enumerate() {
            for &agent in &spec.agents {
                let slot = area_of.get_mut(agent.index()).ok_or_else(|| {
                    SwarmError::Config(format!("area {a} lists {agent}, but only {agent_count} agents exist"))
                })?;
                if let Some(other) = slot.replace(a) {
                    return Err(SwarmError::Config(format!("{agent} is assigned to both area {other} and area {a}")));
                }
            }
        }

        // ── Resolve initial positions ─────────────────────────────────────
        let positions = match self.positions.take() {
            Some(p) => {
                if p.len() != agent_count {
                    return Err(SwarmError::AgentCountMismatch {
                        expected: agent_count,
                        got:      p.len(),
                        what:     "initial positions",
                    });
                }
                p
            }
            None => {
                let fallback = self.areas.first().map(|a| a.region.midpoint()).unwrap_or_default();
                area_of
                    .iter()
                    .map(|a| a.map_or(fallback, |a| self.areas[a].region.midpoint()))
                    .collect()
            }
        };

        // ── Seed replicas ─────────────────────────────────────────────────
        //
        // Every replica starts from the same picture of the swarm; the
        // seeding writes are everyone's initial knowledge, not updates.
        let mut agents = Vec::with_capacity(agent_count);
        for (i, &position) in positions.iter().enumerate() {
            let id = AgentId(i as u32);
            let mut kb = InMemoryKnowledge::new(id);
            self.seed(&mut kb, &area_of, &positions);
            kb.drain_outgoing();

            let readiness = match area_of[i] {
                Some(a) => Some(ReadinessCoordinator::new(id, self.areas[a].strategy, self.coverage.clone(), &self.config)?),
                None    => None,
            };

            let mut platform = SimPlatform::new(position, self.platform);
            platform.execute(MovementCommand::Takeoff);

            agents.push(SimAgent {
                id,
                state: AgentState::new(id),
                readiness,
                bridge: BridgeCoordinator::new(id, self.config.comm_range_m),
                kb,
                platform,
            });
        }

        // ── Coverage trackers ─────────────────────────────────────────────
        let mut areas = Vec::with_capacity(self.areas.len());
        for (a, spec) in self.areas.iter().enumerate() {
            let mut tracker = CoverageTracker::new(&spec.region, self.tracker)?;
            if let Some(dir) = &self.coverage_csv {
                tracker = tracker.with_csv(&dir.join(format!("coverage_area_{a}.csv")))?;
            }
            areas.push(AreaTracker { area: AreaId(a as u32), tracker });
        }

        // ── Schedule bridge requests ──────────────────────────────────────
        let mut requests: BTreeMap<_, Vec<_>> = BTreeMap::new();
        for (b, spec) in std::mem::take(&mut self.bridges).into_iter().enumerate() {
            requests.entry(spec.requested_at).or_default().push((BridgeId(b as u32), spec));
        }

        info!(
            agents = agent_count,
            areas = areas.len(),
            bridges = requests.values().map(Vec::len).sum::<usize>(),
            seed = self.config.seed,
            "swarm built"
        );

        Ok(Swarm {
            now:                     Tick::ZERO,
            agents,
            areas,
            replication_delay_ticks: self.delay_ticks,
            in_flight:               VecDeque::new(),
            controller:              InMemoryKnowledge::new(AgentId::INVALID),
            requests,
            next_region:             self.areas.len() as u32,
            config:                  self.config,
        })
    }

    fn seed(&self, kb: &mut InMemoryKnowledge, area_of: &[Option<usize>], positions: &[Position]) {
        kb.set(Key::TotalAgents, Value::Id(self.config.total_agents), Scope::Global);
        kb.set_global(Key::CommRange, self.config.comm_range_m);
        for (a, spec) in self.areas.iter().enumerate() {
            kb.register_region(RegionId(a as u32), spec.region.into());
            kb.register_area(AreaId(a as u32), RegionId(a as u32));
        }
        for (i, area) in area_of.iter().enumerate() {
            let id = AgentId(i as u32);
            kb.set_global(Key::Agent(id, AgentField::Mobile), true);
            kb.set_global(Key::Agent(id, AgentField::Busy), false);
            if let Some(a) = area {
                kb.set(Key::Agent(id, AgentField::AssignedArea), Value::Id(*a as u32), Scope::Global);
            }
            kb.publish_position(id, positions[i], 0.0);
        }
    }
}
