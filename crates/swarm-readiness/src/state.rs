//! Per-agent coverage state and the sensor inputs a tick consumes.

use swarm_core::{AgentId, AreaId, BridgeId, Position, Region};
use swarm_knowledge::{AgentField, KnowledgeBase, KnowledgeExt};

/// Everything one agent tracks about its own coverage progress.
///
/// Owned by exactly one agent and mutated only by its
/// [`ReadinessCoordinator`](crate::ReadinessCoordinator).  The `mobile`,
/// `busy`, area and bridge fields mirror the agent's own published keys and
/// are refreshed at the start of every tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    pub id:              AgentId,
    pub mobile:          bool,
    pub busy:            bool,
    pub assigned_area:   Option<AreaId>,
    pub assigned_bridge: Option<BridgeId>,

    /// Cell returned by the strategy's `initialize`.
    pub cell_region:                 Option<Region>,
    pub last_reached_waypoint_index: i64,
    /// Reached the current waypoint; holding until allowed to advance.
    pub waiting:                     bool,
    pub first_waypoint_selected:     bool,
    pub cell_initialized:            bool,

    /// Set the first time the staggered altitude is reported reached.
    /// Never cleared: later altitude drops are not waited on again.
    pub altitude_latched:  bool,
    pub assigned_altitude: Option<f64>,
    /// Last waypoint handed to the actuator.
    pub current_target:    Option<Position>,
}

impl AgentState {
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            mobile:                      false,
            busy:                        false,
            assigned_area:               None,
            assigned_bridge:             None,
            cell_region:                 None,
            last_reached_waypoint_index: 0,
            waiting:                     false,
            first_waypoint_selected:     false,
            cell_initialized:            false,
            altitude_latched:            false,
            assigned_altitude:           None,
            current_target:              None,
        }
    }

    /// Re-read this agent's own status keys from `kb`.
    pub fn refresh<K: KnowledgeBase + ?Sized>(&mut self, kb: &K) {
        self.mobile = kb.agent_flag(self.id, AgentField::Mobile);
        self.busy = kb.agent_flag(self.id, AgentField::Busy);
        self.assigned_area = kb.agent_area(self.id);
        self.assigned_bridge = kb.agent_bridge(self.id);
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.mobile && !self.busy
    }

    /// Forget the current cell so the next tick ranks and initializes again.
    /// The altitude latch survives.
    pub fn reset_cell(&mut self) {
        self.cell_region = None;
        self.cell_initialized = false;
        self.first_waypoint_selected = false;
        self.waiting = false;
    }
}

/// Per-tick readings from the position and sensor collaborator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Telemetry {
    pub position:           Position,
    pub altitude_m:         f64,
    /// The last `MoveToGps` target has been reached.
    pub gps_target_reached: bool,
    /// The last `MoveToAltitude` target has been reached.
    pub altitude_reached:   bool,
}

impl Telemetry {
    pub fn at(position: Position, altitude_m: f64) -> Self {
        Self { position, altitude_m, gps_target_reached: false, altitude_reached: false }
    }
}
