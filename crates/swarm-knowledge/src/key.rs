//! Structured store keys.

use std::fmt;

use swarm_core::{AgentId, AreaId, BridgeId, RegionId};

/// Per-agent published fields.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentField {
    /// Flying and available for tasking.
    Mobile,
    /// Bridging or otherwise unavailable for coverage.
    Busy,
    AssignedArea,
    AssignedBridge,
    Latitude,
    Longitude,
    Altitude,
    /// Last reached waypoint index, published for the readiness quorum.
    TargetIndex,
    TargetLatitude,
    TargetLongitude,
    AssignedAltitude,
    /// External request to swap to the follow-on coverage strategy.
    NextCoverageRequested,
}

impl AgentField {
    pub fn name(self) -> &'static str {
        match self {
            AgentField::Mobile                => "mobile",
            AgentField::Busy                  => "busy",
            AgentField::AssignedArea          => "area_id",
            AgentField::AssignedBridge        => "bridge_id",
            AgentField::Latitude              => "latitude",
            AgentField::Longitude             => "longitude",
            AgentField::Altitude              => "altitude",
            AgentField::TargetIndex           => "target_index",
            AgentField::TargetLatitude        => "target_latitude",
            AgentField::TargetLongitude       => "target_longitude",
            AgentField::AssignedAltitude      => "assigned_altitude",
            AgentField::NextCoverageRequested => "next_coverage_requested",
        }
    }
}

/// A key in the shared store.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    Agent(AgentId, AgentField),
    TotalAgents,
    /// Bridging radio range in metres.
    CommRange,
    /// Search area → region id.
    SearchArea(AreaId),
    /// Region id → region shape.
    Region(RegionId),
    TotalBridges,
    BridgeSource(BridgeId),
    BridgeSink(BridgeId),
    /// Whether this agent has evaluated the bridge.  Always local.
    BridgeChecked(BridgeId),
    /// Trigger asking agents to (re)evaluate open bridges.
    BridgeRequested,
}

impl Key {
    /// Swarm-wide edge triggers.  Each agent acknowledges a trigger by
    /// clearing it locally; a fresh remote write re-arms it.
    #[inline]
    pub fn is_trigger(&self) -> bool {
        matches!(self, Key::BridgeRequested)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Agent(id, field)  => write!(f, "device.{}.{}", id.0, field.name()),
            Key::TotalAgents       => f.write_str("devices"),
            Key::CommRange         => f.write_str("comm_range"),
            Key::SearchArea(a)     => write!(f, "search_area.{}", a.0),
            Key::Region(r)         => write!(f, "region.{}", r.0),
            Key::TotalBridges      => f.write_str("bridges"),
            Key::BridgeSource(b)   => write!(f, "bridge.{}.source", b.0),
            Key::BridgeSink(b)     => write!(f, "bridge.{}.sink", b.0),
            Key::BridgeChecked(b)  => write!(f, ".bridge.{}.checked", b.0),
            Key::BridgeRequested   => f.write_str("bridge_requested"),
        }
    }
}
