//! Control-tick counter and run configuration.
//!
//! Coordination logic is driven once per agent per control tick by an
//! external scheduler (typically one tick per second).  `Tick` is the
//! canonical time unit; nothing in the coordination core reads a wall clock.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute control-tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SwarmConfig ───────────────────────────────────────────────────────────────

/// Swarm-wide coordination parameters.
///
/// Typically loaded from a TOML scenario by the application crate and
/// published into every agent's knowledge replica at start-up.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SwarmConfig {
    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Total control ticks to run.
    pub total_ticks: u64,

    /// Seconds of flight time one tick represents.  Default: 1.
    pub tick_duration_secs: f64,

    /// Number of agents; ids are `0..total_agents`.
    pub total_agents: u32,

    /// Altitude of rank 0, metres.
    pub min_altitude_m: f64,

    /// Vertical separation between consecutive ranks, metres.
    pub height_difference_m: f64,

    /// Gate waypoint advance on the readiness quorum.
    pub wait_for_peers: bool,

    /// Range of the high-bandwidth radio used for bridging, metres.
    pub comm_range_m: f64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            seed:                42,
            total_ticks:         600,
            tick_duration_secs:  1.0,
            total_agents:        4,
            min_altitude_m:      5.0,
            height_difference_m: 1.0,
            wait_for_peers:      true,
            comm_range_m:        30.0,
        }
    }
}

impl SwarmConfig {
    /// The tick at which a run ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Reject values no run can use: a non-positive tick length or comm
    /// range, or negative or non-finite altitudes.
    pub fn validate(&self) -> CoreResult<()> {
        let positive = [("tick_duration_secs", self.tick_duration_secs), ("comm_range_m", self.comm_range_m)];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(CoreError::InvalidConfig { field, value, reason: "must be positive and finite" });
            }
        }
        let altitudes = [("min_altitude_m", self.min_altitude_m), ("height_difference_m", self.height_difference_m)];
        for (field, value) in altitudes {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(CoreError::InvalidConfig { field, value, reason: "must be non-negative and finite" });
            }
        }
        Ok(())
    }

    /// Staggered cruise altitude for the agent at `rank` within its area.
    #[inline]
    pub fn altitude_for_rank(&self, rank: usize) -> f64 {
        self.min_altitude_m + self.height_difference_m * rank as f64
    }
}
