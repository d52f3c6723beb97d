//! Strategy selection: `CoverageKind` names a pattern, `CoverageParams`
//! carries every pattern's tuning and builds fresh instances.

use std::fmt;
use std::str::FromStr;

use swarm_core::AgentId;

use crate::{
    CoverageError, CoverageResult, CoverageStrategy, InsideOutCoverage, InsideOutParams, PriorityCoverage,
    PriorityParams, RandomCoverage, SnakeCoverage, SnakeParams,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CoverageKind {
    Snake,
    Random,
    InsideOut,
    Priority,
}

impl CoverageKind {
    pub const ALL: [CoverageKind; 4] =
        [CoverageKind::Snake, CoverageKind::Random, CoverageKind::InsideOut, CoverageKind::Priority];

    pub fn as_str(self) -> &'static str {
        match self {
            CoverageKind::Snake     => "snake",
            CoverageKind::Random    => "random",
            CoverageKind::InsideOut => "inside_out",
            CoverageKind::Priority  => "priority",
        }
    }
}

impl fmt::Display for CoverageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverageKind {
    type Err = CoverageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "snake"      => Ok(CoverageKind::Snake),
            "random"     => Ok(CoverageKind::Random),
            "inside_out" => Ok(CoverageKind::InsideOut),
            "priority"   => Ok(CoverageKind::Priority),
            _            => Err(CoverageError::UnknownKind(s.to_owned())),
        }
    }
}

// ── CoverageParams ────────────────────────────────────────────────────────────

/// Tuning for every strategy plus the pattern to switch to once the first
/// one finishes.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoverageParams {
    pub snake:      SnakeParams,
    pub inside_out: InsideOutParams,
    pub priority:   PriorityParams,
    /// Pattern selected after the current one reports its final waypoint.
    pub follow_on:  Option<CoverageKind>,
}

impl CoverageParams {
    /// A fresh, uninitialized strategy of `kind` for `agent`.
    ///
    /// `seed` only matters for [`CoverageKind::Random`].
    pub fn build(&self, kind: CoverageKind, seed: u64, agent: AgentId) -> CoverageResult<Box<dyn CoverageStrategy>> {
        Ok(match kind {
            CoverageKind::Snake     => Box::new(SnakeCoverage::new(self.snake)?),
            CoverageKind::Random    => Box::new(RandomCoverage::new(seed, agent)),
            CoverageKind::InsideOut => Box::new(InsideOutCoverage::new(self.inside_out)?),
            CoverageKind::Priority  => Box::new(PriorityCoverage::new(self.priority.clone())),
        })
    }
}
