//! What a run is asked to do: search areas to cover and bridges to form.

use swarm_core::{AgentId, Region, Tick};
use swarm_coverage::CoverageKind;

/// A search area and the team assigned to it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaSpec {
    pub region:   Region,
    pub agents:   Vec<AgentId>,
    #[cfg_attr(feature = "serde", serde(default = "default_strategy"))]
    pub strategy: CoverageKind,
}

#[cfg(feature = "serde")]
fn default_strategy() -> CoverageKind {
    CoverageKind::Snake
}

impl AreaSpec {
    pub fn new(region: Region, agents: impl IntoIterator<Item = AgentId>, strategy: CoverageKind) -> Self {
        Self { region, agents: agents.into_iter().collect(), strategy }
    }
}

/// A bridge request injected by the operator at `requested_at`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BridgeSpec {
    pub source:       Region,
    pub sink:         Region,
    #[cfg_attr(feature = "serde", serde(default))]
    pub requested_at: Tick,
}
