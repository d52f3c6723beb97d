//! The readiness quorum: may this agent move past its current waypoint?

use swarm_core::{AgentId, AreaId};
use swarm_knowledge::SwarmSnapshot;

/// `true` iff every available peer in `area` has published a waypoint index
/// at least `my_index`.
///
/// Peers are agents that are mobile, not busy, assigned to `area`, and not
/// `my_id`.  A peer whose index has not replicated yet is skipped, and an
/// empty peer set satisfies the quorum.  Stale or missing data therefore
/// lets the agent advance rather than blocking it.
pub fn readiness_quorum_met(my_id: AgentId, my_index: i64, area: AreaId, snapshot: &SwarmSnapshot) -> bool {
    snapshot
        .available_in_area(area)
        .filter(|&peer| peer != my_id)
        .filter_map(|peer| snapshot.target_index[peer.index()])
        .all(|index| index >= my_index)
}

/// Peers still behind `my_index`, ascending id order.  Diagnostic only.
pub fn lagging_peers(my_id: AgentId, my_index: i64, area: AreaId, snapshot: &SwarmSnapshot) -> Vec<AgentId> {
    snapshot
        .available_in_area(area)
        .filter(|&peer| peer != my_id)
        .filter(|peer| snapshot.target_index[peer.index()].is_some_and(|index| index < my_index))
        .collect()
}
