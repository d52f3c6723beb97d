//! Relay slot placement and greedy agent-to-slot assignment.
//!
//! Pure functions: no store access, no randomness.  Identical inputs give
//! identical assignments on every agent.
//!
//! # Algorithm
//!
//! ```text
//! relays = ceil(length / comm_range) + 1
//! slot i = sink + (source − sink) · i / (relays − 1)      i = 0..relays
//!          (a single relay parks on the source)
//! triples = (agent, slot, distance) for every agent × slot
//! stable-sort triples by distance
//! accept each triple whose agent and slot are both still free
//! ```
//!
//! The greedy pass is an approximate minimum-weight bipartite matching,
//! not an optimal one.

use std::collections::BTreeMap;

use swarm_core::{AgentId, Position};

/// Slots plus which agent fills which slot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelayAssignment {
    /// Slot positions, index 0 at the sink.
    pub slots:      Vec<Position>,
    /// Slot index per assigned agent.
    pub agent_slot: BTreeMap<AgentId, usize>,
}

impl RelayAssignment {
    #[inline]
    pub fn relay_count(&self) -> usize {
        self.slots.len()
    }

    pub fn position_of(&self, agent: AgentId) -> Option<Position> {
        self.agent_slot.get(&agent).map(|&slot| self.slots[slot])
    }

    /// Slots no agent was assigned to.
    pub fn unfilled(&self) -> usize {
        self.slots.len() - self.agent_slot.len()
    }
}

/// Upper bound on relay slots for one bridge.  Planning allocates one
/// candidate triple per (agent, slot) pair.
pub const MAX_RELAYS: usize = 1 << 12;

/// Relays needed to span `length_m` with radios of `comm_range_m`.
///
/// `None` for a non-positive or non-finite range, a non-finite length, or
/// a bridge needing more than [`MAX_RELAYS`] slots.
pub fn relay_count(length_m: f64, comm_range_m: f64) -> Option<usize> {
    if !(comm_range_m > 0.0 && comm_range_m.is_finite() && length_m.is_finite()) {
        return None;
    }
    let count = (length_m.max(0.0) / comm_range_m).ceil() + 1.0;
    (count >= 1.0 && count <= MAX_RELAYS as f64).then_some(count as usize)
}

/// Evenly spaced slots from `sink` (index 0) to `source` (last index).
pub fn relay_slots(source: Position, sink: Position, count: usize) -> Vec<Position> {
    match count {
        0 => Vec::new(),
        1 => vec![source],
        n => (0..n)
            .map(|i| sink.lerp(source, i as f64 / (n - 1) as f64))
            .collect(),
    }
}

/// Full greedy assignment for a bridge.
pub fn plan_assignment(
    comm_range_m: f64,
    source:       Position,
    sink:         Position,
    available:    &BTreeMap<AgentId, Position>,
) -> Option<RelayAssignment> {
    let count = relay_count(source.distance_m(sink), comm_range_m)?;
    let slots = relay_slots(source, sink, count);

    let mut triples: Vec<(AgentId, usize, f64)> = Vec::with_capacity(available.len() * slots.len());
    for (&agent, &at) in available {
        for (slot, &pos) in slots.iter().enumerate() {
            triples.push((agent, slot, at.distance_m(pos)));
        }
    }
    triples.sort_by(|a, b| a.2.total_cmp(&b.2));

    let mut agent_slot = BTreeMap::new();
    let mut slot_taken = vec![false; slots.len()];
    for (agent, slot, _) in triples {
        if slot_taken[slot] || agent_slot.contains_key(&agent) {
            continue;
        }
        slot_taken[slot] = true;
        agent_slot.insert(agent, slot);
    }

    Some(RelayAssignment { slots, agent_slot })
}

/// The slot `my_id` should fly to, or `None` if it is not needed.
pub fn plan(
    my_id:        AgentId,
    comm_range_m: f64,
    source:       Position,
    sink:         Position,
    available:    &BTreeMap<AgentId, Position>,
) -> Option<Position> {
    plan_assignment(comm_range_m, source, sink, available)?.position_of(my_id)
}
