//! `SwarmSnapshot`: Structure-of-Arrays view of every agent's published
//! state, captured from one replica at one instant.
//!
//! Coordinators scan all peers several times per tick (rank, quorum,
//! available relays).  Capturing once gives each scan the same consistent
//! point-in-time picture and keeps the scans cache-friendly:
//!
//! ```ignore
//! let snap = SwarmSnapshot::capture(&kb);
//! let rank = snap.rank_in_area(me, area);
//! ```

use swarm_core::{AgentId, AreaId, BridgeId, Position};

use crate::{AgentField, Key, KnowledgeBase, KnowledgeExt};

/// Every `Vec` has exactly `count` elements; `AgentId` is the index.
#[derive(Clone, Debug, Default)]
pub struct SwarmSnapshot {
    pub count: usize,

    pub mobile: Vec<bool>,
    pub busy:   Vec<bool>,

    /// `AreaId::INVALID` when unassigned or not yet replicated.
    pub area:   Vec<AreaId>,
    /// `BridgeId::INVALID` when unassigned.
    pub bridge: Vec<BridgeId>,

    pub position:     Vec<Option<Position>>,
    /// Last published waypoint index; `None` if never published.
    pub target_index: Vec<Option<i64>>,
}

impl SwarmSnapshot {
    /// Capture agents `0..kb.total_agents()`.
    pub fn capture<K: KnowledgeBase + ?Sized>(kb: &K) -> Self {
        Self::capture_n(kb, kb.total_agents() as usize)
    }

    /// Capture agents `0..count`.
    pub fn capture_n<K: KnowledgeBase + ?Sized>(kb: &K, count: usize) -> Self {
        let mut snap = SwarmSnapshot {
            count,
            mobile:       Vec::with_capacity(count),
            busy:         Vec::with_capacity(count),
            area:         Vec::with_capacity(count),
            bridge:       Vec::with_capacity(count),
            position:     Vec::with_capacity(count),
            target_index: Vec::with_capacity(count),
        };
        for i in 0..count as u32 {
            let id = AgentId(i);
            snap.mobile.push(kb.get_bool(&Key::Agent(id, AgentField::Mobile)));
            snap.busy.push(kb.get_bool(&Key::Agent(id, AgentField::Busy)));
            snap.area.push(kb.agent_area(id).unwrap_or(AreaId::INVALID));
            snap.bridge.push(kb.agent_bridge(id).unwrap_or(BridgeId::INVALID));
            snap.position.push(kb.agent_position(id));
            snap.target_index.push(kb.agent_target_index(id));
        }
        snap
    }

    /// Available for coverage: `mobile && !busy`.
    #[inline]
    pub fn is_available(&self, id: AgentId) -> bool {
        let i = id.index();
        i < self.count && self.mobile[i] && !self.busy[i]
    }

    /// Available agents assigned to `area`, ascending id order.
    pub fn available_in_area(&self, area: AreaId) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32)
            .map(AgentId)
            .filter(move |&id| self.is_available(id) && self.area[id.index()] == area)
    }

    /// Position of `id` in the ascending-id list of available agents in
    /// `area`, plus the size of that list.  `None` if `id` is not itself
    /// available in `area`.
    pub fn rank_in_area(&self, id: AgentId, area: AreaId) -> Option<(usize, usize)> {
        let peers: Vec<AgentId> = self.available_in_area(area).collect();
        let rank = peers.iter().position(|&p| p == id)?;
        Some((rank, peers.len()))
    }

    /// Agents eligible for relay slots of `bridge`: mobile, and either idle
    /// or already committed to this same bridge.  Agents with no known
    /// position are left out.
    pub fn bridge_candidates(&self, bridge: BridgeId) -> impl Iterator<Item = (AgentId, Position)> + '_ {
        (0..self.count).filter_map(move |i| {
            let eligible = self.mobile[i] && (!self.busy[i] || self.bridge[i] == bridge);
            match (eligible, self.position[i]) {
                (true, Some(p)) => Some((AgentId(i as u32), p)),
                _               => None,
            }
        })
    }
}
