//! The `KnowledgeBase` contract and typed helpers on top of it.

use swarm_core::{AgentId, AreaId, BridgeId, Position, Region, RegionId, RegionShape};

use crate::{AgentField, Key, KnowledgeError, KnowledgeResult, Scope, Value};

/// One agent's view of the shared store.
///
/// Reads are point-in-time: a key written locally is visible to the next
/// `get` on the same replica, while peers' writes arrive with unspecified
/// delay.  A missing key reads as `None`.
pub trait KnowledgeBase {
    fn get(&self, key: &Key) -> Option<Value>;

    fn set(&mut self, key: Key, value: Value, scope: Scope);
}

impl<K: KnowledgeBase + ?Sized> KnowledgeBase for &mut K {
    #[inline]
    fn get(&self, key: &Key) -> Option<Value> {
        (**self).get(key)
    }

    #[inline]
    fn set(&mut self, key: Key, value: Value, scope: Scope) {
        (**self).set(key, value, scope)
    }
}

// ── KnowledgeExt ──────────────────────────────────────────────────────────────

/// Typed accessors available on every [`KnowledgeBase`].
pub trait KnowledgeExt: KnowledgeBase {
    /// Missing keys and non-flag values read as `false`.
    fn get_bool(&self, key: &Key) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    fn get_int(&self, key: &Key) -> Option<i64> {
        self.get(key).and_then(|v| v.as_int())
    }

    fn get_float(&self, key: &Key) -> Option<f64> {
        self.get(key).and_then(|v| v.as_float())
    }

    fn get_id(&self, key: &Key) -> Option<u32> {
        self.get(key).and_then(|v| v.as_id())
    }

    fn set_global(&mut self, key: Key, value: impl Into<Value>) {
        self.set(key, value.into(), Scope::Global);
    }

    fn set_local(&mut self, key: Key, value: impl Into<Value>) {
        self.set(key, value.into(), Scope::Local);
    }

    // ── Per-agent fields ──────────────────────────────────────────────────

    fn agent_flag(&self, id: AgentId, field: AgentField) -> bool {
        self.get_bool(&Key::Agent(id, field))
    }

    fn agent_position(&self, id: AgentId) -> Option<Position> {
        let lat = self.get_float(&Key::Agent(id, AgentField::Latitude))?;
        let lon = self.get_float(&Key::Agent(id, AgentField::Longitude))?;
        Some(Position::new(lat, lon))
    }

    fn agent_area(&self, id: AgentId) -> Option<AreaId> {
        self.get_id(&Key::Agent(id, AgentField::AssignedArea)).map(AreaId)
    }

    fn agent_bridge(&self, id: AgentId) -> Option<BridgeId> {
        self.get_id(&Key::Agent(id, AgentField::AssignedBridge)).map(BridgeId)
    }

    fn agent_target_index(&self, id: AgentId) -> Option<i64> {
        self.get_int(&Key::Agent(id, AgentField::TargetIndex))
    }

    fn publish_position(&mut self, id: AgentId, p: Position, altitude_m: f64) {
        self.set_global(Key::Agent(id, AgentField::Latitude), p.lat);
        self.set_global(Key::Agent(id, AgentField::Longitude), p.lon);
        self.set_global(Key::Agent(id, AgentField::Altitude), altitude_m);
    }

    // ── Registries ────────────────────────────────────────────────────────

    fn total_agents(&self) -> u32 {
        self.get_id(&Key::TotalAgents).unwrap_or(0)
    }

    fn total_bridges(&self) -> u32 {
        self.get_id(&Key::TotalBridges).unwrap_or(0)
    }

    fn region(&self, id: RegionId) -> Option<RegionShape> {
        match self.get(&Key::Region(id)) {
            Some(Value::Region(shape)) => Some(shape),
            _                          => None,
        }
    }

    /// Resolve a search area to its (normalized) rectangle.
    fn area_region(&self, area: AreaId) -> KnowledgeResult<Region> {
        let region_id = self
            .get_id(&Key::SearchArea(area))
            .map(RegionId)
            .ok_or(KnowledgeError::AreaNotFound(area))?;
        let shape = self.region(region_id).ok_or(KnowledgeError::RegionNotFound(region_id))?;
        shape
            .as_rectangle()
            .map(|r| r.normalized())
            .ok_or(KnowledgeError::NotRectangle(region_id))
    }

    fn bridge_endpoints(&self, bridge: BridgeId) -> Option<(RegionId, RegionId)> {
        let source = self.get_id(&Key::BridgeSource(bridge))?;
        let sink = self.get_id(&Key::BridgeSink(bridge))?;
        Some((RegionId(source), RegionId(sink)))
    }

    fn register_region(&mut self, id: RegionId, shape: RegionShape) {
        self.set_global(Key::Region(id), shape);
    }

    fn register_area(&mut self, area: AreaId, region: RegionId) {
        self.set(Key::SearchArea(area), Value::Id(region.0), Scope::Global);
    }

    /// Record a bridge request and grow `TotalBridges` to cover it.
    fn register_bridge(&mut self, bridge: BridgeId, source: RegionId, sink: RegionId) {
        self.set(Key::BridgeSource(bridge), Value::Id(source.0), Scope::Global);
        self.set(Key::BridgeSink(bridge), Value::Id(sink.0), Scope::Global);
        let total = self.total_bridges().max(bridge.0 + 1);
        self.set(Key::TotalBridges, Value::Id(total), Scope::Global);
    }
}

impl<K: KnowledgeBase + ?Sized> KnowledgeExt for K {}
