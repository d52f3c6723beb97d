//! Per-agent, per-tick bridge evaluation.
//!
//! # Tick
//!
//! 1. If the swarm-wide "bridge requested" trigger is set, clear it on this
//!    replica only.  Peers that have not yet seen the trigger still will.
//! 2. If this agent is mobile and idle, walk the open bridges it has not
//!    checked yet:
//!    - endpoints that do not resolve (missing, non-rectangular) are left
//!      unchecked and retried next tick;
//!    - otherwise plan, then mark the bridge checked for this agent,
//!      permanently, whatever the plan said;
//!    - if the plan has a slot for this agent, become busy on this bridge,
//!      publish the target and fly there.  The walk goes on: the remaining
//!      bridges are planned without this agent, which is now busy, and are
//!      marked checked all the same.
//!
//! A checked bridge is never re-planned by this agent, even if more agents
//! become available later.

use std::collections::BTreeMap;

use swarm_core::{Actuator, AgentId, BridgeId, MovementCommand, Position};
use swarm_knowledge::{AgentField, Key, KnowledgeBase, KnowledgeExt, Scope, SwarmSnapshot, Value};
use tracing::{debug, info};

use crate::{plan, resolve_endpoints};

/// What one tick did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BridgeReport {
    pub trigger_cleared: bool,
    /// Bridges planned and marked checked this tick.
    pub checked:         Vec<BridgeId>,
    /// Bridges skipped because their endpoints did not resolve.
    pub deferred:        Vec<BridgeId>,
    pub assigned:        Option<(BridgeId, Position)>,
}

impl BridgeReport {
    pub fn is_noop(&self) -> bool {
        *self == BridgeReport::default()
    }
}

#[derive(Clone, Debug)]
pub struct BridgeCoordinator {
    id:           AgentId,
    /// Fallback when the store carries no `CommRange`.
    comm_range_m: f64,
}

impl BridgeCoordinator {
    pub fn new(id: AgentId, comm_range_m: f64) -> Self {
        Self { id, comm_range_m }
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn tick<K, A>(&mut self, kb: &mut K, actuator: &mut A) -> BridgeReport
    where
        K: KnowledgeBase + ?Sized,
        A: Actuator + ?Sized,
    {
        let mut report = BridgeReport::default();

        if kb.get_bool(&Key::BridgeRequested) {
            kb.set_local(Key::BridgeRequested, false);
            report.trigger_cleared = true;
        }

        let mobile = kb.agent_flag(self.id, AgentField::Mobile);
        let busy = kb.agent_flag(self.id, AgentField::Busy);
        let total = kb.total_bridges();
        if !mobile || busy || total == 0 {
            return report;
        }

        let comm_range = kb.get_float(&Key::CommRange).unwrap_or(self.comm_range_m);
        let mut snapshot = SwarmSnapshot::capture(&*kb);

        for bridge in (0..total).map(BridgeId) {
            if kb.get_bool(&Key::BridgeChecked(bridge)) {
                continue;
            }

            let (source, sink) = match resolve_endpoints(&*kb, bridge) {
                Ok(endpoints) => endpoints,
                Err(e) => {
                    debug!(agent = %self.id, %bridge, error = %e, "bridge endpoints unresolved; retrying next tick");
                    report.deferred.push(bridge);
                    continue;
                }
            };

            let available: BTreeMap<AgentId, Position> = snapshot.bridge_candidates(bridge).collect();
            let target = plan(self.id, comm_range, source, sink, &available);

            kb.set_local(Key::BridgeChecked(bridge), true);
            report.checked.push(bridge);

            let Some(target) = target else {
                debug!(agent = %self.id, %bridge, candidates = available.len(), "no relay slot for this agent");
                continue;
            };

            kb.set_global(Key::Agent(self.id, AgentField::Busy), true);
            kb.set(Key::Agent(self.id, AgentField::AssignedBridge), Value::Id(bridge.0), Scope::Global);
            kb.set_global(Key::Agent(self.id, AgentField::TargetLatitude), target.lat);
            kb.set_global(Key::Agent(self.id, AgentField::TargetLongitude), target.lon);
            actuator.execute(MovementCommand::MoveToGps(target));

            info!(agent = %self.id, %bridge, %target, "joined bridge as relay");
            report.assigned = Some((bridge, target));
            // Later bridges must see this agent as busy.
            snapshot = SwarmSnapshot::capture(&*kb);
        }

        report
    }
}
