//! Unit tests for swarm-bridge.

use std::collections::BTreeMap;

use swarm_core::{AgentId, BridgeId, CommandLog, MovementCommand, Position, Region, RegionId, RegionShape};
use swarm_knowledge::{AgentField, InMemoryKnowledge, Key, KnowledgeBase, KnowledgeExt, Scope, Value};

use crate::{
    BridgeCoordinator, BridgeError, MAX_RELAYS, plan, plan_assignment, relay_count, relay_slots, resolve_endpoints,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const SOURCE: Position = Position::new(40.4410, -79.9470);
const SINK: Position = Position::new(40.4415, -79.9470);

fn square_around(c: Position, half: f64) -> Region {
    Region::new(Position::new(c.lat + half, c.lon - half), Position::new(c.lat - half, c.lon + half))
}

fn agents(positions: &[(u32, Position)]) -> BTreeMap<AgentId, Position> {
    positions.iter().map(|&(id, p)| (AgentId(id), p)).collect()
}

/// Replica owned by `owner` that already knows `n` idle agents, the given
/// positions, and one bridge from `SOURCE` to `SINK`.
fn replica(owner: u32, n: u32, positions: &[(u32, Position)]) -> InMemoryKnowledge {
    let mut kb = InMemoryKnowledge::new(AgentId(owner));
    kb.set(Key::TotalAgents, Value::Id(n), Scope::Global);
    for id in 0..n {
        kb.set_global(Key::Agent(AgentId(id), AgentField::Mobile), true);
        kb.set_global(Key::Agent(AgentId(id), AgentField::Busy), false);
    }
    for &(id, p) in positions {
        kb.publish_position(AgentId(id), p, 10.0);
    }
    kb.register_region(RegionId(0), square_around(SOURCE, 0.0001).into());
    kb.register_region(RegionId(1), square_around(SINK, 0.0001).into());
    kb.register_bridge(BridgeId(0), RegionId(0), RegionId(1));
    kb
}

fn three_relays() -> Vec<(u32, Position)> {
    vec![
        (0, Position::new(40.4416, -79.9470)),  // beyond the sink
        (1, Position::new(40.44124, -79.9470)), // near the middle
        (2, Position::new(40.4409, -79.9470)),  // beyond the source
    ]
}

// ── Planner ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn relay_count_for_short_bridge() {
        let length = SOURCE.distance_m(SINK);
        assert_eq!(relay_count(length, 30.0), Some(3));
        assert_eq!(relay_count(0.0, 30.0), Some(1));
        assert_eq!(relay_count(60.0, 30.0), Some(3));
        assert_eq!(relay_count(length, 0.0), None);
        assert_eq!(relay_count(length, -5.0), None);
        assert_eq!(relay_count(f64::NAN, 30.0), None);
    }

    #[test]
    fn absurdly_short_range_is_refused() {
        assert_eq!(relay_count(50.0, 1e-6), None);
        assert_eq!(relay_count(MAX_RELAYS as f64 - 1.0, 1.0), Some(MAX_RELAYS));
        assert_eq!(relay_count(MAX_RELAYS as f64, 1.0), None);
        assert!(plan_assignment(1e-6, SOURCE, SINK, &agents(&three_relays())).is_none());
    }

    #[test]
    fn slots_run_from_sink_to_source() {
        let slots = relay_slots(SOURCE, SINK, 3);
        assert_eq!(slots[0], SINK);
        assert!(slots[2].approx_eq(SOURCE, 1e-12));
        assert!(slots[1].approx_eq(Position::new(40.44125, -79.9470), 1e-12));
        assert_eq!(relay_slots(SOURCE, SINK, 1), vec![SOURCE]);
        assert!(relay_slots(SOURCE, SINK, 0).is_empty());
    }

    #[test]
    fn nearest_agents_fill_nearest_slots() {
        let available = agents(&three_relays());
        let a = plan_assignment(30.0, SOURCE, SINK, &available).unwrap();
        assert_eq!(a.relay_count(), 3);
        assert_eq!(a.agent_slot[&AgentId(0)], 0);
        assert_eq!(a.agent_slot[&AgentId(1)], 1);
        assert_eq!(a.agent_slot[&AgentId(2)], 2);
        assert_eq!(a.unfilled(), 0);
        assert!(plan(AgentId(2), 30.0, SOURCE, SINK, &available).unwrap().approx_eq(SOURCE, 1e-12));
    }

    #[test]
    fn deterministic_across_calls() {
        let available = agents(&three_relays());
        let first = plan_assignment(30.0, SOURCE, SINK, &available);
        for _ in 0..10 {
            assert_eq!(plan_assignment(30.0, SOURCE, SINK, &available), first);
        }
    }

    #[test]
    fn too_few_agents_leaves_slots_unfilled() {
        let available = agents(&three_relays()[..1]);
        let a = plan_assignment(30.0, SOURCE, SINK, &available).unwrap();
        assert_eq!(a.agent_slot.len(), 1);
        assert_eq!(a.unfilled(), 2);
        assert_eq!(plan(AgentId(5), 30.0, SOURCE, SINK, &available), None);
    }

    #[test]
    fn zero_length_bridge_parks_nearest_agent_on_source() {
        let available = agents(&[
            (0, Position::new(40.4500, -79.9470)),
            (1, Position::new(40.4411, -79.9470)),
        ]);
        assert_eq!(plan(AgentId(1), 30.0, SOURCE, SOURCE, &available), Some(SOURCE));
        assert_eq!(plan(AgentId(0), 30.0, SOURCE, SOURCE, &available), None);
    }

    #[test]
    fn equidistant_ties_go_to_lower_id() {
        let p = Position::new(40.4420, -79.9470);
        let available = agents(&[(3, p), (7, p)]);
        assert_eq!(plan(AgentId(3), 30.0, SOURCE, SOURCE, &available), Some(SOURCE));
        assert_eq!(plan(AgentId(7), 30.0, SOURCE, SOURCE, &available), None);
    }

    proptest! {
        #[test]
        fn assignment_is_a_partial_bijection(
            offsets in prop::collection::vec((-0.002f64..0.002, -0.002f64..0.002), 0..12),
            range in 5.0f64..80.0,
        ) {
            let available: BTreeMap<AgentId, Position> = offsets
                .iter()
                .enumerate()
                .map(|(i, &(dlat, dlon))| (AgentId(i as u32), Position::new(SOURCE.lat + dlat, SOURCE.lon + dlon)))
                .collect();
            let a = plan_assignment(range, SOURCE, SINK, &available).unwrap();

            let mut used = vec![false; a.relay_count()];
            for &slot in a.agent_slot.values() {
                prop_assert!(!used[slot]);
                used[slot] = true;
            }
            prop_assert_eq!(a.agent_slot.len(), available.len().min(a.relay_count()));
            prop_assert_eq!(plan_assignment(range, SOURCE, SINK, &available), Some(a));
        }
    }
}

// ── Endpoint resolution ───────────────────────────────────────────────────────

#[cfg(test)]
mod request {
    use super::*;

    #[test]
    fn rectangles_resolve_to_midpoints() {
        let kb = replica(0, 1, &[]);
        let (source, sink) = resolve_endpoints(&kb, BridgeId(0)).unwrap();
        assert!(source.approx_eq(SOURCE, 1e-12));
        assert!(sink.approx_eq(SINK, 1e-12));
    }

    #[test]
    fn unresolvable_requests() {
        let mut kb = replica(0, 1, &[]);
        assert!(matches!(resolve_endpoints(&kb, BridgeId(4)), Err(BridgeError::MissingRequest(_))));

        kb.register_region(RegionId(1), RegionShape::Polygon { vertices: vec![SINK] });
        assert!(matches!(
            resolve_endpoints(&kb, BridgeId(0)),
            Err(BridgeError::UnsupportedRegion { region: RegionId(1), .. })
        ));

        kb.register_bridge(BridgeId(1), RegionId(0), RegionId(9));
        assert!(matches!(resolve_endpoints(&kb, BridgeId(1)), Err(BridgeError::Knowledge(_))));
    }
}

// ── Coordinator ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod coordinator {
    use super::*;

    #[test]
    fn middle_agent_joins_middle_slot() {
        let mut kb = replica(1, 3, &three_relays());
        let mut log = CommandLog::new();
        let report = BridgeCoordinator::new(AgentId(1), 30.0).tick(&mut kb, &mut log);

        let (bridge, target) = report.assigned.unwrap();
        assert_eq!(bridge, BridgeId(0));
        assert!(target.approx_eq(Position::new(40.44125, -79.9470), 1e-9));
        assert_eq!(report.checked, vec![BridgeId(0)]);

        assert!(kb.agent_flag(AgentId(1), AgentField::Busy));
        assert_eq!(kb.agent_bridge(AgentId(1)), Some(BridgeId(0)));
        assert_eq!(kb.get_float(&Key::Agent(AgentId(1), AgentField::TargetLatitude)), Some(target.lat));
        assert_eq!(log.commands, vec![MovementCommand::MoveToGps(target)]);
        assert!(kb.is_local(&Key::BridgeChecked(BridgeId(0))));
    }

    #[test]
    fn checked_flag_is_not_replicated() {
        let mut kb = replica(1, 3, &three_relays());
        kb.drain_outgoing();
        BridgeCoordinator::new(AgentId(1), 30.0).tick(&mut kb, &mut CommandLog::new());
        let out = kb.drain_outgoing();
        assert!(out.iter().all(|u| !matches!(u.key, Key::BridgeChecked(_))));
        assert!(out.iter().any(|u| u.key == Key::Agent(AgentId(1), AgentField::Busy)));
    }

    #[test]
    fn zero_available_agents_is_idempotent() {
        // Agent 0 has never published a position, so nobody is available.
        let mut kb = replica(0, 1, &[]);
        let mut log = CommandLog::new();
        let mut coordinator = BridgeCoordinator::new(AgentId(0), 30.0);

        let first = coordinator.tick(&mut kb, &mut log);
        assert_eq!(first.checked, vec![BridgeId(0)]);
        assert!(first.assigned.is_none());
        assert!(kb.get_bool(&Key::BridgeChecked(BridgeId(0))));

        let second = coordinator.tick(&mut kb, &mut log);
        assert!(second.is_noop());
        assert!(log.is_empty());
        assert!(!kb.agent_flag(AgentId(0), AgentField::Busy));
    }

    #[test]
    fn checked_bridge_is_never_replanned() {
        // Four candidates for three slots: agent 3, far away, gets nothing.
        let mut positions = three_relays();
        positions.push((3, Position::new(40.4500, -79.9470)));
        let mut kb = replica(3, 4, &positions);
        let mut coordinator = BridgeCoordinator::new(AgentId(3), 30.0);
        let mut log = CommandLog::new();

        assert!(coordinator.tick(&mut kb, &mut log).assigned.is_none());

        // The middle relay drops out; agent 3 would now be needed.
        kb.set_global(Key::Agent(AgentId(1), AgentField::Mobile), false);
        assert!(coordinator.tick(&mut kb, &mut log).is_noop());
        assert!(log.is_empty());
    }

    #[test]
    fn unsupported_region_defers_without_checking() {
        let mut kb = replica(1, 3, &three_relays());
        kb.register_region(RegionId(0), RegionShape::Polygon { vertices: vec![SOURCE] });
        let mut coordinator = BridgeCoordinator::new(AgentId(1), 30.0);
        let mut log = CommandLog::new();

        let report = coordinator.tick(&mut kb, &mut log);
        assert_eq!(report.deferred, vec![BridgeId(0)]);
        assert!(report.checked.is_empty());
        assert!(!kb.get_bool(&Key::BridgeChecked(BridgeId(0))));

        kb.register_region(RegionId(0), square_around(SOURCE, 0.0001).into());
        let report = coordinator.tick(&mut kb, &mut log);
        assert_eq!(report.checked, vec![BridgeId(0)]);
        assert!(report.assigned.is_some());
    }

    #[test]
    fn busy_or_grounded_agents_skip_evaluation() {
        let mut kb = replica(1, 3, &three_relays());
        kb.set_global(Key::Agent(AgentId(1), AgentField::Busy), true);
        let mut coordinator = BridgeCoordinator::new(AgentId(1), 30.0);
        assert!(coordinator.tick(&mut kb, &mut CommandLog::new()).is_noop());

        kb.set_global(Key::Agent(AgentId(1), AgentField::Busy), false);
        kb.set_global(Key::Agent(AgentId(1), AgentField::Mobile), false);
        assert!(coordinator.tick(&mut kb, &mut CommandLog::new()).is_noop());
        assert!(!kb.get_bool(&Key::BridgeChecked(BridgeId(0))));
    }

    #[test]
    fn trigger_cleared_locally_only() {
        let mut peer = replica(2, 3, &three_relays());
        let mut me = replica(1, 3, &three_relays());
        peer.set_global(Key::BridgeRequested, true);
        me.merge_remote(&peer.drain_outgoing());

        let report = BridgeCoordinator::new(AgentId(1), 30.0).tick(&mut me, &mut CommandLog::new());
        assert!(report.trigger_cleared);
        assert!(!me.get_bool(&Key::BridgeRequested));
        assert!(peer.get_bool(&Key::BridgeRequested));
        assert!(me.drain_outgoing().iter().all(|u| u.key != Key::BridgeRequested));
    }

    #[test]
    fn later_bridges_are_checked_after_joining_one() {
        let mut kb = replica(1, 3, &three_relays());
        kb.register_bridge(BridgeId(1), RegionId(0), RegionId(1));
        let mut log = CommandLog::new();
        let mut coordinator = BridgeCoordinator::new(AgentId(1), 30.0);

        let report = coordinator.tick(&mut kb, &mut log);
        assert_eq!(report.assigned.map(|(b, _)| b), Some(BridgeId(0)));
        assert_eq!(report.checked, vec![BridgeId(0), BridgeId(1)]);
        assert!(kb.get_bool(&Key::BridgeChecked(BridgeId(1))));
        assert_eq!(kb.agent_bridge(AgentId(1)), Some(BridgeId(0)));
        assert_eq!(log.commands.len(), 1);

        // Released by the operator: both bridges stay settled for this agent.
        kb.set_global(Key::Agent(AgentId(1), AgentField::Busy), false);
        assert!(coordinator.tick(&mut kb, &mut log).is_noop());
        assert_eq!(log.commands.len(), 1);
    }

    #[test]
    fn tiny_store_comm_range_checks_without_planning() {
        let mut kb = replica(1, 3, &three_relays());
        kb.set_global(Key::CommRange, 1e-6);
        let mut log = CommandLog::new();
        let report = BridgeCoordinator::new(AgentId(1), 30.0).tick(&mut kb, &mut log);
        assert!(report.assigned.is_none());
        assert_eq!(report.checked, vec![BridgeId(0)]);
        assert!(log.is_empty());
    }

    #[test]
    fn every_fresh_trigger_is_acknowledged() {
        let mut operator = InMemoryKnowledge::new(AgentId::INVALID);
        let mut me = replica(1, 3, &three_relays());
        let mut coordinator = BridgeCoordinator::new(AgentId(1), 30.0);
        let mut log = CommandLog::new();

        for _ in 0..2 {
            operator.set_global(Key::BridgeRequested, true);
            me.merge_remote(&operator.drain_outgoing());
            assert!(coordinator.tick(&mut me, &mut log).trigger_cleared);
            assert!(!me.get_bool(&Key::BridgeRequested));
        }
    }

    #[test]
    fn store_comm_range_overrides_default() {
        let mut kb = replica(1, 3, &three_relays());
        // 100 m radios: two slots (sink, source); the middle agent is spare.
        kb.set_global(Key::CommRange, 100.0);
        let report = BridgeCoordinator::new(AgentId(1), 30.0).tick(&mut kb, &mut CommandLog::new());
        assert!(report.assigned.is_none());
        assert_eq!(report.checked, vec![BridgeId(0)]);
    }
}
