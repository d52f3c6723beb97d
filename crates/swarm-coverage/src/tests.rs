//! Unit tests for swarm-coverage.

use swarm_core::{AgentId, Position, Region};

use crate::{
    CoverageError, CoverageKind, CoverageParams, CoverageStrategy, CoverageTracker, Heading, InsideOutCoverage,
    InsideOutParams, PriorityCoverage, PriorityParams, PriorityPlan, PriorityZone, RandomCoverage, SnakeCoverage,
    SnakeParams, TrackerParams, assigned_cell, divide, middle_divisors,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn region(nw_lat: f64, nw_lon: f64, se_lat: f64, se_lon: f64) -> Region {
    Region::new(Position::new(nw_lat, nw_lon), Position::new(se_lat, se_lon))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Grid ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn middle_divisor_examples() {
        assert_eq!(middle_divisors(12), (3, 4));
        assert_eq!(middle_divisors(7), (1, 7));
        assert_eq!(middle_divisors(9), (3, 3));
        assert_eq!(middle_divisors(6), (2, 3));
        assert_eq!(middle_divisors(1), (1, 1));
        assert_eq!(middle_divisors(0), (1, 1));
    }

    #[test]
    fn single_agent_gets_whole_region() {
        let r = region(10.0, 10.0, 9.0, 11.0);
        assert_eq!(assigned_cell(&r, 0, 1).unwrap(), r);
        assert_eq!(assigned_cell(&r, 0, 0).unwrap(), r);
        assert_eq!(divide(&r, 1), vec![r]);
    }

    #[test]
    fn row_major_layout() {
        // 6 agents → 2 rows × 3 cols.
        let r = region(2.0, 0.0, 0.0, 3.0);
        let cells = divide(&r, 6);
        assert_eq!(cells[0], region(2.0, 0.0, 1.0, 1.0));
        assert_eq!(cells[2], region(2.0, 2.0, 1.0, 3.0));
        assert_eq!(cells[3], region(1.0, 0.0, 0.0, 1.0));
        assert_eq!(cells[5], region(1.0, 2.0, 0.0, 3.0));
    }

    #[test]
    fn rank_out_of_range_is_an_error() {
        let r = region(2.0, 0.0, 0.0, 3.0);
        assert!(matches!(
            assigned_cell(&r, 4, 4),
            Err(CoverageError::RankOutOfRange { rank: 4, agents: 4 })
        ));
    }

    #[test]
    fn union_and_area_for_common_counts() {
        let r = region(40.4420, -79.9480, 40.4400, -79.9450);
        for n in [1usize, 2, 3, 4, 6, 9] {
            let cells = divide(&r, n);
            assert_eq!(cells.len(), n);

            let area: f64 = cells.iter().map(Region::area).sum();
            assert!((area - r.area()).abs() < 1e-12, "n={n}: {area} vs {}", r.area());

            let max_lat = cells.iter().map(|c| c.nw.lat).fold(f64::MIN, f64::max);
            let min_lat = cells.iter().map(|c| c.se.lat).fold(f64::MAX, f64::min);
            let min_lon = cells.iter().map(|c| c.nw.lon).fold(f64::MAX, f64::min);
            let max_lon = cells.iter().map(|c| c.se.lon).fold(f64::MIN, f64::max);
            assert!(close(max_lat, r.nw.lat) && close(min_lat, r.se.lat));
            assert!(close(min_lon, r.nw.lon) && close(max_lon, r.se.lon));
        }
    }

    proptest! {
        #[test]
        fn middle_divisors_minimise_gap(n in 1usize..2_000) {
            let (a, b) = middle_divisors(n);
            prop_assert_eq!(a * b, n);
            prop_assert!(a <= b);
            for c in 1..=n {
                if n % c == 0 {
                    let d = n / c;
                    prop_assert!(b - a <= c.abs_diff(d));
                }
            }
        }

        #[test]
        fn cells_stay_inside_region(n in 1usize..40, lat in -60.0f64..60.0, lon in -170.0f64..170.0) {
            let r = region(lat + 0.01, lon, lat, lon + 0.02);
            for cell in divide(&r, n) {
                prop_assert!(cell.is_normalized());
                prop_assert!(cell.nw.lat <= r.nw.lat + 1e-12 && cell.se.lat >= r.se.lat - 1e-12);
                prop_assert!(cell.nw.lon >= r.nw.lon - 1e-12 && cell.se.lon <= r.se.lon + 1e-12);
            }
        }
    }
}

// ── Snake ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod snake {
    use super::*;

    fn snake(width: f64) -> SnakeCoverage {
        let mut s = SnakeCoverage::new(SnakeParams { column_width: width }).unwrap();
        s.initialize(&region(10.0, 10.0, 9.0, 11.0), 0, 1).unwrap();
        s
    }

    #[test]
    fn starts_at_north_west_corner() {
        let mut s = snake(0.2);
        assert_eq!(s.next_target().unwrap(), Position::new(10.0, 10.0));
        assert!(!s.is_final_waypoint());
    }

    #[test]
    fn alternates_latitude_and_steps_every_second_call() {
        let mut s = snake(0.2);
        let mut targets = vec![s.next_target().unwrap()];
        while !s.is_final_waypoint() {
            targets.push(s.next_target().unwrap());
            assert!(targets.len() < 100, "sweep never finished");
        }

        // Odd calls sweep latitude, even calls step one column east.
        for (i, w) in targets.windows(2).enumerate() {
            if (i + 1) % 2 == 1 {
                assert_eq!(w[1].lon, w[0].lon);
                assert_ne!(w[1].lat, w[0].lat);
            } else {
                assert_eq!(w[1].lat, w[0].lat);
                assert!(w[1].lon > w[0].lon);
            }
            assert!(w[1].lat == 9.0 || w[1].lat == 10.0);
        }
    }

    #[test]
    fn final_only_near_south_east() {
        let mut s = snake(0.2);
        let mut last = s.next_target().unwrap();
        let mut calls = 1;
        while !s.is_final_waypoint() {
            assert!((last.lat - 9.0).abs() > 0.1 || (last.lon - 11.0).abs() > 0.1);
            last = s.next_target().unwrap();
            calls += 1;
        }
        assert!((last.lat - 9.0).abs() <= 0.1 && (last.lon - 11.0).abs() <= 0.1);
        // Six columns: NW, then 5 × (sweep + step), ending on the south edge.
        assert_eq!(calls, 11);
    }

    #[test]
    fn uninitialized_and_invalid() {
        let mut s = SnakeCoverage::new(SnakeParams::default()).unwrap();
        assert!(matches!(s.next_target(), Err(CoverageError::NotInitialized(CoverageKind::Snake))));
        assert!(SnakeCoverage::new(SnakeParams { column_width: 0.0 }).is_err());
    }
}

// ── Random ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod random {
    use super::*;

    fn side_of(cell: &Region, p: Position) -> u8 {
        if p.lat == cell.nw.lat {
            0
        } else if p.lon == cell.se.lon {
            1
        } else if p.lat == cell.se.lat {
            2
        } else {
            assert_eq!(p.lon, cell.nw.lon);
            3
        }
    }

    #[test]
    fn waypoints_on_edges_changing_side() {
        let cell = region(10.0, 10.0, 9.0, 11.0);
        let mut s = RandomCoverage::new(42, AgentId(0));
        s.initialize(&cell, 0, 1).unwrap();
        let mut previous = None;
        for _ in 0..200 {
            let p = s.next_target().unwrap();
            assert!(cell.contains(p));
            let side = side_of(&cell, p);
            if let Some(prev) = previous {
                assert_ne!(prev, side);
            }
            previous = Some(side);
            assert!(!s.is_final_waypoint());
        }
    }

    #[test]
    fn same_seed_same_patrol() {
        let cell = region(10.0, 10.0, 9.0, 11.0);
        let mut a = RandomCoverage::new(9, AgentId(2));
        let mut b = RandomCoverage::new(9, AgentId(2));
        a.initialize(&cell, 0, 1).unwrap();
        b.initialize(&cell, 0, 1).unwrap();
        for _ in 0..20 {
            assert_eq!(a.next_target().unwrap(), b.next_target().unwrap());
        }
    }
}

// ── InsideOut ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod inside_out {
    use super::*;

    fn spiral(clockwise: bool) -> InsideOutCoverage {
        let mut s = InsideOutCoverage::new(InsideOutParams { delta: 1.0, initial_heading: Heading::East, clockwise })
            .unwrap();
        s.initialize(&region(10.0, 0.0, 0.0, 10.0), 0, 1).unwrap();
        s
    }

    #[test]
    fn counter_clockwise_legs_grow_one_one_two_two() {
        let mut s = spiral(false);
        let expected = [
            (5.0, 5.0), // centre
            (5.0, 6.0), // east 1
            (6.0, 6.0), // north 1
            (6.0, 4.0), // west 2
            (4.0, 4.0), // south 2
            (4.0, 7.0), // east 3
            (7.0, 7.0), // north 3
        ];
        for (lat, lon) in expected {
            let t = s.next_target().unwrap();
            assert!(close(t.lat, lat) && close(t.lon, lon), "got {t}, want ({lat}, {lon})");
            assert!(!s.is_final_waypoint());
        }
    }

    #[test]
    fn clockwise_turns_south_after_east() {
        let mut s = spiral(true);
        s.next_target().unwrap();
        let east = s.next_target().unwrap();
        assert!(close(east.lon, 6.0));
        let south = s.next_target().unwrap();
        assert!(close(south.lat, 4.0));
        assert_eq!(s.heading(), Heading::South);
    }

    #[test]
    fn final_once_outside_cell() {
        let mut s = spiral(false);
        let mut last = s.next_target().unwrap();
        let mut calls = 1;
        while !s.is_final_waypoint() {
            last = s.next_target().unwrap();
            calls += 1;
            assert!(calls < 50);
        }
        // The 11-long east leg from (0, 0) is the first to leave the cell.
        assert_eq!(calls, 22);
        assert!(close(last.lat, 0.0) && close(last.lon, 11.0));
        assert!(!s.cell().unwrap().contains(last));
    }
}

// ── Priority ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod priority {
    use super::*;

    fn unit_params() -> PriorityParams {
        PriorityParams { delta: 1.0, base_priority: 1, zones: Vec::new() }
    }

    #[test]
    fn two_by_two_grid_two_agents_visits_every_cell_once() {
        let area = region(2.0, 0.0, 0.0, 2.0);
        let plan = PriorityPlan::build(&area, 2, &unit_params()).unwrap();
        assert_eq!(plan.dimensions(), (2, 2));
        assert_eq!(plan.total_visits(), 4);

        let mut seen: Vec<(usize, usize)> = plan.route(0).iter().chain(plan.route(1)).copied().collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 4);

        assert_eq!(plan.route(0), &[(0, 0), (1, 0)]);
        assert_eq!(plan.route(1), &[(0, 1), (1, 1)]);
    }

    #[test]
    fn zones_are_visited_first() {
        let area = region(3.0, 0.0, 0.0, 3.0);
        let params = PriorityParams {
            delta:         1.0,
            base_priority: 1,
            zones:         vec![PriorityZone { region: region(3.0, 2.0, 2.0, 3.0), priority: 5 }],
        };
        let plan = PriorityPlan::build(&area, 1, &params).unwrap();
        assert_eq!(plan.route(0)[0], (2, 2));
        assert_eq!(plan.total_visits(), 9);
    }

    #[test]
    fn replay_until_route_exhausted() {
        let area = region(2.0, 0.0, 0.0, 2.0);
        let mut s = PriorityCoverage::new(unit_params());
        assert_eq!(s.initialize(&area, 1, 2).unwrap(), area);
        assert!(!s.is_final_waypoint());

        let first = s.next_target().unwrap();
        assert_eq!(first, Position::new(0.5, 1.5));
        assert!(!s.is_final_waypoint());
        let second = s.next_target().unwrap();
        assert_eq!(second, Position::new(1.5, 1.5));
        assert!(s.is_final_waypoint());

        // Holds position once exhausted.
        assert_eq!(s.next_target().unwrap(), second);
    }

    #[test]
    fn degenerate_area_is_immediately_final() {
        let point = region(1.0, 1.0, 1.0, 1.0);
        let mut s = PriorityCoverage::new(unit_params());
        s.initialize(&point, 0, 1).unwrap();
        assert!(s.is_final_waypoint());
        assert!(s.next_target().is_ok());
    }

    #[test]
    fn rank_beyond_agents_rejected() {
        let mut s = PriorityCoverage::new(unit_params());
        assert!(s.initialize(&region(2.0, 0.0, 0.0, 2.0), 2, 2).is_err());
    }

    #[test]
    fn oversized_grid_rejected() {
        let params = PriorityParams { delta: 1e-6, ..unit_params() };
        assert!(PriorityPlan::build(&region(1.0, 0.0, 0.0, 1.0), 1, &params).is_err());
    }
}

// ── Kind / factory ────────────────────────────────────────────────────────────

#[cfg(test)]
mod kind {
    use super::*;

    #[test]
    fn parse_and_display() {
        for kind in CoverageKind::ALL {
            assert_eq!(kind.as_str().parse::<CoverageKind>().unwrap(), kind);
        }
        assert_eq!("Inside-Out".parse::<CoverageKind>().unwrap(), CoverageKind::InsideOut);
        assert!(matches!("zigzag".parse::<CoverageKind>(), Err(CoverageError::UnknownKind(_))));
    }

    #[test]
    fn factory_builds_each_kind() {
        let params = CoverageParams::default();
        for kind in CoverageKind::ALL {
            let s = params.build(kind, 1, AgentId(0)).unwrap();
            assert_eq!(s.kind(), kind);
            assert!(s.cell().is_none());
        }
    }
}

// ── Tracker ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tracker {
    use super::*;
    use swarm_core::{DEGREES_PER_METER, Tick};

    fn ten_metre_square() -> Region {
        let side = 10.0 * DEGREES_PER_METER;
        region(side, 0.0, 0.0, side)
    }

    #[test]
    fn footprint_at_altitude() {
        let t = CoverageTracker::new(&ten_metre_square(), TrackerParams::default()).unwrap();
        // tan(30°)·10·2/√2 ≈ 8.165 m
        assert!((t.footprint_side_m(10.0) - 8.165).abs() < 0.01);
        assert_eq!(t.footprint_side_m(-3.0), 0.0);
        assert_eq!(t.dimensions(), (20, 20));
    }

    #[test]
    fn observation_marks_cells_once() {
        let area = ten_metre_square();
        let mut t = CoverageTracker::new(&area, TrackerParams::default()).unwrap();
        let newly = t.observe(area.midpoint(), 5.0);
        assert!(newly > 0);
        assert_eq!(t.observe(area.midpoint(), 5.0), 0);
        assert!(t.percent_covered() > 0.0 && t.percent_covered() < 100.0);

        t.observe(area.midpoint(), 100.0);
        assert!((t.percent_covered() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn observation_outside_area_is_ignored() {
        let mut t = CoverageTracker::new(&ten_metre_square(), TrackerParams::default()).unwrap();
        assert_eq!(t.observe(Position::new(1.0, 1.0), 10.0), 0);
        assert_eq!(t.covered_cells(), 0);
    }

    #[test]
    fn csv_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coverage.csv");
        let area = ten_metre_square();
        let mut t = CoverageTracker::new(&area, TrackerParams::default()).unwrap().with_csv(&path).unwrap();
        t.record(Tick(0), 0.0).unwrap();
        t.observe(area.midpoint(), 100.0);
        t.record(Tick(1), 1.0).unwrap();
        t.finish().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "tick,elapsed_secs,percent_covered");
        assert_eq!(lines[1], "0,0.000,0.0000");
        assert_eq!(lines[2], "1,1.000,100.0000");
    }

    #[test]
    fn invalid_params() {
        let bad = TrackerParams { aperture_deg: 180.0, ..Default::default() };
        assert!(CoverageTracker::new(&ten_metre_square(), bad).is_err());
    }
}
