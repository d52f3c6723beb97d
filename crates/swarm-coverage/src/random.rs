//! Edge-to-edge random patrol.
//!
//! Each waypoint lies on a side of the cell different from the previous
//! one, at a uniformly random point along that side.  The pattern never
//! finishes; the agent patrols until it is retasked.

use swarm_core::{AgentId, AgentRng, Position, Region};

use crate::{CoverageError, CoverageKind, CoverageResult, CoverageStrategy, grid};

const MAX_SIDE_DRAWS: usize = 1000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];
}

#[derive(Debug, Clone)]
pub struct RandomCoverage {
    rng:  AgentRng,
    cell: Option<Region>,
    side: Option<Side>,
}

impl RandomCoverage {
    /// Seeded per agent so that patrols replay identically for a given run
    /// seed.
    pub fn new(seed: u64, agent: AgentId) -> Self {
        Self {
            rng:  AgentRng::new(seed, agent),
            cell: None,
            side: None,
        }
    }

    fn pick_side(&mut self) -> Side {
        let Some(previous) = self.side else {
            return Side::ALL[self.rng.gen_range(0..Side::ALL.len())];
        };
        for _ in 0..MAX_SIDE_DRAWS {
            let side = Side::ALL[self.rng.gen_range(0..Side::ALL.len())];
            if side != previous {
                return side;
            }
        }
        Side::North
    }
}

impl CoverageStrategy for RandomCoverage {
    fn kind(&self) -> CoverageKind {
        CoverageKind::Random
    }

    fn initialize(&mut self, area: &Region, rank: usize, agents: usize) -> CoverageResult<Region> {
        let cell = grid::assigned_cell(area, rank, agents)?.normalized();
        self.cell = Some(cell);
        self.side = None;
        Ok(cell)
    }

    fn next_target(&mut self) -> CoverageResult<Position> {
        let cell = self.cell.ok_or(CoverageError::NotInitialized(CoverageKind::Random))?;
        let side = self.pick_side();
        self.side = Some(side);

        let along: f64 = self.rng.random();
        let lat = cell.se.lat + along * cell.lat_span();
        let lon = cell.nw.lon + along * cell.lon_span();

        Ok(match side {
            Side::North => Position::new(cell.nw.lat, lon),
            Side::South => Position::new(cell.se.lat, lon),
            Side::East  => Position::new(lat, cell.se.lon),
            Side::West  => Position::new(lat, cell.nw.lon),
        })
    }

    fn is_final_waypoint(&self) -> bool {
        false
    }

    fn cell(&self) -> Option<&Region> {
        self.cell.as_ref()
    }
}
