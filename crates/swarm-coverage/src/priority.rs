//! Priority-driven cooperative coverage.
//!
//! # Planning
//!
//! The whole search area is rasterised into square cells of side `delta`
//! and each cell gets a priority (the base value, or the highest
//! [`PriorityZone`] containing its centre).  One greedy pass then assigns
//! cells to agents in round-robin turn order:
//!
//! ```text
//! while any cell has priority > 0:
//!     agent = turn % agents
//!     pick the cell with the highest priority,
//!          ties → smallest Euclidean grid distance to the agent's cursor,
//!          ties → first in row-major scan order
//!     zero it, append it to the agent's route, move the cursor there
//!     turn += 1
//! ```
//!
//! Every agent starts with its cursor on cell `(0, 0)`, the south-west
//! corner.  The pass is deterministic, so every agent computes the same
//! [`PriorityPlan`] locally and replays its own route one cell per call.

use swarm_core::{DEGREES_PER_METER, Position, Region};

use crate::{CoverageError, CoverageKind, CoverageResult, CoverageStrategy};

/// Planning is quadratic in the cell count; refuse grids beyond this.
const MAX_CELLS: usize = 1 << 16;

/// Sub-region whose cells take a different priority.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriorityZone {
    pub region:   Region,
    pub priority: u32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PriorityParams {
    /// Cell side, degrees.
    pub delta:         f64,
    pub base_priority: u32,
    pub zones:         Vec<PriorityZone>,
}

impl Default for PriorityParams {
    fn default() -> Self {
        Self {
            delta:         2.0 * DEGREES_PER_METER,
            base_priority: 1,
            zones:         Vec::new(),
        }
    }
}

// ── PriorityPlan ──────────────────────────────────────────────────────────────

/// Result of the global greedy pass.  `(x, y)` cells index latitude rows
/// (from the south edge) and longitude columns (from the west edge).
#[derive(Clone, Debug)]
pub struct PriorityPlan {
    area:   Region,
    delta:  f64,
    rows:   usize,
    cols:   usize,
    routes: Vec<Vec<(usize, usize)>>,
}

impl PriorityPlan {
    pub fn build(area: &Region, agents: usize, params: &PriorityParams) -> CoverageResult<Self> {
        if !(params.delta > 0.0 && params.delta.is_finite()) {
            return Err(CoverageError::InvalidParameter(format!(
                "priority cell size must be positive, got {}",
                params.delta
            )));
        }
        let area = area.normalized();
        let agents = agents.max(1);
        let rows = (area.lat_span() / params.delta).ceil() as usize;
        let cols = (area.lon_span() / params.delta).ceil() as usize;
        if rows.saturating_mul(cols) > MAX_CELLS {
            return Err(CoverageError::InvalidParameter(format!(
                "priority grid of {rows}x{cols} cells exceeds {MAX_CELLS}"
            )));
        }

        let mut plan = PriorityPlan { area, delta: params.delta, rows, cols, routes: vec![Vec::new(); agents] };

        let mut matrix = vec![0u32; rows * cols];
        for x in 0..rows {
            for y in 0..cols {
                let centre = plan.cell_centre(x, y);
                matrix[x * cols + y] = params
                    .zones
                    .iter()
                    .filter(|z| z.region.normalized().contains(centre))
                    .map(|z| z.priority)
                    .max()
                    .unwrap_or(params.base_priority);
            }
        }

        let mut remaining: u64 = matrix.iter().map(|&p| p as u64).sum();
        let mut cursors = vec![(0usize, 0usize); agents];
        let mut turn = 0usize;

        while remaining > 0 {
            let agent = turn % agents;
            let Some((x, y)) = best_cell(&matrix, rows, cols, cursors[agent]) else {
                break;
            };
            remaining -= matrix[x * cols + y] as u64;
            matrix[x * cols + y] = 0;
            plan.routes[agent].push((x, y));
            cursors[agent] = (x, y);
            turn += 1;
        }

        tracing::debug!(rows, cols, agents, visits = turn, "priority plan built");
        Ok(plan)
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn route(&self, rank: usize) -> &[(usize, usize)] {
        self.routes.get(rank).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_visits(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }

    /// Geographic centre of cell `(x, y)`, clamped to the area.
    pub fn cell_centre(&self, x: usize, y: usize) -> Position {
        let lat = self.area.se.lat + (x as f64 + 0.5) * self.delta;
        let lon = self.area.nw.lon + (y as f64 + 0.5) * self.delta;
        Position::new(lat.min(self.area.nw.lat), lon.min(self.area.se.lon))
    }
}

fn grid_distance(a: (usize, usize), b: (usize, usize)) -> f64 {
    let dx = a.0 as f64 - b.0 as f64;
    let dy = a.1 as f64 - b.1 as f64;
    (dx * dx + dy * dy).sqrt()
}

fn best_cell(matrix: &[u32], rows: usize, cols: usize, cursor: (usize, usize)) -> Option<(usize, usize)> {
    let mut best: Option<((usize, usize), u32, f64)> = None;
    for x in 0..rows {
        for y in 0..cols {
            let p = matrix[x * cols + y];
            if p == 0 {
                continue;
            }
            let d = grid_distance(cursor, (x, y));
            let better = match best {
                None                  => true,
                Some((_, bp, bd))     => p > bp || (p == bp && d < bd),
            };
            if better {
                best = Some(((x, y), p, d));
            }
        }
    }
    best.map(|(cell, _, _)| cell)
}

// ── PriorityCoverage ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PriorityCoverage {
    params: PriorityParams,
    area:   Option<Region>,
    plan:   Option<PriorityPlan>,
    rank:   usize,
    /// Route entries already handed out.
    turn:   usize,
    target: Option<Position>,
}

impl PriorityCoverage {
    pub fn new(params: PriorityParams) -> Self {
        Self { params, area: None, plan: None, rank: 0, turn: 0, target: None }
    }

    pub fn plan(&self) -> Option<&PriorityPlan> {
        self.plan.as_ref()
    }
}

impl CoverageStrategy for PriorityCoverage {
    fn kind(&self) -> CoverageKind {
        CoverageKind::Priority
    }

    /// Plans over the whole area; every agent shares it cell by cell, so
    /// the returned region is the area itself.
    fn initialize(&mut self, area: &Region, rank: usize, agents: usize) -> CoverageResult<Region> {
        let agents = agents.max(1);
        if rank >= agents {
            return Err(CoverageError::RankOutOfRange { rank, agents });
        }
        let plan = PriorityPlan::build(area, agents, &self.params)?;
        let area = area.normalized();
        self.area = Some(area);
        self.plan = Some(plan);
        self.rank = rank;
        self.turn = 0;
        self.target = None;
        Ok(area)
    }

    fn next_target(&mut self) -> CoverageResult<Position> {
        let plan = self.plan.as_ref().ok_or(CoverageError::NotInitialized(CoverageKind::Priority))?;
        let route = plan.route(self.rank);
        let next = match route.get(self.turn) {
            Some(&(x, y)) => {
                self.turn += 1;
                plan.cell_centre(x, y)
            }
            None => self.target.unwrap_or_else(|| plan.cell_centre(0, 0)),
        };
        self.target = Some(next);
        Ok(next)
    }

    fn is_final_waypoint(&self) -> bool {
        match &self.plan {
            Some(plan) => self.turn >= plan.route(self.rank).len(),
            None       => false,
        }
    }

    fn cell(&self) -> Option<&Region> {
        self.area.as_ref()
    }
}
