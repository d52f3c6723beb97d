//! Boustrophedon ("ox-plow") sweep.
//!
//! Starts at the cell's north-west corner, then alternates between sweeping
//! to the opposite latitude edge and stepping one column east:
//!
//! ```text
//!   NW ●   ┌───┐   ┌──
//!      │   │   │   │
//!      │   │   │   │
//!      └───┘   └───┘  … ● SE
//! ```

use swarm_core::{DEGREES_PER_METER, Position, Region};

use crate::{CoverageError, CoverageKind, CoverageResult, CoverageStrategy, grid};

/// Snake sweep parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnakeParams {
    /// Distance between sweep columns, degrees of longitude.
    pub column_width: f64,
}

impl Default for SnakeParams {
    fn default() -> Self {
        Self { column_width: 0.5 * DEGREES_PER_METER }
    }
}

#[derive(Debug, Clone)]
pub struct SnakeCoverage {
    params:   SnakeParams,
    cell:     Option<Region>,
    target:   Option<Position>,
    /// Last move was a latitude sweep; the next one steps east.
    sweeping: bool,
    at_north: bool,
}

impl SnakeCoverage {
    pub fn new(params: SnakeParams) -> CoverageResult<Self> {
        if !(params.column_width > 0.0 && params.column_width.is_finite()) {
            return Err(CoverageError::InvalidParameter(format!(
                "snake column width must be positive, got {}",
                params.column_width
            )));
        }
        Ok(Self {
            params,
            cell:     None,
            target:   None,
            sweeping: false,
            at_north: true,
        })
    }
}

impl CoverageStrategy for SnakeCoverage {
    fn kind(&self) -> CoverageKind {
        CoverageKind::Snake
    }

    fn initialize(&mut self, area: &Region, rank: usize, agents: usize) -> CoverageResult<Region> {
        let cell = grid::assigned_cell(area, rank, agents)?.normalized();
        self.cell = Some(cell);
        self.target = None;
        self.sweeping = false;
        self.at_north = true;
        Ok(cell)
    }

    fn next_target(&mut self) -> CoverageResult<Position> {
        let cell = self.cell.ok_or(CoverageError::NotInitialized(CoverageKind::Snake))?;

        let next = match self.target {
            None => cell.nw,
            Some(mut t) => {
                if self.sweeping {
                    t.lon = (t.lon + self.params.column_width).min(cell.se.lon);
                    self.sweeping = false;
                } else {
                    t.lat = if self.at_north { cell.se.lat } else { cell.nw.lat };
                    self.at_north = !self.at_north;
                    self.sweeping = true;
                }
                t
            }
        };

        self.target = Some(next);
        Ok(next)
    }

    fn is_final_waypoint(&self) -> bool {
        match (self.cell, self.target) {
            (Some(cell), Some(t)) => {
                let half = self.params.column_width / 2.0;
                (t.lat - cell.se.lat).abs() <= half && (t.lon - cell.se.lon).abs() <= half
            }
            _ => false,
        }
    }

    fn cell(&self) -> Option<&Region> {
        self.cell.as_ref()
    }
}
