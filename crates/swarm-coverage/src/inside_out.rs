//! Square spiral outward from the cell centre.
//!
//! Leg lengths grow as `1, 1, 2, 2, 3, 3, …` times `delta`, turning 90° in a
//! fixed direction before each leg.  The pattern ends on the first waypoint
//! that lands outside the cell.  Because the spiral is square while the cell
//! generally is not, the legs along the short axis leave the cell first;
//! regions near the corners of an elongated cell are never visited.
//!
//! `is_final_waypoint` only checks the latest waypoint.  If a caller keeps
//! advancing past it, a later leg can re-enter the cell and the flag drops
//! back to `false`.

use swarm_core::{DEGREES_PER_METER, Position, Region};

use crate::{CoverageError, CoverageKind, CoverageResult, CoverageStrategy, grid};

/// Compass heading of a spiral leg.  North is +latitude, East is +longitude.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    pub fn turned(self, clockwise: bool) -> Heading {
        match (self, clockwise) {
            (Heading::North, true)  => Heading::East,
            (Heading::East, true)   => Heading::South,
            (Heading::South, true)  => Heading::West,
            (Heading::West, true)   => Heading::North,
            (Heading::North, false) => Heading::West,
            (Heading::West, false)  => Heading::South,
            (Heading::South, false) => Heading::East,
            (Heading::East, false)  => Heading::North,
        }
    }

    /// The heading that `turned(clockwise)` maps onto `self`.
    pub fn before(self, clockwise: bool) -> Heading {
        self.turned(!clockwise)
    }
}

/// Spiral parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InsideOutParams {
    /// Unit leg length, degrees.
    pub delta:           f64,
    /// Direction of the first leg.
    pub initial_heading: Heading,
    pub clockwise:       bool,
}

impl Default for InsideOutParams {
    fn default() -> Self {
        Self {
            delta:           0.5 * DEGREES_PER_METER,
            initial_heading: Heading::East,
            clockwise:       false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InsideOutCoverage {
    params:    InsideOutParams,
    cell:      Option<Region>,
    target:    Option<Position>,
    heading:   Heading,
    iteration: u64,
}

impl InsideOutCoverage {
    pub fn new(params: InsideOutParams) -> CoverageResult<Self> {
        if !(params.delta > 0.0 && params.delta.is_finite()) {
            return Err(CoverageError::InvalidParameter(format!(
                "spiral delta must be positive, got {}",
                params.delta
            )));
        }
        Ok(Self {
            params,
            cell:      None,
            target:    None,
            heading:   params.initial_heading.before(params.clockwise),
            iteration: 1,
        })
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }
}

impl CoverageStrategy for InsideOutCoverage {
    fn kind(&self) -> CoverageKind {
        CoverageKind::InsideOut
    }

    fn initialize(&mut self, area: &Region, rank: usize, agents: usize) -> CoverageResult<Region> {
        let cell = grid::assigned_cell(area, rank, agents)?.normalized();
        self.cell = Some(cell);
        self.target = None;
        self.heading = self.params.initial_heading.before(self.params.clockwise);
        self.iteration = 1;
        Ok(cell)
    }

    fn next_target(&mut self) -> CoverageResult<Position> {
        let cell = self.cell.ok_or(CoverageError::NotInitialized(CoverageKind::InsideOut))?;

        let next = match self.target {
            None => cell.midpoint(),
            Some(mut t) => {
                self.heading = self.heading.turned(self.params.clockwise);
                let step = self.iteration.div_ceil(2) as f64 * self.params.delta;
                match self.heading {
                    Heading::North => t.lat += step,
                    Heading::South => t.lat -= step,
                    Heading::East  => t.lon += step,
                    Heading::West  => t.lon -= step,
                }
                self.iteration += 1;
                t
            }
        };

        self.target = Some(next);
        Ok(next)
    }

    fn is_final_waypoint(&self) -> bool {
        match (self.cell, self.target) {
            (Some(cell), Some(t)) => !cell.contains(t),
            _ => false,
        }
    }

    fn cell(&self) -> Option<&Region> {
        self.cell.as_ref()
    }
}
