//! Coverage progress tracking.
//!
//! The search area is rasterised into small square cells (0.5 m by
//! default).  Each observation marks every cell under the downward sensor's
//! footprint, modelled as the square inscribed in the sensor's circular
//! field of view:
//!
//! ```text
//!   diameter = 2 · altitude · tan(aperture / 2)
//!   side     = diameter / √2
//! ```
//!
//! Progress can be appended to a CSV file as `(tick, elapsed_secs,
//! percent_covered)` rows.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use swarm_core::{DEGREES_PER_METER, Position, Region, Tick};

use crate::{CoverageError, CoverageResult};

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackerParams {
    /// Cell side, degrees.
    pub cell_size:    f64,
    /// Full sensor aperture angle, degrees.
    pub aperture_deg: f64,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            cell_size:    0.5 * DEGREES_PER_METER,
            aperture_deg: 60.0,
        }
    }
}

#[derive(Debug)]
pub struct CoverageTracker {
    area:          Region,
    params:        TrackerParams,
    rows:          usize,
    cols:          usize,
    covered:       Vec<bool>,
    covered_count: usize,
    log:           Option<Writer<File>>,
}

impl CoverageTracker {
    pub fn new(area: &Region, params: TrackerParams) -> CoverageResult<Self> {
        if !(params.cell_size > 0.0 && params.cell_size.is_finite()) {
            return Err(CoverageError::InvalidParameter(format!(
                "tracker cell size must be positive, got {}",
                params.cell_size
            )));
        }
        if !(params.aperture_deg > 0.0 && params.aperture_deg < 180.0) {
            return Err(CoverageError::InvalidParameter(format!(
                "sensor aperture must be in (0, 180) degrees, got {}",
                params.aperture_deg
            )));
        }
        let area = area.normalized();
        let rows = cells_along(area.lat_span(), params.cell_size);
        let cols = cells_along(area.lon_span(), params.cell_size);
        Ok(Self {
            area,
            params,
            rows,
            cols,
            covered:       vec![false; rows * cols],
            covered_count: 0,
            log:           None,
        })
    }

    /// Append progress rows to a CSV file at `path` (created or truncated).
    pub fn with_csv(mut self, path: &Path) -> CoverageResult<Self> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(["tick", "elapsed_secs", "percent_covered"])?;
        self.log = Some(writer);
        Ok(self)
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Side of the square ground footprint at `altitude_m`, metres.
    pub fn footprint_side_m(&self, altitude_m: f64) -> f64 {
        let diameter = (self.params.aperture_deg / 2.0).to_radians().tan() * altitude_m.max(0.0) * 2.0;
        diameter / std::f64::consts::SQRT_2
    }

    /// Mark the cells seen from `position` at `altitude_m`.  Returns how
    /// many cells were newly covered.
    pub fn observe(&mut self, position: Position, altitude_m: f64) -> usize {
        let half = self.footprint_side_m(altitude_m) / 2.0 * DEGREES_PER_METER;

        let north = position.lat + half;
        let south = position.lat - half;
        let west = position.lon - half;
        let east = position.lon + half;
        if south > self.area.nw.lat || north < self.area.se.lat || east < self.area.nw.lon || west > self.area.se.lon {
            return 0;
        }

        // Rows count down from the north edge, columns east from the west edge.
        let row_of = |lat: f64| (((self.area.nw.lat - lat) / self.params.cell_size).floor().max(0.0) as usize).min(self.rows - 1);
        let col_of = |lon: f64| (((lon - self.area.nw.lon) / self.params.cell_size).floor().max(0.0) as usize).min(self.cols - 1);

        let (r0, r1) = (row_of(north), row_of(south));
        let (c0, c1) = (col_of(west), col_of(east));

        let mut newly = 0;
        for r in r0..=r1 {
            for c in c0..=c1 {
                let cell = &mut self.covered[r * self.cols + c];
                if !*cell {
                    *cell = true;
                    newly += 1;
                }
            }
        }
        self.covered_count += newly;
        newly
    }

    pub fn covered_cells(&self) -> usize {
        self.covered_count
    }

    pub fn percent_covered(&self) -> f64 {
        self.covered_count as f64 / self.covered.len() as f64 * 100.0
    }

    /// Write one progress row if a CSV log is attached.
    pub fn record(&mut self, tick: Tick, elapsed_secs: f64) -> CoverageResult<()> {
        let percent = self.percent_covered();
        if let Some(log) = self.log.as_mut() {
            log.write_record(&[tick.0.to_string(), format!("{elapsed_secs:.3}"), format!("{percent:.4}")])?;
        }
        Ok(())
    }

    /// Flush the CSV log.  Idempotent.
    pub fn finish(&mut self) -> CoverageResult<()> {
        if let Some(log) = self.log.as_mut() {
            log.flush()?;
        }
        Ok(())
    }
}

/// Cells needed to span `span`; a ratio a hair above an integer from
/// rounding does not add a sliver row.
fn cells_along(span: f64, cell: f64) -> usize {
    ((span / cell - 1e-9).ceil() as usize).max(1)
}
