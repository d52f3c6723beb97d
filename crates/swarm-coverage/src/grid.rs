//! Grid partitioning of a search area into per-agent cells.
//!
//! `n` agents split the area into a `rows × cols` grid where `(rows, cols)`
//! is the factor pair of `n` closest to √n.  Cells are numbered row-major
//! from the north-west corner:
//!
//! ```text
//!   rank:  0 1 2 3        row = rank / cols
//!          4 5 6 7        col = rank % cols
//!          8 9 …
//! ```
//!
//! Cells on the last row and column are snapped to the area's south-east
//! corner so that the union is exactly the area despite rounding.

use swarm_core::{Position, Region};

use crate::{CoverageError, CoverageResult};

/// Factor pair `(a, b)` of `n` with `a <= b`, `a * b == n` and `b - a`
/// minimal.  `n <= 1` yields `(1, 1)`.
pub fn middle_divisors(n: usize) -> (usize, usize) {
    let mut best = (1, n.max(1));
    let mut candidate = 1;
    while candidate * candidate <= n {
        if n % candidate == 0 {
            best = (candidate, n / candidate);
        }
        candidate += 1;
    }
    best
}

/// Split `region` into `agents` cells, in rank order.
///
/// `agents <= 1` returns the region itself.
pub fn divide(region: &Region, agents: usize) -> Vec<Region> {
    if agents <= 1 {
        return vec![*region];
    }
    let region = region.normalized();
    let (rows, cols) = middle_divisors(agents);
    (0..agents).map(|rank| cell_at(&region, rows, cols, rank)).collect()
}

/// The cell owned by `rank` when `agents` agents share `region`.
pub fn assigned_cell(region: &Region, rank: usize, agents: usize) -> CoverageResult<Region> {
    if agents <= 1 {
        return Ok(*region);
    }
    if rank >= agents {
        return Err(CoverageError::RankOutOfRange { rank, agents });
    }
    let region = region.normalized();
    let (rows, cols) = middle_divisors(agents);
    Ok(cell_at(&region, rows, cols, rank))
}

fn cell_at(region: &Region, rows: usize, cols: usize, rank: usize) -> Region {
    let cell_height = region.lat_span() / rows as f64;
    let cell_width = region.lon_span() / cols as f64;

    let row = rank / cols;
    let col = rank % cols;

    let nw = Position::new(
        region.nw.lat - row as f64 * cell_height,
        region.nw.lon + col as f64 * cell_width,
    );
    let se_lat = if row + 1 == rows { region.se.lat } else { nw.lat - cell_height };
    let se_lon = if col + 1 == cols { region.se.lon } else { nw.lon + cell_width };

    Region::new(nw, Position::new(se_lat, se_lon))
}
