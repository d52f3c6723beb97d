//! `swarm-coverage` — area partitioning and coverage waypoint generation.
//!
//! A search area is split into one near-square cell per available agent
//! ([`grid`]); each agent then walks its cell with a stateful
//! [`CoverageStrategy`] that yields one waypoint per call.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`grid`]        | `middle_divisors`, `divide`, `assigned_cell`              |
//! | [`strategy`]    | `CoverageStrategy` trait                                  |
//! | [`snake`]       | `SnakeCoverage` (boustrophedon sweep)                     |
//! | [`random`]      | `RandomCoverage` (edge-to-edge patrol)                    |
//! | [`inside_out`]  | `InsideOutCoverage` (square spiral from the centre)       |
//! | [`priority`]    | `PriorityCoverage`, `PriorityPlan` (greedy global plan)   |
//! | [`kind`]        | `CoverageKind`, `CoverageParams` (strategy factory)       |
//! | [`tracker`]     | `CoverageTracker` (percent-covered bookkeeping + CSV)     |
//! | [`error`]       | `CoverageError`, `CoverageResult`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on parameter types.      |

pub mod error;
pub mod grid;
pub mod inside_out;
pub mod kind;
pub mod priority;
pub mod random;
pub mod snake;
pub mod strategy;
pub mod tracker;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoverageError, CoverageResult};
pub use grid::{assigned_cell, divide, middle_divisors};
pub use inside_out::{Heading, InsideOutCoverage, InsideOutParams};
pub use kind::{CoverageKind, CoverageParams};
pub use priority::{PriorityCoverage, PriorityParams, PriorityPlan, PriorityZone};
pub use random::RandomCoverage;
pub use snake::{SnakeCoverage, SnakeParams};
pub use strategy::CoverageStrategy;
pub use tracker::{CoverageTracker, TrackerParams};
