//! `swarm-core` — foundational types for the drone swarm coordination core.
//!
//! This crate is a dependency of every other `swarm-*` crate.  It has no
//! `swarm-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `AreaId`, `RegionId`, `BridgeId`           |
//! | [`geo`]         | `Position`, `Region`, `RegionShape`, haversine, GPS offsets |
//! | [`time`]        | `Tick`, `SwarmConfig`                                 |
//! | [`rng`]         | `AgentRng` (per-agent deterministic RNG)              |
//! | [`command`]     | `MovementCommand`, `Actuator`, `CommandLog`           |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod command;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use command::{Actuator, CommandLog, MovementCommand};
pub use error::{CoreError, CoreResult};
pub use geo::{DEGREES_PER_METER, Position, Region, RegionShape};
pub use ids::{AgentId, AreaId, BridgeId, RegionId};
pub use rng::AgentRng;
pub use time::{SwarmConfig, Tick};
