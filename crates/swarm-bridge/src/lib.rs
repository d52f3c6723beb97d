//! `swarm-bridge` — forming communication bridges out of relay agents.
//!
//! A bridge request names a source and a sink region.  Every available
//! agent independently computes the same relay plan from its replica of the
//! shared store, finds the slot (if any) the plan gives *it*, and flies
//! there.  No agent negotiates with another; agreement comes from every
//! agent running the same deterministic planner over (eventually) the same
//! inputs.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`planner`]     | `plan`, `plan_assignment`, `relay_count`, `relay_slots`, `RelayAssignment` |
//! | [`request`]     | `resolve_endpoints` (bridge id → source/sink midpoints)   |
//! | [`coordinator`] | `BridgeCoordinator`, `BridgeReport`                       |
//! | [`error`]       | `BridgeError`, `BridgeResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `RelayAssignment`.    |

pub mod coordinator;
pub mod error;
pub mod planner;
pub mod request;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use coordinator::{BridgeCoordinator, BridgeReport};
pub use error::{BridgeError, BridgeResult};
pub use planner::{MAX_RELAYS, RelayAssignment, plan, plan_assignment, relay_count, relay_slots};
pub use request::resolve_endpoints;
