//! `swarm-readiness` — keeping a search team in step.
//!
//! Each agent ranks itself among the available agents of its search area,
//! takes the matching cell and a staggered altitude, then walks its
//! coverage pattern one waypoint at a time.  With `wait_for_peers` set, an
//! agent that reaches a waypoint holds there until every known peer in the
//! area has reached the same waypoint index (a soft barrier over the shared
//! store).
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`state`]       | `AgentState`, `Telemetry`                                 |
//! | [`quorum`]      | `readiness_quorum_met`, `lagging_peers`                   |
//! | [`coordinator`] | `ReadinessCoordinator`, `TickOutcome`                     |
//! | [`error`]       | `ReadinessError`, `ReadinessResult`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `AgentState`/`Telemetry`. |

pub mod coordinator;
pub mod error;
pub mod quorum;
pub mod state;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use coordinator::{ReadinessCoordinator, TickOutcome};
pub use error::{ReadinessError, ReadinessResult};
pub use quorum::{lagging_peers, readiness_quorum_met};
pub use state::{AgentState, Telemetry};
