//! `swarm-sim` — deterministic multi-agent harness for the swarm
//! coordination core.
//!
//! Every simulated agent owns its own knowledge replica, a readiness
//! coordinator (if it belongs to a search area), a bridge coordinator, and
//! a simulated platform that turns movement commands into telemetry.
//! Replicas exchange writes through a delayed in-process queue, so peers
//! see each other's state late, the way a real swarm does.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Deliver    — replication batches due now; operator bridge requests
//!   ② Agents     — step platform, publish position, bridge tick, readiness
//!                  tick (parallel with the `parallel` feature)
//!   ③ Replicate  — drain outgoing writes in ascending AgentId order
//!   ④ Track      — mark sensor footprints on the coverage trackers
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Evaluates agents on Rayon's thread pool.               |
//! | `fx-hash`  | FxHash-backed replicas.                                |
//! | `serde`    | Serde derives on scenario and parameter types.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use swarm_sim::{AreaSpec, NoopObserver, SwarmBuilder};
//!
//! let mut swarm = SwarmBuilder::new(config)
//!     .areas(vec![AreaSpec::new(region, (0..4).map(AgentId), CoverageKind::Snake)])
//!     .build()?;
//! swarm.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod output;
pub mod platform;
pub mod scenario;
pub mod swarm;


pub use builder::SwarmBuilder;
pub use error::{SwarmError, SwarmResult};
pub use observer::{NoopObserver, SwarmObserver, TickSummary};
pub use output::CsvTraceObserver;
pub use platform::{PlatformParams, SimPlatform};
pub use scenario::{AreaSpec, BridgeSpec};
pub use swarm::{AgentTickReport, AreaTracker, SimAgent, Swarm};
