//! `swarm-knowledge` — the shared knowledge store as seen by one agent.
//!
//! Agents coordinate only through an eventually-consistent key/value store.
//! This crate fixes the contract ([`KnowledgeBase`]), replaces string-built
//! keys with a structured [`Key`] (agent id + [`AgentField`], or a registry
//! entry), and provides [`InMemoryKnowledge`], a per-agent replica used by
//! tests and the simulation harness.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`key`]         | `Key`, `AgentField`                                       |
//! | [`value`]       | `Value`, `Scope`                                          |
//! | [`base`]        | `KnowledgeBase` trait, `KnowledgeExt` typed helpers       |
//! | [`memory`]      | `InMemoryKnowledge` replica, `Update`                     |
//! | [`snapshot`]    | `SwarmSnapshot` (SoA view of all agents' published state) |
//! | [`error`]       | `KnowledgeError`, `KnowledgeResult`                       |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `fx-hash` | `FxHashMap` instead of `HashMap` inside the replica.     |
//! | `serde`   | Derives `Serialize`/`Deserialize` on all public types.   |

pub mod base;
pub mod error;
pub mod key;
pub mod memory;
pub mod snapshot;
pub mod value;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use base::{KnowledgeBase, KnowledgeExt};
pub use error::{KnowledgeError, KnowledgeResult};
pub use key::{AgentField, Key};
pub use memory::{InMemoryKnowledge, Update};
pub use snapshot::SwarmSnapshot;
pub use value::{Scope, Value};
