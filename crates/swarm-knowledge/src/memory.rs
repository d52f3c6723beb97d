//! `InMemoryKnowledge`: one agent's replica of the shared store.
//!
//! # Replication model
//!
//! Global writes are applied locally at once and queued as [`Update`]s.  The
//! owner of the replicas (the simulation harness, or a transport adapter)
//! drains the queue with [`InMemoryKnowledge::drain_outgoing`] and delivers
//! the batch to peers with [`InMemoryKnowledge::merge_remote`], possibly
//! after a delay.  Remote updates are last-arrival-wins; there is no clock
//! or quality arbitration.
//!
//! Local writes never leave the replica and pin their key: a later remote
//! update for the same key is ignored on this replica.  Trigger keys
//! ([`Key::is_trigger`]) are the exception: an agent clears a swarm-wide
//! trigger for itself while peers still observe it, and the next remote
//! write of the trigger replaces the local value and re-arms it.

use std::collections::hash_map::Entry;

use swarm_core::AgentId;

use crate::{Key, KnowledgeBase, Scope, Value};

#[cfg(feature = "fx-hash")]
type KeyMap<V> = rustc_hash::FxHashMap<Key, V>;
#[cfg(not(feature = "fx-hash"))]
type KeyMap<V> = std::collections::HashMap<Key, V>;

/// A replicated write.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Update {
    pub origin: AgentId,
    pub key:    Key,
    pub value:  Value,
}

#[derive(Clone, Debug)]
struct Slot {
    value: Value,
    scope: Scope,
}

/// Per-agent replica implementing [`KnowledgeBase`].
#[derive(Clone, Debug)]
pub struct InMemoryKnowledge {
    owner:    AgentId,
    values:   KeyMap<Slot>,
    outgoing: Vec<Update>,
}

impl InMemoryKnowledge {
    pub fn new(owner: AgentId) -> Self {
        Self {
            owner,
            values:   KeyMap::default(),
            outgoing: Vec::new(),
        }
    }

    #[inline]
    pub fn owner(&self) -> AgentId {
        self.owner
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `true` if `key` was last written locally on this replica.
    pub fn is_local(&self, key: &Key) -> bool {
        self.values.get(key).is_some_and(|s| s.scope == Scope::Local)
    }

    /// Number of global writes waiting to be replicated.
    pub fn pending(&self) -> usize {
        self.outgoing.len()
    }

    /// Take every global write made since the last drain, in write order.
    pub fn drain_outgoing(&mut self) -> Vec<Update> {
        std::mem::take(&mut self.outgoing)
    }

    /// Apply peers' updates.  Returns how many were applied.
    ///
    /// Updates that originated here, or that target a locally pinned
    /// non-trigger key, are skipped.
    pub fn merge_remote<'a, I>(&mut self, updates: I) -> usize
    where
        I: IntoIterator<Item = &'a Update>,
    {
        let mut applied = 0;
        for update in updates {
            if update.origin == self.owner {
                continue;
            }
            match self.values.entry(update.key) {
                Entry::Occupied(mut e) => {
                    if e.get().scope == Scope::Local && !update.key.is_trigger() {
                        continue;
                    }
                    *e.get_mut() = Slot { value: update.value.clone(), scope: Scope::Global };
                }
                Entry::Vacant(e) => {
                    e.insert(Slot { value: update.value.clone(), scope: Scope::Global });
                }
            }
            applied += 1;
        }
        applied
    }
}

impl KnowledgeBase for InMemoryKnowledge {
    fn get(&self, key: &Key) -> Option<Value> {
        self.values.get(key).map(|s| s.value.clone())
    }

    fn set(&mut self, key: Key, value: Value, scope: Scope) {
        if scope == Scope::Global {
            self.outgoing.push(Update { origin: self.owner, key, value: value.clone() });
        }
        tracing::trace!(agent = %self.owner, %key, ?value, ?scope, "knowledge write");
        self.values.insert(key, Slot { value, scope });
    }
}
