//! Caller-supplied repair policy.
//!
//! Two decisions are not the planner's to make: what the flag on
//! `BeginRepairs` means to the applier, and whether a dependent whose
//! replication factor differs from its prototype's may be repaired at all.
//! Both are explicit parameters here instead of hidden defaults.

use serde::{Deserialize, Serialize};

/// How to treat a dependent whose replication factor differs from its
/// prototype's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplicationFactorPolicy {
    /// Fail the collection with `ReplicationFactorMismatch`.
    #[default]
    Reject,
    /// Plan anyway. Moves cover the positions both server lists share; the
    /// final placement is the prototype's, at the prototype's factor.
    AdoptPrototype,
}

/// Policy parameters threaded through one planning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairPolicy {
    /// Copied verbatim onto every `BeginRepairs`. The planner gives it no
    /// meaning; the applier decides what it gates.
    pub rename_distribute_shards_like: bool,
    /// Behaviour under a replication factor mismatch.
    pub replication_factor: ReplicationFactorPolicy,
}

impl Default for RepairPolicy {
    fn default() -> Self {
        Self {
            rename_distribute_shards_like: true,
            replication_factor: ReplicationFactorPolicy::Reject,
        }
    }
}
