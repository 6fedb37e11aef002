//! Repair operations emitted by the planner.
//!
//! A repair for one dependent collection is always the sequence
//! `BeginRepairs, MoveShard*, FinishRepairs`. The operations are plain values;
//! turning them into a consensus-store transaction is up to the applier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CollectionId, ServerId, ServerList, ShardId};

/// One step of a proposed repair transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RepairOperation {
    /// Opens the repair of a dependent collection.
    BeginRepairs(BeginRepairs),
    /// Moves one server-list slot of one shard.
    MoveShard(MoveShard),
    /// Closes the repair and lists the final placement of every shard.
    FinishRepairs(FinishRepairs),
}

/// Opens the repair of one dependent collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginRepairs {
    pub database: String,
    pub collection: CollectionId,
    pub collection_name: String,
    pub proto_collection: CollectionId,
    pub proto_name: String,
    /// Replication factor of the dependent collection.
    pub replication_factor: u64,
    /// Replication factor of the prototype collection.
    pub proto_replication_factor: u64,
    /// Policy flag supplied by the caller, passed through unchanged.
    pub rename_distribute_shards_like: bool,
}

/// Moves one slot of a shard's server list from one server to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveShard {
    pub database: String,
    pub collection: CollectionId,
    pub collection_name: String,
    pub shard: ShardId,
    pub from_server: ServerId,
    pub to_server: ServerId,
    /// `true` iff this move corrects position 0 (the leader).
    pub is_leader: bool,
}

/// Final placement of one dependent shard next to its prototype shard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardMapping {
    pub shard: ShardId,
    pub proto_shard: ShardId,
    pub servers: ServerList,
}

/// Closes the repair of one dependent collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishRepairs {
    pub database: String,
    pub collection: CollectionId,
    pub collection_name: String,
    pub proto_collection: CollectionId,
    pub proto_name: String,
    /// Every matched shard pair, moved or not, in shard order.
    pub shard_mapping: Vec<ShardMapping>,
    pub replication_factor: u64,
}

impl RepairOperation {
    /// The dependent collection this operation belongs to.
    pub fn collection(&self) -> &CollectionId {
        match self {
            Self::BeginRepairs(op) => &op.collection,
            Self::MoveShard(op) => &op.collection,
            Self::FinishRepairs(op) => &op.collection,
        }
    }

    /// Returns the move if this is a [`RepairOperation::MoveShard`].
    pub fn as_move(&self) -> Option<&MoveShard> {
        match self {
            Self::MoveShard(op) => Some(op),
            _ => None,
        }
    }
}

impl From<BeginRepairs> for RepairOperation {
    fn from(op: BeginRepairs) -> Self {
        Self::BeginRepairs(op)
    }
}

impl From<MoveShard> for RepairOperation {
    fn from(op: MoveShard) -> Self {
        Self::MoveShard(op)
    }
}

impl From<FinishRepairs> for RepairOperation {
    fn from(op: FinishRepairs) -> Self {
        Self::FinishRepairs(op)
    }
}

impl fmt::Display for RepairOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeginRepairs(op) => write!(
                f,
                "begin {}/{} ({}) like {} ({}), rf {} vs {}",
                op.database,
                op.collection,
                op.collection_name,
                op.proto_collection,
                op.proto_name,
                op.replication_factor,
                op.proto_replication_factor,
            ),
            Self::MoveShard(op) => write!(
                f,
                "move {}/{} shard {} {} -> {}{}",
                op.database,
                op.collection,
                op.shard,
                op.from_server,
                op.to_server,
                if op.is_leader { " (leader)" } else { "" },
            ),
            Self::FinishRepairs(op) => write!(
                f,
                "finish {}/{} ({} shards like {})",
                op.database,
                op.collection,
                op.shard_mapping.len(),
                op.proto_collection,
            ),
        }
    }
}
