//! Error types for repair planning.
//!
//! Every error is scoped to one dependent collection and travels as a value
//! inside the [`RepairResult`](crate::RepairResult); none of them abort a run.

use tandem_types::{CollectionId, HealthStatus, ServerId, ShardId};

/// Why one dependent collection could not be planned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepairError {
    /// The snapshot does not describe a pair that can be matched.
    #[error("snapshot inconsistency in collection {collection}: {reason}")]
    SnapshotInconsistency {
        /// The dependent collection.
        collection: CollectionId,
        /// What is wrong.
        reason: Inconsistency,
    },

    /// A move would place a shard on a server that is not GOOD.
    #[error("collection {collection}: shard {shard} cannot move to {server}, server is {status}")]
    HealthConstraintViolation {
        /// The dependent collection.
        collection: CollectionId,
        /// The shard whose move was refused.
        shard: ShardId,
        /// The destination server.
        server: ServerId,
        /// Its status in the health snapshot.
        status: HealthStatus,
    },

    /// Replication factors differ and the policy does not allow it.
    #[error(
        "collection {collection} has replication factor {replication_factor}, \
         prototype {prototype} has {proto_replication_factor}"
    )]
    ReplicationFactorMismatch {
        /// The dependent collection.
        collection: CollectionId,
        /// Its prototype.
        prototype: CollectionId,
        /// Dependent replication factor.
        replication_factor: u64,
        /// Prototype replication factor.
        proto_replication_factor: u64,
    },
}

/// Detail of a [`RepairError::SnapshotInconsistency`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Inconsistency {
    /// `distributeShardsLike` names a collection that is not in the database.
    #[error("prototype collection {0} not found")]
    MissingPrototype(CollectionId),

    /// Dependent and prototype have a different number of shards.
    #[error("{shards} shards, prototype has {proto_shards}")]
    ShardCountMismatch {
        /// Shards in the dependent.
        shards: usize,
        /// Shards in the prototype.
        proto_shards: usize,
    },

    /// The collection's Plan entry could not be read.
    #[error("collection {collection} is malformed: {detail}")]
    Malformed {
        /// Owning collection.
        collection: CollectionId,
        /// What the decoder found.
        detail: String,
    },

    /// A shard ID is not of the form `s<N>`.
    #[error("shard {shard} of collection {collection} has no numeric suffix")]
    InvalidShardId {
        /// Owning collection.
        collection: CollectionId,
        /// The offending shard.
        shard: ShardId,
    },

    /// A shard ID is `s<N>` but `N` does not fit in 64 bits.
    #[error("shard {shard} of collection {collection} has a numeric suffix out of range")]
    ShardNumberOutOfRange {
        /// Owning collection.
        collection: CollectionId,
        /// The offending shard.
        shard: ShardId,
    },

    /// A shard has no servers at all.
    #[error("shard {shard} of collection {collection} has no servers")]
    EmptyServerList {
        /// Owning collection.
        collection: CollectionId,
        /// The offending shard.
        shard: ShardId,
    },

    /// A shard's server list does not match the collection's replication factor.
    #[error(
        "shard {shard} of collection {collection} has {found} servers, \
         replication factor is {expected}"
    )]
    ServerListLength {
        /// Owning collection.
        collection: CollectionId,
        /// The offending shard.
        shard: ShardId,
        /// The collection's replication factor.
        expected: u64,
        /// Actual server list length.
        found: usize,
    },
}

impl RepairError {
    /// Short stable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SnapshotInconsistency { .. } => "snapshotInconsistency",
            Self::HealthConstraintViolation { .. } => "healthConstraintViolation",
            Self::ReplicationFactorMismatch { .. } => "replicationFactorMismatch",
        }
    }

    /// The dependent collection the error belongs to.
    pub fn collection(&self) -> &CollectionId {
        match self {
            Self::SnapshotInconsistency { collection, .. }
            | Self::HealthConstraintViolation { collection, .. }
            | Self::ReplicationFactorMismatch { collection, .. } => collection,
        }
    }

    pub(crate) fn inconsistent(collection: &CollectionId, reason: Inconsistency) -> Self {
        Self::SnapshotInconsistency {
            collection: collection.clone(),
            reason,
        }
    }
}
