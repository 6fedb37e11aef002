//! Shard matching between a dependent collection and its prototype.
//!
//! `distributeShardsLike` creates the dependent's shards in the same order as
//! the prototype's, so sorting both by the numeric suffix of the shard ID and
//! pairing equal ranks recovers the correspondence. The IDs themselves differ
//! (`s11` in the prototype may pair with `s3` in the dependent).

use tandem_types::{Collection, ServerId, ShardId};
use tracing::debug;

use crate::error::{Inconsistency, RepairError};

/// One dependent shard paired with the prototype shard it must mirror.
///
/// Borrows from the snapshot, which outlives any planning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardPair<'a> {
    /// Dependent shard ID.
    pub shard: &'a ShardId,
    /// Dependent shard's current server list.
    pub current: &'a [ServerId],
    /// Matched prototype shard ID.
    pub proto_shard: &'a ShardId,
    /// Prototype shard's server list, which is the dependent's target.
    pub target: &'a [ServerId],
}

/// Check that every shard of `collection` is well formed.
///
/// A decoding defect is reported before any shard. Shards are checked in
/// numeric order and the first problem is reported against `dependent`, the
/// collection whose plan fails.
pub fn validate(collection: &Collection, dependent: &Collection) -> Result<(), RepairError> {
    if let Some(detail) = &collection.defect {
        return Err(RepairError::inconsistent(
            &dependent.id,
            Inconsistency::Malformed {
                collection: collection.id.clone(),
                detail: detail.clone(),
            },
        ));
    }

    for (shard, servers) in &collection.shards {
        let reason = if !shard.has_numeric_suffix() {
            Inconsistency::InvalidShardId {
                collection: collection.id.clone(),
                shard: shard.clone(),
            }
        } else if shard.number().is_none() {
            Inconsistency::ShardNumberOutOfRange {
                collection: collection.id.clone(),
                shard: shard.clone(),
            }
        } else if servers.is_empty() {
            Inconsistency::EmptyServerList {
                collection: collection.id.clone(),
                shard: shard.clone(),
            }
        } else if servers.len() as u64 != collection.replication_factor {
            Inconsistency::ServerListLength {
                collection: collection.id.clone(),
                shard: shard.clone(),
                expected: collection.replication_factor,
                found: servers.len(),
            }
        } else {
            continue;
        };
        return Err(RepairError::inconsistent(&dependent.id, reason));
    }
    Ok(())
}

/// Pair the shards of `dependent` with those of `prototype` by numeric rank.
///
/// Fails without partial output if the shard counts differ.
pub fn match_shards<'a>(
    dependent: &'a Collection,
    prototype: &'a Collection,
) -> Result<Vec<ShardPair<'a>>, RepairError> {
    if dependent.shards.len() != prototype.shards.len() {
        return Err(RepairError::inconsistent(
            &dependent.id,
            Inconsistency::ShardCountMismatch {
                shards: dependent.shards.len(),
                proto_shards: prototype.shards.len(),
            },
        ));
    }

    // `ShardId` orders numerically, so map iteration is already by rank.
    let pairs: Vec<ShardPair<'a>> = dependent
        .shards
        .iter()
        .zip(prototype.shards.iter())
        .map(|((shard, current), (proto_shard, target))| ShardPair {
            shard,
            current,
            proto_shard,
            target,
        })
        .collect();

    debug!(
        collection = %dependent.id,
        prototype = %prototype.id,
        pairs = pairs.len(),
        "matched shards"
    );
    Ok(pairs)
}
