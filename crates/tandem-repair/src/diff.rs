//! Diff engine: which server-list slots of a dependent shard must change.
//!
//! The target of every dependent shard is its prototype shard's server list,
//! verbatim. Each differing position becomes one move; position 0 is the
//! leader.

use tandem_types::{Collection, MoveShard, ServerId};
use tracing::debug;

use crate::error::RepairError;
use crate::health::HealthFilter;
use crate::matcher::ShardPair;

/// One server-list position that differs from the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotChange<'a> {
    /// Position in the server list (0 = leader).
    pub position: usize,
    /// Server currently in that position.
    pub from: &'a ServerId,
    /// Server the prototype has in that position.
    pub to: &'a ServerId,
}

impl SlotChange<'_> {
    /// Whether this change corrects the leader slot.
    pub fn is_leader(&self) -> bool {
        self.position == 0
    }
}

/// Compare `current` against `target` position by position.
///
/// Only positions present in both lists are compared; with equal replication
/// factors that is every position.
pub fn slot_changes<'a>(current: &'a [ServerId], target: &'a [ServerId]) -> Vec<SlotChange<'a>> {
    current
        .iter()
        .zip(target)
        .enumerate()
        .filter(|(_, (from, to))| from != to)
        .map(|(position, (from, to))| SlotChange { position, from, to })
        .collect()
}

/// Compute the moves that bring every dependent shard onto its prototype's
/// servers.
///
/// Moves come out in pair order (dependent shard rank), leader first within a
/// shard. Every destination must pass the health filter; the first one that
/// does not aborts the whole collection. When the prototype's list is longer,
/// the servers in the extra positions become replicas without a move of
/// their own and are held to the same health check.
pub fn plan_moves(
    database: &str,
    dependent: &Collection,
    pairs: &[ShardPair<'_>],
    filter: &HealthFilter<'_>,
) -> Result<Vec<MoveShard>, RepairError> {
    let mut moves = Vec::new();

    for pair in pairs {
        for change in slot_changes(pair.current, pair.target) {
            filter.check_destination(&dependent.id, pair.shard, change.to)?;

            debug!(
                collection = %dependent.id,
                shard = %pair.shard,
                proto_shard = %pair.proto_shard,
                position = change.position,
                from = %change.from,
                to = %change.to,
                "shard slot out of line with prototype"
            );

            moves.push(MoveShard {
                database: database.to_string(),
                collection: dependent.id.clone(),
                collection_name: dependent.name.clone(),
                shard: pair.shard.clone(),
                from_server: change.from.clone(),
                to_server: change.to.clone(),
                is_leader: change.is_leader(),
            });
        }

        for added in pair.target.iter().skip(pair.current.len()) {
            filter.check_destination(&dependent.id, pair.shard, added)?;
        }
    }

    Ok(moves)
}
