//! Operation sequencer: assembles one collection's repair transaction.

use tandem_types::{
    BeginRepairs, Collection, FinishRepairs, MoveShard, RepairOperation, ShardMapping,
};

use crate::matcher::ShardPair;
use crate::policy::RepairPolicy;

/// Wrap `moves` into `BeginRepairs, MoveShard*, FinishRepairs`.
///
/// Returns an empty list when there is nothing to move and both collections
/// have the same replication factor, so an already-aligned collection never
/// touches the consensus store. Differing factors always produce a
/// transaction, even without moves, since the follower count still has to
/// change. Moves are ordered by the dependent shard's numeric rank; the sort
/// is stable, which keeps the leader-first order within a shard.
pub fn sequence(
    database: &str,
    dependent: &Collection,
    prototype: &Collection,
    pairs: &[ShardPair<'_>],
    mut moves: Vec<MoveShard>,
    policy: &RepairPolicy,
) -> Vec<RepairOperation> {
    if moves.is_empty() && dependent.replication_factor == prototype.replication_factor {
        return Vec::new();
    }

    moves.sort_by(|a, b| a.shard.cmp_numeric(&b.shard));

    let begin = BeginRepairs {
        database: database.to_string(),
        collection: dependent.id.clone(),
        collection_name: dependent.name.clone(),
        proto_collection: prototype.id.clone(),
        proto_name: prototype.name.clone(),
        replication_factor: dependent.replication_factor,
        proto_replication_factor: prototype.replication_factor,
        rename_distribute_shards_like: policy.rename_distribute_shards_like,
    };

    let finish = FinishRepairs {
        database: database.to_string(),
        collection: dependent.id.clone(),
        collection_name: dependent.name.clone(),
        proto_collection: prototype.id.clone(),
        proto_name: prototype.name.clone(),
        shard_mapping: pairs
            .iter()
            .map(|pair| ShardMapping {
                shard: pair.shard.clone(),
                proto_shard: pair.proto_shard.clone(),
                servers: pair.target.to_vec(),
            })
            .collect(),
        replication_factor: prototype.replication_factor,
    };

    let mut operations = Vec::with_capacity(moves.len() + 2);
    operations.push(begin.into());
    operations.extend(moves.into_iter().map(RepairOperation::from));
    operations.push(finish.into());
    operations
}
