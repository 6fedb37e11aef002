//! Health filter: which servers may take part in a repaired placement.

use tandem_types::{CollectionId, HealthSnapshot, HealthStatus, ServerId, ShardId};

use crate::error::RepairError;

/// Classifies servers as usable or not for a planning run.
///
/// Only [`HealthStatus::Good`] is usable. `BAD`, `FAILED` and servers missing
/// from the snapshot are not.
#[derive(Debug, Clone, Copy)]
pub struct HealthFilter<'a> {
    health: &'a HealthSnapshot,
}

impl<'a> HealthFilter<'a> {
    /// Create a filter over a health snapshot.
    pub fn new(health: &'a HealthSnapshot) -> Self {
        Self { health }
    }

    /// Whether `server` may receive a shard.
    pub fn is_usable(&self, server: &ServerId) -> bool {
        self.health.status(server) == HealthStatus::Good
    }

    /// Refuse a move of `shard` onto `server` unless the server is usable.
    pub fn check_destination(
        &self,
        collection: &CollectionId,
        shard: &ShardId,
        server: &ServerId,
    ) -> Result<(), RepairError> {
        if self.is_usable(server) {
            return Ok(());
        }
        Err(RepairError::HealthConstraintViolation {
            collection: collection.clone(),
            shard: shard.clone(),
            server: server.clone(),
            status: self.health.status(server),
        })
    }
}
