//! Result aggregator: plans every dependent collection in a snapshot.

use std::collections::BTreeMap;

use tandem_types::{
    Collection, CollectionId, Database, HealthSnapshot, PlanSnapshot, RepairOperation,
};
use tracing::{debug, info, warn};

use crate::diff::plan_moves;
use crate::error::{Inconsistency, RepairError};
use crate::health::HealthFilter;
use crate::matcher::{match_shards, validate};
use crate::policy::{RepairPolicy, ReplicationFactorPolicy};
use crate::sequencer::sequence;

/// Per dependent collection: its repair operations (empty when already
/// aligned) or the reason it could not be planned.
pub type RepairResult = BTreeMap<CollectionId, Result<Vec<RepairOperation>, RepairError>>;

/// Plans `distributeShardsLike` repairs over an immutable snapshot.
///
/// A run is a pure function of the plan, the health snapshot and the policy.
/// Running it twice on the same input yields identical output.
#[derive(Debug, Clone, Default)]
pub struct RepairPlanner {
    policy: RepairPolicy,
}

impl RepairPlanner {
    /// Create a planner with the given policy.
    pub fn new(policy: RepairPolicy) -> Self {
        Self { policy }
    }

    /// Plan every collection that declares a prototype.
    ///
    /// Collections are planned independently; a failure on one is recorded
    /// under its ID and does not affect any other.
    pub fn plan(&self, plan: &PlanSnapshot, health: &HealthSnapshot) -> RepairResult {
        let filter = HealthFilter::new(health);
        let mut results = RepairResult::new();

        for (database, collection) in plan.dependents() {
            let outcome = self.plan_collection(database, collection, &filter);
            match &outcome {
                Ok(ops) if ops.is_empty() => {
                    debug!(
                        db = %database.name,
                        collection = %collection.id,
                        "collection aligned with prototype"
                    );
                }
                Ok(ops) => {
                    info!(
                        db = %database.name,
                        collection = %collection.id,
                        name = %collection.name,
                        operations = ops.len(),
                        "collection needs repair"
                    );
                }
                Err(e) => {
                    warn!(
                        db = %database.name,
                        collection = %collection.id,
                        kind = e.kind(),
                        error = %e,
                        "cannot plan repair for collection"
                    );
                }
            }
            if results.insert(collection.id.clone(), outcome).is_some() {
                warn!(
                    db = %database.name,
                    collection = %collection.id,
                    "collection ID appears in more than one database, keeping the later one"
                );
            }
        }

        let failed = results.values().filter(|r| r.is_err()).count();
        let repairs = results
            .values()
            .filter(|r| r.as_ref().is_ok_and(|ops| !ops.is_empty()))
            .count();
        info!(
            checked = results.len(),
            repairs,
            failed,
            "repair planning finished"
        );

        results
    }

    /// Plan one dependent collection of `database`.
    pub fn plan_collection(
        &self,
        database: &Database,
        dependent: &Collection,
        filter: &HealthFilter<'_>,
    ) -> Result<Vec<RepairOperation>, RepairError> {
        let Some(proto_id) = dependent.distribute_shards_like.as_ref() else {
            return Ok(Vec::new());
        };

        let prototype = database.collection(proto_id).ok_or_else(|| {
            RepairError::inconsistent(
                &dependent.id,
                Inconsistency::MissingPrototype(proto_id.clone()),
            )
        })?;

        validate(dependent, dependent)?;
        validate(prototype, dependent)?;

        if dependent.replication_factor != prototype.replication_factor
            && self.policy.replication_factor == ReplicationFactorPolicy::Reject
        {
            return Err(RepairError::ReplicationFactorMismatch {
                collection: dependent.id.clone(),
                prototype: prototype.id.clone(),
                replication_factor: dependent.replication_factor,
                proto_replication_factor: prototype.replication_factor,
            });
        }

        let pairs = match_shards(dependent, prototype)?;
        let moves = plan_moves(&database.name, dependent, &pairs, filter)?;

        Ok(sequence(
            &database.name,
            dependent,
            prototype,
            &pairs,
            moves,
            &self.policy,
        ))
    }
}
