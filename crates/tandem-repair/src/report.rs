//! Serializable view of a planning run.
//!
//! The report is what leaves the process: the CLI prints it, and its
//! fingerprint lets a supervision loop tell whether two runs proposed the
//! same thing.

use std::collections::BTreeMap;

use serde::Serialize;
use tandem_types::{CollectionId, RepairOperation};

use crate::planner::RepairResult;

/// Outcome for one dependent collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CollectionOutcome {
    /// Already distributed like its prototype.
    Consistent,
    /// Needs the listed operations.
    Repair { operations: Vec<RepairOperation> },
    /// Could not be planned this run.
    Failed { kind: &'static str, message: String },
}

/// Counts over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    /// Dependent collections examined.
    pub checked: usize,
    /// Collections with a non-empty repair.
    pub needing_repair: usize,
    /// Collections that failed to plan.
    pub failed: usize,
    /// Total `MoveShard` operations.
    pub moves: usize,
}

/// Report of one planning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    pub summary: PlanSummary,
    pub collections: BTreeMap<CollectionId, CollectionOutcome>,
}

impl PlanReport {
    /// Build a report from planner output.
    pub fn from_result(result: &RepairResult) -> Self {
        let mut summary = PlanSummary {
            checked: result.len(),
            ..PlanSummary::default()
        };

        let collections = result
            .iter()
            .map(|(id, outcome)| {
                let outcome = match outcome {
                    Ok(ops) if ops.is_empty() => CollectionOutcome::Consistent,
                    Ok(ops) => {
                        summary.needing_repair += 1;
                        summary.moves += ops.iter().filter(|op| op.as_move().is_some()).count();
                        CollectionOutcome::Repair {
                            operations: ops.clone(),
                        }
                    }
                    Err(e) => {
                        summary.failed += 1;
                        CollectionOutcome::Failed {
                            kind: e.kind(),
                            message: e.to_string(),
                        }
                    }
                };
                (id.clone(), outcome)
            })
            .collect();

        Self {
            summary,
            collections,
        }
    }

    /// `true` when every collection is consistent.
    pub fn is_clean(&self) -> bool {
        self.summary.needing_repair == 0 && self.summary.failed == 0
    }

    /// Canonical JSON encoding.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Indented JSON encoding for humans.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Hex BLAKE3 digest of the canonical JSON encoding.
    ///
    /// All maps in the report are ordered, so equal reports always hash the
    /// same.
    pub fn fingerprint(&self) -> serde_json::Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}
