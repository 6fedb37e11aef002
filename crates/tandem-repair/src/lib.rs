//! Repair planning for collections declared with `distributeShardsLike`.
//!
//! This crate provides:
//!
//! - [`RepairPlanner`] — runs the whole pipeline for every dependent
//!   collection in a plan snapshot and collects a per-collection result.
//! - [`matcher`] — validates a dependent/prototype pair and pairs their shards
//!   by numeric shard rank.
//! - [`HealthFilter`] — decides which servers may receive a shard.
//! - [`diff`] — turns matched shard pairs into `MoveShard` operations.
//! - [`sequencer`] — wraps the moves into `BeginRepairs .. FinishRepairs`.
//! - [`PlanReport`] — serializable summary of a run, with a stable fingerprint.
//!
//! Planning is a pure function of `(PlanSnapshot, HealthSnapshot, RepairPolicy)`.
//! Nothing here performs I/O or mutates the snapshot.

pub mod diff;
pub mod error;
pub mod health;
pub mod matcher;
pub mod planner;
pub mod policy;
pub mod report;
pub mod sequencer;

pub use error::{Inconsistency, RepairError};
pub use health::HealthFilter;
pub use matcher::ShardPair;
pub use planner::{RepairPlanner, RepairResult};
pub use policy::{RepairPolicy, ReplicationFactorPolicy};
pub use report::{CollectionOutcome, PlanReport, PlanSummary};
