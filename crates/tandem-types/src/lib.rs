//! Shared types and identifiers for tandem.
//!
//! This crate defines the read-only snapshot model the repair planner works
//! over and the operations it produces:
//! identifiers ([`ShardId`], [`CollectionId`], [`ServerId`]),
//! plan structures ([`PlanSnapshot`], [`Database`], [`Collection`]),
//! server health ([`HealthSnapshot`], [`HealthStatus`]),
//! and repair output ([`RepairOperation`] and its variants).

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

mod error;
mod operation;
mod snapshot;

pub use error::SnapshotError;
pub use operation::{BeginRepairs, FinishRepairs, MoveShard, RepairOperation, ShardMapping};

// ---------------------------------------------------------------------------
// ID types
// ---------------------------------------------------------------------------

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    /// Opaque identifier of a storage server (e.g. `PRMR-AAAA...`).
    #[derive(PartialOrd, Ord)]
    ServerId
);

define_id!(
    /// Cluster-unique identifier of a collection.
    #[derive(PartialOrd, Ord)]
    CollectionId
);

define_id!(
    /// Identifier of a shard, of the form `s<N>`.
    ///
    /// `N` is assigned in creation order and is the only meaningful ordering
    /// key. `Ord` compares the numeric suffix, never the raw string.
    ShardId
);

impl ShardId {
    /// Whether the ID has the `s<digits>` shape, whether or not the digits
    /// fit in a `u64`.
    pub fn has_numeric_suffix(&self) -> bool {
        self.0.strip_prefix('s').is_some_and(|digits| {
            !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        })
    }

    /// Numeric suffix of an `s<N>` identifier, or `None` if the ID does not
    /// have that shape or `N` overflows a `u64`.
    pub fn number(&self) -> Option<u64> {
        if !self.has_numeric_suffix() {
            return None;
        }
        self.0[1..].parse().ok()
    }

    /// Ascending by integer suffix.
    ///
    /// IDs without a numeric suffix sort after all numbered ones. Equal
    /// suffixes (`s1` vs `s01`) fall back to the raw string so the order stays
    /// total and consistent with `Eq`.
    pub fn cmp_numeric(&self, other: &Self) -> Ordering {
        match (self.number(), other.number()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ShardId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ShardId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_numeric(other)
    }
}

/// Ordered servers responsible for one shard: position 0 is the leader,
/// the rest are followers.
pub type ServerList = Vec<ServerId>;

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// One collection as described by the Plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Cluster-unique collection ID.
    pub id: CollectionId,
    /// Human-readable collection name.
    pub name: String,
    /// Number of servers every shard is expected to live on.
    pub replication_factor: u64,
    /// Prototype collection this one must be distributed like, if any.
    pub distribute_shards_like: Option<CollectionId>,
    /// Shards in numeric ID order.
    pub shards: BTreeMap<ShardId, ServerList>,
    /// First problem found while decoding this collection from the Plan.
    /// A collection with a defect cannot take part in a repair.
    pub defect: Option<String>,
}

impl Collection {
    /// Create a collection without shards or prototype.
    pub fn new(
        id: impl Into<CollectionId>,
        name: impl Into<String>,
        replication_factor: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            replication_factor,
            distribute_shards_like: None,
            shards: BTreeMap::new(),
            defect: None,
        }
    }

    /// Declare the prototype collection.
    pub fn like(mut self, prototype: impl Into<CollectionId>) -> Self {
        self.distribute_shards_like = Some(prototype.into());
        self
    }

    /// Add (or replace) a shard and its server list.
    pub fn with_shard<S>(
        mut self,
        shard: impl Into<ShardId>,
        servers: impl IntoIterator<Item = S>,
    ) -> Self
    where
        S: Into<ServerId>,
    {
        self.shards
            .insert(shard.into(), servers.into_iter().map(Into::into).collect());
        self
    }

    /// Whether this collection declares a prototype and is therefore a
    /// repair target.
    pub fn is_dependent(&self) -> bool {
        self.distribute_shards_like.is_some()
    }
}

/// A database: its collections keyed by collection ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Database {
    /// Database name.
    pub name: String,
    /// Collections keyed by ID.
    pub collections: BTreeMap<CollectionId, Collection>,
}

impl Database {
    /// Create an empty database.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: BTreeMap::new(),
        }
    }

    /// Look up a collection by ID.
    pub fn collection(&self, id: &CollectionId) -> Option<&Collection> {
        self.collections.get(id)
    }
}

/// The whole cluster plan at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanSnapshot {
    /// Databases keyed by name.
    pub databases: BTreeMap<String, Database>,
}

impl PlanSnapshot {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a collection into the named database, creating the database
    /// on first use.
    pub fn insert(&mut self, database: &str, collection: Collection) {
        self.databases
            .entry(database.to_string())
            .or_insert_with(|| Database::new(database))
            .collections
            .insert(collection.id.clone(), collection);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, database: &str, collection: Collection) -> Self {
        self.insert(database, collection);
        self
    }

    /// Iterate `(database, collection)` over every collection that declares
    /// a prototype, in database then collection-ID order.
    pub fn dependents(&self) -> impl Iterator<Item = (&Database, &Collection)> {
        self.databases.values().flat_map(|db| {
            db.collections
                .values()
                .filter(|c| c.is_dependent())
                .map(move |c| (db, c))
        })
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Last known liveness of a server as reported by supervision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    /// Responsive and healthy.
    Good,
    /// Missed heartbeats; may recover.
    Bad,
    /// Declared failed by supervision.
    Failed,
    /// No status known (missing entry or unrecognized value).
    Unknown,
}

impl HealthStatus {
    /// Parse the status string used in the Health document.
    pub fn parse(status: &str) -> Self {
        match status {
            "GOOD" => Self::Good,
            "BAD" => Self::Bad,
            "FAILED" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Good => "GOOD",
            Self::Bad => "BAD",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        })
    }
}

/// Server health, captured together with the [`PlanSnapshot`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthSnapshot {
    /// Status per server.
    pub servers: BTreeMap<ServerId, HealthStatus>,
}

impl HealthSnapshot {
    /// Create an empty health snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot where every given server is [`HealthStatus::Good`].
    pub fn all_good<S>(servers: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<ServerId>,
    {
        Self {
            servers: servers
                .into_iter()
                .map(|s| (s.into(), HealthStatus::Good))
                .collect(),
        }
    }

    /// Set the status of one server.
    pub fn set(&mut self, server: impl Into<ServerId>, status: HealthStatus) {
        self.servers.insert(server.into(), status);
    }

    /// Status of a server; absent servers are [`HealthStatus::Unknown`].
    pub fn status(&self, server: &ServerId) -> HealthStatus {
        self.servers
            .get(server)
            .copied()
            .unwrap_or(HealthStatus::Unknown)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
