//! Decoding of the Plan and Health documents.
//!
//! The Plan document maps database name to collection ID to collection:
//!
//! ```text
//! { "<db>": { "<collectionId>": {
//!     "name": "...", "replicationFactor": 2,
//!     "distributeShardsLike": "<collectionId>",
//!     "shards": { "s1": ["<serverId>", ...] } } } }
//! ```
//!
//! The Health document maps server ID to `{ "Status": "GOOD" | "BAD" | "FAILED" }`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    Collection, CollectionId, Database, HealthSnapshot, HealthStatus, PlanSnapshot, ServerId,
    ServerList, ShardId, SnapshotError,
};

#[derive(Deserialize)]
struct RawHealth {
    #[serde(rename = "Status", default)]
    status: Option<String>,
}

impl PlanSnapshot {
    /// Decode a Plan document.
    ///
    /// Only the outer `database -> collection ID -> entry` shape is required.
    /// A collection entry that cannot be read (a non-integer
    /// `replicationFactor`, a server list that is not an array of strings)
    /// is kept with its [`Collection::defect`] set, so that only the pairs
    /// involving it fail. A `null` server list decodes as empty. An empty
    /// `distributeShardsLike` string is treated as absent. Unknown collection
    /// attributes are ignored.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let raw: BTreeMap<String, BTreeMap<String, Value>> =
            serde_json::from_str(json).map_err(SnapshotError::Plan)?;

        let databases = raw
            .into_iter()
            .map(|(db_name, collections)| {
                let collections = collections
                    .into_iter()
                    .map(|(id, entry)| {
                        let id = CollectionId::from(id);
                        (id.clone(), decode_collection(id, entry))
                    })
                    .collect();
                let database = Database {
                    name: db_name.clone(),
                    collections,
                };
                (db_name, database)
            })
            .collect();

        Ok(Self { databases })
    }
}

fn decode_collection(id: CollectionId, entry: Value) -> Collection {
    let mut collection = Collection::new(id, "", 0);
    let filled = match entry {
        Value::Object(mut fields) => fill_collection(&mut collection, &mut fields),
        other => Err(format!("entry is {}, expected an object", kind(&other))),
    };
    if let Err(defect) = filled {
        collection.defect = Some(defect);
    }
    collection
}

/// Read the attributes of one collection entry into `collection`.
///
/// `distributeShardsLike` is read first so that a broken dependent is still
/// recognized as one.
fn fill_collection(
    collection: &mut Collection,
    fields: &mut Map<String, Value>,
) -> Result<(), String> {
    collection.distribute_shards_like = match fields.remove("distributeShardsLike") {
        None | Some(Value::Null) => None,
        Some(Value::String(proto)) if proto.is_empty() => None,
        Some(Value::String(proto)) => Some(CollectionId::from(proto)),
        Some(other) => {
            return Err(format!("distributeShardsLike is {}, expected a string", kind(&other)));
        }
    };

    match fields.remove("name") {
        None | Some(Value::Null) => {}
        Some(Value::String(name)) => collection.name = name,
        Some(other) => return Err(format!("name is {}, expected a string", kind(&other))),
    }

    collection.replication_factor = match fields.get("replicationFactor") {
        Some(value) => value.as_u64().ok_or_else(|| {
            format!("replicationFactor {value} is not a non-negative integer")
        })?,
        None => return Err("replicationFactor is missing".to_string()),
    };

    match fields.remove("shards") {
        None | Some(Value::Null) => {}
        Some(Value::Object(shards)) => {
            for (shard, servers) in shards {
                let servers = decode_servers(&shard, servers)?;
                collection.shards.insert(ShardId::from(shard), servers);
            }
        }
        Some(other) => return Err(format!("shards is {}, expected an object", kind(&other))),
    }

    Ok(())
}

fn decode_servers(shard: &str, servers: Value) -> Result<ServerList, String> {
    match servers {
        Value::Null => Ok(ServerList::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(server) => Ok(ServerId::from(server)),
                other => Err(format!(
                    "shard {shard} lists {}, expected a server ID",
                    kind(&other)
                )),
            })
            .collect(),
        other => Err(format!(
            "shard {shard} has {}, expected a server list",
            kind(&other)
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl HealthSnapshot {
    /// Decode a Health document.
    ///
    /// Entries without a `Status` (coordinators, for instance) and unknown
    /// status strings map to [`HealthStatus::Unknown`].
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let raw: BTreeMap<String, RawHealth> =
            serde_json::from_str(json).map_err(SnapshotError::Health)?;

        let servers = raw
            .into_iter()
            .map(|(server, entry)| {
                let status = entry
                    .status
                    .as_deref()
                    .map_or(HealthStatus::Unknown, HealthStatus::parse);
                (ServerId::from(server), status)
            })
            .collect();

        Ok(Self { servers })
    }
}
