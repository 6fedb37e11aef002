//! Shared fixtures for tandem integration tests.
//!
//! Provides the cluster documents captured from a real three-server cluster
//! (one prototype, one drifted follower) and a seeded generator for larger
//! synthetic snapshots.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tandem_repair::{RepairPlanner, RepairPolicy, RepairResult};
use tandem_types::{Collection, CollectionId, HealthSnapshot, PlanSnapshot, RepairOperation};

pub const SERVER_A: &str = "PRMR-AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA";
pub const SERVER_B: &str = "PRMR-BBBBBBBB-BBBB-BBBB-BBBB-BBBBBBBBBBBB";
pub const SERVER_C: &str = "PRMR-CCCCCCCC-CCCC-CCCC-CCCC-CCCCCCCCCCCC";

/// Prototype `11111111` and its drifted follower `22222222` in `someDb`.
/// Shard keys are deliberately out of numeric order.
pub const GOLDEN_PLAN: &str = r#"{
  "someDb": {
    "11111111": {
      "name": "prototype",
      "replicationFactor": 2,
      "shards": {
        "s11": ["PRMR-BBBBBBBB-BBBB-BBBB-BBBB-BBBBBBBBBBBB", "PRMR-CCCCCCCC-CCCC-CCCC-CCCC-CCCCCCCCCCCC"],
        "s1": ["PRMR-AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA", "PRMR-BBBBBBBB-BBBB-BBBB-BBBB-BBBBBBBBBBBB"],
        "s20": ["PRMR-BBBBBBBB-BBBB-BBBB-BBBB-BBBBBBBBBBBB", "PRMR-AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA"],
        "s346": ["PRMR-CCCCCCCC-CCCC-CCCC-CCCC-CCCCCCCCCCCC", "PRMR-BBBBBBBB-BBBB-BBBB-BBBB-BBBBBBBBBBBB"],
        "s2": ["PRMR-AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA", "PRMR-CCCCCCCC-CCCC-CCCC-CCCC-CCCCCCCCCCCC"],
        "s35": ["PRMR-CCCCCCCC-CCCC-CCCC-CCCC-CCCCCCCCCCCC", "PRMR-AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA"]
      }
    },
    "22222222": {
      "name": "follower",
      "replicationFactor": 2,
      "distributeShardsLike": "11111111",
      "shards": {
        "s6": ["PRMR-CCCCCCCC-CCCC-CCCC-CCCC-CCCCCCCCCCCC", "PRMR-AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA"],
        "s3": ["PRMR-AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA", "PRMR-CCCCCCCC-CCCC-CCCC-CCCC-CCCCCCCCCCCC"],
        "s2": ["PRMR-AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA", "PRMR-BBBBBBBB-BBBB-BBBB-BBBB-BBBBBBBBBBBB"],
        "s5": ["PRMR-BBBBBBBB-BBBB-BBBB-BBBB-BBBBBBBBBBBB", "PRMR-AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA"],
        "s4": ["PRMR-BBBBBBBB-BBBB-BBBB-BBBB-BBBBBBBBBBBB", "PRMR-CCCCCCCC-CCCC-CCCC-CCCC-CCCCCCCCCCCC"],
        "s1": ["PRMR-CCCCCCCC-CCCC-CCCC-CCCC-CCCCCCCCCCCC", "PRMR-BBBBBBBB-BBBB-BBBB-BBBB-BBBBBBBBBBBB"]
      }
    }
  }
}"#;

/// All three DB servers GOOD. Coordinators carry no status and must be ignored.
pub const HEALTH_ALL_GOOD: &str = r#"{
  "CRDN-976e3d6a-9148-4ece-99e9-326dc69834b2": {},
  "PRMR-AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAAA": { "Status": "GOOD" },
  "CRDN-94ea8912-ff22-43d0-a005-bfc87f22709b": {},
  "PRMR-BBBBBBBB-BBBB-BBBB-BBBB-BBBBBBBBBBBB": { "Status": "GOOD" },
  "PRMR-CCCCCCCC-CCCC-CCCC-CCCC-CCCCCCCCCCCC": { "Status": "GOOD" }
}"#;

/// Build a Health document giving each server the listed status.
pub fn health_json(statuses: &[(&str, &str)]) -> String {
    let doc: serde_json::Map<String, serde_json::Value> = statuses
        .iter()
        .map(|(server, status)| (server.to_string(), serde_json::json!({ "Status": status })))
        .collect();
    serde_json::Value::Object(doc).to_string()
}

/// A decoded Plan/Health pair.
pub struct Fixture {
    pub plan: PlanSnapshot,
    pub health: HealthSnapshot,
}

impl Fixture {
    /// Decode both documents; panics on malformed fixtures.
    pub fn from_json(plan: &str, health: &str) -> Self {
        Self {
            plan: PlanSnapshot::from_json(plan).unwrap(),
            health: HealthSnapshot::from_json(health).unwrap(),
        }
    }

    /// The golden two-collection fixture with all servers healthy.
    pub fn golden() -> Self {
        Self::from_json(GOLDEN_PLAN, HEALTH_ALL_GOOD)
    }

    /// Run the planner with the default policy.
    pub fn plan(&self) -> RepairResult {
        self.plan_with(RepairPolicy::default())
    }

    /// Run the planner with an explicit policy.
    pub fn plan_with(&self, policy: RepairPolicy) -> RepairResult {
        RepairPlanner::new(policy).plan(&self.plan, &self.health)
    }
}

/// Operations planned for `id`; panics if the collection failed.
pub fn ops<'a>(result: &'a RepairResult, id: &str) -> &'a [RepairOperation] {
    match &result[&CollectionId::from(id)] {
        Ok(ops) => ops,
        Err(e) => panic!("collection {id} failed to plan: {e}"),
    }
}

// =========================================================================
// Synthetic snapshots
// =========================================================================

/// Shape of a generated prototype/dependent pair.
#[derive(Debug, Clone, Copy)]
pub struct PairShape {
    pub shards: usize,
    pub replication_factor: usize,
    pub servers: usize,
    /// Probability that a dependent shard drifts from its prototype shard.
    pub drift: f64,
}

/// Generate `collections` dependents (and one prototype each) in one database.
///
/// Shard numbers grow with random gaps so that numeric and lexical order
/// disagree. All servers are healthy.
pub fn synthetic(seed: u64, collections: usize, shape: PairShape) -> Fixture {
    let mut rng = StdRng::seed_from_u64(seed);
    let pool: Vec<String> = (0..shape.servers).map(|i| format!("PRMR-{i:04}")).collect();
    let mut plan = PlanSnapshot::new();

    for c in 0..collections {
        let proto_id = format!("{}", 1_000 + c * 2);
        let dep_id = format!("{}", 1_001 + c * 2);
        let mut proto = Collection::new(
            proto_id.as_str(),
            format!("proto-{c}"),
            shape.replication_factor as u64,
        );
        let mut dep = Collection::new(
            dep_id.as_str(),
            format!("dep-{c}"),
            shape.replication_factor as u64,
        )
        .like(proto_id.as_str());

        let mut proto_n = rng.random_range(1..20u64);
        let mut dep_n = rng.random_range(1..20u64);
        for _ in 0..shape.shards {
            let target = pick(&mut rng, &pool, shape.replication_factor);
            let current = if rng.random_bool(shape.drift) {
                pick(&mut rng, &pool, shape.replication_factor)
            } else {
                target.clone()
            };
            proto = proto.with_shard(format!("s{proto_n}"), target);
            dep = dep.with_shard(format!("s{dep_n}"), current);
            proto_n += rng.random_range(1..40u64);
            dep_n += rng.random_range(1..40u64);
        }

        plan.insert("synthDb", proto);
        plan.insert("synthDb", dep);
    }

    Fixture {
        plan,
        health: HealthSnapshot::all_good(pool),
    }
}

fn pick(rng: &mut StdRng, pool: &[String], n: usize) -> Vec<String> {
    let mut servers = pool.to_vec();
    servers.shuffle(rng);
    servers.truncate(n);
    servers
}
