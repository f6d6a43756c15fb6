//! Node id generation.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::NodeId;

/// Supplies unique ids for new nodes. Uniqueness is assumed, not verified.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> NodeId;
}

/// `<unix-millis>-<9 random hex chars>`.
#[derive(Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> NodeId {
        NodeId::new(timestamped_id(""))
    }
}

/// Deterministic `<prefix><n>` ids, counting from 1.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> NodeId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        NodeId::new(format!("{}{}", self.prefix, n))
    }
}

/// Millisecond timestamp plus random suffix, optionally prefixed.
pub fn timestamped_id(prefix: &str) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{prefix}{}-{}", Utc::now().timestamp_millis(), &random[..9])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_uuid_generator_when_called_twice_then_ids_differ() {
        let ids = UuidGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn given_sequential_generator_when_called_then_counts_up() {
        let ids = SequentialIdGenerator::new("n");
        assert_eq!(ids.next_id().as_str(), "n1");
        assert_eq!(ids.next_id().as_str(), "n2");
    }

    #[test]
    fn given_prefix_when_building_timestamped_id_then_has_three_parts() {
        let id = timestamped_id("share-");
        assert!(id.starts_with("share-"));
        assert_eq!(id.split('-').count(), 3);
    }
}
