//! Domain layer: the org tree and its mutation engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod grouping;
pub mod id;
pub mod operation;
pub mod region;
pub mod stats;
pub mod tree;
pub mod zoning;

pub use entities::{NodeDraft, NodeId, NodePatch, OrgNode};
pub use error::DomainError;
pub use grouping::{group_children, DepartmentGroup, DepartmentGroups, Layout};
pub use id::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use operation::{apply, DropPosition, Engine, Operation, Placement};
pub use region::{Region, RegionList};
pub use stats::{department_stats, region_summaries, DepartmentStat, RegionSummary};
pub use tree::{count_descendants, is_descendant, OrgTree};
pub use zoning::{check_zone, conflict_message, department_of, ZonePolicy};
