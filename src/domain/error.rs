//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::NodeId;

/// Domain errors represent rejected tree operations.
///
/// The engine itself is silent: `Engine::apply` returns the input tree when an
/// operation is illegal. These values explain *why*, for callers that run a
/// pre-flight check or use `try_apply`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("the root node cannot be moved or deleted")]
    RootImmutable,

    #[error("node has no parent: {0}")]
    NoParent(NodeId),

    #[error("{node} and {target} are not siblings")]
    NotSiblings { node: NodeId, target: NodeId },

    #[error("node and target are the same: {0}")]
    SameNode(NodeId),

    #[error("cannot move {node} into its own subtree ({target})")]
    DescendantTarget { node: NodeId, target: NodeId },

    #[error("department conflict: {moving} cannot be placed under {target}")]
    DepartmentConflict { moving: String, target: String },

    #[error("invalid node: {0}")]
    InvalidNode(String),
}
