//! Compound tree operations (the mutation engine).
//!
//! Each operation validates every precondition against the input tree first
//! and only then commits a sequence of structural primitives. An illegal
//! operation never produces a partially edited tree.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::entities::{NodeId, NodePatch, OrgNode};
use crate::domain::error::DomainError;
use crate::domain::tree::{is_descendant, OrgTree};
use crate::domain::zoning::{check_zone, ZonePolicy};

/// Where a reordered node lands relative to its target sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

/// Drop side of a drag-relocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    /// Become a sibling of the target (child of the target's parent).
    Above,
    /// Become a subordinate of the target.
    Below,
}

impl FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(Placement::Before),
            "after" => Ok(Placement::After),
            other => Err(format!("expected before|after, got {other}")),
        }
    }
}

impl FromStr for DropPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "above" => Ok(DropPosition::Above),
            "below" => Ok(DropPosition::Below),
            other => Err(format!("expected above|below, got {other}")),
        }
    }
}

/// Operation descriptor handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Insert `node` as last child of `parent`.
    AddChild { parent: NodeId, node: OrgNode },
    /// Insert `node` as last child of `sibling`'s parent.
    AddSibling { sibling: NodeId, node: OrgNode },
    Edit { node: NodeId, patch: NodePatch },
    /// Remove the node and its whole subtree.
    Delete { node: NodeId },
    /// Node (with subtree) becomes a sibling of its former parent.
    MoveUp { node: NodeId },
    /// Node (with subtree) becomes the last child of one of its siblings.
    MoveToSiblingChild { node: NodeId, sibling: NodeId },
    /// Node (with subtree) is placed right after `target`, under target's parent.
    MoveBeside { node: NodeId, target: NodeId },
    /// Reposition among siblings, keeping the parent.
    Reorder {
        node: NodeId,
        target: NodeId,
        placement: Placement,
    },
    /// Drag-relocate: the node moves alone, its children are promoted to its
    /// original parent.
    Relocate {
        node: NodeId,
        target: NodeId,
        position: DropPosition,
    },
}

impl Operation {
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::AddChild { .. } => "add-child",
            Operation::AddSibling { .. } => "add-sibling",
            Operation::Edit { .. } => "edit",
            Operation::Delete { .. } => "delete",
            Operation::MoveUp { .. } => "move-up",
            Operation::MoveToSiblingChild { .. } => "move-to-sibling-child",
            Operation::MoveBeside { .. } => "move-beside",
            Operation::Reorder { .. } => "reorder",
            Operation::Relocate { .. } => "relocate",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::AddChild { parent, node } => write!(f, "add-child {} -> {parent}", node.id),
            Operation::AddSibling { sibling, node } => {
                write!(f, "add-sibling {} beside {sibling}", node.id)
            }
            Operation::Edit { node, .. } => write!(f, "edit {node}"),
            Operation::Delete { node } => write!(f, "delete {node}"),
            Operation::MoveUp { node } => write!(f, "move-up {node}"),
            Operation::MoveToSiblingChild { node, sibling } => {
                write!(f, "move-to-sibling-child {node} -> {sibling}")
            }
            Operation::MoveBeside { node, target } => write!(f, "move-beside {node} -> {target}"),
            Operation::Reorder {
                node,
                target,
                placement,
            } => write!(f, "reorder {node} {placement:?} {target}"),
            Operation::Relocate {
                node,
                target,
                position,
            } => write!(f, "relocate {node} {position:?} {target}"),
        }
    }
}

/// Validated edit, ready to be committed without further checks.
enum Plan {
    Insert {
        parent: NodeId,
        node: Arc<OrgNode>,
    },
    Update {
        node: NodeId,
        patch: NodePatch,
    },
    Remove {
        node: NodeId,
    },
    /// Move the subtree under `parent`, optionally repositioning the parent's
    /// children afterwards.
    Transplant {
        node: Arc<OrgNode>,
        parent: NodeId,
        order: Option<Vec<NodeId>>,
    },
    Reorder {
        parent: NodeId,
        order: Vec<NodeId>,
    },
    Promote {
        node: Arc<OrgNode>,
        from: NodeId,
        to: NodeId,
    },
}

/// The tree mutation engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engine {
    policy: ZonePolicy,
}

impl Engine {
    pub fn new(policy: ZonePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ZonePolicy {
        self.policy
    }

    /// Apply `op`, returning the input snapshot unchanged if it is illegal.
    pub fn apply(&self, tree: &OrgTree, op: Operation) -> OrgTree {
        let kind = op.kind();
        self.try_apply(tree, op).unwrap_or_else(|e| {
            debug!(kind, reason = %e, "operation rejected, tree unchanged");
            tree.clone()
        })
    }

    /// Apply `op` or explain why it was rejected.
    #[instrument(level = "debug", skip(self, tree, op), fields(kind = op.kind()))]
    pub fn try_apply(&self, tree: &OrgTree, op: Operation) -> Result<OrgTree, DomainError> {
        let plan = self.plan(tree, op)?;
        Ok(commit(tree, plan))
    }

    /// Pre-flight legality check; never edits anything.
    pub fn check(&self, tree: &OrgTree, op: &Operation) -> Result<(), DomainError> {
        self.plan(tree, op.clone()).map(|_| ())
    }

    fn plan(&self, tree: &OrgTree, op: Operation) -> Result<Plan, DomainError> {
        match op {
            Operation::AddChild { parent, node } => {
                find(tree, &parent)?;
                Ok(Plan::Insert {
                    parent,
                    node: Arc::new(node),
                })
            }
            Operation::AddSibling { sibling, node } => {
                find(tree, &sibling)?;
                let parent = parent_of(tree, &sibling)?;
                Ok(Plan::Insert {
                    parent: parent.id.clone(),
                    node: Arc::new(node),
                })
            }
            Operation::Edit { node, patch } => {
                find(tree, &node)?;
                patch.validate()?;
                Ok(Plan::Update { node, patch })
            }
            Operation::Delete { node } => {
                movable(tree, &node)?;
                Ok(Plan::Remove { node })
            }
            Operation::MoveUp { node } => {
                let moving = movable(tree, &node)?;
                let parent = parent_of(tree, &node)?;
                let grandparent = parent_of(tree, &parent.id)?;
                check_zone(tree, moving, grandparent, self.policy)?;
                Ok(Plan::Transplant {
                    node: handle(tree, &moving.id)?,
                    parent: grandparent.id.clone(),
                    order: None,
                })
            }
            Operation::MoveToSiblingChild { node, sibling } => {
                let moving = movable(tree, &node)?;
                let target = siblings(tree, &node, &sibling)?;
                check_zone(tree, moving, target, self.policy)?;
                Ok(Plan::Transplant {
                    node: handle(tree, &moving.id)?,
                    parent: target.id.clone(),
                    order: None,
                })
            }
            Operation::MoveBeside { node, target } => {
                let moving = movable(tree, &node)?;
                let anchor = find(tree, &target)?;
                not_into_own_subtree(moving, &target)?;
                let parent = parent_of(tree, &target)?;
                check_zone(tree, moving, parent, self.policy)?;

                let mut order: Vec<NodeId> = parent
                    .children
                    .iter()
                    .map(|c| c.id.clone())
                    .filter(|id| *id != node)
                    .collect();
                let at = position_of(&order, &anchor.id) + 1;
                order.insert(at, node.clone());
                Ok(Plan::Transplant {
                    node: handle(tree, &moving.id)?,
                    parent: parent.id.clone(),
                    order: Some(order),
                })
            }
            Operation::Reorder {
                node,
                target,
                placement,
            } => {
                movable(tree, &node)?;
                let parent = parent_of(tree, &node)?;
                siblings(tree, &node, &target)?;

                let mut order: Vec<NodeId> = parent
                    .children
                    .iter()
                    .map(|c| c.id.clone())
                    .filter(|id| *id != node)
                    .collect();
                let idx = position_of(&order, &target);
                let at = match placement {
                    Placement::Before => idx,
                    Placement::After => idx + 1,
                };
                order.insert(at, node);
                Ok(Plan::Reorder {
                    parent: parent.id.clone(),
                    order,
                })
            }
            Operation::Relocate {
                node,
                target,
                position,
            } => {
                let moving = movable(tree, &node)?;
                let parent = parent_of(tree, &node)?;
                find(tree, &target)?;
                // checked against the original subtree, before any promotion
                not_into_own_subtree(moving, &target)?;
                let zone_target = match position {
                    DropPosition::Above => parent_of(tree, &target)?,
                    DropPosition::Below => find(tree, &target)?,
                };
                check_zone(tree, moving, zone_target, self.policy)?;
                Ok(Plan::Promote {
                    node: handle(tree, &moving.id)?,
                    from: parent.id.clone(),
                    to: zone_target.id.clone(),
                })
            }
        }
    }
}

/// Apply `op` with the default engine (direct zoning).
pub fn apply(tree: &OrgTree, op: Operation) -> OrgTree {
    Engine::default().apply(tree, op)
}

fn commit(tree: &OrgTree, plan: Plan) -> OrgTree {
    match plan {
        Plan::Insert { parent, node } => tree.insert_child(&parent, node),
        Plan::Update { node, patch } => tree.update_fields(&node, &patch),
        Plan::Remove { node } => tree.remove_subtree(&node),
        Plan::Transplant {
            node,
            parent,
            order,
        } => {
            let id = node.id.clone();
            let moved = tree.remove_subtree(&id).insert_child(&parent, node);
            match order {
                Some(order) => moved.reorder_children_at(&parent, &order),
                None => moved,
            }
        }
        Plan::Reorder { parent, order } => tree.reorder_children_at(&parent, &order),
        Plan::Promote { node, from, to } => {
            let mut next = tree.remove_subtree(&node.id);
            for child in &node.children {
                next = next.insert_child(&from, Arc::clone(child));
            }
            next.insert_child(&to, Arc::new(node.with_children(Vec::new())))
        }
    }
}

fn find<'a>(tree: &'a OrgTree, id: &NodeId) -> Result<&'a OrgNode, DomainError> {
    tree.find_by_id(id)
        .ok_or_else(|| DomainError::NodeNotFound(id.clone()))
}

/// The node must exist and must not be the root.
fn movable<'a>(tree: &'a OrgTree, id: &NodeId) -> Result<&'a OrgNode, DomainError> {
    let node = find(tree, id)?;
    if tree.is_root(id) {
        return Err(DomainError::RootImmutable);
    }
    Ok(node)
}

fn parent_of<'a>(tree: &'a OrgTree, id: &NodeId) -> Result<&'a OrgNode, DomainError> {
    tree.find_parent(id)
        .ok_or_else(|| DomainError::NoParent(id.clone()))
}

/// Resolve `other` as a sibling of `node` (same parent, different node).
fn siblings<'a>(tree: &'a OrgTree, node: &NodeId, other: &NodeId) -> Result<&'a OrgNode, DomainError> {
    let target = find(tree, other)?;
    if node == other {
        return Err(DomainError::SameNode(node.clone()));
    }
    let parent = parent_of(tree, node)?;
    if !parent.children.iter().any(|c| c.id == *other) {
        return Err(DomainError::NotSiblings {
            node: node.clone(),
            target: other.clone(),
        });
    }
    Ok(target)
}

fn not_into_own_subtree(moving: &OrgNode, target: &NodeId) -> Result<(), DomainError> {
    if is_descendant(moving, target) {
        return Err(DomainError::DescendantTarget {
            node: moving.id.clone(),
            target: target.clone(),
        });
    }
    Ok(())
}

fn position_of(order: &[NodeId], id: &NodeId) -> usize {
    order.iter().position(|x| x == id).unwrap_or(order.len())
}

/// The `Arc` owning a non-root node, so a moved subtree stays shared.
fn handle(tree: &OrgTree, id: &NodeId) -> Result<Arc<OrgNode>, DomainError> {
    parent_of(tree, id)?
        .children
        .iter()
        .find(|c| c.id == *id)
        .cloned()
        .ok_or_else(|| DomainError::NodeNotFound(id.clone()))
}
