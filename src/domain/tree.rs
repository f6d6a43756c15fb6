//! Immutable org tree: traversal and structural edit primitives.
//!
//! Every edit returns a new [`OrgTree`]. Only the nodes on the path from the
//! root to the edit site are reallocated; all other subtrees are shared with
//! the input snapshot. An edit that cannot be applied returns a clone of the
//! input, which is pointer-equal to it (see [`OrgTree::ptr_eq`]).

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use crate::domain::entities::{NodeId, NodePatch, OrgNode};

/// A rooted org tree snapshot. Cloning is O(1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgTree {
    root: Arc<OrgNode>,
}

impl From<OrgNode> for OrgTree {
    fn from(root: OrgNode) -> Self {
        Self::new(root)
    }
}

impl OrgTree {
    pub fn new(root: OrgNode) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> &OrgNode {
        &self.root
    }

    pub fn is_root(&self, id: &NodeId) -> bool {
        self.root.id == *id
    }

    /// True when both values are the very same snapshot (no edit happened).
    pub fn ptr_eq(a: &OrgTree, b: &OrgTree) -> bool {
        Arc::ptr_eq(&a.root, &b.root)
    }

    // ---------------------------------------------------------------
    // Traversal
    // ---------------------------------------------------------------

    /// Depth-first preorder search.
    #[instrument(level = "trace", skip(self))]
    pub fn find_by_id(&self, id: &NodeId) -> Option<&OrgNode> {
        self.iter().map(|(_, node)| node).find(|node| node.id == *id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Direct parent of `id`; `None` for the root or an unknown id.
    #[instrument(level = "trace", skip(self))]
    pub fn find_parent(&self, id: &NodeId) -> Option<&OrgNode> {
        self.iter()
            .map(|(_, node)| node)
            .find(|node| node.children.iter().any(|child| child.id == *id))
    }

    /// Chain of nodes from the root down to `id`, both inclusive.
    pub fn path_to(&self, id: &NodeId) -> Option<Vec<&OrgNode>> {
        let mut path = Vec::new();
        for (depth, node) in self.iter() {
            path.truncate(depth);
            path.push(node);
            if node.id == *id {
                return Some(path);
            }
        }
        None
    }

    /// Preorder iterator yielding `(depth, node)`, root at depth 0.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(&self.root)
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        1 + count_descendants(&self.root)
    }

    /// Number of levels; a lone root has depth 1.
    pub fn depth(&self) -> usize {
        self.iter().map(|(depth, _)| depth + 1).max().unwrap_or(1)
    }

    // ---------------------------------------------------------------
    // Structural edits
    // ---------------------------------------------------------------

    /// Excise `id` and its whole subtree. The root is never removed.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&self, id: &NodeId) -> OrgTree {
        if self.is_root(id) {
            return self.clone();
        }
        let Some(parent) = self.find_parent(id) else {
            return self.clone();
        };
        let parent_id = parent.id.clone();
        self.rewrite(&parent_id, |parent| {
            let children = parent
                .children
                .iter()
                .filter(|child| child.id != *id)
                .cloned()
                .collect();
            Some(parent.with_children(children))
        })
    }

    /// Append `node` as the last child of `parent_id`.
    #[instrument(level = "debug", skip(self, node))]
    pub fn insert_child(&self, parent_id: &NodeId, node: impl Into<Arc<OrgNode>>) -> OrgTree {
        let node = node.into();
        trace!(child = %node.id, "insert_child");
        self.rewrite(parent_id, |parent| {
            let mut children = parent.children.clone();
            children.push(Arc::clone(&node));
            Some(parent.with_children(children))
        })
    }

    /// Replace scalar fields of `id`. Editing the root is allowed.
    #[instrument(level = "debug", skip(self))]
    pub fn update_fields(&self, id: &NodeId, patch: &NodePatch) -> OrgTree {
        self.rewrite(id, |node| Some(node.patched(patch)))
    }

    /// Permute the children of `parent_id` into `ordered_ids` order.
    ///
    /// The ids must name every current child exactly once, otherwise the
    /// input is returned.
    #[instrument(level = "debug", skip(self))]
    pub fn reorder_children_at(&self, parent_id: &NodeId, ordered_ids: &[NodeId]) -> OrgTree {
        self.rewrite(parent_id, |parent| {
            if !same_id_set(&parent.children, ordered_ids) {
                return None;
            }
            let children = ordered_ids
                .iter()
                .filter_map(|id| parent.children.iter().find(|c| c.id == *id).cloned())
                .collect();
            Some(parent.with_children(children))
        })
    }

    /// Copy-on-path rewrite of the node `id`.
    ///
    /// `edit` returns `None` to leave the tree untouched.
    fn rewrite<F>(&self, id: &NodeId, edit: F) -> OrgTree
    where
        F: FnOnce(&OrgNode) -> Option<OrgNode>,
    {
        let Some(route) = self.route_to(id) else {
            return self.clone();
        };
        let mut spine: Vec<&Arc<OrgNode>> = Vec::with_capacity(route.len() + 1);
        spine.push(&self.root);
        for &idx in &route {
            let parent: &Arc<OrgNode> = spine[spine.len() - 1];
            spine.push(&parent.children[idx]);
        }
        let Some(target) = spine.pop() else {
            return self.clone();
        };
        let Some(replacement) = edit(target.as_ref()) else {
            return self.clone();
        };

        // siblings are shared, only the spine is copied
        let mut current = Arc::new(replacement);
        for (parent, &idx) in spine.iter().rev().zip(route.iter().rev()) {
            let mut children = parent.children.clone();
            children[idx] = current;
            current = Arc::new(parent.with_children(children));
        }
        OrgTree { root: current }
    }

    /// Child indices leading from the root to the first preorder match of `id`.
    fn route_to(&self, id: &NodeId) -> Option<Vec<usize>> {
        // (node, entry of its parent in `visited`, index among the parent's children)
        let mut visited: Vec<(&OrgNode, Option<usize>, usize)> = Vec::new();
        let mut stack = vec![(self.root.as_ref(), None, 0)];
        while let Some(entry) = stack.pop() {
            let at = visited.len();
            visited.push(entry);
            let node = entry.0;
            if node.id == *id {
                let mut route = Vec::new();
                let mut cursor = at;
                while let (_, Some(parent), idx) = visited[cursor] {
                    route.push(idx);
                    cursor = parent;
                }
                route.reverse();
                return Some(route);
            }
            for (idx, child) in node.children.iter().enumerate().rev() {
                stack.push((child.as_ref(), Some(at), idx));
            }
        }
        None
    }
}

fn same_id_set(children: &[Arc<OrgNode>], ordered_ids: &[NodeId]) -> bool {
    if children.len() != ordered_ids.len() {
        return false;
    }
    let mut seen = HashSet::with_capacity(ordered_ids.len());
    ordered_ids
        .iter()
        .all(|id| seen.insert(id) && children.iter().any(|c| c.id == *id))
}

/// True iff `target` is `ancestor` itself or lies anywhere below it.
pub fn is_descendant(ancestor: &OrgNode, target: &NodeId) -> bool {
    TreeIterator::new(ancestor).any(|(_, node)| node.id == *target)
}

/// Direct and indirect subordinates of `node`, excluding the node itself.
pub fn count_descendants(node: &OrgNode) -> usize {
    TreeIterator::new(node).count() - 1
}

/// Preorder traversal, children left to right.
pub struct TreeIterator<'a> {
    stack: Vec<(usize, &'a OrgNode)>,
}

impl<'a> TreeIterator<'a> {
    fn new(root: &'a OrgNode) -> Self {
        Self {
            stack: vec![(0, root)],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (usize, &'a OrgNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, &**child));
        }
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrgTree {
        OrgTree::new(
            OrgNode::new("r", "Root", "Manager")
                .with_child(OrgNode::new("a", "A", "Lead").with_child(OrgNode::new("a1", "A1", "Clerk")))
                .with_child(OrgNode::new("b", "B", "Lead")),
        )
    }

    fn ids(node: &OrgNode) -> Vec<&str> {
        node.children.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn given_tree_when_iterating_then_yields_preorder_with_depth() {
        let tree = sample();
        let order: Vec<_> = tree.iter().map(|(d, n)| (d, n.id.as_str())).collect();
        assert_eq!(order, vec![(0, "r"), (1, "a"), (2, "a1"), (1, "b")]);
    }

    #[test]
    fn given_nested_node_when_finding_parent_then_returns_direct_parent() {
        let tree = sample();
        assert_eq!(tree.find_parent(&"a1".into()).map(|n| n.id.as_str()), Some("a"));
        assert!(tree.find_parent(&"r".into()).is_none());
        assert!(tree.find_parent(&"zz".into()).is_none());
    }

    #[test]
    fn given_edit_when_applied_then_untouched_subtrees_are_shared() {
        let tree = sample();
        let edited = tree.update_fields(&"a1".into(), &NodePatch::default().name("Changed"));

        assert!(!OrgTree::ptr_eq(&tree, &edited));
        assert!(Arc::ptr_eq(&tree.root().children[1], &edited.root().children[1]));
        assert_eq!(tree.find_by_id(&"a1".into()).unwrap().name, "A1");
        assert_eq!(edited.find_by_id(&"a1".into()).unwrap().name, "Changed");
    }

    #[test]
    fn given_root_id_when_removing_then_tree_is_unchanged() {
        let tree = sample();
        assert!(OrgTree::ptr_eq(&tree, &tree.remove_subtree(&"r".into())));
    }

    #[test]
    fn given_unknown_parent_when_inserting_then_tree_is_unchanged() {
        let tree = sample();
        let result = tree.insert_child(&"nope".into(), OrgNode::new("n", "N", "P"));
        assert!(OrgTree::ptr_eq(&tree, &result));
    }

    #[test]
    fn given_permutation_when_reordering_then_children_follow_it() {
        let tree = sample();
        let result = tree.reorder_children_at(&"r".into(), &["b".into(), "a".into()]);
        assert_eq!(ids(result.root()), vec!["b", "a"]);
    }

    #[test]
    fn given_duplicate_ids_when_reordering_then_tree_is_unchanged() {
        let tree = sample();
        let result = tree.reorder_children_at(&"r".into(), &["a".into(), "a".into()]);
        assert!(OrgTree::ptr_eq(&tree, &result));
    }

    #[test]
    fn given_tree_when_counting_then_counts_are_exact() {
        let tree = sample();
        assert_eq!(count_descendants(tree.root()), 3);
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.depth(), 3);
        assert!(is_descendant(tree.root(), &"a1".into()));
    }

    #[test]
    fn given_node_when_building_path_then_runs_from_root() {
        let tree = sample();
        let path: Vec<_> = tree
            .path_to(&"a1".into())
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(path, vec!["r", "a", "a1"]);
    }

    #[test]
    fn given_sibling_branches_when_building_path_then_skips_finished_branch() {
        let tree = sample();
        let path: Vec<_> = tree
            .path_to(&"b".into())
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(path, vec!["r", "b"]);
    }

    #[test]
    fn given_long_chain_when_walking_and_editing_then_no_recursion_needed() {
        // Arrange: r -> c1 -> c2 -> ... -> c2000
        const LEN: usize = 2000;
        let mut node = OrgNode::new(format!("c{LEN}"), "Last", "Clerk");
        for i in (1..LEN).rev() {
            node = OrgNode::new(format!("c{i}"), "Link", "Lead").with_child(node);
        }
        let tree = OrgTree::new(OrgNode::new("r", "Root", "Manager").with_child(node));
        let last: NodeId = format!("c{LEN}").as_str().into();

        // Act
        let edited = tree.update_fields(&last, &NodePatch::default().name("Renamed"));

        // Assert
        assert_eq!(tree.depth(), LEN + 1);
        assert_eq!(tree.node_count(), LEN + 1);
        assert_eq!(tree.find_parent(&last).unwrap().id.as_str(), "c1999");
        assert_eq!(tree.path_to(&last).unwrap().len(), LEN + 1);
        assert!(is_descendant(tree.root(), &last));
        assert_eq!(count_descendants(tree.root()), LEN);
        assert_eq!(edited.find_by_id(&last).unwrap().name, "Renamed");
        assert_eq!(tree.find_by_id(&last).unwrap().name, "Last");
    }
}
