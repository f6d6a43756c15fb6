/*
Text rendering of org trees via termtree.

Each node renders as `Name, Position [Department] (n) #id` where `(n)` is the
number of direct and indirect subordinates, omitted for leaves.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::{count_descendants, OrgNode, OrgTree};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for OrgNode {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(node_label(self)).with_leaves(leaves)
    }
}

impl TreeNodeConvert for OrgTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        self.root().to_tree_string()
    }
}

/// One-line label of a node.
pub fn node_label(node: &OrgNode) -> String {
    let mut label = format!("{}, {}", node.name, node.position);
    if let Some(dept) = node.department() {
        label.push_str(&format!(" [{dept}]"));
    }
    let subordinates = count_descendants(node);
    if subordinates > 0 {
        label.push_str(&format!(" ({subordinates})"));
    }
    label.push_str(&format!(" #{}", node.id));
    label
}
