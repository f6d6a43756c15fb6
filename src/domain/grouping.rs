//! Department grouping of a node's children (read-side only).

use std::sync::Arc;

use crate::domain::entities::OrgNode;

/// How a department group is laid out by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Side by side
    Horizontal,
    /// Stacked
    Vertical,
}

/// Children sharing one department value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentGroup<'a> {
    pub department: &'a str,
    pub members: Vec<&'a OrgNode>,
    pub layout: Layout,
}

/// Children of one parent partitioned by their own department.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentGroups<'a> {
    /// Named groups in order of first appearance
    pub groups: Vec<DepartmentGroup<'a>>,
    /// Children without a department, in original order
    pub ungrouped: Vec<&'a OrgNode>,
}

/// Partition `parent`'s children by department.
///
/// A group is laid out horizontally when the parent has more than two
/// children, or when every member of the group has at most two children.
pub fn group_children(parent: &OrgNode) -> DepartmentGroups<'_> {
    group_nodes(&parent.children)
}

fn group_nodes(children: &[Arc<OrgNode>]) -> DepartmentGroups<'_> {
    let mut result = DepartmentGroups::default();
    for child in children {
        match child.department() {
            Some(dept) => match result.groups.iter_mut().find(|g| g.department == dept) {
                Some(group) => group.members.push(child),
                None => result.groups.push(DepartmentGroup {
                    department: dept,
                    members: vec![&**child],
                    layout: Layout::Vertical,
                }),
            },
            None => result.ungrouped.push(child),
        }
    }

    let crowded = children.len() > 2;
    for group in &mut result.groups {
        let small = group.members.iter().all(|m| m.children.len() <= 2);
        group.layout = if crowded || small {
            Layout::Horizontal
        } else {
            Layout::Vertical
        };
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_kids(id: &str, dept: Option<&str>, kids: usize) -> OrgNode {
        let mut node = OrgNode::new(id, id, "Staff");
        if let Some(d) = dept {
            node = node.with_department(d);
        }
        for i in 0..kids {
            node = node.with_child(OrgNode::new(format!("{id}-{i}"), "k", "Staff"));
        }
        node
    }

    #[test]
    fn given_mixed_children_when_grouping_then_partitions_by_own_department() {
        let parent = OrgNode::new("p", "P", "Lead")
            .with_child(with_kids("a", Some("Export"), 0))
            .with_child(with_kids("b", None, 0))
            .with_child(with_kids("c", Some("Import"), 0))
            .with_child(with_kids("d", Some("Export"), 0));

        let groups = group_children(&parent);

        assert_eq!(groups.groups.len(), 2);
        assert_eq!(groups.groups[0].department, "Export");
        let export: Vec<_> = groups.groups[0].members.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(export, vec!["a", "d"]);
        assert_eq!(groups.ungrouped.len(), 1);
        assert_eq!(groups.groups[0].layout, Layout::Horizontal);
    }

    #[test]
    fn given_two_children_with_large_teams_when_grouping_then_vertical() {
        let parent = OrgNode::new("p", "P", "Lead")
            .with_child(with_kids("a", Some("Export"), 3))
            .with_child(with_kids("b", Some("Export"), 1));

        let groups = group_children(&parent);

        assert_eq!(groups.groups[0].layout, Layout::Vertical);
    }

    #[test]
    fn given_two_children_with_small_teams_when_grouping_then_horizontal() {
        let parent = OrgNode::new("p", "P", "Lead")
            .with_child(with_kids("a", Some("Export"), 2))
            .with_child(with_kids("b", Some("Export"), 0));

        assert_eq!(group_children(&parent).groups[0].layout, Layout::Horizontal);
    }
}
