//! Read-side statistics over a tree.

use itertools::Itertools;

use crate::domain::region::{Region, RegionList};
use crate::domain::tree::OrgTree;

/// Number of nodes carrying one department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentStat {
    pub name: String,
    pub count: usize,
}

/// Count nodes per department, in preorder first-appearance order.
pub fn department_stats(tree: &OrgTree) -> Vec<DepartmentStat> {
    let departments: Vec<&str> = tree.iter().filter_map(|(_, n)| n.department()).collect();
    let counts = departments.iter().counts();
    departments
        .iter()
        .unique()
        .map(|name| DepartmentStat {
            name: name.to_string(),
            count: counts.get(name).copied().unwrap_or(0),
        })
        .collect()
}

/// One line of the region overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSummary {
    pub id: String,
    pub name: String,
    pub node_count: usize,
    pub has_employees: bool,
}

impl From<&Region> for RegionSummary {
    fn from(region: &Region) -> Self {
        Self {
            id: region.id.clone(),
            name: region.name.clone(),
            node_count: region.node_count(),
            has_employees: region.has_employees(),
        }
    }
}

/// Summaries in region list order.
pub fn region_summaries(regions: &RegionList) -> Vec<RegionSummary> {
    regions.iter().map(RegionSummary::from).collect()
}
