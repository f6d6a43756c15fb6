//! Regions: named, independently stored org charts.

use serde::{Deserialize, Serialize};

use crate::domain::entities::OrgNode;
use crate::domain::tree::OrgTree;

/// Id of the root node of a freshly created region.
pub const REGION_ROOT_ID: &str = "root";

/// Position given to the placeholder root of a new region.
pub const PLACEHOLDER_POSITION: &str = "Manager";

/// Name of the region seeded on first use.
pub const DEFAULT_REGION_NAME: &str = "ORD";

const INITIAL_CHART: &str = include_str!("../data/initial_chart.json");

/// A named org chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    pub name: String,
    pub org_data: OrgTree,
}

impl Region {
    /// New region whose chart is a single placeholder root named like the region.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        let root = OrgNode::new(REGION_ROOT_ID, name.clone(), PLACEHOLDER_POSITION);
        Self {
            id: id.into(),
            name,
            org_data: OrgTree::new(root),
        }
    }

    /// True unless the chart is still the untouched placeholder root.
    pub fn has_employees(&self) -> bool {
        let root = self.org_data.root();
        if !root.children.is_empty() {
            return true;
        }
        !(root.name == self.name && root.position == PLACEHOLDER_POSITION)
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.org_data.node_count()
    }
}

/// Bundled sample chart used for the default region.
pub fn initial_chart() -> Result<OrgTree, serde_json::Error> {
    serde_json::from_str(INITIAL_CHART)
}

/// Ordered list of regions with pure update operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionList(Vec<Region>);

impl RegionList {
    pub fn new(regions: Vec<Region>) -> Self {
        Self(regions)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, region_id: &str) -> Option<&Region> {
        self.0.iter().find(|r| r.id == region_id)
    }

    /// Look a region up by id, falling back to a case-insensitive name match.
    pub fn resolve(&self, key: &str) -> Option<&Region> {
        self.get(key)
            .or_else(|| self.0.iter().find(|r| r.name.eq_ignore_ascii_case(key)))
    }

    pub fn add(&self, region: Region) -> Self {
        let mut regions = self.0.clone();
        regions.push(region);
        Self(regions)
    }

    pub fn rename(&self, region_id: &str, name: &str) -> Self {
        self.map_region(region_id, |r| Region {
            name: name.to_string(),
            ..r.clone()
        })
    }

    pub fn update_org_data(&self, region_id: &str, org_data: OrgTree) -> Self {
        self.map_region(region_id, |r| Region {
            org_data: org_data.clone(),
            ..r.clone()
        })
    }

    pub fn remove(&self, region_id: &str) -> Self {
        Self(self.0.iter().filter(|r| r.id != region_id).cloned().collect())
    }

    fn map_region(&self, region_id: &str, f: impl Fn(&Region) -> Region) -> Self {
        Self(
            self.0
                .iter()
                .map(|r| if r.id == region_id { f(r) } else { r.clone() })
                .collect(),
        )
    }
}
