//! Department zoning: which relocations are allowed across departments.
//!
//! A node carrying a department may only be placed under a zone target that
//! either has no department or the same one. Nodes without a department move
//! freely.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entities::OrgNode;
use crate::domain::error::DomainError;
use crate::domain::tree::OrgTree;

/// How the department of a zone target is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZonePolicy {
    /// Only the target's own department counts.
    #[default]
    Direct,
    /// The nearest department on the path from the target up to the root.
    Inherited,
}

impl fmt::Display for ZonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZonePolicy::Direct => f.write_str("direct"),
            ZonePolicy::Inherited => f.write_str("inherited"),
        }
    }
}

impl FromStr for ZonePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(ZonePolicy::Direct),
            "inherited" => Ok(ZonePolicy::Inherited),
            other => Err(format!("unknown zone policy: {other}")),
        }
    }
}

/// Department of a node, if set to something non-blank.
pub fn department_of(node: &OrgNode) -> Option<&str> {
    node.department()
}

/// Department that constrains nodes placed under `target`.
pub fn zone_of<'a>(tree: &'a OrgTree, target: &'a OrgNode, policy: ZonePolicy) -> Option<&'a str> {
    match policy {
        ZonePolicy::Direct => department_of(target),
        ZonePolicy::Inherited => tree
            .path_to(&target.id)
            .and_then(|path| path.into_iter().rev().find_map(department_of)),
    }
}

/// Refuse placing `moving` under `zone_target` when their departments differ.
pub fn check_zone(
    tree: &OrgTree,
    moving: &OrgNode,
    zone_target: &OrgNode,
    policy: ZonePolicy,
) -> Result<(), DomainError> {
    let Some(moving_dept) = department_of(moving) else {
        return Ok(());
    };
    match zone_of(tree, zone_target, policy) {
        Some(target_dept) if target_dept != moving_dept => {
            debug!(
                node = %moving.id,
                target = %zone_target.id,
                moving_dept,
                target_dept,
                "department zoning refused relocation"
            );
            Err(DomainError::DepartmentConflict {
                moving: moving_dept.to_string(),
                target: target_dept.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Human-readable explanation of a zoning conflict, `None` when the move is allowed.
pub fn conflict_message(
    tree: &OrgTree,
    moving: &OrgNode,
    zone_target: &OrgNode,
    policy: ZonePolicy,
) -> Option<String> {
    match check_zone(tree, moving, zone_target, policy) {
        Err(DomainError::DepartmentConflict { moving: from, target: to }) => Some(format!(
            "{} belongs to {from} and cannot be moved under {} ({to})",
            moving.name, zone_target.name
        )),
        _ => None,
    }
}
