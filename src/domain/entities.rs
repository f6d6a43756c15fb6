//! Domain entities: core data structures

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Stable identifier of a node, unique within its tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A person/position entry in the org chart.
///
/// Children are reference-counted: an edit copies only the nodes on the path
/// from the root to the edit site and shares every other subtree with the
/// previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgNode {
    pub id: NodeId,
    pub name: String,
    /// Job title
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Ordered subordinates; order drives layout grouping and reorder operations
    #[serde(default)]
    pub children: Vec<Arc<OrgNode>>,
}

impl OrgNode {
    /// Create a leaf node without department or notes.
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: position.into(),
            department: None,
            notes: None,
            children: Vec::new(),
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = non_blank(Some(department.into()));
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_blank(Some(notes.into()));
        self
    }

    pub fn with_child(mut self, child: OrgNode) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Department label, only when set to something other than whitespace.
    pub fn department(&self) -> Option<&str> {
        self.department
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Copy of the scalar fields with a different children sequence.
    pub(crate) fn with_children(&self, children: Vec<Arc<OrgNode>>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            position: self.position.clone(),
            department: self.department.clone(),
            notes: self.notes.clone(),
            children,
        }
    }

    /// Apply a field patch; children are left untouched.
    pub(crate) fn patched(&self, patch: &NodePatch) -> Self {
        let mut node = self.with_children(self.children.clone());
        if let Some(name) = &patch.name {
            node.name = name.trim().to_string();
        }
        if let Some(position) = &patch.position {
            node.position = position.trim().to_string();
        }
        if let Some(department) = &patch.department {
            node.department = non_blank(department.clone());
        }
        if let Some(notes) = &patch.notes {
            node.notes = non_blank(notes.clone());
        }
        node
    }
}

/// Partial update of a node's scalar fields.
///
/// `None` leaves a field as is. For the optional fields `Some(None)` (or a
/// blank string) clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub name: Option<String>,
    pub position: Option<String>,
    pub department: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl NodePatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn department(mut self, department: Option<String>) -> Self {
        self.department = Some(department);
        self
    }

    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    /// Name and position may change but never become blank.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DomainError::InvalidNode("name must not be empty".into()));
        }
        if self.position.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(DomainError::InvalidNode("position must not be empty".into()));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.position.is_none()
            && self.department.is_none()
            && self.notes.is_none()
    }
}

/// User-entered data for a node that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDraft {
    pub name: String,
    pub position: String,
    pub department: Option<String>,
    pub notes: Option<String>,
}

impl NodeDraft {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
            ..Self::default()
        }
    }

    /// Turn the draft into a leaf node, rejecting blank required fields.
    pub fn into_node(self, id: NodeId) -> Result<OrgNode, DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidNode("name must not be empty".into()));
        }
        if self.position.trim().is_empty() {
            return Err(DomainError::InvalidNode("position must not be empty".into()));
        }
        Ok(OrgNode {
            id,
            name: self.name.trim().to_string(),
            position: self.position.trim().to_string(),
            department: non_blank(self.department),
            notes: non_blank(self.notes),
            children: Vec::new(),
        })
    }
}

/// Empty form fields mean "absent".
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_blank_department_when_building_node_then_department_is_absent() {
        let node = OrgNode::new("a", "Amy", "Clerk").with_department("   ");
        assert_eq!(node.department, None);
        assert_eq!(node.department(), None);
    }

    #[test]
    fn given_padded_department_when_reading_then_returns_trimmed_label() {
        let node = OrgNode::new("a", "Amy", "Clerk").with_department(" Export ");
        assert_eq!(node.department(), Some("Export"));
    }

    #[test]
    fn given_patch_when_applied_then_children_are_kept() {
        let node = OrgNode::new("a", "Amy", "Clerk").with_child(OrgNode::new("b", "Bo", "Agent"));
        let patched = node.patched(&NodePatch::default().name("Amelia").notes(Some(String::new())));

        assert_eq!(patched.name, "Amelia");
        assert_eq!(patched.position, "Clerk");
        assert_eq!(patched.notes, None);
        assert!(Arc::ptr_eq(&patched.children[0], &node.children[0]));
    }

    #[test]
    fn given_draft_without_name_when_converting_then_rejects() {
        let draft = NodeDraft::new(" ", "Clerk");
        assert!(matches!(
            draft.into_node(NodeId::from("x")),
            Err(DomainError::InvalidNode(_))
        ));
    }

    #[test]
    fn given_leaf_json_without_children_when_deserializing_then_children_empty() {
        let node: OrgNode =
            serde_json::from_str(r#"{"id":"a","name":"Amy","position":"Clerk"}"#).unwrap();
        assert!(node.is_leaf());
        assert_eq!(node.department, None);
    }
}
