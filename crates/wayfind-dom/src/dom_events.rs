//! DOM mutation records
//!
//! Attribute and text changes observed on the in-memory document.

use crate::NodeId;

/// Kind of mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// Attribute set or removed (`new_value == None` means removed)
    Attribute {
        name: String,
        old_value: Option<String>,
        new_value: Option<String>,
    },
    /// Text content assigned
    Text {
        old_value: String,
        new_value: String,
    },
}

/// A single recorded mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub kind: MutationKind,
}

impl MutationRecord {
    /// Create attribute modified record
    pub fn attr_modified(target: NodeId, name: &str, old_value: Option<String>, new_value: Option<&str>) -> Self {
        Self {
            target,
            kind: MutationKind::Attribute {
                name: name.to_string(),
                old_value,
                new_value: new_value.map(|s| s.to_string()),
            },
        }
    }

    /// Create text assignment record
    pub fn text_assigned(target: NodeId, old_value: String, new_value: &str) -> Self {
        Self {
            target,
            kind: MutationKind::Text {
                old_value,
                new_value: new_value.to_string(),
            },
        }
    }

    /// New text if this is a text assignment
    pub fn assigned_text(&self) -> Option<&str> {
        match &self.kind {
            MutationKind::Text { new_value, .. } => Some(new_value),
            MutationKind::Attribute { .. } => None,
        }
    }
}
