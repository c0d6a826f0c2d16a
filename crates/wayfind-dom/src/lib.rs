//! Wayfind DOM
//!
//! Node-tree capability used by the focus and attention subsystem.
//!
//! Features:
//! - `Dom` capability trait (object safe, `&mut dyn Dom`)
//! - Arena-backed in-memory document (`DomTree`)
//! - Viewport geometry (`DOMRect`, `Size`, `Viewport`)
//! - CSS selector subset for target lookup
//! - Virtual-clock scheduler for frame and timer callbacks
//! - Keyboard event model

mod node;
mod tree;
mod dom_trait;
pub mod geometry;
pub mod selector;
pub mod dom_events;
pub mod event_loop;
pub mod input;

pub use node::{Node, NodeData, ElementData};
pub use tree::{DomTree, MUTATION_LOG_LIMIT};
pub use dom_trait::Dom;
pub use geometry::{DOMRect, Point, Size, Viewport, ScrollBehavior};
pub use selector::Selector;
pub use dom_events::{MutationRecord, MutationKind};
pub use event_loop::Scheduler;
pub use input::{Key, KeyEvent};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node" links inside the arena
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// DOM error
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DomError {
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("No element matches `{0}`")]
    NodeNotFound(String),
}
