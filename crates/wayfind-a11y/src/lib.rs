//! Wayfind Accessibility
//!
//! Focus and attention primitives for dashboard pages.
//!
//! Features:
//! - Live-region announcer (clear, then write on the next frame)
//! - Reachability scanning (visible, interactive, not aria-hidden)
//! - Focus traps for dialogs and drawers
//! - F6 landmark cycling
//! - Tab lists with arrow-key switching

pub mod announcer;
pub mod reachability;
pub mod focus_trap;
pub mod landmarks;
pub mod tabs;

pub use announcer::Announcer;
pub use reachability::{find_reachable, first_reachable, is_interactive, TabIndex};
pub use focus_trap::FocusTraps;
pub use landmarks::{Direction, Landmark, LandmarkCycler, LandmarkSpec, SkipPredicate};
pub use tabs::{TabList, TabListConfig};

use wayfind_dom::{Dom, DomError, NodeId};

/// Deferred work issued by the accessibility components
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum A11yTask {
    /// Second half of an announcement
    WriteLiveRegion { region: NodeId, text: String },
    /// Focus an element once it has been painted
    Focus(NodeId),
    /// Drop a transient indicator class
    RemoveClass { node: NodeId, class: String },
}

/// Execute a task scheduled by this crate
pub fn run_task(dom: &mut dyn Dom, task: A11yTask) {
    match task {
        A11yTask::WriteLiveRegion { region, text } => dom.set_text(region, &text),
        A11yTask::Focus(node) => {
            if !dom.focus(node) {
                tracing::debug!("Deferred focus on {} refused", node);
            }
        }
        A11yTask::RemoveClass { node, class } => dom.remove_class(node, &class),
    }
}

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}
