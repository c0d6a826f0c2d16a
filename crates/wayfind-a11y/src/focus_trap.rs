//! Focus Traps
//!
//! Keyboard containment for dialogs and drawers. A trap only steps in at
//! the two ends of a container's reachable elements; every other Tab
//! press is left to native sequential navigation.

use wayfind_dom::{Dom, Key, KeyEvent, NodeId};

use crate::reachability::find_reachable;

/// Set of containers currently confining Tab
#[derive(Debug, Clone, Default)]
pub struct FocusTraps {
    containers: Vec<NodeId>,
}

impl FocusTraps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a trap on `container`, replacing any existing one
    pub fn activate(&mut self, container: NodeId) {
        self.deactivate(container);
        self.containers.push(container);
        tracing::debug!("Focus trap on {}", container);
    }

    /// Remove the trap on `container`, if any
    pub fn deactivate(&mut self, container: NodeId) {
        let before = self.containers.len();
        self.containers.retain(|&c| c != container);
        if self.containers.len() != before {
            tracing::debug!("Focus trap released on {}", container);
        }
    }

    pub fn is_active(&self, container: NodeId) -> bool {
        self.containers.contains(&container)
    }

    /// Containers with a trap, in activation order
    pub fn active(&self) -> &[NodeId] {
        &self.containers
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Handle a key press. Returns true when default movement was prevented.
    pub fn handle_key(&self, dom: &mut dyn Dom, event: &KeyEvent) -> bool {
        if !event.is(Key::Tab) {
            return false;
        }
        let Some(active) = dom.active_element() else {
            return false;
        };

        // Innermost trap containing focus handles the press
        for &container in self.containers.iter().rev() {
            if !dom.contains(container, active) {
                continue;
            }
            let reachable = find_reachable(dom, container);
            let (Some(&first), Some(&last)) = (reachable.first(), reachable.last()) else {
                return false;
            };
            if event.shift && active == first {
                dom.focus(last);
                return true;
            }
            if !event.shift && active == last {
                dom.focus(first);
                return true;
            }
            return false;
        }
        false
    }
}
