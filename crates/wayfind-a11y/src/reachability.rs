//! Reachability
//!
//! Which elements inside a container a keyboard or screen reader user
//! can actually land on. Recomputed on every call: containers swap tab
//! panels and grow validation messages between key presses.

use wayfind_dom::{Dom, NodeId};

/// Tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    NotFocusable,       // tabindex="-1" or invalid
    Sequential(i32),    // tabindex="0" or positive
}

impl TabIndex {
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Self::NotFocusable,
            Ok(n) => Self::Sequential(n),
            Err(_) => Self::NotFocusable,
        }
    }

    pub fn is_focusable(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }
}

/// Links with a destination, enabled buttons, form fields, and anything
/// opted into the tab sequence.
pub fn is_interactive(dom: &dyn Dom, node: NodeId) -> bool {
    let Some(tag) = dom.tag_name(node) else {
        return false;
    };
    let native = match tag {
        "a" => dom.attr(node, "href").is_some(),
        "button" => {
            dom.attr(node, "disabled").is_none()
                && dom.attr(node, "aria-disabled") != Some("true")
        }
        "input" | "select" | "textarea" => true,
        _ => false,
    };
    native || dom.attr(node, "tabindex").is_some_and(|v| TabIndex::parse(v).is_focusable())
}

/// True when `node` or an ancestor up to and including `container`
/// carries `aria-hidden="true"`.
pub fn is_hidden_within(dom: &dyn Dom, node: NodeId, container: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if dom.attr(n, "aria-hidden") == Some("true") {
            return true;
        }
        if n == container {
            break;
        }
        current = dom.parent(n);
    }
    false
}

fn is_rendered(dom: &dyn Dom, node: NodeId) -> bool {
    dom.rect(node).is_some_and(|r| !r.is_empty())
}

/// Visible, interactive descendants of `container` in document order
pub fn find_reachable(dom: &dyn Dom, container: NodeId) -> Vec<NodeId> {
    dom.descendants(container)
        .into_iter()
        .filter(|&n| is_interactive(dom, n))
        .filter(|&n| is_rendered(dom, n))
        .filter(|&n| !is_hidden_within(dom, n, container))
        .collect()
}

/// First reachable descendant, if any
pub fn first_reachable(dom: &dyn Dom, container: NodeId) -> Option<NodeId> {
    find_reachable(dom, container).into_iter().next()
}
