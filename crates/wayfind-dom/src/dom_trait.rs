//! Dom capability trait
//!
//! Everything the focus and attention subsystem needs from a document.
//! The trait is object safe so components take `&mut dyn Dom`; `DomTree`
//! is the in-memory implementation, a browser binding would be another.

use crate::geometry::{DOMRect, ScrollBehavior, Size, Viewport};
use crate::selector::Selector;
use crate::NodeId;

pub trait Dom {
    /// Document node
    fn root(&self) -> NodeId;

    /// Parent node, `None` for the document or detached nodes
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Child nodes in order
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Lower-case tag name, `None` for non-elements
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    fn attr(&self, node: NodeId, name: &str) -> Option<&str>;
    fn set_attr(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_attr(&mut self, node: NodeId, name: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);

    fn style(&self, node: NodeId, property: &str) -> Option<&str>;
    /// Set an inline style property; an empty value clears it
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    /// Concatenated text of all descendant text nodes
    fn text(&self, node: NodeId) -> String;
    /// Replace all children with a single text node
    fn set_text(&mut self, node: NodeId, text: &str);

    fn create_element(&mut self, tag: &str) -> NodeId;
    fn append_child(&mut self, parent: NodeId, child: NodeId);
    fn clear_children(&mut self, node: NodeId);

    /// Client rect in viewport coordinates, `None` when not rendered
    fn rect(&self, node: NodeId) -> Option<DOMRect>;

    /// Unconstrained size of the element's content (measurement pass)
    fn natural_size(&mut self, node: NodeId) -> Option<Size>;

    /// Position the element at a fixed viewport rect
    fn place(&mut self, node: NodeId, rect: DOMRect);

    fn viewport(&self) -> Viewport;
    fn scroll_into_view(&mut self, node: NodeId, behavior: ScrollBehavior);

    fn active_element(&self) -> Option<NodeId>;
    /// Move focus; returns false when the element cannot take focus
    fn focus(&mut self, node: NodeId) -> bool;

    /// Inclusive containment, like `Node.contains`
    fn contains(&self, container: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == container {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Descendants in document order, excluding `node`
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| selector.matches(self, n))
            .collect()
    }

    fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&n| selector.matches(self, n))
    }

    /// Nearest inclusive ancestor matching `selector`
    fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if selector.matches(self, n) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&n| self.attr(n, "id") == Some(id))
    }

    /// Resolve a selector string against the whole document.
    /// Unparsable selectors resolve to nothing.
    fn select(&self, selector: &str) -> Option<NodeId> {
        match Selector::parse(selector) {
            Ok(sel) => self.query_selector(self.root(), &sel),
            Err(err) => {
                tracing::debug!("Ignoring selector: {}", err);
                None
            }
        }
    }
}
