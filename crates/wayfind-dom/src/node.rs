//! DOM Node
//!
//! Nodes link to each other through `NodeId`s into the tree arena
//! instead of pointers.

use crate::geometry::{DOMRect, Size};
use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::with_data(NodeData::Text(content))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
}

/// Element-specific data
#[derive(Debug, Default)]
pub struct ElementData {
    /// Lower-case tag name
    pub tag: String,
    /// Attributes in insertion order; `class` lives here too
    pub attrs: Vec<(String, String)>,
    /// Inline style properties
    pub style: Vec<(String, String)>,
    /// Layout box in document coordinates (None = not rendered)
    pub layout: Option<DOMRect>,
    /// Layout box is viewport-fixed (written by `Dom::place`)
    pub fixed: bool,
    /// Size the element takes when laid out unconstrained
    pub intrinsic: Option<Size>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, returning the previous value
    pub fn set_attr(&mut self, name: &str, value: &str) -> Option<String> {
        for (n, v) in self.attrs.iter_mut() {
            if n == name {
                return Some(std::mem::replace(v, value.to_string()));
            }
        }
        self.attrs.push((name.to_string(), value.to_string()));
        None
    }

    /// Remove an attribute, returning the previous value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(n, _)| n == name)?;
        Some(self.attrs.remove(pos).1)
    }

    /// Iterate class names
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attr("class")
            .unwrap_or("")
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn get_style(&self, property: &str) -> Option<&str> {
        self.style.iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Set a style property; an empty value clears it
    pub fn set_style(&mut self, property: &str, value: &str) {
        self.style.retain(|(p, _)| p != property);
        if !value.is_empty() {
            self.style.push((property.to_string(), value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_replace() {
        let mut el = ElementData::new("BUTTON");
        assert_eq!(el.tag, "button");
        assert_eq!(el.set_attr("aria-hidden", "true"), None);
        assert_eq!(el.set_attr("aria-hidden", "false"), Some("true".into()));
        assert_eq!(el.get_attr("aria-hidden"), Some("false"));
        assert_eq!(el.remove_attr("aria-hidden"), Some("false".into()));
        assert_eq!(el.get_attr("aria-hidden"), None);
    }

    #[test]
    fn test_classes_and_style() {
        let mut el = ElementData::new("div");
        el.set_attr("class", "card  card--active");
        assert!(el.has_class("card"));
        assert!(el.has_class("card--active"));
        assert!(!el.has_class("card--"));

        el.set_style("display", "none");
        assert_eq!(el.get_style("display"), Some("none"));
        el.set_style("display", "");
        assert_eq!(el.get_style("display"), None);
    }
}
