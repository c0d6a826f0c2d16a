//! DOM Tree (arena-based allocation)
//!
//! In-memory document implementing [`Dom`]. Layout boxes are supplied by
//! the caller (there is no layout engine); the tree converts them to
//! client rects against the current scroll offset, tracks focus, and
//! records attribute and text mutations in a bounded log.

use crate::dom_events::MutationRecord;
use crate::geometry::{DOMRect, ScrollBehavior, Size, Viewport};
use crate::node::{ElementData, Node, NodeData};
use crate::{Dom, NodeId};

/// Mutation log capacity; the oldest half is dropped when it fills
pub const MUTATION_LOG_LIMIT: usize = 1024;

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    viewport: Viewport,
    /// Scrollable document height; `None` leaves scrolling unbounded below
    document_height: Option<f64>,
    focused: Option<NodeId>,
    mutations: Vec<MutationRecord>,
    recording: bool,
    /// Text nodes dropped by `set_text`, reused by the next assignment
    spare_text: Vec<NodeId>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            viewport: Viewport::default(),
            document_height: None,
            focused: None,
            mutations: Vec::new(),
            recording: true,
            spare_text: Vec::new(),
        }
    }

    /// Create a tree with a given viewport size
    pub fn with_viewport(width: f64, height: f64) -> Self {
        let mut tree = Self::new();
        tree.viewport = Viewport::new(width, height);
        tree
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree only holds the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content.to_string()))
    }

    fn reuse_text(&mut self, content: &str) -> NodeId {
        match self.spare_text.pop() {
            Some(id) => {
                self.nodes[id.index()] = Node::text(content.to_string());
                id
            }
            None => self.create_text(content),
        }
    }

    /// Create an element and append it to `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.append_child(parent, id);
        id
    }

    /// Give an element a layout box in document coordinates
    pub fn set_layout(&mut self, id: NodeId, rect: DOMRect) {
        if let Some(el) = self.element_mut(id) {
            el.layout = Some(rect);
            el.fixed = false;
        }
    }

    /// Remove an element's layout box (as if `display: none`)
    pub fn clear_layout(&mut self, id: NodeId) {
        if let Some(el) = self.element_mut(id) {
            el.layout = None;
        }
    }

    /// Size reported by the measurement pass
    pub fn set_intrinsic_size(&mut self, id: NodeId, size: Size) {
        if let Some(el) = self.element_mut(id) {
            el.intrinsic = Some(size);
        }
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn set_scroll(&mut self, x: f64, y: f64) {
        self.viewport.scroll_x = x.max(0.0);
        self.viewport.scroll_y = self.clamp_scroll_y(y);
    }

    pub fn set_document_height(&mut self, height: f64) {
        self.document_height = Some(height);
        self.viewport.scroll_y = self.clamp_scroll_y(self.viewport.scroll_y);
    }

    fn clamp_scroll_y(&self, y: f64) -> f64 {
        let max = self.document_height
            .map(|h| (h - self.viewport.height).max(0.0))
            .unwrap_or(f64::INFINITY);
        y.clamp(0.0, max)
    }

    /// Recorded mutations, oldest first
    pub fn mutations(&self) -> &[MutationRecord] {
        &self.mutations
    }

    /// Drain recorded mutations
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.mutations)
    }

    /// Turn the mutation log on or off. Turning it off drops the log.
    pub fn record_mutations(&mut self, on: bool) {
        self.recording = on;
        if !on {
            self.mutations = Vec::new();
        }
    }

    fn record(&mut self, record: MutationRecord) {
        if !self.recording {
            return;
        }
        if self.mutations.len() >= MUTATION_LOG_LIMIT {
            self.mutations.drain(..MUTATION_LOG_LIMIT / 2);
        }
        self.mutations.push(record);
    }

    /// Whether the element would accept focus
    pub fn is_focusable(&self, id: NodeId) -> bool {
        let Some(el) = self.element(id) else {
            return false;
        };
        if self.rect(id).is_none() {
            return false;
        }
        if el.get_attr("tabindex").is_some() {
            return true;
        }
        match el.tag.as_str() {
            "a" => el.get_attr("href").is_some(),
            "button" | "input" | "select" | "textarea" => el.get_attr("disabled").is_none(),
            _ => false,
        }
    }

    fn is_display_none(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            if self.element(n).and_then(|el| el.get_style("display")) == Some("none") {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    fn detach(&mut self, child: NodeId) {
        let Some(node) = self.get(child) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[child.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for child in self.children(id) {
            match self.get(child).map(|n| &n.data) {
                Some(NodeData::Text(t)) => out.push_str(t),
                Some(_) => self.collect_text(child, out),
                None => {}
            }
        }
    }
}

impl Dom for DomTree {
    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)
            .map(|n| n.parent)
            .filter(|p| p.is_valid())
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.get(node).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        while current.is_valid() {
            out.push(current);
            current = self.nodes[current.index()].next_sibling;
        }
        out
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|el| el.get_attr(name))
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(el) = self.element_mut(node) else {
            return;
        };
        let old = el.set_attr(name, value);
        self.record(MutationRecord::attr_modified(node, name, old, Some(value)));
    }

    fn remove_attr(&mut self, node: NodeId, name: &str) {
        let Some(el) = self.element_mut(node) else {
            return;
        };
        if let Some(old) = el.remove_attr(name) {
            self.record(MutationRecord::attr_modified(node, name, Some(old), None));
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|el| el.has_class(class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let Some(el) = self.element(node) else {
            return;
        };
        if el.has_class(class) {
            return;
        }
        let mut classes: Vec<&str> = el.classes().collect();
        classes.push(class);
        let value = classes.join(" ");
        self.set_attr(node, "class", &value);
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        let Some(el) = self.element(node) else {
            return;
        };
        if !el.has_class(class) {
            return;
        }
        let value = el.classes()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(node, "class", &value);
    }

    fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node).and_then(|el| el.get_style(property))
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.set_style(property, value);
        }
    }

    fn text(&self, node: NodeId) -> String {
        if let Some(t) = self.get(node).and_then(Node::as_text) {
            return t.to_string();
        }
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if self.element(node).is_none() {
            return;
        }
        let old = self.text(node);
        for child in self.children(node) {
            if self.get(child).and_then(Node::as_text).is_some() {
                self.detach(child);
                self.spare_text.push(child);
            }
        }
        self.clear_children(node);
        if !text.is_empty() {
            let t = self.reuse_text(text);
            self.append_child(node, t);
        }
        self.record(MutationRecord::text_assigned(node, old, text));
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(tag))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        // Appending an ancestor under its own descendant would create a cycle
        if self.contains(child, parent) {
            return;
        }
        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
    }

    fn clear_children(&mut self, node: NodeId) {
        for child in self.children(node) {
            if self.focused.is_some_and(|f| self.contains(child, f)) {
                self.focused = None;
            }
            self.detach(child);
        }
    }

    fn rect(&self, node: NodeId) -> Option<DOMRect> {
        let el = self.element(node)?;
        let layout = el.layout?;
        if self.is_display_none(node) {
            return None;
        }
        // Detached nodes are never rendered
        if !self.contains(self.root(), node) {
            return None;
        }
        if el.fixed {
            Some(layout)
        } else {
            Some(layout.translate(-self.viewport.scroll_x, -self.viewport.scroll_y))
        }
    }

    fn natural_size(&mut self, node: NodeId) -> Option<Size> {
        let el = self.element(node)?;
        el.intrinsic.or_else(|| el.layout.map(|r| r.size()))
    }

    fn place(&mut self, node: NodeId, rect: DOMRect) {
        if let Some(el) = self.element_mut(node) {
            el.layout = Some(rect);
            el.fixed = true;
        }
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_into_view(&mut self, node: NodeId, behavior: ScrollBehavior) {
        let Some(el) = self.element(node) else {
            return;
        };
        let Some(layout) = el.layout else {
            return;
        };
        if el.fixed {
            return;
        }
        // block: "center"
        let target = layout.center_y() - self.viewport.height / 2.0;
        self.viewport.scroll_y = self.clamp_scroll_y(target);
        tracing::trace!(
            "scroll_into_view {} ({:?}) -> scroll_y {}",
            node, behavior, self.viewport.scroll_y
        );
    }

    fn active_element(&self) -> Option<NodeId> {
        self.focused
    }

    fn focus(&mut self, node: NodeId) -> bool {
        if self.is_focusable(node) {
            self.focused = Some(node);
            true
        } else {
            false
        }
    }
}
