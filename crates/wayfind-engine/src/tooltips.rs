//! Tooltip bindings
//!
//! Each `.tooltip` is bound to its closest `.has-tooltip` ancestor.
//! Pointer entry or focus anywhere inside the parent re-positions the
//! tooltip against it.

use wayfind_dom::{Dom, NodeId, Selector};

/// Resolved (parent, tooltip) pairs
#[derive(Debug, Clone, Default)]
pub struct Tooltips {
    bindings: Vec<(NodeId, NodeId)>,
}

impl Tooltips {
    const TOOLTIP: &'static str = ".tooltip";
    const PARENT: &'static str = ".has-tooltip";

    /// Bind every tooltip in the document. Orphans are ignored.
    pub fn from_document(dom: &dyn Dom) -> Self {
        let (Ok(tooltip), Ok(parent)) = (Selector::parse(Self::TOOLTIP), Selector::parse(Self::PARENT)) else {
            return Self::default();
        };
        let bindings = dom
            .query_selector_all(dom.root(), &tooltip)
            .into_iter()
            .filter_map(|tip| Some((dom.closest(tip, &parent)?, tip)))
            .collect();
        Self { bindings }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn bindings(&self) -> &[(NodeId, NodeId)] {
        &self.bindings
    }

    /// Tooltips whose parent contains `node`
    pub fn triggered_by(&self, dom: &dyn Dom, node: NodeId) -> Vec<(NodeId, NodeId)> {
        self.bindings
            .iter()
            .copied()
            .filter(|&(parent, _)| dom.contains(parent, node))
            .collect()
    }
}
