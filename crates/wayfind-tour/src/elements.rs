//! Tour chrome
//!
//! The overlay, spotlight and card elements the walkthrough drives,
//! resolved once by id.

use wayfind_dom::{Dom, NodeId};

use crate::TourError;

/// Elements of the walkthrough overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourElements {
    pub overlay: NodeId,
    pub spotlight: NodeId,
    pub card: NodeId,
    /// Control that starts the tour; focus returns here on end
    pub launcher: NodeId,
    pub close: NodeId,
    pub prev: NodeId,
    pub next: NodeId,
    pub counter: NodeId,
    pub wcag: NodeId,
    pub title: NodeId,
    pub description: NodeId,
    pub impact: NodeId,
    pub preview: NodeId,
    pub progress: NodeId,
    /// Body, for scroll locking
    pub body: Option<NodeId>,
    /// Transient panels hidden when the tour starts, with their toggles
    pub suppress: Vec<(NodeId, Option<NodeId>)>,
}

impl TourElements {
    /// Panels the dashboard closes before a tour, as (panel id, toggle id)
    pub const DASHBOARD_PANELS: &'static [(&'static str, &'static str)] =
        &[("wcag-panel", "wcag-toggle")];

    /// Resolve the `wt-*` ids of the dashboard page
    pub fn from_document(dom: &dyn Dom) -> Result<Self, TourError> {
        let find = |id: &str| {
            dom.get_element_by_id(id)
                .ok_or_else(|| TourError::MissingElement(id.to_string()))
        };

        let suppress = Self::DASHBOARD_PANELS
            .iter()
            .filter_map(|(panel, toggle)| {
                let panel = dom.get_element_by_id(panel)?;
                Some((panel, dom.get_element_by_id(toggle)))
            })
            .collect();

        Ok(Self {
            overlay: find("wt-overlay")?,
            spotlight: find("wt-spotlight")?,
            card: find("wt-card")?,
            launcher: find("wt-tour-btn")?,
            close: find("wt-close")?,
            prev: find("wt-prev")?,
            next: find("wt-next")?,
            counter: find("wt-step-counter")?,
            wcag: find("wt-wcag-tag")?,
            title: find("wt-title")?,
            description: find("wt-desc")?,
            impact: find("wt-impact")?,
            preview: find("wt-sr-output")?,
            progress: find("wt-progress")?,
            body: dom.select("body"),
            suppress,
        })
    }
}
