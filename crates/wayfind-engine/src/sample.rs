//! Sample dashboard document
//!
//! An in-memory rendition of the dashboard page the walkthrough and the
//! landmark defaults are written for. Used by the demo and the tests.

use wayfind_dom::{DOMRect, Dom, DomTree, NodeId, Size};

/// Viewport the sample is laid out for
pub const VIEWPORT: (f64, f64) = (1280.0, 800.0);

struct Builder {
    tree: DomTree,
}

impl Builder {
    fn el(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = self.tree.append_element(parent, tag);
        for (name, value) in attrs {
            self.tree.set_attr(node, name, value);
        }
        node
    }

    fn boxed(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)], rect: (f64, f64, f64, f64)) -> NodeId {
        let node = self.el(parent, tag, attrs);
        self.tree.set_layout(node, DOMRect::from_xywh(rect.0, rect.1, rect.2, rect.3));
        node
    }

    fn text(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)], text: &str) -> NodeId {
        let node = self.el(parent, tag, attrs);
        self.tree.set_text(node, text);
        node
    }
}

/// Build the dashboard document
pub fn dashboard() -> DomTree {
    let mut tree = DomTree::with_viewport(VIEWPORT.0, VIEWPORT.1);
    tree.set_document_height(1600.0);
    let mut b = Builder { tree };
    let root = b.tree.root();
    let body = b.el(root, "body", &[]);

    let skip = b.boxed(body, "nav", &[("class", "skip-links"), ("aria-label", "Skip links")], (0.0, 0.0, 1280.0, 36.0));
    b.boxed(skip, "a", &[("class", "skip-link"), ("href", "#main-content")], (8.0, 4.0, 180.0, 28.0));

    // Header
    let header = b.boxed(body, "header", &[("role", "banner")], (0.0, 0.0, 1280.0, 64.0));
    b.boxed(header, "input", &[("id", "search-input"), ("type", "search")], (320.0, 14.0, 360.0, 36.0));
    b.boxed(header, "button", &[("id", "wcag-toggle"), ("aria-expanded", "false"), ("aria-controls", "wcag-panel")], (1000.0, 14.0, 120.0, 36.0));
    b.boxed(header, "button", &[("id", "wt-tour-btn"), ("class", "topbar__tour")], (1130.0, 14.0, 130.0, 36.0));
    let wcag = b.el(body, "div", &[("id", "wcag-panel"), ("aria-hidden", "true")]);
    b.text(wcag, "p", &[], "WCAG 2.2 AA reference");

    // Navigation
    let nav = b.boxed(body, "nav", &[("id", "main-nav"), ("aria-label", "Main")], (0.0, 64.0, 220.0, 736.0));
    for (i, label) in ["Dashboard", "Projects", "Reports"].iter().enumerate() {
        let item = b.boxed(nav, "a", &[("class", "nav-item"), ("href", "#")], (16.0, 88.0 + 44.0 * i as f64, 188.0, 36.0));
        b.tree.set_text(item, label);
    }

    // Main content
    let main = b.boxed(body, "main", &[("id", "main-content")], (220.0, 64.0, 1060.0, 1536.0));
    for (i, label) in ["Active assets", "Data quality", "Open issues"].iter().enumerate() {
        let x = 240.0 + 330.0 * i as f64;
        let card = b.boxed(main, "div", &[("class", "metric-card")], (x, 96.0, 310.0, 120.0));
        b.text(card, "h3", &[], label);
        let info = b.boxed(card, "span", &[("class", "has-tooltip")], (x + 270.0, 108.0, 24.0, 24.0));
        let trigger = b.boxed(info, "button", &[("aria-describedby", format!("tip-{}", i).as_str()), ("aria-label", "More info")], (x + 270.0, 108.0, 24.0, 24.0));
        b.tree.set_text(trigger, "i");
        let tip = b.el(info, "div", &[("class", "tooltip"), ("role", "tooltip"), ("id", format!("tip-{}", i).as_str())]);
        b.tree.set_text(tip, "Updated hourly");
        b.tree.set_intrinsic_size(tip, Size::new(180.0, 48.0));
    }

    let list = b.boxed(main, "ul", &[("class", "data-list")], (240.0, 260.0, 1000.0, 300.0));
    for (i, name) in ["Monthly report", "Churn model", "Sales pipeline"].iter().enumerate() {
        let y = 260.0 + 60.0 * i as f64;
        let item = b.boxed(list, "li", &[("class", "data-list__item")], (240.0, y, 1000.0, 56.0));
        b.text(item, "span", &[], name);
        b.boxed(item, "button", &[("class", "action-edit"), ("aria-label", format!("Edit {}", name).as_str())], (1150.0, y + 12.0, 32.0, 32.0));
        let delete_label = if i == 0 {
            format!("Cannot delete {}: it has scheduled exports", name)
        } else {
            format!("Delete {}", name)
        };
        let delete = b.boxed(item, "button", &[("class", "action-delete"), ("aria-label", delete_label.as_str())], (1190.0, y + 12.0, 32.0, 32.0));
        if i == 0 {
            b.tree.set_attr(delete, "aria-disabled", "true");
        }
    }
    b.boxed(main, "div", &[("class", "chart-area"), ("role", "img"), ("aria-label", "Usage over time")], (240.0, 600.0, 1000.0, 320.0));

    // Live region
    b.boxed(body, "div", &[("id", "live-region"), ("aria-live", "polite"), ("class", "sr-only")], (0.0, 0.0, 1.0, 1.0));

    // Keyboard help bar
    let help = b.boxed(body, "div", &[("id", "kbd-help-bar"), ("role", "region"), ("aria-hidden", "true")], (0.0, 752.0, 1280.0, 48.0));
    b.text(help, "p", &[], "Tab: move focus · F6: jump between regions · Ctrl+K: search · ?: toggle this bar");
    b.boxed(help, "button", &[("id", "kbd-help-close"), ("aria-label", "Close keyboard shortcuts")], (1236.0, 760.0, 32.0, 32.0));

    // Asset drawer
    let drawer_overlay = b.el(body, "div", &[("id", "drawer-overlay"), ("aria-hidden", "true")]);
    let drawer = b.boxed(body, "aside", &[("id", "asset-drawer"), ("class", "drawer"), ("aria-hidden", "true")], (880.0, 0.0, 400.0, 800.0));
    b.tree.set_style(drawer, "display", "none");
    b.tree.set_attr(drawer_overlay, "class", "drawer-overlay");
    b.boxed(drawer, "button", &[("id", "drawer-close"), ("aria-label", "Close drawer")], (1236.0, 16.0, 32.0, 32.0));
    b.el(drawer, "h2", &[("id", "drawer-title")]);
    b.el(drawer, "p", &[("id", "drawer-subtitle")]);
    let tablist = b.el(drawer, "div", &[("role", "tablist")]);
    for (i, name) in ["general", "properties", "people"].iter().enumerate() {
        let selected = if i == 0 { "true" } else { "false" };
        b.boxed(
            tablist,
            "button",
            &[("role", "tab"), ("id", format!("tab-btn-{}", name).as_str()), ("aria-selected", selected)],
            (900.0 + 120.0 * i as f64, 100.0, 110.0, 36.0),
        );
        let panel = b.el(drawer, "div", &[("class", "drawer__tab-panel"), ("id", format!("tab-{}", name).as_str())]);
        b.tree.set_attr(panel, "aria-hidden", if i == 0 { "false" } else { "true" });
        b.boxed(panel, "input", &[("aria-label", format!("{} field", name).as_str())], (900.0, 160.0, 360.0, 36.0));
    }

    // Edit modal
    let edit_overlay = b.el(body, "div", &[("id", "edit-modal-overlay"), ("aria-hidden", "true")]);
    let edit = b.boxed(edit_overlay, "div", &[("id", "edit-modal"), ("role", "dialog")], (340.0, 200.0, 600.0, 400.0));
    b.boxed(edit, "input", &[("id", "edit-name")], (370.0, 260.0, 540.0, 36.0));
    b.boxed(edit, "button", &[("id", "edit-save")], (780.0, 540.0, 130.0, 36.0));
    b.el(body, "div", &[("id", "delete-modal-overlay"), ("aria-hidden", "true")]);

    // Welcome dialog
    let welcome_overlay = b.el(body, "div", &[("id", "welcome-modal-overlay"), ("aria-hidden", "true")]);
    let welcome = b.boxed(welcome_overlay, "div", &[("id", "welcome-modal"), ("role", "dialog")], (390.0, 180.0, 500.0, 360.0));
    b.boxed(welcome, "button", &[("id", "welcome-modal-close"), ("aria-label", "Close")], (846.0, 196.0, 28.0, 28.0));
    b.boxed(welcome, "button", &[("id", "welcome-modal-start")], (700.0, 480.0, 170.0, 40.0));

    // Walkthrough chrome
    let overlay = b.el(body, "div", &[("id", "wt-overlay"), ("aria-hidden", "true")]);
    b.tree.set_style(overlay, "display", "none");
    b.el(overlay, "div", &[("id", "wt-spotlight")]);
    let card = b.el(overlay, "div", &[("id", "wt-card"), ("role", "dialog")]);
    b.tree.set_intrinsic_size(card, Size::new(400.0, 280.0));
    b.boxed(card, "button", &[("id", "wt-close"), ("aria-label", "Close tour")], (0.0, 0.0, 28.0, 28.0));
    for id in ["wt-step-counter", "wt-wcag-tag", "wt-title", "wt-desc", "wt-impact", "wt-sr-output", "wt-progress"] {
        b.el(card, "p", &[("id", id)]);
    }
    b.boxed(card, "button", &[("id", "wt-prev")], (0.0, 0.0, 80.0, 32.0));
    b.boxed(card, "button", &[("id", "wt-next")], (0.0, 0.0, 80.0, 32.0));

    b.tree.take_mutations();
    b.tree
}
