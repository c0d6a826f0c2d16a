//! Tab Lists
//!
//! `role="tab"` buttons switching `aria-hidden` panels, with arrow-key,
//! Home and End navigation between tabs. Tabs and panels are paired by id:
//! `tab-btn-<name>` selects panel `tab-<name>`.

use serde::{Deserialize, Serialize};
use wayfind_dom::{Dom, Key, KeyEvent, NodeId, Scheduler, Selector};

use crate::announcer::Announcer;
use crate::{A11yError, A11yTask};

/// Where a tab list and its panels live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabListConfig {
    /// Tablist root selector
    pub tablist: String,
    /// Panel selector (document wide)
    pub panel: String,
    pub tab_prefix: String,
    pub panel_prefix: String,
}

impl Default for TabListConfig {
    fn default() -> Self {
        Self {
            tablist: "[role=\"tablist\"]".to_string(),
            panel: ".drawer__tab-panel".to_string(),
            tab_prefix: "tab-btn-".to_string(),
            panel_prefix: "tab-".to_string(),
        }
    }
}

impl TabListConfig {
    pub fn with_tablist(selector: &str) -> Self {
        Self {
            tablist: selector.to_string(),
            ..Self::default()
        }
    }
}

/// Resolved tab list. Cheap to clone; hand copies to whoever needs
/// `switch_tab`.
#[derive(Debug, Clone, Default)]
pub struct TabList {
    tabs: Vec<NodeId>,
    panels: Vec<NodeId>,
    tab_prefix: String,
    panel_prefix: String,
}

impl TabList {
    /// Tab list that switches nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_document(dom: &dyn Dom, config: &TabListConfig) -> Result<Self, A11yError> {
        let root_sel = Selector::parse(&config.tablist)?;
        let Some(root) = dom.query_selector(dom.root(), &root_sel) else {
            tracing::debug!("No tablist for `{}`", config.tablist);
            return Ok(Self::empty());
        };
        let tab_sel = Selector::parse("[role=\"tab\"]")?;
        let panel_sel = Selector::parse(&config.panel)?;

        Ok(Self {
            tabs: dom.query_selector_all(root, &tab_sel),
            panels: dom.query_selector_all(dom.root(), &panel_sel),
            tab_prefix: config.tab_prefix.clone(),
            panel_prefix: config.panel_prefix.clone(),
        })
    }

    pub fn tabs(&self) -> &[NodeId] {
        &self.tabs
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    fn strip_id(dom: &dyn Dom, node: NodeId, prefix: &str) -> String {
        let id = dom.attr(node, "id").unwrap_or("");
        id.strip_prefix(prefix).unwrap_or(id).to_string()
    }

    /// Tab name derived from the tab's id
    pub fn tab_name(&self, dom: &dyn Dom, tab: NodeId) -> String {
        Self::strip_id(dom, tab, &self.tab_prefix)
    }

    /// Select `name`, updating every tab and panel
    pub fn switch_tab(&self, dom: &mut dyn Dom, name: &str) {
        for &tab in &self.tabs {
            let selected = self.tab_name(&*dom, tab) == name;
            dom.set_attr(tab, "aria-selected", if selected { "true" } else { "false" });
            dom.set_attr(tab, "tabindex", if selected { "0" } else { "-1" });
        }
        for &panel in &self.panels {
            let shown = Self::strip_id(&*dom, panel, &self.panel_prefix) == name;
            dom.set_attr(panel, "aria-hidden", if shown { "false" } else { "true" });
        }
    }

    /// Name of the currently selected tab
    pub fn selected(&self, dom: &dyn Dom) -> Option<String> {
        self.tabs
            .iter()
            .find(|&&t| dom.attr(t, "aria-selected") == Some("true"))
            .map(|&t| self.tab_name(dom, t))
    }

    fn tab_for(&self, dom: &dyn Dom, node: NodeId) -> Option<NodeId> {
        self.tabs.iter().copied().find(|&t| dom.contains(t, node))
    }

    /// Click on `node`: select the tab it belongs to
    pub fn handle_click<T: From<A11yTask>>(
        &self,
        dom: &mut dyn Dom,
        scheduler: &mut Scheduler<T>,
        announcer: &Announcer,
        node: NodeId,
    ) -> bool {
        let Some(tab) = self.tab_for(&*dom, node) else {
            return false;
        };
        let name = self.tab_name(&*dom, tab);
        self.switch_tab(dom, &name);
        announcer.announce(dom, scheduler, &format!("{} tab selected", capitalize(&name)));
        true
    }

    /// Arrow/Home/End on a focused tab. Returns true when handled.
    pub fn handle_key<T: From<A11yTask>>(
        &self,
        dom: &mut dyn Dom,
        scheduler: &mut Scheduler<T>,
        announcer: &Announcer,
        event: &KeyEvent,
    ) -> bool {
        let Some(active) = dom.active_element() else {
            return false;
        };
        let Some(idx) = self.tabs.iter().position(|&t| t == active) else {
            return false;
        };
        let len = self.tabs.len();
        let target = match event.key {
            Key::ArrowRight => self.tabs[(idx + 1) % len],
            Key::ArrowLeft => self.tabs[(idx + len - 1) % len],
            Key::Home => self.tabs[0],
            Key::End => self.tabs[len - 1],
            _ => return false,
        };

        let name = self.tab_name(&*dom, target);
        self.switch_tab(dom, &name);
        dom.focus(target);
        announcer.announce(dom, scheduler, &format!("{} tab", capitalize(&name)));
        true
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_task;
    use wayfind_dom::{DOMRect, DomTree};

    struct Drawer {
        tree: DomTree,
        tabs: Vec<NodeId>,
        panels: Vec<NodeId>,
        region: NodeId,
    }

    fn drawer() -> Drawer {
        let mut tree = DomTree::new();
        let body = tree.append_element(tree.root(), "body");
        let region = tree.append_element(body, "div");
        tree.set_attr(region, "id", "live-region");
        let list = tree.append_element(body, "div");
        tree.set_attr(list, "role", "tablist");
        tree.set_attr(list, "class", "drawer__tabs");

        let mut tabs = Vec::new();
        let mut panels = Vec::new();
        for (i, name) in ["details", "activity", "files"].iter().enumerate() {
            let tab = tree.append_element(list, "button");
            tree.set_attr(tab, "role", "tab");
            tree.set_attr(tab, "id", &format!("tab-btn-{}", name));
            tree.set_layout(tab, DOMRect::from_xywh(100.0 * i as f64, 0.0, 90.0, 32.0));
            tabs.push(tab);

            let panel = tree.append_element(body, "section");
            tree.set_attr(panel, "class", "drawer__tab-panel");
            tree.set_attr(panel, "id", &format!("tab-{}", name));
            panels.push(panel);
        }
        Drawer { tree, tabs, panels, region }
    }

    fn flush(tree: &mut DomTree, sched: &mut Scheduler<A11yTask>) {
        for task in sched.advance(16) {
            run_task(tree, task);
        }
    }

    #[test]
    fn test_switch_tab_updates_all() {
        let mut d = drawer();
        let list = TabList::from_document(&d.tree, &TabListConfig::with_tablist(".drawer__tabs")).unwrap();

        list.switch_tab(&mut d.tree, "activity");
        assert_eq!(d.tree.attr(d.tabs[1], "aria-selected"), Some("true"));
        assert_eq!(d.tree.attr(d.tabs[1], "tabindex"), Some("0"));
        assert_eq!(d.tree.attr(d.tabs[0], "tabindex"), Some("-1"));
        assert_eq!(d.tree.attr(d.panels[1], "aria-hidden"), Some("false"));
        assert_eq!(d.tree.attr(d.panels[2], "aria-hidden"), Some("true"));
        assert_eq!(list.selected(&d.tree).as_deref(), Some("activity"));
    }

    #[test]
    fn test_arrow_keys_wrap() {
        let mut d = drawer();
        let announcer = Announcer::new(Some(d.region));
        let mut sched = Scheduler::new();
        let list = TabList::from_document(&d.tree, &TabListConfig::default()).unwrap();
        list.switch_tab(&mut d.tree, "details");
        d.tree.focus(d.tabs[0]);

        assert!(list.handle_key(&mut d.tree, &mut sched, &announcer, &KeyEvent::new(Key::ArrowLeft)));
        assert_eq!(d.tree.active_element(), Some(d.tabs[2]));
        flush(&mut d.tree, &mut sched);
        assert_eq!(d.tree.text(d.region), "Files tab");

        assert!(list.handle_key(&mut d.tree, &mut sched, &announcer, &KeyEvent::new(Key::ArrowRight)));
        assert_eq!(d.tree.active_element(), Some(d.tabs[0]));

        assert!(list.handle_key(&mut d.tree, &mut sched, &announcer, &KeyEvent::new(Key::End)));
        assert_eq!(list.selected(&d.tree).as_deref(), Some("files"));
        assert!(list.handle_key(&mut d.tree, &mut sched, &announcer, &KeyEvent::new(Key::Home)));
        assert_eq!(list.selected(&d.tree).as_deref(), Some("details"));

        assert!(!list.handle_key(&mut d.tree, &mut sched, &announcer, &KeyEvent::new(Key::Enter)));
    }

    #[test]
    fn test_click_announces_selection() {
        let mut d = drawer();
        let announcer = Announcer::new(Some(d.region));
        let mut sched = Scheduler::new();
        let list = TabList::from_document(&d.tree, &TabListConfig::default()).unwrap();

        assert!(list.handle_click(&mut d.tree, &mut sched, &announcer, d.tabs[2]));
        flush(&mut d.tree, &mut sched);
        assert_eq!(d.tree.text(d.region), "Files tab selected");
        assert!(!list.handle_click(&mut d.tree, &mut sched, &announcer, d.panels[0]));
    }

    #[test]
    fn test_missing_tablist_is_inert() {
        let mut d = drawer();
        let list = TabList::from_document(&d.tree, &TabListConfig::with_tablist("#nope")).unwrap();
        assert!(list.is_empty());

        d.tree.take_mutations();
        list.switch_tab(&mut d.tree, "files");
        assert!(d.tree.mutations().is_empty());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("activity"), "Activity");
        assert_eq!(capitalize(""), "");
    }
}
