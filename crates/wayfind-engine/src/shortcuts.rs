//! Page-wide keyboard shortcuts
//!
//! - `Ctrl+K` / `Cmd+K` focuses the search field
//! - `?` toggles the keyboard help bar, except while typing in a form
//!   field; its close button hides it again

use wayfind_a11y::Announcer;
use wayfind_dom::{Dom, Key, KeyEvent, NodeId, Scheduler};

use crate::page::Deferred;
use crate::Config;

/// Shortcut targets resolved from the document
#[derive(Debug, Clone, Default)]
pub struct Shortcuts {
    search: Option<NodeId>,
    help_bar: Option<NodeId>,
    help_close: Option<NodeId>,
}

impl Shortcuts {
    pub fn from_document(dom: &dyn Dom, config: &Config) -> Self {
        Self {
            search: dom.get_element_by_id(&config.search_input_id),
            help_bar: dom.get_element_by_id(&config.help_bar_id),
            help_close: dom.get_element_by_id(&config.help_close_id),
        }
    }

    pub fn help_bar(&self) -> Option<NodeId> {
        self.help_bar
    }

    /// Returns true when the default action was prevented
    pub fn handle_key(
        &self,
        dom: &mut dyn Dom,
        scheduler: &mut Scheduler<Deferred>,
        announcer: &Announcer,
        event: &KeyEvent,
    ) -> bool {
        match event.key {
            Key::Char('k') if event.is_command() => {
                if let Some(search) = self.search {
                    dom.focus(search);
                }
                true
            }
            Key::Char('?') => {
                let Some(bar) = self.help_bar else {
                    return false;
                };
                let typing = dom
                    .active_element()
                    .and_then(|a| dom.tag_name(a))
                    .is_some_and(|tag| matches!(tag, "input" | "textarea" | "select"));
                if typing {
                    return false;
                }
                let open = dom.attr(bar, "aria-hidden") == Some("false");
                dom.set_attr(bar, "aria-hidden", if open { "true" } else { "false" });
                if !open {
                    announcer.announce(dom, scheduler, "Keyboard shortcuts bar opened");
                }
                tracing::debug!("Keyboard help bar {}", if open { "closed" } else { "opened" });
                true
            }
            _ => false,
        }
    }

    /// The help bar's close button
    pub fn handle_click(&self, dom: &mut dyn Dom, node: NodeId) -> bool {
        let (Some(bar), Some(close)) = (self.help_bar, self.help_close) else {
            return false;
        };
        if !dom.contains(close, node) {
            return false;
        }
        dom.set_attr(bar, "aria-hidden", "true");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfind_dom::{DOMRect, DomTree};

    struct Fixture {
        tree: DomTree,
        search: NodeId,
        bar: NodeId,
        close: NodeId,
    }

    fn fixture() -> Fixture {
        let mut tree = DomTree::new();
        let body = tree.append_element(tree.root(), "body");
        let search = tree.append_element(body, "input");
        tree.set_attr(search, "id", "search-input");
        tree.set_layout(search, DOMRect::from_xywh(0.0, 0.0, 200.0, 32.0));
        let bar = tree.append_element(body, "div");
        tree.set_attr(bar, "id", "kbd-help-bar");
        tree.set_attr(bar, "aria-hidden", "true");
        let close = tree.append_element(bar, "button");
        tree.set_attr(close, "id", "kbd-help-close");
        Fixture { tree, search, bar, close }
    }

    #[test]
    fn test_question_mark_toggles_help_bar() {
        let mut f = fixture();
        let shortcuts = Shortcuts::from_document(&f.tree, &Config::default());
        let announcer = Announcer::new(None);
        let mut sched = Scheduler::new();
        let question = KeyEvent::new(Key::Char('?')).shift();

        assert!(shortcuts.handle_key(&mut f.tree, &mut sched, &announcer, &question));
        assert_eq!(f.tree.attr(f.bar, "aria-hidden"), Some("false"));
        assert!(shortcuts.handle_key(&mut f.tree, &mut sched, &announcer, &question));
        assert_eq!(f.tree.attr(f.bar, "aria-hidden"), Some("true"));

        // Typed into the search field instead
        f.tree.focus(f.search);
        assert!(!shortcuts.handle_key(&mut f.tree, &mut sched, &announcer, &question));
        assert_eq!(f.tree.attr(f.bar, "aria-hidden"), Some("true"));
    }

    #[test]
    fn test_close_button_hides_help_bar() {
        let mut f = fixture();
        let shortcuts = Shortcuts::from_document(&f.tree, &Config::default());
        f.tree.set_attr(f.bar, "aria-hidden", "false");

        assert!(!shortcuts.handle_click(&mut f.tree, f.search));
        assert!(shortcuts.handle_click(&mut f.tree, f.close));
        assert_eq!(f.tree.attr(f.bar, "aria-hidden"), Some("true"));
    }

    #[test]
    fn test_missing_targets() {
        let mut tree = DomTree::new();
        let shortcuts = Shortcuts::from_document(&tree, &Config::default());
        let announcer = Announcer::new(None);
        let mut sched = Scheduler::new();

        // Ctrl+K is still claimed; `?` is left alone
        let ctrl_k = KeyEvent::new(Key::Char('k')).ctrl();
        assert!(shortcuts.handle_key(&mut tree, &mut sched, &announcer, &ctrl_k));
        let question = KeyEvent::new(Key::Char('?'));
        assert!(!shortcuts.handle_key(&mut tree, &mut sched, &announcer, &question));
        assert!(shortcuts.help_bar().is_none());
    }
}
