//! Walkthrough steps
//!
//! A step is static configuration: where to point, what to say, and how
//! to stage the page on the way in and out. Hooks only ever see the DOM.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize};
use wayfind_dom::{Dom, Selector};

use crate::TourError;

const DASHBOARD_TOUR: &str = include_str!("dashboard_tour.json");

/// Single DOM mutation, addressed by selector (first match)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DomEffect {
    SetAttribute { selector: String, name: String, value: String },
    RemoveAttribute { selector: String, name: String },
    AddClass { selector: String, class: String },
    RemoveClass { selector: String, class: String },
    SetText { selector: String, text: String },
    /// Empty value clears the property
    SetStyle { selector: String, property: String, value: String },
}

impl DomEffect {
    pub fn selector(&self) -> &str {
        match self {
            Self::SetAttribute { selector, .. }
            | Self::RemoveAttribute { selector, .. }
            | Self::AddClass { selector, .. }
            | Self::RemoveClass { selector, .. }
            | Self::SetText { selector, .. }
            | Self::SetStyle { selector, .. } => selector,
        }
    }

    /// Apply to the first match; unmatched selectors are skipped
    pub fn apply(&self, dom: &mut dyn Dom) {
        let Some(node) = dom.select(self.selector()) else {
            tracing::trace!("Effect target `{}` missing", self.selector());
            return;
        };
        match self {
            Self::SetAttribute { name, value, .. } => dom.set_attr(node, name, value),
            Self::RemoveAttribute { name, .. } => dom.remove_attr(node, name),
            Self::AddClass { class, .. } => dom.add_class(node, class),
            Self::RemoveClass { class, .. } => dom.remove_class(node, class),
            Self::SetText { text, .. } => dom.set_text(node, text),
            Self::SetStyle { property, value, .. } => dom.set_style(node, property, value),
        }
    }
}

/// Enter/leave side effect of a step
#[derive(Clone)]
pub enum StepHook {
    /// Declarative effects, loadable from JSON
    Effects(Vec<DomEffect>),
    /// Arbitrary page code
    Callback(Rc<dyn Fn(&mut dyn Dom)>),
}

impl StepHook {
    pub fn callback(f: impl Fn(&mut dyn Dom) + 'static) -> Self {
        Self::Callback(Rc::new(f))
    }

    pub fn run(&self, dom: &mut dyn Dom) {
        match self {
            Self::Effects(effects) => {
                for effect in effects {
                    effect.apply(dom);
                }
            }
            Self::Callback(f) => f(dom),
        }
    }
}

impl fmt::Debug for StepHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Effects(effects) => f.debug_tuple("Effects").field(effects).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

// JSON hooks are plain effect arrays
impl<'de> Deserialize<'de> for StepHook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<DomEffect>::deserialize(deserializer).map(StepHook::Effects)
    }
}

/// One unit of the walkthrough
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Element the spotlight and card point at
    pub target: String,
    /// Content swapped in by `on_enter` that the spotlight moves to
    #[serde(default)]
    pub spotlight: Option<String>,
    #[serde(default)]
    pub wcag: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub screen_reader_preview: String,
    #[serde(default)]
    pub on_enter: Option<StepHook>,
    #[serde(default)]
    pub on_leave: Option<StepHook>,
}

impl Step {
    pub fn new(target: &str, title: &str) -> Self {
        Self {
            target: target.to_string(),
            spotlight: None,
            wcag: String::new(),
            title: title.to_string(),
            description: String::new(),
            impact: None,
            screen_reader_preview: String::new(),
            on_enter: None,
            on_leave: None,
        }
    }

    pub fn with_description(mut self, text: &str) -> Self {
        self.description = text.to_string();
        self
    }

    pub fn with_wcag(mut self, reference: &str) -> Self {
        self.wcag = reference.to_string();
        self
    }

    pub fn with_impact(mut self, text: &str) -> Self {
        self.impact = Some(text.to_string());
        self
    }

    pub fn with_preview(mut self, text: &str) -> Self {
        self.screen_reader_preview = text.to_string();
        self
    }

    pub fn with_spotlight(mut self, selector: &str) -> Self {
        self.spotlight = Some(selector.to_string());
        self
    }

    pub fn with_enter(mut self, hook: StepHook) -> Self {
        self.on_enter = Some(hook);
        self
    }

    pub fn with_leave(mut self, hook: StepHook) -> Self {
        self.on_leave = Some(hook);
        self
    }

    /// Check selectors and required text
    pub fn validate(&self, index: usize) -> Result<(), TourError> {
        let invalid = |reason: String| TourError::InvalidStep { index, reason };

        if self.title.trim().is_empty() {
            return Err(invalid("empty title".to_string()));
        }
        let mut selectors = vec![self.target.as_str()];
        selectors.extend(self.spotlight.as_deref());
        for hook in [&self.on_enter, &self.on_leave].into_iter().flatten() {
            if let StepHook::Effects(effects) = hook {
                selectors.extend(effects.iter().map(DomEffect::selector));
            }
        }
        for selector in selectors {
            Selector::parse(selector).map_err(|e| invalid(e.to_string()))?;
        }
        Ok(())
    }
}

/// Parse and validate a JSON step list
pub fn load_steps(json: &str) -> Result<Vec<Step>, TourError> {
    let steps: Vec<Step> = serde_json::from_str(json)?;
    for (index, step) in steps.iter().enumerate() {
        step.validate(index)?;
    }
    Ok(steps)
}

/// The dashboard page's eight-step tour
pub fn dashboard_steps() -> Result<Vec<Step>, TourError> {
    load_steps(DASHBOARD_TOUR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use wayfind_dom::DomTree;

    #[test]
    fn test_dashboard_tour_loads() {
        let steps = dashboard_steps().unwrap();
        assert_eq!(steps.len(), 8);
        assert_eq!(steps[0].target, ".skip-links");
        assert_eq!(steps[4].spotlight.as_deref(), Some("#asset-drawer"));
        assert!(steps[6].impact.is_some());
        assert!(steps.iter().all(|s| !s.screen_reader_preview.is_empty()));
    }

    #[test]
    fn test_effects_apply_to_first_match() {
        let mut tree = DomTree::new();
        let a = tree.append_element(tree.root(), "a");
        tree.set_attr(a, "class", "skip-link");
        let b = tree.append_element(tree.root(), "a");
        tree.set_attr(b, "class", "skip-link");

        let hook: StepHook = serde_json::from_str(
            r##"[
                {"op": "add_class", "selector": ".skip-link", "class": "skip-link--visible"},
                {"op": "set_style", "selector": ".skip-link", "property": "z-index", "value": "3001"},
                {"op": "set_text", "selector": "#missing", "text": "ignored"}
            ]"##,
        )
        .unwrap();
        hook.run(&mut tree);

        assert!(tree.has_class(a, "skip-link--visible"));
        assert!(!tree.has_class(b, "skip-link--visible"));
        assert_eq!(tree.style(a, "z-index"), Some("3001"));
    }

    #[test]
    fn test_callback_hook() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let hook = StepHook::callback(move |_dom| seen.set(seen.get() + 1));

        let mut tree = DomTree::new();
        hook.run(&mut tree);
        hook.run(&mut tree);
        assert_eq!(calls.get(), 2);
        assert_eq!(format!("{:?}", hook), "Callback(..)");
    }

    #[test]
    fn test_validation() {
        let bad = r#"[{"target": "main > ul", "title": "Nested"}]"#;
        assert!(matches!(load_steps(bad), Err(TourError::InvalidStep { index: 0, .. })));

        let untitled = r#"[{"target": "main", "title": " "}]"#;
        assert!(matches!(load_steps(untitled), Err(TourError::InvalidStep { .. })));

        assert!(matches!(load_steps("{"), Err(TourError::Parse(_))));

        let hooked = Step::new("main", "Main").with_enter(StepHook::Effects(vec![DomEffect::AddClass {
            selector: "[".to_string(),
            class: "x".to_string(),
        }]));
        assert!(hooked.validate(3).is_err());
    }
}
