//! Landmark Cycling
//!
//! F6 / Shift+F6 navigation over a page-supplied, ordered list of named
//! regions. Each page builds its own cycler; the cursor lives in the
//! instance and starts before the first landmark.

use serde::{Deserialize, Serialize};
use wayfind_dom::{Dom, NodeId, Scheduler, Selector};

use crate::announcer::Announcer;
use crate::reachability::first_reachable;
use crate::{A11yError, A11yTask};

/// Landmark declared by selector, resolved at registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkSpec {
    pub selector: String,
    pub name: String,
}

impl LandmarkSpec {
    pub fn new(selector: &str, name: &str) -> Self {
        Self {
            selector: selector.to_string(),
            name: name.to_string(),
        }
    }
}

/// Registered landmark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landmark {
    /// Region element; `None` when nothing matched at registration
    pub node: Option<NodeId>,
    /// Name used in announcements
    pub name: String,
}

impl Landmark {
    pub fn new(node: Option<NodeId>, name: &str) -> Self {
        Self {
            node,
            name: name.to_string(),
        }
    }
}

/// Suppresses cycling while it returns true (e.g. a modal is open)
pub type SkipPredicate = Box<dyn Fn(&dyn Dom) -> bool>;

/// Cycle direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

pub struct LandmarkCycler {
    landmarks: Vec<Landmark>,
    cursor: Option<usize>,
    skip: Option<SkipPredicate>,
    indicator_class: String,
    indicator_ms: u64,
}

impl std::fmt::Debug for LandmarkCycler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LandmarkCycler")
            .field("landmarks", &self.landmarks)
            .field("cursor", &self.cursor)
            .field("skip", &self.skip.is_some())
            .field("indicator_class", &self.indicator_class)
            .field("indicator_ms", &self.indicator_ms)
            .finish()
    }
}

impl LandmarkCycler {
    pub const DEFAULT_INDICATOR_CLASS: &'static str = "landmark-focus-ring";
    pub const DEFAULT_INDICATOR_MS: u64 = 700;

    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self {
            landmarks,
            cursor: None,
            skip: None,
            indicator_class: Self::DEFAULT_INDICATOR_CLASS.to_string(),
            indicator_ms: Self::DEFAULT_INDICATOR_MS,
        }
    }

    /// Resolve each spec's selector against the document.
    /// Unmatched selectors register a landmark with no element.
    pub fn from_specs(dom: &dyn Dom, specs: &[LandmarkSpec]) -> Result<Self, A11yError> {
        let mut landmarks = Vec::with_capacity(specs.len());
        for spec in specs {
            let selector = Selector::parse(&spec.selector)?;
            let node = dom.query_selector(dom.root(), &selector);
            if node.is_none() {
                tracing::warn!("Landmark `{}` ({}) not found", spec.name, spec.selector);
            }
            landmarks.push(Landmark::new(node, &spec.name));
        }
        Ok(Self::new(landmarks))
    }

    pub fn with_skip(mut self, skip: SkipPredicate) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Class applied to the focused region and how long it stays
    pub fn with_indicator(mut self, class: &str, duration_ms: u64) -> Self {
        self.indicator_class = class.to_string();
        self.indicator_ms = duration_ms;
        self
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Index of the last landmark cycled to
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    fn step(&self, direction: Direction) -> usize {
        let len = self.landmarks.len();
        match (direction, self.cursor) {
            (Direction::Forward, None) => 0,
            (Direction::Forward, Some(c)) => (c + 1) % len,
            // Retreating from "before the first" (-1) skips the last landmark
            (Direction::Backward, None) => (len + len - 2) % len,
            (Direction::Backward, Some(c)) => (c + len - 1) % len,
        }
    }

    /// Move to the next or previous landmark and focus into it.
    /// Returns the element that received focus.
    pub fn cycle<T: From<A11yTask>>(
        &mut self,
        dom: &mut dyn Dom,
        scheduler: &mut Scheduler<T>,
        announcer: &Announcer,
        direction: Direction,
    ) -> Option<NodeId> {
        if self.landmarks.is_empty() {
            return None;
        }
        if self.skip.as_ref().is_some_and(|skip| skip(&*dom)) {
            tracing::trace!("Landmark cycling suppressed");
            return None;
        }

        let index = self.step(direction);
        self.cursor = Some(index);
        let landmark = &self.landmarks[index];
        let region = landmark.node?;

        let target = match first_reachable(&*dom, region) {
            Some(node) => node,
            None => {
                dom.set_attr(region, "tabindex", "-1");
                region
            }
        };
        dom.focus(target);

        dom.add_class(region, &self.indicator_class);
        scheduler.after(self.indicator_ms, A11yTask::RemoveClass {
            node: region,
            class: self.indicator_class.clone(),
        });

        tracing::debug!("Landmark {} ({}) -> focus {}", index, landmark.name, target);
        announcer.announce(dom, scheduler, &format!("{} landmark", landmark.name));
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_task;
    use proptest::prelude::*;
    use wayfind_dom::{DOMRect, DomTree};

    struct Fixture {
        tree: DomTree,
        header: NodeId,
        search: NodeId,
        main: NodeId,
        region: NodeId,
    }

    fn fixture() -> Fixture {
        let mut tree = DomTree::new();
        let body = tree.append_element(tree.root(), "body");
        let header = tree.append_element(body, "header");
        tree.set_layout(header, DOMRect::from_xywh(0.0, 0.0, 1280.0, 64.0));
        let search = tree.append_element(header, "input");
        tree.set_layout(search, DOMRect::from_xywh(400.0, 16.0, 300.0, 32.0));
        let main = tree.append_element(body, "main");
        tree.set_attr(main, "id", "main-content");
        tree.set_layout(main, DOMRect::from_xywh(0.0, 64.0, 1280.0, 700.0));
        let region = tree.append_element(body, "div");
        tree.set_attr(region, "id", "live-region");
        Fixture { tree, header, search, main, region }
    }

    fn cycler() -> LandmarkCycler {
        LandmarkCycler::new(vec![])
    }

    #[test]
    fn test_first_cycle_lands_on_first() {
        let mut f = fixture();
        let announcer = Announcer::new(Some(f.region));
        let mut sched: Scheduler<A11yTask> = Scheduler::new();
        let mut cycler = LandmarkCycler::new(vec![
            Landmark::new(Some(f.header), "Header"),
            Landmark::new(Some(f.main), "Main content"),
        ]);

        let focused = cycler.cycle(&mut f.tree, &mut sched, &announcer, Direction::Forward);
        assert_eq!(focused, Some(f.search));
        assert_eq!(cycler.cursor(), Some(0));
        assert!(f.tree.has_class(f.header, "landmark-focus-ring"));

        for task in sched.advance(16) {
            run_task(&mut f.tree, task);
        }
        assert_eq!(f.tree.text(f.region), "Header landmark");
    }

    #[test]
    fn test_region_itself_focused_when_empty() {
        let mut f = fixture();
        let announcer = Announcer::new(Some(f.region));
        let mut sched: Scheduler<A11yTask> = Scheduler::new();
        let mut cycler = LandmarkCycler::new(vec![
            Landmark::new(Some(f.main), "Main content"),
            Landmark::new(Some(f.header), "Header"),
        ]);

        let focused = cycler.cycle(&mut f.tree, &mut sched, &announcer, Direction::Backward);
        assert_eq!(cycler.cursor(), Some(0));
        assert_eq!(focused, Some(f.main));
        assert_eq!(f.tree.attr(f.main, "tabindex"), Some("-1"));
        assert_eq!(f.tree.active_element(), Some(f.main));
    }

    #[test]
    fn test_indicator_clears_after_delay() {
        let mut f = fixture();
        let announcer = Announcer::new(Some(f.region));
        let mut sched: Scheduler<A11yTask> = Scheduler::new();
        let mut cycler = LandmarkCycler::new(vec![Landmark::new(Some(f.main), "Main content")]);

        cycler.cycle(&mut f.tree, &mut sched, &announcer, Direction::Forward);
        for task in sched.advance(699) {
            run_task(&mut f.tree, task);
        }
        assert!(f.tree.has_class(f.main, "landmark-focus-ring"));

        for task in sched.advance(1) {
            run_task(&mut f.tree, task);
        }
        assert!(!f.tree.has_class(f.main, "landmark-focus-ring"));
    }

    #[test]
    fn test_skip_predicate_freezes_cursor() {
        let mut f = fixture();
        let announcer = Announcer::new(Some(f.region));
        let mut sched: Scheduler<A11yTask> = Scheduler::new();
        let mut cycler = LandmarkCycler::new(vec![Landmark::new(Some(f.header), "Header")])
            .with_skip(Box::new(|dom: &dyn Dom| dom.get_element_by_id("main-content").is_some()));

        assert_eq!(cycler.cycle(&mut f.tree, &mut sched, &announcer, Direction::Forward), None);
        assert_eq!(cycler.cursor(), None);
        assert!(!sched.has_pending_work());
        assert_eq!(f.tree.active_element(), None);
    }

    #[test]
    fn test_unresolved_landmark_advances_cursor_only() {
        let mut f = fixture();
        let announcer = Announcer::new(Some(f.region));
        let mut sched: Scheduler<A11yTask> = Scheduler::new();
        let mut cycler = LandmarkCycler::new(vec![
            Landmark::new(None, "Filters"),
            Landmark::new(Some(f.main), "Main content"),
        ]);

        assert_eq!(cycler.cycle(&mut f.tree, &mut sched, &announcer, Direction::Forward), None);
        assert_eq!(cycler.cursor(), Some(0));
        assert!(!sched.has_pending_work());
    }

    #[test]
    fn test_first_backward_cycle_from_before_start() {
        let mut f = fixture();
        let announcer = Announcer::new(Some(f.region));
        let mut sched: Scheduler<A11yTask> = Scheduler::new();

        let mut three = LandmarkCycler::new(vec![
            Landmark::new(Some(f.header), "Header"),
            Landmark::new(None, "Filters"),
            Landmark::new(Some(f.main), "Main content"),
        ]);
        three.cycle(&mut f.tree, &mut sched, &announcer, Direction::Backward);
        assert_eq!(three.cursor(), Some(1));

        let mut one = LandmarkCycler::new(vec![Landmark::new(Some(f.main), "Main content")]);
        one.cycle(&mut f.tree, &mut sched, &announcer, Direction::Backward);
        assert_eq!(one.cursor(), Some(0));
    }

    #[test]
    fn test_empty_registry() {
        let mut f = fixture();
        let announcer = Announcer::new(Some(f.region));
        let mut sched: Scheduler<A11yTask> = Scheduler::new();
        let mut cycler = cycler();

        assert_eq!(cycler.cycle(&mut f.tree, &mut sched, &announcer, Direction::Backward), None);
        assert!(cycler.is_empty());
    }

    #[test]
    fn test_from_specs() {
        let f = fixture();
        let cycler = LandmarkCycler::from_specs(&f.tree, &[
            LandmarkSpec::new("header", "Header"),
            LandmarkSpec::new("#filters", "Filters"),
            LandmarkSpec::new("#main-content", "Main content"),
        ])
        .unwrap();

        let nodes: Vec<_> = cycler.landmarks().iter().map(|l| l.node).collect();
        assert_eq!(nodes, vec![Some(f.header), None, Some(f.main)]);

        let err = LandmarkCycler::from_specs(&f.tree, &[LandmarkSpec::new("main > ul", "List")]);
        assert!(err.is_err());
    }

    #[test]
    fn test_specs_from_json() {
        let specs: Vec<LandmarkSpec> = serde_json::from_str(
            r##"[{"selector": "header", "name": "Header"}, {"selector": "#main-content", "name": "Main content"}]"##,
        )
        .unwrap();
        assert_eq!(specs[1], LandmarkSpec::new("#main-content", "Main content"));
    }

    proptest! {
        #[test]
        fn prop_full_cycle_returns_to_start(len in 1usize..8, start in 0usize..16) {
            let mut tree = DomTree::new();
            let body = tree.append_element(tree.root(), "body");
            let landmarks = (0..len)
                .map(|i| {
                    let node = tree.append_element(body, "section");
                    tree.set_layout(node, DOMRect::from_xywh(0.0, 100.0 * i as f64, 400.0, 90.0));
                    Landmark::new(Some(node), &format!("Section {}", i))
                })
                .collect();
            let announcer = Announcer::new(None);
            let mut sched: Scheduler<A11yTask> = Scheduler::new();
            let mut cycler = LandmarkCycler::new(landmarks);

            for _ in 0..=start {
                cycler.cycle(&mut tree, &mut sched, &announcer, Direction::Forward);
            }
            let origin = cycler.cursor();
            for _ in 0..len {
                cycler.cycle(&mut tree, &mut sched, &announcer, Direction::Forward);
            }
            prop_assert_eq!(cycler.cursor(), origin);
            for _ in 0..len {
                cycler.cycle(&mut tree, &mut sched, &announcer, Direction::Backward);
            }
            prop_assert_eq!(cycler.cursor(), origin);
        }
    }
}
