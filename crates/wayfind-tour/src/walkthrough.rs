//! Walkthrough Engine
//!
//! Owns the current step and drives the overlay: `Inactive` until
//! started, then `Active { current }` with `current` always a valid step
//! index. Every transition runs the outgoing step's `on_leave` before the
//! incoming step's `on_enter`, each exactly once.
//!
//! A step whose target is missing is skipped at render time: the tour
//! stays on the step it was on.

use wayfind_a11y::{A11yTask, Announcer, FocusTraps};
use wayfind_dom::{DOMRect, Dom, Key, KeyEvent, NodeId, Scheduler, Size};
use wayfind_layout::{PositionOutcome, Positioner};

use crate::elements::TourElements;
use crate::step::Step;
use crate::TourTask;

/// Padding between the target and the spotlight edge
const SPOTLIGHT_PADDING: f64 = 8.0;
/// Delay before moving the spotlight to a step's secondary target (ms)
const SPOTLIGHT_DELAY_MS: u64 = 350;
const CARD_MAX_WIDTH: f64 = 420.0;
const CARD_FALLBACK_HEIGHT: f64 = 400.0;

/// Collaborators a walkthrough operation works through
pub struct TourContext<'a, T> {
    pub dom: &'a mut dyn Dom,
    pub scheduler: &'a mut Scheduler<T>,
    pub announcer: &'a Announcer,
    pub traps: &'a mut FocusTraps,
}

impl<T: From<A11yTask>> TourContext<'_, T> {
    fn announce(&mut self, message: &str) {
        self.announcer.announce(self.dom, self.scheduler, message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourState {
    #[default]
    Inactive,
    Active { current: usize },
}

#[derive(Debug)]
pub struct Walkthrough {
    steps: Vec<Step>,
    elements: TourElements,
    state: TourState,
    positioner: Positioner,
}

impl Walkthrough {
    pub fn new(steps: Vec<Step>, elements: TourElements) -> Self {
        Self {
            steps,
            elements,
            state: TourState::Inactive,
            positioner: Positioner::tour(),
        }
    }

    /// Override the card placement metrics
    pub fn with_positioner(mut self, positioner: Positioner) -> Self {
        self.positioner = positioner;
        self
    }

    pub fn state(&self) -> TourState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TourState::Active { .. })
    }

    pub fn current(&self) -> Option<usize> {
        match self.state {
            TourState::Active { current } => Some(current),
            TourState::Inactive => None,
        }
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.current().and_then(|i| self.steps.get(i))
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn elements(&self) -> &TourElements {
        &self.elements
    }

    /// Open the overlay on the first step
    pub fn start<T>(&mut self, ctx: &mut TourContext<'_, T>) -> bool
    where
        T: From<A11yTask> + From<TourTask>,
    {
        if self.is_active() {
            return false;
        }
        let Some(first) = self.steps.first() else {
            return false;
        };
        if ctx.dom.select(&first.target).is_none() {
            tracing::debug!("Tour not started: `{}` missing", first.target);
            return false;
        }
        tracing::info!("Starting walkthrough ({} steps)", self.steps.len());

        for &(panel, toggle) in &self.elements.suppress {
            ctx.dom.set_attr(panel, "aria-hidden", "true");
            if let Some(toggle) = toggle {
                ctx.dom.set_attr(toggle, "aria-expanded", "false");
            }
        }
        let el = &self.elements;
        ctx.dom.set_attr(el.overlay, "aria-hidden", "false");
        ctx.dom.set_style(el.overlay, "display", "block");
        if let Some(body) = el.body {
            ctx.dom.set_style(body, "overflow", "hidden");
        }

        self.render_step(ctx, 0);
        ctx.traps.activate(self.elements.card);
        ctx.scheduler.after_paint(A11yTask::Focus(self.elements.close));
        true
    }

    /// Show step `index`. Returns false when the step or its target is
    /// missing; nothing changes in that case.
    pub fn render_step<T>(&mut self, ctx: &mut TourContext<'_, T>, index: usize) -> bool
    where
        T: From<A11yTask> + From<TourTask>,
    {
        let Some(step) = self.steps.get(index) else {
            return false;
        };
        let Some(target) = ctx.dom.select(&step.target) else {
            tracing::debug!("Skipping step {}: `{}` missing", index, step.target);
            return false;
        };

        if let TourState::Active { current } = self.state {
            if let Some(hook) = self.steps.get(current).and_then(|s| s.on_leave.as_ref()) {
                hook.run(ctx.dom);
            }
        }
        self.state = TourState::Active { current: index };
        if let Some(hook) = &step.on_enter {
            hook.run(ctx.dom);
        }

        let total = self.steps.len();
        let el = &self.elements;
        ctx.dom.set_text(el.counter, &format!("{} / {}", index + 1, total));
        ctx.dom.set_text(el.wcag, &step.wcag);
        ctx.dom.set_text(el.title, &step.title);
        ctx.dom.set_text(el.description, &step.description);
        ctx.dom.set_text(el.impact, step.impact.as_deref().unwrap_or(""));
        ctx.dom.set_text(el.preview, &step.screen_reader_preview);

        ctx.dom.set_style(el.prev, "display", if index == 0 { "none" } else { "" });
        ctx.dom.set_text(el.next, if index + 1 == total { "Close" } else { "Next" });

        let mut dots = ctx.dom.children(el.progress);
        if dots.len() != total {
            ctx.dom.clear_children(el.progress);
            dots = (0..total)
                .map(|_| {
                    let dot = ctx.dom.create_element("span");
                    ctx.dom.append_child(el.progress, dot);
                    dot
                })
                .collect();
        }
        for (i, dot) in dots.into_iter().enumerate() {
            let class = if i == index { "wt-card__dot wt-card__dot--active" } else { "wt-card__dot" };
            ctx.dom.set_attr(dot, "class", class);
        }

        self.position_on(ctx, target, index, false);
        if step.spotlight.is_some() {
            ctx.scheduler.after(SPOTLIGHT_DELAY_MS, TourTask::Spotlight { step: index });
        }

        tracing::debug!("Walkthrough step {}/{}: {}", index + 1, total, step.title);
        ctx.announce(&format!("Step {} of {}: {}", index + 1, total, step.title));
        true
    }

    /// Advance, or end the tour from the last step
    pub fn next<T>(&mut self, ctx: &mut TourContext<'_, T>) -> bool
    where
        T: From<A11yTask> + From<TourTask>,
    {
        match self.state {
            TourState::Active { current } if current + 1 < self.steps.len() => {
                self.render_step(ctx, current + 1)
            }
            TourState::Active { .. } => self.end(ctx),
            TourState::Inactive => false,
        }
    }

    /// Go back one step; no-op on the first
    pub fn previous<T>(&mut self, ctx: &mut TourContext<'_, T>) -> bool
    where
        T: From<A11yTask> + From<TourTask>,
    {
        match self.state {
            TourState::Active { current } if current > 0 => self.render_step(ctx, current - 1),
            _ => false,
        }
    }

    /// Close the overlay and return focus to the launcher
    pub fn end<T>(&mut self, ctx: &mut TourContext<'_, T>) -> bool
    where
        T: From<A11yTask> + From<TourTask>,
    {
        let TourState::Active { current } = self.state else {
            return false;
        };
        if let Some(hook) = self.steps.get(current).and_then(|s| s.on_leave.as_ref()) {
            hook.run(ctx.dom);
        }
        self.state = TourState::Inactive;

        let el = &self.elements;
        ctx.dom.set_attr(el.overlay, "aria-hidden", "true");
        ctx.dom.set_style(el.overlay, "display", "none");
        if let Some(body) = el.body {
            ctx.dom.set_style(body, "overflow", "");
        }
        ctx.traps.deactivate(el.card);
        ctx.dom.focus(el.launcher);

        tracing::info!("Walkthrough ended at step {}", current + 1);
        ctx.announce("Tour ended");
        true
    }

    /// Escape ends the tour; arrows step within range. Arrow keys are
    /// consumed while active even when there is nowhere to go.
    pub fn handle_key<T>(&mut self, ctx: &mut TourContext<'_, T>, event: &KeyEvent) -> bool
    where
        T: From<A11yTask> + From<TourTask>,
    {
        let TourState::Active { current } = self.state else {
            return false;
        };
        match event.key {
            Key::Escape => {
                self.end(ctx);
                true
            }
            Key::ArrowRight => {
                if current + 1 < self.steps.len() {
                    self.render_step(ctx, current + 1);
                }
                true
            }
            Key::ArrowLeft => {
                if current > 0 {
                    self.render_step(ctx, current - 1);
                }
                true
            }
            _ => false,
        }
    }

    /// Launcher, close, next and previous controls (including clicks on
    /// their descendants), and the overlay backdrop itself.
    pub fn handle_click<T>(&mut self, ctx: &mut TourContext<'_, T>, node: NodeId) -> bool
    where
        T: From<A11yTask> + From<TourTask>,
    {
        let el = &self.elements;
        let (overlay, launcher, close, next, prev) = (el.overlay, el.launcher, el.close, el.next, el.prev);

        if !self.is_active() {
            return ctx.dom.contains(launcher, node) && self.start(ctx);
        }
        if node == overlay || ctx.dom.contains(close, node) {
            self.end(ctx);
            return true;
        }
        if ctx.dom.contains(next, node) {
            self.next(ctx);
            return true;
        }
        if ctx.dom.contains(prev, node) {
            self.previous(ctx);
            return true;
        }
        false
    }

    /// Re-place spotlight and card against the current target
    pub fn handle_resize<T>(&mut self, ctx: &mut TourContext<'_, T>)
    where
        T: From<A11yTask> + From<TourTask>,
    {
        let Some(current) = self.current() else {
            return;
        };
        if let Some(target) = ctx.dom.select(&self.steps[current].target) {
            self.position_on(ctx, target, current, false);
        }
    }

    /// Execute a task scheduled by this walkthrough. Tasks for a step the
    /// tour has since left are dropped.
    pub fn run_task<T>(&mut self, ctx: &mut TourContext<'_, T>, task: TourTask)
    where
        T: From<A11yTask> + From<TourTask>,
    {
        let step = match task {
            TourTask::Settle { step, .. } | TourTask::Spotlight { step } => step,
        };
        if self.current() != Some(step) {
            tracing::trace!("Dropping {:?}: tour moved on", task);
            return;
        }
        match task {
            TourTask::Settle { step, target } => self.position_on(ctx, target, step, true),
            TourTask::Spotlight { step } => {
                let spot = self.steps[step]
                    .spotlight
                    .as_deref()
                    .and_then(|sel| ctx.dom.select(sel));
                if let Some(spot) = spot {
                    self.position_on(ctx, spot, step, false);
                }
            }
        }
    }

    fn card_size(&self, dom: &mut dyn Dom) -> Size {
        let viewport = dom.viewport();
        let height = dom
            .natural_size(self.elements.card)
            .map(|s| s.height)
            .filter(|h| *h > 0.0)
            .unwrap_or(CARD_FALLBACK_HEIGHT);
        Size::new(CARD_MAX_WIDTH.min(viewport.width - 32.0), height)
    }

    /// Spotlight `target` and place the card beside it through the tour
    /// positioner. Off-screen or unrendered targets hide the spotlight.
    fn position_on<T>(&self, ctx: &mut TourContext<'_, T>, target: NodeId, step: usize, settled: bool)
    where
        T: From<TourTask>,
    {
        let el = &self.elements;
        let viewport = ctx.dom.viewport();
        let size = self.card_size(ctx.dom);

        let spot = match ctx.dom.rect(target).filter(|r| !viewport.is_fully_outside(r)) {
            Some(rect) => rect.inflate(SPOTLIGHT_PADDING),
            None => DOMRect::from_xywh(-9999.0, -9999.0, 0.0, 0.0),
        };
        ctx.dom.place(el.spotlight, spot);

        let outcome = if settled {
            self.positioner.settle_sized(ctx.dom, target, el.card, size)
        } else {
            let settle = TourTask::Settle { step, target };
            self.positioner.position_sized(ctx.dom, ctx.scheduler, target, el.card, size, settle)
        };
        if outcome == PositionOutcome::MissingReference {
            self.positioner.apply(ctx.dom, el.card, size, &Positioner::centred(size, &viewport));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepHook;
    use wayfind_dom::DomTree;

    #[derive(Debug)]
    enum Task {
        A11y(A11yTask),
        Tour(TourTask),
    }

    impl From<A11yTask> for Task {
        fn from(t: A11yTask) -> Self {
            Task::A11y(t)
        }
    }

    impl From<TourTask> for Task {
        fn from(t: TourTask) -> Self {
            Task::Tour(t)
        }
    }

    struct Harness {
        tree: DomTree,
        sched: Scheduler<Task>,
        announcer: Announcer,
        traps: FocusTraps,
        targets: Vec<NodeId>,
    }

    impl Harness {
        fn new() -> (Self, TourElements) {
            let mut tree = DomTree::with_viewport(1280.0, 800.0);
            let body = tree.append_element(tree.root(), "body");
            let region = tree.append_element(body, "div");
            tree.set_attr(region, "id", "live-region");

            let button = |tree: &mut DomTree, parent: NodeId, x: f64| {
                let b = tree.append_element(parent, "button");
                tree.set_layout(b, DOMRect::from_xywh(x, 20.0, 40.0, 30.0));
                b
            };
            let launcher = button(&mut tree, body, 1200.0);
            let overlay = tree.append_element(body, "div");
            let spotlight = tree.append_element(overlay, "div");
            let card = tree.append_element(overlay, "div");
            tree.set_intrinsic_size(card, Size::new(360.0, 240.0));
            let close = button(&mut tree, card, 300.0);
            let prev = button(&mut tree, card, 350.0);
            let next = button(&mut tree, card, 400.0);
            let texts: Vec<NodeId> = (0..7).map(|_| tree.append_element(card, "p")).collect();

            let targets = (0..3)
                .map(|i| {
                    let t = tree.append_element(body, "section");
                    tree.set_attr(t, "id", &format!("target-{}", i));
                    tree.set_layout(t, DOMRect::from_xywh(100.0, 200.0 + 120.0 * i as f64, 300.0, 100.0));
                    t
                })
                .collect();

            let elements = TourElements {
                overlay,
                spotlight,
                card,
                launcher,
                close,
                prev,
                next,
                counter: texts[0],
                wcag: texts[1],
                title: texts[2],
                description: texts[3],
                impact: texts[4],
                preview: texts[5],
                progress: texts[6],
                body: Some(body),
                suppress: vec![],
            };
            let announcer = Announcer::new(Some(region));
            (Self { tree, sched: Scheduler::new(), announcer, traps: FocusTraps::new(), targets }, elements)
        }

        fn ctx(&mut self) -> TourContext<'_, Task> {
            TourContext {
                dom: &mut self.tree,
                scheduler: &mut self.sched,
                announcer: &self.announcer,
                traps: &mut self.traps,
            }
        }
    }

    fn steps() -> Vec<Step> {
        (0..3)
            .map(|i| {
                Step::new(&format!("#target-{}", i), &format!("Step {}", i))
                    .with_enter(StepHook::callback(move |dom| {
                        if let Some(n) = dom.get_element_by_id(&format!("target-{}", i)) {
                            dom.add_class(n, "entered");
                        }
                    }))
                    .with_leave(StepHook::callback(move |dom| {
                        if let Some(n) = dom.get_element_by_id(&format!("target-{}", i)) {
                            dom.remove_class(n, "entered");
                            dom.add_class(n, "left");
                        }
                    }))
            })
            .collect()
    }

    #[test]
    fn test_start_renders_first_step() {
        let (mut h, elements) = Harness::new();
        let mut tour = Walkthrough::new(steps(), elements.clone());

        assert!(tour.start(&mut h.ctx()));
        assert_eq!(tour.state(), TourState::Active { current: 0 });
        assert_eq!(h.tree.text(elements.counter), "1 / 3");
        assert_eq!(h.tree.text(elements.next), "Next");
        assert_eq!(h.tree.style(elements.prev, "display"), Some("none"));
        assert_eq!(h.tree.style(elements.overlay, "display"), Some("block"));
        assert!(h.tree.has_class(h.targets[0], "entered"));
        assert!(!h.tree.has_class(h.targets[0], "left"));
        assert!(h.traps.is_active(elements.card));

        let dots = h.tree.children(elements.progress);
        assert_eq!(dots.len(), 3);
        assert!(h.tree.has_class(dots[0], "wt-card__dot--active"));
        assert!(!h.tree.has_class(dots[1], "wt-card__dot--active"));

        // Spotlight hugs the target
        assert_eq!(h.tree.rect(elements.spotlight), Some(DOMRect::from_xywh(92.0, 192.0, 316.0, 116.0)));
        assert!(!tour.start(&mut h.ctx()));
    }

    #[test]
    fn test_last_step_labels_close() {
        let (mut h, elements) = Harness::new();
        let mut tour = Walkthrough::new(steps(), elements.clone());
        tour.start(&mut h.ctx());
        tour.next(&mut h.ctx());
        tour.next(&mut h.ctx());

        assert_eq!(tour.current(), Some(2));
        assert_eq!(h.tree.text(elements.next), "Close");
        assert_eq!(h.tree.style(elements.prev, "display"), None);
    }

    #[test]
    fn test_progress_dots_reused() {
        let (mut h, elements) = Harness::new();
        let mut tour = Walkthrough::new(steps(), elements.clone());
        tour.start(&mut h.ctx());
        let dots = h.tree.children(elements.progress);
        let nodes = h.tree.len();

        tour.next(&mut h.ctx());
        tour.previous(&mut h.ctx());
        tour.next(&mut h.ctx());

        assert_eq!(h.tree.children(elements.progress), dots);
        assert!(h.tree.has_class(dots[1], "wt-card__dot--active"));
        assert!(!h.tree.has_class(dots[0], "wt-card__dot--active"));
        assert_eq!(h.tree.len(), nodes);
    }

    #[test]
    fn test_missing_target_is_skipped() {
        let (mut h, elements) = Harness::new();
        let mut all = steps();
        all[1].target = "#nowhere".to_string();
        let mut tour = Walkthrough::new(all, elements);
        tour.start(&mut h.ctx());

        assert!(!tour.next(&mut h.ctx()));
        assert_eq!(tour.current(), Some(0));
        assert!(h.tree.has_class(h.targets[0], "entered"));
    }

    #[test]
    fn test_start_requires_first_target() {
        let (mut h, elements) = Harness::new();
        let mut all = steps();
        all[0].target = "#nowhere".to_string();
        let mut tour = Walkthrough::new(all, elements.clone());

        assert!(!tour.start(&mut h.ctx()));
        assert_eq!(tour.state(), TourState::Inactive);
        assert_eq!(h.tree.attr(elements.overlay, "aria-hidden"), None);

        let mut empty = Walkthrough::new(vec![], elements);
        assert!(!empty.start(&mut h.ctx()));
    }

    #[test]
    fn test_previous_at_first_is_noop() {
        let (mut h, elements) = Harness::new();
        let mut tour = Walkthrough::new(steps(), elements);
        tour.start(&mut h.ctx());
        assert!(!tour.previous(&mut h.ctx()));
        assert_eq!(tour.current(), Some(0));
    }

    #[test]
    fn test_stale_tasks_dropped() {
        let (mut h, elements) = Harness::new();
        let mut tour = Walkthrough::new(steps(), elements.clone());
        tour.start(&mut h.ctx());
        tour.next(&mut h.ctx());

        let before = h.tree.rect(elements.spotlight);
        let stale = TourTask::Settle { step: 0, target: h.targets[0] };
        tour.run_task(&mut h.ctx(), stale);
        assert_eq!(h.tree.rect(elements.spotlight), before);
    }

    #[test]
    fn test_offscreen_target_centres_card() {
        let (mut h, elements) = Harness::new();
        h.tree.set_layout(h.targets[0], DOMRect::from_xywh(2000.0, 200.0, 100.0, 100.0));
        let mut tour = Walkthrough::new(steps(), elements.clone());
        tour.start(&mut h.ctx());

        assert_eq!(h.tree.rect(elements.spotlight), Some(DOMRect::from_xywh(-9999.0, -9999.0, 0.0, 0.0)));
        assert_eq!(h.tree.rect(elements.card), Some(DOMRect::from_xywh(430.0, 280.0, 420.0, 240.0)));
        assert_eq!(h.tree.attr(elements.card, "data-placement"), Some("center"));
    }
}
