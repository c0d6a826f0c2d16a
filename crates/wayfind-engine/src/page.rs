//! Page - the runtime a dashboard page talks to
//!
//! Owns the document, the virtual-clock scheduler and every registered
//! component. Collaborators call the announce/trap/position/cycle entry
//! points directly; input goes through `key_down`, `click`, `hover`,
//! `focus` and `resize`; `advance` moves virtual time and runs whatever
//! became due.
//!
//! Key dispatch order: walkthrough, focus traps, tab lists, page
//! shortcuts, F6 landmark cycling, then native sequential `Tab` navigation
//! when nothing prevented the default.

use wayfind_a11y::{
    find_reachable, first_reachable, A11yTask, Announcer, Direction, FocusTraps, LandmarkCycler,
    LandmarkSpec, SkipPredicate, TabList, TabListConfig,
};
use wayfind_dom::{Dom, DomTree, Key, KeyEvent, NodeId, Scheduler};
use wayfind_layout::{LayoutTask, PositionOutcome};
use wayfind_tour::{dashboard_steps, Step, TourContext, TourElements, TourTask, Walkthrough};

use crate::{Config, EngineError, Shortcuts, Tooltips};

/// Deferred work of every component, as queued on the page scheduler
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    A11y(A11yTask),
    Layout(LayoutTask),
    Tour(TourTask),
}

impl From<A11yTask> for Deferred {
    fn from(task: A11yTask) -> Self {
        Self::A11y(task)
    }
}

impl From<LayoutTask> for Deferred {
    fn from(task: LayoutTask) -> Self {
        Self::Layout(task)
    }
}

impl From<TourTask> for Deferred {
    fn from(task: TourTask) -> Self {
        Self::Tour(task)
    }
}

/// A live page
pub struct Page {
    dom: DomTree,
    config: Config,
    scheduler: Scheduler<Deferred>,
    announcer: Announcer,
    traps: FocusTraps,
    landmarks: Option<LandmarkCycler>,
    tabs: Vec<TabList>,
    walkthrough: Option<Walkthrough>,
    tooltips: Tooltips,
    shortcuts: Shortcuts,
}

impl Page {
    /// Create a page runtime over `dom`
    pub fn new(dom: DomTree, config: Config) -> Self {
        let announcer = Announcer::from_document(&dom, &config.live_region_id);
        let shortcuts = Shortcuts::from_document(&dom, &config);
        tracing::info!("Wayfind page runtime {} ready", crate::VERSION);
        Self {
            dom,
            config,
            scheduler: Scheduler::new(),
            announcer,
            traps: FocusTraps::new(),
            landmarks: None,
            tabs: Vec::new(),
            walkthrough: None,
            tooltips: Tooltips::default(),
            shortcuts,
        }
    }

    pub fn dom(&self) -> &DomTree {
        &self.dom
    }

    /// Mutable document access for collaborators (content wiring, tests)
    pub fn dom_mut(&mut self) -> &mut DomTree {
        &mut self.dom
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn has_pending_work(&self) -> bool {
        self.scheduler.has_pending_work()
    }

    pub fn traps(&self) -> &FocusTraps {
        &self.traps
    }

    pub fn landmarks(&self) -> Option<&LandmarkCycler> {
        self.landmarks.as_ref()
    }

    pub fn walkthrough(&self) -> Option<&Walkthrough> {
        self.walkthrough.as_ref()
    }

    pub fn tooltips(&self) -> &Tooltips {
        &self.tooltips
    }

    pub fn shortcuts(&self) -> &Shortcuts {
        &self.shortcuts
    }

    // ------------------------------------------------------------------
    // Collaborator entry points
    // ------------------------------------------------------------------

    /// Push a message to the live region
    pub fn announce(&mut self, text: &str) {
        self.announcer.announce(&mut self.dom, &mut self.scheduler, text);
    }

    pub fn trap_focus(&mut self, container: NodeId) {
        self.traps.activate(container);
    }

    pub fn release_focus(&mut self, container: NodeId) {
        self.traps.deactivate(container);
    }

    /// Place `floating` against `target` with the tooltip metrics
    pub fn position_floating_element(&mut self, target: NodeId, floating: NodeId) -> PositionOutcome {
        self.config.tooltip.position(&mut self.dom, &mut self.scheduler, target, floating)
    }

    /// F6 / Shift+F6. Returns the element that received focus.
    pub fn cycle_landmark(&mut self, direction: Direction) -> Option<NodeId> {
        let cycler = self.landmarks.as_mut()?;
        cycler.cycle(&mut self.dom, &mut self.scheduler, &self.announcer, direction)
    }

    /// Trap `container`, focus `initial_focus` (or the first reachable
    /// element) after the next frame, and announce `message`.
    /// Showing the container is the caller's job.
    pub fn open_dialog(&mut self, container: NodeId, initial_focus: Option<NodeId>, message: Option<&str>) {
        self.traps.activate(container);
        if let Some(target) = initial_focus.or_else(|| first_reachable(&self.dom, container)) {
            self.scheduler.after_paint(A11yTask::Focus(target));
        }
        if let Some(message) = message {
            self.announce(message);
        }
    }

    /// Release `container`, return focus to `restore`, announce `message`
    pub fn close_dialog(&mut self, container: NodeId, restore: Option<NodeId>, message: Option<&str>) {
        self.traps.deactivate(container);
        if let Some(restore) = restore {
            self.dom.focus(restore);
        }
        if let Some(message) = message {
            self.announce(message);
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Resolve landmarks for F6 cycling, replacing any earlier set.
    /// Returns how many resolved to an element.
    pub fn register_landmarks(
        &mut self,
        specs: &[LandmarkSpec],
        skip: Option<SkipPredicate>,
    ) -> Result<usize, EngineError> {
        let mut cycler = LandmarkCycler::from_specs(&self.dom, specs)?
            .with_indicator(&self.config.landmark_indicator_class, self.config.landmark_indicator_ms);
        if let Some(skip) = skip {
            cycler = cycler.with_skip(skip);
        }
        let resolved = cycler.landmarks().iter().filter(|l| l.node.is_some()).count();
        tracing::debug!("Registered {}/{} landmarks", resolved, specs.len());
        self.landmarks = Some(cycler);
        Ok(resolved)
    }

    /// Landmarks and skip overlays from the configuration
    pub fn register_default_landmarks(&mut self) -> Result<usize, EngineError> {
        let skip = self.config.landmark_skip()?;
        let specs = self.config.landmarks.clone();
        self.register_landmarks(&specs, Some(skip))
    }

    /// Bind the tab list under `tablist_selector`. A selector matching
    /// nothing yields an empty tab list.
    pub fn register_tabs(&mut self, tablist_selector: &str) -> Result<&TabList, EngineError> {
        let config = TabListConfig {
            tablist: tablist_selector.to_string(),
            ..self.config.tabs.clone()
        };
        let tabs = TabList::from_document(&self.dom, &config)?;
        tracing::debug!("Registered {} tabs under `{}`", tabs.tabs().len(), tablist_selector);
        self.tabs.push(tabs);
        Ok(&self.tabs[self.tabs.len() - 1])
    }

    /// Install a walkthrough, replacing any earlier one
    pub fn register_walkthrough(&mut self, steps: Vec<Step>, elements: TourElements) -> Result<(), EngineError> {
        for (index, step) in steps.iter().enumerate() {
            step.validate(index)?;
        }
        tracing::debug!("Registered walkthrough with {} steps", steps.len());
        self.walkthrough = Some(Walkthrough::new(steps, elements).with_positioner(self.config.tour));
        Ok(())
    }

    /// The shipped dashboard tour against the `wt-*` chrome
    pub fn register_dashboard_walkthrough(&mut self) -> Result<(), EngineError> {
        let elements = TourElements::from_document(&self.dom)?;
        self.register_walkthrough(dashboard_steps()?, elements)
    }

    /// Bind every `.tooltip` to its `.has-tooltip` parent
    pub fn register_tooltips(&mut self) -> usize {
        self.tooltips = Tooltips::from_document(&self.dom);
        tracing::debug!("Bound {} tooltips", self.tooltips.len());
        self.tooltips.len()
    }

    /// Start the registered walkthrough
    pub fn start_walkthrough(&mut self) -> bool {
        let Self { dom, scheduler, announcer, traps, walkthrough, .. } = self;
        let Some(tour) = walkthrough.as_mut() else {
            return false;
        };
        tour.start(&mut TourContext { dom, scheduler, announcer, traps })
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Key press. Returns true when the default action was prevented.
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        {
            let Self { dom, scheduler, announcer, traps, walkthrough, .. } = self;
            if let Some(tour) = walkthrough.as_mut() {
                if tour.handle_key(&mut TourContext { dom, scheduler, announcer, traps }, event) {
                    return true;
                }
            }
        }

        if self.traps.handle_key(&mut self.dom, event) {
            return true;
        }

        for tabs in &self.tabs {
            if tabs.handle_key(&mut self.dom, &mut self.scheduler, &self.announcer, event) {
                return true;
            }
        }

        if self.shortcuts.handle_key(&mut self.dom, &mut self.scheduler, &self.announcer, event) {
            return true;
        }

        if event.is(Key::F6) && self.landmarks.is_some() {
            let direction = if event.shift { Direction::Backward } else { Direction::Forward };
            self.cycle_landmark(direction);
            return true;
        }

        if event.is(Key::Tab) {
            self.sequential_focus(event.shift);
        }
        false
    }

    /// Native Tab movement over the body's reachable elements, wrapping
    fn sequential_focus(&mut self, backward: bool) {
        let scope = self.dom.select("body").unwrap_or_else(|| self.dom.root());
        let order = find_reachable(&self.dom, scope);
        if order.is_empty() {
            return;
        }
        let len = order.len();
        let current = self.dom.active_element().and_then(|a| order.iter().position(|&n| n == a));
        let next = match (current, backward) {
            (None, false) => 0,
            (None, true) => len - 1,
            (Some(i), false) => (i + 1) % len,
            (Some(i), true) => (i + len - 1) % len,
        };
        self.dom.focus(order[next]);
    }

    /// Pointer click on `node`. Returns true when a component handled it.
    pub fn click(&mut self, node: NodeId) -> bool {
        {
            let Self { dom, scheduler, announcer, traps, walkthrough, .. } = self;
            if let Some(tour) = walkthrough.as_mut() {
                if tour.handle_click(&mut TourContext { dom, scheduler, announcer, traps }, node) {
                    return true;
                }
            }
        }

        for tabs in &self.tabs {
            if tabs.handle_click(&mut self.dom, &mut self.scheduler, &self.announcer, node) {
                return true;
            }
        }
        self.shortcuts.handle_click(&mut self.dom, node)
    }

    /// Pointer entered `node`
    pub fn hover(&mut self, node: NodeId) {
        self.show_tooltips(node);
    }

    /// Move focus to `node`; focusing inside a tooltip parent shows its
    /// tooltip. Returns whether focus moved.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.dom.focus(node) {
            return false;
        }
        self.show_tooltips(node);
        true
    }

    fn show_tooltips(&mut self, node: NodeId) {
        for (parent, tooltip) in self.tooltips.triggered_by(&self.dom, node) {
            self.position_floating_element(parent, tooltip);
        }
    }

    /// Viewport resize
    pub fn resize(&mut self, width: f64, height: f64) {
        self.dom.set_viewport_size(width, height);
        tracing::debug!("Viewport resized to {}x{}", width, height);

        let Self { dom, scheduler, announcer, traps, walkthrough, .. } = self;
        if let Some(tour) = walkthrough.as_mut() {
            tour.handle_resize(&mut TourContext { dom, scheduler, announcer, traps });
        }
    }

    // ------------------------------------------------------------------
    // Event loop
    // ------------------------------------------------------------------

    /// Advance virtual time by `ms`: run the pending frame, then each due
    /// timer in order with a frame after it.
    pub fn advance(&mut self, ms: u64) {
        let target = self.scheduler.now() + ms;
        self.run_frame();
        while let Some(task) = self.scheduler.pop_due(target) {
            self.run(task);
            self.run_frame();
        }
        self.scheduler.advance_to(target);
    }

    fn run_frame(&mut self) {
        for task in self.scheduler.take_frame() {
            self.run(task);
        }
    }

    fn run(&mut self, task: Deferred) {
        tracing::trace!("Running {:?}", task);
        match task {
            Deferred::A11y(task) => wayfind_a11y::run_task(&mut self.dom, task),
            Deferred::Layout(task) => wayfind_layout::run_task(&mut self.dom, task),
            Deferred::Tour(task) => {
                let Self { dom, scheduler, announcer, traps, walkthrough, .. } = self;
                if let Some(tour) = walkthrough.as_mut() {
                    tour.run_task(&mut TourContext { dom, scheduler, announcer, traps }, task);
                }
            }
        }
    }
}
