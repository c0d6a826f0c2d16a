//! Wayfind Layout
//!
//! Placement of floating elements (tooltips, tour cards, spotlights)
//! against a reference element inside the current viewport.

mod space;
pub mod positioner;

pub use space::EdgeSpace;
pub use positioner::{
    LayoutTask, PlacementDecision, PositionOutcome, Positioner, Side,
};

use wayfind_dom::Dom;

/// Execute a task scheduled by this crate
pub fn run_task(dom: &mut dyn Dom, task: LayoutTask) {
    match task {
        LayoutTask::Reposition { positioner, reference, floating } => {
            let outcome = positioner.settle(dom, reference, floating);
            tracing::trace!("Settled reposition of {}: {:?}", floating, outcome);
        }
    }
}
