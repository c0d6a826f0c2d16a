//! Wayfind Tour
//!
//! Guided walkthrough over live page content: a spotlight around each
//! step's target, a card describing it, and enter/leave hooks that stage
//! the page for the step.
//!
//! Features:
//! - Data-driven steps (JSON via serde)
//! - Hooks as serializable DOM effects or shared callbacks
//! - Spotlight and card placement through the tour positioner
//! - Keyboard, click and resize triggers

pub mod step;
pub mod elements;
pub mod walkthrough;

pub use step::{dashboard_steps, load_steps, DomEffect, Step, StepHook};
pub use elements::TourElements;
pub use walkthrough::{TourContext, TourState, Walkthrough};

use wayfind_dom::NodeId;

/// Deferred work issued by the walkthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourTask {
    /// Re-place spotlight and card once the target scroll settled
    Settle { step: usize, target: NodeId },
    /// Move the spotlight to the step's secondary target
    Spotlight { step: usize },
}

/// Tour error
#[derive(Debug, thiserror::Error)]
pub enum TourError {
    #[error("Tour element #{0} not found")]
    MissingElement(String),

    #[error("Invalid step {index}: {reason}")]
    InvalidStep { index: usize, reason: String },

    #[error("Failed to parse steps: {0}")]
    Parse(#[from] serde_json::Error),
}
