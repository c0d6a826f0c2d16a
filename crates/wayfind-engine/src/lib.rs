//! Wayfind Engine
//!
//! Page runtime for the focus and attention subsystem: owns the document
//! handle, the scheduler and every registered component, and dispatches
//! input to them in a fixed order.
//!
//! # Example
//! ```rust,ignore
//! use wayfind_engine::{Config, Page};
//!
//! let mut page = Page::new(dashboard_document(), Config::default());
//! page.register_dashboard_walkthrough()?;
//! page.click(launcher);
//! page.advance(16);
//! ```

mod config;
mod page;
#[cfg(any(test, feature = "sample"))]
pub mod sample;
pub mod shortcuts;
pub mod tooltips;

pub use config::Config;
pub use page::{Deferred, Page};
pub use shortcuts::Shortcuts;
pub use tooltips::Tooltips;

// Re-export sub-crates for advanced usage
pub use wayfind_dom as dom;
pub use wayfind_a11y as a11y;
pub use wayfind_layout as layout;
pub use wayfind_tour as tour;

use tracing_subscriber::EnvFilter;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install a `tracing` subscriber honouring `RUST_LOG` (default `info`).
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[source] serde_json::Error),

    #[error("DOM error: {0}")]
    Dom(#[from] wayfind_dom::DomError),

    #[error("Accessibility error: {0}")]
    A11y(#[from] wayfind_a11y::A11yError),

    #[error("Tour error: {0}")]
    Tour(#[from] wayfind_tour::TourError),
}
