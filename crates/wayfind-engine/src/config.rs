//! Engine Configuration

use serde::{Deserialize, Serialize};
use wayfind_a11y::{Announcer, LandmarkCycler, LandmarkSpec, SkipPredicate, TabListConfig};
use wayfind_dom::{Dom, Selector};
use wayfind_layout::Positioner;

use crate::EngineError;

/// Page runtime configuration. Every field has a dashboard default, so a
/// JSON document only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Id of the `aria-live` region
    pub live_region_id: String,

    /// Tooltip placement metrics
    pub tooltip: Positioner,

    /// Walkthrough card placement metrics
    pub tour: Positioner,

    /// Class flashed on a landmark reached with F6
    pub landmark_indicator_class: String,

    /// How long the landmark class stays (ms)
    pub landmark_indicator_ms: u64,

    /// Landmarks cycled with F6, in order
    pub landmarks: Vec<LandmarkSpec>,

    /// Overlays that suspend landmark cycling while `aria-hidden="false"`
    pub landmark_skip_open: Vec<String>,

    /// Tab list and panel naming
    pub tabs: TabListConfig,

    /// Field focused by Ctrl/Cmd+K
    pub search_input_id: String,

    /// Keyboard help bar toggled with `?`
    pub help_bar_id: String,

    /// Button that closes the help bar
    pub help_close_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            live_region_id: Announcer::DEFAULT_REGION_ID.to_string(),
            tooltip: Positioner::tooltip(),
            tour: Positioner::tour(),
            landmark_indicator_class: LandmarkCycler::DEFAULT_INDICATOR_CLASS.to_string(),
            landmark_indicator_ms: LandmarkCycler::DEFAULT_INDICATOR_MS,
            landmarks: vec![
                LandmarkSpec::new("[role=\"banner\"]", "Header"),
                LandmarkSpec::new("#main-nav", "Navigation"),
                LandmarkSpec::new("#main-content", "Main content"),
            ],
            landmark_skip_open: [
                "#edit-modal-overlay",
                "#delete-modal-overlay",
                "#asset-drawer",
                "#wt-overlay",
                "#welcome-modal-overlay",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            tabs: TabListConfig::default(),
            search_input_id: "search-input".to_string(),
            help_bar_id: "kbd-help-bar".to_string(),
            help_close_id: "kbd-help-close".to_string(),
        }
    }
}

impl Config {
    /// Parse a JSON configuration, filling missing keys with defaults
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(EngineError::Config)
    }

    /// Skip predicate for landmark cycling built from
    /// `landmark_skip_open`. Selectors are parsed once, here.
    pub fn landmark_skip(&self) -> Result<SkipPredicate, EngineError> {
        let selectors = self
            .landmark_skip_open
            .iter()
            .map(|s| Selector::parse(s))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Box::new(move |dom: &dyn Dom| {
            selectors.iter().any(|sel| {
                dom.query_selector(dom.root(), sel)
                    .is_some_and(|node| dom.attr(node, "aria-hidden") == Some("false"))
            })
        }))
    }
}
