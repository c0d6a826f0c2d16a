//! Live Region Announcer
//!
//! Pushes status messages to the page's `aria-live` region.
//!
//! Every call clears the region and writes the message on the next
//! frame, so assistive technology sees a change even when the same
//! message is announced twice. There is no queue: a second call before
//! the frame runs simply wins.

use wayfind_dom::{Dom, NodeId, Scheduler};

use crate::A11yTask;

/// Single-slot announcer bound to one live region
#[derive(Debug, Clone, Default)]
pub struct Announcer {
    region: Option<NodeId>,
}

impl Announcer {
    /// Id the dashboard pages give their live region
    pub const DEFAULT_REGION_ID: &'static str = "live-region";

    pub fn new(region: Option<NodeId>) -> Self {
        Self { region }
    }

    /// Bind to the element with the given id, if present
    pub fn from_document(dom: &dyn Dom, region_id: &str) -> Self {
        let region = dom.get_element_by_id(region_id);
        if region.is_none() {
            tracing::warn!("No live region #{}; announcements are dropped", region_id);
        }
        Self { region }
    }

    pub fn region(&self) -> Option<NodeId> {
        self.region
    }

    /// Announce `message`: clear now, write after the next paint
    pub fn announce<T: From<A11yTask>>(&self, dom: &mut dyn Dom, scheduler: &mut Scheduler<T>, message: &str) {
        let Some(region) = self.region else {
            return;
        };
        tracing::debug!("announce: {}", message);
        dom.set_text(region, "");
        scheduler.after_paint(A11yTask::WriteLiveRegion {
            region,
            text: message.to_string(),
        });
    }
}
