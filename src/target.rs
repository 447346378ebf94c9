// Target tracker: has the in-page anchor the button links to scrolled into the reach zone?
// Missing elements and missing measurements read as "not reached".
// See DESIGN.md: Grounding ledger, src/target.rs

use tracing::trace;

use crate::host::Host;
use crate::types::*;

/// Top edge must sit within this fraction of the viewport height, measured from the top.
pub const REACH_ZONE_FRACTION: f64 = 0.3;

/// Delay before re-checking the target after a programmatic smooth scroll.
/// Smooth-scroll completion is not observable everywhere; the value was tuned by hand.
pub const REACH_CHECK_DELAY: Millis = Millis::from_millis(800);

/// Tracks one anchor target for the lifetime of a page view.
pub struct TargetTracker {
    anchor_id: String,
}

impl TargetTracker {
    /// Tracker for the link's anchor, or `None` when the link is not an in-page anchor.
    pub fn for_link(link: &LinkTarget) -> Option<Self> {
        link.anchor_id().map(|id| TargetTracker {
            anchor_id: id.to_string(),
        })
    }

    pub fn anchor_id(&self) -> &str {
        &self.anchor_id
    }

    pub fn is_reached<H: Host + ?Sized>(&self, host: &H) -> bool {
        is_target_reached(host, &self.anchor_id)
    }
}

/// True when the element's top edge is between 0 and 30% of the viewport height.
pub fn is_target_reached<H: Host + ?Sized>(host: &H, anchor_id: &str) -> bool {
    let Some(page) = host.page_metrics() else {
        return false;
    };
    let Some(top) = host.element_top(anchor_id) else {
        trace!(anchor = %anchor_id, "target.missing");
        return false;
    };
    let height = page.viewport_height;
    if !top.is_finite() || !height.is_finite() || height <= 0.0 {
        return false;
    }
    top >= 0.0 && top <= height * REACH_ZONE_FRACTION
}
