// Viewport/scroll monitor: mobile breakpoint and scroll fraction from host measurements.
// Owns the scroll/resize listener registrations.
// See DESIGN.md: Grounding ledger, src/viewport.rs

use crate::host::Host;
use crate::types::*;

/// Widths below this many CSS pixels count as mobile.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

/// Tracks the latest page measurement and the listeners registered for it.
pub struct ViewportMonitor {
    metrics: Option<PageMetrics>,
    listeners: Vec<ListenerKind>,
}

impl ViewportMonitor {
    pub fn new() -> Self {
        ViewportMonitor {
            metrics: None,
            listeners: Vec::new(),
        }
    }

    /// Register scroll and resize listeners. Repeated calls do not double-register.
    pub fn attach<H: Host + ?Sized>(&mut self, host: &mut H) {
        for kind in [ListenerKind::Scroll, ListenerKind::Resize] {
            if !self.listeners.contains(&kind) {
                host.add_listener(kind);
                self.listeners.push(kind);
            }
        }
    }

    /// Deregister everything `attach` registered. Idempotent.
    pub fn detach<H: Host + ?Sized>(&mut self, host: &mut H) {
        for kind in self.listeners.drain(..) {
            host.remove_listener(kind);
        }
    }

    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Pull a fresh measurement from the host. Keeps the previous one if the host has none.
    pub fn refresh<H: Host + ?Sized>(&mut self, host: &H) -> Option<PageMetrics> {
        if let Some(metrics) = host.page_metrics() {
            self.metrics = Some(metrics);
        }
        self.metrics
    }

    pub fn metrics(&self) -> Option<PageMetrics> {
        self.metrics
    }

    pub fn is_mobile(&self) -> bool {
        self.metrics
            .map(|m| m.viewport_width.is_finite() && m.viewport_width < MOBILE_BREAKPOINT_PX)
            .unwrap_or(false)
    }

    /// Scroll position over the scrollable distance. 0 for pages that do not scroll.
    pub fn scroll_percent(&self) -> ScrollPercent {
        match self.metrics {
            Some(m) => scroll_percent(&m),
            None => ScrollPercent::zero(),
        }
    }
}

impl Default for ViewportMonitor {
    fn default() -> Self {
        Self::new()
    }
}

pub fn scroll_percent(metrics: &PageMetrics) -> ScrollPercent {
    let scrollable = metrics.scroll_height - metrics.viewport_height;
    if !scrollable.is_finite() || scrollable <= 0.0 {
        return ScrollPercent::zero();
    }
    ScrollPercent::new(metrics.scroll_y / scrollable * 100.0)
}
