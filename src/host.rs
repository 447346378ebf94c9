// Host boundary: read-only page queries plus the side effects the engine may request.
// The engine never touches the DOM; JS executes the buffered commands.
// See DESIGN.md: Grounding ledger, src/host.rs

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Everything the engine needs from the page it lives on.
///
/// Reads are soft-fail: `None` means "unknown", never an error.
pub trait Host {
    /// Current page geometry, or `None` when there is no window/document.
    fn page_metrics(&self) -> Option<PageMetrics>;

    /// Bounding-rect top of the element with this id, relative to the viewport.
    fn element_top(&self, anchor_id: &str) -> Option<f64>;

    fn add_listener(&mut self, kind: ListenerKind);

    fn remove_listener(&mut self, kind: ListenerKind);

    fn set_timer(&mut self, kind: TimerKind, delay: Millis) -> TimerId;

    fn clear_timer(&mut self, timer: TimerId);

    /// Request a smooth scroll to the element with this id.
    fn scroll_to_anchor(&mut self, anchor_id: &str);
}

/// Side effect for JS to execute after a call into the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum HostCommand {
    AddListener { kind: ListenerKind },
    RemoveListener { kind: ListenerKind },
    SetTimer { timer: TimerId, kind: TimerKind, delay_ms: u64 },
    ClearTimer { timer: TimerId },
    ScrollToAnchor { anchor_id: String },
}

/// Host that mirrors the last measurements pushed from JS and buffers commands.
#[derive(Debug, Default)]
pub struct BufferedHost {
    page: Option<PageMetrics>,
    anchors: HashMap<String, f64>,
    next_timer: u32,
    pending_timers: BTreeSet<TimerId>,
    commands: Vec<HostCommand>,
}

impl BufferedHost {
    pub fn new(page: Option<PageMetrics>) -> Self {
        BufferedHost {
            page,
            ..Default::default()
        }
    }

    /// Replace the page measurement. A `None` keeps the previous one.
    pub fn update_page(&mut self, page: Option<PageMetrics>) {
        if page.is_some() {
            self.page = page;
        }
    }

    /// Replace the anchor tops with a fresh snapshot. A `None` keeps the previous one.
    pub fn update_anchors(&mut self, anchors: Option<HashMap<String, f64>>) {
        if let Some(anchors) = anchors {
            self.anchors = anchors;
        }
    }

    /// Mark a timer as delivered so it no longer counts as pending.
    pub fn timer_fired(&mut self, timer: TimerId) {
        self.pending_timers.remove(&timer);
    }

    pub fn pending_timers(&self) -> usize {
        self.pending_timers.len()
    }

    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Host for BufferedHost {
    fn page_metrics(&self) -> Option<PageMetrics> {
        self.page
    }

    fn element_top(&self, anchor_id: &str) -> Option<f64> {
        self.anchors.get(anchor_id).copied()
    }

    fn add_listener(&mut self, kind: ListenerKind) {
        self.commands.push(HostCommand::AddListener { kind });
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        self.commands.push(HostCommand::RemoveListener { kind });
    }

    fn set_timer(&mut self, kind: TimerKind, delay: Millis) -> TimerId {
        self.next_timer = self.next_timer.wrapping_add(1);
        let timer = TimerId::new(self.next_timer);
        self.pending_timers.insert(timer);
        self.commands.push(HostCommand::SetTimer {
            timer,
            kind,
            delay_ms: delay.as_millis(),
        });
        timer
    }

    fn clear_timer(&mut self, timer: TimerId) {
        if self.pending_timers.remove(&timer) {
            self.commands.push(HostCommand::ClearTimer { timer });
        }
    }

    fn scroll_to_anchor(&mut self, anchor_id: &str) {
        self.commands.push(HostCommand::ScrollToAnchor {
            anchor_id: anchor_id.to_string(),
        });
    }
}
