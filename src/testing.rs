// Deterministic host for tests: fake clock, recorded timers and listeners, scripted geometry.

use std::collections::{BTreeMap, HashMap};

use crate::host::Host;
use crate::types::*;
use crate::visibility::StickyEngine;

pub struct FakeHost {
    page: Option<PageMetrics>,
    anchors: HashMap<String, f64>,
    now: Millis,
    next_timer: u32,
    timers: BTreeMap<TimerId, (Millis, TimerKind)>,
    listeners: HashMap<ListenerKind, usize>,
    scroll_requests: Vec<String>,
}

impl FakeHost {
    pub fn new(page: PageMetrics) -> Self {
        FakeHost {
            page: Some(page),
            anchors: HashMap::new(),
            now: Millis::default(),
            next_timer: 0,
            timers: BTreeMap::new(),
            listeners: HashMap::new(),
            scroll_requests: Vec::new(),
        }
    }

    /// 1280x800 desktop viewport over a 4000px document, scrolled to the top.
    pub fn desktop() -> Self {
        Self::new(PageMetrics::new(1280.0, 800.0, 0.0, 4000.0))
    }

    /// 390x800 phone viewport over a 4000px document, scrolled to the top.
    pub fn mobile() -> Self {
        Self::new(PageMetrics::new(390.0, 800.0, 0.0, 4000.0))
    }

    /// No window or document at all.
    pub fn unavailable() -> Self {
        let mut host = Self::desktop();
        host.page = None;
        host
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if let Some(page) = self.page.as_mut() {
            page.viewport_width = width;
            page.viewport_height = height;
        }
    }

    pub fn scroll_to_percent(&mut self, percent: f64) {
        if let Some(page) = self.page.as_mut() {
            let scrollable = (page.scroll_height - page.viewport_height).max(0.0);
            page.scroll_y = scrollable * percent / 100.0;
        }
    }

    pub fn set_anchor_top(&mut self, anchor_id: &str, top: f64) {
        self.anchors.insert(anchor_id.to_string(), top);
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_timer_kinds(&self) -> Vec<TimerKind> {
        self.timers.values().map(|(_, kind)| *kind).collect()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.values().sum()
    }

    pub fn scroll_requests(&self) -> &[String] {
        &self.scroll_requests
    }

    /// Move the clock forward and return the timers that came due, earliest first.
    pub fn advance(&mut self, by: Millis) -> Vec<TimerId> {
        self.now = self.now.saturating_add(by);
        let now = self.now;
        let mut due: Vec<(Millis, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, (at, _))| *at <= now)
            .map(|(id, (at, _))| (*at, *id))
            .collect();
        due.sort();
        for (_, id) in &due {
            self.timers.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }
}

impl Host for FakeHost {
    fn page_metrics(&self) -> Option<PageMetrics> {
        self.page
    }

    fn element_top(&self, anchor_id: &str) -> Option<f64> {
        self.anchors.get(anchor_id).copied()
    }

    fn add_listener(&mut self, kind: ListenerKind) {
        *self.listeners.entry(kind).or_default() += 1;
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        let count = self.listeners.entry(kind).or_default();
        assert!(*count > 0, "removed a {kind:?} listener that was never added");
        *count -= 1;
    }

    fn set_timer(&mut self, kind: TimerKind, delay: Millis) -> TimerId {
        self.next_timer += 1;
        let id = TimerId::new(self.next_timer);
        self.timers.insert(id, (self.now.saturating_add(delay), kind));
        id
    }

    fn clear_timer(&mut self, timer: TimerId) {
        self.timers.remove(&timer);
    }

    fn scroll_to_anchor(&mut self, anchor_id: &str) {
        self.scroll_requests.push(anchor_id.to_string());
    }
}

/// Advance the fake clock and deliver every timer that came due.
pub fn advance(engine: &mut StickyEngine<FakeHost>, ms: u64) {
    let fired = engine.host_mut().advance(Millis::from_millis(ms));
    for timer in fired {
        engine.on_timer(timer);
    }
}

/// Scroll the fake page and deliver the scroll event.
pub fn scroll_to(engine: &mut StickyEngine<FakeHost>, percent: f64) {
    engine.host_mut().scroll_to_percent(percent);
    engine.on_scroll();
}

/// Resize the fake viewport and deliver the resize event.
pub fn resize_to(engine: &mut StickyEngine<FakeHost>, width: f64) {
    let height = engine
        .host()
        .page_metrics()
        .map(|p| p.viewport_height)
        .unwrap_or(800.0);
    engine.host_mut().resize(width, height);
    engine.on_resize();
}
