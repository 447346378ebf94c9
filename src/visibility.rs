// Visibility decision engine: the only writer of VisibilityState.
// Rule: Hidden is decided once at mount; Dismissed is terminal; device filtering is a reversible mask.
// See DESIGN.md: Grounding ledger, src/visibility.rs

use tracing::{debug, trace};

use crate::host::Host;
use crate::presentation::{render_directive, RenderDirective};
use crate::target::{TargetTracker, REACH_CHECK_DELAY};
use crate::types::*;
use crate::viewport::ViewportMonitor;

/// Slack when comparing measured scroll against the threshold; browsers report fractional pixels.
const SCROLL_EPSILON: f64 = 1e-6;

/// Decides whether the sticky action shows for one page view.
///
/// Driven entirely by host events: `on_scroll`, `on_resize`, `on_timer`,
/// `activate`, `on_scroll_settled` and `teardown`. None of them can fail.
pub struct StickyEngine<H: Host> {
    config: StickyActionConfig,
    host: H,
    monitor: ViewportMonitor,
    tracker: Option<TargetTracker>,
    phase: Phase,
    hidden_reason: Option<HiddenReason>,
    state: VisibilityState,
    delay_timer: Option<TimerId>,
    reach_timer: Option<TimerId>,
    torn_down: bool,
}

impl<H: Host> StickyEngine<H> {
    /// Mount on `path`. Permanent ineligibility is settled here; otherwise arming starts.
    pub fn mount(config: StickyActionConfig, path: &str, host: H) -> Self {
        let tracker = TargetTracker::for_link(&config.link_target());
        let mut engine = StickyEngine {
            config,
            host,
            monitor: ViewportMonitor::new(),
            tracker,
            phase: Phase::Hidden,
            hidden_reason: None,
            state: VisibilityState::default(),
            delay_timer: None,
            reach_timer: None,
            torn_down: false,
        };

        let has_environment = engine.monitor.refresh(&engine.host).is_some();
        engine.state.is_mobile_viewport = engine.monitor.is_mobile();

        let reason = permanent_hidden_reason(&engine.config, path).or(if has_environment {
            None
        } else {
            Some(HiddenReason::EnvironmentUnavailable)
        });

        match reason {
            Some(reason) => {
                debug!(?reason, path, "sticky.hidden");
                engine.hidden_reason = Some(reason);
            }
            None => engine.arm(),
        }
        engine.sync();
        engine
    }

    pub fn on_scroll(&mut self) {
        if !self.is_active() {
            trace!(phase = ?self.phase, "sticky.scroll.ignored");
            return;
        }
        self.monitor.refresh(&self.host);
        self.evaluate_scroll();
        self.evaluate_target();
        self.sync();
    }

    /// Recompute the device class. Leaving the eligible class hides without dismissing.
    pub fn on_resize(&mut self) {
        if !self.is_active() {
            trace!(phase = ?self.phase, "sticky.resize.ignored");
            return;
        }
        self.monitor.refresh(&self.host);
        self.state.is_mobile_viewport = self.monitor.is_mobile();
        self.evaluate_scroll();
        self.evaluate_target();
        self.sync();
    }

    pub fn on_timer(&mut self, timer: TimerId) {
        if self.torn_down {
            trace!(timer = timer.as_u32(), "sticky.timer.after_teardown");
            return;
        }
        if self.delay_timer == Some(timer) {
            self.delay_timer = None;
            if self.phase == Phase::ArmedWaitingDelay {
                self.enter(Phase::Visible);
            }
        } else if self.reach_timer == Some(timer) {
            self.reach_timer = None;
            self.monitor.refresh(&self.host);
            self.evaluate_target();
        } else {
            trace!(timer = timer.as_u32(), "sticky.timer.stale");
            return;
        }
        self.sync();
    }

    /// The button was clicked. Anchor links request a smooth scroll and schedule
    /// the fallback reach check; other links are left to the renderer.
    pub fn activate(&mut self) -> LinkTarget {
        let target = self.config.link_target();
        if self.torn_down || self.phase == Phase::Hidden {
            return target;
        }
        if let LinkTarget::Anchor(anchor_id) = &target {
            debug!(anchor = %anchor_id, "sticky.activate");
            self.host.scroll_to_anchor(anchor_id);
            if self.is_active() && self.tracker.is_some() {
                self.cancel_reach_check();
                self.reach_timer = Some(self.host.set_timer(TimerKind::ReachCheck, REACH_CHECK_DELAY));
            }
        }
        target
    }

    /// Explicit smooth-scroll completion from hosts that can observe it.
    /// Supersedes the pending fallback check.
    pub fn on_scroll_settled(&mut self) {
        if !self.is_active() {
            return;
        }
        self.cancel_reach_check();
        self.monitor.refresh(&self.host);
        self.evaluate_target();
        self.sync();
    }

    /// Deregister listeners and cancel timers. Safe to call any number of times.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.cancel_timers();
        self.monitor.detach(&mut self.host);
        self.sync();
        debug!(phase = ?self.phase, "sticky.teardown");
    }

    pub fn directive(&self) -> RenderDirective {
        render_directive(&self.config, &self.state)
    }

    pub fn config(&self) -> &StickyActionConfig {
        &self.config
    }

    pub fn state(&self) -> &VisibilityState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn hidden_reason(&self) -> Option<HiddenReason> {
        self.hidden_reason
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn is_active(&self) -> bool {
        !self.torn_down && self.phase.is_armed_or_visible()
    }

    fn arm(&mut self) {
        self.monitor.attach(&mut self.host);
        if self.config.display_rules.scroll_threshold().is_zero() {
            self.cross_scroll_threshold();
        } else {
            self.enter(Phase::ArmedWaitingScroll);
            // The page may already be scrolled (reload, back navigation).
            self.evaluate_scroll();
        }
        self.evaluate_target();
    }

    fn evaluate_scroll(&mut self) {
        if self.phase != Phase::ArmedWaitingScroll {
            return;
        }
        let threshold = self.config.display_rules.scroll_threshold().as_f64();
        if self.monitor.scroll_percent().as_f64() + SCROLL_EPSILON >= threshold {
            self.cross_scroll_threshold();
        }
    }

    fn cross_scroll_threshold(&mut self) {
        self.state.has_crossed_scroll_threshold = true;
        let delay = self.config.display_rules.delay();
        if delay.is_zero() {
            self.enter(Phase::Visible);
        } else {
            self.delay_timer = Some(self.host.set_timer(TimerKind::ShowDelay, delay));
            self.enter(Phase::ArmedWaitingDelay);
        }
    }

    fn evaluate_target(&mut self) {
        if !self.is_active() {
            return;
        }
        let reached = self
            .tracker
            .as_ref()
            .map(|tracker| tracker.is_reached(&self.host))
            .unwrap_or(false);
        if reached {
            self.dismiss();
        }
    }

    fn dismiss(&mut self) {
        self.state.has_reached_target = true;
        self.cancel_timers();
        // Nothing can move a dismissed engine, so stop listening.
        self.monitor.detach(&mut self.host);
        self.enter(Phase::Dismissed);
    }

    fn cancel_reach_check(&mut self) {
        if let Some(timer) = self.reach_timer.take() {
            self.host.clear_timer(timer);
        }
    }

    fn cancel_timers(&mut self) {
        if let Some(timer) = self.delay_timer.take() {
            self.host.clear_timer(timer);
        }
        self.cancel_reach_check();
    }

    fn enter(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "sticky.transition");
            self.phase = phase;
        }
    }

    fn sync(&mut self) {
        let visible = !self.torn_down
            && self.phase == Phase::Visible
            && self
                .config
                .display_rules
                .allows_device(self.state.is_mobile_viewport);
        if visible != self.state.is_visible {
            debug!(visible, mobile = self.state.is_mobile_viewport, "sticky.visibility");
            self.state.is_visible = visible;
        }
    }
}

impl<H: Host> Drop for StickyEngine<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Reasons that hold for the whole page view regardless of scroll, time or viewport.
pub fn permanent_hidden_reason(config: &StickyActionConfig, path: &str) -> Option<HiddenReason> {
    let rules = &config.display_rules;
    if !config.enabled {
        Some(HiddenReason::Disabled)
    } else if rules.excludes(path) {
        Some(HiddenReason::ExcludedPath)
    } else if !rules.show_on_mobile && !rules.show_on_desktop {
        Some(HiddenReason::NoEligibleDevice)
    } else {
        None
    }
}
