// sticky_action: Rust/WASM engine for the sticky call-to-action button.
// See DESIGN.md for architecture. All rules live here; JS measures, runs commands, and paints.

mod config;
mod error;
mod host;
mod presentation;
mod target;
mod types;
mod viewport;
mod visibility;

#[cfg(test)]
mod testing;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use config::{config_from_value, load_config, merge_json};
pub use error::EngineError;
pub use host::{BufferedHost, Host, HostCommand};
pub use presentation::{
    box_shadow, hover_style, position_style, render_directive, AnimationStyle, Colors,
    HorizontalAnchor, HoverStyle, Padding, PositionStyle, RenderDirective, Typography,
};
pub use target::{is_target_reached, TargetTracker, REACH_CHECK_DELAY, REACH_ZONE_FRACTION};
pub use types::*;
pub use viewport::{scroll_percent, ViewportMonitor, MOBILE_BREAKPOINT_PX};
pub use visibility::{permanent_hidden_reason, StickyEngine};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of one batch call, returned to JS as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct FrameOutput {
    pub directive: RenderDirective,
    pub state: VisibilityState,
    pub phase: Phase,
    pub commands: Vec<HostCommand>,
}

/// Sticky action engine exposed to JavaScript.
/// Batch interface: JS sends measured events, gets back the directive and the commands to run.
#[wasm_bindgen]
pub struct StickyAction {
    engine: StickyEngine<BufferedHost>,
    on_change: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl StickyAction {
    /// Mount on `path`. `page_json` is the current `PageMetrics`, or `null` when
    /// there is no usable window. Call `drain_commands` afterwards for the
    /// listeners and timers requested at mount.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, path: &str, page_json: &str) -> Result<StickyAction, JsValue> {
        Self::mount_json(config_json, path, page_json).map_err(to_js)
    }

    /// Apply a JSON array of host events in order and return a `FrameOutput` JSON.
    pub fn handle_events(&mut self, events_json: &str) -> Result<String, JsValue> {
        let was_visible = self.engine.is_visible();
        let output = self.apply_events_json(events_json).map_err(to_js)?;
        if was_visible != output.directive.visible {
            self.notify(&output.directive);
        }
        serde_json::to_string(&output).map_err(|e| to_js(e.into()))
    }

    /// Current render directive as JSON.
    pub fn directive(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.directive()).map_err(|e| to_js(e.into()))
    }

    /// Inline CSS for the current directive.
    pub fn css(&self) -> String {
        self.engine.directive().css_declarations()
    }

    pub fn is_visible(&self) -> bool {
        self.engine.is_visible()
    }

    /// Commands buffered since the last batch, as JSON.
    pub fn drain_commands(&mut self) -> Result<String, JsValue> {
        let commands = self.engine.host_mut().drain_commands();
        serde_json::to_string(&commands).map_err(|e| to_js(e.into()))
    }

    /// Called with the directive JSON whenever visibility flips during `handle_events`.
    pub fn set_on_change(&mut self, callback: js_sys::Function) {
        self.on_change = Some(callback);
    }

    /// Tear down and return the final commands (listener removal, timer clears) as JSON.
    pub fn teardown(&mut self) -> Result<String, JsValue> {
        self.engine.teardown();
        self.drain_commands()
    }
}

impl StickyAction {
    fn mount_json(config_json: &str, path: &str, page_json: &str) -> Result<StickyAction, EngineError> {
        let config = load_config(config_json)?;
        let page: Option<PageMetrics> = serde_json::from_str(page_json)
            .map_err(|e| EngineError::InvalidEvent(format!("page metrics: {}", e)))?;
        Ok(StickyAction {
            engine: StickyEngine::mount(config, path, BufferedHost::new(page)),
            on_change: None,
        })
    }

    fn apply_events_json(&mut self, events_json: &str) -> Result<FrameOutput, EngineError> {
        let events: Vec<HostEvent> = serde_json::from_str(events_json)
            .map_err(|e| EngineError::InvalidEvent(e.to_string()))?;
        for event in events {
            self.dispatch(event);
        }
        Ok(self.frame())
    }

    fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::Scroll { page, anchors } => {
                let host = self.engine.host_mut();
                host.update_page(page);
                host.update_anchors(anchors);
                self.engine.on_scroll();
            }
            HostEvent::Resize { page, anchors } => {
                let host = self.engine.host_mut();
                host.update_page(page);
                host.update_anchors(anchors);
                self.engine.on_resize();
            }
            HostEvent::TimerFired {
                timer,
                page,
                anchors,
            } => {
                let host = self.engine.host_mut();
                host.timer_fired(timer);
                host.update_page(page);
                host.update_anchors(anchors);
                self.engine.on_timer(timer);
            }
            HostEvent::Activate => {
                self.engine.activate();
            }
            HostEvent::ScrollSettled { anchors } => {
                self.engine.host_mut().update_anchors(anchors);
                self.engine.on_scroll_settled();
            }
            HostEvent::Teardown => self.engine.teardown(),
        }
    }

    fn frame(&mut self) -> FrameOutput {
        FrameOutput {
            directive: self.engine.directive(),
            state: *self.engine.state(),
            phase: self.engine.phase(),
            commands: self.engine.host_mut().drain_commands(),
        }
    }

    fn notify(&self, directive: &RenderDirective) {
        let Some(callback) = &self.on_change else {
            return;
        };
        match serde_json::to_string(directive) {
            Ok(json) => {
                if callback.call1(&JsValue::NULL, &JsValue::from_str(&json)).is_err() {
                    tracing::warn!("sticky.on_change.threw");
                }
            }
            Err(err) => tracing::warn!(error = %err, "sticky.on_change.serialize"),
        }
    }
}

fn to_js(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
