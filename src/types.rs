// Strong typing over strings. Newtypes for time and scroll units, closed enums for every style token.
// See DESIGN.md: Grounding ledger, src/types.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Duration or instant in milliseconds. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Millis(u64);

impl Millis {
    pub const fn from_millis(ms: u64) -> Self {
        Millis(ms)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Millis) -> Millis {
        Millis(self.0.saturating_add(other.0))
    }
}

/// Scroll position as a percentage of the scrollable distance (0.0 to 100.0).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
pub struct ScrollPercent(f64);

impl ScrollPercent {
    /// Clamps into [0, 100]; NaN and infinities collapse to 0.
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            ScrollPercent(value.clamp(0.0, 100.0))
        } else {
            ScrollPercent(0.0)
        }
    }

    pub fn zero() -> Self {
        ScrollPercent(0.0)
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

/// Handle for a host timer. Allocated by the host, echoed back when the timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u32);

impl TimerId {
    pub fn new(id: u32) -> Self {
        TimerId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Icon rendered next to the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    #[default]
    None,
    Calendar,
    ArrowRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IconPosition {
    Left,
    #[default]
    Right,
}

/// Anchoring corner of the floating button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ShadowLevel {
    None,
    Sm,
    Md,
    Lg,
    #[default]
    Xl,
    #[serde(rename = "2xl")]
    Xxl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HoverEffect {
    None,
    #[default]
    Scale,
    Lift,
    Glow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationType {
    None,
    #[default]
    Fade,
    SlideUp,
    Scale,
}

/// Sticky call-to-action configuration, as saved by the admin dashboard.
/// Every field has a default so partial documents deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyActionConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_text")]
    pub text: String,
    /// `#anchor` for an in-page target, anything else is navigated to normally.
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub icon: Icon,
    #[serde(default)]
    pub icon_position: IconPosition,
    #[serde(default)]
    pub display_rules: DisplayRules,
    #[serde(default)]
    pub position: Position,
    #[serde(default = "default_offset")]
    pub offset_x: f64,
    #[serde(default = "default_offset")]
    pub offset_y: f64,
    #[serde(default)]
    pub style: StickyStyle,
    #[serde(default)]
    pub responsive_overrides: ResponsiveOverrides,
    #[serde(default)]
    pub animation: AnimationSettings,
}

impl Default for StickyActionConfig {
    fn default() -> Self {
        StickyActionConfig {
            enabled: false,
            text: default_text(),
            link: String::new(),
            icon: Icon::default(),
            icon_position: IconPosition::default(),
            display_rules: DisplayRules::default(),
            position: Position::default(),
            offset_x: default_offset(),
            offset_y: default_offset(),
            style: StickyStyle::default(),
            responsive_overrides: ResponsiveOverrides::default(),
            animation: AnimationSettings::default(),
        }
    }
}

impl StickyActionConfig {
    /// Resolve `link` into an in-page anchor or an external destination.
    pub fn link_target(&self) -> LinkTarget {
        LinkTarget::parse(&self.link)
    }
}

fn default_text() -> String {
    "Book Now".to_string()
}

fn default_offset() -> f64 {
    24.0
}

/// When and where the button may appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRules {
    #[serde(default = "default_scroll_percent", alias = "showAfterScroll")]
    pub show_after_scroll_percent: f64,
    #[serde(default, alias = "showAfterDelay")]
    pub show_after_delay_ms: f64,
    #[serde(default = "default_true")]
    pub show_on_mobile: bool,
    #[serde(default = "default_true")]
    pub show_on_desktop: bool,
    /// Substrings matched against the current path.
    #[serde(default)]
    pub excluded_page_patterns: Vec<String>,
}

impl Default for DisplayRules {
    fn default() -> Self {
        DisplayRules {
            show_after_scroll_percent: default_scroll_percent(),
            show_after_delay_ms: 0.0,
            show_on_mobile: true,
            show_on_desktop: true,
            excluded_page_patterns: Vec::new(),
        }
    }
}

impl DisplayRules {
    pub fn scroll_threshold(&self) -> ScrollPercent {
        ScrollPercent::new(self.show_after_scroll_percent)
    }

    /// Clamped to the largest delay a browser timer honors; longer ones fire at once.
    pub fn delay(&self) -> Millis {
        let ms = self.show_after_delay_ms;
        if ms.is_finite() && ms > 0.0 {
            Millis::from_millis(ms.round().min(MAX_TIMER_DELAY_MS as f64) as u64)
        } else {
            Millis::default()
        }
    }

    /// True when any non-blank pattern is a substring of `path`.
    pub fn excludes(&self, path: &str) -> bool {
        self.excluded_page_patterns
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .any(|p| path.contains(p))
    }

    pub fn allows_device(&self, is_mobile: bool) -> bool {
        if is_mobile {
            self.show_on_mobile
        } else {
            self.show_on_desktop
        }
    }
}

/// `setTimeout` stores its delay as a signed 32-bit integer.
pub const MAX_TIMER_DELAY_MS: u64 = i32::MAX as u64;

fn default_scroll_percent() -> f64 {
    30.0
}

fn default_true() -> bool {
    true
}

/// Desktop style tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyStyle {
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_weight")]
    pub font_weight: u16,
    #[serde(default = "default_padding_x")]
    pub padding_x: f64,
    #[serde(default = "default_padding_y")]
    pub padding_y: f64,
    #[serde(default = "default_border_radius")]
    pub border_radius: f64,
    #[serde(default)]
    pub shadow: ShadowLevel,
    #[serde(default)]
    pub hover_effect: HoverEffect,
}

impl Default for StickyStyle {
    fn default() -> Self {
        StickyStyle {
            background_color: default_background(),
            text_color: default_text_color(),
            font_size: default_font_size(),
            font_weight: default_font_weight(),
            padding_x: default_padding_x(),
            padding_y: default_padding_y(),
            border_radius: default_border_radius(),
            shadow: ShadowLevel::default(),
            hover_effect: HoverEffect::default(),
        }
    }
}

fn default_background() -> String {
    "#2f5d50".to_string()
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

fn default_font_size() -> f64 {
    16.0
}

fn default_font_weight() -> u16 {
    600
}

fn default_padding_x() -> f64 {
    28.0
}

fn default_padding_y() -> f64 {
    14.0
}

fn default_border_radius() -> f64 {
    9999.0 // pill
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiveOverrides {
    #[serde(default)]
    pub mobile: MobileOverrides,
}

/// Unset fields fall back to the desktop style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MobileOverrides {
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub padding_x: Option<f64>,
    #[serde(default)]
    pub padding_y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSettings {
    #[serde(default, rename = "type")]
    pub kind: AnimationType,
    #[serde(default = "default_animation_duration", alias = "duration")]
    pub duration_ms: u64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        AnimationSettings {
            kind: AnimationType::default(),
            duration_ms: default_animation_duration(),
        }
    }
}

fn default_animation_duration() -> u64 {
    300
}

/// Where activating the button leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum LinkTarget {
    /// Empty link; activation does nothing.
    None,
    /// In-page element id, without the `#` marker.
    Anchor(String),
    /// Any other destination; the renderer navigates normally.
    External(String),
}

impl LinkTarget {
    pub const ANCHOR_MARKER: char = '#';

    pub fn parse(link: &str) -> Self {
        let link = link.trim();
        if link.is_empty() {
            return LinkTarget::None;
        }
        match link.strip_prefix(Self::ANCHOR_MARKER) {
            Some(id) if !id.trim().is_empty() => LinkTarget::Anchor(id.trim().to_string()),
            Some(_) => LinkTarget::None,
            None => LinkTarget::External(link.to_string()),
        }
    }

    pub fn anchor_id(&self) -> Option<&str> {
        match self {
            LinkTarget::Anchor(id) => Some(id),
            _ => None,
        }
    }
}

// =============================================================================
// Host signals
// =============================================================================

/// Page geometry in CSS pixels, measured by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageMetrics {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub scroll_y: f64,
    /// Total document height.
    pub scroll_height: f64,
}

impl PageMetrics {
    pub fn new(viewport_width: f64, viewport_height: f64, scroll_y: f64, scroll_height: f64) -> Self {
        PageMetrics {
            viewport_width,
            viewport_height,
            scroll_y,
            scroll_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerKind {
    Scroll,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// One-shot `showAfterDelayMs` timer.
    ShowDelay,
    /// Post-scroll fallback check for the anchor target.
    ReachCheck,
}

/// Event delivered by the JS host in a batch.
///
/// An `anchors` map, when present, is a complete snapshot of the tracked
/// elements; ids missing from it no longer exist on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    Scroll {
        #[serde(default)]
        page: Option<PageMetrics>,
        #[serde(default)]
        anchors: Option<HashMap<String, f64>>,
    },
    Resize {
        #[serde(default)]
        page: Option<PageMetrics>,
        #[serde(default)]
        anchors: Option<HashMap<String, f64>>,
    },
    /// Carries a fresh measurement when the host has one, so the reach check
    /// after a smooth scroll sees where the page actually ended up.
    TimerFired {
        timer: TimerId,
        #[serde(default)]
        page: Option<PageMetrics>,
        #[serde(default)]
        anchors: Option<HashMap<String, f64>>,
    },
    Activate,
    ScrollSettled {
        #[serde(default)]
        anchors: Option<HashMap<String, f64>>,
    },
    Teardown,
}

// =============================================================================
// Engine state
// =============================================================================

/// Decision engine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Never shown on this page view.
    Hidden,
    ArmedWaitingScroll,
    ArmedWaitingDelay,
    Visible,
    /// Target reached. Terminal.
    Dismissed,
}

impl Phase {
    pub fn is_armed_or_visible(&self) -> bool {
        matches!(
            self,
            Phase::ArmedWaitingScroll | Phase::ArmedWaitingDelay | Phase::Visible
        )
    }
}

/// Why the engine settled in `Phase::Hidden` at mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenReason {
    Disabled,
    ExcludedPath,
    NoEligibleDevice,
    EnvironmentUnavailable,
}

/// Render decision plus the latches behind it. Owned by one engine for one page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityState {
    pub is_visible: bool,
    pub has_crossed_scroll_threshold: bool,
    pub has_reached_target: bool,
    pub is_mobile_viewport: bool,
}
