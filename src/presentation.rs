// Presentation mapper: (config, state) -> render directive for the JS renderer.
// Pure. Every style/position token maps through a closed match, never a string lookup.
// See DESIGN.md: Grounding ledger, src/presentation.rs

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Everything the renderer needs to paint (or remove) the button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDirective {
    pub visible: bool,
    pub position: PositionStyle,
    pub colors: Colors,
    pub typography: Typography,
    pub padding: Padding,
    pub border_radius_px: f64,
    pub box_shadow: String,
    pub hover: HoverStyle,
    pub icon: Icon,
    pub icon_position: IconPosition,
    pub animation: AnimationStyle,
    pub text: String,
    pub action: LinkTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionStyle {
    pub bottom_px: f64,
    pub horizontal: HorizontalAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "anchor", rename_all = "snake_case")]
pub enum HorizontalAnchor {
    Left { px: f64 },
    Right { px: f64 },
    /// `left: 50%` plus a `translateX(-50%)` transform.
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colors {
    pub background: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_size_px: f64,
    pub font_weight: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Padding {
    pub x_px: f64,
    pub y_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HoverStyle {
    pub transform: Option<String>,
    pub box_shadow: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationStyle {
    pub kind: AnimationType,
    pub duration_ms: u64,
}

const CENTER_TRANSFORM: &str = "translateX(-50%)";

/// Map configuration and current state to a directive. Mobile overrides apply
/// when `state.is_mobile_viewport` is set.
pub fn render_directive(config: &StickyActionConfig, state: &VisibilityState) -> RenderDirective {
    let style = &config.style;
    let mobile = &config.responsive_overrides.mobile;
    let pick = |over: Option<f64>, base: f64| match over {
        Some(value) if state.is_mobile_viewport => value,
        _ => base,
    };

    let font_size = pick(mobile.font_size, style.font_size);
    let padding_x = pick(mobile.padding_x, style.padding_x);
    let padding_y = pick(mobile.padding_y, style.padding_y);

    RenderDirective {
        visible: state.is_visible,
        position: position_style(config.position, config.offset_x, config.offset_y),
        colors: Colors {
            background: style.background_color.clone(),
            text: style.text_color.clone(),
        },
        typography: Typography {
            font_size_px: finite_or(font_size, 16.0),
            font_weight: style.font_weight,
        },
        padding: Padding {
            x_px: finite_or(padding_x, 28.0),
            y_px: finite_or(padding_y, 14.0),
        },
        border_radius_px: finite_or(style.border_radius, 9999.0),
        box_shadow: box_shadow(style.shadow).to_string(),
        hover: hover_style(style.hover_effect, config.position),
        icon: config.icon,
        icon_position: config.icon_position,
        animation: AnimationStyle {
            kind: config.animation.kind,
            duration_ms: config.animation.duration_ms,
        },
        text: config.text.clone(),
        action: config.link_target(),
    }
}

pub fn position_style(position: Position, offset_x: f64, offset_y: f64) -> PositionStyle {
    let offset_x = finite_or(offset_x, 24.0);
    let horizontal = match position {
        Position::BottomLeft => HorizontalAnchor::Left { px: offset_x },
        Position::BottomCenter => HorizontalAnchor::Center,
        Position::BottomRight => HorizontalAnchor::Right { px: offset_x },
    };
    PositionStyle {
        bottom_px: finite_or(offset_y, 24.0),
        horizontal,
    }
}

pub fn box_shadow(level: ShadowLevel) -> &'static str {
    match level {
        ShadowLevel::None => "none",
        ShadowLevel::Sm => "0 1px 2px 0 rgba(0, 0, 0, 0.05)",
        ShadowLevel::Md => "0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -2px rgba(0, 0, 0, 0.1)",
        ShadowLevel::Lg => "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -4px rgba(0, 0, 0, 0.1)",
        ShadowLevel::Xl => "0 20px 25px -5px rgba(0, 0, 0, 0.1), 0 8px 10px -6px rgba(0, 0, 0, 0.1)",
        ShadowLevel::Xxl => "0 25px 50px -12px rgba(0, 0, 0, 0.25)",
    }
}

/// Hover transform keeps the centering translate so the button does not jump.
pub fn hover_style(effect: HoverEffect, position: Position) -> HoverStyle {
    let base = match position {
        Position::BottomCenter => Some(CENTER_TRANSFORM),
        Position::BottomLeft | Position::BottomRight => None,
    };
    let with_base = |t: &str| match base {
        Some(b) => format!("{b} {t}"),
        None => t.to_string(),
    };
    match effect {
        HoverEffect::None => HoverStyle::default(),
        HoverEffect::Scale => HoverStyle {
            transform: Some(with_base("scale(1.05)")),
            box_shadow: None,
        },
        HoverEffect::Lift => HoverStyle {
            transform: Some(with_base("translateY(-2px)")),
            box_shadow: None,
        },
        HoverEffect::Glow => HoverStyle {
            transform: None,
            box_shadow: Some("0 0 24px rgba(255, 255, 255, 0.45)".to_string()),
        },
    }
}

impl RenderDirective {
    /// Inline style for the resting state of the button.
    pub fn css_declarations(&self) -> String {
        let mut css = format!("position: fixed; bottom: {}px; ", self.position.bottom_px);
        match self.position.horizontal {
            HorizontalAnchor::Left { px } => css.push_str(&format!("left: {px}px; ")),
            HorizontalAnchor::Right { px } => css.push_str(&format!("right: {px}px; ")),
            HorizontalAnchor::Center => {
                css.push_str(&format!("left: 50%; transform: {CENTER_TRANSFORM}; "))
            }
        }
        css.push_str(&format!(
            "z-index: 50; background-color: {}; color: {}; font-size: {}px; font-weight: {}; \
             padding: {}px {}px; border-radius: {}px; box-shadow: {};",
            self.colors.background,
            self.colors.text,
            self.typography.font_size_px,
            self.typography.font_weight,
            self.padding.y_px,
            self.padding.x_px,
            self.border_radius_px,
            self.box_shadow,
        ));
        if self.animation.kind != AnimationType::None {
            css.push_str(&format!(
                " transition: opacity {d}ms ease, transform {d}ms ease;",
                d = self.animation.duration_ms
            ));
        }
        css
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
