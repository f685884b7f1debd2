//! Tool and transform state for a drawing pad screen.

use crate::transform::ViewTransform;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Thinnest allowed stroke width, in pixels.
pub const MIN_STROKE_WIDTH: f64 = 1.0;
/// Thickest allowed stroke width, in pixels.
pub const MAX_STROKE_WIDTH: f64 = 30.0;
/// Stroke width used when nothing else is configured.
pub const DEFAULT_STROKE_WIDTH: f64 = 5.0;

/// Clamp a stroke width into `[MIN_STROKE_WIDTH, MAX_STROKE_WIDTH]` in whole-pixel steps.
pub fn clamp_stroke_width(width: f64) -> f64 {
    if width.is_nan() {
        return DEFAULT_STROKE_WIDTH;
    }
    width.round().clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
}

/// The tool currently selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolSelection {
    #[default]
    Pen,
    Eraser,
}

impl ToolSelection {
    /// Human-readable tool name.
    pub fn name(&self) -> &'static str {
        match self {
            ToolSelection::Pen => "Pen",
            ToolSelection::Eraser => "Eraser",
        }
    }
}

/// Ink color (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InkColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl InkColor {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const RED: Self = Self::new(255, 59, 48, 255);
    pub const ORANGE: Self = Self::new(255, 149, 0, 255);
    pub const GREEN: Self = Self::new(52, 199, 89, 255);
    pub const BLUE: Self = Self::new(0, 122, 255, 255);
    pub const PURPLE: Self = Self::new(175, 82, 222, 255);

    /// Colors offered by the palette, in display order.
    pub const PALETTE: [Self; 6] = [
        Self::BLACK,
        Self::RED,
        Self::ORANGE,
        Self::GREEN,
        Self::BLUE,
        Self::PURPLE,
    ];

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for InkColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<Color> for InkColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<InkColor> for Color {
    fn from(color: InkColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Ink style used by the pen tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawInkStyle")]
pub struct InkStyle {
    color: InkColor,
    width: f64,
}

#[derive(Deserialize)]
struct RawInkStyle {
    color: InkColor,
    width: f64,
}

impl From<RawInkStyle> for InkStyle {
    fn from(raw: RawInkStyle) -> Self {
        Self::new(raw.color, raw.width)
    }
}

impl Default for InkStyle {
    fn default() -> Self {
        Self {
            color: InkColor::default(),
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl InkStyle {
    pub fn new(color: InkColor, width: f64) -> Self {
        Self {
            color,
            width: clamp_stroke_width(width),
        }
    }

    pub fn color(&self) -> InkColor {
        self.color
    }

    /// Stroke width in pixels, always a whole number in `[1, 30]`.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_color(&mut self, color: InkColor) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = clamp_stroke_width(width);
    }
}

/// Kind of device a pointer sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSource {
    /// Stylus or pencil.
    Pen,
    /// Direct touch.
    Finger,
    /// Indirect pointer (mouse or trackpad cursor).
    Mouse,
}

/// Which input sources may draw on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPolicy {
    /// When false, only pen (and indirect pointer) input draws.
    pub finger_input: bool,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self { finger_input: true }
    }
}

impl InputPolicy {
    pub fn any_input() -> Self {
        Self { finger_input: true }
    }

    pub fn pen_only() -> Self {
        Self {
            finger_input: false,
        }
    }

    /// Check whether input from `source` may draw.
    pub fn accepts(&self, source: InputSource) -> bool {
        match source {
            InputSource::Pen | InputSource::Mouse => true,
            InputSource::Finger => self.finger_input,
        }
    }
}

/// All mutable state of one drawing pad screen.
///
/// Pure data: every setter clamps its input, so no operation can fail.
/// Propagating changes to the inking surface is the coordinator's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PadState {
    pub tool: ToolSelection,
    pub style: InkStyle,
    pub input_policy: InputPolicy,
    pub transform: ViewTransform,
}

impl PadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tool(&mut self, tool: ToolSelection) {
        self.tool = tool;
    }

    pub fn set_ink_color(&mut self, color: InkColor) {
        self.style.set_color(color);
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.style.set_width(width);
    }

    pub fn set_finger_input(&mut self, enabled: bool) {
        self.input_policy.finger_input = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = PadState::new();
        assert_eq!(state.tool, ToolSelection::Pen);
        assert_eq!(state.style.color(), InkColor::BLACK);
        assert!((state.style.width() - DEFAULT_STROKE_WIDTH).abs() < f64::EPSILON);
        assert!(state.input_policy.finger_input);
        assert!(state.transform.is_identity());
    }

    #[test]
    fn test_stroke_width_clamped_and_rounded() {
        let mut state = PadState::new();

        state.set_stroke_width(0.0);
        assert_eq!(state.style.width(), 1.0);

        state.set_stroke_width(99.0);
        assert_eq!(state.style.width(), 30.0);

        state.set_stroke_width(7.6);
        assert_eq!(state.style.width(), 8.0);

        state.set_stroke_width(f64::NAN);
        assert_eq!(state.style.width(), DEFAULT_STROKE_WIDTH);
    }

    #[test]
    fn test_input_policy() {
        let pen_only = InputPolicy::pen_only();
        assert!(pen_only.accepts(InputSource::Pen));
        assert!(pen_only.accepts(InputSource::Mouse));
        assert!(!pen_only.accepts(InputSource::Finger));

        assert!(InputPolicy::any_input().accepts(InputSource::Finger));
    }

    #[test]
    fn test_color_conversion() {
        let color: Color = InkColor::RED.into();
        assert_eq!(InkColor::from(color), InkColor::RED);
    }

    #[test]
    fn test_deserialize_clamps_style_and_scale() {
        let mut value = serde_json::to_value(PadState::new()).unwrap();
        value["style"]["width"] = serde_json::json!(99.6);
        value["transform"]["scale"] = serde_json::json!(0.01);

        let state: PadState = serde_json::from_value(value).unwrap();
        assert_eq!(state.style.width(), MAX_STROKE_WIDTH);
        assert!((state.transform.scale() - crate::transform::MIN_SCALE).abs() < f64::EPSILON);
    }
}
