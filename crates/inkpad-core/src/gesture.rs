//! Gesture phases, baselines and delta accumulation.

use crate::transform::ViewTransform;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Phase of a continuous gesture.
///
/// Every gesture runs `Began -> Changed* -> Ended | Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

impl GesturePhase {
    /// Whether this phase terminates the gesture.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GesturePhase::Ended | GesturePhase::Cancelled)
    }
}

/// Transform values captured when a gesture begins.
///
/// Gesture deltas are applied relative to this snapshot rather than to the
/// previous frame, so per-frame rounding never compounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureBaseline {
    pub scale: f64,
    pub rotation: f64,
    pub translation: Vec2,
}

impl GestureBaseline {
    pub fn capture(transform: &ViewTransform) -> Self {
        Self {
            scale: transform.scale(),
            rotation: transform.rotation(),
            translation: transform.translation(),
        }
    }
}

/// One update of a two-finger gesture, with all values cumulative since `Began`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureFrame {
    pub phase: GesturePhase,
    /// Scale factor relative to the start of the gesture.
    pub scale: f64,
    /// Rotation in radians relative to the start of the gesture.
    pub rotation: f64,
    /// Translation relative to the start of the gesture.
    pub translation: Vec2,
    /// Number of touches driving the gesture.
    pub touch_count: usize,
}

impl GestureFrame {
    /// A frame with no movement yet.
    pub fn identity(phase: GesturePhase, touch_count: usize) -> Self {
        Self {
            phase,
            scale: 1.0,
            rotation: 0.0,
            translation: Vec2::ZERO,
            touch_count,
        }
    }
}

/// Turns per-event deltas into cumulative-since-begin values.
///
/// Trackpad gesture events report the change since the previous event;
/// the coordinator expects the change since the gesture began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureAccumulator {
    scale: f64,
    rotation: f64,
    translation: Vec2,
}

impl Default for GestureAccumulator {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: 0.0,
            translation: Vec2::ZERO,
        }
    }
}

impl GestureAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate a magnification delta; returns the cumulative scale factor.
    pub fn pinch(&mut self, phase: GesturePhase, magnification: f64) -> f64 {
        if phase == GesturePhase::Began {
            self.scale = 1.0;
        }
        // Keep the factor positive even for a wild negative delta.
        self.scale = (self.scale * (1.0 + magnification)).max(f64::EPSILON);
        self.scale
    }

    /// Accumulate a rotation delta in radians; returns the cumulative rotation.
    pub fn rotation(&mut self, phase: GesturePhase, delta: f64) -> f64 {
        if phase == GesturePhase::Began {
            self.rotation = 0.0;
        }
        self.rotation += delta;
        self.rotation
    }

    /// Accumulate a translation delta; returns the cumulative translation.
    pub fn pan(&mut self, phase: GesturePhase, delta: Vec2) -> Vec2 {
        if phase == GesturePhase::Began {
            self.translation = Vec2::ZERO;
        }
        self.translation += delta;
        self.translation
    }
}
