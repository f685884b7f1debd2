//! View transform for the drawing surface.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed view scale.
pub const MIN_SCALE: f64 = 0.25;
/// Largest allowed view scale.
pub const MAX_SCALE: f64 = 4.0;
/// Multiplicative step used by the zoom-in/zoom-out commands.
pub const ZOOM_STEP: f64 = 1.15;

/// Clamp a scale value into the allowed range.
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// View-level affine transform applied to the canvas container.
///
/// The transform is stored decomposed into scale, rotation and translation
/// and is always composed as `translate * rotate * scale`, so it can never
/// introduce skew. It does not affect stroke coordinates; those live in
/// canvas space and are mapped through [`ViewTransform::screen_to_canvas`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawViewTransform")]
pub struct ViewTransform {
    /// Uniform scale factor, always within `[MIN_SCALE, MAX_SCALE]`.
    scale: f64,
    /// Rotation in radians.
    rotation: f64,
    /// Translation in screen pixels.
    translation: Vec2,
}

/// Unchecked wire form; deserialization goes through the clamping setters.
#[derive(Deserialize)]
struct RawViewTransform {
    scale: f64,
    rotation: f64,
    translation: Vec2,
}

impl From<RawViewTransform> for ViewTransform {
    fn from(raw: RawViewTransform) -> Self {
        let mut transform = Self::IDENTITY;
        transform.set_scale(raw.scale);
        transform.set_rotation(raw.rotation);
        transform.set_translation(raw.translation);
        transform
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        rotation: 0.0,
        translation: Vec2::ZERO,
    };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Set the scale, clamping into `[MIN_SCALE, MAX_SCALE]`.
    ///
    /// A NaN scale leaves the current value unchanged.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_nan() {
            log::debug!("Ignoring NaN view scale");
            return;
        }
        self.scale = clamp_scale(scale);
    }

    pub fn set_rotation(&mut self, radians: f64) {
        self.rotation = radians;
    }

    pub fn set_translation(&mut self, translation: Vec2) {
        self.translation = translation;
    }

    /// Zoom in by one step. A no-op at `MAX_SCALE`.
    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale * ZOOM_STEP);
    }

    /// Zoom out by one step. A no-op at `MIN_SCALE`.
    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale / ZOOM_STEP);
    }

    /// Reset to the identity transform.
    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Check whether this is exactly the identity transform.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Get the composed affine transform (canvas to screen).
    pub fn affine(&self) -> Affine {
        Affine::translate(self.translation) * Affine::rotate(self.rotation) * Affine::scale(self.scale)
    }

    /// Get the inverse transform (screen to canvas).
    pub fn inverse_affine(&self) -> Affine {
        Affine::scale(1.0 / self.scale)
            * Affine::rotate(-self.rotation)
            * Affine::translate(-self.translation)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_affine() * screen_point
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.affine() * canvas_point
    }
}
