//! Inking surface abstraction.
//!
//! The coordinator never touches stroke geometry; it configures a surface
//! through this trait. [`crate::canvas::InkCanvas`] is the in-process
//! implementation.

use crate::canvas::Drawing;
use crate::state::InputPolicy;
use crate::tools::NativeTool;
use kurbo::Affine;

/// Operations the coordinator needs from an inking engine.
pub trait InkSurface {
    /// Make the surface the receiver of pen and keyboard input.
    ///
    /// Called once when the coordinator is created.
    fn activate(&mut self);

    /// Replace the active tool.
    fn set_tool(&mut self, tool: NativeTool);

    /// Restrict which input sources may draw.
    fn set_input_policy(&mut self, policy: InputPolicy);

    /// Apply the composed view transform to the canvas container.
    fn set_view_transform(&mut self, transform: Affine);

    /// Undo the last content change.
    /// Returns false if there was nothing to undo.
    fn undo(&mut self) -> bool;

    /// Redo the last undone change.
    /// Returns false if there was nothing to redo.
    fn redo(&mut self) -> bool;

    /// Replace the content with an empty drawing.
    fn replace_with_empty(&mut self);
}

/// Receives content-change notifications from a surface.
pub trait CanvasObserver {
    /// Called after the drawing changed (stroke added or erased, undo, redo, clear).
    fn drawing_did_change(&mut self, drawing: &Drawing);
}

