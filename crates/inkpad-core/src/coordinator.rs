//! Maps gestures and commands to state changes and pushes them to the surface.

use crate::command::{Command, KeyChord, ShortcutRegistry};
use crate::config::PadConfig;
use crate::gesture::{GestureBaseline, GestureFrame, GesturePhase};
use crate::state::{InkColor, PadState, ToolSelection};
use crate::surface::InkSurface;
use crate::tools::NativeTool;
use kurbo::Vec2;

/// Advance one gesture's baseline through `phase`.
///
/// Returns the baseline to apply deltas against, or `None` when the event
/// only starts the gesture or arrives without a matching `Began`.
fn advance(
    baseline: &mut Option<GestureBaseline>,
    phase: GesturePhase,
    state: &PadState,
) -> Option<GestureBaseline> {
    match phase {
        GesturePhase::Began => {
            *baseline = Some(GestureBaseline::capture(&state.transform));
            None
        }
        GesturePhase::Changed => *baseline,
        GesturePhase::Ended | GesturePhase::Cancelled => baseline.take(),
    }
}

/// Owns the pad state and keeps an inking surface in sync with it.
///
/// Every mutation is followed by an explicit re-apply: tool and style
/// changes push a new [`NativeTool`], transform changes push the composed
/// affine matrix.
#[derive(Debug)]
pub struct Coordinator<S: InkSurface> {
    state: PadState,
    surface: S,
    pinch: Option<GestureBaseline>,
    rotation: Option<GestureBaseline>,
    pan: Option<GestureBaseline>,
}

impl<S: InkSurface> Coordinator<S> {
    /// Create a coordinator with state taken from `config`.
    pub fn new(surface: S, config: &PadConfig) -> Self {
        Self::with_state(surface, config.initial_state())
    }

    /// Create a coordinator with explicit initial state.
    ///
    /// Activates the surface and pushes the full state to it.
    pub fn with_state(mut surface: S, state: PadState) -> Self {
        surface.activate();
        let mut coordinator = Self {
            state,
            surface,
            pinch: None,
            rotation: None,
            pan: None,
        };
        coordinator.apply_tool();
        coordinator.apply_input_policy();
        coordinator.apply_transform();
        coordinator
    }

    pub fn state(&self) -> &PadState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The tool object currently pushed to the surface.
    pub fn native_tool(&self) -> NativeTool {
        NativeTool::for_selection(self.state.tool, &self.state.style)
    }

    /// Whether any transform gesture is between `Began` and its end.
    pub fn is_gesturing(&self) -> bool {
        self.pinch.is_some() || self.rotation.is_some() || self.pan.is_some()
    }

    pub fn select_tool(&mut self, tool: ToolSelection) {
        self.state.set_tool(tool);
        self.apply_tool();
    }

    pub fn set_ink_color(&mut self, color: InkColor) {
        self.state.set_ink_color(color);
        self.apply_tool();
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.state.set_stroke_width(width);
        self.apply_tool();
    }

    pub fn set_finger_input(&mut self, enabled: bool) {
        self.state.set_finger_input(enabled);
        self.apply_input_policy();
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.state.transform.set_scale(scale);
        self.apply_transform();
    }

    pub fn set_rotation(&mut self, radians: f64) {
        self.state.transform.set_rotation(radians);
        self.apply_transform();
    }

    pub fn set_translation(&mut self, translation: Vec2) {
        self.state.transform.set_translation(translation);
        self.apply_transform();
    }

    fn apply_tool(&mut self) {
        let tool = self.native_tool();
        log::debug!("Applying tool {:?}", tool);
        self.surface.set_tool(tool);
    }

    fn apply_input_policy(&mut self) {
        log::debug!("Applying input policy {:?}", self.state.input_policy);
        self.surface.set_input_policy(self.state.input_policy);
    }

    fn apply_transform(&mut self) {
        self.surface.set_view_transform(self.state.transform.affine());
    }

    /// Handle a pinch update; `factor` is the scale relative to the start of the pinch.
    pub fn handle_pinch(&mut self, phase: GesturePhase, factor: f64) {
        let Some(baseline) = advance(&mut self.pinch, phase, &self.state) else {
            return;
        };
        self.state.transform.set_scale(baseline.scale * factor);
        log::trace!("Pinch {:?}: scale {:.3}", phase, self.state.transform.scale());
        self.apply_transform();
    }

    /// Handle a rotation update; `radians` is relative to the start of the rotation.
    pub fn handle_rotation(&mut self, phase: GesturePhase, radians: f64) {
        let Some(baseline) = advance(&mut self.rotation, phase, &self.state) else {
            return;
        };
        self.state.transform.set_rotation(baseline.rotation + radians);
        log::trace!("Rotate {:?}: {:.3} rad", phase, self.state.transform.rotation());
        self.apply_transform();
    }

    /// Handle a pan update; `translation` is relative to the start of the pan.
    ///
    /// Only two-finger pans move the view; any other touch count is ignored
    /// so single-finger drags stay available for drawing.
    pub fn handle_pan(&mut self, phase: GesturePhase, translation: Vec2, touch_count: usize) {
        if touch_count != 2 {
            return;
        }
        let Some(baseline) = advance(&mut self.pan, phase, &self.state) else {
            return;
        };
        self.state
            .transform
            .set_translation(baseline.translation + translation);
        log::trace!("Pan {:?}: {:?}", phase, self.state.transform.translation());
        self.apply_transform();
    }

    /// Feed one frame of a combined pinch/rotate/pan gesture.
    pub fn handle_gesture_frame(&mut self, frame: GestureFrame) {
        self.handle_pinch(frame.phase, frame.scale);
        self.handle_rotation(frame.phase, frame.rotation);
        self.handle_pan(frame.phase, frame.translation, frame.touch_count);
    }

    /// Run a discrete command.
    pub fn execute(&mut self, command: Command) {
        log::info!("Command: {}", command.name());
        match command {
            Command::SelectPen => self.select_tool(ToolSelection::Pen),
            Command::SelectEraser => self.select_tool(ToolSelection::Eraser),
            Command::Undo => {
                if !self.surface.undo() {
                    log::info!("Nothing to undo");
                }
            }
            Command::Redo => {
                if !self.surface.redo() {
                    log::info!("Nothing to redo");
                }
            }
            Command::Clear => self.surface.replace_with_empty(),
            Command::ZoomIn => {
                self.state.transform.zoom_in();
                self.apply_transform();
            }
            Command::ZoomOut => {
                self.state.transform.zoom_out();
                self.apply_transform();
            }
            Command::ResetTransform => {
                self.state.transform.reset();
                self.apply_transform();
            }
        }
    }

    /// Run the command bound to `chord`, if any.
    pub fn handle_key(&mut self, chord: &KeyChord) -> Option<Command> {
        let command = ShortcutRegistry::lookup(chord)?;
        self.execute(command);
        Some(command)
    }
}
