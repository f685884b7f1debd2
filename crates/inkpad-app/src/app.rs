//! Application window and event routing.

use crate::input;
use inkpad_core::config::{default_config_path, read_config_or_default};
use inkpad_core::touch::{StrokeEvent, TouchOutput, TouchTracker};
use inkpad_core::{
    CanvasObserver, Coordinator, Drawing, GestureAccumulator, InkCanvas, InputSource, PadConfig,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowId};

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] OsError),
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub pad: PadConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "InkPad".to_string(),
            width: 1024,
            height: 768,
            pad: PadConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from the default config file, falling back to defaults.
    pub fn load() -> Self {
        match default_config_path() {
            Ok(path) => read_config_or_default(&path),
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }
}

/// Content-change hook; it has no behavior beyond logging.
struct LogDrawingChanges;

impl CanvasObserver for LogDrawingChanges {
    fn drawing_did_change(&mut self, drawing: &Drawing) {
        log::debug!("Drawing changed: {} strokes", drawing.len());
    }
}

/// Runtime state for the application.
struct AppState {
    window: Window,
    coordinator: Coordinator<InkCanvas>,
    touches: TouchTracker,
    trackpad: GestureAccumulator,
    modifiers: ModifiersState,
    cursor: Point,
    mouse_down: bool,
}

impl AppState {
    fn stroke(&mut self, source: InputSource, event: StrokeEvent) {
        let canvas = self.coordinator.surface_mut();
        match event {
            StrokeEvent::Down { position, pressure } => canvas.pointer_down(source, position, pressure),
            StrokeEvent::Moved { position, pressure } => canvas.pointer_moved(source, position, pressure),
            StrokeEvent::Up { position, pressure } => canvas.pointer_up(source, position, pressure),
            StrokeEvent::Cancelled => canvas.pointer_cancelled(source),
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    /// Error that stopped the event loop, reported by [`App::run`].
    failure: Option<AppError>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            failure: None,
        }
    }

    /// Run the application until the window closes.
    pub fn run(mut self) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        event_loop.run_app(&mut self)?;
        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => window,
            Err(e) => {
                self.failure = Some(AppError::Window(e));
                event_loop.exit();
                return;
            }
        };

        let mut canvas = InkCanvas::new();
        canvas.set_observer(Box::new(LogDrawingChanges));

        self.state = Some(AppState {
            window,
            coordinator: Coordinator::new(canvas, &self.config.pad),
            touches: TouchTracker::new(),
            trackpad: GestureAccumulator::new(),
            modifiers: ModifiersState::empty(),
            cursor: Point::ZERO,
            mouse_down: false,
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
                return;
            }
            WindowEvent::RedrawRequested => return,
            WindowEvent::ModifiersChanged(modifiers) => {
                state.modifiers = modifiers.state();
                return;
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let Some(chord) = input::key_chord(&event.logical_key, state.modifiers) else {
                    return;
                };
                if state.coordinator.handle_key(&chord).is_none() {
                    log::debug!("Unbound key {:?}", chord);
                    return;
                }
            }
            WindowEvent::PinchGesture { delta, phase, .. } => {
                let phase = input::gesture_phase(phase);
                let factor = state.trackpad.pinch(phase, delta);
                state.coordinator.handle_pinch(phase, factor);
            }
            WindowEvent::RotationGesture { delta, phase, .. } => {
                let phase = input::gesture_phase(phase);
                let radians = state.trackpad.rotation(phase, input::rotation_delta(delta));
                state.coordinator.handle_rotation(phase, radians);
            }
            WindowEvent::PanGesture { delta, phase, .. } => {
                // Trackpad pans are always two-finger.
                let phase = input::gesture_phase(phase);
                let translation = state.trackpad.pan(phase, input::pan_delta(delta));
                state.coordinator.handle_pan(phase, translation, 2);
            }
            WindowEvent::Touch(touch) => {
                for output in state.touches.handle(input::touch_event(&touch)) {
                    match output {
                        TouchOutput::Stroke { source, event } => state.stroke(source, event),
                        TouchOutput::Gesture(frame) => state.coordinator.handle_gesture_frame(frame),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.cursor = input::point(position);
                if !state.mouse_down {
                    return;
                }
                let position = state.cursor;
                state.stroke(InputSource::Mouse, StrokeEvent::Moved { position, pressure: 1.0 });
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => {
                let position = state.cursor;
                let event = match button_state {
                    ElementState::Pressed => {
                        state.mouse_down = true;
                        StrokeEvent::Down { position, pressure: 1.0 }
                    }
                    ElementState::Released => {
                        state.mouse_down = false;
                        StrokeEvent::Up { position, pressure: 1.0 }
                    }
                };
                state.stroke(InputSource::Mouse, event);
            }
            _ => return,
        }

        state.window.request_redraw();
    }
}
