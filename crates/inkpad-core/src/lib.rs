//! InkPad Core Library
//!
//! Platform-agnostic tool state, view transform, gesture handling and
//! command mapping for a pen/touch drawing pad.

pub mod canvas;
pub mod command;
pub mod config;
pub mod coordinator;
pub mod gesture;
pub mod state;
pub mod surface;
pub mod tools;
pub mod touch;
pub mod transform;

pub use canvas::{Drawing, InkCanvas, Stroke};
pub use command::{Command, KeyChord, Shortcut, ShortcutRegistry};
pub use config::{ConfigError, PadConfig};
pub use coordinator::Coordinator;
pub use gesture::{GestureAccumulator, GestureBaseline, GestureFrame, GesturePhase};
pub use state::{InkColor, InkStyle, InputPolicy, InputSource, PadState, ToolSelection};
pub use surface::{CanvasObserver, InkSurface};
pub use tools::NativeTool;
pub use touch::{StrokeEvent, TouchEvent, TouchOutput, TouchPhase, TouchTracker};
pub use transform::ViewTransform;
