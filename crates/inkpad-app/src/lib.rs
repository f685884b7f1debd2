//! InkPad Application
//!
//! The application shell providing windowing and routing of pen, touch,
//! trackpad and keyboard input into the drawing pad coordinator.

mod app;
mod input;

pub use app::{App, AppConfig, AppError};
