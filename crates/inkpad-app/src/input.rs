//! Translation of winit events into core input types.

use inkpad_core::touch::{TouchEvent, TouchPhase};
use inkpad_core::{GesturePhase, InputSource, KeyChord};
use kurbo::{Point, Vec2};
use winit::dpi::PhysicalPosition;
use winit::event::{Force, Touch};
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Map a winit gesture phase to a core gesture phase.
pub(crate) fn gesture_phase(phase: winit::event::TouchPhase) -> GesturePhase {
    match phase {
        winit::event::TouchPhase::Started => GesturePhase::Began,
        winit::event::TouchPhase::Moved => GesturePhase::Changed,
        winit::event::TouchPhase::Ended => GesturePhase::Ended,
        winit::event::TouchPhase::Cancelled => GesturePhase::Cancelled,
    }
}

fn touch_phase(phase: winit::event::TouchPhase) -> TouchPhase {
    match phase {
        winit::event::TouchPhase::Started => TouchPhase::Started,
        winit::event::TouchPhase::Moved => TouchPhase::Moved,
        winit::event::TouchPhase::Ended => TouchPhase::Ended,
        winit::event::TouchPhase::Cancelled => TouchPhase::Cancelled,
    }
}

/// Guess the device behind a touch.
///
/// Only styluses report an altitude angle.
pub(crate) fn touch_source(force: Option<Force>) -> InputSource {
    match force {
        Some(Force::Calibrated {
            altitude_angle: Some(_),
            ..
        }) => InputSource::Pen,
        _ => InputSource::Finger,
    }
}

/// Convert a winit touch into a core touch event.
pub(crate) fn touch_event(touch: &Touch) -> TouchEvent {
    TouchEvent {
        id: touch.id,
        phase: touch_phase(touch.phase),
        position: point(touch.location),
        source: touch_source(touch.force),
        pressure: touch.force.map_or(1.0, |force| force.normalized()),
    }
}

pub(crate) fn point(position: PhysicalPosition<f64>) -> Point {
    Point::new(position.x, position.y)
}

/// Trackpad pan delta in pixels.
pub(crate) fn pan_delta(delta: PhysicalPosition<f32>) -> Vec2 {
    Vec2::new(f64::from(delta.x), f64::from(delta.y))
}

/// Trackpad rotation delta in radians.
///
/// winit reports degrees with counterclockwise positive; the view
/// transform rotates clockwise for positive angles in y-down screen space.
pub(crate) fn rotation_delta(degrees: f32) -> f64 {
    -f64::from(degrees).to_radians()
}

/// Build a key chord from a logical key and the current modifiers.
///
/// The primary modifier is Cmd on macOS and Ctrl elsewhere.
pub(crate) fn key_chord(key: &Key, modifiers: ModifiersState) -> Option<KeyChord> {
    let name = match key {
        Key::Named(NamedKey::Backspace) => "Backspace".to_string(),
        Key::Character(c) => c.to_string(),
        _ => return None,
    };
    let primary = if cfg!(target_os = "macos") {
        modifiers.super_key()
    } else {
        modifiers.control_key()
    };
    Some(KeyChord::new(name, primary, modifiers.shift_key()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary_modifier() -> ModifiersState {
        if cfg!(target_os = "macos") {
            ModifiersState::SUPER
        } else {
            ModifiersState::CONTROL
        }
    }

    #[test]
    fn test_key_chord_plain() {
        let chord = key_chord(&Key::Character("p".into()), ModifiersState::empty()).unwrap();
        assert_eq!(chord, KeyChord::plain("p"));
    }

    #[test]
    fn test_key_chord_with_modifiers() {
        let modifiers = primary_modifier() | ModifiersState::SHIFT;
        let chord = key_chord(&Key::Character("Z".into()), modifiers).unwrap();
        assert_eq!(chord, KeyChord::new("Z", true, true));
    }

    #[test]
    fn test_named_keys() {
        let chord = key_chord(&Key::Named(NamedKey::Backspace), primary_modifier()).unwrap();
        assert_eq!(chord, KeyChord::primary("Backspace"));
        assert!(key_chord(&Key::Named(NamedKey::Tab), ModifiersState::empty()).is_none());
        assert!(key_chord(&Key::Named(NamedKey::Delete), primary_modifier()).is_none());
    }

    #[test]
    fn test_touch_source() {
        let pencil = Force::Calibrated {
            force: 0.5,
            max_possible_force: 1.0,
            altitude_angle: Some(1.2),
        };
        let finger = Force::Calibrated {
            force: 0.5,
            max_possible_force: 1.0,
            altitude_angle: None,
        };
        assert_eq!(touch_source(Some(pencil)), InputSource::Pen);
        assert_eq!(touch_source(Some(finger)), InputSource::Finger);
        assert_eq!(touch_source(Some(Force::Normalized(0.3))), InputSource::Finger);
        assert_eq!(touch_source(None), InputSource::Finger);
    }

    #[test]
    fn test_rotation_delta_direction() {
        assert!((rotation_delta(90.0) + std::f64::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_gesture_phase() {
        assert_eq!(gesture_phase(winit::event::TouchPhase::Started), GesturePhase::Began);
        assert_eq!(gesture_phase(winit::event::TouchPhase::Cancelled), GesturePhase::Cancelled);
    }
}
