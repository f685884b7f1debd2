//! Raw touch tracking: single-finger strokes and two-finger transform gestures.

use crate::gesture::{GestureFrame, GesturePhase};
use crate::state::InputSource;
use kurbo::Point;
use std::collections::BTreeMap;
use std::f64::consts::{PI, TAU};

/// Phase of a single raw touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// One raw touch sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    /// Identifier stable for the lifetime of one touch.
    pub id: u64,
    pub phase: TouchPhase,
    pub position: Point,
    pub source: InputSource,
    pub pressure: f64,
}

/// Pointer event for the inking surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeEvent {
    Down { position: Point, pressure: f64 },
    Moved { position: Point, pressure: f64 },
    Up { position: Point, pressure: f64 },
    Cancelled,
}

/// What a touch sample turned into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchOutput {
    Stroke {
        source: InputSource,
        event: StrokeEvent,
    },
    Gesture(GestureFrame),
}

/// Two-finger gesture in progress.
#[derive(Debug, Clone, Copy)]
struct TwoFinger {
    ids: [u64; 2],
    start_distance: f64,
    start_centroid: Point,
    last_angle: f64,
    frame: GestureFrame,
}

/// Wrap an angle into `(-PI, PI]`.
fn wrap_angle(angle: f64) -> f64 {
    let a = angle % TAU;
    if a > PI {
        a - TAU
    } else if a <= -PI {
        a + TAU
    } else {
        a
    }
}

/// Splits raw touches into drawing input and two-finger gestures.
///
/// Pen touches always draw. One finger draws; a second finger cancels that
/// stroke and starts a pinch/rotate/pan gesture driven by both fingers.
/// Lifting either finger, or a third finger landing, ends the gesture, and
/// remaining fingers are ignored until all of them are lifted.
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    fingers: BTreeMap<u64, Point>,
    pen_touch: Option<u64>,
    stroke_finger: Option<u64>,
    gesture: Option<TwoFinger>,
    locked: bool,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fingers currently down.
    pub fn finger_count(&self) -> usize {
        self.fingers.len()
    }

    /// Whether a two-finger gesture is in progress.
    pub fn is_gesturing(&self) -> bool {
        self.gesture.is_some()
    }

    /// Process one touch sample.
    pub fn handle(&mut self, event: TouchEvent) -> Vec<TouchOutput> {
        if event.source == InputSource::Finger {
            self.handle_finger(event)
        } else {
            self.handle_pen(event)
        }
    }

    fn handle_pen(&mut self, event: TouchEvent) -> Vec<TouchOutput> {
        let stroke_event = match event.phase {
            TouchPhase::Started => {
                if self.pen_touch.is_some() {
                    return Vec::new();
                }
                self.pen_touch = Some(event.id);
                StrokeEvent::Down {
                    position: event.position,
                    pressure: event.pressure,
                }
            }
            _ if self.pen_touch != Some(event.id) => return Vec::new(),
            TouchPhase::Moved => StrokeEvent::Moved {
                position: event.position,
                pressure: event.pressure,
            },
            TouchPhase::Ended => {
                self.pen_touch = None;
                StrokeEvent::Up {
                    position: event.position,
                    pressure: event.pressure,
                }
            }
            TouchPhase::Cancelled => {
                self.pen_touch = None;
                StrokeEvent::Cancelled
            }
        };
        vec![TouchOutput::Stroke {
            source: event.source,
            event: stroke_event,
        }]
    }

    fn handle_finger(&mut self, event: TouchEvent) -> Vec<TouchOutput> {
        match event.phase {
            TouchPhase::Started => self.finger_started(event),
            TouchPhase::Moved => self.finger_moved(event),
            TouchPhase::Ended | TouchPhase::Cancelled => self.finger_lifted(event),
        }
    }

    fn finger_started(&mut self, event: TouchEvent) -> Vec<TouchOutput> {
        self.fingers.insert(event.id, event.position);
        if self.locked {
            return Vec::new();
        }

        let mut out = Vec::new();
        match self.fingers.len() {
            1 => {
                self.stroke_finger = Some(event.id);
                out.push(TouchOutput::Stroke {
                    source: InputSource::Finger,
                    event: StrokeEvent::Down {
                        position: event.position,
                        pressure: event.pressure,
                    },
                });
            }
            2 => {
                if self.stroke_finger.take().is_some() {
                    out.push(TouchOutput::Stroke {
                        source: InputSource::Finger,
                        event: StrokeEvent::Cancelled,
                    });
                }
                out.push(TouchOutput::Gesture(self.begin_gesture()));
            }
            _ => {
                // A third finger ends the gesture; the last values stand.
                if let Some(frame) = self.end_gesture(GesturePhase::Ended) {
                    out.push(TouchOutput::Gesture(frame));
                }
                self.locked = true;
            }
        }
        out
    }

    fn finger_moved(&mut self, event: TouchEvent) -> Vec<TouchOutput> {
        let Some(position) = self.fingers.get_mut(&event.id) else {
            return Vec::new();
        };
        *position = event.position;
        if self.locked {
            return Vec::new();
        }

        if self.stroke_finger == Some(event.id) {
            return vec![TouchOutput::Stroke {
                source: InputSource::Finger,
                event: StrokeEvent::Moved {
                    position: event.position,
                    pressure: event.pressure,
                },
            }];
        }

        match self.update_gesture() {
            Some(frame) => vec![TouchOutput::Gesture(frame)],
            None => Vec::new(),
        }
    }

    fn finger_lifted(&mut self, event: TouchEvent) -> Vec<TouchOutput> {
        if self.fingers.remove(&event.id).is_none() {
            return Vec::new();
        }

        let mut out = Vec::new();
        if !self.locked {
            if self.stroke_finger == Some(event.id) {
                self.stroke_finger = None;
                let stroke_event = if event.phase == TouchPhase::Cancelled {
                    StrokeEvent::Cancelled
                } else {
                    StrokeEvent::Up {
                        position: event.position,
                        pressure: event.pressure,
                    }
                };
                out.push(TouchOutput::Stroke {
                    source: InputSource::Finger,
                    event: stroke_event,
                });
            } else if self.gesture.is_some_and(|g| g.ids.contains(&event.id)) {
                let phase = if event.phase == TouchPhase::Cancelled {
                    GesturePhase::Cancelled
                } else {
                    GesturePhase::Ended
                };
                if let Some(frame) = self.end_gesture(phase) {
                    out.push(TouchOutput::Gesture(frame));
                }
                self.locked = true;
            }
        }

        if self.fingers.is_empty() {
            self.locked = false;
        }
        out
    }

    fn finger_pair(&self, ids: [u64; 2]) -> Option<(Point, Point)> {
        Some((*self.fingers.get(&ids[0])?, *self.fingers.get(&ids[1])?))
    }

    fn begin_gesture(&mut self) -> GestureFrame {
        let mut keys = self.fingers.keys().copied();
        let ids = [keys.next().unwrap_or_default(), keys.next().unwrap_or_default()];
        let (a, b) = self
            .finger_pair(ids)
            .unwrap_or((Point::ZERO, Point::ZERO));
        let frame = GestureFrame::identity(GesturePhase::Began, 2);

        self.gesture = Some(TwoFinger {
            ids,
            start_distance: (b - a).hypot(),
            start_centroid: a.midpoint(b),
            last_angle: (b - a).atan2(),
            frame,
        });
        frame
    }

    fn update_gesture(&mut self) -> Option<GestureFrame> {
        let gesture = self.gesture?;
        let (a, b) = self.finger_pair(gesture.ids)?;
        let span = b - a;
        let angle = span.atan2();

        let mut frame = gesture.frame;
        frame.phase = GesturePhase::Changed;
        frame.scale = if gesture.start_distance > f64::EPSILON {
            span.hypot() / gesture.start_distance
        } else {
            1.0
        };
        // Unwrapped so a rotation past half a turn keeps accumulating.
        frame.rotation += wrap_angle(angle - gesture.last_angle);
        frame.translation = a.midpoint(b) - gesture.start_centroid;

        self.gesture = Some(TwoFinger {
            last_angle: angle,
            frame,
            ..gesture
        });
        Some(frame)
    }

    fn end_gesture(&mut self, phase: GesturePhase) -> Option<GestureFrame> {
        let gesture = self.gesture.take()?;
        Some(GestureFrame {
            phase,
            ..gesture.frame
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::InkCanvas;
    use kurbo::Vec2;
    use std::f64::consts::FRAC_PI_2;

    fn finger(id: u64, phase: TouchPhase, x: f64, y: f64) -> TouchEvent {
        TouchEvent {
            id,
            phase,
            position: Point::new(x, y),
            source: InputSource::Finger,
            pressure: 1.0,
        }
    }

    fn gesture_frames(outputs: &[TouchOutput]) -> Vec<GestureFrame> {
        outputs
            .iter()
            .filter_map(|o| match o {
                TouchOutput::Gesture(frame) => Some(*frame),
                TouchOutput::Stroke { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_single_finger_draws() {
        let mut tracker = TouchTracker::new();
        let out = tracker.handle(finger(1, TouchPhase::Started, 0.0, 0.0));
        assert!(matches!(
            out[..],
            [TouchOutput::Stroke {
                source: InputSource::Finger,
                event: StrokeEvent::Down { .. }
            }]
        ));

        let out = tracker.handle(finger(1, TouchPhase::Moved, 5.0, 0.0));
        assert!(matches!(
            out[..],
            [TouchOutput::Stroke {
                event: StrokeEvent::Moved { .. },
                ..
            }]
        ));

        let out = tracker.handle(finger(1, TouchPhase::Ended, 5.0, 0.0));
        assert!(matches!(
            out[..],
            [TouchOutput::Stroke {
                event: StrokeEvent::Up { .. },
                ..
            }]
        ));
        assert_eq!(tracker.finger_count(), 0);
    }

    #[test]
    fn test_second_finger_cancels_stroke_and_begins_gesture() {
        let mut tracker = TouchTracker::new();
        tracker.handle(finger(1, TouchPhase::Started, 0.0, 0.0));
        let out = tracker.handle(finger(2, TouchPhase::Started, 100.0, 0.0));

        assert_eq!(out.len(), 2);
        assert!(matches!(
            out[0],
            TouchOutput::Stroke {
                event: StrokeEvent::Cancelled,
                ..
            }
        ));
        let frames = gesture_frames(&out);
        assert_eq!(frames[0].phase, GesturePhase::Began);
        assert_eq!(frames[0].touch_count, 2);
        assert!(tracker.is_gesturing());
    }

    #[test]
    fn test_pinch_rotate_pan_values() {
        let mut tracker = TouchTracker::new();
        tracker.handle(finger(1, TouchPhase::Started, 0.0, 0.0));
        tracker.handle(finger(2, TouchPhase::Started, 100.0, 0.0));

        // Spread to twice the distance.
        let out = tracker.handle(finger(2, TouchPhase::Moved, 200.0, 0.0));
        let frame = gesture_frames(&out)[0];
        assert_eq!(frame.phase, GesturePhase::Changed);
        assert!((frame.scale - 2.0).abs() < 1e-12);
        assert!(frame.rotation.abs() < 1e-12);
        assert_eq!(frame.translation, Vec2::new(50.0, 0.0));

        // Rotate a quarter turn around finger 1.
        let out = tracker.handle(finger(2, TouchPhase::Moved, 0.0, 200.0));
        let frame = gesture_frames(&out)[0];
        assert!((frame.rotation - FRAC_PI_2).abs() < 1e-12);
        assert!((frame.scale - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_accumulates_past_half_turn() {
        let mut tracker = TouchTracker::new();
        tracker.handle(finger(1, TouchPhase::Started, 0.0, 0.0));
        tracker.handle(finger(2, TouchPhase::Started, 100.0, 0.0));

        tracker.handle(finger(2, TouchPhase::Moved, 0.0, 100.0));
        tracker.handle(finger(2, TouchPhase::Moved, -100.0, 0.0));
        let out = tracker.handle(finger(2, TouchPhase::Moved, 0.0, -100.0));
        let frame = gesture_frames(&out)[0];
        assert!((frame.rotation - 3.0 * FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_lifting_finger_ends_gesture_and_locks() {
        let mut tracker = TouchTracker::new();
        tracker.handle(finger(1, TouchPhase::Started, 0.0, 0.0));
        tracker.handle(finger(2, TouchPhase::Started, 100.0, 0.0));
        tracker.handle(finger(2, TouchPhase::Moved, 150.0, 0.0));

        let out = tracker.handle(finger(2, TouchPhase::Ended, 150.0, 0.0));
        let frame = gesture_frames(&out)[0];
        assert_eq!(frame.phase, GesturePhase::Ended);
        assert!((frame.scale - 1.5).abs() < 1e-12);

        // Remaining finger must not start drawing.
        assert!(tracker.handle(finger(1, TouchPhase::Moved, 20.0, 20.0)).is_empty());
        assert!(tracker.handle(finger(1, TouchPhase::Ended, 20.0, 20.0)).is_empty());

        // After all fingers are up, a new touch draws again.
        let out = tracker.handle(finger(3, TouchPhase::Started, 0.0, 0.0));
        assert!(matches!(out[..], [TouchOutput::Stroke { .. }]));
    }

    #[test]
    fn test_cancelled_finger_cancels_gesture() {
        let mut tracker = TouchTracker::new();
        tracker.handle(finger(1, TouchPhase::Started, 0.0, 0.0));
        tracker.handle(finger(2, TouchPhase::Started, 100.0, 0.0));
        let out = tracker.handle(finger(1, TouchPhase::Cancelled, 0.0, 0.0));
        assert_eq!(gesture_frames(&out)[0].phase, GesturePhase::Cancelled);
    }

    #[test]
    fn test_third_finger_ends_gesture() {
        let mut tracker = TouchTracker::new();
        tracker.handle(finger(1, TouchPhase::Started, 0.0, 0.0));
        tracker.handle(finger(2, TouchPhase::Started, 100.0, 0.0));
        let out = tracker.handle(finger(3, TouchPhase::Started, 50.0, 50.0));

        assert_eq!(gesture_frames(&out)[0].phase, GesturePhase::Ended);
        assert!(!tracker.is_gesturing());
        assert!(tracker.handle(finger(1, TouchPhase::Moved, 10.0, 0.0)).is_empty());
    }

    #[test]
    fn test_pen_draws_alongside_fingers() {
        let mut tracker = TouchTracker::new();
        tracker.handle(finger(1, TouchPhase::Started, 0.0, 0.0));
        tracker.handle(finger(2, TouchPhase::Started, 100.0, 0.0));

        let pen = TouchEvent {
            id: 9,
            phase: TouchPhase::Started,
            position: Point::new(10.0, 10.0),
            source: InputSource::Pen,
            pressure: 0.4,
        };
        let out = tracker.handle(pen);
        assert!(matches!(
            out[..],
            [TouchOutput::Stroke {
                source: InputSource::Pen,
                event: StrokeEvent::Down { .. }
            }]
        ));
        assert!(tracker.is_gesturing());
    }

    fn feed(tracker: &mut TouchTracker, canvas: &mut InkCanvas, event: TouchEvent) {
        for output in tracker.handle(event) {
            let TouchOutput::Stroke { source, event } = output else {
                continue;
            };
            match event {
                StrokeEvent::Down { position, pressure } => canvas.pointer_down(source, position, pressure),
                StrokeEvent::Moved { position, pressure } => canvas.pointer_moved(source, position, pressure),
                StrokeEvent::Up { position, pressure } => canvas.pointer_up(source, position, pressure),
                StrokeEvent::Cancelled => canvas.pointer_cancelled(source),
            }
        }
    }

    #[test]
    fn test_pen_stroke_survives_two_finger_gesture() {
        let mut tracker = TouchTracker::new();
        let mut canvas = InkCanvas::new();
        let pen = |phase, x| TouchEvent {
            id: 9,
            phase,
            position: Point::new(x, 10.0),
            source: InputSource::Pen,
            pressure: 0.5,
        };

        feed(&mut tracker, &mut canvas, pen(TouchPhase::Started, 0.0));
        feed(&mut tracker, &mut canvas, pen(TouchPhase::Moved, 20.0));
        feed(&mut tracker, &mut canvas, finger(1, TouchPhase::Started, 100.0, 100.0));
        feed(&mut tracker, &mut canvas, finger(2, TouchPhase::Started, 200.0, 100.0));
        feed(&mut tracker, &mut canvas, finger(2, TouchPhase::Moved, 250.0, 100.0));
        assert!(tracker.is_gesturing());
        assert!(canvas.is_capturing());

        feed(&mut tracker, &mut canvas, pen(TouchPhase::Ended, 40.0));
        assert_eq!(canvas.drawing().len(), 1);
        assert_eq!(canvas.drawing().strokes()[0].len(), 3);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI / 2.0) + FRAC_PI_2).abs() < 1e-12);
        assert!((wrap_angle(-3.0 * PI / 2.0) - FRAC_PI_2).abs() < 1e-12);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-12);
    }
}
