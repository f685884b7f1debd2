//! In-process inking surface: stroke capture, vector eraser and undo history.

use crate::state::{InkColor, InputPolicy, InputSource};
use crate::surface::{CanvasObserver, InkSurface};
use crate::tools::NativeTool;
use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;
use uuid::Uuid;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Extra hit radius for the eraser, in canvas units.
pub const ERASER_TOLERANCE: f64 = 4.0;

/// Unique identifier for a stroke.
pub type StrokeId = Uuid;

/// A single ink stroke in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: StrokeId,
    /// Sampled points of the stroke.
    pub points: Vec<Point>,
    /// Pressure for each point, in `[0, 1]`.
    pub pressures: Vec<f64>,
    pub color: InkColor,
    pub width: f64,
}

impl Stroke {
    /// Create an empty stroke.
    pub fn new(color: InkColor, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            pressures: Vec::new(),
            color,
            width,
        }
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    /// Append a sample to the stroke.
    pub fn add_point(&mut self, point: Point, pressure: f64) {
        self.points.push(point);
        self.pressures.push(pressure.clamp(0.0, 1.0));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of the stroke's points (not including its width).
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
    }

    /// Check whether `point` lies within `tolerance` of the stroke's inked area.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = tolerance + self.width / 2.0;

        if self.points.len() < 2 {
            return self
                .points
                .first()
                .is_some_and(|p| (point - *p).hypot() <= reach);
        }

        self.points.windows(2).any(|segment| {
            let (start, end) = (segment[0], segment[1]);
            let line_vec = end - start;
            let point_vec = point - start;

            let line_len_sq = line_vec.hypot2();
            if line_len_sq < f64::EPSILON {
                return point_vec.hypot() <= reach;
            }

            let t = (point_vec.dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
            let projection = start + line_vec * t;
            (point - projection).hypot() <= reach
        })
    }
}

/// The content of the canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    strokes: Vec<Stroke>,
}

impl Drawing {
    /// Create an empty drawing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Strokes in paint order (back to front).
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Remove every stroke hit by `point`. Returns the number removed.
    pub fn erase_at(&mut self, point: Point, tolerance: f64) -> usize {
        let before = self.strokes.len();
        self.strokes.retain(|s| !s.hit_test(point, tolerance));
        before - self.strokes.len()
    }

    /// Bounding box of all strokes.
    pub fn bounds(&self) -> Option<Rect> {
        self.strokes
            .iter()
            .map(Stroke::bounds)
            .reduce(|a, b| a.union(b))
    }
}

/// Pointer interaction in progress.
#[derive(Debug, Clone)]
enum ActiveInput {
    Inking {
        source: InputSource,
        stroke: Stroke,
    },
    Erasing {
        source: InputSource,
        /// Drawing as it was before this eraser pass.
        before: Drawing,
        removed: usize,
    },
}

impl ActiveInput {
    fn source(&self) -> InputSource {
        match self {
            ActiveInput::Inking { source, .. } | ActiveInput::Erasing { source, .. } => *source,
        }
    }
}

/// Inking surface that captures strokes in process.
///
/// Pointer positions arrive in screen coordinates and are mapped through
/// the inverse of the current view transform, so strokes are stored
/// independent of zoom, rotation and pan.
pub struct InkCanvas {
    drawing: Drawing,
    undo_stack: Vec<Drawing>,
    redo_stack: Vec<Drawing>,
    tool: NativeTool,
    input_policy: InputPolicy,
    view_transform: Affine,
    active: bool,
    current: Option<ActiveInput>,
    observer: Option<Box<dyn CanvasObserver>>,
}

impl fmt::Debug for InkCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InkCanvas")
            .field("strokes", &self.drawing.len())
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("tool", &self.tool)
            .field("input_policy", &self.input_policy)
            .field("view_transform", &self.view_transform)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Default for InkCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl InkCanvas {
    /// Create an empty canvas.
    pub fn new() -> Self {
        Self {
            drawing: Drawing::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            tool: NativeTool::default(),
            input_policy: InputPolicy::default(),
            view_transform: Affine::IDENTITY,
            active: false,
            current: None,
            observer: None,
        }
    }

    /// Register the content-change observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: Box<dyn CanvasObserver>) {
        self.observer = Some(observer);
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    pub fn tool(&self) -> NativeTool {
        self.tool
    }

    pub fn input_policy(&self) -> InputPolicy {
        self.input_policy
    }

    pub fn view_transform(&self) -> Affine {
        self.view_transform
    }

    /// Whether the canvas has been activated as the input target.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Stroke currently being drawn, for live preview.
    pub fn in_progress_stroke(&self) -> Option<&Stroke> {
        match &self.current {
            Some(ActiveInput::Inking { stroke, .. }) => Some(stroke),
            _ => None,
        }
    }

    /// Whether a pointer interaction is in progress.
    pub fn is_capturing(&self) -> bool {
        self.current.is_some()
    }

    fn to_canvas(&self, screen_point: Point) -> Point {
        self.view_transform.inverse() * screen_point
    }

    /// Push a snapshot to the undo stack (call before making changes).
    fn push_undo(&mut self, snapshot: Drawing) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();

        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.drawing_did_change(&self.drawing);
        }
    }

    /// Begin a pointer interaction.
    ///
    /// Ignored if the input policy rejects `source` or another interaction is in progress.
    pub fn pointer_down(&mut self, source: InputSource, screen_point: Point, pressure: f64) {
        if !self.input_policy.accepts(source) {
            log::trace!("Ignoring {:?} input: rejected by input policy", source);
            return;
        }
        if self.current.is_some() {
            return;
        }

        let point = self.to_canvas(screen_point);
        match self.tool {
            NativeTool::Ink { color, width } => {
                let mut stroke = Stroke::new(color, width);
                stroke.add_point(point, pressure);
                self.current = Some(ActiveInput::Inking { source, stroke });
            }
            NativeTool::VectorEraser => {
                let before = self.drawing.clone();
                let removed = self.drawing.erase_at(point, ERASER_TOLERANCE);
                self.current = Some(ActiveInput::Erasing {
                    source,
                    before,
                    removed,
                });
                if removed > 0 {
                    self.notify();
                }
            }
        }
    }

    /// Continue the interaction started by `source`.
    pub fn pointer_moved(&mut self, source: InputSource, screen_point: Point, pressure: f64) {
        let point = self.to_canvas(screen_point);
        let mut erased = false;

        match self.current.as_mut() {
            Some(input) if input.source() != source => return,
            Some(ActiveInput::Inking { stroke, .. }) => {
                stroke.add_point(point, pressure);
            }
            Some(ActiveInput::Erasing { removed, .. }) => {
                let count = self.drawing.erase_at(point, ERASER_TOLERANCE);
                *removed += count;
                erased = count > 0;
            }
            None => return,
        }

        if erased {
            self.notify();
        }
    }

    /// Finish the interaction started by `source`, committing its result.
    pub fn pointer_up(&mut self, source: InputSource, screen_point: Point, pressure: f64) {
        if self.current.as_ref().is_none_or(|input| input.source() != source) {
            return;
        }
        self.pointer_moved(source, screen_point, pressure);
        self.finish_input(true);
    }

    /// Abort the interaction started by `source`.
    ///
    /// An in-progress stroke is discarded; strokes already erased stay erased.
    pub fn pointer_cancelled(&mut self, source: InputSource) {
        if self.current.as_ref().is_none_or(|input| input.source() != source) {
            return;
        }
        self.finish_input(false);
    }

    fn finish_input(&mut self, commit_ink: bool) {
        match self.current.take() {
            Some(ActiveInput::Inking { stroke, .. }) if commit_ink => {
                let snapshot = self.drawing.clone();
                self.push_undo(snapshot);
                log::debug!("Committed stroke with {} points", stroke.len());
                self.drawing.add_stroke(stroke);
                self.notify();
            }
            Some(ActiveInput::Erasing {
                before, removed, ..
            }) if removed > 0 => {
                self.push_undo(before);
                log::debug!("Erased {} strokes", removed);
            }
            _ => {}
        }
    }
}

impl InkSurface for InkCanvas {
    fn activate(&mut self) {
        self.active = true;
    }

    fn set_tool(&mut self, tool: NativeTool) {
        if self.current.is_some() && tool != self.tool {
            self.finish_input(true);
        }
        self.tool = tool;
    }

    fn set_input_policy(&mut self, policy: InputPolicy) {
        self.input_policy = policy;
    }

    fn set_view_transform(&mut self, transform: Affine) {
        self.view_transform = transform;
    }

    fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        self.current = None;
        let current = mem::replace(&mut self.drawing, previous);
        self.redo_stack.push(current);
        self.notify();
        true
    }

    fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.current = None;
        let current = mem::replace(&mut self.drawing, next);
        self.undo_stack.push(current);
        self.notify();
        true
    }

    fn replace_with_empty(&mut self) {
        self.finish_input(false);
        if self.drawing.is_empty() {
            return;
        }
        let previous = mem::take(&mut self.drawing);
        self.push_undo(previous);
        self.notify();
    }
}
