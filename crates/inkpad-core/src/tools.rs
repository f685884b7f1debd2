//! Translation from tool selection to the tool object the inking surface uses.

use crate::state::{InkColor, InkStyle, ToolSelection};
use serde::{Deserialize, Serialize};

/// Tool descriptor pushed to the inking surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NativeTool {
    /// Draws ink with the given color and width.
    Ink { color: InkColor, width: f64 },
    /// Removes whole strokes it touches.
    VectorEraser,
}

impl NativeTool {
    /// Build the tool for a selection.
    ///
    /// The eraser never consults the ink style.
    pub fn for_selection(selection: ToolSelection, style: &InkStyle) -> Self {
        match selection {
            ToolSelection::Pen => NativeTool::Ink {
                color: style.color(),
                width: style.width(),
            },
            ToolSelection::Eraser => NativeTool::VectorEraser,
        }
    }

    pub fn is_eraser(&self) -> bool {
        matches!(self, NativeTool::VectorEraser)
    }
}

impl Default for NativeTool {
    fn default() -> Self {
        Self::for_selection(ToolSelection::default(), &InkStyle::default())
    }
}
