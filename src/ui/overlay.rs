// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay drawing on top of the video frame.
//!
//! The overlay keeps a display list of surface commands and rebuilds it only
//! when something it depends on changes: the video, the committed
//! annotations, the in-progress rectangle or the selected color.

use crate::models::annotation::{Annotation, VideoId};
use crate::util::geometry::Rect;

/// Stroke width of every rectangle.
pub const LINE_WIDTH: f32 = 2.0;

/// A 2D surface the overlay can draw on.
pub trait Surface {
    /// Wipe previous output. Immediate-mode backends that start every frame
    /// blank may implement this as a no-op.
    fn clear(&mut self);

    /// Stroke the outline of `rect`. Extents may be negative.
    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    StrokeRect {
        rect: Rect,
        color: String,
        line_width: f32,
    },
}

/// Everything the display list depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStamp {
    pub video_id: Option<VideoId>,
    pub revision: u64,
    pub in_progress: Option<Rect>,
    pub color: String,
}

#[derive(Debug, Default)]
pub struct Overlay {
    stamp: Option<OverlayStamp>,
    commands: Vec<DrawCommand>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the display list if `stamp` differs from the last one.
    ///
    /// Returns whether a rebuild happened.
    pub fn sync(&mut self, stamp: OverlayStamp, annotations: &[Annotation]) -> bool {
        if self.stamp.as_ref() == Some(&stamp) {
            return false;
        }

        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        if stamp.video_id.is_some() {
            for annotation in annotations {
                self.commands.push(DrawCommand::StrokeRect {
                    rect: annotation.rect(),
                    color: annotation.color.clone(),
                    line_width: LINE_WIDTH,
                });
            }
            if let Some(rect) = stamp.in_progress {
                self.commands.push(DrawCommand::StrokeRect {
                    rect,
                    color: stamp.color.clone(),
                    line_width: LINE_WIDTH,
                });
            }
        }
        self.stamp = Some(stamp);
        true
    }

    #[cfg(test)]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Issue the display list to a surface.
    pub fn replay(&self, surface: &mut dyn Surface) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear => surface.clear(),
                DrawCommand::StrokeRect {
                    rect,
                    color,
                    line_width,
                } => surface.stroke_rect(*rect, color, *line_width),
            }
        }
    }
}
