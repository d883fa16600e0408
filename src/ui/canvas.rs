// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video frame and drawing overlay.
//!
//! This module shows the frame area, captures pointer drags on it and
//! paints the overlay display list with egui.

use crate::config::FrameSize;
use crate::editor::machine::Input;
use crate::ui::overlay::{Overlay, Surface};
use crate::util::geometry::{Point, Rect};
use crate::util::time::{format_timestamp, is_valid_time};

/// What the frame area should show besides the overlay.
pub struct FrameView<'a> {
    pub frame: FrameSize,
    pub video_name: Option<&'a str>,
    pub current_time: f64,
    pub loading: bool,
}

/// Display the frame area and translate pointer drags into machine inputs.
pub fn show(ui: &mut egui::Ui, view: &FrameView<'_>, overlay: &Overlay) -> Vec<Input> {
    let mut inputs = Vec::new();

    let available = ui.available_size();
    let x_offset = ((available.x - view.frame.width) / 2.0).max(0.0);
    ui.add_space(8.0);
    let (response, painter) = ui.allocate_painter(
        egui::vec2(view.frame.width + x_offset, view.frame.height),
        egui::Sense::drag(),
    );
    let frame_rect = egui::Rect::from_min_size(
        response.rect.min + egui::vec2(x_offset, 0.0),
        egui::vec2(view.frame.width, view.frame.height),
    );

    // Stand-in for the video picture
    painter.rect_filled(frame_rect, 0.0, egui::Color32::from_gray(25));
    painter.rect_stroke(frame_rect, 0.0, egui::Stroke::new(1.0, egui::Color32::from_gray(80)));

    let caption = match (view.video_name, view.loading) {
        (None, _) => "Select a video to begin annotating".to_string(),
        (Some(name), true) => format!("{}\nLoading annotations...", name),
        (Some(name), false) if is_valid_time(view.current_time) => {
            format!("{}\n{}", name, format_timestamp(view.current_time))
        }
        (Some(name), false) => name.to_string(),
    };
    painter.text(
        frame_rect.center(),
        egui::Align2::CENTER_CENTER,
        caption,
        egui::FontId::proportional(16.0),
        egui::Color32::from_gray(110),
    );

    let mut surface = EguiSurface {
        painter: painter.with_clip_rect(frame_rect),
        origin: frame_rect.min,
    };
    overlay.replay(&mut surface);

    if view.video_name.is_some() {
        let to_frame = |pos: egui::Pos2| {
            Point::new(
                (pos.x - frame_rect.min.x) as f64,
                (pos.y - frame_rect.min.y) as f64,
            )
        };

        if response.drag_started() {
            let origin = ui.input(|i| i.pointer.press_origin());
            if let Some(pos) = origin.or_else(|| response.interact_pointer_pos()) {
                if frame_rect.contains(pos) {
                    inputs.push(Input::PointerDown(to_frame(pos)));
                }
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                inputs.push(Input::PointerMove(to_frame(pos)));
            }
        }
        if response.drag_stopped() {
            inputs.push(Input::PointerUp);
        }
    }

    inputs
}

/// Paints surface commands relative to the frame's top-left corner.
struct EguiSurface {
    painter: egui::Painter,
    origin: egui::Pos2,
}

impl Surface for EguiSurface {
    fn clear(&mut self) {
        // egui starts every frame from a blank canvas
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32) {
        let rect = rect.normalized();
        let min = self.origin + egui::vec2(rect.x as f32, rect.y as f32);
        let screen = egui::Rect::from_min_size(min, egui::vec2(rect.width as f32, rect.height as f32));
        self.painter
            .rect_stroke(screen, 0.0, egui::Stroke::new(line_width, color32(color)));
    }
}

/// Resolve a configured color name or `#rrggbb` value.
pub fn color32(name: &str) -> egui::Color32 {
    parse_color(name).unwrap_or(egui::Color32::YELLOW)
}

fn parse_color(name: &str) -> Option<egui::Color32> {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
        return Some(egui::Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?));
    }

    let color = match name.to_ascii_lowercase().as_str() {
        "red" => egui::Color32::RED,
        "green" => egui::Color32::GREEN,
        "blue" => egui::Color32::from_rgb(60, 120, 255),
        "yellow" => egui::Color32::YELLOW,
        "orange" => egui::Color32::from_rgb(255, 165, 0),
        "purple" => egui::Color32::from_rgb(160, 32, 240),
        "cyan" => egui::Color32::from_rgb(0, 255, 255),
        "magenta" => egui::Color32::from_rgb(255, 0, 255),
        "white" => egui::Color32::WHITE,
        "black" => egui::Color32::BLACK,
        "gray" | "grey" => egui::Color32::GRAY,
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(parse_color("red"), Some(egui::Color32::RED));
        assert_eq!(parse_color(" Yellow "), Some(egui::Color32::YELLOW));
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_color("#ff8000"), Some(egui::Color32::from_rgb(255, 128, 0)));
        assert_eq!(parse_color("#ff80"), None);
        assert_eq!(parse_color("#gg0000"), None);
    }

    #[test]
    fn test_unknown_color_falls_back() {
        assert_eq!(color32("nope"), egui::Color32::YELLOW);
    }
}
