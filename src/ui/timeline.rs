// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video timeline scrubber control.
//!
//! Play/pause and a scrubber over the playhead. Scrubbing is disabled while
//! an annotation is being edited, since the edit is bound to its own time.

use crate::io::media::{ClockPlayback, PlaybackSource};
use crate::util::time::format_timestamp;

pub fn show(ui: &mut egui::Ui, playback: &mut ClockPlayback, locked: bool) {
    ui.horizontal(|ui| {
        let label = if playback.is_playing() { "⏸" } else { "▶" };
        if ui.add_enabled(!locked, egui::Button::new(label)).clicked() {
            playback.toggle();
        }
        if ui.add_enabled(!locked, egui::Button::new("⏮")).clicked() {
            playback.rewind();
        }

        let mut position = playback.current_time();
        let slider = egui::Slider::new(&mut position, 0.0..=playback.duration())
            .show_value(false);
        if ui.add_enabled(!locked, slider).changed() {
            playback.seek_to(position);
        }

        ui.monospace(format!(
            "{} / {}",
            format_timestamp(playback.current_time()),
            format_timestamp(playback.duration())
        ));
    });
}
