// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with tag and color selection and the commit controls.

use crate::config::Palette;
use crate::editor::machine::{Input, Machine, Mode};
use crate::ui::canvas::color32;

/// Display the toolbar and return the inputs the user triggered.
///
/// `busy` disables the save and delete buttons while a store call for the
/// edited annotation is in flight.
pub fn show(ui: &mut egui::Ui, palette: &Palette, machine: &Machine, busy: bool) -> Vec<Input> {
    let mut inputs = Vec::new();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tag:");
        let tag_text = if machine.tag().is_empty() {
            "Select a tag"
        } else {
            machine.tag()
        };
        egui::ComboBox::from_id_source("tag")
            .selected_text(tag_text)
            .show_ui(ui, |ui| {
                if ui.selectable_label(machine.tag().is_empty(), "Select a tag").clicked() {
                    inputs.push(Input::SetTag(String::new()));
                }
                for tag in &palette.tags {
                    if ui.selectable_label(machine.tag() == tag.as_str(), tag.as_str()).clicked() {
                        inputs.push(Input::SetTag(tag.clone()));
                    }
                }
            });

        ui.label("Color:");
        egui::ComboBox::from_id_source("color")
            .selected_text(egui::RichText::new(machine.color()).color(color32(machine.color())))
            .show_ui(ui, |ui| {
                for color in &palette.colors {
                    let label = egui::RichText::new(color.as_str()).color(color32(color));
                    if ui.selectable_label(machine.color() == color.as_str(), label).clicked() {
                        inputs.push(Input::SetColor(color.clone()));
                    }
                }
            });

        ui.separator();

        let editing = matches!(machine.mode(), Mode::Editing { .. });
        let has_session = machine.session().is_some();

        if ui
            .add_enabled(has_session && !busy, egui::Button::new("Save Annotation"))
            .clicked()
        {
            inputs.push(Input::Commit);
        }
        if ui.add_enabled(has_session, egui::Button::new("Cancel")).clicked() {
            inputs.push(Input::Cancel);
        }
        if editing && ui.add_enabled(!busy, egui::Button::new("🗑 Delete")).clicked() {
            inputs.push(Input::Delete);
        }

        ui.separator();

        let hint = match machine.mode() {
            Mode::Idle => "Drag on the video to draw a rectangle",
            Mode::Drawing(_) => "Release to save the rectangle at the current time",
            Mode::Editing { .. } => "Drag to redraw, then save or delete",
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    inputs
}
