// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation list panel.
//!
//! Lists the committed annotations of the active video in store order,
//! with their time and color, and offers edit and delete actions.

use crate::editor::listing::ListEntry;
use crate::ui::canvas::color32;

/// Result of list panel interaction.
pub enum PropertiesAction {
    None,
    SelectAnnotation(usize),
    DeleteAnnotation(usize),
}

pub fn show(ui: &mut egui::Ui, entries: &[ListEntry], loading: bool) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Annotations");
    ui.separator();

    if loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading...");
        });
        return action;
    }
    if entries.is_empty() {
        ui.label(egui::RichText::new("No annotations yet").weak());
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for entry in entries {
            ui.horizontal(|ui| {
                let (swatch, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(swatch, 2.0, color32(&entry.color));

                let label = ui.selectable_label(entry.editing, entry.label());
                let rect = entry.rect;
                let label = label.on_hover_text(format!(
                    "({}, {}, {}, {})",
                    rect.x, rect.y, rect.width, rect.height
                ));
                if label.clicked() && !entry.editing {
                    action = PropertiesAction::SelectAnnotation(entry.index);
                }

                if ui
                    .add_enabled(!entry.busy, egui::Button::new("🗑").small())
                    .on_hover_text("Delete")
                    .clicked()
                {
                    action = PropertiesAction::DeleteAnnotation(entry.index);
                }
                if entry.busy {
                    ui.spinner();
                }
            });
        }
    });

    action
}
