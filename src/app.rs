// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the application structure that implements the
//! eframe::App trait. It owns the video selection, feeds pointer input and
//! playback time to the workspace, and runs the store calls and seeks the
//! workspace asks for.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::editor::machine::{Input, Mode};
use crate::editor::workspace::{Command, Notice, Workspace};
use crate::io::dispatch::{StoreReply, StoreRequest, StoreResponse, StoreWorker};
use crate::io::media::{ClockPlayback, PlaybackSource};
use crate::io::serialization::{self, ExportFile};
use crate::io::store::AnnotationStore;
use crate::models::annotation::VideoId;
use crate::models::video::VideoEntry;
use crate::ui::overlay::{Overlay, OverlayStamp};
use crate::ui::{canvas, properties, timeline, toolbar};

/// Main application state.
pub struct VidrectApp {
    config: AppConfig,

    /// Annotations and authoring state of the active video
    workspace: Workspace,

    /// Background store calls
    worker: StoreWorker,

    /// Playhead of the active video
    playback: ClockPlayback,

    /// Display list drawn over the video frame
    overlay: Overlay,

    /// Videos offered in the picker
    videos: Vec<VideoEntry>,

    /// Playable URL of the active video, when the store has one
    video_url: Option<String>,
}

impl VidrectApp {
    /// Create the application and start loading the video catalogue.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, store: Arc<dyn AnnotationStore>) -> Self {
        let mut worker = StoreWorker::new(store);
        let ctx = cc.egui_ctx.clone();
        worker.set_waker(Arc::new(move || ctx.request_repaint()));
        worker.submit(StoreRequest::ListVideos);

        Self {
            workspace: Workspace::new(config.palette()),
            worker,
            playback: ClockPlayback::new(config.duration_secs),
            overlay: Overlay::new(),
            videos: Vec::new(),
            video_url: None,
            config,
        }
    }

    fn run(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Seek(seconds) => {
                    self.playback.pause();
                    self.playback.seek_to(seconds);
                }
                Command::Store(request) => self.worker.submit(request),
            }
        }
    }

    fn handle(&mut self, input: Input) {
        let commands = self.workspace.handle(input);
        self.run(commands);
    }

    fn select_video(&mut self, video_id: Option<VideoId>) {
        if video_id.as_ref() == self.workspace.video_id() {
            return;
        }
        self.playback.rewind();
        self.video_url = None;
        if let Some(id) = &video_id {
            self.worker.submit(StoreRequest::VideoUrl {
                video_id: id.clone(),
            });
        }
        let commands = self.workspace.switch_video(video_id);
        self.run(commands);
    }

    fn receive(&mut self, response: StoreResponse) {
        let StoreResponse { request, outcome } = response;
        match request {
            StoreRequest::ListVideos => match outcome {
                Ok(StoreReply::Videos(videos)) => {
                    log::info!("Loaded {} videos", videos.len());
                    let first = videos.first().map(|video| video.id.clone());
                    self.videos = videos;
                    if self.workspace.video_id().is_none() {
                        self.select_video(first);
                    }
                }
                Ok(other) => log::warn!("Unexpected reply to video list request: {:?}", other),
                Err(e) => log::error!("Failed to fetch videos: {}", e),
            },
            StoreRequest::VideoUrl { video_id } => {
                if Some(&video_id) != self.workspace.video_id() {
                    return;
                }
                match outcome {
                    Ok(StoreReply::VideoUrl(url)) => self.video_url = url,
                    Ok(other) => log::warn!("Unexpected reply to video url request: {:?}", other),
                    Err(e) => log::error!("Failed to fetch video URL: {}", e),
                }
            }
            request => {
                let commands = self.workspace.apply(StoreResponse { request, outcome });
                self.run(commands);
            }
        }
    }

    /// Export the active video's annotations to a file.
    fn export_annotations(&self, path: std::path::PathBuf) {
        let Some(video_id) = self.workspace.video_id() else {
            return;
        };
        let data = ExportFile {
            video_id: video_id.clone(),
            annotations: self.workspace.annotations().to_vec(),
        };
        match serialization::export(&data, &path) {
            Ok(()) => log::info!("Exported annotations to {}", path.display()),
            Err(e) => log::error!("Failed to export annotations: {}", e),
        }
    }

    fn active_video_name(&self) -> Option<String> {
        let id = self.workspace.video_id()?;
        Some(
            self.videos
                .iter()
                .find(|video| &video.id == id)
                .map(|video| video.display_name().to_string())
                .unwrap_or_else(|| id.to_string()),
        )
    }

    /// Whether a store call for the edited annotation is in flight.
    fn edit_busy(&self) -> bool {
        self.workspace
            .machine()
            .editing_target()
            .is_some_and(|index| self.workspace.is_busy(index))
    }
}

impl eframe::App for VidrectApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply completed store calls
        for response in self.worker.poll() {
            self.receive(response);
        }

        // Observe the playhead
        let now = self.playback.current_time();
        self.handle(Input::TimeUpdate(now));
        if self.playback.is_playing() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let has_video = self.workspace.video_id().is_some();
                    ui.add_enabled_ui(has_video, |ui| {
                        ui.menu_button("Export Annotations", |ui| {
                            if ui.button("Export as YAML...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("YAML", &["yaml", "yml"])
                                    .set_file_name("annotations.yaml")
                                    .save_file()
                                {
                                    self.export_annotations(path);
                                }
                                ui.close_menu();
                            }
                            if ui.button("Export as JSON...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("JSON", &["json"])
                                    .set_file_name("annotations.json")
                                    .save_file()
                                {
                                    self.export_annotations(path);
                                }
                                ui.close_menu();
                            }
                        });
                        if ui.button("Reload Annotations").clicked() {
                            let commands = self.workspace.refresh();
                            self.run(commands);
                            ui.close_menu();
                        }
                    });
                    if ui.button("Reload Videos").clicked() {
                        self.worker.submit(StoreRequest::ListVideos);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Video picker and toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Select Video:");
                let selected = self.active_video_name().unwrap_or_default();
                let mut choice = None;
                egui::ComboBox::from_id_source("video")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for video in &self.videos {
                            let active = Some(&video.id) == self.workspace.video_id();
                            if ui.selectable_label(active, video.display_name()).clicked() {
                                choice = Some(video.id.clone());
                            }
                        }
                    });
                if let Some(video_id) = choice {
                    self.select_video(Some(video_id));
                }
                if let Some(url) = &self.video_url {
                    ui.label(egui::RichText::new(url.as_str()).weak());
                }
            });
            ui.separator();

            let busy = self.edit_busy();
            let inputs = toolbar::show(ui, self.workspace.palette(), self.workspace.machine(), busy);
            for input in inputs {
                self.handle(input);
            }
        });

        // Status line
        let mut dismiss = false;
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.workspace.notice() {
                    Some(Notice::Error(message)) => {
                        ui.colored_label(egui::Color32::LIGHT_RED, message.as_str());
                    }
                    Some(Notice::Warning(message)) => {
                        ui.colored_label(egui::Color32::YELLOW, message.as_str());
                    }
                    None => {
                        ui.label(format!("{} annotations", self.workspace.annotations().len()));
                    }
                }
                if self.workspace.notice().is_some() && ui.small_button("✖").clicked() {
                    dismiss = true;
                }
            });
        });
        if dismiss {
            self.workspace.dismiss_notice();
        }

        // Annotation list (right side)
        let entries = self.workspace.listing();
        let list_action = egui::SidePanel::right("annotations")
            .default_width(280.0)
            .show(ctx, |ui| properties::show(ui, &entries, self.workspace.is_loading()))
            .inner;

        match list_action {
            properties::PropertiesAction::SelectAnnotation(idx) => {
                self.handle(Input::Select(idx));
            }
            properties::PropertiesAction::DeleteAnnotation(idx) => {
                let commands = self.workspace.delete_at(idx);
                self.run(commands);
            }
            properties::PropertiesAction::None => {}
        }

        // Handle keyboard events
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.handle(Input::Cancel);
        }
        if !ctx.wants_keyboard_input()
            && ctx.input(|i| i.key_pressed(egui::Key::Delete))
            && !self.edit_busy()
        {
            self.handle(Input::Delete);
        }

        // Overlay follows the collection, the session and the color
        let machine = self.workspace.machine();
        let stamp = OverlayStamp {
            video_id: self.workspace.video_id().cloned(),
            revision: self.workspace.revision(),
            in_progress: machine.session().map(|session| session.rect()),
            color: machine.color().to_string(),
        };
        self.overlay.sync(stamp, self.workspace.annotations());

        // Video frame and timeline (center)
        let video_name = self.active_video_name();
        let locked = matches!(self.workspace.machine().mode(), Mode::Editing { .. });
        let inputs = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let view = canvas::FrameView {
                    frame: self.config.frame,
                    video_name: video_name.as_deref(),
                    current_time: now,
                    loading: self.workspace.is_loading(),
                };
                let inputs = canvas::show(ui, &view, &self.overlay);
                ui.add_space(8.0);
                if self.workspace.video_id().is_some() {
                    timeline::show(ui, &mut self.playback, locked);
                }
                inputs
            })
            .inner;

        for input in inputs {
            self.handle(input);
        }
    }
}
