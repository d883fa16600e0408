// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! VIDRECT - video rectangle annotator
//!
//! A cross-platform desktop application for drawing labelled rectangles on
//! videos at specific timestamps and keeping them in a remote annotation
//! store.

mod app;
mod config;
mod editor;
mod io;
mod models;
mod ui;
mod util;

use std::sync::Arc;

use anyhow::{Context, Result};
use app::VidrectApp;
use config::AppConfig;
use io::store::{AnnotationStore, HttpStore, MemoryStore};
use models::annotation::VideoId;
use models::video::VideoEntry;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load()?;

    let store: Arc<dyn AnnotationStore> = if config.offline {
        log::info!("Running offline with an in-memory store");
        Arc::new(MemoryStore::with_videos(vec![VideoEntry {
            id: VideoId::new("demo"),
            name: "Demo video".to_string(),
        }]))
    } else {
        log::info!("Using annotation store at {}", config.store_url);
        Arc::new(
            HttpStore::new(&config.store_url, config.request_timeout())
                .context("Failed to create store client")?,
        )
    };

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 640.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("VIDRECT - Video Annotation Tool"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "VIDRECT",
        options,
        Box::new(move |cc| Ok(Box::new(VidrectApp::new(cc, config, store)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
