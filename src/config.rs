// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings come from a YAML file: the path in `VIDRECT_CONFIG`, else
//! `vidrect.yaml` in the working directory, else built-in defaults.
//! `VIDRECT_STORE_URL` overrides the store location.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_ENV: &str = "VIDRECT_CONFIG";
const STORE_URL_ENV: &str = "VIDRECT_STORE_URL";
const DEFAULT_CONFIG_FILE: &str = "vidrect.yaml";

/// Closed sets of labels and display colors offered to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub tags: Vec<String>,
    pub colors: Vec<String>,
}

impl Palette {
    /// Color used when nothing else was chosen: the first configured one.
    pub fn default_color(&self) -> &str {
        self.colors.first().map(String::as_str).unwrap_or_default()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn has_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }
}

/// Size of the video frame the overlay is drawn on, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the annotation store.
    pub store_url: String,
    /// Keep everything in memory instead of talking to the store.
    pub offline: bool,
    pub tags: Vec<String>,
    pub colors: Vec<String>,
    pub frame: FrameSize,
    /// Length of the playback timeline.
    pub duration_secs: f64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:5000".to_string(),
            offline: false,
            tags: vec!["Car".to_string(), "Tree".to_string(), "Building".to_string()],
            colors: vec![
                "red".to_string(),
                "blue".to_string(),
                "green".to_string(),
                "yellow".to_string(),
            ],
            frame: FrameSize {
                width: 600.0,
                height: 338.0,
            },
            duration_secs: 600.0,
            request_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment and config file.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                log::info!("No config file found, using defaults");
                Self::default()
            }
        };

        if let Ok(url) = std::env::var(STORE_URL_ENV) {
            config.store_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&yaml)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Check the closed sets and sizes are usable.
    pub fn validate(&self) -> Result<()> {
        check_set("tags", &self.tags)?;
        check_set("colors", &self.colors)?;
        if !self.offline && self.store_url.trim().is_empty() {
            bail!("store_url must be set unless running offline");
        }
        if !(self.frame.width > 0.0 && self.frame.height > 0.0) {
            bail!("frame size must be positive");
        }
        if !(self.duration_secs.is_finite() && self.duration_secs > 0.0) {
            bail!("duration_secs must be a positive number");
        }
        Ok(())
    }

    pub fn palette(&self) -> Palette {
        Palette {
            tags: self.tags.clone(),
            colors: self.colors.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn check_set(name: &str, values: &[String]) -> Result<()> {
    if values.is_empty() {
        bail!("{} must list at least one entry", name);
    }
    let mut seen = HashSet::new();
    for value in values {
        if value.trim().is_empty() {
            bail!("{} must not contain empty entries", name);
        }
        if !seen.insert(value.as_str()) {
            bail!("{} lists '{}' more than once", name, value);
        }
    }
    Ok(())
}
