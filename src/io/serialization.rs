// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation export.
//!
//! This module writes the annotations of one video to YAML or JSON files.

use std::path::Path;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::models::annotation::{Annotation, VideoId};

/// Exported annotations of a single video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportFile {
    #[serde(rename = "videoId")]
    pub video_id: VideoId,
    pub annotations: Vec<Annotation>,
}

/// Export to YAML format.
pub fn export_yaml(data: &ExportFile, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export to JSON format.
pub fn export_json(data: &ExportFile, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Export in the format named by the file extension.
pub fn export(data: &ExportFile, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(data, path),
        Some("json") => export_json(data, path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}
