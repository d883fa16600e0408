// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video catalogue entries.

use serde::{Deserialize, Serialize};

use super::annotation::VideoId;

/// A video the store knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub id: VideoId,
    #[serde(default)]
    pub name: String,
}

impl VideoEntry {
    /// Name to show in the video picker, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}
