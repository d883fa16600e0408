// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! An annotation is a labelled, colored rectangle bound to one timestamp of
//! one video. Drafts are what gets sent to the store; annotations are what
//! the store hands back, carrying the identifier it assigned.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::util::geometry::Rect;

/// Identifier of a video, as used in store routes.
///
/// Stores disagree on whether ids are strings or integers, so both are
/// accepted on input and kept as text (same for [`AnnotationId`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store-assigned annotation identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AnnotationId(pub String);

impl AnnotationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AnnotationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        text_or_integer(deserializer).map(AnnotationId)
    }
}

impl<'de> Deserialize<'de> for VideoId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        text_or_integer(deserializer).map(VideoId)
    }
}

fn text_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Integer(n) => n.to_string(),
    })
}

/// Annotation payload submitted to the store on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDraft {
    pub tag: String,
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
}

/// An annotation record as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AnnotationId>,
    #[serde(rename = "videoId", default, skip_serializing_if = "VideoId::is_empty")]
    pub video_id: VideoId,
    pub tag: String,
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub color: String,
}

impl Annotation {
    /// Combine a draft with the identity the store gave it.
    pub fn from_draft(video_id: VideoId, id: Option<AnnotationId>, draft: AnnotationDraft) -> Self {
        Self {
            id,
            video_id,
            tag: draft.tag,
            time: draft.time,
            x: draft.x,
            y: draft.y,
            width: draft.width,
            height: draft.height,
            color: draft.color,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// The editable part of this record.
    #[cfg(test)]
    pub fn to_draft(&self) -> AnnotationDraft {
        AnnotationDraft {
            tag: self.tag.clone(),
            time: self.time,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            color: self.color.clone(),
        }
    }
}
