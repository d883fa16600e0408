// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Display projection of the committed annotations.

use crate::models::annotation::{Annotation, AnnotationId};
use crate::util::geometry::Rect;
use crate::util::time::{format_timestamp, is_valid_time};

/// One row of the annotation list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    /// Position in the committed collection.
    pub index: usize,
    pub id: Option<AnnotationId>,
    pub tag: String,
    pub color: String,
    /// `HH:MM:SS` of the bound time.
    pub timestamp: String,
    pub rect: Rect,
    /// This row is the current edit target.
    pub editing: bool,
    /// A store call for this row is in flight.
    pub busy: bool,
}

impl ListEntry {
    pub fn label(&self) -> String {
        format!("{} at {}", self.tag, self.timestamp)
    }
}

/// Project annotations into list rows, keeping collection order.
pub fn project<F>(annotations: &[Annotation], editing: Option<usize>, is_busy: F) -> Vec<ListEntry>
where
    F: Fn(&Annotation) -> bool,
{
    annotations
        .iter()
        .enumerate()
        .map(|(index, annotation)| ListEntry {
            index,
            id: annotation.id.clone(),
            tag: annotation.tag.clone(),
            color: annotation.color.clone(),
            timestamp: if is_valid_time(annotation.time) {
                format_timestamp(annotation.time)
            } else {
                "--:--:--".to_string()
            },
            rect: annotation.rect(),
            editing: editing == Some(index),
            busy: is_busy(annotation),
        })
        .collect()
}
