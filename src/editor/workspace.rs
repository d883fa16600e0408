// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Page-level controller for one displayed video.
//!
//! The workspace owns the committed annotations of the active video and the
//! authoring [`Machine`]. It turns machine effects into store requests and
//! folds store responses back into the collection. The collection only
//! changes once the store has confirmed a call.

use std::collections::HashSet;

use super::listing::{self, ListEntry};
use super::machine::{Effect, Input, Machine};
use crate::config::Palette;
use crate::io::dispatch::{StoreReply, StoreRequest, StoreResponse};
use crate::io::store::StoreError;
use crate::models::annotation::{Annotation, AnnotationId, VideoId};

/// Work for the application to carry out after an input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Seek(f64),
    Store(StoreRequest),
}

/// Message for the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

pub struct Workspace {
    palette: Palette,
    video_id: Option<VideoId>,
    annotations: Vec<Annotation>,
    /// Bumped on every change of `annotations`.
    revision: u64,
    machine: Machine,
    /// Update/delete calls awaiting a response.
    in_flight: HashSet<(VideoId, AnnotationId)>,
    loading: bool,
    notice: Option<Notice>,
}

impl Workspace {
    pub fn new(palette: Palette) -> Self {
        let machine = Machine::new(palette.default_color());
        Self {
            palette,
            video_id: None,
            annotations: Vec::new(),
            revision: 0,
            machine,
            in_flight: HashSet::new(),
            loading: false,
            notice: None,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        self.video_id.as_ref()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Make `video_id` the displayed video and load its annotations.
    pub fn switch_video(&mut self, video_id: Option<VideoId>) -> Vec<Command> {
        if video_id == self.video_id {
            return Vec::new();
        }

        log::info!("Switching to video {:?}", video_id);
        self.step(Input::Reset);
        self.annotations.clear();
        self.revision += 1;
        self.notice = None;
        self.video_id = video_id;
        self.refresh()
    }

    /// Reload the collection from the store.
    pub fn refresh(&mut self) -> Vec<Command> {
        match &self.video_id {
            Some(video_id) => {
                self.loading = true;
                vec![Command::Store(StoreRequest::List {
                    video_id: video_id.clone(),
                })]
            }
            None => Vec::new(),
        }
    }

    /// Whether a store call for the annotation at `index` is in flight.
    pub fn is_busy(&self, index: usize) -> bool {
        self.annotations
            .get(index)
            .is_some_and(|annotation| self.is_annotation_busy(annotation))
    }

    fn is_annotation_busy(&self, annotation: &Annotation) -> bool {
        match (&self.video_id, &annotation.id) {
            (Some(video_id), Some(id)) => self.in_flight.contains(&(video_id.clone(), id.clone())),
            _ => false,
        }
    }

    /// List rows for the current collection.
    pub fn listing(&self) -> Vec<ListEntry> {
        listing::project(&self.annotations, self.machine.editing_target(), |annotation| {
            self.is_annotation_busy(annotation)
        })
    }

    /// Feed one input to the authoring machine.
    pub fn handle(&mut self, input: Input) -> Vec<Command> {
        match &input {
            Input::SetTag(tag) if !tag.is_empty() && !self.palette.has_tag(tag) => {
                self.warn(format!("Unknown tag '{}'", tag));
                return Vec::new();
            }
            Input::SetColor(color) if !self.palette.has_color(color) => {
                self.warn(format!("Unknown color '{}'", color));
                return Vec::new();
            }
            Input::PointerDown(_) | Input::Select(_) if self.video_id.is_none() => {
                return Vec::new();
            }
            _ => {}
        }

        match self.step(input) {
            Some(effect) => self.perform(effect),
            None => Vec::new(),
        }
    }

    /// Delete the annotation at `index` straight from the list.
    pub fn delete_at(&mut self, index: usize) -> Vec<Command> {
        let Some(id) = self.annotations.get(index).and_then(|a| a.id.clone()) else {
            return Vec::new();
        };
        self.request_targeted(id, |video_id, id| StoreRequest::Delete { video_id, id })
    }

    /// Fold a finished store call into the workspace.
    pub fn apply(&mut self, response: StoreResponse) -> Vec<Command> {
        let StoreResponse { request, outcome } = response;

        if let (Some(video_id), Some(id)) = (request.video_id(), request.target()) {
            self.in_flight.remove(&(video_id.clone(), id.clone()));
        }

        let Some(video_id) = request.video_id() else {
            return Vec::new();
        };
        if Some(video_id) != self.video_id.as_ref() {
            log::debug!("Discarding stale response for video {}", video_id);
            return Vec::new();
        }

        match (request, outcome) {
            (StoreRequest::List { .. }, Ok(StoreReply::Annotations(annotations))) => {
                self.loading = false;
                log::info!("Loaded {} annotations", annotations.len());
                self.annotations = annotations;
                self.revision += 1;
                self.follow_edit();
                Vec::new()
            }
            (StoreRequest::List { .. }, Err(err)) => {
                self.loading = false;
                self.fail("Failed to load annotations", &err);
                Vec::new()
            }
            (StoreRequest::Create { .. }, Ok(StoreReply::Annotation(record))) => {
                let known = record.id.as_ref().and_then(|id| self.position_of(id));
                match known {
                    Some(index) => {
                        log::debug!("Created annotation {:?} already listed", record.id);
                        self.annotations[index] = record;
                    }
                    None => {
                        log::info!(
                            "Created annotation {:?}, total: {}",
                            record.id,
                            self.annotations.len() + 1
                        );
                        self.annotations.push(record);
                    }
                }
                self.revision += 1;
                Vec::new()
            }
            (StoreRequest::Update { id, .. }, Ok(StoreReply::Annotation(record))) => {
                match self.position_of(&id) {
                    Some(index) => {
                        log::info!("Updated annotation {}", id);
                        self.annotations[index] = record;
                        self.revision += 1;
                    }
                    None => log::warn!("Updated annotation {} is no longer listed", id),
                }
                Vec::new()
            }
            (StoreRequest::Delete { id, .. }, Ok(StoreReply::Deleted)) => {
                if let Some(index) = self.position_of(&id) {
                    self.annotations.remove(index);
                    self.revision += 1;
                }
                self.follow_edit();
                log::info!("Deleted annotation {}, total: {}", id, self.annotations.len());
                Vec::new()
            }
            (StoreRequest::Update { id, .. }, Err(StoreError::NotFound))
            | (StoreRequest::Delete { id, .. }, Err(StoreError::NotFound)) => {
                self.warn(format!("Annotation {} no longer exists, reloading", id));
                if self.machine.editing_id() == Some(&id) {
                    self.step(Input::Cancel);
                }
                self.refresh()
            }
            (StoreRequest::Create { .. }, Err(err)) => {
                self.fail("Failed to save annotation", &err);
                Vec::new()
            }
            (StoreRequest::Update { .. }, Err(err)) => {
                self.fail("Failed to update annotation", &err);
                Vec::new()
            }
            (StoreRequest::Delete { .. }, Err(err)) => {
                self.fail("Failed to delete annotation", &err);
                Vec::new()
            }
            (request, outcome) => {
                log::warn!("Unexpected store reply {:?} for {:?}", outcome, request);
                Vec::new()
            }
        }
    }

    fn step(&mut self, input: Input) -> Option<Effect> {
        let machine = std::mem::take(&mut self.machine);
        let (next, effect) = machine.step(input, &self.annotations);
        self.machine = next;
        effect
    }

    fn perform(&mut self, effect: Effect) -> Vec<Command> {
        match effect {
            Effect::Seek(seconds) => vec![Command::Seek(seconds)],
            Effect::Create(draft) => match &self.video_id {
                Some(video_id) => vec![Command::Store(StoreRequest::Create {
                    video_id: video_id.clone(),
                    draft,
                })],
                None => Vec::new(),
            },
            Effect::Update { id, draft, .. } => {
                self.request_targeted(id, |video_id, id| StoreRequest::Update {
                    video_id,
                    id,
                    draft,
                })
            }
            Effect::Delete { id, .. } => {
                self.request_targeted(id, |video_id, id| StoreRequest::Delete { video_id, id })
            }
            Effect::Rejected(reason) => {
                self.notice = Some(Notice::Warning(format!("Annotation not saved: {}", reason)));
                Vec::new()
            }
        }
    }

    /// Issue an update/delete unless one for the same annotation is pending.
    fn request_targeted<F>(&mut self, id: AnnotationId, build: F) -> Vec<Command>
    where
        F: FnOnce(VideoId, AnnotationId) -> StoreRequest,
    {
        let Some(video_id) = self.video_id.clone() else {
            return Vec::new();
        };
        let key = (video_id.clone(), id.clone());
        if self.in_flight.contains(&key) {
            self.warn(format!("Annotation {} is still being saved", id));
            return Vec::new();
        }
        self.in_flight.insert(key);
        vec![Command::Store(build(video_id, id))]
    }

    fn position_of(&self, id: &AnnotationId) -> Option<usize> {
        self.annotations
            .iter()
            .position(|annotation| annotation.id.as_ref() == Some(id))
    }

    /// Leave editing if the edited record moved or vanished.
    /// Keep the edit on its record after rows shift, or end it when the
    /// record is gone.
    fn follow_edit(&mut self) {
        let Some(id) = self.machine.editing_id() else {
            return;
        };
        match self.position_of(id) {
            Some(index) => self.machine.retarget(index),
            None => {
                self.step(Input::Cancel);
            }
        }
    }

    fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.notice = Some(Notice::Warning(message));
    }

    fn fail(&mut self, context: &str, err: &StoreError) {
        log::error!("{}: {}", context, err);
        self.notice = Some(Notice::Error(format!("{}: {}", context, err)));
    }
}
