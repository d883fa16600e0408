// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Remote annotation store.
//!
//! The store is a collection keyed by `(video, annotation)` supporting
//! create, update, delete and list. Calls are blocking; the dispatcher in
//! [`super::dispatch`] runs them off the UI thread. No retries happen here.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::models::annotation::{Annotation, AnnotationDraft, AnnotationId, VideoId};
use crate::models::video::VideoEntry;

/// Failure of a store call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The targeted annotation no longer exists.
    #[error("annotation not found")]
    NotFound,
    /// The store answered with a non-success status.
    #[error("store rejected the request with status {status}")]
    Rejected { status: u16 },
    /// The request never got an answer.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The store answered with something that is not a valid record.
    #[error("malformed store response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Rejected {
                status: status.as_u16(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Operations the editor needs from a remote annotation collection.
pub trait AnnotationStore: Send + Sync {
    /// Persist a new annotation; the returned record carries its assigned id.
    fn create(&self, video_id: &VideoId, draft: &AnnotationDraft) -> Result<Annotation, StoreError>;

    /// Replace an existing annotation.
    fn update(
        &self,
        video_id: &VideoId,
        id: &AnnotationId,
        draft: &AnnotationDraft,
    ) -> Result<Annotation, StoreError>;

    /// Remove an annotation.
    fn delete(&self, video_id: &VideoId, id: &AnnotationId) -> Result<(), StoreError>;

    /// All annotations of a video, in store order. Empty is not an error.
    fn list(&self, video_id: &VideoId) -> Result<Vec<Annotation>, StoreError>;

    /// Videos available for annotation.
    fn list_videos(&self) -> Result<Vec<VideoEntry>, StoreError>;

    /// Playable URL of a video, if the store knows one.
    fn video_url(&self, video_id: &VideoId) -> Result<Option<String>, StoreError>;
}

/// Which operation a status code answers; only update/delete can miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

/// Map a response status to the error it stands for, if any.
fn classify_status(operation: Operation, status: StatusCode) -> Option<StoreError> {
    if status.is_success() {
        return None;
    }
    match operation {
        Operation::Update | Operation::Delete if status == StatusCode::NOT_FOUND => {
            Some(StoreError::NotFound)
        }
        _ => Some(StoreError::Rejected {
            status: status.as_u16(),
        }),
    }
}

/// Store client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: String,
    client: Client,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn collection_url(&self, video_id: &VideoId) -> String {
        format!("{}/annotations/{}", self.base_url, video_id)
    }

    fn record_url(&self, video_id: &VideoId, id: &AnnotationId) -> String {
        format!("{}/annotations/{}/{}", self.base_url, video_id, id)
    }

    fn check(operation: Operation, response: Response) -> Result<Response, StoreError> {
        match classify_status(operation, response.status()) {
            Some(err) => Err(err),
            None => Ok(response),
        }
    }
}

/// Stamp records with the video they were requested for.
fn with_video(video_id: &VideoId, mut annotation: Annotation) -> Annotation {
    if annotation.video_id.is_empty() {
        annotation.video_id = video_id.clone();
    }
    annotation
}

impl AnnotationStore for HttpStore {
    fn create(&self, video_id: &VideoId, draft: &AnnotationDraft) -> Result<Annotation, StoreError> {
        let response = self.client.post(self.collection_url(video_id)).json(draft).send()?;
        let created: Annotation = Self::check(Operation::Create, response)?.json()?;
        if created.id.is_none() {
            return Err(StoreError::Malformed(
                "created record carries no id".to_string(),
            ));
        }
        Ok(with_video(video_id, created))
    }

    fn update(
        &self,
        video_id: &VideoId,
        id: &AnnotationId,
        draft: &AnnotationDraft,
    ) -> Result<Annotation, StoreError> {
        let response = self.client.put(self.record_url(video_id, id)).json(draft).send()?;
        let body = Self::check(Operation::Update, response)?.text()?;

        // Some stores answer updates with an empty body
        if body.trim().is_empty() {
            return Ok(Annotation::from_draft(
                video_id.clone(),
                Some(id.clone()),
                draft.clone(),
            ));
        }

        let mut updated: Annotation = serde_json::from_str(&body)?;
        if updated.id.is_none() {
            updated.id = Some(id.clone());
        }
        Ok(with_video(video_id, updated))
    }

    fn delete(&self, video_id: &VideoId, id: &AnnotationId) -> Result<(), StoreError> {
        let response = self.client.delete(self.record_url(video_id, id)).send()?;
        Self::check(Operation::Delete, response)?;
        Ok(())
    }

    fn list(&self, video_id: &VideoId) -> Result<Vec<Annotation>, StoreError> {
        let response = self.client.get(self.collection_url(video_id)).send()?;
        let records: Vec<Annotation> = Self::check(Operation::Read, response)?.json()?;
        Ok(records
            .into_iter()
            .map(|annotation| with_video(video_id, annotation))
            .collect())
    }

    fn list_videos(&self) -> Result<Vec<VideoEntry>, StoreError> {
        let response = self.client.get(format!("{}/videos", self.base_url)).send()?;
        Ok(Self::check(Operation::Read, response)?.json()?)
    }

    fn video_url(&self, video_id: &VideoId) -> Result<Option<String>, StoreError> {
        #[derive(Deserialize)]
        struct UrlBody {
            url: Option<String>,
        }

        let response = self
            .client
            .get(format!("{}/video_url/{}", self.base_url, video_id))
            .send()?;
        let body: UrlBody = Self::check(Operation::Read, response)?.json()?;
        Ok(body.url)
    }
}

/// In-process store used for offline sessions and tests.
///
/// Ids are assigned sequentially. `fail_next` makes the next call fail with
/// the given error, whatever it is.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: u64,
    videos: Vec<VideoEntry>,
    annotations: HashMap<VideoId, Vec<Annotation>>,
    fail_next: Option<StoreError>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that lists the given videos, each with no annotations.
    pub fn with_videos(videos: Vec<VideoEntry>) -> Self {
        let store = Self::default();
        if let Ok(mut inner) = store.inner.lock() {
            inner.videos = videos;
        }
        store
    }

    pub fn fail_next(&self, err: StoreError) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_next = Some(err);
        }
    }

    fn with_inner<T>(
        &self,
        f: impl FnOnce(&mut MemoryInner) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Transport("memory store poisoned".to_string()))?;
        if let Some(err) = inner.fail_next.take() {
            return Err(err);
        }
        f(&mut inner)
    }
}

impl AnnotationStore for MemoryStore {
    fn create(&self, video_id: &VideoId, draft: &AnnotationDraft) -> Result<Annotation, StoreError> {
        self.with_inner(|inner| {
            inner.next_id += 1;
            let id = AnnotationId::new(inner.next_id.to_string());
            let record = Annotation::from_draft(video_id.clone(), Some(id), draft.clone());
            inner
                .annotations
                .entry(video_id.clone())
                .or_default()
                .push(record.clone());
            Ok(record)
        })
    }

    fn update(
        &self,
        video_id: &VideoId,
        id: &AnnotationId,
        draft: &AnnotationDraft,
    ) -> Result<Annotation, StoreError> {
        self.with_inner(|inner| {
            let slot = inner
                .annotations
                .get_mut(video_id)
                .and_then(|records| records.iter_mut().find(|a| a.id.as_ref() == Some(id)))
                .ok_or(StoreError::NotFound)?;
            *slot = Annotation::from_draft(video_id.clone(), Some(id.clone()), draft.clone());
            Ok(slot.clone())
        })
    }

    fn delete(&self, video_id: &VideoId, id: &AnnotationId) -> Result<(), StoreError> {
        self.with_inner(|inner| {
            let records = inner
                .annotations
                .get_mut(video_id)
                .ok_or(StoreError::NotFound)?;
            let position = records
                .iter()
                .position(|a| a.id.as_ref() == Some(id))
                .ok_or(StoreError::NotFound)?;
            records.remove(position);
            Ok(())
        })
    }

    fn list(&self, video_id: &VideoId) -> Result<Vec<Annotation>, StoreError> {
        self.with_inner(|inner| Ok(inner.annotations.get(video_id).cloned().unwrap_or_default()))
    }

    fn list_videos(&self) -> Result<Vec<VideoEntry>, StoreError> {
        self.with_inner(|inner| Ok(inner.videos.clone()))
    }

    fn video_url(&self, _video_id: &VideoId) -> Result<Option<String>, StoreError> {
        self.with_inner(|_| Ok(None))
    }
}
