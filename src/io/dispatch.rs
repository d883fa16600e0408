// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background execution of store calls.
//!
//! Every request runs on its own thread and its response comes back over a
//! channel that the UI drains once per frame, the same way image loading
//! was kept off the UI thread. Responses carry the request they answer so
//! the receiver can discard results for a video that is no longer active.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use super::store::{AnnotationStore, StoreError};
use crate::models::annotation::{Annotation, AnnotationDraft, AnnotationId, VideoId};
use crate::models::video::VideoEntry;

/// A store call to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreRequest {
    List {
        video_id: VideoId,
    },
    Create {
        video_id: VideoId,
        draft: AnnotationDraft,
    },
    Update {
        video_id: VideoId,
        id: AnnotationId,
        draft: AnnotationDraft,
    },
    Delete {
        video_id: VideoId,
        id: AnnotationId,
    },
    ListVideos,
    VideoUrl {
        video_id: VideoId,
    },
}

impl StoreRequest {
    /// The video this request is scoped to, if any.
    pub fn video_id(&self) -> Option<&VideoId> {
        match self {
            Self::List { video_id }
            | Self::Create { video_id, .. }
            | Self::Update { video_id, .. }
            | Self::Delete { video_id, .. }
            | Self::VideoUrl { video_id } => Some(video_id),
            Self::ListVideos => None,
        }
    }

    /// The existing annotation this request targets, if any.
    pub fn target(&self) -> Option<&AnnotationId> {
        match self {
            Self::Update { id, .. } | Self::Delete { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Successful result of a store call.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreReply {
    Annotations(Vec<Annotation>),
    Annotation(Annotation),
    Deleted,
    Videos(Vec<VideoEntry>),
    VideoUrl(Option<String>),
}

/// A finished store call.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreResponse {
    pub request: StoreRequest,
    pub outcome: Result<StoreReply, StoreError>,
}

/// Run one request against a store, synchronously.
pub fn execute(store: &dyn AnnotationStore, request: StoreRequest) -> StoreResponse {
    let outcome = match &request {
        StoreRequest::List { video_id } => store.list(video_id).map(StoreReply::Annotations),
        StoreRequest::Create { video_id, draft } => {
            store.create(video_id, draft).map(StoreReply::Annotation)
        }
        StoreRequest::Update {
            video_id,
            id,
            draft,
        } => store.update(video_id, id, draft).map(StoreReply::Annotation),
        StoreRequest::Delete { video_id, id } => {
            store.delete(video_id, id).map(|()| StoreReply::Deleted)
        }
        StoreRequest::ListVideos => store.list_videos().map(StoreReply::Videos),
        StoreRequest::VideoUrl { video_id } => store.video_url(video_id).map(StoreReply::VideoUrl),
    };
    StoreResponse { request, outcome }
}

/// Hook invoked from the worker thread when a response is ready.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Runs store requests off the UI thread.
pub struct StoreWorker {
    store: Arc<dyn AnnotationStore>,
    sender: Sender<StoreResponse>,
    receiver: Receiver<StoreResponse>,
    waker: Option<Waker>,
}

impl StoreWorker {
    pub fn new(store: Arc<dyn AnnotationStore>) -> Self {
        let (sender, receiver) = channel();
        Self {
            store,
            sender,
            receiver,
            waker: None,
        }
    }

    /// Install a callback run after each response is queued.
    pub fn set_waker(&mut self, waker: Waker) {
        self.waker = Some(waker);
    }

    /// Start a request in the background.
    pub fn submit(&self, request: StoreRequest) {
        let store = Arc::clone(&self.store);
        let sender = self.sender.clone();
        let waker = self.waker.clone();

        log::debug!("Submitting store request {:?}", request);

        std::thread::spawn(move || {
            let response = execute(store.as_ref(), request);
            // The receiver only goes away on shutdown
            let _ = sender.send(response);
            if let Some(waker) = waker {
                waker();
            }
        });
    }

    /// Take every response that has arrived so far.
    pub fn poll(&self) -> Vec<StoreResponse> {
        self.receiver.try_iter().collect()
    }
}
