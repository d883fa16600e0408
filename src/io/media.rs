// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video playback position.
//!
//! The editor never decodes media. It only reads the current playback
//! position and asks for seeks, through [`PlaybackSource`].

use std::time::Instant;

/// Authoritative playback position of the displayed video.
pub trait PlaybackSource {
    /// Current position in seconds.
    fn current_time(&self) -> f64;

    /// Move the playhead to `seconds`.
    fn seek_to(&mut self, seconds: f64);
}

/// A playhead driven by the wall clock.
///
/// Stands in for a media player: it plays, pauses and seeks within
/// `[0, duration]` and stops at the end.
#[derive(Debug, Clone)]
pub struct ClockPlayback {
    duration: f64,
    /// Position when playback last started or was seeked.
    anchor_time: f64,
    /// Set while playing.
    started_at: Option<Instant>,
}

impl ClockPlayback {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            anchor_time: 0.0,
            started_at: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn play(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub fn pause(&mut self) {
        self.anchor_time = self.time_at(Instant::now());
        self.started_at = None;
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Go back to the start, paused.
    pub fn rewind(&mut self) {
        self.anchor_time = 0.0;
        self.started_at = None;
    }

    fn time_at(&self, now: Instant) -> f64 {
        let elapsed = self
            .started_at
            .map(|started| now.saturating_duration_since(started).as_secs_f64())
            .unwrap_or(0.0);
        (self.anchor_time + elapsed).min(self.duration)
    }
}

impl PlaybackSource for ClockPlayback {
    fn current_time(&self) -> f64 {
        self.time_at(Instant::now())
    }

    fn seek_to(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            log::warn!("Ignoring seek to {}", seconds);
            return;
        }
        self.anchor_time = seconds.clamp(0.0, self.duration);
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }
}
