// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O: the remote annotation store, playback position and file export.

pub mod dispatch;
pub mod media;
pub mod serialization;
pub mod store;
