// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model shared by the editor, the store adapter and the UI.

pub mod annotation;
pub mod video;
