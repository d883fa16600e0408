// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation authoring: the draw/edit state machine, the controller that
//! connects it to the store, and the list projection.

pub mod listing;
pub mod machine;
pub mod workspace;
