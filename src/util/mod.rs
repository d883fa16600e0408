// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Small pure helpers shared across the application.

pub mod geometry;
pub mod time;
