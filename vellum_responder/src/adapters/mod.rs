// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Vellum crates.
//!
//! Enabled via feature flags to keep the core free of scene dependencies.

#[cfg(feature = "scene_adapter")]
pub mod scene;
