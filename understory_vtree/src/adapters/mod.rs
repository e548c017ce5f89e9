// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to drive other Understory crates.
//!
//! Each adapter is gated behind a feature flag so the reconciler itself stays
//! free of backend dependencies.
//!
//! ## Available Adapters
//!
//! - [`scene`] (`scene_adapter` feature): implements [`Backend`](crate::Backend)
//!   for [`understory_scene::Scene`], with [`understory_scene::NodeId`] as the
//!   node handle.

#[cfg(feature = "scene_adapter")]
pub mod scene;
