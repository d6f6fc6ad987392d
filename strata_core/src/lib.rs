// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layered pixel-canvas data model and alpha compositing.
//!
//! `strata_core` provides the foundational data structures for editing trees
//! of positioned pixel canvases ("drawables") and flattening them with alpha
//! blending. It is `no_std` compatible (with `alloc`) and uses array-based
//! struct-of-arrays storage with index handles for cache-friendly access.
//!
//! # Architecture
//!
//! The crate is organized around an edit/render/composite cycle driven by a
//! single caller (an editor or script):
//!
//! ```text
//!   set_pixel / move_by ──► mark ancestor chain dirty
//!                                   │
//!                                   ▼
//!   render(id) ──► cached color buffer (recomputed only while dirty)
//!                                   │
//!                                   ▼
//!   write_layer_on_top(base, top) ──► overlay chain flattened, alpha
//!                                     blended into `base`
//!                                   │
//!                                   ▼
//!   rendered(id) ──► texture handoff / PNG export (strata_export)
//! ```
//!
//! **[`drawable`]** — Struct-of-arrays drawable arena with generational
//! handles. Pixels are addressed in raw (buffer-local) or canvas space;
//! every effective mutation marks the drawable and its ancestor chain dirty.
//!
//! **[`buffer`]** — The pixel-store contract with two backends: a dense
//! row-major array and a sparse coordinate map with bounding-box tracking.
//! The backend is chosen per drawable at construction time.
//!
//! **[`color`]** — `Rgba8` color value and the integer alpha-weighted lerp
//! used by all compositing.
//!
//! **[`geom`]** — Integer point and bounding-rectangle types.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod buffer;
pub mod color;
pub mod drawable;
pub mod error;
pub mod geom;
