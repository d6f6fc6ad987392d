// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable tree data model.
//!
//! A *drawable* is a positioned, sized pixel canvas node. Each drawable has:
//!
//! - An identity ([`DrawableId`]) — a generational handle that becomes stale
//!   when the drawable is destroyed, preventing use-after-free bugs at the
//!   API level.
//! - An immutable extent (`width × height`) and a mutable integer position.
//! - A [`PixelBuffer`](crate::buffer::PixelBuffer) holding its pixels, with
//!   the backend chosen at creation.
//! - An optional **parent** — a non-owning upward link. Positions compose
//!   additively through the parent chain, and dirtiness propagates upward
//!   along it.
//! - An optional **overlay** — another drawable whose content is alpha
//!   blended on top at composite time. Overlays may chain.
//! - A cached rendered color buffer and a needs-render flag.
//!
//! # Addressing modes
//!
//! Pixels are addressed either *raw* (buffer-local:
//! [`pixel_local`](DrawableStore::pixel_local) /
//! [`set_pixel_local`](DrawableStore::set_pixel_local)) or in *canvas space*
//! ([`pixel`](DrawableStore::pixel) / [`set_pixel`](DrawableStore::set_pixel)),
//! where the drawable's effective position (its own plus every ancestor's)
//! is added before indexing the buffer. Composite logic operates in raw
//! space; external callers paint in canvas space.
//!
//! # Dirty tracking
//!
//! Every effective mutation (a pixel write that changes the stored value, a
//! non-zero move, an overlay change) marks the drawable and its entire
//! ancestor chain as needing render via one explicit, auditable operation
//! ([`mark_dirty`](DrawableStore::mark_dirty)). Dirtiness is monotonic
//! upward: rendering a drawable clears only that drawable's flag.

mod composite;
mod id;
mod render;
mod store;

pub use id::{DrawableId, INVALID};
pub use render::DrawableChanges;
pub use store::DrawableStore;
