// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer compositing.
//!
//! Two merge strategies share the same blend math
//! ([`Rgba8::blended_with`]) but iterate differently:
//!
//! - [`write_layer_on_top`](DrawableStore::write_layer_on_top) walks only
//!   the top layer's populated keys — the sparse strategy, cheap for mostly
//!   transparent layers such as individual brush strokes. The top layer's
//!   overlay chain is flattened into a snapshot first, so a chain of N
//!   overlays collapses to one effective layer before `base` is touched.
//! - [`merge_layer_on_top`](DrawableStore::merge_layer_on_top) scans the
//!   base's full extent — the dense strategy, simpler and correct when
//!   layers are fully painted canvases.
//!
//! Overlay chains are resolved with an explicit iterative walk rather than
//! recursion, so a pathological chain cannot exhaust the stack; a cycle is
//! logged and truncated at the repeated node.

use alloc::vec;
use alloc::vec::Vec;

use log::{trace, warn};

use crate::color::Rgba8;
use crate::error::CanvasError;
use crate::geom::Point2;

use super::id::{DrawableId, INVALID};
use super::store::DrawableStore;

impl DrawableStore {
    /// Alpha-blends `top` (and its overlay chain) onto `base`.
    ///
    /// `top` is snapshotted first and never mutated. The snapshot's keys
    /// are visited in deterministic order, translated by the snapshot's
    /// position into `base`'s raw space: where `base` has no existing pixel
    /// the color is written directly, otherwise the existing color is
    /// interpolated toward the top color by the top pixel's alpha. Keys
    /// with alpha 0 are still visited (and still populate empty base
    /// coordinates, invisibly).
    ///
    /// Targets outside a dense `base`'s extent are skipped — the composite
    /// clips to the base rather than failing.
    ///
    /// Effective writes dirty `base` and its ancestor chain through the
    /// normal pixel path.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice (out-of-extent targets are
    /// clipped); the `Result` matches the pixel-write contract.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn write_layer_on_top(
        &mut self,
        base: DrawableId,
        top: DrawableId,
    ) -> Result<(), CanvasError> {
        self.validate(base);
        self.validate(top);

        let chain = self.overlay_chain(top.idx);
        trace!(
            "compositing slot {} onto {} (chain length {})",
            top.idx,
            base.idx,
            chain.len()
        );

        // Snapshot so neither `top` nor its overlays are mutated. The
        // snapshot's own overlay link is dropped: the chain is resolved
        // right here.
        let snapshot = self.clone_drawable(top);
        self.overlay[snapshot.idx as usize] = INVALID;

        // Fold the chain into the snapshot, accumulating each overlay's
        // offset so deeper links land where the recursive flattening would
        // have put them.
        let mut shift = Point2::ZERO;
        for &link in &chain[1..] {
            shift += self.position[link as usize];
            self.blend_keys(snapshot.idx, link, shift)?;
        }

        let offset = self.position[snapshot.idx as usize];
        self.blend_keys(base.idx, snapshot.idx, offset)?;

        self.destroy_drawable(snapshot);
        Ok(())
    }

    /// Alpha-blends `overlay` onto `base` across `base`'s full extent.
    ///
    /// The dense-strategy merge: every coordinate of `base`'s
    /// `width × height` rectangle is rewritten in place as the
    /// interpolation of the two raw pixels, weighted by the overlay
    /// pixel's alpha. No positions are applied; both buffers are read in
    /// raw space.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice (the scan stays inside `base`'s
    /// extent); the `Result` matches the pixel-write contract.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn merge_layer_on_top(
        &mut self,
        base: DrawableId,
        overlay: DrawableId,
    ) -> Result<(), CanvasError> {
        self.validate(base);
        self.validate(overlay);
        let width = self.width[base.idx as usize];
        let height = self.height[base.idx as usize];

        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let p = Point2::new(x, y);
                let top = self.buffer[overlay.idx as usize].get(p);
                let blended = self.buffer[base.idx as usize].get(p).blended_with(top);
                self.set_local_raw(base.idx, p, blended)?;
            }
        }
        Ok(())
    }

    /// Collects the overlay chain starting at `start`, cycle-guarded.
    fn overlay_chain(&self, start: u32) -> Vec<u32> {
        let mut chain = vec![start];
        let mut cur = self.overlay[start as usize];
        while cur != INVALID {
            if chain.contains(&cur) {
                warn!("overlay chain cycle at slot {cur}; truncating");
                break;
            }
            chain.push(cur);
            cur = self.overlay[cur as usize];
        }
        chain
    }

    /// Blends `src`'s populated keys into `dst`, translated by `offset`.
    fn blend_keys(&mut self, dst: u32, src: u32, offset: Point2) -> Result<(), CanvasError> {
        let pixels: Vec<(Point2, Rgba8)> = {
            let buffer = &self.buffer[src as usize];
            buffer.keys().map(|key| (key, buffer.get(key))).collect()
        };

        for (key, top) in pixels {
            let target = key + offset;
            if !self.buffer[dst as usize].in_extent(target) {
                continue;
            }
            let color = if self.buffer[dst as usize].contains_key(target) {
                self.buffer[dst as usize].get(target).blended_with(top)
            } else {
                top
            };
            self.set_local_raw(dst, target, color)?;
        }
        Ok(())
    }
}
