// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render caching and change tracking.
//!
//! [`DrawableStore::render`] follows a check-recompute pattern:
//!
//! 1. If the drawable is clean and the render is not forced, the cached
//!    buffer is returned untouched (the cheap path — no pixels are read).
//! 2. Otherwise the ancestor chain is re-marked dirty (the parent's
//!    composited output depends on this child even though no parent pixel
//!    changed), the local flag is cleared, and every output pixel is
//!    resampled from the buffer in canvas space.
//!
//! [`DrawableChanges`] uses raw slot indices (`u32`) rather than
//! [`DrawableId`](super::DrawableId) handles so that display backends can
//! re-upload exactly the textures that changed without paying for
//! generation checks on every access.

use alloc::vec::Vec;

use log::debug;

use crate::color::Rgba8;
use crate::geom::Point2;

use super::id::{DrawableId, INVALID};
use super::store::DrawableStore;

/// The set of changes drained by a single
/// [`DrawableStore::take_changes`] call.
///
/// Each field contains the raw slot indices of drawables that changed in
/// the corresponding category since the previous drain. Backends use these
/// to apply incremental texture updates.
#[derive(Clone, Debug, Default)]
pub struct DrawableChanges {
    /// Drawables whose pixel contents changed.
    pub pixels: Vec<u32>,
    /// Drawables whose position changed.
    pub moved: Vec<u32>,
    /// Drawables whose overlay link changed.
    pub overlays: Vec<u32>,
    /// Drawables created since the last drain.
    pub added: Vec<u32>,
    /// Drawables destroyed since the last drain.
    pub removed: Vec<u32>,
}

impl DrawableChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.pixels.clear();
        self.moved.clear();
        self.overlays.clear();
        self.added.clear();
        self.removed.clear();
    }
}

impl DrawableStore {
    /// Renders the drawable into its cached color buffer and returns it.
    ///
    /// If the drawable is clean and `force` is false, the cached buffer is
    /// returned unchanged without touching any pixel. Otherwise the full
    /// `width × height` output is resampled via canvas-space
    /// [`pixel`](Self::pixel) addressing, the drawable's own needs-render
    /// flag is cleared, and its ancestor chain is marked as needing render
    /// (the parent's composited output now differs from its own cache).
    ///
    /// The returned slice is row-major, `y = 0` first, `width × height`
    /// entries.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn render(&mut self, id: DrawableId, force: bool) -> &[Rgba8] {
        self.validate(id);
        let idx = id.idx as usize;
        if !self.needs_render[idx] && !force {
            return &self.rendered[idx];
        }

        let parent = self.parent[idx];
        if parent != INVALID {
            self.mark_chain(parent);
        }
        self.needs_render[idx] = false;

        let width = self.width[idx];
        let height = self.height[idx];
        let origin = self.effective_position_raw(id.idx);
        debug!("rendering drawable slot {} ({width}x{height})", id.idx);

        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let sample = self.buffer[idx].get(Point2::new(x, y) + origin);
                self.rendered[idx][y as usize * width as usize + x as usize] = sample;
            }
        }
        &self.rendered[idx]
    }

    /// Returns the last-cached rendered buffer without recomputing.
    ///
    /// This is the texture handoff for display surfaces: the slice is
    /// row-major RGBA, valid until the next [`render`](Self::render) call
    /// for this drawable. The contents are only as fresh as the last
    /// render; check [`needs_render`](Self::needs_render) if staleness
    /// matters.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn rendered(&self, id: DrawableId) -> &[Rgba8] {
        self.validate(id);
        &self.rendered[id.idx as usize]
    }

    /// Drains the per-category change lists accumulated since the previous
    /// drain.
    pub fn take_changes(&mut self) -> DrawableChanges {
        let mut changes = DrawableChanges::default();
        self.take_changes_into(&mut changes);
        changes
    }

    /// Like [`take_changes`](Self::take_changes), but reuses a
    /// caller-provided buffer to avoid allocation.
    pub fn take_changes_into(&mut self, changes: &mut DrawableChanges) {
        changes.clear();
        core::mem::swap(&mut self.pending_pixels, &mut changes.pixels);
        core::mem::swap(&mut self.pending_moved, &mut changes.moved);
        core::mem::swap(&mut self.pending_overlays, &mut changes.overlays);
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::buffer::BufferKind;

    use super::*;

    #[test]
    fn render_populates_cache_from_pixels() {
        let mut store = DrawableStore::new();
        let id = store.create_drawable(BufferKind::Sparse, 4, 4, None);
        let color = Rgba8::opaque(40, 50, 60);
        store.set_pixel_local(id, Point2::new(2, 1), color).unwrap();

        let output = store.render(id, false);
        assert_eq!(output.len(), 16);
        assert_eq!(output[1 * 4 + 2], color);
        assert_eq!(output[0], Rgba8::TRANSPARENT);
    }

    #[test]
    fn idempotent_render() {
        let mut store = DrawableStore::new();
        let id = store.create_drawable(BufferKind::Sparse, 4, 4, None);
        store
            .set_pixel_local(id, Point2::new(1, 1), Rgba8::opaque(1, 2, 3))
            .unwrap();

        let first: Vec<Rgba8> = store.render(id, false).to_vec();
        assert!(!store.needs_render(id));

        // Second render takes the cheap path: flag stays clear, output is
        // bit-identical.
        let second: Vec<Rgba8> = store.render(id, false).to_vec();
        assert!(!store.needs_render(id));
        assert_eq!(first, second);
    }

    #[test]
    fn cheap_path_does_not_see_unflagged_edits() {
        let mut store = DrawableStore::new();
        let id = store.create_drawable(BufferKind::Sparse, 2, 2, None);
        let _ = store.render(id, false);

        // A no-op write leaves the drawable clean, so render must return
        // the cache unchanged.
        store
            .set_pixel_local(id, Point2::ZERO, Rgba8::TRANSPARENT)
            .unwrap();
        assert!(!store.needs_render(id));
        let output = store.render(id, false);
        assert!(output.iter().all(|&c| c == Rgba8::TRANSPARENT));
    }

    #[test]
    fn force_render_recomputes_clean_drawable() {
        let mut store = DrawableStore::new();
        let root = store.create_drawable(BufferKind::Sparse, 2, 2, None);
        let child = store.create_drawable(BufferKind::Sparse, 2, 2, Some(root));
        let _ = store.render(child, false);
        let _ = store.render(root, false);
        assert!(!store.needs_render(root));

        let _ = store.render(child, true);
        // Forced recompute still re-marks the parent.
        assert!(store.needs_render(root));
        assert!(!store.needs_render(child));
    }

    #[test]
    fn render_clears_only_the_rendered_node() {
        let mut store = DrawableStore::new();
        let root = store.create_drawable(BufferKind::Sparse, 2, 2, None);
        let child = store.create_drawable(BufferKind::Sparse, 2, 2, Some(root));
        store
            .set_pixel_local(child, Point2::ZERO, Rgba8::opaque(5, 5, 5))
            .unwrap();

        let _ = store.render(child, false);
        assert!(!store.needs_render(child));
        assert!(store.needs_render(root));
    }

    #[test]
    fn moved_drawable_renders_shifted_content() {
        let mut store = DrawableStore::new();
        let id = store.create_drawable(BufferKind::Sparse, 4, 4, None);
        let color = Rgba8::opaque(9, 9, 9);
        store.set_pixel_local(id, Point2::new(3, 3), color).unwrap();

        // Canvas-space sampling adds the position: output (x, y) shows the
        // local pixel at (x + 2, y + 2).
        store.move_to(id, Point2::new(2, 2));
        let output = store.render(id, false);
        assert_eq!(output[1 * 4 + 1], color);
        assert_eq!(output[3 * 4 + 3], Rgba8::TRANSPARENT);
    }

    #[test]
    fn rendered_returns_cache_without_recompute() {
        let mut store = DrawableStore::new();
        let id = store.create_drawable(BufferKind::Sparse, 2, 2, None);
        let color = Rgba8::opaque(1, 1, 1);
        store.set_pixel_local(id, Point2::ZERO, color).unwrap();
        let _ = store.render(id, false);

        store
            .set_pixel_local(id, Point2::ZERO, Rgba8::opaque(2, 2, 2))
            .unwrap();
        // The cache still holds the previous render.
        assert_eq!(store.rendered(id)[0], color);
        assert!(store.needs_render(id));
    }

    #[test]
    fn take_changes_reports_categories_once() {
        let mut store = DrawableStore::new();
        let a = store.create_drawable(BufferKind::Sparse, 2, 2, None);
        let b = store.create_drawable(BufferKind::Sparse, 2, 2, None);

        store.set_pixel_local(a, Point2::ZERO, Rgba8::opaque(1, 1, 1)).unwrap();
        store.set_pixel_local(a, Point2::new(1, 1), Rgba8::opaque(2, 2, 2)).unwrap();
        store.move_by(b, Point2::new(1, 0));
        store.set_overlay(a, Some(b));

        let changes = store.take_changes();
        assert_eq!(changes.pixels, [a.idx], "deduplicated per drawable");
        assert_eq!(changes.moved, [b.idx]);
        assert_eq!(changes.overlays, [a.idx]);
        assert_eq!(changes.added.len(), 2);
        assert!(changes.removed.is_empty());
    }

    #[test]
    fn take_changes_into_reuses_buffer() {
        let mut store = DrawableStore::new();
        let a = store.create_drawable(BufferKind::Sparse, 2, 2, None);
        let b = store.create_drawable(BufferKind::Sparse, 2, 2, None);

        let mut changes = DrawableChanges::default();
        store.take_changes_into(&mut changes);
        assert_eq!(changes.added.len(), 2);

        store.set_pixel_local(a, Point2::ZERO, Rgba8::opaque(1, 1, 1)).unwrap();
        store.take_changes_into(&mut changes);

        // Buffer should be cleared and refilled (not accumulating).
        assert!(changes.added.is_empty(), "added should be cleared");
        assert_eq!(changes.pixels, [a.idx]);
        assert!(!changes.pixels.contains(&b.idx), "unchanged drawable absent");
    }

    #[test]
    fn no_op_mutations_report_no_changes() {
        let mut store = DrawableStore::new();
        let id = store.create_drawable(BufferKind::Sparse, 2, 2, None);
        let _ = store.take_changes();

        store.set_pixel_local(id, Point2::ZERO, Rgba8::TRANSPARENT).unwrap();
        store.move_by(id, Point2::ZERO);
        store.set_overlay(id, None);

        let changes = store.take_changes();
        assert!(changes.pixels.is_empty());
        assert!(changes.moved.is_empty());
        assert!(changes.overlays.is_empty());
    }
}
