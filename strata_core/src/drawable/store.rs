// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays drawable storage with allocation, topology, and pixel
//! access.

use alloc::vec;
use alloc::vec::Vec;

use crate::buffer::{BufferKind, PixelBuffer};
use crate::color::Rgba8;
use crate::error::CanvasError;
use crate::geom::Point2;

use super::id::{DrawableId, INVALID};

/// Struct-of-arrays storage for all drawables.
///
/// Drawables are addressed by [`DrawableId`] handles. Internally, each
/// drawable occupies a slot in parallel arrays. Destroyed drawables are
/// recycled via a free list, and generation counters prevent stale handle
/// access.
#[derive(Debug)]
pub struct DrawableStore {
    // -- Extent and content --
    pub(crate) width: Vec<u32>,
    pub(crate) height: Vec<u32>,
    pub(crate) position: Vec<Point2>,
    pub(crate) buffer: Vec<PixelBuffer>,

    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) overlay: Vec<u32>,

    // -- Render cache --
    pub(crate) rendered: Vec<Vec<Rgba8>>,
    pub(crate) needs_render: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Change tracking --
    pub(crate) pending_pixels: Vec<u32>,
    pub(crate) pending_moved: Vec<u32>,
    pub(crate) pending_overlays: Vec<u32>,
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for DrawableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawableStore {
    /// Creates an empty drawable store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            width: Vec::new(),
            height: Vec::new(),
            position: Vec::new(),
            buffer: Vec::new(),
            parent: Vec::new(),
            overlay: Vec::new(),
            rendered: Vec::new(),
            needs_render: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            pending_pixels: Vec::new(),
            pending_moved: Vec::new(),
            pending_overlays: Vec::new(),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new drawable and returns its handle.
    ///
    /// The extent is immutable for the drawable's lifetime. The drawable
    /// starts at the origin, with no overlay, an empty (fully transparent)
    /// buffer of the chosen backend, and its needs-render flag set so the
    /// first [`render`](Self::render) call populates the cache.
    ///
    /// `parent` is a non-owning upward link: the parent's position is added
    /// when resolving canvas-space coordinates, and dirtiness propagates to
    /// it. Pass `None` for a root canvas.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is a stale handle.
    pub fn create_drawable(
        &mut self,
        kind: BufferKind,
        width: u32,
        height: u32,
        parent: Option<DrawableId>,
    ) -> DrawableId {
        if let Some(p) = parent {
            self.validate(p);
        }
        let parent_idx = parent.map_or(INVALID, |p| p.idx);
        let buffer = PixelBuffer::new(kind, width, height);
        let cache = vec![Rgba8::TRANSPARENT; width as usize * height as usize];

        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.width[idx as usize] = width;
            self.height[idx as usize] = height;
            self.position[idx as usize] = Point2::ZERO;
            self.buffer[idx as usize] = buffer;
            self.parent[idx as usize] = parent_idx;
            self.overlay[idx as usize] = INVALID;
            self.rendered[idx as usize] = cache;
            self.needs_render[idx as usize] = true;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.width.push(width);
            self.height.push(height);
            self.position.push(Point2::ZERO);
            self.buffer.push(buffer);
            self.parent.push(parent_idx);
            self.overlay.push(INVALID);
            self.rendered.push(cache);
            self.needs_render.push(true);
            self.generation.push(0);
            idx
        };

        push_pending(&mut self.pending_added, idx);

        DrawableId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a drawable, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, or if another live drawable still
    /// references this one as its parent or overlay (detach those first —
    /// parents must outlive their children).
    pub fn destroy_drawable(&mut self, id: DrawableId) {
        self.validate(id);
        let idx = id.idx;
        for other in 0..self.len {
            if self.free_list.contains(&other) {
                continue;
            }
            assert!(
                self.parent[other as usize] != idx,
                "cannot destroy a drawable that is still a parent"
            );
            assert!(
                self.overlay[other as usize] != idx,
                "cannot destroy a drawable that is still an overlay"
            );
        }

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        push_pending(&mut self.pending_removed, idx);
    }

    /// Returns whether the given handle refers to a live drawable.
    #[must_use]
    pub fn is_alive(&self, id: DrawableId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the handles of root drawables (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<DrawableId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                roots.push(DrawableId {
                    idx,
                    generation: self.generation[idx as usize],
                });
            }
        }
        roots
    }

    // -- Property getters --

    /// Drawable width in pixels.
    #[must_use]
    pub fn width(&self, id: DrawableId) -> u32 {
        self.validate(id);
        self.width[id.idx as usize]
    }

    /// Drawable height in pixels.
    #[must_use]
    pub fn height(&self, id: DrawableId) -> u32 {
        self.validate(id);
        self.height[id.idx as usize]
    }

    /// The drawable's own position (relative to its parent, if any).
    #[must_use]
    pub fn position(&self, id: DrawableId) -> Point2 {
        self.validate(id);
        self.position[id.idx as usize]
    }

    /// The drawable's effective position: its own plus every ancestor's.
    ///
    /// A drawable with no parent terminates the chain at itself; this is
    /// the normal root case, not an error.
    #[must_use]
    pub fn effective_position(&self, id: DrawableId) -> Point2 {
        self.validate(id);
        self.effective_position_raw(id.idx)
    }

    /// The parent of a drawable, if any.
    #[must_use]
    pub fn parent(&self, id: DrawableId) -> Option<DrawableId> {
        self.validate(id);
        self.link(self.parent[id.idx as usize])
    }

    /// The overlay attached to a drawable, if any.
    #[must_use]
    pub fn overlay(&self, id: DrawableId) -> Option<DrawableId> {
        self.validate(id);
        self.link(self.overlay[id.idx as usize])
    }

    /// Whether the drawable's cached render is stale.
    #[must_use]
    pub fn needs_render(&self, id: DrawableId) -> bool {
        self.validate(id);
        self.needs_render[id.idx as usize]
    }

    /// The drawable's pixel buffer (for bounding-box and key queries).
    #[must_use]
    pub fn buffer(&self, id: DrawableId) -> &PixelBuffer {
        self.validate(id);
        &self.buffer[id.idx as usize]
    }

    // -- Pixel access --

    /// Reads a pixel in raw (buffer-local) coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn pixel_local(&self, id: DrawableId, p: Point2) -> Rgba8 {
        self.validate(id);
        self.buffer[id.idx as usize].get(p)
    }

    /// Reads a pixel in canvas space.
    ///
    /// The drawable's effective position is added to `p` before indexing
    /// the buffer.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn pixel(&self, id: DrawableId, p: Point2) -> Rgba8 {
        self.validate(id);
        let origin = self.effective_position_raw(id.idx);
        self.buffer[id.idx as usize].get(p + origin)
    }

    /// Writes a pixel in raw (buffer-local) coordinates.
    ///
    /// Writing the current value is a guaranteed no-op with no dirty side
    /// effect. An effective write marks this drawable and its whole
    /// ancestor chain as needing render.
    ///
    /// # Errors
    ///
    /// [`CanvasError::OutOfBounds`] if `p` lies outside a dense buffer's
    /// extent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_pixel_local(
        &mut self,
        id: DrawableId,
        p: Point2,
        color: Rgba8,
    ) -> Result<(), CanvasError> {
        self.validate(id);
        self.set_local_raw(id.idx, p, color)
    }

    /// Writes a pixel in canvas space.
    ///
    /// The drawable's effective position is added to `p` before indexing
    /// the buffer; otherwise identical to
    /// [`set_pixel_local`](Self::set_pixel_local).
    ///
    /// # Errors
    ///
    /// [`CanvasError::OutOfBounds`] if the translated coordinate lies
    /// outside a dense buffer's extent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_pixel(
        &mut self,
        id: DrawableId,
        p: Point2,
        color: Rgba8,
    ) -> Result<(), CanvasError> {
        self.validate(id);
        let origin = self.effective_position_raw(id.idx);
        self.set_local_raw(id.idx, p + origin, color)
    }

    // -- Position mutation --

    /// Moves the drawable by a relative offset.
    ///
    /// A zero-magnitude delta is a no-op and does not mark the drawable
    /// dirty.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn move_by(&mut self, id: DrawableId, delta: Point2) {
        self.validate(id);
        if delta == Point2::ZERO {
            return;
        }
        self.position[id.idx as usize] += delta;
        self.mark_chain(id.idx);
        push_pending(&mut self.pending_moved, id.idx);
    }

    /// Moves the drawable to an absolute position.
    ///
    /// A no-op (with no dirty trigger) only when `pos` equals the current
    /// position exactly.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn move_to(&mut self, id: DrawableId, pos: Point2) {
        self.validate(id);
        if self.position[id.idx as usize] == pos {
            return;
        }
        self.position[id.idx as usize] = pos;
        self.mark_chain(id.idx);
        push_pending(&mut self.pending_moved, id.idx);
    }

    // -- Overlay linkage --

    /// Attaches (or detaches, with `None`) the overlay blended on top of
    /// `id` at composite time.
    ///
    /// Setting the overlay it already has is a no-op. A change marks the
    /// drawable's ancestor chain dirty, since its composited output changed.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `overlay` is `id` itself.
    pub fn set_overlay(&mut self, id: DrawableId, overlay: Option<DrawableId>) {
        self.validate(id);
        if let Some(o) = overlay {
            self.validate(o);
            assert!(o.idx != id.idx, "drawable cannot overlay itself");
        }
        let overlay_idx = overlay.map_or(INVALID, |o| o.idx);
        if self.overlay[id.idx as usize] == overlay_idx {
            return;
        }
        self.overlay[id.idx as usize] = overlay_idx;
        self.mark_chain(id.idx);
        push_pending(&mut self.pending_overlays, id.idx);
    }

    // -- Cloning --

    /// Produces an independent copy of a drawable.
    ///
    /// The clone shares the source's extent, parent link, position, overlay
    /// link, and buffer backend, and deep-copies every populated pixel.
    /// Mutating the clone never affects the source. Used by the compositor
    /// to snapshot a layer before destructive blending.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn clone_drawable(&mut self, id: DrawableId) -> DrawableId {
        self.validate(id);
        let src = id.idx as usize;
        let buffer = self.buffer[src].clone();
        let position = self.position[src];
        let overlay = self.overlay[src];
        let parent = self.link(self.parent[src]);

        let clone = self.create_drawable(buffer.kind(), self.width[src], self.height[src], parent);
        let dst = clone.idx as usize;
        self.buffer[dst] = buffer;
        self.position[dst] = position;
        self.overlay[dst] = overlay;
        clone
    }

    // -- Dirty propagation --

    /// Marks a drawable and its entire ancestor chain as needing render.
    ///
    /// This is the single upward invalidation path: every effective
    /// mutation funnels through it. Clearing happens only in
    /// [`render`](Self::render), and only for the node actually rendered.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn mark_dirty(&mut self, id: DrawableId) {
        self.validate(id);
        self.mark_chain(id.idx);
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: DrawableId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale DrawableId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Sets the ancestor chain's needs-render flags, starting at `idx`.
    pub(crate) fn mark_chain(&mut self, idx: u32) {
        let mut cur = idx;
        loop {
            self.needs_render[cur as usize] = true;
            let p = self.parent[cur as usize];
            if p == INVALID {
                break;
            }
            cur = p;
        }
    }

    /// Raw-index write with the equal-value no-op and dirty propagation.
    pub(crate) fn set_local_raw(
        &mut self,
        idx: u32,
        p: Point2,
        color: Rgba8,
    ) -> Result<(), CanvasError> {
        if self.buffer[idx as usize].set(p, color)? {
            self.mark_chain(idx);
            push_pending(&mut self.pending_pixels, idx);
        }
        Ok(())
    }

    /// Sums positions along the ancestor chain, starting at `idx`.
    pub(crate) fn effective_position_raw(&self, idx: u32) -> Point2 {
        let mut pos = Point2::ZERO;
        let mut cur = idx;
        loop {
            pos += self.position[cur as usize];
            let p = self.parent[cur as usize];
            if p == INVALID {
                break;
            }
            cur = p;
        }
        pos
    }

    /// Turns a raw link field into a handle, mapping [`INVALID`] to `None`.
    fn link(&self, idx: u32) -> Option<DrawableId> {
        if idx == INVALID {
            None
        } else {
            Some(DrawableId {
                idx,
                generation: self.generation[idx as usize],
            })
        }
    }
}

/// Records `idx` in a pending change list, once.
fn push_pending(list: &mut Vec<u32>, idx: u32) {
    if !list.contains(&idx) {
        list.push(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse(store: &mut DrawableStore, parent: Option<DrawableId>) -> DrawableId {
        store.create_drawable(BufferKind::Sparse, 8, 8, parent)
    }

    #[test]
    fn create_and_destroy() {
        let mut store = DrawableStore::new();
        let id = sparse(&mut store, None);
        assert!(store.is_alive(id));
        store.destroy_drawable(id);
        assert!(!store.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = DrawableStore::new();
        let id1 = sparse(&mut store, None);
        store.destroy_drawable(id1);
        let id2 = sparse(&mut store, None);
        // id2 reuses the same slot but has a different generation.
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    #[should_panic(expected = "stale DrawableId")]
    fn destroyed_handle_panics_on_pixel_access() {
        let mut store = DrawableStore::new();
        let id = sparse(&mut store, None);
        store.destroy_drawable(id);
        let _ = store.pixel_local(id, Point2::ZERO);
    }

    #[test]
    #[should_panic(expected = "still a parent")]
    fn destroy_referenced_parent_panics() {
        let mut store = DrawableStore::new();
        let root = sparse(&mut store, None);
        let _child = sparse(&mut store, Some(root));
        store.destroy_drawable(root);
    }

    #[test]
    #[should_panic(expected = "still an overlay")]
    fn destroy_referenced_overlay_panics() {
        let mut store = DrawableStore::new();
        let base = sparse(&mut store, None);
        let top = sparse(&mut store, None);
        store.set_overlay(base, Some(top));
        store.destroy_drawable(top);
    }

    #[test]
    fn roots_excludes_children() {
        let mut store = DrawableStore::new();
        let a = sparse(&mut store, None);
        let b = sparse(&mut store, None);
        let c = sparse(&mut store, Some(a));

        let roots = store.roots();
        assert!(roots.contains(&a));
        assert!(roots.contains(&b));
        assert!(!roots.contains(&c));
    }

    #[test]
    fn set_pixel_marks_self_dirty() {
        let mut store = DrawableStore::new();
        let id = sparse(&mut store, None);
        let _ = store.render(id, false);
        assert!(!store.needs_render(id));

        store
            .set_pixel_local(id, Point2::new(1, 1), Rgba8::opaque(9, 9, 9))
            .unwrap();
        assert!(store.needs_render(id));
    }

    #[test]
    fn child_write_propagates_dirty_to_ancestors() {
        let mut store = DrawableStore::new();
        let root = sparse(&mut store, None);
        let mid = sparse(&mut store, Some(root));
        let leaf = sparse(&mut store, Some(mid));
        // Render leaves-first: rendering a child re-marks its ancestors.
        for id in [leaf, mid, root] {
            let _ = store.render(id, false);
        }
        assert!(!store.needs_render(root));
        assert!(!store.needs_render(mid));
        assert!(!store.needs_render(leaf));

        store
            .set_pixel_local(leaf, Point2::ZERO, Rgba8::opaque(1, 1, 1))
            .unwrap();
        assert!(store.needs_render(leaf));
        assert!(store.needs_render(mid));
        assert!(store.needs_render(root));
    }

    #[test]
    fn clearing_child_does_not_clear_parent() {
        let mut store = DrawableStore::new();
        let root = sparse(&mut store, None);
        let child = sparse(&mut store, Some(root));
        store
            .set_pixel_local(child, Point2::ZERO, Rgba8::opaque(1, 1, 1))
            .unwrap();

        let _ = store.render(child, false);
        assert!(!store.needs_render(child));
        assert!(store.needs_render(root));
    }

    #[test]
    fn no_op_write_stability() {
        let mut store = DrawableStore::new();
        let id = sparse(&mut store, None);
        let color = Rgba8::opaque(4, 4, 4);
        store.set_pixel_local(id, Point2::new(2, 2), color).unwrap();
        let _ = store.render(id, false);
        assert!(!store.needs_render(id));

        store.set_pixel_local(id, Point2::new(2, 2), color).unwrap();
        assert!(!store.needs_render(id));
    }

    #[test]
    fn zero_delta_move_stability() {
        let mut store = DrawableStore::new();
        let id = sparse(&mut store, None);
        store.move_to(id, Point2::new(3, 4));
        let _ = store.render(id, false);
        assert!(!store.needs_render(id));

        store.move_by(id, Point2::ZERO);
        assert!(!store.needs_render(id));

        store.move_to(id, Point2::new(3, 4));
        assert!(!store.needs_render(id));
    }

    #[test]
    fn non_zero_move_marks_dirty_and_composes_position() {
        let mut store = DrawableStore::new();
        let root = sparse(&mut store, None);
        let child = sparse(&mut store, Some(root));
        let _ = store.render(root, false);

        store.move_to(root, Point2::new(10, 0));
        store.move_by(child, Point2::new(0, 5));
        assert!(store.needs_render(root));

        assert_eq!(store.position(child), Point2::new(0, 5));
        assert_eq!(store.effective_position(child), Point2::new(10, 5));
    }

    #[test]
    fn canvas_space_addressing_adds_effective_position() {
        let mut store = DrawableStore::new();
        let root = sparse(&mut store, None);
        let child = sparse(&mut store, Some(root));
        store.move_to(root, Point2::new(2, 0));
        store.move_to(child, Point2::new(1, 1));

        let color = Rgba8::opaque(7, 7, 7);
        store.set_pixel(child, Point2::new(4, 4), color).unwrap();

        // Canvas (4, 4) + effective (3, 1) = local (7, 5).
        assert_eq!(store.pixel_local(child, Point2::new(7, 5)), color);
        assert_eq!(store.pixel(child, Point2::new(4, 4)), color);
    }

    #[test]
    fn dense_out_of_bounds_write_errors() {
        let mut store = DrawableStore::new();
        let id = store.create_drawable(BufferKind::Dense, 4, 4, None);
        let err = store.set_pixel_local(id, Point2::new(4, 0), Rgba8::opaque(1, 1, 1));
        assert!(matches!(err, Err(CanvasError::OutOfBounds { .. })));
        // A rejected write never dirties anything.
        let _ = store.render(id, false);
        let err = store.set_pixel_local(id, Point2::new(9, 9), Rgba8::opaque(1, 1, 1));
        assert!(err.is_err());
        assert!(!store.needs_render(id));
    }

    #[test]
    fn overlay_linkage_and_no_op() {
        let mut store = DrawableStore::new();
        let base = sparse(&mut store, None);
        let top = sparse(&mut store, None);
        assert_eq!(store.overlay(base), None);

        store.set_overlay(base, Some(top));
        assert_eq!(store.overlay(base), Some(top));

        let _ = store.render(base, false);
        store.set_overlay(base, Some(top));
        assert!(!store.needs_render(base), "re-attaching same overlay is a no-op");

        store.set_overlay(base, None);
        assert_eq!(store.overlay(base), None);
        assert!(store.needs_render(base));
    }

    #[test]
    #[should_panic(expected = "cannot overlay itself")]
    fn self_overlay_panics() {
        let mut store = DrawableStore::new();
        let id = sparse(&mut store, None);
        store.set_overlay(id, Some(id));
    }

    #[test]
    fn clone_copies_state() {
        let mut store = DrawableStore::new();
        let root = sparse(&mut store, None);
        let overlay = sparse(&mut store, None);
        let src = sparse(&mut store, Some(root));
        store.move_to(src, Point2::new(3, -2));
        store.set_overlay(src, Some(overlay));
        let color = Rgba8::new(10, 20, 30, 200);
        store.set_pixel_local(src, Point2::new(5, 5), color).unwrap();

        let clone = store.clone_drawable(src);
        assert_eq!(store.width(clone), 8);
        assert_eq!(store.position(clone), Point2::new(3, -2));
        assert_eq!(store.parent(clone), Some(root));
        assert_eq!(store.overlay(clone), Some(overlay));
        assert_eq!(store.pixel_local(clone, Point2::new(5, 5)), color);
    }

    #[test]
    fn clone_isolation() {
        let mut store = DrawableStore::new();
        let src = sparse(&mut store, None);
        let original = Rgba8::opaque(1, 2, 3);
        store.set_pixel_local(src, Point2::new(1, 1), original).unwrap();

        let clone = store.clone_drawable(src);
        store
            .set_pixel_local(clone, Point2::new(1, 1), Rgba8::opaque(200, 0, 0))
            .unwrap();
        store
            .set_pixel_local(clone, Point2::new(2, 2), Rgba8::opaque(0, 200, 0))
            .unwrap();

        assert_eq!(store.pixel_local(src, Point2::new(1, 1)), original);
        assert!(!store.buffer(src).contains_key(Point2::new(2, 2)));
    }
}
