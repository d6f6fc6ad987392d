// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense row-major pixel storage.

use alloc::vec;
use alloc::vec::Vec;

use crate::color::Rgba8;
use crate::error::CanvasError;
use crate::geom::{Bounds, Point2};

/// A fixed-extent, fully allocated pixel array.
///
/// Pixels are stored row-major with `y = 0` as the top row. The extent is
/// immutable once constructed.
///
/// # Out-of-range policy
///
/// Reads outside `[0, width) × [0, height)` return
/// [`Rgba8::TRANSPARENT`], keeping `get` total and aligned with the sparse
/// backend. Writes outside the extent return
/// [`CanvasError::OutOfBounds`] — never a silent drop.
#[derive(Clone, Debug)]
pub struct DenseBuffer {
    width: u32,
    height: u32,
    data: Vec<Rgba8>,
}

impl DenseBuffer {
    /// Creates a buffer of the given extent, fully transparent.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![Rgba8::TRANSPARENT; width as usize * height as usize],
        }
    }

    /// Buffer width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns whether `p` lies inside the allocated extent.
    #[inline]
    #[must_use]
    pub const fn in_extent(&self, p: Point2) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as u32) < self.width && (p.y as u32) < self.height
    }

    /// Reads the color at `p`, or transparent if `p` is out of extent.
    #[inline]
    #[must_use]
    pub fn get(&self, p: Point2) -> Rgba8 {
        if self.in_extent(p) {
            self.data[self.index(p)]
        } else {
            Rgba8::TRANSPARENT
        }
    }

    /// Writes `color` at `p`, returning whether the stored value changed.
    ///
    /// # Errors
    ///
    /// [`CanvasError::OutOfBounds`] if `p` lies outside the extent.
    pub fn set(&mut self, p: Point2, color: Rgba8) -> Result<bool, CanvasError> {
        if !self.in_extent(p) {
            return Err(CanvasError::OutOfBounds {
                x: p.x,
                y: p.y,
                width: self.width,
                height: self.height,
            });
        }
        let idx = self.index(p);
        if self.data[idx] == color {
            return Ok(false);
        }
        self.data[idx] = color;
        Ok(true)
    }

    /// The full extent, or `None` if the extent has zero area.
    ///
    /// Dense semantics assume full coverage, so the bounding box does not
    /// shrink to the written region.
    #[must_use]
    pub const fn bounding_box(&self) -> Option<Bounds> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(Bounds::new(
            Point2::ZERO,
            Point2::new(self.width as i32 - 1, self.height as i32 - 1),
        ))
    }

    /// The raw row-major pixel slice.
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.data
    }

    #[inline]
    fn index(&self, p: Point2) -> usize {
        p.y as usize * self.width as usize + p.x as usize
    }
}
