// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel storage backends.
//!
//! A pixel buffer is a 2-D addressable store of [`Rgba8`] values. Two
//! backends implement the same contract and are selected per drawable at
//! construction time via [`BufferKind`]:
//!
//! - [`DenseBuffer`] — a fixed `width × height` row-major array. Reads
//!   outside the extent return [`Rgba8::TRANSPARENT`]; writes outside it
//!   fail with [`CanvasError::OutOfBounds`]. Suited to fully painted
//!   canvases where full-scan composition is acceptable.
//! - [`SparseBuffer`] — a coordinate→color map with no extent restriction.
//!   Absent keys read as transparent, populated keys and their bounding box
//!   are tracked for efficient composite iteration. Suited to mostly
//!   transparent layers such as individual brush strokes.
//!
//! # The equal-value write guarantee
//!
//! [`PixelBuffer::set`] returns whether the stored value actually changed,
//! and writing a color equal to the current value is a guaranteed no-op: no
//! sparse key is recorded and `false` is returned. Dirty propagation in the
//! drawable store is keyed off this return value, so the guarantee is
//! load-bearing, not an optimization.

mod dense;
mod sparse;

pub use dense::DenseBuffer;
pub use sparse::SparseBuffer;

use alloc::collections::btree_map;

use crate::color::Rgba8;
use crate::error::CanvasError;
use crate::geom::{Bounds, Point2};

/// Storage strategy for a drawable's pixels, chosen at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Sparse coordinate map with bounding-box tracking.
    #[default]
    Sparse,
    /// Dense row-major array covering the full extent.
    Dense,
}

/// A pixel store backed by either a dense array or a sparse map.
#[derive(Clone, Debug)]
pub enum PixelBuffer {
    /// Dense row-major storage.
    Dense(DenseBuffer),
    /// Sparse keyed storage.
    Sparse(SparseBuffer),
}

impl PixelBuffer {
    /// Creates a buffer of the given kind and extent.
    #[must_use]
    pub fn new(kind: BufferKind, width: u32, height: u32) -> Self {
        match kind {
            BufferKind::Dense => Self::Dense(DenseBuffer::new(width, height)),
            BufferKind::Sparse => Self::Sparse(SparseBuffer::new(width, height)),
        }
    }

    /// Returns the backend kind.
    #[must_use]
    pub const fn kind(&self) -> BufferKind {
        match self {
            Self::Dense(_) => BufferKind::Dense,
            Self::Sparse(_) => BufferKind::Sparse,
        }
    }

    /// Buffer width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        match self {
            Self::Dense(b) => b.width(),
            Self::Sparse(b) => b.width(),
        }
    }

    /// Buffer height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        match self {
            Self::Dense(b) => b.height(),
            Self::Sparse(b) => b.height(),
        }
    }

    /// Reads the color at `p`.
    ///
    /// Total on both backends: absent sparse keys and out-of-extent dense
    /// coordinates read as [`Rgba8::TRANSPARENT`].
    #[inline]
    #[must_use]
    pub fn get(&self, p: Point2) -> Rgba8 {
        match self {
            Self::Dense(b) => b.get(p),
            Self::Sparse(b) => b.get(p),
        }
    }

    /// Writes `color` at `p`, returning whether the stored value changed.
    ///
    /// Writing the current value is a guaranteed no-op (`Ok(false)`).
    ///
    /// # Errors
    ///
    /// [`CanvasError::OutOfBounds`] if `p` lies outside a dense buffer's
    /// extent. Sparse buffers accept any coordinate.
    pub fn set(&mut self, p: Point2, color: Rgba8) -> Result<bool, CanvasError> {
        match self {
            Self::Dense(b) => b.set(p, color),
            Self::Sparse(b) => b.set(p, color),
        }
    }

    /// Returns whether a pixel exists at `p`.
    ///
    /// For sparse buffers this means the key has been populated; for dense
    /// buffers every in-extent coordinate exists (full coverage).
    #[inline]
    #[must_use]
    pub fn contains_key(&self, p: Point2) -> bool {
        match self {
            Self::Dense(b) => b.in_extent(p),
            Self::Sparse(b) => b.contains_key(p),
        }
    }

    /// Returns whether `p` is a writable coordinate.
    ///
    /// Always true for sparse buffers.
    #[inline]
    #[must_use]
    pub fn in_extent(&self, p: Point2) -> bool {
        match self {
            Self::Dense(b) => b.in_extent(p),
            Self::Sparse(_) => true,
        }
    }

    /// Iterates the populated coordinates in deterministic order.
    ///
    /// Sparse buffers yield exactly the keys ever effectively written;
    /// dense buffers yield the full extent in row-major order.
    #[must_use]
    pub fn keys(&self) -> Keys<'_> {
        match self {
            Self::Dense(b) => Keys::dense(b.width() as i32, b.height() as i32),
            Self::Sparse(b) => Keys::Sparse(b.keys()),
        }
    }

    /// The smallest rectangle containing all populated coordinates.
    ///
    /// `None` for a sparse buffer with no keys, or a dense buffer with a
    /// zero-area extent. A non-empty dense buffer reports its full extent.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Bounds> {
        match self {
            Self::Dense(b) => b.bounding_box(),
            Self::Sparse(b) => b.bounding_box(),
        }
    }
}

/// Iterator over a buffer's populated coordinates.
///
/// Created by [`PixelBuffer::keys`].
#[derive(Debug)]
pub enum Keys<'a> {
    /// Row-major scan over a dense extent.
    Dense {
        /// Extent width.
        width: i32,
        /// Extent height.
        height: i32,
        /// Next coordinate to yield.
        cursor: Point2,
    },
    /// Walk over a sparse buffer's key set.
    Sparse(btree_map::Keys<'a, Point2, Rgba8>),
}

impl Keys<'_> {
    fn dense(width: i32, height: i32) -> Self {
        let cursor = if width == 0 {
            // An empty extent yields nothing.
            Point2::new(0, height)
        } else {
            Point2::ZERO
        };
        Self::Dense {
            width,
            height,
            cursor,
        }
    }
}

impl Iterator for Keys<'_> {
    type Item = Point2;

    fn next(&mut self) -> Option<Point2> {
        match self {
            Self::Dense {
                width,
                height,
                cursor,
            } => {
                if cursor.y >= *height {
                    return None;
                }
                let p = *cursor;
                cursor.x += 1;
                if cursor.x == *width {
                    cursor.x = 0;
                    cursor.y += 1;
                }
                Some(p)
            }
            Self::Sparse(keys) => keys.next().copied(),
        }
    }
}
