// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse keyed pixel storage.

use alloc::collections::BTreeMap;
use alloc::collections::btree_map;

use crate::color::Rgba8;
use crate::error::CanvasError;
use crate::geom::{Bounds, Point2};

/// A coordinate→color map for buffers whose extent is mostly unpopulated.
///
/// Any integer coordinate is addressable, including negative ones and those
/// beyond the nominal `width × height` extent (the extent is advisory — it
/// sizes the drawable's rendered output, not the storage). Absent keys read
/// as [`Rgba8::TRANSPARENT`].
///
/// The populated key set and its bounding box are maintained incrementally
/// so composite operations can iterate only the painted region. A `BTreeMap`
/// keeps key iteration deterministic.
#[derive(Clone, Debug)]
pub struct SparseBuffer {
    width: u32,
    height: u32,
    map: BTreeMap<Point2, Rgba8>,
    bounds: Option<Bounds>,
}

impl SparseBuffer {
    /// Creates an empty buffer with the given nominal extent.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            map: BTreeMap::new(),
            bounds: None,
        }
    }

    /// Nominal width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Nominal height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reads the color at `p`; absent keys are transparent.
    #[inline]
    #[must_use]
    pub fn get(&self, p: Point2) -> Rgba8 {
        self.map.get(&p).copied().unwrap_or(Rgba8::TRANSPARENT)
    }

    /// Writes `color` at `p`, returning whether the stored value changed.
    ///
    /// Writing a color equal to the current value (including transparent to
    /// an absent key) is a no-op that records nothing.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` matches the shared backend contract.
    pub fn set(&mut self, p: Point2, color: Rgba8) -> Result<bool, CanvasError> {
        if self.get(p) == color {
            return Ok(false);
        }
        self.map.insert(p, color);
        match &mut self.bounds {
            Some(bounds) => bounds.expand(p),
            None => self.bounds = Some(Bounds::at(p)),
        }
        Ok(true)
    }

    /// Returns whether a key has been populated at `p`.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, p: Point2) -> bool {
        self.map.contains_key(&p)
    }

    /// Iterates the populated keys in deterministic (x-major) order.
    #[must_use]
    pub fn keys(&self) -> btree_map::Keys<'_, Point2, Rgba8> {
        self.map.keys()
    }

    /// Number of populated keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns whether no key has been populated.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The smallest rectangle containing all populated keys, or `None`
    /// while empty.
    #[inline]
    #[must_use]
    pub const fn bounding_box(&self) -> Option<Bounds> {
        self.bounds
    }
}
