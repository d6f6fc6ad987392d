// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer pixel geometry.
//!
//! This module covers the small subset of 2-D integer geometry the engine
//! actually needs (offsets that add through a parent chain, and inclusive
//! bounding rectangles for sparse buffers) without pulling in a geometry
//! crate built for floating-point coordinates.

use core::fmt;
use core::ops::{Add, AddAssign, Sub};

/// A 2-D integer point or offset.
///
/// Positions compose additively through the parent chain, so `Add` is the
/// only arithmetic compositing needs. The derived `Ord` (x-major, then y)
/// gives sparse buffers a deterministic key order.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point2 {
    /// Horizontal component.
    pub x: i32,
    /// Vertical component (y grows downward, matching row-major buffers).
    pub y: i32,
}

impl Point2 {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates a point from its components.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Debug for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle with *inclusive* min/max corners.
///
/// Used as the bounding box of a sparse buffer's populated keys. A `Bounds`
/// always contains at least one point; "no keys yet" is represented as
/// `Option<Bounds>` by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Smallest contained point.
    pub min: Point2,
    /// Largest contained point (inclusive).
    pub max: Point2,
}

impl Bounds {
    /// Creates a bounds covering the single point `p`.
    #[inline]
    #[must_use]
    pub const fn at(p: Point2) -> Self {
        Self { min: p, max: p }
    }

    /// Creates a bounds from inclusive corners.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `min` does not lie at or before `max` on
    /// both axes.
    #[inline]
    #[must_use]
    pub const fn new(min: Point2, max: Point2) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y);
        Self { min, max }
    }

    /// Grows the bounds (if needed) to contain `p`.
    #[inline]
    pub fn expand(&mut self, p: Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Returns whether `p` lies inside the bounds.
    #[inline]
    #[must_use]
    pub const fn contains(&self, p: Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Number of columns covered (inclusive extent).
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        (self.max.x - self.min.x) as u32 + 1
    }

    /// Number of rows covered (inclusive extent).
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        (self.max.y - self.min.y) as u32 + 1
    }
}
