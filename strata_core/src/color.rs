// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! RGBA color value and alpha-weighted interpolation.
//!
//! All compositing in this crate reduces to [`Rgba8::lerp`]: a per-channel
//! linear interpolation weighted by an overlay pixel's alpha. The math is
//! pure integer arithmetic (truncating division by 255), so results are
//! deterministic across platforms and the boundary cases are exact: a weight
//! of 255 yields the top color unchanged, a weight of 0 yields the base.

use bytemuck::{Pod, Zeroable};

/// An 8-bit-per-channel RGBA color.
///
/// The layout is `#[repr(C)]` and [`Pod`], so slices of rendered pixels can
/// be reinterpreted as raw bytes for texture upload or image encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (0 = fully transparent, 255 = fully opaque).
    pub a: u8,
}

impl Rgba8 {
    /// The fully transparent zero color.
    ///
    /// This is what unpopulated sparse coordinates and out-of-extent dense
    /// reads report.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Creates a color from its four channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque color.
    #[inline]
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Linearly interpolates between `a` and `b` with weight `t / 255`.
    ///
    /// Every channel, including alpha, is interpolated as
    /// `a + (b - a) * t / 255` with truncating integer division. The
    /// endpoints are exact: `t = 0` returns `a`, `t = 255` returns `b`.
    #[inline]
    #[must_use]
    pub const fn lerp(a: Self, b: Self, t: u8) -> Self {
        Self {
            r: lerp_channel(a.r, b.r, t),
            g: lerp_channel(a.g, b.g, t),
            b: lerp_channel(a.b, b.b, t),
            a: lerp_channel(a.a, b.a, t),
        }
    }

    /// Blends `top` onto `self`, weighted by `top`'s own alpha.
    ///
    /// An opaque `top` replaces `self` exactly; a fully transparent `top`
    /// leaves `self` unchanged.
    #[inline]
    #[must_use]
    pub const fn blended_with(self, top: Self) -> Self {
        Self::lerp(self, top, top.a)
    }
}

/// Interpolates one channel: `a + (b - a) * t / 255`, truncating.
#[inline]
const fn lerp_channel(a: u8, b: u8, t: u8) -> u8 {
    let delta = (b as i32 - a as i32) * t as i32 / 255;
    (a as i32 + delta) as u8
}
