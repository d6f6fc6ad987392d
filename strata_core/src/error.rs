// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas error types.
//!
//! Only data-dependent failures are surfaced as errors. Contract violations
//! (stale [`DrawableId`](crate::drawable::DrawableId) handles, destroying a
//! drawable that is still referenced) panic instead, since they indicate a
//! caller bug rather than a recoverable condition.

use thiserror::Error;

/// Errors that can occur while mutating pixel data.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CanvasError {
    /// A write addressed a coordinate outside a dense buffer's extent.
    ///
    /// Dense buffers have a fixed allocation; writes outside it are rejected
    /// rather than silently dropped. Sparse buffers accept any coordinate
    /// and never produce this error.
    #[error("pixel ({x}, {y}) outside dense buffer extent {width}x{height}")]
    OutOfBounds {
        /// Rejected x coordinate.
        x: i32,
        /// Rejected y coordinate.
        y: i32,
        /// Buffer width in pixels.
        width: u32,
        /// Buffer height in pixels.
        height: u32,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn out_of_bounds_displays_coordinates_and_extent() {
        let err = CanvasError::OutOfBounds {
            x: -3,
            y: 17,
            width: 16,
            height: 16,
        };
        let msg = err.to_string();
        assert!(msg.contains("(-3, 17)"), "message: {msg}");
        assert!(msg.contains("16x16"), "message: {msg}");
    }
}
