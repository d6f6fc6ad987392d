// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PNG encoding and file export for strata rendered buffers.
//!
//! This crate is the effectful boundary of the engine: everything in
//! [`strata_core`] is pure data manipulation, while encoding bytes and
//! touching the filesystem live here. The only externally observable file
//! format is RGBA PNG, 8 bits per channel, rows top-to-bottom matching the
//! rendered buffer's row-major layout.
//!
//! I/O failures are surfaced to the caller and never retried internally —
//! retry policy, if any, belongs to the caller.

use std::fs;
use std::path::Path;

use log::info;
use thiserror::Error;

use strata_core::color::Rgba8;
use strata_core::drawable::{DrawableId, DrawableStore};

/// Errors that can occur while exporting an image.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing the encoded bytes to the filesystem failed.
    #[error("failed to write image file: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Encodes a row-major RGBA pixel slice as a PNG.
///
/// Rows are written top-to-bottom, exactly as they appear in the slice.
///
/// # Errors
///
/// [`ExportError::Encode`] if the encoder rejects the parameters.
///
/// # Panics
///
/// Panics if `pixels.len()` does not equal `width * height`.
pub fn encode_png(pixels: &[Rgba8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    assert_eq!(
        pixels.len(),
        width as usize * height as usize,
        "pixel count must match the {width}x{height} extent"
    );

    let mut bytes = Vec::new();
    let mut encoder = png::Encoder::new(&mut bytes, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(bytemuck::cast_slice(pixels))?;
    writer.finish()?;
    Ok(bytes)
}

/// Forces a full render of `id` and writes it to `path` as a PNG.
///
/// Any existing file at `path` is overwritten.
///
/// # Errors
///
/// [`ExportError::Io`] if the file cannot be written,
/// [`ExportError::Encode`] if encoding fails.
///
/// # Panics
///
/// Panics if the handle is stale.
pub fn export_rendered_image(
    store: &mut DrawableStore,
    id: DrawableId,
    path: &Path,
) -> Result<(), ExportError> {
    let width = store.width(id);
    let height = store.height(id);
    let pixels = store.render(id, true);
    let bytes = encode_png(pixels, width, height)?;
    fs::write(path, &bytes)?;
    info!("exported {width}x{height} PNG to {}", path.display());
    Ok(())
}
