//! Image recompression into cursor values.
//!
//! Raster inputs keep their dimensions; SVG inputs are rasterized onto a
//! 32×32 canvas first. Both paths are then quantized to an indexed palette
//! of at most 256 colors (alpha included) and finished with a maximum
//! `oxipng` pass that keeps the indexed color type.

pub mod svg;

use std::collections::HashMap;
use std::io::Cursor;

use color_quant::NeuQuant;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use crate::domain::cursor_value;

pub use svg::{fit_inside, rasterize, SVG_CANVAS_SIZE};

/// Upper bound on palette entries in a generated cursor
pub const PALETTE_COLORS: usize = 256;

/// NeuQuant sampling factor; 1 samples every pixel, 30 is the fastest
const QUANT_SAMPLE_FACTOR: i32 = 10;

/// Image pipeline errors
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to parse SVG: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("Failed to render SVG: {0}")]
    Render(String),

    #[error("Failed to encode indexed PNG: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("Failed to optimize PNG: {0}")]
    Optimize(#[from] oxipng::PngError),

    #[error("Invalid data URL: {0}")]
    DataUrl(String),

    #[error("Image worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Processing path for a source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Recompress as-is
    Raster,
    /// Rasterize to the cursor canvas, then compress
    Svg,
}

impl Codec {
    /// Select the codec from the source URL's extension
    pub fn from_url(url: &str) -> Self {
        if url.to_ascii_lowercase().ends_with(".svg") {
            Codec::Svg
        } else {
            Codec::Raster
        }
    }
}

/// Recompress `bytes` into a cursor value on the blocking worker pool
pub async fn encode_cursor(bytes: Vec<u8>, codec: Codec) -> Result<String, ImageError> {
    tokio::task::spawn_blocking(move || encode_cursor_blocking(&bytes, codec)).await?
}

/// Recompress `bytes` into a cursor value on the current thread
pub fn encode_cursor_blocking(bytes: &[u8], codec: Codec) -> Result<String, ImageError> {
    let image = match codec {
        Codec::Raster => image::load_from_memory(bytes)?,
        Codec::Svg => image::load_from_memory(&rasterize(bytes, SVG_CANVAS_SIZE)?)?,
    };

    Ok(cursor_value(&optimize_png(&quantize_png(&image)?)?))
}

/// Encode a decoded image as PNG
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Quantize to at most [`PALETTE_COLORS`] RGBA colors and encode as an
/// 8-bit indexed PNG with a `tRNS` chunk.
///
/// Images that already fit in the palette keep their exact colors; richer
/// images go through NeuQuant.
pub fn quantize_png(image: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels = rgba.as_raw();

    let (color_map, indices) = exact_palette(pixels).unwrap_or_else(|| {
        let quant = NeuQuant::new(QUANT_SAMPLE_FACTOR, PALETTE_COLORS, pixels);
        let indices = pixels
            .chunks_exact(4)
            .map(|pixel| quant.index_of(pixel) as u8)
            .collect();
        (quant.color_map_rgba(), indices)
    });

    let mut palette = Vec::with_capacity(PALETTE_COLORS * 3);
    let mut alpha = Vec::with_capacity(PALETTE_COLORS);
    for entry in color_map.chunks_exact(4) {
        palette.extend_from_slice(&entry[..3]);
        alpha.push(entry[3]);
    }

    let mut buffer = Vec::new();
    let mut encoder = png::Encoder::new(&mut buffer, width, height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(palette);
    encoder.set_trns(alpha);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&indices)?;
    writer.finish()?;

    Ok(buffer)
}

/// RGBA color map and per-pixel indices, or `None` past [`PALETTE_COLORS`]
fn exact_palette(pixels: &[u8]) -> Option<(Vec<u8>, Vec<u8>)> {
    let mut slots: HashMap<&[u8], u8> = HashMap::new();
    let mut color_map = Vec::new();
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for pixel in pixels.chunks_exact(4) {
        let index = match slots.get(pixel) {
            Some(&index) => index,
            None => {
                if slots.len() == PALETTE_COLORS {
                    return None;
                }
                let index = slots.len() as u8;
                slots.insert(pixel, index);
                color_map.extend_from_slice(pixel);
                index
            }
        };
        indices.push(index);
    }

    Some((color_map, indices))
}

/// Maximum PNG compression that keeps an indexed image indexed.
///
/// Unused and duplicate palette entries are still dropped and the bit depth
/// may shrink below 8.
pub fn optimize_png(png: &[u8]) -> Result<Vec<u8>, ImageError> {
    let mut options = oxipng::Options::from_preset(6);
    options.color_type_reduction = false;
    Ok(oxipng::optimize_from_memory(png, &options)?)
}
