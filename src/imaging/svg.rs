//! SVG rasterization.

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use super::ImageError;

/// Edge length of the canvas SVG icons are rasterized into
pub const SVG_CANVAS_SIZE: u32 = 32;

/// Rasterize an SVG document to PNG, scaled to fit inside `size`×`size`.
///
/// Aspect ratio is preserved, so the result may be narrower or shorter
/// than the canvas. Small documents are scaled up.
pub fn rasterize(data: &[u8], size: u32) -> Result<Vec<u8>, ImageError> {
    let tree = Tree::from_data(data, &Options::default())?;
    let source = tree.size();

    let (width, height) = fit_inside(source.width(), source.height(), size);
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| ImageError::Render(format!("invalid canvas {}x{}", width, height)))?;

    let transform = Transform::from_scale(
        width as f32 / source.width(),
        height as f32 / source.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| ImageError::Render(e.to_string()))
}

/// Largest dimensions with the source aspect ratio that fit in `size`×`size`
pub fn fit_inside(width: f32, height: f32, size: u32) -> (u32, u32) {
    let bound = size as f32;
    let scale = (bound / width).min(bound / height);

    let fitted = |edge: f32| ((edge * scale).round() as u32).clamp(1, size);
    (fitted(width), fitted(height))
}
