//! Horizontal mirroring of cursor images.

use std::collections::HashMap;
use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use tracing::debug;

use crate::domain::icon::png_data_url;
use crate::domain::PackInfo;
use crate::imaging::{encode_png, ImageError};

static FLIP_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"url\('(.*?)'\)").unwrap());

/// A surface able to mirror an image given as a `data:` URL
pub trait MirrorSurface: Send + Sync {
    fn mirror(&self, data_url: &str) -> Result<String, ImageError>;
}

/// Decodes the embedded image, mirrors it and re-encodes it as PNG
#[derive(Debug, Clone, Copy, Default)]
pub struct PngMirror;

impl MirrorSurface for PngMirror {
    fn mirror(&self, data_url: &str) -> Result<String, ImageError> {
        let (header, payload) = data_url
            .split_once(";base64,")
            .ok_or_else(|| ImageError::DataUrl("missing base64 payload".to_string()))?;
        if !header.starts_with("data:image/") {
            return Err(ImageError::DataUrl(format!("unsupported media type '{}'", header)));
        }

        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| ImageError::DataUrl(e.to_string()))?;
        let mirrored = image::load_from_memory(&bytes)?.fliph();

        Ok(png_data_url(&encode_png(&mirrored)?))
    }
}

/// Flips cursor values, remembering every result it computed.
///
/// Without a surface every input is returned unchanged and nothing is
/// remembered, so attaching a surface later takes effect immediately.
pub struct CursorFlipper {
    surface: Option<Box<dyn MirrorSurface>>,
    memo: HashMap<String, String>,
}

impl Default for CursorFlipper {
    fn default() -> Self {
        Self::detached()
    }
}

impl CursorFlipper {
    pub fn new(surface: impl MirrorSurface + 'static) -> Self {
        Self {
            surface: Some(Box::new(surface)),
            memo: HashMap::new(),
        }
    }

    /// Flipper backed by [`PngMirror`]
    pub fn native() -> Self {
        Self::new(PngMirror)
    }

    /// Flipper with no surface
    pub fn detached() -> Self {
        Self {
            surface: None,
            memo: HashMap::new(),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Number of remembered results
    pub fn memoized(&self) -> usize {
        self.memo.len()
    }

    /// Flip one cursor value.
    ///
    /// Values without a single-quoted `url('…')` pass through unchanged.
    pub fn flip(&mut self, cursor: &str) -> Result<String, ImageError> {
        if let Some(flipped) = self.memo.get(cursor) {
            return Ok(flipped.clone());
        }

        let Some(surface) = &self.surface else {
            return Ok(cursor.to_string());
        };

        let Some(data_url) = FLIP_URL.captures(cursor).and_then(|caps| caps.get(1)) else {
            return Ok(cursor.to_string());
        };

        let original = data_url.as_str();
        let mirrored = surface.mirror(original)?;
        let flipped = cursor.replacen(original, &mirrored, 1);

        debug!(bytes = flipped.len(), "Flipped cursor");
        self.memo.insert(cursor.to_string(), flipped.clone());
        Ok(flipped)
    }

    /// Flip each value, preserving order
    pub fn flip_all<S: AsRef<str>>(&mut self, cursors: &[S]) -> Result<Vec<String>, ImageError> {
        cursors.iter().map(|c| self.flip(c.as_ref())).collect()
    }

    /// Flip every stage of a resolved pack; labels and metadata are kept
    pub fn flip_pack(&mut self, pack: &PackInfo) -> Result<PackInfo, ImageError> {
        Ok(PackInfo {
            stages: self.flip_all(&pack.stages)?,
            ..pack.clone()
        })
    }
}
