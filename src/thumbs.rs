//! Krypt Vault - Thumbnail Engine
//!
//! Generates plaintext JPEG thumbnails for photos before they are encrypted.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{imageops::FilterType, DynamicImage, GenericImageView};

use crate::error::{VaultError, VaultResult};

/// Default thumbnail edge length in pixels
pub const DEFAULT_THUMB_SIZE: u32 = 256;

/// Produces a thumbnail image for a source media file
pub trait ThumbnailGenerator: Send + Sync {
    /// Write a thumbnail of `source` to `dest`
    fn create_thumbnail_from_path(&self, source: &Path, dest: &Path) -> VaultResult<()>;
}

/// Thumbnail Engine backed by the `image` crate.
///
/// Only decodes still images; anything else (video, audio) is a
/// `ThumbnailFailed` the caller treats as "no thumbnail".
pub struct ThumbnailEngine {
    /// Thumbnail size (square)
    size: u32,
}

impl ThumbnailEngine {
    /// Create new thumbnail engine
    pub fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }

    /// Generate thumbnail from image data
    pub fn generate(&self, image_data: &[u8]) -> VaultResult<Vec<u8>> {
        let img = image::load_from_memory(image_data)
            .map_err(|e| VaultError::ThumbnailFailed(e.to_string()))?;

        let thumb = self.resize_to_thumbnail(&img);

        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(thumb.to_rgb8());
        let mut output = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut output), image::ImageFormat::Jpeg)
            .map_err(|e| VaultError::ThumbnailFailed(e.to_string()))?;

        Ok(output)
    }

    /// Center-crop to a square, then resize
    fn resize_to_thumbnail(&self, img: &DynamicImage) -> DynamicImage {
        let (width, height) = img.dimensions();

        let (crop_x, crop_y, crop_size) = if width > height {
            ((width - height) / 2, 0, height)
        } else {
            (0, (height - width) / 2, width)
        };

        img.crop_imm(crop_x, crop_y, crop_size, crop_size)
            .resize_exact(self.size, self.size, FilterType::Lanczos3)
    }
}

impl Default for ThumbnailEngine {
    fn default() -> Self {
        Self::new(DEFAULT_THUMB_SIZE)
    }
}

impl ThumbnailGenerator for ThumbnailEngine {
    fn create_thumbnail_from_path(&self, source: &Path, dest: &Path) -> VaultResult<()> {
        let data = fs::read(source)?;
        let thumb = self.generate(&data)?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, thumb)?;

        log::debug!("thumbnail {} -> {}", source.display(), dest.display());
        Ok(())
    }
}
