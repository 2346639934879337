//! Track raster used as a collision and sensing lookup table.
//!
//! A pixel is either boundary (the reserved opaque white) or drivable
//! (any other color). The raster is never modified after loading; display
//! overlays are drawn onto the frame buffer, not onto the track.

use std::path::Path;

use macroquad::texture::Image;

use super::error::SimError;
use super::geometric_utils::Pixel;

/// RGBA value that marks a pixel as off-track.
pub const BOUNDARY_RGBA: [u8; 4] = [255, 255, 255, 255];

/// Immutable track raster.
#[derive(Clone)]
pub struct Track {
    image: Image,
}

impl std::fmt::Debug for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Track")
            .field("width", &self.image.width)
            .field("height", &self.image.height)
            .finish()
    }
}

impl Track {
    /// Wraps an RGBA raster.
    pub fn from_image(image: Image) -> Self {
        Self { image }
    }

    /// Reads and decodes a track image from disk.
    ///
    /// # Arguments
    ///
    /// * `path` - Image file in any format the decoder understands (PNG in practice)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image = Image::from_file_with_format(&bytes, None).map_err(|e| SimError::Image {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        log::info!(
            "Loaded track {} ({}x{})",
            path.display(),
            image.width,
            image.height
        );
        Ok(Self::from_image(image))
    }

    /// Raster width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.image.width)
    }

    /// Raster height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.image.height)
    }

    /// The pristine raster, for uploading a display texture.
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Returns `true` if `point` is off-track.
    ///
    /// Points outside the raster count as boundary, so every ray cast
    /// terminates once it leaves the image.
    pub fn is_boundary(&self, point: Pixel) -> bool {
        let (x, y) = (point.x(), point.y());
        if x < 0 || y < 0 {
            return true;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.width() || y >= self.height() {
            return true;
        }
        let offset = 4 * (y as usize * self.width() as usize + x as usize);
        self.image.bytes[offset..offset + 4] == BOUNDARY_RGBA
    }
}
