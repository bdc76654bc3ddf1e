//! Conversion between image files and [`RawImage`] grids, via the `image` crate.

use std::cmp::min;
use std::path::Path;

use crate::errors::*;
use image::{ColorType, DynamicImage, GenericImageView};
use image3d::{PixelBuffer, RawImage};

fn path_name(path: &Path) -> String {
    path.display().to_string()
}

/// Decodes `path` into an 8-bit grid, keeping its native channel count (1 to 4).
pub fn decode(path: &Path) -> Result<RawImage> {
    let image = image::open(path).chain_err(|| ErrorKind::Decode(path_name(path)))?;
    Ok(into_raw(image))
}

pub fn into_raw(image: DynamicImage) -> RawImage {
    let (width, height) = image.dimensions();
    let channels = min(image.color().channel_count(), 4) as usize;
    let data = match channels {
        1 => image.into_luma8().into_raw(),
        2 => image.into_luma_alpha8().into_raw(),
        3 => image.into_rgb8().into_raw(),
        _ => image.into_rgba8().into_raw(),
    };
    RawImage::new(width as usize, height as usize, channels, data)
}

/// Encodes `raw` to `path`; the format follows the file extension.
pub fn encode(path: &Path, raw: &RawImage) -> Result<()> {
    let color = match raw.channels {
        1 => ColorType::L8,
        2 => ColorType::La8,
        3 => ColorType::Rgb8,
        4 => ColorType::Rgba8,
        n => bail!(ErrorKind::Encode(format!("{} ({} channels)", path_name(path), n))),
    };
    debug!(
        "Encoding {}×{}×{} image to {}",
        raw.width,
        raw.height,
        raw.channels,
        path.display()
    );
    image::save_buffer(
        path,
        &raw.data,
        raw.width as u32,
        raw.height as u32,
        color,
    )
    .chain_err(|| ErrorKind::Encode(path_name(path)))
}

pub trait ImageFile: PixelBuffer {
    /// Decodes `path`. With `force_channels` the buffer gets exactly 3 channels.
    fn open(path: &Path, force_channels: bool) -> Result<Self> {
        let raw = decode(path)?;
        Ok(Self::from_raw(&raw, force_channels))
    }

    fn save(&self, path: &Path) -> Result<()> {
        encode(path, &self.to_raw())
    }
}

impl<I: PixelBuffer> ImageFile for I {}
