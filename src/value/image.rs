use super::{Rect, Size};
use crate::error::ImageBufferError;
use ::image::DynamicImage;
use std::fmt;

/// An owned, tightly packed 8-bit pixel buffer.
///
/// Cloning deep-copies the pixels, so every pin holding an image owns its data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
}

impl ImageBuffer {
    /// Wraps `pixels` after checking that it covers exactly `width * height * channels` bytes.
    pub fn new(
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
    ) -> Result<Self, ImageBufferError> {
        if !(1..=4).contains(&channels) {
            return Err(ImageBufferError::Channels(channels));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(usize::from(channels)))
            .ok_or(ImageBufferError::TooLarge {
                width,
                height,
                channels,
            })?;
        if pixels.len() != expected {
            return Err(ImageBufferError::SizeMismatch {
                width,
                height,
                channels,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// An image with no pixels; what an unconnected image input holds.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Converts a decoded image, keeping gray/gray-alpha/RGB/RGBA layouts and
    /// widening anything else to RGBA.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let (channels, pixels) = match image {
            DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
            other => (4, other.to_rgba8().into_raw()),
        };
        Self {
            width,
            height,
            channels,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The channel values of the pixel at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let stride = self.channels as usize;
        let start = (y as usize * self.width as usize + x as usize) * stride;
        self.pixels.get(start..start + stride)
    }

    /// Copies out `region`, or `None` when it does not lie fully inside the image.
    pub fn crop(&self, region: Rect) -> Option<ImageBuffer> {
        if region.x < 0 || region.y < 0 {
            return None;
        }
        let (x, y) = (region.x as u64, region.y as u64);
        if x + u64::from(region.width) > u64::from(self.width)
            || y + u64::from(region.height) > u64::from(self.height)
        {
            return None;
        }

        let stride = self.channels as usize;
        let row_len = region.width as usize * stride;
        let mut pixels = Vec::with_capacity(row_len * region.height as usize);
        for row in y as usize..y as usize + region.height as usize {
            let start = (row * self.width as usize + x as usize) * stride;
            pixels.extend_from_slice(&self.pixels[start..start + row_len]);
        }
        Some(Self {
            width: region.width,
            height: region.height,
            channels: self.channels,
            pixels,
        })
    }
}

impl fmt::Display for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "image <empty>")
        } else {
            write!(
                f,
                "image {}x{}x{}",
                self.width, self.height, self.channels
            )
        }
    }
}
