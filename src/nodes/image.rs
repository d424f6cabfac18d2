use crate::error::{ImageBufferError, NodeError};
use crate::graph::{ExecuteContext, NodeBehavior};
use crate::registry::{NodeBuilder, NodeFactory};
use crate::value::{EnumChoice, ImageBuffer, Rect, ValueType};
use ::image::ImageReader;
use std::fs;
use std::io;
use std::path::Path;

/// Reads a whole file, reporting a missing file with its path.
fn read_file(path: &Path) -> Result<Vec<u8>, NodeError> {
    fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => NodeError::FileNotFound(path.to_path_buf()),
        _ => NodeError::Io(err),
    })
}

fn dimension(value: i64, name: &'static str) -> Result<u32, NodeError> {
    match u32::try_from(value) {
        Ok(dimension) if dimension > 0 => Ok(dimension),
        _ => Err(NodeError::OutOfRange { name, value }),
    }
}

/// Decodes a PNG, JPEG or BMP file from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFile;

impl NodeFactory for ImageFile {
    fn kind(&self) -> &str {
        "Image File"
    }

    fn category(&self) -> &str {
        "Images"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Path", "")
            .output("Image", ValueType::Image)
            .output("Size", ValueType::Size);
        Box::new(Self)
    }
}

impl NodeBehavior for ImageFile {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let path = Path::new(ctx.string(0)?);
        if !path.is_file() {
            return Err(NodeError::FileNotFound(path.to_path_buf()));
        }

        let decoded = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        let image = ImageBuffer::from_dynamic(decoded);
        tracing::debug!(path = %path.display(), %image, "decoded image file");

        ctx.set_output(1, image.size());
        ctx.set_output(0, image);
        Ok(())
    }
}

/// Interprets a headerless file as packed samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawImage;

impl RawImage {
    pub const DEPTHS: [&'static str; 2] = ["8", "16"];
}

impl NodeFactory for RawImage {
    fn kind(&self) -> &str {
        "Raw Image"
    }

    fn category(&self) -> &str {
        "Images"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Path", "")
            .input("Width", 0i64)
            .input("Height", 0i64)
            .input("Channels", 1i64)
            .input("Depth", EnumChoice::new(Self::DEPTHS, 0))
            .input("Offset", 0i64)
            .input("Big Endian", false)
            .output("Image", ValueType::Image);
        Box::new(Self)
    }
}

impl NodeBehavior for RawImage {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let path = Path::new(ctx.string(0)?);
        let width = dimension(ctx.int(1)?, "width")?;
        let height = dimension(ctx.int(2)?, "height")?;
        let channels = match u8::try_from(ctx.int(3)?) {
            Ok(channels @ 1..=4) => channels,
            _ => {
                return Err(NodeError::OutOfRange {
                    name: "channels",
                    value: ctx.int(3)?,
                });
            }
        };
        let bytes_per_sample = match ctx.choice(4)?.selected_label() {
            Some("16") => 2,
            _ => 1,
        };
        let raw_offset = ctx.int(5)?;
        let offset = usize::try_from(raw_offset).map_err(|_| NodeError::OutOfRange {
            name: "offset",
            value: raw_offset,
        })?;
        let big_endian = ctx.bool(6)?;

        let needed = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(usize::from(channels) * bytes_per_sample))
            .ok_or(ImageBufferError::TooLarge {
                width,
                height,
                channels,
            })?;
        let end = offset.checked_add(needed).ok_or(NodeError::OutOfRange {
            name: "offset",
            value: raw_offset,
        })?;
        let bytes = read_file(path)?;
        if bytes.len() < end {
            return Err(NodeError::SizeMismatch {
                expected: end,
                actual: bytes.len(),
            });
        }
        let data = &bytes[offset..end];

        let pixels = if bytes_per_sample == 1 {
            data.to_vec()
        } else {
            data.chunks_exact(2)
                .map(|pair| {
                    let sample = if big_endian {
                        u16::from_be_bytes([pair[0], pair[1]])
                    } else {
                        u16::from_le_bytes([pair[0], pair[1]])
                    };
                    (sample >> 8) as u8
                })
                .collect()
        };

        ctx.set_output(0, ImageBuffer::new(width, height, channels, pixels)?);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSize;

impl NodeFactory for ImageSize {
    fn kind(&self) -> &str {
        "Image Size"
    }

    fn category(&self) -> &str {
        "Images"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Image", ImageBuffer::empty())
            .output("Size", ValueType::Size);
        Box::new(Self)
    }
}

impl NodeBehavior for ImageSize {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let size = ctx.image(0)?.size();
        ctx.set_output(0, size);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CropImage;

impl NodeFactory for CropImage {
    fn kind(&self) -> &str {
        "Crop Image"
    }

    fn category(&self) -> &str {
        "Images"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Image", ImageBuffer::empty())
            .input("Region", Rect::default())
            .output("Image", ValueType::Image);
        Box::new(Self)
    }
}

impl NodeBehavior for CropImage {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let image = ctx.image(0)?;
        let region = ctx.rect(1)?;
        let cropped = image.crop(region).ok_or(NodeError::OutOfBounds {
            region,
            width: image.width(),
            height: image.height(),
        })?;
        ctx.set_output(0, cropped);
        Ok(())
    }
}

/// Reports whether an image holds any pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageLoaded;

impl NodeFactory for ImageLoaded {
    fn kind(&self) -> &str {
        "Image Loaded"
    }

    fn category(&self) -> &str {
        "Images"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        builder
            .input("Image", ImageBuffer::empty())
            .output("Loaded", ValueType::Bool);
        Box::new(Self)
    }
}

impl NodeBehavior for ImageLoaded {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        let loaded = !ctx.image(0)?.is_empty();
        ctx.set_output(0, loaded);
        Ok(())
    }
}
