use std::ffi::OsStr;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{Error, Result};

/// CPU-side RGBA8 output image.
pub struct Image {
    buffer: RgbaImage,
    pub name: String,
}

fn format_of(path: &Path) -> Result<ImageFormat> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;

    match extension.to_ascii_lowercase().as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        other => Err(Error::UnsupportedFormat(other.to_owned())),
    }
}

/// True when `path` names a format [`Image::save`] can write.
pub fn is_supported_path<P: AsRef<Path>>(path: P) -> bool {
    format_of(path.as_ref()).is_ok()
}

impl Image {
    pub fn new(width: u32, height: u32, label: &str) -> Image {
        Self {
            buffer: RgbaImage::new(width, height),
            name: label.to_string(),
        }
    }

    /// Replaces the pixels with tightly packed RGBA8 rows.
    pub fn load_image(&mut self, rgba: &[u8]) {
        let pixel_count = (self.buffer.width() * self.buffer.height()) as usize;
        assert_eq!(pixel_count, rgba.len() / 4, "pixel data does not match image size");

        self.buffer.copy_from_slice(rgba);
    }

    pub fn from_path<P: AsRef<Path>>(path: P, label: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let format = format_of(path)?;
        let label = label
            .or(path.file_name().and_then(OsStr::to_str))
            .unwrap_or("image")
            .to_owned();

        let loaded = image::load(std::io::BufReader::new(std::fs::File::open(path)?), format)?;
        Ok(Self {
            buffer: loaded.into_rgba8(),
            name: label,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match format_of(path)? {
            // No alpha channel in JPEG.
            ImageFormat::Jpeg => DynamicImage::ImageRgba8(self.buffer.clone())
                .to_rgb8()
                .save_with_format(path, ImageFormat::Jpeg)?,
            format => self.buffer.save_with_format(path, format)?,
        }
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size() == (width, height) {
            return;
        }

        self.buffer = RgbaImage::new(width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    pub fn as_raw(&self) -> &[u8] {
        self.buffer.as_raw()
    }
}
