//! Raster images embedded as image XObjects.
//!
//! JPEG data is embedded untouched behind `DCTDecode`. Every other format the
//! `image` crate can read is decoded, flattened onto white and stored as raw
//! RGB samples (Flate-compressed when the `compression` feature is on).

use crate::error::{ReportError, Result};
use crate::objects::{Dictionary, Object};

/// An image ready to be written as an XObject
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    data: Vec<u8>,
    format: ImageFormat,
    width: u32,
    height: u32,
    color_space: ColorSpace,
}

/// How the sample data is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Original JPEG stream
    Jpeg,
    /// Decoded 8-bit samples, zlib-compressed
    Flate,
    /// Decoded 8-bit samples, uncompressed
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
    DeviceCMYK,
}

impl ColorSpace {
    fn pdf_name(self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

impl Image {
    /// Sniff the bytes and build the matching XObject representation
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.starts_with(&[0xFF, 0xD8]) {
            return Self::from_jpeg_data(data);
        }
        Self::from_decoded(&data)
    }

    /// Create an image from JPEG data
    pub fn from_jpeg_data(data: Vec<u8>) -> Result<Self> {
        let (width, height, color_space) = parse_jpeg_header(&data)?;

        Ok(Image {
            data,
            format: ImageFormat::Jpeg,
            width,
            height,
            color_space,
        })
    }

    fn from_decoded(data: &[u8]) -> Result<Self> {
        let decoded =
            image::load_from_memory(data).map_err(|e| ReportError::InvalidImage(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        // Composite over white, the only background images sit on
        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = a as u32;
            for channel in [r, g, b] {
                let blended = (channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255;
                rgb.push(blended as u8);
            }
        }

        let (data, format) = pack_samples(rgb)?;
        Ok(Image {
            data,
            format,
            width,
            height,
            color_space: ColorSpace::DeviceRGB,
        })
    }

    /// Get image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }

    /// Convert to PDF XObject
    pub fn to_pdf_object(&self) -> Object {
        let mut dict = Dictionary::new();

        dict.set("Type", Object::name("XObject"));
        dict.set("Subtype", Object::name("Image"));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set("ColorSpace", Object::name(self.color_space.pdf_name()));
        dict.set("BitsPerComponent", 8_i64);

        match self.format {
            ImageFormat::Jpeg => dict.set("Filter", Object::name("DCTDecode")),
            ImageFormat::Flate => dict.set("Filter", Object::name("FlateDecode")),
            ImageFormat::Raw => {}
        }
        dict.set("Length", self.data.len() as i64);

        Object::Stream(dict, self.data.clone())
    }
}

#[cfg(feature = "compression")]
fn pack_samples(samples: Vec<u8>) -> Result<(Vec<u8>, ImageFormat)> {
    Ok((crate::objects::deflate(&samples)?, ImageFormat::Flate))
}

#[cfg(not(feature = "compression"))]
fn pack_samples(samples: Vec<u8>) -> Result<(Vec<u8>, ImageFormat)> {
    Ok((samples, ImageFormat::Raw))
}

/// Walk the JPEG markers up to the first SOF segment
fn parse_jpeg_header(data: &[u8]) -> Result<(u32, u32, ColorSpace)> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ReportError::InvalidImage("Not a valid JPEG file".to_string()));
    }

    let truncated = || ReportError::InvalidImage("Truncated JPEG file".to_string());
    let mut pos = 2;

    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return Err(ReportError::InvalidImage("Invalid JPEG marker".to_string()));
        }

        let marker = data[pos + 1];
        pos += 2;

        match marker {
            0xFF => pos -= 1,
            0xD8 | 0xD0..=0xD7 | 0x01 => {}
            0xD9 => break,
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                // length(2) precision(1) height(2) width(2) components(1)
                let segment = data.get(pos..pos + 8).ok_or_else(truncated)?;
                let height = u16::from_be_bytes([segment[3], segment[4]]) as u32;
                let width = u16::from_be_bytes([segment[5], segment[6]]) as u32;
                let color_space = match segment[7] {
                    1 => ColorSpace::DeviceGray,
                    3 => ColorSpace::DeviceRGB,
                    4 => ColorSpace::DeviceCMYK,
                    n => {
                        return Err(ReportError::InvalidImage(format!(
                            "Unsupported number of components: {n}"
                        )))
                    }
                };
                if width == 0 || height == 0 {
                    break;
                }
                return Ok((width, height, color_space));
            }
            _ => {
                let length = data.get(pos..pos + 2).ok_or_else(truncated)?;
                pos += u16::from_be_bytes([length[0], length[1]]) as usize;
            }
        }
    }

    Err(ReportError::InvalidImage(
        "Could not find image dimensions".to_string(),
    ))
}
