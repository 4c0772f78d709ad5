//! Image payloads placed on slides.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::io::Cursor;

/// Image formats a deck can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Webp,
}

impl ImageFormat {
    /// File extension used for the embedded media part.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Webp => "webp",
        }
    }

    /// MIME type registered for the extension in the package.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Webp => "image/webp",
        }
    }

    fn from_detected(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Gif => Some(Self::Gif),
            image::ImageFormat::Bmp => Some(Self::Bmp),
            image::ImageFormat::Tiff => Some(Self::Tiff),
            image::ImageFormat::WebP => Some(Self::Webp),
            _ => None,
        }
    }
}

/// A downloaded image with its detected format and pixel size.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width_px: u32,
    pub height_px: u32,
}

impl ImageData {
    /// Inspect raw bytes and build an image payload.
    ///
    /// `content_type` is the value reported by the server, if any. It must
    /// be an `image/*` type when present; the actual format is always
    /// detected from the bytes.
    pub fn probe(bytes: Vec<u8>, content_type: Option<&str>) -> Result<Self> {
        if let Some(content_type) = content_type {
            let essence = content_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            if !essence.starts_with("image/") {
                return Err(Error::NotAnImage(format!(
                    "content type is {:?}",
                    content_type
                )));
            }
        }

        let detected = image::guess_format(&bytes)
            .map_err(|e| Error::NotAnImage(format!("unrecognized image data: {}", e)))?;
        let format = ImageFormat::from_detected(detected).ok_or_else(|| {
            Error::NotAnImage(format!("unsupported image format {:?}", detected))
        })?;

        let (width_px, height_px) = image::ImageReader::with_format(Cursor::new(&bytes), detected)
            .into_dimensions()
            .map_err(|e| Error::NotAnImage(format!("cannot read image size: {}", e)))?;

        if width_px == 0 || height_px == 0 {
            return Err(Error::NotAnImage("image has no pixels".to_string()));
        }

        Ok(Self {
            bytes,
            format,
            width_px,
            height_px,
        })
    }

    /// Height over width.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.height_px) / f64::from(self.width_px)
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("format", &self.format)
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Encode a blank PNG of the given size, for tests.
#[cfg(test)]
pub(crate) fn test_png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height))
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_png() {
        let image = ImageData::probe(test_png(40, 10), Some("image/png")).unwrap();
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!((image.width_px, image.height_px), (40, 10));
        assert_eq!(image.aspect_ratio(), 0.25);
    }

    #[test]
    fn test_probe_without_content_type() {
        let image = ImageData::probe(test_png(3, 3), None).unwrap();
        assert_eq!(image.format.extension(), "png");
    }

    #[test]
    fn test_probe_content_type_with_parameters() {
        assert!(ImageData::probe(test_png(3, 3), Some("Image/PNG; charset=binary")).is_ok());
    }

    #[test]
    fn test_probe_rejects_html_content_type() {
        let err = ImageData::probe(test_png(3, 3), Some("text/html; charset=utf-8")).unwrap_err();
        assert!(matches!(err, Error::NotAnImage(_)));
    }

    #[test]
    fn test_probe_rejects_garbage() {
        let err = ImageData::probe(b"<html>not found</html>".to_vec(), None).unwrap_err();
        assert!(matches!(err, Error::NotAnImage(_)));
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ImageFormat::Jpeg.extension(), "jpeg");
        assert_eq!(ImageFormat::Jpeg.content_type(), "image/jpeg");
        assert_eq!(ImageFormat::Webp.content_type(), "image/webp");
    }
}
