//! PDF to page images, packaged as a zip archive.
//!
//! Rasterization goes through pdfium bound at runtime from the system
//! library. When no library is present the conversion fails with a
//! [`ConvertError::Render`] instead of aborting the process.

use crate::error::ConvertError;
use pdfium_render::prelude::*;
use std::io::{Cursor, Write};
use std::str::FromStr;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Output encoding for rasterized pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            other => Err(ConvertError::Decode(format!(
                "unsupported image format '{}' (expected jpeg or png)",
                other
            ))),
        }
    }
}

/// Render every page of `bytes` at `dpi` and return a zip archive with one
/// `page_N.<ext>` entry per page. Runs on the blocking pool; pdfium handles
/// are confined to that thread.
pub async fn pdf_to_images(
    bytes: Vec<u8>,
    format: ImageFormat,
    dpi: u32,
) -> Result<Vec<u8>, ConvertError> {
    tokio::task::spawn_blocking(move || rasterize(&bytes, format, dpi))
        .await
        .map_err(|e| ConvertError::Render(format!("render task failed: {}", e)))?
}

fn rasterize(bytes: &[u8], format: ImageFormat, dpi: u32) -> Result<Vec<u8>, ConvertError> {
    let bindings = Pdfium::bind_to_system_library().map_err(|e| {
        tracing::warn!("pdfium system library unavailable: {}", e);
        ConvertError::Render(format!("pdfium unavailable: {}", e))
    })?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| ConvertError::Decode(e.to_string()))?;

    // 72 dpi is pdfium's native scale.
    let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (index, page) in document.pages().iter().enumerate() {
        let rendered = page
            .render_with_config(&render_config)
            .map_err(|e| ConvertError::Render(format!("page {}: {}", index + 1, e)))?
            .as_image();

        let mut encoded = Vec::new();
        let result = match format {
            // JPEG cannot carry alpha.
            ImageFormat::Jpeg => rendered
                .to_rgb8()
                .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Jpeg),
            ImageFormat::Png => {
                rendered.write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
            }
        };
        result.map_err(|e| ConvertError::Encode(format!("page {}: {}", index + 1, e)))?;

        let entry = format!("page_{}.{}", index + 1, format.extension());
        archive
            .start_file(entry, options)
            .map_err(|e| ConvertError::Encode(e.to_string()))?;
        archive
            .write_all(&encoded)
            .map_err(|e| ConvertError::Encode(e.to_string()))?;
    }

    let cursor = archive
        .finish()
        .map_err(|e| ConvertError::Encode(e.to_string()))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_common_spellings() {
        assert_eq!("jpeg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("jpg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("PNG".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
    }

    #[test]
    fn format_rejects_unknown() {
        let err = "webp".parse::<ImageFormat>().unwrap_err();
        assert!(err.to_string().contains("webp"));
    }

    #[test]
    fn extensions_match_format() {
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
        assert_eq!(ImageFormat::Png.extension(), "png");
    }
}
