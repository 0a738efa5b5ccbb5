//! Images to PDF: one image per page, centered on A4.

use crate::error::ConvertError;
use image::codecs::jpeg::JpegEncoder;
use lopdf::{dictionary, Document, Object, Stream};

const A4_WIDTH: f64 = 595.0;
const A4_HEIGHT: f64 = 842.0;
// 5% breathing room around the image.
const FIT_FACTOR: f64 = 0.95;
const JPEG_QUALITY: u8 = 95;

/// Convert a list of images (any format the `image` crate decodes) into a
/// PDF with one page per image, scaled to fit A4 and centered.
pub fn images_to_pdf(images: &[Vec<u8>]) -> Result<Vec<u8>, ConvertError> {
    if images.is_empty() {
        return Err(ConvertError::NoInput);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();

    for (index, bytes) in images.iter().enumerate() {
        let decoded = image::load_from_memory(bytes).map_err(|e| {
            ConvertError::Decode(format!("image {}: {}", index + 1, e))
        })?;

        // JPEG inside the PDF regardless of source format; DCTDecode keeps
        // the embedded data compact and viewer-native.
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
            .encode_image(&rgb)
            .map_err(|e| ConvertError::Encode(format!("image {}: {}", index + 1, e)))?;

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        let scale = (A4_WIDTH / width as f64)
            .min(A4_HEIGHT / height as f64)
            * FIT_FACTOR;
        let draw_width = width as f64 * scale;
        let draw_height = height as f64 * scale;
        let x = (A4_WIDTH - draw_width) / 2.0;
        let y = (A4_HEIGHT - draw_height) / 2.0;

        let content = format!(
            "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /Im0 Do Q",
            draw_width, draw_height, x, y
        );
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(A4_WIDTH as f32),
                Object::Real(A4_HEIGHT as f32),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => Object::Reference(image_id),
                },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => count,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ConvertError::Encode(e.to_string()))?;
    Ok(buffer)
}
