//! Format conversions between PDF, raster images, Word, and Excel.
//!
//! PDF structure work lives in `pdfdesk-core`; this crate only crosses
//! format boundaries.

mod error;
mod excel;
mod images;
mod raster;
mod textpdf;
mod word;

pub use error::ConvertError;
pub use excel::excel_to_pdf;
pub use images::images_to_pdf;
pub use raster::{pdf_to_images, ImageFormat};
pub use textpdf::{render_text_pdf, TextBlock};
pub use word::{pdf_to_word, word_to_pdf};
