//! Response bodies for the transformation endpoints.
//!
//! Every success body carries `success`, `message`, `filename`,
//! `download_url`, and `file_size`; endpoints add their own metrics on top.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MergeResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub download_url: String,
    pub file_size: u64,
    pub pages_count: usize,
}

#[derive(Debug, Serialize)]
pub struct SplitResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub download_url: String,
    pub file_size: u64,
    pub pages_extracted: usize,
    pub original_pages: usize,
}

#[derive(Debug, Serialize)]
pub struct CompressResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub download_url: String,
    pub file_size: u64,
    pub original_size: u64,
    pub compressed_size: u64,
    pub original_size_formatted: String,
    pub compressed_size_formatted: String,
    pub reduction_percentage: f64,
    pub quality: String,
}

#[derive(Debug, Serialize)]
pub struct RotateResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub download_url: String,
    pub file_size: u64,
    pub total_pages: usize,
    pub pages_rotated: usize,
    pub rotation: i64,
}

#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub download_url: String,
    pub file_size: u64,
    pub total_pages: usize,
    pub original_pages: usize,
}

#[derive(Debug, Serialize)]
pub struct WatermarkResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub download_url: String,
    pub file_size: u64,
    pub watermark: String,
}

#[derive(Debug, Serialize)]
pub struct PageNumbersResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub download_url: String,
    pub file_size: u64,
    pub position: String,
}

#[derive(Debug, Serialize)]
pub struct PdfToImagesResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub download_url: String,
    pub file_size: u64,
    pub format: String,
    pub dpi: u32,
}

#[derive(Debug, Serialize)]
pub struct ImagesToPdfResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub download_url: String,
    pub file_size: u64,
    pub pages: usize,
}

#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub download_url: String,
    pub file_size: u64,
}

/// Human-readable file size, decimal units.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
