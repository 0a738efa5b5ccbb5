//! HTTP handlers for the transformation endpoints.
//!
//! Every upload endpoint follows the same shape: parse the multipart form,
//! validate inputs, run the transformation, persist the artifact with a
//! scheduled deletion, and answer with a download URL plus metrics.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;

use pdfdesk_convert as convert;
use pdfdesk_core as pdf;
use pdfdesk_store::content_type_for;

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

struct Form {
    files: Vec<Upload>,
    fields: HashMap<String, String>,
}

impl Form {
    fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn require_text(&self, name: &str) -> Result<&str, ApiError> {
        self.text(name)
            .ok_or_else(|| ApiError::Validation(format!("Missing form field '{}'", name)))
    }

    fn single_file(self) -> Result<Upload, ApiError> {
        let mut files = self.files;
        match files.len() {
            1 => Ok(files.remove(0)),
            0 => Err(ApiError::Validation("No file uploaded".into())),
            n => Err(ApiError::Validation(format!(
                "Expected exactly one file, got {}",
                n
            ))),
        }
    }
}

/// Body-limit overruns surface as multipart read errors; keep them 413
/// rather than folding them into generic 400s.
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge("Upload exceeds the size limit".into())
    } else {
        ApiError::Validation(format!("Malformed multipart request: {}", e))
    }
}

async fn parse_form(mut multipart: Multipart, max_bytes: usize) -> Result<Form, ApiError> {
    let mut files = Vec::new();
    let mut fields = HashMap::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(filename) => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.len() > max_bytes {
                    return Err(ApiError::TooLarge(format!(
                        "'{}' exceeds the {} MB upload limit",
                        filename,
                        max_bytes / (1024 * 1024)
                    )));
                }
                files.push(Upload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            None => {
                let value = field.text().await.map_err(multipart_error)?;
                fields.insert(name, value);
            }
        }
    }

    Ok(Form { files, fields })
}

fn require_extension(upload: &Upload, allowed: &[&str]) -> Result<(), ApiError> {
    let extension = upload
        .filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
        _ => Err(ApiError::Validation(format!(
            "'{}' is not a supported file type (expected {})",
            upload.filename,
            allowed.join("/")
        ))),
    }
}

fn download_url(name: &str) -> String {
    format!("/api/download/{}", name)
}

pub async fn merge(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<MergeResponse>, ApiError> {
    let form = parse_form(multipart, state.config.max_body_bytes()).await?;
    if form.files.len() < 2 {
        return Err(ApiError::Validation(
            "At least 2 PDF files are required to merge".into(),
        ));
    }
    for upload in &form.files {
        require_extension(upload, &["pdf"])?;
    }

    let documents: Vec<Vec<u8>> = form.files.into_iter().map(|u| u.bytes).collect();
    let merged = pdf::merge_documents(documents)?;
    let pages_count = pdf::page_count(&merged)?;

    let filename = state.store_artifact(&merged, "pdf").await?;
    tracing::info!("merged {} pages into {}", pages_count, filename);

    Ok(Json(MergeResponse {
        success: true,
        message: "PDFs merged successfully".into(),
        download_url: download_url(&filename),
        filename,
        file_size: merged.len() as u64,
        pages_count,
    }))
}

pub async fn split(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<SplitResponse>, ApiError> {
    let form = parse_form(multipart, state.config.max_body_bytes()).await?;
    let pages_spec = form.require_text("pages")?.to_string();
    let upload = form.single_file()?;
    require_extension(&upload, &["pdf"])?;

    let original_pages = pdf::page_count(&upload.bytes)?;
    let indices = pdf::parse_page_ranges(&pages_spec, original_pages)?;
    let extracted = pdf::extract_pages(&upload.bytes, &indices)?;

    let filename = state.store_artifact(&extracted, "pdf").await?;

    Ok(Json(SplitResponse {
        success: true,
        message: "PDF split successfully".into(),
        download_url: download_url(&filename),
        filename,
        file_size: extracted.len() as u64,
        pages_extracted: indices.len(),
        original_pages,
    }))
}

pub async fn compress(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<CompressResponse>, ApiError> {
    let form = parse_form(multipart, state.config.max_body_bytes()).await?;
    let quality: pdf::CompressionQuality = form.text("quality").unwrap_or("medium").parse()?;
    let upload = form.single_file()?;
    require_extension(&upload, &["pdf"])?;

    let compressed = pdf::compress_document(&upload.bytes, quality)?;

    let original_size = upload.bytes.len() as u64;
    let compressed_size = compressed.len() as u64;
    let reduction = if original_size > 0 {
        (original_size as f64 - compressed_size as f64) / original_size as f64 * 100.0
    } else {
        0.0
    };

    let filename = state.store_artifact(&compressed, "pdf").await?;

    Ok(Json(CompressResponse {
        success: true,
        message: "PDF compressed successfully".into(),
        download_url: download_url(&filename),
        filename,
        file_size: compressed_size,
        original_size,
        compressed_size,
        original_size_formatted: format_file_size(original_size),
        compressed_size_formatted: format_file_size(compressed_size),
        reduction_percentage: (reduction * 10.0).round() / 10.0,
        quality: format!("{:?}", quality).to_lowercase(),
    }))
}

pub async fn rotate(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<RotateResponse>, ApiError> {
    let form = parse_form(multipart, state.config.max_body_bytes()).await?;
    let rotation: i64 = form
        .require_text("rotation")?
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation("Rotation must be an integer".into()))?;
    let pages_spec = form.text("pages").map(str::to_string);
    let upload = form.single_file()?;
    require_extension(&upload, &["pdf"])?;

    let total_pages = pdf::page_count(&upload.bytes)?;
    let filter = match &pages_spec {
        Some(spec) => Some(pdf::parse_page_ranges(spec, total_pages)?),
        None => None,
    };
    let pages_rotated = filter.as_ref().map_or(total_pages, Vec::len);
    let rotated = pdf::rotate_pages(&upload.bytes, rotation, filter.as_deref())?;

    let filename = state.store_artifact(&rotated, "pdf").await?;

    Ok(Json(RotateResponse {
        success: true,
        message: "PDF rotated successfully".into(),
        download_url: download_url(&filename),
        filename,
        file_size: rotated.len() as u64,
        total_pages,
        pages_rotated,
        rotation,
    }))
}

pub async fn reorder(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ReorderResponse>, ApiError> {
    let form = parse_form(multipart, state.config.max_body_bytes()).await?;
    let order: Vec<i64> = serde_json::from_str(form.require_text("page_order")?)
        .map_err(|_| ApiError::Validation("page_order must be a JSON array of integers".into()))?;
    let upload = form.single_file()?;
    require_extension(&upload, &["pdf"])?;

    let original_pages = pdf::page_count(&upload.bytes)?;
    let indices = pdf::validate_page_order(&order, original_pages)?;
    let reordered = pdf::reorder_pages(&upload.bytes, &indices)?;

    let filename = state.store_artifact(&reordered, "pdf").await?;

    Ok(Json(ReorderResponse {
        success: true,
        message: "Pages reordered successfully".into(),
        download_url: download_url(&filename),
        filename,
        file_size: reordered.len() as u64,
        total_pages: indices.len(),
        original_pages,
    }))
}

pub async fn add_watermark(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<WatermarkResponse>, ApiError> {
    let form = parse_form(multipart, state.config.max_body_bytes()).await?;
    let text = form.require_text("watermark_text")?.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::Validation("Watermark text cannot be empty".into()));
    }
    if text.chars().count() > 50 {
        return Err(ApiError::Validation(
            "Watermark text cannot exceed 50 characters".into(),
        ));
    }
    let opacity: f64 = match form.text("opacity") {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ApiError::Validation("Opacity must be a number".into()))?,
        None => 0.3,
    };
    if !(0.1..=1.0).contains(&opacity) {
        return Err(ApiError::Validation(
            "Opacity must be between 0.1 and 1.0".into(),
        ));
    }
    let upload = form.single_file()?;
    require_extension(&upload, &["pdf"])?;

    let watermarked = pdf::add_watermark(&upload.bytes, &text, opacity)?;
    let filename = state.store_artifact(&watermarked, "pdf").await?;

    Ok(Json(WatermarkResponse {
        success: true,
        message: "Watermark added successfully".into(),
        download_url: download_url(&filename),
        filename,
        file_size: watermarked.len() as u64,
        watermark: text,
    }))
}

pub async fn add_page_numbers(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<PageNumbersResponse>, ApiError> {
    let form = parse_form(multipart, state.config.max_body_bytes()).await?;
    let position_raw = form.text("position").unwrap_or("bottom-center").to_string();
    let position: pdf::PageNumberPosition = position_raw.parse()?;
    let upload = form.single_file()?;
    require_extension(&upload, &["pdf"])?;

    let numbered = pdf::add_page_numbers(&upload.bytes, position)?;
    let filename = state.store_artifact(&numbered, "pdf").await?;

    Ok(Json(PageNumbersResponse {
        success: true,
        message: "Page numbers added successfully".into(),
        download_url: download_url(&filename),
        filename,
        file_size: numbered.len() as u64,
        position: position_raw,
    }))
}

pub async fn pdf_to_jpg(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<PdfToImagesResponse>, ApiError> {
    let form = parse_form(multipart, state.config.max_body_bytes()).await?;
    let format_raw = form.text("format").unwrap_or("jpeg").to_string();
    let format: convert::ImageFormat = format_raw.parse()?;
    let dpi: u32 = match form.text("dpi") {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ApiError::Validation("DPI must be an integer".into()))?,
        None => 200,
    };
    if !(72..=600).contains(&dpi) {
        return Err(ApiError::Validation("DPI must be between 72 and 600".into()));
    }
    let upload = form.single_file()?;
    require_extension(&upload, &["pdf"])?;

    let archive = convert::pdf_to_images(upload.bytes, format, dpi).await?;
    let filename = state.store_artifact(&archive, "zip").await?;

    Ok(Json(PdfToImagesResponse {
        success: true,
        message: "PDF converted to images successfully".into(),
        download_url: download_url(&filename),
        filename,
        file_size: archive.len() as u64,
        format: format_raw,
        dpi,
    }))
}

pub async fn jpg_to_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ImagesToPdfResponse>, ApiError> {
    let form = parse_form(multipart, state.config.max_body_bytes()).await?;
    if form.files.is_empty() {
        return Err(ApiError::Validation("No image files uploaded".into()));
    }
    for upload in &form.files {
        require_extension(upload, &["jpg", "jpeg", "png"])?;
    }

    let pages = form.files.len();
    let images: Vec<Vec<u8>> = form.files.into_iter().map(|u| u.bytes).collect();
    let pdf = convert::images_to_pdf(&images)?;

    let filename = state.store_artifact(&pdf, "pdf").await?;

    Ok(Json(ImagesToPdfResponse {
        success: true,
        message: "Images converted to PDF successfully".into(),
        download_url: download_url(&filename),
        filename,
        file_size: pdf.len() as u64,
        pages,
    }))
}

pub async fn pdf_to_word(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ConversionResponse>, ApiError> {
    let form = parse_form(multipart, state.config.max_body_bytes()).await?;
    let upload = form.single_file()?;
    require_extension(&upload, &["pdf"])?;

    let docx = convert::pdf_to_word(&upload.bytes)?;
    let filename = state.store_artifact(&docx, "docx").await?;

    Ok(Json(ConversionResponse {
        success: true,
        message: "PDF converted to Word successfully".into(),
        download_url: download_url(&filename),
        filename,
        file_size: docx.len() as u64,
    }))
}

pub async fn word_to_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ConversionResponse>, ApiError> {
    let form = parse_form(multipart, state.config.max_body_bytes()).await?;
    let upload = form.single_file()?;
    require_extension(&upload, &["docx"])?;

    let pdf = convert::word_to_pdf(&upload.bytes)?;
    let filename = state.store_artifact(&pdf, "pdf").await?;

    Ok(Json(ConversionResponse {
        success: true,
        message: "Word document converted to PDF successfully".into(),
        download_url: download_url(&filename),
        filename,
        file_size: pdf.len() as u64,
    }))
}

pub async fn excel_to_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ConversionResponse>, ApiError> {
    let form = parse_form(multipart, state.config.max_body_bytes()).await?;
    let upload = form.single_file()?;
    require_extension(&upload, &["xlsx"])?;

    let pdf = convert::excel_to_pdf(&upload.bytes)?;
    let filename = state.store_artifact(&pdf, "pdf").await?;

    Ok(Json(ConversionResponse {
        success: true,
        message: "Excel file converted to PDF successfully".into(),
        download_url: download_url(&filename),
        filename,
        file_size: pdf.len() as u64,
    }))
}

/// Serve a stored artifact; 404 once its retention window has passed.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state
        .store
        .retrieve(&name)
        .await?
        .ok_or_else(|| ApiError::NotFound(name.clone()))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&name).to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", name),
            ),
        ],
        bytes,
    ))
}
