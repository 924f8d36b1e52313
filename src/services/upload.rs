//! Multipart collection and image validation for photo/logo uploads.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures_util::StreamExt;
use image::ImageFormat;

use crate::error::{AppError, AppResult, FieldError};

/// One uploaded file, fully buffered.
#[derive(Debug)]
pub struct UploadedFile {
    /// Multipart field name (e.g. "fotos", "logotipo").
    pub field: String,
    pub filename: String,
    pub data: Vec<u8>,
}

/// Drain a multipart payload into text fields and buffered files.
///
/// Any single file larger than `max_file_size` fails the whole request so
/// that nothing is persisted.
pub async fn collect_multipart(
    mut payload: Multipart,
    max_file_size: usize,
) -> AppResult<(HashMap<String, String>, Vec<UploadedFile>)> {
    let mut fields = HashMap::new();
    let mut files = Vec::new();

    while let Some(item) = payload.next().await {
        let mut part =
            item.map_err(|e| AppError::InvalidInput(format!("Invalid multipart data: {}", e)))?;

        let field_name = part.name().unwrap_or_default().to_string();
        let filename = part
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|f| f.to_string());

        let mut data = Vec::new();
        while let Some(chunk) = part.next().await {
            let chunk = chunk
                .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?;
            if data.len() + chunk.len() > max_file_size {
                return Err(AppError::Validation(vec![FieldError::new(
                    field_name,
                    format!("arquivo excede o tamanho máximo de {} bytes", max_file_size),
                )]));
            }
            data.extend_from_slice(&chunk);
        }

        match filename {
            Some(filename) if !filename.is_empty() => files.push(UploadedFile {
                field: field_name,
                filename,
                data,
            }),
            _ => {
                let value = String::from_utf8(data).map_err(|_| {
                    AppError::InvalidInput(format!("Field '{}' is not valid UTF-8", field_name))
                })?;
                fields.insert(field_name, value);
            }
        }
    }

    Ok((fields, files))
}

/// Verify an instrumento photo: size cap and a decodable raster format.
/// Returns the canonical file extension.
pub fn validate_foto(field: &str, data: &[u8], max_size: usize) -> AppResult<&'static str> {
    if data.is_empty() {
        return Err(validation_error(field, "arquivo de imagem vazio"));
    }
    if data.len() > max_size {
        return Err(validation_error(
            field,
            format!("imagem excede o tamanho máximo de {} bytes", max_size),
        ));
    }

    let format = image::guess_format(data)
        .map_err(|_| validation_error(field, "formato de imagem não reconhecido"))?;
    extension_for(format)
        .ok_or_else(|| validation_error(field, "formato de imagem não suportado"))
}

/// Verify a marca logo: size cap, decodable image, minimum dimensions.
/// SVG logos (from the resolution chain) skip the dimension check.
pub fn validate_logotipo(
    field: &str,
    data: &[u8],
    max_size: usize,
    min_dimension: u32,
) -> AppResult<&'static str> {
    if data.is_empty() {
        return Err(validation_error(field, "arquivo de imagem vazio"));
    }
    if data.len() > max_size {
        return Err(validation_error(
            field,
            format!("imagem excede o tamanho máximo de {} bytes", max_size),
        ));
    }

    if looks_like_svg(data) {
        return Ok("svg");
    }

    let format = image::guess_format(data)
        .map_err(|_| validation_error(field, "formato de imagem não reconhecido"))?;
    let ext = extension_for(format)
        .ok_or_else(|| validation_error(field, "formato de imagem não suportado"))?;

    let img = image::load_from_memory(data)
        .map_err(|_| validation_error(field, "não foi possível decodificar a imagem"))?;
    if img.width() < min_dimension || img.height() < min_dimension {
        return Err(validation_error(
            field,
            format!(
                "dimensões mínimas de {}x{} pixels (recebido {}x{})",
                min_dimension,
                min_dimension,
                img.width(),
                img.height()
            ),
        ));
    }

    Ok(ext)
}

fn validation_error(field: &str, message: impl Into<String>) -> AppError {
    AppError::Validation(vec![FieldError::new(field, message)])
}

/// SVG is XML text, not sniffable by the raster decoder.
pub fn looks_like_svg(data: &[u8]) -> bool {
    let head = String::from_utf8_lossy(&data[..data.len().min(512)]);
    let trimmed = head.trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with("<?xml") && head.contains("<svg"))
}

fn extension_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("png"),
        ImageFormat::Jpeg => Some("jpg"),
        ImageFormat::Gif => Some("gif"),
        ImageFormat::WebP => Some("webp"),
        ImageFormat::Ico => Some("ico"),
        ImageFormat::Bmp => Some("bmp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid 1x1 PNG.
    const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn foto_accepts_png() {
        assert_eq!(validate_foto("fotos", TINY_PNG, 5 * 1024 * 1024).unwrap(), "png");
    }

    #[test]
    fn foto_rejects_garbage() {
        let err = validate_foto("fotos", b"not an image at all", 1024).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn foto_rejects_oversize() {
        let err = validate_foto("fotos", TINY_PNG, 10).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn logo_rejects_below_minimum_dimensions() {
        // 1x1 is far below the 300x300 floor.
        let err = validate_logotipo("logotipo", TINY_PNG, 2 * 1024 * 1024, 300).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn svg_is_detected_and_skips_dimension_check() {
        let svg = b"<?xml version=\"1.0\"?><svg xmlns=\"http://www.w3.org/2000/svg\"></svg>";
        assert!(looks_like_svg(svg));
        assert_eq!(
            validate_logotipo("logotipo", svg, 2 * 1024 * 1024, 300).unwrap(),
            "svg"
        );
    }
}
