//! Document preparation: file bytes → base64 payload for the API request.
//!
//! PDFs go through untouched. Images are decoded, scaled down so the
//! longest edge is at most `max_image_dimension`, and re-encoded as JPEG;
//! phone photos of a resume are routinely 4000 px and 5+ MB, which buys no
//! extra OCR accuracy and only inflates the request body.

use crate::config::AnalyzerConfig;
use crate::error::ResumeLensError;
use crate::pipeline::{DocumentFile, DocumentKind, PreparedDocument};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::debug;

/// Turn a user-selected file into a transport-ready payload.
///
/// Image decoding is CPU-bound and runs inside `spawn_blocking`; the decoded
/// pixels and the intermediate JPEG buffer never leave that closure, so they
/// are freed before this function returns on every path.
///
/// # Errors
/// [`ResumeLensError::DocumentUnreadable`], [`ResumeLensError::EmptyDocument`]
/// or [`ResumeLensError::ImageDecode`]; all classify as `DocumentRead`.
pub async fn prepare(
    file: DocumentFile,
    config: &AnalyzerConfig,
) -> Result<PreparedDocument, ResumeLensError> {
    let mime_type = file.mime_type.clone();
    let kind = DocumentKind::from_mime(&mime_type);
    let bytes = file.read().await?;

    match kind {
        DocumentKind::Document => {
            let payload = STANDARD.encode(&bytes);
            debug!(
                "Encoded {} ({} bytes) → {} bytes base64",
                mime_type,
                bytes.len(),
                payload.len()
            );
            Ok(PreparedDocument {
                payload,
                mime_type,
                kind,
                dimensions: None,
            })
        }
        DocumentKind::Image => {
            let max_dim = config.max_image_dimension;
            let quality = config.jpeg_quality;
            let declared = mime_type.clone();

            let (payload, dimensions) = tokio::task::spawn_blocking(move || {
                reencode_image(&bytes, &declared, max_dim, quality)
            })
            .await
            .map_err(|e| ResumeLensError::Internal(format!("Image task panicked: {}", e)))??;

            Ok(PreparedDocument {
                payload,
                mime_type: "image/jpeg".to_string(),
                kind,
                dimensions: Some(dimensions),
            })
        }
    }
}

/// Bounding-box resize: scale so the longer edge equals `max`, preserving
/// aspect ratio. Dimensions already within bounds are returned unchanged.
///
/// The shorter edge is rounded to the nearest pixel and never drops to 0.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }

    let scale = |short: u32, long: u32| -> u32 {
        let scaled = (short as u64 * max as u64 + long as u64 / 2) / long as u64;
        scaled.max(1) as u32
    };

    if width > height {
        (max, scale(height, width))
    } else {
        (scale(width, height), max)
    }
}

/// Blocking half of [`prepare`] for images.
fn reencode_image(
    bytes: &[u8],
    mime_type: &str,
    max_dim: u32,
    quality: u8,
) -> Result<(String, (u32, u32)), ResumeLensError> {
    let decode_err = |detail: String| ResumeLensError::ImageDecode {
        mime_type: mime_type.to_string(),
        detail,
    };

    let img = image::load_from_memory(bytes).map_err(|e| decode_err(e.to_string()))?;
    let (width, height) = (img.width(), img.height());
    let (target_w, target_h) = fit_within(width, height, max_dim);

    let img = if (target_w, target_h) != (width, height) {
        debug!("Downscaling {}x{} → {}x{}", width, height, target_w, target_h);
        img.resize_exact(target_w, target_h, FilterType::Triangle)
    } else {
        img
    };

    // JPEG has no alpha channel.
    let rgb = img.to_rgb8();
    let mut jpeg = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, quality))
        .map_err(|e| decode_err(format!("JPEG encoding failed: {}", e)))?;

    let payload = STANDARD.encode(&jpeg);
    debug!(
        "Encoded image {} bytes → {} bytes JPEG → {} bytes base64",
        bytes.len(),
        jpeg.len(),
        payload.len()
    );

    Ok((payload, (target_w, target_h)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .expect("png encode");
        buf
    }

    fn solid_png(width: u32, height: u32) -> Vec<u8> {
        png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            Rgb([240, 240, 240]),
        )))
    }

    fn decode_payload(payload: &str) -> DynamicImage {
        let bytes = STANDARD.decode(payload).expect("valid base64");
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        image::load_from_memory(&bytes).expect("decodable jpeg")
    }

    #[test]
    fn fit_within_bounds_unchanged() {
        assert_eq!(fit_within(800, 600, 1500), (800, 600));
        assert_eq!(fit_within(1500, 1500, 1500), (1500, 1500));
    }

    #[test]
    fn fit_within_landscape() {
        assert_eq!(fit_within(3000, 1200, 1500), (1500, 600));
        assert_eq!(fit_within(4032, 3024, 1500), (1500, 1125));
    }

    #[test]
    fn fit_within_portrait_and_square() {
        assert_eq!(fit_within(1240, 1754, 1500), (1060, 1500));
        assert_eq!(fit_within(2000, 2000, 1500), (1500, 1500));
    }

    #[test]
    fn fit_within_extreme_aspect_never_zero() {
        assert_eq!(fit_within(100_000, 10, 1500), (1500, 1));
    }

    #[test]
    fn fit_within_preserves_aspect() {
        for (w, h) in [(1501, 1000), (5000, 1234), (999, 4321), (2480, 3508)] {
            let (nw, nh) = fit_within(w, h, 1500);
            assert_eq!(nw.max(nh), 1500);
            let before = w as f64 / h as f64;
            let after = nw as f64 / nh as f64;
            let tolerance = 1.0 / nw.min(nh) as f64 * before.max(1.0);
            assert!((before - after).abs() <= tolerance, "{w}x{h} → {nw}x{nh}");
        }
    }

    #[tokio::test]
    async fn large_image_downscaled_to_jpeg() {
        let file = DocumentFile::from_bytes(solid_png(3000, 1200), "image/png");
        let prepared = prepare(file, &AnalyzerConfig::default()).await.unwrap();

        assert_eq!(prepared.mime_type, "image/jpeg");
        assert_eq!(prepared.kind, DocumentKind::Image);
        assert_eq!(prepared.dimensions, Some((1500, 600)));
        assert!(!prepared.payload.starts_with("data:"));

        let img = decode_payload(&prepared.payload);
        assert_eq!((img.width(), img.height()), (1500, 600));
    }

    #[tokio::test]
    async fn small_image_keeps_dimensions() {
        let file = DocumentFile::from_bytes(solid_png(640, 480), "image/png");
        let prepared = prepare(file, &AnalyzerConfig::default()).await.unwrap();

        assert_eq!(prepared.dimensions, Some((640, 480)));
        let img = decode_payload(&prepared.payload);
        assert_eq!((img.width(), img.height()), (640, 480));
    }

    #[tokio::test]
    async fn transparent_png_flattened() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 30, Rgba([0, 0, 0, 0])));
        let file = DocumentFile::from_bytes(png_bytes(rgba), "image/png");
        let prepared = prepare(file, &AnalyzerConfig::default()).await.unwrap();
        assert_eq!(prepared.mime_type, "image/jpeg");
        decode_payload(&prepared.payload);
    }

    #[tokio::test]
    async fn custom_max_dimension() {
        let config = AnalyzerConfig::builder().max_image_dimension(100).build().unwrap();
        let file = DocumentFile::from_bytes(solid_png(300, 600), "image/png");
        let prepared = prepare(file, &config).await.unwrap();
        assert_eq!(prepared.dimensions, Some((50, 100)));
    }

    #[tokio::test]
    async fn pdf_passed_through_verbatim() {
        let bytes = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n".to_vec();
        let file = DocumentFile::from_bytes(bytes.clone(), "application/pdf");
        let prepared = prepare(file, &AnalyzerConfig::default()).await.unwrap();

        assert_eq!(prepared.mime_type, "application/pdf");
        assert_eq!(prepared.kind, DocumentKind::Document);
        assert_eq!(prepared.dimensions, None);
        assert!(!prepared.payload.starts_with("data:"));
        assert_eq!(STANDARD.decode(&prepared.payload).unwrap(), bytes);
    }

    #[tokio::test]
    async fn corrupt_image_is_document_read_error() {
        let file = DocumentFile::from_bytes(b"definitely not a png".to_vec(), "image/png");
        let err = prepare(file, &AnalyzerConfig::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DocumentRead);
        assert!(err.to_string().contains("image/png"), "got: {err}");
    }
}
