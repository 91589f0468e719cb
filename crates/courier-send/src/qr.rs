//! QR code image responses.
//!
//! Rendering is three steps, each exposed for reuse:
//!
//! 1. [`encode_symbol`] builds the QR symbol at the requested level and mode
//! 2. [`rasterize`] scales it, plus a quiet zone, onto a white canvas
//! 3. [`encode_png`] produces the PNG bytes

use crate::{echo_error, fail, is_error_status, respond, take_body, ResponseWriter, IMAGE_PNG};
use courier_core::{Body, EncodingMode, ErrorCorrectionLevel, QrSpec, Response, SendError, SendResult};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder, Luma};
use qrcode::bits::Bits;
use qrcode::types::QrResult;
use qrcode::{Color, EcLevel, QrCode, Version};

/// Light modules required around the symbol for reliable scanning.
pub const QUIET_ZONE: u32 = 4;

/// Largest canvas [`rasterize`] will allocate: 4096 x 4096 pixels.
pub const MAX_CANVAS_PIXELS: u64 = 4096 * 4096;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Writes a [`Body::Qr`] as a PNG image.
///
/// Error statuses echo the [`Body::Error`] message as plain text with the
/// response's own status and report [`SendError::Client`].
pub fn send_qr_code(response: Response, writer: &mut dyn ResponseWriter) -> SendResult {
    let (status, body) = take_body(response, writer)?;

    if is_error_status(status) {
        return match body {
            Body::Error(err) => echo_error(writer, status, err),
            other => Err(fail(writer, SendError::mismatch("an error", &other))),
        };
    }

    let spec = match body {
        Body::Qr(spec) => spec,
        other => return Err(fail(writer, SendError::mismatch("a QR code", &other))),
    };

    match render_png(&spec) {
        Ok(png) => respond(writer, status, IMAGE_PNG, &png),
        Err(err) => Err(fail(writer, err)),
    }
}

/// Renders `spec` to PNG bytes.
pub fn render_png(spec: &QrSpec) -> Result<Vec<u8>, SendError> {
    let code = encode_symbol(spec)?;
    let image = rasterize(&code, spec.width, spec.height)?;
    encode_png(&image)
}

/// Encodes the content of `spec` into a QR symbol.
///
/// Explicit modes reject characters they cannot represent. Empty content
/// is rejected in every mode.
pub fn encode_symbol(spec: &QrSpec) -> Result<QrCode, SendError> {
    if spec.content.is_empty() {
        return Err(SendError::Encoding("content is empty".to_string()));
    }

    let level = ec_level(spec.level);
    let data = spec.content.as_bytes();

    match spec.mode {
        EncodingMode::Auto => {
            QrCode::with_error_correction_level(data, level).map_err(|e| encoding_error(&e))
        }
        EncodingMode::Numeric => {
            if !data.iter().all(u8::is_ascii_digit) {
                return Err(SendError::Encoding(
                    "numeric mode accepts digits only".to_string(),
                ));
            }
            encode_with(data, level, Bits::push_numeric_data)
        }
        EncodingMode::Alphanumeric => {
            if !data.iter().all(|b| is_alphanumeric(*b)) {
                return Err(SendError::Encoding(
                    "alphanumeric mode accepts 0-9, A-Z, space and $%*+-./: only".to_string(),
                ));
            }
            encode_with(data, level, Bits::push_alphanumeric_data)
        }
        EncodingMode::Unicode => encode_with(data, level, Bits::push_byte_data),
    }
}

/// Scales `code` to exactly `width` x `height` pixels.
///
/// The symbol and its quiet zone are scaled by the largest integer factor
/// that fits both dimensions and centred; the margin stays white.
///
/// Each side must hold at least the symbol plus two quiet zones, one pixel
/// per module: 29 pixels for a version 1 symbol (21 modules), growing by 4
/// per version. Canvases above [`MAX_CANVAS_PIXELS`] are rejected before
/// anything is allocated.
pub fn rasterize(code: &QrCode, width: u32, height: u32) -> Result<GrayImage, SendError> {
    if u64::from(width) * u64::from(height) > MAX_CANVAS_PIXELS {
        return Err(SendError::Scaling(format!(
            "{width}x{height} exceeds the {MAX_CANVAS_PIXELS} pixel limit"
        )));
    }
    let symbol = u32::try_from(code.width())
        .map_err(|_| SendError::Scaling("symbol too large".to_string()))?;
    let modules = symbol + 2 * QUIET_ZONE;
    let factor = (width / modules).min(height / modules);
    if factor == 0 {
        return Err(SendError::Scaling(format!(
            "{width}x{height} is smaller than the {modules}x{modules} symbol"
        )));
    }

    let colors = code.to_colors();
    let offset_x = (width - modules * factor) / 2;
    let offset_y = (height - modules * factor) / 2;
    let quiet = QUIET_ZONE..QUIET_ZONE + symbol;

    Ok(GrayImage::from_fn(width, height, |x, y| {
        if x < offset_x || y < offset_y {
            return LIGHT;
        }
        let mx = (x - offset_x) / factor;
        let my = (y - offset_y) / factor;
        if !quiet.contains(&mx) || !quiet.contains(&my) {
            return LIGHT;
        }
        let index = ((my - QUIET_ZONE) * symbol + (mx - QUIET_ZONE)) as usize;
        match colors[index] {
            Color::Dark => DARK,
            Color::Light => LIGHT,
        }
    }))
}

/// Encodes a greyscale image as PNG.
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>, SendError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::L8,
        )
        .map_err(|e| SendError::Encoding(e.to_string()))?;
    Ok(png)
}

/// Tries every version from smallest up until the data fits.
fn encode_with(
    data: &[u8],
    level: EcLevel,
    push: fn(&mut Bits, &[u8]) -> QrResult<()>,
) -> Result<QrCode, SendError> {
    for version in 1..=40 {
        let mut bits = Bits::new(Version::Normal(version));
        if push(&mut bits, data).is_err() || bits.push_terminator(level).is_err() {
            continue;
        }
        return QrCode::with_bits(bits, level).map_err(|e| encoding_error(&e));
    }
    Err(SendError::Encoding("data too long".to_string()))
}

const fn is_alphanumeric(byte: u8) -> bool {
    matches!(
        byte,
        b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':'
    )
}

const fn ec_level(level: ErrorCorrectionLevel) -> EcLevel {
    match level {
        ErrorCorrectionLevel::L => EcLevel::L,
        ErrorCorrectionLevel::M => EcLevel::M,
        ErrorCorrectionLevel::Q => EcLevel::Q,
        ErrorCorrectionLevel::H => EcLevel::H,
    }
}

fn encoding_error(err: &qrcode::types::QrError) -> SendError {
    SendError::Encoding(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BufferedWriter;
    use http::header::CONTENT_TYPE;
    use http::StatusCode;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_png_response() {
        let mut writer = BufferedWriter::new();
        send_qr_code(Response::qr(QrSpec::new("hello")), &mut writer).unwrap();

        assert_eq!(writer.status(), Some(StatusCode::OK));
        assert_eq!(writer.headers()[CONTENT_TYPE], "image/png");
        assert!(writer.body().starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_exact_dimensions() {
        let spec = QrSpec::new("hello").with_size(300, 200);
        let code = encode_symbol(&spec).unwrap();
        let image = rasterize(&code, spec.width, spec.height).unwrap();
        assert_eq!(image.dimensions(), (300, 200));
    }

    #[test]
    fn test_margin_and_quiet_zone_are_white() {
        let code = encode_symbol(&QrSpec::new("hello")).unwrap();
        let image = rasterize(&code, 300, 300).unwrap();
        assert_eq!(image.get_pixel(0, 0), &LIGHT);
        assert_eq!(image.get_pixel(299, 299), &LIGHT);
        assert!(image.pixels().any(|p| *p == DARK));
    }

    #[test]
    fn test_zero_width_is_scaling_error() {
        let mut writer = BufferedWriter::new();
        let spec = QrSpec::new("hello").with_size(0, 300);
        let failure = send_qr_code(Response::qr(spec), &mut writer).unwrap_err();

        assert!(matches!(failure.error(), SendError::Scaling(_)));
        assert!(failure.has_responded());
        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_huge_canvas_is_scaling_error() {
        let mut writer = BufferedWriter::new();
        let spec = QrSpec::new("hello").with_size(u32::MAX, u32::MAX);
        let failure = send_qr_code(Response::qr(spec), &mut writer).unwrap_err();

        assert!(matches!(failure.error(), SendError::Scaling(_)));
        assert!(failure.has_responded());
        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));

        let code = encode_symbol(&QrSpec::new("hello")).unwrap();
        assert!(matches!(
            rasterize(&code, 100_000, 100_000),
            Err(SendError::Scaling(_))
        ));
        assert!(rasterize(&code, 4096, 4096).is_ok());
    }

    #[test]
    fn test_minimum_canvas_for_version_one() {
        let code = encode_symbol(&QrSpec::new("1")).unwrap();
        assert_eq!(code.width(), 21);
        assert!(rasterize(&code, 29, 29).is_ok());
        assert!(matches!(rasterize(&code, 28, 29), Err(SendError::Scaling(_))));
    }

    #[test]
    fn test_too_small_is_scaling_error() {
        let code = encode_symbol(&QrSpec::new("hello")).unwrap();
        assert!(matches!(rasterize(&code, 20, 20), Err(SendError::Scaling(_))));
    }

    #[test]
    fn test_empty_content_is_encoding_error() {
        let Err(err) = encode_symbol(&QrSpec::new("")) else {
            panic!("called `Result::unwrap_err()` on an `Ok` value");
        };
        assert!(matches!(err, SendError::Encoding(_)));
    }

    #[test]
    fn test_numeric_mode_rejects_letters() {
        let spec = QrSpec::new("12a4").with_mode(EncodingMode::Numeric);
        assert!(matches!(encode_symbol(&spec), Err(SendError::Encoding(_))));

        let spec = QrSpec::new("1234").with_mode(EncodingMode::Numeric);
        assert!(encode_symbol(&spec).is_ok());
    }

    #[test]
    fn test_alphanumeric_mode_rejects_lowercase() {
        let spec = QrSpec::new("hello").with_mode(EncodingMode::Alphanumeric);
        assert!(matches!(encode_symbol(&spec), Err(SendError::Encoding(_))));

        let spec = QrSpec::new("HELLO WORLD").with_mode(EncodingMode::Alphanumeric);
        assert!(encode_symbol(&spec).is_ok());
    }

    #[test]
    fn test_unicode_mode() {
        let spec = QrSpec::new("grüße").with_mode(EncodingMode::Unicode);
        assert!(encode_symbol(&spec).is_ok());
    }

    #[test]
    fn test_data_too_long() {
        let spec = QrSpec::new("x".repeat(4000)).with_level(ErrorCorrectionLevel::H);
        assert!(matches!(encode_symbol(&spec), Err(SendError::Encoding(_))));

        let spec = spec.with_mode(EncodingMode::Unicode);
        assert!(matches!(encode_symbol(&spec), Err(SendError::Encoding(_))));
    }

    #[test]
    fn test_higher_level_grows_symbol() {
        let low = encode_symbol(&QrSpec::new("hello world")).unwrap();
        let high = encode_symbol(
            &QrSpec::new("hello world").with_level(ErrorCorrectionLevel::H),
        )
        .unwrap();
        assert!(high.width() >= low.width());
    }

    #[test]
    fn test_error_status_echoes_message() {
        let mut writer = BufferedWriter::new();
        let failure = send_qr_code(Response::error(StatusCode::BAD_REQUEST, "bad size"), &mut writer)
            .unwrap_err();

        assert!(failure.has_responded());
        assert!(matches!(failure.error(), SendError::Client(m) if m == "bad size"));
        assert_eq!(writer.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(writer.body(), b"bad size\n");
    }

    #[test]
    fn test_bytes_body_is_mismatch() {
        let mut writer = BufferedWriter::new();
        let failure = send_qr_code(Response::bytes("x"), &mut writer).unwrap_err();
        assert!(matches!(failure.error(), SendError::BodyTypeMismatch { .. }));
    }
}
