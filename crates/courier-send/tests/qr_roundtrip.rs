//! Generated QR images must decode back to their content.

use courier_core::{EncodingMode, ErrorCorrectionLevel, QrSpec, Response};
use courier_send::{send_qr_code, BufferedWriter};
use http::StatusCode;

fn decode_png(png: &[u8]) -> String {
    let image = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .expect("valid png")
        .to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        image.width() as usize,
        image.height() as usize,
        |x, y| image.get_pixel(x as u32, y as u32)[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one symbol");
    let (_meta, content) = grids[0].decode().expect("decodable symbol");
    content
}

fn send(spec: QrSpec) -> (StatusCode, Vec<u8>) {
    let mut writer = BufferedWriter::new();
    send_qr_code(Response::qr(spec), &mut writer).expect("qr sent");
    (writer.status().expect("status written"), writer.body().to_vec())
}

#[test]
fn test_hello_decodes() {
    let (status, png) = send(QrSpec::new("hello").with_size(300, 300));
    assert_eq!(status, StatusCode::OK);

    let image = image::load_from_memory(&png).unwrap();
    assert_eq!((image.width(), image.height()), (300, 300));
    assert_eq!(decode_png(&png), "hello");
}

#[test]
fn test_url_at_high_level_decodes() {
    let content = "https://example.com/orders/8812?ref=qr";
    let spec = QrSpec::new(content)
        .with_size(400, 400)
        .with_level(ErrorCorrectionLevel::H);
    let (_, png) = send(spec);
    assert_eq!(decode_png(&png), content);
}

#[test]
fn test_numeric_mode_decodes() {
    let spec = QrSpec::new("0123456789")
        .with_mode(EncodingMode::Numeric)
        .with_level(ErrorCorrectionLevel::M);
    let (_, png) = send(spec);
    assert_eq!(decode_png(&png), "0123456789");
}

#[test]
fn test_non_square_canvas_decodes() {
    let (_, png) = send(QrSpec::new("wide").with_size(500, 250));
    let image = image::load_from_memory(&png).unwrap();
    assert_eq!((image.width(), image.height()), (500, 250));
    assert_eq!(decode_png(&png), "wide");
}
