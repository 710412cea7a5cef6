//! QR generation writes a PNG that decodes back to the encoded symbol

mod common;

use easel::{Artwork, EcLevel, QrCodeArt, QrConfig};
use qrcode::QrCode;

#[test]
fn qr_file_matches_encoded_symbol() {
    let output = common::scratch("qr/form.png");
    let config = QrConfig { output: output.clone(), ..Default::default() };

    let report = easel::generate_qr(&config).expect("QR generation failed");
    assert_eq!(report.width, 1024);
    assert_eq!(report.height, 1024);
    assert!(report.bytes > 0);

    let bytes = std::fs::read(&output).expect("read QR png");
    assert_eq!(&bytes[0..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(bytes.len(), report.bytes);

    let img = image::load_from_memory(&bytes).expect("decode").to_rgba8();
    assert_eq!(img.dimensions(), (1024, 1024));

    let code = QrCode::with_error_correction_level(config.url.as_bytes(), qrcode::EcLevel::M).unwrap();
    let n = code.width();
    let scale = 1024.0 / (n + 8) as f64;
    for y in 0..n {
        for x in 0..n {
            let px = ((4.0 + x as f64 + 0.5) * scale) as u32;
            let py = ((4.0 + y as f64 + 0.5) * scale) as u32;
            let dark = img.get_pixel(px, py)[0] == 0;
            assert_eq!(dark, code[(x, y)] == qrcode::Color::Dark, "module ({}, {})", x, y);
        }
    }

    std::fs::remove_file(&output).ok();
}

#[test]
fn higher_error_correction_needs_more_modules() {
    let low = QrCodeArt::new(QrConfig { error_correction: EcLevel::L, ..Default::default() }).unwrap();
    let high = QrCodeArt::new(QrConfig { error_correction: EcLevel::H, ..Default::default() }).unwrap();
    assert!(high.modules() > low.modules());
}

#[test]
fn data_uri_wraps_the_same_png() {
    let config = QrConfig { width: 128, ..Default::default() };
    let uri = easel::qr_data_uri(&config).unwrap();
    let rendered = QrCodeArt::new(config).unwrap().render().unwrap();
    assert_eq!(uri, rendered.data_uri());
    assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
}

#[test]
fn unwritable_output_is_an_io_error() {
    let blocker = common::scratch("qr-blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let config = QrConfig { output: blocker.join("qr.png"), width: 64, ..Default::default() };

    let err = easel::generate_qr(&config).unwrap_err();
    assert!(matches!(err, easel::Error::IoError { .. }), "unexpected error: {}", err);

    std::fs::remove_file(&blocker).ok();
}
