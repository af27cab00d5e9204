use std::io::Cursor;

use super::*;

#[test]
fn decode_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8, 1, 2, 3, 255];
    let img = image::RgbaImage::from_raw(2, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let t = Template::from_bytes(&buf).unwrap();
    assert_eq!(t.native_width(), 2);
    assert_eq!(t.native_height(), 1);
    assert_eq!(
        t.rgba8_premul(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8,
            1,
            2,
            3,
            255
        ]
    );
}

#[test]
fn garbage_bytes_are_an_error() {
    assert!(matches!(
        Template::from_bytes(b"not an image"),
        Err(CertError::Other(_))
    ));
}

#[test]
fn zero_sized_templates_are_invalid_geometry() {
    assert!(matches!(
        Template::from_rgba8(0, 4, vec![]),
        Err(CertError::InvalidGeometry(_))
    ));
}

#[test]
fn length_mismatch_is_rejected() {
    assert!(matches!(
        Template::from_rgba8(2, 2, vec![0; 12]),
        Err(CertError::Validation(_))
    ));
}

#[test]
fn missing_file_reports_path() {
    let err = Template::from_path("definitely/not/here.png").unwrap_err();
    assert!(format!("{err:#}").contains("definitely/not/here.png"));
}
