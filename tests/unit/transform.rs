use super::*;
use crate::foundation::core::Point;

fn blank_template(width: u32, height: u32) -> Template {
    Template::from_rgba8(width, height, vec![255; (width * height * 4) as usize]).unwrap()
}

fn style(font_size: f64) -> TextStyle {
    TextStyle {
        font_size,
        color_hex: "#112233".to_string(),
        font_family: "Serif".to_string(),
    }
}

#[test]
fn half_size_preview_doubles_everything() {
    let template = blank_template(1000, 10);
    let geometry = PreviewGeometry::unscaled(500, 5);
    let spec =
        compute_render_spec(&template, Point::new(50.0, 20.0), &geometry, &style(20.0)).unwrap();

    assert_eq!(scale_factor(1000, &geometry).unwrap(), 2.0);
    assert_eq!(
        spec,
        RenderSpec {
            font_size_native: 40,
            color_hex: "#112233".to_string(),
            font_family: "Serif".to_string(),
            center_x_native: 100.0,
            center_y_native: 40.0,
        }
    );
}

#[test]
fn uses_visual_width_not_backing_store_width() {
    let template = blank_template(1000, 10);
    // 800px backing store shown at 400 css px (2x display scaling).
    let geometry = PreviewGeometry::unscaled(800, 8).with_visual_size(400.0, 4.0);
    let spec =
        compute_render_spec(&template, Point::new(100.0, 2.0), &geometry, &style(10.0)).unwrap();
    assert_eq!(spec.center_x_native, 250.0);
    assert_eq!(spec.center_y_native, 5.0);
    assert_eq!(spec.font_size_native, 25);
}

#[test]
fn font_size_rounds_half_away_from_zero() {
    let template = blank_template(300, 10);
    let geometry = PreviewGeometry::unscaled(200, 10);
    // 15 * 1.5 = 22.5 -> 23
    let spec =
        compute_render_spec(&template, Point::new(0.0, 0.0), &geometry, &style(15.0)).unwrap();
    assert_eq!(spec.font_size_native, 23);
}

#[test]
fn degenerate_preview_is_invalid_geometry() {
    let template = blank_template(100, 10);
    let geometry = PreviewGeometry::unscaled(0, 0);
    assert!(matches!(
        compute_render_spec(&template, Point::new(1.0, 1.0), &geometry, &style(10.0)),
        Err(CertError::InvalidGeometry(_))
    ));
    assert!(matches!(
        scale_factor(0, &PreviewGeometry::unscaled(10, 10)),
        Err(CertError::InvalidGeometry(_))
    ));
}

#[test]
fn bad_style_is_rejected() {
    let template = blank_template(100, 10);
    let geometry = PreviewGeometry::unscaled(100, 10);
    let mut s = style(0.0);
    assert!(compute_render_spec(&template, Point::ORIGIN, &geometry, &s).is_err());
    s.font_size = 12.0;
    s.color_hex = "blue".to_string();
    assert!(matches!(
        compute_render_spec(&template, Point::ORIGIN, &geometry, &s),
        Err(CertError::Validation(_))
    ));
}

#[test]
fn transform_is_deterministic() {
    let template = blank_template(2480, 1754);
    let geometry = PreviewGeometry::fit(2480, 1754, 800).unwrap();
    let anchor = Point::new(412.5, 301.25);
    let a = compute_render_spec(&template, anchor, &geometry, &style(32.0)).unwrap();
    let b = compute_render_spec(&template, anchor, &geometry, &style(32.0)).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.center_x_native.to_bits(),
        b.center_x_native.to_bits(),
        "transform must be bit-for-bit repeatable"
    );
}
