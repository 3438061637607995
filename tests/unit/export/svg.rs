use super::*;

fn triangle() -> BezPath {
    let mut p = BezPath::new();
    p.move_to((1.0, 1.0));
    p.line_to((9.5, 1.0));
    p.quad_to((9.5, 4.25), (5.0, 8.0));
    p.close_path();
    p
}

#[test]
fn numbers_are_compact() {
    assert_eq!(num(3.0), "3");
    assert_eq!(num(0.25), "0.25");
    assert_eq!(num(-0.0001), "0");
    assert_eq!(num(1.23456), "1.235");
    assert_eq!(num(-2.5), "-2.5");
}

#[test]
fn path_data_uses_absolute_commands() {
    let doc = VectorDocument {
        width: 10,
        height: 10,
        paths: vec![triangle()],
        fill: Rgba8::opaque(255, 255, 255),
    };
    assert_eq!(doc.path_data(), "M 1 1 L 9.5 1 Q 9.5 4.25 5 8 Z");
}

#[test]
fn document_declares_canvas_fill_and_rule() {
    let doc = VectorDocument {
        width: 64,
        height: 48,
        paths: vec![triangle(), triangle()],
        fill: Rgba8::opaque(0, 0, 0),
    };
    let svg = doc.to_svg_string();
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(svg.contains("viewBox=\"0 0 64 48\""));
    assert!(svg.contains("fill=\"#000000\""));
    assert!(svg.contains("fill-rule=\"evenodd\""));
    assert_eq!(svg.matches("M ").count(), 2);
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(doc.contour_count(), 2);
}

#[test]
fn empty_document_has_no_path_element() {
    let doc = VectorDocument {
        width: 4,
        height: 4,
        paths: Vec::new(),
        fill: Rgba8::opaque(0, 0, 0),
    };
    assert!(!doc.to_svg_string().contains("<path"));
}

#[test]
fn straight_curves_are_written_as_lines() {
    let mut p = BezPath::new();
    p.move_to((32.0, 0.0));
    p.curve_to((32.0, 0.0), (32.0, 0.0), (32.0, 8.0));
    p.curve_to((32.0, 10.0), (32.0, 12.0), (32.0, 16.0));
    p.quad_to((28.0, 16.0), (24.0, 16.0));
    p.curve_to((20.0, 16.0), (20.0, 12.0), (24.0, 8.0));
    p.quad_to((26.0, 2.0), (32.0, 0.0));
    p.close_path();
    let doc = VectorDocument {
        width: 40,
        height: 20,
        paths: vec![p],
        fill: Rgba8::opaque(0, 0, 0),
    };
    assert_eq!(
        doc.path_data(),
        "M 32 0 L 32 8 L 32 16 L 24 16 C 20 16 20 12 24 8 Q 26 2 32 0 Z"
    );
}

#[test]
fn collinear_controls_outside_the_chord_stay_curves() {
    assert!(is_straight(
        Point::new(0.0, 0.0),
        &[Point::new(2.0, 0.0)],
        Point::new(4.0, 0.0)
    ));
    assert!(!is_straight(
        Point::new(0.0, 0.0),
        &[Point::new(6.0, 0.0)],
        Point::new(4.0, 0.0)
    ));
    assert!(!is_straight(
        Point::new(1.0, 1.0),
        &[Point::new(1.0, 3.0)],
        Point::new(1.0, 1.0)
    ));
    assert!(is_straight(
        Point::new(1.0, 1.0),
        &[Point::new(1.0, 1.0), Point::new(1.0, 1.0)],
        Point::new(1.0, 1.0)
    ));
}
