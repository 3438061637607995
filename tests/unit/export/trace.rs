use super::*;
use kurbo::Shape as _;

fn bitmap_from_rows(rows: &[&str]) -> Bitmap {
    let h = rows.len() as u32;
    let w = rows[0].len() as u32;
    let bits = rows
        .iter()
        .flat_map(|r| r.bytes().map(|b| b == b'#'))
        .collect();
    Bitmap::from_bits(w, h, bits).unwrap()
}

fn subpath_count(path: &BezPath) -> usize {
    path.elements()
        .iter()
        .filter(|el| matches!(el, PathEl::MoveTo(_)))
        .count()
}

#[test]
fn from_bits_rejects_wrong_length() {
    assert!(Bitmap::from_bits(3, 3, vec![false; 8]).is_err());
}

#[test]
fn threshold_respects_polarity() {
    let img = image::GrayImage::from_raw(3, 1, vec![0, 127, 200]).unwrap();
    let dark = Bitmap::from_luma(&img, 128, Polarity::Dark);
    let light = Bitmap::from_luma(&img, 128, Polarity::Light);
    assert_eq!(dark.count(), 2);
    assert_eq!(light.count(), 1);
    assert!(light.get(2, 0));
    assert!(!light.get(3, 0));
    assert!(!light.get(-1, 0));
}

#[test]
fn solid_block_traces_to_single_rectangle() {
    let bm = bitmap_from_rows(&[
        "......", //
        ".####.",
        ".####.",
        ".####.",
        "......",
    ]);
    let polys = boundary_polygons(&bm).unwrap();
    assert_eq!(polys.len(), 1);
    assert_eq!(polys[0].len(), 4);

    let opts = TraceOpts::default();
    let paths = trace_bitmap(&bm, &opts).unwrap();
    assert_eq!(paths.len(), 1);
    let bb = paths[0].bounding_box();
    assert!((bb.x0 - 1.0).abs() < 0.3 && (bb.x1 - 5.0).abs() < 0.3);
    assert!((bb.y0 - 1.0).abs() < 0.3 && (bb.y1 - 4.0).abs() < 0.3);
}

#[test]
fn outer_boundary_runs_clockwise_on_screen() {
    let bm = bitmap_from_rows(&["##", "##"]);
    let polys = boundary_polygons(&bm).unwrap();
    assert_eq!(polys.len(), 1);
    let p = &polys[0];
    // Shoelace with y down: clockwise on screen is positive.
    let area: f64 = (0..p.len())
        .map(|i| {
            let (a, b) = (p[i], p[(i + 1) % p.len()]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    assert_eq!(area / 2.0, 4.0);
}

#[test]
fn speckles_and_pinholes_are_removed() {
    let bm = bitmap_from_rows(&[
        "#.........", //
        "..........",
        "..#####...",
        "..##.##...",
        "..#####...",
        "..........",
    ]);
    let mut cleaned = bm.clone();
    cleaned.despeckle(2);
    assert!(!cleaned.get(0, 0));
    assert!(cleaned.get(4, 3));
    assert_eq!(cleaned.count(), 15);

    let paths = trace_bitmap(&bm, &TraceOpts::default()).unwrap();
    assert_eq!(paths.len(), 1);

    let keep_all = TraceOpts {
        turd_size: 0,
        ..TraceOpts::default()
    };
    assert_eq!(trace_bitmap(&bm, &keep_all).unwrap().len(), 3);
}

#[test]
fn ring_traces_outer_and_hole() {
    let bm = bitmap_from_rows(&[
        "..........", //
        ".########.",
        ".########.",
        ".##....##.",
        ".##....##.",
        ".##....##.",
        ".########.",
        ".########.",
        "..........",
    ]);
    let paths = trace_bitmap(&bm, &TraceOpts::default()).unwrap();
    assert_eq!(paths.len(), 2);
    for p in &paths {
        assert_eq!(subpath_count(p), 1);
        assert!(matches!(p.elements().last(), Some(PathEl::ClosePath)));
    }
}

#[test]
fn diagonal_neighbours_stay_separate() {
    let bm = bitmap_from_rows(&[
        "##..", //
        "##..",
        "..##",
        "..##",
    ]);
    let polys = boundary_polygons(&bm).unwrap();
    assert_eq!(polys.len(), 2);
    assert!(polys.iter().all(|p| p.len() == 4));
}

#[test]
fn empty_bitmap_yields_no_paths() {
    let bm = Bitmap::from_bits(4, 4, vec![false; 16]).unwrap();
    assert!(trace_bitmap(&bm, &TraceOpts::default()).unwrap().is_empty());
}

#[test]
fn simplify_polygon_drops_staircase_steps() {
    // A 1px staircase along a diagonal.
    let mut poly = vec![Point::new(0.0, 0.0)];
    for i in 1..=6 {
        let f = f64::from(i);
        poly.push(Point::new(f, f - 1.0));
        poly.push(Point::new(f, f));
    }
    poly.push(Point::new(0.0, 6.0));

    let straight = simplify_polygon(&poly, 0.75);
    assert!(straight.len() < poly.len());
    assert!(straight.len() >= 3);
    assert!(straight.contains(&Point::new(0.0, 0.0)));
}

#[test]
fn smoothing_keeps_sharp_corners_as_lines() {
    let square = [
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(4.0, 4.0),
        Point::new(0.0, 4.0),
    ];
    let sharp = smooth_polygon(&square, 1.2);
    assert!(
        !sharp
            .elements()
            .iter()
            .any(|el| matches!(el, PathEl::QuadTo(..)))
    );

    let round = smooth_polygon(&square, 2.0);
    let quads = round
        .elements()
        .iter()
        .filter(|el| matches!(el, PathEl::QuadTo(..)))
        .count();
    assert_eq!(quads, 4);
}
