use super::*;
use crate::scene::params::Shape;

#[test]
fn empty_object_is_all_defaults() {
    let cfg = SceneConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, SceneConfig::default());
    assert_eq!(cfg.theme, Theme::Light);
    assert_eq!(cfg.surface_opts(), CpuSurfaceOpts::default());
}

#[test]
fn parses_params_theme_and_surface_overrides() {
    let json = r#"{
        "params": { "grid_size": 60, "strength": 0.3, "center": [0.5, -0.25], "shape": 3 },
        "theme": "dark",
        "time": 12.5,
        "paused": true,
        "width": 320,
        "height": 200,
        "camera": { "fov_y_deg": 60.0 },
        "trace": { "turd_size": 0, "opt_curve": false }
    }"#;
    let cfg = SceneConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.params.grid_size, 60);
    assert_eq!(cfg.params.shape, Shape::Sphere);
    assert_eq!(cfg.params.center.y, -0.25);
    assert_eq!(cfg.theme, Theme::Dark);
    assert!(cfg.paused);
    assert_eq!(cfg.trace.turd_size, 0);
    assert!(!cfg.trace.opt_curve);
    assert_eq!(cfg.trace.threshold, 128);

    let opts = cfg.surface_opts();
    assert_eq!((opts.width, opts.height), (320, 200));
    assert_eq!(opts.camera.fov_y_deg, 60.0);
    assert_eq!(opts.camera.distance, 2.0);
}

#[test]
fn serialized_scene_reads_back() {
    let mut cfg = SceneConfig::default();
    cfg.params.shape = Shape::Tetrahedron;
    cfg.theme = Theme::Dark;
    cfg.width = Some(640);
    let json = cfg.to_json_pretty().unwrap();
    assert!(json.contains("\"tetrahedron\""));
    assert_eq!(SceneConfig::from_reader(json.as_bytes()).unwrap(), cfg);
}

#[test]
fn unknown_fields_and_bad_json_are_validation_errors() {
    let err = SceneConfig::from_reader(r#"{ "gird": 1 }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().starts_with("validation error: parse scene JSON"));
    assert!(SceneConfig::from_reader("{".as_bytes()).is_err());
}

#[test]
fn missing_file_is_reported_with_path() {
    let err = SceneConfig::from_path("/nonexistent/scene.json").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/scene.json"));
}
