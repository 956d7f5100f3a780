use dab_canvas::error::Error;
use dab_canvas::settings::Settings;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let s = Settings::load(dir.path().join("nope.json")).unwrap();
    assert_eq!(s, Settings::default());
}

#[test]
fn empty_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.json");
    std::fs::write(&path, "  \n").unwrap();
    assert_eq!(Settings::load(&path).unwrap(), Settings::default());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dab_canvas.json");
    let s = Settings {
        canvas_width: 2048,
        canvas_height: 2048,
        dab_diameter: 15,
        parallel_dabs: false,
        seed: Some(99),
        ..Settings::default()
    };
    s.save(&path).unwrap();
    assert_eq!(Settings::load(&path).unwrap(), s);
}

#[test]
fn loaded_values_are_validated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{ "dab_spacing": 0.0, "zoom_step": 2.0, "stroke_alpha": 40 }"#).unwrap();
    let s = Settings::load(&path).unwrap();
    assert_eq!(s.dab_spacing, 0.5);
    assert_eq!(s.zoom_step, 0.8);
    assert_eq!(s.stroke_alpha, 40);
}

#[test]
fn malformed_json_is_a_settings_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ canvas_width: ").unwrap();
    match Settings::load(&path) {
        Err(Error::Settings(msg)) => assert!(msg.contains("broken.json")),
        other => panic!("expected settings error, got {other:?}"),
    }
}

#[test]
fn unreadable_path_is_a_settings_error_not_defaults() {
    let dir = tempdir().unwrap();
    // A directory exists but can't be read as a file.
    match Settings::load(dir.path()) {
        Err(Error::Settings(_)) => {}
        other => panic!("expected settings error, got {other:?}"),
    }
}

#[test]
fn non_utf8_file_is_a_settings_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin1.json");
    std::fs::write(&path, [b'{', 0xFF, 0xFE, b'}']).unwrap();
    match Settings::load(&path) {
        Err(Error::Settings(msg)) => assert!(msg.contains("latin1.json")),
        other => panic!("expected settings error, got {other:?}"),
    }
}
