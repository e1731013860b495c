//! Runs the `image-focus` binary the way a user would.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_image-focus"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout(out: &Output) -> String {
    assert!(
        out.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout.clone()).unwrap()
}

#[test]
fn encode_then_decode() {
    let encoded = stdout(&run(&[
        "encode", "--x", "0.28", "--y", "-0.33", "--width", "2400", "--height", "1400",
        "--blurhash", "L6Pj0^i:u2T0",
    ]));
    let encoded = encoded.trim();
    assert!(!encoded.contains('='));

    let json: serde_json::Value = serde_json::from_str(&stdout(&run(&["decode", encoded]))).unwrap();
    assert_eq!(json["x"], 0.28);
    assert_eq!(json["y"], -0.33);
    assert_eq!(json["width"], 2400);
    assert_eq!(json["fit"], "cover");
    assert_eq!(json["blurhash"], "L6Pj0^i:u2T0");
}

#[test]
fn decode_rejects_other_versions() {
    // base64("[2,10,10,100,100,1,null]")
    let out = run(&["decode", "WzIsMTAsMTAsMTAwLDEwMCwxLG51bGxd"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).to_lowercase().contains("unsupported"));
}

#[test]
fn shift_prints_object_position() {
    let encoded = stdout(&run(&[
        "encode", "--x", "0.28", "--width", "2400", "--height", "1400",
    ]));
    let css = stdout(&run(&["shift", encoded.trim(), "--container", "120x120"]));
    let lines: Vec<&str> = css.lines().collect();
    assert_eq!(lines[0], "object-fit: cover;");
    assert!(lines[1].starts_with("object-position: 83.6"));
    assert!(lines[1].ends_with("% 50%;"));
}

#[test]
fn placeholder_without_hash_is_transparent_pixel() {
    let encoded = stdout(&run(&["encode", "--width", "10", "--height", "10"]));
    let uri = stdout(&run(&["placeholder", encoded.trim()]));
    assert!(uri.starts_with("data:image/gif;base64,"));
}

#[test]
fn stamp_directory() {
    let tmp = TempDir::new().unwrap();
    write_png(&tmp.path().join("a.png"), 40, 20);
    let text = stdout(&run(&["stamp", tmp.path().to_str().unwrap(), "--x", "-0.5"]));
    assert!(text.contains("(40x20)"));
    assert!(text.contains("Stamped 1 of 1 images"));
}

#[test]
fn gen_config_round_trips_through_config_dir() {
    let tmp = TempDir::new().unwrap();
    let stock = stdout(&run(&["gen-config"]));
    std::fs::write(tmp.path().join("focus.toml"), stock).unwrap();

    let encoded = stdout(&run(&[
        "encode", "--width", "100", "--height", "50", "--blurhash",
        "LEHV6nWB2yk8pyo0adR*.7kCMdnj",
    ]));
    let uri = stdout(&run(&[
        "--config",
        tmp.path().to_str().unwrap(),
        "placeholder",
        encoded.trim(),
    ]));
    assert!(uri.starts_with("data:image/jpeg;base64,"));
}

#[test]
fn invalid_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("focus.toml"), "[stamp]\ncomponents_x = 42\n").unwrap();
    let out = run(&["--config", tmp.path().to_str().unwrap(), "stamp", "missing.png"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("components_x"));
}

fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::from_fn(width, height, |x, y| image::Rgb([x as u8 * 6, y as u8 * 12, 90]))
        .save(path)
        .unwrap();
}
