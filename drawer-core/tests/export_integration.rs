//! Integration tests for PNG export of the pixel buffer.
#![cfg(feature = "png")]

use drawer_core::{CanvasSession, DrawerError, Rgb, ShapeConfig};

#[test]
fn test_export_matches_buffer() {
    let mut session = CanvasSession::raster(80, 50, Rgb::WHITE).expect("session");
    let mut bar = session
        .create_shape("bar-0", ShapeConfig::button().with_fill_color("#4CAF50"))
        .expect("create");
    bar.path_mut().expect("path").rect(10.0, 10.0, 50.0, 30.0);
    bar.draw().expect("draw");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("frame.png");
    session.save_png(&path).expect("save");

    let image = image::open(&path).expect("open").to_rgba8();
    assert_eq!(image.dimensions(), (80, 50));
    assert_eq!(image.get_pixel(30, 25).0, [76, 175, 80, 255]);
    assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[test]
fn test_export_to_missing_directory_fails() {
    let session = CanvasSession::raster(4, 4, Rgb::BLACK).expect("session");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("frame.png");
    assert!(matches!(session.save_png(&path), Err(DrawerError::Export(_))));
}
