#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use compose_board::{Bitmap, BitmapRef};

/// Encode a single-color PNG
pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> BitmapRef {
    Arc::new(Bitmap::solid(width, height, rgba).unwrap())
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {}, got {}",
        expected,
        actual
    );
}
