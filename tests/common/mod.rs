#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A fresh directory under the system temp dir, unique per test and process.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("image-layout-bench-{}-{}", name, process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

pub fn write_uniform_png(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
        .save(path)
        .expect("write test png");
}

pub fn write_gradient_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 17 % 256) as u8, (y * 29 % 256) as u8, ((x + y) * 7 % 256) as u8])
    })
    .save(path)
    .expect("write test png");
}
