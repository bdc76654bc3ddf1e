//! Layout-agnostic image kernels.
//!
//! Every kernel reads `src` and writes `dst` through [`PixelBuffer`] only.
//! Channels 0, 1 and 2 are taken as red, green and blue; both buffers must
//! have the same shape and at least 3 channels.

use std::cmp::{max, min};
use std::ops::RangeInclusive;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{PixelBuffer, PixelUnit, BLUE, GREEN, MAX_PIXEL_VALUE, RED};

pub const BLUR_RADIUS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    /// Rows are computed on the rayon pool into a per-image row buffer, then
    /// written into the destination on the calling thread. Allocating that
    /// buffer and the serial write-back both count toward the timed sweep.
    Parallel,
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Sequential
    }
}

/// All `(x, y)` of a `width × height` grid, y outer and x inner.
pub fn coords(width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
}

#[inline(always)]
fn rgb<I: PixelBuffer>(image: &I, x: usize, y: usize) -> (u32, u32, u32) {
    (
        u32::from(*image.at(x, y, RED)),
        u32::from(*image.at(x, y, GREEN)),
        u32::from(*image.at(x, y, BLUE)),
    )
}

#[inline(always)]
fn gray(value: u32) -> [PixelUnit; 3] {
    let value = value as PixelUnit;
    [value, value, value]
}

#[inline(always)]
fn store<I: PixelBuffer>(dst: &mut I, x: usize, y: usize, pixel: [PixelUnit; 3]) {
    *dst.at_mut(x, y, RED) = pixel[0];
    *dst.at_mut(x, y, GREEN) = pixel[1];
    *dst.at_mut(x, y, BLUE) = pixel[2];
}

/// Writes `pixel(src, x, y)` into `dst` at every coordinate where it is `Some`.
///
/// `pixel` may only read `src`, so iterations are independent and `Parallel`
/// gives the same result as `Sequential`.
pub fn for_each_pixel<I, F>(src: &I, dst: &mut I, mode: ExecutionMode, pixel: F)
where
    I: PixelBuffer,
    F: Fn(&I, usize, usize) -> Option<[PixelUnit; 3]> + Sync,
{
    assert!(src.same_shape(&*dst), "source and destination shapes differ");
    assert!(src.channels() >= 3, "kernels need at least 3 channels");
    let (width, height) = (src.width(), src.height());

    match mode {
        ExecutionMode::Sequential => {
            for (x, y) in coords(width, height) {
                if let Some(value) = pixel(src, x, y) {
                    store(dst, x, y, value);
                }
            }
        }
        #[cfg(feature = "parallel")]
        ExecutionMode::Parallel => {
            let rows: Vec<Vec<Option<[PixelUnit; 3]>>> = (0..height)
                .into_par_iter()
                .map(|y| (0..width).map(|x| pixel(src, x, y)).collect())
                .collect();
            for (y, row) in rows.into_iter().enumerate() {
                for (x, value) in row.into_iter().enumerate() {
                    if let Some(value) = value {
                        store(dst, x, y, value);
                    }
                }
            }
        }
        #[cfg(not(feature = "parallel"))]
        ExecutionMode::Parallel => for_each_pixel(src, dst, ExecutionMode::Sequential, pixel),
    }
}

pub fn average(r: u32, g: u32, b: u32) -> u32 {
    (r + g + b) / 3
}

pub fn luma_of(r: u32, g: u32, b: u32) -> u32 {
    (r * 30 + g * 59 + b * 11) / 100
}

pub fn desaturate(r: u32, g: u32, b: u32) -> u32 {
    (max_of(r, g, b) + min_of(r, g, b)) / 2
}

pub fn max_of(r: u32, g: u32, b: u32) -> u32 {
    max(max(r, g), b)
}

pub fn min_of(r: u32, g: u32, b: u32) -> u32 {
    min(min(r, g), b)
}

fn grayscale<I, F>(src: &I, dst: &mut I, mode: ExecutionMode, formula: F)
where
    I: PixelBuffer,
    F: Fn(u32, u32, u32) -> u32 + Sync,
{
    for_each_pixel(src, dst, mode, |image, x, y| {
        let (r, g, b) = rgb(image, x, y);
        Some(gray(formula(r, g, b)))
    });
}

pub fn averaging<I: PixelBuffer>(src: &I, dst: &mut I, mode: ExecutionMode) {
    grayscale(src, dst, mode, average);
}

pub fn luma<I: PixelBuffer>(src: &I, dst: &mut I, mode: ExecutionMode) {
    grayscale(src, dst, mode, luma_of);
}

pub fn desaturation<I: PixelBuffer>(src: &I, dst: &mut I, mode: ExecutionMode) {
    grayscale(src, dst, mode, desaturate);
}

pub fn decomposition_max<I: PixelBuffer>(src: &I, dst: &mut I, mode: ExecutionMode) {
    grayscale(src, dst, mode, max_of);
}

pub fn decomposition_min<I: PixelBuffer>(src: &I, dst: &mut I, mode: ExecutionMode) {
    grayscale(src, dst, mode, min_of);
}

/// The 5×5 window around `(x, y)` clipped to the image, as x and y ranges.
pub fn blur_window(
    width: usize,
    height: usize,
    x: usize,
    y: usize,
) -> (RangeInclusive<usize>, RangeInclusive<usize>) {
    let xs = x.saturating_sub(BLUR_RADIUS)..=min(x + BLUR_RADIUS, width - 1);
    let ys = y.saturating_sub(BLUR_RADIUS)..=min(y + BLUR_RADIUS, height - 1);
    (xs, ys)
}

/// Box blur of channels 0-2 over the clipped 5×5 window.
pub fn blur<I: PixelBuffer>(src: &I, dst: &mut I, mode: ExecutionMode) {
    for_each_pixel(src, dst, mode, |image, x, y| {
        let (xs, ys) = blur_window(image.width(), image.height(), x, y);
        let mut sum = [0u32; 3];
        let mut cells = 0;
        for wy in ys {
            for wx in xs.clone() {
                for (c, total) in sum.iter_mut().enumerate() {
                    *total += u32::from(*image.at(wx, wy, c));
                }
                cells += 1;
            }
        }
        Some([
            (sum[0] / cells) as PixelUnit,
            (sum[1] / cells) as PixelUnit,
            (sum[2] / cells) as PixelUnit,
        ])
    });
}

fn is_border(width: usize, height: usize, x: usize, y: usize) -> bool {
    x == 0 || y == 0 || x + 1 >= width || y + 1 >= height
}

/// Sobel gradients of channel `c` at interior pixel `(x, y)`, as `(gx, gy)`.
#[inline(always)]
fn gradient<I: PixelBuffer>(image: &I, x: usize, y: usize, c: usize) -> (i32, i32) {
    let p = |x: usize, y: usize| i32::from(*image.at(x, y, c));
    let gx = (p(x - 1, y - 1) + 2 * p(x, y - 1) + p(x + 1, y - 1))
        - (p(x - 1, y + 1) + 2 * p(x, y + 1) + p(x + 1, y + 1));
    let gy = (p(x - 1, y - 1) + 2 * p(x - 1, y) + p(x - 1, y + 1))
        - (p(x + 1, y - 1) + 2 * p(x + 1, y) + p(x + 1, y + 1));
    (gx, gy)
}

#[inline(always)]
fn squared_magnitude(gx: i32, gy: i32) -> u32 {
    (gx * gx + gy * gy) as u32
}

/// Largest gradient magnitude a pixel can reach for `max_pixel_value`.
pub fn max_gradient_magnitude(max_pixel_value: u32) -> f64 {
    let m = f64::from(max_pixel_value);
    ((4.0 * m).powi(2) + (2.0 * m).powi(2)).sqrt()
}

fn sobel_with<I, F>(src: &I, dst: &mut I, mode: ExecutionMode, scale: F)
where
    I: PixelBuffer,
    F: Fn(u32) -> PixelUnit + Sync,
{
    for_each_pixel(src, dst, mode, |image, x, y| {
        if is_border(image.width(), image.height(), x, y) {
            return None;
        }
        let mut out = [0; 3];
        for (c, value) in out.iter_mut().enumerate() {
            let (gx, gy) = gradient(image, x, y, c);
            *value = scale(squared_magnitude(gx, gy));
        }
        Some(out)
    });
}

/// Per-channel Sobel edge magnitude, scaled to the pixel range.
/// Border pixels of `dst` are left untouched.
pub fn sobel<I: PixelBuffer>(src: &I, dst: &mut I, mode: ExecutionMode) {
    let max_value = f64::from(MAX_PIXEL_VALUE);
    let max_div = max_gradient_magnitude(MAX_PIXEL_VALUE);
    sobel_with(src, dst, mode, |g2| {
        (max_value * f64::from(g2).sqrt() / max_div) as PixelUnit
    });
}

/// Same as [`sobel`] but maps the squared magnitude through a [`SobelTable`]
/// instead of taking a square root.
pub fn sobel_lookup<I: PixelBuffer>(src: &I, dst: &mut I, mode: ExecutionMode) {
    let table = SobelTable::new(MAX_PIXEL_VALUE);
    sobel_with(src, dst, mode, |g2| table.lookup(g2));
}

/// Squared gradient thresholds: output `a` covers `table[a-1] <= g2 < table[a]`.
#[derive(Debug, Clone)]
pub struct SobelTable {
    thresholds: Vec<u32>,
}

impl SobelTable {
    pub fn new(max_pixel_value: u32) -> Self {
        assert_eq!(
            max_pixel_value, 255,
            "sobel lookup table requires a max pixel value of 255"
        );
        let max_div = max_gradient_magnitude(max_pixel_value);
        let step = max_div / f64::from(max_pixel_value);
        let thresholds = (0..max_pixel_value)
            .map(|i| (f64::from(i + 1) * step).powi(2).round() as u32)
            .collect();
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &[u32] {
        &self.thresholds
    }

    /// Smallest index whose threshold exceeds `g2`.
    #[inline(always)]
    pub fn lookup(&self, g2: u32) -> PixelUnit {
        let index = self.thresholds.partition_point(|&t| t <= g2);
        min(index, PixelUnit::max_value() as usize) as PixelUnit
    }
}
