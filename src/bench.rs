//! One benchmark per buffer layout, behind a common trait object.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use image3d::{orders, sweep, AlgorithmSet, ExecutionMode, Image3D, MemBlock, PixelBuffer, Pointers};

use crate::codec::ImageFile;
use crate::errors::*;
use crate::profiler::BenchClock;

/// What every sweep of a run shares.
#[derive(Debug, Clone, Copy)]
pub struct SweepOptions<'a> {
    pub algorithms: &'a AlgorithmSet,
    pub mode: ExecutionMode,
    pub force_channels: bool,
}

/// Timing of one sweep over one image under one layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub descriptor: String,
    pub file: PathBuf,
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub elapsed_micros: u64,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, {}",
            self.descriptor,
            self.file.display(),
            self.width,
            self.height,
            self.channels,
            self.elapsed_micros
        )
    }
}

pub trait ImagingBenchmark: Send + Sync {
    fn descriptor(&self) -> String;

    /// Loads `file`, then times one sweep of the enabled algorithms into a
    /// destination of the same shape. Loading is not timed. The destination
    /// is written to `save_to` afterwards, if given.
    fn benchmark(
        &self,
        file: &Path,
        save_to: Option<&Path>,
        options: &SweepOptions<'_>,
    ) -> Result<Measurement>;

    /// Times one sweep over a zero-filled `width × height × channels` buffer.
    fn synthetic(&self, extents: [usize; 3], options: &SweepOptions<'_>) -> u64;
}

pub struct ImagingAlgorithms<I> {
    _image: PhantomData<fn() -> I>,
}

impl<I: PixelBuffer> ImagingAlgorithms<I> {
    pub fn new() -> Self {
        Self {
            _image: PhantomData,
        }
    }

    fn timed_sweep(src: &I, options: &SweepOptions<'_>) -> (I, u64) {
        let mut dst = I::new(src.width(), src.height(), src.channels());
        let clock = BenchClock::start();
        sweep(src, &mut dst, options.algorithms, options.mode);
        (dst, clock.elapsed_micros())
    }
}

impl<I: PixelBuffer> Default for ImagingAlgorithms<I> {
    fn default() -> Self {
        Self::new()
    }
}

fn stem_of(file: &Path) -> String {
    file.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

/// Output file for each of `files` under `descriptor`, as
/// `<dir>/<descriptor>_<stem>.png`. Inputs sharing a stem get their position
/// in `files` appended so no output overwrites another.
pub fn output_paths(dir: &Path, descriptor: &str, files: &[PathBuf]) -> Vec<PathBuf> {
    let stems: Vec<String> = files.iter().map(|file| stem_of(file)).collect();
    let mut counts = HashMap::new();
    for stem in &stems {
        *counts.entry(stem.as_str()).or_insert(0) += 1;
    }
    stems
        .iter()
        .enumerate()
        .map(|(index, stem)| {
            if counts[stem.as_str()] > 1 {
                dir.join(format!("{}_{}_{}.png", descriptor, stem, index))
            } else {
                dir.join(format!("{}_{}.png", descriptor, stem))
            }
        })
        .collect()
}

impl<I: PixelBuffer> ImagingBenchmark for ImagingAlgorithms<I> {
    fn descriptor(&self) -> String {
        I::descriptor()
    }

    fn benchmark(
        &self,
        file: &Path,
        save_to: Option<&Path>,
        options: &SweepOptions<'_>,
    ) -> Result<Measurement> {
        let src = I::open(file, options.force_channels)?;
        if src.channels() < 3 {
            bail!(ErrorKind::UnsupportedChannels(
                file.display().to_string(),
                src.channels()
            ));
        }

        let (dst, elapsed_micros) = Self::timed_sweep(&src, options);

        if let Some(path) = save_to {
            if let Err(e) = dst.save(path) {
                warn!("{}", e);
                for e in e.iter().skip(1) {
                    warn!("caused by: {}", e);
                }
            }
        }

        Ok(Measurement {
            descriptor: I::descriptor(),
            file: file.to_path_buf(),
            width: src.width(),
            height: src.height(),
            channels: src.channels(),
            elapsed_micros,
        })
    }

    fn synthetic(&self, [width, height, channels]: [usize; 3], options: &SweepOptions<'_>) -> u64 {
        let src = I::new(width, height, channels);
        Self::timed_sweep(&src, options).1
    }
}

macro_rules! registry {
    ($($storage:ident @ $order:ident),* $(,)*) => {
        vec![$(
            Box::new(ImagingAlgorithms::<Image3D<orders::$order, $storage>>::new())
                as Box<dyn ImagingBenchmark>
        ),*]
    };
}

pub fn registry() -> Vec<Box<dyn ImagingBenchmark>> {
    registry![
        Pointers @ XYC,
        MemBlock @ XYC,
        Pointers @ XCY,
        MemBlock @ XCY,
        Pointers @ YXC,
        MemBlock @ YXC,
        Pointers @ YCX,
        MemBlock @ YCX,
        Pointers @ CXY,
        MemBlock @ CXY,
        Pointers @ CYX,
        MemBlock @ CYX,
    ]
}

pub fn descriptors() -> Vec<String> {
    registry().iter().map(|bench| bench.descriptor()).collect()
}

pub fn warm_up_benchmark() -> Box<dyn ImagingBenchmark> {
    Box::new(ImagingAlgorithms::<Image3D<orders::XYC, Pointers>>::new())
}
