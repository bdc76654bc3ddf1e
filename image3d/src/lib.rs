//! Three-dimensional pixel buffers with a configurable physical layout, and
//! the image kernels that run on top of them.
//!
//! The same logical image (width × height × channel) can be stored under any
//! of six axis orders and two storage strategies. Everything above the buffer
//! goes through [`PixelBuffer::at`], so kernels never see the layout.

#[cfg(test)]
#[macro_use]
mod test_util;

pub mod algorithms;
mod image;
pub mod kernel;
mod order;
mod storage;

use std::error::Error;
use std::fmt;

pub use algorithms::{sweep, sweep_new, Algorithm, AlgorithmSet};
pub use image::{Image3D, PixelBuffer, RawImage};
pub use kernel::ExecutionMode;
pub use order::{orders, AxisOrder, PixelOrder};
pub use storage::{MemBlock, Pointers, Storage, StorageKind};

pub type PixelUnit = u8;

pub const MAX_PIXEL_VALUE: u32 = PixelUnit::max_value() as u32;

pub const RED: usize = 0;
pub const GREEN: usize = 1;
pub const BLUE: usize = 2;
pub const ALPHA: usize = 3;

/// A name that does not match any axis order, storage strategy or algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
}

impl UnknownName {
    pub(crate) fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.name)
    }
}

impl Error for UnknownName {}
