use std::cmp::min;
use std::fmt;
use std::marker::PhantomData;

use super::kernel::coords;
use super::{PixelOrder, PixelUnit, Storage};

/// Pixel grid in the codec's layout: rows of interleaved channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<PixelUnit>,
}

impl RawImage {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<PixelUnit>) -> Self {
        assert_eq!(
            data.len(),
            width * height * channels,
            "raw image data does not match {}×{}×{}",
            width,
            height,
            channels
        );
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize, c: usize) -> usize {
        (y * self.width + x) * self.channels + c
    }

    pub fn get(&self, x: usize, y: usize, c: usize) -> PixelUnit {
        self.data[self.index(x, y, c)]
    }
}

/// Coordinate-addressed access to a width × height × channel buffer.
///
/// Kernels are written against this trait only, so the same kernel code runs
/// on every layout.
pub trait PixelBuffer: Sized + Send + Sync {
    /// Zero-filled buffer. Any zero extent gives an empty buffer with no storage.
    fn new(width: usize, height: usize, channels: usize) -> Self;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn channels(&self) -> usize;

    /// Panics unless `x < width`, `y < height` and `c < channels`.
    fn at(&self, x: usize, y: usize, c: usize) -> &PixelUnit;

    /// Panics unless `x < width`, `y < height` and `c < channels`.
    fn at_mut(&mut self, x: usize, y: usize, c: usize) -> &mut PixelUnit;

    /// `<Storage>@<AxisOrder>`, e.g. `MemBlock@XYC`.
    fn descriptor() -> String;

    /// Copies `raw` channel by channel. With `force_channels` the buffer has
    /// exactly 3 channels; missing ones stay zero and extra ones are dropped.
    fn from_raw(raw: &RawImage, force_channels: bool) -> Self {
        let channels = if force_channels { 3 } else { raw.channels };
        let mut image = Self::new(raw.width, raw.height, channels);
        let copied = min(channels, raw.channels);
        for (x, y) in coords(raw.width, raw.height) {
            for c in 0..copied {
                *image.at_mut(x, y, c) = raw.get(x, y, c);
            }
        }
        image
    }

    fn to_raw(&self) -> RawImage {
        let (width, height, channels) = (self.width(), self.height(), self.channels());
        let mut data = Vec::with_capacity(width * height * channels);
        for (x, y) in coords(width, height) {
            for c in 0..channels {
                data.push(*self.at(x, y, c));
            }
        }
        RawImage::new(width, height, channels, data)
    }

    fn same_shape<B: PixelBuffer>(&self, other: &B) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.channels() == other.channels()
    }
}

/// Pixel buffer whose physical layout is fixed by `O` and `S` at compile time.
pub struct Image3D<O: PixelOrder, S: Storage> {
    width: usize,
    height: usize,
    channels: usize,
    extents: [usize; 3],
    buff: S,
    _order: PhantomData<O>,
}

impl<O: PixelOrder, S: Storage> Image3D<O, S> {
    /// Physical dimension sizes, i.e. the logical extents permuted by `O`.
    pub fn extents(&self) -> [usize; 3] {
        self.extents
    }

    pub fn is_empty(&self) -> bool {
        self.buff.allocated_cells() == 0
    }

    pub fn storage(&self) -> &S {
        &self.buff
    }

    #[inline(always)]
    fn physical(&self, x: usize, y: usize, c: usize) -> [usize; 3] {
        let p = O::ORDER.permute(x, y, c);
        assert!(p[0] < self.extents[0], "pixel ({}, {}, {}) out of bounds", x, y, c);
        assert!(p[1] < self.extents[1], "pixel ({}, {}, {}) out of bounds", x, y, c);
        assert!(p[2] < self.extents[2], "pixel ({}, {}, {}) out of bounds", x, y, c);
        p
    }
}

impl<O: PixelOrder, S: Storage> PixelBuffer for Image3D<O, S> {
    fn new(width: usize, height: usize, channels: usize) -> Self {
        let extents = O::ORDER.permute(width, height, channels);
        Self {
            width,
            height,
            channels,
            extents,
            buff: S::allocate(extents),
            _order: PhantomData,
        }
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn channels(&self) -> usize {
        self.channels
    }

    #[inline(always)]
    fn at(&self, x: usize, y: usize, c: usize) -> &PixelUnit {
        let p = self.physical(x, y, c);
        self.buff.cell(p)
    }

    #[inline(always)]
    fn at_mut(&mut self, x: usize, y: usize, c: usize) -> &mut PixelUnit {
        let p = self.physical(x, y, c);
        self.buff.cell_mut(p)
    }

    fn descriptor() -> String {
        format!("{}@{}", S::KIND, O::ORDER)
    }
}

impl<O: PixelOrder, S: Storage> Default for Image3D<O, S> {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl<O: PixelOrder, S: Storage> fmt::Debug for Image3D<O, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image3D")
            .field("layout", &Self::descriptor())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("extents", &self.extents)
            .finish()
    }
}

/// Hex dump, one line per column x, one `(RR,GG,BB)` group per y.
impl<O: PixelOrder, S: Storage> fmt::Display for Image3D<O, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 0..self.width {
            for y in 0..self.height {
                f.write_str("(")?;
                for c in 0..self.channels {
                    if c > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{:02X}", self.at(x, y, c))?;
                }
                f.write_str(") ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
