use std::fmt;
use std::str::FromStr;

use super::{PixelUnit, UnknownName};

/// How the three physical dimensions are laid out in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKind {
    /// One contiguous allocation indexed as `f * d1 * d2 + s * d2 + t`.
    MemBlock,
    /// `d0` pointers to `d1` pointers to `d2` pixel values.
    Pointers,
}

impl StorageKind {
    pub const ALL: [StorageKind; 2] = [StorageKind::MemBlock, StorageKind::Pointers];

    pub fn name(self) -> &'static str {
        match self {
            StorageKind::MemBlock => "MemBlock",
            StorageKind::Pointers => "Pointers",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StorageKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownName::new("storage strategy", s))
    }
}

/// Owned pixel storage addressed by a physical `[first, second, third]` triple.
///
/// Callers check the triple against the extents before calling `cell`; the
/// implementations still bounds-check through slice indexing.
pub trait Storage: Send + Sync + Sized {
    const KIND: StorageKind;

    /// Zero-filled storage for `extents`. Allocates nothing if any extent is 0.
    fn allocate(extents: [usize; 3]) -> Self;

    fn cell(&self, physical: [usize; 3]) -> &PixelUnit;

    fn cell_mut(&mut self, physical: [usize; 3]) -> &mut PixelUnit;

    fn allocated_cells(&self) -> usize;
}

#[derive(Debug, Clone, Default)]
pub struct MemBlock {
    buff: Vec<PixelUnit>,
    plane: usize,
    row: usize,
}

impl MemBlock {
    #[inline(always)]
    fn offset(&self, [f, s, t]: [usize; 3]) -> usize {
        f * self.plane + s * self.row + t
    }
}

impl Storage for MemBlock {
    const KIND: StorageKind = StorageKind::MemBlock;

    fn allocate([d0, d1, d2]: [usize; 3]) -> Self {
        let len = d0 * d1 * d2;
        if len == 0 {
            return Self::default();
        }
        Self {
            buff: vec![0; len],
            plane: d1 * d2,
            row: d2,
        }
    }

    #[inline(always)]
    fn cell(&self, physical: [usize; 3]) -> &PixelUnit {
        &self.buff[self.offset(physical)]
    }

    #[inline(always)]
    fn cell_mut(&mut self, physical: [usize; 3]) -> &mut PixelUnit {
        let offset = self.offset(physical);
        &mut self.buff[offset]
    }

    fn allocated_cells(&self) -> usize {
        self.buff.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pointers {
    buff: Box<[Box<[Box<[PixelUnit]>]>]>,
}

impl Storage for Pointers {
    const KIND: StorageKind = StorageKind::Pointers;

    fn allocate([d0, d1, d2]: [usize; 3]) -> Self {
        if d0 * d1 * d2 == 0 {
            return Self::default();
        }
        let buff = (0..d0)
            .map(|_| {
                (0..d1)
                    .map(|_| vec![0; d2].into_boxed_slice())
                    .collect::<Vec<_>>()
                    .into_boxed_slice()
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { buff }
    }

    #[inline(always)]
    fn cell(&self, [f, s, t]: [usize; 3]) -> &PixelUnit {
        &self.buff[f][s][t]
    }

    #[inline(always)]
    fn cell_mut(&mut self, [f, s, t]: [usize; 3]) -> &mut PixelUnit {
        &mut self.buff[f][s][t]
    }

    fn allocated_cells(&self) -> usize {
        self.buff
            .iter()
            .map(|plane| plane.iter().map(|row| row.len()).sum::<usize>())
            .sum()
    }
}
