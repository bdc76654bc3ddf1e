use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::kernel::{self, ExecutionMode};
use super::{PixelBuffer, UnknownName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    Averaging,
    Luma,
    Blur,
    Desaturation,
    DecompositionMax,
    DecompositionMin,
    Sobel,
    SobelLookup,
}

impl Algorithm {
    /// Every algorithm, in sweep order.
    pub const ALL: [Algorithm; 8] = [
        Algorithm::Averaging,
        Algorithm::Luma,
        Algorithm::Blur,
        Algorithm::Desaturation,
        Algorithm::DecompositionMax,
        Algorithm::DecompositionMin,
        Algorithm::Sobel,
        Algorithm::SobelLookup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Averaging => "averaging",
            Algorithm::Luma => "luma",
            Algorithm::Blur => "blur",
            Algorithm::Desaturation => "desaturation",
            Algorithm::DecompositionMax => "decomposition-max",
            Algorithm::DecompositionMin => "decomposition-min",
            Algorithm::Sobel => "sobel",
            Algorithm::SobelLookup => "sobel-lookup",
        }
    }

    pub fn apply<I: PixelBuffer>(self, src: &I, dst: &mut I, mode: ExecutionMode) {
        match self {
            Algorithm::Averaging => kernel::averaging(src, dst, mode),
            Algorithm::Luma => kernel::luma(src, dst, mode),
            Algorithm::Blur => kernel::blur(src, dst, mode),
            Algorithm::Desaturation => kernel::desaturation(src, dst, mode),
            Algorithm::DecompositionMax => kernel::decomposition_max(src, dst, mode),
            Algorithm::DecompositionMin => kernel::decomposition_min(src, dst, mode),
            Algorithm::Sobel => kernel::sobel(src, dst, mode),
            Algorithm::SobelLookup => kernel::sobel_lookup(src, dst, mode),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .iter()
            .copied()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| UnknownName::new("algorithm", s))
    }
}

/// Which algorithms a sweep runs. Starts with everything enabled.
///
/// Enabling an algorithm while all are enabled narrows the set to that one;
/// disabling one while all are enabled keeps the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlgorithmSet {
    enabled: Option<BTreeSet<Algorithm>>,
}

impl AlgorithmSet {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only<It: IntoIterator<Item = Algorithm>>(algorithms: It) -> Self {
        Self {
            enabled: Some(algorithms.into_iter().collect()),
        }
    }

    pub fn is_enabled(&self, algorithm: Algorithm) -> bool {
        match self.enabled {
            None => true,
            Some(ref set) => set.contains(&algorithm),
        }
    }

    pub fn set_enabled(&mut self, algorithm: Algorithm, enabled: bool) {
        let set = self.enabled.get_or_insert_with(|| {
            if enabled {
                BTreeSet::new()
            } else {
                Algorithm::ALL.iter().copied().collect()
            }
        });
        if enabled {
            set.insert(algorithm);
        } else {
            set.remove(&algorithm);
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.enabled.is_none()
    }

    /// Enabled algorithms in sweep order.
    pub fn iter(&self) -> impl Iterator<Item = Algorithm> + '_ {
        Algorithm::ALL
            .iter()
            .copied()
            .filter(move |&algorithm| self.is_enabled(algorithm))
    }
}

/// Runs every enabled algorithm from `src` into the same `dst`, in order.
///
/// `dst` is not reset between algorithms, so only the last one's output
/// (plus whatever earlier ones wrote where it skips pixels) survives.
pub fn sweep<I: PixelBuffer>(src: &I, dst: &mut I, algorithms: &AlgorithmSet, mode: ExecutionMode) {
    for algorithm in algorithms.iter() {
        algorithm.apply(src, dst, mode);
    }
}

/// [`sweep`] into a freshly allocated destination of the same shape.
pub fn sweep_new<I: PixelBuffer>(src: &I, algorithms: &AlgorithmSet, mode: ExecutionMode) -> I {
    let mut dst = I::new(src.width(), src.height(), src.channels());
    sweep(src, &mut dst, algorithms, mode);
    dst
}
