use std::fmt;
use std::str::FromStr;

use super::UnknownName;

/// Which logical axis goes to which physical storage dimension.
///
/// The name reads outermost to innermost: `YCX` stores rows of y, each holding
/// one plane per channel, each plane holding the x values contiguously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AxisOrder {
    XYC,
    XCY,
    YXC,
    YCX,
    CXY,
    CYX,
}

impl AxisOrder {
    pub const ALL: [AxisOrder; 6] = [
        AxisOrder::XYC,
        AxisOrder::XCY,
        AxisOrder::YXC,
        AxisOrder::YCX,
        AxisOrder::CXY,
        AxisOrder::CYX,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AxisOrder::XYC => "XYC",
            AxisOrder::XCY => "XCY",
            AxisOrder::YXC => "YXC",
            AxisOrder::YCX => "YCX",
            AxisOrder::CXY => "CXY",
            AxisOrder::CYX => "CYX",
        }
    }

    /// Maps a logical `(x, y, c)` triple to the physical `[first, second, third]`.
    ///
    /// Also used on extents: `permute(width, height, channels)` gives the
    /// physical dimension sizes.
    #[inline(always)]
    pub fn permute(self, x: usize, y: usize, c: usize) -> [usize; 3] {
        match self {
            AxisOrder::XYC => [x, y, c],
            AxisOrder::XCY => [x, c, y],
            AxisOrder::YXC => [y, x, c],
            AxisOrder::YCX => [y, c, x],
            AxisOrder::CXY => [c, x, y],
            AxisOrder::CYX => [c, y, x],
        }
    }

    /// Inverse of [`permute`](Self::permute).
    pub fn unpermute(self, physical: [usize; 3]) -> (usize, usize, usize) {
        let [f, s, t] = physical;
        match self {
            AxisOrder::XYC => (f, s, t),
            AxisOrder::XCY => (f, t, s),
            AxisOrder::YXC => (s, f, t),
            AxisOrder::YCX => (t, f, s),
            AxisOrder::CXY => (s, t, f),
            AxisOrder::CYX => (t, s, f),
        }
    }
}

impl fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AxisOrder {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AxisOrder::ALL
            .iter()
            .copied()
            .find(|order| order.name() == s)
            .ok_or_else(|| UnknownName::new("axis order", s))
    }
}

/// Compile-time choice of [`AxisOrder`], so that `Image3D` monomorphizes its
/// address computation per order.
pub trait PixelOrder: Send + Sync + 'static {
    const ORDER: AxisOrder;
}

pub mod orders {
    use super::{AxisOrder, PixelOrder};

    macro_rules! pixel_orders {
        ($($order:ident),*) => {
            $(
                #[derive(Debug, Clone, Copy, Default)]
                pub struct $order;

                impl PixelOrder for $order {
                    const ORDER: AxisOrder = AxisOrder::$order;
                }
            )*
        };
    }

    pixel_orders!(XYC, XCY, YXC, YCX, CXY, CYX);
}
