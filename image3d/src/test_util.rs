/// Runs `$check::<I>()` for every axis order and storage combination.
macro_rules! for_each_layout {
    ($check:ident) => {{
        use crate::{orders, Image3D, MemBlock, Pointers};
        $check::<Image3D<orders::XYC, MemBlock>>();
        $check::<Image3D<orders::XYC, Pointers>>();
        $check::<Image3D<orders::XCY, MemBlock>>();
        $check::<Image3D<orders::XCY, Pointers>>();
        $check::<Image3D<orders::YXC, MemBlock>>();
        $check::<Image3D<orders::YXC, Pointers>>();
        $check::<Image3D<orders::YCX, MemBlock>>();
        $check::<Image3D<orders::YCX, Pointers>>();
        $check::<Image3D<orders::CXY, MemBlock>>();
        $check::<Image3D<orders::CXY, Pointers>>();
        $check::<Image3D<orders::CYX, MemBlock>>();
        $check::<Image3D<orders::CYX, Pointers>>();
    }};
}
