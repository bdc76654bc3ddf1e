//! Benchmarks how the physical layout of a width × height × channel pixel
//! buffer affects a fixed suite of image kernels.
//!
//! Each of the 12 layouts (`MemBlock` or `Pointers` storage, under one of six
//! axis orders) runs the same algorithms over the same images; only the sweep
//! itself is timed.

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;

pub mod bench;
pub mod codec;
pub mod errors;
pub mod harness;
mod profiler;

pub use bench::{descriptors, registry, ImagingBenchmark, Measurement};
pub use codec::{decode, encode, ImageFile};
pub use errors::{Error, ErrorKind, Result, ResultExt};
pub use harness::{filter_choices, BenchConfig, Failure, Harness, Report};
pub use profiler::{BenchClock, Profiler};

use std::io::Write;

/// Builds a harness for `config` and runs it, writing the report to `out`.
pub fn run_benchmark<W: Write>(config: BenchConfig, out: &mut W) -> Result<Report> {
    let mut profiler = Profiler::new();
    profiler.step("Configuring");
    let harness = Harness::new(config)?;
    profiler.step("Running");
    let report = harness.run(out)?;
    profiler.total();
    Ok(report)
}
