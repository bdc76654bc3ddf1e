//! Runs the enabled algorithms over every input image under every selected
//! layout, and reports the timings.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use image3d::{Algorithm, AlgorithmSet, ExecutionMode};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::bench::{self, ImagingBenchmark, Measurement, SweepOptions};
use crate::errors::*;
use crate::profiler::{BenchClock, Profiler};

pub const WARM_UP_EXTENTS: [usize; 3] = [5000, 5000, 3];

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub files: Vec<PathBuf>,
    /// Layout descriptors and algorithm names to restrict the run to.
    pub filter: Vec<String>,
    pub warm_up: bool,
    pub warm_up_extents: [usize; 3],
    pub mode: ExecutionMode,
    pub force_channels: bool,
    /// Fixes the layout order; `None` shuffles from entropy.
    pub seed: Option<u64>,
    pub save_dir: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            filter: Vec::new(),
            warm_up: true,
            warm_up_extents: WARM_UP_EXTENTS,
            mode: ExecutionMode::Sequential,
            force_channels: false,
            seed: None,
            save_dir: None,
        }
    }
}

fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Layout descriptors then algorithm names, each group shuffled.
pub fn filter_choices(seed: Option<u64>) -> Vec<String> {
    let mut rng = rng(seed);
    let mut descriptors = bench::descriptors();
    descriptors.shuffle(&mut rng);
    let mut algorithms: Vec<String> = Algorithm::ALL.iter().map(|a| a.name().to_string()).collect();
    algorithms.shuffle(&mut rng);
    descriptors.extend(algorithms);
    descriptors
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub descriptor: String,
    pub file: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub warm_up_micros: Option<u64>,
    pub measurements: Vec<Measurement>,
    pub failures: Vec<Failure>,
    /// Sum of measured sweeps per layout, in run order.
    pub totals: Vec<(String, u64)>,
    pub grand_total_micros: u64,
    /// Wall time of the whole run, loading and reporting included.
    pub overhead_micros: u64,
}

impl Report {
    /// True when images were requested and none of them could be measured.
    pub fn all_failed(&self) -> bool {
        self.measurements.is_empty() && !self.failures.is_empty()
    }
}

pub struct Harness {
    config: BenchConfig,
    benches: Vec<Box<dyn ImagingBenchmark>>,
    algorithms: AlgorithmSet,
}

impl Harness {
    /// Validates `config`, resolves its filter and shuffles the layouts.
    pub fn new(config: BenchConfig) -> Result<Self> {
        if config.files.is_empty() {
            bail!(ErrorKind::Configuration("no input files".to_string()));
        }

        let descriptors = bench::descriptors();
        let mut layouts = BTreeSet::new();
        let mut algorithms = AlgorithmSet::all();
        let names = config
            .filter
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty());
        for name in names {
            if descriptors.iter().any(|d| d == name) {
                layouts.insert(name.to_string());
            } else if let Ok(algorithm) = name.parse::<Algorithm>() {
                algorithms.set_enabled(algorithm, true);
            } else {
                bail!(ErrorKind::Configuration(format!(
                    "unknown filter name '{}'",
                    name
                )));
            }
        }

        let mut benches: Vec<_> = bench::registry()
            .into_iter()
            .filter(|bench| layouts.is_empty() || layouts.contains(&bench.descriptor()))
            .collect();
        benches.shuffle(&mut rng(config.seed));

        debug!(
            "Layouts: {:?}",
            benches.iter().map(|b| b.descriptor()).collect::<Vec<_>>()
        );
        debug!("Algorithms: {:?}", algorithms.iter().collect::<Vec<_>>());

        Ok(Self {
            config,
            benches,
            algorithms,
        })
    }

    pub fn algorithms(&self) -> &AlgorithmSet {
        &self.algorithms
    }

    pub fn algorithms_mut(&mut self) -> &mut AlgorithmSet {
        &mut self.algorithms
    }

    /// Layout descriptors in the order they will run.
    pub fn layouts(&self) -> Vec<String> {
        self.benches.iter().map(|bench| bench.descriptor()).collect()
    }

    /// Runs the benchmark, writing report lines to `out`.
    ///
    /// An image that fails to load is reported and skipped; only I/O errors on
    /// `out` abort the run.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<Report> {
        let clock = BenchClock::start();
        let mut profiler = Profiler::new();
        let mut report = Report::default();
        let options = SweepOptions {
            algorithms: &self.algorithms,
            mode: self.config.mode,
            force_channels: self.config.force_channels,
        };

        if self.config.warm_up {
            profiler.step("Warm-up");
            writeln!(out, "Initializing dummy benchmark...")?;
            let warm_clock = BenchClock::start();
            bench::warm_up_benchmark().synthetic(self.config.warm_up_extents, &options);
            let elapsed = warm_clock.elapsed_micros();
            writeln!(out, "Dummy benchmark took {} microseconds", elapsed)?;
            report.warm_up_micros = Some(elapsed);
        }

        profiler.step("Benchmark");
        writeln!(out, "Started")?;
        for bench in &self.benches {
            let descriptor = bench.descriptor();
            let mut total = 0;
            writeln!(out, "Evaluating {}", descriptor)?;
            let outputs = self
                .config
                .save_dir
                .as_ref()
                .map(|dir| bench::output_paths(dir, &descriptor, &self.config.files));
            for (index, file) in self.config.files.iter().enumerate() {
                let save_to = outputs.as_ref().map(|paths| paths[index].as_path());
                match bench.benchmark(file, save_to, &options) {
                    Ok(measurement) => {
                        total += measurement.elapsed_micros;
                        writeln!(out, "{}", measurement)?;
                        report.measurements.push(measurement);
                    }
                    Err(e) => {
                        error!("{}: {}", descriptor, e);
                        for cause in e.iter().skip(1) {
                            error!("caused by: {}", cause);
                        }
                        report.failures.push(Failure {
                            descriptor: descriptor.clone(),
                            file: file.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }
            report.grand_total_micros += total;
            writeln!(
                out,
                "Evaluation of {} finished with a total of {} microseconds",
                descriptor, total
            )?;
            report.totals.push((descriptor, total));
        }

        profiler.total();
        report.overhead_micros = clock.elapsed_micros();
        writeln!(
            out,
            "All benchmarks done, with a total sum of {} microseconds,",
            report.grand_total_micros
        )?;
        writeln!(
            out,
            "or {} microseconds counting with the overhead.",
            report.overhead_micros
        )?;

        Ok(report)
    }
}
