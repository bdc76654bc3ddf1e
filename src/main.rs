use std::io;
use std::path::PathBuf;

use clap::Parser;
use image3d::ExecutionMode;
use image_layout_bench::{filter_choices, BenchConfig};

/// Times a fixed suite of image kernels under every pixel buffer layout.
#[derive(Parser, Debug)]
#[command(name = "image-layout-bench")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "FILTER NAMES:
    Layouts are <Storage>@<AxisOrder>, e.g. MemBlock@XYC or Pointers@CYX.
    Algorithms: averaging, luma, blur, desaturation, decomposition-max,
    decomposition-min, sobel, sobel-lookup.
    Use --print-filter-choices to list them all.")]
struct Cli {
    /// Images to benchmark
    #[arg(value_name = "FILE", required_unless_present = "print_filter_choices")]
    files: Vec<PathBuf>,

    /// Restrict the run to these layouts and/or algorithms
    #[arg(short, long, value_name = "NAME", value_delimiter = ',')]
    filter: Vec<String>,

    /// Skip the warm-up sweep
    #[arg(long = "no-warmup", alias = "dummy")]
    no_warmup: bool,

    /// Print the available filter names and exit
    #[arg(long)]
    print_filter_choices: bool,

    /// Run each kernel data-parallel over image rows
    #[arg(long)]
    parallel: bool,

    /// Load every image with exactly 3 channels
    #[arg(long)]
    force_rgb: bool,

    /// Seed for the layout order shuffle
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Save each sweep's output image into this directory
    #[arg(long, value_name = "DIR")]
    save_dir: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> BenchConfig {
        BenchConfig {
            files: self.files,
            filter: self.filter,
            warm_up: !self.no_warmup,
            mode: if self.parallel {
                ExecutionMode::Parallel
            } else {
                ExecutionMode::Sequential
            },
            force_channels: self.force_rgb,
            seed: self.seed,
            save_dir: self.save_dir,
            ..BenchConfig::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.print_filter_choices {
        for choice in filter_choices(cli.seed) {
            println!("{}", choice);
        }
        return;
    }

    let stdout = io::stdout();
    match image_layout_bench::run_benchmark(cli.into_config(), &mut stdout.lock()) {
        Ok(ref report) if report.all_failed() => {
            eprintln!("error: no image could be benchmarked");
            ::std::process::exit(1);
        }
        Ok(_) => {}
        Err(ref e) => {
            eprintln!("error: {}", e);

            for e in e.iter().skip(1) {
                eprintln!("caused by: {}", e);
            }

            if let Some(backtrace) = e.backtrace() {
                eprintln!("backtrace: {:?}", backtrace);
            }

            ::std::process::exit(1);
        }
    }
}
