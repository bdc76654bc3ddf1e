mod common;

use std::path::PathBuf;

use image3d::{Algorithm, ExecutionMode};
use image_layout_bench::{
    decode, descriptors, filter_choices, run_benchmark, BenchConfig, ErrorKind, Harness,
};

fn config(files: Vec<PathBuf>, filter: &[&str]) -> BenchConfig {
    BenchConfig {
        files,
        filter: filter.iter().map(|s| s.to_string()).collect(),
        warm_up: false,
        seed: Some(7),
        ..BenchConfig::default()
    }
}

fn output_text(out: Vec<u8>) -> String {
    String::from_utf8(out).expect("report is utf-8")
}

#[test]
fn there_are_twelve_distinct_layouts() {
    let mut names = descriptors();
    assert_eq!(names.len(), 12);
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 12);
    assert!(names.contains(&"MemBlock@XYC".to_string()));
    assert!(names.contains(&"Pointers@CYX".to_string()));
}

#[test]
fn filter_choices_list_layouts_then_algorithms() {
    let choices = filter_choices(None);
    assert_eq!(choices.len(), 12 + 8);
    assert!(choices[..12].iter().all(|c| c.contains('@')));
    assert!(choices[12..].iter().all(|c| c.parse::<Algorithm>().is_ok()));
}

#[test]
fn seeded_shuffles_are_reproducible() {
    assert_eq!(filter_choices(Some(3)), filter_choices(Some(3)));
    let a = Harness::new(config(vec!["a.png".into()], &[])).unwrap();
    let b = Harness::new(config(vec!["a.png".into()], &[])).unwrap();
    assert_eq!(a.layouts(), b.layouts());
    assert_eq!(a.layouts().len(), 12);
}

#[test]
fn no_files_is_a_configuration_error() {
    let err = Harness::new(config(Vec::new(), &[])).err().expect("should fail");
    assert!(matches!(*err.kind(), ErrorKind::Configuration(_)));
}

#[test]
fn unknown_filter_name_is_a_configuration_error() {
    let err = Harness::new(config(vec!["a.png".into()], &["MemBlock@XYC", "Flat@XYC"]))
        .err()
        .expect("should fail");
    match *err.kind() {
        ErrorKind::Configuration(ref message) => assert!(message.contains("Flat@XYC")),
        ref other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn filter_splits_into_layouts_and_algorithms() {
    let harness =
        Harness::new(config(vec!["a.png".into()], &["Pointers@YCX", "blur", " MemBlock@CXY"])).unwrap();
    let mut layouts = harness.layouts();
    layouts.sort();
    assert_eq!(layouts, vec!["MemBlock@CXY", "Pointers@YCX"]);
    assert!(harness.algorithms().is_enabled(Algorithm::Blur));
    assert!(!harness.algorithms().is_enabled(Algorithm::Luma));
}

#[test]
fn empty_filter_names_are_ignored() {
    let harness = Harness::new(config(vec!["a.png".into()], &["MemBlock@XYC", "", "  "])).unwrap();
    assert_eq!(harness.layouts(), vec!["MemBlock@XYC"]);
    assert!(harness.algorithms().is_unrestricted());
}

#[test]
fn algorithm_only_filter_keeps_every_layout() {
    let mut harness = Harness::new(config(vec!["a.png".into()], &["sobel"])).unwrap();
    assert_eq!(harness.layouts().len(), 12);
    harness.algorithms_mut().set_enabled(Algorithm::Averaging, true);
    assert!(harness.algorithms().is_enabled(Algorithm::Averaging));
    assert!(harness.algorithms().is_enabled(Algorithm::Sobel));
}

#[test]
fn run_reports_one_line_per_measurement() {
    common::init_logging();
    let dir = common::scratch_dir("harness-report");
    let image = dir.join("uniform.png");
    common::write_uniform_png(&image, 4, 4, [100, 150, 200]);

    let mut out = Vec::new();
    let report = run_benchmark(
        config(vec![image.clone()], &["MemBlock@XYC", "Pointers@CYX", "averaging"]),
        &mut out,
    )
    .unwrap();
    let text = output_text(out);

    assert_eq!(report.measurements.len(), 2);
    assert!(report.failures.is_empty());
    assert!(!report.all_failed());
    assert_eq!(report.totals.len(), 2);
    assert_eq!(
        report.grand_total_micros,
        report.totals.iter().map(|(_, t)| t).sum::<u64>()
    );
    assert!(report.overhead_micros >= report.grand_total_micros);
    assert_eq!(report.warm_up_micros, None);

    for m in &report.measurements {
        let line = format!(
            "{}, {}, 4, 4, 3, {}",
            m.descriptor,
            image.display(),
            m.elapsed_micros
        );
        assert!(text.lines().any(|l| l == line), "missing line {:?} in\n{}", line, text);
    }
    assert!(text.contains("Evaluating MemBlock@XYC"));
    assert!(text.contains("Evaluation of Pointers@CYX finished with a total of"));
    assert!(text.contains("All benchmarks done, with a total sum of"));
    assert!(!text.contains("Initializing dummy benchmark"));
}

#[test]
fn unreadable_image_is_skipped_and_the_run_continues() {
    common::init_logging();
    let dir = common::scratch_dir("harness-skip");
    let good = dir.join("good.png");
    let bad = dir.join("bad.png");
    common::write_gradient_png(&good, 6, 6);
    std::fs::write(&bad, b"garbage").unwrap();

    let mut out = Vec::new();
    let report = run_benchmark(config(vec![bad.clone(), good], &["Pointers@XYC"]), &mut out).unwrap();

    assert_eq!(report.measurements.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file, bad);
    assert_eq!(report.failures[0].descriptor, "Pointers@XYC");
    assert!(!report.all_failed());
}

#[test]
fn every_image_failing_is_reported() {
    let mut out = Vec::new();
    let report = run_benchmark(
        config(vec!["does/not/exist.png".into()], &["MemBlock@YXC"]),
        &mut out,
    )
    .unwrap();
    assert!(report.all_failed());
}

#[test]
fn single_channel_images_need_forcing() {
    let dir = common::scratch_dir("harness-gray");
    let gray = dir.join("gray.png");
    image::GrayImage::from_pixel(5, 5, image::Luma([9])).save(&gray).unwrap();

    let mut out = Vec::new();
    let report = run_benchmark(config(vec![gray.clone()], &["MemBlock@XYC"]), &mut out).unwrap();
    assert!(report.all_failed());
    assert!(report.failures[0].message.contains("1 channel"));

    let mut forced = config(vec![gray], &["MemBlock@XYC"]);
    forced.force_channels = true;
    let report = run_benchmark(forced, &mut Vec::new()).unwrap();
    assert_eq!(report.measurements[0].channels, 3);
}

#[test]
fn warm_up_is_reported_before_measuring() {
    let dir = common::scratch_dir("harness-warm");
    let image = dir.join("small.png");
    common::write_uniform_png(&image, 3, 3, [1, 2, 3]);

    let mut cfg = config(vec![image], &["MemBlock@XYC", "luma"]);
    cfg.warm_up = true;
    cfg.warm_up_extents = [16, 16, 3];
    let mut out = Vec::new();
    let report = run_benchmark(cfg, &mut out).unwrap();
    let text = output_text(out);

    assert!(report.warm_up_micros.is_some());
    let warm = text.find("Dummy benchmark took").expect("warm-up line");
    let started = text.find("Started").expect("start line");
    assert!(warm < started);
}

fn saved_outputs(name: &str, mode: ExecutionMode, filter: &[&str]) -> Vec<(String, image3d::RawImage)> {
    let dir = common::scratch_dir(name);
    let image = dir.join("input.png");
    common::write_uniform_png(&image, 4, 4, [100, 150, 200]);
    let out_dir = dir.join("out");
    std::fs::create_dir_all(&out_dir).unwrap();

    let mut cfg = config(vec![image], filter);
    cfg.mode = mode;
    cfg.save_dir = Some(out_dir.clone());
    let report = run_benchmark(cfg, &mut Vec::new()).unwrap();
    assert_eq!(report.measurements.len(), 12);

    descriptors()
        .into_iter()
        .map(|d| {
            let raw = decode(&out_dir.join(format!("{}_input.png", d))).unwrap();
            (d, raw)
        })
        .collect()
}

#[test]
fn averaging_a_uniform_image_gives_150_under_every_layout() {
    for (descriptor, raw) in saved_outputs("harness-uniform", ExecutionMode::Sequential, &["averaging"]) {
        assert_eq!((raw.width, raw.height, raw.channels), (4, 4, 3));
        assert!(raw.data.iter().all(|&v| v == 150), "{}: {:?}", descriptor, raw.data);
    }
}

#[test]
fn parallel_sweeps_match_under_every_layout() {
    let reference = saved_outputs("harness-seq", ExecutionMode::Sequential, &[]);
    let parallel = saved_outputs("harness-par", ExecutionMode::Parallel, &[]);
    for ((d, a), (_, b)) in reference.iter().zip(parallel.iter()) {
        assert_eq!(a, b, "{}", d);
        assert_eq!(a, &reference[0].1, "{} differs from {}", d, reference[0].0);
    }
}

#[test]
fn inputs_sharing_a_stem_save_to_distinct_files() {
    let dir = common::scratch_dir("harness-same-stem");
    let (a, b) = (dir.join("a"), dir.join("b"));
    std::fs::create_dir_all(&a).unwrap();
    std::fs::create_dir_all(&b).unwrap();
    common::write_uniform_png(&a.join("x.png"), 4, 4, [30, 30, 30]);
    common::write_uniform_png(&b.join("x.png"), 4, 4, [90, 90, 90]);
    let out_dir = dir.join("out");
    std::fs::create_dir_all(&out_dir).unwrap();

    let mut cfg = config(
        vec![a.join("x.png"), b.join("x.png")],
        &["MemBlock@XYC", "averaging"],
    );
    cfg.save_dir = Some(out_dir.clone());
    let report = run_benchmark(cfg, &mut Vec::new()).unwrap();
    assert_eq!(report.measurements.len(), 2);

    let first = decode(&out_dir.join("MemBlock@XYC_x_0.png")).unwrap();
    let second = decode(&out_dir.join("MemBlock@XYC_x_1.png")).unwrap();
    assert!(first.data.iter().all(|&v| v == 30));
    assert!(second.data.iter().all(|&v| v == 90));
    assert!(!out_dir.join("MemBlock@XYC_x.png").exists());
}
