// SPDX-License-Identifier: MPL-2.0
use chrono::{TimeZone, Utc};
use formcheck::app::commands;
use formcheck::app::WorkoutHistory;
use formcheck::application::port::{InferenceError, ModelLoadError, PoseClassifier};
use formcheck::config::{self, Config};
use formcheck::domain::classification::ModelDimensions;
use formcheck::domain::exercise::ExerciseType;
use formcheck::domain::frame::{Frame, PixelFormat};
use formcheck::infrastructure::{FakePoseClassifier, OnnxPoseClassifier};
use image_rs::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const LABELS: [&str; 3] = ["arm_raise", "lunge", "standing"];

fn dims() -> ModelDimensions {
    ModelDimensions::new(64, 48).expect("valid dimensions")
}

fn write_frame(path: &Path) {
    RgbaImage::from_pixel(16, 12, Rgba([90, 120, 150, 255]))
        .save(path)
        .expect("write frame");
}

#[test]
fn adapter_reports_fixed_dimensions_and_covers_labels() {
    let mut classifier =
        FakePoseClassifier::fixed(LABELS, dims(), vec![0.2, 0.7, 0.1]).expect("valid classifier");
    assert_eq!(classifier.input_width(), 64);
    assert_eq!(classifier.input_height(), 48);

    // Any frame size is accepted; dimensions never change.
    for (width, height) in [(64, 48), (640, 480), (7, 3)] {
        let pixels = vec![128u8; (width * height * 3) as usize];
        let frame = Frame::new(width, height, PixelFormat::Rgb8, &pixels);
        let result = classifier.classify(&frame).expect("classify");
        assert!(result.covers(&LABELS));
        assert_eq!(result.len(), LABELS.len());
        assert_eq!(classifier.input_width(), 64);
        assert_eq!(classifier.input_height(), 48);
    }
}

#[test]
fn adapter_rejects_empty_and_truncated_frames() {
    let mut classifier =
        FakePoseClassifier::fixed(LABELS, dims(), vec![0.2, 0.7, 0.1]).expect("valid classifier");

    let empty = Frame::new(64, 48, PixelFormat::Bgra8, &[]);
    assert!(matches!(
        classifier.classify(&empty),
        Err(InferenceError::InvalidFrame { .. })
    ));

    let short = vec![0u8; 10];
    let truncated = Frame::new(64, 48, PixelFormat::Bgra8, &short);
    assert!(matches!(
        classifier.classify(&truncated),
        Err(InferenceError::InvalidFrame { .. })
    ));

    // A failure leaves the adapter usable.
    let pixels = vec![0u8; 64 * 48 * 4];
    let frame = Frame::new(64, 48, PixelFormat::Bgra8, &pixels);
    assert!(classifier.classify(&frame).is_ok());
}

#[test]
fn adapter_does_not_mutate_frame() {
    let mut classifier =
        FakePoseClassifier::fixed(LABELS, dims(), vec![0.2, 0.7, 0.1]).expect("valid classifier");
    let pixels: Vec<u8> = (0..64 * 48 * 4).map(|i| (i % 256) as u8).collect();
    let before = pixels.clone();
    let frame = Frame::new(64, 48, PixelFormat::Rgba8, &pixels);
    classifier.classify(&frame).expect("classify");
    assert_eq!(pixels, before);
}

#[test]
fn onnx_adapter_fails_to_construct_without_model() {
    let dir = tempdir().expect("create temp dir");
    let result = OnnxPoseClassifier::from_path(dir.path().join("missing.onnx"));
    assert!(matches!(result, Err(ModelLoadError::ModelNotFound(_))));
}

#[test]
fn workout_over_frame_directory_is_recorded_in_history() {
    let frames_dir = tempdir().expect("create frames dir");
    let data_dir = tempdir().expect("create data dir");

    let mut script = vec![vec![0.05, 0.9, 0.05]; 10];
    script.extend(vec![vec![0.02, 0.03, 0.95]; 10]);
    let classifier = FakePoseClassifier::scripted(LABELS, dims(), script).expect("valid script");

    for i in 0..21 {
        let path = frames_dir.path().join(format!("{i:03}.png"));
        if i == 10 {
            fs::write(&path, b"not a png").expect("write corrupt frame");
        } else {
            write_frame(&path);
        }
    }

    let files = commands::frame_files(frames_dir.path()).expect("list frames");
    assert_eq!(files.len(), 21);

    let start = Utc.with_ymd_and_hms(2026, 10, 19, 7, 30, 0).unwrap();
    let mut out = Vec::new();
    let session = commands::run_workout(classifier, &files, 10, &Config::default(), start, &mut out)
        .expect("run workout")
        .expect("one rep counted");

    let text = String::from_utf8(out).expect("utf8 output");
    assert!(text.contains("Lunge rep 1"));
    assert!(text.contains("Skipped 1 of 21 frames"));
    assert!(text.contains("Workout finished in 0m 2s: 1 reps"));
    assert_eq!(session.reps_for(ExerciseType::Lunge), 1);
    assert_eq!(session.date, start);

    let mut history = WorkoutHistory::load_from(Some(data_dir.path().to_path_buf()));
    history.record(session.clone()).expect("record session");

    let reloaded = WorkoutHistory::load_from(Some(data_dir.path().to_path_buf()));
    assert_eq!(reloaded.sessions(), &[session]);

    let mut listing = Vec::new();
    commands::show_history(&reloaded, &mut listing).expect("show history");
    let listing = String::from_utf8(listing).expect("utf8 output");
    assert!(listing.starts_with("2026-10-19 07:30"));
    assert!(listing.contains("1 reps (Lunge 1)"));
}

#[test]
fn quiet_workout_without_reps_records_nothing() {
    let frames_dir = tempdir().expect("create frames dir");
    for i in 0..5 {
        write_frame(&frames_dir.path().join(format!("{i}.png")));
    }
    let classifier =
        FakePoseClassifier::fixed(LABELS, dims(), vec![0.1, 0.1, 0.8]).expect("valid classifier");
    let config = Config {
        announce_reps: false,
        ..Config::default()
    };

    let files = commands::frame_files(frames_dir.path()).expect("list frames");
    let mut out = Vec::new();
    let session = commands::run_workout(classifier, &files, 30, &config, Utc::now(), &mut out)
        .expect("run workout");

    assert!(session.is_none());
    assert_eq!(
        String::from_utf8(out).expect("utf8 output"),
        "No reps counted, nothing recorded\n"
    );
}

#[test]
fn settings_file_drives_tracker() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("settings.toml");
    fs::write(&path, "confidence_threshold = 0.85\nstability_frames = 3\n").expect("write");

    let loaded = config::load_from_path(&path).expect("load settings");
    let settings = loaded.tracker_settings();
    assert_eq!(settings.stability_frames.value(), 3);
    assert_eq!(settings.confidence_threshold.percent(), 85);

    config::save_to_path(&loaded, &path).expect("save settings");
    assert_eq!(config::load_from_path(&path).expect("reload"), loaded);
}
