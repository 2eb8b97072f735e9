use super::*;
use crate::harness::{GoldenHarness, HarnessConfig};

const META: &str = "frames=2\nwidth=16\nheight=8\nfps=29.97\nformat=RGB565\nsource=videos/clip.mp4\n";

fn golden(width: u32, height: u32, seed: u64) -> (Vec<u16>, Vec<u16>) {
    let config = HarnessConfig::builder()
        .width(width)
        .height(height)
        .seed(seed)
        .trace_windows(false)
        .build();
    let vectors = GoldenHarness::new(config).generate().unwrap();
    (vectors.input, vectors.expected)
}

/// Two frames with different content, concatenated.
fn two_frame_capture() -> (FrameMeta, Vec<u16>, Vec<u16>) {
    let meta = FrameMeta::parse(META).unwrap();
    let (mut input, mut expected) = golden(16, 8, 1);
    let (input2, expected2) = golden(16, 8, 2);
    input.extend(input2);
    expected.extend(expected2);
    (meta, input, expected)
}

#[test]
fn parses_capture_metadata() {
    let meta = FrameMeta::parse(META).unwrap();
    assert_eq!(meta.frames, 2);
    assert_eq!((meta.width, meta.height), (16, 8));
    assert!((meta.fps - 29.97).abs() < 1e-9);
    assert_eq!(meta.pixels_per_frame(), 128);
}

#[test]
fn metadata_tolerates_comments_and_defaults_fps() {
    let text = "# capture\n\n width = 64 \nheight=48\nframes=1\nnot a pair\n";
    let meta = FrameMeta::parse(text).unwrap();
    assert_eq!(meta, FrameMeta::single(64, 48));
    assert_eq!(meta.fps, 30.0);
}

#[test]
fn metadata_errors() {
    let err = FrameMeta::parse("width=64\n").unwrap_err();
    assert!(
        matches!(&err, Error::Metadata(msg) if msg == "missing keys: frames, height"),
        "{err}"
    );
    assert!(matches!(
        FrameMeta::parse("frames=x\nwidth=4\nheight=4\n"),
        Err(Error::Metadata(_))
    ));
    assert!(matches!(
        FrameMeta::parse("frames=1\nwidth=4\nheight=4\nfps=fast\n"),
        Err(Error::Metadata(_))
    ));
    assert!(matches!(
        FrameMeta::parse("frames=0\nwidth=4\nheight=4\n"),
        Err(Error::Metadata(_))
    ));
    assert!(matches!(
        FrameMeta::parse("frames=1\nwidth=2\nheight=4\n"),
        Err(Error::InvalidGeometry { .. })
    ));
}

#[test]
fn identical_streams_pass_with_infinite_psnr() {
    let words = [0x0000, 0x8410, 0x5acb, 0xffff];
    let cmp = compare_streams(&words, &words).unwrap();
    assert!(cmp.passed);
    assert_eq!(cmp.total_samples, 4);
    assert_eq!(cmp.mismatches, 0);
    assert_eq!(cmp.first_mismatch, None);
    assert_eq!(cmp.max_abs_diff, 0);
    assert_eq!(cmp.psnr_db, None);
}

#[test]
fn difference_statistics_use_decoded_luma() {
    // 0x8410 decodes to luma 130.
    let expected = [0x0000; 4];
    let actual = [0x0000, 0x0000, 0x0000, 0x8410];
    let cmp = compare_streams(&expected, &actual).unwrap();
    assert!(!cmp.passed);
    assert_eq!(cmp.mismatches, 1);
    assert_eq!(cmp.first_mismatch, Some(3));
    assert_eq!(cmp.mismatch_rate, 0.25);
    assert_eq!(cmp.max_abs_diff, 130);
    assert_eq!(cmp.mean_abs_diff, 32.5);
    let psnr = cmp.psnr_db.unwrap();
    let expected_psnr = 10.0 * (255.0f64 * 255.0 / (130.0 * 130.0 / 4.0)).log10();
    assert!((psnr - expected_psnr).abs() < 1e-9, "{psnr}");
}

#[test]
fn luma_aliased_mismatch_fails_with_infinite_psnr() {
    // 0x0001 differs only in the low blue bit and decodes to luma 0.
    let expected = [0x0000; 2];
    let actual = [0x0000, 0x0001];
    let cmp = compare_streams(&expected, &actual).unwrap();
    assert!(!cmp.passed);
    assert_eq!(cmp.mismatches, 1);
    assert_eq!(cmp.max_abs_diff, 0);
    assert_eq!(cmp.psnr_db, None);

    let report = ComparisonReport::new(&FrameMeta::single(4, 3), BorderMode::Exclude, cmp);
    let summary = report.summary();
    assert!(summary.contains("PSNR             : inf"), "{summary}");
    assert!(summary.contains("decode to equal luma"), "{summary}");
    assert!(summary.ends_with("Status: FAIL"), "{summary}");
}

#[test]
fn detects_a_stream_running_late() {
    let expected = [0x1111, 0x2222, 0x3333, 0x4444, 0x5555];
    let late_one = [0x1111, 0x1111, 0x2222, 0x3333, 0x4444];
    let cmp = compare_streams(&expected, &late_one).unwrap();
    assert_eq!(cmp.mismatches, 4);
    assert_eq!((cmp.late_by_one, cmp.late_by_two), (4, 0));

    let late_two = [0x0000, 0x0000, 0x1111, 0x2222, 0x3333];
    let cmp = compare_streams(&expected, &late_two).unwrap();
    assert_eq!(cmp.mismatches, 5);
    assert_eq!((cmp.late_by_one, cmp.late_by_two), (0, 3));
}

#[test]
fn length_mismatch_is_an_error() {
    let err = compare_streams(&[0; 4], &[0; 3]).unwrap_err();
    assert!(matches!(
        err,
        Error::StreamLength {
            expected: 4,
            actual: 3,
            ..
        }
    ));
}

#[test]
fn empty_streams_compare_equal() {
    let cmp = compare_streams(&[], &[]).unwrap();
    assert!(cmp.passed);
    assert_eq!(cmp.mismatch_rate, 0.0);
    assert_eq!(cmp.psnr_db, None);
}

#[test]
fn model_output_passes_against_itself() {
    let (meta, input, expected) = two_frame_capture();
    let report = compare_video(&input, &expected, &meta, BorderMode::Exclude).unwrap();
    assert!(report.passed, "{}", report.summary());
    assert_eq!(report.total_samples, 2 * 6 * 14);
    assert_eq!((report.valid_width, report.valid_height), (14, 6));
    assert!(report.summary().ends_with("Status: PASS"));
    assert!(report.summary().contains("PSNR             : inf"));
}

#[test]
fn mismatch_in_second_frame_is_located() {
    let (meta, input, mut actual) = two_frame_capture();
    actual[84 + 5] ^= 0x0800;
    let report = compare_video(&input, &actual, &meta, BorderMode::Exclude).unwrap();
    assert!(!report.passed);
    assert_eq!(report.mismatches, 1);
    assert_eq!(report.first_mismatch, Some(89));
    assert!(report.summary().ends_with("Status: FAIL"));
    assert!(report.summary().contains("First mismatch   : sample 89"));
}

#[test]
fn frames_are_simulated_independently() {
    let (meta, input, _) = two_frame_capture();
    let stream = expected_stream(&input, &meta, BorderMode::Exclude).unwrap();
    let (_, first) = golden(16, 8, 1);
    let (_, second) = golden(16, 8, 2);
    assert_eq!(&stream[..84], &first[..]);
    assert_eq!(&stream[84..], &second[..]);
}

#[test]
fn wrap_mode_expects_one_more_column() {
    let (meta, input, expected) = two_frame_capture();
    let stream = expected_stream(&input, &meta, BorderMode::Wrap).unwrap();
    assert_eq!(stream.len(), 2 * 6 * 15);

    // Every wrap-mode row starts with the excluded-border row.
    assert_eq!(&stream[..14], &expected[..14]);

    let err = compare_video(&input, &expected, &meta, BorderMode::Wrap).unwrap_err();
    assert!(matches!(err, Error::StreamLength { .. }));
}

#[test]
fn input_must_hold_whole_frames() {
    let (meta, input, expected) = two_frame_capture();
    let err = compare_video(&input[1..], &expected, &meta, BorderMode::Exclude).unwrap_err();
    assert!(matches!(
        err,
        Error::StreamLength {
            expected: 256,
            actual: 255,
            ..
        }
    ));
}

#[test]
fn report_serialises_to_toml() {
    let (meta, input, expected) = two_frame_capture();
    let report = compare_video(&input, &expected, &meta, BorderMode::Exclude).unwrap();
    let text = report.to_toml().unwrap();
    let table: toml::Table = toml::from_str(&text).unwrap();
    assert_eq!(table["frames"].as_integer(), Some(2));
    assert_eq!(table["border"].as_str(), Some("exclude"));
    assert_eq!(table["passed"].as_bool(), Some(true));
    assert!(!table.contains_key("psnr_db"));
    assert!(!table.contains_key("first_mismatch"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports").join("compare.toml");
    report.write(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
}
