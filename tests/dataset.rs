use std::fs;
use std::path::Path;

use coughalyzer::dataset::{self, wav, WaveDataset};
use coughalyzer::features::FeatureExtractor;
use coughalyzer::normalize::normalize;
use coughalyzer::{CoughCategory, CoughError, PcmFormat, PcmSamples, SampleFormat, Sex};

fn noisy_cough(len: usize, seed: u32) -> Vec<i32> {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    (0..len)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let noise = (state % 2001) as f64 - 1000.0;
            let envelope = (-(i as f64) / (len as f64 / 4.0)).exp();
            ((noise * 8.0 + 3000.0 * (i as f64 * 0.07).sin()) * envelope) as i32
        })
        .collect()
}

fn write_clip(dir: &Path, name: &str, sample_rate: u32, format: PcmFormat, samples: PcmSamples) {
    fs::create_dir_all(dir).unwrap();
    wav::write_wav(dir.join(name), sample_rate, format, &samples).unwrap();
}

#[test]
fn single_covid_clip_flows_to_fixed_mfcc_shape() {
    let root = tempfile::tempdir().unwrap();
    write_clip(
        &root.path().join("male covid"),
        "a.wav",
        8_000,
        PcmFormat::mono_i16(),
        PcmSamples::Int(noisy_cough(1_000, 1)),
    );

    let records = WaveDataset::new(root.path()).load().unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.name(), "a");
    assert_eq!(record.sex(), Some(Sex::Male));
    assert_eq!(record.category(), CoughCategory::Covid);
    assert_eq!(record.sample_rate(), 8_000);
    assert_eq!(record.frame_count(), 1_000);

    let mfcc = FeatureExtractor::new().compute_mfcc(record).unwrap();
    assert_eq!(mfcc.nrows(), 40);
    assert!(mfcc.ncols() >= 1);

    let normalized = normalize(&mfcc, 150);
    assert_eq!(normalized.dim(), (40, 150));
}

#[test]
fn save_then_load_reproduces_samples_and_labels() {
    let source = tempfile::tempdir().unwrap();
    let stereo = PcmFormat {
        channels: 2,
        ..PcmFormat::mono_i16()
    };
    let float = PcmFormat {
        channels: 1,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    write_clip(
        &source.path().join("female wet"),
        "w1.wav",
        44_100,
        stereo,
        PcmSamples::Int(noisy_cough(600, 2)),
    );
    write_clip(
        &source.path().join("male whistling"),
        "h1.wav",
        11_025,
        PcmFormat::mono_i16(),
        PcmSamples::Int(noisy_cough(300, 3)),
    );
    write_clip(
        &source.path().join("female normal"),
        "n1.wav",
        16_000,
        float,
        PcmSamples::Float(vec![0.5, -0.25, 0.125, 1.0]),
    );

    let original = dataset::load(source.path()).unwrap();
    assert_eq!(original.len(), 3);

    let destination = tempfile::tempdir().unwrap();
    dataset::save(&original, destination.path()).unwrap();
    let reloaded = dataset::load(destination.path()).unwrap();

    assert_eq!(original, reloaded);
    assert!(destination.path().join("female wet").join("w1.wav").is_file());
}

#[test]
fn saved_files_are_byte_identical_for_pcm16() {
    let source = tempfile::tempdir().unwrap();
    write_clip(
        &source.path().join("male normal"),
        "x.wav",
        8_000,
        PcmFormat::mono_i16(),
        PcmSamples::Int(noisy_cough(257, 4)),
    );
    let records = dataset::load(source.path()).unwrap();
    let destination = tempfile::tempdir().unwrap();
    dataset::save(&records, destination.path()).unwrap();

    let before = fs::read(source.path().join("male normal").join("x.wav")).unwrap();
    let after = fs::read(destination.path().join("male normal").join("x.wav")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn corrupt_wav_surfaces_as_io_failure() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("female covid");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("broken.wav"), b"RIFF\x00\x00").unwrap();

    let err = dataset::load(root.path()).unwrap_err();
    assert!(err.is_io(), "unexpected error {err:?}");
}

#[test]
fn ambiguous_category_directory_fails_fast() {
    let root = tempfile::tempdir().unwrap();
    write_clip(
        &root.path().join("male wet normal"),
        "a.wav",
        8_000,
        PcmFormat::mono_i16(),
        PcmSamples::Int(vec![1, 2, 3]),
    );
    assert!(matches!(
        dataset::load(root.path()),
        Err(CoughError::LabelResolution { matches: 2, .. })
    ));
}
