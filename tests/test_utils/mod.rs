// tests/test_utils/mod.rs
//
// Shared fixtures: synthetic signals written to WAV with hound inside
// unique temporary directories.

#![allow(dead_code)]

use hound::{SampleFormat, WavSpec, WavWriter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const SAMPLE_RATE: u32 = 16000;

/// Temporary directory removed on drop
pub struct TestDir {
    path: PathBuf,
}

impl TestDir {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("voicecheckr-{}-{}", name, Uuid::new_v4()));
        fs::create_dir_all(&path).expect("Failed to create test directory");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path inside the directory; intermediate directories are created
    pub fn join(&self, name: &str) -> PathBuf {
        let path = self.path.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        path
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

pub fn sine(freq: f64, len: usize, amplitude: f64) -> Vec<f64> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq * i as f64 / SAMPLE_RATE as f64).sin())
        .collect()
}

/// Uniform white noise rescaled to the requested RMS
pub fn white_noise(len: usize, seed: u64, target_rms: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let raw: Vec<f64> = (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let scale = target_rms / rms(&raw).max(1e-12);
    raw.iter().map(|s| s * scale).collect()
}

pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
}

/// 16-bit PCM; every sample is repeated on `channels` channels
pub fn write_wav_i16(path: &Path, samples: &[f64], channels: u16) {
    let spec = WavSpec {
        channels,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("Failed to create wav");
    for &s in samples {
        let value = (s.clamp(-1.0, 1.0) * i16::MAX as f64).round() as i16;
        for _ in 0..channels {
            writer.write_sample(value).expect("Failed to write sample");
        }
    }
    writer.finalize().expect("Failed to finalize wav");
}

/// 16-bit stereo PCM from separate left/right channels
pub fn write_wav_i16_stereo(path: &Path, left: &[i16], right: &[i16]) {
    let spec = WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("Failed to create wav");
    for (&l, &r) in left.iter().zip(right) {
        writer.write_sample(l).expect("Failed to write sample");
        writer.write_sample(r).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize wav");
}

/// 32-bit float mono
pub fn write_wav_f32(path: &Path, samples: &[f64]) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).expect("Failed to create wav");
    for &s in samples {
        writer.write_sample(s as f32).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize wav");
}

/// Run the compiled CLI with the given arguments
pub fn run_voicecheckr<I, S>(args: I) -> std::process::Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    std::process::Command::new(env!("CARGO_BIN_EXE_voicecheckr"))
        .args(args)
        .env_remove("VOICECHECKR_STATS")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute voicecheckr")
}
