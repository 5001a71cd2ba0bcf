// src/core/decoder.rs
//
// Audio loading: WAV through hound (native sample format), MP3 through
// Symphonia. Every clip is collapsed to a mono waveform at its native rate.

use hound::{SampleFormat, WavReader};
use log::debug;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use std::fs::File;
use std::path::Path;

use crate::error::{Result, VoiceCheckError};

/// Container formats accepted by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    /// Resolve the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "wav" => Ok(AudioFormat::Wav),
            "mp3" => Ok(AudioFormat::Mp3),
            "" => Err(VoiceCheckError::UnsupportedFormat("(no extension)".to_string())),
            other => Err(VoiceCheckError::UnsupportedFormat(format!(".{}", other))),
        }
    }

    /// True when the path carries a loadable extension
    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }
}

/// Mono waveform with its native sample rate
#[derive(Debug, Clone)]
pub struct Waveform {
    /// Mono samples, nominally in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Waveform {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Load an audio file as a mono waveform
pub fn load_audio(path: &Path) -> Result<Waveform> {
    let waveform = match AudioFormat::from_path(path)? {
        AudioFormat::Wav => load_wav(path)?,
        AudioFormat::Mp3 => load_mp3(path)?,
    };

    debug!(
        "Loaded {} ({} samples @ {} Hz, {:.2}s)",
        path.display(),
        waveform.len(),
        waveform.sample_rate,
        waveform.duration_secs()
    );

    Ok(waveform)
}

/// WAV: integer PCM is averaged to mono then peak-normalised, float PCM
/// passes through unscaled.
fn load_wav(path: &Path) -> Result<Waveform> {
    let mut reader = WavReader::open(path).map_err(|e| VoiceCheckError::decode(path, e))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    if channels == 0 {
        return Err(VoiceCheckError::decode(path, "file reports 0 audio channels"));
    }

    let samples = match spec.sample_format {
        SampleFormat::Float => {
            let interleaved = reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| VoiceCheckError::decode(path, e))?;
            downmix(&interleaved, channels)
        }
        SampleFormat::Int => {
            let interleaved: Vec<f64> = reader
                .samples::<i32>()
                .map(|s| s.map(f64::from))
                .collect::<std::result::Result<Vec<f64>, _>>()
                .map_err(|e| VoiceCheckError::decode(path, e))?;
            let mono = downmix(&interleaved, channels);
            normalize_peak(&mono)
        }
    };

    Ok(Waveform {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// MP3: decoded to f32 at the stream's native rate
fn load_mp3(path: &Path) -> Result<Waveform> {
    let file = File::open(path).map_err(|e| VoiceCheckError::decode(path, e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("mp3");

    let mut probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| VoiceCheckError::decode(path, e))?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| VoiceCheckError::decode(path, "no supported audio track found"))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channels = track.codec_params.channels.map(|c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| VoiceCheckError::decode(path, e))?;

    let mut interleaved: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match probed.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(VoiceCheckError::decode(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(buf) => buf,
            // Corrupt frames are skipped, the stream continues
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(VoiceCheckError::decode(path, e)),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            sample_rate.get_or_insert(spec.rate);
            channels.get_or_insert(spec.channels.count());
            sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            interleaved.extend_from_slice(buf.samples());
        }
    }

    if interleaved.is_empty() {
        return Err(VoiceCheckError::decode(path, "no audio samples decoded from file"));
    }

    let sample_rate = sample_rate
        .ok_or_else(|| VoiceCheckError::decode(path, "stream does not specify sample rate"))?;
    let channels = channels.unwrap_or(1).max(1);

    Ok(Waveform {
        samples: downmix(&interleaved, channels),
        sample_rate,
    })
}

/// Average interleaved channels into one
pub fn downmix<T>(interleaved: &[T], channels: usize) -> Vec<T>
where
    T: Copy + Into<f64> + FromF64,
{
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| {
            let sum: f64 = frame.iter().map(|&s| s.into()).sum();
            T::from_f64(sum / channels as f64)
        })
        .collect()
}

/// Divide by the observed peak; an all-zero signal is left as is
pub fn normalize_peak(samples: &[f64]) -> Vec<f32> {
    let peak = samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()));
    if peak == 0.0 {
        return samples.iter().map(|&s| s as f32).collect();
    }
    samples.iter().map(|&s| (s / peak) as f32).collect()
}

/// Conversion back from the f64 accumulator used by [`downmix`]
pub trait FromF64 {
    fn from_f64(value: f64) -> Self;
}

impl FromF64 for f32 {
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl FromF64 for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }
}
