//! Mono WAV reading and writing on top of `hound`.

use std::io::{Read, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::Result;

/// Decoded audio: the first channel of a WAV file.
#[derive(Debug, Clone, PartialEq)]
pub struct WavData {
    /// Samples of the first channel, scaled to [-1.0, 1.0].
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Channel count of the source file.
    pub channels: u16,
}

impl WavData {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Reads a WAV stream, keeping only the first channel.
///
/// Integer formats of any bit depth are scaled to [-1.0, 1.0]; float
/// files are taken as is.
pub fn read_wav<R: Read>(reader: R) -> Result<WavData> {
    let reader = WavReader::new(reader)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let samples = interleaved.into_iter().step_by(channels).collect();
    Ok(WavData {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Reads a WAV file from disk. See [`read_wav`].
pub fn read_wav_file(path: impl AsRef<Path>) -> Result<WavData> {
    let file = std::io::BufReader::new(std::fs::File::open(path)?);
    read_wav(file)
}

fn float_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    }
}

/// Writes mono 32-bit float WAV data.
pub fn write_wav_float<W: Write + Seek>(writer: W, samples: &[f32], sample_rate: u32) -> Result<()> {
    let mut writer = WavWriter::new(writer, float_spec(sample_rate))?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Writes a mono 32-bit float WAV file, replacing any existing file.
pub fn write_wav_file_float(path: impl AsRef<Path>, samples: &[f32], sample_rate: u32) -> Result<()> {
    let mut writer = WavWriter::create(path, float_spec(sample_rate))?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}
