use std::io::Cursor;

use hound::SampleFormat;

use super::interface::TranscribeError;

/// 16-bit PCM pulled out of a WAV upload
#[derive(Debug, Clone)]
pub struct PcmAudio {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved little-endian i16 samples
    pub pcm: Vec<u8>,
}

impl PcmAudio {
    pub fn duration_ms(&self) -> u64 {
        let frames = self.pcm.len() as u64 / 2 / u64::from(self.channels.max(1));
        frames * 1000 / u64::from(self.sample_rate.max(1))
    }
}

/// Read the WAV header and samples. Only 16-bit integer PCM is accepted,
/// which is what the browser recorder produces.
pub fn inspect(bytes: &[u8]) -> Result<PcmAudio, TranscribeError> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| TranscribeError::InvalidAudio(format!("WAV decode error: {}", e)))?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(TranscribeError::InvalidAudio(format!(
            "expected 16-bit PCM, got {}-bit {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    let mut pcm = Vec::with_capacity(reader.len() as usize * 2);
    for sample in reader.samples::<i16>() {
        let sample = sample
            .map_err(|e| TranscribeError::InvalidAudio(format!("WAV decode error: {}", e)))?;
        pcm.extend_from_slice(&sample.to_le_bytes());
    }

    if pcm.is_empty() {
        return Err(TranscribeError::InvalidAudio("no audio samples".to_string()));
    }

    Ok(PcmAudio {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        pcm,
    })
}

#[cfg(test)]
pub(crate) fn encode_wav(samples: &[i16], sample_rate: u32, bits_per_sample: u16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample,
        sample_format: SampleFormat::Int,
    };
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut buffer, spec).unwrap();
        for &sample in samples {
            if bits_per_sample == 8 {
                writer.write_sample((sample >> 8) as i8).unwrap();
            } else {
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }
    buffer.into_inner()
}
