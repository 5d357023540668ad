use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Appends mono float32 PCM frames to a WAV file.
///
/// This is the engine's mirror target: whatever goes to the output device
/// also lands here, one `append` per rendered buffer. `finalize` patches
/// the WAV header; until then the file on disk is incomplete.
pub struct SampleWriter {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
}

impl SampleWriter {
    pub fn create(path: impl AsRef<Path>, sample_rate: u32) -> Result<Self, hound::Error> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };

        Ok(Self {
            writer: Some(hound::WavWriter::create(path, spec)?),
        })
    }

    /// Append one buffer of samples. After `finalize` this is a no-op.
    pub fn append(&mut self, samples: &[f32]) -> Result<(), hound::Error> {
        if let Some(writer) = self.writer.as_mut() {
            for &sample in samples {
                writer.write_sample(sample)?;
            }
        }
        Ok(())
    }

    /// Flush and patch the WAV header. Idempotent.
    pub fn finalize(&mut self) -> Result<(), hound::Error> {
        match self.writer.take() {
            Some(writer) => writer.finalize(),
            None => Ok(()),
        }
    }
}
