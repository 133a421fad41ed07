use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Writes a minimal mono 16-bit PCM WAV file. No external WAV crate is
/// pulled in for a 44-byte header plus a sample dump.
pub fn write_mono_pcm16(path: &Path, sample_rate: u32, samples: &[i16]) -> io::Result<()> {
    let mut file = File::create(path)?;

    let bits_per_sample: u16 = 16;
    let channels: u16 = 1;
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = channels * (bits_per_sample / 8);
    let data_len = (samples.len() * 2) as u32;
    let riff_len = 36 + data_len;

    file.write_all(b"RIFF")?;
    file.write_all(&riff_len.to_le_bytes())?;
    file.write_all(b"WAVE")?;

    file.write_all(b"fmt ")?;
    file.write_all(&16u32.to_le_bytes())?; // fmt chunk size
    file.write_all(&1u16.to_le_bytes())?; // PCM
    file.write_all(&channels.to_le_bytes())?;
    file.write_all(&sample_rate.to_le_bytes())?;
    file.write_all(&byte_rate.to_le_bytes())?;
    file.write_all(&block_align.to_le_bytes())?;
    file.write_all(&bits_per_sample.to_le_bytes())?;

    file.write_all(b"data")?;
    file.write_all(&data_len.to_le_bytes())?;
    for sample in samples {
        file.write_all(&sample.to_le_bytes())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_a_header_sized_file_for_empty_input() {
        let dir = std::env::temp_dir().join(format!("drm-cli-wav-test-{}", std::process::id()));
        write_mono_pcm16(&dir, 48_000, &[]).unwrap();
        let metadata = std::fs::metadata(&dir).unwrap();
        assert_eq!(metadata.len(), 44);
        let _ = std::fs::remove_file(&dir);
    }
}
