//! Joining per-chunk audio into one file.
//!
//! ffmpeg's concat demuxer with stream copy is tried first. Without it, WAV
//! parts are merged sample by sample with hound, and MP3 parts are appended
//! byte for byte. The byte join is not a valid single MP3 stream, so the
//! result is flagged as degraded.

use crate::domain::audio::AudioFormat;
use hound::{SampleFormat, WavReader, WavWriter};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use tokio::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatMethod {
    Single,
    Ffmpeg,
    WavMerge,
    RawBytes,
}

#[derive(Debug, Clone)]
pub struct ConcatenatedAudio {
    pub bytes: Vec<u8>,
    pub method: ConcatMethod,
}

impl ConcatenatedAudio {
    /// Raw byte concatenation of compressed parts
    pub fn is_degraded(&self) -> bool {
        self.method == ConcatMethod::RawBytes
    }
}

#[derive(Debug, Clone)]
pub struct AudioConcatenator {
    ffmpeg: Option<PathBuf>,
}

impl AudioConcatenator {
    /// Use the given ffmpeg executable, or none to skip straight to the fallbacks
    pub fn new(ffmpeg: Option<PathBuf>) -> Self {
        Self { ffmpeg }
    }

    pub fn with_system_ffmpeg() -> Self {
        Self::new(which::which("ffmpeg").ok())
    }

    pub fn without_ffmpeg() -> Self {
        Self::new(None)
    }

    pub async fn concat(&self, parts: Vec<Vec<u8>>, format: AudioFormat) -> ConcatenatedAudio {
        if parts.len() == 1 {
            let bytes = parts.into_iter().next().unwrap_or_default();
            return ConcatenatedAudio {
                bytes,
                method: ConcatMethod::Single,
            };
        }

        if let Some(ffmpeg) = &self.ffmpeg {
            match concat_with_ffmpeg(ffmpeg, &parts, format).await {
                Ok(bytes) => {
                    tracing::info!(
                        part_count = parts.len(),
                        audio_size = bytes.len(),
                        "Audio parts joined with ffmpeg"
                    );
                    return ConcatenatedAudio {
                        bytes,
                        method: ConcatMethod::Ffmpeg,
                    };
                }
                Err(e) => {
                    tracing::warn!(error = %e, part_count = parts.len(), "ffmpeg concat failed");
                }
            }
        }

        if format == AudioFormat::Wav {
            match merge_wav(&parts) {
                Ok(bytes) => {
                    return ConcatenatedAudio {
                        bytes,
                        method: ConcatMethod::WavMerge,
                    }
                }
                Err(e) => tracing::warn!(error = %e, "WAV merge failed"),
            }
        }

        tracing::warn!(
            part_count = parts.len(),
            format = format.extension(),
            "Falling back to raw byte concatenation"
        );
        ConcatenatedAudio {
            bytes: parts.concat(),
            method: ConcatMethod::RawBytes,
        }
    }
}

/// Runs `ffmpeg -f concat -c copy` over temp files that are removed on return
async fn concat_with_ffmpeg(
    ffmpeg: &PathBuf,
    parts: &[Vec<u8>],
    format: AudioFormat,
) -> anyhow::Result<Vec<u8>> {
    let workdir = tempfile::tempdir()?;
    let extension = format.extension();
    let list_path = workdir.path().join("parts.txt");
    let output_path = workdir.path().join(format!("combined.{}", extension));

    let mut list = std::fs::File::create(&list_path)?;
    for (index, part) in parts.iter().enumerate() {
        let part_path = workdir.path().join(format!("part_{}.{}", index, extension));
        tokio::fs::write(&part_path, part).await?;
        writeln!(list, "file '{}'", part_path.display())?;
    }
    list.flush()?;
    drop(list);

    let output = Command::new(ffmpeg)
        .args(["-y", "-f", "concat", "-safe", "0", "-i"])
        .arg(&list_path)
        .args(["-c", "copy"])
        .arg(&output_path)
        .output()
        .await?;

    if !output.status.success() {
        anyhow::bail!(
            "ffmpeg exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(tokio::fs::read(&output_path).await?)
}

/// Append the samples of every part to one WAV. All parts must share one WavSpec.
pub fn merge_wav(parts: &[Vec<u8>]) -> anyhow::Result<Vec<u8>> {
    let first = parts
        .first()
        .ok_or_else(|| anyhow::anyhow!("no parts to merge"))?;
    let spec = WavReader::new(Cursor::new(first.as_slice()))?.spec();
    if spec.sample_format != SampleFormat::Int {
        anyhow::bail!("only integer PCM can be merged");
    }

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for part in parts {
            let mut reader = WavReader::new(Cursor::new(part.as_slice()))?;
            if reader.spec() != spec {
                anyhow::bail!("parts have different WAV formats");
            }
            for sample in reader.samples::<i32>() {
                writer.write_sample(sample?)?;
            }
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
