//! WebM → MP4 conversion with ffmpeg

use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start encoder '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("FFmpeg conversion failed: {0}")]
    Encoder(String),
}

/// Turns an input container into an output file
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), MediaError>;
}

/// Encoder arguments: H.264 (slow preset, CRF 18), AAC 320k/48kHz with a
/// band-pass filter, and the moov atom up front for streaming.
pub fn ffmpeg_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), input.into()];
    args.extend(
        [
            "-c:v",
            "libx264",
            "-preset",
            "slow",
            "-crf",
            "18",
            "-c:a",
            "aac",
            "-b:a",
            "320k",
            "-ar",
            "48000",
            "-af",
            "highpass=f=80, lowpass=f=16000",
            "-movflags",
            "+faststart",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(output.into());
    args
}

/// `webcam_recording_YYYYMMDD_HHMMSS.mp4`
pub fn output_filename(at: DateTime<Local>) -> String {
    format!("webcam_recording_{}.mp4", at.format("%Y%m%d_%H%M%S"))
}

/// Runs the `ffmpeg` binary as a child process
pub struct FfmpegTranscoder {
    binary: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), MediaError> {
        tracing::debug!("Running {} on {}", self.binary.display(), input.display());

        let result = tokio::process::Command::new(&self.binary)
            .args(ffmpeg_args(input, output))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| MediaError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        if result.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            let detail = tail.into_iter().rev().collect::<Vec<_>>().join("\n");
            Err(MediaError::Encoder(format!("{}: {}", result.status, detail)))
        }
    }
}

/// Stores uploads in a temp file, transcodes them into `output_dir`
pub struct VideoConverter {
    output_dir: PathBuf,
    transcoder: Arc<dyn Transcoder>,
}

impl VideoConverter {
    pub fn new(output_dir: impl Into<PathBuf>, transcoder: Arc<dyn Transcoder>) -> Self {
        Self {
            output_dir: output_dir.into(),
            transcoder,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if needed
    pub async fn prepare(&self) -> Result<(), MediaError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    /// Temporary `.webm` file an upload is streamed into; removed on drop
    pub fn staging_file(&self) -> Result<NamedTempFile, MediaError> {
        let file = tempfile::Builder::new()
            .prefix("upload_")
            .suffix(".webm")
            .tempfile()?;
        Ok(file)
    }

    /// Transcode a staged upload; returns the generated file name
    pub async fn convert_file(&self, input: &Path) -> Result<String, MediaError> {
        let filename = output_filename(Local::now());
        let output = self.output_dir.join(&filename);

        self.transcoder.transcode(input, &output).await?;
        tracing::info!("Transcoded upload to {}", output.display());
        Ok(filename)
    }
}
