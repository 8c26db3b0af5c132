use crate::error::{Error, Result};
use async_trait::async_trait;
use std::{
    path::{Path, PathBuf},
    process::Stdio,
};
use tokio::process::Command;

// 3CX wants mono 8kHz 16-bit PCM WAV, which is also what Polly hands back as raw PCM.
const SAMPLE_FORMAT: &str = "s16le";
const CODEC: &str = "pcm_s16le";
const SAMPLE_RATE: &str = "8000";
const CHANNELS: &str = "1";

/// Turns the raw synthesized audio at `input` into a playable file at `output`.
#[async_trait]
pub trait Converter {
    async fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Ffmpeg {
            program: program.into(),
        }
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-hide_banner")
            .args(&["-f", SAMPLE_FORMAT, "-ar", SAMPLE_RATE, "-ac", CHANNELS, "-i"])
            .arg(input)
            .args(&["-acodec", CODEC, "-ar", SAMPLE_RATE, "-ac", CHANNELS, "-y"])
            .arg(output)
            .stdin(Stdio::null());
        cmd
    }
}

#[async_trait]
impl Converter for Ffmpeg {
    async fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let program = self.program.display().to_string();
        tracing::debug!("Running {} on {}", program, input.display());

        let result = self
            .command(input, output)
            .output()
            .await
            .map_err(|source| Error::ToolMissing {
                program: program.clone(),
                source,
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::ConversionFailed(format!(
                "{} exited with {}: {}",
                program,
                result.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
