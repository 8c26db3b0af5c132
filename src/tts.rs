use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use rusoto_core::{credential, request, Region};
use rusoto_polly::{DescribeVoicesInput, Polly, PollyClient, SynthesizeSpeechInput, Voice};
use std::{convert::TryFrom, path::Path};
use tokio::fs::{self, File};
use tokio::prelude::*;

/// Polly output format and sample rate: 16-bit little-endian mono PCM at 8kHz.
const OUTPUT_FORMAT: &str = "pcm";
const SAMPLE_RATE: &str = "8000";

/// Something that turns text into raw PCM audio.
#[async_trait]
pub trait Synthesizer {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes>;
}

pub struct TTS {
    polly_client: PollyClient,
    use_neural: bool,
}

#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Clone)]
pub struct TTSVoice {
    pub id: String,
    pub gender: String,
    pub language: String,
    pub code: String,
    pub neural: bool,
}

impl TryFrom<Voice> for TTSVoice {
    type Error = anyhow::Error;

    fn try_from(v: Voice) -> anyhow::Result<Self> {
        let missing = |field: &str| anyhow::anyhow!("Polly voice is missing its {}", field);
        let neural = v
            .supported_engines
            .unwrap_or_default()
            .iter()
            .any(|e| e.eq_ignore_ascii_case("neural"));
        Ok(TTSVoice {
            id: v.id.ok_or_else(|| missing("id"))?,
            gender: v.gender.ok_or_else(|| missing("gender"))?,
            language: v.language_name.ok_or_else(|| missing("language name"))?,
            code: v.language_code.ok_or_else(|| missing("language code"))?,
            neural,
        })
    }
}

impl TTS {
    /// Credentials come from the default provider chain and the region from
    /// `AWS_DEFAULT_REGION`/`AWS_REGION`, falling back to us-east-1.
    pub fn new(use_neural: bool) -> anyhow::Result<TTS> {
        let dispatcher = request::HttpClient::new()?;
        let creds = credential::ChainProvider::new();
        let client = PollyClient::new_with(dispatcher, creds, Region::default());
        Ok(TTS {
            polly_client: client,
            use_neural,
        })
    }

    pub async fn list_voices(&self, language: Option<String>) -> anyhow::Result<Vec<TTSVoice>> {
        let input = DescribeVoicesInput {
            engine: None,
            include_additional_language_codes: Some(false),
            language_code: language,
            next_token: None,
        };
        let request_result = self.polly_client.describe_voices(input).await?;
        match request_result.voices {
            Some(voices) => voices.into_iter().map(TTSVoice::try_from).collect(),
            None => anyhow::bail!("No voices returned"),
        }
    }
}

#[async_trait]
impl Synthesizer for TTS {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes> {
        let input = SynthesizeSpeechInput {
            engine: if self.use_neural {
                Some("neural".to_string())
            } else {
                Some("standard".to_string())
            },
            language_code: None,
            lexicon_names: None,
            output_format: OUTPUT_FORMAT.to_string(),
            sample_rate: Some(SAMPLE_RATE.to_string()),
            speech_mark_types: None,
            text: text.to_string(),
            text_type: None,
            voice_id: voice_id.to_string(),
        };
        tracing::debug!(voice = voice_id, neural = self.use_neural, "requesting speech");
        let result = self
            .polly_client
            .synthesize_speech(input)
            .await
            .map_err(|e| Error::SynthesisFailed(e.to_string()))?;
        match result.audio_stream {
            Some(bytes) if !bytes.is_empty() => Ok(bytes),
            _ => Err(Error::SynthesisFailed("Polly returned no audio".to_string())),
        }
    }
}

/// Synthesizes `text` and stores the raw audio at `path`. A partially written
/// file is removed before the error is returned.
pub async fn synthesize_to_file<S>(
    synthesizer: &S,
    text: &str,
    voice_id: &str,
    path: &Path,
) -> Result<()>
where
    S: Synthesizer + ?Sized,
{
    let audio = synthesizer.synthesize(text, voice_id).await?;
    if let Err(e) = write_audio(path, &audio).await {
        if path.exists() {
            if let Err(remove_err) = fs::remove_file(path).await {
                tracing::warn!(
                    "Could not remove partial file {}: {}",
                    path.display(),
                    remove_err
                );
            }
        }
        return Err(e.into());
    }
    tracing::debug!("Wrote {} bytes to {}", audio.len(), path.display());
    Ok(())
}

async fn write_audio(path: &Path, audio: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path).await?;
    file.write_all(audio).await?;
    // tokio hands writes to a background task; make sure they land before ffmpeg reads the file.
    file.flush().await?;
    Ok(())
}
