use crate::tts::TTS;
use anyhow::Result;
use itertools::Itertools;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(no_version, about = "List the AWS Polly voices usable with --voice")]
pub struct Opts {
    #[structopt(short, long, help = "Only show voices for this language code (e.g. en-US)")]
    pub language: Option<String>,
}

pub async fn exec(tts: TTS, options: Opts) -> Result<()> {
    let voices = tts
        .list_voices(options.language)
        .await?
        .into_iter()
        .map(|v| ((v.code.clone(), v.language.clone()), v))
        .into_group_map();

    for ((code, language), mut voices) in voices.into_iter().sorted_by(|a, b| a.0.cmp(&b.0)) {
        voices.sort_by(|a, b| a.id.cmp(&b.id));
        println!("\n===== {} ({})\n", language, code);
        for voice in voices {
            let gender = match voice.gender.to_lowercase().as_str() {
                "male" => "♂",
                "female" => "♀",
                _ => "?",
            };
            let engines = if voice.neural {
                "standard, neural (--neural)"
            } else {
                "standard"
            };
            println!("{} {:15} {}", gender, voice.id, engines);
        }
    }
    Ok(())
}
