use crate::config::{Command, Job, Opts, Settings};
use crate::convert::Ffmpeg;
use crate::generate::Generator;
use crate::tts::TTS;
use anyhow::Result;
use structopt::StructOpt;

mod config;
mod convert;
mod error;
mod generate;
mod greeting;
mod list_voices;
mod logger;
mod tts;

async fn main_impl(mut opts: Opts) -> Result<()> {
    if let Some(Command::ListVoices(list_opts)) = opts.command.take() {
        return list_voices::exec(TTS::new(false)?, list_opts).await;
    }

    let settings = Settings::from_opts(opts)?;
    tracing::debug!("Settings: {:?}", settings);

    let tts = TTS::new(settings.neural)?;
    let generator = Generator::new(tts, Ffmpeg::new(settings.ffmpeg), settings.generate);
    let summary = match &settings.job {
        Job::Single(person) => generator.generate_single(person).await?,
        Job::Batch { source, tabs } => generator.generate_batch(source, *tabs).await?,
    };

    if summary.skipped > 0 {
        tracing::info!(
            "Skipped {} rows without a first and last name",
            summary.skipped
        );
    }
    println!("\nCompleted: {}", summary);
    Ok(())
}

#[tokio::main(basic_scheduler)]
async fn main() {
    let opts = Opts::from_args();
    logger::init_cli_logger(opts.verbose);
    if let Err(e) = main_impl(opts).await {
        tracing::debug!("Fatal: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
