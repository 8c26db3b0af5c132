use crate::{
    error::{Error, Result},
    generate::{GenerateOptions, Person},
    greeting::{GreetingTemplate, DEFAULT_GREETING},
    list_voices,
};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "voicemail-gen",
    about = "Generate 3CX voicemail greetings with AWS Polly TTS",
    after_help = "EXAMPLES:
    Generate greetings for all users in a CSV file:
        voicemail-gen -i users.csv

    Generate a greeting for one user:
        voicemail-gen -f John -l Doe

    Use a custom greeting:
        voicemail-gen -i users.csv -g \"Hi, this is {firstname}. Leave a message.\"

    Use a different voice:
        voicemail-gen -f Jane -l Smith -v Matthew"
)]
pub struct Opts {
    #[structopt(
        short,
        long,
        parse(from_os_str),
        help = "CSV file with firstname,lastname columns (first line is skipped)"
    )]
    pub input: Option<PathBuf>,

    #[structopt(short, long, help = "First name for a single user")]
    pub firstname: Option<String>,

    #[structopt(short, long, help = "Last name for a single user")]
    pub lastname: Option<String>,

    #[structopt(
        short,
        long,
        help = "Greeting template, use {firstname} and {lastname} placeholders [default: \"You have reached {firstname} {lastname}. Please leave a message after the tone.\"]"
    )]
    pub greeting: Option<String>,

    #[structopt(
        short,
        long,
        parse(from_os_str),
        default_value = "wav_output_3cx",
        help = "Directory where WAV files are written"
    )]
    pub output: PathBuf,

    #[structopt(short, long, default_value = "Joanna", help = "Amazon Polly voice ID")]
    pub voice: String,

    #[structopt(long, help = "Use the neural voice (voice must support it)")]
    pub neural: bool,

    #[structopt(long, help = "TSV instead of CSV")]
    pub tabs: bool,

    #[structopt(
        long,
        parse(from_os_str),
        default_value = "ffmpeg",
        help = "ffmpeg executable used for conversion"
    )]
    pub ffmpeg: PathBuf,

    #[structopt(long, help = "Enable debug logging")]
    pub verbose: bool,

    #[structopt(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    ListVoices(list_voices::Opts),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Single(Person),
    Batch { source: PathBuf, tabs: bool },
}

/// Validated generation settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub job: Job,
    pub generate: GenerateOptions,
    pub neural: bool,
    pub ffmpeg: PathBuf,
}

impl Settings {
    pub fn from_opts(opts: Opts) -> Result<Self> {
        let firstname = non_blank(opts.firstname, "--firstname")?;
        let lastname = non_blank(opts.lastname, "--lastname")?;

        let job = match (opts.input, firstname, lastname) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                return Err(Error::configuration(
                    "--input cannot be combined with --firstname/--lastname",
                ))
            }
            (Some(source), None, None) => Job::Batch {
                source,
                tabs: opts.tabs,
            },
            (None, Some(first), Some(last)) => Job::Single(Person::new(first, last)),
            (None, Some(_), None) => {
                return Err(Error::configuration(
                    "--lastname required when using --firstname",
                ))
            }
            (None, None, Some(_)) => {
                return Err(Error::configuration(
                    "--firstname required when using --lastname",
                ))
            }
            (None, None, None) => {
                return Err(Error::configuration(
                    "either --input or both --firstname and --lastname are required",
                ))
            }
        };

        let greeting =
            GreetingTemplate::parse(opts.greeting.as_deref().unwrap_or(DEFAULT_GREETING))?;

        Ok(Settings {
            job,
            generate: GenerateOptions {
                greeting,
                output_dir: opts.output,
                voice: opts.voice,
            },
            neural: opts.neural,
            ffmpeg: opts.ffmpeg,
        })
    }
}

fn non_blank(value: Option<String>, flag: &str) -> Result<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(Error::configuration(format!("{} must not be empty", flag)))
        }
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(args: &[&str]) -> Result<Settings> {
        let argv = std::iter::once("voicemail-gen").chain(args.iter().copied());
        let opts = Opts::from_iter_safe(argv).expect("arguments should parse");
        Settings::from_opts(opts)
    }

    fn config_message(args: &[&str]) -> String {
        match settings(args) {
            Err(Error::Configuration { message }) => message,
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn single_user_with_defaults() {
        let settings = settings(&["--firstname", "John", "--lastname", "Doe"]).unwrap();

        assert_eq!(settings.job, Job::Single(Person::new("John", "Doe")));
        assert_eq!(settings.generate.output_dir, PathBuf::from("wav_output_3cx"));
        assert_eq!(settings.generate.voice, "Joanna");
        assert_eq!(settings.ffmpeg, PathBuf::from("ffmpeg"));
        assert!(!settings.neural);
        assert_eq!(
            settings.generate.greeting.render("John", "Doe"),
            "You have reached John Doe. Please leave a message after the tone."
        );
    }

    #[test]
    fn batch_with_overrides() {
        let settings = settings(&[
            "-i",
            "users.tsv",
            "--tabs",
            "-o",
            "prompts",
            "-v",
            "Matthew",
            "--neural",
            "-g",
            "Hi, this is {firstname}.",
        ])
        .unwrap();

        assert_eq!(
            settings.job,
            Job::Batch {
                source: PathBuf::from("users.tsv"),
                tabs: true,
            }
        );
        assert_eq!(settings.generate.output_dir, PathBuf::from("prompts"));
        assert_eq!(settings.generate.voice, "Matthew");
        assert!(settings.neural);
        assert_eq!(settings.generate.greeting.render("Ann", "Lee"), "Hi, this is Ann.");
    }

    #[test]
    fn nothing_to_do_is_an_error() {
        assert!(config_message(&[]).contains("either --input"));
    }

    #[test]
    fn incomplete_name_pair_is_an_error() {
        assert!(config_message(&["-f", "John"]).contains("--lastname required"));
        assert!(config_message(&["-l", "Doe"]).contains("--firstname required"));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(config_message(&["-f", "  ", "-l", "Doe"]).contains("--firstname"));
    }

    #[test]
    fn input_and_names_are_mutually_exclusive() {
        assert!(config_message(&["-i", "users.csv", "-f", "John", "-l", "Doe"])
            .contains("cannot be combined"));
    }

    #[test]
    fn bad_greeting_is_rejected_up_front() {
        assert!(config_message(&["-f", "John", "-l", "Doe", "-g", "Hello {name}"])
            .contains("{name}"));
    }

    #[test]
    fn list_voices_subcommand() {
        let opts =
            Opts::from_iter_safe(&["voicemail-gen", "list-voices", "-l", "en-GB"]).unwrap();
        match opts.command {
            Some(Command::ListVoices(list)) => {
                assert_eq!(list.language.as_deref(), Some("en-GB"))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
