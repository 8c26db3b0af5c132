use crate::{
    convert::Converter,
    error::{Error, Result},
    greeting::GreetingTemplate,
    tts::{synthesize_to_file, Synthesizer},
};
use std::{
    fmt, io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Characters that are not allowed (or not wise) in output file names.
const UNSAFE_FILENAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
}

impl Person {
    pub fn new<F: Into<String>, L: Into<String>>(first_name: F, last_name: L) -> Self {
        Person {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Returns `None` for rows with fewer than two columns or a blank name.
    pub fn from_record(record: &csv::StringRecord) -> Option<Self> {
        let first_name = record.get(0)?.trim();
        let last_name = record.get(1)?.trim();
        if first_name.is_empty() || last_name.is_empty() {
            None
        } else {
            Some(Person::new(first_name, last_name))
        }
    }

    pub fn file_stem(&self) -> String {
        format!("{}_{}", sanitize(&self.first_name), sanitize(&self.last_name))
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || UNSAFE_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} successful, {} failed", self.succeeded, self.failed)
    }
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub greeting: GreetingTemplate,
    pub output_dir: PathBuf,
    pub voice: String,
}

impl GenerateOptions {
    pub fn temp_path(&self, person: &Person) -> PathBuf {
        self.output_dir.join(format!("{}_temp.pcm", person.file_stem()))
    }

    pub fn output_path(&self, person: &Person) -> PathBuf {
        self.output_dir.join(format!("{}.wav", person.file_stem()))
    }
}

pub struct Generator<S, C> {
    synthesizer: S,
    converter: C,
    options: GenerateOptions,
}

impl<S: Synthesizer, C: Converter> Generator<S, C> {
    pub fn new(synthesizer: S, converter: C, options: GenerateOptions) -> Self {
        Generator {
            synthesizer,
            converter,
            options,
        }
    }

    pub async fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.options.output_dir).await?;
        Ok(())
    }

    /// Render, synthesize, convert. The temporary PCM file is removed once
    /// conversion has run, whatever its outcome; a failed conversion also
    /// leaves no WAV behind.
    pub async fn process_person(&self, person: &Person) -> Result<PathBuf> {
        let text = self
            .options
            .greeting
            .render(&person.first_name, &person.last_name);
        let temp_path = self.options.temp_path(person);
        let output_path = self.options.output_path(person);

        tracing::debug!("Greeting for {}: {:?}", person, text);
        synthesize_to_file(&self.synthesizer, &text, &self.options.voice, &temp_path).await?;

        let converted = self.converter.convert(&temp_path, &output_path).await;
        if let Err(e) = fs::remove_file(&temp_path).await {
            tracing::warn!("Could not remove {}: {}", temp_path.display(), e);
        }
        if let Err(e) = converted {
            if output_path.exists() {
                if let Err(remove_err) = fs::remove_file(&output_path).await {
                    tracing::warn!(
                        "Could not remove {}: {}",
                        output_path.display(),
                        remove_err
                    );
                }
            }
            return Err(e);
        }
        Ok(output_path)
    }

    /// Runs one person and records the outcome; errors stop here.
    pub async fn run_person(&self, person: &Person, summary: &mut BatchSummary) {
        println!("Processing: {}", person);
        match self.process_person(person).await {
            Ok(path) => {
                println!("Created: {}", path.display());
                summary.succeeded += 1;
            }
            Err(e) => {
                tracing::debug!("{} failed: {:?}", person, e);
                println!("Failed: {}: {}", person, e);
                summary.failed += 1;
            }
        }
    }

    pub async fn generate_single(&self, person: &Person) -> Result<BatchSummary> {
        self.prepare().await?;
        let mut summary = BatchSummary::default();
        self.run_person(person, &mut summary).await;
        Ok(summary)
    }

    /// Processes every row of `source` in order. The first line is always
    /// treated as a header.
    pub async fn generate_batch(&self, source: &Path, tabs: bool) -> Result<BatchSummary> {
        let reader = reader_builder(tabs)
            .from_path(source)
            .map_err(|e| Error::InputSource {
                path: source.to_path_buf(),
                source: e,
            })?;
        self.prepare().await?;
        self.generate_records(reader, source).await
    }

    /// An I/O error before the first row is fatal. Later ones end the batch
    /// early but keep the counts of rows already processed.
    async fn generate_records<R: io::Read>(
        &self,
        reader: csv::Reader<R>,
        source: &Path,
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();
        for (idx, result) in reader.into_records().enumerate() {
            // Line 1 is the header.
            let line = idx + 2;
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() && idx == 0 => {
                    return Err(Error::InputSource {
                        path: source.to_path_buf(),
                        source: e,
                    })
                }
                Err(e) if e.is_io_error() => {
                    println!("Stopped reading {} at line {}: {}", source.display(), line, e);
                    break;
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable row at line {}: {}", line, e);
                    summary.skipped += 1;
                    continue;
                }
            };
            match Person::from_record(&record) {
                Some(person) => self.run_person(&person, &mut summary).await,
                None => {
                    tracing::debug!("Skipping row at line {}: {:?}", line, record);
                    summary.skipped += 1;
                }
            }
        }
        Ok(summary)
    }
}

fn reader_builder(tabs: bool) -> csv::ReaderBuilder {
    let mut rdr_builder = csv::ReaderBuilder::new();
    rdr_builder.has_headers(true).flexible(true);
    if tabs {
        rdr_builder.delimiter(b'\t');
    }
    rdr_builder
}
