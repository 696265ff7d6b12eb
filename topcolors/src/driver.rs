use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader, LineWriter, Write},
    num::NonZeroUsize,
    path::PathBuf,
    time::Instant,
};

use image::RgbImage;
use rayon::prelude::*;
use topcolors_common::{bin_common::termination, utils::fsutils};

use crate::{
    color::Rgb24,
    fetch::{self, ImageSource},
    histogram::Histogram,
    record::Record,
    top_k::top_colors,
};

pub const DEFAULT_INPUT: &str = "data/input.txt";
pub const DEFAULT_OUTPUT: &str = "output.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Images fetched and analyzed at the same time. Records are still written in input
    /// order.
    pub jobs: NonZeroUsize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: DEFAULT_INPUT.into(),
            output: DEFAULT_OUTPUT.into(),
            jobs: NonZeroUsize::MIN,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("File already exists!")]
    OutputExists(PathBuf),
    #[error("could not open the input file at: {}", .0.display())]
    InputUnreadable(PathBuf, #[source] io::Error),
    #[error("could not read a line from the input file")]
    InputRead(#[source] io::Error),
    #[error("could not create the output file at: {}", .0.display())]
    OutputUncreatable(PathBuf, #[source] io::Error),
    #[error("could not append to the output file")]
    Append(#[source] io::Error),
    #[error("could not start the worker threads")]
    Workers(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
    /// Stopped by a termination signal before the input was exhausted
    pub interrupted: bool,
}

/// The most common colors of an already decoded image.
pub fn analyze(img: &RgbImage) -> Vec<Rgb24> {
    top_colors(&Histogram::from_image(img))
}

/// The diagnostic for a url that didn't produce a record.
pub struct UrlFailure<'a> {
    pub url: &'a str,
    pub error: &'a fetch::FetchError,
}

impl fmt::Display for UrlFailure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for image {}", self.error, self.url)
    }
}

fn process<S: ImageSource>(source: &S, url: &str) -> fetch::Result<Record> {
    let img = source.fetch(url)?;
    Ok(Record::new(url, &analyze(&img)))
}

/// Appends one record per successfully processed url in `config.input` to a newly
/// created `config.output`. Urls that can't be fetched or decoded are logged and
/// skipped. Nothing is processed if the output file already exists.
pub fn run<S: ImageSource>(
    config: &Config,
    source: &S,
    term_cookie: &termination::Cookie,
) -> Result<Summary, RunError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs.get())
        .thread_name(|i| format!("W{i:>02}"))
        .build()?;

    let input = File::open(&config.input)
        .map_err(|e| RunError::InputUnreadable(config.input.clone(), e))?;

    let output = fsutils::create_new_for_append(&config.output)
        .map_err(|e| RunError::OutputUncreatable(config.output.clone(), e))?
        .ok_or_else(|| RunError::OutputExists(config.output.clone()))?;
    let mut output = LineWriter::new(output);

    log::info!(
        "Reading urls from {} and writing to {}",
        config.input.display(),
        config.output.display()
    );

    let before = Instant::now();
    let mut summary = Summary::default();
    let mut lines = BufReader::new(input).lines();

    loop {
        if term_cookie.is_terminating() {
            log::warn!("Termination signal received");
            summary.interrupted = true;
            break;
        }

        let urls: Vec<String> = lines
            .by_ref()
            .take(config.jobs.get())
            .collect::<io::Result<_>>()
            .map_err(RunError::InputRead)?;
        if urls.is_empty() {
            break;
        }

        // NOTE: collect keeps the order of `urls`, no matter which thread finishes first
        let results: Vec<fetch::Result<Record>> =
            pool.install(|| urls.par_iter().map(|url| process(source, url)).collect());

        for (url, result) in urls.iter().zip(results) {
            match result {
                Ok(record) => {
                    log::debug!("{record}");
                    record.write_line(&mut output).map_err(RunError::Append)?;
                    summary.succeeded += 1;
                }
                Err(error) => {
                    log::warn!("{}", UrlFailure { url, error: &error });
                    summary.failed += 1;
                }
            }
        }
    }

    output.flush().map_err(RunError::Append)?;

    let elapsed = humantime::Duration::from(before.elapsed());
    log::info!(
        "Wrote {} records, {} urls failed, it took {}",
        summary.succeeded,
        summary.failed,
        elapsed
    );

    Ok(summary)
}
