use std::{num::NonZeroUsize, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::{self, Context};
use topcolors::{
    driver::{self, Config, DEFAULT_INPUT, DEFAULT_OUTPUT},
    fetch::{UrlSource, DEFAULT_MAX_BYTES, DEFAULT_TIMEOUT},
};
use topcolors_common::bin_common::{
    init::{init_eyre, init_logger},
    rc_file::args_or_rc_file,
    termination,
};

const RC_FILE: &str = ".topcolorsrc";

#[derive(Parser, Debug)]
#[command()]
/// Finds the three most common colors in each image from a list of urls, and writes them
/// as `url,color1,color2,color3` lines to a new csv file.
///
/// Flags are read from `.topcolorsrc` in the current directory if none are given.
struct Cli {
    /// File with one image url per line
    #[arg(long, short = 'i', default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Where to write the results, must not already exist
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Fetch and analyze this many images at the same time
    #[arg(long, short = 'j', default_value = "1")]
    jobs: NonZeroUsize,

    /// Give up on downloading an image after this long
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.into())]
    timeout: humantime::Duration,

    /// Skip images larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
    max_bytes: u64,

    /// A file to additionally write the logs to
    #[arg(long)]
    logfile: Option<PathBuf>,

    /// Log more
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> eyre::Result<()> {
    init_eyre()?;
    let cli = Cli::parse_from(args_or_rc_file(RC_FILE)?);
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    init_logger(cli.logfile.as_deref(), level)?;

    log::debug!("CLI arguments: {cli:#?}");

    let term_cookie =
        termination::Cookie::new().wrap_err("failed to create term cookie")?;

    let source = UrlSource::new(cli.timeout.into(), cli.max_bytes);
    let config = Config {
        input: cli.input,
        output: cli.output,
        jobs: cli.jobs,
    };

    let summary = driver::run(&config, &source, &term_cookie)?;
    if summary.interrupted {
        log::warn!("Stopped before all urls were processed");
    }

    Ok(())
}
