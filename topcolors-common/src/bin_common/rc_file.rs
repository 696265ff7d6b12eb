use std::ffi::{OsStr, OsString};

use color_eyre::eyre::{self, Context};

use crate::utils::fsutils::read_optional_file;

/// Returns the command line arguments. If none were given, the whitespace separated
/// flags in `rc_file` are used instead, if it exists.
pub fn args_or_rc_file(rc_file: &str) -> eyre::Result<Vec<OsString>> {
    let args: Vec<OsString> = std::env::args_os().collect();
    extend_from_rc_file(args, rc_file)
}

fn extend_from_rc_file(mut args: Vec<OsString>, rc_file: &str) -> eyre::Result<Vec<OsString>> {
    if args.len() == 1 {
        if let Some(flags) = read_optional_file(rc_file)
            .wrap_err_with(|| format!("Could not read config file at: {rc_file}"))?
        {
            args.extend(flags.split_whitespace().map(|s| OsStr::new(s).to_owned()));
        }
    }

    Ok(args)
}
