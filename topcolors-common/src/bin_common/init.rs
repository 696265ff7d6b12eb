use std::path::Path;

use color_eyre::{
    config::{HookBuilder, Theme},
    eyre::{self, Context},
};
use fern_format::{Format, Stream};

fn stderr_theme() -> Theme {
    if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        Theme::dark()
    } else {
        Theme::new()
    }
}

/// Installs the eyre report hook. Panics are printed to stderr like an eyre report and
/// are also sent to the logger, without colors, so they end up in the logfile.
pub fn init_eyre() -> eyre::Result<()> {
    let (stderr_panic_hook, eyre_hook) =
        HookBuilder::default().theme(stderr_theme()).into_hooks();
    eyre_hook
        .install()
        .wrap_err("failed to install the eyre hook")?;

    let (log_panic_hook, _) = HookBuilder::default().theme(Theme::new()).into_hooks();

    std::panic::set_hook(Box::new(move |info| {
        eprintln!("{}", stderr_panic_hook.panic_report(info));
        log::error!(target: "panic", "{}", log_panic_hook.panic_report(info));
    }));

    Ok(())
}

/// Diagnostics go to stderr, stdout is left alone. The logfile, if any, always gets
/// everything down to debug.
pub fn init_logger(logfile: Option<&Path>, level: log::LevelFilter) -> eyre::Result<()> {
    let mut dispatch = fern::Dispatch::new().level(log::LevelFilter::Debug).chain(
        fern::Dispatch::new()
            .level(level)
            .format(
                Format::new()
                    .color_if_supported(Stream::Stderr)
                    .uniquely_color_threads()
                    .callback(),
            )
            .chain(std::io::stderr()),
    );

    if let Some(logfile) = logfile {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(Format::new().thread_names().callback())
                .chain(fern::log_file(logfile).wrap_err_with(|| {
                    format!("failed to open the log file at: {logfile:?}")
                })?),
        );
    }

    dispatch.apply().wrap_err("failed to set the logger")?;

    Ok(())
}
