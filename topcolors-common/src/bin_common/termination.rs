use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use signal_hook::{consts::signal::*, low_level};

/// Counts received SIGINT/SIGTERM. The first one asks for a graceful stop, a third one
/// falls back to the default handler, i.e., kills the process.
#[derive(Clone, Debug)]
pub struct Cookie {
    count: Arc<AtomicUsize>,
}

impl Cookie {
    pub fn new() -> Result<Self, std::io::Error> {
        let cookie = Self::detached();

        for flag in [SIGINT, SIGTERM] {
            let count = Arc::clone(&cookie.count);
            // SAFETY: this only uses atomic stuff and functions the crate itself is using
            // in signal handlers
            unsafe {
                low_level::register(flag, move || {
                    let prev = count.fetch_add(1, Ordering::SeqCst);
                    if prev >= 2 {
                        let _ = low_level::emulate_default_handler(flag);
                    }
                })?;
            };
        }

        Ok(cookie)
    }

    /// A cookie that isn't connected to any signals. It only terminates when told to.
    pub fn detached() -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Behave as if a termination signal was received.
    pub fn terminate(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_terminating(&self) -> bool {
        self.count.load(Ordering::SeqCst) >= 1
    }
}
