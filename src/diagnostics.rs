//! Logging setup and user-facing diagnostics.
//!
//! Warnings go through the `log` facade so `-v` / `RUST_LOG` control them;
//! fatal errors are printed once by `main` via [`report`].

use env_logger::Env;
use log::LevelFilter;
use std::io::Write;

/// Initialize the global logger.
///
/// `verbosity` is the number of `-v` flags: 0 => warn, 1 => info, 2+ => debug.
/// `RUST_LOG` takes precedence when set.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(level.as_str()))
        .format(|buf, record| {
            writeln!(buf, "{}: {}", record.level(), record.args())
        })
        .try_init()
        .ok();
}

/// Emit a non-fatal warning.
pub fn warn(msg: impl AsRef<str>) {
    log::warn!("{}", msg.as_ref());
}

/// Print a fatal error and its context chain to stderr.
pub fn report(err: &anyhow::Error) {
    eprintln!("error: {}", err);
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {}", cause);
    }
}
