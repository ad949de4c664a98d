//! Diagnostic logging to stderr.
//!
//! Events use `event=<name> key=value` lines. `RUST_LOG` takes precedence over
//! the level derived from `-v`/`-q`.

use flexi_logger::{Logger, LoggerHandle};

/// Maps CLI verbosity to a log specification.
pub fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }

    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Starts the stderr logger. Keep the returned handle alive for the whole run.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<LoggerHandle, String> {
    let level = level_for(verbose, quiet);

    let handle = Logger::try_with_env_or_str(level)
        .map_err(|err| format!("invalid log specification `{level}`: {err}"))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    log::debug!(
        "event=app_start version={} platform={} level={}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        level
    );

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0, false), "warn");
        assert_eq!(level_for(1, false), "info");
        assert_eq!(level_for(2, false), "debug");
        assert_eq!(level_for(9, false), "trace");
        assert_eq!(level_for(3, true), "error");
    }
}
