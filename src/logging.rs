use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialise logging to `path`.
///
/// The terminal is owned by the UI, so log lines go to a file through a
/// non-blocking writer.  Keep the returned guard alive until exit or
/// buffered lines are lost.  The default level is `info`; with `debug` it is
/// `debug` and `RUST_LOG` may override it.
///
/// Fails if a global subscriber is already installed.
pub fn init(path: &Path, debug: bool) -> Result<WorkerGuard> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("log path {} has no file name", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    let level = if debug { "debug" } else { "info" };
    // Dependencies only get to speak up at `warn`.
    let default_filter = format!("pulse_dash={level},warn");
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter))
    } else {
        EnvFilter::new(&default_filter)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_an_error() {
        let dir = std::env::temp_dir().join(format!("pulse-dash-log-test-{}", std::process::id()));
        let path = dir.join("test.log");

        let first = init(&path, false);
        let second = init(&path, true);

        assert!(first.is_ok());
        let Err(err) = second else {
            panic!("a second subscriber must not install");
        };
        assert!(err.to_string().contains("installing log subscriber"));
        drop(first);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        assert!(init(Path::new("/"), false).is_err());
    }
}
