use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_ENV: &str = "PERSISTCACHE_LOG_FILE";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr, filtered by `RUST_LOG` (default `warn`). When
/// `PERSISTCACHE_LOG_FILE` is set they are also appended to that file; keep
/// the returned guard alive so buffered lines are written on exit.
pub fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_file_target() {
        Some((dir, name)) => {
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn log_file_target() -> Option<(PathBuf, PathBuf)> {
    let path = PathBuf::from(std::env::var_os(LOG_FILE_ENV)?);
    split_log_path(path)
}

fn split_log_path(path: PathBuf) -> Option<(PathBuf, PathBuf)> {
    let name = PathBuf::from(path.file_name()?);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        assert_eq!(
            split_log_path(PathBuf::from("/var/log/cache.log")),
            Some((PathBuf::from("/var/log"), PathBuf::from("cache.log")))
        );
        assert_eq!(
            split_log_path(PathBuf::from("cache.log")),
            Some((PathBuf::from("."), PathBuf::from("cache.log")))
        );
        assert_eq!(split_log_path(PathBuf::from("/")), None);
    }
}
