use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use std::{
    env, fs,
    io::{stderr, IsTerminal},
    path::{Path, PathBuf},
};
use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, format::debug_fn},
    prelude::*,
    registry::LookupSpan,
    EnvFilter, Layer,
};

use crate::settings::consts::{
    APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, CLI_LOG_TARGET, CORE_LOG_LEVEL, CORE_LOG_TARGET,
    DEFAULT_LOG_LEVEL, LOG_FILE,
};

/// Where the JSON log file lives (platform data directory).
pub fn log_directory() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
        .ok_or_else(|| anyhow!("Could not determine project directories"))?;
    Ok(project_dirs.data_dir().to_path_buf())
}

/// Console messages go to stderr so they never interleave with the bar on stdout.
/// Everything down to TRACE is also appended as JSON to the log file.
pub fn init_logger() -> Result<()> {
    let directory = log_directory()?;
    fs::create_dir_all(&directory)?;

    tracing_subscriber::registry()
        .with(console_layer(console_filter()))
        .with(file_layer(&directory))
        .init();

    Ok(())
}

/// `RUST_LOG` when set; otherwise INFO, with the bar library held at WARN.
fn console_directives(from_env: Option<&str>) -> String {
    match from_env.map(str::trim).filter(|directives| !directives.is_empty()) {
        Some(directives) => directives.to_owned(),
        None => format!(
            "{DEFAULT_LOG_LEVEL},{CORE_LOG_TARGET}={CORE_LOG_LEVEL},{CLI_LOG_TARGET}={DEFAULT_LOG_LEVEL}"
        ),
    }
}

fn console_filter() -> EnvFilter {
    let from_env = env::var(EnvFilter::DEFAULT_ENV).ok();
    EnvFilter::try_new(console_directives(from_env.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Compact, timeless lines: the message first, then any other fields as `name=value`.
fn console_layer<S>(filter: EnvFilter) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let fields = debug_fn(|writer, field, value| {
        if field.name() == "message" {
            write!(writer, "{:?}", value)
        } else {
            write!(writer, "{}={:?}", field.name(), value)
        }
    })
    .delimited(" ");

    fmt::layer()
        .with_writer(stderr)
        .with_ansi(stderr().is_terminal())
        .with_level(true)
        .with_target(false)
        .without_time()
        .compact()
        .fmt_fields(fields)
        .with_filter(filter)
}

fn file_layer<S>(directory: &Path) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .json()
        .with_writer(tracing_appender::rolling::never(directory, LOG_FILE))
        .with_target(true)
        .with_level(true)
        .flatten_event(true)
        .with_filter(LevelFilter::TRACE)
}
