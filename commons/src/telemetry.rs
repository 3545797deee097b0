use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::layer::SubscriberExt;

pub struct TelemetryConfig {
    pub local_log_file: Option<PathBuf>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { local_log_file: None }
    }
}

impl TelemetryConfig {
    pub fn with_local_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_log_file = Some(path.into());
        self
    }
}

/// Keeps the non-blocking log writer alive; dropping it flushes pending lines.
pub struct TelemetryGuard {
    _file_log_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, file_log_guard) = if let Some(path) = &config.local_log_file {
        let file = open_log_file(path)?;
        let (file_writer, guard) = tracing_appender::non_blocking(file);
        (BoxMakeWriter::new(std::io::stdout.and(file_writer)), Some(guard))
    } else {
        (BoxMakeWriter::new(std::io::stdout), None)
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(writer);

    let subscriber = tracing_subscriber::registry().with(env_filter).with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    let _ = tracing_log::LogTracer::builder().init();

    Ok(TelemetryGuard {
        _file_log_guard: file_log_guard,
    })
}

pub fn init_telemetry_from_env() -> Result<TelemetryGuard, Box<dyn std::error::Error>> {
    init_telemetry_from_env_with_log_file(None)
}

/// Initializes the fmt subscriber, honoring `RUST_LOG` with an `info` default.
/// When a log file is given, lines are tee'd to stdout and to a non-blocking
/// appender on that file.
pub fn init_telemetry_from_env_with_log_file(
    local_log_file: Option<&Path>,
) -> Result<TelemetryGuard, Box<dyn std::error::Error>> {
    let config = TelemetryConfig {
        local_log_file: local_log_file.map(|p| p.to_path_buf()),
    };

    init_telemetry(config)
}

fn open_log_file(path: &Path) -> Result<std::fs::File, Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    Ok(file)
}
