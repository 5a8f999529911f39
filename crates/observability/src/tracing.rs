//! Tracing/logging initialization.

use core::str::FromStr;

use tracing_subscriber::EnvFilter;

pub const ENV_LOG_FORMAT: &str = "SKUFORGE_LOG_FORMAT";

/// Output format of the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable, multi-line.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl LogFormat {
    /// `SKUFORGE_LOG_FORMAT`, falling back to JSON when unset or unknown.
    ///
    /// Malformed values are not logged here: no subscriber exists before
    /// [`init`], which reports them once the subscriber is installed.
    pub fn from_env() -> Self {
        env_format().ok().flatten().unwrap_or_default()
    }
}

/// `Ok(None)` when unset, `Err(raw)` when set to an unknown format.
fn env_format() -> Result<Option<LogFormat>, String> {
    match std::env::var(ENV_LOG_FORMAT) {
        Ok(raw) => raw.parse::<LogFormat>().map(Some).map_err(|_| raw),
        Err(_) => Ok(None),
    }
}

/// Initialize tracing with the format taken from the environment.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    match env_format() {
        Ok(format) => init_with(format.unwrap_or_default()),
        Err(raw) => {
            init_with(LogFormat::default());
            ::tracing::warn!(key = ENV_LOG_FORMAT, value = %raw, "ignoring malformed configuration value");
        }
    }
}

/// Initialize tracing with an explicit format. Filtering follows `RUST_LOG`,
/// defaulting to `info`.
pub fn init_with(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let _ = match format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
