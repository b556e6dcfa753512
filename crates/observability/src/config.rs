use core::str::FromStr;

/// Selects the log output format.
pub const LOG_FORMAT_ENV: &str = "ROLEGATE_LOG_FORMAT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format {other:?}")),
        }
    }
}

/// Logging configuration. `RUST_LOG` overrides `default_filter` when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub default_filter: String,
    /// Value of `ROLEGATE_LOG_FORMAT` that was not understood, reported once
    /// the subscriber is installed.
    pub rejected_format: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            default_filter: "info".to_string(),
            rejected_format: None,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(LOG_FORMAT_ENV) {
            match raw.parse() {
                Ok(format) => config.format = format,
                Err(_) => config.rejected_format = Some(raw),
            }
        }
        config
    }
}
