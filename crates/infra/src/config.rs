//! Configuration loading and representation.

use bookkeep_observability::LogFormat;

/// 10 MiB.
pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// Runtime settings for a books instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooksConfig {
    pub log_format: LogFormat,
    /// Load the sample chart, vouchers and transactions on start.
    pub seed_sample_data: bool,
    pub max_attachment_bytes: usize,
}

impl Default for BooksConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            seed_sample_data: true,
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
        }
    }
}

impl BooksConfig {
    /// Read `BOOKS_LOG_FORMAT`, `BOOKS_SEED_SAMPLE` and
    /// `BOOKS_MAX_ATTACHMENT_BYTES`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`BooksConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let log_format = match lookup("BOOKS_LOG_FORMAT") {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!("{err}; using {:?}", defaults.log_format);
                defaults.log_format
            }),
            None => defaults.log_format,
        };

        let seed_sample_data = match lookup("BOOKS_SEED_SAMPLE") {
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                tracing::warn!("BOOKS_SEED_SAMPLE={raw:?} is not a boolean; using default");
                defaults.seed_sample_data
            }),
            None => defaults.seed_sample_data,
        };

        let max_attachment_bytes = match lookup("BOOKS_MAX_ATTACHMENT_BYTES") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!("BOOKS_MAX_ATTACHMENT_BYTES={raw:?} is invalid; using default");
                    defaults.max_attachment_bytes
                }
            },
            None => defaults.max_attachment_bytes,
        };

        Self {
            log_format,
            seed_sample_data,
            max_attachment_bytes,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
