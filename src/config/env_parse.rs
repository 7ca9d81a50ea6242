//! Typed environment-variable readers shared by the config sections.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Parses `key` when set, otherwise returns `default`.
/// A set-but-malformed value is an error rather than a silent default.
pub(crate) fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .context(format!("Failed to parse {}", key)),
        Err(_) => Ok(default),
    }
}

/// Parses `key` when set; `None` when unset.
pub(crate) fn parse_opt<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .context(format!("Failed to parse {}", key)),
        Err(_) => Ok(None),
    }
}
