//! Generic TOML configuration parsing.
//!
//! Error messages carry the file path so a malformed configuration points
//! straight at the file that needs fixing:
//!
//! ```text
//! Failed to parse config file: /srv/app/bundles.toml
//! Caused by:
//!     unknown field `dependencies`, expected one of `source_files`, ...
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Parse a TOML configuration file into the specified type.
///
/// # Errors
///
/// Fails if the file cannot be read or if its content does not deserialize
/// into `T`. Both failures keep the underlying error as their cause.
///
/// # Examples
///
/// ```rust,no_run
/// use bundlejam::config::{AssetsConfig, parse_config};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let config: AssetsConfig = parse_config(Path::new("bundles.toml"))?;
/// println!("{} namespaces", config.namespaces.len());
/// # Ok(())
/// # }
/// ```
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}
