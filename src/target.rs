//! Target resolution: where the probe connects and what it touches.
//!
//! The connection descriptor carries credentials, so it never lives in
//! source. It is resolved through a chain:
//!
//! 1. `--uri <descriptor>`: explicit per-command override
//! 2. `DOCPROBE_URI` env var: process/session level
//! 3. `uri` in `~/.docprobe/config.toml`: global default
//!
//! Database and collection come from flags when given, otherwise from config.

use std::env;

use crate::config::Config;

/// Environment variable consulted for the connection descriptor.
pub const URI_ENV: &str = "DOCPROBE_URI";

/// Error message shown when no descriptor can be resolved.
pub const URI_REQUIRED: &str = "connection descriptor required: pass --uri <descriptor>, \
    set DOCPROBE_URI, or add `uri = \"...\"` to ~/.docprobe/config.toml";

/// A fully resolved probe target, injected into every store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl Target {
    /// Resolve the target from flags, environment, and config.
    pub fn resolve(
        uri: Option<&str>,
        database: Option<&str>,
        collection: Option<&str>,
        config: &Config,
    ) -> Result<Self, String> {
        let env_uri = env::var(URI_ENV).ok();
        let uri = resolve_uri(uri, env_uri.as_deref(), config)?;
        Ok(Self {
            uri,
            database: database.unwrap_or(&config.database).to_string(),
            collection: collection.unwrap_or(&config.collection).to_string(),
        })
    }

    /// The descriptor with credentials masked, safe to print or log.
    pub fn redacted_uri(&self) -> String {
        redact(&self.uri)
    }
}

/// Pick the descriptor from the first source that yields a non-empty value.
fn resolve_uri(
    explicit: Option<&str>,
    env_value: Option<&str>,
    config: &Config,
) -> Result<String, String> {
    // 1. Explicit --uri flag.
    if let Some(uri) = explicit {
        return Ok(uri.to_string());
    }

    // 2. DOCPROBE_URI environment variable.
    if let Some(uri) = env_value
        && !uri.is_empty()
    {
        return Ok(uri.to_string());
    }

    // 3. Config file.
    if let Some(uri) = config.uri.as_deref()
        && !uri.is_empty()
    {
        return Ok(uri.to_string());
    }

    Err(URI_REQUIRED.to_string())
}

/// Mask the userinfo section (`user:password@`) of a descriptor.
///
/// A password may contain raw `/`, `?`, `#` or `@`, so everything between
/// `://` and the last `@` is masked. An `@` that only appears in the path or
/// options gets masked along with the host. The descriptor is otherwise left
/// untouched.
fn redact(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://") else {
        return uri.to_string();
    };
    let (scheme, rest) = uri.split_at(scheme_end + 3);
    match rest.rfind('@') {
        Some(at) => format!("{scheme}***{}", &rest[at..]),
        None => uri.to_string(),
    }
}
