use once_cell::sync::Lazy;
use regex::Regex;

/// `name` or `schema.name`, unquoted.
static TABLE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Token table. Interpolated into SQL, so it is validated on load.
    pub table: String,
    pub max_connections: u32,
    /// Set `updated_at = NOW()` alongside `revoked` (Passport tables carry timestamps).
    pub touch_updated_at: bool,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/passport".into(),
            table: "oauth_access_tokens".into(),
            max_connections: 1,
            touch_updated_at: true,
            log_format: LogFormat::Text,
        }
    }
}

pub fn validate_table_name(name: &str) -> anyhow::Result<()> {
    if !TABLE_NAME.is_match(name) {
        anyhow::bail!(
            "invalid token table name '{}': expected an identifier like oauth_access_tokens or schema.table",
            name
        );
    }
    Ok(())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();
    from_lookup(|key| std::env::var(key).ok())
}

/// Builds the config from an arbitrary key lookup; `load()` passes the process environment.
pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
    let defaults = Config::default();

    let table = lookup("REVOKE_TOKENS_TABLE").unwrap_or(defaults.table);
    validate_table_name(&table)?;

    let log_format = match lookup("REVOKE_TOKENS_LOG_FORMAT").as_deref() {
        None | Some("") | Some("text") => LogFormat::Text,
        Some("json") => LogFormat::Json,
        Some(other) => anyhow::bail!(
            "invalid REVOKE_TOKENS_LOG_FORMAT '{}': expected text or json",
            other
        ),
    };

    Ok(Config {
        database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
        table,
        max_connections: lookup("REVOKE_TOKENS_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_connections),
        touch_updated_at: lookup("REVOKE_TOKENS_TOUCH_UPDATED_AT")
            .and_then(|v| parse_bool(&v))
            .unwrap_or(defaults.touch_updated_at),
        log_format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let cfg = from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.database_url, "postgres://localhost/passport");
        assert_eq!(cfg.table, "oauth_access_tokens");
        assert_eq!(cfg.max_connections, 1);
        assert!(cfg.touch_updated_at);
        assert_eq!(cfg.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides_from_environment() {
        let cfg = from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("REVOKE_TOKENS_TABLE", "auth.oauth_access_tokens"),
            ("REVOKE_TOKENS_MAX_CONNECTIONS", "4"),
            ("REVOKE_TOKENS_TOUCH_UPDATED_AT", "off"),
            ("REVOKE_TOKENS_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(cfg.database_url, "postgres://db/app");
        assert_eq!(cfg.table, "auth.oauth_access_tokens");
        assert_eq!(cfg.max_connections, 4);
        assert!(!cfg.touch_updated_at);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn test_zero_connections_falls_back_to_default() {
        let cfg = from_lookup(lookup(&[("REVOKE_TOKENS_MAX_CONNECTIONS", "0")])).unwrap();
        assert_eq!(cfg.max_connections, 1);
    }

    #[test]
    fn test_rejects_unsafe_table_names() {
        for bad in ["", "tokens; DROP TABLE users", "a.b.c", "1tokens", "\"quoted\""] {
            assert!(validate_table_name(bad).is_err(), "accepted {:?}", bad);
        }
        assert!(from_lookup(lookup(&[("REVOKE_TOKENS_TABLE", "bad name")])).is_err());
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        assert!(from_lookup(lookup(&[("REVOKE_TOKENS_LOG_FORMAT", "xml")])).is_err());
    }
}
