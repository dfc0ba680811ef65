use anyhow::Context;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_REPORT_LIMIT: usize = 10;

/// Runtime settings for the command-line tool, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub report_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            report_limit: DEFAULT_REPORT_LIMIT,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let max_connections = match lookup("CERVICAL_RISK_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("CERVICAL_RISK_MAX_CONNECTIONS is not a number: {raw}"))?,
            None => defaults.max_connections,
        };
        let report_limit = match lookup("CERVICAL_RISK_REPORT_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("CERVICAL_RISK_REPORT_LIMIT is not a number: {raw}"))?,
            None => defaults.report_limit,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL"),
            max_connections,
            report_limit,
        })
    }

    pub fn database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set to a production Postgres instance")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.database_url().is_err());
    }

    #[test]
    fn values_are_read_from_environment() {
        let settings = settings(&[
            ("DATABASE_URL", "postgres://localhost/screening"),
            ("CERVICAL_RISK_MAX_CONNECTIONS", "12"),
            ("CERVICAL_RISK_REPORT_LIMIT", " 3 "),
        ])
        .unwrap();
        assert_eq!(settings.database_url().unwrap(), "postgres://localhost/screening");
        assert_eq!(settings.max_connections, 12);
        assert_eq!(settings.report_limit, 3);
    }

    #[test]
    fn blank_database_url_counts_as_missing() {
        let settings = settings(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(settings.database_url.is_none());
    }

    #[test]
    fn malformed_numbers_are_reported() {
        let err = settings(&[("CERVICAL_RISK_REPORT_LIMIT", "ten")]).unwrap_err();
        assert!(err.to_string().contains("CERVICAL_RISK_REPORT_LIMIT"));
    }
}
