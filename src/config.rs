use anyhow::{Context, Result};

use crate::labels::Language;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_TARGET_PARTICIPANTS: usize = 150;

/// Runtime settings read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    pub target_participants: usize,
    pub language: Language,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .context("DATABASE_URL must be set to a production Postgres instance")?;

        let max_connections = match lookup("SURVEY_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("SURVEY_MAX_CONNECTIONS is not a number: {raw}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let target_participants = match lookup("SURVEY_TARGET_PARTICIPANTS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("SURVEY_TARGET_PARTICIPANTS is not a number: {raw}"))?,
            None => DEFAULT_TARGET_PARTICIPANTS,
        };

        let language = match lookup("SURVEY_LANG") {
            Some(raw) => raw.parse().map_err(anyhow::Error::msg)?,
            None => Language::default(),
        };

        Ok(Self {
            database_url,
            max_connections,
            target_participants,
            language,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn applies_defaults() {
        let settings = settings(&[("DATABASE_URL", "postgres://localhost/survey")]).unwrap();
        assert_eq!(settings.max_connections, 5);
        assert_eq!(settings.target_participants, 150);
        assert_eq!(settings.language, Language::Arabic);
    }

    #[test]
    fn reads_overrides() {
        let settings = settings(&[
            ("DATABASE_URL", "postgres://localhost/survey"),
            ("SURVEY_MAX_CONNECTIONS", "2"),
            ("SURVEY_TARGET_PARTICIPANTS", "300"),
            ("SURVEY_LANG", "en"),
        ])
        .unwrap();
        assert_eq!(settings.max_connections, 2);
        assert_eq!(settings.target_participants, 300);
        assert_eq!(settings.language, Language::English);
    }

    #[test]
    fn requires_database_url_and_valid_values() {
        assert!(settings(&[]).is_err());
        assert!(settings(&[("DATABASE_URL", "x"), ("SURVEY_LANG", "fr")]).is_err());
        assert!(settings(&[("DATABASE_URL", "x"), ("SURVEY_MAX_CONNECTIONS", "many")]).is_err());
    }
}
