use crate::domain::error::{AppError, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runtime settings: defaults, overridden by `lotbook.toml`, overridden by
/// `LOTBOOK_`-prefixed environment variables.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub database_url: String,
    pub debounce_ms: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://lotbook.db".to_string(),
            debounce_ms: 1500,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("lotbook.toml"))
            .merge(Env::prefixed("LOTBOOK_"))
            .extract()
            .map_err(|e| AppError::Internal(format!("Failed to load settings: {e}")))
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_inspection_debounce_window() {
        let settings = Settings::default();
        assert_eq!(settings.quiet_period(), Duration::from_millis(1500));
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn env_overrides_win() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("LOTBOOK_DEBOUNCE_MS", "250");
            jail.set_env("LOTBOOK_DATABASE_URL", "sqlite://qa.db");

            let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
                .merge(Env::prefixed("LOTBOOK_"))
                .extract()
                .expect("settings");

            assert_eq!(settings.debounce_ms, 250);
            assert_eq!(settings.database_url, "sqlite://qa.db");
            Ok(())
        });
    }
}
