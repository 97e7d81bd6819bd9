//! Server settings.
//!
//! Defaults first, then `ARCHSCHED__<SECTION>__<KEY>` environment variables,
//! e.g. `ARCHSCHED__SERVER__PORT=9000`.

use archsched_core::{default_log_dir, default_log_level};
use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const ENV_PREFIX: &str = "ARCHSCHED";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub share: ShareSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShareSettings {
    /// Origin the share links point at, without the share path.
    pub public_base_url: String,
    pub sweep_interval_secs: u64,
}

impl ShareSettings {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub dir: String,
}

impl Settings {
    /// Loads settings from defaults and the process environment.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR))
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        let settings: Self = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8787)?
            .set_default("share.public_base_url", "http://localhost:3000")?
            .set_default("share.sweep_interval_secs", 3600)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.dir", default_log_dir().to_string_lossy().to_string())?
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Message("server.host cannot be empty".into()));
        }
        let base = self.share.public_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Message(format!(
                "share.public_base_url must be an http(s) URL, got `{base}`"
            )));
        }
        if self.share.sweep_interval_secs == 0 {
            return Err(ConfigError::Message(
                "share.sweep_interval_secs must be greater than zero".into(),
            ));
        }
        if !Path::new(self.logging.dir.trim()).is_absolute() {
            return Err(ConfigError::Message(format!(
                "logging.dir must be an absolute path, got `{}`",
                self.logging.dir
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, ENV_PREFIX, ENV_SEPARATOR};
    use config::Environment;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Settings, config::ConfigError> {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Settings::from_environment(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .source(Some(source)),
        )
    }

    #[test]
    fn defaults_apply_without_environment() {
        let settings = load(&[]).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8787);
        assert_eq!(settings.share.public_base_url, "http://localhost:3000");
        assert_eq!(settings.share.sweep_interval_secs, 3600);
        assert!(std::path::Path::new(&settings.logging.dir).is_absolute());
    }

    #[test]
    fn environment_overrides_nested_keys() {
        let settings = load(&[
            ("ARCHSCHED__SERVER__PORT", "9100"),
            ("ARCHSCHED__SHARE__PUBLIC_BASE_URL", "https://plans.example.com"),
            ("ARCHSCHED__SHARE__SWEEP_INTERVAL_SECS", "60"),
        ])
        .unwrap();
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.share.public_base_url, "https://plans.example.com");
        assert_eq!(settings.share.sweep_interval().as_secs(), 60);
    }

    #[test]
    fn invalid_values_fail_startup() {
        assert!(load(&[("ARCHSCHED__SHARE__SWEEP_INTERVAL_SECS", "0")]).is_err());
        assert!(load(&[("ARCHSCHED__SHARE__PUBLIC_BASE_URL", "ftp://x")]).is_err());
        assert!(load(&[("ARCHSCHED__LOGGING__DIR", "relative/logs")]).is_err());
        assert!(load(&[("ARCHSCHED__SERVER__PORT", "not-a-port")]).is_err());
    }
}
