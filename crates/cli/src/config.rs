use std::time::Duration;

use clap::Args;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/susu.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api/v1/".to_string(),
            access_token: None,
            timeout_secs: 10,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Default, Args)]
pub struct ConfigArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8080/api/v1/).
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Override request timeout, in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Override log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,
}

/// Loads the configuration: file, then `SUSU_*` environment variables,
/// then command line flags. The access token is never read from flags.
pub fn load(args: &ConfigArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("SUSU"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.timeout_secs = timeout_secs;
    }
    if let Some(log_level) = &args.log_level {
        settings.log_level = log_level.clone();
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with_file(path: &str) -> ConfigArgs {
        ConfigArgs {
            config: Some(path.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load(&args_with_file("config/does-not-exist.toml")).unwrap();
        assert_eq!(settings.timeout(), Duration::from_secs(10));
        assert!(settings.access_token.is_none());
    }

    #[test]
    fn file_values_are_overridden_by_flags() {
        let path = std::env::temp_dir().join(format!("susu_cli_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "base_url = \"http://backend.test/api/v1\"\naccess_token = \"abc\"\ntimeout_secs = 3\n",
        )
        .unwrap();

        let args = ConfigArgs {
            config: Some(path.display().to_string()),
            timeout_secs: Some(7),
            ..Default::default()
        };
        let settings = load(&args).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.base_url, "http://backend.test/api/v1");
        assert_eq!(settings.access_token.as_deref(), Some("abc"));
        assert_eq!(settings.timeout_secs, 7);
        assert_eq!(settings.log_level, "info");
    }
}
