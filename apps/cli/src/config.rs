use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use query_core::{remote::DEFAULT_API_URL, EventsClientConfig};
use serde::Deserialize;
use shared::protocol::NetworkInput;
use tracing::warn;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "nft-events.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub network: String,
    pub chain: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            api_key: None,
            network: "ETHEREUM".into(),
            chain: "MAINNET".into(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    api_key: Option<String>,
    network: Option<String>,
    chain: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the config file, then environment variables.
///
/// An explicitly passed config path must exist and parse; the default
/// `nft-events.toml` is optional and skipped with a warning when malformed.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            settings
                .apply_file(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                if let Err(error) = settings.apply_file(&raw) {
                    warn!(%error, path = DEFAULT_CONFIG_FILE, "ignoring malformed config file");
                }
            }
        }
    }

    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

impl Settings {
    pub fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file.api_url {
            self.api_url = v;
        }
        if let Some(v) = file.api_key {
            self.set_api_key(v);
        }
        if let Some(v) = file.network {
            self.network = v;
        }
        if let Some(v) = file.chain {
            self.chain = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        Ok(())
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("NFT_EVENTS_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = lookup("APP__API_URL") {
            self.api_url = v;
        }

        if let Some(v) = lookup("NFT_EVENTS_API_KEY") {
            self.set_api_key(v);
        }
        if let Some(v) = lookup("APP__API_KEY") {
            self.set_api_key(v);
        }

        if let Some(v) = lookup("APP__NETWORK") {
            self.network = v;
        }
        if let Some(v) = lookup("APP__CHAIN") {
            self.chain = v;
        }

        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(parsed) => self.request_timeout_secs = parsed,
                Err(_) => warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
            }
        }
    }

    /// Command line flags take precedence over file and environment.
    pub fn apply_overrides(&mut self, api_url: Option<&str>, api_key: Option<&str>) {
        if let Some(v) = api_url {
            self.api_url = v.to_string();
        }
        if let Some(v) = api_key {
            self.set_api_key(v.to_string());
        }
    }

    pub fn client_config(&self) -> anyhow::Result<EventsClientConfig> {
        let api_url = Url::parse(self.api_url.trim())
            .with_context(|| format!("invalid api url '{}'", self.api_url))?;
        Ok(EventsClientConfig {
            api_url,
            api_key: self.api_key.clone(),
            networks: vec![NetworkInput {
                network: self.network.clone(),
                chain: self.chain.clone(),
            }],
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }

    fn set_api_key(&mut self, value: String) {
        let value = value.trim();
        self.api_key = (!value.is_empty()).then(|| value.to_string());
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
