use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CREDENTIAL_FILE: &str = ".flickr_api_key";
const CONFIG_FILE: &str = ".flickr_config.json";

/// Service credentials and endpoints, persisted as JSON in the user's home
/// directory. The hosting key/secret may alternatively live in a two-line
/// credential file (key on the first line, secret on the second).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    /// OAuth access token for write scope, persisted after the one-time
    /// authorization handshake.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_token_secret: Option<String>,
}

/// Values supplied on the command line, which win over anything on disk.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub azure_key: Option<String>,
    pub azure_endpoint: Option<String>,
    pub openai_api_key: Option<String>,
}

/// Which credentials a tool actually needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Album scanning only needs the hosting key/secret.
    Scan,
    /// Tagging needs the vision and generation services as well.
    Tag,
}

/// Locates and reads/writes the persisted configuration files.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    home: PathBuf,
}

impl ConfigStore {
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::ConfigurationMissing("home directory".into()))?;
        Ok(Self { home })
    }

    /// Store rooted somewhere other than the real home directory.
    pub fn at(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.home.join(CONFIG_FILE)
    }

    #[must_use]
    pub fn credential_path(&self) -> PathBuf {
        self.home.join(CREDENTIAL_FILE)
    }

    pub fn load_config(&self) -> Result<Option<Config>> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn store_config(&self, config: &Config) -> Result<()> {
        fs::write(self.config_path(), serde_json::to_string_pretty(config)?)?;
        Ok(())
    }

    pub fn read_credentials(&self) -> Result<Option<(String, String)>> {
        let path = self.credential_path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        let mut lines = raw.lines();
        let key = lines.next().unwrap_or_default().trim().to_string();
        let secret = lines.next().unwrap_or_default().trim().to_string();
        if key.is_empty() || secret.is_empty() {
            return Ok(None);
        }
        Ok(Some((key, secret)))
    }

    pub fn store_credentials(&self, api_key: &str, api_secret: &str) -> Result<()> {
        fs::write(self.credential_path(), format!("{api_key}\n{api_secret}\n"))?;
        Ok(())
    }

    /// Merge a freshly obtained write token into the stored configuration.
    pub fn save_oauth_token(&self, token: &str, secret: &str) -> Result<()> {
        let mut config = self.load_config()?.unwrap_or_default();
        config.oauth_token = Some(token.to_string());
        config.oauth_token_secret = Some(secret.to_string());
        self.store_config(&config)
    }
}

/// Resolve the effective configuration once, before any service call.
///
/// Precedence per field: explicit override, stored config, credential file
/// (hosting key/secret only), then `fill` for anything still missing. `fill`
/// receives a human-readable field label and typically prompts the user;
/// its errors propagate unchanged.
pub fn resolve<F>(
    store: &ConfigStore,
    overrides: ConfigOverrides,
    profile: Profile,
    mut fill: F,
) -> Result<Config>
where
    F: FnMut(&str) -> Result<String>,
{
    let mut config = store.load_config()?.unwrap_or_default();

    if let Some(value) = overrides.api_key {
        config.api_key = value;
    }
    if let Some(value) = overrides.api_secret {
        config.api_secret = value;
    }
    if overrides.azure_key.is_some() {
        config.azure_key = overrides.azure_key;
    }
    if overrides.azure_endpoint.is_some() {
        config.azure_endpoint = overrides.azure_endpoint;
    }
    if overrides.openai_api_key.is_some() {
        config.openai_api_key = overrides.openai_api_key;
    }

    if config.api_key.is_empty() || config.api_secret.is_empty() {
        if let Some((key, secret)) = store.read_credentials()? {
            if config.api_key.is_empty() {
                config.api_key = key;
            }
            if config.api_secret.is_empty() {
                config.api_secret = secret;
            }
        }
    }

    if config.api_key.is_empty() {
        config.api_key = fill("Flickr API key")?;
    }
    if config.api_secret.is_empty() {
        config.api_secret = fill("Flickr API secret")?;
    }

    if profile == Profile::Tag {
        if config.openai_api_key.is_none() {
            config.openai_api_key = Some(fill("Open AI API key")?);
        }
        if config.azure_key.is_none() {
            config.azure_key = Some(fill("Azure Vision API key")?);
        }
        if config.azure_endpoint.is_none() {
            config.azure_endpoint = Some(fill("Azure Vision API endpoint")?);
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ConfigStore) {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = ConfigStore::at(tmp.path());
        (tmp, store)
    }

    fn no_fill(label: &str) -> Result<String> {
        Err(Error::ConfigurationMissing(label.to_string()))
    }

    #[test]
    fn test_config_round_trip() {
        let (_tmp, store) = store();
        let config = Config {
            api_key: "key".into(),
            api_secret: "secret".into(),
            azure_key: Some("azkey".into()),
            azure_endpoint: Some("https://vision.example".into()),
            openai_api_key: Some("oai".into()),
            ..Default::default()
        };

        store.store_config(&config).unwrap();
        let loaded = store.load_config().unwrap().unwrap();

        assert_eq!(loaded.api_key, "key");
        assert_eq!(loaded.azure_endpoint.as_deref(), Some("https://vision.example"));
        assert!(loaded.oauth_token.is_none());
    }

    #[test]
    fn test_missing_config_is_none() {
        let (_tmp, store) = store();
        assert!(store.load_config().unwrap().is_none());
        assert!(store.read_credentials().unwrap().is_none());
    }

    #[test]
    fn test_credential_file_round_trip() {
        let (_tmp, store) = store();
        store.store_credentials("key", "secret").unwrap();

        let raw = std::fs::read_to_string(store.credential_path()).unwrap();
        assert_eq!(raw, "key\nsecret\n");

        let (key, secret) = store.read_credentials().unwrap().unwrap();
        assert_eq!(key, "key");
        assert_eq!(secret, "secret");
    }

    #[test]
    fn test_resolve_override_wins_over_stored() {
        let (_tmp, store) = store();
        store
            .store_config(&Config {
                api_key: "stored-key".into(),
                api_secret: "stored-secret".into(),
                ..Default::default()
            })
            .unwrap();

        let overrides = ConfigOverrides {
            api_key: Some("flag-key".into()),
            ..Default::default()
        };
        let config = resolve(&store, overrides, Profile::Scan, no_fill).unwrap();

        assert_eq!(config.api_key, "flag-key");
        assert_eq!(config.api_secret, "stored-secret");
    }

    #[test]
    fn test_resolve_falls_back_to_credential_file() {
        let (_tmp, store) = store();
        store.store_credentials("file-key", "file-secret").unwrap();

        let config = resolve(&store, ConfigOverrides::default(), Profile::Scan, no_fill).unwrap();

        assert_eq!(config.api_key, "file-key");
        assert_eq!(config.api_secret, "file-secret");
    }

    #[test]
    fn test_resolve_fills_missing_fields_interactively() {
        let (_tmp, store) = store();
        let mut asked = Vec::new();
        let config = resolve(&store, ConfigOverrides::default(), Profile::Tag, |label| {
            asked.push(label.to_string());
            Ok(format!("<{label}>"))
        })
        .unwrap();

        assert_eq!(config.api_key, "<Flickr API key>");
        assert_eq!(config.azure_key.as_deref(), Some("<Azure Vision API key>"));
        assert_eq!(
            asked,
            vec![
                "Flickr API key",
                "Flickr API secret",
                "Open AI API key",
                "Azure Vision API key",
                "Azure Vision API endpoint",
            ]
        );
    }

    #[test]
    fn test_resolve_scan_profile_skips_service_keys() {
        let (_tmp, store) = store();
        let overrides = ConfigOverrides {
            api_key: Some("k".into()),
            api_secret: Some("s".into()),
            ..Default::default()
        };
        let config = resolve(&store, overrides, Profile::Scan, no_fill).unwrap();

        assert!(config.azure_key.is_none());
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_resolve_propagates_fill_errors() {
        let (_tmp, store) = store();
        let result = resolve(&store, ConfigOverrides::default(), Profile::Scan, no_fill);

        assert!(matches!(result, Err(Error::ConfigurationMissing(_))));
    }

    #[test]
    fn test_save_oauth_token_preserves_other_fields() {
        let (_tmp, store) = store();
        store
            .store_config(&Config {
                api_key: "key".into(),
                api_secret: "secret".into(),
                ..Default::default()
            })
            .unwrap();

        store.save_oauth_token("tok", "tok-secret").unwrap();

        let loaded = store.load_config().unwrap().unwrap();
        assert_eq!(loaded.api_key, "key");
        assert_eq!(loaded.oauth_token.as_deref(), Some("tok"));
        assert_eq!(loaded.oauth_token_secret.as_deref(), Some("tok-secret"));
    }
}
