//! Site configuration stored as a JSON document
//!
//! The file holds one or more named sites (endpoint, user, encoded password)
//! and a pointer to the current one. Passwords are stored base64-encoded,
//! which is an encoding and not encryption.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{VcdError, VcdResult};

/// API version sent in the `Accept` header when a site does not pin one.
pub const DEFAULT_API_VERSION: &str = "37.1";

const CONFIG_FILE_NAME: &str = "vcdctl.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(rename = "current-site", default)]
    pub current_site: String,
    #[serde(default)]
    pub sites: Vec<Site>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Site {
    pub name: String,
    pub endpoint: String,
    pub user: String,
    /// base64 of the clear-text password
    pub password: String,
    #[serde(default)]
    pub orgname: String,
    #[serde(default)]
    pub apiversion: String,
    /// Skip TLS certificate verification. Private deployments commonly run
    /// on self-signed certificates, so this is on unless a site opts out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
    /// Whether org-scoped task listings also include the "System" org.
    #[serde(
        rename = "include-system-tasks",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub include_system_tasks: Option<bool>,
}

/// Default location: `$HOME/.config/vcdctl.json`.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(CONFIG_FILE_NAME)
}

impl Config {
    /// Loads the config file. A missing file yields an empty config so the
    /// first `config set-site` can create it.
    pub fn load(path: &Path) -> VcdResult<Self> {
        if !path.exists() {
            debug!("Config file {} does not exist, starting empty", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| VcdError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> VcdResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| VcdError::Config(e.to_string()))?;
        fs::write(path, text)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn current_site(&self) -> VcdResult<&Site> {
        if self.current_site.is_empty() {
            return Err(VcdError::Config(
                "no current site selected, run `vcdctl config set-site`".to_string(),
            ));
        }
        self.site(&self.current_site)
    }

    pub fn site(&self, name: &str) -> VcdResult<&Site> {
        self.sites
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| VcdError::Config(format!("site '{}' not found", name)))
    }

    /// Adds a site or replaces the one with the same name. The first site
    /// added becomes current.
    pub fn upsert_site(&mut self, site: Site) {
        match self.sites.iter_mut().find(|s| s.name == site.name) {
            Some(existing) => *existing = site,
            None => {
                self.sites.push(site);
                if self.sites.len() == 1 {
                    self.current_site = self.sites[0].name.clone();
                }
            }
        }
    }

    pub fn use_site(&mut self, name: &str) -> VcdResult<()> {
        self.site(name)?;
        self.current_site = name.to_string();
        Ok(())
    }

    pub fn remove_site(&mut self, name: &str) -> VcdResult<()> {
        let before = self.sites.len();
        self.sites.retain(|s| s.name != name);
        if self.sites.len() == before {
            return Err(VcdError::Config(format!("site '{}' not found", name)));
        }
        if self.current_site == name {
            self.current_site = self
                .sites
                .first()
                .map(|s| s.name.clone())
                .unwrap_or_default();
        }
        Ok(())
    }
}

impl Site {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        user: impl Into<String>,
        password: &str,
        orgname: impl Into<String>,
    ) -> Self {
        let mut site = Self {
            name: name.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            user: user.into(),
            orgname: orgname.into(),
            ..Self::default()
        };
        site.set_password(password);
        site
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = general_purpose::STANDARD.encode(password);
    }

    /// Value for the `Authorization: Basic` header.
    ///
    /// The stored password is decoded first, joined with the user name and
    /// encoded again.
    pub fn credential(&self) -> VcdResult<String> {
        let password = general_purpose::STANDARD
            .decode(self.password.as_bytes())
            .map_err(|e| VcdError::Config(format!("site '{}': password is not base64: {}", self.name, e)))?;
        let mut plain = format!("{}:", self.user).into_bytes();
        plain.extend_from_slice(&password);
        Ok(general_purpose::STANDARD.encode(plain))
    }

    pub fn api_version(&self) -> &str {
        if self.apiversion.is_empty() {
            DEFAULT_API_VERSION
        } else {
            &self.apiversion
        }
    }

    pub fn accepts_invalid_certs(&self) -> bool {
        self.insecure.unwrap_or(true)
    }

    pub fn includes_system_tasks(&self) -> bool {
        self.include_system_tasks.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_double_encodes_password() {
        let site = Site::new("lab", "https://vcd.example.com/", "administrator", "s3cr:et", "System");
        assert_eq!(site.password, general_purpose::STANDARD.encode("s3cr:et"));
        assert_eq!(site.endpoint, "https://vcd.example.com");

        let expected = general_purpose::STANDARD.encode("administrator:s3cr:et");
        assert_eq!(site.credential().unwrap(), expected);
    }

    #[test]
    fn credential_rejects_undecodable_password() {
        let site = Site {
            name: "broken".into(),
            password: "***".into(),
            ..Site::default()
        };
        assert!(matches!(site.credential(), Err(VcdError::Config(_))));
    }

    #[test]
    fn defaults_apply_when_fields_absent() {
        let raw = r#"{"current-site":"a","sites":[{"name":"a","endpoint":"https://x","user":"u","password":"cA=="}]}"#;
        let config: Config = serde_json::from_str(raw).unwrap();
        let site = config.current_site().unwrap();
        assert_eq!(site.api_version(), DEFAULT_API_VERSION);
        assert!(site.accepts_invalid_certs());
        assert!(site.includes_system_tasks());
    }

    #[test]
    fn first_site_becomes_current_and_upsert_replaces() {
        let mut config = Config::default();
        config.upsert_site(Site::new("a", "https://a", "u", "p", "org"));
        config.upsert_site(Site::new("b", "https://b", "u", "p", "org"));
        assert_eq!(config.current_site, "a");

        config.upsert_site(Site::new("a", "https://a2", "u", "p", "org"));
        assert_eq!(config.sites.len(), 2);
        assert_eq!(config.site("a").unwrap().endpoint, "https://a2");

        config.use_site("b").unwrap();
        assert_eq!(config.current_site, "b");
        assert!(config.use_site("missing").is_err());

        config.remove_site("b").unwrap();
        assert_eq!(config.current_site, "a");
    }

    #[test]
    fn missing_current_site_is_config_error() {
        let config = Config::default();
        assert!(matches!(config.current_site(), Err(VcdError::Config(_))));
    }
}
