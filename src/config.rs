use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::api::DEFAULT_API_URL;
use crate::error::ConfigError;
use crate::paths::paths;
use crate::pipeline::DEFAULT_COOLDOWN;

/// Settings loaded from `config.toml`.
///
/// Every key is optional; command-line flags override what is found here.
///
/// Example TOML:
/// ```toml
/// api_url       = "https://api.github.com"
/// user_agent    = "commitfetch"
/// cooldown_secs = 3602
/// credentials   = "/home/me/.config/commitfetch/credentials.txt"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_url: String,
    pub user_agent: String,
    pub cooldown_secs: u64,
    pub credentials: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: concat!("commitfetch/", env!("CARGO_PKG_VERSION")).to_string(),
            cooldown_secs: DEFAULT_COOLDOWN.as_secs(),
            credentials: None,
        }
    }
}

impl Config {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

/// Load `config.toml` from the commitfetch home directory.
///
/// # Errors
/// - [`ConfigError::NoHome`] if no home directory can be determined.
/// - See [`load_config_from`].
pub fn load_config() -> Result<Config, ConfigError> {
    let p = paths()?;
    load_config_from(&p.config)
}

/// Load a config file; a missing file yields [`Config::default`].
///
/// # Errors
/// - [`ConfigError::Read`] if the file exists but cannot be read.
/// - [`ConfigError::Parse`] if it is not valid TOML for [`Config`].
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let txt = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&txt).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
