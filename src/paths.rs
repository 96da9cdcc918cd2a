use std::{env, path::PathBuf};

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Paths {
    pub home: PathBuf,
    pub config: PathBuf,
}

/// `$XDG_CONFIG_HOME/commitfetch`, or `$HOME/.config/commitfetch`.
pub fn commitfetch_home() -> Result<PathBuf, ConfigError> {
    let base = match env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => {
            let home = env::var_os("HOME")
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::NoHome)?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(base.join("commitfetch"))
}

pub fn paths() -> Result<Paths, ConfigError> {
    let home = commitfetch_home()?;
    Ok(Paths {
        config: home.join("config.toml"),
        home,
    })
}
