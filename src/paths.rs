//! XDG-style path utilities for configuration and local data.
//!
//! XDG Base Directory conventions are preferred over OS-specific locations
//! so that the layout is the same on every platform.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "chatabubble";

/// Returns the configuration directory.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/chatabubble` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/chatabubble` otherwise
pub fn config_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

/// Returns the data directory holding the local session store.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/chatabubble` if `XDG_DATA_HOME` is set
/// 2. `~/.local/share/chatabubble` otherwise
pub fn data_dir() -> Result<PathBuf> {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}

fn xdg_dir(env_var: &str, fallback: &[&str]) -> Result<PathBuf> {
    if let Ok(base) = std::env::var(env_var)
        && !base.is_empty()
    {
        return Ok(PathBuf::from(base).join(APP_DIR));
    }

    let mut dir = dirs::home_dir().context("Failed to determine home directory")?;
    for part in fallback {
        dir.push(part);
    }
    Ok(dir.join(APP_DIR))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_env<F: FnOnce()>(key: &str, value: Option<&str>, f: F) {
        let original = std::env::var(key).ok();
        match value {
            Some(v) => unsafe { std::env::set_var(key, v) },
            None => unsafe { std::env::remove_var(key) },
        }

        f();

        match original {
            Some(v) => unsafe { std::env::set_var(key, v) },
            None => unsafe { std::env::remove_var(key) },
        }
    }

    #[test]
    #[serial]
    fn test_config_dir_default() {
        with_env("XDG_CONFIG_HOME", None, || {
            assert!(config_dir().unwrap().ends_with(".config/chatabubble"));
        });
    }

    #[test]
    #[serial]
    fn test_config_dir_xdg_override() {
        with_env("XDG_CONFIG_HOME", Some("/custom/config"), || {
            assert_eq!(
                config_dir().unwrap(),
                PathBuf::from("/custom/config/chatabubble")
            );
        });
    }

    #[test]
    #[serial]
    fn test_data_dir_default() {
        with_env("XDG_DATA_HOME", None, || {
            assert!(data_dir().unwrap().ends_with(".local/share/chatabubble"));
        });
    }

    #[test]
    #[serial]
    fn test_data_dir_xdg_override() {
        with_env("XDG_DATA_HOME", Some("/custom/data"), || {
            assert_eq!(data_dir().unwrap(), PathBuf::from("/custom/data/chatabubble"));
        });
    }

    #[test]
    #[serial]
    fn test_empty_xdg_value_falls_back() {
        with_env("XDG_DATA_HOME", Some(""), || {
            assert!(data_dir().unwrap().ends_with(".local/share/chatabubble"));
        });
    }
}
