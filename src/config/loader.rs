use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "arelle-client.json";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProfileConfig {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub executable: Option<String>,
    #[serde(rename = "configHome")]
    pub config_home: Option<String>,
    pub env: Option<String>,
    #[serde(rename = "extraArgs")]
    pub extra_args: Option<String>,
    pub plugins: Option<Vec<String>>,
    #[serde(rename = "outputDir")]
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    pub profiles: HashMap<String, ProfileConfig>,
    #[serde(rename = "defaultProfile")]
    pub default_profile: Option<String>,
    #[serde(flatten)]
    pub defaults: ProfileConfig,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ClientConfig,
    pub path: PathBuf,
    pub dir: PathBuf,
}

/// Loads `arelle-client.json` from a directory, or the given file directly.
/// A missing file is not an error.
pub fn load_config(target: &Path) -> Result<Option<LoadedConfig>> {
    let resolved = if target.is_absolute() {
        target.to_path_buf()
    } else {
        std::env::current_dir()?.join(target)
    };

    let (file_path, dir) = if resolved.is_dir() {
        (resolved.join(CONFIG_FILE_NAME), resolved)
    } else {
        let dir = match resolved.parent() {
            Some(parent) => parent.to_path_buf(),
            None => std::env::current_dir()?,
        };
        (resolved, dir)
    };

    if !file_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&file_path)
        .with_context(|| format!("reading config {}", file_path.display()))?;

    let config: ClientConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", file_path.display()))?;

    Ok(Some(LoadedConfig {
        config,
        path: file_path,
        dir,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn returns_none_when_config_missing() -> Result<()> {
        let temp = tempdir()?;
        assert!(load_config(temp.path())?.is_none());
        Ok(())
    }

    #[test]
    fn loads_defaults_and_profiles_from_directory() -> Result<()> {
        let temp = tempdir()?;
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &config_path,
            r#"{
  "host": "arelle.internal",
  "port": 8090,
  "defaultProfile": "edgar",
  "profiles": {
    "edgar": {"plugins": ["EdgarRenderer"], "extraArgs": "--disclosureSystem efm-pragmatic"}
  }
}"#,
        )?;

        let loaded = load_config(temp.path())?.expect("config should load");
        assert_eq!(loaded.path, config_path);
        assert_eq!(loaded.dir, temp.path());
        assert_eq!(loaded.config.defaults.host.as_deref(), Some("arelle.internal"));
        assert_eq!(loaded.config.defaults.port, Some(8090));
        assert_eq!(loaded.config.default_profile.as_deref(), Some("edgar"));
        let edgar = &loaded.config.profiles["edgar"];
        assert_eq!(edgar.plugins, Some(vec!["EdgarRenderer".to_string()]));
        Ok(())
    }

    #[test]
    fn loads_explicit_file_path() -> Result<()> {
        let temp = tempdir()?;
        let config_path = temp.path().join("custom.json");
        std::fs::write(&config_path, r#"{"executable": "/opt/arelle/arelleCmdLine"}"#)?;

        let loaded = load_config(&config_path)?.expect("config should load");
        assert_eq!(loaded.dir, temp.path());
        assert_eq!(
            loaded.config.defaults.executable.as_deref(),
            Some("/opt/arelle/arelleCmdLine")
        );
        Ok(())
    }

    #[test]
    fn reports_malformed_json() -> Result<()> {
        let temp = tempdir()?;
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "{ not json")?;
        let err = load_config(temp.path()).unwrap_err();
        assert!(err.to_string().contains("parsing config"));
        Ok(())
    }
}
