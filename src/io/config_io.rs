use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::FolioConfig;

pub const CONFIG_FILE: &str = "folio.toml";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Pick the data directory: explicit flag, then `FOLIO_DIR`, then
/// `$XDG_DATA_HOME/folio`, then `~/.local/share/folio`.
pub fn resolve_data_dir(flag: Option<&str>) -> PathBuf {
    if let Some(dir) = flag {
        return PathBuf::from(dir);
    }
    if let Some(dir) = non_empty_env("FOLIO_DIR") {
        return PathBuf::from(dir);
    }
    let data_home = non_empty_env("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".local").join("share"));
    data_home.join("folio")
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read `folio.toml` from the data directory. A missing file yields defaults.
pub fn read_config(data_dir: &Path) -> Result<FolioConfig, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FolioConfig::default()),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::folder::FolderColor;
    use tempfile::TempDir;

    #[test]
    fn test_flag_wins() {
        assert_eq!(resolve_data_dir(Some("/tmp/nb")), PathBuf::from("/tmp/nb"));
    }

    #[test]
    fn test_missing_config_is_default() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(read_config(tmp.path()).unwrap(), FolioConfig::default());
    }

    #[test]
    fn test_read_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[notebook]\ndefault_color = \"text-rose-500\"\n\n[ui]\ntitle_width = 12\n",
        )
        .unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.notebook.default_color, FolderColor::Rose);
        assert_eq!(config.ui.title_width, 12);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[ui\ntitle_width = ").unwrap();
        assert!(matches!(
            read_config(tmp.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
