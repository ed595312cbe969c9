use serde::{Deserialize, Serialize};

use super::folder::FolderColor;

/// Configuration from folio.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub notebook: NotebookConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookConfig {
    /// Color used by `folder add` when `--color` is not given
    #[serde(default)]
    pub default_color: FolderColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Titles longer than this many terminal cells are truncated in `tree`
    #[serde(default = "default_title_width")]
    pub title_width: usize,
    #[serde(default = "default_true")]
    pub show_ids: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            title_width: default_title_width(),
            show_ids: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing filter directive; `FOLIO_LOG` wins when set
    #[serde(default)]
    pub level: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_title_width() -> usize {
    40
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FolioConfig = toml::from_str("").unwrap();
        assert_eq!(config, FolioConfig::default());
        assert_eq!(config.ui.title_width, 40);
        assert!(config.ui.show_ids);
        assert_eq!(config.notebook.default_color, FolderColor::Accent);
    }

    #[test]
    fn test_partial_config() {
        let config: FolioConfig = toml::from_str(
            r#"
[notebook]
default_color = "purple"

[ui]
show_ids = false

[log]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.notebook.default_color, FolderColor::Purple);
        assert!(!config.ui.show_ids);
        assert_eq!(config.ui.title_width, 40);
        assert_eq!(config.log.level.as_deref(), Some("debug"));
    }
}
