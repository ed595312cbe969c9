use serde::{Deserialize, Serialize};
use std::fmt;

/// Display color of a folder, from a fixed palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FolderColor {
    #[default]
    Accent,
    Rose,
    Orange,
    Amber,
    Green,
    Blue,
    Indigo,
    Purple,
}

impl FolderColor {
    pub const ALL: [FolderColor; 8] = [
        FolderColor::Accent,
        FolderColor::Rose,
        FolderColor::Orange,
        FolderColor::Amber,
        FolderColor::Green,
        FolderColor::Blue,
        FolderColor::Indigo,
        FolderColor::Purple,
    ];

    /// The stored tag (kept compatible with existing notebook data)
    pub fn tag(self) -> &'static str {
        match self {
            FolderColor::Accent => "text-accent",
            FolderColor::Rose => "text-rose-500",
            FolderColor::Orange => "text-orange-500",
            FolderColor::Amber => "text-amber-500",
            FolderColor::Green => "text-green-600",
            FolderColor::Blue => "text-blue-500",
            FolderColor::Indigo => "text-indigo-500",
            FolderColor::Purple => "text-purple-500",
        }
    }

    /// Short user-facing name (`accent`, `rose`, ...)
    pub fn name(self) -> &'static str {
        match self {
            FolderColor::Accent => "accent",
            FolderColor::Rose => "rose",
            FolderColor::Orange => "orange",
            FolderColor::Amber => "amber",
            FolderColor::Green => "green",
            FolderColor::Blue => "blue",
            FolderColor::Indigo => "indigo",
            FolderColor::Purple => "purple",
        }
    }

    /// Parse either a short name or a stored tag. Case-insensitive.
    pub fn parse_color(s: &str) -> Option<FolderColor> {
        let s = s.trim().to_lowercase();
        FolderColor::ALL
            .into_iter()
            .find(|c| c.name() == s || c.tag() == s)
    }
}

impl From<String> for FolderColor {
    fn from(s: String) -> Self {
        FolderColor::parse_color(&s).unwrap_or_default()
    }
}

impl From<FolderColor> for String {
    fn from(c: FolderColor) -> Self {
        c.tag().to_string()
    }
}

impl fmt::Display for FolderColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named grouping of pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: FolderColor,
    /// Epoch milliseconds
    pub created_at: i64,
}

impl Folder {
    pub fn new(id: String, name: String, color: FolderColor, created_at: i64) -> Self {
        Folder {
            id,
            name,
            color,
            created_at,
        }
    }
}

/// Partial update for a folder. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderUpdate {
    pub name: Option<String>,
    pub color: Option<FolderColor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse_name_and_tag() {
        assert_eq!(FolderColor::parse_color("rose"), Some(FolderColor::Rose));
        assert_eq!(
            FolderColor::parse_color("text-green-600"),
            Some(FolderColor::Green)
        );
        assert_eq!(FolderColor::parse_color(" BLUE "), Some(FolderColor::Blue));
        assert_eq!(FolderColor::parse_color("chartreuse"), None);
    }

    #[test]
    fn test_folder_json_uses_stored_tags() {
        let folder = Folder::new("f1".into(), "Work".into(), FolderColor::Indigo, 42);
        let json = serde_json::to_string(&folder).unwrap();
        assert_eq!(
            json,
            r#"{"id":"f1","name":"Work","color":"text-indigo-500","createdAt":42}"#
        );
    }

    #[test]
    fn test_unknown_or_missing_color_reads_as_accent() {
        let f: Folder =
            serde_json::from_str(r#"{"id":"a","name":"A","color":"text-lime-300","createdAt":1}"#)
                .unwrap();
        assert_eq!(f.color, FolderColor::Accent);
        let f: Folder = serde_json::from_str(r#"{"id":"b","name":"B","createdAt":1}"#).unwrap();
        assert_eq!(f.color, FolderColor::Accent);
    }
}
