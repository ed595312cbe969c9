use serde::{Deserialize, Deserializer, Serialize};

/// Title given to freshly created pages, and shown for blank titles
pub const DEFAULT_TITLE: &str = "Untitled";
/// Icon given to freshly created pages
pub const DEFAULT_ICON: &str = "📄";

/// A single note: metadata plus a free-text (markdown) body.
///
/// Everything but `id` reads leniently: a missing or `null` field takes its
/// default, so one sloppy record never makes the collection unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Epoch milliseconds, refreshed on every mutation
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: i64,
    /// Owning folder. `None` means the page is unorganized (root).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_pinned: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_locked: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Page {
    /// Create a page with the default title, icon and empty content
    pub fn new(id: String, folder_id: Option<String>, now: i64) -> Self {
        Page {
            id,
            title: DEFAULT_TITLE.to_string(),
            icon: DEFAULT_ICON.to_string(),
            content: String::new(),
            updated_at: now,
            folder_id,
            is_pinned: false,
            is_locked: false,
        }
    }

    /// Title for display, with the `Untitled` fallback
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            DEFAULT_TITLE
        } else {
            &self.title
        }
    }

    pub fn in_folder(&self, folder_id: &str) -> bool {
        self.folder_id.as_deref() == Some(folder_id)
    }
}

/// Partial update for a page. `None` fields are left alone.
///
/// `folder_id` is doubly optional: `Some(None)` moves the page to root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageUpdate {
    pub title: Option<String>,
    pub icon: Option<String>,
    pub content: Option<String>,
    pub is_locked: Option<bool>,
    pub is_pinned: Option<bool>,
    pub folder_id: Option<Option<String>>,
}

impl PageUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        PageUpdate {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        PageUpdate {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == PageUpdate::default()
    }

    /// Apply every present field to `page`. Timestamps are the caller's job.
    pub fn apply_to(self, page: &mut Page) {
        if let Some(title) = self.title {
            page.title = title;
        }
        if let Some(icon) = self.icon {
            page.icon = icon;
        }
        if let Some(content) = self.content {
            page.content = content;
        }
        if let Some(locked) = self.is_locked {
            page.is_locked = locked;
        }
        if let Some(pinned) = self.is_pinned {
            page.is_pinned = pinned;
        }
        if let Some(folder_id) = self.folder_id {
            page.folder_id = folder_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_page_defaults() {
        let page = Page::new("p1".into(), Some("f1".into()), 7);
        assert_eq!(page.title, "Untitled");
        assert_eq!(page.icon, "📄");
        assert!(page.content.is_empty());
        assert_eq!(page.updated_at, 7);
        assert!(page.in_folder("f1"));
        assert!(!page.is_pinned);
        assert!(!page.is_locked);
    }

    #[test]
    fn test_display_title_fallback() {
        let mut page = Page::new("p1".into(), None, 0);
        page.title.clear();
        assert_eq!(page.display_title(), "Untitled");
        page.title = "Ideas".into();
        assert_eq!(page.display_title(), "Ideas");
    }

    #[test]
    fn test_minimal_json_fills_defaults() {
        let page: Page =
            serde_json::from_str(r#"{"id":"x","title":"Hi","icon":"👋","content":"","updatedAt":5}"#)
                .unwrap();
        assert_eq!(page.folder_id, None);
        assert!(!page.is_pinned);
        assert!(!page.is_locked);
    }

    #[test]
    fn test_null_and_missing_fields_read_as_defaults() {
        let page: Page = serde_json::from_str(
            r#"{"id":"b","title":null,"icon":null,"content":null,"isPinned":null}"#,
        )
        .unwrap();
        assert_eq!(page.title, "");
        assert_eq!(page.display_title(), "Untitled");
        assert_eq!(page.updated_at, 0);
        assert!(!page.is_pinned);
    }

    #[test]
    fn test_wrong_types_still_rejected() {
        assert!(serde_json::from_str::<Page>(r#"{"id":7,"title":"x"}"#).is_err());
        assert!(serde_json::from_str::<Page>(r#"{"id":"a","title":["x"]}"#).is_err());
    }

    #[test]
    fn test_root_page_omits_folder_id() {
        let page = Page::new("p".into(), None, 1);
        let json = serde_json::to_string(&page).unwrap();
        assert!(!json.contains("folderId"));
        assert!(json.contains(r#""isPinned":false"#));
    }

    #[test]
    fn test_update_moves_to_root() {
        let mut page = Page::new("p".into(), Some("f".into()), 1);
        PageUpdate {
            folder_id: Some(None),
            ..Default::default()
        }
        .apply_to(&mut page);
        assert_eq!(page.folder_id, None);
    }
}
