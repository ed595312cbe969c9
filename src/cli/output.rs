use chrono::DateTime;
use serde::Serialize;

use crate::model::config::UiConfig;
use crate::model::folder::{Folder, FolderColor};
use crate::model::page::Page;
use crate::ops::content::ContentStats;
use crate::ops::search::SearchHit;
use crate::ops::tree::TreeView;
use crate::util::unicode::{pad_to_width, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct FolderJson {
    pub id: String,
    pub name: String,
    pub color: String,
    pub color_class: String,
    pub created_at: i64,
}

#[derive(Serialize)]
pub struct PageJson {
    pub id: String,
    pub title: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    pub updated_at: i64,
    pub is_pinned: bool,
    pub is_locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Serialize)]
pub struct PageDetailJson {
    #[serde(flatten)]
    pub page: PageJson,
    pub stats: StatsJson,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub words: usize,
    pub lines: usize,
    pub checkboxes: usize,
    pub checked: usize,
}

#[derive(Serialize)]
pub struct FolderSectionJson {
    #[serde(flatten)]
    pub folder: FolderJson,
    pub expanded: bool,
    pub pages: Vec<PageJson>,
}

#[derive(Serialize)]
pub struct TreeJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_page_id: Option<String>,
    pub pinned: Vec<PageJson>,
    pub folders: Vec<FolderSectionJson>,
    pub unorganized: Vec<PageJson>,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub page_id: String,
    pub title: String,
    pub field: String,
    pub matches: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn folder_to_json(folder: &Folder) -> FolderJson {
    FolderJson {
        id: folder.id.clone(),
        name: folder.name.clone(),
        color: folder.color.name().to_string(),
        color_class: folder.color.tag().to_string(),
        created_at: folder.created_at,
    }
}

/// Page metadata without the body
pub fn page_to_json(page: &Page) -> PageJson {
    PageJson {
        id: page.id.clone(),
        title: page.title.clone(),
        icon: page.icon.clone(),
        folder_id: page.folder_id.clone(),
        updated_at: page.updated_at,
        is_pinned: page.is_pinned,
        is_locked: page.is_locked,
        content: None,
    }
}

/// Page metadata plus the body, unless it is locked and not revealed
pub fn page_detail_to_json(page: &Page, stats: ContentStats, reveal: bool) -> PageDetailJson {
    let mut json = page_to_json(page);
    if !page.is_locked || reveal {
        json.content = Some(page.content.clone());
    }
    PageDetailJson {
        page: json,
        stats: StatsJson {
            words: stats.words,
            lines: stats.lines,
            checkboxes: stats.checkboxes,
            checked: stats.checked,
        },
    }
}

pub fn tree_to_json(view: &TreeView, active_page_id: Option<&str>) -> TreeJson {
    TreeJson {
        active_page_id: active_page_id.map(str::to_string),
        pinned: view.pinned.iter().map(|p| page_to_json(p)).collect(),
        folders: view
            .folders
            .iter()
            .map(|section| FolderSectionJson {
                folder: folder_to_json(section.folder),
                expanded: section.expanded,
                pages: section.pages.iter().map(|p| page_to_json(p)).collect(),
            })
            .collect(),
        unorganized: view.unorganized.iter().map(|p| page_to_json(p)).collect(),
    }
}

pub fn hit_to_json(hit: &SearchHit, title: &str) -> SearchHitJson {
    SearchHitJson {
        page_id: hit.page_id.clone(),
        title: title.to_string(),
        field: hit.field.name().to_string(),
        matches: hit.spans.len(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `* 📄 Title  id` with the title truncated (and padded, when ids are shown)
/// to the configured width. `*` marks the active page.
pub fn format_page_line(page: &Page, active: bool, ui: &UiConfig) -> String {
    let marker = if active { '*' } else { ' ' };
    let title = truncate_to_width(page.display_title(), ui.title_width);
    let mut line = format!("{} {} ", marker, page.icon);
    if ui.show_ids {
        line.push_str(&pad_to_width(&title, ui.title_width));
        line.push_str("  ");
        line.push_str(&page.id);
    } else {
        line.push_str(&title);
    }
    if page.is_locked {
        line.push_str("  [locked]");
    }
    line
}

/// Render the grouped tree. Collapsed folders show only their header and
/// page count; empty pinned and unorganized sections are omitted.
pub fn format_tree(view: &TreeView, active_page_id: Option<&str>, ui: &UiConfig) -> Vec<String> {
    let is_active = |page: &Page| active_page_id == Some(page.id.as_str());
    let mut lines = Vec::new();

    if !view.pinned.is_empty() {
        lines.push("Pinned".to_string());
        for page in &view.pinned {
            lines.push(format!("  {}", format_page_line(page, is_active(page), ui)));
        }
    }

    for section in &view.folders {
        let arrow = if section.expanded { '▾' } else { '▸' };
        let mut header = format!("{} {} ({})", arrow, section.folder.name, section.pages.len());
        if ui.show_ids {
            header = format!("{}  {}", header, section.folder.id);
        }
        lines.push(header);
        if section.expanded {
            for page in &section.pages {
                lines.push(format!("  {}", format_page_line(page, is_active(page), ui)));
            }
        }
    }

    if !view.unorganized.is_empty() {
        lines.push("Unorganized".to_string());
        for page in &view.unorganized {
            lines.push(format!("  {}", format_page_line(page, is_active(page), ui)));
        }
    }
    lines
}

/// `id  name  [color]  (n pages)`
pub fn format_folder_line(folder: &Folder, page_count: usize) -> String {
    let noun = if page_count == 1 { "page" } else { "pages" };
    format!(
        "{}  {}  [{}]  ({} {})",
        folder.id,
        folder.name,
        folder.color.name(),
        page_count,
        noun
    )
}

/// Header block for `page show`, without the body
pub fn format_page_detail(page: &Page, folder_name: Option<&str>, stats: ContentStats) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", page.icon, page.display_title()),
        format!("id:       {}", page.id),
    ];
    let folder = match (&page.folder_id, folder_name) {
        (None, _) => "Unorganized".to_string(),
        (Some(id), Some(name)) => format!("{} ({})", name, id),
        (Some(id), None) => format!("{} (missing)", id),
    };
    lines.push(format!("folder:   {}", folder));
    lines.push(format!("updated:  {}", format_millis(page.updated_at)));

    let mut flags = Vec::new();
    if page.is_pinned {
        flags.push("pinned");
    }
    if page.is_locked {
        flags.push("locked");
    }
    if !flags.is_empty() {
        lines.push(format!("flags:    {}", flags.join(", ")));
    }

    let mut summary = format!("{} words, {} lines", stats.words, stats.lines);
    if stats.checkboxes > 0 {
        summary.push_str(&format!(", {}/{} checked", stats.checked, stats.checkboxes));
    }
    lines.push(format!("stats:    {}", summary));
    lines
}

/// Epoch milliseconds as `YYYY-MM-DD HH:MM` UTC
pub fn format_millis(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => millis.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse a color by palette name or class tag
pub fn parse_folder_color(s: &str) -> Result<FolderColor, String> {
    FolderColor::parse_color(s).ok_or_else(|| {
        let names: Vec<&str> = FolderColor::ALL.iter().map(|c| c.name()).collect();
        format!("unknown color '{}' (expected one of: {})", s, names.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::notebook::Notebook;
    use crate::ops::tree::tree_view;

    fn page(id: &str, title: &str, folder: Option<&str>) -> Page {
        let mut page = Page::new(id.to_string(), folder.map(str::to_string), 0);
        page.title = title.to_string();
        page
    }

    fn sample() -> Notebook {
        let folders = vec![
            Folder::new("f1".into(), "Work".into(), FolderColor::Blue, 0),
            Folder::new("f2".into(), "Archive".into(), FolderColor::Accent, 0),
        ];
        let mut roadmap = page("p2", "Roadmap for the next two quarters", Some("f1"));
        roadmap.is_pinned = true;
        let mut diary = page("p4", "Diary", None);
        diary.is_locked = true;
        let pages = vec![
            page("p1", "Standup", Some("f1")),
            roadmap,
            page("p3", "Old plans", Some("f2")),
            diary,
            page("p5", "", None),
        ];
        let mut nb = Notebook::new(folders, pages);
        nb.expanded.insert("f1".into());
        nb.active_page_id = Some("p1".into());
        nb
    }

    #[test]
    fn test_format_tree() {
        let nb = sample();
        let view = tree_view(&nb, "");
        let ui = UiConfig {
            title_width: 12,
            show_ids: true,
        };
        let out = format_tree(&view, nb.active_page_id.as_deref(), &ui).join("\n");
        insta::assert_snapshot!(out, @r"
        Pinned
            📄 Roadmap for…  p2
        ▾ Work (1)  f1
          * 📄 Standup       p1
        ▸ Archive (1)  f2
        Unorganized
            📄 Diary         p4  [locked]
            📄 Untitled      p5
        ");
    }

    #[test]
    fn test_format_tree_without_ids() {
        let nb = sample();
        let view = tree_view(&nb, "plan");
        let ui = UiConfig {
            title_width: 40,
            show_ids: false,
        };
        let lines = format_tree(&view, None, &ui);
        assert_eq!(lines, vec!["▾ Work (0)", "▸ Archive (1)"]);
    }

    #[test]
    fn test_locked_body_hidden_in_json() {
        let mut p = page("p", "Secret", None);
        p.content = "hidden".into();
        p.is_locked = true;
        let stats = ContentStats::default();
        assert!(page_detail_to_json(&p, stats, false).page.content.is_none());
        assert_eq!(
            page_detail_to_json(&p, stats, true).page.content.as_deref(),
            Some("hidden")
        );
    }

    #[test]
    fn test_format_folder_line() {
        let folder = Folder::new("f1".into(), "Work".into(), FolderColor::Rose, 0);
        assert_eq!(format_folder_line(&folder, 1), "f1  Work  [rose]  (1 page)");
        assert_eq!(format_folder_line(&folder, 3), "f1  Work  [rose]  (3 pages)");
    }

    #[test]
    fn test_parse_folder_color() {
        assert_eq!(parse_folder_color("green"), Ok(FolderColor::Green));
        let err = parse_folder_color("teal").unwrap_err();
        assert!(err.contains("accent, rose"));
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(0), "1970-01-01 00:00 UTC");
    }
}
