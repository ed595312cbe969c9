//! Helpers over page bodies. The body is treated as opaque lines of text;
//! only the `[ ]` / `[x]` checkbox markers are interpreted.

use crate::model::page::Page;

const UNCHECKED: &str = "[ ]";
const CHECKED: &str = "[x]";

/// Flip the first checkbox marker on the given 0-based line.
/// Returns the new body, or `None` if the line is missing or has no marker.
pub fn toggle_checkbox(content: &str, line: usize) -> Option<String> {
    let target = content.split('\n').nth(line)?;
    let replaced = if target.contains(UNCHECKED) {
        target.replacen(UNCHECKED, CHECKED, 1)
    } else if target.contains(CHECKED) {
        target.replacen(CHECKED, UNCHECKED, 1)
    } else {
        return None;
    };
    let lines: Vec<&str> = content
        .split('\n')
        .enumerate()
        .map(|(i, l)| if i == line { replaced.as_str() } else { l })
        .collect();
    Some(lines.join("\n"))
}

/// File name for exporting a page as markdown: `<title>.md`.
pub fn markdown_file_name(page: &Page) -> String {
    let title: String = page
        .display_title()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '-',
            c => c,
        })
        .collect();
    let title = title.trim().trim_start_matches('.');
    if title.is_empty() {
        "Untitled.md".to_string()
    } else {
        format!("{}.md", title)
    }
}

/// Counts shown alongside a page body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentStats {
    pub words: usize,
    pub lines: usize,
    pub checkboxes: usize,
    pub checked: usize,
}

pub fn content_stats(content: &str) -> ContentStats {
    let mut stats = ContentStats {
        words: content.split_whitespace().count(),
        lines: if content.is_empty() {
            0
        } else {
            content.split('\n').count()
        },
        ..Default::default()
    };
    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("- [ ] ") {
            stats.checkboxes += 1;
        } else if trimmed.starts_with("- [x] ") {
            stats.checkboxes += 1;
            stats.checked += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "# Welcome\n\n- [ ] Try creating a folder\n- [x] Drag this note into it";

    #[test]
    fn test_toggle_unchecked_to_checked() {
        let out = toggle_checkbox(BODY, 2).unwrap();
        assert_eq!(
            out,
            "# Welcome\n\n- [x] Try creating a folder\n- [x] Drag this note into it"
        );
    }

    #[test]
    fn test_toggle_checked_to_unchecked() {
        let out = toggle_checkbox(BODY, 3).unwrap();
        assert!(out.ends_with("- [ ] Drag this note into it"));
    }

    #[test]
    fn test_toggle_line_without_box() {
        assert_eq!(toggle_checkbox(BODY, 0), None);
        assert_eq!(toggle_checkbox(BODY, 1), None);
    }

    #[test]
    fn test_toggle_out_of_range() {
        assert_eq!(toggle_checkbox(BODY, 99), None);
        assert_eq!(toggle_checkbox("", 1), None);
    }

    #[test]
    fn test_markdown_file_name() {
        let mut page = Page::new("p".into(), None, 0);
        page.title = "Q3 plans".into();
        assert_eq!(markdown_file_name(&page), "Q3 plans.md");
        page.title = "a/b: c".into();
        assert_eq!(markdown_file_name(&page), "a-b- c.md");
        page.title = String::new();
        assert_eq!(markdown_file_name(&page), "Untitled.md");
        page.title = "..".into();
        assert_eq!(markdown_file_name(&page), "Untitled.md");
    }

    #[test]
    fn test_content_stats() {
        let stats = content_stats(BODY);
        assert_eq!(stats.lines, 4);
        assert_eq!(stats.checkboxes, 2);
        assert_eq!(stats.checked, 1);
        assert_eq!(stats.words, 16);
        assert_eq!(content_stats(""), ContentStats::default());
    }
}
