use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: char = '\u{2026}';

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Truncate to at most `max_cells` terminal cells, ending in `…` when cut.
/// Never splits a grapheme cluster (page icons are often multi-codepoint emoji).
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let gw = grapheme_width(g);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(g);
    }
    out.push(ELLIPSIS);
    out
}

/// Right-pad with spaces to `cells` terminal cells.
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let w = display_width(s);
    if w >= cells {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(cells - w))
    }
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" {
        return 4;
    }
    UnicodeWidthStr::width(g)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_width_ascii_and_emoji() {
        assert_eq!(display_width("notes"), 5);
        assert_eq!(display_width("📄"), 2);
        assert_eq!(display_width("👋 hi"), 5);
    }

    #[test]
    fn display_width_cjk_and_tab() {
        assert_eq!(display_width("日記"), 4);
        assert_eq!(display_width("a\tb"), 6);
    }

    #[test]
    fn truncate_leaves_short_titles() {
        assert_eq!(truncate_to_width("Welcome", 10), "Welcome");
        assert_eq!(truncate_to_width("Welcome", 7), "Welcome");
    }

    #[test]
    fn truncate_long_title() {
        assert_eq!(
            truncate_to_width("Meeting notes for Monday", 10),
            "Meeting n\u{2026}"
        );
    }

    #[test]
    fn truncate_never_splits_wide_chars() {
        let result = truncate_to_width("日記日記", 4);
        assert!(display_width(&result) <= 4);
        assert!(result.ends_with(ELLIPSIS));
    }

    #[test]
    fn truncate_zero_and_one() {
        assert_eq!(truncate_to_width("abc", 0), "");
        assert_eq!(truncate_to_width("abc", 1), "\u{2026}");
    }

    #[test]
    fn pad_accounts_for_wide_chars() {
        assert_eq!(pad_to_width("📄", 4), "📄  ");
        assert_eq!(pad_to_width("long", 2), "long");
    }
}
