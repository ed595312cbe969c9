use std::ops::Range;

use regex::Regex;

use crate::model::notebook::Notebook;
use crate::model::page::Page;

/// Which field of a page matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Content,
}

impl MatchField {
    pub fn name(self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Content => "content",
        }
    }
}

/// A search hit for a page field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub page_id: String,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search page titles and bodies. Locked pages only match on title, so a
/// search never reveals what a locked body contains.
pub fn search_pages(nb: &Notebook, re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for page in &nb.pages {
        let spans = find_matches(re, &page.title);
        if !spans.is_empty() {
            hits.push(SearchHit {
                page_id: page.id.clone(),
                field: MatchField::Title,
                spans,
            });
        }

        if page.is_locked {
            continue;
        }
        let spans = find_matches(re, &page.content);
        if !spans.is_empty() {
            hits.push(SearchHit {
                page_id: page.id.clone(),
                field: MatchField::Content,
                spans,
            });
        }
    }
    hits
}

/// Case-insensitive substring filter on titles. An empty query keeps all.
pub fn filter_pages<'a>(pages: impl IntoIterator<Item = &'a Page>, query: &str) -> Vec<&'a Page> {
    let needle = query.to_lowercase();
    pages
        .into_iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
        .collect()
}

/// Most recently updated first. Ties keep insertion order.
pub fn newest_first<'a>(pages: impl IntoIterator<Item = &'a Page>) -> Vec<&'a Page> {
    let mut out: Vec<&Page> = pages.into_iter().collect();
    out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: &str, title: &str, content: &str, updated_at: i64) -> Page {
        let mut p = Page::new(id.into(), None, updated_at);
        p.title = title.into();
        p.content = content.into();
        p
    }

    fn sample() -> Notebook {
        let mut secret = page("p3", "Diary", "the plan is secret", 3);
        secret.is_locked = true;
        Notebook::new(
            Vec::new(),
            vec![
                page("p1", "Project plan", "- [ ] draft", 1),
                page("p2", "Groceries", "milk, plan meals", 2),
                secret,
            ],
        )
    }

    #[test]
    fn test_search_title_and_content() {
        let nb = sample();
        let re = Regex::new("(?i)plan").unwrap();
        let hits = search_pages(&nb, &re);
        let found: Vec<_> = hits.iter().map(|h| (h.page_id.as_str(), h.field)).collect();
        assert_eq!(
            found,
            vec![("p1", MatchField::Title), ("p2", MatchField::Content)]
        );
        assert_eq!(hits[0].spans, vec![8..12]);
    }

    #[test]
    fn test_search_skips_locked_content() {
        let nb = sample();
        let re = Regex::new("secret").unwrap();
        assert!(search_pages(&nb, &re).is_empty());
        let re = Regex::new("Diary").unwrap();
        assert_eq!(search_pages(&nb, &re).len(), 1);
    }

    #[test]
    fn test_filter_pages_case_insensitive() {
        let nb = sample();
        let ids: Vec<_> = filter_pages(&nb.pages, "PLAN").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1"]);
        assert_eq!(filter_pages(&nb.pages, "").len(), 3);
        assert!(filter_pages(&nb.pages, "zzz").is_empty());
    }

    #[test]
    fn test_newest_first() {
        let nb = sample();
        let ids: Vec<_> = newest_first(&nb.pages).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p3", "p2", "p1"]);
    }
}
