use indexmap::IndexSet;

use super::folder::Folder;
use super::page::Page;

/// The canonical folder and page collections plus the two session cursors.
///
/// Collections keep insertion order. Mutations live in `ops::folder_ops` and
/// `ops::page_ops`; this type only offers read accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notebook {
    pub folders: Vec<Folder>,
    pub pages: Vec<Page>,
    /// Currently selected page. May name a page that no longer exists.
    pub active_page_id: Option<String>,
    /// Folders whose children are shown. Stale ids are harmless.
    pub expanded: IndexSet<String>,
}

impl Notebook {
    pub fn new(folders: Vec<Folder>, pages: Vec<Page>) -> Self {
        Notebook {
            folders,
            pages,
            active_page_id: None,
            expanded: IndexSet::new(),
        }
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub(crate) fn page_mut(&mut self, id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    pub(crate) fn folder_mut(&mut self, id: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.id == id)
    }

    /// Pages whose folder matches. `None` selects the unorganized (root) pages.
    ///
    /// Pinned pages are included; hiding them is a display decision.
    pub fn pages_in(&self, folder_id: Option<&str>) -> Vec<&Page> {
        self.pages
            .iter()
            .filter(|p| p.folder_id.as_deref() == folder_id)
            .collect()
    }

    pub fn pinned_pages(&self) -> Vec<&Page> {
        self.pages.iter().filter(|p| p.is_pinned).collect()
    }

    /// Resolve the active cursor. A dangling id resolves to `None`.
    pub fn active_page(&self) -> Option<&Page> {
        self.active_page_id.as_deref().and_then(|id| self.page(id))
    }

    pub fn is_expanded(&self, folder_id: &str) -> bool {
        self.expanded.contains(folder_id)
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.folders.iter().any(|f| f.id == id) || self.pages.iter().any(|p| p.id == id)
    }

    /// Point the cursor at the first page when it is empty or dangling.
    pub fn ensure_active(&mut self) {
        if self.active_page().is_none() {
            self.active_page_id = self.pages.first().map(|p| p.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::folder::FolderColor;

    fn sample() -> Notebook {
        let folders = vec![Folder::new("f1".into(), "Work".into(), FolderColor::Accent, 1)];
        let mut pinned = Page::new("p2".into(), Some("f1".into()), 2);
        pinned.is_pinned = true;
        let pages = vec![
            Page::new("p1".into(), None, 1),
            pinned,
            Page::new("p3".into(), Some("f1".into()), 3),
        ];
        Notebook::new(folders, pages)
    }

    #[test]
    fn test_pages_in_root_and_folder() {
        let nb = sample();
        let root: Vec<_> = nb.pages_in(None).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(root, vec!["p1"]);
        let work: Vec<_> = nb.pages_in(Some("f1")).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(work, vec!["p2", "p3"]);
    }

    #[test]
    fn test_pinned_is_independent_of_folder() {
        let nb = sample();
        let pinned: Vec<_> = nb.pinned_pages().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(pinned, vec!["p2"]);
        assert!(nb.pages_in(Some("f1")).iter().any(|p| p.id == "p2"));
    }

    #[test]
    fn test_dangling_active_resolves_to_none() {
        let mut nb = sample();
        nb.active_page_id = Some("gone".into());
        assert!(nb.active_page().is_none());
    }

    #[test]
    fn test_ensure_active_picks_first_page() {
        let mut nb = sample();
        nb.ensure_active();
        assert_eq!(nb.active_page_id.as_deref(), Some("p1"));

        nb.active_page_id = Some("p3".into());
        nb.ensure_active();
        assert_eq!(nb.active_page_id.as_deref(), Some("p3"));

        let mut empty = Notebook::default();
        empty.ensure_active();
        assert_eq!(empty.active_page_id, None);
    }
}
