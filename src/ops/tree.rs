use crate::model::folder::Folder;
use crate::model::notebook::Notebook;
use crate::model::page::Page;
use crate::ops::search::filter_pages;

/// One folder and the pages listed under it
#[derive(Debug)]
pub struct FolderSection<'a> {
    pub folder: &'a Folder,
    pub expanded: bool,
    pub pages: Vec<&'a Page>,
}

/// The grouped listing a sidebar shows: pinned pages first, then each folder,
/// then unorganized pages. Pinned pages appear only in the pinned section.
/// Pages whose folder does not exist appear nowhere.
#[derive(Debug)]
pub struct TreeView<'a> {
    pub pinned: Vec<&'a Page>,
    pub folders: Vec<FolderSection<'a>>,
    pub unorganized: Vec<&'a Page>,
}

impl TreeView<'_> {
    pub fn page_count(&self) -> usize {
        self.pinned.len()
            + self.unorganized.len()
            + self.folders.iter().map(|s| s.pages.len()).sum::<usize>()
    }
}

/// Build the grouped view, keeping only pages whose title contains `query`
/// (case-insensitive). Folders are always listed, even when empty.
pub fn tree_view<'a>(nb: &'a Notebook, query: &str) -> TreeView<'a> {
    let visible = filter_pages(&nb.pages, query);

    let pinned = visible.iter().copied().filter(|p| p.is_pinned).collect();
    let folders = nb
        .folders
        .iter()
        .map(|folder| FolderSection {
            folder,
            expanded: nb.is_expanded(&folder.id),
            pages: visible
                .iter()
                .copied()
                .filter(|p| !p.is_pinned && p.in_folder(&folder.id))
                .collect(),
        })
        .collect();
    let unorganized = visible
        .iter()
        .copied()
        .filter(|p| !p.is_pinned && p.folder_id.is_none())
        .collect();

    TreeView {
        pinned,
        folders,
        unorganized,
    }
}
