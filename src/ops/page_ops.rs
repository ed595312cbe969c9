use tracing::debug;

use crate::model::notebook::Notebook;
use crate::model::page::{Page, PageUpdate};
use crate::util::{clock, id};

/// Create a page with default title and icon, optionally inside a folder.
/// Always succeeds. The new page becomes active and its folder is expanded.
pub fn create_page(nb: &mut Notebook, folder_id: Option<&str>) -> String {
    let id = id::unique_id(|candidate| nb.has_id(candidate));
    let page = Page::new(
        id.clone(),
        folder_id.map(str::to_string),
        clock::now_millis(),
    );
    nb.pages.push(page);
    nb.active_page_id = Some(id.clone());
    if let Some(folder_id) = folder_id {
        expand(nb, folder_id);
    }
    debug!(page = %id, folder = ?folder_id, "page created");
    id
}

/// Delete a page. If it was active, the cursor moves to whichever page now
/// occupies its index (or the new last page), or clears when none remain.
/// Returns false when the page does not exist.
pub fn delete_page(nb: &mut Notebook, page_id: &str) -> bool {
    let Some(idx) = nb.pages.iter().position(|p| p.id == page_id) else {
        return false;
    };

    nb.pages.remove(idx);
    if nb.active_page_id.as_deref() == Some(page_id) {
        nb.active_page_id = if nb.pages.is_empty() {
            None
        } else {
            let next = idx.min(nb.pages.len() - 1);
            Some(nb.pages[next].id.clone())
        };
    }
    debug!(page = page_id, active = ?nb.active_page_id, "page deleted");
    true
}

/// Apply a partial update and refresh `updated_at`, even for an empty update.
/// Returns false when the page does not exist.
pub fn update_page(nb: &mut Notebook, page_id: &str, update: PageUpdate) -> bool {
    let Some(page) = nb.page_mut(page_id) else {
        return false;
    };
    update.apply_to(page);
    page.updated_at = clock::bump(page.updated_at);
    true
}

/// Move a page into a folder, or to root with `None`. The target is not
/// validated; a target folder is expanded.
pub fn move_page(nb: &mut Notebook, page_id: &str, target: Option<&str>) -> bool {
    let moved = update_page(
        nb,
        page_id,
        PageUpdate {
            folder_id: Some(target.map(str::to_string)),
            ..Default::default()
        },
    );
    if !moved {
        return false;
    }
    if let Some(target) = target {
        expand(nb, target);
    }
    debug!(page = page_id, folder = ?target, "page moved");
    true
}

pub fn pin_page(nb: &mut Notebook, page_id: &str, pinned: bool) -> bool {
    update_page(
        nb,
        page_id,
        PageUpdate {
            is_pinned: Some(pinned),
            ..Default::default()
        },
    )
}

pub fn lock_page(nb: &mut Notebook, page_id: &str, locked: bool) -> bool {
    update_page(
        nb,
        page_id,
        PageUpdate {
            is_locked: Some(locked),
            ..Default::default()
        },
    )
}

/// Select a page. Unconditional: a missing id simply resolves to no page.
pub fn set_active_page(nb: &mut Notebook, page_id: &str) {
    nb.active_page_id = Some(page_id.to_string());
}

fn expand(nb: &mut Notebook, folder_id: &str) {
    nb.expanded.insert(folder_id.to_string());
}
