use tracing::debug;

use crate::model::folder::{Folder, FolderColor, FolderUpdate};
use crate::model::notebook::Notebook;
use crate::util::{clock, id};

/// Create a folder. Returns the new id, or `None` when the name is blank or
/// already taken (case-insensitive). A rejected call changes nothing.
///
/// New folders start expanded.
pub fn create_folder(nb: &mut Notebook, name: &str, color: Option<FolderColor>) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        debug!("create_folder rejected: blank name");
        return None;
    }
    let lower = name.to_lowercase();
    if nb.folders.iter().any(|f| f.name.to_lowercase() == lower) {
        debug!(name, "create_folder rejected: duplicate name");
        return None;
    }

    let id = id::unique_id(|candidate| nb.has_id(candidate));
    let folder = Folder::new(
        id.clone(),
        name.to_string(),
        color.unwrap_or_default(),
        clock::now_millis(),
    );
    nb.folders.push(folder);
    nb.expanded.insert(id.clone());
    debug!(folder = %id, name, "folder created");
    Some(id)
}

/// Delete a folder, moving its pages to root. Pages are never deleted.
/// Returns false when the folder does not exist.
pub fn delete_folder(nb: &mut Notebook, folder_id: &str) -> bool {
    let Some(idx) = nb.folders.iter().position(|f| f.id == folder_id) else {
        return false;
    };

    let mut moved = 0usize;
    for page in nb.pages.iter_mut().filter(|p| p.in_folder(folder_id)) {
        page.folder_id = None;
        moved += 1;
    }
    nb.folders.remove(idx);
    nb.expanded.shift_remove(folder_id);
    debug!(folder = folder_id, moved, "folder deleted");
    true
}

/// Rename a folder. Blank names are rejected; duplicates are not checked here.
pub fn rename_folder(nb: &mut Notebook, folder_id: &str, new_name: &str) -> bool {
    update_folder(
        nb,
        folder_id,
        FolderUpdate {
            name: Some(new_name.to_string()),
            color: None,
        },
    )
}

pub fn recolor_folder(nb: &mut Notebook, folder_id: &str, color: FolderColor) -> bool {
    update_folder(
        nb,
        folder_id,
        FolderUpdate {
            name: None,
            color: Some(color),
        },
    )
}

/// Apply a partial update. The name part is skipped when it trims to empty;
/// the color part always applies. Returns true if anything changed.
pub fn update_folder(nb: &mut Notebook, folder_id: &str, update: FolderUpdate) -> bool {
    let Some(folder) = nb.folder_mut(folder_id) else {
        return false;
    };

    let mut changed = false;
    if let Some(name) = update.name {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            debug!(folder = folder_id, "rename rejected: blank name");
        } else {
            folder.name = trimmed.to_string();
            changed = true;
        }
    }
    if let Some(color) = update.color {
        folder.color = color;
        changed = true;
    }
    changed
}

/// Flip whether a folder is expanded. No existence check.
/// Returns the new expansion state.
pub fn toggle_folder_expansion(nb: &mut Notebook, folder_id: &str) -> bool {
    if nb.expanded.shift_remove(folder_id) {
        false
    } else {
        nb.expanded.insert(folder_id.to_string());
        true
    }
}
