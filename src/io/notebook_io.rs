use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::io::session;
use crate::io::store::{KeyValueStore, StoreError};
use crate::model::folder::{Folder, FolderColor, FolderUpdate};
use crate::model::notebook::Notebook;
use crate::model::page::{Page, PageUpdate};
use crate::ops::{content, folder_ops, page_ops};
use crate::util::clock;

/// Store key for the folder collection
pub const FOLDERS_KEY: &str = "notebook_folders";
/// Store key for the page collection
pub const PAGES_KEY: &str = "notebook_pages";

pub const WELCOME_ID: &str = "welcome_note";
const WELCOME_CONTENT: &str = "# Welcome\n\nThis is your new notebook.\n\n- [ ] Try creating a folder\n- [ ] Drag this note into it\n- [ ] Write your thoughts";

/// The page seeded when no (readable) page collection exists
pub fn welcome_page() -> Page {
    Page {
        id: WELCOME_ID.to_string(),
        title: "Welcome".to_string(),
        icon: "👋".to_string(),
        content: WELCOME_CONTENT.to_string(),
        updated_at: clock::now_millis(),
        folder_id: None,
        is_pinned: false,
        is_locked: false,
    }
}

/// Sole owner of a notebook and the store it mirrors to.
///
/// Every mutating call applies the operation and writes the affected
/// collection before returning. Operations on unknown ids are no-ops and
/// write nothing.
#[derive(Debug)]
pub struct NotebookStore<S: KeyValueStore> {
    store: S,
    notebook: Notebook,
}

impl<S: KeyValueStore> NotebookStore<S> {
    /// Seed the notebook from storage. Missing or corrupt folders load as
    /// empty; missing or corrupt pages load as the single welcome page, which
    /// is written back at once so it keeps one identity and timestamp.
    pub fn load(mut store: S) -> Result<Self, StoreError> {
        let folders: Vec<Folder> = load_collection(&mut store, FOLDERS_KEY)?.unwrap_or_default();
        let (pages, seeded) = match load_collection::<S, Page>(&mut store, PAGES_KEY)? {
            Some(pages) => (pages, false),
            None => (vec![welcome_page()], true),
        };

        let mut notebook = Notebook::new(folders, pages);
        session::read_session(&store)?.restore_into(&mut notebook);
        notebook.ensure_active();
        debug!(
            folders = notebook.folders.len(),
            pages = notebook.pages.len(),
            seeded,
            "notebook loaded"
        );

        let mut loaded = NotebookStore { store, notebook };
        if seeded {
            loaded.save_pages()?;
        }
        Ok(loaded)
    }

    /// Re-read everything from storage, e.g. after a restore overwrote it.
    pub fn reload(self) -> Result<Self, StoreError> {
        Self::load(self.store)
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // -- reads --------------------------------------------------------------

    pub fn folders(&self) -> &[Folder] {
        self.notebook.folders()
    }

    pub fn pages(&self) -> &[Page] {
        self.notebook.pages()
    }

    pub fn pages_in(&self, folder_id: Option<&str>) -> Vec<&Page> {
        self.notebook.pages_in(folder_id)
    }

    pub fn pinned_pages(&self) -> Vec<&Page> {
        self.notebook.pinned_pages()
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.notebook.active_page()
    }

    // -- folders ------------------------------------------------------------

    pub fn create_folder(
        &mut self,
        name: &str,
        color: Option<FolderColor>,
    ) -> Result<Option<String>, StoreError> {
        let id = folder_ops::create_folder(&mut self.notebook, name, color);
        if id.is_some() {
            self.save_folders()?;
            self.save_session()?;
        }
        Ok(id)
    }

    pub fn delete_folder(&mut self, folder_id: &str) -> Result<bool, StoreError> {
        let deleted = folder_ops::delete_folder(&mut self.notebook, folder_id);
        if deleted {
            self.save_pages()?;
            self.save_folders()?;
            self.save_session()?;
        }
        Ok(deleted)
    }

    pub fn rename_folder(&mut self, folder_id: &str, new_name: &str) -> Result<bool, StoreError> {
        let changed = folder_ops::rename_folder(&mut self.notebook, folder_id, new_name);
        self.save_folders_if(changed)
    }

    pub fn recolor_folder(
        &mut self,
        folder_id: &str,
        color: FolderColor,
    ) -> Result<bool, StoreError> {
        let changed = folder_ops::recolor_folder(&mut self.notebook, folder_id, color);
        self.save_folders_if(changed)
    }

    pub fn update_folder(
        &mut self,
        folder_id: &str,
        update: FolderUpdate,
    ) -> Result<bool, StoreError> {
        let changed = folder_ops::update_folder(&mut self.notebook, folder_id, update);
        self.save_folders_if(changed)
    }

    /// Returns the new expansion state.
    pub fn toggle_folder_expansion(&mut self, folder_id: &str) -> Result<bool, StoreError> {
        let expanded = folder_ops::toggle_folder_expansion(&mut self.notebook, folder_id);
        self.save_session()?;
        Ok(expanded)
    }

    // -- pages --------------------------------------------------------------

    pub fn create_page(&mut self, folder_id: Option<&str>) -> Result<String, StoreError> {
        let id = page_ops::create_page(&mut self.notebook, folder_id);
        self.save_pages()?;
        self.save_session()?;
        Ok(id)
    }

    pub fn delete_page(&mut self, page_id: &str) -> Result<bool, StoreError> {
        let deleted = page_ops::delete_page(&mut self.notebook, page_id);
        if deleted {
            self.save_pages()?;
            self.save_session()?;
        }
        Ok(deleted)
    }

    pub fn update_page(&mut self, page_id: &str, update: PageUpdate) -> Result<bool, StoreError> {
        let changed = page_ops::update_page(&mut self.notebook, page_id, update);
        self.save_pages_if(changed)
    }

    pub fn move_page(&mut self, page_id: &str, target: Option<&str>) -> Result<bool, StoreError> {
        let moved = page_ops::move_page(&mut self.notebook, page_id, target);
        if moved {
            self.save_pages()?;
            self.save_session()?;
        }
        Ok(moved)
    }

    pub fn pin_page(&mut self, page_id: &str, pinned: bool) -> Result<bool, StoreError> {
        let changed = page_ops::pin_page(&mut self.notebook, page_id, pinned);
        self.save_pages_if(changed)
    }

    pub fn lock_page(&mut self, page_id: &str, locked: bool) -> Result<bool, StoreError> {
        let changed = page_ops::lock_page(&mut self.notebook, page_id, locked);
        self.save_pages_if(changed)
    }

    /// Flip the checkbox on a body line. Returns false if the page or the
    /// checkbox does not exist.
    pub fn toggle_checkbox(&mut self, page_id: &str, line: usize) -> Result<bool, StoreError> {
        let Some(page) = self.notebook.page(page_id) else {
            return Ok(false);
        };
        let Some(new_content) = content::toggle_checkbox(&page.content, line) else {
            return Ok(false);
        };
        self.update_page(page_id, PageUpdate::content(new_content))
    }

    pub fn set_active_page(&mut self, page_id: &str) -> Result<(), StoreError> {
        page_ops::set_active_page(&mut self.notebook, page_id);
        self.save_session()
    }

    // -- persistence --------------------------------------------------------

    fn save_folders(&mut self) -> Result<(), StoreError> {
        save_collection(&mut self.store, FOLDERS_KEY, &self.notebook.folders)
    }

    fn save_pages(&mut self) -> Result<(), StoreError> {
        save_collection(&mut self.store, PAGES_KEY, &self.notebook.pages)
    }

    fn save_folders_if(&mut self, changed: bool) -> Result<bool, StoreError> {
        if changed {
            self.save_folders()?;
        }
        Ok(changed)
    }

    fn save_pages_if(&mut self, changed: bool) -> Result<bool, StoreError> {
        if changed {
            self.save_pages()?;
        }
        Ok(changed)
    }

    fn save_session(&mut self) -> Result<(), StoreError> {
        session::write_session(&mut self.store, &self.notebook)
    }
}

/// Read one collection record by record. `Ok(None)` means absent, not a JSON
/// array, or without a single readable record. Unreadable records are
/// skipped; whenever anything is dropped the raw blob is first copied aside
/// to `<key>_corrupt`.
fn load_collection<S, T>(store: &mut S, key: &str) -> Result<Option<Vec<T>>, StoreError>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    let records: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(key, error = %e, "stored collection is corrupt, using defaults");
            set_aside(store, key, &raw);
            return Ok(None);
        }
    };

    let total = records.len();
    let mut items = Vec::with_capacity(total);
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value(record) {
            Ok(item) => items.push(item),
            Err(e) => warn!(key, index, error = %e, "skipping unreadable record"),
        }
    }
    if items.len() < total {
        set_aside(store, key, &raw);
        if items.is_empty() {
            return Ok(None);
        }
    }
    Ok(Some(items))
}

fn set_aside<S: KeyValueStore>(store: &mut S, key: &str, raw: &str) {
    let aside = format!("{}_corrupt", key);
    match store.set(&aside, raw) {
        Ok(()) => warn!(key, backup = %aside, "original collection copied aside"),
        Err(e) => warn!(key, error = %e, "could not back up corrupt collection"),
    }
}

fn save_collection<S, T>(store: &mut S, key: &str, items: &[T]) -> Result<(), StoreError>
where
    S: KeyValueStore,
    T: Serialize,
{
    let content = serde_json::to_string(items)?;
    store.set(key, &content)?;
    debug!(key, count = items.len(), "collection saved");
    Ok(())
}
