use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::io::store::{KeyValueStore, StoreError};
use crate::model::notebook::Notebook;

/// Store key for the session cursors
pub const SESSION_KEY: &str = "notebook_session";

/// Cursors carried between runs (written to `notebook_session`).
/// Losing them is harmless: the notebook falls back to its first page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub active_page_id: Option<String>,
    #[serde(default)]
    pub expanded_folder_ids: Vec<String>,
}

impl SessionState {
    pub fn capture(nb: &Notebook) -> Self {
        SessionState {
            active_page_id: nb.active_page_id.clone(),
            expanded_folder_ids: nb.expanded.iter().cloned().collect(),
        }
    }

    pub fn restore_into(self, nb: &mut Notebook) {
        nb.active_page_id = self.active_page_id.filter(|id| !id.is_empty());
        nb.expanded = self.expanded_folder_ids.into_iter().collect();
    }
}

/// Read the session. Missing or malformed data yields the default session.
pub fn read_session<S: KeyValueStore>(store: &S) -> Result<SessionState, StoreError> {
    let Some(raw) = store.get(SESSION_KEY)? else {
        return Ok(SessionState::default());
    };
    match serde_json::from_str(&raw) {
        Ok(state) => Ok(state),
        Err(e) => {
            warn!(error = %e, "ignoring malformed session state");
            Ok(SessionState::default())
        }
    }
}

pub fn write_session<S: KeyValueStore>(store: &mut S, nb: &Notebook) -> Result<(), StoreError> {
    let content = serde_json::to_string(&SessionState::capture(nb))?;
    store.set(SESSION_KEY, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;

    #[test]
    fn write_and_read_round_trip() {
        let mut store = MemoryStore::new();
        let mut nb = Notebook::default();
        nb.active_page_id = Some("p1".into());
        nb.expanded.insert("f2".into());
        nb.expanded.insert("f1".into());

        write_session(&mut store, &nb).unwrap();
        let loaded = read_session(&store).unwrap();
        assert_eq!(loaded.active_page_id.as_deref(), Some("p1"));
        assert_eq!(loaded.expanded_folder_ids, vec!["f2", "f1"]);

        let mut fresh = Notebook::default();
        loaded.restore_into(&mut fresh);
        assert_eq!(fresh.active_page_id.as_deref(), Some("p1"));
        assert!(fresh.is_expanded("f1"));
    }

    #[test]
    fn read_missing_returns_default() {
        let store = MemoryStore::new();
        assert_eq!(read_session(&store).unwrap(), SessionState::default());
    }

    #[test]
    fn read_malformed_returns_default() {
        let mut store = MemoryStore::new();
        store.set(SESSION_KEY, "not json {{{").unwrap();
        assert_eq!(read_session(&store).unwrap(), SessionState::default());
    }

    #[test]
    fn serde_defaults_on_minimal_object() {
        let state: SessionState = serde_json::from_str("{}").unwrap();
        assert!(state.active_page_id.is_none());
        assert!(state.expanded_folder_ids.is_empty());
    }

    #[test]
    fn empty_active_id_restores_as_none() {
        let state = SessionState {
            active_page_id: Some(String::new()),
            expanded_folder_ids: Vec::new(),
        };
        let mut nb = Notebook::default();
        state.restore_into(&mut nb);
        assert_eq!(nb.active_page_id, None);
    }
}
