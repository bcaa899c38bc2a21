//! LSP Backend state management.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tower_lsp::lsp_types::Url;

use crate::dispatcher::ChangeDispatcher;

/// What the server knows about an open document.
#[derive(Debug, Clone)]
pub(crate) struct DocumentData {
    pub language_id: String,
    pub version: i32,
}

/// Shared backend state.
pub(crate) struct BackendState {
    /// Open documents.
    pub documents: RwLock<HashMap<Url, DocumentData>>,
    pub dispatcher: ChangeDispatcher,
    /// Workspace root path.
    pub workspace_root: RwLock<Option<PathBuf>>,
}

impl fmt::Debug for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendState")
            .field("documents", &self.documents.read().len())
            .field("dispatcher", &"<ChangeDispatcher>")
            .field("workspace_root", &self.workspace_root)
            .finish()
    }
}

impl BackendState {
    pub fn new(dispatcher: ChangeDispatcher) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            dispatcher,
            workspace_root: RwLock::new(None),
        }
    }
}

/// Type alias for shared state.
pub(crate) type SharedState = Arc<BackendState>;
