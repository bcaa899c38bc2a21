//! Document lifecycle handlers (open, change, save, close).

use tower_lsp::lsp_types::*;
use tracing::debug;

use crate::dispatcher::ChangeEvent;
use crate::state::{DocumentData, SharedState};

/// Handles the `textDocument/didOpen` notification.
///
/// Opening is treated as a change to the full text.
pub(crate) fn handle_did_open(state: &SharedState, params: DidOpenTextDocumentParams) {
    let document = params.text_document;
    debug!("Document opened: {} ({})", document.uri, document.language_id);

    state.documents.write().insert(
        document.uri.clone(),
        DocumentData {
            language_id: document.language_id.clone(),
            version: document.version,
        },
    );

    state.dispatcher.on_change(ChangeEvent {
        uri: document.uri,
        language_id: document.language_id,
        version: Some(document.version),
        text: document.text,
    });
}

/// Handles the `textDocument/didChange` notification.
pub(crate) fn handle_did_change(state: &SharedState, params: DidChangeTextDocumentParams) {
    let uri = params.text_document.uri;
    let version = params.text_document.version;
    debug!("Document changed: {} (version {})", uri, version);

    // Full sync: the last change carries the whole text.
    let Some(change) = params.content_changes.into_iter().last() else {
        return;
    };

    let language_id = {
        let mut documents = state.documents.write();
        let Some(document) = documents.get_mut(&uri) else {
            debug!("Ignoring change to unopened document {}", uri);
            return;
        };
        document.version = version;
        document.language_id.clone()
    };

    state.dispatcher.on_change(ChangeEvent {
        uri,
        language_id,
        version: Some(version),
        text: change.text,
    });
}

/// Handles the `textDocument/didSave` notification.
pub(crate) fn handle_did_save(state: &SharedState, params: DidSaveTextDocumentParams) {
    let uri = params.text_document.uri;
    debug!("Document saved: {}", uri);

    let Some(text) = params.text else {
        return;
    };
    let Some(document) = state.documents.read().get(&uri).cloned() else {
        return;
    };

    state.dispatcher.on_change(ChangeEvent {
        uri,
        language_id: document.language_id,
        version: Some(document.version),
        text,
    });
}

/// Handles the `textDocument/didClose` notification.
pub(crate) fn handle_did_close(state: &SharedState, params: DidCloseTextDocumentParams) {
    let uri = params.text_document.uri;
    debug!("Document closed: {}", uri);

    state.documents.write().remove(&uri);
    state.dispatcher.on_close(&uri);
}
