//! Initialize and shutdown handlers.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::info;

use crate::config::reload_config;
use crate::state::BackendState;

/// Handles the `initialize` LSP request.
pub(crate) fn handle_initialize(
    state: &BackendState,
    params: InitializeParams,
) -> Result<InitializeResult> {
    info!("solint LSP server initializing...");

    #[allow(deprecated)]
    let root = params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| folder.uri.clone())
        .or(params.root_uri);

    if let Some(path) = root.and_then(|uri| uri.to_file_path().ok()) {
        *state.workspace_root.write() = Some(path);
        reload_config(state);
    }

    Ok(InitializeResult {
        capabilities: ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(true),
                    })),
                    ..Default::default()
                },
            )),
            ..Default::default()
        },
        server_info: Some(ServerInfo {
            name: "solint-lsp".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    })
}

/// Handles the `initialized` LSP notification.
pub(crate) async fn handle_initialized(client: &tower_lsp::Client) {
    client
        .log_message(MessageType::INFO, "solint LSP server initialized!")
        .await;
}

/// Handles the `shutdown` LSP request.
pub(crate) fn handle_shutdown(state: &BackendState) -> Result<()> {
    info!("solint LSP server shutting down...");
    state.dispatcher.shutdown();
    Ok(())
}
