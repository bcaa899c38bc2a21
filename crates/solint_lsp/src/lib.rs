//! solint LSP Server
//!
//! Language Server Protocol implementation for solint. Every change runs a
//! fast lint pass right away; the full rule set and syntax validation run
//! debounced per document.

pub mod conversion;
pub mod debounce;
pub mod dispatcher;
pub mod publish;

mod config;
mod handler;
mod state;

use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, error, info};

use solint_core::{Linter, LinterConfig};

use crate::conversion::to_lsp_diagnostic;
use crate::dispatcher::ChangeDispatcher;
use crate::publish::{ChannelPublisher, Publication};
use crate::state::{BackendState, SharedState};

pub use debounce::{ActionKind, DebounceScheduler};
pub use dispatcher::ChangeEvent;
pub use publish::{DiagnosticPublisher, DiagnosticStore, PassKind};

/// The LSP backend for solint.
#[derive(Clone)]
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    state: SharedState,
}

impl Backend {
    /// Creates a new backend with the given client.
    ///
    /// Starts the task that forwards diagnostics to the client, so it must
    /// be called inside a Tokio runtime.
    pub fn new(client: Client) -> Self {
        // Real config is loaded during `initialize` if available.
        let linter = match Linter::new(LinterConfig::new()) {
            Ok(linter) => Some(linter),
            Err(e) => {
                error!(
                    "Failed to initialize linter: {}. LSP will run without linting.",
                    e
                );
                None
            }
        };

        let (publisher, mut publications) = ChannelPublisher::channel();
        let forward_to = client.clone();
        tokio::spawn(async move {
            while let Some(Publication {
                uri,
                diagnostics,
                version,
            }) = publications.recv().await
            {
                debug!("Publishing {} diagnostic(s) for {}", diagnostics.len(), uri);
                let diagnostics = diagnostics.iter().map(to_lsp_diagnostic).collect();
                forward_to.publish_diagnostics(uri, diagnostics, version).await;
            }
        });

        let dispatcher = ChangeDispatcher::new(linter, Arc::new(publisher));
        Self {
            client,
            state: Arc::new(BackendState::new(dispatcher)),
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handler::handle_initialize(&self.state, params)
    }

    async fn initialized(&self, _: InitializedParams) {
        handler::handle_initialized(&self.client).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handler::handle_shutdown(&self.state)
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        handler::handle_did_open(&self.state, params);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        handler::handle_did_change(&self.state, params);
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        handler::handle_did_save(&self.state, params);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        handler::handle_did_close(&self.state, params);
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        handler::handle_did_change_watched_files(&self.state, params);
    }
}

/// Starts the LSP server on stdio.
///
/// This function does not return unless an error occurs or the server shuts down.
pub async fn run() {
    info!("solint LSP server starting...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
