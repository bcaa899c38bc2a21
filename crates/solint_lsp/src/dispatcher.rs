//! Routing of document changes to lint passes.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use solint_core::{Diagnostic, Linter, PassError};
use tower_lsp::lsp_types::Url;
use tracing::{debug, error};

use crate::debounce::{ActionKind, DebounceScheduler};
use crate::publish::{DiagnosticPublisher, DiagnosticStore, PassKind, Publication};

/// A new full text for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub uri: Url,
    pub language_id: String,
    pub version: Option<i32>,
    pub text: String,
}

struct Shared {
    linter: RwLock<Option<Arc<Linter>>>,
    store: DiagnosticStore,
    publisher: Arc<dyn DiagnosticPublisher>,
}

impl Shared {
    fn linter(&self) -> Option<Arc<Linter>> {
        self.linter.read().clone()
    }

    /// Runs one pass over the event's text and publishes the result.
    fn run_pass(&self, kind: PassKind, event: &ChangeEvent) -> Result<(), PassError> {
        let Some(linter) = self.linter() else {
            debug!("Linter not available, skipping {} for {}", kind, event.uri);
            return Ok(());
        };

        let diagnostics = match kind {
            PassKind::Lint => linter.lint_text(&event.text, linter.fast_rules())?.diagnostics,
            PassKind::Analyse => linter.lint_text(&event.text, linter.rules())?.diagnostics,
            PassKind::Validate => linter.validate_text(&event.text)?,
        };
        debug!(
            "{} pass for {} produced {} diagnostic(s)",
            kind,
            event.uri,
            diagnostics.len()
        );

        self.store.publish_pass(
            self.publisher.as_ref(),
            &event.uri,
            kind,
            event.version,
            diagnostics,
        )?;
        Ok(())
    }

    /// Runs a pass, logging every failure. Never panics.
    fn run_pass_logged(&self, kind: PassKind, event: &ChangeEvent) {
        match panic::catch_unwind(AssertUnwindSafe(|| self.run_pass(kind, event))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("{} pass for {} failed: {}", kind, event.uri, e),
            Err(_) => error!("{} pass for {} panicked", kind, event.uri),
        }
    }
}

/// Entry point for document changes.
///
/// Filters by language, schedules the debounced analyses and runs the fast
/// lint pass synchronously. Nothing here returns an error or panics to the
/// caller; pass failures are logged and leave the document's diagnostics
/// as they were.
pub struct ChangeDispatcher {
    shared: Arc<Shared>,
    scheduler: DebounceScheduler<ChangeEvent>,
    actions: Vec<ActionKind>,
}

impl ChangeDispatcher {
    /// Creates a dispatcher with both debounced analyses registered.
    pub fn new(linter: Option<Linter>, publisher: Arc<dyn DiagnosticPublisher>) -> Self {
        Self {
            shared: Arc::new(Shared {
                linter: RwLock::new(linter.map(Arc::new)),
                store: DiagnosticStore::new(),
                publisher,
            }),
            scheduler: DebounceScheduler::new(),
            actions: ActionKind::ALL.to_vec(),
        }
    }

    /// Replaces the registered debounced analyses.
    pub fn with_actions(mut self, actions: &[ActionKind]) -> Self {
        self.actions = actions.to_vec();
        self
    }

    /// Swaps in a linter built from new configuration.
    ///
    /// Passes already running finish with the linter they started with.
    pub fn set_linter(&self, linter: Option<Linter>) {
        *self.shared.linter.write() = linter.map(Arc::new);
    }

    pub fn linter(&self) -> Option<Arc<Linter>> {
        self.shared.linter()
    }

    pub fn scheduler(&self) -> &DebounceScheduler<ChangeEvent> {
        &self.scheduler
    }

    pub fn store(&self) -> &DiagnosticStore {
        &self.shared.store
    }

    pub fn on_change(&self, event: ChangeEvent) {
        let Some(linter) = self.linter() else {
            debug!("Linter not available, ignoring change to {}", event.uri);
            return;
        };
        let config = linter.config();
        if event.language_id != config.language_id {
            debug!(
                "Ignoring change to {} document {}",
                event.language_id, event.uri
            );
            return;
        }

        self.shared.store.open(&event.uri);
        for &kind in &self.actions {
            let wait = match kind {
                ActionKind::Analyse => config.analyse_wait(),
                ActionKind::Validate => config.validate_wait(),
            };
            self.schedule(kind, event.clone(), wait);
        }

        self.shared.run_pass_logged(PassKind::Lint, &event);
    }

    fn schedule(&self, kind: ActionKind, event: ChangeEvent, wait: Duration) {
        let shared = Arc::clone(&self.shared);
        self.scheduler
            .schedule(kind, event.uri.clone(), event, wait, move |latest: ChangeEvent| {
                shared.run_pass_logged(kind.into(), &latest);
            });
    }

    /// Releases everything held for a closed document and clears its
    /// diagnostics in the client.
    ///
    /// A pass already running for the document finishes without publishing.
    pub fn on_close(&self, uri: &Url) {
        self.scheduler.dispose(uri);
        self.shared.store.remove(uri);

        let cleared = Publication {
            uri: uri.clone(),
            diagnostics: Vec::<Diagnostic>::new(),
            version: None,
        };
        if let Err(e) = self.shared.publisher.publish(cleared) {
            error!("Failed to clear diagnostics for {}: {}", uri, e);
        }
    }

    /// Cancels all pending work.
    pub fn shutdown(&self) {
        self.scheduler.dispose_all();
    }
}
