//! Diagnostic publishing.
//!
//! Each pass kind owns one slot per document. A pass replaces its own slot
//! and the union of all slots is sent, replacing whatever the client showed
//! for that document before.

use std::collections::{HashMap, HashSet};
use std::fmt;

use parking_lot::Mutex;
use solint_core::{Diagnostic, TransportError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tower_lsp::lsp_types::Url;
use tracing::debug;

use crate::debounce::ActionKind;

/// The analysis that produced a set of diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// The fast pass run on every change.
    Lint,
    Analyse,
    Validate,
}

impl PassKind {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        match self {
            PassKind::Lint => 0,
            PassKind::Analyse => 1,
            PassKind::Validate => 2,
        }
    }
}

impl From<ActionKind> for PassKind {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Analyse => PassKind::Analyse,
            ActionKind::Validate => PassKind::Validate,
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassKind::Lint => f.write_str("lint"),
            PassKind::Analyse => f.write_str("analyse"),
            PassKind::Validate => f.write_str("validate"),
        }
    }
}

/// The full diagnostic list for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub uri: Url,
    pub diagnostics: Vec<Diagnostic>,
    pub version: Option<i32>,
}

/// Sends diagnostics to the client. An empty list clears the document.
pub trait DiagnosticPublisher: Send + Sync {
    fn publish(&self, publication: Publication) -> Result<(), TransportError>;
}

/// Queues publications for a task that forwards them to the client.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    tx: UnboundedSender<Publication>,
}

impl ChannelPublisher {
    pub fn channel() -> (Self, UnboundedReceiver<Publication>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DiagnosticPublisher for ChannelPublisher {
    fn publish(&self, publication: Publication) -> Result<(), TransportError> {
        self.tx
            .send(publication)
            .map_err(|e| TransportError::new(e.0.uri.as_str(), "diagnostics channel closed"))
    }
}

#[derive(Debug, Default)]
struct Slot {
    version: Option<i32>,
    diagnostics: Vec<Diagnostic>,
}

type Slots = [Slot; PassKind::COUNT];

/// Latest diagnostics of every pass, per open document.
#[derive(Debug, Default)]
pub struct DiagnosticStore {
    documents: Mutex<HashMap<Url, Slots>>,
}

impl DiagnosticStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts accepting results for `uri`. Existing slots are kept.
    pub fn open(&self, uri: &Url) {
        self.documents.lock().entry(uri.clone()).or_default();
    }

    pub fn is_open(&self, uri: &Url) -> bool {
        self.documents.lock().contains_key(uri)
    }

    /// Stores the result of one pass and publishes the merged list.
    ///
    /// Results for a document that is not open, or for a version older
    /// than the newest one any pass has stored, are dropped and `Ok(false)`
    /// is returned. Only slots holding that newest version are published.
    /// Publishing happens under the store lock, so the client receives
    /// unions in the order they were computed.
    pub fn publish_pass(
        &self,
        publisher: &dyn DiagnosticPublisher,
        uri: &Url,
        kind: PassKind,
        version: Option<i32>,
        diagnostics: Vec<Diagnostic>,
    ) -> Result<bool, TransportError> {
        let mut documents = self.documents.lock();
        let Some(slots) = documents.get_mut(uri) else {
            debug!("Dropping {} result for closed document {}", kind, uri);
            return Ok(false);
        };

        if let (Some(current), Some(incoming)) = (newest_version(slots), version)
            && incoming < current
        {
            debug!(
                "Dropping stale {} result for {} (version {} < {})",
                kind, uri, incoming, current
            );
            return Ok(false);
        }

        let slot = &mut slots[kind.index()];
        slot.version = version;
        slot.diagnostics = diagnostics;

        publisher.publish(Publication {
            uri: uri.clone(),
            diagnostics: merge(slots),
            version,
        })?;
        Ok(true)
    }

    /// The merged diagnostics currently stored for `uri`.
    pub fn diagnostics(&self, uri: &Url) -> Vec<Diagnostic> {
        self.documents
            .lock()
            .get(uri)
            .map(merge)
            .unwrap_or_default()
    }

    /// Forgets `uri` and stops accepting results for it until it is opened
    /// again. Returns whether it was open.
    pub fn remove(&self, uri: &Url) -> bool {
        self.documents.lock().remove(uri).is_some()
    }
}

fn newest_version(slots: &Slots) -> Option<i32> {
    slots.iter().filter_map(|slot| slot.version).max()
}

/// Unions the slots that describe the newest text snapshot.
///
/// Unversioned slots are always included.
fn merge(slots: &Slots) -> Vec<Diagnostic> {
    let newest = newest_version(slots);
    let mut seen = HashSet::new();
    slots
        .iter()
        .filter(|slot| slot.version.is_none() || slot.version == newest)
        .flat_map(|slot| slot.diagnostics.iter())
        .filter(|diagnostic| seen.insert(*diagnostic))
        .cloned()
        .collect()
}
