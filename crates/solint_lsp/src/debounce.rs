//! Per-document debouncing of analysis actions.
//!
//! Each (action kind, document) pair has at most one pending timer. Calls
//! that arrive while it is pending only replace the stored arguments, so an
//! action runs at most `wait` after the first call of a burst, with the
//! arguments of the last call.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tower_lsp::lsp_types::Url;
use tracing::{debug, error};

/// A debounced analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    Analyse,
    Validate,
}

impl ActionKind {
    pub const ALL: [ActionKind; 2] = [ActionKind::Analyse, ActionKind::Validate];
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Analyse => f.write_str("analyse"),
            ActionKind::Validate => f.write_str("validate"),
        }
    }
}

type Key = (ActionKind, Url);
type Action<A> = Box<dyn FnOnce(A) + Send>;

struct Entry<A> {
    args: A,
    action: Action<A>,
    generation: u64,
    timer: JoinHandle<()>,
}

type Entries<A> = Arc<Mutex<HashMap<Key, Entry<A>>>>;

/// Coalescing timers keyed by action kind and document.
///
/// Owned by the server session. Must be used from within a Tokio runtime.
pub struct DebounceScheduler<A> {
    entries: Entries<A>,
    next_generation: AtomicU64,
}

impl<A: Send + 'static> DebounceScheduler<A> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Schedules `action(args)` for `kind` on `uri`.
    ///
    /// With a pending timer for the same pair, only `args` and `action` are
    /// replaced and the original deadline stands. A zero `wait` runs the
    /// action right away on the caller's task.
    pub fn schedule<F>(&self, kind: ActionKind, uri: Url, args: A, wait: Duration, action: F)
    where
        F: FnOnce(A) + Send + 'static,
    {
        if wait.is_zero() {
            self.cancel(&(kind, uri.clone()));
            run_inline(kind, &uri, args, action);
            return;
        }

        let key = (kind, uri);
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get_mut(&key) {
            debug!("Coalescing {} for {}", kind, key.1);
            entry.args = args;
            entry.action = Box::new(action);
            return;
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let timer = tokio::spawn(fire(Arc::clone(&self.entries), key.clone(), generation, wait));
        entries.insert(
            key,
            Entry {
                args,
                action: Box::new(action),
                generation,
                timer,
            },
        );
    }

    /// Whether a timer is pending for `kind` on `uri`.
    pub fn pending(&self, kind: ActionKind, uri: &Url) -> bool {
        self.entries.lock().contains_key(&(kind, uri.clone()))
    }

    pub fn pending_count(&self) -> usize {
        self.entries.lock().len()
    }

    /// Cancels every pending action for `uri`.
    pub fn dispose(&self, uri: &Url) {
        let mut entries = self.entries.lock();
        entries.retain(|(kind, entry_uri), entry| {
            if entry_uri != uri {
                return true;
            }
            debug!("Cancelling pending {} for {}", kind, uri);
            entry.timer.abort();
            false
        });
    }

    /// Cancels every pending action.
    pub fn dispose_all(&self) {
        let mut entries = self.entries.lock();
        for (_, entry) in entries.drain() {
            entry.timer.abort();
        }
    }

    fn cancel(&self, key: &Key) {
        if let Some(entry) = self.entries.lock().remove(key) {
            entry.timer.abort();
        }
    }
}

impl<A: Send + 'static> Default for DebounceScheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Drop for DebounceScheduler<A> {
    fn drop(&mut self) {
        for (_, entry) in self.entries.lock().drain() {
            entry.timer.abort();
        }
    }
}

impl<A> fmt::Debug for DebounceScheduler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebounceScheduler")
            .field("pending", &self.entries.lock().len())
            .finish()
    }
}

async fn fire<A: Send + 'static>(entries: Entries<A>, key: Key, generation: u64, wait: Duration) {
    tokio::time::sleep(wait).await;

    // The entry may have been disposed, or replaced after a dispose.
    let entry = {
        let mut entries = entries.lock();
        match entries.get(&key) {
            Some(entry) if entry.generation == generation => entries.remove(&key),
            _ => None,
        }
    };
    let Some(entry) = entry else {
        return;
    };

    let (kind, uri) = key;
    debug!("Running {} for {}", kind, uri);
    let Entry { args, action, .. } = entry;
    if let Err(e) = tokio::task::spawn_blocking(move || action(args)).await
        && e.is_panic()
    {
        error!("{} action for {} panicked", kind, uri);
    }
}

fn run_inline<A, F>(kind: ActionKind, uri: &Url, args: A, action: F)
where
    F: FnOnce(A),
{
    debug!("Running {} for {} immediately", kind, uri);
    if panic::catch_unwind(AssertUnwindSafe(|| action(args))).is_err() {
        error!("{} action for {} panicked", kind, uri);
    }
}
