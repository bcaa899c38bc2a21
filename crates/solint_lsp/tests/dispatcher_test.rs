use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use solint_core::{Linter, LinterConfig, Position, Range, TransportError};
use solint_lsp::dispatcher::ChangeDispatcher;
use solint_lsp::publish::Publication;
use solint_lsp::{ActionKind, ChangeEvent, DiagnosticPublisher, PassKind};
use tower_lsp::lsp_types::Url;

#[derive(Default)]
struct Recorder {
    publications: Mutex<Vec<Publication>>,
}

impl Recorder {
    fn take(&self) -> Vec<Publication> {
        std::mem::take(&mut *self.publications.lock())
    }
}

impl DiagnosticPublisher for Recorder {
    fn publish(&self, publication: Publication) -> Result<(), TransportError> {
        self.publications.lock().push(publication);
        Ok(())
    }
}

struct Disconnected;

impl DiagnosticPublisher for Disconnected {
    fn publish(&self, publication: Publication) -> Result<(), TransportError> {
        Err(TransportError::new(publication.uri.as_str(), "client went away"))
    }
}

fn uri() -> Url {
    Url::parse("file:///contracts/Foo.sol").unwrap()
}

fn event(version: i32, text: &str) -> ChangeEvent {
    ChangeEvent {
        uri: uri(),
        language_id: "solidity".to_string(),
        version: Some(version),
        text: text.to_string(),
    }
}

fn test_mode_linter() -> Linter {
    Linter::new(LinterConfig {
        test_mode: true,
        ..LinterConfig::new()
    })
    .unwrap()
}

fn rule_ids(publication: &Publication) -> Vec<&str> {
    publication
        .diagnostics
        .iter()
        .map(|d| d.rule_id.as_str())
        .collect()
}

#[tokio::test]
async fn test_change_runs_every_pass_in_test_mode() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = ChangeDispatcher::new(Some(test_mode_linter()), recorder.clone());

    dispatcher.on_change(event(1, "struct Foo { uint Foo; }"));

    let published = recorder.take();
    assert_eq!(published.len(), 3);
    assert!(published.iter().all(|p| p.uri == uri() && p.version == Some(1)));
    assert_eq!(
        rule_ids(&published[2]),
        ["no-unsized-uint", "no-shadowing-field"]
    );
    assert_eq!(dispatcher.scheduler().pending_count(), 0);
}

#[tokio::test]
async fn test_other_languages_are_ignored() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = ChangeDispatcher::new(Some(test_mode_linter()), recorder.clone());

    dispatcher.on_change(ChangeEvent {
        language_id: "markdown".to_string(),
        ..event(1, "uint")
    });

    assert!(recorder.take().is_empty());
    assert!(dispatcher.store().diagnostics(&uri()).is_empty());
}

#[tokio::test]
async fn test_fast_pass_without_debounced_actions() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher =
        ChangeDispatcher::new(Some(test_mode_linter()), recorder.clone()).with_actions(&[]);

    dispatcher.on_change(event(1, "struct Foo { uint Foo; }"));

    let published = recorder.take();
    assert_eq!(published.len(), 1);
    assert_eq!(rule_ids(&published[0]), ["no-unsized-uint"]);
}

#[tokio::test]
async fn test_syntax_errors_come_from_validation() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = ChangeDispatcher::new(Some(test_mode_linter()), recorder.clone())
        .with_actions(&[ActionKind::Validate]);

    dispatcher.on_change(event(1, "contract C { uint256 x }"));

    let last = recorder.take().pop().unwrap();
    assert!(!last.diagnostics.is_empty());
    assert!(rule_ids(&last).iter().all(|id| *id == "syntax"));
}

#[tokio::test]
async fn test_close_clears_diagnostics() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = ChangeDispatcher::new(Some(test_mode_linter()), recorder.clone());

    dispatcher.on_change(event(1, "contract C { uint x; }"));
    assert!(!dispatcher.store().diagnostics(&uri()).is_empty());
    recorder.take();

    dispatcher.on_close(&uri());

    let published = recorder.take();
    assert_eq!(published.len(), 1);
    assert!(published[0].diagnostics.is_empty());
    assert!(dispatcher.store().diagnostics(&uri()).is_empty());
}

#[tokio::test]
async fn test_transport_failures_stay_inside_the_dispatcher() {
    let dispatcher = ChangeDispatcher::new(Some(test_mode_linter()), Arc::new(Disconnected));

    dispatcher.on_change(event(1, "contract C { uint x; }"));
    dispatcher.on_close(&uri());
}

#[tokio::test]
async fn test_without_linter_nothing_is_published() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = ChangeDispatcher::new(None, recorder.clone());

    dispatcher.on_change(event(1, "contract C { uint x; }"));
    assert!(recorder.take().is_empty());

    dispatcher.set_linter(Some(test_mode_linter()));
    dispatcher.on_change(event(2, "contract C { uint x; }"));
    assert_eq!(recorder.take().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_debounced_passes_see_latest_text() {
    let mut config = LinterConfig::new();
    config.debounce.analyse = 50;
    config.debounce.validate = 60;
    let recorder = Arc::new(Recorder::default());
    let dispatcher = ChangeDispatcher::new(Some(Linter::new(config).unwrap()), recorder.clone());

    for version in 1..=5 {
        let text = format!("contract C {{ {} x; }}", if version == 5 { "uint" } else { "uint256" });
        dispatcher.on_change(event(version, &text));
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // One fast pass per change so far.
    assert_eq!(recorder.take().len(), 5);
    assert!(dispatcher.scheduler().pending(ActionKind::Analyse, &uri()));
    assert!(dispatcher.scheduler().pending(ActionKind::Validate, &uri()));

    tokio::time::sleep(Duration::from_millis(200)).await;

    let published = recorder.take();
    assert_eq!(published.len(), 2);
    assert!(published.iter().all(|p| p.version == Some(5)));
    assert_eq!(rule_ids(&published[1]), ["no-unsized-uint"]);
    assert_eq!(dispatcher.scheduler().pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_close_cancels_pending_passes() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = ChangeDispatcher::new(
        Some(Linter::new(LinterConfig::new()).unwrap()),
        recorder.clone(),
    );

    dispatcher.on_change(event(1, "contract C { uint x; }"));
    dispatcher.on_close(&uri());
    assert_eq!(dispatcher.scheduler().pending_count(), 0);
    recorder.take();

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(recorder.take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_edit_hides_analysis_of_previous_text() {
    let mut config = LinterConfig::new();
    config.debounce.analyse = 50;
    let recorder = Arc::new(Recorder::default());
    let dispatcher = ChangeDispatcher::new(Some(Linter::new(config).unwrap()), recorder.clone())
        .with_actions(&[ActionKind::Analyse]);

    dispatcher.on_change(event(1, "contract C { uint x; }"));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(recorder.take().len(), 2);

    dispatcher.on_change(event(2, "contract C {     uint x; }"));

    let last = recorder.take().pop().unwrap();
    assert_eq!(last.version, Some(2));
    assert_eq!(
        last.diagnostics.iter().map(|d| d.range).collect::<Vec<_>>(),
        [Range::new(Position::new(0, 17), Position::new(0, 21))]
    );

    tokio::time::sleep(Duration::from_millis(200)).await;
    let last = recorder.take().pop().unwrap();
    assert_eq!(last.version, Some(2));
    assert_eq!(rule_ids(&last), ["no-unsized-uint"]);
}

#[tokio::test]
async fn test_results_after_close_are_not_published() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = ChangeDispatcher::new(Some(test_mode_linter()), recorder.clone());

    dispatcher.on_change(event(1, "contract C { uint x; }"));
    dispatcher.on_close(&uri());
    recorder.take();

    // A pass that was already running when the document closed.
    let diagnostics = test_mode_linter()
        .validate_text("contract C {\n  uint x\n}")
        .unwrap();
    let published = dispatcher
        .store()
        .publish_pass(recorder.as_ref(), &uri(), PassKind::Validate, Some(1), diagnostics)
        .unwrap();

    assert!(!published);
    assert!(recorder.take().is_empty());
    assert!(!dispatcher.store().is_open(&uri()));

    dispatcher.on_change(event(1, "contract C { uint x; }"));
    assert!(dispatcher.store().is_open(&uri()));
    assert_eq!(recorder.take().len(), 3);
}
