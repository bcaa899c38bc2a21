use std::time::Duration;

use pretty_assertions::assert_eq;
use solint_lsp::{ActionKind, DebounceScheduler};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::Instant;
use tower_lsp::lsp_types::Url;

const WAIT: Duration = Duration::from_millis(50);

fn uri(name: &str) -> Url {
    Url::parse(&format!("file:///contracts/{name}.sol")).unwrap()
}

type Calls<T> = (UnboundedSender<T>, UnboundedReceiver<T>);

fn record<T: Send + 'static>(tx: &UnboundedSender<T>) -> impl FnOnce(T) + Send + 'static {
    let tx = tx.clone();
    move |args| {
        let _ = tx.send(args);
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(500)).await;
}

#[tokio::test(start_paused = true)]
async fn test_burst_runs_once_with_latest_args_at_first_deadline() {
    let scheduler = DebounceScheduler::new();
    let (tx, mut rx): Calls<u32> = unbounded_channel();
    let start = Instant::now();

    for i in 1..=5 {
        scheduler.schedule(ActionKind::Analyse, uri("A"), i, WAIT, record(&tx));
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    assert!(scheduler.pending(ActionKind::Analyse, &uri("A")));

    assert_eq!(rx.recv().await.unwrap(), 5);
    assert_eq!(start.elapsed(), WAIT);

    settle().await;
    assert!(rx.try_recv().is_err());
    assert!(!scheduler.pending(ActionKind::Analyse, &uri("A")));
}

#[tokio::test(start_paused = true)]
async fn test_documents_are_independent() {
    let scheduler = DebounceScheduler::new();
    let (tx, mut rx): Calls<&'static str> = unbounded_channel();

    scheduler.schedule(ActionKind::Analyse, uri("A"), "a", WAIT, record(&tx));
    scheduler.schedule(ActionKind::Analyse, uri("B"), "b", WAIT, record(&tx));
    assert_eq!(scheduler.pending_count(), 2);

    let mut fired = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
    fired.sort();
    assert_eq!(fired, ["a", "b"]);
}

#[tokio::test(start_paused = true)]
async fn test_action_kinds_are_independent() {
    let scheduler = DebounceScheduler::new();
    let (tx, mut rx): Calls<ActionKind> = unbounded_channel();
    let start = Instant::now();

    scheduler.schedule(ActionKind::Analyse, uri("A"), ActionKind::Analyse, WAIT, record(&tx));
    scheduler.schedule(
        ActionKind::Validate,
        uri("A"),
        ActionKind::Validate,
        WAIT * 2,
        record(&tx),
    );

    assert_eq!(rx.recv().await.unwrap(), ActionKind::Analyse);
    assert_eq!(start.elapsed(), WAIT);

    assert_eq!(rx.recv().await.unwrap(), ActionKind::Validate);
    assert_eq!(start.elapsed(), WAIT * 2);
}

#[tokio::test(start_paused = true)]
async fn test_call_after_firing_starts_a_new_timer() {
    let scheduler = DebounceScheduler::new();
    let (tx, mut rx): Calls<u32> = unbounded_channel();

    scheduler.schedule(ActionKind::Validate, uri("A"), 1, WAIT, record(&tx));
    assert_eq!(rx.recv().await.unwrap(), 1);

    scheduler.schedule(ActionKind::Validate, uri("A"), 2, WAIT, record(&tx));
    assert!(scheduler.pending(ActionKind::Validate, &uri("A")));
    assert_eq!(rx.recv().await.unwrap(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_zero_wait_runs_immediately() {
    let scheduler = DebounceScheduler::new();
    let (tx, mut rx): Calls<u32> = unbounded_channel();

    scheduler.schedule(ActionKind::Analyse, uri("A"), 7, Duration::ZERO, record(&tx));

    assert_eq!(rx.try_recv(), Ok(7));
    assert_eq!(scheduler.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dispose_cancels_every_kind_for_the_document() {
    let scheduler = DebounceScheduler::new();
    let (tx, mut rx): Calls<&'static str> = unbounded_channel();

    scheduler.schedule(ActionKind::Analyse, uri("A"), "a-analyse", WAIT, record(&tx));
    scheduler.schedule(ActionKind::Validate, uri("A"), "a-validate", WAIT, record(&tx));
    scheduler.schedule(ActionKind::Analyse, uri("B"), "b-analyse", WAIT, record(&tx));

    scheduler.dispose(&uri("A"));
    assert!(!scheduler.pending(ActionKind::Analyse, &uri("A")));
    assert!(!scheduler.pending(ActionKind::Validate, &uri("A")));
    assert!(scheduler.pending(ActionKind::Analyse, &uri("B")));

    assert_eq!(rx.recv().await.unwrap(), "b-analyse");
    settle().await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_schedule_after_dispose_is_not_swallowed() {
    let scheduler = DebounceScheduler::new();
    let (tx, mut rx): Calls<u32> = unbounded_channel();

    scheduler.schedule(ActionKind::Analyse, uri("A"), 1, WAIT, record(&tx));
    scheduler.dispose(&uri("A"));
    scheduler.schedule(ActionKind::Analyse, uri("A"), 2, WAIT, record(&tx));

    assert_eq!(rx.recv().await.unwrap(), 2);
    settle().await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_dispose_all() {
    let scheduler = DebounceScheduler::new();
    let (tx, mut rx): Calls<u32> = unbounded_channel();

    scheduler.schedule(ActionKind::Analyse, uri("A"), 1, WAIT, record(&tx));
    scheduler.schedule(ActionKind::Validate, uri("B"), 2, WAIT, record(&tx));
    scheduler.dispose_all();

    assert_eq!(scheduler.pending_count(), 0);
    settle().await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_panicking_action_does_not_break_scheduler() {
    let scheduler = DebounceScheduler::new();
    let (tx, mut rx): Calls<u32> = unbounded_channel();

    scheduler.schedule(ActionKind::Analyse, uri("A"), 1, WAIT, |_: u32| panic!("rule blew up"));
    scheduler.schedule(ActionKind::Validate, uri("A"), 0, Duration::ZERO, |_: u32| {
        panic!("inline blew up")
    });
    settle().await;

    scheduler.schedule(ActionKind::Analyse, uri("A"), 2, WAIT, record(&tx));
    assert_eq!(rx.recv().await.unwrap(), 2);
}
