mod common;

use std::sync::{mpsc, Arc};
use std::time::Duration;

use archive_engine::{Backend, LivenessGate, LivenessMonitor, LivenessSettings};
use common::ScriptedBackend;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn monitor_starts_closed_and_follows_probes() {
    common::init_logging();
    let monitor = LivenessMonitor::new();
    assert!(!monitor.is_reachable());

    let online = ScriptedBackend::default();
    assert!(monitor.probe(&online).await);
    assert!(monitor.is_reachable());

    let offline = ScriptedBackend::offline();
    assert!(!monitor.probe(&offline).await);
    assert!(!monitor.is_reachable());
}

#[tokio::test]
async fn clones_share_the_same_state() {
    let monitor = LivenessMonitor::new();
    let view = monitor.clone();
    monitor.probe(&ScriptedBackend::default()).await;
    assert!(view.is_reachable());
}

#[tokio::test(start_paused = true)]
async fn run_probes_immediately_then_on_interval_until_cancelled() {
    common::init_logging();
    let backend = Arc::new(ScriptedBackend::default());
    let monitor = LivenessMonitor::new();
    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::channel();

    let task = tokio::spawn(monitor.clone().run(
        backend.clone() as Arc<dyn Backend>,
        LivenessSettings {
            interval: Duration::from_secs(5),
        },
        cancel.clone(),
        move |online| {
            let _ = tx.send(online);
        },
    ));

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(backend.calls().len(), 1);
    assert!(monitor.is_reachable());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(backend.calls().len(), 3);

    cancel.cancel();
    task.await.unwrap();
    let results: Vec<bool> = rx.try_iter().collect();
    assert_eq!(results, vec![true, true, true]);
}
