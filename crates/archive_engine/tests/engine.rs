mod common;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use archive_engine::{
    Backend, BackendError, BackendSettings, BatchOutcome, EngineConfig, EngineEvent, EngineHandle,
    FileInfo, LivenessSettings, PacingSettings,
};
use common::{entry, RecordingSaver, ScriptedBackend};

fn config() -> EngineConfig {
    EngineConfig {
        backend: BackendSettings::default(),
        liveness: LivenessSettings {
            interval: Duration::from_millis(50),
        },
        pacing: PacingSettings::immediate(),
        download_dir: PathBuf::from("unused"),
    }
}

fn wait_for<F>(engine: &EngineHandle, mut pred: F) -> Vec<EngineEvent>
where
    F: FnMut(&EngineEvent) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut seen = Vec::new();
    while Instant::now() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(50)) {
            let done = pred(&event);
            seen.push(event);
            if done {
                return seen;
            }
        }
    }
    panic!("timed out waiting for engine event; saw {seen:?}");
}

#[test]
fn engine_reports_liveness_progress_and_outcome() {
    common::init_logging();
    let backend = Arc::new(ScriptedBackend::default());
    let saver = Arc::new(RecordingSaver::default());
    let engine = EngineHandle::with_parts(config(), backend.clone(), saver.clone()).unwrap();

    wait_for(&engine, |event| matches!(event, EngineEvent::Liveness(true)));

    engine.start_batch(vec![
        entry("CS301", "Algorithms", "2021", "https://x/?id=a"),
        entry("CS301", "Algorithms", "2022", "https://x/?id=b"),
    ]);
    let events = wait_for(&engine, |event| {
        matches!(event, EngineEvent::BatchFinished(_))
    });

    let progress: Vec<String> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::Progress(progress) => Some(progress.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(
        progress,
        vec![
            "Getting info 1/2",
            "Getting info 2/2",
            "Downloading: a.pdf",
            "Downloading: b.pdf",
            "Download complete ✓",
        ]
    );
    match events.last() {
        Some(EngineEvent::BatchFinished(BatchOutcome::Completed { saved })) => {
            assert_eq!(saved.len(), 2)
        }
        other => panic!("unexpected final event {other:?}"),
    }
    assert_eq!(saver.names(), vec!["a.pdf".to_string(), "b.pdf".to_string()]);
}

#[test]
fn engine_reports_offline_when_health_fails() {
    common::init_logging();
    let backend = Arc::new(ScriptedBackend::offline());
    let saver = Arc::new(RecordingSaver::default());
    let engine = EngineHandle::with_parts(config(), backend.clone(), saver).unwrap();

    wait_for(&engine, |event| matches!(event, EngineEvent::Liveness(false)));
    engine.start_batch(vec![entry("CS301", "Algorithms", "2021", "https://x/?id=a")]);
    let events = wait_for(&engine, |event| {
        matches!(event, EngineEvent::BatchFinished(_))
    });

    assert!(matches!(
        events.last(),
        Some(EngineEvent::BatchFinished(BatchOutcome::Offline))
    ));
    assert!(backend.calls().iter().all(|call| call == "health"));
}

struct PanickingBackend;

#[async_trait::async_trait]
impl Backend for PanickingBackend {
    async fn health(&self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn file_info(&self, _resource_id: &str) -> Result<FileInfo, BackendError> {
        panic!("metadata handler blew up");
    }

    async fn download(&self, _document_url: &str) -> Result<bytes::Bytes, BackendError> {
        Ok(bytes::Bytes::new())
    }
}

#[test]
fn a_panicking_batch_still_reports_finished() {
    common::init_logging();
    let saver = Arc::new(RecordingSaver::default());
    let engine = EngineHandle::with_parts(config(), Arc::new(PanickingBackend), saver.clone()).unwrap();

    wait_for(&engine, |event| matches!(event, EngineEvent::Liveness(true)));
    engine.start_batch(vec![entry("CS301", "Algorithms", "2021", "https://x/?id=a")]);
    let events = wait_for(&engine, |event| {
        matches!(event, EngineEvent::BatchFinished(_))
    });

    assert!(matches!(
        events.last(),
        Some(EngineEvent::BatchFinished(BatchOutcome::Aborted { .. }))
    ));
    assert!(saver.saved().is_empty());
}

#[test]
fn catalog_load_failure_returns_empty_catalog() {
    common::init_logging();
    let engine = EngineHandle::with_parts(
        config(),
        Arc::new(ScriptedBackend::default()),
        Arc::new(RecordingSaver::default()),
    )
    .unwrap();

    assert!(engine.load_catalog("/definitely/not/here.json").is_empty());
}
