use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use archive_core::{CatalogIndex, SelectionEntry};
use archive_logging::{archive_error, archive_info};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::orchestrator::ChannelProgressSink;
use crate::{
    load_catalog, Backend, BackendSettings, BatchOutcome, DirectorySaver, DownloadOrchestrator,
    EngineError, EngineEvent, FileSaver, LivenessMonitor, LivenessSettings, PacingSettings,
    ReqwestBackend,
};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub backend: BackendSettings,
    pub liveness: LivenessSettings,
    pub pacing: PacingSettings,
    pub download_dir: PathBuf,
}

impl EngineConfig {
    pub fn new(backend: BackendSettings, download_dir: PathBuf) -> Self {
        Self {
            backend,
            liveness: LivenessSettings::default(),
            pacing: PacingSettings::default(),
            download_dir,
        }
    }
}

enum EngineCommand {
    StartBatch {
        entries: Vec<SelectionEntry>,
    },
    LoadCatalog {
        source: String,
        reply: mpsc::Sender<CatalogIndex>,
    },
}

/// Shared pieces every batch task needs.
#[derive(Clone)]
struct BatchContext {
    backend: Arc<dyn Backend>,
    monitor: LivenessMonitor,
    saver: Arc<dyn FileSaver>,
    pacing: PacingSettings,
    // One batch at a time, even if the host sends two.
    batch_lock: Arc<Mutex<()>>,
}

/// Host-side handle to the engine thread. Commands go in over a channel,
/// [`EngineEvent`]s come back out.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let backend: Arc<dyn Backend> = Arc::new(ReqwestBackend::new(config.backend.clone())?);
        let saver: Arc<dyn FileSaver> = Arc::new(DirectorySaver::new(config.download_dir.clone()));
        Self::with_parts(config, backend, saver)
    }

    /// Builds an engine over caller-supplied backend and saver.
    pub fn with_parts(
        config: EngineConfig,
        backend: Arc<dyn Backend>,
        saver: Arc<dyn FileSaver>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();

        let context = BatchContext {
            backend,
            monitor: LivenessMonitor::new(),
            saver,
            pacing: config.pacing.clone(),
            batch_lock: Arc::new(Mutex::new(())),
        };

        let liveness_tx = event_tx.clone();
        runtime.spawn(context.monitor.clone().run(
            context.backend.clone(),
            config.liveness.clone(),
            cancel.clone(),
            move |online| {
                let _ = liveness_tx.send(EngineEvent::Liveness(online));
            },
        ));

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartBatch { entries } => {
                        runtime.spawn(run_batch(context.clone(), entries, event_tx.clone()));
                    }
                    EngineCommand::LoadCatalog { source, reply } => {
                        runtime.spawn(async move {
                            let catalog = load_catalog(&source).await;
                            let _ = reply.send(catalog);
                        });
                    }
                }
            }
            archive_info!("engine command channel closed, shutting down");
            runtime.shutdown_timeout(Duration::from_secs(1));
        });

        Ok(Self {
            cmd_tx,
            event_rx,
            cancel,
        })
    }

    pub fn start_batch(&self, entries: Vec<SelectionEntry>) {
        let _ = self.cmd_tx.send(EngineCommand::StartBatch { entries });
    }

    /// Loads the catalog on the engine runtime and waits for it. Any failure
    /// yields an empty catalog.
    pub fn load_catalog(&self, source: impl Into<String>) -> CatalogIndex {
        let (reply, rx) = mpsc::channel();
        let sent = self.cmd_tx.send(EngineCommand::LoadCatalog {
            source: source.into(),
            reply,
        });
        if sent.is_err() {
            archive_error!("engine is not running, catalog not loaded");
            return CatalogIndex::empty();
        }
        rx.recv().unwrap_or_default()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Runs one batch in its own task so a panic inside it still produces a
/// `BatchFinished` event.
async fn run_batch(
    context: BatchContext,
    entries: Vec<SelectionEntry>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let _guard = context.batch_lock.clone().lock_owned().await;
    let sink = ChannelProgressSink::new(event_tx.clone());

    let task = tokio::spawn(async move {
        let orchestrator = DownloadOrchestrator::new(
            context.backend.as_ref(),
            &context.monitor,
            context.saver.as_ref(),
            context.pacing.clone(),
        );
        orchestrator.run(&entries, &sink).await
    });

    let outcome = match task.await {
        Ok(outcome) => outcome,
        Err(err) => {
            archive_error!("batch task failed: {}", err);
            BatchOutcome::Aborted {
                reason: err.to_string(),
            }
        }
    };
    let _ = event_tx.send(EngineEvent::BatchFinished(outcome));
}
