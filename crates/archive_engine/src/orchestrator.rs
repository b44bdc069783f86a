use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::mpsc;

use archive_core::SelectionEntry;
use archive_logging::{archive_error, archive_info, archive_warn};

use crate::pacing::{run_paced, PaceMode, PacingSettings};
use crate::{
    Backend, BatchOutcome, BatchProgress, DownloadableFile, EngineEvent, FileNameResolver,
    FileSaver, LivenessGate, TransferFailure,
};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, progress: BatchProgress);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, progress: BatchProgress) {
        let _ = self.tx.send(EngineEvent::Progress(progress));
    }
}

/// Runs one batch: resolve every file name, then fetch and save every
/// document, strictly one request at a time.
pub struct DownloadOrchestrator<'a> {
    backend: &'a dyn Backend,
    gate: &'a dyn LivenessGate,
    saver: &'a dyn FileSaver,
    pacing: PacingSettings,
}

impl<'a> DownloadOrchestrator<'a> {
    pub fn new(
        backend: &'a dyn Backend,
        gate: &'a dyn LivenessGate,
        saver: &'a dyn FileSaver,
        pacing: PacingSettings,
    ) -> Self {
        Self {
            backend,
            gate,
            saver,
            pacing,
        }
    }

    pub async fn run(&self, entries: &[SelectionEntry], sink: &dyn ProgressSink) -> BatchOutcome {
        if entries.is_empty() {
            return BatchOutcome::Completed { saved: Vec::new() };
        }

        if !self.gate.is_reachable() {
            archive_warn!("backend offline, batch of {} not started", entries.len());
            sink.emit(BatchProgress::Offline);
            tokio::time::sleep(self.pacing.failure_hold).await;
            return BatchOutcome::Offline;
        }

        let files = self.resolve_names(entries, sink).await;
        let transfers = self.transfer(&files, sink).await;

        match transfers.failure {
            None => {
                archive_info!("batch complete, {} file(s) saved", transfers.completed.len());
                sink.emit(BatchProgress::Complete);
                tokio::time::sleep(self.pacing.success_hold).await;
                BatchOutcome::Completed {
                    saved: transfers.completed,
                }
            }
            Some(failure) => {
                archive_error!(
                    "batch aborted at {} after {} saved: {}",
                    failure.filename,
                    transfers.completed.len(),
                    failure.reason
                );
                sink.emit(BatchProgress::Failed);
                tokio::time::sleep(self.pacing.failure_hold).await;
                BatchOutcome::TransferFailed {
                    saved: transfers.completed,
                    failure,
                }
            }
        }
    }

    async fn resolve_names(
        &self,
        entries: &[SelectionEntry],
        sink: &dyn ProgressSink,
    ) -> Vec<DownloadableFile> {
        let resolver = FileNameResolver::new(self.backend);
        let resolver = &resolver;
        let total = entries.len();

        let run = run_paced(
            entries,
            self.pacing.metadata_delay,
            PaceMode::AfterEach,
            move |index, entry| async move {
                sink.emit(BatchProgress::ResolvingInfo {
                    current: index + 1,
                    total,
                });
                let filename = resolver.resolve(entry).await;
                Ok::<_, Infallible>(DownloadableFile {
                    filename,
                    entry: entry.clone(),
                })
            },
        )
        .await;
        run.completed
    }

    async fn transfer(
        &self,
        files: &[DownloadableFile],
        sink: &dyn ProgressSink,
    ) -> crate::StageRun<PathBuf, TransferFailure> {
        let backend = self.backend;
        let saver = self.saver;

        run_paced(
            files,
            self.pacing.transfer_delay,
            PaceMode::Between,
            move |_, file| async move {
                sink.emit(BatchProgress::Downloading {
                    filename: file.filename.clone(),
                });
                let failure = |reason: String| TransferFailure {
                    filename: file.filename.clone(),
                    reason,
                };
                let payload = backend
                    .download(&file.entry.url)
                    .await
                    .map_err(|err| failure(err.to_string()))?;
                saver
                    .save(&file.filename, &payload)
                    .map_err(|err| failure(err.to_string()))
            },
        )
        .await
    }
}
