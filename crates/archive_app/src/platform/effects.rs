use std::time::Duration;

use anyhow::{Context, Result};
use archive_core::{BatchResultKind, CatalogIndex, Effect, Msg};
use archive_engine::{BatchOutcome, EngineConfig, EngineEvent, EngineHandle};
use archive_logging::{archive_info, archive_warn};

/// Executes core effects on the engine and turns engine events back into
/// messages for `update`.
pub struct EffectRunner {
    engine: EngineHandle,
    outcome: Option<BatchOutcome>,
}

impl EffectRunner {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let engine = EngineHandle::new(config).context("failed to start download engine")?;
        Ok(Self {
            engine,
            outcome: None,
        })
    }

    pub fn load_catalog(&self, source: &str) -> CatalogIndex {
        self.engine.load_catalog(source)
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartBatch { entries } => {
                    archive_info!("StartBatch documents={}", entries.len());
                    self.outcome = None;
                    self.engine.start_batch(entries);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&mut self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        Some(match event {
            EngineEvent::Liveness(online) => Msg::LivenessChanged(online),
            EngineEvent::Progress(progress) => Msg::BatchProgress(progress.to_string()),
            EngineEvent::BatchFinished(outcome) => {
                let kind = map_outcome(&outcome);
                self.outcome = Some(outcome);
                Msg::BatchFinished(kind)
            }
        })
    }

    /// The full outcome of the last finished batch.
    pub fn take_outcome(&mut self) -> Option<BatchOutcome> {
        self.outcome.take()
    }
}

fn map_outcome(outcome: &BatchOutcome) -> BatchResultKind {
    match outcome {
        BatchOutcome::Completed { .. } => BatchResultKind::Completed,
        BatchOutcome::Offline => BatchResultKind::Offline,
        BatchOutcome::TransferFailed { failure, .. } => {
            archive_warn!("batch failed at {}: {}", failure.filename, failure.reason);
            BatchResultKind::Failed
        }
        BatchOutcome::Aborted { reason } => {
            archive_warn!("batch aborted: {}", reason);
            BatchResultKind::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archive_engine::TransferFailure;
    use std::path::PathBuf;

    #[test]
    fn outcomes_map_to_result_kinds() {
        assert_eq!(
            map_outcome(&BatchOutcome::Completed {
                saved: vec![PathBuf::from("a.pdf")]
            }),
            BatchResultKind::Completed
        );
        assert_eq!(map_outcome(&BatchOutcome::Offline), BatchResultKind::Offline);
        assert_eq!(
            map_outcome(&BatchOutcome::TransferFailed {
                saved: Vec::new(),
                failure: TransferFailure {
                    filename: "a.pdf".into(),
                    reason: "HTTP 500".into(),
                },
            }),
            BatchResultKind::Failed
        );
        assert_eq!(
            map_outcome(&BatchOutcome::Aborted {
                reason: "panicked".into()
            }),
            BatchResultKind::Failed
        );
    }
}
