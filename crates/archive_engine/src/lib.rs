//! Archive engine: backend IO, liveness gating and the batch download pipeline.
mod backend;
mod catalog;
mod engine;
mod filename;
mod liveness;
mod orchestrator;
mod pacing;
mod save;
mod types;

pub use backend::{Backend, BackendSettings, ReqwestBackend};
pub use catalog::{load_catalog, try_load_catalog, CatalogError};
pub use engine::{EngineConfig, EngineHandle};
pub use filename::{
    extract_resource_id, fallback_filename, sanitize_filename, FileNameResolver, MAX_FILENAME_LEN,
};
pub use liveness::{LivenessGate, LivenessMonitor, LivenessSettings};
pub use orchestrator::{ChannelProgressSink, DownloadOrchestrator, ProgressSink};
pub use pacing::{run_paced, PaceMode, PacingSettings, StageRun};
pub use save::{ensure_output_dir, DirectorySaver, FileSaver, SaveError};
pub use types::{
    BackendError, BatchOutcome, BatchProgress, DownloadableFile, EngineError, EngineEvent,
    FailureKind, FileInfo, TransferFailure,
};
