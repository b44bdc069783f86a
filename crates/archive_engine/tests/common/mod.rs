#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Mutex, Once};

use archive_core::SelectionEntry;
use archive_engine::{BatchProgress, FileSaver, LivenessGate, ProgressSink, SaveError};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(archive_logging::initialize_for_tests);
}

pub fn entry(code: &str, name: &str, title: &str, url: &str) -> SelectionEntry {
    SelectionEntry {
        url: url.to_string(),
        title: title.to_string(),
        group_label: "S3".to_string(),
        item_code: code.to_string(),
        item_name: name.to_string(),
        ordinal: 0,
    }
}

pub struct FixedGate(pub bool);

impl LivenessGate for FixedGate {
    fn is_reachable(&self) -> bool {
        self.0
    }
}

#[derive(Default)]
pub struct RecordingSaver {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingSaver {
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.saved().into_iter().map(|(name, _)| name).collect()
    }
}

impl FileSaver for RecordingSaver {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, SaveError> {
        self.saved
            .lock()
            .unwrap()
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<BatchProgress>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, progress: BatchProgress) {
        self.events.lock().unwrap().push(progress);
    }
}

/// In-memory backend that records every call in order.
#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<String>>,
    pub offline: bool,
}

impl ScriptedBackend {
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl archive_engine::Backend for ScriptedBackend {
    async fn health(&self) -> Result<(), archive_engine::BackendError> {
        self.calls.lock().unwrap().push("health".to_string());
        if self.offline {
            Err(backend_error())
        } else {
            Ok(())
        }
    }

    async fn file_info(
        &self,
        resource_id: &str,
    ) -> Result<archive_engine::FileInfo, archive_engine::BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("file-info {resource_id}"));
        Ok(archive_engine::FileInfo {
            name: format!("{resource_id}.pdf"),
        })
    }

    async fn download(
        &self,
        document_url: &str,
    ) -> Result<bytes::Bytes, archive_engine::BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("download {document_url}"));
        Ok(bytes::Bytes::from_static(b"payload"))
    }
}

fn backend_error() -> archive_engine::BackendError {
    archive_engine::BackendError {
        kind: archive_engine::FailureKind::HttpStatus(503),
        message: "503 Service Unavailable".to_string(),
    }
}
