use std::path::PathBuf;

use archive_core::{CatalogIndex, CatalogParseError};
use archive_logging::{archive_error, archive_info};
use thiserror::Error;

use crate::{BackendError, FailureKind};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch catalog: {0}")]
    Fetch(#[from] BackendError),
    #[error(transparent)]
    Parse(#[from] CatalogParseError),
}

/// Loads the catalog once from a local path or an `http(s)` URL.
pub async fn try_load_catalog(source: &str) -> Result<CatalogIndex, CatalogError> {
    let raw = if is_remote(source) {
        fetch_remote(source).await?
    } else {
        let path = PathBuf::from(source);
        tokio::fs::read(&path)
            .await
            .map_err(|source| CatalogError::Read { path, source })?
    };
    Ok(CatalogIndex::from_json_slice(&raw)?)
}

/// Like [`try_load_catalog`], but a failure is logged and leaves an empty
/// catalog so the rest of the program keeps working.
pub async fn load_catalog(source: &str) -> CatalogIndex {
    match try_load_catalog(source).await {
        Ok(catalog) => {
            archive_info!(
                "loaded catalog from {} ({} groups)",
                source,
                catalog.group_count()
            );
            catalog
        }
        Err(err) => {
            archive_error!("catalog load error: {}", err);
            CatalogIndex::empty()
        }
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn fetch_remote(source: &str) -> Result<Vec<u8>, BackendError> {
    let url = reqwest::Url::parse(source)
        .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))?;
    let response = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let body = response
        .bytes()
        .await
        .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
    Ok(body.to_vec())
}
