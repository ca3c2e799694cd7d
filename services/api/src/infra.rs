use async_trait::async_trait;
use cheapshark_skill::deals::{DealRecord, DealsError, DealsSource};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Deals read from a saved CheapShark response instead of the network.
#[derive(Debug, Clone)]
pub(crate) struct FileDealsSource {
    path: PathBuf,
}

impl FileDealsSource {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl DealsSource for FileDealsSource {
    async fn fetch_deals(&self) -> Result<Vec<DealRecord>, DealsError> {
        let raw = tokio::fs::read(&self.path).await.map_err(|err| {
            DealsError::Retrieval(format!("failed to read {}: {err}", self.path.display()))
        })?;
        serde_json::from_slice(&raw).map_err(|err| DealsError::Parse(err.to_string()))
    }
}

/// Parses `name=value` slot arguments.
pub(crate) fn parse_slot(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("slot name missing in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
