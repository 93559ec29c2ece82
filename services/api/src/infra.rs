use metrics_exporter_prometheus::PrometheusHandle;
use permit_view::config::BackendConfig;
use permit_view::errands::identifier::is_equal;
use permit_view::errands::{
    BackendError, CaseBackend, RawErrand, RawStakeholder, RelatedErrandsResponse,
};
use permit_view::error::AppError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Register served from a JSON export, used when no live transport is configured.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SnapshotBackend {
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    errands: Vec<RawErrand>,
    /// Document id to recorded type code; a `null` type means none is recorded.
    #[serde(default)]
    documents: HashMap<String, Option<String>>,
}

impl SnapshotBackend {
    pub(crate) fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            errands = snapshot.errands.len(),
            documents = snapshot.documents.len(),
            "loaded register snapshot"
        );
        Ok(snapshot)
    }

    pub(crate) fn from_config(config: &BackendConfig) -> Result<Self, AppError> {
        match &config.snapshot_path {
            Some(path) => Self::load(path),
            None => {
                info!("no register snapshot configured, serving an empty register");
                Ok(Self::default())
            }
        }
    }
}

fn holds_role(stakeholder: &RawStakeholder, legal_id: &str, roles: &[String]) -> bool {
    let same_identity = stakeholder
        .legal_id
        .as_deref()
        .is_some_and(|candidate| is_equal(legal_id, candidate) || is_equal(candidate, legal_id));
    same_identity && stakeholder.roles.iter().any(|role| roles.contains(role))
}

impl CaseBackend for SnapshotBackend {
    fn roles(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.roles.clone())
    }

    fn related_errands(
        &self,
        legal_id: &str,
        roles: &[String],
    ) -> Result<RelatedErrandsResponse, BackendError> {
        let related = self
            .errands
            .iter()
            .filter(|errand| {
                errand
                    .stakeholders
                    .iter()
                    .chain(errand.events.iter().flat_map(|event| event.stakeholders.iter()))
                    .any(|stakeholder| holds_role(stakeholder, legal_id, roles))
            })
            .cloned()
            .collect();
        Ok(RelatedErrandsResponse::from_errands(related))
    }

    fn errand(&self, case_number: &str) -> Result<RawErrand, BackendError> {
        self.errands
            .iter()
            .find(|errand| errand.case_number.as_deref() == Some(case_number))
            .cloned()
            .ok_or_else(|| BackendError::from_fault("errand not found"))
    }

    fn document_type(&self, document_id: &str) -> Result<Option<String>, BackendError> {
        self.documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| BackendError::from_fault("document not found"))
    }
}
