//! Boundary types for the external permit register.
//!
//! Transport adapters deserialize register responses into these raw graph
//! types and classify faults into [`BackendError`] before the core sees them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Register operations consumed by the integration layer.
pub trait CaseBackend: Send + Sync {
    /// Active role codes.
    fn roles(&self) -> Result<Vec<String>, BackendError>;

    /// Errands where `legal_id` holds one of `roles`.
    fn related_errands(
        &self,
        legal_id: &str,
        roles: &[String],
    ) -> Result<RelatedErrandsResponse, BackendError>;

    fn errand(&self, case_number: &str) -> Result<RawErrand, BackendError>;

    /// Type code of a stored document, `None` when the register has none recorded.
    fn document_type(&self, document_id: &str) -> Result<Option<String>, BackendError>;
}

/// Fault classification decided at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("requested record does not exist")]
    NotFound,
    #[error("register temporarily unavailable: {0}")]
    Transient(String),
    #[error("register fault: {0}")]
    Fatal(String),
}

const EXPECTED_ABSENCE_PREFIXES: &[&str] = &[
    "errand not found",
    "could not find errand",
    "document not found",
    "could not find document",
];

impl BackendError {
    /// Classify a raw fault message. Recognized absence messages become `NotFound`.
    pub fn from_fault(message: &str) -> Self {
        let normalized = message.trim().to_lowercase();
        if EXPECTED_ABSENCE_PREFIXES
            .iter()
            .any(|prefix| normalized.starts_with(prefix))
        {
            BackendError::NotFound
        } else {
            BackendError::Fatal(message.trim().to_string())
        }
    }
}

/// Response for "errands related to a legal id". The result wrapper may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedErrandsResponse {
    #[serde(default)]
    pub result: Option<ErrandList>,
}

impl RelatedErrandsResponse {
    pub fn from_errands(errands: Vec<RawErrand>) -> Self {
        Self {
            result: Some(ErrandList { errands }),
        }
    }

    pub fn errands(&self) -> &[RawErrand] {
        self.result
            .as_ref()
            .map(|list| list.errands.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrandList {
    #[serde(default)]
    pub errands: Vec<RawErrand>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawErrand {
    pub case_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub errand_type: Option<String>,
    #[serde(default)]
    pub objects: Vec<RawErrandObject>,
    #[serde(default)]
    pub stakeholders: Vec<RawStakeholder>,
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

/// Objects attached to an errand. Only properties are projected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawErrandObject {
    Property {
        #[serde(default)]
        area: Option<String>,
        #[serde(default)]
        designation: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStakeholder {
    #[serde(default)]
    pub legal_id: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub id: i64,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub event_subtype: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub stakeholders: Vec<RawStakeholder>,
    #[serde(default)]
    pub documents: Vec<RawDocumentRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocumentRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
}
