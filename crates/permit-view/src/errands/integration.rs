use std::sync::Arc;

use tracing::{debug, warn};

use super::backend::{BackendError, CaseBackend, RawErrand, RelatedErrandsResponse};
use super::cache::{CacheConfig, CacheStats, ExpiringCache};
use crate::clock::Clock;

/// Register failure that is not an expected absence.
#[derive(Debug, thiserror::Error)]
#[error("register {operation} call failed: {source}")]
pub struct IntegrationError {
    pub operation: &'static str,
    pub source: BackendError,
}

type RelatedKey = (String, Vec<String>);

/// Register client with one independent cache per operation.
///
/// Absence (`BackendError::NotFound`) is cached like any other answer; other
/// faults propagate and leave the cache untouched.
pub struct CachedCaseBackend<B> {
    backend: Arc<B>,
    roles: ExpiringCache<(), Vec<String>>,
    related_errands: ExpiringCache<RelatedKey, RelatedErrandsResponse>,
    errands: ExpiringCache<String, Option<RawErrand>>,
    document_types: ExpiringCache<String, Option<String>>,
}

impl<B> CachedCaseBackend<B>
where
    B: CaseBackend,
{
    pub fn new(backend: Arc<B>, config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            roles: ExpiringCache::new("roles", config.roles, clock.clone()),
            related_errands: ExpiringCache::new(
                "related_errands",
                config.related_errands,
                clock.clone(),
            ),
            errands: ExpiringCache::new("errand", config.errand, clock.clone()),
            document_types: ExpiringCache::new("document_type", config.document_type, clock),
        }
    }

    pub fn roles(&self) -> Result<Vec<String>, IntegrationError> {
        self.roles.get_or_try_insert_with((), || {
            debug!(cache = self.roles.name(), "cache miss");
            absent_as(self.backend.roles(), "roles", Vec::new)
        })
    }

    pub fn related_errands(
        &self,
        legal_id: &str,
        roles: &[String],
    ) -> Result<RelatedErrandsResponse, IntegrationError> {
        let key = (legal_id.to_string(), roles.to_vec());
        self.related_errands.get_or_try_insert_with(key, || {
            debug!(cache = self.related_errands.name(), "cache miss");
            absent_as(
                self.backend.related_errands(legal_id, roles),
                "related_errands",
                RelatedErrandsResponse::default,
            )
        })
    }

    pub fn errand(&self, case_number: &str) -> Result<Option<RawErrand>, IntegrationError> {
        self.errands
            .get_or_try_insert_with(case_number.to_string(), || {
                debug!(cache = self.errands.name(), case_number, "cache miss");
                absent_as(self.backend.errand(case_number).map(Some), "errand", || None)
            })
    }

    pub fn document_type(&self, document_id: &str) -> Result<Option<String>, IntegrationError> {
        self.document_types
            .get_or_try_insert_with(document_id.to_string(), || {
                debug!(cache = self.document_types.name(), document_id, "cache miss");
                absent_as(
                    self.backend.document_type(document_id),
                    "document_type",
                    || None,
                )
            })
    }

    pub fn stats(&self) -> Vec<(&'static str, CacheStats)> {
        vec![
            (self.roles.name(), self.roles.stats()),
            (self.related_errands.name(), self.related_errands.stats()),
            (self.errands.name(), self.errands.stats()),
            (self.document_types.name(), self.document_types.stats()),
        ]
    }

    pub fn clear(&self) {
        self.roles.clear();
        self.related_errands.clear();
        self.errands.clear();
        self.document_types.clear();
    }
}

fn absent_as<T, F>(
    result: Result<T, BackendError>,
    operation: &'static str,
    absent: F,
) -> Result<T, IntegrationError>
where
    F: FnOnce() -> T,
{
    match result {
        Ok(value) => Ok(value),
        Err(BackendError::NotFound) => {
            debug!(operation, "register reported no matching record");
            Ok(absent())
        }
        Err(source) => {
            warn!(operation, error = %source, "register call failed");
            Err(IntegrationError { operation, source })
        }
    }
}
