use std::sync::Arc;

use tracing::{debug, info};

use super::backend::CaseBackend;
use super::cache::{CacheConfig, CacheStats};
use super::domain::{Case, CaseEventReference, Classification, FileEntry, FileManifest, KeyValue};
use super::filter::{FilterConfig, FilterEngine};
use super::identifier::{align_to_query, normalize_query};
use super::integration::{CachedCaseBackend, IntegrationError};
use super::mapping;
use super::projection::{self, OTHER_CLASSIFICATION};
use crate::clock::{Clock, SystemClock};

/// Service composing the cached register client, filter engine and projector.
pub struct ErrandService<B> {
    backend: CachedCaseBackend<B>,
    engine: FilterEngine,
    clock: Arc<dyn Clock>,
}

impl<B> ErrandService<B>
where
    B: CaseBackend + 'static,
{
    pub fn new(backend: Arc<B>, filter: FilterConfig, caches: &CacheConfig) -> Self {
        Self::with_clock(backend, filter, caches, Arc::new(SystemClock))
    }

    pub fn with_clock(
        backend: Arc<B>,
        filter: FilterConfig,
        caches: &CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            backend: CachedCaseBackend::new(backend, caches, clock.clone()),
            engine: FilterEngine::new(filter),
            clock,
        }
    }

    /// Errands where `identifier` was recently notified as a neighbor.
    pub fn find_neighborhood_notifications(
        &self,
        identifier: &str,
    ) -> Result<Vec<KeyValue>, ServiceError> {
        let roles = self.backend.roles()?;
        if roles.is_empty() {
            return Err(ServiceError::NoRolesAvailable);
        }

        let query = normalize_query(identifier);
        let response = self.backend.related_errands(&query, &roles)?;
        let candidates = align_legal_ids(
            mapping::map_notification_candidates(&response, &self.engine),
            &query,
        );

        let today = self.clock.today();
        let notified = self
            .engine
            .filter_neighborhood_notifications(&candidates, &query, today);
        info!(
            candidates = candidates.len(),
            notified = notified.len(),
            "neighborhood notification lookup"
        );

        Ok(projection::map_to_neighborhood_key_value_response_list(&notified))
    }

    /// Errands where `identifier` is the applicant.
    pub fn find_applicant_errands(&self, identifier: &str) -> Result<Vec<KeyValue>, ServiceError> {
        let query = normalize_query(identifier);
        let roles = &self.engine.config().applicant_roles;
        let response = self.backend.related_errands(&query, roles)?;
        let cases = align_legal_ids(mapping::map_errands(&response), &query);

        let applied = self.engine.filter_cases_for_applicant(&cases, &query);
        info!(
            errands = cases.len(),
            applicant = applied.len(),
            "applicant errand lookup"
        );

        Ok(projection::map_to_key_value_response_list(&applied))
    }

    /// Classification of an errand. Unknown errands classify as other.
    pub fn get_classification(&self, case_number: &str) -> Result<Classification, ServiceError> {
        let case = self
            .backend
            .errand(case_number)?
            .and_then(|errand| mapping::map_errand(&errand, &self.engine));

        match case {
            Some(case) => Ok(projection::map_to_classification(&case)),
            None => {
                debug!(case_number, "no errand to classify");
                Ok(OTHER_CLASSIFICATION)
            }
        }
    }

    /// Files attached to one notification event, minus unwanted document types.
    pub fn list_files(&self, reference: &CaseEventReference) -> Result<FileManifest, ServiceError> {
        let case = self
            .backend
            .errand(&reference.case_number)?
            .and_then(|errand| mapping::map_errand(&errand, &self.engine));
        let case = self.engine.filter_event(case.as_ref(), reference.event_id);

        let mut files = Vec::new();
        for event in case.iter().flat_map(|case| case.events.iter()) {
            for document in event.documents.values() {
                let document_type = match &document.document_type {
                    Some(code) => Some(code.clone()),
                    None => self.backend.document_type(&document.id)?,
                };
                if self.engine.is_unwanted_document_type(document_type.as_deref()) {
                    continue;
                }
                files.push(FileEntry {
                    document_id: document.id.clone(),
                    name: document.name.clone(),
                });
            }
        }
        files.sort_by(|left, right| {
            left.name
                .cmp(&right.name)
                .then_with(|| left.document_id.cmp(&right.document_id))
        });

        Ok(FileManifest {
            case_number: reference.case_number.clone(),
            event_id: reference.event_id,
            files,
        })
    }

    pub fn cache_stats(&self) -> Vec<(&'static str, CacheStats)> {
        self.backend.stats()
    }

    pub fn clear_caches(&self) {
        self.backend.clear();
    }
}

fn align_legal_ids(cases: Vec<Case>, query: &str) -> Vec<Case> {
    cases
        .iter()
        .map(|case| case.with_legal_ids(|legal_id| align_to_query(query, legal_id)))
        .collect()
}

/// Error raised by the errand service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("no roles available for lookup")]
    NoRolesAvailable,
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}
