//! Neighbor-notification and applicant errand lookups over the permit register.

pub mod backend;
mod cache;
pub mod domain;
mod filter;
pub mod identifier;
pub mod integration;
mod mapping;
pub mod projection;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use backend::{
    BackendError, CaseBackend, ErrandList, RawDocumentRef, RawErrand, RawErrandObject, RawEvent,
    RawStakeholder, RelatedErrandsResponse,
};
pub use cache::{CacheConfig, CacheSettings, CacheStats};
pub use domain::{
    Case, CaseEventReference, Classification, Document, Event, FileEntry, FileManifest, KeyValue,
    PropertyDesignation, ReferenceParseError, Stakeholder,
};
pub use filter::{FilterConfig, FilterEngine};
pub use integration::{CachedCaseBackend, IntegrationError};
pub use router::errand_router;
pub use service::{ErrandService, ServiceError};
