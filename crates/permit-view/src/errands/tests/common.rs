use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::clock::Clock;
use crate::errands::backend::{
    BackendError, CaseBackend, RawDocumentRef, RawErrand, RawErrandObject, RawEvent,
    RawStakeholder, RelatedErrandsResponse,
};
use crate::errands::cache::test_clock::ManualClock;
use crate::errands::cache::CacheConfig;
use crate::errands::domain::{Case, Event, PropertyDesignation, Stakeholder};
use crate::errands::filter::{FilterConfig, FilterEngine};
use crate::errands::identifier::is_equal;
use crate::errands::service::ErrandService;

pub(super) const NEIGHBOR: &str = "19900101-1234";
pub(super) const APPLICANT: &str = "19850505-4321";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date")
}

pub(super) fn days_ago(days: i64) -> NaiveDate {
    today() - Duration::days(days)
}

pub(super) fn filter_config() -> FilterConfig {
    FilterConfig::default()
}

pub(super) fn engine() -> FilterEngine {
    FilterEngine::new(filter_config())
}

pub(super) fn stakeholder(legal_id: &str, roles: &[&str]) -> Stakeholder {
    Stakeholder {
        legal_id: legal_id.to_string(),
        roles: roles.iter().map(|role| role.to_string()).collect(),
    }
}

pub(super) fn event(
    id: i64,
    event_type: &str,
    event_subtype: &str,
    date: Option<NaiveDate>,
    stakeholders: Vec<Stakeholder>,
) -> Event {
    Event {
        id,
        event_type: Some(event_type.to_string()),
        event_subtype: Some(event_subtype.to_string()),
        date,
        stakeholders,
        documents: BTreeMap::new(),
    }
}

/// Wanted notification event dated `days` ago that notified `NEIGHBOR`.
pub(super) fn notification(id: i64, days: i64) -> Event {
    event(
        id,
        "GRANHO",
        "GRAUTS",
        Some(days_ago(days)),
        vec![stakeholder(NEIGHBOR, &["GRANNE"])],
    )
}

pub(super) fn case(case_number: &str, stakeholders: Vec<Stakeholder>, events: Vec<Event>) -> Case {
    Case {
        case_number: case_number.to_string(),
        description: Some("Nybyggnad av enbostadshus".to_string()),
        case_type: Some("BL".to_string()),
        property_designations: Vec::new(),
        stakeholders,
        events,
    }
}

pub(super) fn designation(property: &str, designation: &str) -> PropertyDesignation {
    PropertyDesignation {
        property: property.to_string(),
        designation: designation.to_string(),
    }
}

pub(super) fn raw_stakeholder(legal_id: &str, roles: &[&str]) -> RawStakeholder {
    RawStakeholder {
        legal_id: Some(legal_id.to_string()),
        roles: roles.iter().map(|role| role.to_string()).collect(),
    }
}

pub(super) fn raw_document(id: &str, name: &str, document_type: Option<&str>) -> RawDocumentRef {
    RawDocumentRef {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        document_type: document_type.map(str::to_string),
    }
}

pub(super) fn raw_event(
    id: i64,
    event_subtype: &str,
    days: i64,
    stakeholders: Vec<RawStakeholder>,
    documents: Vec<RawDocumentRef>,
) -> RawEvent {
    RawEvent {
        id,
        event_type: Some("GRANHO".to_string()),
        event_subtype: Some(event_subtype.to_string()),
        date: Some(days_ago(days)),
        stakeholders,
        documents,
    }
}

pub(super) fn raw_errand(case_number: &str, events: Vec<RawEvent>) -> RawErrand {
    RawErrand {
        case_number: Some(case_number.to_string()),
        description: Some("Tillbyggnad".to_string()),
        errand_type: Some("BL".to_string()),
        objects: vec![
            RawErrandObject::Property {
                area: Some("SUNDSVALL".to_string()),
                designation: Some("BALDER 7".to_string()),
            },
            RawErrandObject::Other,
        ],
        stakeholders: vec![raw_stakeholder(APPLICANT, &["SOK"])],
        events,
    }
}

/// Register graph used by the service and routing tests.
pub(super) fn register_graph() -> Vec<RawErrand> {
    vec![
        raw_errand(
            "BYGG 2024-000456",
            vec![raw_event(
                21,
                "GRAUTS",
                3,
                vec![raw_stakeholder(NEIGHBOR, &["GRANNE"])],
                vec![],
            )],
        ),
        raw_errand(
            "BYGG 2024-000123",
            vec![
                raw_event(
                    12,
                    "GRAUTS",
                    1,
                    vec![raw_stakeholder(NEIGHBOR, &["GRANNE"])],
                    vec![
                        raw_document("doc-3", "Situationsplan", Some("SITPLAN")),
                        raw_document("doc-1", "Fasadritning", None),
                        raw_document("doc-2", "Karta", Some("gis")),
                        raw_document("doc-4", "  ", Some("SITPLAN")),
                        raw_document("doc-5", "Beskrivning", None),
                    ],
                ),
                raw_event(
                    11,
                    "GRAUTS",
                    45,
                    vec![raw_stakeholder(NEIGHBOR, &["GRANNE"])],
                    vec![raw_document("doc-9", "Gammal ritning", None)],
                ),
            ],
        ),
        raw_errand(
            "BYGG 2024-000789",
            vec![
                raw_event(
                    31,
                    "GRAUTS",
                    2,
                    vec![raw_stakeholder(NEIGHBOR, &["GRANNE"])],
                    vec![],
                ),
                raw_event(
                    32,
                    "GRASVA",
                    1,
                    vec![raw_stakeholder(NEIGHBOR, &["GRANNE"])],
                    vec![],
                ),
            ],
        ),
    ]
}

#[derive(Default)]
pub(super) struct CallCounts {
    pub(super) roles: AtomicUsize,
    pub(super) related_errands: AtomicUsize,
    pub(super) errand: AtomicUsize,
    pub(super) document_type: AtomicUsize,
}

/// In-memory register that counts how often each operation is reached.
#[derive(Default)]
pub(super) struct MemoryBackend {
    pub(super) roles: Vec<String>,
    pub(super) errands: Vec<RawErrand>,
    pub(super) document_types: HashMap<String, String>,
    pub(super) fault: Mutex<Option<BackendError>>,
    pub(super) calls: CallCounts,
}

impl MemoryBackend {
    pub(super) fn with_graph() -> Self {
        let mut document_types = HashMap::new();
        document_types.insert("doc-1".to_string(), "FASSIT".to_string());
        document_types.insert("doc-9".to_string(), "RITNING".to_string());

        Self {
            roles: vec!["GRANNE".to_string(), "SOK".to_string()],
            errands: register_graph(),
            document_types,
            ..Self::default()
        }
    }

    pub(super) fn fail_with(&self, error: BackendError) {
        *self.fault.lock().expect("fault mutex poisoned") = Some(error);
    }

    pub(super) fn recover(&self) {
        *self.fault.lock().expect("fault mutex poisoned") = None;
    }

    pub(super) fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn check_fault(&self) -> Result<(), BackendError> {
        match self.fault.lock().expect("fault mutex poisoned").clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn involves(errand: &RawErrand, legal_id: &str) -> bool {
        let matches = |stakeholder: &RawStakeholder| {
            stakeholder.legal_id.as_deref().is_some_and(|candidate| {
                is_equal(legal_id, candidate) || is_equal(candidate, legal_id)
            })
        };
        errand.stakeholders.iter().any(matches)
            || errand
                .events
                .iter()
                .any(|event| event.stakeholders.iter().any(matches))
    }
}

impl CaseBackend for MemoryBackend {
    fn roles(&self) -> Result<Vec<String>, BackendError> {
        self.calls.roles.fetch_add(1, Ordering::SeqCst);
        self.check_fault()?;
        Ok(self.roles.clone())
    }

    fn related_errands(
        &self,
        legal_id: &str,
        _roles: &[String],
    ) -> Result<RelatedErrandsResponse, BackendError> {
        self.calls.related_errands.fetch_add(1, Ordering::SeqCst);
        self.check_fault()?;
        let errands = self
            .errands
            .iter()
            .filter(|errand| Self::involves(errand, legal_id))
            .cloned()
            .collect();
        Ok(RelatedErrandsResponse::from_errands(errands))
    }

    fn errand(&self, case_number: &str) -> Result<RawErrand, BackendError> {
        self.calls.errand.fetch_add(1, Ordering::SeqCst);
        self.check_fault()?;
        self.errands
            .iter()
            .find(|errand| errand.case_number.as_deref() == Some(case_number))
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    fn document_type(&self, document_id: &str) -> Result<Option<String>, BackendError> {
        self.calls.document_type.fetch_add(1, Ordering::SeqCst);
        self.check_fault()?;
        self.document_types
            .get(document_id)
            .cloned()
            .map(Some)
            .ok_or(BackendError::NotFound)
    }
}

pub(super) fn build_service(
    backend: MemoryBackend,
) -> (
    ErrandService<MemoryBackend>,
    Arc<MemoryBackend>,
    Arc<ManualClock>,
) {
    let backend = Arc::new(backend);
    let clock = Arc::new(ManualClock::at(2024, 5, 1));
    assert_eq!(clock.today(), today());
    let service = ErrandService::with_clock(
        backend.clone(),
        filter_config(),
        &CacheConfig::default(),
        clock.clone(),
    );
    (service, backend, clock)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
