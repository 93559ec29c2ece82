use super::common::*;
use crate::errands::backend::{RawErrand, RawErrandObject, RelatedErrandsResponse};
use crate::errands::mapping::{map_errand, map_errands, map_notification_candidates};

#[test]
fn absent_result_maps_to_no_cases() {
    assert!(map_errands(&RelatedErrandsResponse::default()).is_empty());
    assert!(map_notification_candidates(&RelatedErrandsResponse::default(), &engine()).is_empty());
}

#[test]
fn maps_properties_and_stakeholders() {
    let mut errand = raw_errand("BYGG 2024-000123", vec![]);
    errand.objects.push(RawErrandObject::Property {
        area: Some("SUNDSVALL".to_string()),
        designation: None,
    });
    let response = RelatedErrandsResponse::from_errands(vec![errand]);

    let cases = map_errands(&response);

    assert_eq!(cases.len(), 1);
    let case = &cases[0];
    assert_eq!(case.case_number, "BYGG 2024-000123");
    assert_eq!(case.case_type.as_deref(), Some("BL"));
    assert_eq!(
        case.property_designations,
        vec![
            designation("SUNDSVALL", "BALDER 7"),
            designation("SUNDSVALL", "")
        ]
    );
    assert_eq!(case.stakeholders, vec![stakeholder(APPLICANT, &["SOK"])]);
}

#[test]
fn skips_errands_without_case_number() {
    let response = RelatedErrandsResponse::from_errands(vec![
        RawErrand::default(),
        RawErrand {
            case_number: Some("   ".to_string()),
            ..RawErrand::default()
        },
        raw_errand("BYGG 2024-000123", vec![]),
    ]);

    let cases = map_errands(&response);

    assert_eq!(cases.len(), 1);
}

#[test]
fn notification_candidates_apply_whole_case_veto() {
    let response = RelatedErrandsResponse::from_errands(register_graph());

    let candidates = map_notification_candidates(&response, &engine());

    let numbers: Vec<&str> = candidates
        .iter()
        .map(|case| case.case_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["BYGG 2024-000456", "BYGG 2024-000123"]);
    assert!(candidates
        .iter()
        .all(|case| case.events.iter().all(|event| event.documents.is_empty())));
}

#[test]
fn single_errand_keeps_documents_of_valid_events_only() {
    let mut errand = raw_errand(
        "BYGG 2024-000123",
        vec![raw_event(
            1,
            "GRAUTS",
            0,
            vec![],
            vec![
                raw_document("doc-1", "Ritning", None),
                raw_document("", "Utan id", None),
                raw_document("doc-2", "", None),
            ],
        )],
    );
    let mut other = raw_event(2, "GRAUTS", 0, vec![], vec![raw_document("doc-3", "Beslut", None)]);
    other.event_type = Some("BESLUT".to_string());
    errand.events.push(other);

    let case = map_errand(&errand, &engine()).expect("case maps");

    assert_eq!(case.events.len(), 2);
    let kept: Vec<&String> = case.events[0].documents.keys().collect();
    assert_eq!(kept, vec!["doc-1"]);
    assert!(case.events[1].documents.is_empty());
}

#[test]
fn single_errand_maps_without_veto() {
    let errand = register_graph()
        .into_iter()
        .find(|errand| errand.case_number.as_deref() == Some("BYGG 2024-000789"))
        .expect("vetoed errand in graph");

    let case = map_errand(&errand, &engine()).expect("vetoed errand still maps");

    assert_eq!(case.events.len(), 2);
}

#[test]
fn mapping_does_not_touch_the_source_graph() {
    let response = RelatedErrandsResponse::from_errands(register_graph());
    let before = response.clone();

    let _ = map_errands(&response);
    let _ = map_notification_candidates(&response, &engine());

    assert_eq!(response, before);
}
