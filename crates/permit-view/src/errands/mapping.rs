use std::collections::BTreeMap;

use tracing::debug;

use super::backend::{
    RawDocumentRef, RawErrand, RawErrandObject, RawEvent, RawStakeholder, RelatedErrandsResponse,
};
use super::domain::{Case, Document, Event, PropertyDesignation, Stakeholder};
use super::filter::FilterEngine;

/// Every errand in a related-errands response, without rule checks.
pub(crate) fn map_errands(response: &RelatedErrandsResponse) -> Vec<Case> {
    response
        .errands()
        .iter()
        .filter_map(|errand| map_case(errand, |_| false))
        .collect()
}

/// Related errands that survive the whole-errand veto.
pub(crate) fn map_notification_candidates(
    response: &RelatedErrandsResponse,
    engine: &FilterEngine,
) -> Vec<Case> {
    response
        .errands()
        .iter()
        .filter(|errand| engine.has_qualifying_raw_events(&errand.events))
        .filter_map(|errand| map_case(errand, |_| false))
        .collect()
}

/// A single errand; documents are kept only on events that pass the wanted-event check.
pub(crate) fn map_errand(errand: &RawErrand, engine: &FilterEngine) -> Option<Case> {
    map_case(errand, |event| engine.is_valid_raw_event(event))
}

fn map_case<F>(errand: &RawErrand, keep_documents: F) -> Option<Case>
where
    F: Fn(&RawEvent) -> bool,
{
    let Some(case_number) = errand
        .case_number
        .as_deref()
        .map(str::trim)
        .filter(|number| !number.is_empty())
    else {
        debug!("skipping register errand without case number");
        return None;
    };

    Some(Case {
        case_number: case_number.to_string(),
        description: errand.description.clone(),
        case_type: errand.errand_type.clone(),
        property_designations: map_property_designations(&errand.objects),
        stakeholders: map_stakeholders(&errand.stakeholders),
        events: errand
            .events
            .iter()
            .map(|event| map_event(event, keep_documents(event)))
            .collect(),
    })
}

fn map_property_designations(objects: &[RawErrandObject]) -> Vec<PropertyDesignation> {
    objects
        .iter()
        .filter_map(|object| match object {
            RawErrandObject::Property { area, designation } => Some(PropertyDesignation {
                property: area.clone().unwrap_or_default(),
                designation: designation.clone().unwrap_or_default(),
            }),
            RawErrandObject::Other => None,
        })
        .collect()
}

fn map_stakeholders(stakeholders: &[RawStakeholder]) -> Vec<Stakeholder> {
    stakeholders
        .iter()
        .map(|stakeholder| Stakeholder {
            legal_id: stakeholder.legal_id.clone().unwrap_or_default(),
            roles: stakeholder.roles.clone(),
        })
        .collect()
}

fn map_event(event: &RawEvent, with_documents: bool) -> Event {
    let documents = if with_documents {
        map_documents(&event.documents)
    } else {
        BTreeMap::new()
    };

    Event {
        id: event.id,
        event_type: event.event_type.clone(),
        event_subtype: event.event_subtype.clone(),
        date: event.date,
        stakeholders: map_stakeholders(&event.stakeholders),
        documents,
    }
}

fn map_documents(documents: &[RawDocumentRef]) -> BTreeMap<String, Document> {
    documents
        .iter()
        .filter_map(|document| {
            let id = non_blank(document.id.as_deref())?;
            let name = non_blank(document.name.as_deref())?;
            Some((
                id.to_string(),
                Document {
                    id: id.to_string(),
                    name: name.to_string(),
                    document_type: document.document_type.clone(),
                },
            ))
        })
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
