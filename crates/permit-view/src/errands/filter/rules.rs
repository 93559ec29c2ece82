use chrono::{Duration, NaiveDate};

use super::super::backend::RawEvent;
use super::super::domain::{Event, Stakeholder};
use super::config::FilterConfig;

/// Type and subtype codes, shared by raw register events and mapped events.
pub(crate) trait EventCodes {
    fn type_code(&self) -> Option<&str>;
    fn subtype_code(&self) -> Option<&str>;
}

impl EventCodes for Event {
    fn type_code(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    fn subtype_code(&self) -> Option<&str> {
        self.event_subtype.as_deref()
    }
}

impl EventCodes for RawEvent {
    fn type_code(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    fn subtype_code(&self) -> Option<&str> {
        self.event_subtype.as_deref()
    }
}

fn code_matches(code: Option<&str>, wanted: &str) -> bool {
    code.is_some_and(|code| code.eq_ignore_ascii_case(wanted))
}

pub(crate) fn is_valid_event<E: EventCodes>(event: &E, config: &FilterConfig) -> bool {
    code_matches(event.type_code(), &config.wanted_event_type)
        && code_matches(event.subtype_code(), &config.wanted_event_subtype)
}

fn is_unwanted_event<E: EventCodes>(event: &E, config: &FilterConfig) -> bool {
    code_matches(event.type_code(), &config.wanted_event_type)
        && config
            .unwanted_event_subtypes
            .iter()
            .any(|unwanted| code_matches(event.subtype_code(), unwanted))
}

/// Single pass over every event: an unwanted event anywhere vetoes the errand.
pub(crate) fn has_qualifying_case<E: EventCodes>(events: &[E], config: &FilterConfig) -> bool {
    let mut has_valid = false;
    let mut has_unwanted = false;

    for event in events {
        has_valid |= is_valid_event(event, config);
        has_unwanted |= is_unwanted_event(event, config);
    }

    has_valid && !has_unwanted
}

pub(crate) fn is_within_window(date: Option<NaiveDate>, today: NaiveDate, days: u32) -> bool {
    let Some(oldest) = today.checked_sub_signed(Duration::days(i64::from(days))) else {
        return date.is_some();
    };
    date.is_some_and(|date| date >= oldest)
}

pub(crate) fn notifies(event: &Event, identifier: &str) -> bool {
    event
        .stakeholders
        .iter()
        .any(|stakeholder| stakeholder.legal_id == identifier)
}

pub(crate) fn is_applicant(stakeholder: &Stakeholder, legal_id: &str, roles: &[String]) -> bool {
    stakeholder.legal_id == legal_id
        && stakeholder
            .roles
            .iter()
            .any(|role| roles.iter().any(|applicant_role| applicant_role == role))
}

pub(crate) fn is_unwanted_document_type(
    document_type: Option<&str>,
    config: &FilterConfig,
) -> bool {
    document_type.is_some_and(|code| {
        config
            .unwanted_document_types
            .iter()
            .any(|unwanted| unwanted.eq_ignore_ascii_case(code))
    })
}
