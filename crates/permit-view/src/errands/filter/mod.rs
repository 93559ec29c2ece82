mod config;
pub(crate) mod rules;

pub use config::FilterConfig;

use chrono::NaiveDate;

use super::domain::{Case, Event};
use rules::EventCodes;

/// Stateless rule set applied to one snapshot of mapped errands.
///
/// Every operation returns narrowed copies; the input errands are left intact
/// so a caller can reuse them within the same request.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    config: FilterConfig,
}

impl FilterEngine {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Wanted type and subtype, compared case-insensitively.
    pub fn is_valid_event(&self, event: &Event) -> bool {
        rules::is_valid_event(event, &self.config)
    }

    pub fn has_qualifying_case(&self, events: &[Event]) -> bool {
        rules::has_qualifying_case(events, &self.config)
    }

    pub(crate) fn is_valid_raw_event<E: EventCodes>(&self, event: &E) -> bool {
        rules::is_valid_event(event, &self.config)
    }

    pub(crate) fn has_qualifying_raw_events<E: EventCodes>(&self, events: &[E]) -> bool {
        rules::has_qualifying_case(events, &self.config)
    }

    /// Errands where `identifier` was notified through a recent wanted event.
    ///
    /// Surviving errands keep only the events that are wanted, dated inside the
    /// window ending `today`, and list `identifier` among their own stakeholders.
    pub fn filter_neighborhood_notifications(
        &self,
        cases: &[Case],
        identifier: &str,
        today: NaiveDate,
    ) -> Vec<Case> {
        cases
            .iter()
            .filter(|case| self.has_qualifying_case(&case.events))
            .filter_map(|case| {
                let events: Vec<Event> = case
                    .events
                    .iter()
                    .filter(|event| self.is_valid_event(event))
                    .filter(|event| {
                        rules::is_within_window(
                            event.date,
                            today,
                            self.config.notification_window_days,
                        )
                    })
                    .filter(|event| rules::notifies(event, identifier))
                    .cloned()
                    .collect();

                (!events.is_empty()).then(|| case.with_events(events))
            })
            .collect()
    }

    /// Errands where `legal_id` holds one of the configured applicant roles.
    pub fn filter_cases_for_applicant(&self, cases: &[Case], legal_id: &str) -> Vec<Case> {
        cases
            .iter()
            .filter(|case| {
                case.stakeholders.iter().any(|stakeholder| {
                    rules::is_applicant(stakeholder, legal_id, &self.config.applicant_roles)
                })
            })
            .cloned()
            .collect()
    }

    /// Narrow an errand to the event with `event_id`. Absent errands pass through.
    pub fn filter_event(&self, case: Option<&Case>, event_id: i64) -> Option<Case> {
        case.map(|case| {
            let events = case
                .events
                .iter()
                .filter(|event| event.id == event_id)
                .take(1)
                .cloned()
                .collect();
            case.with_events(events)
        })
    }

    pub fn is_unwanted_document_type(&self, document_type: Option<&str>) -> bool {
        rules::is_unwanted_document_type(document_type, &self.config)
    }
}
