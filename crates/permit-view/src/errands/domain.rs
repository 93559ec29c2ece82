use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Flat representation of one register errand, rebuilt on every lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub case_number: String,
    pub description: Option<String>,
    /// Errand type code as reported by the register.
    pub case_type: Option<String>,
    pub property_designations: Vec<PropertyDesignation>,
    pub stakeholders: Vec<Stakeholder>,
    pub events: Vec<Event>,
}

impl Case {
    /// Narrowed copy carrying `events` in place of the current event list.
    pub fn with_events(&self, events: Vec<Event>) -> Case {
        Case {
            events,
            ..self.clone()
        }
    }

    /// Copy with every case- and event-level legal id passed through `align`.
    pub fn with_legal_ids<F>(&self, align: F) -> Case
    where
        F: Fn(&str) -> String,
    {
        let align_all = |stakeholders: &[Stakeholder]| -> Vec<Stakeholder> {
            stakeholders
                .iter()
                .map(|stakeholder| Stakeholder {
                    legal_id: align(&stakeholder.legal_id),
                    roles: stakeholder.roles.clone(),
                })
                .collect()
        };

        Case {
            stakeholders: align_all(&self.stakeholders),
            events: self
                .events
                .iter()
                .map(|event| Event {
                    stakeholders: align_all(&event.stakeholders),
                    ..event.clone()
                })
                .collect(),
            ..self.clone()
        }
    }
}

/// Dated occurrence in an errand's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub event_type: Option<String>,
    pub event_subtype: Option<String>,
    pub date: Option<NaiveDate>,
    /// Parties notified through this event, distinct from the errand's own stakeholders.
    pub stakeholders: Vec<Stakeholder>,
    pub documents: BTreeMap<String, Document>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stakeholder {
    pub legal_id: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDesignation {
    pub property: String,
    pub designation: String,
}

impl fmt::Display for PropertyDesignation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.property, self.designation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    pub document_type: Option<String>,
}

/// Positional output row. Keys are 1-based and only encode display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(position: usize, value: impl Into<String>) -> Self {
        Self {
            key: position.to_string(),
            value: value.into(),
        }
    }
}

/// Integer classification derived from an errand's type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification(pub u16);

/// File listing for one notification event, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileManifest {
    pub case_number: String,
    pub event_id: i64,
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub document_id: String,
    pub name: String,
}

/// Case number plus event id, written as `"<caseNumber> [<eventId>]"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseEventReference {
    pub case_number: String,
    pub event_id: i64,
}

impl CaseEventReference {
    pub fn new(case_number: impl Into<String>, event_id: i64) -> Self {
        Self {
            case_number: case_number.into(),
            event_id,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ReferenceParseError> {
        let trimmed = raw.trim();
        let (head, tail) = trimmed
            .strip_suffix(']')
            .and_then(|rest| rest.rsplit_once('['))
            .ok_or_else(|| ReferenceParseError::MissingEventId(raw.to_string()))?;

        let case_number = head.trim();
        if case_number.is_empty() {
            return Err(ReferenceParseError::MissingCaseNumber(raw.to_string()));
        }

        let event_id = tail
            .trim()
            .parse::<i64>()
            .map_err(|_| ReferenceParseError::InvalidEventId(tail.trim().to_string()))?;

        Ok(Self::new(case_number, event_id))
    }
}

impl fmt::Display for CaseEventReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.case_number, self.event_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceParseError {
    #[error("'{0}' lacks a bracketed event id, expected '<case number> [<event id>]'")]
    MissingEventId(String),
    #[error("'{0}' has no case number before the event id")]
    MissingCaseNumber(String),
    #[error("event id '{0}' is not an integer")]
    InvalidEventId(String),
}
