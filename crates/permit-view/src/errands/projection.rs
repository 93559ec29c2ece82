//! Ordering and positional projection of filtered errands.

use super::domain::{Case, Classification, KeyValue};

/// Classification returned for type codes outside the known table.
pub const OTHER_CLASSIFICATION: Classification = Classification(99);

/// Errand type codes with a fixed classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrandType {
    BuildingPermit,
    TemporaryBuildingPermit,
    DemolitionPermit,
    GroundWorksPermit,
    AdvanceNotice,
    Notification,
    ShoreProtectionExemption,
}

impl ErrandType {
    const ALL: [ErrandType; 7] = [
        ErrandType::BuildingPermit,
        ErrandType::TemporaryBuildingPermit,
        ErrandType::DemolitionPermit,
        ErrandType::GroundWorksPermit,
        ErrandType::AdvanceNotice,
        ErrandType::Notification,
        ErrandType::ShoreProtectionExemption,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            ErrandType::BuildingPermit => "BL",
            ErrandType::TemporaryBuildingPermit => "TB",
            ErrandType::DemolitionPermit => "RL",
            ErrandType::GroundWorksPermit => "ML",
            ErrandType::AdvanceNotice => "FORHBESKED",
            ErrandType::Notification => "ANM",
            ErrandType::ShoreProtectionExemption => "STRANDDISP",
        }
    }

    pub const fn classification(self) -> Classification {
        match self {
            ErrandType::BuildingPermit => Classification(1),
            ErrandType::TemporaryBuildingPermit => Classification(2),
            ErrandType::DemolitionPermit => Classification(3),
            ErrandType::GroundWorksPermit => Classification(4),
            ErrandType::AdvanceNotice => Classification(5),
            ErrandType::Notification => Classification(6),
            ErrandType::ShoreProtectionExemption => Classification(7),
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|errand_type| errand_type.code().eq_ignore_ascii_case(code))
    }
}

/// One row per errand, or per property designation when an errand has several.
pub fn map_to_key_value_response_list(cases: &[Case]) -> Vec<KeyValue> {
    let mut ordered: Vec<&Case> = cases.iter().collect();
    ordered.sort_by(|left, right| left.case_number.cmp(&right.case_number));

    ordered
        .into_iter()
        .flat_map(|case| {
            if case.property_designations.is_empty() {
                vec![case.case_number.clone()]
            } else {
                case.property_designations
                    .iter()
                    .map(|designation| format!("{}, {}", case.case_number, designation))
                    .collect()
            }
        })
        .enumerate()
        .map(|(index, value)| KeyValue::new(index + 1, value))
        .collect()
}

/// One `"<caseNumber> [<eventId>]"` row per surviving event, sorted by that text.
pub fn map_to_neighborhood_key_value_response_list(cases: &[Case]) -> Vec<KeyValue> {
    let mut values: Vec<String> = cases
        .iter()
        .flat_map(|case| {
            case.events
                .iter()
                .map(move |event| format!("{} [{}]", case.case_number, event.id))
        })
        .collect();
    values.sort();

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| KeyValue::new(index + 1, value))
        .collect()
}

pub fn map_to_classification(case: &Case) -> Classification {
    case.case_type
        .as_deref()
        .and_then(ErrandType::from_code)
        .map(ErrandType::classification)
        .unwrap_or(OTHER_CLASSIFICATION)
}
