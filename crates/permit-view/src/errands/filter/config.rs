use serde::{Deserialize, Serialize};

/// Business-rule codes driving both citizen views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub wanted_event_type: String,
    pub wanted_event_subtype: String,
    /// Subtypes that veto a whole errand when seen on a wanted-type event.
    pub unwanted_event_subtypes: Vec<String>,
    pub applicant_roles: Vec<String>,
    pub unwanted_document_types: Vec<String>,
    pub notification_window_days: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            wanted_event_type: "GRANHO".to_string(),
            wanted_event_subtype: "GRAUTS".to_string(),
            unwanted_event_subtypes: vec!["GRASVA".to_string(), "GRAKOM".to_string()],
            applicant_roles: vec!["SOK".to_string(), "KPER".to_string()],
            unwanted_document_types: vec!["GIS".to_string(), "FASSIT".to_string()],
            notification_window_days: 30,
        }
    }
}
