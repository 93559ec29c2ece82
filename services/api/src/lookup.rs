use crate::infra::SnapshotBackend;
use clap::Subcommand;
use permit_view::config::AppConfig;
use permit_view::errands::{CaseBackend, CaseEventReference, ErrandService};
use permit_view::error::AppError;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Subcommand, Debug)]
pub(crate) enum LookupCommand {
    /// Recent neighbor notifications for a personal or organization number
    Neighbors { identifier: String },
    /// Errands where the identifier is the applicant
    Applicant { identifier: String },
    /// Classification code of one errand
    Classification { case_number: String },
    /// Files of one notification, given as "<case number> [<event id>]"
    Files { reference: String },
}

pub(crate) fn run_lookup(
    snapshot: Option<PathBuf>,
    command: LookupCommand,
) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if snapshot.is_some() {
        config.backend.snapshot_path = snapshot;
    }

    let backend = Arc::new(SnapshotBackend::from_config(&config.backend)?);
    let service = ErrandService::new(backend, config.filter, &config.caches);

    let output = execute(&service, command)?;
    let rendered = serde_json::to_string_pretty(&output).map_err(AppError::Output)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn execute<B>(
    service: &ErrandService<B>,
    command: LookupCommand,
) -> Result<Value, AppError>
where
    B: CaseBackend + 'static,
{
    let output = match command {
        LookupCommand::Neighbors { identifier } => {
            json!(service.find_neighborhood_notifications(&identifier)?)
        }
        LookupCommand::Applicant { identifier } => {
            json!(service.find_applicant_errands(&identifier)?)
        }
        LookupCommand::Classification { case_number } => {
            let classification = service.get_classification(&case_number)?;
            json!({ "caseNumber": case_number, "classification": classification.0 })
        }
        LookupCommand::Files { reference } => {
            let reference = CaseEventReference::parse(&reference)?;
            json!(service.list_files(&reference)?)
        }
    };
    Ok(output)
}
