use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    ApplicantId, ApplicationId, ApplicationStatus, FieldMap, FieldValue, MortgageApplication,
    RequirementCategory,
};
use super::evaluation::{EvaluationConfig, EvaluationEngine};
use super::repository::{ApplicationRepository, RepositoryError};

/// Service composing the repository and the evaluation engine.
///
/// The service owns the status fields of every record it touches; callers
/// only ever supply applicant ids and raw field data.
pub struct MortgageApplicationService<R> {
    repository: Arc<R>,
    engine: Arc<EvaluationEngine>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Save attempts per merge before a version conflict is surfaced.
const MERGE_RETRY_LIMIT: usize = 3;

const PENDING_REASON: &str = "Application submitted - awaiting documentation";

impl<R> MortgageApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: EvaluationConfig) -> Self {
        Self {
            repository,
            engine: Arc::new(EvaluationEngine::new(config)),
        }
    }

    /// Open a new application for an applicant who does not have one yet.
    pub fn create(
        &self,
        applicant_id: &str,
    ) -> Result<MortgageApplication, ApplicationServiceError> {
        let applicant_id = applicant_id.trim();
        if applicant_id.is_empty() {
            return Err(ApplicationServiceError::Validation(
                "applicant id must not be blank".to_string(),
            ));
        }

        let now = Utc::now();
        let record = MortgageApplication {
            id: next_application_id(),
            applicant_id: ApplicantId(applicant_id.to_string()),
            status: ApplicationStatus::Pending,
            status_reason: PENDING_REASON.to_string(),
            missing_requirements: RequirementCategory::ALL.to_vec(),
            fields: FieldMap::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record).map_err(|err| match err {
            RepositoryError::Conflict => {
                ApplicationServiceError::DuplicateApplication(ApplicantId(applicant_id.to_string()))
            }
            other => ApplicationServiceError::Repository(other),
        })?;

        info!(
            application_id = %stored.id,
            applicant_id = %stored.applicant_id,
            "mortgage application opened"
        );
        Ok(stored)
    }

    /// Overlay `updates` onto the stored mapping and re-derive the status.
    ///
    /// The merge-then-write must be atomic relative to other writers on the
    /// same application, so a stale version restarts the load-merge-save
    /// cycle from a fresh read.
    pub fn merge_fields(
        &self,
        application_id: &ApplicationId,
        updates: BTreeMap<String, FieldValue>,
    ) -> Result<MortgageApplication, ApplicationServiceError> {
        let mut attempts = 0;
        loop {
            let mut record = self
                .repository
                .fetch(application_id)?
                .ok_or(ApplicationServiceError::NotFound)?;

            record.fields.merge(updates.clone());
            record.updated_at = Utc::now();

            let outcome = self.engine.evaluate(&record.fields);
            record.status = outcome.status;
            record.status_reason = outcome.status_reason;
            record.missing_requirements = outcome.missing_requirements;

            match self.repository.update(record) {
                Ok(stored) => {
                    info!(
                        application_id = %stored.id,
                        status = stored.status.label(),
                        "application re-evaluated"
                    );
                    return Ok(stored);
                }
                Err(RepositoryError::VersionConflict) => {
                    attempts += 1;
                    if attempts >= MERGE_RETRY_LIMIT {
                        return Err(RepositoryError::VersionConflict.into());
                    }
                }
                Err(other) => return Err(other.into()),
            }
        }
    }

    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<MortgageApplication, ApplicationServiceError> {
        self.repository
            .fetch(application_id)?
            .ok_or(ApplicationServiceError::NotFound)
    }

    pub fn get_by_applicant(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<MortgageApplication, ApplicationServiceError> {
        self.repository
            .fetch_by_applicant(applicant_id)?
            .ok_or(ApplicationServiceError::NotFound)
    }

    /// Administrative removal. No cascading side effects.
    pub fn delete(&self, application_id: &ApplicationId) -> Result<(), ApplicationServiceError> {
        match self.repository.delete(application_id) {
            Ok(()) => {
                info!(application_id = %application_id, "application deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(ApplicationServiceError::NotFound),
            Err(other) => Err(other.into()),
        }
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("an application already exists for applicant {0}")]
    DuplicateApplication(ApplicantId),
    #[error("application not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
