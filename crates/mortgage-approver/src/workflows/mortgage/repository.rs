use super::domain::{ApplicantId, ApplicationId, MortgageApplication};

/// Storage abstraction so the service can be exercised in isolation.
///
/// `update` is a compare-and-swap on the record `version`: the stored record
/// is replaced only when the caller read the latest version, otherwise
/// `VersionConflict` is returned and the caller must redo its
/// load-merge-save cycle. This keeps concurrent merges from silently
/// dropping each other's keys.
pub trait ApplicationRepository: Send + Sync {
    /// Persist a new record. Fails with `Conflict` when the applicant
    /// already has an application.
    fn insert(&self, record: MortgageApplication) -> Result<MortgageApplication, RepositoryError>;

    fn fetch(&self, id: &ApplicationId) -> Result<Option<MortgageApplication>, RepositoryError>;

    fn fetch_by_applicant(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<Option<MortgageApplication>, RepositoryError>;

    /// Replace the stored record, bumping its version. Fails with
    /// `VersionConflict` when another writer got there first.
    fn update(&self, record: MortgageApplication) -> Result<MortgageApplication, RepositoryError>;

    fn delete(&self, id: &ApplicationId) -> Result<(), RepositoryError>;

    /// Applications currently under manual review, for operator listings.
    fn pending(&self, limit: usize) -> Result<Vec<MortgageApplication>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("an application already exists for this applicant")]
    Conflict,
    #[error("application not found")]
    NotFound,
    #[error("application was modified concurrently")]
    VersionConflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
