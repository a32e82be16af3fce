//! Mortgage application intake, field merge, and status evaluation.
//!
//! The record's field mapping is the single source of truth: every merge
//! overlays the supplied keys and re-runs the full evaluation, including
//! after an Approved or Rejected outcome.

pub mod domain;
pub(crate) mod evaluation;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantId, ApplicationId, ApplicationStatus, ApplicationStatusView, FieldMap, FieldValue,
    FinancialProfile, MortgageApplication, RequirementCategory,
};
pub use evaluation::{
    EvaluationConfig, EvaluationDecision, EvaluationEngine, EvaluationOutcome, LoanMetrics,
    RejectionReason,
};
pub use repository::{ApplicationRepository, RepositoryError};
pub use router::application_router;
pub use service::{ApplicationServiceError, MortgageApplicationService};
