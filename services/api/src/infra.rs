use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;

use mortgage_approver::workflows::mortgage::{
    ApplicantId, ApplicationId, ApplicationRepository, ApplicationStatus, EvaluationConfig,
    MortgageApplication, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory adapter backing the service when no external store is wired in.
/// Updates are compare-and-swap on the record version.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, MortgageApplication>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, record: MortgageApplication) -> Result<MortgageApplication, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard
            .values()
            .any(|existing| existing.applicant_id == record.applicant_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<MortgageApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn fetch_by_applicant(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<Option<MortgageApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|record| &record.applicant_id == applicant_id)
            .cloned())
    }

    fn update(
        &self,
        mut record: MortgageApplication,
    ) -> Result<MortgageApplication, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get(&record.id) {
            None => Err(RepositoryError::NotFound),
            Some(existing) if existing.version != record.version => {
                Err(RepositoryError::VersionConflict)
            }
            Some(_) => {
                record.version += 1;
                guard.insert(record.id.clone(), record.clone());
                Ok(record)
            }
        }
    }

    fn delete(&self, id: &ApplicationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn pending(&self, limit: usize) -> Result<Vec<MortgageApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.status == ApplicationStatus::UnderReview)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Thresholds used when the service runs without environment overrides,
/// e.g. in the console demo.
pub(crate) fn default_evaluation_config() -> EvaluationConfig {
    EvaluationConfig {
        minimum_credit_score: 650,
        maximum_debt_to_income: Decimal::new(43, 2),
        annual_interest_rate: Decimal::new(7, 2),
        term_months: 360,
    }
}
