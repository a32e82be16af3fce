use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::workflows::mortgage::domain::{
    ApplicantId, ApplicationId, ApplicationStatus, FieldMap, FieldValue, MortgageApplication,
};
use crate::workflows::mortgage::evaluation::{EvaluationConfig, EvaluationEngine};
use crate::workflows::mortgage::repository::{ApplicationRepository, RepositoryError};
use crate::workflows::mortgage::{application_router, MortgageApplicationService};

pub(super) fn evaluation_config() -> EvaluationConfig {
    EvaluationConfig {
        minimum_credit_score: 650,
        maximum_debt_to_income: Decimal::new(43, 2),
        annual_interest_rate: Decimal::new(7, 2),
        term_months: 360,
    }
}

/// Variant with a zero-rate note so boundary arithmetic stays exact:
/// the payment is principal divided by term.
pub(super) fn zero_rate_config() -> EvaluationConfig {
    EvaluationConfig {
        annual_interest_rate: Decimal::ZERO,
        ..evaluation_config()
    }
}

pub(super) fn engine() -> EvaluationEngine {
    EvaluationEngine::new(evaluation_config())
}

pub(super) fn number(value: i64) -> FieldValue {
    FieldValue::Number(Decimal::from(value))
}

pub(super) fn text(value: &str) -> FieldValue {
    FieldValue::Text(value.to_string())
}

pub(super) fn updates(entries: &[(&str, FieldValue)]) -> BTreeMap<String, FieldValue> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Fully documented application that approves under the standard config:
/// monthly payment on the 240k loan is about 1596.73 against 7500 of
/// monthly income.
pub(super) fn complete_fields() -> BTreeMap<String, FieldValue> {
    updates(&[
        ("income_annual", number(90_000)),
        ("credit_score", number(700)),
        ("employment_employer", text("Acme")),
        ("property_value", number(300_000)),
        ("property_loan_amount", number(240_000)),
    ])
}

pub(super) fn field_map(entries: BTreeMap<String, FieldValue>) -> FieldMap {
    let mut map = FieldMap::new();
    map.merge(entries);
    map
}

pub(super) fn build_service() -> (
    Arc<MortgageApplicationService<MemoryRepository>>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(MortgageApplicationService::new(
        repository.clone(),
        evaluation_config(),
    ));
    (service, repository)
}

pub(super) fn application_router_with_service(
    service: Arc<MortgageApplicationService<MemoryRepository>>,
) -> axum::Router {
    application_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, MortgageApplication>>>,
}

impl ApplicationRepository for MemoryRepository {
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

/// Wrapper that fails the first N update calls with a version conflict, so
/// the service's load-merge-save retry can be observed.
pub(super) struct ContendedRepository {
    pub(super) inner: MemoryRepository,
    conflicts: Arc<Mutex<usize>>,
}

impl ContendedRepository {
    pub(super) fn with_conflicts(count: usize) -> Self {
        Self {
            inner: MemoryRepository::default(),
            conflicts: Arc::new(Mutex::new(count)),
        }
    }
}

impl ApplicationRepository for ContendedRepository {
    fn insert(&self, record: MortgageApplication) -> Result<MortgageApplication, RepositoryError> {
        self.inner.insert(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<MortgageApplication>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn fetch_by_applicant(
        &self,
        applicant_id: &ApplicantId,
    ) -> Result<Option<MortgageApplication>, RepositoryError> {
        self.inner.fetch_by_applicant(applicant_id)
    }

    fn update(&self, record: MortgageApplication) -> Result<MortgageApplication, RepositoryError> {
        let mut remaining = self.conflicts.lock().expect("conflict mutex poisoned");
        if *remaining > 0 {
            *remaining -= 1;
            return Err(RepositoryError::VersionConflict);
        }
        drop(remaining);
        self.inner.update(record)
    }

    fn delete(&self, id: &ApplicationId) -> Result<(), RepositoryError> {
        self.inner.delete(id)
    }

    fn pending(&self, limit: usize) -> Result<Vec<MortgageApplication>, RepositoryError> {
        self.inner.pending(limit)
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _record: MortgageApplication) -> Result<MortgageApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<MortgageApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_by_applicant(
        &self,
        _applicant_id: &ApplicantId,
    ) -> Result<Option<MortgageApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: MortgageApplication) -> Result<MortgageApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &ApplicationId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn pending(&self, _limit: usize) -> Result<Vec<MortgageApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
