use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for mortgage applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for the applicant. At most one application exists per applicant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// High level status tracked throughout the mortgage approval workflow.
///
/// Approved and Rejected are not terminal: any later field merge re-runs the
/// evaluation against the merged mapping, which is the only source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    RequiresAdditionalInfo,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::RequiresAdditionalInfo => "requires_additional_info",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Documentation categories an application must cover before underwriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RequirementCategory {
    Income,
    Credit,
    Employment,
    Property,
}

impl RequirementCategory {
    /// Fixed reporting order for missing-requirement lists.
    pub const ALL: [RequirementCategory; 4] = [
        RequirementCategory::Income,
        RequirementCategory::Credit,
        RequirementCategory::Employment,
        RequirementCategory::Property,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RequirementCategory::Income => "Income",
            RequirementCategory::Credit => "Credit",
            RequirementCategory::Employment => "Employment",
            RequirementCategory::Property => "Property",
        }
    }

    /// Field names that satisfy the category. Current names first, legacy
    /// synonyms after, so presence checks and numeric extraction stay
    /// consistent.
    pub const fn field_synonyms(self) -> &'static [&'static str] {
        match self {
            RequirementCategory::Income => INCOME_FIELDS,
            RequirementCategory::Credit => CREDIT_SCORE_FIELDS,
            RequirementCategory::Employment => EMPLOYER_FIELDS,
            RequirementCategory::Property => PROPERTY_FIELDS,
        }
    }
}

/// Ordered lookup lists for the financial figures the evaluator extracts.
pub const INCOME_FIELDS: &[&str] = &["income_annual", "annual_income"];
pub const CREDIT_SCORE_FIELDS: &[&str] = &["credit_score"];
pub const EMPLOYER_FIELDS: &[&str] = &["employment_employer"];
pub const LOAN_AMOUNT_FIELDS: &[&str] = &["property_loan_amount", "loan_amount"];
pub const PROPERTY_VALUE_FIELDS: &[&str] = &["property_value"];

const PROPERTY_FIELDS: &[&str] = &["property_value", "property_loan_amount", "loan_amount"];

/// Raw value supplied for an application field. Untagged so request payloads
/// stay plain `{"credit_score": 700}` maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Number(Decimal),
    Date(NaiveDate),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value; non-numeric values read as `None`.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}

/// Open, string-keyed field mapping for an application.
///
/// Updates overlay per key (last write wins) and never drop unrelated keys.
/// Malformed values are kept verbatim for traceability; they simply read as
/// absent when a numeric figure is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, FieldValue>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay `updates` onto the mapping, key by key.
    pub fn merge(&mut self, updates: BTreeMap<String, FieldValue>) {
        for (key, value) in updates {
            self.0.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn contains_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.0.contains_key(*key))
    }

    /// First positive numeric value across the ordered synonym list.
    /// Entries that are missing, non-numeric, or not positive are skipped.
    pub fn positive_decimal(&self, keys: &[&str]) -> Option<Decimal> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .filter_map(FieldValue::as_decimal)
            .find(|value| *value > Decimal::ZERO)
    }

    pub fn text(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(|value| match value {
                FieldValue::Text(text) => Some(text.as_str()),
                _ => None,
            })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Typed projection the evaluator consumes. A category struct is present
    /// when any of its defining fields is present; the inner options carry
    /// the values that survived numeric validation.
    pub fn financial_profile(&self) -> FinancialProfile {
        let income = self
            .contains_any(INCOME_FIELDS)
            .then(|| IncomeDetails {
                annual_income: self.positive_decimal(INCOME_FIELDS),
            });
        let credit = self
            .contains_any(CREDIT_SCORE_FIELDS)
            .then(|| CreditDetails {
                score: self.positive_decimal(CREDIT_SCORE_FIELDS),
            });
        let employment = self
            .contains_any(EMPLOYER_FIELDS)
            .then(|| EmploymentDetails {
                employer: self.text(EMPLOYER_FIELDS).map(str::to_string),
            });
        let property = self
            .contains_any(RequirementCategory::Property.field_synonyms())
            .then(|| PropertyDetails {
                appraised_value: self.positive_decimal(PROPERTY_VALUE_FIELDS),
                loan_amount: self.positive_decimal(LOAN_AMOUNT_FIELDS),
            });

        FinancialProfile {
            income,
            credit,
            employment,
            property,
        }
    }
}

/// Typed view over the raw mapping, one optional struct per requirement
/// category. Unknown keys stay in the map untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialProfile {
    pub income: Option<IncomeDetails>,
    pub credit: Option<CreditDetails>,
    pub employment: Option<EmploymentDetails>,
    pub property: Option<PropertyDetails>,
}

impl FinancialProfile {
    pub fn satisfies(&self, category: RequirementCategory) -> bool {
        match category {
            RequirementCategory::Income => self.income.is_some(),
            RequirementCategory::Credit => self.credit.is_some(),
            RequirementCategory::Employment => self.employment.is_some(),
            RequirementCategory::Property => self.property.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomeDetails {
    pub annual_income: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreditDetails {
    pub score: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmploymentDetails {
    pub employer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDetails {
    pub appraised_value: Option<Decimal>,
    pub loan_amount: Option<Decimal>,
}

/// Repository-backed record for a single applicant's mortgage request.
///
/// The evaluator exclusively owns status, status_reason, and
/// missing_requirements; callers only ever supply raw field data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageApplication {
    pub id: ApplicationId,
    pub applicant_id: ApplicantId,
    pub status: ApplicationStatus,
    pub status_reason: String,
    pub missing_requirements: Vec<RequirementCategory>,
    pub fields: FieldMap,
    /// Storage concurrency token, bumped by the repository on every update.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MortgageApplication {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            applicant_id: self.applicant_id.clone(),
            status: self.status.label(),
            status_reason: self.status_reason.clone(),
            missing_requirements: self
                .missing_requirements
                .iter()
                .map(|category| category.label())
                .collect(),
            updated_at: self.updated_at,
        }
    }
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub applicant_id: ApplicantId,
    pub status: &'static str,
    pub status_reason: String,
    pub missing_requirements: Vec<&'static str>,
    pub updated_at: DateTime<Utc>,
}
