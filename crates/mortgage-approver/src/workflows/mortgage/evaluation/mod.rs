mod config;
mod policy;
mod rules;

pub use config::EvaluationConfig;
pub use policy::{EvaluationDecision, RejectionReason};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationStatus, FieldMap, RequirementCategory};
use policy::decide;

/// Stateless evaluator deriving application status from the field mapping.
///
/// Evaluation is a pure function of the mapping: the same fields always
/// produce the same status, reason, and missing-requirement list.
pub struct EvaluationEngine {
    config: EvaluationConfig,
}

impl EvaluationEngine {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, fields: &FieldMap) -> EvaluationOutcome {
        let profile = fields.financial_profile();

        let missing = rules::missing_categories(&profile);
        if !missing.is_empty() {
            return EvaluationOutcome::from_decision(
                EvaluationDecision::AdditionalInfoRequired {
                    missing: missing.clone(),
                },
                missing,
                None,
            );
        }

        let signals = rules::financial_signals(&profile);
        let (annual_income, credit_score, loan_amount) = match (
            signals.annual_income,
            signals.credit_score,
            signals.loan_amount,
        ) {
            (Some(income), Some(score), Some(loan)) => (income, score, loan),
            _ => {
                return EvaluationOutcome::from_decision(
                    EvaluationDecision::ManualReview,
                    Vec::new(),
                    None,
                );
            }
        };

        let metrics = rules::loan_metrics(annual_income, loan_amount, &self.config);
        let decision = decide(credit_score, &metrics, &self.config);
        EvaluationOutcome::from_decision(decision, Vec::new(), Some(metrics))
    }
}

/// Evaluation output: the decision, the derived status fields, and the loan
/// metrics when the financial data was complete enough to compute them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub decision: EvaluationDecision,
    pub status: ApplicationStatus,
    pub status_reason: String,
    pub missing_requirements: Vec<RequirementCategory>,
    pub metrics: Option<LoanMetrics>,
}

impl EvaluationOutcome {
    fn from_decision(
        decision: EvaluationDecision,
        missing_requirements: Vec<RequirementCategory>,
        metrics: Option<LoanMetrics>,
    ) -> Self {
        Self {
            status: decision.status(),
            status_reason: decision.summary(),
            missing_requirements,
            metrics,
            decision,
        }
    }
}

/// Amortization figures for an application with complete financial data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanMetrics {
    pub monthly_income: Decimal,
    pub monthly_payment: Decimal,
    pub debt_to_income: Decimal,
}
