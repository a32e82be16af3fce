use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::super::domain::{ApplicationStatus, RequirementCategory};
use super::config::EvaluationConfig;
use super::LoanMetrics;

/// Adjudication outcome for an evaluated application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EvaluationDecision {
    AdditionalInfoRequired {
        missing: Vec<RequirementCategory>,
    },
    ManualReview,
    Approved {
        credit_score: Decimal,
        debt_to_income: Decimal,
    },
    Rejected {
        reasons: Vec<RejectionReason>,
    },
}

impl EvaluationDecision {
    pub const fn status(&self) -> ApplicationStatus {
        match self {
            EvaluationDecision::AdditionalInfoRequired { .. } => {
                ApplicationStatus::RequiresAdditionalInfo
            }
            EvaluationDecision::ManualReview => ApplicationStatus::UnderReview,
            EvaluationDecision::Approved { .. } => ApplicationStatus::Approved,
            EvaluationDecision::Rejected { .. } => ApplicationStatus::Rejected,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            EvaluationDecision::AdditionalInfoRequired { .. } => {
                "Additional information required".to_string()
            }
            EvaluationDecision::ManualReview => {
                "All documents received - under manual review for missing financial data"
                    .to_string()
            }
            EvaluationDecision::Approved {
                credit_score,
                debt_to_income,
            } => format!(
                "Approved - credit score {credit_score}, debt-to-income ratio {}%",
                percent(*debt_to_income)
            ),
            EvaluationDecision::Rejected { reasons } => {
                let details: Vec<String> = reasons.iter().map(RejectionReason::summary).collect();
                format!("Rejected - {}", details.join("; "))
            }
        }
    }
}

/// Criteria an otherwise fully documented application can fail on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectionReason {
    CreditScoreBelowMinimum { actual: Decimal, minimum: u16 },
    DebtToIncomeAboveMaximum { actual: Decimal, maximum: Decimal },
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::CreditScoreBelowMinimum { actual, minimum } => {
                format!("credit score {actual} < {minimum}")
            }
            RejectionReason::DebtToIncomeAboveMaximum { actual, maximum } => format!(
                "debt-to-income ratio {}% exceeds {}%",
                percent(*actual),
                percent(*maximum)
            ),
        }
    }
}

pub(crate) fn decide(
    credit_score: Decimal,
    metrics: &LoanMetrics,
    config: &EvaluationConfig,
) -> EvaluationDecision {
    let mut reasons = Vec::new();

    if credit_score < Decimal::from(config.minimum_credit_score) {
        reasons.push(RejectionReason::CreditScoreBelowMinimum {
            actual: credit_score,
            minimum: config.minimum_credit_score,
        });
    }
    if metrics.debt_to_income > config.maximum_debt_to_income {
        reasons.push(RejectionReason::DebtToIncomeAboveMaximum {
            actual: metrics.debt_to_income,
            maximum: config.maximum_debt_to_income,
        });
    }

    if reasons.is_empty() {
        EvaluationDecision::Approved {
            credit_score,
            debt_to_income: metrics.debt_to_income,
        }
    } else {
        EvaluationDecision::Rejected { reasons }
    }
}

fn percent(ratio: Decimal) -> Decimal {
    (ratio * Decimal::ONE_HUNDRED).round_dp(2).normalize()
}
