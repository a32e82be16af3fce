use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Underwriting thresholds and loan terms applied during evaluation.
///
/// Threshold comparisons are inclusive at the boundary: a credit score equal
/// to the minimum passes, as does a debt-to-income ratio equal to the
/// maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub minimum_credit_score: u16,
    pub maximum_debt_to_income: Decimal,
    pub annual_interest_rate: Decimal,
    pub term_months: u32,
}
