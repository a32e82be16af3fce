use rust_decimal::Decimal;

use super::super::domain::{FinancialProfile, RequirementCategory};
use super::config::EvaluationConfig;
use super::LoanMetrics;

/// Financial figures extracted from a documented application. `None` means
/// the figure was absent, non-numeric, or not positive.
pub(crate) struct FinancialSignals {
    pub annual_income: Option<Decimal>,
    pub credit_score: Option<Decimal>,
    pub loan_amount: Option<Decimal>,
}

/// Categories without a single satisfying field, in fixed reporting order.
pub(crate) fn missing_categories(profile: &FinancialProfile) -> Vec<RequirementCategory> {
    RequirementCategory::ALL
        .iter()
        .copied()
        .filter(|category| !profile.satisfies(*category))
        .collect()
}

pub(crate) fn financial_signals(profile: &FinancialProfile) -> FinancialSignals {
    FinancialSignals {
        annual_income: profile
            .income
            .as_ref()
            .and_then(|income| income.annual_income),
        credit_score: profile.credit.as_ref().and_then(|credit| credit.score),
        loan_amount: profile
            .property
            .as_ref()
            .and_then(|property| property.loan_amount),
    }
}

pub(crate) fn loan_metrics(
    annual_income: Decimal,
    loan_amount: Decimal,
    config: &EvaluationConfig,
) -> LoanMetrics {
    let monthly_income = annual_income / Decimal::from(12);
    let monthly_payment = monthly_payment(
        loan_amount,
        config.annual_interest_rate,
        config.term_months,
    );

    LoanMetrics {
        monthly_income,
        monthly_payment,
        debt_to_income: monthly_payment / monthly_income,
    }
}

/// Standard fixed-rate amortized payment, M = P*r*(1+r)^n / ((1+r)^n - 1)
/// with r the monthly rate. A zero-rate note divides the principal evenly.
pub(crate) fn monthly_payment(
    principal: Decimal,
    annual_rate: Decimal,
    term_months: u32,
) -> Decimal {
    if annual_rate.is_zero() {
        return principal / Decimal::from(term_months);
    }

    let monthly_rate = annual_rate / Decimal::from(12);
    let factor = compound_factor(Decimal::ONE + monthly_rate, term_months);
    principal * monthly_rate * factor / (factor - Decimal::ONE)
}

fn compound_factor(base: Decimal, exponent: u32) -> Decimal {
    let mut factor = Decimal::ONE;
    for _ in 0..exponent {
        factor *= base;
    }
    factor
}
