use std::collections::BTreeMap;
use std::sync::Arc;

use clap::Args;
use rust_decimal::Decimal;

use mortgage_approver::error::AppError;
use mortgage_approver::workflows::mortgage::{
    ApplicationRepository, ApplicationStatusView, FieldValue, MortgageApplicationService,
};

use crate::infra::{default_evaluation_config, InMemoryApplicationRepository};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Applicant identifier used for the scripted application
    #[arg(long, default_value = "demo-applicant")]
    pub(crate) applicant: String,
    /// Annual income supplied in the second merge
    #[arg(long, default_value_t = 90_000)]
    pub(crate) income: i64,
    /// Credit score supplied in the first merge
    #[arg(long, default_value_t = 700)]
    pub(crate) credit_score: i64,
    /// Appraised property value supplied in the final merge
    #[arg(long, default_value_t = 300_000)]
    pub(crate) property_value: i64,
    /// Requested loan principal supplied in the final merge
    #[arg(long, default_value_t = 240_000)]
    pub(crate) loan_amount: i64,
}

fn number(value: i64) -> FieldValue {
    FieldValue::Number(Decimal::from(value))
}

fn print_view(view: &ApplicationStatusView) {
    println!("- {} -> status {}", view.application_id, view.status);
    println!("  Reason: {}", view.status_reason);
    if !view.missing_requirements.is_empty() {
        println!("  Still missing: {}", view.missing_requirements.join(", "));
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        applicant,
        income,
        credit_score,
        property_value,
        loan_amount,
    } = args;

    println!("Mortgage approval demo");

    let repository = Arc::new(InMemoryApplicationRepository::default());
    let service = Arc::new(MortgageApplicationService::new(
        repository.clone(),
        default_evaluation_config(),
    ));

    let record = match service.create(&applicant) {
        Ok(record) => record,
        Err(err) => {
            println!("  Intake refused: {err}");
            return Ok(());
        }
    };
    println!("\nApplication opened");
    print_view(&record.status_view());

    let mut first_wave = BTreeMap::new();
    first_wave.insert("income_annual".to_string(), number(income));
    first_wave.insert("credit_score".to_string(), number(credit_score));

    println!("\nIncome and credit documentation arrives");
    let record = match service.merge_fields(&record.id, first_wave) {
        Ok(record) => record,
        Err(err) => {
            println!("  Merge failed: {err}");
            return Ok(());
        }
    };
    print_view(&record.status_view());

    let mut second_wave = BTreeMap::new();
    second_wave.insert(
        "employment_employer".to_string(),
        FieldValue::Text("Contoso Manufacturing".to_string()),
    );
    second_wave.insert("property_value".to_string(), number(property_value));
    second_wave.insert("property_loan_amount".to_string(), number(loan_amount));

    println!("\nEmployment and property documentation arrives");
    let record = match service.merge_fields(&record.id, second_wave) {
        Ok(record) => record,
        Err(err) => {
            println!("  Merge failed: {err}");
            return Ok(());
        }
    };
    print_view(&record.status_view());

    match repository.pending(10) {
        Ok(queue) => println!("\nApplications awaiting manual review: {}", queue.len()),
        Err(err) => println!("\nRepository unavailable: {err}"),
    }

    Ok(())
}
