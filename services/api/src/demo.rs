use crate::infra::{InMemoryLeadRepository, LoggingCrmNotifier};
use clap::Args;
use mortgage_intake::config::WizardConfig;
use mortgage_intake::error::AppError;
use mortgage_intake::workflows::intake::{
    affordability, CreditHistory, CreditScoreBracket, CurrentMortgages, EmploymentStatus,
    FormData, FormDataPatch, FormSession, InMemoryProgressStore, LoanAmountBracket, LoanPurpose,
    PropertyType, PropertyUsage, PropertyValueBracket, Province,
};
use mortgage_intake::workflows::leads::{
    calculate_lead_score, export_csv_to_path, generate_lead_summary, get_lead_routing,
    LeadIntakeService, LeadServiceError,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to an Answer Set saved as JSON (camelCase keys)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the score and routing as JSON instead of the CRM summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Write the scored demo leads to this CSV file
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
    /// Skip the step-by-step wizard walkthrough
    #[arg(long)]
    pub(crate) skip_wizard: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.input)?;
    let answers: FormData = serde_json::from_str(&raw)?;
    println!("{}", render_score(&answers, args.json)?);
    Ok(())
}

fn render_score(answers: &FormData, as_json: bool) -> Result<String, AppError> {
    let score = calculate_lead_score(answers);
    if as_json {
        let financial = &answers.financial_info;
        let payload = json!({
            "affordability": affordability(financial.annual_income, financial.monthly_debts),
            "routing": get_lead_routing(&score),
            "score": score,
        });
        return Ok(serde_json::to_string_pretty(&payload)?);
    }
    Ok(generate_lead_summary(answers, &score))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        export,
        skip_wizard,
    } = args;

    println!("Get Your Rate demo");
    if !skip_wizard {
        walk_wizard(&salaried_applicant());
    }

    let config = WizardConfig::default();
    let repository = Arc::new(InMemoryLeadRepository::default());
    let service = LeadIntakeService::new(repository.clone(), Arc::new(LoggingCrmNotifier), &config);

    println!("\nLead intake");
    for (label, answers) in [
        ("Salaried homeowner", salaried_applicant()),
        ("Self-employed investor", self_employed_applicant()),
        ("Incomplete contact", incomplete_applicant()),
    ] {
        match service.submit(answers) {
            Ok(record) => println!(
                "  {label}: {} | grade {} ({}/100) | approval {}% | {} -> {} | follow up {}",
                record.lead_id,
                record.score.grade,
                record.score.total_score,
                record.score.approval_probability,
                record.routing.team,
                record.routing.assign_to,
                record.score.follow_up_strategy.timeframe,
            ),
            Err(LeadServiceError::Validation(errors)) => {
                println!("  {label}: rejected");
                for (field, message) in &errors {
                    println!("    - {field}: {message}");
                }
            }
            Err(err) => return Err(err.into()),
        }
    }

    println!("\nFollow-up queue");
    for record in service.pending_follow_ups(10)? {
        println!(
            "  {} {} {} ({})",
            record.score.follow_up_strategy.priority,
            record.lead_id,
            record.answers.personal_info.first_name,
            record.score.priority.label()
        );
    }

    if let Some(path) = export {
        let records = repository
            .all()
            .map_err(|err| AppError::Lead(LeadServiceError::Repository(err)))?;
        let written = export_csv_to_path(&records, &path)?;
        println!("\nExported {written} lead(s) to {}", path.display());
    }

    Ok(())
}

fn walk_wizard(answers: &FormData) {
    let mut session = FormSession::new(InMemoryProgressStore::new());

    println!("\nWizard walkthrough");
    if !session.advance() {
        for (field, message) in session.errors() {
            println!("  step {} blocked on {field}: {message}", session.current_step());
        }
    }

    session.update_form_data(FormDataPatch {
        loan_details: Some(answers.loan_details.clone()),
        property_info: Some(answers.property_info.clone()),
        personal_info: Some(answers.personal_info.clone()),
        financial_info: Some(answers.financial_info.clone()),
        supplemental: Some(answers.supplemental.clone()),
        ..FormDataPatch::default()
    });

    for step in session.steps() {
        println!(
            "  [{}] {} (~{} min)",
            step.step_number, step.title, step.estimated_time
        );
        if !session.advance() {
            for (field, message) in session.errors() {
                println!("    blocked on {field}: {message}");
            }
            return;
        }
    }
    session.complete();
    println!("  Wizard complete");
}

fn salaried_applicant() -> FormData {
    let mut answers = FormData::default();
    let loan = &mut answers.loan_details;
    loan.is_homeowner = Some(true);
    loan.property_type = Some(PropertyType::SingleFamily);
    loan.property_usage = Some(PropertyUsage::PrimaryHome);
    loan.property_value = Some(PropertyValueBracket::From600kTo900k);
    loan.current_mortgages = Some(CurrentMortgages::PaidOff);
    loan.loan_amount = Some(LoanAmountBracket::From100kTo200k);
    loan.loan_purpose = Some(LoanPurpose::HomeImprovement);
    loan.credit_history = Some(CreditHistory::NoIssues);
    loan.credit_score = Some(CreditScoreBracket::Excellent);
    loan.province = Some(Province::Ontario);
    answers.personal_info.first_name = "Alex".to_string();
    answers.personal_info.last_name = "Martin".to_string();
    answers.personal_info.email = "alex.martin@example.com".to_string();
    answers.personal_info.phone = "(416) 555-0123".to_string();
    answers.supplemental.employer_name = Some("Northern Grid Co".to_string());
    answers
}

fn self_employed_applicant() -> FormData {
    let mut answers = salaried_applicant();
    answers.loan_details.property_usage = Some(PropertyUsage::RentalProperty);
    answers.loan_details.current_mortgages = Some(CurrentMortgages::OneMortgage);
    answers.loan_details.loan_purpose = Some(LoanPurpose::InvestmentPurposes);
    answers.loan_details.credit_score = Some(CreditScoreBracket::Good);
    answers.loan_details.province = Some(Province::NovaScotia);
    answers.financial_info.employment_status = Some(EmploymentStatus::SelfEmployed);
    answers.personal_info.first_name = "Robin".to_string();
    answers.personal_info.email = "robin@example.com".to_string();

    let supplemental = &mut answers.supplemental;
    supplemental.employer_name = None;
    supplemental.current_mortgage_balance = Some(310_000);
    supplemental.current_interest_rate = Some(4.79);
    supplemental.business_name = Some("Harbour Carpentry".to_string());
    supplemental.self_employment_years = Some(6);
    supplemental.business_income = Some(82_000);
    answers
}

fn incomplete_applicant() -> FormData {
    let mut answers = salaried_applicant();
    answers.personal_info.email = "alex.martin-at-example".to_string();
    answers.personal_info.phone.clear();
    answers
}
