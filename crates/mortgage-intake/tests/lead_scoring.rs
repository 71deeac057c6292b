//! Scoring, routing and summary scenarios driven through the crate's public API.

use mortgage_intake::workflows::intake::{
    calculate_estimated_time, get_form_steps, get_smart_field_value, is_field_required,
    should_show_field, validate_form_step, CreditHistory, CreditScoreBracket, CurrentMortgages,
    EmploymentStatus, FieldValue, FormData, FormField, LoanAmountBracket, LoanPurpose,
    PropertyType, PropertyUsage, PropertyValueBracket, Province, StepPosition,
};
use mortgage_intake::workflows::leads::{
    calculate_lead_score, generate_lead_summary, get_lead_routing, Grade, Priority, RoutingTier,
};

fn homeowner_answers() -> FormData {
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
    answers.personal_info.first_name = "Priya".to_string();
    answers.personal_info.last_name = "Nair".to_string();
    answers.personal_info.email = "priya.nair@example.com".to_string();
    answers.personal_info.phone = "+1 647 555 0100".to_string();
    answers.supplemental.employer_name = Some("Lakeshore Health".to_string());
    answers
}

#[test]
fn strong_homeowner_is_routed_to_senior_officer() {
    let answers = homeowner_answers();
    let score = calculate_lead_score(&answers);
    let routing = get_lead_routing(&score);

    assert_eq!(score.total_score, 94);
    assert_eq!(score.grade, Grade::A);
    assert_eq!(routing.assign_to, "Senior Loan Officer");
    assert_eq!(routing.tier, RoutingTier::HighValue);
}

#[test]
fn two_mortgages_and_fair_credit_drop_to_standard_team() {
    let mut answers = homeowner_answers();
    answers.loan_details.current_mortgages = Some(CurrentMortgages::TwoMortgages);
    answers.loan_details.credit_score = Some(CreditScoreBracket::Fair);
    answers.loan_details.credit_history = Some(CreditHistory::ConsumerProposal);

    let score = calculate_lead_score(&answers);
    // 50*25 + 75*25 + 80*20 + 80*20 + 100*10 = 7325
    assert_eq!(score.quality_factors.loan_viability, 80);
    assert_eq!(score.quality_factors.financial_stability, 75);
    assert_eq!(score.total_score, 73);
    assert_eq!(score.grade, Grade::B);
    assert_eq!(score.priority, Priority::Medium);

    answers.financial_info.employment_status = Some(EmploymentStatus::Unemployed);
    let score = calculate_lead_score(&answers);
    assert_eq!(score.total_score, 67);
    assert_eq!(get_lead_routing(&score).tier, RoutingTier::Standard);
}

#[test]
fn low_down_payment_is_flagged_for_insurance_discussion() {
    let mut answers = homeowner_answers();
    answers.property_info.property_value = 400_000;
    answers.property_info.down_payment = 20_000;

    let score = calculate_lead_score(&answers);
    assert!(score
        .recommendations
        .iter()
        .any(|note| note == "Discuss mortgage insurance options"));
}

#[test]
fn summary_renders_every_section_and_missing_answers() {
    let mut answers = homeowner_answers();
    answers.loan_details.province = None;
    let score = calculate_lead_score(&answers);
    let summary = generate_lead_summary(&answers, &score);

    for heading in [
        "CONTACT: Priya Nair",
        "PROPERTY:",
        "LOAN DETAILS:",
        "FINANCIAL PROFILE:",
        "SCORING:",
        "ROUTING:",
        "RECOMMENDATIONS:",
    ] {
        assert!(summary.contains(heading), "summary missing {heading}");
    }
    assert!(summary.contains("- Province: Not provided"));
    assert!(summary.contains("- Estimated Value: $750,000"));
}

#[test]
fn self_employment_unlocks_business_fields() {
    let mut answers = homeowner_answers();
    assert!(!should_show_field(FormField::BusinessIncome, &answers));
    assert!(is_field_required(FormField::EmployerName, &answers));

    answers.financial_info.employment_status = Some(EmploymentStatus::SelfEmployed);
    answers.financial_info.annual_income = 90_000;
    assert!(should_show_field(FormField::BusinessIncome, &answers));
    assert!(is_field_required(FormField::SelfEmploymentYears, &answers));
    assert!(!is_field_required(FormField::EmployerName, &answers));
    assert_eq!(
        get_smart_field_value(FormField::BusinessIncome, &answers),
        Some(FieldValue::Amount(72_000))
    );

    let steps = get_form_steps(&answers);
    assert!(steps
        .iter()
        .any(|step| step.step_number.tenths() == 95));
    assert_eq!(calculate_estimated_time(&answers), 17);

    let errors = validate_form_step(&answers, StepPosition::base(9));
    assert!(errors.is_empty(), "credit step should pass: {errors:?}");
}

#[test]
fn base_flow_takes_fourteen_minutes() {
    assert_eq!(get_form_steps(&FormData::default()).len(), 11);
    assert_eq!(calculate_estimated_time(&FormData::default()), 14);
}
