use crate::workflows::intake::{
    CreditHistory, CreditScoreBracket, CurrentMortgages, EmploymentStatus, FormData,
    LoanAmountBracket, LoanPurpose, PropertyUsage, PropertyValueBracket,
};

use super::{QualityFactor, QualityFactors, ScoreComponent};

pub(crate) fn score_factors(answers: &FormData) -> (QualityFactors, Vec<ScoreComponent>) {
    let mut components = Vec::new();

    let factors = QualityFactors {
        creditworthiness: creditworthiness(answers, &mut components),
        financial_stability: financial_stability(answers, &mut components),
        urgency: urgency(answers, &mut components),
        loan_viability: loan_viability(answers, &mut components),
        contactability: contactability(answers, &mut components),
    };

    (factors, components)
}

fn push(
    components: &mut Vec<ScoreComponent>,
    factor: QualityFactor,
    score: u8,
    notes: impl Into<String>,
) -> u8 {
    components.push(ScoreComponent {
        factor,
        score,
        notes: notes.into(),
    });
    score
}

fn sub_total(parts: &[u8]) -> u8 {
    parts.iter().map(|part| u16::from(*part)).sum::<u16>().min(100) as u8
}

fn creditworthiness(answers: &FormData, components: &mut Vec<ScoreComponent>) -> u8 {
    let (score, notes) = match answers.loan_details.credit_score {
        Some(CreditScoreBracket::Excellent) => (100, "credit score 780 or higher"),
        Some(CreditScoreBracket::VeryGood) => (85, "credit score 720-779"),
        Some(CreditScoreBracket::Good) => (70, "credit score 660-719"),
        Some(CreditScoreBracket::Fair) => (50, "credit score 600-659"),
        Some(CreditScoreBracket::NeedsWork) => (25, "credit score below 600"),
        None => (60, "credit score not provided"),
    };
    push(components, QualityFactor::Creditworthiness, score, notes)
}

fn financial_stability(answers: &FormData, components: &mut Vec<ScoreComponent>) -> u8 {
    let factor = QualityFactor::FinancialStability;
    let income = answers.financial_info.annual_income;

    let income_points = match income {
        150_000.. => 40,
        100_000..=149_999 => 35,
        75_000..=99_999 => 30,
        50_000..=74_999 => 20,
        _ => 10,
    };
    let income_points = push(
        components,
        factor,
        income_points,
        format!("annual income ${income}"),
    );

    let (employment_points, employment_notes) = match answers.financial_info.employment_status {
        Some(EmploymentStatus::Employed) => (30, "employed"),
        Some(EmploymentStatus::Retired) => (25, "retired"),
        Some(EmploymentStatus::SelfEmployed) => (20, "self-employed"),
        Some(EmploymentStatus::Unemployed) => (5, "unemployed"),
        None => (5, "employment not provided"),
    };
    let employment_points = push(components, factor, employment_points, employment_notes);

    let (history_points, history_notes) = match answers.loan_details.credit_history {
        Some(CreditHistory::NoIssues) => (30, "no past credit events"),
        Some(CreditHistory::ConsumerProposal) => (15, "consumer proposal on file"),
        Some(CreditHistory::Foreclosure) => (10, "foreclosure on file"),
        Some(CreditHistory::Bankruptcy) => (5, "bankruptcy on file"),
        None => (15, "credit history not provided"),
    };
    let history_points = push(components, factor, history_points, history_notes);

    sub_total(&[income_points, employment_points, history_points])
}

fn urgency(answers: &FormData, components: &mut Vec<ScoreComponent>) -> u8 {
    let factor = QualityFactor::Urgency;
    let base = push(components, factor, 50, "baseline");

    let purpose = match answers.loan_details.loan_purpose {
        Some(purpose @ LoanPurpose::DebtConsolidation) => Some((purpose, 25)),
        Some(purpose @ LoanPurpose::InvestmentPurposes) => Some((purpose, 20)),
        Some(purpose @ LoanPurpose::HomeImprovement) => Some((purpose, 15)),
        Some(purpose @ LoanPurpose::RetirementIncome) => Some((purpose, 10)),
        None => None,
    };
    let purpose_points = purpose.map_or(0, |(purpose, points)| {
        push(
            components,
            factor,
            points,
            format!("loan purpose {}", purpose.as_str()),
        )
    });

    let usage = match answers.loan_details.property_usage {
        Some(usage @ PropertyUsage::PrimaryHome) => Some((usage, 15)),
        Some(usage @ PropertyUsage::SecondHome) => Some((usage, 10)),
        Some(usage @ PropertyUsage::RentalProperty) => Some((usage, 5)),
        None => None,
    };
    let usage_points = usage.map_or(0, |(usage, points)| {
        push(
            components,
            factor,
            points,
            format!("property used as {}", usage.as_str()),
        )
    });

    sub_total(&[base, purpose_points, usage_points])
}

fn loan_viability(answers: &FormData, components: &mut Vec<ScoreComponent>) -> u8 {
    let factor = QualityFactor::LoanViability;
    let loan = &answers.loan_details;

    let value_points = match loan.property_value {
        Some(PropertyValueBracket::Below300k) => 25,
        Some(PropertyValueBracket::From300kTo600k) => 35,
        Some(PropertyValueBracket::From600kTo900k) => 40,
        Some(PropertyValueBracket::From900kTo1200k) => 40,
        Some(PropertyValueBracket::From1200kTo1500k) => 35,
        Some(PropertyValueBracket::From1500kTo2000k) => 30,
        Some(PropertyValueBracket::Above2000k) => 25,
        None => 20,
    };
    let value_points = push(
        components,
        factor,
        value_points,
        loan.property_value.map_or_else(
            || "property value not provided".to_string(),
            |bracket| format!("property value {}", bracket.as_str()),
        ),
    );

    let amount_points = match loan.loan_amount {
        Some(LoanAmountBracket::Below25k) => 15,
        Some(LoanAmountBracket::From25kTo50k) => 20,
        Some(LoanAmountBracket::From50kTo75k) => 25,
        Some(LoanAmountBracket::From75kTo100k) => 30,
        Some(LoanAmountBracket::From100kTo200k) => 30,
        Some(LoanAmountBracket::Above200k) => 25,
        None => 15,
    };
    let amount_points = push(
        components,
        factor,
        amount_points,
        loan.loan_amount.map_or_else(
            || "loan amount not provided".to_string(),
            |bracket| format!("loan amount {}", bracket.as_str()),
        ),
    );

    let (mortgage_points, mortgage_notes) = match loan.current_mortgages {
        Some(CurrentMortgages::PaidOff) => (30, "property paid off"),
        Some(CurrentMortgages::OneMortgage) => (20, "one existing mortgage"),
        Some(CurrentMortgages::TwoMortgages) => (10, "two existing mortgages"),
        None => (15, "mortgage status not provided"),
    };
    let mortgage_points = push(components, factor, mortgage_points, mortgage_notes);

    sub_total(&[value_points, amount_points, mortgage_points])
}

fn contactability(answers: &FormData, components: &mut Vec<ScoreComponent>) -> u8 {
    let factor = QualityFactor::Contactability;
    let personal = &answers.personal_info;

    let email_points = if personal.email.contains('@') {
        push(components, factor, 50, "email provided")
    } else {
        push(components, factor, 0, "no usable email")
    };

    let digits = personal.phone.chars().filter(char::is_ascii_digit).count();
    let phone_points = if digits >= 10 {
        push(components, factor, 50, "phone provided")
    } else {
        push(components, factor, 0, "no usable phone")
    };

    sub_total(&[email_points, phone_points])
}
