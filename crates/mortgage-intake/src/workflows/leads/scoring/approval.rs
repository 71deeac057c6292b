use crate::workflows::intake::{CreditScoreBracket, EmploymentStatus, FormData, PropertyType};

/// Independent additive estimate of lender approval odds, in percent.
///
/// This is not a rescaling of the composite score: it starts at 50 and moves
/// on credit, the loan-to-income multiple, down payment, employment and
/// property type.
pub(crate) fn approval_probability(answers: &FormData) -> u8 {
    let mut probability: i32 = 50;

    probability += match answers.loan_details.credit_score {
        Some(CreditScoreBracket::Excellent) => 30,
        Some(CreditScoreBracket::VeryGood) => 20,
        Some(CreditScoreBracket::Good) => 10,
        Some(CreditScoreBracket::Fair) => -10,
        Some(CreditScoreBracket::NeedsWork) => -25,
        None => 0,
    };

    probability += match income_multiple(answers) {
        Some(multiple) if multiple <= 3.0 => 15,
        Some(multiple) if multiple <= 4.0 => 10,
        Some(multiple) if multiple <= 5.0 => 0,
        _ => -15,
    };

    let down_payment = answers.down_payment_percent();
    probability += if down_payment >= 25.0 {
        15
    } else if down_payment >= 20.0 {
        10
    } else if down_payment >= 15.0 {
        5
    } else if down_payment < 5.0 {
        -20
    } else {
        0
    };

    probability += match answers.financial_info.employment_status {
        Some(EmploymentStatus::Employed) => 10,
        Some(EmploymentStatus::Unemployed) => -30,
        Some(EmploymentStatus::SelfEmployed | EmploymentStatus::Retired) | None => -5,
    };

    probability += match answers.loan_details.property_type {
        Some(PropertyType::SingleFamily) => 5,
        Some(PropertyType::Townhouse) => 3,
        Some(PropertyType::MultiFamily) => -5,
        Some(PropertyType::Condo) | None => 0,
    };

    probability.clamp(0, 100) as u8
}

/// Requested amount over annual income; `None` when there is no income to divide by.
fn income_multiple(answers: &FormData) -> Option<f64> {
    let income = answers.financial_info.annual_income;
    if income == 0 {
        return None;
    }
    let requested = match answers.loan_details.loan_amount {
        Some(bracket) => bracket.representative_amount(),
        None => answers
            .property_info
            .property_value
            .saturating_sub(answers.property_info.down_payment),
    };
    Some(f64::from(requested) / f64::from(income))
}
