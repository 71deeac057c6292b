use super::routing::get_lead_routing;
use super::scoring::LeadScore;
use crate::workflows::intake::{format_dollars, FormData};

const NOT_PROVIDED: &str = "Not provided";

fn or_missing<T>(value: Option<T>, render: impl FnOnce(T) -> &'static str) -> &'static str {
    value.map_or(NOT_PROVIDED, render)
}

/// Plain-text hand-off block for the CRM. Template only, no decisions.
pub fn generate_lead_summary(answers: &FormData, score: &LeadScore) -> String {
    let routing = get_lead_routing(score);
    let loan = &answers.loan_details;
    let personal = &answers.personal_info;
    let property = &answers.property_info;
    let financial = &answers.financial_info;

    let homeowner = match loan.is_homeowner {
        Some(true) => "Yes",
        Some(false) => "No",
        None => NOT_PROVIDED,
    };

    let recommendations = score
        .recommendations
        .iter()
        .map(|recommendation| format!("- {recommendation}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "LEAD SUMMARY - Grade {grade} ({total}/100)

CONTACT: {first} {last}
EMAIL: {email}
PHONE: {phone}

PROPERTY:
- Homeowner: {homeowner}
- Type: {property_type}
- Usage: {usage}
- Value Range: {value_range}
- Estimated Value: {value}
- Down Payment: {down} ({down_percent}%)
- Province: {province}

LOAN DETAILS:
- Amount Range: {amount_range}
- Purpose: {purpose}
- Current Mortgages: {mortgages}

FINANCIAL PROFILE:
- Annual Income: {income}
- Credit Score: {credit_score}
- Credit History: {credit_history}
- Employment: {employment}
- Monthly Debts: {debts}

SCORING:
- Approval Probability: {approval}%
- Priority: {priority}
- Follow-up: {follow_up}

ROUTING:
- Assign to: {assign_to}
- Team: {team}

RECOMMENDATIONS:
{recommendations}",
        grade = score.grade,
        total = score.total_score,
        first = personal.first_name,
        last = personal.last_name,
        email = personal.email,
        phone = personal.phone,
        property_type = or_missing(loan.property_type, |v| v.as_str()),
        usage = or_missing(loan.property_usage, |v| v.as_str()),
        value_range = or_missing(loan.property_value, |v| v.as_str()),
        value = format_dollars(property.property_value),
        down = format_dollars(property.down_payment),
        down_percent = answers.down_payment_percent().round(),
        province = or_missing(loan.province, |v| v.label()),
        amount_range = or_missing(loan.loan_amount, |v| v.as_str()),
        purpose = or_missing(loan.loan_purpose, |v| v.as_str()),
        mortgages = or_missing(loan.current_mortgages, |v| v.as_str()),
        income = format_dollars(financial.annual_income),
        credit_score = or_missing(loan.credit_score, |v| v.as_str()),
        credit_history = or_missing(loan.credit_history, |v| v.as_str()),
        employment = or_missing(financial.employment_status, |v| v.as_str()),
        debts = format_dollars(financial.monthly_debts),
        approval = score.approval_probability,
        priority = score.priority.label(),
        follow_up = score.follow_up_strategy.timeframe,
        assign_to = routing.assign_to,
        team = routing.team,
    )
    .trim_end()
    .to_string()
}
