use serde::{Deserialize, Serialize};

use super::domain::{
    CreditScoreBracket, CurrentMortgages, EmploymentStatus, FormData, LoanPurpose, PropertyType,
};

/// Every named input the wizard can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    IsHomeowner,
    PropertyType,
    RentalIncome,
    PropertyUsage,
    PropertyValue,
    PurchasePrice,
    DownPayment,
    FirstTimeHomeBuyer,
    FirstTimeBuyerPrograms,
    LiquidAssets,
    CurrentMortgages,
    CurrentMortgageBalance,
    CurrentInterestRate,
    SecondMortgageBalance,
    MonthlyPayment,
    LoanAmount,
    LoanPurpose,
    HasCoApplicant,
    PreApprovalNeeded,
    CoApplicantName,
    CoApplicantIncome,
    CoApplicantEmployment,
    CreditHistory,
    CreditScore,
    EmploymentStatus,
    EmployerName,
    AnnualIncome,
    MonthlyDebts,
    BusinessName,
    BusinessType,
    SelfEmploymentYears,
    BusinessIncome,
    Province,
    FirstName,
    LastName,
    Email,
    Phone,
}

impl FormField {
    /// Key used in validation error maps and on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            FormField::IsHomeowner => "isHomeowner",
            FormField::PropertyType => "propertyType",
            FormField::RentalIncome => "rentalIncome",
            FormField::PropertyUsage => "propertyUsage",
            FormField::PropertyValue => "propertyValue",
            FormField::PurchasePrice => "purchasePrice",
            FormField::DownPayment => "downPayment",
            FormField::FirstTimeHomeBuyer => "firstTimeHomeBuyer",
            FormField::FirstTimeBuyerPrograms => "firstTimeBuyerPrograms",
            FormField::LiquidAssets => "liquidAssets",
            FormField::CurrentMortgages => "currentMortgages",
            FormField::CurrentMortgageBalance => "currentMortgageBalance",
            FormField::CurrentInterestRate => "currentInterestRate",
            FormField::SecondMortgageBalance => "secondMortgageBalance",
            FormField::MonthlyPayment => "monthlyPayment",
            FormField::LoanAmount => "loanAmount",
            FormField::LoanPurpose => "loanPurpose",
            FormField::HasCoApplicant => "hasCoApplicant",
            FormField::PreApprovalNeeded => "preApprovalNeeded",
            FormField::CoApplicantName => "coApplicantName",
            FormField::CoApplicantIncome => "coApplicantIncome",
            FormField::CoApplicantEmployment => "coApplicantEmployment",
            FormField::CreditHistory => "creditHistory",
            FormField::CreditScore => "creditScore",
            FormField::EmploymentStatus => "employmentStatus",
            FormField::EmployerName => "employerName",
            FormField::AnnualIncome => "annualIncome",
            FormField::MonthlyDebts => "monthlyDebts",
            FormField::BusinessName => "businessName",
            FormField::BusinessType => "businessType",
            FormField::SelfEmploymentYears => "selfEmploymentYears",
            FormField::BusinessIncome => "businessIncome",
            FormField::Province => "province",
            FormField::FirstName => "firstName",
            FormField::LastName => "lastName",
            FormField::Email => "email",
            FormField::Phone => "phone",
        }
    }

    /// The visibility/requiredness rule for this field, if it has one.
    pub const fn conditional(self) -> Option<ConditionalField> {
        let (show, required, help) = match self {
            FormField::RentalIncome => (
                Condition::MultiFamily,
                Some(Condition::MultiFamily),
                "Monthly rental income from additional units",
            ),
            FormField::CurrentMortgageBalance => (
                Condition::ExistingMortgage,
                Some(Condition::ExistingMortgage),
                "Remaining balance on your current mortgage",
            ),
            FormField::CurrentInterestRate => (
                Condition::ExistingMortgage,
                Some(Condition::ExistingMortgage),
                "Current mortgage interest rate (%)",
            ),
            FormField::SecondMortgageBalance => (
                Condition::TwoMortgages,
                Some(Condition::TwoMortgages),
                "Balance on your second mortgage",
            ),
            FormField::EmployerName => (
                Condition::Employed,
                Some(Condition::Employed),
                "Name of your current employer",
            ),
            FormField::SelfEmploymentYears => (
                Condition::SelfEmployed,
                Some(Condition::SelfEmployed),
                "How many years have you been self-employed?",
            ),
            FormField::BusinessIncome => (
                Condition::SelfEmployed,
                Some(Condition::SelfEmployed),
                "Average annual business income (last 2 years)",
            ),
            FormField::FirstTimeBuyerPrograms => (
                Condition::FirstTimeBuyer,
                None,
                "You may qualify for first-time buyer programs and incentives",
            ),
            FormField::HasCoApplicant => (
                Condition::JointPurpose,
                None,
                "Will someone else be on the mortgage application?",
            ),
            FormField::CoApplicantIncome => (
                Condition::CoApplicant,
                Some(Condition::CoApplicant),
                "Co-applicant annual income",
            ),
            FormField::LiquidAssets => (
                Condition::HighValueProperty,
                None,
                "Total liquid assets (savings, investments, etc.)",
            ),
            FormField::PreApprovalNeeded => (
                Condition::PreApprovalPurpose,
                None,
                "Pre-approval recommended for your loan purpose",
            ),
            _ => return None,
        };

        Some(ConditionalField {
            field: self,
            show_when: show,
            required_when: required,
            help_text: help,
        })
    }
}

/// Predicates over answers collected on earlier steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    MultiFamily,
    ExistingMortgage,
    TwoMortgages,
    Employed,
    SelfEmployed,
    FirstTimeBuyer,
    JointPurpose,
    CoApplicant,
    HighValueProperty,
    PreApprovalPurpose,
}

impl Condition {
    pub fn holds(self, answers: &FormData) -> bool {
        let loan = &answers.loan_details;
        match self {
            Condition::MultiFamily => loan.property_type == Some(PropertyType::MultiFamily),
            Condition::ExistingMortgage => answers.has_existing_mortgage(),
            Condition::TwoMortgages => loan.current_mortgages == Some(CurrentMortgages::TwoMortgages),
            Condition::Employed => {
                answers.financial_info.employment_status == Some(EmploymentStatus::Employed)
            }
            Condition::SelfEmployed => answers.is_self_employed(),
            Condition::FirstTimeBuyer => answers.property_info.first_time_home_buyer,
            Condition::JointPurpose => matches!(
                loan.loan_purpose,
                Some(LoanPurpose::HomeImprovement | LoanPurpose::InvestmentPurposes)
            ),
            Condition::CoApplicant => answers.has_co_applicant(),
            Condition::HighValueProperty => answers.property_info.property_value > 1_000_000,
            Condition::PreApprovalPurpose => matches!(
                loan.loan_purpose,
                Some(LoanPurpose::HomeImprovement | LoanPurpose::DebtConsolidation)
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionalField {
    pub field: FormField,
    pub show_when: Condition,
    pub required_when: Option<Condition>,
    pub help_text: &'static str,
}

/// Fields without a rule are always shown.
pub fn should_show_field(field: FormField, answers: &FormData) -> bool {
    field
        .conditional()
        .map_or(true, |rule| rule.show_when.holds(answers))
}

/// Fields without a rule are optional.
pub fn is_field_required(field: FormField, answers: &FormData) -> bool {
    field
        .conditional()
        .and_then(|rule| rule.required_when)
        .map_or(false, |condition| condition.holds(answers))
}

pub fn field_help_text(field: FormField) -> Option<&'static str> {
    field.conditional().map(|rule| rule.help_text)
}

/// Advisory notes shown beside the form; they never block progress.
pub fn get_dynamic_suggestions(answers: &FormData) -> Vec<String> {
    let loan = &answers.loan_details;
    let mut suggestions = Vec::new();

    if answers.property_info.property_value > 0 && answers.down_payment_percent() < 20.0 {
        suggestions
            .push("Consider saving for a 20% down payment to avoid mortgage insurance".to_string());
    }

    match loan.loan_purpose {
        Some(LoanPurpose::HomeImprovement) => suggestions
            .push("Home improvement loans may have different requirements and rates".to_string()),
        Some(LoanPurpose::DebtConsolidation) => suggestions.push(
            "Debt consolidation can help simplify your finances and potentially reduce payments"
                .to_string(),
        ),
        _ => {}
    }

    if loan
        .credit_score
        .is_some_and(CreditScoreBracket::needs_improvement)
    {
        suggestions
            .push("Improving your credit score could help you qualify for better rates".to_string());
    }

    if loan.credit_history.is_some_and(|history| !history.is_clean()) {
        suggestions.push(
            "Past credit issues may affect rates - we can help find suitable lenders".to_string(),
        );
    }

    if loan.property_type == Some(PropertyType::MultiFamily) {
        suggestions
            .push("Multi-family properties may qualify for rental income consideration".to_string());
    }

    if answers.property_info.first_time_home_buyer {
        suggestions
            .push("You may qualify for first-time buyer programs and incentives".to_string());
    }

    suggestions
}

/// A pre-filled value offered for a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Amount(u32),
    Rate(f64),
    Years(u8),
    Flag(bool),
}

const ASSUMED_RATE: f64 = 0.0589;
const ASSUMED_TERM_YEARS: i32 = 25;

/// Best-effort default for derived fields, falling back to the static default table.
pub fn get_smart_field_value(field: FormField, answers: &FormData) -> Option<FieldValue> {
    match field {
        FormField::MonthlyPayment if answers.has_existing_mortgage() => {
            let principal = f64::from(answers.property_info.property_value) * 0.7;
            Some(FieldValue::Amount(amortized_payment(principal).round() as u32))
        }
        FormField::BusinessIncome if answers.is_self_employed() => {
            let income = answers.financial_info.annual_income;
            (income > 0).then(|| FieldValue::Amount((f64::from(income) * 0.8).round() as u32))
        }
        FormField::CoApplicantIncome => {
            // Income needed to carry the property at a 39% gross debt service ratio.
            let needed = f64::from(answers.property_info.property_value) * 0.39;
            let gap = needed - f64::from(answers.financial_info.annual_income);
            Some(FieldValue::Amount(gap.max(0.0).round() as u32))
        }
        _ => static_default(field),
    }
}

fn amortized_payment(principal: f64) -> f64 {
    let monthly_rate = ASSUMED_RATE / 12.0;
    let payments = ASSUMED_TERM_YEARS * 12;
    principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powi(-payments))
}

/// Stress-test qualifying rate used for affordability.
pub const QUALIFYING_RATE: f64 = 0.0525;
/// Gross debt service ceiling as a share of gross income.
pub const GDS_RATIO: f64 = 0.39;

/// What an income can carry at the qualifying rate over a 25-year amortization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityEstimate {
    pub max_monthly_payment: u32,
    pub max_mortgage_amount: u32,
    pub recommended_down_payment: u32,
    pub max_home_price: u32,
}

pub fn affordability(annual_income: u32, monthly_debts: u32) -> AffordabilityEstimate {
    affordability_at(annual_income, monthly_debts, QUALIFYING_RATE)
}

/// Debts above the GDS ceiling leave nothing to borrow; a zero rate amortizes linearly.
pub fn affordability_at(
    annual_income: u32,
    monthly_debts: u32,
    rate: f64,
) -> AffordabilityEstimate {
    let allowance = f64::from(annual_income) * GDS_RATIO / 12.0;
    let payment = (allowance - f64::from(monthly_debts)).max(0.0);
    let payments = ASSUMED_TERM_YEARS * 12;
    let monthly_rate = rate / 12.0;
    let mortgage = if monthly_rate > 0.0 {
        payment * (1.0 - (1.0 + monthly_rate).powi(-payments)) / monthly_rate
    } else {
        payment * f64::from(payments)
    };

    AffordabilityEstimate {
        max_monthly_payment: payment.round() as u32,
        max_mortgage_amount: mortgage.round() as u32,
        recommended_down_payment: (mortgage * 0.2).round() as u32,
        max_home_price: (mortgage * 1.2).round() as u32,
    }
}

fn static_default(field: FormField) -> Option<FieldValue> {
    match field {
        FormField::RentalIncome
        | FormField::CurrentMortgageBalance
        | FormField::SecondMortgageBalance
        | FormField::BusinessIncome
        | FormField::CoApplicantIncome => Some(FieldValue::Amount(0)),
        FormField::CurrentInterestRate => Some(FieldValue::Rate(5.5)),
        FormField::SelfEmploymentYears => Some(FieldValue::Years(2)),
        FormField::PreApprovalNeeded => Some(FieldValue::Flag(true)),
        _ => None,
    }
}

/// Inclusive numeric limits that depend on other answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ValidationRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Tiered minimum down payment for a purchase price.
pub fn minimum_down_payment(property_value: u32) -> f64 {
    let value = f64::from(property_value);
    if property_value <= 500_000 {
        value * 0.05
    } else if property_value <= 1_000_000 {
        25_000.0 + (value - 500_000.0) * 0.10
    } else {
        value * 0.20
    }
}

pub fn get_conditional_validation_rules(field: FormField, answers: &FormData) -> ValidationRule {
    match field {
        FormField::DownPayment => {
            let value = answers.property_info.property_value;
            ValidationRule {
                min: Some(minimum_down_payment(value)),
                max: Some(f64::from(value) * 0.95),
            }
        }
        FormField::LoanAmount => answers
            .loan_details
            .loan_amount
            .map(|bracket| {
                let bounds = bracket.bounds();
                ValidationRule {
                    min: Some(f64::from(bounds.min)),
                    max: bounds.max.map(f64::from),
                }
            })
            .unwrap_or_default(),
        FormField::SelfEmploymentYears => ValidationRule {
            min: Some(2.0),
            max: None,
        },
        _ => ValidationRule::default(),
    }
}
