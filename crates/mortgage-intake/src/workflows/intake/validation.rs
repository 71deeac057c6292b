use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::conditional::{
    get_conditional_validation_rules, is_field_required, minimum_down_payment, FormField,
};
use super::domain::{format_dollars, FormData, ValidationErrors};
use super::steps::{StepFlow, StepPosition, WizardStep};
use crate::config::WizardConfig;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PHONE_PATTERN: &str = r"^(\+1[-.\s]?)?(\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4})$";

// Both patterns are literals; a failure to compile is a build defect, not input.
fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern compiles"))
}

pub fn validate_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

/// North American numbers: `(604) 555-1234`, `604-555-1234`, `604.555.1234`, `6045551234`.
pub fn validate_phone(phone: &str) -> bool {
    phone_pattern().is_match(phone.trim())
}

/// Per-step gate. Each step only inspects the fields it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepValidator {
    min_mortgage: u32,
    max_mortgage: u32,
}

impl Default for StepValidator {
    fn default() -> Self {
        Self::from(&WizardConfig::default())
    }
}

impl From<&WizardConfig> for StepValidator {
    fn from(config: &WizardConfig) -> Self {
        Self {
            min_mortgage: config.min_mortgage,
            max_mortgage: config.max_mortgage,
        }
    }
}

impl StepValidator {
    /// Errors for the step at `position`; positions with no step validate clean.
    pub fn validate(&self, answers: &FormData, position: StepPosition) -> ValidationErrors {
        match WizardStep::from_position(position) {
            Some(step) => self.validate_step(answers, step),
            None => {
                debug!(%position, "no validator registered for step");
                ValidationErrors::new()
            }
        }
    }

    pub fn validate_step(&self, answers: &FormData, step: WizardStep) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        match step {
            WizardStep::Homeowner => validate_homeowner(answers, &mut errors),
            WizardStep::PropertyType => validate_property_type(answers, &mut errors),
            WizardStep::PropertyUsage => require(
                &mut errors,
                FormField::PropertyUsage,
                answers.loan_details.property_usage.is_some(),
                "Please select how the property will be used",
            ),
            WizardStep::PropertyValue => self.validate_property_value(answers, &mut errors),
            WizardStep::CurrentMortgages => require(
                &mut errors,
                FormField::CurrentMortgages,
                answers.loan_details.current_mortgages.is_some(),
                "Please select your current mortgage status",
            ),
            WizardStep::MortgageDetails => validate_mortgage_details(answers, &mut errors),
            WizardStep::LoanAmount => require(
                &mut errors,
                FormField::LoanAmount,
                answers.loan_details.loan_amount.is_some(),
                "Please select how much you would like to borrow",
            ),
            WizardStep::LoanPurpose => require(
                &mut errors,
                FormField::LoanPurpose,
                answers.loan_details.loan_purpose.is_some(),
                "Please select a loan purpose",
            ),
            WizardStep::CoApplicant => validate_co_applicant(answers, &mut errors),
            WizardStep::CreditHistory => require(
                &mut errors,
                FormField::CreditHistory,
                answers.loan_details.credit_history.is_some(),
                "Please select your credit history",
            ),
            WizardStep::CreditProfile => validate_credit_profile(answers, &mut errors),
            WizardStep::SelfEmployment => validate_self_employment(answers, &mut errors),
            WizardStep::Province => require(
                &mut errors,
                FormField::Province,
                answers.loan_details.province.is_some(),
                "Please select a province",
            ),
            WizardStep::ContactInfo => validate_contact(answers, &mut errors),
        }
        errors
    }

    /// Union of errors across every step the answers make applicable.
    pub fn validate_all(&self, answers: &FormData, flow: &StepFlow) -> ValidationErrors {
        flow.steps(answers)
            .into_iter()
            .flat_map(|step| self.validate_step(answers, step.step))
            .collect()
    }

    fn validate_property_value(&self, answers: &FormData, errors: &mut ValidationErrors) {
        require(
            errors,
            FormField::PropertyValue,
            answers.loan_details.property_value.is_some(),
            "Please select your property value range",
        );

        let value = answers.property_info.property_value;
        let down = answers.property_info.down_payment;

        if value < 100_000 {
            insert(
                errors,
                FormField::PurchasePrice,
                "Property value must be at least $100,000",
            );
            return;
        }

        if down >= value {
            insert(
                errors,
                FormField::DownPayment,
                "Down payment must be less than property value",
            );
            return;
        }

        if f64::from(down) < minimum_down_payment(value) {
            let message = if value <= 500_000 {
                "Minimum down payment is 5% for homes $500,000 and under"
            } else if value <= 1_000_000 {
                "Minimum down payment is 5% on first $500K and 10% on remaining amount"
            } else {
                "Minimum down payment is 20% for homes over $1,000,000"
            };
            insert(errors, FormField::DownPayment, message);
            return;
        }

        let mortgage = value - down;
        if mortgage < self.min_mortgage || mortgage > self.max_mortgage {
            errors.insert(
                FormField::DownPayment.as_str().to_string(),
                format!(
                    "Mortgage amount must be between {} and {}",
                    format_dollars(self.min_mortgage),
                    format_dollars(self.max_mortgage)
                ),
            );
        }
    }
}

/// Validate the step at `position` with the default mortgage band.
pub fn validate_form_step(answers: &FormData, position: StepPosition) -> ValidationErrors {
    StepValidator::default().validate(answers, position)
}

fn insert(errors: &mut ValidationErrors, field: FormField, message: &str) {
    errors.insert(field.as_str().to_string(), message.to_string());
}

fn require(errors: &mut ValidationErrors, field: FormField, present: bool, message: &str) {
    if !present {
        insert(errors, field, message);
    }
}

fn is_blank(value: Option<&String>) -> bool {
    value.map_or(true, |text| text.trim().is_empty())
}

fn validate_homeowner(answers: &FormData, errors: &mut ValidationErrors) {
    require(
        errors,
        FormField::IsHomeowner,
        answers.loan_details.is_homeowner.is_some(),
        "Please tell us whether you own a home",
    );
}

fn validate_property_type(answers: &FormData, errors: &mut ValidationErrors) {
    require(
        errors,
        FormField::PropertyType,
        answers.loan_details.property_type.is_some(),
        "Please select a property type",
    );
    if is_field_required(FormField::RentalIncome, answers)
        && answers.supplemental.rental_income.is_none()
    {
        insert(
            errors,
            FormField::RentalIncome,
            "Please enter the monthly rental income",
        );
    }
}

fn validate_mortgage_details(answers: &FormData, errors: &mut ValidationErrors) {
    let supplemental = &answers.supplemental;

    if is_field_required(FormField::CurrentMortgageBalance, answers)
        && supplemental.current_mortgage_balance.is_none()
    {
        insert(
            errors,
            FormField::CurrentMortgageBalance,
            "Please enter your current mortgage balance",
        );
    }

    if is_field_required(FormField::CurrentInterestRate, answers) {
        match supplemental.current_interest_rate {
            None => insert(
                errors,
                FormField::CurrentInterestRate,
                "Please enter your current interest rate",
            ),
            Some(rate) if !(rate > 0.0 && rate <= 25.0) => insert(
                errors,
                FormField::CurrentInterestRate,
                "Interest rate must be between 0% and 25%",
            ),
            Some(_) => {}
        }
    }

    if is_field_required(FormField::SecondMortgageBalance, answers)
        && supplemental.second_mortgage_balance.is_none()
    {
        insert(
            errors,
            FormField::SecondMortgageBalance,
            "Please enter your second mortgage balance",
        );
    }
}

fn validate_co_applicant(answers: &FormData, errors: &mut ValidationErrors) {
    let supplemental = &answers.supplemental;
    if is_blank(supplemental.co_applicant_name.as_ref()) {
        insert(
            errors,
            FormField::CoApplicantName,
            "Co-applicant name is required",
        );
    }
    if is_field_required(FormField::CoApplicantIncome, answers)
        && supplemental.co_applicant_income.is_none()
    {
        insert(
            errors,
            FormField::CoApplicantIncome,
            "Please enter the co-applicant's annual income",
        );
    }
}

fn validate_credit_profile(answers: &FormData, errors: &mut ValidationErrors) {
    require(
        errors,
        FormField::CreditScore,
        answers.loan_details.credit_score.is_some(),
        "Please select your credit score range",
    );
    require(
        errors,
        FormField::EmploymentStatus,
        answers.financial_info.employment_status.is_some(),
        "Please select your employment status",
    );

    if answers.financial_info.annual_income < 25_000 {
        insert(
            errors,
            FormField::AnnualIncome,
            "Minimum annual income is $25,000",
        );
    }

    if is_field_required(FormField::EmployerName, answers)
        && is_blank(answers.supplemental.employer_name.as_ref())
    {
        insert(
            errors,
            FormField::EmployerName,
            "Please enter your employer's name",
        );
    }
}

fn validate_self_employment(answers: &FormData, errors: &mut ValidationErrors) {
    let supplemental = &answers.supplemental;

    if is_field_required(FormField::SelfEmploymentYears, answers) {
        let rule = get_conditional_validation_rules(FormField::SelfEmploymentYears, answers);
        match supplemental.self_employment_years {
            None => insert(
                errors,
                FormField::SelfEmploymentYears,
                "Please enter how long you have been self-employed",
            ),
            Some(years) if rule.min.is_some_and(|min| f64::from(years) < min) => insert(
                errors,
                FormField::SelfEmploymentYears,
                "Most lenders require at least 2 years of self-employment",
            ),
            Some(_) => {}
        }
    }

    if is_field_required(FormField::BusinessIncome, answers)
        && supplemental.business_income.is_none()
    {
        insert(
            errors,
            FormField::BusinessIncome,
            "Please enter your average annual business income",
        );
    }
}

fn validate_contact(answers: &FormData, errors: &mut ValidationErrors) {
    let personal = &answers.personal_info;

    if personal.first_name.trim().is_empty() {
        insert(errors, FormField::FirstName, "First name is required");
    }
    if personal.last_name.trim().is_empty() {
        insert(errors, FormField::LastName, "Last name is required");
    }

    if personal.email.trim().is_empty() {
        insert(errors, FormField::Email, "Email is required");
    } else if !validate_email(&personal.email) {
        insert(errors, FormField::Email, "Please enter a valid email address");
    }

    if personal.phone.trim().is_empty() {
        insert(errors, FormField::Phone, "Phone number is required");
    } else if !validate_phone(&personal.phone) {
        insert(
            errors,
            FormField::Phone,
            "Please enter a valid Canadian phone number",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::intake::domain::{CurrentMortgages, EmploymentStatus, PropertyType};

    fn step(n: u8) -> StepPosition {
        StepPosition::base(n)
    }

    #[test]
    fn every_base_step_flags_its_empty_required_field() {
        let mut answers = FormData::default();
        answers.financial_info.employment_status = None;
        let validator = StepValidator::default();

        let expectations = [
            (1, "isHomeowner"),
            (2, "propertyType"),
            (3, "propertyUsage"),
            (4, "propertyValue"),
            (5, "currentMortgages"),
            (6, "loanAmount"),
            (7, "loanPurpose"),
            (8, "creditHistory"),
            (9, "creditScore"),
            (9, "employmentStatus"),
            (10, "province"),
            (11, "firstName"),
            (11, "email"),
        ];

        for (n, field) in expectations {
            let errors = validator.validate(&answers, step(n));
            assert!(
                errors.contains_key(field),
                "step {n} should flag {field}, got {errors:?}"
            );
        }
    }

    #[test]
    fn step_errors_stay_within_owned_fields() {
        let answers = FormData::default();
        let validator = StepValidator::default();
        for wizard_step in WizardStep::BASE.into_iter().chain(WizardStep::CONDITIONAL) {
            let owned: Vec<&str> = wizard_step.fields().iter().map(|f| f.as_str()).collect();
            for key in validator.validate_step(&answers, wizard_step).keys() {
                assert!(
                    owned.contains(&key.as_str()),
                    "{wizard_step:?} reported foreign field {key}"
                );
            }
        }
    }

    #[test]
    fn down_payment_tiers_hold_at_their_boundaries() {
        let mut answers = FormData::default();
        let validator = StepValidator::default();

        answers.property_info.property_value = 500_000;
        answers.property_info.down_payment = 24_999;
        assert!(validator
            .validate(&answers, step(4))
            .contains_key("downPayment"));
        answers.property_info.down_payment = 25_000;
        assert!(!validator
            .validate(&answers, step(4))
            .contains_key("downPayment"));

        answers.property_info.property_value = 1_000_000;
        answers.property_info.down_payment = 74_999;
        assert!(validator
            .validate(&answers, step(4))
            .contains_key("downPayment"));
        answers.property_info.down_payment = 75_000;
        assert!(!validator
            .validate(&answers, step(4))
            .contains_key("downPayment"));
    }

    #[test]
    fn implied_mortgage_must_fit_the_band() {
        let mut answers = FormData::default();
        answers.property_info.property_value = 120_000;
        answers.property_info.down_payment = 90_000;

        let errors = StepValidator::default().validate(&answers, step(4));
        assert_eq!(
            errors.get("downPayment").map(String::as_str),
            Some("Mortgage amount must be between $50,000 and $2,000,000")
        );
    }

    #[test]
    fn contact_distinguishes_missing_from_malformed() {
        let mut answers = FormData::default();
        answers.personal_info.email = "not-an-email".to_string();
        answers.personal_info.phone = "555-12".to_string();

        let errors = validate_form_step(&answers, step(11));
        assert_eq!(errors["email"], "Please enter a valid email address");
        assert_eq!(errors["phone"], "Please enter a valid Canadian phone number");

        answers.personal_info.email.clear();
        answers.personal_info.phone.clear();
        let errors = validate_form_step(&answers, step(11));
        assert_eq!(errors["email"], "Email is required");
        assert_eq!(errors["phone"], "Phone number is required");
    }

    #[test]
    fn contact_patterns_compile() {
        assert!(Regex::new(EMAIL_PATTERN).is_ok());
        assert!(Regex::new(PHONE_PATTERN).is_ok());
        assert!(email_pattern().is_match("jordan@example.ca"));
        assert!(phone_pattern().is_match("+1 604 555 0143"));
    }

    #[test]
    fn accepts_common_phone_formats() {
        for phone in ["(604) 555-1234", "604-555-1234", "604.555.1234", "+1 604 555 1234"] {
            assert!(validate_phone(phone), "{phone} should be accepted");
        }
        assert!(!validate_phone("55-1234"));
    }

    #[test]
    fn conditional_steps_check_their_supplemental_fields() {
        let mut answers = FormData::default();
        answers.loan_details.current_mortgages = Some(CurrentMortgages::TwoMortgages);
        answers.financial_info.employment_status = Some(EmploymentStatus::SelfEmployed);
        answers.supplemental.self_employment_years = Some(1);
        answers.supplemental.current_interest_rate = Some(31.0);

        let details = validate_form_step(&answers, WizardStep::MortgageDetails.position());
        assert!(details.contains_key("currentMortgageBalance"));
        assert!(details.contains_key("secondMortgageBalance"));
        assert!(details.contains_key("currentInterestRate"));

        let self_employment = validate_form_step(&answers, WizardStep::SelfEmployment.position());
        assert_eq!(
            self_employment["selfEmploymentYears"],
            "Most lenders require at least 2 years of self-employment"
        );
    }

    #[test]
    fn rental_income_only_required_for_multi_family() {
        let mut answers = FormData::default();
        answers.loan_details.property_type = Some(PropertyType::Condo);
        assert!(validate_form_step(&answers, step(2)).is_empty());

        answers.loan_details.property_type = Some(PropertyType::MultiFamily);
        assert!(validate_form_step(&answers, step(2)).contains_key("rentalIncome"));
    }

    #[test]
    fn unknown_positions_validate_clean() {
        let answers = FormData::default();
        let position: StepPosition = serde_json::from_str("3.5").expect("parses");
        assert!(validate_form_step(&answers, position).is_empty());
    }
}
