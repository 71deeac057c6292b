use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::conditional::FormField;
use super::domain::FormData;

/// Number of base steps in the wizard.
pub const MAX_STEPS: u8 = 11;

/// Step number in tenths: whole numbers are base steps, `5.5` style values are
/// conditional sub-steps slotted between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepPosition(u16);

impl StepPosition {
    pub const FIRST: StepPosition = StepPosition(10);

    pub const fn base(step: u8) -> Self {
        Self(step as u16 * 10)
    }

    const fn between(after: u8) -> Self {
        Self(after as u16 * 10 + 5)
    }

    pub const fn tenths(self) -> u16 {
        self.0
    }

    /// The base step number, if this position is not a conditional sub-step.
    pub const fn as_base(self) -> Option<u8> {
        if self.0 % 10 == 0 {
            Some((self.0 / 10) as u8)
        } else {
            None
        }
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl Default for StepPosition {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for StepPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_base() {
            Some(step) => write!(f, "{step}"),
            None => write!(f, "{}.{}", self.0 / 10, self.0 % 10),
        }
    }
}

impl Serialize for StepPosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_base() {
            Some(step) => serializer.serialize_u8(step),
            None => serializer.serialize_f64(self.as_f64()),
        }
    }
}

impl<'de> Deserialize<'de> for StepPosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        let tenths = (raw * 10.0).round();
        if !(10.0..=f64::from(MAX_STEPS) * 10.0).contains(&tenths) {
            return Err(serde::de::Error::custom(format!(
                "step {raw} is outside 1..={MAX_STEPS}"
            )));
        }
        Ok(Self(tenths as u16))
    }
}

/// Every screen the wizard can show, base and conditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    Homeowner,
    PropertyType,
    PropertyUsage,
    PropertyValue,
    CurrentMortgages,
    MortgageDetails,
    LoanAmount,
    LoanPurpose,
    CoApplicant,
    CreditHistory,
    CreditProfile,
    SelfEmployment,
    Province,
    ContactInfo,
}

impl WizardStep {
    pub const BASE: [WizardStep; MAX_STEPS as usize] = [
        WizardStep::Homeowner,
        WizardStep::PropertyType,
        WizardStep::PropertyUsage,
        WizardStep::PropertyValue,
        WizardStep::CurrentMortgages,
        WizardStep::LoanAmount,
        WizardStep::LoanPurpose,
        WizardStep::CreditHistory,
        WizardStep::CreditProfile,
        WizardStep::Province,
        WizardStep::ContactInfo,
    ];

    pub const CONDITIONAL: [WizardStep; 3] = [
        WizardStep::MortgageDetails,
        WizardStep::CoApplicant,
        WizardStep::SelfEmployment,
    ];

    pub const fn position(self) -> StepPosition {
        match self {
            WizardStep::Homeowner => StepPosition::base(1),
            WizardStep::PropertyType => StepPosition::base(2),
            WizardStep::PropertyUsage => StepPosition::base(3),
            WizardStep::PropertyValue => StepPosition::base(4),
            WizardStep::CurrentMortgages => StepPosition::base(5),
            WizardStep::MortgageDetails => StepPosition::between(5),
            WizardStep::LoanAmount => StepPosition::base(6),
            WizardStep::LoanPurpose => StepPosition::base(7),
            WizardStep::CoApplicant => StepPosition::between(7),
            WizardStep::CreditHistory => StepPosition::base(8),
            WizardStep::CreditProfile => StepPosition::base(9),
            WizardStep::SelfEmployment => StepPosition::between(9),
            WizardStep::Province => StepPosition::base(10),
            WizardStep::ContactInfo => StepPosition::base(11),
        }
    }

    pub fn from_position(position: StepPosition) -> Option<Self> {
        Self::BASE
            .into_iter()
            .chain(Self::CONDITIONAL)
            .find(|step| step.position() == position)
    }

    pub const fn is_conditional(self) -> bool {
        matches!(
            self,
            WizardStep::MortgageDetails | WizardStep::CoApplicant | WizardStep::SelfEmployment
        )
    }

    /// Conditional steps only join the flow when earlier answers call for them.
    pub fn applies_to(self, answers: &FormData) -> bool {
        match self {
            WizardStep::MortgageDetails => answers.has_existing_mortgage(),
            WizardStep::CoApplicant => answers.has_co_applicant(),
            WizardStep::SelfEmployment => answers.is_self_employed(),
            _ => true,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            WizardStep::Homeowner => "Homeowner Status",
            WizardStep::PropertyType => "Property Type",
            WizardStep::PropertyUsage => "Property Usage",
            WizardStep::PropertyValue => "Property Value",
            WizardStep::CurrentMortgages => "Current Mortgages",
            WizardStep::MortgageDetails => "Current Mortgage Details",
            WizardStep::LoanAmount => "Loan Amount",
            WizardStep::LoanPurpose => "Loan Purpose",
            WizardStep::CoApplicant => "Co-Applicant Information",
            WizardStep::CreditHistory => "Credit History",
            WizardStep::CreditProfile => "Credit Score & Income",
            WizardStep::SelfEmployment => "Self-Employment Details",
            WizardStep::Province => "Province",
            WizardStep::ContactInfo => "Contact Information",
        }
    }

    pub const fn subtitle(self) -> &'static str {
        match self {
            WizardStep::Homeowner => "Do you currently own a home?",
            WizardStep::PropertyType => "What kind of property is it?",
            WizardStep::PropertyUsage => "How is the property used?",
            WizardStep::PropertyValue => "Estimated value and down payment",
            WizardStep::CurrentMortgages => "Mortgages currently on the property",
            WizardStep::MortgageDetails => "Information about your existing mortgage(s)",
            WizardStep::LoanAmount => "How much would you like to borrow?",
            WizardStep::LoanPurpose => "What will the funds be used for?",
            WizardStep::CoApplicant => "Details about your co-applicant",
            WizardStep::CreditHistory => "Past credit events",
            WizardStep::CreditProfile => "Credit score, income and employment",
            WizardStep::SelfEmployment => "Additional information for self-employed applicants",
            WizardStep::Province => "Where is the property located?",
            WizardStep::ContactInfo => "Where should we send your rate?",
        }
    }

    pub const fn fields(self) -> &'static [FormField] {
        match self {
            WizardStep::Homeowner => &[FormField::IsHomeowner],
            WizardStep::PropertyType => &[FormField::PropertyType, FormField::RentalIncome],
            WizardStep::PropertyUsage => &[FormField::PropertyUsage],
            WizardStep::PropertyValue => &[
                FormField::PropertyValue,
                FormField::PurchasePrice,
                FormField::DownPayment,
                FormField::FirstTimeHomeBuyer,
                FormField::FirstTimeBuyerPrograms,
                FormField::LiquidAssets,
            ],
            WizardStep::CurrentMortgages => &[FormField::CurrentMortgages],
            WizardStep::MortgageDetails => &[
                FormField::CurrentMortgageBalance,
                FormField::CurrentInterestRate,
                FormField::SecondMortgageBalance,
                FormField::MonthlyPayment,
            ],
            WizardStep::LoanAmount => &[FormField::LoanAmount],
            WizardStep::LoanPurpose => &[
                FormField::LoanPurpose,
                FormField::HasCoApplicant,
                FormField::PreApprovalNeeded,
            ],
            WizardStep::CoApplicant => &[
                FormField::CoApplicantName,
                FormField::CoApplicantIncome,
                FormField::CoApplicantEmployment,
            ],
            WizardStep::CreditHistory => &[FormField::CreditHistory],
            WizardStep::CreditProfile => &[
                FormField::CreditScore,
                FormField::EmploymentStatus,
                FormField::EmployerName,
                FormField::AnnualIncome,
                FormField::MonthlyDebts,
            ],
            WizardStep::SelfEmployment => &[
                FormField::BusinessName,
                FormField::BusinessType,
                FormField::SelfEmploymentYears,
                FormField::BusinessIncome,
            ],
            WizardStep::Province => &[FormField::Province],
            WizardStep::ContactInfo => &[
                FormField::FirstName,
                FormField::LastName,
                FormField::Email,
                FormField::Phone,
            ],
        }
    }

    pub const fn estimated_minutes(self) -> u8 {
        match self {
            WizardStep::PropertyValue
            | WizardStep::CreditProfile
            | WizardStep::ContactInfo
            | WizardStep::MortgageDetails
            | WizardStep::CoApplicant => 2,
            WizardStep::SelfEmployment => 3,
            _ => 1,
        }
    }
}

/// Descriptor handed to the presentation layer for one screen of the wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStep {
    pub step_number: StepPosition,
    pub step: WizardStep,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub fields: Vec<FormField>,
    pub estimated_time: u8,
}

impl From<WizardStep> for FormStep {
    fn from(step: WizardStep) -> Self {
        Self {
            step_number: step.position(),
            step,
            title: step.title(),
            subtitle: step.subtitle(),
            fields: step.fields().to_vec(),
            estimated_time: step.estimated_minutes(),
        }
    }
}

/// Step sequencing for a wizard truncated to `total_steps` base steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepFlow {
    total_steps: u8,
}

impl Default for StepFlow {
    fn default() -> Self {
        Self {
            total_steps: MAX_STEPS,
        }
    }
}

impl StepFlow {
    pub fn new(total_steps: u8) -> Self {
        Self {
            total_steps: total_steps.clamp(1, MAX_STEPS),
        }
    }

    pub fn total_steps(&self) -> u8 {
        self.total_steps
    }

    pub fn last(&self) -> StepPosition {
        StepPosition::base(self.total_steps)
    }

    /// Base steps plus the conditional steps the answers unlock, ordered by position.
    pub fn steps(&self, answers: &FormData) -> Vec<FormStep> {
        let last = self.last();
        let mut steps: Vec<WizardStep> = WizardStep::BASE
            .into_iter()
            .chain(WizardStep::CONDITIONAL)
            .filter(|step| step.position() <= last && step.applies_to(answers))
            .collect();
        steps.sort_by_key(|step| step.position());
        steps.into_iter().map(FormStep::from).collect()
    }

    /// Position after `current`; stays put on the last step.
    pub fn next(&self, current: StepPosition, answers: &FormData) -> StepPosition {
        self.steps(answers)
            .into_iter()
            .map(|step| step.step_number)
            .find(|position| *position > current)
            .unwrap_or_else(|| current.min(self.last()))
    }

    /// Position before `current`; stays put on the first step.
    pub fn previous(&self, current: StepPosition, answers: &FormData) -> StepPosition {
        self.steps(answers)
            .into_iter()
            .map(|step| step.step_number)
            .filter(|position| *position < current)
            .last()
            .unwrap_or(StepPosition::FIRST)
    }

    pub fn estimated_minutes(&self, answers: &FormData) -> u32 {
        self.steps(answers)
            .iter()
            .map(|step| u32::from(step.estimated_time))
            .sum()
    }
}

/// Step descriptors for the full wizard.
pub fn get_form_steps(answers: &FormData) -> Vec<FormStep> {
    StepFlow::default().steps(answers)
}

/// Minutes needed to finish every applicable step.
pub fn calculate_estimated_time(answers: &FormData) -> u32 {
    StepFlow::default().estimated_minutes(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::intake::domain::{CurrentMortgages, EmploymentStatus};

    #[test]
    fn default_flow_has_only_base_steps() {
        let steps = get_form_steps(&FormData::default());
        assert_eq!(steps.len(), MAX_STEPS as usize);
        assert!(steps.iter().all(|step| !step.step.is_conditional()));
        assert_eq!(steps[0].step_number, StepPosition::FIRST);
    }

    #[test]
    fn conditional_steps_interleave_by_position() {
        let mut answers = FormData::default();
        answers.loan_details.current_mortgages = Some(CurrentMortgages::TwoMortgages);
        answers.financial_info.employment_status = Some(EmploymentStatus::SelfEmployed);

        let steps = get_form_steps(&answers);
        let order: Vec<WizardStep> = steps.iter().map(|step| step.step).collect();

        assert_eq!(steps.len(), 13);
        assert_eq!(order[5], WizardStep::MortgageDetails);
        assert_eq!(order[10], WizardStep::SelfEmployment);
        assert_eq!(steps[5].step_number.to_string(), "5.5");
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let flow = StepFlow::default();
        let answers = FormData::default();

        assert_eq!(
            flow.previous(StepPosition::FIRST, &answers),
            StepPosition::FIRST
        );
        assert_eq!(flow.next(flow.last(), &answers), flow.last());
        assert_eq!(
            flow.next(StepPosition::base(5), &answers),
            StepPosition::base(6)
        );
    }

    #[test]
    fn truncated_flow_drops_later_steps() {
        let flow = StepFlow::new(4);
        let mut answers = FormData::default();
        answers.financial_info.employment_status = Some(EmploymentStatus::SelfEmployed);

        let steps = flow.steps(&answers);
        assert_eq!(steps.len(), 4);
        assert_eq!(
            flow.next(StepPosition::base(4), &answers),
            StepPosition::base(4)
        );
    }

    #[test]
    fn positions_round_trip_as_numbers() {
        let json = serde_json::to_string(&WizardStep::MortgageDetails.position()).unwrap();
        assert_eq!(json, "5.5");
        let parsed: StepPosition = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, StepPosition::base(7));
        assert!(serde_json::from_str::<StepPosition>("12").is_err());
    }

    #[test]
    fn estimated_time_grows_with_conditional_steps() {
        let mut answers = FormData::default();
        let base = calculate_estimated_time(&answers);
        answers.supplemental.has_co_applicant = Some(true);
        assert_eq!(calculate_estimated_time(&answers), base + 2);
    }
}
