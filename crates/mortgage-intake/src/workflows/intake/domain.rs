use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::steps::StepPosition;

/// Field name to message; an absent key means the field passed.
pub type ValidationErrors = BTreeMap<String, String>;

/// The aggregate record of every answer collected by the wizard so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    #[serde(default)]
    pub loan_details: LoanDetails,
    #[serde(default)]
    pub property_info: PropertyInfo,
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub financial_info: FinancialInfo,
    #[serde(default)]
    pub supplemental: SupplementalInfo,
    #[serde(default)]
    pub current_step: StepPosition,
    #[serde(default)]
    pub is_complete: bool,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            loan_details: LoanDetails::default(),
            property_info: PropertyInfo::default(),
            personal_info: PersonalInfo::default(),
            financial_info: FinancialInfo::default(),
            supplemental: SupplementalInfo::default(),
            current_step: StepPosition::FIRST,
            is_complete: false,
        }
    }
}

impl FormData {
    /// Down payment as a percentage of the declared property value; zero when no value is known.
    pub fn down_payment_percent(&self) -> f64 {
        let value = self.property_info.property_value;
        if value == 0 {
            return 0.0;
        }
        f64::from(self.property_info.down_payment) / f64::from(value) * 100.0
    }

    /// Whether the applicant declared an existing first or second mortgage.
    pub fn has_existing_mortgage(&self) -> bool {
        matches!(
            self.loan_details.current_mortgages,
            Some(CurrentMortgages::OneMortgage | CurrentMortgages::TwoMortgages)
        )
    }

    pub fn is_self_employed(&self) -> bool {
        self.financial_info.employment_status == Some(EmploymentStatus::SelfEmployed)
    }

    pub fn has_co_applicant(&self) -> bool {
        self.supplemental.has_co_applicant == Some(true)
    }

    /// A session holds real data once it moved past the first step or captured identity.
    pub fn is_non_trivial(&self) -> bool {
        self.current_step > StepPosition::FIRST
            || !self.personal_info.first_name.trim().is_empty()
            || !self.personal_info.email.trim().is_empty()
    }

    /// Shallow merge: every sub-record present in the patch replaces the stored one.
    pub fn apply(&mut self, patch: FormDataPatch) {
        let FormDataPatch {
            loan_details,
            property_info,
            personal_info,
            financial_info,
            supplemental,
            current_step,
            is_complete,
        } = patch;

        if let Some(value) = loan_details {
            self.loan_details = value;
        }
        if let Some(value) = property_info {
            self.property_info = value;
        }
        if let Some(value) = personal_info {
            self.personal_info = value;
        }
        if let Some(value) = financial_info {
            self.financial_info = value;
        }
        if let Some(value) = supplemental {
            self.supplemental = value;
        }
        if let Some(value) = current_step {
            self.current_step = value;
        }
        if let Some(value) = is_complete {
            self.is_complete = value;
        }
    }
}

/// Partial Answer Set accepted by `FormSession::update_form_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDataPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_details: Option<LoanDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_info: Option<PropertyInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_info: Option<FinancialInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplemental: Option<SupplementalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<StepPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
}

/// Categorical selections made across the bracket steps of the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDetails {
    #[serde(default)]
    pub is_homeowner: Option<bool>,
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    #[serde(default)]
    pub property_usage: Option<PropertyUsage>,
    #[serde(default)]
    pub property_value: Option<PropertyValueBracket>,
    #[serde(default)]
    pub current_mortgages: Option<CurrentMortgages>,
    #[serde(default)]
    pub loan_amount: Option<LoanAmountBracket>,
    #[serde(default)]
    pub loan_purpose: Option<LoanPurpose>,
    #[serde(default)]
    pub credit_history: Option<CreditHistory>,
    #[serde(default)]
    pub credit_score: Option<CreditScoreBracket>,
    #[serde(default)]
    pub province: Option<Province>,
}

/// Exact property figures used for down payment rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyInfo {
    pub province: String,
    pub property_value: u32,
    pub down_payment: u32,
    pub first_time_home_buyer: bool,
}

impl Default for PropertyInfo {
    fn default() -> Self {
        Self {
            province: String::new(),
            property_value: 750_000,
            down_payment: 150_000,
            first_time_home_buyer: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Income and employment snapshot collected alongside the credit score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialInfo {
    pub annual_income: u32,
    pub employment_status: Option<EmploymentStatus>,
    pub monthly_debts: u32,
}

impl Default for FinancialInfo {
    fn default() -> Self {
        Self {
            annual_income: 75_000,
            employment_status: Some(EmploymentStatus::Employed),
            monthly_debts: 1_500,
        }
    }
}

/// Answers to fields that only appear once a conditional rule switches them on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_income: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_mortgage_balance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_mortgage_balance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_employment_years: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_income: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_co_applicant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co_applicant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co_applicant_income: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co_applicant_employment: Option<EmploymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquid_assets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_approval_needed: Option<bool>,
}

/// Whole dollars with thousands separators, e.g. `$1,250,000`.
pub fn format_dollars(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push('$');
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Inclusive lower bound and optional inclusive upper bound, in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DollarRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl DollarRange {
    const fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, amount: u32) -> bool {
        amount >= self.min && self.max.map_or(true, |max| amount <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    SingleFamily,
    Condo,
    Townhouse,
    MultiFamily,
}

impl PropertyType {
    pub const fn as_str(self) -> &'static str {
        match self {
            PropertyType::SingleFamily => "single-family",
            PropertyType::Condo => "condo",
            PropertyType::Townhouse => "townhouse",
            PropertyType::MultiFamily => "multi-family",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PropertyType::SingleFamily => "Single Family",
            PropertyType::Condo => "Condo",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::MultiFamily => "Multi Family",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyUsage {
    PrimaryHome,
    SecondHome,
    RentalProperty,
}

impl PropertyUsage {
    pub const fn as_str(self) -> &'static str {
        match self {
            PropertyUsage::PrimaryHome => "primary-home",
            PropertyUsage::SecondHome => "second-home",
            PropertyUsage::RentalProperty => "rental-property",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyValueBracket {
    #[serde(rename = "below-300k")]
    Below300k,
    #[serde(rename = "300k-600k")]
    From300kTo600k,
    #[serde(rename = "600k-900k")]
    From600kTo900k,
    #[serde(rename = "900k-1200k")]
    From900kTo1200k,
    #[serde(rename = "1200k-1500k")]
    From1200kTo1500k,
    #[serde(rename = "1500k-2000k")]
    From1500kTo2000k,
    #[serde(rename = "above-2000k")]
    Above2000k,
}

impl PropertyValueBracket {
    pub const fn as_str(self) -> &'static str {
        match self {
            PropertyValueBracket::Below300k => "below-300k",
            PropertyValueBracket::From300kTo600k => "300k-600k",
            PropertyValueBracket::From600kTo900k => "600k-900k",
            PropertyValueBracket::From900kTo1200k => "900k-1200k",
            PropertyValueBracket::From1200kTo1500k => "1200k-1500k",
            PropertyValueBracket::From1500kTo2000k => "1500k-2000k",
            PropertyValueBracket::Above2000k => "above-2000k",
        }
    }

    pub const fn bounds(self) -> DollarRange {
        match self {
            PropertyValueBracket::Below300k => DollarRange::new(0, Some(300_000)),
            PropertyValueBracket::From300kTo600k => DollarRange::new(300_001, Some(600_000)),
            PropertyValueBracket::From600kTo900k => DollarRange::new(600_001, Some(900_000)),
            PropertyValueBracket::From900kTo1200k => DollarRange::new(900_001, Some(1_200_000)),
            PropertyValueBracket::From1200kTo1500k => {
                DollarRange::new(1_200_001, Some(1_500_000))
            }
            PropertyValueBracket::From1500kTo2000k => {
                DollarRange::new(1_500_001, Some(2_000_000))
            }
            PropertyValueBracket::Above2000k => DollarRange::new(2_000_001, None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurrentMortgages {
    PaidOff,
    OneMortgage,
    TwoMortgages,
}

impl CurrentMortgages {
    pub const fn as_str(self) -> &'static str {
        match self {
            CurrentMortgages::PaidOff => "paid-off",
            CurrentMortgages::OneMortgage => "one-mortgage",
            CurrentMortgages::TwoMortgages => "two-mortgages",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanAmountBracket {
    #[serde(rename = "below-25k")]
    Below25k,
    #[serde(rename = "25k-50k")]
    From25kTo50k,
    #[serde(rename = "50k-75k")]
    From50kTo75k,
    #[serde(rename = "75k-100k")]
    From75kTo100k,
    #[serde(rename = "100k-200k")]
    From100kTo200k,
    #[serde(rename = "above-200k")]
    Above200k,
}

impl LoanAmountBracket {
    pub const fn as_str(self) -> &'static str {
        match self {
            LoanAmountBracket::Below25k => "below-25k",
            LoanAmountBracket::From25kTo50k => "25k-50k",
            LoanAmountBracket::From50kTo75k => "50k-75k",
            LoanAmountBracket::From75kTo100k => "75k-100k",
            LoanAmountBracket::From100kTo200k => "100k-200k",
            LoanAmountBracket::Above200k => "above-200k",
        }
    }

    pub const fn bounds(self) -> DollarRange {
        match self {
            LoanAmountBracket::Below25k => DollarRange::new(0, Some(25_000)),
            LoanAmountBracket::From25kTo50k => DollarRange::new(25_000, Some(50_000)),
            LoanAmountBracket::From50kTo75k => DollarRange::new(50_000, Some(75_000)),
            LoanAmountBracket::From75kTo100k => DollarRange::new(75_000, Some(100_000)),
            LoanAmountBracket::From100kTo200k => DollarRange::new(100_000, Some(200_000)),
            LoanAmountBracket::Above200k => DollarRange::new(200_000, None),
        }
    }

    /// Point estimate used where a single dollar figure is needed.
    pub const fn representative_amount(self) -> u32 {
        match self {
            LoanAmountBracket::Below25k => 12_500,
            LoanAmountBracket::From25kTo50k => 37_500,
            LoanAmountBracket::From50kTo75k => 62_500,
            LoanAmountBracket::From75kTo100k => 87_500,
            LoanAmountBracket::From100kTo200k => 150_000,
            LoanAmountBracket::Above200k => 250_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanPurpose {
    HomeImprovement,
    RetirementIncome,
    DebtConsolidation,
    InvestmentPurposes,
}

impl LoanPurpose {
    pub const fn as_str(self) -> &'static str {
        match self {
            LoanPurpose::HomeImprovement => "home-improvement",
            LoanPurpose::RetirementIncome => "retirement-income",
            LoanPurpose::DebtConsolidation => "debt-consolidation",
            LoanPurpose::InvestmentPurposes => "investment-purposes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreditHistory {
    Bankruptcy,
    Foreclosure,
    ConsumerProposal,
    #[serde(rename = "none")]
    NoIssues,
}

impl CreditHistory {
    pub const fn as_str(self) -> &'static str {
        match self {
            CreditHistory::Bankruptcy => "bankruptcy",
            CreditHistory::Foreclosure => "foreclosure",
            CreditHistory::ConsumerProposal => "consumer-proposal",
            CreditHistory::NoIssues => "none",
        }
    }

    pub const fn is_clean(self) -> bool {
        matches!(self, CreditHistory::NoIssues)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreditScoreBracket {
    #[serde(rename = "needs-work-599")]
    NeedsWork,
    #[serde(rename = "fair-600-659")]
    Fair,
    #[serde(rename = "good-660-719")]
    Good,
    #[serde(rename = "very-good-720-779")]
    VeryGood,
    #[serde(rename = "excellent-780+")]
    Excellent,
}

impl CreditScoreBracket {
    /// Lowest tier first.
    pub const ALL: [CreditScoreBracket; 5] = [
        CreditScoreBracket::NeedsWork,
        CreditScoreBracket::Fair,
        CreditScoreBracket::Good,
        CreditScoreBracket::VeryGood,
        CreditScoreBracket::Excellent,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CreditScoreBracket::NeedsWork => "needs-work-599",
            CreditScoreBracket::Fair => "fair-600-659",
            CreditScoreBracket::Good => "good-660-719",
            CreditScoreBracket::VeryGood => "very-good-720-779",
            CreditScoreBracket::Excellent => "excellent-780+",
        }
    }

    /// Bureau score range covered by the bracket.
    pub const fn score_range(self) -> (u16, Option<u16>) {
        match self {
            CreditScoreBracket::NeedsWork => (300, Some(599)),
            CreditScoreBracket::Fair => (600, Some(659)),
            CreditScoreBracket::Good => (660, Some(719)),
            CreditScoreBracket::VeryGood => (720, Some(779)),
            CreditScoreBracket::Excellent => (780, None),
        }
    }

    pub const fn needs_improvement(self) -> bool {
        matches!(self, CreditScoreBracket::Fair | CreditScoreBracket::NeedsWork)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Province {
    Alberta,
    BritishColumbia,
    Manitoba,
    NewBrunswick,
    NewfoundlandLabrador,
    NorthwestTerritories,
    NovaScotia,
    Nunavut,
    Ontario,
    PrinceEdwardIsland,
    Quebec,
    Saskatchewan,
    Yukon,
}

impl Province {
    pub const fn label(self) -> &'static str {
        match self {
            Province::Alberta => "Alberta",
            Province::BritishColumbia => "British Columbia",
            Province::Manitoba => "Manitoba",
            Province::NewBrunswick => "New Brunswick",
            Province::NewfoundlandLabrador => "Newfoundland and Labrador",
            Province::NorthwestTerritories => "Northwest Territories",
            Province::NovaScotia => "Nova Scotia",
            Province::Nunavut => "Nunavut",
            Province::Ontario => "Ontario",
            Province::PrinceEdwardIsland => "Prince Edward Island",
            Province::Quebec => "Quebec",
            Province::Saskatchewan => "Saskatchewan",
            Province::Yukon => "Yukon",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Retired,
    Unemployed,
}

impl EmploymentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            EmploymentStatus::Employed => "employed",
            EmploymentStatus::SelfEmployed => "self-employed",
            EmploymentStatus::Retired => "retired",
            EmploymentStatus::Unemployed => "unemployed",
        }
    }
}
