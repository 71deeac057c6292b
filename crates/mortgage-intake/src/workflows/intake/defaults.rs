//! Market-based starting answers for a new session.

use serde::Serialize;

use super::domain::{
    format_dollars, CreditHistory, CreditScoreBracket, CurrentMortgages, EmploymentStatus,
    FinancialInfo, FormData, FormDataPatch, LoanAmountBracket, LoanDetails, LoanPurpose,
    PropertyInfo, PropertyType, PropertyUsage, PropertyValueBracket, Province,
};

/// Regional averages used to seed the property and income answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub average_home_price: u32,
    pub average_down_payment: u32,
    pub average_income: u32,
    pub popular_property_types: &'static [PropertyType],
    pub recommended_loan_amount: u32,
}

const fn market(
    price: u32,
    down: u32,
    income: u32,
    popular: &'static [PropertyType],
    loan: u32,
) -> MarketData {
    MarketData {
        average_home_price: price,
        average_down_payment: down,
        average_income: income,
        popular_property_types: popular,
        recommended_loan_amount: loan,
    }
}

const CONDO_TOWNHOUSE: &[PropertyType] = &[PropertyType::Condo, PropertyType::Townhouse];
const HOUSE_TOWNHOUSE: &[PropertyType] = &[PropertyType::SingleFamily, PropertyType::Townhouse];
const HOUSE_CONDO: &[PropertyType] = &[PropertyType::SingleFamily, PropertyType::Condo];

/// Fallback for cities without their own row.
pub const PROVINCE_AVERAGE: MarketData =
    market(750_000, 150_000, 65_000, HOUSE_CONDO, 600_000);

const MARKETS: &[(&str, MarketData)] = &[
    ("vancouver", market(1_250_000, 250_000, 85_000, CONDO_TOWNHOUSE, 1_000_000)),
    ("west-vancouver", market(2_800_000, 560_000, 150_000, HOUSE_TOWNHOUSE, 2_240_000)),
    ("north-vancouver", market(1_850_000, 370_000, 120_000, HOUSE_TOWNHOUSE, 1_480_000)),
    ("burnaby", market(1_100_000, 220_000, 75_000, CONDO_TOWNHOUSE, 880_000)),
    ("richmond", market(1_300_000, 260_000, 80_000, HOUSE_TOWNHOUSE, 1_040_000)),
    ("surrey", market(950_000, 190_000, 70_000, HOUSE_TOWNHOUSE, 760_000)),
    ("coquitlam", market(1_050_000, 210_000, 75_000, HOUSE_TOWNHOUSE, 840_000)),
    ("langley", market(900_000, 180_000, 68_000, HOUSE_TOWNHOUSE, 720_000)),
    ("new-westminster", market(850_000, 170_000, 65_000, CONDO_TOWNHOUSE, 680_000)),
    ("port-coquitlam", market(800_000, 160_000, 65_000, HOUSE_TOWNHOUSE, 640_000)),
    ("delta", market(950_000, 190_000, 70_000, HOUSE_TOWNHOUSE, 760_000)),
    ("white-rock", market(1_200_000, 240_000, 78_000, HOUSE_CONDO, 960_000)),
];

/// Lookup by city name; case and whitespace are normalized ("North Vancouver").
pub fn market_data(city: &str) -> MarketData {
    let key = city
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_ascii_lowercase();
    MARKETS
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(PROVINCE_AVERAGE, |(_, data)| *data)
}

fn market_for(city: Option<&str>) -> MarketData {
    city.map_or(PROVINCE_AVERAGE, market_data)
}

/// Starting answers for a visitor from `city`, with any known preferences laid on top.
///
/// Bracket selections merge field by field; the other sub-records in
/// `preferences` replace the seeded ones whole.
pub fn generate_smart_defaults(city: Option<&str>, preferences: Option<FormDataPatch>) -> FormData {
    let market = market_for(city);

    let mut seeded = FormData {
        loan_details: LoanDetails {
            is_homeowner: Some(false),
            property_type: market.popular_property_types.first().copied(),
            property_usage: Some(PropertyUsage::PrimaryHome),
            property_value: Some(PropertyValueBracket::From600kTo900k),
            current_mortgages: Some(CurrentMortgages::PaidOff),
            loan_amount: Some(LoanAmountBracket::From100kTo200k),
            loan_purpose: Some(LoanPurpose::HomeImprovement),
            credit_history: Some(CreditHistory::NoIssues),
            credit_score: Some(CreditScoreBracket::Good),
            province: Some(Province::BritishColumbia),
        },
        property_info: PropertyInfo {
            province: "BC".to_string(),
            property_value: market.average_home_price,
            down_payment: market.average_down_payment,
            first_time_home_buyer: false,
        },
        financial_info: FinancialInfo {
            annual_income: market.average_income,
            employment_status: Some(EmploymentStatus::Employed),
            monthly_debts: (f64::from(market.average_income) * 0.25 / 12.0).round() as u32,
        },
        ..FormData::default()
    };

    let Some(mut preferences) = preferences else {
        return seeded;
    };

    if let Some(chosen) = preferences.loan_details.take() {
        let loan = &mut seeded.loan_details;
        loan.is_homeowner = chosen.is_homeowner.or(loan.is_homeowner);
        loan.property_type = chosen.property_type.or(loan.property_type);
        loan.property_usage = chosen.property_usage.or(loan.property_usage);
        loan.property_value = chosen.property_value.or(loan.property_value);
        loan.current_mortgages = chosen.current_mortgages.or(loan.current_mortgages);
        loan.loan_amount = chosen.loan_amount.or(loan.loan_amount);
        loan.loan_purpose = chosen.loan_purpose.or(loan.loan_purpose);
        loan.credit_history = chosen.credit_history.or(loan.credit_history);
        loan.credit_score = chosen.credit_score.or(loan.credit_score);
        loan.province = chosen.province.or(loan.province);
    }
    seeded.apply(preferences);
    seeded
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketRecommendation {
    pub title: &'static str,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationRecommendations {
    pub message: String,
    pub recommendations: Vec<MarketRecommendation>,
}

pub fn location_recommendations(city: Option<&str>) -> LocationRecommendations {
    let market = market_for(city);
    let place = city.unwrap_or("BC");
    let down_share = (f64::from(market.average_down_payment)
        / f64::from(market.average_home_price)
        * 100.0)
        .round();
    let popular = market
        .popular_property_types
        .iter()
        .map(|kind| kind.label())
        .collect::<Vec<_>>()
        .join(", ");

    LocationRecommendations {
        message: format!("Based on {place} market data:"),
        recommendations: vec![
            MarketRecommendation {
                title: "Recommended Property Value Range",
                value: "$600K - $900K".to_string(),
                description: format!("Typical range for {place} homebuyers"),
            },
            MarketRecommendation {
                title: "Typical Down Payment",
                value: format_dollars(market.average_down_payment),
                description: format!("{down_share}% of home value"),
            },
            MarketRecommendation {
                title: "Popular Property Types",
                value: popular,
                description: format!("Most common in {place}"),
            },
            MarketRecommendation {
                title: "Income Consideration",
                value: format!("{}+", format_dollars(market.average_income)),
                description: "Recommended annual income".to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::intake::domain::PersonalInfo;
    use crate::workflows::intake::StepPosition;

    #[test]
    fn city_lookup_normalizes_names() {
        assert_eq!(market_data("North Vancouver").average_home_price, 1_850_000);
        assert_eq!(market_data("  white   rock ").average_income, 78_000);
        assert_eq!(market_data("Kelowna"), PROVINCE_AVERAGE);
    }

    #[test]
    fn market_figures_seed_property_and_income() {
        let seeded = generate_smart_defaults(Some("Burnaby"), None);
        assert_eq!(seeded.property_info.property_value, 1_100_000);
        assert_eq!(seeded.property_info.down_payment, 220_000);
        assert_eq!(seeded.financial_info.annual_income, 75_000);
        assert_eq!(seeded.financial_info.monthly_debts, 1_563);
        assert_eq!(seeded.loan_details.property_type, Some(PropertyType::Condo));
        assert_eq!(seeded.current_step, StepPosition::FIRST);
    }

    #[test]
    fn unknown_location_uses_province_average() {
        let seeded = generate_smart_defaults(None, None);
        assert_eq!(seeded.property_info.property_value, 750_000);
        assert_eq!(seeded.financial_info.monthly_debts, 1_354);
        assert_eq!(
            seeded.loan_details.property_type,
            Some(PropertyType::SingleFamily)
        );
    }

    #[test]
    fn preferences_override_only_what_they_set() {
        let preferences = FormDataPatch {
            loan_details: Some(LoanDetails {
                credit_score: Some(CreditScoreBracket::Excellent),
                ..LoanDetails::default()
            }),
            personal_info: Some(PersonalInfo {
                first_name: "Kai".to_string(),
                ..PersonalInfo::default()
            }),
            current_step: Some(StepPosition::base(3)),
            ..FormDataPatch::default()
        };

        let seeded = generate_smart_defaults(Some("Surrey"), Some(preferences));
        assert_eq!(
            seeded.loan_details.credit_score,
            Some(CreditScoreBracket::Excellent)
        );
        assert_eq!(
            seeded.loan_details.loan_purpose,
            Some(LoanPurpose::HomeImprovement)
        );
        assert_eq!(seeded.property_info.property_value, 950_000);
        assert_eq!(seeded.personal_info.first_name, "Kai");
        assert_eq!(seeded.current_step, StepPosition::base(3));
    }

    #[test]
    fn recommendations_quote_local_figures() {
        let advice = location_recommendations(Some("Richmond"));
        assert_eq!(advice.message, "Based on Richmond market data:");
        assert_eq!(advice.recommendations[1].value, "$260,000");
        assert_eq!(advice.recommendations[1].description, "20% of home value");
        assert_eq!(
            advice.recommendations[2].value,
            "Single Family, Townhouse"
        );
        assert_eq!(advice.recommendations[3].value, "$80,000+");
    }
}
