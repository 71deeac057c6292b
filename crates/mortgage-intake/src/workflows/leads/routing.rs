use serde::{Deserialize, Serialize};

use super::scoring::LeadScore;

/// Organizational tier a lead is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingTier {
    HighValue,
    Primary,
    Standard,
    Nurture,
}

impl RoutingTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => RoutingTier::HighValue,
            70..=84 => RoutingTier::Primary,
            55..=69 => RoutingTier::Standard,
            _ => RoutingTier::Nurture,
        }
    }

    pub const fn assign_to(self) -> &'static str {
        match self {
            RoutingTier::HighValue => "Senior Loan Officer",
            RoutingTier::Primary => "Experienced Loan Officer",
            RoutingTier::Standard => "Junior Loan Officer",
            RoutingTier::Nurture => "Lead Development Team",
        }
    }

    pub const fn team(self) -> &'static str {
        match self {
            RoutingTier::HighValue => "High-Value Team",
            RoutingTier::Primary => "Primary Team",
            RoutingTier::Standard => "Standard Team",
            RoutingTier::Nurture => "Nurture Team",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRouting {
    pub tier: RoutingTier,
    pub assign_to: String,
    pub team: String,
    pub special_handling: bool,
}

impl From<RoutingTier> for LeadRouting {
    fn from(tier: RoutingTier) -> Self {
        Self {
            tier,
            assign_to: tier.assign_to().to_string(),
            team: tier.team().to_string(),
            special_handling: tier == RoutingTier::HighValue,
        }
    }
}

pub fn get_lead_routing(score: &LeadScore) -> LeadRouting {
    RoutingTier::from_score(score.total_score).into()
}
