use std::fmt;

use serde::{Deserialize, Serialize};

use super::QualityFactors;
use crate::workflows::intake::FormData;

/// Letter grade of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => Grade::A,
            70..=84 => Grade::B,
            55..=69 => Grade::C,
            _ => Grade::D,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Priority::High,
            60..=79 => Priority::Medium,
            _ => Priority::Low,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactMethod {
    #[serde(rename = "Phone call")]
    PhoneCall,
    Email,
    #[serde(rename = "Text message")]
    TextMessage,
}

impl ContactMethod {
    pub const fn label(self) -> &'static str {
        match self {
            ContactMethod::PhoneCall => "Phone call",
            ContactMethod::Email => "Email",
            ContactMethod::TextMessage => "Text message",
        }
    }
}

/// When and how to reach the lead; four fixed tiers keyed on the composite score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpStrategy {
    pub timeframe: String,
    pub method: Vec<ContactMethod>,
    pub priority: u8,
}

impl FollowUpStrategy {
    pub fn for_score(score: u8) -> Self {
        let (timeframe, method, priority) = match score {
            85.. => (
                "Within 1 hour",
                vec![
                    ContactMethod::PhoneCall,
                    ContactMethod::Email,
                    ContactMethod::TextMessage,
                ],
                1,
            ),
            70..=84 => (
                "Within 4 hours",
                vec![ContactMethod::PhoneCall, ContactMethod::Email],
                2,
            ),
            55..=69 => (
                "Within 24 hours",
                vec![ContactMethod::Email, ContactMethod::PhoneCall],
                3,
            ),
            _ => ("Within 72 hours", vec![ContactMethod::Email], 4),
        };

        Self {
            timeframe: timeframe.to_string(),
            method,
            priority,
        }
    }
}

pub(crate) fn recommendations(answers: &FormData, factors: &QualityFactors) -> Vec<String> {
    let mut notes = Vec::new();

    if factors.creditworthiness < 70 {
        notes.push("Consider credit improvement consultation");
    }
    if factors.financial_stability < 60 {
        notes.push("May need additional income documentation");
    }
    if factors.urgency > 80 {
        notes.push("Prioritize immediate contact - hot lead");
    }
    if factors.loan_viability < 60 {
        notes.push("Review loan structure and down payment options");
    }
    if factors.contactability < 100 {
        notes.push("Obtain complete contact information");
    }

    if answers.down_payment_percent() < 20.0 {
        notes.push("Discuss mortgage insurance options");
    }
    if answers.is_self_employed() {
        notes.push("Prepare for additional documentation requirements");
    }
    if answers.property_info.first_time_home_buyer {
        notes.push("Present first-time buyer programs and incentives");
    }
    if answers
        .loan_details
        .credit_history
        .is_some_and(|history| !history.is_clean())
    {
        notes.push("Review past credit events and match with specialty lenders");
    }

    notes.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_and_priority_boundaries_are_inclusive_upward() {
        assert_eq!(Grade::from_score(84), Grade::B);
        assert_eq!(Grade::from_score(85), Grade::A);
        assert_eq!(Grade::from_score(55), Grade::C);
        assert_eq!(Grade::from_score(54), Grade::D);
        assert_eq!(Priority::from_score(80), Priority::High);
        assert_eq!(Priority::from_score(79), Priority::Medium);
        assert_eq!(Priority::from_score(59), Priority::Low);
    }

    #[test]
    fn follow_up_tiers_follow_the_composite() {
        assert_eq!(FollowUpStrategy::for_score(90).priority, 1);
        assert_eq!(FollowUpStrategy::for_score(70).timeframe, "Within 4 hours");
        assert_eq!(
            FollowUpStrategy::for_score(55).method,
            vec![ContactMethod::Email, ContactMethod::PhoneCall]
        );
        assert_eq!(FollowUpStrategy::for_score(12).priority, 4);
    }

    #[test]
    fn contact_methods_serialize_as_labels() {
        let json = serde_json::to_string(&FollowUpStrategy::for_score(99)).expect("serializes");
        assert!(json.contains("\"Phone call\""));
        assert!(json.contains("\"Text message\""));
    }
}
