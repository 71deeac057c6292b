mod approval;
mod policy;
mod rules;

pub use policy::{ContactMethod, FollowUpStrategy, Grade, Priority};

use serde::{Deserialize, Serialize};

use crate::workflows::intake::FormData;

/// Stateless scorer turning a completed Answer Set into a lead assessment.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadScorer;

impl LeadScorer {
    pub fn score(&self, answers: &FormData) -> LeadScore {
        let (quality_factors, components) = rules::score_factors(answers);
        let total_score = quality_factors.composite();

        LeadScore {
            total_score,
            grade: Grade::from_score(total_score),
            priority: Priority::from_score(total_score),
            recommendations: policy::recommendations(answers, &quality_factors),
            follow_up_strategy: FollowUpStrategy::for_score(total_score),
            approval_probability: approval::approval_probability(answers),
            quality_factors,
            components,
        }
    }
}

/// Score an Answer Set. Missing answers fall back to neutral points, never errors.
pub fn calculate_lead_score(answers: &FormData) -> LeadScore {
    LeadScorer.score(answers)
}

/// The five sub-scores feeding the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QualityFactor {
    Creditworthiness,
    FinancialStability,
    Urgency,
    LoanViability,
    Contactability,
}

impl QualityFactor {
    /// Weight in percent; the five weights sum to 100.
    pub const fn weight(self) -> u32 {
        match self {
            QualityFactor::Creditworthiness | QualityFactor::FinancialStability => 25,
            QualityFactor::Urgency | QualityFactor::LoanViability => 20,
            QualityFactor::Contactability => 10,
        }
    }
}

/// Discrete contribution to a sub-score, kept for audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: QualityFactor,
    pub score: u8,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityFactors {
    pub creditworthiness: u8,
    pub financial_stability: u8,
    pub urgency: u8,
    pub loan_viability: u8,
    pub contactability: u8,
}

impl QualityFactors {
    pub fn get(&self, factor: QualityFactor) -> u8 {
        match factor {
            QualityFactor::Creditworthiness => self.creditworthiness,
            QualityFactor::FinancialStability => self.financial_stability,
            QualityFactor::Urgency => self.urgency,
            QualityFactor::LoanViability => self.loan_viability,
            QualityFactor::Contactability => self.contactability,
        }
    }

    /// Weighted composite rounded half up, computed in integer hundredths.
    pub fn composite(&self) -> u8 {
        let weighted: u32 = [
            QualityFactor::Creditworthiness,
            QualityFactor::FinancialStability,
            QualityFactor::Urgency,
            QualityFactor::LoanViability,
            QualityFactor::Contactability,
        ]
        .into_iter()
        .map(|factor| u32::from(self.get(factor)) * factor.weight())
        .sum();
        ((weighted + 50) / 100).min(100) as u8
    }
}

/// Derived lead assessment. Never mutated after scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadScore {
    pub total_score: u8,
    pub grade: Grade,
    pub priority: Priority,
    pub quality_factors: QualityFactors,
    pub recommendations: Vec<String>,
    pub follow_up_strategy: FollowUpStrategy,
    pub approval_probability: u8,
    pub components: Vec<ScoreComponent>,
}
