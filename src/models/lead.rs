use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StatusCategory;

/// Source tag written when a submission does not name one
pub const DEFAULT_LEAD_SOURCE: &str = "website";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestmentGoal {
    RentalIncome,
    CapitalGrowth,
    PersonalUse,
    Mixed,
}

/// Planned holding horizon in years
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Horizon {
    #[serde(rename = "1-3")]
    OneToThree,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "5-10")]
    FiveToTen,
    #[serde(rename = "10+")]
    TenPlus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

fn default_source() -> String {
    DEFAULT_LEAD_SOURCE.to_string()
}

/// Contact-form payload as written to the `leads` collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<InvestmentGoal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon: Option<Horizon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_category: Option<StatusCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_profile: Option<RiskProfile>,
    /// Data-processing consent (RODO / GDPR)
    #[serde(default)]
    pub dsgvo_consent: bool,
    #[serde(default)]
    pub marketing_consent: bool,
    #[serde(default = "default_source")]
    pub source: String,
}

/// A stored contact request, read-only for administrators
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    #[serde(flatten)]
    pub submission: LeadSubmission,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
