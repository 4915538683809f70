use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Availability bucket a listing is shown under
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusCategory {
    /// Completed, can be handed over immediately
    #[serde(rename = "READY")]
    Ready,
    /// Off-plan, completing in 2026
    #[serde(rename = "2026")]
    Y2026,
    /// Off-plan, completing in 2027
    #[serde(rename = "2027")]
    Y2027,
}

impl StatusCategory {
    /// Display order on the landing page
    pub const ALL: [StatusCategory; 3] = [Self::Ready, Self::Y2026, Self::Y2027];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Y2026 => "2026",
            Self::Y2027 => "2027",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored category string is none of the known literals
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status category: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for StatusCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "READY" => Ok(Self::Ready),
            "2026" => Ok(Self::Y2026),
            "2027" => Ok(Self::Y2027),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyType {
    Condo,
    Villa,
}

/// Thai ownership form, carried as an opaque label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OwnershipType {
    Freehold,
    Leasehold,
    Mixed,
}

/// One unit layout offered within a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnitType {
    pub name: String,
    pub size_sqm_from: f64,
    pub size_sqm_to: f64,
    #[serde(rename = "priceFromTHB")]
    pub price_from_thb: f64,
    #[serde(rename = "priceFromEUR")]
    pub price_from_eur: f64,
}

/// Downloadable document attached to a listing (brochure, price list)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentLink {
    pub title: String,
    pub url: String,
}

/// Running-cost disclosure shown in the property modal
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransparencyInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cam_per_sqm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sinking_fund: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Everything an administrator edits on a listing.
///
/// This is the persisted shape without identity or server-managed
/// timestamps; [`Property`] wraps it with those.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub status_category: StatusCategory,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub area: String,
    pub property_type: PropertyType,
    #[serde(default)]
    pub unit_types: Vec<UnitType>,
    #[serde(default)]
    pub size_sqm_from: f64,
    #[serde(default)]
    pub size_sqm_to: f64,
    #[serde(default, rename = "priceFromTHB")]
    pub price_from_thb: f64,
    #[serde(default, rename = "priceFromEUR")]
    pub price_from_eur: f64,
    pub ownership: OwnershipType,
    /// `YYYY-MM`, or `None` when the unit is available now
    #[serde(default)]
    pub completion: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub transparency: Option<TransparencyInfo>,
    #[serde(default)]
    pub operator_model: Option<String>,
    #[serde(default)]
    pub docs: Vec<DocumentLink>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub is_published: bool,
    /// Position within the category, ascending
    #[serde(default)]
    pub order: i64,
}

/// Core property data model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    #[serde(flatten)]
    pub listing: Listing,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn category(&self) -> StatusCategory {
        self.listing.status_category
    }

    pub fn order(&self) -> i64 {
        self.listing.order
    }

    pub fn is_published(&self) -> bool {
        self.listing.is_published
    }

    /// Listings without a completion date are handed over immediately
    pub fn is_available_now(&self) -> bool {
        self.listing.completion.is_none()
    }
}
