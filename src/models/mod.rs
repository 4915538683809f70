pub mod lead;
pub mod property;
pub mod user;

pub use lead::{
    Horizon, InvestmentGoal, Lead, LeadSubmission, RiskProfile, DEFAULT_LEAD_SOURCE,
};
pub use property::{
    DocumentLink, GeoPoint, Listing, OwnershipType, Property, PropertyType, StatusCategory,
    TransparencyInfo, UnitType, UnknownCategory,
};
pub use user::{User, UserRole};
