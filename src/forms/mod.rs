pub mod lead_form;
pub mod property_draft;

pub use lead_form::{LeadField, LeadFieldError, LeadForm, LeadFormErrors, LANDING_PAGE_SOURCE};
pub use property_draft::{DraftError, PropertyDraft};
