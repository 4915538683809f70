//! # phuket-invest
//!
//! Domain core of a landing page for Polish investors in Phuket real
//! estate and its admin console.
//!
//! - [`calculator`]: low/high return scenarios for a purchase
//! - [`catalog`]: grouping listings into the READY / 2026 / 2027 sections
//! - [`format`]: Polish number, currency and date display
//! - [`forms`]: typed lead form and admin draft with validation
//! - [`store`], [`auth`], [`service`]: document store, sign-in and the
//!   data service built on top of them (Firestore + Identity Toolkit, or
//!   in-memory)

pub mod analytics;
pub mod auth;
pub mod calculator;
pub mod catalog;
pub mod config;
pub mod demo;
pub mod format;
pub mod forms;
pub mod mapping;
pub mod models;
pub mod service;
pub mod store;

pub use catalog::{group_by_category, PropertiesByCategory};
pub use config::{Config, FirebaseConfig};
pub use service::DataService;

use forms::{DraftError, LeadFormErrors};

/// Result type for phuket-invest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the data layer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("No admin access for {0}")]
    NotAdmin(String),

    #[error("Sign in as an administrator first")]
    NotAuthorized,

    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Document already exists: {collection}/{id}")]
    AlreadyExists { collection: String, id: String },

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed document {id}: {reason}")]
    Decode { id: String, reason: String },

    #[error("Invalid contact form: {0}")]
    InvalidLead(#[from] LeadFormErrors),

    #[error("Invalid property draft: {0}")]
    InvalidDraft(#[from] DraftError),
}
