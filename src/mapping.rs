//! Conversion between stored documents and the typed models.
//!
//! Documents that cannot become a model are never dropped silently: each
//! one is logged and returned in [`Decoded::rejected`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::warn;

use crate::models::{Lead, LeadSubmission, Listing, Property, StatusCategory};
use crate::store::{Document, Fields};
use crate::{Error, Result};

/// Why a stored document was left out of a typed collection
#[derive(Debug, Clone, PartialEq)]
pub enum Rejected {
    /// `statusCategory` is not one of the three known values
    UnknownCategory { id: String, value: Value },
    Malformed { id: String, reason: String },
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCategory { id, value } => {
                write!(f, "{}: unknown status category {}", id, value)
            }
            Self::Malformed { id, reason } => write!(f, "{}: {}", id, reason),
        }
    }
}

/// Typed records plus the documents that did not convert
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    pub rejected: Vec<Rejected>,
}

impl<T> Default for Decoded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

fn decode_with_id<T: DeserializeOwned>(doc: &Document) -> std::result::Result<T, String> {
    let mut fields = doc.fields.clone();
    fields.insert("id".to_string(), Value::String(doc.id.clone()));
    serde_json::from_value(Value::Object(fields)).map_err(|e| e.to_string())
}

fn check_category(doc: &Document) -> std::result::Result<(), Rejected> {
    let value = doc.fields.get("statusCategory").cloned().unwrap_or(Value::Null);
    let known = value
        .as_str()
        .map_or(false, |s| s.parse::<StatusCategory>().is_ok());

    if known {
        Ok(())
    } else {
        Err(Rejected::UnknownCategory {
            id: doc.id.clone(),
            value,
        })
    }
}

pub fn decode_property(doc: &Document) -> std::result::Result<Property, Rejected> {
    check_category(doc)?;
    decode_with_id(doc).map_err(|reason| Rejected::Malformed {
        id: doc.id.clone(),
        reason,
    })
}

pub fn decode_lead(doc: &Document) -> std::result::Result<Lead, Rejected> {
    decode_with_id(doc).map_err(|reason| Rejected::Malformed {
        id: doc.id.clone(),
        reason,
    })
}

fn decode_all<T>(
    docs: &[Document],
    kind: &str,
    decode: impl Fn(&Document) -> std::result::Result<T, Rejected>,
) -> Decoded<T> {
    let mut decoded = Decoded::default();
    for doc in docs {
        match decode(doc) {
            Ok(record) => decoded.records.push(record),
            Err(rejected) => {
                warn!("Skipping {} {}", kind, rejected);
                decoded.rejected.push(rejected);
            }
        }
    }
    decoded
}

pub fn decode_properties(docs: &[Document]) -> Decoded<Property> {
    decode_all(docs, "property", decode_property)
}

pub fn decode_leads(docs: &[Document]) -> Decoded<Lead> {
    decode_all(docs, "lead", decode_lead)
}

fn to_fields<T: Serialize>(value: &T, id: &str) -> Result<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(Error::Decode {
            id: id.to_string(),
            reason: format!("expected an object, got {}", other),
        }),
    }
}

pub fn listing_fields(listing: &Listing) -> Result<Fields> {
    to_fields(listing, &listing.project_name)
}

pub fn lead_fields(submission: &LeadSubmission) -> Result<Fields> {
    to_fields(submission, &submission.name)
}
