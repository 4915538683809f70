pub mod firestore;
pub mod memory;
pub mod query;
pub mod subscription;
pub mod traits;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use query::{compare_values, Direction, Query};
pub use subscription::{Snapshot, Subscription};
pub use traits::DocumentStore;

use serde_json::{Map, Value};

/// Field map of a stored document
pub type Fields = Map<String, Value>;

pub const PROPERTIES: &str = "properties";
pub const LEADS: &str = "leads";
pub const ADMINS: &str = "admins";

/// A document as read from a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }
}

/// Client-side document id, 20 alphanumeric characters like the
/// ids the hosted store assigns
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..20].to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Fails if the document exists
    Create(Fields),
    /// Merges the given fields; fails if the document is missing
    Update(Fields),
    Delete,
}

/// One mutation in an atomic batch
#[derive(Debug, Clone, PartialEq)]
pub struct Write {
    pub collection: String,
    pub id: String,
    pub op: WriteOp,
    /// Fields the backend sets to its own commit time
    pub server_timestamps: Vec<String>,
}

impl Write {
    pub fn create(collection: &str, id: &str, fields: Fields) -> Self {
        Self::new(collection, id, WriteOp::Create(fields))
    }

    pub fn update(collection: &str, id: &str, fields: Fields) -> Self {
        Self::new(collection, id, WriteOp::Update(fields))
    }

    pub fn delete(collection: &str, id: &str) -> Self {
        Self::new(collection, id, WriteOp::Delete)
    }

    fn new(collection: &str, id: &str, op: WriteOp) -> Self {
        Self {
            collection: collection.to_string(),
            id: id.to_string(),
            op,
            server_timestamps: Vec::new(),
        }
    }

    pub fn with_server_timestamp(mut self, field: &str) -> Self {
        self.server_timestamps.push(field.to_string());
        self
    }
}
