pub mod value;

use anyhow::Context;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::FirebaseConfig;
use crate::store::{Direction, Document, DocumentStore, Query, Write, WriteOp};
use crate::{Error, Result};

const FIRESTORE_API: &str = "https://firestore.googleapis.com/v1";

lazy_static! {
    static ref SIMPLE_FIELD: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Cloud Firestore over its REST API.
///
/// Reads and writes go out as the signed-in user once an id token has been
/// set, anonymously otherwise; security rules on the project decide what
/// each may see.
pub struct FirestoreStore {
    client: Client,
    api_key: String,
    project_id: String,
    id_token: RwLock<Option<String>>,
}

impl FirestoreStore {
    /// Create a store client for the configured project
    pub fn new(config: &FirebaseConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("phuket-invest/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            project_id: config.project_id.clone(),
            id_token: RwLock::new(None),
        })
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.database_path(), collection, id)
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{}{}", FIRESTORE_API, self.database_path(), suffix)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.query(&[("key", self.api_key.as_str())]);
        let token = self.id_token.read().ok().and_then(|t| t.clone());
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or(body);
        warn!("Firestore returned status: {}", status);
        Err(Error::Backend {
            status: status.as_u16(),
            message,
        })
    }

    /// Build a `Document` from the REST representation
    fn decode_document(raw: &Value) -> Result<Document> {
        let name = raw["name"].as_str().unwrap_or_default();
        let id = name.rsplit('/').next().unwrap_or_default().to_string();

        let fields = match raw.get("fields") {
            Some(fields) => value::decode_fields(fields).map_err(|reason| Error::Decode {
                id: id.clone(),
                reason,
            })?,
            None => Default::default(),
        };

        Ok(Document { id, fields })
    }

    /// `structuredQuery` body for `runQuery`
    pub fn structured_query(query: &Query) -> Value {
        let mut structured = json!({
            "from": [{ "collectionId": query.collection }],
        });

        let filters: Vec<Value> = query
            .filters
            .iter()
            .map(|(field, expected)| {
                json!({
                    "fieldFilter": {
                        "field": { "fieldPath": field_path(field) },
                        "op": "EQUAL",
                        "value": value::encode(expected),
                    }
                })
            })
            .collect();

        match filters.len() {
            0 => {}
            1 => structured["where"] = filters[0].clone(),
            _ => {
                structured["where"] = json!({
                    "compositeFilter": { "op": "AND", "filters": filters }
                })
            }
        }

        if !query.order_by.is_empty() {
            let order: Vec<Value> = query
                .order_by
                .iter()
                .map(|(field, direction)| {
                    json!({
                        "field": { "fieldPath": field_path(field) },
                        "direction": match direction {
                            Direction::Ascending => "ASCENDING",
                            Direction::Descending => "DESCENDING",
                        },
                    })
                })
                .collect();
            structured["orderBy"] = Value::Array(order);
        }

        json!({ "structuredQuery": structured })
    }

    /// One entry of the `commit` request's `writes` array
    pub fn encode_write(&self, write: &Write) -> Value {
        let name = self.document_name(&write.collection, &write.id);

        let mut encoded = match &write.op {
            WriteOp::Create(fields) => json!({
                "update": { "name": name, "fields": value::encode_fields(fields) },
                "currentDocument": { "exists": false },
            }),
            WriteOp::Update(fields) => {
                let paths: Vec<String> = fields.keys().map(|k| field_path(k)).collect();
                json!({
                    "update": { "name": name, "fields": value::encode_fields(fields) },
                    "updateMask": { "fieldPaths": paths },
                    "currentDocument": { "exists": true },
                })
            }
            WriteOp::Delete => json!({ "delete": name }),
        };

        if !write.server_timestamps.is_empty() && write.op != WriteOp::Delete {
            let transforms: Vec<Value> = write
                .server_timestamps
                .iter()
                .map(|field| {
                    json!({ "fieldPath": field_path(field), "setToServerValue": "REQUEST_TIME" })
                })
                .collect();
            encoded["updateTransforms"] = Value::Array(transforms);
        }

        encoded
    }
}

/// Quote field names that are not plain identifiers
fn field_path(field: &str) -> String {
    if SIMPLE_FIELD.is_match(field) {
        field.to_string()
    } else {
        format!("`{}`", field.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let url = format!("{}/{}", FIRESTORE_API, self.document_name(collection, id));
        debug!("Fetching document {}/{}", collection, id);

        let response = self.authorize(self.client.get(&url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let raw: Value = Self::check(response).await?.json().await?;
        Self::decode_document(&raw).map(Some)
    }

    async fn run_query(&self, query: &Query) -> Result<Vec<Document>> {
        let body = Self::structured_query(query);
        debug!("Running query on {}", query.collection);

        let response = self
            .authorize(self.client.post(self.url(":runQuery")))
            .json(&body)
            .send()
            .await?;
        let rows: Vec<Value> = Self::check(response).await?.json().await?;

        // Rows without a document only carry a read time
        rows.iter()
            .filter_map(|row| row.get("document"))
            .map(Self::decode_document)
            .collect()
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<()> {
        let encoded: Vec<Value> = writes.iter().map(|w| self.encode_write(w)).collect();

        let response = self
            .authorize(self.client.post(self.url(":commit")))
            .json(&json!({ "writes": encoded }))
            .send()
            .await?;
        Self::check(response).await?;

        info!("Committed {} writes to Firestore", writes.len());
        Ok(())
    }

    fn set_id_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.id_token.write() {
            *slot = token;
        }
    }

    fn backend_name(&self) -> &'static str {
        "firestore"
    }
}
