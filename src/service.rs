//! Data service used by the landing page and the admin console.
//!
//! Wraps a [`DocumentStore`] and an [`AuthProvider`]: live and one-shot
//! reads of listings and leads, admin sign-in with the `admins/{uid}`
//! membership check, and every write the console performs.

use chrono::Utc;
use serde_json::{json, Map, Value};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::analytics::{track, AnalyticsEvent};
use crate::auth::{AuthProvider, AuthSession};
use crate::catalog::{group_by_category, reorder_positions, PropertiesByCategory};
use crate::forms::LeadForm;
use crate::mapping::{
    decode_leads, decode_properties, decode_property, lead_fields, listing_fields, Decoded,
};
use crate::models::{Lead, Listing, Property, StatusCategory, User, UserRole};
use crate::store::{
    new_document_id, Direction, Document, DocumentStore, Fields, Query, Snapshot, Subscription,
    Write, ADMINS, LEADS, PROPERTIES,
};
use crate::{Error, Result};

/// Which listings a reader may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Anonymous visitors: published listings only
    Public,
    /// Signed-in administrators: everything
    Admin,
}

/// Decoded state of a live feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedState<T> {
    Loading,
    Ready(Decoded<T>),
    Failed(String),
}

impl<T> FeedState<T> {
    pub fn records(&self) -> &[T] {
        match self {
            Self::Ready(decoded) => &decoded.records,
            _ => &[],
        }
    }
}

impl FeedState<Property> {
    pub fn by_category(&self) -> PropertiesByCategory {
        group_by_category(self.records())
    }
}

/// Typed view over a [`Subscription`]; dropping it ends the subscription
pub struct Feed<T> {
    subscription: Subscription,
    decode: fn(&[Document]) -> Decoded<T>,
}

pub type PropertyFeed = Feed<Property>;
pub type LeadFeed = Feed<Lead>;

impl<T> Feed<T> {
    fn decode_snapshot(&self, snapshot: Snapshot) -> FeedState<T> {
        match snapshot {
            Snapshot::Loading => FeedState::Loading,
            Snapshot::Ready(docs) => FeedState::Ready((self.decode)(&docs)),
            Snapshot::Failed(message) => FeedState::Failed(message),
        }
    }

    pub fn current(&self) -> FeedState<T> {
        self.decode_snapshot(self.subscription.current())
    }

    /// Wait for the next update. Returns `false` once the feed has ended.
    pub async fn changed(&mut self) -> bool {
        self.subscription.changed().await
    }

    /// Wait until the first result (or failure) has arrived
    pub async fn ready(&mut self) -> FeedState<T> {
        let snapshot = self.subscription.ready().await;
        self.decode_snapshot(snapshot)
    }
}

struct AdminSession {
    auth: AuthSession,
    user: User,
}

pub struct DataService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
    session: RwLock<Option<AdminSession>>,
    poll_interval: Duration,
}

impl DataService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        poll_interval: Duration,
    ) -> Self {
        info!(
            "Data service using {} store and {} auth",
            store.backend_name(),
            auth.provider_name()
        );
        Self {
            store,
            auth,
            session: RwLock::new(None),
            poll_interval,
        }
    }

    // ---- session ----

    /// Sign in and confirm the account is listed under `admins/{uid}`
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let session = self.auth.sign_in(email, password).await?;
        self.store.set_id_token(Some(session.id_token.clone()));

        let record = match self.store.get(ADMINS, &session.uid).await {
            Ok(record) => record,
            Err(e) => {
                self.store.set_id_token(None);
                return Err(e);
            }
        };

        let Some(record) = record else {
            self.store.set_id_token(None);
            warn!("Sign-in for {} has no admin record", session.email);
            return Err(Error::NotAdmin(session.email));
        };

        let user = User {
            uid: session.uid.clone(),
            email: session.email.clone(),
            role: UserRole::from_record(record.get_str("role")),
            display_name: session.display_name.clone(),
            created_at: Utc::now(),
        };
        info!("🔑 Signed in {} as {:?}", user.email, user.role);

        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(AdminSession {
            auth: session,
            user: user.clone(),
        });
        Ok(user)
    }

    pub async fn logout(&self) -> Result<()> {
        let session = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.store.set_id_token(None);

        if let Some(session) = session {
            self.auth.sign_out(&session.auth).await?;
            info!("Signed out {}", session.user.email);
        }
        Ok(())
    }

    /// Signed-in user, if the session has not expired.
    ///
    /// An expired session is dropped along with the store credentials, so
    /// later reads go out anonymously.
    pub fn current_user(&self) -> Option<User> {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);

        if session.as_ref().map_or(false, |s| s.auth.is_expired()) {
            if let Some(expired) = session.take() {
                info!("Session of {} expired", expired.user.email);
            }
            self.store.set_id_token(None);
        }

        session.as_ref().map(|s| s.user.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().map_or(false, |u| u.can_administer())
    }

    fn require_admin(&self) -> Result<User> {
        self.current_user()
            .filter(User::can_administer)
            .ok_or(Error::NotAuthorized)
    }

    // ---- reads ----

    pub fn properties_query(audience: Audience) -> Query {
        let query = match audience {
            Audience::Public => Query::collection(PROPERTIES).where_eq("isPublished", true),
            Audience::Admin => Query::collection(PROPERTIES),
        };
        query
            .order_by("statusCategory", Direction::Ascending)
            .order_by("order", Direction::Ascending)
    }

    pub fn leads_query() -> Query {
        Query::collection(LEADS).order_by("createdAt", Direction::Descending)
    }

    fn check_audience(&self, audience: Audience) -> Result<()> {
        if audience == Audience::Admin {
            self.require_admin()?;
        }
        Ok(())
    }

    /// Follow listings live; must be called inside a tokio runtime
    pub fn watch_properties(&self, audience: Audience) -> Result<PropertyFeed> {
        self.check_audience(audience)?;
        Ok(Feed {
            subscription: Subscription::spawn(
                self.store.clone(),
                Self::properties_query(audience),
                self.poll_interval,
            ),
            decode: decode_properties,
        })
    }

    pub async fn fetch_properties(&self, audience: Audience) -> Result<Decoded<Property>> {
        self.check_audience(audience)?;
        let docs = self.store.run_query(&Self::properties_query(audience)).await?;
        debug!("Fetched {} property documents", docs.len());
        Ok(decode_properties(&docs))
    }

    /// Published listings grouped into the landing-page sections
    pub async fn fetch_catalog(&self) -> Result<PropertiesByCategory> {
        let decoded = self.fetch_properties(Audience::Public).await?;
        Ok(group_by_category(&decoded.records))
    }

    pub async fn get_property(&self, id: &str) -> Result<Property> {
        let doc = self
            .store
            .get(PROPERTIES, id)
            .await?
            .ok_or_else(|| Error::NotFound {
                collection: PROPERTIES.to_string(),
                id: id.to_string(),
            })?;

        decode_property(&doc).map_err(|rejected| Error::Decode {
            id: id.to_string(),
            reason: rejected.to_string(),
        })
    }

    pub fn watch_leads(&self) -> Result<LeadFeed> {
        self.require_admin()?;
        Ok(Feed {
            subscription: Subscription::spawn(
                self.store.clone(),
                Self::leads_query(),
                self.poll_interval,
            ),
            decode: decode_leads,
        })
    }

    pub async fn fetch_leads(&self) -> Result<Decoded<Lead>> {
        self.require_admin()?;
        let docs = self.store.run_query(&Self::leads_query()).await?;
        Ok(decode_leads(&docs))
    }

    // ---- admin writes ----

    /// Create a listing and return its id
    pub async fn add_property(&self, listing: &Listing) -> Result<String> {
        self.require_admin()?;

        let id = new_document_id();
        let write = Write::create(PROPERTIES, &id, listing_fields(listing)?)
            .with_server_timestamp("createdAt")
            .with_server_timestamp("updatedAt");
        self.store.commit(vec![write]).await?;

        info!("➕ Added property {} ({})", listing.project_name, id);
        Ok(id)
    }

    pub async fn update_property(&self, id: &str, listing: &Listing) -> Result<()> {
        self.require_admin()?;

        let write = Write::update(PROPERTIES, id, listing_fields(listing)?)
            .with_server_timestamp("updatedAt");
        self.store.commit(vec![write]).await?;

        info!("✏️  Updated property {}", id);
        Ok(())
    }

    pub async fn set_published(&self, id: &str, published: bool) -> Result<()> {
        self.require_admin()?;

        let mut fields = Fields::new();
        fields.insert("isPublished".to_string(), Value::Bool(published));
        let write = Write::update(PROPERTIES, id, fields).with_server_timestamp("updatedAt");
        self.store.commit(vec![write]).await?;

        info!("Property {} published: {}", id, published);
        Ok(())
    }

    /// Flip the published flag; returns the new value
    pub async fn toggle_publish(&self, id: &str) -> Result<bool> {
        self.require_admin()?;

        let published = !self.get_property(id).await?.is_published();
        self.set_published(id, published).await?;
        Ok(published)
    }

    pub async fn delete_property(&self, id: &str) -> Result<()> {
        self.require_admin()?;

        self.store.commit(vec![Write::delete(PROPERTIES, id)]).await?;
        info!("🗑️  Deleted property {}", id);
        Ok(())
    }

    /// Persist a new order for one category: each id takes its index
    pub async fn reorder_properties(
        &self,
        category: StatusCategory,
        ordered_ids: &[String],
    ) -> Result<()> {
        self.require_admin()?;

        let writes: Vec<Write> = reorder_positions(ordered_ids)
            .into_iter()
            .map(|(id, position)| {
                let mut fields = Fields::new();
                fields.insert("order".to_string(), json!(position));
                Write::update(PROPERTIES, id, fields).with_server_timestamp("updatedAt")
            })
            .collect();

        if writes.is_empty() {
            return Ok(());
        }
        self.store.commit(writes).await?;

        info!("Reordered {} listings in {}", ordered_ids.len(), category);
        Ok(())
    }

    // ---- public writes ----

    /// Validate and store a contact request; returns the new lead id
    pub async fn submit_lead(&self, form: &LeadForm) -> Result<String> {
        let submission = form.to_submission()?;

        let id = new_document_id();
        let write = Write::create(LEADS, &id, lead_fields(&submission)?)
            .with_server_timestamp("createdAt");
        self.store.commit(vec![write]).await?;

        let mut properties = Map::new();
        if let Some(category) = submission.preferred_category {
            properties.insert("preferredCategory".to_string(), json!(category));
        }
        if let Some(goal) = submission.goal {
            properties.insert("goal".to_string(), json!(goal));
        }
        track(AnalyticsEvent::FormSubmit, properties);

        info!("📨 Stored lead {}", id);
        Ok(id)
    }
}
