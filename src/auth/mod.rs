pub mod identity;
pub mod memory;

pub use identity::IdentityToolkitAuth;
pub use memory::MemoryAuth;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Result;

/// Signed-in account as reported by the auth provider
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Bearer token for document store requests
    pub id_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Common trait for email/password sign-in providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Tokens are bearer tokens, so most providers have nothing to revoke
    async fn sign_out(&self, _session: &AuthSession) -> Result<()> {
        Ok(())
    }

    /// Get the name of the provider
    fn provider_name(&self) -> &'static str;
}
