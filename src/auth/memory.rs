use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;

use crate::auth::{AuthProvider, AuthSession};
use crate::{Error, Result};

struct Account {
    uid: String,
    password: String,
    display_name: Option<String>,
}

/// Fixed set of email/password accounts, for demos and tests
#[derive(Default)]
pub struct MemoryAuth {
    accounts: HashMap<String, Account>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, email: &str, password: &str, uid: &str) -> Self {
        self.accounts.insert(
            email.to_lowercase(),
            Account {
                uid: uid.to_string(),
                password: password.to_string(),
                display_name: None,
            },
        );
        self
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let account = self
            .accounts
            .get(&email.to_lowercase())
            .filter(|a| a.password == password)
            .ok_or(Error::InvalidCredentials)?;

        Ok(AuthSession {
            uid: account.uid.clone(),
            email: email.to_string(),
            display_name: account.display_name.clone(),
            id_token: format!("memory-token-{}", account.uid),
            expires_at: Utc::now() + Duration::hours(1),
        })
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in() {
        let auth = MemoryAuth::new().with_account("Admin@Phuket.pl", "secret", "uid-1");

        let session = auth.sign_in("admin@phuket.pl", "secret").await.unwrap();
        assert_eq!(session.uid, "uid-1");

        assert!(matches!(
            auth.sign_in("admin@phuket.pl", "wrong").await,
            Err(Error::InvalidCredentials)
        ));
    }
}
