use anyhow::Context;
use std::time::Duration;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

/// Web-app credentials of the Firebase project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: Option<String>,
    pub app_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` when the Firebase variables are incomplete
    pub firebase: Option<FirebaseConfig>,

    /// How often live queries re-read a backend that cannot push changes
    pub poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let firebase = match (
            var("FIREBASE_API_KEY"),
            var("FIREBASE_AUTH_DOMAIN"),
            var("FIREBASE_PROJECT_ID"),
            var("FIREBASE_STORAGE_BUCKET"),
            var("FIREBASE_APP_ID"),
        ) {
            (Some(api_key), Some(auth_domain), Some(project_id), Some(storage_bucket), Some(app_id)) => {
                Some(FirebaseConfig {
                    api_key,
                    auth_domain,
                    project_id,
                    storage_bucket,
                    messaging_sender_id: var("FIREBASE_MESSAGING_SENDER_ID"),
                    app_id,
                })
            }
            _ => None,
        };

        let poll_interval = match var("PHUKET_POLL_INTERVAL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .context("PHUKET_POLL_INTERVAL_SECS must be a whole number of seconds")?;
                Duration::from_secs(secs.max(1))
            }
            None => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };

        Ok(Config {
            firebase,
            poll_interval,
        })
    }

    pub fn is_firebase_configured(&self) -> bool {
        self.firebase.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_complete_firebase_config() {
        let config = Config::from_lookup(lookup(&[
            ("FIREBASE_API_KEY", "key"),
            ("FIREBASE_AUTH_DOMAIN", "phuket.firebaseapp.com"),
            ("FIREBASE_PROJECT_ID", "phuket"),
            ("FIREBASE_STORAGE_BUCKET", "phuket.appspot.com"),
            ("FIREBASE_APP_ID", "1:2:web:3"),
            ("PHUKET_POLL_INTERVAL_SECS", "5"),
        ]))
        .unwrap();

        let firebase = config.firebase.unwrap();
        assert_eq!(firebase.project_id, "phuket");
        assert_eq!(firebase.messaging_sender_id, None);
        assert_eq!(config.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_partial_config_is_not_configured() {
        let config = Config::from_lookup(lookup(&[
            ("FIREBASE_API_KEY", "key"),
            ("FIREBASE_PROJECT_ID", "phuket"),
            ("FIREBASE_APP_ID", ""),
        ]))
        .unwrap();

        assert!(!config.is_firebase_configured());
        assert_eq!(config.poll_interval, Duration::from_secs(15));
    }

    #[test]
    fn test_bad_poll_interval() {
        assert!(Config::from_lookup(lookup(&[("PHUKET_POLL_INTERVAL_SECS", "soon")])).is_err());
    }
}
