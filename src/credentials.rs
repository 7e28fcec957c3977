use std::sync::Arc;

use crate::prefs::{PendingWrite, PreferenceStore};

pub const NAMESPACE: &str = "ApiKeyPrefs";
pub const KEY_API_KEY: &str = "GeminiApiKey";

/// Holds the single API credential used by the assistant features.
#[derive(Clone)]
pub struct CredentialStore {
    prefs: Arc<dyn PreferenceStore>,
}

impl CredentialStore {
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        Self { prefs }
    }

    /// Stores `secret` verbatim. The commit runs in the background; the
    /// returned handle can be dropped.
    pub fn save(&self, secret: &str) -> PendingWrite {
        tracing::info!(key = %redact(secret), "saving API key");
        self.prefs.put_string(NAMESPACE, KEY_API_KEY, secret)
    }

    /// `None` until the first `save`.
    pub fn get(&self) -> Option<String> {
        self.prefs.get_string(NAMESPACE, KEY_API_KEY)
    }

    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }
}

/// Masked form safe for logs and labels.
pub fn redact(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{JsonPrefs, MemoryPrefs};

    fn store() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryPrefs::new()))
    }

    #[test]
    fn unset_before_first_save() {
        let creds = store();
        assert_eq!(creds.get(), None);
        assert!(!creds.is_set());
    }

    #[test]
    fn save_then_get_round_trips() {
        let creds = store();
        creds.save("AIzaSyExampleKey");
        assert_eq!(creds.get().as_deref(), Some("AIzaSyExampleKey"));

        creds.save("replacement");
        assert_eq!(creds.get().as_deref(), Some("replacement"));
    }

    #[test]
    fn empty_string_is_distinct_from_unset() {
        let creds = store();
        creds.save("");
        assert_eq!(creds.get().as_deref(), Some(""));
        assert!(creds.is_set());
    }

    #[test]
    fn saved_key_is_durable() {
        let dir = tempfile::tempdir().unwrap();
        let creds = CredentialStore::new(Arc::new(JsonPrefs::open(dir.path())));
        creds.save("persisted-key").wait().unwrap();

        let reopened = CredentialStore::new(Arc::new(JsonPrefs::open(dir.path())));
        assert_eq!(reopened.get().as_deref(), Some("persisted-key"));
    }

    #[test]
    fn redact_hides_the_middle() {
        assert_eq!(redact("AIzaSyExampleKey"), "AIza…eKey");
        assert_eq!(redact("short"), "****");
        assert_eq!(redact("12345678"), "****");
        assert_eq!(redact(""), "****");
    }
}
