use std::collections::BTreeMap;
use std::sync::RwLock;

/// Fixed key under which the bearer token is stored client-side.
pub const TOKEN_KEY: &str = "token";

/// Source of the bearer token sent on authorized requests. Injected so the
/// workflows stay testable without a real storage backend.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// In-memory stand-in for the client's persistent key-value storage. The
/// bearer token lives under [`TOKEN_KEY`].
#[derive(Default)]
pub struct TokenStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let values = match self.values.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut values = match self.values.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        let mut values = match self.values.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.remove(key);
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.set(TOKEN_KEY, token);
    }

    pub fn clear_token(&self) {
        self.remove(TOKEN_KEY);
    }
}

impl CredentialProvider for TokenStore {
    fn bearer_token(&self) -> Option<String> {
        self.get(TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_store_roundtrip() {
        let store = TokenStore::new();
        assert_eq!(store.bearer_token(), None);

        store.set_token("abc.def.ghi");
        assert_eq!(store.bearer_token().as_deref(), Some("abc.def.ghi"));

        store.clear_token();
        assert_eq!(store.bearer_token(), None);
    }
}
