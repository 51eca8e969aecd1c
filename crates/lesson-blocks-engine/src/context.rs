use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

pub const TOKEN_KEY: &str = "token";
pub const PROFILE_KEY: &str = "userProfile";

const TEACHER_ROLES: [&str; 2] = ["TEACHER", "ROLE_TEACHER"];

/// String key-value storage holding the auth token and cached profile
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Cached profile of the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Identity and credentials, passed explicitly to anything that needs them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    token: Option<String>,
    profile: Option<UserProfile>,
}

impl SessionContext {
    pub fn new(token: Option<String>, profile: Option<UserProfile>) -> Self {
        Self { token, profile }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Read the token and cached profile. A corrupt cached profile is
    /// treated as absent.
    pub fn from_store(store: &dyn KeyValueStore) -> Self {
        let token = store.get(TOKEN_KEY).filter(|t| !t.is_empty());
        let profile = store.get(PROFILE_KEY).and_then(|json| {
            serde_json::from_str::<UserProfile>(&json)
                .inspect_err(|e| debug!("Ignoring cached profile: {e}"))
                .ok()
        });
        Self { token, profile }
    }

    /// Persist this context's token and profile
    pub fn store(&self, store: &mut dyn KeyValueStore) -> Result<(), serde_json::Error> {
        match &self.token {
            Some(token) => store.set(TOKEN_KEY, token.clone()),
            None => store.remove(TOKEN_KEY),
        }
        match &self.profile {
            Some(profile) => store.set(PROFILE_KEY, serde_json::to_string(profile)?),
            None => store.remove(PROFILE_KEY),
        }
        Ok(())
    }

    /// Forget the credentials here and in `store`
    pub fn logout(&mut self, store: &mut dyn KeyValueStore) {
        store.remove(TOKEN_KEY);
        store.remove(PROFILE_KEY);
        self.token = None;
        self.profile = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_teacher(&self) -> bool {
        self.is_authenticated()
            && self
                .profile
                .as_ref()
                .and_then(|p| p.role.as_deref())
                .is_some_and(|role| TEACHER_ROLES.contains(&role))
    }

    /// Value for an `Authorization` header
    pub fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    pub fn display_name(&self) -> &str {
        self.first_name().unwrap_or("User")
    }

    /// Avatar initial
    pub fn initial(&self) -> char {
        self.first_name()
            .and_then(|name| name.chars().next())
            .unwrap_or('U')
    }

    fn first_name(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|p| p.first_name.as_deref())
            .filter(|name| !name.is_empty())
    }
}
