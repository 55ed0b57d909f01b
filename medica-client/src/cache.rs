//! Offline cache of the signed-in user's profile.
//!
//! Denormalized copies of server fields, stored one key per field in the
//! session store so they can be shown before the first round-trip (or with
//! no connectivity). Never a source of truth: every successful profile
//! fetch/update overwrites them, and logout clears them wholesale.

use std::fmt;
use std::sync::Arc;

use medica_model::user::{UserProfile, UserRecord};

use crate::store::{TokenStore, keys};

/// Per-field profile cache over the injected session store.
#[derive(Clone)]
pub struct ProfileCache {
    store: Arc<dyn TokenStore>,
}

impl fmt::Debug for ProfileCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileCache")
            .field("has_identity", &self.store.get(keys::USER_ID).is_some())
            .finish()
    }
}

/// Snapshot of whatever profile fields are currently cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedProfile {
    pub id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone: Option<String>,
    pub blood_group: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub position: Option<String>,
}

impl ProfileCache {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Caches the identity fields returned by login/registration.
    pub fn remember_identity(&self, id: &str, email: &str) {
        self.store.set(keys::USER_ID, id);
        self.store.set(keys::EMAIL, email);
    }

    /// Overwrites the cache from a freshly fetched profile. Fields the
    /// server reports as absent are removed so no stale value survives.
    pub fn remember_profile(&self, profile: &UserProfile) {
        self.store.set(keys::USER_ID, &profile.id);
        self.store.set(keys::EMAIL, &profile.email);
        self.put(keys::FIRST_NAME, profile.first_name.as_deref());
        self.put(keys::LAST_NAME, profile.last_name.as_deref());
        self.put(keys::MIDDLE_NAME, profile.middle_name.as_deref());
        self.put(keys::PHONE, profile.phone.as_deref());
        self.put(keys::BLOOD_GROUP, profile.blood_group.as_deref());
        self.put(keys::BIRTH_DATE, profile.birth_date.as_deref());
        self.put(keys::GENDER, profile.gender.as_deref());
        self.put(keys::POSITION, profile.position.as_deref());
    }

    /// Refreshes the core fields echoed back by an update mutation.
    pub fn remember_record(&self, record: &UserRecord) {
        self.store.set(keys::USER_ID, &record.id);
        self.store.set(keys::EMAIL, &record.email);
        self.put(keys::FIRST_NAME, record.first_name.as_deref());
        self.put(keys::LAST_NAME, record.last_name.as_deref());
        self.put(keys::MIDDLE_NAME, record.middle_name.as_deref());
        self.put(keys::PHONE, record.phone.as_deref());
    }

    /// Updates the cached email after a successful address change.
    pub fn remember_email(&self, email: &str) {
        self.store.set(keys::EMAIL, email);
    }

    pub fn load(&self) -> CachedProfile {
        CachedProfile {
            id: self.store.get(keys::USER_ID),
            email: self.store.get(keys::EMAIL),
            first_name: self.store.get(keys::FIRST_NAME),
            last_name: self.store.get(keys::LAST_NAME),
            middle_name: self.store.get(keys::MIDDLE_NAME),
            phone: self.store.get(keys::PHONE),
            blood_group: self.store.get(keys::BLOOD_GROUP),
            birth_date: self.store.get(keys::BIRTH_DATE),
            gender: self.store.get(keys::GENDER),
            position: self.store.get(keys::POSITION),
        }
    }

    /// Removes every cached profile field.
    pub fn clear(&self) {
        for key in keys::PROFILE {
            self.store.delete(key);
        }
    }

    fn put(&self, key: &str, value: Option<&str>) {
        match value {
            Some(value) => self.store.set(key, value),
            None => self.store.delete(key),
        }
    }
}
