//! Persistent key-value session storage.
//!
//! The store holds the session credential pair plus the denormalized profile
//! fields cached for offline display. It is handed to the client as an
//! explicit dependency so the pipeline can be tested against an in-memory
//! implementation.

use medica_model::SessionCredentials;

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

/// Storage keys. The mobile clients used the backend's own field names as
/// keys; they are kept verbatim so cached state stays portable.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const REFRESH_TOKEN: &str = "refreshToken";

    pub const USER_ID: &str = "_id";
    pub const EMAIL: &str = "email";
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const MIDDLE_NAME: &str = "middleName";
    pub const PHONE: &str = "phone";
    pub const BLOOD_GROUP: &str = "bloodGroup";
    pub const BIRTH_DATE: &str = "birthDate";
    pub const GENDER: &str = "gender";
    pub const POSITION: &str = "position";

    /// Denormalized profile fields cached for offline display; cleared as a
    /// unit on logout.
    pub const PROFILE: [&str; 10] = [
        USER_ID,
        EMAIL,
        FIRST_NAME,
        LAST_NAME,
        MIDDLE_NAME,
        PHONE,
        BLOOD_GROUP,
        BIRTH_DATE,
        GENDER,
        POSITION,
    ];
}

/// String-keyed storage for session state.
///
/// Contract: a `get` right after a `set` on the same key observes the new
/// value, keys are independent (no multi-key transactions), and persistent
/// implementations survive process restarts. Absence of a key is a normal
/// state, not an error.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn delete(&self, key: &str);
}

/// Credential helpers layered over the raw key-value contract.
pub trait TokenStoreExt: TokenStore {
    fn access_token(&self) -> Option<String> {
        self.get(keys::ACCESS_TOKEN).filter(|t| !t.is_empty())
    }

    fn refresh_token(&self) -> Option<String> {
        self.get(keys::REFRESH_TOKEN).filter(|t| !t.is_empty())
    }

    /// Persists a rotated pair, overwriting the previous one.
    fn save_credentials(&self, credentials: &SessionCredentials) {
        self.set(keys::ACCESS_TOKEN, &credentials.access_token);
        self.set(keys::REFRESH_TOKEN, &credentials.refresh_token);
    }

    /// Removes the pair as a unit. A stale access token must never outlive
    /// its refresh token.
    fn clear_credentials(&self) {
        self.delete(keys::ACCESS_TOKEN);
        self.delete(keys::REFRESH_TOKEN);
    }
}

impl<S: TokenStore + ?Sized> TokenStoreExt for S {}
