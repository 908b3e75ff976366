//! Local persistence.

mod sqlite;

use crate::error::StoreError;
use crate::model::Session;

pub use sqlite::LocalStore;

/// Key under which the signed-in auth session is kept.
pub const AUTH_TOKEN_KEY: &str = "supabase.auth.token";

/// Where a conversation turn persists the updated session.
pub trait SessionStore {
    fn save_session(&self, session: &Session) -> Result<(), StoreError>;
}

/// String settings kept on this device.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
