use async_trait::async_trait;
use crate::application::errors::StorageError;

/// Store trait - persistence of group feature flags and operator identities
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Stored flag for `group_id`, or the default for groups never written.
    /// Never writes.
    async fn load_feature_status(&self, group_id: &str) -> Result<bool, StorageError>;

    /// Overwrite the flag for `group_id`. Durable once this returns.
    async fn save_feature_status(&self, group_id: &str, enabled: bool) -> Result<(), StorageError>;

    /// Whether `user_id` may flip feature switches. Unknown ids are `false`.
    async fn is_authorized(&self, user_id: &str) -> bool;

    // Operator management
    async fn add_operator(&self, user_id: &str) -> Result<(), StorageError>;
    async fn remove_operator(&self, user_id: &str) -> Result<bool, StorageError>;
}
