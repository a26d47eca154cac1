use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted feature flag of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFeatureState {
    pub group_id: String,
    pub enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl GroupFeatureState {
    /// Groups start disabled until an operator switches them on.
    pub const DEFAULT_ENABLED: bool = false;

    pub fn new(group_id: impl Into<String>, enabled: bool) -> Self {
        Self {
            group_id: group_id.into(),
            enabled,
            updated_at: Utc::now(),
        }
    }
}
