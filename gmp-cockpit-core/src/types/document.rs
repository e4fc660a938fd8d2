//! Document handle and save outcome types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque reference to an open module document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentHandle {
    pub module_key: String,
    /// Unique per open document instance
    pub content_id: Uuid,
}

impl DocumentHandle {
    #[must_use]
    pub fn new(module_key: impl Into<String>, content_id: Uuid) -> Self {
        Self {
            module_key: module_key.into(),
            content_id,
        }
    }
}

/// Result of a save attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "details", rename_all = "camelCase")]
pub enum SaveOutcome {
    /// Another operation was in flight; nothing happened
    Busy,
    /// Document was not in Add/Update
    NotInEditMode,
    /// Validation produced this many messages; no signature was requested
    ValidationFailed(usize),
    /// The save hook declined to commit (cancelled signature, no changes, ...)
    NotCommitted,
    /// Changes committed; document is back in View
    Committed,
    /// The save hook failed with this message
    Failed(String),
}

impl SaveOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }
}
