//! Electronic signature abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{SessionInfo, SignatureCapture, SignatureId, SignatureRequest};

/// Electronic signature dialog collaborator
///
/// Capture prompts the user for credentials and a reason; persistence writes
/// the signature row once the owning entity has an identifier.
#[async_trait]
pub trait SignatureDialogService: Send + Sync {
    /// Prompt for a signature
    ///
    /// Returns `None` when the user cancelled.
    ///
    /// # Arguments
    /// * `request` - Table/record scope plus method and status
    async fn capture_signature(
        &self,
        request: &SignatureRequest,
    ) -> CoreResult<Option<SignatureCapture>>;

    /// Persist a captured signature row
    ///
    /// Callers only invoke this for `SignatureState::Unpersisted` captures.
    async fn persist_signature(&self, capture: &SignatureCapture) -> CoreResult<SignatureId>;
}

/// Active session attributes
pub trait AuthContext: Send + Sync {
    fn session(&self) -> SessionInfo;
}
