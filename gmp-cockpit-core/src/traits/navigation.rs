//! Module navigation abstract Trait

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreResult;
use crate::types::DocumentHandle;

/// Opens and activates module documents (golden arrow target)
#[async_trait]
pub trait ModuleNavigator: Send + Sync {
    /// Open (or reuse) a document for a module
    ///
    /// # Arguments
    /// * `module_key` - Registered module key
    /// * `parameter` - Initial load hint forwarded to the document
    async fn open_module(
        &self,
        module_key: &str,
        parameter: Option<Value>,
    ) -> CoreResult<DocumentHandle>;

    /// Bring an open document to the foreground
    async fn activate(&self, handle: &DocumentHandle) -> CoreResult<()>;
}
