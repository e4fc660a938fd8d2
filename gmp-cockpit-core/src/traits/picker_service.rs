//! Choose-from-list dialog abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{CflRequest, CflResult};

/// Modal picker presenting a `CflRequest`
#[async_trait]
pub trait CflDialogService: Send + Sync {
    /// Show the picker
    ///
    /// Returns `None` when the user dismissed it without a selection.
    async fn show(&self, request: CflRequest) -> CoreResult<Option<CflResult>>;
}
