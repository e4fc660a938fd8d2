//! Module customization Trait

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreResult;
use crate::services::{default_matches, loaded_status, ModuleDocument};
use crate::types::{CflRequest, CflResult, FormMode, ModuleRecord};

/// Per-module strategy plugged into `ModuleDocument`
///
/// Only `load` and `create_fallback_records` are required. Hooks receive the
/// owning document so they can read the editor, publish status or select
/// records; none of them may hold document state across an await.
#[async_trait]
pub trait ModuleBehavior: Send + Sync + Sized + 'static {
    /// Form buffer edited in Add/Update mode
    type Editor: Clone + Default + Send + Sync + 'static;

    /// Fetch the module's records
    ///
    /// # Arguments
    /// * `parameter` - Optional load hint (golden arrow target, filter, ...)
    async fn load(&self, parameter: Option<&Value>) -> CoreResult<Vec<ModuleRecord>>;

    /// Offline data used when `load` fails
    fn create_fallback_records(&self) -> Vec<ModuleRecord>;

    /// Called when an already initialized document is activated again
    async fn on_activated(
        &self,
        _document: &ModuleDocument<Self>,
        _parameter: Option<&Value>,
    ) -> CoreResult<()> {
        Ok(())
    }

    /// Called after every mode transition
    ///
    /// Entering `Add` is the place to install a fresh editor with
    /// `ModuleDocument::replace_editor`.
    async fn on_mode_changed(
        &self,
        _document: &ModuleDocument<Self>,
        _mode: FormMode,
    ) -> CoreResult<()> {
        Ok(())
    }

    /// Persist the editor
    ///
    /// Returns `Ok(true)` when changes were committed.
    async fn on_save(&self, _document: &ModuleDocument<Self>) -> CoreResult<bool> {
        Ok(false)
    }

    /// Called before the editor snapshot is restored on cancel
    fn on_cancel(&self, _document: &ModuleDocument<Self>) {}

    /// Build the choose-from-list request; `None` shows nothing
    async fn create_picker_request(
        &self,
        _document: &ModuleDocument<Self>,
    ) -> CoreResult<Option<CflRequest>> {
        Ok(None)
    }

    /// Receive the picker selection verbatim
    async fn on_picker_selection(
        &self,
        _document: &ModuleDocument<Self>,
        _result: CflResult,
    ) -> CoreResult<()> {
        Ok(())
    }

    /// Search predicate; overrides should include `default_matches`
    fn matches_search(&self, record: &ModuleRecord, search_text: &str) -> bool {
        default_matches(record, search_text)
    }

    /// Status shown after a successful load
    fn format_loaded_status(&self, count: usize) -> String {
        loaded_status(count)
    }

    /// Called after the selection changed and the inspector was updated
    async fn on_record_selected(
        &self,
        _document: &ModuleDocument<Self>,
        _record: Option<&ModuleRecord>,
    ) {
    }

    /// Validation messages for the current editor; empty means valid
    async fn validate(&self, _document: &ModuleDocument<Self>) -> Vec<String> {
        Vec::new()
    }
}
