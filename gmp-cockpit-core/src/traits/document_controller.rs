//! Type-erased document Trait used by the shell

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreResult;
use crate::types::{CommandKind, DocumentHandle, FormMode, ModuleRecord, ToolbarCommand};

/// Object-safe view of an open module document
///
/// `ModuleDocument<B>` implements this for every behavior so the shell can
/// keep heterogeneous documents side by side.
#[async_trait]
pub trait DocumentController: Send + Sync {
    fn handle(&self) -> DocumentHandle;

    fn module_key(&self) -> &str;

    fn title(&self) -> &str;

    fn mode(&self) -> FormMode;

    fn is_busy(&self) -> bool;

    fn is_dirty(&self) -> bool;

    fn status_message(&self) -> String;

    fn selected_record(&self) -> Option<ModuleRecord>;

    fn toolbar(&self) -> Vec<ToolbarCommand>;

    fn can_execute(&self, kind: CommandKind) -> bool;

    /// First call loads records; later calls notify re-activation
    ///
    /// # Arguments
    /// * `parameter` - Load hint from the opener
    async fn initialize(&self, parameter: Option<&Value>) -> CoreResult<()>;

    /// Run a toolbar command; returns whether it took effect
    async fn execute(&self, kind: CommandKind) -> bool;
}
