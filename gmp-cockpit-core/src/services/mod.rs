//! Document controller and save pipeline services

mod document;
mod records;
mod signed_save;
pub mod status;

pub use document::ModuleDocument;
pub use records::{default_matches, RecordCollection};
pub use signed_save::{SignedSaveOutcome, SignedSavePipeline};
pub use status::loaded_status;

use std::sync::Arc;

use crate::traits::{CflDialogService, Executor, ModuleNavigator, ShellInteraction};
use crate::types::SignatureDefaults;

/// Collaborators shared by every module document
///
/// The shell creates one per document and injects its platform adapters.
#[derive(Clone)]
pub struct DocumentServices {
    /// Choose-from-list dialog
    pub picker: Arc<dyn CflDialogService>,
    /// Golden-arrow target
    pub navigator: Arc<dyn ModuleNavigator>,
    /// Status line, inspector and toolbar sinks
    pub shell: Arc<dyn ShellInteraction>,
    /// UI-context executor for command-state snapshots
    pub executor: Arc<dyn Executor>,
    /// Applied by signed saves that do not set their own method/status
    pub signature_defaults: SignatureDefaults,
}

impl DocumentServices {
    #[must_use]
    pub fn new(
        picker: Arc<dyn CflDialogService>,
        navigator: Arc<dyn ModuleNavigator>,
        shell: Arc<dyn ShellInteraction>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            picker,
            navigator,
            shell,
            executor,
            signature_defaults: SignatureDefaults::default(),
        }
    }

    #[must_use]
    pub fn with_signature_defaults(mut self, defaults: SignatureDefaults) -> Self {
        self.signature_defaults = defaults;
        self
    }
}
