//! GMP Cockpit Core Library
//!
//! Provides the reusable module-document engine for the quality cockpit:
//! - Form-mode state machine (Find / Add / View / Update)
//! - Record collection, search filter and inspector projection
//! - Toolbar command model with enablement rules
//! - Validation and electronic-signature gated save pipeline
//! - Choose-from-list bridge and golden-arrow navigation
//!
//! Module specifics plug in through `ModuleBehavior`; dialogs, navigation and
//! the shell are abstracted through traits so any frontend can host documents.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{DocumentServices, ModuleDocument, SignedSaveOutcome, SignedSavePipeline};
pub use traits::{
    AuthContext, CflDialogService, CrudService, DocumentController, Executor, InlineExecutor,
    ModuleBehavior, ModuleNavigator, ShellInteraction, SignatureDialogService, SignedEntity,
};
