//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// The controller is already running a load/save
    #[error("Operation rejected: document is busy")]
    Busy,

    /// An editor mutation or save was attempted outside Add/Update
    #[error("{0} is not in Add/Update mode")]
    NotInEditMode(String),

    /// An operation needs a selected record and none is selected
    #[error("No record selected")]
    NoRecordSelected,

    /// The live data fetch failed (fallback records are shown instead)
    #[error("Load failed: {0}")]
    LoadFailed(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Save rejected by the validation hook
    #[error("Validation failed with {0} issue(s)")]
    ValidationFailed(usize),

    /// The signer dismissed the signature dialog
    #[error("Electronic signature cancelled")]
    SignatureCancelled,

    /// The dialog returned without a signature hash
    #[error("Electronic signature was not captured")]
    SignatureMissing,

    /// The signature dialog itself failed
    #[error("Electronic signature failed: {0}")]
    SignatureCaptureFailed(String),

    /// Domain persistence call failed
    #[error("Failed to persist {table}: {message}")]
    PersistenceFailed { table: String, message: String },

    /// Entity saved, but writing the signature record failed
    #[error("Failed to persist electronic signature: {0}")]
    SignaturePersistenceFailed(String),

    /// Module key is not registered
    #[error("Module not registered: {0}")]
    ModuleNotFound(String),

    /// Document handle does not refer to an open document
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Navigation collaborator failed
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Picker dialog failed
    #[error("Choose-from-list failed: {0}")]
    PickerFailed(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, cancelled dialogs, busy gate, etc.),
    /// used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Busy
            | Self::NotInEditMode(_)
            | Self::NoRecordSelected
            | Self::ValidationError(_)
            | Self::ValidationFailed(_)
            | Self::SignatureCancelled
            | Self::SignatureMissing
            | Self::ModuleNotFound(_)
            | Self::DocumentNotFound(_) => true,
            Self::LoadFailed(_)
            | Self::SignatureCaptureFailed(_)
            | Self::PersistenceFailed { .. }
            | Self::SignaturePersistenceFailed(_)
            | Self::NavigationFailed(_)
            | Self::PickerFailed(_)
            | Self::StorageError(_)
            | Self::ConfigError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
