//! Type definition module

mod cfl;
mod document;
mod mode;
mod record;
mod signature;
mod toolbar;

pub use cfl::{CflItem, CflRequest, CflResult};
pub use document::{DocumentHandle, SaveOutcome};
pub use mode::FormMode;
pub use record::{InspectorContext, InspectorField, ModuleRecord};
pub use signature::{
    compose_note, CrudSaveResult, DigitalSignature, SessionInfo, SignatureCapture,
    SignatureContext, SignatureDefaults, SignatureId, SignatureMetadata, SignatureRequest,
    SignatureStamp, SignatureState, DEFAULT_SIGNATURE_METHOD, DEFAULT_SIGNATURE_STATUS,
};
pub use toolbar::{CommandKind, ToolbarCommand};
