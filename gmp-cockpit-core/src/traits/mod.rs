//! Collaborator abstraction trait definition

mod crud_service;
mod document_controller;
mod executor;
mod module_behavior;
mod navigation;
mod picker_service;
mod shell;
mod signature_service;

pub use crud_service::{CrudService, SignedEntity};
pub use document_controller::DocumentController;
pub use executor::{Executor, InlineExecutor, Job};
pub use module_behavior::ModuleBehavior;
pub use navigation::ModuleNavigator;
pub use picker_service::CflDialogService;
pub use shell::ShellInteraction;
pub use signature_service::{AuthContext, SignatureDialogService};
