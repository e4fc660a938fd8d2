//! Signature-gated persistence for Add/Update saves
//!
//! Sequence: capture a signature scoped to the table/record, stamp the
//! entity, create or update it, link the signature to the saved record and
//! persist the signature row if the persistence layer did not already do so.

use super::document::ModuleDocument;
use super::status;
use crate::error::{CoreError, CoreResult};
use crate::traits::{AuthContext, CrudService, ModuleBehavior, SignatureDialogService, SignedEntity};
use crate::types::{
    FormMode, SignatureCapture, SignatureContext, SignatureMetadata, SignatureRequest,
    SignatureState,
};

/// Result of one signed save
#[derive(Debug, Clone, PartialEq)]
pub enum SignedSaveOutcome<E> {
    /// Signature cancelled, failed or empty; nothing was persisted
    Aborted,
    /// Entity and signature are both stored
    Committed {
        entity: E,
        capture: SignatureCapture,
    },
    /// Entity stored but the signature row was not; the document was asked
    /// to return to Update
    SignaturePending {
        entity: E,
        capture: SignatureCapture,
        error: CoreError,
    },
}

/// Signed save pipeline over borrowed collaborators
pub struct SignedSavePipeline<'a, E: SignedEntity> {
    signatures: &'a dyn SignatureDialogService,
    auth: &'a dyn AuthContext,
    crud: &'a dyn CrudService<E>,
    /// Overrides the document's signature defaults when set
    method: Option<String>,
    status: Option<String>,
}

impl<'a, E: SignedEntity> SignedSavePipeline<'a, E> {
    #[must_use]
    pub fn new(
        signatures: &'a dyn SignatureDialogService,
        auth: &'a dyn AuthContext,
        crud: &'a dyn CrudService<E>,
    ) -> Self {
        Self {
            signatures,
            auth,
            crud,
            method: None,
            status: None,
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Run the signed save for `entity` in the document's current edit mode
    ///
    /// Signature problems are reported on the document status line and
    /// returned as `Aborted`.
    ///
    /// # Errors
    /// - `CoreError::NotInEditMode` outside Add/Update
    /// - `CoreError::NoRecordSelected` for an Update of an entity without id
    /// - `CoreError::PersistenceFailed` when create/update fails
    pub async fn execute<B: ModuleBehavior>(
        &self,
        document: &ModuleDocument<B>,
        mut entity: E,
    ) -> CoreResult<SignedSaveOutcome<E>> {
        let mode = document.mode();
        let record_id = match mode {
            FormMode::Add => None,
            FormMode::Update => Some(entity.id().ok_or(CoreError::NoRecordSelected)?),
            FormMode::Find | FormMode::View => {
                return Err(CoreError::NotInEditMode(document.title().to_string()));
            }
        };
        let table = self.crud.table_name().to_string();
        let defaults = document.signature_defaults();
        let request = SignatureRequest::new(table.clone(), record_id)
            .with_method(self.method.as_ref().unwrap_or(&defaults.method).clone())
            .with_status(self.status.as_ref().unwrap_or(&defaults.status).clone());

        let mut capture = match self.signatures.capture_signature(&request).await {
            Ok(Some(capture)) => capture,
            Ok(None) => {
                log::info!("[{}] signature cancelled by user", document.module_key());
                document.set_status(status::SIGNATURE_CANCELLED);
                return Ok(SignedSaveOutcome::Aborted);
            }
            Err(e) => {
                log::warn!("[{}] signature capture failed: {e}", document.module_key());
                document.set_status(status::signature_failed(&e.to_string()));
                return Ok(SignedSaveOutcome::Aborted);
            }
        };

        let Some(context) = SignatureContext::from_capture(&capture, &self.auth.session()) else {
            log::warn!("[{}] signature dialog returned no hash", document.module_key());
            document.set_status(status::SIGNATURE_NOT_CAPTURED);
            return Ok(SignedSaveOutcome::Aborted);
        };

        entity.apply_signature(&context.stamp());
        let result = if mode == FormMode::Add {
            self.crud.create(&entity, &context).await
        } else {
            self.crud.update(&entity, &context).await
        };
        let saved = result.map_err(|e| CoreError::PersistenceFailed {
            table: table.clone(),
            message: e.to_string(),
        })?;

        if entity.id().is_none() {
            entity.set_id(saved.id);
        }
        let record_id = entity.id().unwrap_or(saved.id);
        link_signature(
            &mut capture,
            &table,
            record_id,
            saved.signature_metadata.as_ref(),
            &context,
        );

        if let SignatureState::Unpersisted(_) = capture.state {
            match self.signatures.persist_signature(&capture).await {
                Ok(id) => capture.state.mark_persisted(id),
                Err(e) => {
                    log::error!(
                        "[{}] {table} #{record_id} saved but signature row failed: {e}",
                        document.module_key()
                    );
                    let message = e.to_string();
                    document.set_status(status::signature_persist_failed(&message));
                    document.request_mode(FormMode::Update);
                    return Ok(SignedSaveOutcome::SignaturePending {
                        entity,
                        capture,
                        error: CoreError::SignaturePersistenceFailed(message),
                    });
                }
            }
        }

        log::info!("[{}] {table} #{record_id} signed and saved", document.module_key());
        document.set_status(status::signature_captured(capture.reason_label()));
        Ok(SignedSaveOutcome::Committed { entity, capture })
    }
}

/// Bind the capture to the saved record and fill gaps
///
/// Missing values come from the persisted metadata first, then the context.
fn link_signature(
    capture: &mut SignatureCapture,
    table: &str,
    record_id: i64,
    metadata: Option<&SignatureMetadata>,
    context: &SignatureContext,
) {
    let metadata = metadata.cloned().unwrap_or_default();
    let signature = capture.state.signature_mut();
    signature.table_name = table.to_string();
    signature.record_id = Some(record_id);

    fill(
        &mut signature.signature_hash,
        metadata.hash,
        Some(context.signature_hash.clone()),
    );
    fill(&mut signature.note, metadata.note, context.note.clone());
    fill(&mut signature.ip_address, metadata.ip_address, context.ip.clone());
    fill(
        &mut signature.device_info,
        metadata.device_info,
        context.device_info.clone(),
    );
    fill(
        &mut signature.session_id,
        metadata.session_id,
        context.session_id.clone(),
    );
    if signature.method.trim().is_empty() {
        signature.method = metadata.method.unwrap_or_else(|| context.method.clone());
    }
    if signature.status.trim().is_empty() {
        signature.status = metadata.status.unwrap_or_else(|| context.status.clone());
    }

    if let Some(id) = metadata.id {
        capture.state.mark_persisted(id);
    }
}

fn fill(slot: &mut Option<String>, persisted: Option<String>, fallback: Option<String>) {
    if slot.as_deref().is_some_and(|value| !value.trim().is_empty()) {
        return;
    }
    *slot = persisted
        .filter(|value| !value.trim().is_empty())
        .or(fallback);
}
