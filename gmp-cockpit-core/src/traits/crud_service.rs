//! Entity persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{CrudSaveResult, SignatureContext, SignatureStamp};

/// Entity that carries signature columns
///
/// Implemented by the editor types that go through the signed save pipeline.
pub trait SignedEntity: Clone + Send + Sync {
    /// Current identifier (`None` before the first insert)
    fn id(&self) -> Option<i64>;

    /// Assign the identifier returned by the persistence layer
    fn set_id(&mut self, id: i64);

    /// Write hash, actor, time and ip onto the entity
    fn apply_signature(&mut self, stamp: &SignatureStamp);
}

/// Create/update collaborator for one entity type
///
/// Every call is accompanied by the signature context of the save that
/// triggered it.
#[async_trait]
pub trait CrudService<E>: Send + Sync
where
    E: SignedEntity,
{
    /// Table the signature is linked to
    fn table_name(&self) -> &str;

    /// Insert a new entity
    ///
    /// # Arguments
    /// * `entity` - Stamped entity
    /// * `context` - Signature context
    async fn create(&self, entity: &E, context: &SignatureContext) -> CoreResult<CrudSaveResult>;

    /// Update an existing entity
    ///
    /// # Arguments
    /// * `entity` - Stamped entity (carries its id)
    /// * `context` - Signature context
    async fn update(&self, entity: &E, context: &SignatureContext) -> CoreResult<CrudSaveResult>;
}
