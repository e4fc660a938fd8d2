//! Electronic signature type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default signature method
pub const DEFAULT_SIGNATURE_METHOD: &str = "password";
/// Default signature status
pub const DEFAULT_SIGNATURE_STATUS: &str = "valid";

/// Identifier of a persisted signature row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SignatureId(i64);

impl SignatureId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Capture scope: the table/record the signature will be bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRequest {
    pub table_name: String,
    /// `None` while adding a record that has no identifier yet
    pub record_id: Option<i64>,
    pub method: String,
    pub status: String,
}

impl SignatureRequest {
    #[must_use]
    pub fn new(table_name: impl Into<String>, record_id: Option<i64>) -> Self {
        Self {
            table_name: table_name.into(),
            record_id,
            method: DEFAULT_SIGNATURE_METHOD.to_string(),
            status: DEFAULT_SIGNATURE_STATUS.to_string(),
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// Method/status stamped on signature requests when a save does not override them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureDefaults {
    pub method: String,
    pub status: String,
}

impl Default for SignatureDefaults {
    fn default() -> Self {
        Self {
            method: DEFAULT_SIGNATURE_METHOD.to_string(),
            status: DEFAULT_SIGNATURE_STATUS.to_string(),
        }
    }
}

/// Captured signature row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalSignature {
    pub table_name: String,
    pub record_id: Option<i64>,
    pub user_id: i64,
    pub signature_hash: Option<String>,
    pub method: String,
    pub status: String,
    pub signed_at: DateTime<Utc>,
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
    pub session_id: Option<String>,
    pub note: Option<String>,
}

/// Persistence state of a captured signature
///
/// Replaces the "id > 0 means already saved" convention: writing the row is
/// only ever attempted from `Unpersisted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SignatureState {
    Unpersisted(DigitalSignature),
    Persisted {
        id: SignatureId,
        signature: DigitalSignature,
    },
}

impl SignatureState {
    pub fn signature(&self) -> &DigitalSignature {
        match self {
            Self::Unpersisted(signature) | Self::Persisted { signature, .. } => signature,
        }
    }

    pub fn signature_mut(&mut self) -> &mut DigitalSignature {
        match self {
            Self::Unpersisted(signature) | Self::Persisted { signature, .. } => signature,
        }
    }

    pub fn id(&self) -> Option<SignatureId> {
        match self {
            Self::Unpersisted(_) => None,
            Self::Persisted { id, .. } => Some(*id),
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted { .. })
    }

    /// Record the row id; an already persisted state keeps its id
    pub fn mark_persisted(&mut self, id: SignatureId) {
        if let Self::Unpersisted(signature) = self {
            let signature = signature.clone();
            *self = Self::Persisted { id, signature };
        }
    }
}

/// Result of a confirmed signature dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureCapture {
    pub reason_code: String,
    pub reason_detail: Option<String>,
    pub reason_display: String,
    pub state: SignatureState,
}

impl SignatureCapture {
    /// Non-empty signature hash, if one was produced
    pub fn hash(&self) -> Option<&str> {
        self.state
            .signature()
            .signature_hash
            .as_deref()
            .filter(|hash| !hash.trim().is_empty())
    }

    /// Reason label for status messages (falls back to the code)
    pub fn reason_label(&self) -> &str {
        if self.reason_display.trim().is_empty() {
            &self.reason_code
        } else {
            &self.reason_display
        }
    }
}

/// Compose the persisted signature note from reason code and detail
#[must_use]
pub fn compose_note(reason_code: &str, reason_detail: Option<&str>) -> String {
    match reason_detail.map(str::trim).filter(|detail| !detail.is_empty()) {
        Some(detail) => format!("{reason_code}: {detail}"),
        None => reason_code.to_string(),
    }
}

/// Active session attributes supplied by the auth collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_id: Option<i64>,
    pub ip_address: Option<String>,
    pub device_info: Option<String>,
    pub session_id: Option<String>,
}

/// Signature context accompanying every Add/Update persistence call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureContext {
    pub actor_id: i64,
    pub ip: Option<String>,
    pub device_info: Option<String>,
    pub session_id: Option<String>,
    pub reason_code: String,
    pub note: Option<String>,
    pub signature_hash: String,
    pub signed_at_utc: DateTime<Utc>,
    pub method: String,
    pub status: String,
}

impl SignatureContext {
    /// Build the context from a confirmed capture and the current session
    ///
    /// Returns `None` when the capture carries no hash. Session values win over
    /// values recorded on the signature row.
    #[must_use]
    pub fn from_capture(capture: &SignatureCapture, session: &SessionInfo) -> Option<Self> {
        let hash = capture.hash()?.to_string();
        let signature = capture.state.signature();
        Some(Self {
            actor_id: session.user_id.unwrap_or(signature.user_id),
            ip: session
                .ip_address
                .clone()
                .or_else(|| signature.ip_address.clone()),
            device_info: session
                .device_info
                .clone()
                .or_else(|| signature.device_info.clone()),
            session_id: session
                .session_id
                .clone()
                .or_else(|| signature.session_id.clone()),
            reason_code: capture.reason_code.clone(),
            note: Some(compose_note(
                &capture.reason_code,
                capture.reason_detail.as_deref(),
            )),
            signature_hash: hash,
            signed_at_utc: signature.signed_at,
            method: signature.method.clone(),
            status: signature.status.clone(),
        })
    }

    /// Values stamped onto the persisted entity
    #[must_use]
    pub fn stamp(&self) -> SignatureStamp {
        SignatureStamp {
            signature_hash: self.signature_hash.clone(),
            actor_id: self.actor_id,
            signed_at_utc: self.signed_at_utc,
            ip: self.ip.clone(),
        }
    }
}

/// Signature fields written onto a domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStamp {
    pub signature_hash: String,
    pub actor_id: i64,
    pub signed_at_utc: DateTime<Utc>,
    pub ip: Option<String>,
}

/// Signature metadata echoed back by the persistence collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureMetadata {
    pub id: Option<SignatureId>,
    pub hash: Option<String>,
    pub method: Option<String>,
    pub status: Option<String>,
    pub note: Option<String>,
    pub ip_address: Option<String>,
    pub device_info: Option<String>,
    pub session_id: Option<String>,
}

/// Outcome of a create/update persistence call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrudSaveResult {
    /// Identifier of the created/updated entity
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_metadata: Option<SignatureMetadata>,
}

impl CrudSaveResult {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            id,
            signature_metadata: None,
        }
    }
}
