//! Test helper module
//!
//! Provides mock collaborators, a scripted module behavior and a factory that
//! wires them into a `ModuleDocument`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::{Notify, RwLock};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::services::{DocumentServices, ModuleDocument, SignedSaveOutcome, SignedSavePipeline};
use crate::traits::{
    AuthContext, CflDialogService, CrudService, InlineExecutor, ModuleBehavior, ModuleNavigator,
    ShellInteraction, SignatureDialogService, SignedEntity,
};
use crate::types::{
    CflItem, CflRequest, CflResult, CrudSaveResult, DigitalSignature, DocumentHandle, FormMode,
    InspectorContext, ModuleRecord, SessionInfo, SignatureCapture, SignatureContext, SignatureId,
    SignatureMetadata, SignatureRequest, SignatureStamp, SignatureState, ToolbarCommand,
    DEFAULT_SIGNATURE_METHOD, DEFAULT_SIGNATURE_STATUS,
};

// ===== RecordingShell =====

#[derive(Default)]
pub struct RecordingShell {
    statuses: Mutex<Vec<String>>,
    inspectors: Mutex<Vec<InspectorContext>>,
    commands: Mutex<Vec<(String, Vec<ToolbarCommand>)>>,
}

impl RecordingShell {
    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().clone()
    }

    pub fn last_inspector(&self) -> Option<InspectorContext> {
        self.inspectors.lock().last().cloned()
    }

    pub fn last_commands(&self) -> Option<(String, Vec<ToolbarCommand>)> {
        self.commands.lock().last().cloned()
    }
}

impl ShellInteraction for RecordingShell {
    fn update_status(&self, message: &str) {
        self.statuses.lock().push(message.to_string());
    }

    fn update_inspector(&self, context: InspectorContext) {
        self.inspectors.lock().push(context);
    }

    fn apply_command_states(&self, module_key: &str, commands: &[ToolbarCommand]) {
        self.commands
            .lock()
            .push((module_key.to_string(), commands.to_vec()));
    }
}

// ===== ScriptedPicker =====

enum PickerScript {
    Select(String),
    Dismiss,
}

pub struct ScriptedPicker {
    script: Mutex<PickerScript>,
    requests: RwLock<Vec<CflRequest>>,
}

impl ScriptedPicker {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(PickerScript::Dismiss),
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Pick the offered item with `key`
    pub fn select(&self, key: &str) {
        *self.script.lock() = PickerScript::Select(key.to_string());
    }

    pub fn dismiss(&self) {
        *self.script.lock() = PickerScript::Dismiss;
    }

    pub async fn requests(&self) -> Vec<CflRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl CflDialogService for ScriptedPicker {
    async fn show(&self, request: CflRequest) -> CoreResult<Option<CflResult>> {
        let selected = match &*self.script.lock() {
            PickerScript::Select(key) => request.item(key).cloned(),
            PickerScript::Dismiss => None,
        };
        self.requests.write().await.push(request);
        Ok(selected.map(CflResult::new))
    }
}

// ===== RecordingNavigator =====

#[derive(Debug, Clone, PartialEq)]
pub enum NavigatorCall {
    Open(String, Option<Value>),
    Activate(DocumentHandle),
}

pub struct RecordingNavigator {
    calls: RwLock<Vec<NavigatorCall>>,
    open_error: Mutex<Option<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self {
            calls: RwLock::new(Vec::new()),
            open_error: Mutex::new(None),
        }
    }

    pub fn fail_with(&self, message: &str) {
        *self.open_error.lock() = Some(message.to_string());
    }

    pub async fn calls(&self) -> Vec<NavigatorCall> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl ModuleNavigator for RecordingNavigator {
    async fn open_module(
        &self,
        module_key: &str,
        parameter: Option<Value>,
    ) -> CoreResult<DocumentHandle> {
        self.calls
            .write()
            .await
            .push(NavigatorCall::Open(module_key.to_string(), parameter));
        let error = self.open_error.lock().clone();
        if let Some(message) = error {
            return Err(CoreError::NavigationFailed(message));
        }
        Ok(DocumentHandle::new(module_key, Uuid::new_v4()))
    }

    async fn activate(&self, handle: &DocumentHandle) -> CoreResult<()> {
        self.calls
            .write()
            .await
            .push(NavigatorCall::Activate(handle.clone()));
        Ok(())
    }
}

// ===== SpySignatureService =====

#[derive(Debug, Clone)]
pub enum CaptureScript {
    Sign {
        hash: Option<String>,
        persisted_id: Option<SignatureId>,
    },
    Cancel,
    Fail(String),
}

/// Capture with reason `PERIODIC` / "scheduled" and no table binding
pub fn signed_capture(hash: Option<&str>, persisted_id: Option<SignatureId>) -> SignatureCapture {
    let signature = DigitalSignature {
        table_name: String::new(),
        record_id: None,
        user_id: 17,
        signature_hash: hash.map(str::to_string),
        method: DEFAULT_SIGNATURE_METHOD.to_string(),
        status: DEFAULT_SIGNATURE_STATUS.to_string(),
        signed_at: Utc::now(),
        device_info: None,
        ip_address: None,
        session_id: None,
        note: None,
    };
    let state = match persisted_id {
        Some(id) => SignatureState::Persisted { id, signature },
        None => SignatureState::Unpersisted(signature),
    };
    SignatureCapture {
        reason_code: "PERIODIC".to_string(),
        reason_detail: Some("scheduled".to_string()),
        reason_display: "Periodic review".to_string(),
        state,
    }
}

pub struct SpySignatureService {
    script: Mutex<CaptureScript>,
    persist_error: Mutex<Option<String>>,
    capture_calls: AtomicUsize,
    persist_calls: AtomicUsize,
    next_id: AtomicI64,
    requests: RwLock<Vec<SignatureRequest>>,
    persisted: RwLock<Vec<SignatureCapture>>,
}

impl SpySignatureService {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(CaptureScript::Sign {
                hash: Some("hash-1".to_string()),
                persisted_id: None,
            }),
            persist_error: Mutex::new(None),
            capture_calls: AtomicUsize::new(0),
            persist_calls: AtomicUsize::new(0),
            next_id: AtomicI64::new(500),
            requests: RwLock::new(Vec::new()),
            persisted: RwLock::new(Vec::new()),
        }
    }

    pub fn script(&self, script: CaptureScript) {
        *self.script.lock() = script;
    }

    pub fn fail_persist(&self, message: &str) {
        *self.persist_error.lock() = Some(message.to_string());
    }

    pub fn capture_calls(&self) -> usize {
        self.capture_calls.load(Ordering::SeqCst)
    }

    pub fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }

    pub async fn requests(&self) -> Vec<SignatureRequest> {
        self.requests.read().await.clone()
    }

    pub async fn persisted(&self) -> Vec<SignatureCapture> {
        self.persisted.read().await.clone()
    }
}

#[async_trait]
impl SignatureDialogService for SpySignatureService {
    async fn capture_signature(
        &self,
        request: &SignatureRequest,
    ) -> CoreResult<Option<SignatureCapture>> {
        self.capture_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.write().await.push(request.clone());
        let script = self.script.lock().clone();
        match script {
            CaptureScript::Sign { hash, persisted_id } => {
                let mut capture = signed_capture(hash.as_deref(), persisted_id);
                let signature = capture.state.signature_mut();
                signature.table_name.clone_from(&request.table_name);
                signature.record_id = request.record_id;
                signature.method.clone_from(&request.method);
                signature.status.clone_from(&request.status);
                Ok(Some(capture))
            }
            CaptureScript::Cancel => Ok(None),
            CaptureScript::Fail(message) => Err(CoreError::SignatureCaptureFailed(message)),
        }
    }

    async fn persist_signature(&self, capture: &SignatureCapture) -> CoreResult<SignatureId> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        let error = self.persist_error.lock().clone();
        if let Some(message) = error {
            return Err(CoreError::StorageError(message));
        }
        self.persisted.write().await.push(capture.clone());
        Ok(SignatureId::new(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }
}

// ===== StaticAuthContext =====

pub struct StaticAuthContext {
    session: SessionInfo,
}

impl StaticAuthContext {
    pub fn new() -> Self {
        Self {
            session: SessionInfo {
                user_id: Some(17),
                ip_address: Some("192.168.10.20".to_string()),
                device_info: Some("QA-WS-04".to_string()),
                session_id: Some("session-abc".to_string()),
            },
        }
    }
}

impl AuthContext for StaticAuthContext {
    fn session(&self) -> SessionInfo {
        self.session.clone()
    }
}

// ===== TestEditor =====

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestEditor {
    pub id: Option<i64>,
    pub name: String,
    pub signature_hash: Option<String>,
    pub signed_by: Option<i64>,
    pub signed_at: Option<DateTime<Utc>>,
}

impl TestEditor {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn stored(id: i64, name: &str) -> Self {
        Self {
            id: Some(id),
            ..Self::named(name)
        }
    }
}

impl SignedEntity for TestEditor {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn apply_signature(&mut self, stamp: &SignatureStamp) {
        self.signature_hash = Some(stamp.signature_hash.clone());
        self.signed_by = Some(stamp.actor_id);
        self.signed_at = Some(stamp.signed_at_utc);
    }
}

// ===== InMemoryCrudStore =====

pub struct InMemoryCrudStore {
    entities: RwLock<HashMap<i64, TestEditor>>,
    contexts: RwLock<Vec<SignatureContext>>,
    error: RwLock<Option<String>>,
    metadata: RwLock<Option<SignatureMetadata>>,
    next_id: AtomicI64,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
}

impl InMemoryCrudStore {
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
            contexts: RwLock::new(Vec::new()),
            error: RwLock::new(None),
            metadata: RwLock::new(None),
            next_id: AtomicI64::new(100),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
        }
    }

    pub async fn fail_with(&self, message: &str) {
        *self.error.write().await = Some(message.to_string());
    }

    pub async fn echo_metadata(&self, metadata: SignatureMetadata) {
        *self.metadata.write().await = Some(metadata);
    }

    pub async fn get(&self, id: i64) -> Option<TestEditor> {
        self.entities.read().await.get(&id).cloned()
    }

    pub async fn contexts(&self) -> Vec<SignatureContext> {
        self.contexts.read().await.clone()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.create_calls() + self.update_calls()
    }

    async fn store(
        &self,
        id: i64,
        entity: &TestEditor,
        context: &SignatureContext,
    ) -> CoreResult<CrudSaveResult> {
        if let Some(ref message) = *self.error.read().await {
            return Err(CoreError::StorageError(message.clone()));
        }
        let mut stored = entity.clone();
        stored.id = Some(id);
        self.entities.write().await.insert(id, stored);
        self.contexts.write().await.push(context.clone());
        Ok(CrudSaveResult {
            id,
            signature_metadata: self.metadata.read().await.clone(),
        })
    }
}

#[async_trait]
impl CrudService<TestEditor> for InMemoryCrudStore {
    fn table_name(&self) -> &str {
        "samples"
    }

    async fn create(
        &self,
        entity: &TestEditor,
        context: &SignatureContext,
    ) -> CoreResult<CrudSaveResult> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.store(id, entity, context).await
    }

    async fn update(
        &self,
        entity: &TestEditor,
        context: &SignatureContext,
    ) -> CoreResult<CrudSaveResult> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let id = entity
            .id
            .ok_or_else(|| CoreError::ValidationError("update without id".to_string()))?;
        self.store(id, entity, context).await
    }
}

// ===== HookGate =====

/// Parks a behavior hook until the test releases it
#[derive(Clone, Default)]
pub struct HookGate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl HookGate {
    /// Wait until the gated hook is running
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

// ===== TestBehavior =====

#[derive(Debug, Clone)]
pub enum SaveScript {
    Commit,
    Decline,
    Fail(CoreError),
    /// Run the signed save pipeline over the behavior's spies
    Signed,
}

/// Three records; `k1` carries a golden arrow to `WorkOrders` with parameter 42
pub fn sample_records() -> Vec<ModuleRecord> {
    vec![
        ModuleRecord::new("k1", "Tablet press")
            .with_code("EQ-001")
            .with_status("Active")
            .with_related("WorkOrders", Some(json!(42))),
        ModuleRecord::new("k2", "Autoclave").with_description("Steam sterilizer"),
        ModuleRecord::new("k3", "Balance").with_code("EQ-003"),
    ]
}

pub struct TestBehavior {
    load_result: Mutex<CoreResult<Vec<ModuleRecord>>>,
    load_parameters: Mutex<Vec<Option<Value>>>,
    validation: Mutex<Vec<String>>,
    save_script: Mutex<SaveScript>,
    load_gate: Mutex<Option<HookGate>>,
    save_gate: Mutex<Option<HookGate>>,
    save_calls: AtomicUsize,
    cancel_calls: AtomicUsize,
    mode_changes: Mutex<Vec<FormMode>>,
    activations: Mutex<Vec<Option<Value>>>,
    selected_keys: Mutex<Vec<Option<String>>>,
    picker_selections: Mutex<Vec<CflResult>>,
    pub signatures: Arc<SpySignatureService>,
    pub auth: Arc<StaticAuthContext>,
    pub store: Arc<InMemoryCrudStore>,
}

impl TestBehavior {
    pub fn new() -> Self {
        Self {
            load_result: Mutex::new(Ok(sample_records())),
            load_parameters: Mutex::new(Vec::new()),
            validation: Mutex::new(Vec::new()),
            save_script: Mutex::new(SaveScript::Commit),
            load_gate: Mutex::new(None),
            save_gate: Mutex::new(None),
            save_calls: AtomicUsize::new(0),
            cancel_calls: AtomicUsize::new(0),
            mode_changes: Mutex::new(Vec::new()),
            activations: Mutex::new(Vec::new()),
            selected_keys: Mutex::new(Vec::new()),
            picker_selections: Mutex::new(Vec::new()),
            signatures: Arc::new(SpySignatureService::new()),
            auth: Arc::new(StaticAuthContext::new()),
            store: Arc::new(InMemoryCrudStore::new()),
        }
    }

    pub fn set_records(&self, records: Vec<ModuleRecord>) {
        *self.load_result.lock() = Ok(records);
    }

    pub fn fail_load(&self, error: CoreError) {
        *self.load_result.lock() = Err(error);
    }

    pub fn set_validation(&self, messages: Vec<String>) {
        *self.validation.lock() = messages;
    }

    pub fn script_save(&self, script: SaveScript) {
        *self.save_script.lock() = script;
    }

    /// Hold the next load until the returned gate is released
    pub fn gate_load(&self) -> HookGate {
        let gate = HookGate::default();
        *self.load_gate.lock() = Some(gate.clone());
        gate
    }

    /// Hold the next save hook until the returned gate is released
    pub fn gate_save(&self) -> HookGate {
        let gate = HookGate::default();
        *self.save_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn load_calls(&self) -> usize {
        self.load_parameters.lock().len()
    }

    pub fn load_parameters(&self) -> Vec<Option<Value>> {
        self.load_parameters.lock().clone()
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }

    pub fn mode_changes(&self) -> Vec<FormMode> {
        self.mode_changes.lock().clone()
    }

    pub fn activations(&self) -> Vec<Option<Value>> {
        self.activations.lock().clone()
    }

    pub fn selected_keys(&self) -> Vec<Option<String>> {
        self.selected_keys.lock().clone()
    }

    pub fn picker_selections(&self) -> Vec<CflResult> {
        self.picker_selections.lock().clone()
    }
}

#[async_trait]
impl ModuleBehavior for TestBehavior {
    type Editor = TestEditor;

    async fn load(&self, parameter: Option<&Value>) -> CoreResult<Vec<ModuleRecord>> {
        self.load_parameters.lock().push(parameter.cloned());
        let gate = self.load_gate.lock().take();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        self.load_result.lock().clone()
    }

    fn create_fallback_records(&self) -> Vec<ModuleRecord> {
        vec![ModuleRecord::new("offline-1", "Offline sample")]
    }

    async fn on_activated(
        &self,
        _document: &ModuleDocument<Self>,
        parameter: Option<&Value>,
    ) -> CoreResult<()> {
        self.activations.lock().push(parameter.cloned());
        Ok(())
    }

    async fn on_mode_changed(
        &self,
        document: &ModuleDocument<Self>,
        mode: FormMode,
    ) -> CoreResult<()> {
        self.mode_changes.lock().push(mode);
        if mode == FormMode::Add {
            document.replace_editor(TestEditor::default());
        }
        Ok(())
    }

    async fn on_save(&self, document: &ModuleDocument<Self>) -> CoreResult<bool> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.save_gate.lock().take();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        let script = self.save_script.lock().clone();
        match script {
            SaveScript::Commit => Ok(true),
            SaveScript::Decline => Ok(false),
            SaveScript::Fail(error) => Err(error),
            SaveScript::Signed => {
                let pipeline = SignedSavePipeline::<TestEditor>::new(
                    self.signatures.as_ref(),
                    self.auth.as_ref(),
                    self.store.as_ref(),
                );
                match pipeline.execute(document, document.editor()).await? {
                    SignedSaveOutcome::Committed { entity, .. } => {
                        document.replace_editor(entity);
                        Ok(true)
                    }
                    SignedSaveOutcome::SignaturePending { entity, .. } => {
                        document.replace_editor(entity);
                        Ok(false)
                    }
                    SignedSaveOutcome::Aborted => Ok(false),
                }
            }
        }
    }

    /// An abandoned Add shows the selected record again
    fn on_cancel(&self, document: &ModuleDocument<Self>) {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        if document.mode() == FormMode::Add {
            let editor = document
                .selected_record()
                .map(|record| TestEditor::named(&record.title))
                .unwrap_or_default();
            document.replace_editor(editor);
        }
    }

    async fn create_picker_request(
        &self,
        document: &ModuleDocument<Self>,
    ) -> CoreResult<Option<CflRequest>> {
        let items = document
            .records()
            .iter()
            .map(|record| CflItem::new(record.key.clone(), record.title.clone()))
            .collect();
        Ok(Some(CflRequest::new("Select sample", items)))
    }

    async fn on_picker_selection(
        &self,
        document: &ModuleDocument<Self>,
        result: CflResult,
    ) -> CoreResult<()> {
        self.picker_selections.lock().push(result.clone());
        document.apply_picker_selection(&result).await;
        Ok(())
    }

    async fn on_record_selected(
        &self,
        _document: &ModuleDocument<Self>,
        record: Option<&ModuleRecord>,
    ) {
        self.selected_keys
            .lock()
            .push(record.map(|record| record.key.clone()));
    }

    async fn validate(&self, _document: &ModuleDocument<Self>) -> Vec<String> {
        self.validation.lock().clone()
    }
}

// ===== Harness =====

pub struct Harness {
    pub document: ModuleDocument<TestBehavior>,
    pub shell: Arc<RecordingShell>,
    pub picker: Arc<ScriptedPicker>,
    pub navigator: Arc<RecordingNavigator>,
}

/// `Sample` document over `TestBehavior` with an inline executor
pub fn harness() -> Harness {
    harness_with(|services| services)
}

/// `harness()` with adjusted document services
pub fn harness_with(configure: impl FnOnce(DocumentServices) -> DocumentServices) -> Harness {
    let shell = Arc::new(RecordingShell::default());
    let picker = Arc::new(ScriptedPicker::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let services = configure(DocumentServices::new(
        picker.clone(),
        navigator.clone(),
        shell.clone(),
        Arc::new(InlineExecutor),
    ));
    Harness {
        document: ModuleDocument::new("Sample", "Sample", TestBehavior::new(), services),
        shell,
        picker,
        navigator,
    }
}
