//! Cockpit shell: open documents, activation and feedback sinks

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use uuid::Uuid;

use gmp_cockpit_core::error::{CoreError, CoreResult};
use gmp_cockpit_core::services::{status, DocumentServices};
use gmp_cockpit_core::traits::{
    CflDialogService, DocumentController, Executor, ModuleNavigator, ShellInteraction,
};
use gmp_cockpit_core::types::{DocumentHandle, InspectorContext, ToolbarCommand};

use crate::config::AppConfig;
use crate::registry::ModuleRegistry;
use crate::subscription::Subscription;

struct ShellState {
    /// Open documents, oldest first
    documents: Vec<Arc<dyn DocumentController>>,
    active: Option<Uuid>,
    status: String,
    inspector: Option<InspectorContext>,
    command_states: HashMap<String, Vec<ToolbarCommand>>,
}

/// Document host
///
/// Documents reach the shell through a `ShellPort` holding a weak reference,
/// so open documents never keep the shell alive.
pub struct Shell {
    registry: Arc<ModuleRegistry>,
    picker: Arc<dyn CflDialogService>,
    executor: Arc<dyn Executor>,
    config: AppConfig,
    port: Arc<ShellPort>,
    state: Mutex<ShellState>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl Shell {
    #[must_use]
    pub fn new(
        registry: Arc<ModuleRegistry>,
        picker: Arc<dyn CflDialogService>,
        executor: Arc<dyn Executor>,
        config: AppConfig,
    ) -> Arc<Self> {
        Arc::new_cyclic(|shell| Self {
            registry,
            picker,
            executor,
            config,
            port: Arc::new(ShellPort {
                shell: shell.clone(),
            }),
            state: Mutex::new(ShellState {
                documents: Vec::new(),
                active: None,
                status: status::READY.to_string(),
                inspector: None,
                command_states: HashMap::new(),
            }),
            subscriptions: Mutex::new(Vec::new()),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    /// Collaborators injected into every document this shell opens
    pub fn document_services(&self) -> DocumentServices {
        DocumentServices::new(
            Arc::clone(&self.picker),
            self.port.clone(),
            self.port.clone(),
            Arc::clone(&self.executor),
        )
        .with_signature_defaults(self.config.signature.clone())
    }

    /// Open a document for `module_key`, or reuse an open one
    ///
    /// The document is initialized with `parameter`: a new document loads
    /// its records, a reused one runs its activation hook.
    pub async fn open_module(
        &self,
        module_key: &str,
        parameter: Option<Value>,
    ) -> CoreResult<DocumentHandle> {
        let existing = if self.config.reuse_open_documents {
            self.state
                .lock()
                .documents
                .iter()
                .find(|document| document.module_key() == module_key)
                .cloned()
        } else {
            None
        };

        let document = if let Some(document) = existing {
            log::info!("Reusing open document for {module_key}");
            document
        } else {
            let document = self.registry.create(module_key, self.document_services())?;
            log::info!("Opened document for {module_key}");
            self.state.lock().documents.push(Arc::clone(&document));
            document
        };

        document.initialize(parameter.as_ref()).await?;
        let handle = document.handle();
        self.enforce_document_limit(&handle);
        Ok(handle)
    }

    /// Make `handle` the active document
    pub fn activate(&self, handle: &DocumentHandle) -> CoreResult<()> {
        let mut state = self.state.lock();
        if !state
            .documents
            .iter()
            .any(|document| document.handle().content_id == handle.content_id)
        {
            return Err(CoreError::DocumentNotFound(handle.module_key.clone()));
        }
        state.active = Some(handle.content_id);
        log::info!("Activated document {}", handle.module_key);
        Ok(())
    }

    /// Close an open document
    ///
    /// The most recently opened remaining document becomes active when the
    /// active one is closed.
    pub fn close(&self, handle: &DocumentHandle) -> CoreResult<()> {
        let mut state = self.state.lock();
        let index = state
            .documents
            .iter()
            .position(|document| document.handle().content_id == handle.content_id)
            .ok_or_else(|| CoreError::DocumentNotFound(handle.module_key.clone()))?;
        state.documents.remove(index);
        if state.active == Some(handle.content_id) {
            state.active = state
                .documents
                .last()
                .map(|document| document.handle().content_id);
        }
        if !state
            .documents
            .iter()
            .any(|document| document.module_key() == handle.module_key)
        {
            state.command_states.remove(&handle.module_key);
        }
        log::info!("Closed document {}", handle.module_key);
        Ok(())
    }

    pub fn documents(&self) -> Vec<DocumentHandle> {
        self.state
            .lock()
            .documents
            .iter()
            .map(|document| document.handle())
            .collect()
    }

    pub fn document(&self, handle: &DocumentHandle) -> Option<Arc<dyn DocumentController>> {
        self.state
            .lock()
            .documents
            .iter()
            .find(|document| document.handle().content_id == handle.content_id)
            .cloned()
    }

    pub fn active_document(&self) -> Option<Arc<dyn DocumentController>> {
        let state = self.state.lock();
        let active = state.active?;
        state
            .documents
            .iter()
            .find(|document| document.handle().content_id == active)
            .cloned()
    }

    pub fn status(&self) -> String {
        self.state.lock().status.clone()
    }

    pub fn inspector(&self) -> Option<InspectorContext> {
        self.state.lock().inspector.clone()
    }

    /// Last toolbar snapshot applied for `module_key`
    pub fn command_states(&self, module_key: &str) -> Option<Vec<ToolbarCommand>> {
        self.state.lock().command_states.get(module_key).cloned()
    }

    /// Keep a feed alive until `shutdown`
    pub fn add_subscription(&self, subscription: Subscription) {
        self.subscriptions.lock().push(subscription);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().len()
    }

    /// Cancel every feed and close all documents
    pub fn shutdown(&self) {
        let mut subscriptions = std::mem::take(&mut *self.subscriptions.lock());
        for subscription in &mut subscriptions {
            subscription.cancel();
        }
        let mut state = self.state.lock();
        state.documents.clear();
        state.active = None;
        log::info!("Shell shut down ({} subscription(s) cancelled)", subscriptions.len());
    }

    /// Close the oldest inactive, clean document while over the cap
    fn enforce_document_limit(&self, keep: &DocumentHandle) {
        let Some(max) = self.config.max_open_documents else {
            return;
        };
        let mut state = self.state.lock();
        while state.documents.len() > max {
            let active = state.active;
            let victim = state.documents.iter().position(|document| {
                let id = document.handle().content_id;
                id != keep.content_id && Some(id) != active && !document.is_dirty()
            });
            let Some(index) = victim else {
                log::warn!("Document limit {max} exceeded but every document is in use");
                break;
            };
            let closed = state.documents.remove(index);
            log::info!("Closed {} to stay within {max} open document(s)", closed.module_key());
        }
    }

    fn set_status(&self, message: &str) {
        self.state.lock().status = message.to_string();
    }

    fn set_inspector(&self, context: InspectorContext) {
        self.state.lock().inspector = Some(context);
    }

    fn set_command_states(&self, module_key: &str, commands: &[ToolbarCommand]) {
        self.state
            .lock()
            .command_states
            .insert(module_key.to_string(), commands.to_vec());
    }
}

/// Weak adapter exposing the shell to its documents
pub struct ShellPort {
    shell: Weak<Shell>,
}

impl ShellPort {
    fn shell(&self) -> CoreResult<Arc<Shell>> {
        self.shell
            .upgrade()
            .ok_or_else(|| CoreError::NavigationFailed("shell has shut down".to_string()))
    }
}

#[async_trait]
impl ModuleNavigator for ShellPort {
    async fn open_module(
        &self,
        module_key: &str,
        parameter: Option<Value>,
    ) -> CoreResult<DocumentHandle> {
        self.shell()?.open_module(module_key, parameter).await
    }

    async fn activate(&self, handle: &DocumentHandle) -> CoreResult<()> {
        self.shell()?.activate(handle)
    }
}

impl ShellInteraction for ShellPort {
    fn update_status(&self, message: &str) {
        if let Some(shell) = self.shell.upgrade() {
            shell.set_status(message);
        }
    }

    fn update_inspector(&self, context: InspectorContext) {
        if let Some(shell) = self.shell.upgrade() {
            shell.set_inspector(context);
        }
    }

    fn apply_command_states(&self, module_key: &str, commands: &[ToolbarCommand]) {
        if let Some(shell) = self.shell.upgrade() {
            shell.set_command_states(module_key, commands);
        }
    }
}
