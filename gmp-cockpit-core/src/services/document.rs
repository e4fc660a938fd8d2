//! Module document controller
//!
//! Owns the form-mode state machine, the record view, the toolbar model and
//! the validation-gated save sequence for one open module. Module specifics
//! are supplied by a `ModuleBehavior`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use uuid::Uuid;

use super::records::RecordCollection;
use super::status;
use super::DocumentServices;
use crate::error::{CoreError, CoreResult};
use crate::traits::{DocumentController, ModuleBehavior};
use crate::types::{
    CflResult, CommandKind, DocumentHandle, FormMode, InspectorContext, ModuleRecord,
    SaveOutcome, SignatureDefaults, ToolbarCommand,
};

struct DocumentState<E> {
    mode: FormMode,
    is_dirty: bool,
    initialized: bool,
    status_message: String,
    /// Bumped on every status change; lets save detect hook-authored messages
    status_revision: u64,
    search_text: String,
    records: RecordCollection,
    validation_messages: Vec<String>,
    editor: E,
    /// Editor captured when Update was entered
    snapshot: Option<E>,
    toolbar: Vec<ToolbarCommand>,
    /// Mode a save hook asked for, applied once the hook returns
    pending_mode: Option<FormMode>,
    last_parameter: Option<Value>,
}

impl<E> DocumentState<E> {
    fn can_enter_mode(&self, busy: bool, mode: FormMode) -> bool {
        if busy {
            return false;
        }
        if mode == FormMode::Find {
            return true;
        }
        if self.mode == mode {
            return false;
        }
        match mode {
            FormMode::View | FormMode::Update => self.records.selected().is_some(),
            FormMode::Add => !self.is_dirty && self.validation_messages.is_empty(),
            FormMode::Find => true,
        }
    }

    fn command_enabled(&self, busy: bool, kind: CommandKind) -> bool {
        if let Some(mode) = kind.associated_mode() {
            return self.can_enter_mode(busy, mode);
        }
        if busy {
            return false;
        }
        match kind {
            CommandKind::Save => self.mode.is_edit(),
            CommandKind::Cancel => self.mode.is_edit() || self.mode == FormMode::Find,
            CommandKind::NavigateRelated => self
                .records
                .selected()
                .is_some_and(|record| record.related_module_key.is_some()),
            _ => true,
        }
    }
}

/// Releases the busy flag and republishes command states on drop
struct BusyGuard<'a, B: ModuleBehavior> {
    document: &'a ModuleDocument<B>,
}

impl<B: ModuleBehavior> Drop for BusyGuard<'_, B> {
    fn drop(&mut self) {
        self.document.busy.store(false, Ordering::Release);
        self.document.refresh_command_states();
    }
}

/// Controller for one open module document
pub struct ModuleDocument<B: ModuleBehavior> {
    module_key: String,
    title: String,
    content_id: Uuid,
    behavior: B,
    services: DocumentServices,
    busy: AtomicBool,
    state: Mutex<DocumentState<B::Editor>>,
}

impl<B: ModuleBehavior> ModuleDocument<B> {
    /// Create a document in `View` mode with no records
    #[must_use]
    pub fn new(
        module_key: impl Into<String>,
        title: impl Into<String>,
        behavior: B,
        services: DocumentServices,
    ) -> Self {
        let mut state = DocumentState {
            mode: FormMode::View,
            is_dirty: false,
            initialized: false,
            status_message: status::READY.to_string(),
            status_revision: 0,
            search_text: String::new(),
            records: RecordCollection::default(),
            validation_messages: Vec::new(),
            editor: B::Editor::default(),
            snapshot: None,
            toolbar: ToolbarCommand::default_set(),
            pending_mode: None,
            last_parameter: None,
        };
        Self::recompute_toolbar(&mut state, false);

        Self {
            module_key: module_key.into(),
            title: title.into(),
            content_id: Uuid::new_v4(),
            behavior,
            services,
            busy: AtomicBool::new(false),
            state: Mutex::new(state),
        }
    }

    // ===== Accessors =====

    pub fn module_key(&self) -> &str {
        &self.module_key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content_id(&self) -> Uuid {
        self.content_id
    }

    pub fn handle(&self) -> DocumentHandle {
        DocumentHandle::new(self.module_key.clone(), self.content_id)
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    /// Method/status for signed saves configured by the shell
    pub fn signature_defaults(&self) -> &SignatureDefaults {
        &self.services.signature_defaults
    }

    pub fn mode(&self) -> FormMode {
        self.state.lock().mode
    }

    pub fn is_in_edit_mode(&self) -> bool {
        self.mode().is_edit()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn is_dirty(&self) -> bool {
        self.state.lock().is_dirty
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().initialized
    }

    pub fn status_message(&self) -> String {
        self.state.lock().status_message.clone()
    }

    pub fn search_text(&self) -> String {
        self.state.lock().search_text.clone()
    }

    pub fn records(&self) -> Vec<ModuleRecord> {
        self.state.lock().records.records().to_vec()
    }

    /// Records that pass the current search text, in display order
    pub fn filtered_records(&self) -> Vec<ModuleRecord> {
        let state = self.state.lock();
        let text = state.search_text.as_str();
        state
            .records
            .filtered(|record| self.matches(record, text))
    }

    pub fn selected_record(&self) -> Option<ModuleRecord> {
        self.state.lock().records.selected().cloned()
    }

    pub fn validation_messages(&self) -> Vec<String> {
        self.state.lock().validation_messages.clone()
    }

    pub fn has_validation_errors(&self) -> bool {
        !self.state.lock().validation_messages.is_empty()
    }

    /// Copy of the current editor
    pub fn editor(&self) -> B::Editor {
        self.state.lock().editor.clone()
    }

    /// Last published toolbar snapshot
    pub fn toolbar(&self) -> Vec<ToolbarCommand> {
        self.state.lock().toolbar.clone()
    }

    pub fn can_enter_mode(&self, mode: FormMode) -> bool {
        let busy = self.is_busy();
        self.state.lock().can_enter_mode(busy, mode)
    }

    pub fn can_execute(&self, kind: CommandKind) -> bool {
        let busy = self.is_busy();
        self.state.lock().command_enabled(busy, kind)
    }

    // ===== State helpers for behaviors =====

    /// Publish a status line message
    pub fn set_status(&self, message: impl Into<String>) {
        let message = message.into();
        {
            let mut state = self.state.lock();
            state.status_message.clone_from(&message);
            state.status_revision += 1;
        }
        self.services.shell.update_status(&message);
    }

    /// Change the search text
    ///
    /// A selection hidden by the new filter moves to the first visible
    /// record, or to none.
    pub async fn set_search_text(&self, text: impl Into<String>) {
        let moved = {
            let mut state = self.state.lock();
            state.search_text = text.into();
            let text = state.search_text.clone();
            let changed = state.records.reconcile(|record| self.matches(record, &text));
            changed.then(|| state.records.selected().cloned())
        };
        match moved {
            Some(selected) => self.publish_selection(selected).await,
            None => self.refresh_command_states(),
        }
    }

    /// Select a record from the filtered view
    ///
    /// Returns `false` and keeps the selection when `key` is unknown or
    /// filtered out.
    pub async fn select_record(&self, key: &str) -> bool {
        let selected = {
            let mut state = self.state.lock();
            let text = state.search_text.clone();
            if !state.records.select(key, |record| self.matches(record, &text)) {
                return false;
            }
            state.records.selected().cloned()
        };
        self.publish_selection(selected).await;
        true
    }

    /// Flag unsaved edits; no-op outside Add/Update
    pub fn mark_dirty(&self) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.mode.is_edit() && !state.is_dirty;
            if changed {
                state.is_dirty = true;
            }
            changed
        };
        if changed {
            self.refresh_command_states();
        }
    }

    pub fn reset_dirty(&self) {
        let changed = std::mem::replace(&mut self.state.lock().is_dirty, false);
        if changed {
            self.refresh_command_states();
        }
    }

    /// Install a new editor value without touching dirty state
    pub fn replace_editor(&self, editor: B::Editor) {
        self.state.lock().editor = editor;
    }

    /// Apply an edit to a copy of the editor and mark the document dirty
    ///
    /// # Errors
    /// `CoreError::NotInEditMode` outside Add/Update.
    pub fn update_editor<F>(&self, edit: F) -> CoreResult<()>
    where
        F: FnOnce(&mut B::Editor),
    {
        let mut next = {
            let state = self.state.lock();
            if !state.mode.is_edit() {
                return Err(CoreError::NotInEditMode(self.title.clone()));
            }
            state.editor.clone()
        };
        edit(&mut next);
        {
            let mut state = self.state.lock();
            if !state.mode.is_edit() {
                return Err(CoreError::NotInEditMode(self.title.clone()));
            }
            state.editor = next;
            state.is_dirty = true;
        }
        self.refresh_command_states();
        Ok(())
    }

    /// Ask for a mode to be applied once the running save returns
    pub fn request_mode(&self, mode: FormMode) {
        self.state.lock().pending_mode = Some(mode);
    }

    /// Filter by the picked label, select the picked key and report it
    pub async fn apply_picker_selection(&self, result: &CflResult) -> bool {
        self.set_search_text(result.selected.label.clone()).await;
        let selected = self.select_record(&result.selected.key).await;
        self.set_status(status::filtered(&self.title, &result.selected.label));
        selected
    }

    // ===== Lifecycle =====

    /// First call loads records; later calls run the activation hook
    ///
    /// # Errors
    /// Propagates the activation hook error.
    pub async fn initialize(&self, parameter: Option<&Value>) -> CoreResult<()> {
        let first = !std::mem::replace(&mut self.state.lock().initialized, true);
        if first {
            self.refresh(parameter).await;
            return Ok(());
        }
        self.behavior.on_activated(self, parameter).await
    }

    /// Load records through the behavior
    ///
    /// Returns `false` without doing anything while busy. Load failures are
    /// reported on the status line and replaced by the fallback records.
    pub async fn refresh(&self, parameter: Option<&Value>) -> bool {
        let Some(_guard) = self.try_begin() else {
            log::debug!("[{}] refresh rejected: busy", self.module_key);
            return false;
        };
        self.state.lock().last_parameter = parameter.cloned();
        self.reload(parameter).await;
        true
    }

    /// Switch form mode
    ///
    /// Returns `false` when the guard for `mode` rejects the transition.
    pub async fn enter_mode(&self, mode: FormMode) -> bool {
        if !self.can_enter_mode(mode) {
            log::debug!("[{}] transition to {mode} rejected", self.module_key);
            return false;
        }
        self.apply_mode(mode).await;
        true
    }

    /// Validate, run the save hook and commit
    pub async fn save(&self) -> SaveOutcome {
        if self.is_busy() {
            return SaveOutcome::Busy;
        }
        if !self.is_in_edit_mode() {
            self.set_status(status::not_in_edit_mode(&self.title));
            return SaveOutcome::NotInEditMode;
        }
        let Some(_guard) = self.try_begin() else {
            return SaveOutcome::Busy;
        };

        let messages: Vec<String> = self
            .behavior
            .validate(self)
            .await
            .into_iter()
            .filter(|message| !message.trim().is_empty())
            .collect();
        let issues = messages.len();
        {
            let mut state = self.state.lock();
            state.validation_messages = messages;
            state.pending_mode = None;
        }
        if issues > 0 {
            log::debug!("[{}] save rejected by {issues} validation issue(s)", self.module_key);
            self.set_status(status::validation_issues(&self.title, issues));
            return SaveOutcome::ValidationFailed(issues);
        }

        let revision = self.status_revision();
        match self.behavior.on_save(self).await {
            Ok(true) => {
                if self.status_revision() == revision {
                    self.set_status(status::saved(&self.title));
                }
                let committed_status = self.status_message();
                self.state.lock().pending_mode = None;
                self.reset_dirty();
                self.apply_mode(FormMode::View).await;
                let parameter = self.state.lock().last_parameter.clone();
                if self.reload(parameter.as_ref()).await {
                    self.set_status(committed_status);
                } else {
                    let offline = self.status_message();
                    self.set_status(format!("{committed_status} {offline}"));
                }
                log::info!("[{}] changes committed", self.module_key);
                SaveOutcome::Committed
            }
            Ok(false) => {
                if self.status_revision() == revision {
                    self.set_status(status::no_changes(&self.title));
                }
                let pending = self.state.lock().pending_mode.take();
                if let Some(mode) = pending.filter(|mode| *mode != self.mode()) {
                    self.apply_mode(mode).await;
                }
                SaveOutcome::NotCommitted
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("[{}] save failed: {e}", self.module_key);
                } else {
                    log::error!("[{}] save failed: {e}", self.module_key);
                }
                self.state.lock().pending_mode = None;
                let message = e.to_string();
                self.set_status(status::save_failed(&self.title, &message));
                SaveOutcome::Failed(message)
            }
        }
    }

    /// Discard edits and return to View
    ///
    /// Returns `false` while busy.
    pub async fn cancel(&self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.behavior.on_cancel(self);
        let mode = {
            let mut state = self.state.lock();
            if let Some(snapshot) = state.snapshot.take() {
                state.editor = snapshot;
            }
            state.is_dirty = false;
            state.validation_messages.clear();
            state.mode
        };
        if mode.is_edit() {
            self.apply_mode(FormMode::View).await;
        }
        self.set_status(status::cancelled(&self.title));
        self.refresh_command_states();
        true
    }

    /// Ask the behavior for a picker request and forward the selection
    ///
    /// Returns `true` when a selection was delivered to the behavior.
    pub async fn show_picker(&self) -> bool {
        if self.is_busy() {
            return false;
        }
        let request = match self.behavior.create_picker_request(self).await {
            Ok(Some(request)) => request,
            Ok(None) => return false,
            Err(e) => {
                self.report_picker_error(&e);
                return false;
            }
        };
        let result = match self.services.picker.show(request).await {
            Ok(Some(result)) => result,
            Ok(None) => return false,
            Err(e) => {
                self.report_picker_error(&e);
                return false;
            }
        };
        if let Err(e) = self.behavior.on_picker_selection(self, result).await {
            self.report_picker_error(&e);
            return false;
        }
        true
    }

    /// Open and activate the selected record's related module
    pub async fn navigate_related(&self) -> Option<DocumentHandle> {
        if self.is_busy() {
            return None;
        }
        let (module_key, parameter) = {
            let state = self.state.lock();
            let record = state.records.selected()?;
            let module_key = record.related_module_key.clone()?;
            (module_key, record.related_parameter.clone())
        };

        log::info!("[{}] golden arrow to {module_key}", self.module_key);
        let navigator = &self.services.navigator;
        let outcome = match navigator.open_module(&module_key, parameter).await {
            Ok(handle) => navigator.activate(&handle).await.map(|()| handle),
            Err(e) => Err(e),
        };
        match outcome {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("[{}] navigation to {module_key} failed: {e}", self.module_key);
                self.set_status(status::navigation_failed(&e.to_string()));
                None
            }
        }
    }

    /// Run a toolbar command
    ///
    /// Returns whether the command took effect; for `Save` that means the
    /// changes were committed.
    pub async fn execute(&self, kind: CommandKind) -> bool {
        if !self.can_execute(kind) {
            return false;
        }
        match kind {
            CommandKind::Find => self.enter_mode(FormMode::Find).await,
            CommandKind::Add => self.enter_mode(FormMode::Add).await,
            CommandKind::View => self.enter_mode(FormMode::View).await,
            CommandKind::Update => self.enter_mode(FormMode::Update).await,
            CommandKind::Save => self.save().await.is_committed(),
            CommandKind::Cancel => self.cancel().await,
            CommandKind::Refresh => {
                let parameter = self.state.lock().last_parameter.clone();
                self.refresh(parameter.as_ref()).await
            }
            CommandKind::ShowPicker => self.show_picker().await,
            CommandKind::NavigateRelated => self.navigate_related().await.is_some(),
        }
    }

    // ===== Internals =====

    fn matches(&self, record: &ModuleRecord, text: &str) -> bool {
        text.trim().is_empty() || self.behavior.matches_search(record, text)
    }

    fn status_revision(&self) -> u64 {
        self.state.lock().status_revision
    }

    fn try_begin(&self) -> Option<BusyGuard<'_, B>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.refresh_command_states();
        Some(BusyGuard { document: self })
    }

    /// Load without the busy gate; callers hold the busy guard
    ///
    /// Returns `false` when the fallback records were installed.
    async fn reload(&self, parameter: Option<&Value>) -> bool {
        self.set_status(status::loading(&self.title));
        match self.behavior.load(parameter).await {
            Ok(records) => {
                let count = records.len();
                log::info!("[{}] loaded {count} record(s)", self.module_key);
                self.apply_records(records).await;
                self.set_status(self.behavior.format_loaded_status(count));
                true
            }
            Err(e) => {
                log::warn!("[{}] load failed, using offline data: {e}", self.module_key);
                self.apply_records(self.behavior.create_fallback_records())
                    .await;
                self.set_status(status::offline(&e.to_string()));
                false
            }
        }
    }

    async fn apply_records(&self, records: Vec<ModuleRecord>) {
        let selected = {
            let mut state = self.state.lock();
            state.records.replace(records);
            state.records.selected().cloned()
        };
        self.publish_selection(selected).await;
    }

    async fn publish_selection(&self, record: Option<ModuleRecord>) {
        self.services
            .shell
            .update_inspector(InspectorContext::for_selection(
                &self.module_key,
                &self.title,
                record.as_ref(),
            ));
        self.behavior.on_record_selected(self, record.as_ref()).await;
        self.refresh_command_states();
    }

    async fn apply_mode(&self, mode: FormMode) {
        let previous = {
            let mut state = self.state.lock();
            let previous = state.mode;
            state.mode = mode;
            if !mode.is_edit() {
                state.is_dirty = false;
            }
            state.validation_messages.clear();
            state.snapshot = None;
            Self::recompute_toolbar(&mut state, self.is_busy());
            previous
        };
        log::debug!("[{}] mode {previous} -> {mode}", self.module_key);
        self.services
            .shell
            .update_status(&status::mode_changed(&self.title, mode));

        if let Err(e) = self.behavior.on_mode_changed(self, mode).await {
            log::warn!("[{}] mode change hook failed: {e}", self.module_key);
            self.set_status(e.to_string());
        }
        if mode == FormMode::Update {
            let mut state = self.state.lock();
            state.snapshot = Some(state.editor.clone());
        }
        self.refresh_command_states();
    }

    fn recompute_toolbar(state: &mut DocumentState<B::Editor>, busy: bool) {
        let mut toolbar = std::mem::take(&mut state.toolbar);
        for command in &mut toolbar {
            command.is_enabled = state.command_enabled(busy, command.kind);
            command.is_checked = command.associated_mode == Some(state.mode);
        }
        state.toolbar = toolbar;
    }

    /// Recompute enablement and post the snapshot to the shell
    fn refresh_command_states(&self) {
        let busy = self.is_busy();
        let toolbar = {
            let mut state = self.state.lock();
            Self::recompute_toolbar(&mut state, busy);
            state.toolbar.clone()
        };
        let shell = Arc::clone(&self.services.shell);
        let module_key = self.module_key.clone();
        self.services.executor.post(Box::new(move || {
            shell.apply_command_states(&module_key, &toolbar);
        }));
    }

    fn report_picker_error(&self, error: &CoreError) {
        log::warn!("[{}] picker failed: {error}", self.module_key);
        self.set_status(status::picker_failed(&self.title, &error.to_string()));
    }
}

#[async_trait]
impl<B: ModuleBehavior> DocumentController for ModuleDocument<B> {
    fn handle(&self) -> DocumentHandle {
        Self::handle(self)
    }

    fn module_key(&self) -> &str {
        &self.module_key
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn mode(&self) -> FormMode {
        Self::mode(self)
    }

    fn is_busy(&self) -> bool {
        Self::is_busy(self)
    }

    fn is_dirty(&self) -> bool {
        Self::is_dirty(self)
    }

    fn status_message(&self) -> String {
        Self::status_message(self)
    }

    fn selected_record(&self) -> Option<ModuleRecord> {
        Self::selected_record(self)
    }

    fn toolbar(&self) -> Vec<ToolbarCommand> {
        Self::toolbar(self)
    }

    fn can_execute(&self, kind: CommandKind) -> bool {
        Self::can_execute(self, kind)
    }

    async fn initialize(&self, parameter: Option<&Value>) -> CoreResult<()> {
        Self::initialize(self, parameter).await
    }

    async fn execute(&self, kind: CommandKind) -> bool {
        Self::execute(self, kind).await
    }
}
