//! Platform-agnostic cockpit bootstrap.
//!
//! Provides `Cockpit` (shell, dispatcher and configuration), `CockpitBuilder`
//! (adapter injection) and the shell-side building blocks: module registry,
//! UI dispatcher executor and cancellable subscriptions.

pub mod config;
pub mod dispatcher;
pub mod registry;
pub mod shell;
pub mod subscription;

use std::sync::Arc;

use gmp_cockpit_core::error::{CoreError, CoreResult};
use gmp_cockpit_core::traits::{CflDialogService, Executor};
use gmp_cockpit_core::types::DocumentHandle;

pub use config::{
    AppConfig, ConfigService, JsonConfigService, MemoryConfigService, SignatureDefaults,
};
pub use dispatcher::UiDispatcher;
pub use registry::{DocumentFactory, ModuleDescriptor, ModuleRegistry};
pub use shell::{Shell, ShellPort};
pub use subscription::Subscription;

/// Running cockpit
///
/// Every frontend constructs this once at startup via `CockpitBuilder`.
pub struct Cockpit {
    pub shell: Arc<Shell>,
    /// Queue the UI loop drains; also the shell executor unless one was injected
    pub dispatcher: Arc<UiDispatcher>,
    pub config: AppConfig,
}

impl Cockpit {
    /// Open the configured startup modules and activate the last one
    ///
    /// Modules that fail to open are logged and skipped.
    pub async fn start(&self) -> Vec<DocumentHandle> {
        let mut opened = Vec::new();
        for module_key in &self.config.startup_modules {
            match self.shell.open_module(module_key, None).await {
                Ok(handle) => opened.push(handle),
                Err(e) => log::error!("Failed to open startup module {module_key}: {e}"),
            }
        }
        if let Some(handle) = opened.last() {
            if let Err(e) = self.shell.activate(handle) {
                log::warn!("Failed to activate {}: {e}", handle.module_key);
            }
        }
        log::info!("Cockpit started with {} document(s)", opened.len());
        opened
    }

    /// Cancel subscriptions and close all documents
    pub fn shutdown(&self) {
        self.shell.shutdown();
    }
}

/// Builder for constructing `Cockpit` with platform-specific adapters.
///
/// # Required adapters
/// - `picker`: choose-from-list dialog
///
/// # Optional
/// - `registry`: defaults to an empty `ModuleRegistry`
/// - `config_service` / `config`: defaults to `AppConfig::default()`
/// - `executor`: defaults to the cockpit's `UiDispatcher`
pub struct CockpitBuilder {
    registry: Option<Arc<ModuleRegistry>>,
    picker: Option<Arc<dyn CflDialogService>>,
    config_service: Option<Arc<dyn ConfigService>>,
    config: Option<AppConfig>,
    executor: Option<Arc<dyn Executor>>,
}

impl CockpitBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: None,
            picker: None,
            config_service: None,
            config: None,
            executor: None,
        }
    }

    #[must_use]
    pub fn registry(mut self, registry: Arc<ModuleRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn picker(mut self, picker: Arc<dyn CflDialogService>) -> Self {
        self.picker = Some(picker);
        self
    }

    /// Load configuration from `service` at build time
    #[must_use]
    pub fn config_service(mut self, service: Arc<dyn ConfigService>) -> Self {
        self.config_service = Some(service);
        self
    }

    /// Use `config` directly; takes precedence over `config_service`
    #[must_use]
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Build the cockpit
    ///
    /// # Errors
    /// `CoreError::ConfigError` when the picker is missing or the
    /// configuration cannot be loaded.
    pub fn build(self) -> CoreResult<Cockpit> {
        let picker = self
            .picker
            .ok_or_else(|| CoreError::ConfigError("picker is required".to_string()))?;

        let config = match (self.config, self.config_service) {
            (Some(config), _) => config,
            (None, Some(service)) => service
                .load()
                .map_err(|e| CoreError::ConfigError(format!("{e:#}")))?,
            (None, None) => AppConfig::default(),
        };

        let registry = self.registry.unwrap_or_default();
        let dispatcher = Arc::new(UiDispatcher::new());
        let executor = self
            .executor
            .unwrap_or_else(|| Arc::clone(&dispatcher) as Arc<dyn Executor>);

        let shell = Shell::new(registry, picker, executor, config.clone());
        log::debug!(
            "Cockpit built with {} registered module(s)",
            shell.registry().modules().len()
        );

        Ok(Cockpit {
            shell,
            dispatcher,
            config,
        })
    }
}

impl Default for CockpitBuilder {
    fn default() -> Self {
        Self::new()
    }
}
