//! Module registry

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use gmp_cockpit_core::error::{CoreError, CoreResult};
use gmp_cockpit_core::services::{DocumentServices, ModuleDocument};
use gmp_cockpit_core::traits::{DocumentController, ModuleBehavior};

/// Builds a document for one module from the shell's collaborators
pub type DocumentFactory =
    Arc<dyn Fn(DocumentServices) -> Arc<dyn DocumentController> + Send + Sync>;

/// Registered module, as listed by the shell's module tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub key: String,
    pub title: String,
    pub category: String,
}

struct Registration {
    descriptor: ModuleDescriptor,
    factory: DocumentFactory,
}

/// Module key to document factory map
#[derive(Default)]
pub struct ModuleRegistry {
    modules: RwLock<HashMap<String, Registration>>,
}

impl ModuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a module
    pub fn register(
        &self,
        key: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        factory: DocumentFactory,
    ) {
        let descriptor = ModuleDescriptor {
            key: key.into(),
            title: title.into(),
            category: category.into(),
        };
        log::debug!("Registering module {}", descriptor.key);
        self.modules.write().insert(
            descriptor.key.clone(),
            Registration {
                descriptor,
                factory,
            },
        );
    }

    /// Register a module whose documents wrap a fresh `B` each time
    pub fn register_behavior<B, F>(
        &self,
        key: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        make_behavior: F,
    ) where
        B: ModuleBehavior,
        F: Fn() -> B + Send + Sync + 'static,
    {
        let key = key.into();
        let title = title.into();
        let (document_key, document_title) = (key.clone(), title.clone());
        let factory: DocumentFactory = Arc::new(
            move |services: DocumentServices| -> Arc<dyn DocumentController> {
                Arc::new(ModuleDocument::new(
                    document_key.clone(),
                    document_title.clone(),
                    make_behavior(),
                    services,
                ))
            },
        );
        self.register(key, title, category, factory);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.modules.read().contains_key(key)
    }

    /// Registered modules sorted by category, then title
    pub fn modules(&self) -> Vec<ModuleDescriptor> {
        let mut modules: Vec<_> = self
            .modules
            .read()
            .values()
            .map(|registration| registration.descriptor.clone())
            .collect();
        modules.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.title.cmp(&b.title))
        });
        modules
    }

    /// Build a new document for `key`
    ///
    /// # Errors
    /// `CoreError::ModuleNotFound` for unregistered keys.
    pub fn create(
        &self,
        key: &str,
        services: DocumentServices,
    ) -> CoreResult<Arc<dyn DocumentController>> {
        let factory = self
            .modules
            .read()
            .get(key)
            .map(|registration| Arc::clone(&registration.factory))
            .ok_or_else(|| CoreError::ModuleNotFound(key.to_string()))?;
        Ok(factory(services))
    }
}
