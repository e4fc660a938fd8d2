//! Choose-from-list (CFL) request/result types

use serde::{Deserialize, Serialize};

/// One pickable entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CflItem {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

impl CflItem {
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Request handed to the picker dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CflRequest {
    pub title: String,
    pub items: Vec<CflItem>,
}

impl CflRequest {
    #[must_use]
    pub fn new(title: impl Into<String>, items: Vec<CflItem>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }

    /// Find an offered item by key
    pub fn item(&self, key: &str) -> Option<&CflItem> {
        self.items.iter().find(|item| item.key == key)
    }
}

/// Picker outcome: the selected item only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CflResult {
    pub selected: CflItem,
}

impl CflResult {
    #[must_use]
    pub fn new(selected: CflItem) -> Self {
        Self { selected }
    }
}
