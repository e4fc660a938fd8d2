//! Record and inspector type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One label/value row of the read-only inspector panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectorField {
    /// Display label
    pub label: String,
    /// Display value (empty when the source value is absent)
    pub value: String,
    /// Accessible name for UI automation
    pub automation_name: String,
    /// Stable automation identifier
    pub automation_id: String,
}

impl InspectorField {
    /// Create an inspector field scoped to a module and record
    ///
    /// Automation metadata is derived from the module key, record key and label so
    /// that UI tests can address the field independently of its display value.
    #[must_use]
    pub fn create(
        module_key: &str,
        module_title: &str,
        record_key: Option<&str>,
        label: &str,
        value: Option<&str>,
    ) -> Self {
        let record_segment = record_key.unwrap_or("none");
        Self {
            label: label.to_string(),
            value: value.unwrap_or_default().to_string(),
            automation_name: format!("{module_title} {label}"),
            automation_id: format!(
                "{}.{}.{}",
                automation_segment(module_key),
                automation_segment(record_segment),
                automation_segment(label)
            ),
        }
    }
}

fn automation_segment(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Immutable projection of a domain entity for list display, search and navigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    /// Unique, stable key (reselection after refresh, navigation correlation)
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub inspector_fields: Vec<InspectorField>,
    /// Module opened by the golden arrow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_module_key: Option<String>,
    /// Initial load hint handed to the related module
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_parameter: Option<Value>,
}

impl ModuleRecord {
    #[must_use]
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            code: None,
            status: None,
            description: None,
            inspector_fields: Vec::new(),
            related_module_key: None,
            related_parameter: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_inspector_fields(mut self, fields: Vec<InspectorField>) -> Self {
        self.inspector_fields = fields;
        self
    }

    /// Attach a golden arrow target
    #[must_use]
    pub fn with_related(mut self, module_key: impl Into<String>, parameter: Option<Value>) -> Self {
        self.related_module_key = Some(module_key.into());
        self.related_parameter = parameter;
        self
    }
}

/// Payload pushed to the shell inspector when the selection changes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectorContext {
    pub module_key: String,
    pub module_title: String,
    pub record_key: Option<String>,
    pub title: String,
    pub fields: Vec<InspectorField>,
}

impl InspectorContext {
    pub(crate) fn for_selection(
        module_key: &str,
        module_title: &str,
        record: Option<&ModuleRecord>,
    ) -> Self {
        match record {
            Some(record) => Self {
                module_key: module_key.to_string(),
                module_title: module_title.to_string(),
                record_key: Some(record.key.clone()),
                title: record.title.clone(),
                fields: record.inspector_fields.clone(),
            },
            None => Self {
                module_key: module_key.to_string(),
                module_title: module_title.to_string(),
                record_key: None,
                title: "No record selected".to_string(),
                fields: Vec::new(),
            },
        }
    }
}
