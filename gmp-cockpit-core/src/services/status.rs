//! User-facing status line messages

use crate::types::FormMode;

pub const READY: &str = "Ready";
pub const SIGNATURE_CANCELLED: &str = "Electronic signature cancelled. Save aborted.";
pub const SIGNATURE_NOT_CAPTURED: &str = "Electronic signature was not captured.";

#[must_use]
pub fn loaded_status(count: usize) -> String {
    format!("Loaded {count} record(s).")
}

#[must_use]
pub fn loading(title: &str) -> String {
    format!("Loading {title} records...")
}

#[must_use]
pub fn offline(reason: &str) -> String {
    format!("Offline data loaded because: {reason}")
}

#[must_use]
pub fn mode_changed(title: &str, mode: FormMode) -> String {
    format!("{title}: {mode} mode")
}

#[must_use]
pub fn not_in_edit_mode(title: &str) -> String {
    format!("{title} is not in Add/Update mode.")
}

#[must_use]
pub fn validation_issues(title: &str, count: usize) -> String {
    format!("{title} has {count} validation issue(s).")
}

#[must_use]
pub fn saved(title: &str) -> String {
    format!("{title} saved successfully.")
}

#[must_use]
pub fn no_changes(title: &str) -> String {
    format!("No changes to save for {title}.")
}

#[must_use]
pub fn save_failed(title: &str, error: &str) -> String {
    format!("Failed to save {title}: {error}")
}

#[must_use]
pub fn cancelled(title: &str) -> String {
    format!("{title} changes cancelled.")
}

#[must_use]
pub fn filtered(title: &str, label: &str) -> String {
    format!("Filtered {title} by \"{label}\".")
}

#[must_use]
pub fn picker_failed(title: &str, error: &str) -> String {
    format!("Unable to open picker for {title}: {error}")
}

#[must_use]
pub fn navigation_failed(error: &str) -> String {
    format!("Unable to open related module: {error}")
}

#[must_use]
pub fn signature_failed(error: &str) -> String {
    format!("Electronic signature failed: {error}")
}

#[must_use]
pub fn signature_persist_failed(error: &str) -> String {
    format!("Failed to persist electronic signature: {error}")
}

#[must_use]
pub fn signature_captured(reason: &str) -> String {
    format!("Electronic signature captured ({reason}).")
}
