//! Shell feedback sink

use crate::types::{InspectorContext, ToolbarCommand};

/// Status line, inspector and toolbar sinks owned by the shell
pub trait ShellInteraction: Send + Sync {
    /// Replace the shell status line
    fn update_status(&self, message: &str);

    /// Replace the inspector panel content
    fn update_inspector(&self, context: InspectorContext);

    /// Apply a toolbar snapshot for a module
    ///
    /// Always invoked through the document's `Executor`.
    fn apply_command_states(&self, module_key: &str, commands: &[ToolbarCommand]);
}
