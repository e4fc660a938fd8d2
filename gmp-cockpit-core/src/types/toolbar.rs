//! Toolbar command descriptors

use serde::Serialize;

use super::FormMode;

/// Named toolbar action bound to the form state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommandKind {
    Find,
    Add,
    View,
    Update,
    Save,
    Cancel,
    Refresh,
    ShowPicker,
    NavigateRelated,
}

impl CommandKind {
    /// All commands in toolbar order
    pub const ALL: [Self; 9] = [
        Self::Find,
        Self::Add,
        Self::View,
        Self::Update,
        Self::Save,
        Self::Cancel,
        Self::Refresh,
        Self::ShowPicker,
        Self::NavigateRelated,
    ];

    /// Mode toggled by this command, if it is a mode toggle
    #[must_use]
    pub const fn associated_mode(self) -> Option<FormMode> {
        match self {
            Self::Find => Some(FormMode::Find),
            Self::Add => Some(FormMode::Add),
            Self::View => Some(FormMode::View),
            Self::Update => Some(FormMode::Update),
            _ => None,
        }
    }

    const fn resource_stem(self) -> &'static str {
        match self {
            Self::Find => "Module.Toolbar.Toggle.Find",
            Self::Add => "Module.Toolbar.Toggle.Add",
            Self::View => "Module.Toolbar.Toggle.View",
            Self::Update => "Module.Toolbar.Toggle.Update",
            Self::Save => "Module.Toolbar.Command.Save",
            Self::Cancel => "Module.Toolbar.Command.Cancel",
            Self::Refresh => "Module.Toolbar.Command.Refresh",
            Self::ShowPicker => "Module.Toolbar.Command.ShowCfl",
            Self::NavigateRelated => "Module.Toolbar.Command.GoldenArrow",
        }
    }
}

/// Snapshot of one toolbar button
///
/// Caption, tool-tip and automation values are localization keys; resolving them
/// is the view's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarCommand {
    pub kind: CommandKind,
    pub caption_key: String,
    pub tooltip_key: String,
    pub automation_name_key: String,
    pub automation_id_key: String,
    pub associated_mode: Option<FormMode>,
    pub is_enabled: bool,
    pub is_checked: bool,
}

impl ToolbarCommand {
    #[must_use]
    pub fn new(kind: CommandKind) -> Self {
        let stem = kind.resource_stem();
        Self {
            kind,
            caption_key: format!("{stem}.Content"),
            tooltip_key: format!("{stem}.ToolTip"),
            automation_name_key: format!("{stem}.AutomationName"),
            automation_id_key: format!("{stem}.AutomationId"),
            associated_mode: kind.associated_mode(),
            is_enabled: false,
            is_checked: false,
        }
    }

    /// Full nine-command toolbar, all disabled and unchecked
    #[must_use]
    pub fn default_set() -> Vec<Self> {
        CommandKind::ALL.into_iter().map(Self::new).collect()
    }
}
