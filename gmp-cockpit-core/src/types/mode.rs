//! Form mode definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Legacy ERP style form mode
///
/// Exactly one mode is active per document. Only `Add` and `Update`
/// allow editor mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormMode {
    /// Query records without mutating data
    Find,
    /// Enter a new record
    Add,
    /// Read-only inspection of the selected record
    #[default]
    View,
    /// Edit the selected record in place
    Update,
}

impl FormMode {
    /// All modes in toolbar order
    pub const ALL: [Self; 4] = [Self::Find, Self::Add, Self::View, Self::Update];

    /// Whether the mode permits editor mutation
    #[must_use]
    pub const fn is_edit(self) -> bool {
        matches!(self, Self::Add | Self::Update)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Find => "Find",
            Self::Add => "Add",
            Self::View => "View",
            Self::Update => "Update",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
