use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a paste should do with the pending files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Operation {
    #[default]
    None,
    Copy,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardMode {
    /// Files are kept even when the operation is `None`.
    #[default]
    Permissive,
    /// Setting `None` drops the files.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClipboardSnapshot {
    pub files: Vec<PathBuf>,
    pub operation: Operation,
}

impl ClipboardSnapshot {
    pub fn has_items(&self) -> bool {
        !self.files.is_empty() && self.operation != Operation::None
    }
}
