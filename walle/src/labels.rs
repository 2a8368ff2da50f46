use std::collections::HashMap;

use tracing::debug;

use crate::error::{Result, WallError};
use crate::line::{is_identifier, is_reserved};

/// Label name to 0-based line index, filled by the pre-pass before a run.
#[derive(Debug, Default, Clone)]
pub struct Labels {
    lines: HashMap<String, usize>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_label(&mut self, name: &str, line: usize) -> Result<()> {
        if !is_identifier(name) || is_reserved(name) {
            return Err(WallError::InvalidLabelName(name.to_string()));
        }
        if self.lines.contains_key(name) {
            return Err(WallError::DuplicateLabel(name.to_string()));
        }
        debug!(label = name, line, "label registered");
        self.lines.insert(name.to_string(), line);
        Ok(())
    }

    pub fn try_resolve(&self, name: &str) -> Option<usize> {
        self.lines.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lines.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The label a line declares: a bare identifier, optionally followed by `:`.
    pub fn label_name(line: &str) -> Option<&str> {
        let line = line.trim();
        let name = line.strip_suffix(':').unwrap_or(line).trim_end();
        (is_identifier(name) && !is_reserved(name)).then_some(name)
    }

    pub fn is_label_line(line: &str) -> bool {
        Self::label_name(line).is_some()
    }
}
