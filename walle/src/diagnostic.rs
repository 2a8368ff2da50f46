use std::fmt;

use serde::Serialize;

use crate::error::WallError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    Syntactic,
    Semantic,
    Runtime,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntactic => f.write_str("syntax error"),
            Self::Semantic => f.write_str("semantic error"),
            Self::Runtime => f.write_str("runtime error"),
        }
    }
}

/// One problem found in a program, tied to the line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-based.
    pub line: usize,
    pub message: String,
    pub kind: DiagnosticKind,
    pub snippet: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind, self.message)?;
        if !self.snippet.is_empty() {
            write!(f, "\n  | {}", self.snippet)?;
        }
        Ok(())
    }
}

/// Append-only diagnostic sink shared by the validators and the dispatcher.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: usize, kind: DiagnosticKind, message: impl Into<String>, snippet: &str) {
        self.entries.push(Diagnostic {
            line,
            message: message.into(),
            kind,
            snippet: snippet.to_string(),
        });
    }

    pub fn syntactic(&mut self, line: usize, message: impl Into<String>, snippet: &str) {
        self.push(line, DiagnosticKind::Syntactic, message, snippet);
    }

    pub fn semantic(&mut self, line: usize, message: impl Into<String>, snippet: &str) {
        self.push(line, DiagnosticKind::Semantic, message, snippet);
    }

    pub fn runtime(&mut self, line: usize, message: impl Into<String>, snippet: &str) {
        self.push(line, DiagnosticKind::Runtime, message, snippet);
    }

    /// Records `error` under the category it maps to.
    pub fn error(&mut self, line: usize, error: &WallError, snippet: &str) {
        self.push(line, error.kind(), error.to_string(), snippet);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries recorded after the first `since` ones.
    pub fn since(&self, since: usize) -> &[Diagnostic] {
        &self.entries[since.min(self.entries.len())..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
