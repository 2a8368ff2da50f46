//! Per-line diagnostic passes. They record problems but never stop a line
//! from being dispatched.

mod runtime;
mod semantic;
mod syntax;

use crate::agent::Agent;
use crate::diagnostic::Diagnostics;
use crate::labels::Labels;

pub use runtime::RuntimeValidator;
pub use semantic::SemanticValidator;
pub use syntax::SyntaxValidator;

/// What a validator may look at.
pub struct ValidationContext<'a> {
    pub labels: &'a Labels,
    pub agent: &'a Agent,
}

pub trait Validator {
    /// `line` is trimmed; `line_number` is 1-based.
    fn validate(
        &self,
        line: &str,
        line_number: usize,
        ctx: &ValidationContext<'_>,
        diagnostics: &mut Diagnostics,
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Syntax,
    Semantic,
    Runtime,
}

impl Pass {
    /// Passes in the order they run against each line.
    pub fn all() -> Vec<Self> {
        vec![Self::Syntax, Self::Semantic, Self::Runtime]
    }

    /// Passes that need no execution state beyond the label table.
    pub fn is_static(&self) -> bool {
        !matches!(self, Self::Runtime)
    }

    pub fn create(&self) -> Box<dyn Validator> {
        match self {
            Self::Syntax => Box::new(SyntaxValidator),
            Self::Semantic => Box::new(SemanticValidator),
            Self::Runtime => Box::new(RuntimeValidator),
        }
    }
}

/// Every pass, ready to run.
pub fn pipeline() -> Vec<Box<dyn Validator>> {
    Pass::all().iter().map(Pass::create).collect()
}

/// Passes that can run without executing the program.
pub fn static_pipeline() -> Vec<Box<dyn Validator>> {
    Pass::all()
        .iter()
        .filter(|pass| pass.is_static())
        .map(Pass::create)
        .collect()
}
