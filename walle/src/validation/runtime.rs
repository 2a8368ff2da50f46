use crate::commands::CommandKind;
use crate::diagnostic::Diagnostics;

use super::{ValidationContext, Validator};

/// Checks that depend on where the run currently is.
pub struct RuntimeValidator;

impl Validator for RuntimeValidator {
    fn validate(
        &self,
        line: &str,
        line_number: usize,
        ctx: &ValidationContext<'_>,
        diagnostics: &mut Diagnostics,
    ) {
        let Some(kind) = CommandKind::resolve(line) else {
            return;
        };
        if kind.is_drawing() && !ctx.agent.is_spawned() {
            diagnostics.runtime(
                line_number,
                format!("{} used before Spawn", kind.keyword()),
                line,
            );
        }
    }
}
