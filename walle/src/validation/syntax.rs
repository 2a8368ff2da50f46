use lazy_static::lazy_static;
use regex::Regex;

use crate::commands::{CommandKind, GOTO};
use crate::diagnostic::Diagnostics;
use crate::line::{call_arguments, is_reserved, parentheses_balanced, split_arguments};

use super::{ValidationContext, Validator};

lazy_static! {
    /// Literals, names, operators, calls and quoted color names. Commas only
    /// reach here inside a nested call's parentheses.
    static ref ARGUMENT: Regex = Regex::new(r#"^[A-Za-z0-9_\-+*/%()<>=!&|",\s]+$"#).unwrap();
    static ref COLOR_ARGUMENT: Regex = Regex::new(r#"^"[A-Za-z]+"$"#).unwrap();
    static ref ASSIGNMENT: Regex = Regex::new(r"^([A-Za-z][A-Za-z0-9_-]*)\s*<-\s*\S").unwrap();
}

/// Shape checks: parentheses, argument counts, assignment and jump forms.
pub struct SyntaxValidator;

impl Validator for SyntaxValidator {
    fn validate(
        &self,
        line: &str,
        line_number: usize,
        _ctx: &ValidationContext<'_>,
        diagnostics: &mut Diagnostics,
    ) {
        if !parentheses_balanced(line) {
            diagnostics.syntactic(line_number, "unbalanced parentheses", line);
        }

        let Some(kind) = CommandKind::resolve(line) else {
            return;
        };
        match kind {
            CommandKind::GoTo => {
                if !GOTO.is_match(line) {
                    diagnostics.syntactic(
                        line_number,
                        format!("malformed GoTo; usage: {}", kind.usage()),
                        line,
                    );
                }
            }
            CommandKind::Assign => match ASSIGNMENT.captures(line) {
                Some(caps) if is_reserved(&caps[1]) => diagnostics.syntactic(
                    line_number,
                    format!("'{}' is a reserved word", &caps[1]),
                    line,
                ),
                Some(_) => {}
                None => diagnostics.syntactic(
                    line_number,
                    format!("malformed assignment; usage: {}", kind.usage()),
                    line,
                ),
            },
            CommandKind::Fill if line == "Fill" => {}
            _ => {
                if !call_is_well_formed(kind, line) {
                    diagnostics.syntactic(
                        line_number,
                        format!("malformed {}; usage: {}", kind.keyword(), kind.usage()),
                        line,
                    );
                }
            }
        }
    }
}

fn call_is_well_formed(kind: CommandKind, line: &str) -> bool {
    let Some(args) = call_arguments(line, kind.keyword()) else {
        return false;
    };
    let args = split_arguments(args);
    if Some(args.len()) != kind.arity() {
        return false;
    }
    args.iter().enumerate().all(|(i, arg)| {
        if i == 0 && kind.takes_color() {
            COLOR_ARGUMENT.is_match(arg)
        } else {
            ARGUMENT.is_match(arg)
        }
    })
}
