use lazy_static::lazy_static;
use regex::Regex;

use crate::color::Color;
use crate::commands::{CommandKind, GOTO};
use crate::diagnostic::Diagnostics;
use crate::line::{call_arguments, split_arguments, string_literal};

use super::{ValidationContext, Validator};

lazy_static! {
    static ref INTEGER: Regex = Regex::new(r"^-?\d+$").unwrap();
    /// Color-taking built-ins with a literal name, anywhere in a line.
    static ref COLOR_QUERY: Regex =
        Regex::new(r#"(?:IsBrushColor|IsCanvasColor|GetColorCount)\(\s*"([^"]*)""#).unwrap();
    static ref COLOR_COUNT_LITERAL: Regex = Regex::new(
        r#"GetColorCount\(\s*"[^"]*"\s*,\s*(-?\d+)\s*,\s*(-?\d+)\s*,\s*(-?\d+)\s*,\s*(-?\d+)\s*\)"#
    )
    .unwrap();
}

/// Misuse that can be seen without running: missing labels, literal spawn
/// positions off the canvas, unknown colors, reversed corners.
pub struct SemanticValidator;

impl Validator for SemanticValidator {
    fn validate(
        &self,
        line: &str,
        line_number: usize,
        ctx: &ValidationContext<'_>,
        diagnostics: &mut Diagnostics,
    ) {
        match CommandKind::resolve(line) {
            Some(CommandKind::GoTo) => {
                if let Some(caps) = GOTO.captures(line) {
                    if !ctx.labels.contains(&caps[1]) {
                        diagnostics.semantic(
                            line_number,
                            format!("label '{}' is not defined", &caps[1]),
                            line,
                        );
                    }
                }
            }
            Some(CommandKind::Spawn) => check_spawn(line, line_number, ctx, diagnostics),
            Some(CommandKind::Color) => {
                let name = call_arguments(line, "Color").and_then(string_literal);
                if let Some(Err(err)) = name.map(str::parse::<Color>) {
                    diagnostics.error(line_number, &err, line);
                }
            }
            _ => {}
        }

        for caps in COLOR_QUERY.captures_iter(line) {
            if let Err(err) = caps[1].parse::<Color>() {
                diagnostics.error(line_number, &err, line);
            }
        }

        for caps in COLOR_COUNT_LITERAL.captures_iter(line) {
            let corner: Vec<i64> = (1..=4).filter_map(|i| caps[i].parse().ok()).collect();
            if let [x1, y1, x2, y2] = corner[..] {
                if x1 > x2 || y1 > y2 {
                    diagnostics.semantic(
                        line_number,
                        "first corner must be the top-left one (x1 <= x2, y1 <= y2)",
                        line,
                    );
                }
            }
        }
    }
}

fn check_spawn(
    line: &str,
    line_number: usize,
    ctx: &ValidationContext<'_>,
    diagnostics: &mut Diagnostics,
) {
    let Some(args) = call_arguments(line, "Spawn") else {
        return;
    };
    let args = split_arguments(args);
    let [x, y] = args[..] else {
        return;
    };
    if !INTEGER.is_match(x) || !INTEGER.is_match(y) {
        return;
    }
    let (Ok(x), Ok(y)) = (x.parse::<i64>(), y.parse::<i64>()) else {
        return;
    };

    let canvas = ctx.agent.canvas();
    if !canvas.is_within_bounds(x, y) {
        diagnostics.semantic(
            line_number,
            format!(
                "spawn position ({x}, {y}) is outside the canvas (size {})",
                canvas.size()
            ),
            line,
        );
    }
}
