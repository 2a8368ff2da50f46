use tracing::trace;

use crate::agent::Agent;
use crate::error::{Result, WallError};
use crate::expr::Evaluator;
use crate::labels::Labels;
use crate::line::{call_arguments, split_arguments, string_literal};
use crate::variables::Variables;

use super::{CommandKind, GOTO};

/// Mutable run state a handler works on.
pub struct Context<'a> {
    pub agent: &'a mut Agent,
    pub variables: &'a mut Variables,
    pub labels: &'a Labels,
}

impl Context<'_> {
    fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&*self.variables, &*self.agent)
    }

    fn numbers(&self, args: &[&str]) -> Result<Vec<i64>> {
        let evaluator = self.evaluator();
        args.iter()
            .map(|arg| evaluator.evaluate_numeric(arg))
            .collect()
    }
}

/// What the dispatcher does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Next,
    /// Continue at this 0-based line.
    Jump(usize),
    /// The line produced a value (expression statements).
    Value(i64),
}

/// Runs `line` as a command of `kind`. A failure leaves the agent untouched
/// for every command except the primitives that already moved it.
pub fn process(kind: CommandKind, line: &str, ctx: &mut Context<'_>) -> Result<Outcome> {
    trace!(?kind, line, "processing");
    match kind {
        CommandKind::GoTo => go_to(line, ctx),
        CommandKind::Assign => assign(line, ctx),
        CommandKind::Spawn => {
            let args = ctx.numbers(&arguments(kind, line)?)?;
            ctx.agent.spawn(args[0], args[1])?;
            Ok(Outcome::Next)
        }
        CommandKind::Color => {
            let args = arguments(kind, line)?;
            ctx.agent.set_color(color_name(args[0])?)?;
            Ok(Outcome::Next)
        }
        CommandKind::Size => {
            let args = ctx.numbers(&arguments(kind, line)?)?;
            ctx.agent.set_brush_size(args[0])?;
            Ok(Outcome::Next)
        }
        CommandKind::DrawLine => {
            let args = ctx.numbers(&arguments(kind, line)?)?;
            ctx.agent.draw_line(args[0], args[1], args[2])?;
            Ok(Outcome::Next)
        }
        CommandKind::DrawCircle => {
            let args = ctx.numbers(&arguments(kind, line)?)?;
            ctx.agent.draw_circle(args[0], args[1], args[2])?;
            Ok(Outcome::Next)
        }
        CommandKind::DrawRectangle => {
            let args = ctx.numbers(&arguments(kind, line)?)?;
            ctx.agent
                .draw_rectangle(args[0], args[1], args[2], args[3], args[4])?;
            Ok(Outcome::Next)
        }
        CommandKind::Fill => {
            if line != "Fill" {
                arguments(kind, line)?;
            }
            ctx.agent.fill()?;
            Ok(Outcome::Next)
        }
        CommandKind::GetColorCount => {
            let args = arguments(kind, line)?;
            color_name(args[0])?;
            let count = ctx.evaluator().evaluate_numeric(line)?;
            Ok(Outcome::Value(count))
        }
    }
}

/// Arguments of a call-shaped command, checked against its arity.
fn arguments(kind: CommandKind, line: &str) -> Result<Vec<&str>> {
    let usage = || WallError::syntax(format!("malformed {}; usage: {}", kind.keyword(), kind.usage()));
    let args = call_arguments(line, kind.keyword()).ok_or_else(usage)?;
    let args = split_arguments(args);
    if Some(args.len()) != kind.arity() || args.iter().any(|arg| arg.is_empty()) {
        return Err(usage());
    }
    Ok(args)
}

fn color_name(arg: &str) -> Result<&str> {
    string_literal(arg)
        .ok_or_else(|| WallError::syntax(format!("color name must be a quoted string, got {arg}")))
}

fn go_to(line: &str, ctx: &mut Context<'_>) -> Result<Outcome> {
    let caps = GOTO.captures(line).ok_or_else(|| {
        WallError::syntax(format!("malformed GoTo; usage: {}", CommandKind::GoTo.usage()))
    })?;
    let label = caps.get(1).map_or("", |m| m.as_str());
    let condition = caps.get(2).map_or("", |m| m.as_str());

    let target = ctx
        .labels
        .try_resolve(label)
        .ok_or_else(|| WallError::UnknownLabel(label.to_string()))?;

    if ctx.evaluator().evaluate_boolean(condition)? {
        return Ok(Outcome::Jump(target));
    }
    Ok(Outcome::Next)
}

fn assign(line: &str, ctx: &mut Context<'_>) -> Result<Outcome> {
    let (name, expression) = line.split_once("<-").ok_or_else(|| {
        WallError::syntax(format!("malformed assignment; usage: {}", CommandKind::Assign.usage()))
    })?;
    let (name, expression) = (name.trim(), expression.trim());

    if !Variables::is_valid_name(name) {
        return Err(WallError::InvalidIdentifier(name.to_string()));
    }
    if expression.is_empty() {
        return Err(WallError::syntax(format!("nothing to assign to '{name}'")));
    }

    let value = ctx.evaluator().evaluate(expression)?;
    ctx.variables.assign(name, value)?;
    trace!(name, %value, "assigned");
    Ok(Outcome::Next)
}
