use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::agent::Agent;
use crate::canvas::Snapshot;
use crate::commands::{self, CommandKind, Context, Outcome};
use crate::config::{Config, validate_canvas_size};
use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::{Result, WallError};
use crate::labels::Labels;
use crate::line::is_comment;
use crate::validation::{self, ValidationContext, Validator};
use crate::variables::Variables;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    /// True when no diagnostic was recorded.
    pub success: bool,
    pub diagnostics: Vec<Diagnostic>,
    /// Executable lines dispatched, jumps included.
    pub steps: usize,
    /// Value of the last expression statement, if any ran.
    pub last_value: Option<i64>,
}

impl ExecutionResult {
    fn finish(diagnostics: Diagnostics, steps: usize, last_value: Option<i64>) -> Self {
        let diagnostics = diagnostics.into_vec();
        ExecutionResult {
            success: diagnostics.is_empty(),
            diagnostics,
            steps,
            last_value,
        }
    }
}

/// Runs whole programs. Agent, canvas and variables are rebuilt on every
/// [`Interpreter::execute`] and stay readable afterwards.
#[derive(Debug)]
pub struct Interpreter {
    config: Config,
    agent: Agent,
    variables: Variables,
    labels: Labels,
}

impl Default for Interpreter {
    fn default() -> Self {
        let config = Config::default();
        Interpreter {
            agent: Agent::new(config.canvas_size),
            config,
            variables: Variables::new(),
            labels: Labels::new(),
        }
    }
}

impl Interpreter {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Interpreter {
            agent: Agent::new(config.canvas_size),
            config,
            variables: Variables::new(),
            labels: Labels::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Takes effect immediately with a blank canvas.
    pub fn set_canvas_size(&mut self, size: usize) -> Result<()> {
        validate_canvas_size(size)?;
        self.config.canvas_size = size;
        self.agent = Agent::new(size);
        Ok(())
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn snapshot(&self) -> Snapshot {
        self.agent.snapshot()
    }

    pub fn execute(&mut self, source: &str) -> ExecutionResult {
        self.agent = Agent::new(self.config.canvas_size);
        self.variables = Variables::new();
        self.labels = Labels::new();

        let mut diagnostics = Diagnostics::new();
        if source.trim().is_empty() {
            diagnostics.syntactic(1, "empty program", "");
            return ExecutionResult::finish(diagnostics, 0, None);
        }

        let lines = program_lines(source);
        scan_labels(&lines, &mut self.labels, &mut diagnostics);
        if !self.labels.is_empty() {
            debug!(labels = self.labels.len(), "labels collected");
        }

        let validators = validation::pipeline();
        let mut pc = 0;
        let mut steps = 0;
        let mut last_value = None;

        while pc < lines.len() {
            let line = lines[pc];
            if !is_executable(line) {
                pc += 1;
                continue;
            }
            if let Some(max) = self.config.max_steps {
                if steps >= max {
                    warn!(max, line = pc + 1, "step limit reached, halting");
                    diagnostics.error(pc + 1, &WallError::StepLimit(max), line);
                    break;
                }
            }
            steps += 1;

            let line_number = pc + 1;
            let before = diagnostics.len();
            self.run_validators(&validators, line, line_number, &mut diagnostics);
            let flagged: Vec<DiagnosticKind> =
                diagnostics.since(before).iter().map(|d| d.kind).collect();

            let Some(kind) = CommandKind::resolve(line) else {
                diagnostics.syntactic(line_number, format!("unrecognized command: {line}"), line);
                pc += 1;
                continue;
            };

            trace!(line = line_number, ?kind, "dispatch");
            let mut ctx = Context {
                agent: &mut self.agent,
                variables: &mut self.variables,
                labels: &self.labels,
            };
            pc = match commands::process(kind, line, &mut ctx) {
                Ok(Outcome::Next) => pc + 1,
                Ok(Outcome::Jump(target)) => {
                    debug!(from = line_number, to = target + 1, "jump");
                    target
                }
                Ok(Outcome::Value(value)) => {
                    last_value = Some(value);
                    pc + 1
                }
                Err(err) => {
                    // A line the validators already called malformed is not reported twice.
                    let kind = err.kind();
                    if kind == DiagnosticKind::Runtime || !flagged.contains(&kind) {
                        diagnostics.error(line_number, &err, line);
                    }
                    pc + 1
                }
            };
        }

        let result = ExecutionResult::finish(diagnostics, steps, last_value);
        debug!(
            steps = result.steps,
            diagnostics = result.diagnostics.len(),
            "run finished"
        );
        result
    }

    fn run_validators(
        &self,
        validators: &[Box<dyn Validator>],
        line: &str,
        line_number: usize,
        diagnostics: &mut Diagnostics,
    ) {
        let ctx = ValidationContext {
            labels: &self.labels,
            agent: &self.agent,
        };
        for validator in validators {
            validator.validate(line, line_number, &ctx, diagnostics);
        }
    }
}

/// Static validation only: label pre-pass plus the syntax and semantic passes.
pub fn check(source: &str, config: &Config) -> Result<Vec<Diagnostic>> {
    config.validate()?;
    let mut diagnostics = Diagnostics::new();
    if source.trim().is_empty() {
        diagnostics.syntactic(1, "empty program", "");
        return Ok(diagnostics.into_vec());
    }

    let lines = program_lines(source);
    let mut labels = Labels::new();
    scan_labels(&lines, &mut labels, &mut diagnostics);

    let agent = Agent::new(config.canvas_size);
    let ctx = ValidationContext {
        labels: &labels,
        agent: &agent,
    };
    let validators = validation::static_pipeline();
    for (index, line) in lines.iter().enumerate() {
        if !is_executable(line) {
            continue;
        }
        for validator in &validators {
            validator.validate(line, index + 1, &ctx, &mut diagnostics);
        }
        if CommandKind::resolve(line).is_none() {
            diagnostics.syntactic(index + 1, format!("unrecognized command: {line}"), line);
        }
    }
    Ok(diagnostics.into_vec())
}

fn program_lines(source: &str) -> Vec<&str> {
    source.split('\n').map(str::trim).collect()
}

fn is_executable(line: &str) -> bool {
    !line.is_empty() && !is_comment(line) && !Labels::is_label_line(line)
}

fn scan_labels(lines: &[&str], labels: &mut Labels, diagnostics: &mut Diagnostics) {
    for (index, line) in lines.iter().enumerate() {
        if let Some(name) = Labels::label_name(line) {
            if let Err(err) = labels.add_label(name, index) {
                diagnostics.error(index + 1, &err, line);
            }
        }
    }
}
