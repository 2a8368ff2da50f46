//! Interpreter for the Pixel Wall-E drawing language: one agent, one
//! square canvas, one statement per line.

pub mod agent;
pub mod canvas;
pub mod color;
pub mod commands;
pub mod config;
pub mod constants;
pub mod diagnostic;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod labels;
pub mod line;
pub mod validation;
pub mod variables;

pub use agent::Agent;
pub use canvas::{Canvas, Snapshot};
pub use color::Color;
pub use config::Config;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{Result, WallError};
pub use interpreter::{ExecutionResult, Interpreter, check};
pub use variables::{Value, Variables};
