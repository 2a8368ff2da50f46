use thiserror::Error;

use crate::diagnostic::DiagnosticKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WallError {
    #[error("{message}")]
    Syntax { message: String },

    #[error("wrong number of arguments for {function}: expected {expected}, found {found}")]
    ArgumentCount {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    #[error("label not found: '{0}'")]
    UnknownLabel(String),

    #[error("invalid label name: '{0}'")]
    InvalidLabelName(String),

    #[error("duplicate label: '{0}'")]
    DuplicateLabel(String),

    #[error("unknown color: '{0}'")]
    UnknownColor(String),

    #[error("undefined variable: '{0}'")]
    UndefinedVariable(String),

    #[error("type mismatch: '{name}' is not {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("division by zero")]
    DivideByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("invalid expression: '{0}'")]
    InvalidExpression(String),

    #[error("expression nested too deeply")]
    ExpressionTooDeep,

    #[error("unknown function: '{0}'")]
    UnknownFunction(String),

    #[error("position ({x}, {y}) is outside the canvas")]
    OutOfBounds { x: i64, y: i64 },

    #[error("cannot fill with Transparent")]
    TransparentFill,

    #[error("brush size must be greater than 0, got {0}")]
    InvalidBrushSize(i64),

    #[error("directions must be -1, 0 or 1, got ({dir_x}, {dir_y})")]
    InvalidDirection { dir_x: i64, dir_y: i64 },

    #[error("{what} must not be negative, got {value}")]
    NegativeLength { what: &'static str, value: i64 },

    #[error("step limit of {0} exceeded")]
    StepLimit(usize),

    #[error("canvas size must be between {min} and {max}, got {size}")]
    InvalidCanvasSize { size: usize, min: usize, max: usize },
}

impl WallError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    /// Which diagnostic category this failure is reported under.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::Syntax { .. } | Self::ArgumentCount { .. } | Self::InvalidIdentifier(_) => {
                DiagnosticKind::Syntactic
            }
            Self::UnknownLabel(_)
            | Self::InvalidLabelName(_)
            | Self::DuplicateLabel(_)
            | Self::UnknownColor(_) => DiagnosticKind::Semantic,
            _ => DiagnosticKind::Runtime,
        }
    }
}

pub type Result<T> = std::result::Result<T, WallError>;
