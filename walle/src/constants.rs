use crate::color::Color;

/// Canvas side used when the caller does not pick one.
pub const DEFAULT_CANVAS_SIZE: usize = 86;
pub const MIN_CANVAS_SIZE: usize = 10;
pub const MAX_CANVAS_SIZE: usize = 500;

/// Every cell starts with this color.
pub const BACKGROUND: Color = Color::White;
/// Brush color of a freshly created agent.
pub const DEFAULT_BRUSH_COLOR: Color = Color::Black;
pub const DEFAULT_BRUSH_SIZE: i64 = 1;

/// Nesting limit for the expression evaluator (parentheses and operator splits).
pub const MAX_EXPRESSION_DEPTH: usize = 256;
