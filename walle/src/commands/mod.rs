//! The closed set of statements a line can hold, tried in a fixed order.

mod handlers;

use lazy_static::lazy_static;
use regex::Regex;

pub use handlers::{Context, Outcome, process};

lazy_static! {
    /// `GoTo [label] (condition)`
    pub static ref GOTO: Regex =
        Regex::new(r"^GoTo\s*\[\s*([A-Za-z][A-Za-z0-9_-]*)\s*\]\s*\((.*)\)\s*$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    GoTo,
    Spawn,
    Color,
    DrawLine,
    Assign,
    Fill,
    Size,
    DrawCircle,
    GetColorCount,
    DrawRectangle,
}

impl CommandKind {
    /// Match priority: the first kind whose pattern fits a line handles it.
    pub fn all() -> Vec<Self> {
        vec![
            Self::GoTo,
            Self::Spawn,
            Self::Color,
            Self::DrawLine,
            Self::Assign,
            Self::Fill,
            Self::Size,
            Self::DrawCircle,
            Self::GetColorCount,
            Self::DrawRectangle,
        ]
    }

    /// First kind in priority order that claims `line` (already trimmed).
    pub fn resolve(line: &str) -> Option<Self> {
        Self::all().into_iter().find(|kind| kind.matches(line))
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::GoTo => "GoTo",
            Self::Spawn => "Spawn",
            Self::Color => "Color",
            Self::DrawLine => "DrawLine",
            Self::Assign => "<-",
            Self::Fill => "Fill",
            Self::Size => "Size",
            Self::DrawCircle => "DrawCircle",
            Self::GetColorCount => "GetColorCount",
            Self::DrawRectangle => "DrawRectangle",
        }
    }

    pub fn matches(&self, line: &str) -> bool {
        match self {
            Self::GoTo => line.starts_with("GoTo"),
            Self::Assign => line.contains("<-"),
            Self::Fill => line == "Fill" || line.starts_with("Fill("),
            _ => line
                .strip_prefix(self.keyword())
                .is_some_and(|rest| rest.starts_with('(')),
        }
    }

    /// Argument count of call-shaped commands.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::GoTo | Self::Assign => None,
            Self::Fill => Some(0),
            Self::Color | Self::Size => Some(1),
            Self::Spawn => Some(2),
            Self::DrawLine | Self::DrawCircle => Some(3),
            Self::GetColorCount | Self::DrawRectangle => Some(5),
        }
    }

    /// Whether the first argument is a quoted color name.
    pub fn takes_color(&self) -> bool {
        matches!(self, Self::Color | Self::GetColorCount)
    }

    pub fn usage(&self) -> &'static str {
        match self {
            Self::GoTo => "GoTo [label] (condition)",
            Self::Spawn => "Spawn(x, y)",
            Self::Color => "Color(\"Name\")",
            Self::DrawLine => "DrawLine(dirX, dirY, distance)",
            Self::Assign => "variable <- expression",
            Self::Fill => "Fill()",
            Self::Size => "Size(n)",
            Self::DrawCircle => "DrawCircle(dirX, dirY, radius)",
            Self::GetColorCount => "GetColorCount(\"Name\", x1, y1, x2, y2)",
            Self::DrawRectangle => "DrawRectangle(dirX, dirY, distance, width, height)",
        }
    }

    /// Commands that paint onto the canvas.
    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            Self::DrawLine | Self::DrawCircle | Self::DrawRectangle | Self::Fill
        )
    }
}
