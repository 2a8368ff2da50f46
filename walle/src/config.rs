use crate::constants::{DEFAULT_CANVAS_SIZE, MAX_CANVAS_SIZE, MIN_CANVAS_SIZE};
use crate::error::{Result, WallError};

/// Settings for a run. The canvas size is the only state a caller keeps
/// between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub canvas_size: usize,
    /// Executed-line budget; `None` lets a looping program run forever.
    pub max_steps: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            max_steps: None,
        }
    }
}

impl Config {
    pub fn with_canvas_size(mut self, canvas_size: usize) -> Self {
        self.canvas_size = canvas_size;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_canvas_size(self.canvas_size)
    }
}

pub fn validate_canvas_size(size: usize) -> Result<()> {
    if !(MIN_CANVAS_SIZE..=MAX_CANVAS_SIZE).contains(&size) {
        return Err(WallError::InvalidCanvasSize {
            size,
            min: MIN_CANVAS_SIZE,
            max: MAX_CANVAS_SIZE,
        });
    }
    Ok(())
}
