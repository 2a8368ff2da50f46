use tracing::trace;

use crate::canvas::{Canvas, Snapshot};
use crate::color::Color;
use crate::constants::{BACKGROUND, DEFAULT_BRUSH_COLOR, DEFAULT_BRUSH_SIZE};
use crate::error::{Result, WallError};

/// The drawing cursor. Owns the canvas it paints on.
#[derive(Debug, Clone)]
pub struct Agent {
    x: i64,
    y: i64,
    color: Color,
    // Always positive and odd.
    brush_size: i64,
    spawned: bool,
    canvas: Canvas,
}

impl Agent {
    pub fn new(canvas_size: usize) -> Self {
        Agent {
            x: 0,
            y: 0,
            color: DEFAULT_BRUSH_COLOR,
            brush_size: DEFAULT_BRUSH_SIZE,
            spawned: false,
            canvas: Canvas::new(canvas_size, BACKGROUND),
        }
    }

    pub fn x(&self) -> i64 {
        self.x
    }

    pub fn y(&self) -> i64 {
        self.y
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn brush_size(&self) -> i64 {
        self.brush_size
    }

    /// Whether a `Spawn` has succeeded during this run.
    pub fn is_spawned(&self) -> bool {
        self.spawned
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn snapshot(&self) -> Snapshot {
        self.canvas.snapshot()
    }

    pub fn spawn(&mut self, x: i64, y: i64) -> Result<()> {
        if !self.canvas.is_within_bounds(x, y) {
            return Err(WallError::OutOfBounds { x, y });
        }
        self.x = x;
        self.y = y;
        self.spawned = true;
        trace!(x, y, "spawned");
        Ok(())
    }

    pub fn set_color(&mut self, name: &str) -> Result<()> {
        self.color = name.parse()?;
        Ok(())
    }

    /// Even sizes round down to the odd size below.
    pub fn set_brush_size(&mut self, size: i64) -> Result<()> {
        if size <= 0 {
            return Err(WallError::InvalidBrushSize(size));
        }
        self.brush_size = if size % 2 == 0 { size - 1 } else { size };
        Ok(())
    }

    /// Stamps the current brush along `path`; see [`Canvas::stamp_path`].
    fn stamp_path(&mut self, first: i128, last: i128, path: impl Fn(i128) -> (i128, i128)) {
        if self.color != Color::Transparent {
            self.canvas
                .stamp_path(first, last, path, self.color, self.brush_size);
        }
    }

    pub fn draw_line(&mut self, dir_x: i64, dir_y: i64, distance: i64) -> Result<()> {
        check_direction(dir_x, dir_y)?;
        if distance < 0 {
            return Err(WallError::NegativeLength {
                what: "distance",
                value: distance,
            });
        }
        let end_x = offset(self.x, dir_x, distance)?;
        let end_y = offset(self.y, dir_y, distance)?;

        let (x, y) = (i128::from(self.x), i128::from(self.y));
        let (dx, dy) = (i128::from(dir_x), i128::from(dir_y));
        self.stamp_path(1, i128::from(distance), |k| (x + k * dx, y + k * dy));

        self.x = end_x;
        self.y = end_y;
        Ok(())
    }

    /// Eight-way symmetric circle around `position + dir * radius`; the agent ends on the center.
    pub fn draw_circle(&mut self, dir_x: i64, dir_y: i64, radius: i64) -> Result<()> {
        check_direction(dir_x, dir_y)?;
        if radius < 0 {
            return Err(WallError::NegativeLength {
                what: "radius",
                value: radius,
            });
        }
        let center_x = offset(self.x, dir_x, radius)?;
        let center_y = offset(self.y, dir_y, radius)?;

        let r = radius as u128;
        let height = |t: i128| octant_height(r, t as u128) as i128;
        // Last column of the first octant, where the arc meets the diagonal.
        let (mut lo, mut hi) = (0u128, r);
        while lo < hi {
            let mid = lo + (hi - lo).div_ceil(2);
            if octant_height(r, mid) >= mid {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        let last = lo as i128;

        let (cx, cy) = (i128::from(center_x), i128::from(center_y));
        for (sx, sy) in [(1, 1), (-1, 1), (1, -1), (-1, -1)] {
            self.stamp_path(0, last, |t| (cx + sx * t, cy + sy * height(t)));
            self.stamp_path(0, last, |t| (cx + sx * height(t), cy + sy * t));
        }

        self.x = center_x;
        self.y = center_y;
        Ok(())
    }

    /// Outline of a `width` x `height` rectangle centered at `position + dir * distance`.
    pub fn draw_rectangle(
        &mut self,
        dir_x: i64,
        dir_y: i64,
        distance: i64,
        width: i64,
        height: i64,
    ) -> Result<()> {
        check_direction(dir_x, dir_y)?;
        for (what, value) in [("distance", distance), ("width", width), ("height", height)] {
            if value < 0 {
                return Err(WallError::NegativeLength { what, value });
            }
        }
        let center_x = offset(self.x, dir_x, distance)?;
        let center_y = offset(self.y, dir_y, distance)?;

        let (cx, cy) = (i128::from(center_x), i128::from(center_y));
        let (left, right) = (cx - i128::from(width / 2), cx + i128::from(width / 2));
        let (top, bottom) = (cy - i128::from(height / 2), cy + i128::from(height / 2));

        self.stamp_path(left, right, |x| (x, top));
        self.stamp_path(left, right, |x| (x, bottom));
        self.stamp_path(top, bottom, |y| (left, y));
        self.stamp_path(top, bottom, |y| (right, y));

        self.x = center_x;
        self.y = center_y;
        Ok(())
    }

    pub fn fill(&mut self) -> Result<()> {
        if self.color == Color::Transparent {
            return Err(WallError::TransparentFill);
        }
        self.canvas.flood_fill(self.x, self.y, self.color)
    }

    pub fn canvas_size(&self) -> i64 {
        self.canvas.size() as i64
    }

    pub fn is_brush_color(&self, name: &str) -> Result<i64> {
        let color: Color = name.parse()?;
        Ok((self.color == color) as i64)
    }

    pub fn is_brush_size(&self, size: i64) -> i64 {
        (self.brush_size == size) as i64
    }

    /// 1 when the cell `vertical` rows and `horizontal` columns away has `name`'s color.
    pub fn is_canvas_color(&self, name: &str, vertical: i64, horizontal: i64) -> Result<i64> {
        let color: Color = name.parse()?;
        let (Some(x), Some(y)) = (self.x.checked_add(horizontal), self.y.checked_add(vertical))
        else {
            return Ok(0);
        };
        if !self.canvas.is_within_bounds(x, y) {
            return Ok(0);
        }
        Ok((self.canvas.get_pixel(x, y)? == color) as i64)
    }

    pub fn get_color_count(&self, name: &str, x1: i64, y1: i64, x2: i64, y2: i64) -> Result<i64> {
        let color: Color = name.parse()?;
        if !self.canvas.is_within_bounds(x1, y1) || !self.canvas.is_within_bounds(x2, y2) {
            return Ok(0);
        }
        Ok(self.canvas.count_color(color, x1, y1, x2, y2) as i64)
    }
}

/// `from + dir * distance`, or `Overflow` when it leaves the `i64` range.
fn offset(from: i64, dir: i64, distance: i64) -> Result<i64> {
    dir.checked_mul(distance)
        .and_then(|step| from.checked_add(step))
        .ok_or(WallError::Overflow)
}

/// Height of the first-octant arc of a radius-`r` circle at column `t`
/// (`t <= r`): the `y` that puts `t² + y²` closest to `r²`.
fn octant_height(r: u128, t: u128) -> u128 {
    let rest = r * r - t * t;
    let floor = rest.isqrt();
    if (floor + 1) * (floor + 1) - rest < rest - floor * floor {
        floor + 1
    } else {
        floor
    }
}

fn check_direction(dir_x: i64, dir_y: i64) -> Result<()> {
    if dir_x.abs() > 1 || dir_y.abs() > 1 {
        return Err(WallError::InvalidDirection { dir_x, dir_y });
    }
    Ok(())
}
