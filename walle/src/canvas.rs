use std::collections::VecDeque;

use serde::Serialize;

use crate::color::Color;
use crate::error::{Result, WallError};

/// Square grid of color cells, origin top-left, stored row by row.
#[derive(Debug, Clone)]
pub struct Canvas {
    size: usize,
    pixels: Vec<Color>,
    background: Color,
}

impl Canvas {
    pub fn new(size: usize, background: Color) -> Self {
        Canvas {
            size,
            pixels: vec![background; size * size],
            background,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    pub fn is_within_bounds(&self, x: i64, y: i64) -> bool {
        let size = self.size as i64;
        x >= 0 && x < size && y >= 0 && y < size
    }

    fn index(&self, x: i64, y: i64) -> usize {
        y as usize * self.size + x as usize
    }

    pub fn get_pixel(&self, x: i64, y: i64) -> Result<Color> {
        if !self.is_within_bounds(x, y) {
            return Err(WallError::OutOfBounds { x, y });
        }
        Ok(self.pixels[self.index(x, y)])
    }

    /// Paints one cell, or a `brush_size` square centered on it.
    /// Cells falling outside the grid are skipped.
    pub fn draw_pixel(&mut self, x: i64, y: i64, color: Color, brush_size: i64) {
        let point = (i128::from(x), i128::from(y));
        self.stamp_path(0, 0, |_| point, color, brush_size);
    }

    /// Stamps the brush on `path(k)` for every `k` in `first..=last`.
    ///
    /// Both coordinates of `path` must be monotone in `k` and consecutive
    /// points must touch (move by at most one cell per axis). The union of
    /// stamps is then a single run of cells per row, so the cost depends on
    /// the grid size only, not on how long the path is or how big the brush is.
    pub fn stamp_path(
        &mut self,
        first: i128,
        last: i128,
        path: impl Fn(i128) -> (i128, i128),
        color: Color,
        brush_size: i64,
    ) {
        if first > last || self.size == 0 {
            return;
        }
        let half = i128::from((brush_size.max(1) - 1) / 2);
        let last_cell = self.size as i128 - 1;

        let (y_first, y_last) = (path(first).1, path(last).1);
        let top = (y_first.min(y_last) - half).max(0);
        let bottom = (y_first.max(y_last) + half).min(last_cell);

        for row in top..=bottom {
            let Some((from, to)) =
                monotone_range(|k| path(k).1, first, last, row - half, row + half)
            else {
                continue;
            };
            let (x_from, x_to) = (path(from).0, path(to).0);
            let left = (x_from.min(x_to) - half).max(0);
            let right = (x_from.max(x_to) + half).min(last_cell);
            for col in left..=right {
                let index = self.index(col as i64, row as i64);
                self.pixels[index] = color;
            }
        }
    }

    /// Replaces the 4-connected region sharing the color at `(x, y)`.
    pub fn flood_fill(&mut self, x: i64, y: i64, new_color: Color) -> Result<()> {
        let target = self.get_pixel(x, y)?;
        if target == new_color {
            return Ok(());
        }

        let mut queue = VecDeque::new();
        let start = self.index(x, y);
        self.pixels[start] = new_color;
        queue.push_back((x, y));

        while let Some((cx, cy)) = queue.pop_front() {
            for (nx, ny) in [(cx + 1, cy), (cx - 1, cy), (cx, cy + 1), (cx, cy - 1)] {
                if !self.is_within_bounds(nx, ny) {
                    continue;
                }
                let index = self.index(nx, ny);
                if self.pixels[index] == target {
                    self.pixels[index] = new_color;
                    queue.push_back((nx, ny));
                }
            }
        }
        Ok(())
    }

    /// Number of `color` cells in the rectangle spanned by two corners (any order).
    pub fn count_color(&self, color: Color, x1: i64, y1: i64, x2: i64, y2: i64) -> usize {
        let (left, right) = (x1.min(x2).max(0), x1.max(x2).min(self.size as i64 - 1));
        let (top, bottom) = (y1.min(y2).max(0), y1.max(y2).min(self.size as i64 - 1));

        let mut count = 0;
        for y in top..=bottom {
            for x in left..=right {
                if self.pixels[self.index(x, y)] == color {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.size,
            pixels: self.pixels.clone(),
        }
    }
}

/// The `k` in `first..=last` whose `f(k)` lies in `lo..=hi`, for monotone `f`.
fn monotone_range(
    f: impl Fn(i128) -> i128,
    first: i128,
    last: i128,
    lo: i128,
    hi: i128,
) -> Option<(i128, i128)> {
    let (start, end) = if f(first) <= f(last) {
        (
            partition_point(first, last, |k| f(k) < lo),
            partition_point(first, last, |k| f(k) <= hi) - 1,
        )
    } else {
        (
            partition_point(first, last, |k| f(k) > hi),
            partition_point(first, last, |k| f(k) >= lo) - 1,
        )
    };
    (start <= end).then_some((start, end))
}

/// First `k` in `first..=last` where `pred` turns false (`last + 1` if never).
fn partition_point(first: i128, last: i128, pred: impl Fn(i128) -> bool) -> i128 {
    let (mut lo, mut hi) = (first, last + 1);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Read-only copy of the grid handed to whoever displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    size: usize,
    pixels: Vec<Color>,
}

impl Snapshot {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.pixels.get(y * self.size + x).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.pixels.chunks(self.size.max(1))
    }

    pub fn count(&self, color: Color) -> usize {
        self.pixels.iter().filter(|&&c| c == color).count()
    }

    /// Row-major 0xRRGGBB buffer.
    pub fn to_buffer(&self) -> Vec<u32> {
        self.pixels.iter().map(Color::rgb).collect()
    }
}
