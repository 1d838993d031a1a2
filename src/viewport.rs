//! Projection between canvas pixels and terminal cells.

/// Maps the fixed logical canvas onto a terminal of `cols` × `rows` cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            canvas_width,
            canvas_height,
        }
    }

    /// Canvas pixels covered by one cell, horizontally.
    pub fn cell_width(&self) -> f32 {
        self.canvas_width / self.cols as f32
    }

    /// Canvas pixels covered by one cell, vertically.
    pub fn cell_height(&self) -> f32 {
        self.canvas_height / self.rows as f32
    }

    /// Cell containing a canvas point. May lie off screen.
    pub fn to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_width()).floor() as i32,
            (y / self.cell_height()).floor() as i32,
        )
    }

    /// Canvas point at the centre of a cell.
    pub fn to_canvas(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.cell_width(),
            (row as f32 + 0.5) * self.cell_height(),
        )
    }

    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < self.cols as i32 && row < self.rows as i32
    }
}
