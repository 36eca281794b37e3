//! Character-cell drawing surface addressed in canvas pixels.
//!
//! Games draw in their 800x600 canvas space; the surface scales every shape
//! into the terminal cells it was created with. It is cleared on creation and
//! turned into lines once per frame.

use ratatui::prelude::*;

pub struct Surface {
    cols: usize,
    rows: usize,
    sx: f32,
    sy: f32,
    bg: Color,
    cells: Vec<(char, Style)>,
}

impl Surface {
    pub fn new(cols: usize, rows: usize, canvas_w: f32, canvas_h: f32, bg: Color) -> Self {
        Self {
            cols,
            rows,
            sx: cols as f32 / canvas_w,
            sy: rows as f32 / canvas_h,
            bg,
            cells: vec![(' ', Style::default().bg(bg)); cols * rows],
        }
    }

    /// Cell containing a canvas point, if it is on screen.
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let cx = (x * self.sx).floor();
        let cy = (y * self.sy).floor();
        if cx < 0.0 || cy < 0.0 || !cx.is_finite() || !cy.is_finite() {
            return None;
        }
        let (cx, cy) = (cx as usize, cy as usize);
        (cx < self.cols && cy < self.rows).then_some((cx, cy))
    }

    pub fn put(&mut self, col: usize, row: usize, ch: char, fg: Color) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = (ch, Style::default().fg(fg).bg(self.bg));
        }
    }

    pub fn put_styled(&mut self, col: usize, row: usize, ch: char, style: Style) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = (ch, style.bg(self.bg));
        }
    }

    #[cfg(test)]
    pub fn cell(&self, col: usize, row: usize) -> Option<char> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col].0)
    }

    /// Fill the cells a rectangle covers. Anything on screen gets at least
    /// one cell so small entities never vanish when scaled down.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, ch: char, fg: Color) {
        let c0 = (x * self.sx).floor().max(0.0);
        let r0 = (y * self.sy).floor().max(0.0);
        let c1 = ((x + w) * self.sx).ceil().min(self.cols as f32);
        let r1 = ((y + h) * self.sy).ceil().min(self.rows as f32);
        if c1 <= c0 || r1 <= r0 {
            return;
        }
        for row in r0 as usize..r1 as usize {
            for col in c0 as usize..c1 as usize {
                self.put(col, row, ch, fg);
            }
        }
    }

    /// Filled disc; always marks the centre cell.
    pub fn circle(&mut self, cx: f32, cy: f32, r: f32, ch: char, fg: Color) {
        let c0 = ((cx - r) * self.sx).floor().max(0.0) as usize;
        let r0 = ((cy - r) * self.sy).floor().max(0.0) as usize;
        let c1 = (((cx + r) * self.sx).ceil().max(0.0) as usize).min(self.cols);
        let r1 = (((cy + r) * self.sy).ceil().max(0.0) as usize).min(self.rows);
        for row in r0..r1 {
            for col in c0..c1 {
                let dx = (col as f32 + 0.5) / self.sx - cx;
                let dy = (row as f32 + 0.5) / self.sy - cy;
                if dx * dx + dy * dy <= r * r {
                    self.put(col, row, ch, fg);
                }
            }
        }
        if let Some((col, row)) = self.to_cell(cx, cy) {
            self.put(col, row, ch, fg);
        }
    }

    /// Circle outline.
    pub fn ring(&mut self, cx: f32, cy: f32, r: f32, ch: char, fg: Color) {
        let steps = ((r * std::f32::consts::TAU) / 4.0).ceil().max(8.0) as usize;
        for i in 0..steps {
            let a = i as f32 / steps as f32 * std::f32::consts::TAU;
            if let Some((col, row)) = self.to_cell(cx + r * a.cos(), cy + r * a.sin()) {
                self.put(col, row, ch, fg);
            }
        }
    }

    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, ch: char, fg: Color) {
        let dc = ((x1 - x0) * self.sx).abs();
        let dr = ((y1 - y0) * self.sy).abs();
        let steps = dc.max(dr).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            if let Some((col, row)) = self.to_cell(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t) {
                self.put(col, row, ch, fg);
            }
        }
    }

    /// Text whose first character lands on the cell containing `(x, y)`.
    pub fn text(&mut self, x: f32, y: f32, text: &str, style: Style) {
        let Some((col, row)) = self.to_cell(x, y) else { return };
        for (i, ch) in text.chars().enumerate() {
            self.put_styled(col + i, row, ch, style);
        }
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        let cols = self.cols.max(1);
        self.cells
            .chunks(cols)
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .iter()
                    .map(|(ch, style)| Span::styled(String::from(*ch), *style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}
