use crate::types::{Placement, Rect};

const MAX_COLS: f64 = 80.0;
const MAX_ROWS: f64 = 40.0;

/// Draws one sheet layout as ASCII art, each piece labelled with its placed size.
pub fn render_sheet(sheet: Rect, placements: &[Placement]) -> String {
    let scale = f64::min(
        MAX_COLS / sheet.width as f64,
        MAX_ROWS / sheet.height as f64,
    );
    let cols = (sheet.width as f64 * scale).round() as usize;
    let rows = (sheet.height as f64 * scale).round() as usize;

    if cols == 0 || rows == 0 {
        return String::new();
    }

    let mut canvas = Canvas::new(cols + 1, rows + 1);
    canvas.frame(0, 0, cols, rows);

    for p in placements {
        let x = (p.x as f64 * scale).round() as usize;
        let y = (p.y as f64 * scale).round() as usize;
        let w = (p.placed_width as f64 * scale).round() as usize;
        let h = (p.placed_height as f64 * scale).round() as usize;

        if w == 0 || h == 0 {
            continue;
        }

        canvas.frame(x, y, w, h);
        if w > 2 {
            canvas.label(x, y, w, h, &p.footprint().to_string());
        }
    }

    canvas.into_string()
}

struct Canvas {
    cells: Vec<Vec<char>>,
}

impl Canvas {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            cells: vec![vec![' '; cols]; rows],
        }
    }

    fn set(&mut self, col: usize, row: usize, ch: char) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = match (*cell, ch) {
                (_, '+') | ('+', _) => '+',
                ('|', '-') | ('-', '|') => '+',
                _ => ch,
            };
        }
    }

    fn frame(&mut self, x: usize, y: usize, w: usize, h: usize) {
        for col in x..=x + w {
            self.set(col, y, '-');
            self.set(col, y + h, '-');
        }
        for row in y..=y + h {
            self.set(x, row, '|');
            self.set(x + w, row, '|');
        }
        for (col, row) in [(x, y), (x + w, y), (x, y + h), (x + w, y + h)] {
            self.set(col, row, '+');
        }
    }

    /// Centers `text` inside the frame, clipped to its interior.
    fn label(&mut self, x: usize, y: usize, w: usize, h: usize, text: &str) {
        let row = y + h / 2;
        if row <= y || row >= y + h {
            return;
        }
        let start = (x + w / 2).saturating_sub(text.chars().count() / 2);
        for (i, ch) in text.chars().enumerate() {
            let col = start + i;
            if col > x
                && col < x + w
                && let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col))
            {
                *cell = ch;
            }
        }
    }

    fn into_string(self) -> String {
        let mut out = String::new();
        for row in &self.cells {
            let line: String = row.iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}
