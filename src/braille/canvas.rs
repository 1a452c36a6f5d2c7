use std::fmt;

/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell holds a 2x4 dot grid; U+2800 is the empty cell.
pub struct BrailleCanvas {
    cols: usize,
    rows: usize,
    cells: Vec<u8>,
}

/// Dot bit for (x % 2, y % 4) inside a cell
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

impl BrailleCanvas {
    /// Canvas of `cols` x `rows` characters (`cols*2` x `rows*4` dots)
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![0; cols * rows],
        }
    }

    /// Dot resolution (width, height)
    pub fn dots(&self) -> (usize, usize) {
        (self.cols * 2, self.rows * 4)
    }

    /// Set a dot; coordinates off the canvas are ignored
    pub fn set(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.cols || cy >= self.rows {
            return;
        }
        self.cells[cy * self.cols + cx] |= DOT_BITS[x % 2][y % 4];
    }

    /// Bresenham line between two dots, clipped dot by dot
    pub fn line(&mut self, from: (i32, i32), to: (i32, i32)) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = (to.1 - y).abs();
        let step_x = (to.0 - x).signum();
        let step_y = (to.1 - y).signum();
        let mut err = dx - dy;

        loop {
            self.set(x, y);
            if (x, y) == to {
                break;
            }
            let e2 = err * 2;
            if e2 > -dy {
                err -= dy;
                x += step_x;
            }
            if e2 < dx {
                err += dx;
                y += step_y;
            }
        }
    }

    /// True if no dot is set
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }

    /// Character at a cell, `None` for empty or out-of-range cells
    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        match self.cells[row * self.cols + col] {
            0 => None,
            bits => char::from_u32(0x2800 + bits as u32),
        }
    }
}

/// Whole canvas, one line per character row
impl fmt::Display for BrailleCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                f.write_str("\n")?;
            }
            for col in 0..self.cols {
                write!(f, "{}", self.glyph(col, row).unwrap_or('\u{2800}'))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_dot() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set(0, 0);
        assert_eq!(canvas.to_string(), "⠁");
    }

    #[test]
    fn test_display_rows() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.set(3, 7);
        assert_eq!(canvas.to_string(), "\u{2800}\u{2800}\n\u{2800}⢀");
    }

    #[test]
    fn test_full_cell() {
        let mut canvas = BrailleCanvas::new(1, 1);
        for x in 0..2 {
            for y in 0..4 {
                canvas.set(x, y);
            }
        }
        assert_eq!(canvas.to_string(), "⣿");
    }

    #[test]
    fn test_off_canvas_ignored() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set(-1, 0);
        canvas.set(4, 0);
        canvas.set(0, 4);
        assert!(canvas.is_blank());
        assert_eq!(canvas.glyph(5, 0), None);
    }

    #[test]
    fn test_diagonal_line() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.line((0, 0), (3, 3));
        // (0,0)+(1,1) = 0x11, (2,2)+(3,3) = 0x84
        assert_eq!(canvas.to_string(), "⠑⢄");
    }

    #[test]
    fn test_horizontal_line_both_directions() {
        let mut a = BrailleCanvas::new(5, 1);
        let mut b = BrailleCanvas::new(5, 1);
        a.line((0, 0), (9, 0));
        b.line((9, 0), (0, 0));
        assert_eq!(a.to_string(), "⠉⠉⠉⠉⠉");
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_dots() {
        assert_eq!(BrailleCanvas::new(3, 2).dots(), (6, 8));
    }
}
