//! Character grid used by the text renderer

use unicode_width::UnicodeWidthChar;

/// Marks a cell covered by the wide character to its left
const CONTINUATION: char = '\0';

/// Character grid that grows on demand
///
/// A double-width character takes its own cell plus a continuation cell,
/// so every row prints at the same display width as it has cells.
#[derive(Debug, Clone, Default)]
pub struct TextCanvas {
    rows: Vec<Vec<char>>,
}

impl TextCanvas {
    /// Create a canvas with the given initial dimensions
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rows: vec![vec![' '; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    fn ensure_size(&mut self, width: usize, height: usize) {
        if height > self.rows.len() {
            self.rows.resize_with(height, Vec::new);
        }
        for row in &mut self.rows {
            if row.len() < width {
                row.resize(width, ' ');
            }
        }
    }

    /// Set a character at the specified position
    ///
    /// Overwriting either half of a wide character blanks the other half.
    pub fn set(&mut self, x: usize, y: usize, c: char) {
        self.ensure_size(x + 1, y + 1);
        let row = &mut self.rows[y];

        if row[x] == CONTINUATION {
            let mut lead = x;
            while lead > 0 && row[lead] == CONTINUATION {
                lead -= 1;
                row[lead + 1] = ' ';
            }
            row[lead] = ' ';
        }
        let mut next = x + 1;
        while next < row.len() && row[next] == CONTINUATION {
            row[next] = ' ';
            next += 1;
        }

        row[x] = c;
    }

    /// Get the character at the specified position
    pub fn get(&self, x: usize, y: usize) -> char {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(' ')
    }

    /// Draw text starting at `x`, advancing by each character's display width
    ///
    /// Returns the number of columns written.
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str) -> usize {
        let mut column = x;
        for c in text.chars() {
            let width = UnicodeWidthChar::width(c).unwrap_or(0).max(1);
            self.set(column, y, c);
            for offset in 1..width {
                self.set(column + offset, y, CONTINUATION);
            }
            column += width;
        }
        column - x
    }

    /// Draw text centered within `[x, x + width)`
    pub fn draw_text_centered(&mut self, x: usize, y: usize, width: usize, text: &str) {
        let text_width = unicode_width::UnicodeWidthStr::width(text);
        let padding = width.saturating_sub(text_width) / 2;
        self.draw_text(x + padding, y, text);
    }

    pub fn draw_horizontal(&mut self, x: usize, y: usize, len: usize, c: char) {
        for i in 0..len {
            self.set(x + i, y, c);
        }
    }

    pub fn draw_vertical(&mut self, x: usize, y: usize, len: usize, c: char) {
        for i in 0..len {
            self.set(x, y + i, c);
        }
    }
}

impl std::fmt::Display for TextCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|&&c| c != CONTINUATION)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect();

        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        write!(f, "{}", lines.join("\n"))
    }
}
