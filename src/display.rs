use crate::board::Board;
use crate::config::COLUMNS;
use crate::segment::{encode, Glyph, BLANK, SEG_DP};

/// Segment patterns currently on show, leftmost column first.
///
/// Bit `n` of the decimal-point mask belongs to column `COLUMNS - 1 - n`, so
/// `0b1000` lights the point after the leftmost digit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayState {
    segments: [u8; COLUMNS],
    dp_mask: u8,
}

impl DisplayState {
    pub const fn blank() -> Self {
        Self {
            segments: [BLANK; COLUMNS],
            dp_mask: 0,
        }
    }

    /// Shows up to four characters; columns past the end of `text` go blank.
    pub fn show(&mut self, text: &str, dp_mask: u8) {
        let mut chars = text.chars();
        for slot in self.segments.iter_mut() {
            *slot = chars.next().map_or(BLANK, |c| encode(Glyph::from_char(c)));
        }
        self.dp_mask = dp_mask;
    }

    pub fn show_plain(&mut self, text: &str) {
        self.show(text, 0);
    }

    pub fn segments(&self) -> &[u8; COLUMNS] {
        &self.segments
    }

    pub fn dp_mask(&self) -> u8 {
        self.dp_mask
    }

    /// Pattern for `column` with its decimal point applied.
    pub fn column_pattern(&self, column: usize) -> u8 {
        let Some(&segs) = self.segments.get(column) else {
            return BLANK;
        };
        if self.dp_mask & column_bit(column) != 0 {
            segs | SEG_DP
        } else {
            segs
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::blank()
    }
}

/// Select-line bit for a column. Column 0 sits on the highest line.
pub fn column_bit(column: usize) -> u8 {
    match column {
        c if c < COLUMNS => 1 << (COLUMNS - 1 - c),
        _ => 0,
    }
}

/// Walks the columns, one per tick.
pub struct Multiplexer {
    cursor: usize,
}

impl Multiplexer {
    pub const fn new() -> Self {
        // First tick lands on column 0
        Self { cursor: COLUMNS - 1 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves to the next column and drives it. Returns the column now lit.
    pub fn render_tick<B: Board>(&mut self, display: &DisplayState, board: &mut B) -> usize {
        self.cursor = (self.cursor + 1) % COLUMNS;
        let segs = display.column_pattern(self.cursor);

        // Deselect before touching segments so the old column never shows the new pattern
        board.set_column_lines(0);
        board.set_segment_lines(!segs);
        board.set_column_lines(column_bit(self.cursor));

        self.cursor
    }
}

impl Default for Multiplexer {
    fn default() -> Self {
        Self::new()
    }
}
