//! Seven-segment glyph table.
//!
//! Bit layout follows the display wiring (common anode):
//!
//! ```text
//!         _a_
//!      f |   | b
//!        |_g_|
//!      e |   | c
//!        |_d_|  . dp
//! ```
//!
//! a=0, dp=1, b=2, f=3, g=4, e=5, d=6, c=7

pub const SEG_A: u8 = 1 << 0;
pub const SEG_DP: u8 = 1 << 1;
pub const SEG_B: u8 = 1 << 2;
pub const SEG_F: u8 = 1 << 3;
pub const SEG_G: u8 = 1 << 4;
pub const SEG_E: u8 = 1 << 5;
pub const SEG_D: u8 = 1 << 6;
pub const SEG_C: u8 = 1 << 7;

/// All segments off
pub const BLANK: u8 = 0;

const MINUS: usize = 10;
const DEGREE: usize = 11;
const SPACE: usize = 12;

const PATTERNS: [u8; 13] = [
    SEG_A | SEG_B | SEG_F | SEG_E | SEG_D | SEG_C,         // 0
    SEG_B | SEG_C,                                         // 1
    SEG_A | SEG_B | SEG_G | SEG_E | SEG_D,                 // 2
    SEG_A | SEG_B | SEG_G | SEG_D | SEG_C,                 // 3
    SEG_B | SEG_F | SEG_G | SEG_C,                         // 4
    SEG_A | SEG_F | SEG_G | SEG_D | SEG_C,                 // 5
    SEG_A | SEG_F | SEG_G | SEG_E | SEG_D | SEG_C,         // 6
    SEG_A | SEG_B | SEG_C,                                 // 7
    SEG_A | SEG_B | SEG_F | SEG_G | SEG_E | SEG_D | SEG_C, // 8
    SEG_A | SEG_B | SEG_F | SEG_G | SEG_D | SEG_C,         // 9
    SEG_G,                                                 // -
    SEG_A | SEG_B | SEG_F | SEG_G,                         // degree sign
    BLANK,                                                 // space
];

/// Something the display can draw in one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    Digit(u8),
    Minus,
    Degree,
    Space,
}

impl Glyph {
    /// Maps a character onto a glyph. Unsupported characters become [`Glyph::Space`].
    pub fn from_char(c: char) -> Self {
        match c {
            '0'..='9' => Glyph::Digit(c as u8 - b'0'),
            '-' => Glyph::Minus,
            '°' => Glyph::Degree,
            _ => Glyph::Space,
        }
    }

    fn index(self) -> usize {
        match self {
            Glyph::Digit(d) if d <= 9 => d as usize,
            Glyph::Digit(_) => SPACE,
            Glyph::Minus => MINUS,
            Glyph::Degree => DEGREE,
            Glyph::Space => SPACE,
        }
    }
}

/// Segment bitmask for `glyph`, without the decimal point.
pub fn encode(glyph: Glyph) -> u8 {
    PATTERNS.get(glyph.index()).copied().unwrap_or(BLANK)
}
