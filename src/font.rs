//! # Tile Font Table
//!
//! Static glyph table for the 6x12 tile format.
//!
//! Glyphs are drawn as 5x7 bitmaps inside the 6x12 cell: two blank rows above,
//! three blank rows below, and a blank spacing column on the right. Each tile
//! row is one byte with bit 5 as the leftmost pixel; bits 6-7 stay zero.
//!
//! ## Character Set
//! `A-Z`, `0-9`, space and ASCII punctuation
//! `! " # $ % & ' ( ) * + , - . / : ; < = > ? @ [ ] _ | ~`.
//! Anything else is drawn with the replacement glyph (`?`).

/// Tile width in pixels.
pub const TILE_WIDTH: usize = 6;

/// Tile height in pixels (one payload byte per row).
pub const TILE_HEIGHT: usize = 12;

/// Character drawn in place of anything outside the font.
pub const REPLACEMENT_CHAR: char = '?';

const ROW_MASK: u8 = 0x3F;
const GLYPH_TOP: usize = 2;

/// A 6x12 one-bit tile. Set bits select the foreground color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    rows: [u8; TILE_HEIGHT],
}

impl Tile {
    pub const fn blank() -> Self {
        Self { rows: [0; TILE_HEIGHT] }
    }

    /// Build from raw row bytes. Reserved bits 6-7 are cleared.
    pub fn from_rows(rows: [u8; TILE_HEIGHT]) -> Self {
        Self { rows: rows.map(|r| r & ROW_MASK) }
    }

    pub fn rows(&self) -> &[u8; TILE_HEIGHT] {
        &self.rows
    }

    /// Pixel at column `x` (0 = left) and row `y` (0 = top).
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= TILE_WIDTH || y >= TILE_HEIGHT {
            return false;
        }
        self.rows[y] & (1 << (TILE_WIDTH - 1 - x)) != 0
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|&r| r == 0)
    }

    fn from_glyph(glyph: &[u8; 7]) -> Self {
        let mut rows = [0u8; TILE_HEIGHT];
        for (i, bits) in glyph.iter().enumerate() {
            // 5 glyph columns occupy bits 5..1, bit 0 is the spacing column
            rows[GLYPH_TOP + i] = (bits & 0x1F) << 1;
        }
        Self { rows }
    }
}

/// 5x7 glyphs sorted by character for binary search.
/// Each row is 5 bits, MSB (bit 4) is the leftmost pixel.
static GLYPHS: [(char, [u8; 7]); 64] = [
    (' ', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    ('!', [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04]),
    ('"', [0x0A, 0x0A, 0x0A, 0x00, 0x00, 0x00, 0x00]),
    ('#', [0x0A, 0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x0A]),
    ('$', [0x04, 0x0F, 0x14, 0x0E, 0x05, 0x1E, 0x04]),
    ('%', [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03]),
    ('&', [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D]),
    ('\'', [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00]),
    ('(', [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02]),
    (')', [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08]),
    ('*', [0x00, 0x04, 0x15, 0x0E, 0x15, 0x04, 0x00]),
    ('+', [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00]),
    (',', [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08]),
    ('-', [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00]),
    ('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C]),
    ('/', [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00]),
    ('0', [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]),
    ('1', [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('2', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]),
    ('3', [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E]),
    ('4', [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]),
    ('5', [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]),
    ('6', [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]),
    ('7', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
    ('8', [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]),
    ('9', [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]),
    (':', [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00]),
    (';', [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x04, 0x08]),
    ('<', [0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02]),
    ('=', [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00]),
    ('>', [0x08, 0x04, 0x02, 0x01, 0x02, 0x04, 0x08]),
    ('?', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04]),
    ('@', [0x0E, 0x11, 0x01, 0x0D, 0x15, 0x15, 0x0E]),
    ('A', [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11]),
    ('B', [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E]),
    ('C', [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E]),
    ('D', [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C]),
    ('E', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F]),
    ('F', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10]),
    ('G', [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F]),
    ('H', [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
    ('I', [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E]),
    ('J', [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C]),
    ('K', [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11]),
    ('L', [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F]),
    ('M', [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11]),
    ('N', [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11]),
    ('O', [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
    ('P', [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10]),
    ('Q', [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D]),
    ('R', [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11]),
    ('S', [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E]),
    ('T', [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
    ('U', [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
    ('V', [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04]),
    ('W', [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A]),
    ('X', [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11]),
    ('Y', [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04]),
    ('Z', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F]),
    ('[', [0x0E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x0E]),
    (']', [0x0E, 0x02, 0x02, 0x02, 0x02, 0x02, 0x0E]),
    ('_', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F]),
    ('|', [0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
    ('~', [0x00, 0x00, 0x08, 0x15, 0x02, 0x00, 0x00]),
];

fn lookup(ch: char) -> Option<&'static [u8; 7]> {
    GLYPHS
        .binary_search_by_key(&ch, |(c, _)| *c)
        .ok()
        .map(|idx| &GLYPHS[idx].1)
}

/// Whether `ch` has its own glyph (no case folding is applied).
pub fn is_supported(ch: char) -> bool {
    lookup(ch).is_some()
}

/// Tile for `ch`, if the font has one.
pub fn glyph(ch: char) -> Option<Tile> {
    lookup(ch).map(Tile::from_glyph)
}

/// Tile for `ch`, falling back to the replacement glyph.
pub fn tile_for(ch: char) -> Tile {
    glyph(ch)
        .or_else(|| glyph(REPLACEMENT_CHAR))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(GLYPHS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_rows_fit_six_bits() {
        for (ch, _) in GLYPHS.iter() {
            let tile = glyph(*ch).unwrap();
            assert!(tile.rows().iter().all(|r| r & !ROW_MASK == 0), "glyph {:?}", ch);
            // spacing column stays clear
            assert!(tile.rows().iter().all(|r| r & 0x01 == 0), "glyph {:?}", ch);
        }
    }

    #[test]
    fn test_space_is_blank() {
        assert!(glyph(' ').unwrap().is_blank());
        assert!(!glyph('A').unwrap().is_blank());
    }

    #[test]
    fn test_letter_a_layout() {
        let a = glyph('A').unwrap();
        assert_eq!(a.rows()[0], 0);
        assert_eq!(a.rows()[1], 0);
        assert_eq!(a.rows()[2], 0x0E << 1);
        assert_eq!(a.rows()[6], 0x1F << 1);
        assert_eq!(a.rows()[11], 0);
        // Top of the A: columns 1-3 lit
        assert!(!a.pixel(0, 2));
        assert!(a.pixel(1, 2));
        assert!(a.pixel(3, 2));
        assert!(!a.pixel(5, 2));
    }

    #[test]
    fn test_unsupported_uses_replacement() {
        assert!(glyph('a').is_none());
        assert!(glyph('\u{e9}').is_none());
        assert_eq!(tile_for('\u{e9}'), glyph(REPLACEMENT_CHAR).unwrap());
    }

    #[test]
    fn test_from_rows_clears_reserved_bits() {
        let tile = Tile::from_rows([0xFF; TILE_HEIGHT]);
        assert!(tile.rows().iter().all(|&r| r == ROW_MASK));
        assert!(!tile.pixel(6, 0));
    }
}
