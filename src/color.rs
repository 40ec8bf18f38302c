//! # Color Table
//!
//! The display uses a 16-entry color lookup table with 4 bits per channel.
//! Colors are loaded with two `LoadColorTable` packets: entries 0-7 in the
//! low half, entries 8-15 in the high half.
//!
//! ## Entry Packing
//! Each entry occupies two payload bytes:
//! ```text
//! byte 0: 0000 RRRR   (high nibble reserved)
//! byte 1: GGGG BBBB
//! ```
//!
//! ## Example
//! ```rust
//! use cdg::{build_palette, ColorEntry, Instruction, PaletteHalf};
//!
//! let [low, high] = build_palette(&[ColorEntry::BLACK, ColorEntry::WHITE])?;
//! match low {
//!     Instruction::LoadColorTable { half, entries } => {
//!         assert_eq!(half, PaletteHalf::Low);
//!         assert_eq!(entries[1], ColorEntry::WHITE);
//!     }
//!     _ => unreachable!(),
//! }
//! # let _ = high;
//! # Ok::<(), cdg::CdgError>(())
//! ```

use serde::Deserialize;
use std::fmt;

use crate::error::{CdgError, Result};
use crate::packet::Instruction;

/// Number of entries in the color lookup table.
pub const PALETTE_SIZE: usize = 16;

/// Entries carried by one `LoadColorTable` packet.
pub const ENTRIES_PER_LOAD: usize = 8;

/// One palette color, 4 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub struct ColorEntry {
    red: u8,
    green: u8,
    blue: u8,
}

impl ColorEntry {
    pub const BLACK: ColorEntry = ColorEntry { red: 0, green: 0, blue: 0 };
    pub const WHITE: ColorEntry = ColorEntry { red: 15, green: 15, blue: 15 };

    /// Build from 4-bit channel values. Bits above the low nibble are discarded.
    pub const fn from_rgb4(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red & 0x0F,
            green: green & 0x0F,
            blue: blue & 0x0F,
        }
    }

    /// Reduce an 8-bit-per-channel color to the palette depth.
    pub const fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red >> 4,
            green: green >> 4,
            blue: blue >> 4,
        }
    }

    /// Parse `#RGB` or `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok();
        match digits.len() {
            3 => Some(Self::from_rgb4(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => {
                let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Self::from_rgb8(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// Pack into the two-byte wire form.
    pub fn pack(&self) -> [u8; 2] {
        [self.red, (self.green << 4) | self.blue]
    }

    /// Inverse of [`ColorEntry::pack`]. The reserved nibble is ignored.
    pub fn unpack(bytes: [u8; 2]) -> Self {
        Self::from_rgb4(bytes[0], bytes[1] >> 4, bytes[1])
    }
}

impl TryFrom<String> for ColorEntry {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        ColorEntry::from_hex(&value).ok_or_else(|| format!("invalid color '{}', expected #RGB or #RRGGBB", value))
    }
}

impl fmt::Display for ColorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:X}{:X}{:X}", self.red, self.green, self.blue)
    }
}

/// Which half of the table a `LoadColorTable` packet fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteHalf {
    /// Entries 0-7
    Low,
    /// Entries 8-15
    High,
}

impl PaletteHalf {
    /// Index of the first palette entry covered by this half.
    pub fn offset(self) -> usize {
        match self {
            PaletteHalf::Low => 0,
            PaletteHalf::High => ENTRIES_PER_LOAD,
        }
    }
}

/// A complete 16-entry color table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [ColorEntry; PALETTE_SIZE],
}

impl Default for Palette {
    /// Black background at 0, white text at 1, everything else black.
    fn default() -> Self {
        let mut entries = [ColorEntry::BLACK; PALETTE_SIZE];
        entries[1] = ColorEntry::WHITE;
        Self { entries }
    }
}

impl Palette {
    /// Fill a table from up to 16 colors; unspecified entries are black.
    pub fn from_entries(colors: &[ColorEntry]) -> Result<Self> {
        if colors.len() > PALETTE_SIZE {
            return Err(CdgError::PaletteOverflow(colors.len()));
        }
        let mut entries = [ColorEntry::BLACK; PALETTE_SIZE];
        entries[..colors.len()].copy_from_slice(colors);
        Ok(Self { entries })
    }

    pub fn get(&self, index: u8) -> Result<ColorEntry> {
        self.entries
            .get(index as usize)
            .copied()
            .ok_or(CdgError::InvalidColorIndex(index))
    }

    pub fn entries(&self) -> &[ColorEntry; PALETTE_SIZE] {
        &self.entries
    }

    /// The two instructions that load this table, low half first.
    pub fn load_instructions(&self) -> [Instruction; 2] {
        [self.half(PaletteHalf::Low), self.half(PaletteHalf::High)]
    }

    fn half(&self, half: PaletteHalf) -> Instruction {
        let mut entries = [ColorEntry::BLACK; ENTRIES_PER_LOAD];
        let start = half.offset();
        entries.copy_from_slice(&self.entries[start..start + ENTRIES_PER_LOAD]);
        Instruction::LoadColorTable { half, entries }
    }
}

/// Build the two `LoadColorTable` instructions for up to 16 colors.
///
/// Entries 0-7 always land in the first instruction and 8-15 in the second,
/// regardless of how many colors were supplied.
pub fn build_palette(colors: &[ColorEntry]) -> Result<[Instruction; 2]> {
    Ok(Palette::from_entries(colors)?.load_instructions())
}
