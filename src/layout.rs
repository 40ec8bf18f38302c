//! # Text Layout
//!
//! Turns a caption into `TileBlock` instructions on the tile grid.
//!
//! ## Normalization
//! - Letters are upper-cased (`hello` → `HELLO`)
//! - Any whitespace (tab, newline, ...) becomes a space
//! - Characters the font cannot draw become `?`, and each replacement is
//!   recorded as a [`Substitution`]; nothing is dropped
//!
//! ## Placement
//! Characters go left to right from `start_column` on `text_row`. When a line
//! reaches the grid width it hard-wraps to `start_column` on the next row.
//! Spaces occupy a column but emit no tile, since the screen is cleared to the
//! background before each line.
//!
//! ## Clearing
//! [`LineRenderer`] remembers whether the previous line drew anything. If it
//! did, the next line starts with a `MemoryPreset` to the background color so
//! only one line is visible at a time.

use crate::font::{is_supported, tile_for, REPLACEMENT_CHAR};
use crate::packet::{Instruction, TileGrid};

/// A character that could not be drawn and was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitution {
    /// Character position in the original text
    pub position: usize,
    pub original: char,
}

/// Text after case folding and replacement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedLine {
    pub chars: Vec<char>,
    pub substitutions: Vec<Substitution>,
}

impl NormalizedLine {
    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

/// Fold `text` into the drawable character set.
pub fn normalize_text(text: &str) -> NormalizedLine {
    let mut line = NormalizedLine::default();
    for (position, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            line.chars.push(' ');
            continue;
        }
        let upper: Vec<char> = ch.to_uppercase().collect();
        if upper.iter().all(|&c| is_supported(c)) {
            line.chars.extend(upper);
        } else {
            line.chars.push(REPLACEMENT_CHAR);
            line.substitutions.push(Substitution { position, original: ch });
        }
    }
    line
}

/// Where and in which colors text is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    pub text_row: u8,
    pub start_column: u8,
    pub foreground: u8,
    pub background: u8,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_row: 8,
            start_column: 1,
            foreground: 1,
            background: 0,
        }
    }
}

/// Instructions for one caption.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineLayout {
    pub instructions: Vec<Instruction>,
    /// (row, column) of every drawn tile
    pub cells: Vec<(u8, u8)>,
    pub substitutions: Vec<Substitution>,
}

/// Place a caption on the grid. No clearing is emitted here.
pub fn layout_line(text: &str, options: &LayoutOptions, grid: &TileGrid) -> LineLayout {
    let normalized = normalize_text(text);
    let mut layout = LineLayout {
        substitutions: normalized.substitutions,
        ..LineLayout::default()
    };

    let mut row = options.text_row;
    let mut column = options.start_column;
    for ch in normalized.chars {
        if column >= grid.columns {
            row = row.saturating_add(1);
            column = options.start_column;
        }
        if ch != ' ' {
            layout.instructions.push(Instruction::TileBlock {
                row,
                column,
                foreground: options.foreground,
                background: options.background,
                tile: tile_for(ch),
            });
            layout.cells.push((row, column));
        }
        column = column.saturating_add(1);
    }
    layout
}

/// Lays out consecutive captions, clearing the previous one first.
#[derive(Debug, Clone)]
pub struct LineRenderer {
    options: LayoutOptions,
    grid: TileGrid,
    screen_dirty: bool,
}

impl LineRenderer {
    pub fn new(options: LayoutOptions, grid: TileGrid) -> Self {
        Self {
            options,
            grid,
            screen_dirty: false,
        }
    }

    /// Instructions for the next caption, prefixed by a clear when needed.
    pub fn render(&mut self, text: &str) -> LineLayout {
        let mut layout = layout_line(text, &self.options, &self.grid);
        if self.screen_dirty {
            layout.instructions.insert(
                0,
                Instruction::MemoryPreset {
                    color: self.options.background,
                    repeat: 0,
                },
            );
        }
        self.screen_dirty = !layout.cells.is_empty();
        layout
    }
}
