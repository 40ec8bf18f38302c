//! # Encoder Configuration
//!
//! All encoder options live in one [`EncoderConfig`] value that is passed to
//! [`crate::assemble`]. Nothing is read from global state.
//!
//! ## YAML Format
//! Every key is optional; missing keys keep their defaults.
//! ```yaml
//! packet-rate: 300
//! tile-columns: 50
//! tile-rows: 18
//! palette: ["#000000", "#FFFFFF", "#F00"]
//! background: 0
//! foreground: 1
//! text-row: 8
//! start-column: 1
//! border-color: 0
//! strict-order: false
//! max-duration: 86400
//! ```
//!
//! ## Example
//! ```rust
//! use cdg::EncoderConfig;
//!
//! let config = EncoderConfig::from_yaml("packet-rate: 75\ntext-row: 4")?;
//! assert_eq!(config.packet_rate, 75);
//! assert_eq!(config.layout.text_row, 4);
//! assert_eq!(config.tile_grid.columns, 50);
//! # Ok::<(), cdg::CdgError>(())
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::color::{ColorEntry, Palette, PALETTE_SIZE};
use crate::error::{CdgError, Result};
use crate::layout::LayoutOptions;
use crate::packet::TileGrid;
use crate::schedule::{packet_index, PACKET_RATE};

/// Largest grid the tile address bytes are allowed to describe.
const MAX_TILE_COLUMNS: u8 = 64;
const MAX_TILE_ROWS: u8 = 32;

/// Default ceiling on stream length, in seconds (24 hours).
pub const DEFAULT_MAX_DURATION_SECS: u32 = 24 * 60 * 60;

/// Raw configuration as written in YAML, before validation.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub packet_rate: Option<u32>,
    pub tile_columns: Option<u8>,
    pub tile_rows: Option<u8>,
    pub palette: Option<Vec<ColorEntry>>,
    pub background: Option<u8>,
    pub foreground: Option<u8>,
    pub text_row: Option<u8>,
    pub start_column: Option<u8>,
    pub border_color: Option<u8>,
    pub strict_order: Option<bool>,
    pub max_duration: Option<u32>,
}

/// Validated encoder options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Packets per second (default 300)
    pub packet_rate: u32,
    /// Addressable tiles (default 50x18)
    pub tile_grid: TileGrid,
    /// Color table loaded at the start of the stream
    pub palette: Palette,
    /// Text position and colors
    pub layout: LayoutOptions,
    /// Border color set after the palette load, if any
    pub border_color: Option<u8>,
    /// Reject out-of-order events instead of sorting them
    pub strict_order: bool,
    /// Latest playback position, in seconds, an event may be scheduled at
    pub max_duration_secs: u32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            packet_rate: PACKET_RATE,
            tile_grid: TileGrid::default(),
            palette: Palette::default(),
            layout: LayoutOptions::default(),
            border_color: None,
            strict_order: false,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
        }
    }
}

impl EncoderConfig {
    /// Parse and validate a YAML configuration.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| CdgError::ConfigError(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Read and validate a YAML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self> {
        let defaults = Self::default();

        let palette = match raw.palette {
            Some(colors) => Palette::from_entries(&colors)?,
            None => defaults.palette,
        };

        let config = Self {
            packet_rate: raw.packet_rate.unwrap_or(defaults.packet_rate),
            tile_grid: TileGrid {
                columns: raw.tile_columns.unwrap_or(defaults.tile_grid.columns),
                rows: raw.tile_rows.unwrap_or(defaults.tile_grid.rows),
            },
            palette,
            layout: LayoutOptions {
                text_row: raw.text_row.unwrap_or(defaults.layout.text_row),
                start_column: raw.start_column.unwrap_or(defaults.layout.start_column),
                foreground: raw.foreground.unwrap_or(defaults.layout.foreground),
                background: raw.background.unwrap_or(defaults.layout.background),
            },
            border_color: raw.border_color,
            strict_order: raw.strict_order.unwrap_or(defaults.strict_order),
            max_duration_secs: raw.max_duration.unwrap_or(defaults.max_duration_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Number of packet slots the stream may use.
    ///
    /// ```
    /// use cdg::EncoderConfig;
    /// assert_eq!(EncoderConfig::default().max_packets(), 25_920_000);
    /// ```
    pub fn max_packets(&self) -> u64 {
        packet_index(u64::from(self.max_duration_secs) * 1000, self.packet_rate)
    }

    /// Check option ranges.
    pub fn validate(&self) -> Result<()> {
        if self.packet_rate == 0 {
            return Err(CdgError::ConfigError(
                "packet-rate must be greater than zero".to_string(),
            ));
        }
        if self.max_duration_secs == 0 {
            return Err(CdgError::ConfigError(
                "max-duration must be greater than zero".to_string(),
            ));
        }

        let grid = self.tile_grid;
        if grid.columns == 0 || grid.columns > MAX_TILE_COLUMNS {
            return Err(CdgError::ConfigError(format!(
                "tile-columns must be between 1 and {}, got {}",
                MAX_TILE_COLUMNS, grid.columns
            )));
        }
        if grid.rows == 0 || grid.rows > MAX_TILE_ROWS {
            return Err(CdgError::ConfigError(format!(
                "tile-rows must be between 1 and {}, got {}",
                MAX_TILE_ROWS, grid.rows
            )));
        }

        let colors = [
            Some(self.layout.foreground),
            Some(self.layout.background),
            self.border_color,
        ];
        for index in colors.into_iter().flatten() {
            if index as usize >= PALETTE_SIZE {
                return Err(CdgError::InvalidColorIndex(index));
            }
        }

        if !grid.contains(self.layout.text_row, self.layout.start_column) {
            return Err(CdgError::InvalidTileCoordinate {
                row: self.layout.text_row,
                column: self.layout.start_column,
                rows: grid.rows,
                columns: grid.columns,
            });
        }
        Ok(())
    }
}
