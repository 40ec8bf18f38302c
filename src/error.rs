//! # Error Types
//!
//! This module defines all error types for the CD+G encoder.
//!
//! Every error is a local validation failure detected while building packets
//! or reading input. Nothing is retried and no partial packet stream is ever
//! returned alongside an error.
//!
//! ## Error Types
//! - `InvalidPayload` - Instruction payload longer than 16 bytes (or a field out of range)
//! - `InvalidColorIndex` - Palette index outside 0-15
//! - `InvalidTileCoordinate` - Tile row/column outside the tile grid
//! - `PaletteOverflow` - More than 16 palette entries supplied
//! - `UnsortedInputRejected` - Out-of-order event with strict ordering enabled
//! - `InvalidTimestamp` - Negative, non-finite or out-of-range time in a timing export
//! - `StreamTooLong` - Event scheduled past the configured maximum duration
//! - `InvalidPacketLength`, `InvalidStreamLength`, `InvalidMarker`, `TrailerMismatch`, `UnknownInstruction` - Reading packets back
//! - `ConfigError`, `InputError`, `Io` - Loading configuration and input files
//!
//! ## Usage
//! ```rust
//! use cdg::{assemble, CdgError, DisplayEvent, EncoderConfig};
//!
//! let config = EncoderConfig { strict_order: true, ..EncoderConfig::default() };
//! let events = vec![DisplayEvent::new(2000, "SECOND"), DisplayEvent::new(0, "FIRST")];
//!
//! match assemble(&events, &config) {
//!     Ok(stream) => println!("{} packets", stream.len()),
//!     Err(CdgError::UnsortedInputRejected { position, .. }) => {
//!         eprintln!("event {} is out of order", position);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CdgError>;

#[derive(Error, Debug)]
pub enum CdgError {
    /// Payload does not fit the 16-byte data field.
    ///
    /// # Example
    /// ```
    /// # use cdg::CdgError;
    /// let err = CdgError::InvalidPayload { len: 17, reason: "exceeds 16 bytes".to_string() };
    /// assert_eq!(err.to_string(), "Invalid payload (17 bytes): exceeds 16 bytes");
    /// ```
    #[error("Invalid payload ({len} bytes): {reason}")]
    InvalidPayload { len: usize, reason: String },

    /// Palette index outside 0-15.
    #[error("Invalid color index {0} (palette has 16 entries, 0-15)")]
    InvalidColorIndex(u8),

    /// Tile position outside the addressable grid.
    ///
    /// # Example
    /// ```
    /// # use cdg::CdgError;
    /// let err = CdgError::InvalidTileCoordinate { row: 18, column: 0, rows: 18, columns: 50 };
    /// assert_eq!(err.to_string(), "Tile (row 18, column 0) is outside the 50x18 tile grid");
    /// ```
    #[error("Tile (row {row}, column {column}) is outside the {columns}x{rows} tile grid")]
    InvalidTileCoordinate {
        row: u8,
        column: u8,
        rows: u8,
        columns: u8,
    },

    /// More colors supplied than the palette can hold.
    #[error("Palette overflow: {0} entries supplied, at most 16 allowed")]
    PaletteOverflow(usize),

    /// Strict ordering was requested and an event is earlier than its predecessor.
    #[error("Event {position} at {timestamp_ms} ms is earlier than the previous event at {previous_ms} ms")]
    UnsortedInputRejected {
        position: usize,
        timestamp_ms: u64,
        previous_ms: u64,
    },

    /// Timestamp in an imported timing file cannot be represented.
    #[error("Invalid timestamp for entry {position}: {value}")]
    InvalidTimestamp { position: usize, value: f64 },

    /// Event lands beyond the last packet the stream may hold.
    ///
    /// # Example
    /// ```
    /// # use cdg::CdgError;
    /// let err = CdgError::StreamTooLong { index: 30_000_000, limit: 25_920_000 };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Packet index 30000000 exceeds the stream limit of 25920000 packets"
    /// );
    /// ```
    #[error("Packet index {index} exceeds the stream limit of {limit} packets")]
    StreamTooLong { index: u64, limit: u64 },

    #[error("Invalid packet length: expected 24 bytes, got {0}")]
    InvalidPacketLength(usize),

    #[error("Invalid stream length: expected a multiple of 24 bytes, got {0}")]
    InvalidStreamLength(usize),

    #[error("Packet {index} does not start with the subchannel command marker")]
    InvalidMarker { index: usize },

    #[error("Packet {index} failed trailer verification")]
    TrailerMismatch { index: usize },

    #[error("Unknown instruction code {0:#04x}")]
    UnknownInstruction(u8),

    /// Invalid encoder configuration.
    ///
    /// # Example
    /// ```
    /// # use cdg::CdgError;
    /// let err = CdgError::ConfigError("packet-rate must be greater than zero".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: packet-rate must be greater than zero");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InputError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
