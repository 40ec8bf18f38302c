//! # cdg
//!
//! Encodes timed lyric lines into CD+G-style subchannel graphics packets.
//!
//! ## Pipeline
//! ```text
//! DisplayEvent list
//!   └── assemble
//!         ├── schedule   timestamp -> packet index, NoOp filler
//!         ├── layout     caption -> TileBlock instructions (font)
//!         ├── color      palette -> LoadColorTable instructions
//!         └── packet     instruction -> 24-byte packet (parity trailer)
//!   └── PacketStream -> serialize -> .cdg bytes
//! ```
//!
//! ## Example
//! ```rust
//! use cdg::{encode, DisplayEvent, EncoderConfig, PACKET_LEN};
//!
//! let events = vec![
//!     DisplayEvent::new(0, "Welcome to karaoke"),
//!     DisplayEvent::new(2000, "Sing along with me"),
//! ];
//! let bytes = encode(&events, &EncoderConfig::default())?;
//! assert_eq!(bytes.len() % PACKET_LEN, 0);
//! # Ok::<(), cdg::CdgError>(())
//! ```

pub mod assemble;
pub mod color;
pub mod config;
pub mod error;
pub mod event;
pub mod font;
pub mod layout;
pub mod packet;
pub mod parity;
pub mod schedule;
pub mod serialize;

pub use assemble::{assemble, assemble_with_summary, AssemblySummary, PacketStream};
pub use color::{build_palette, ColorEntry, Palette, PaletteHalf};
pub use config::EncoderConfig;
pub use error::*;
pub use event::{events_from_timing_json, load_timing_file, DisplayEvent};
pub use font::{Tile, TILE_HEIGHT, TILE_WIDTH};
pub use layout::{layout_line, normalize_text, LayoutOptions, LineLayout, LineRenderer};
pub use packet::{build_packet, encode_instruction, Instruction, Packet, TileGrid, PACKET_LEN, PAYLOAD_LEN};
pub use parity::{compute_trailer, verify_trailer};
pub use schedule::{index_to_ms, packet_index, Scheduler, PACKET_RATE};
pub use serialize::{read_stream, write_stream};

/// Encode events straight to the flat packet byte stream.
pub fn encode(events: &[DisplayEvent], config: &EncoderConfig) -> Result<Vec<u8>> {
    Ok(assemble(events, config)?.to_bytes())
}

/// Encode a timing export (JSON) with the given configuration.
pub fn encode_timing_json(content: &str, config: &EncoderConfig) -> Result<Vec<u8>> {
    let events = events_from_timing_json(content)?;
    encode(&events, config)
}
