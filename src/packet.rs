//! # Packet Encoder
//!
//! Builds the fixed 24-byte subchannel packets.
//!
//! ## Packet Layout
//! ```text
//! offset  len  field
//!  0       4   command marker   09 63 67 00
//!  4       1   instruction code
//!  5      16   payload (zero padded)
//! 21       3   trailer (see `parity`)
//! ```
//!
//! ## Instructions
//! | code   | instruction        | payload                                           |
//! |--------|--------------------|---------------------------------------------------|
//! | `0x00` | `NoOp`             | all zero                                          |
//! | `0x01` | `MemoryPreset`     | `[color, repeat]`                                 |
//! | `0x02` | `BorderPreset`     | `[color]`                                         |
//! | `0x06` | `TileBlock`        | `[background, foreground, row, column, 12 rows]`  |
//! | `0x1E` | `LoadColorTable`   | entries 0-7, 2 bytes each                         |
//! | `0x1F` | `LoadColorTable`   | entries 8-15, 2 bytes each                        |
//!
//! ## Example
//! ```rust
//! use cdg::{encode_instruction, Instruction, TileGrid, PACKET_LEN};
//!
//! let packet = encode_instruction(
//!     &Instruction::MemoryPreset { color: 0, repeat: 0 },
//!     &TileGrid::default(),
//! )?;
//! assert_eq!(packet.as_bytes().len(), PACKET_LEN);
//! assert_eq!(packet.instruction_code(), 0x01);
//! assert!(packet.verify());
//! # Ok::<(), cdg::CdgError>(())
//! ```

use crate::color::{ColorEntry, PaletteHalf, ENTRIES_PER_LOAD, PALETTE_SIZE};
use crate::error::{CdgError, Result};
use crate::font::{Tile, TILE_HEIGHT};
use crate::parity::{compute_trailer, verify_trailer, TRAILER_LEN};

/// Total packet length in bytes.
pub const PACKET_LEN: usize = 24;

/// Instruction payload length in bytes.
pub const PAYLOAD_LEN: usize = 16;

/// Fixed prefix of every packet.
pub const COMMAND_MARKER: [u8; 4] = [0x09, 0x63, 0x67, 0x00];

const CODE_OFFSET: usize = COMMAND_MARKER.len();
const PAYLOAD_OFFSET: usize = CODE_OFFSET + 1;
const TRAILER_OFFSET: usize = PAYLOAD_OFFSET + PAYLOAD_LEN;

pub const CODE_NO_OP: u8 = 0x00;
pub const CODE_MEMORY_PRESET: u8 = 0x01;
pub const CODE_BORDER_PRESET: u8 = 0x02;
pub const CODE_TILE_BLOCK: u8 = 0x06;
pub const CODE_LOAD_COLOR_TABLE_LOW: u8 = 0x1E;
pub const CODE_LOAD_COLOR_TABLE_HIGH: u8 = 0x1F;

/// Largest repeat counter a `MemoryPreset` can carry.
pub const MAX_PRESET_REPEAT: u8 = 15;

const TILE_ROWS_OFFSET: usize = 4;

/// Addressable tile grid of the display.
///
/// The default 50x18 grid covers a 300x216 pixel canvas with 6x12 tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub columns: u8,
    pub rows: u8,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self { columns: 50, rows: 18 }
    }
}

impl TileGrid {
    pub fn contains(&self, row: u8, column: u8) -> bool {
        row < self.rows && column < self.columns
    }

    fn check(&self, row: u8, column: u8) -> Result<()> {
        if self.contains(row, column) {
            Ok(())
        } else {
            Err(CdgError::InvalidTileCoordinate {
                row,
                column,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }
}

/// One display operation carried by a packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Keeps packet cadence, changes nothing.
    NoOp,
    /// Clear the whole screen to `color`.
    MemoryPreset { color: u8, repeat: u8 },
    /// Set the border color.
    BorderPreset { color: u8 },
    /// Load half of the color lookup table.
    LoadColorTable {
        half: PaletteHalf,
        entries: [ColorEntry; ENTRIES_PER_LOAD],
    },
    /// Draw one tile at a grid position.
    TileBlock {
        row: u8,
        column: u8,
        foreground: u8,
        background: u8,
        tile: Tile,
    },
}

fn check_color(index: u8) -> Result<()> {
    if (index as usize) < PALETTE_SIZE {
        Ok(())
    } else {
        Err(CdgError::InvalidColorIndex(index))
    }
}

impl Instruction {
    pub fn code(&self) -> u8 {
        match self {
            Instruction::NoOp => CODE_NO_OP,
            Instruction::MemoryPreset { .. } => CODE_MEMORY_PRESET,
            Instruction::BorderPreset { .. } => CODE_BORDER_PRESET,
            Instruction::LoadColorTable { half: PaletteHalf::Low, .. } => CODE_LOAD_COLOR_TABLE_LOW,
            Instruction::LoadColorTable { half: PaletteHalf::High, .. } => CODE_LOAD_COLOR_TABLE_HIGH,
            Instruction::TileBlock { .. } => CODE_TILE_BLOCK,
        }
    }

    /// Serialize the instruction-specific payload.
    pub fn payload(&self) -> [u8; PAYLOAD_LEN] {
        let mut data = [0u8; PAYLOAD_LEN];
        match self {
            Instruction::NoOp => {}
            Instruction::MemoryPreset { color, repeat } => {
                data[0] = *color;
                data[1] = *repeat;
            }
            Instruction::BorderPreset { color } => {
                data[0] = *color;
            }
            Instruction::LoadColorTable { entries, .. } => {
                for (chunk, entry) in data.chunks_exact_mut(2).zip(entries.iter()) {
                    chunk.copy_from_slice(&entry.pack());
                }
            }
            Instruction::TileBlock { row, column, foreground, background, tile } => {
                data[0] = *background;
                data[1] = *foreground;
                data[2] = *row;
                data[3] = *column;
                data[TILE_ROWS_OFFSET..].copy_from_slice(tile.rows());
            }
        }
        data
    }

    /// Check color indices, tile coordinates and counters against the protocol limits.
    pub fn validate(&self, grid: &TileGrid) -> Result<()> {
        match self {
            Instruction::NoOp | Instruction::LoadColorTable { .. } => Ok(()),
            Instruction::MemoryPreset { color, repeat } => {
                check_color(*color)?;
                if *repeat > MAX_PRESET_REPEAT {
                    return Err(CdgError::InvalidPayload {
                        len: PAYLOAD_LEN,
                        reason: format!("preset repeat {} exceeds {}", repeat, MAX_PRESET_REPEAT),
                    });
                }
                Ok(())
            }
            Instruction::BorderPreset { color } => check_color(*color),
            Instruction::TileBlock { row, column, foreground, background, .. } => {
                check_color(*foreground)?;
                check_color(*background)?;
                grid.check(*row, *column)
            }
        }
    }
}

/// A complete, immutable 24-byte packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    bytes: [u8; PACKET_LEN],
}

impl Packet {
    pub fn as_bytes(&self) -> &[u8; PACKET_LEN] {
        &self.bytes
    }

    pub fn instruction_code(&self) -> u8 {
        self.bytes[CODE_OFFSET]
    }

    pub fn payload(&self) -> [u8; PAYLOAD_LEN] {
        std::array::from_fn(|i| self.bytes[PAYLOAD_OFFSET + i])
    }

    pub fn trailer(&self) -> [u8; TRAILER_LEN] {
        std::array::from_fn(|i| self.bytes[TRAILER_OFFSET + i])
    }

    /// Whether the trailer matches the instruction code and payload.
    pub fn verify(&self) -> bool {
        verify_trailer(self.instruction_code(), &self.payload(), &self.trailer())
    }

    /// Parse and verify a single packet.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::parse(bytes, 0)
    }

    pub(crate) fn parse(bytes: &[u8], index: usize) -> Result<Self> {
        let bytes: [u8; PACKET_LEN] = bytes
            .try_into()
            .map_err(|_| CdgError::InvalidPacketLength(bytes.len()))?;
        if bytes[..CODE_OFFSET] != COMMAND_MARKER {
            return Err(CdgError::InvalidMarker { index });
        }
        let packet = Packet { bytes };
        if !packet.verify() {
            return Err(CdgError::TrailerMismatch { index });
        }
        Ok(packet)
    }

    /// Recover the instruction carried by this packet.
    pub fn decode(&self) -> Result<Instruction> {
        let data = self.payload();
        let instruction = match self.instruction_code() {
            CODE_NO_OP => Instruction::NoOp,
            CODE_MEMORY_PRESET => Instruction::MemoryPreset {
                color: data[0],
                repeat: data[1],
            },
            CODE_BORDER_PRESET => Instruction::BorderPreset { color: data[0] },
            code @ (CODE_LOAD_COLOR_TABLE_LOW | CODE_LOAD_COLOR_TABLE_HIGH) => {
                let half = if code == CODE_LOAD_COLOR_TABLE_LOW {
                    PaletteHalf::Low
                } else {
                    PaletteHalf::High
                };
                let entries = std::array::from_fn(|i| ColorEntry::unpack([data[2 * i], data[2 * i + 1]]));
                Instruction::LoadColorTable { half, entries }
            }
            CODE_TILE_BLOCK => {
                let rows: [u8; TILE_HEIGHT] = std::array::from_fn(|i| data[TILE_ROWS_OFFSET + i]);
                Instruction::TileBlock {
                    background: data[0],
                    foreground: data[1],
                    row: data[2],
                    column: data[3],
                    tile: Tile::from_rows(rows),
                }
            }
            other => return Err(CdgError::UnknownInstruction(other)),
        };
        Ok(instruction)
    }
}

/// Build a packet from a raw instruction code and up to 16 payload bytes.
///
/// Shorter payloads are zero padded; longer ones are rejected.
pub fn build_packet(instruction: u8, payload: &[u8]) -> Result<Packet> {
    if payload.len() > PAYLOAD_LEN {
        return Err(CdgError::InvalidPayload {
            len: payload.len(),
            reason: format!("exceeds {} bytes", PAYLOAD_LEN),
        });
    }
    let mut data = [0u8; PAYLOAD_LEN];
    data[..payload.len()].copy_from_slice(payload);

    let mut bytes = [0u8; PACKET_LEN];
    bytes[..CODE_OFFSET].copy_from_slice(&COMMAND_MARKER);
    bytes[CODE_OFFSET] = instruction;
    bytes[PAYLOAD_OFFSET..TRAILER_OFFSET].copy_from_slice(&data);
    bytes[TRAILER_OFFSET..].copy_from_slice(&compute_trailer(instruction, &data));
    Ok(Packet { bytes })
}

/// Validate an instruction against the grid and build its packet.
pub fn encode_instruction(instruction: &Instruction, grid: &TileGrid) -> Result<Packet> {
    instruction.validate(grid)?;
    build_packet(instruction.code(), &instruction.payload())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::glyph;

    fn grid() -> TileGrid {
        TileGrid::default()
    }

    #[test]
    fn test_build_packet_pads_payload() {
        let packet = build_packet(CODE_BORDER_PRESET, &[3]).unwrap();
        let bytes = packet.as_bytes();
        assert_eq!(&bytes[..4], &COMMAND_MARKER);
        assert_eq!(bytes[4], CODE_BORDER_PRESET);
        assert_eq!(bytes[5], 3);
        assert!(bytes[6..21].iter().all(|&b| b == 0));
        assert!(packet.verify());
    }

    #[test]
    fn test_build_packet_rejects_oversize() {
        let result = build_packet(CODE_NO_OP, &[0u8; 17]);
        assert!(matches!(result, Err(CdgError::InvalidPayload { len: 17, .. })));
    }

    #[test]
    fn test_full_payload_accepted() {
        assert!(build_packet(CODE_NO_OP, &[0xAA; PAYLOAD_LEN]).is_ok());
    }

    #[test]
    fn test_no_op_payload_is_zero() {
        let packet = encode_instruction(&Instruction::NoOp, &grid()).unwrap();
        assert_eq!(packet.instruction_code(), CODE_NO_OP);
        assert_eq!(packet.payload(), [0u8; PAYLOAD_LEN]);
    }

    #[test]
    fn test_memory_preset_layout() {
        let packet = encode_instruction(&Instruction::MemoryPreset { color: 2, repeat: 1 }, &grid()).unwrap();
        assert_eq!(packet.instruction_code(), CODE_MEMORY_PRESET);
        assert_eq!(&packet.payload()[..2], &[2, 1]);
    }

    #[test]
    fn test_tile_block_layout() {
        let tile = glyph('H').unwrap();
        let instruction = Instruction::TileBlock {
            row: 8,
            column: 4,
            foreground: 1,
            background: 0,
            tile,
        };
        let payload = encode_instruction(&instruction, &grid()).unwrap().payload();
        assert_eq!(&payload[..4], &[0, 1, 8, 4]);
        assert_eq!(&payload[4..], tile.rows());
    }

    #[test]
    fn test_load_color_table_codes() {
        let entries = [ColorEntry::WHITE; ENTRIES_PER_LOAD];
        let low = Instruction::LoadColorTable { half: PaletteHalf::Low, entries };
        let high = Instruction::LoadColorTable { half: PaletteHalf::High, entries };
        assert_eq!(low.code(), CODE_LOAD_COLOR_TABLE_LOW);
        assert_eq!(high.code(), CODE_LOAD_COLOR_TABLE_HIGH);
        let payload = low.payload();
        assert!(payload.chunks_exact(2).all(|c| c == [0x0F, 0xFF]));
    }

    #[test]
    fn test_invalid_color_index() {
        let result = encode_instruction(&Instruction::BorderPreset { color: 16 }, &grid());
        assert!(matches!(result, Err(CdgError::InvalidColorIndex(16))));

        let tile = Instruction::TileBlock {
            row: 0,
            column: 0,
            foreground: 1,
            background: 200,
            tile: Tile::blank(),
        };
        assert!(matches!(
            encode_instruction(&tile, &grid()),
            Err(CdgError::InvalidColorIndex(200))
        ));
    }

    #[test]
    fn test_invalid_repeat() {
        let result = encode_instruction(&Instruction::MemoryPreset { color: 0, repeat: 16 }, &grid());
        assert!(matches!(result, Err(CdgError::InvalidPayload { .. })));
    }

    #[test]
    fn test_invalid_tile_coordinate() {
        let off_right = Instruction::TileBlock {
            row: 0,
            column: 50,
            foreground: 1,
            background: 0,
            tile: Tile::blank(),
        };
        let result = encode_instruction(&off_right, &grid());
        assert!(matches!(
            result,
            Err(CdgError::InvalidTileCoordinate { row: 0, column: 50, .. })
        ));

        let off_bottom = Instruction::TileBlock {
            row: 18,
            column: 0,
            foreground: 1,
            background: 0,
            tile: Tile::blank(),
        };
        assert!(encode_instruction(&off_bottom, &grid()).is_err());

        let corner = Instruction::TileBlock {
            row: 17,
            column: 49,
            foreground: 1,
            background: 0,
            tile: Tile::blank(),
        };
        assert!(encode_instruction(&corner, &grid()).is_ok());
    }

    #[test]
    fn test_decode_recovers_instruction() {
        let instructions = [
            Instruction::NoOp,
            Instruction::MemoryPreset { color: 4, repeat: 0 },
            Instruction::BorderPreset { color: 7 },
            Instruction::LoadColorTable {
                half: PaletteHalf::High,
                entries: [ColorEntry::from_rgb4(1, 2, 3); ENTRIES_PER_LOAD],
            },
            Instruction::TileBlock {
                row: 3,
                column: 9,
                foreground: 5,
                background: 6,
                tile: glyph('Q').unwrap(),
            },
        ];
        for instruction in instructions {
            let packet = encode_instruction(&instruction, &grid()).unwrap();
            assert_eq!(packet.decode().unwrap(), instruction);
        }
    }

    #[test]
    fn test_from_bytes_checks() {
        let packet = encode_instruction(&Instruction::NoOp, &grid()).unwrap();
        assert_eq!(Packet::from_bytes(packet.as_bytes()).unwrap(), packet);

        assert!(matches!(
            Packet::from_bytes(&packet.as_bytes()[..20]),
            Err(CdgError::InvalidPacketLength(20))
        ));
        let err = Packet::from_bytes(&[0u8; 48]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid packet length: expected 24 bytes, got 48");

        let mut bad_marker = *packet.as_bytes();
        bad_marker[0] = 0x00;
        assert!(matches!(
            Packet::from_bytes(&bad_marker),
            Err(CdgError::InvalidMarker { index: 0 })
        ));

        let mut corrupted = *packet.as_bytes();
        corrupted[10] = 0x55;
        assert!(matches!(
            Packet::from_bytes(&corrupted),
            Err(CdgError::TrailerMismatch { index: 0 })
        ));
    }

    #[test]
    fn test_unknown_instruction() {
        let packet = build_packet(0x09, &[]).unwrap();
        assert!(matches!(packet.decode(), Err(CdgError::UnknownInstruction(0x09))));
    }
}
