//! Per-packet trailer computation.
//!
//! The trailer is three bytes appended after the 16-byte payload:
//! - bytes 0-1: CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF), big-endian
//! - byte 2: XOR of the instruction byte and all payload bytes
//!
//! Both are computed over the 17 bytes `instruction || payload`, so any single
//! corrupted byte in that range changes the trailer.

use crate::packet::PAYLOAD_LEN;

/// Length of the parity trailer in bytes.
pub const TRAILER_LEN: usize = 3;

const CRC_POLY: u16 = 0x1021;
const CRC_INIT: u16 = 0xFFFF;

fn crc16_update(mut crc: u16, byte: u8) -> u16 {
    crc ^= (byte as u16) << 8;
    for _ in 0..8 {
        crc = if crc & 0x8000 != 0 {
            (crc << 1) ^ CRC_POLY
        } else {
            crc << 1
        };
    }
    crc
}

/// Compute the trailer for an instruction code and its padded payload.
pub fn compute_trailer(instruction: u8, payload: &[u8; PAYLOAD_LEN]) -> [u8; TRAILER_LEN] {
    let mut crc = crc16_update(CRC_INIT, instruction);
    let mut xor = instruction;
    for &byte in payload {
        crc = crc16_update(crc, byte);
        xor ^= byte;
    }
    let [hi, lo] = crc.to_be_bytes();
    [hi, lo, xor]
}

/// Check a trailer against the instruction and payload it claims to cover.
pub fn verify_trailer(
    instruction: u8,
    payload: &[u8; PAYLOAD_LEN],
    trailer: &[u8; TRAILER_LEN],
) -> bool {
    compute_trailer(instruction, payload) == *trailer
}
