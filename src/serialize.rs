//! Writing packet streams to byte sinks and reading them back.
//!
//! The file format is a flat concatenation of 24-byte packets starting at
//! index 0, with no header, footer or separators. Playback position is
//! recovered from the packet index alone.

use std::io::Write;

use crate::assemble::PacketStream;
use crate::error::{CdgError, Result};
use crate::packet::{Packet, PACKET_LEN};

/// Write every packet of `stream` to `sink` in order.
pub fn write_stream<W: Write>(stream: &PacketStream, mut sink: W) -> Result<()> {
    for packet in stream.packets() {
        sink.write_all(packet.as_bytes())?;
    }
    sink.flush()?;
    Ok(())
}

/// Split a byte stream into packets, verifying marker and trailer of each.
pub fn read_stream(bytes: &[u8]) -> Result<Vec<Packet>> {
    if bytes.len() % PACKET_LEN != 0 {
        return Err(CdgError::InvalidStreamLength(bytes.len()));
    }
    bytes
        .chunks_exact(PACKET_LEN)
        .enumerate()
        .map(|(index, chunk)| Packet::parse(chunk, index))
        .collect()
}
