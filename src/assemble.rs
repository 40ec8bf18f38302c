//! # Stream Assembler
//!
//! Builds the complete packet stream for a list of display events.
//!
//! ## Pipeline
//! 1. Order events by timestamp (stable sort, or reject with `strict_order`)
//! 2. Emit the screen clear and both color table loads at index 0
//!    (plus a border preset when configured)
//! 3. For each event: schedule its slot, pad with `NoOp` packets up to it,
//!    then emit the clear of the previous line and the tiles of this one
//! 4. Return the finished stream
//!
//! The stream never has gaps: packet *i* always exists for every *i* up to
//! the last one, and plays at `i / packet_rate` seconds.
//!
//! ## Example
//! ```rust
//! use cdg::{assemble, DisplayEvent, EncoderConfig, Instruction};
//!
//! let events = vec![DisplayEvent::new(0, "HELLO"), DisplayEvent::new(2000, "WORLD")];
//! let stream = assemble(&events, &EncoderConfig::default())?;
//!
//! assert_eq!(stream.len(), 606);
//! assert_eq!(stream.get(599).unwrap().decode()?, Instruction::NoOp);
//! # Ok::<(), cdg::CdgError>(())
//! ```

use std::iter;
use tracing::{debug, info, warn};

use crate::config::EncoderConfig;
use crate::error::{CdgError, Result};
use crate::event::DisplayEvent;
use crate::layout::LineRenderer;
use crate::packet::{encode_instruction, Instruction, Packet, TileGrid, PACKET_LEN};
use crate::schedule::{index_to_ms, packet_index, Scheduler};

/// Ordered, gap-free sequence of packets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketStream {
    packets: Vec<Packet>,
    packet_rate: u32,
}

impl PacketStream {
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn get(&self, index: usize) -> Option<&Packet> {
        self.packets.get(index)
    }

    pub fn packet_rate(&self) -> u32 {
        self.packet_rate
    }

    /// Playback length covered by the stream.
    pub fn duration_ms(&self) -> u64 {
        index_to_ms(self.packets.len() as u64, self.packet_rate)
    }

    /// Flat concatenation of all packets.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.packets.len() * PACKET_LEN);
        for packet in &self.packets {
            bytes.extend_from_slice(packet.as_bytes());
        }
        bytes
    }
}

/// Counts gathered while assembling a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssemblySummary {
    pub events: usize,
    pub content_packets: usize,
    pub filler_packets: usize,
    /// Events pushed past their timestamp by earlier content
    pub advanced_events: usize,
    /// Characters replaced because the font cannot draw them
    pub substitutions: usize,
}

struct StreamBuilder {
    packets: Vec<Packet>,
    grid: TileGrid,
    filler: Packet,
}

impl StreamBuilder {
    fn new(grid: TileGrid) -> Result<Self> {
        Ok(Self {
            packets: Vec::new(),
            grid,
            filler: encode_instruction(&Instruction::NoOp, &grid)?,
        })
    }

    fn push(&mut self, instruction: &Instruction) -> Result<()> {
        self.packets.push(encode_instruction(instruction, &self.grid)?);
        Ok(())
    }

    fn pad(&mut self, count: u64) {
        self.packets
            .extend(iter::repeat(self.filler).take(count as usize));
    }
}

fn order_events(events: &[DisplayEvent], strict: bool) -> Result<Vec<&DisplayEvent>> {
    if strict {
        for (i, pair) in events.windows(2).enumerate() {
            if pair[1].timestamp_ms < pair[0].timestamp_ms {
                return Err(CdgError::UnsortedInputRejected {
                    position: i + 1,
                    timestamp_ms: pair[1].timestamp_ms,
                    previous_ms: pair[0].timestamp_ms,
                });
            }
        }
        return Ok(events.iter().collect());
    }
    let mut ordered: Vec<&DisplayEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.timestamp_ms);
    Ok(ordered)
}

/// Encode display events into a packet stream.
///
/// # Errors
/// Returns [`CdgError`] if the configuration is invalid, a line runs off the
/// tile grid, an event falls past `max_duration_secs`, or `strict_order` is
/// set and the events are not sorted. No partial stream is returned.
pub fn assemble(events: &[DisplayEvent], config: &EncoderConfig) -> Result<PacketStream> {
    assemble_with_summary(events, config).map(|(stream, _)| stream)
}

/// Like [`assemble`], also returning packet counts.
pub fn assemble_with_summary(
    events: &[DisplayEvent],
    config: &EncoderConfig,
) -> Result<(PacketStream, AssemblySummary)> {
    config.validate()?;
    let ordered = order_events(events, config.strict_order)?;

    let mut builder = StreamBuilder::new(config.tile_grid)?;
    let mut summary = AssemblySummary {
        events: ordered.len(),
        ..AssemblySummary::default()
    };

    builder.push(&Instruction::MemoryPreset {
        color: config.layout.background,
        repeat: 0,
    })?;
    for load in config.palette.load_instructions() {
        builder.push(&load)?;
    }
    if let Some(color) = config.border_color {
        builder.push(&Instruction::BorderPreset { color })?;
    }
    summary.content_packets = builder.packets.len();

    let mut scheduler = Scheduler::new();
    scheduler.commit(builder.packets.len() as u64)?;
    let limit = config.max_packets();
    let mut renderer = LineRenderer::new(config.layout, config.tile_grid);

    for event in ordered {
        let placement = scheduler.place(packet_index(event.timestamp_ms, config.packet_rate));
        if placement.index >= limit {
            return Err(CdgError::StreamTooLong {
                index: placement.index,
                limit,
            });
        }
        if placement.was_advanced() {
            summary.advanced_events += 1;
            debug!(
                timestamp_ms = event.timestamp_ms,
                target = placement.target,
                index = placement.index,
                "Slot taken, advancing event"
            );
        }
        builder.pad(placement.fillers);
        summary.filler_packets += placement.fillers as usize;

        let layout = renderer.render(&event.text);
        if !layout.substitutions.is_empty() {
            warn!(
                timestamp_ms = event.timestamp_ms,
                replaced = layout.substitutions.len(),
                "Unsupported characters replaced"
            );
            summary.substitutions += layout.substitutions.len();
        }

        let mut instructions = layout.instructions;
        if instructions.is_empty() {
            // blank caption on a clear screen still marks its slot
            instructions.push(Instruction::NoOp);
        }
        for instruction in &instructions {
            builder.push(instruction)?;
        }
        scheduler.commit(instructions.len() as u64)?;
        summary.content_packets += instructions.len();

        debug!(
            timestamp_ms = event.timestamp_ms,
            index = placement.index,
            packets = instructions.len(),
            "Placed event"
        );
    }

    debug_assert_eq!(builder.packets.len() as u64, scheduler.next_free());

    let stream = PacketStream {
        packets: builder.packets,
        packet_rate: config.packet_rate,
    };
    info!(
        events = summary.events,
        packets = stream.len(),
        fillers = summary.filler_packets,
        duration_ms = stream.duration_ms(),
        "Assembled packet stream"
    );
    Ok((stream, summary))
}
