//! # Timing Scheduler
//!
//! Maps millisecond timestamps to absolute packet positions.
//!
//! Packet *i* plays at `i / packet_rate` seconds, so an event at `t` ms
//! belongs at `floor(t * packet_rate / 1000)`. The scheduler hands out slots
//! in order: a target already taken by earlier content is advanced to the
//! next free slot, and every skipped slot in between is reported so the
//! caller can fill it with `NoOp` packets.

use crate::error::{CdgError, Result};

/// Default packet rate of the subchannel stream (packets per second).
pub const PACKET_RATE: u32 = 300;

/// Packet index for a timestamp at the given rate.
///
/// ```
/// use cdg::packet_index;
/// assert_eq!(packet_index(2000, 300), 600);
/// assert_eq!(packet_index(0, 300), 0);
/// assert_eq!(packet_index(1, 300), 0);
/// ```
pub fn packet_index(timestamp_ms: u64, packet_rate: u32) -> u64 {
    timestamp_ms.saturating_mul(packet_rate as u64) / 1000
}

/// Playback position of a packet index in milliseconds (rounded down).
pub fn index_to_ms(index: u64, packet_rate: u32) -> u64 {
    if packet_rate == 0 {
        return 0;
    }
    index.saturating_mul(1000) / packet_rate as u64
}

/// Slot assignment returned by [`Scheduler::place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index requested by the timestamp
    pub target: u64,
    /// Index actually assigned
    pub index: u64,
    /// `NoOp` packets needed before `index`
    pub fillers: u64,
}

impl Placement {
    /// Whether the slot was pushed back because earlier content occupied it.
    pub fn was_advanced(&self) -> bool {
        self.index > self.target
    }
}

/// Hands out packet slots in non-decreasing order.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    next_free: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next index that has not been placed or committed.
    pub fn next_free(&self) -> u64 {
        self.next_free
    }

    /// Reserve the slot for content targeted at `target`.
    ///
    /// The returned index is `max(target, next_free)`; the caller must emit
    /// `fillers` `NoOp` packets and then at least one content packet, followed
    /// by [`Scheduler::commit`] for the packets actually written.
    pub fn place(&mut self, target: u64) -> Placement {
        let index = target.max(self.next_free);
        let placement = Placement {
            target,
            index,
            fillers: index - self.next_free,
        };
        self.next_free = index;
        placement
    }

    /// Mark `count` packets as written at the current position.
    pub fn commit(&mut self, count: u64) -> Result<()> {
        self.next_free = self
            .next_free
            .checked_add(count)
            .ok_or(CdgError::StreamTooLong {
                index: self.next_free,
                limit: u64::MAX,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_index() {
        assert_eq!(packet_index(2000, PACKET_RATE), 600);
        assert_eq!(packet_index(0, PACKET_RATE), 0);
        assert_eq!(packet_index(1000, PACKET_RATE), 300);
        // floor, not round
        assert_eq!(packet_index(3, PACKET_RATE), 0);
        assert_eq!(packet_index(4, PACKET_RATE), 1);
        assert_eq!(packet_index(1999, PACKET_RATE), 599);
    }

    #[test]
    fn test_other_rate() {
        assert_eq!(packet_index(1000, 75), 75);
    }

    #[test]
    fn test_index_to_ms() {
        assert_eq!(index_to_ms(600, PACKET_RATE), 2000);
        assert_eq!(index_to_ms(1, PACKET_RATE), 3);
        assert_eq!(index_to_ms(5, 0), 0);
    }

    #[test]
    fn test_fillers_between_content() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.place(10);
        assert_eq!(first.index, 10);
        assert_eq!(first.fillers, 10);
        scheduler.commit(1).unwrap();

        // b - a - 1 fillers between content at a=10 and b=20
        let second = scheduler.place(20);
        assert_eq!(second.index, 20);
        assert_eq!(second.fillers, 9);
    }

    #[test]
    fn test_collision_advances() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.place(packet_index(1000, PACKET_RATE));
        assert_eq!(first.index, 300);
        scheduler.commit(1).unwrap();

        let second = scheduler.place(packet_index(1000, PACKET_RATE));
        assert_eq!(second.index, 301);
        assert_eq!(second.fillers, 0);
        assert!(second.was_advanced());
        assert!(!first.was_advanced());
    }

    #[test]
    fn test_multi_packet_content_pushes_later_slots() {
        let mut scheduler = Scheduler::new();
        scheduler.place(0);
        scheduler.commit(3).unwrap();
        let next = scheduler.place(1);
        assert_eq!(next.index, 3);
        assert_eq!(scheduler.next_free(), 3);
    }

    #[test]
    fn test_commit_overflow_is_an_error() {
        let mut scheduler = Scheduler::new();
        scheduler.place(u64::MAX);
        assert!(matches!(
            scheduler.commit(1),
            Err(CdgError::StreamTooLong { index: u64::MAX, .. })
        ));
        assert_eq!(scheduler.next_free(), u64::MAX);
    }
}
