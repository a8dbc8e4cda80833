//! Delayed events keyed to the session clock.
//!
//! Reload completion and effect expiry are queued here instead of firing
//! from detached timers. Every entry carries the session epoch it was
//! queued in; entries from an older epoch are dropped when they come due.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use crate::presentation::EffectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerEvent {
    ReloadComplete,
    EffectExpired(EffectId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due: Duration,
    /// Insertion order; keeps same-instant events FIFO.
    seq: u64,
    epoch: u32,
    event: TimerEvent,
}

/// Min-heap of pending events.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, epoch: u32, event: TimerEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry { due, seq, epoch, event }));
    }

    /// Pop every event due at or before `now`, in due order. Events queued
    /// under an epoch other than `epoch` are discarded.
    pub fn drain_due(&mut self, now: Duration, epoch: u32) -> Vec<TimerEvent> {
        let mut ready = Vec::new();
        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.due > now {
                break;
            }
            let entry = *entry;
            self.queue.pop();
            if entry.epoch == epoch {
                ready.push(entry.event);
            } else {
                log::trace!("Dropping stale {:?} from epoch {}", entry.event, entry.epoch);
            }
        }
        ready
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn drains_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(300), 0, TimerEvent::EffectExpired(EffectId(3)));
        s.schedule(ms(100), 0, TimerEvent::EffectExpired(EffectId(1)));
        s.schedule(ms(2000), 0, TimerEvent::ReloadComplete);
        s.schedule(ms(100), 0, TimerEvent::EffectExpired(EffectId(2)));

        assert!(s.drain_due(ms(99), 0).is_empty());
        assert_eq!(
            s.drain_due(ms(300), 0),
            vec![
                TimerEvent::EffectExpired(EffectId(1)),
                TimerEvent::EffectExpired(EffectId(2)),
                TimerEvent::EffectExpired(EffectId(3)),
            ]
        );
        assert_eq!(s.pending(), 1);
        assert_eq!(s.drain_due(ms(2000), 0), vec![TimerEvent::ReloadComplete]);
        assert!(s.is_empty());
    }

    #[test]
    fn stale_epoch_is_dropped() {
        let mut s = Scheduler::new();
        s.schedule(ms(2000), 0, TimerEvent::ReloadComplete);
        assert!(s.drain_due(ms(5000), 1).is_empty());
        assert!(s.is_empty());
    }
}
