//! Deferred one-shot events
//!
//! Spawns happen some time after a clear pass or a reload. Instead of
//! fire-and-forget callbacks the controller keeps a small queue of events,
//! each tagged with the epoch it was scheduled in. A reload bumps the epoch,
//! and anything left over from the previous epoch is dropped when it comes due.

/// Work the controller can defer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    SpawnPiece,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    due_ms: u64,
    seq: u64,
    epoch: u32,
    event: SessionEvent,
}

/// Millisecond clock plus the queue of pending events.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    epoch: u32,
    seq: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Events still waiting, stale ones included.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Whether an event of the current epoch is waiting.
    pub fn is_scheduled(&self, event: SessionEvent) -> bool {
        self.pending
            .iter()
            .any(|p| p.epoch == self.epoch && p.event == event)
    }

    /// Fire `event` once, `delay_ms` from now.
    pub fn after(&mut self, delay_ms: u32, event: SessionEvent) {
        self.seq += 1;
        self.pending.push(Pending {
            due_ms: self.now_ms + u64::from(delay_ms),
            seq: self.seq,
            epoch: self.epoch,
            event,
        });
    }

    /// Invalidate everything scheduled so far.
    pub fn cancel_all(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Move the clock forward and collect due events of the current epoch,
    /// ordered by due time (then scheduling order).
    pub fn advance(&mut self, elapsed_ms: u32, due: &mut Vec<SessionEvent>) {
        self.now_ms += u64::from(elapsed_ms);
        let now = self.now_ms;

        let mut fired: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due_ms <= now {
                fired.push(*p);
                false
            } else {
                true
            }
        });
        fired.sort_by_key(|p| (p.due_ms, p.seq));

        for p in fired {
            if p.epoch == self.epoch {
                due.push(p.event);
            } else {
                log::warn!(
                    "dropping stale {:?} from epoch {} (current {})",
                    p.event,
                    p.epoch,
                    self.epoch
                );
            }
        }
    }
}
