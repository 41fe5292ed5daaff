use alloc::vec::Vec;
use core::ops::Range;

/// Result of acknowledging one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Ack {
    /// The last outstanding item acknowledged; the batch is settled.
    Closed,
    /// Other items of the batch are still outstanding.
    Waiting,
    /// The item already acknowledged, or it is not part of the open batch.
    Ignored,
}

/// Items placed by the last window extension that have not reported their first render.
#[derive(Clone, Debug, Default)]
pub(crate) struct PendingAcks {
    start: usize,
    acked: Vec<bool>,
    remaining: usize,
}

impl PendingAcks {
    pub(crate) fn open(&mut self, range: Range<usize>) {
        debug_assert!(self.is_empty(), "PendingAcks: a batch is already open");
        self.start = range.start;
        self.acked.clear();
        self.acked.resize(range.len(), false);
        self.remaining = range.len();
    }

    pub(crate) fn ack(&mut self, index: usize) -> Ack {
        let Some(slot) = index
            .checked_sub(self.start)
            .and_then(|i| self.acked.get_mut(i))
        else {
            return Ack::Ignored;
        };
        if *slot {
            return Ack::Ignored;
        }
        *slot = true;
        self.remaining -= 1;
        if self.remaining == 0 {
            self.acked.clear();
            Ack::Closed
        } else {
            Ack::Waiting
        }
    }

    pub(crate) fn clear(&mut self) {
        self.acked.clear();
        self.remaining = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    pub(crate) fn len(&self) -> usize {
        self.remaining
    }

    pub(crate) fn contains(&self, index: usize) -> bool {
        index
            .checked_sub(self.start)
            .and_then(|i| self.acked.get(i))
            .is_some_and(|acked| !acked)
    }
}
