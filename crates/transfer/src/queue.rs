//! Bounded FIFO of pending transfers.
//!
//! `TransferQueue<N>` stores up to `N` entries inline (no heap), and every
//! operation is O(1) except [`TransferQueue::retain`], which is O(N).
//! It has no locking of its own: the unit only touches it inside its critical
//! section, from thread mode (push, clear) and from the completion interrupt
//! (pop).

use heapless::Deque;

use crate::config_cache::HandleId;
use crate::descriptor::QueueEntry;

/// Fixed-capacity queue of transfers waiting for the unit.
pub(crate) struct TransferQueue<const N: usize> {
    entries: Deque<QueueEntry, N>,
}

impl<const N: usize> TransferQueue<N> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Deque::new(),
        }
    }

    /// Append `entry`, or hand it back if the queue is full.
    pub(crate) fn push(&mut self, entry: QueueEntry) -> Result<(), QueueEntry> {
        self.entries.push_back(entry)
    }

    /// Remove the oldest entry.
    pub(crate) fn pop(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    /// Drop every pending entry. A running transfer is not affected.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keep only the entries for which `keep` returns `true`, in order.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&QueueEntry) -> bool) {
        for _ in 0..self.entries.len() {
            if let Some(entry) = self.entries.pop_front() {
                if keep(&entry) {
                    // Cannot fail: one slot was just freed.
                    let _ = self.entries.push_back(entry);
                }
            }
        }
    }

    /// Drop every pending entry submitted through `handle`.
    pub(crate) fn purge(&mut self, handle: HandleId) {
        self.retain(|entry| entry.handle != handle);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) const fn capacity(&self) -> usize {
        N
    }
}
