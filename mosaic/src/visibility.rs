use alloc::vec::Vec;

/// Viewed/observed bookkeeping for rendered items.
///
/// An item is *observed* while the host is watching it for viewport entry, and *viewed* once it
/// has entered the viewport. Viewed items are never observed again.
#[derive(Clone, Debug, Default)]
pub(crate) struct VisibilityTracker {
    viewed: Vec<bool>,
    observed: Vec<bool>,
}

impl VisibilityTracker {
    pub(crate) fn len(&self) -> usize {
        self.viewed.len()
    }

    /// Tracks `len` rendered items; new ones start unviewed and unobserved.
    pub(crate) fn grow(&mut self, len: usize) {
        if len > self.viewed.len() {
            self.viewed.resize(len, false);
            self.observed.resize(len, false);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.viewed.clear();
        self.observed.clear();
    }

    /// Stops observing everything (viewed flags are kept).
    pub(crate) fn disconnect(&mut self) {
        self.observed.iter_mut().for_each(|o| *o = false);
    }

    /// Marks `index` viewed and stops observing it. Returns whether it was observed.
    pub(crate) fn mark_viewed(&mut self, index: usize) -> bool {
        debug_assert!(index < self.viewed.len());
        self.viewed[index] = true;
        core::mem::replace(&mut self.observed[index], false)
    }

    pub(crate) fn mark_all_viewed(&mut self) {
        self.viewed.iter_mut().for_each(|v| *v = true);
        self.observed.iter_mut().for_each(|o| *o = false);
    }

    pub(crate) fn is_viewed(&self, index: usize) -> bool {
        self.viewed.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn is_observed(&self, index: usize) -> bool {
        self.observed.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn viewed_count(&self) -> usize {
        self.viewed.iter().filter(|v| **v).count()
    }

    /// Whether any item of the bottom row (the last `columns` items) has been viewed.
    pub(crate) fn bottom_row_viewed(&self, columns: usize) -> bool {
        let start = self.viewed.len().saturating_sub(columns);
        self.viewed[start..].iter().any(|v| *v)
    }

    /// Starts observing every unviewed item that is not observed yet, reporting each index.
    pub(crate) fn observe_unviewed(&mut self, mut f: impl FnMut(usize)) {
        for (index, (viewed, observed)) in self
            .viewed
            .iter()
            .zip(self.observed.iter_mut())
            .enumerate()
        {
            if !*viewed && !*observed {
                *observed = true;
                f(index);
            }
        }
    }
}
