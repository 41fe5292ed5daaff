/// A container size reported by the host's resize primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContainerSize {
    pub width: u32,
    pub height: u32,
}

/// Debounces container resize signals.
///
/// Every new signal restarts the cool-down, so a burst of resizes produces a single relayout
/// with the last reported size. Time is supplied by the caller (`now_ms`), which keeps the
/// reactor deterministic and free of timers.
#[derive(Clone, Debug, Default)]
pub(crate) struct ResizeReactor {
    pending: Option<(ContainerSize, u64)>,
}

impl ResizeReactor {
    pub(crate) fn schedule(&mut self, size: ContainerSize, now_ms: u64, delay_ms: u64) {
        if self.pending.is_some() {
            mtrace!(width = size.width, now_ms, "resize debounce restarted");
        }
        self.pending = Some((size, now_ms.saturating_add(delay_ms)));
    }

    /// Returns the settled size once the cool-down has elapsed.
    pub(crate) fn poll(&mut self, now_ms: u64) -> Option<ContainerSize> {
        match self.pending {
            Some((size, due_ms)) if now_ms >= due_ms => {
                self.pending = None;
                Some(size)
            }
            _ => None,
        }
    }

    pub(crate) fn cancel(&mut self) {
        self.pending = None;
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn due_ms(&self) -> Option<u64> {
        self.pending.map(|(_, due)| due)
    }
}
