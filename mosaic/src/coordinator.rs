/// Where the batch-loading state machine currently sits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BatchPhase {
    /// Settled: no batch open, nothing requested.
    #[default]
    Idle,
    /// The first window of a stream is placed and awaiting acknowledgements.
    InitialLoad,
    /// The window grew by one batch and is awaiting acknowledgements.
    Extending,
    /// Everything loaded was viewed; one upstream request is outstanding.
    AwaitingUpstream,
    /// Everything was viewed and upstream has nothing more to give.
    AllViewed,
    /// The stream key changed while the host was busy; waiting to start over.
    Reset,
}

/// Inputs to [`decide`], captured from the gallery at the moment of the decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSnapshot {
    pub mounted: bool,
    pub loading: bool,
    pub stream_len: usize,
    pub total_elements: usize,
    pub waiting_on_next_batch: bool,
    pub max_data_reached: bool,
    pub has_upstream: bool,
    pub load_batch_size: usize,
}

/// What the coordinator wants to happen next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Nothing,
    /// Place the first window, `0..end`.
    InitialLoad { end: usize },
    /// Grow the window to `end` (clamped by the layout pass).
    Extend { end: usize },
    /// Ask upstream for one more batch.
    RequestUpstream,
    /// Nothing is left to show or fetch.
    AllViewed,
}

/// The batch decision rule, as a pure function.
///
/// `viewed` is the number of viewed items when the call comes from a visibility signal, and
/// `None` when it comes from a data or flag change.
pub fn decide(s: &BatchSnapshot, viewed: Option<usize>) -> Decision {
    if !s.mounted || s.loading || s.stream_len == 0 {
        return Decision::Nothing;
    }

    if s.total_elements == 0 {
        return Decision::InitialLoad {
            end: s.load_batch_size.min(s.stream_len),
        };
    }

    if !s.waiting_on_next_batch && viewed.is_none() {
        return Decision::Nothing;
    }

    if !s.waiting_on_next_batch && viewed == Some(s.stream_len) {
        if s.max_data_reached || !s.has_upstream {
            return Decision::AllViewed;
        }
        return Decision::RequestUpstream;
    }

    // Still waiting for upstream and nothing new arrived: the window cannot grow yet.
    if s.waiting_on_next_batch && s.stream_len <= s.total_elements {
        return Decision::Nothing;
    }

    Decision::Extend {
        end: s.total_elements.saturating_add(s.load_batch_size),
    }
}
