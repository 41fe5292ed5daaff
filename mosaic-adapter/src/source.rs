use alloc::string::String;
use alloc::vec::Vec;

/// Identifies one upstream request.
///
/// Results carrying a ticket other than the one in flight are stale and get dropped.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchTicket(pub(crate) u64);

impl BatchTicket {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// One page of items delivered by upstream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch<T, C> {
    pub items: Vec<T>,
    /// Where the following page starts. `None` means upstream is exhausted.
    pub next_cursor: Option<C>,
}

impl<T, C> Batch<T, C> {
    pub fn new(items: Vec<T>, next_cursor: Option<C>) -> Self {
        Self { items, next_cursor }
    }

    /// The final page.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }
}

/// An upstream failure. It ends the stream; nothing is retried.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("upstream batch failed: {reason}")]
pub struct BatchError {
    pub reason: String,
}

impl BatchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Where the next batch of items comes from.
///
/// `request_next` only starts the fetch. The host reports the result later by pushing
/// [`crate::GalleryEvent::BatchLoaded`] with the same ticket.
pub trait BatchSource<T> {
    /// Opaque pagination state handed back with every batch.
    type Cursor;

    fn request_next(&mut self, ticket: BatchTicket, cursor: Option<&Self::Cursor>);

    /// Whether this source can ever deliver more items.
    fn has_upstream(&self) -> bool {
        true
    }
}

impl<T, S: BatchSource<T> + ?Sized> BatchSource<T> for &mut S {
    type Cursor = S::Cursor;

    fn request_next(&mut self, ticket: BatchTicket, cursor: Option<&Self::Cursor>) {
        (**self).request_next(ticket, cursor);
    }

    fn has_upstream(&self) -> bool {
        (**self).has_upstream()
    }
}

/// A gallery whose items all arrive through stream events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoSource;

impl<T> BatchSource<T> for NoSource {
    type Cursor = ();

    fn request_next(&mut self, _ticket: BatchTicket, _cursor: Option<&()>) {}

    fn has_upstream(&self) -> bool {
        false
    }
}
