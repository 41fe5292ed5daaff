use alloc::vec::Vec;

use mosaic::Stream;

use crate::{Batch, BatchError, BatchTicket};

/// Host signals, queued with [`crate::Controller::push`] and applied in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GalleryEvent<T, K, C> {
    /// A new or updated stream. A different key starts the gallery over.
    Stream(Stream<T, K>),
    /// Items appended to the current stream by the host itself.
    Append(Vec<T>),
    /// Items that entered the viewport.
    Visible(Vec<usize>),
    /// An item finished its own first render.
    ItemReady(usize),
    Resize {
        width: u32,
        height: u32,
    },
    /// The result of an upstream request.
    BatchLoaded {
        ticket: BatchTicket,
        result: Result<Batch<T, C>, BatchError>,
    },
    /// The host's own loading flag.
    ExternalLoading(bool),
}
