use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;

use mosaic::{BatchOutcome, Effects, Gallery, GalleryError, Measure, MeasurementCache};

use crate::{Batch, BatchError, BatchSource, BatchTicket, GalleryEvent, NoSource};

/// What the host must carry out after [`Controller::pump`].
///
/// Apply `unobserve` before `observe`: after a stream reset the same index can appear in both,
/// once for the replaced item and once for the new one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Start watching these items for viewport entry.
    pub observe: Vec<usize>,
    /// Stop watching these items.
    pub unobserve: Vec<usize>,
    /// Scroll here after applying the new styles.
    pub scroll_to: Option<u64>,
    /// A batch closed and its items became visible.
    pub layout_complete: bool,
    /// An upstream request went out with this ticket.
    pub requested_batch: Option<BatchTicket>,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.observe.is_empty()
            && self.unobserve.is_empty()
            && self.scroll_to.is_none()
            && !self.layout_complete
            && self.requested_batch.is_none()
    }

    fn absorb(&mut self, effects: Effects) {
        if effects.scroll_to.is_some() {
            self.scroll_to = effects.scroll_to;
        }
        self.layout_complete |= effects.layout_complete;
    }
}

/// A framework-neutral driver around a [`Gallery`].
///
/// This type does not hold any UI objects. Adapters drive it by:
/// - calling `push` whenever the UI or upstream reports something
/// - calling `pump(now_ms)` each frame/timer tick, then applying the returned [`Frame`]
///
/// The controller owns the upstream [`BatchSource`]: it keeps the pagination cursor, issues at
/// most one request at a time and drops results that arrive for a stream that was replaced.
pub struct Controller<T, K, M = MeasurementCache, S: BatchSource<T> = NoSource> {
    gallery: Gallery<T, K, M>,
    source: S,
    cursor: Option<S::Cursor>,
    in_flight: Option<BatchTicket>,
    next_ticket: u64,
    last_error: Option<BatchError>,
    // Work produced by a pump that failed part-way; handed out by the next pump.
    carried: Option<Frame>,
    queue: VecDeque<GalleryEvent<T, K, S::Cursor>>,
    attached: bool,
}

impl<T, K, M, S: BatchSource<T>> fmt::Debug for Controller<T, K, M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("attached", &self.attached)
            .field("in_flight", &self.in_flight)
            .field("next_ticket", &self.next_ticket)
            .field("last_error", &self.last_error)
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl<T, K: PartialEq, M: Measure, S: BatchSource<T>> Controller<T, K, M, S> {
    pub fn new(mut gallery: Gallery<T, K, M>, source: S) -> Self {
        gallery.set_has_upstream(source.has_upstream());
        Self {
            gallery,
            source,
            cursor: None,
            in_flight: None,
            next_ticket: 0,
            last_error: None,
            carried: None,
            queue: VecDeque::new(),
            attached: false,
        }
    }

    pub fn gallery(&self) -> &Gallery<T, K, M> {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut Gallery<T, K, M> {
        &mut self.gallery
    }

    pub fn into_gallery(self) -> Gallery<T, K, M> {
        self.gallery
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn cursor(&self) -> Option<&S::Cursor> {
        self.cursor.as_ref()
    }

    /// The ticket of the outstanding upstream request, if any.
    pub fn in_flight(&self) -> Option<BatchTicket> {
        self.in_flight
    }

    /// The failure that ended the current stream, if upstream failed.
    pub fn last_error(&self) -> Option<&BatchError> {
        self.last_error.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Mounts the gallery and places the first batch.
    ///
    /// A request that was cut off by [`Self::detach`] is issued again.
    pub fn attach(&mut self) -> Result<Frame, GalleryError> {
        let mut frame = Frame::default();
        if self.attached {
            return Ok(frame);
        }
        frame.absorb(self.gallery.mount()?);
        self.attached = true;
        mdebug!(total_elements = self.gallery.total_elements(), "attach");
        self.finish(&mut frame, Vec::new());
        Ok(frame)
    }

    /// Unmounts the gallery: the pending resize is cancelled, queued events are dropped and any
    /// in-flight result will be ignored.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        mdebug!(queued = self.queue.len(), "detach");
        self.attached = false;
        self.gallery.unmount();
        self.queue.clear();
        self.in_flight = None;
        self.carried = None;
    }

    /// Queues an event for the next [`Self::pump`]. Dropped while detached.
    pub fn push(&mut self, event: GalleryEvent<T, K, S::Cursor>) {
        if !self.attached {
            mtrace!("push: detached, dropping event");
            return;
        }
        self.queue.push_back(event);
    }

    /// Applies queued events in arrival order, then advances the resize debounce.
    ///
    /// If an event fails, its error is returned and the events behind it stay queued. The work
    /// produced by the events before it is not lost: the next pump returns it.
    pub fn pump(&mut self, now_ms: u64) -> Result<Frame, GalleryError> {
        if !self.attached {
            return Ok(Frame::default());
        }
        let mut frame = self.carried.take().unwrap_or_default();
        let observed = self.observed();
        let drained = self.drain(&mut frame, now_ms);
        self.finish(&mut frame, observed);
        match drained {
            Ok(()) => Ok(frame),
            Err(err) => {
                mwarn!(error = %err, queued = self.queue.len(), "pump: event failed");
                self.carried = Some(frame);
                Err(err)
            }
        }
    }

    fn drain(&mut self, frame: &mut Frame, now_ms: u64) -> Result<(), GalleryError> {
        while let Some(event) = self.queue.pop_front() {
            frame.absorb(self.dispatch(event, now_ms)?);
        }
        frame.absorb(self.gallery.tick(now_ms)?);
        Ok(())
    }

    fn dispatch(
        &mut self,
        event: GalleryEvent<T, K, S::Cursor>,
        now_ms: u64,
    ) -> Result<Effects, GalleryError> {
        match event {
            GalleryEvent::Stream(stream) => {
                if stream.key != self.gallery.stream().key {
                    mdebug!(in_flight = ?self.in_flight, "stream key changed");
                    self.cursor = None;
                    self.in_flight = None;
                    self.last_error = None;
                }
                self.gallery.set_stream(stream)
            }
            GalleryEvent::Append(items) => self.gallery.extend_stream(items),
            GalleryEvent::Visible(indices) => self.gallery.on_visible(&indices),
            GalleryEvent::ItemReady(index) => self.gallery.on_item_ready(index),
            GalleryEvent::Resize { width, height } => {
                self.gallery.on_resize(width, height, now_ms);
                Ok(Effects::default())
            }
            GalleryEvent::BatchLoaded { ticket, result } => self.receive(ticket, result),
            GalleryEvent::ExternalLoading(loading) => self.gallery.set_external_loading(loading),
        }
    }

    fn receive(
        &mut self,
        ticket: BatchTicket,
        result: Result<Batch<T, S::Cursor>, BatchError>,
    ) -> Result<Effects, GalleryError> {
        if self.in_flight != Some(ticket) {
            mdebug!(ticket = ticket.get(), "dropping stale batch");
            return Ok(Effects::default());
        }
        self.in_flight = None;

        let outcome = match result {
            Ok(Batch { items, next_cursor }) => {
                let exhausted = next_cursor.is_none();
                mtrace!(ticket = ticket.get(), len = items.len(), exhausted, "batch loaded");
                self.cursor = next_cursor;
                BatchOutcome::Loaded { items, exhausted }
            }
            Err(err) => {
                mwarn!(ticket = ticket.get(), error = %err, "batch failed");
                self.last_error = Some(err);
                BatchOutcome::Failed
            }
        };
        self.gallery.receive_batch(outcome)
    }

    fn finish(&mut self, frame: &mut Frame, observed: Vec<usize>) {
        // Observations carried over from a failed pump may have been viewed since.
        frame.observe.retain(|&i| self.gallery.is_observed(i));
        frame.unobserve.extend(
            observed
                .into_iter()
                .filter(|&i| !self.gallery.is_observed(i)),
        );

        // The gallery keeps waiting until a result lands, so this also re-issues a request lost
        // to a detach.
        if self.in_flight.is_none() && self.gallery.waiting_on_next_batch() {
            let ticket = BatchTicket(self.next_ticket);
            self.next_ticket += 1;
            self.in_flight = Some(ticket);
            mdebug!(ticket = ticket.get(), "requesting next batch");
            self.source.request_next(ticket, self.cursor.as_ref());
            frame.requested_batch = Some(ticket);
        }

        self.gallery.reobserve(|index| frame.observe.push(index));
    }

    fn observed(&self) -> Vec<usize> {
        (0..self.gallery.total_elements())
            .filter(|&i| self.gallery.is_observed(i))
            .collect()
    }
}
