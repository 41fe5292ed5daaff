use crate::columns::ColumnHeights;
use crate::coordinator::{self, BatchPhase, BatchSnapshot, Decision};
use crate::layout::{self, LayoutRequest};
use crate::pending::{Ack, PendingAcks};
use crate::resize::{ContainerSize, ResizeReactor};
use crate::visibility::VisibilityTracker;
use crate::{
    BatchOutcome, ConfigError, Effects, ElementStyle, GalleryError, GalleryOptions, GalleryState,
    Geometry, LayoutUpdate, Measure, MeasurementCache, Recompute, Stream, Visibility,
};

/// A headless, incremental masonry gallery.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects; geometry comes from an injected [`Measure`].
/// - Your adapter drives it with events (visibility, acknowledgements, resizes, new data).
/// - Each event returns the [`Effects`] the host must carry out.
///
/// For a queue-driven controller with upstream cursor handling, see the `mosaic-adapter` crate.
#[derive(Clone, Debug)]
pub struct Gallery<T, K, M = MeasurementCache> {
    options: GalleryOptions,
    stream: Stream<T, K>,
    measure: M,
    geometry: Geometry,
    mounted: bool,

    state: GalleryState,
    column_heights: ColumnHeights,
    phase: BatchPhase,
    pending: PendingAcks,
    tracker: VisibilityTracker,
    resize: ResizeReactor,

    waiting_on_next_batch: bool,
    max_data_reached: bool,
    external_loading: bool,
    has_upstream: bool,
}

impl<T, K: PartialEq, M: Measure> Gallery<T, K, M> {
    /// Creates an unmounted gallery.
    ///
    /// Nothing is laid out until [`Self::mount`] measures the container.
    pub fn new(
        options: GalleryOptions,
        stream: Stream<T, K>,
        measure: M,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        mdebug!(
            load_batch_size = options.load_batch_size,
            max_columns = options.max_columns,
            stream_len = stream.len(),
            "Gallery::new"
        );
        Ok(Self {
            options,
            stream,
            measure,
            geometry: Geometry::default(),
            mounted: false,
            state: GalleryState::default(),
            column_heights: ColumnHeights::default(),
            phase: BatchPhase::Idle,
            pending: PendingAcks::default(),
            tracker: VisibilityTracker::default(),
            resize: ResizeReactor::default(),
            waiting_on_next_batch: false,
            max_data_reached: false,
            external_loading: false,
            has_upstream: true,
        })
    }

    /// Measures the container, derives the column geometry and places the first batch.
    pub fn mount(&mut self) -> Result<Effects, GalleryError> {
        if self.mounted {
            return Ok(Effects::default());
        }
        let width = self
            .measure
            .container_width()
            .ok_or(GalleryError::ContainerUnavailable)?;
        self.geometry =
            Geometry::for_container(width, self.options.column_width, self.options.max_columns);
        self.column_heights = ColumnHeights::new(self.geometry.columns);
        self.mounted = true;
        mdebug!(
            width,
            columns = self.geometry.columns,
            column_width = self.geometry.column_width,
            "Gallery::mount"
        );
        if self.state.total_elements > 0 {
            // Remount: the container may have changed while unmounted.
            self.relayout(self.state.total_elements, Visibility::Visible, Recompute::Full)?;
        }
        self.maybe_queue_next_batch(None)
    }

    /// Tears the gallery down: cancels the pending resize, stops all observation and drops the
    /// open batch. No recompute runs until the next [`Self::mount`].
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        mdebug!(total_elements = self.state.total_elements, "Gallery::unmount");
        self.mounted = false;
        self.resize.cancel();
        self.tracker.disconnect();
        self.pending.clear();
        self.state.loading = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn options(&self) -> &GalleryOptions {
        &self.options
    }

    /// Replaces the options. Layout-affecting changes trigger a full recompute.
    pub fn set_options(&mut self, options: GalleryOptions) -> Result<Effects, GalleryError> {
        options.validate()?;
        let relayout = self.mounted && self.options.layout_differs(&options);
        let width = if relayout {
            Some(
                self.measure
                    .container_width()
                    .ok_or(GalleryError::ContainerUnavailable)?,
            )
        } else {
            None
        };
        self.options = options;
        if let Some(width) = width {
            mtrace!(width, "set_options: layout changed");
            self.geometry =
                Geometry::for_container(width, self.options.column_width, self.options.max_columns);
            self.relayout(self.state.total_elements, Visibility::Visible, Recompute::Full)?;
            self.state.loading = !self.pending.is_empty();
        }
        Ok(Effects::default())
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(
        &mut self,
        f: impl FnOnce(&mut GalleryOptions),
    ) -> Result<Effects, GalleryError> {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next)
    }

    /// Declares whether an upstream batch source exists.
    ///
    /// Without one, viewing every item ends in `AllViewed` instead of a request.
    pub fn set_has_upstream(&mut self, has_upstream: bool) {
        self.has_upstream = has_upstream;
    }

    pub fn has_upstream(&self) -> bool {
        self.has_upstream
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }

    pub fn measure_mut(&mut self) -> &mut M {
        &mut self.measure
    }

    pub fn stream(&self) -> &Stream<T, K> {
        &self.stream
    }

    /// Replaces the stream.
    ///
    /// A different key resets all layout state. The same key must not shrink the stream below
    /// the rendered window.
    pub fn set_stream(&mut self, stream: Stream<T, K>) -> Result<Effects, GalleryError> {
        if stream.key != self.stream.key {
            self.stream = stream;
            self.reset();
            if self.external_loading {
                mdebug!("set_stream: key changed while loading, staying reset");
                return Ok(Effects::default());
            }
            return self.maybe_queue_next_batch(None);
        }

        if stream.len() < self.state.total_elements {
            return Err(GalleryError::StreamInvalid {
                index: stream.len(),
                len: stream.len(),
            });
        }
        self.stream = stream;
        self.maybe_queue_next_batch(None)
    }

    /// Appends items to the current stream.
    pub fn extend_stream(
        &mut self,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Effects, GalleryError> {
        self.stream.items.extend(items);
        self.maybe_queue_next_batch(None)
    }

    /// Feeds the eventual result of an upstream request back into the coordinator.
    ///
    /// A failure is handled exactly like exhaustion; nothing is retried. An empty page from a
    /// source that is not exhausted keeps the gallery awaiting upstream and asks for the next
    /// page right away.
    pub fn receive_batch(&mut self, outcome: BatchOutcome<T>) -> Result<Effects, GalleryError> {
        if !self.waiting_on_next_batch {
            mwarn!("receive_batch: no upstream request outstanding");
        }
        match outcome {
            BatchOutcome::Loaded { items, exhausted } => {
                mdebug!(exhausted, "receive_batch");
                self.stream.items.extend(items);
                self.max_data_reached |= exhausted;
            }
            BatchOutcome::Failed => {
                mwarn!("receive_batch: upstream failed, treating stream as exhausted");
                self.max_data_reached = true;
            }
        }

        if self.stream.len() > self.state.total_elements {
            return self.maybe_queue_next_batch(None);
        }

        if !self.waiting_on_next_batch {
            return Ok(Effects::default());
        }
        if self.max_data_reached {
            self.waiting_on_next_batch = false;
            self.state.all_elements_viewed = true;
            self.phase = BatchPhase::AllViewed;
            return Ok(Effects::default());
        }

        // An empty page that is not the last one: everything is still viewed, so nothing else
        // could ever trigger the next request.
        mdebug!("receive_batch: empty page, requesting the next one");
        self.phase = BatchPhase::AwaitingUpstream;
        Ok(Effects {
            request_next_batch: true,
            ..Effects::default()
        })
    }

    /// Sets the host's own loading flag. While it is set, no batch decisions are made.
    pub fn set_external_loading(&mut self, loading: bool) -> Result<Effects, GalleryError> {
        self.external_loading = loading;
        if loading {
            return Ok(Effects::default());
        }
        self.maybe_queue_next_batch(None)
    }

    /// Handles items entering the viewport.
    ///
    /// Every index must name a rendered item; otherwise nothing is marked and an error is
    /// returned.
    pub fn on_visible(&mut self, indices: &[usize]) -> Result<Effects, GalleryError> {
        let len = self.state.total_elements;
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(GalleryError::IndexOutOfRange { index, len });
        }
        for &index in indices {
            self.tracker.mark_viewed(index);
        }

        // No re-entrant triggering while a batch is settling.
        if !self.mounted || self.is_loading() {
            return Ok(Effects::default());
        }

        if !self.tracker.bottom_row_viewed(self.geometry.columns) {
            return Ok(Effects::default());
        }

        // Interior rows can never trigger again once the bottom row has been reached.
        self.tracker.mark_all_viewed();
        mtrace!(viewed = self.tracker.len(), "bottom row viewed");
        self.maybe_queue_next_batch(Some(self.tracker.len()))
    }

    /// Records that item `index` finished its own rendering.
    ///
    /// When the last outstanding item of the open batch acknowledges, the batch closes: the
    /// newest items become visible and the layout-complete notification fires.
    pub fn on_item_ready(&mut self, index: usize) -> Result<Effects, GalleryError> {
        let len = self.state.total_elements;
        if index >= len {
            return Err(GalleryError::IndexOutOfRange { index, len });
        }
        if !self.mounted {
            return Ok(Effects::default());
        }
        match self.pending.ack(index) {
            Ack::Waiting => Ok(Effects::default()),
            Ack::Ignored => {
                mwarn!(index, "on_item_ready: item is not awaiting acknowledgement");
                Ok(Effects::default())
            }
            Ack::Closed => self.close_batch(),
        }
    }

    /// Reports a container resize. The relayout happens in [`Self::tick`] once the debounce
    /// cool-down has elapsed without further resizes.
    pub fn on_resize(&mut self, width: u32, height: u32, now_ms: u64) {
        if !self.mounted {
            return;
        }
        self.resize.schedule(
            ContainerSize { width, height },
            now_ms,
            self.options.resize_debounce_ms,
        );
    }

    /// Advances the gallery's clock, applying a settled resize if one is due.
    pub fn tick(&mut self, now_ms: u64) -> Result<Effects, GalleryError> {
        match self.resize.poll(now_ms) {
            Some(size) => self.apply_resize(size),
            None => Ok(Effects::default()),
        }
    }

    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// When the pending resize (if any) will settle.
    pub fn next_resize_due_ms(&self) -> Option<u64> {
        self.resize.due_ms()
    }

    /// Starts observing every unviewed item, reporting each newly observed index.
    ///
    /// Does nothing while a batch is settling or once every element has been viewed.
    pub fn reobserve(&mut self, f: impl FnMut(usize)) {
        if !self.mounted || self.is_loading() || self.state.all_elements_viewed {
            return;
        }
        self.tracker.observe_unviewed(f);
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn total_elements(&self) -> usize {
        self.state.total_elements
    }

    pub fn computed_styles(&self) -> &[ElementStyle] {
        &self.state.computed_styles
    }

    pub fn height(&self) -> u64 {
        self.state.height
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn columns(&self) -> usize {
        self.geometry.columns
    }

    pub fn width(&self) -> u32 {
        self.geometry.container_width
    }

    pub fn column_heights(&self) -> &[u64] {
        self.column_heights.as_slice()
    }

    /// Whether a batch is settling, or the host reported it is busy.
    pub fn is_loading(&self) -> bool {
        self.state.loading || self.external_loading
    }

    pub fn all_elements_viewed(&self) -> bool {
        self.state.all_elements_viewed
    }

    pub fn waiting_on_next_batch(&self) -> bool {
        self.waiting_on_next_batch
    }

    pub fn max_data_reached(&self) -> bool {
        self.max_data_reached
    }

    /// Number of items of the open batch that have not acknowledged yet.
    pub fn pending_acknowledgements(&self) -> usize {
        self.pending.len()
    }

    pub fn is_awaiting_acknowledgement(&self, index: usize) -> bool {
        self.pending.contains(index)
    }

    pub fn is_viewed(&self, index: usize) -> bool {
        self.tracker.is_viewed(index)
    }

    pub fn is_observed(&self, index: usize) -> bool {
        self.tracker.is_observed(index)
    }

    pub fn viewed_count(&self) -> usize {
        self.tracker.viewed_count()
    }

    /// Returns the item and style at `index` of the rendered window.
    pub fn item(&self, index: usize) -> Result<(&T, &ElementStyle), GalleryError> {
        let style = self
            .state
            .computed_styles
            .get(index)
            .ok_or(GalleryError::IndexOutOfRange {
                index,
                len: self.state.total_elements,
            })?;
        let item = self
            .stream
            .items
            .get(index)
            .ok_or(GalleryError::StreamInvalid {
                index,
                len: self.stream.len(),
            })?;
        Ok((item, style))
    }

    /// Iterates over the rendered window without allocations.
    pub fn for_each_item(
        &self,
        mut f: impl FnMut(usize, &T, &ElementStyle),
    ) -> Result<(), GalleryError> {
        let len = self.stream.len();
        if self.state.total_elements > len {
            return Err(GalleryError::StreamInvalid { index: len, len });
        }
        for (index, (item, style)) in self
            .stream
            .items
            .iter()
            .zip(self.state.computed_styles.iter())
            .enumerate()
        {
            f(index, item, style);
        }
        Ok(())
    }

    fn snapshot(&self) -> BatchSnapshot {
        BatchSnapshot {
            mounted: self.mounted,
            loading: self.is_loading(),
            stream_len: self.stream.len(),
            total_elements: self.state.total_elements,
            waiting_on_next_batch: self.waiting_on_next_batch,
            max_data_reached: self.max_data_reached,
            has_upstream: self.has_upstream,
            load_batch_size: self.options.load_batch_size,
        }
    }

    fn maybe_queue_next_batch(&mut self, viewed: Option<usize>) -> Result<Effects, GalleryError> {
        let decision = coordinator::decide(&self.snapshot(), viewed);
        mtrace!(?decision, ?viewed, "maybe_queue_next_batch");
        match decision {
            Decision::Nothing => {
                if self.phase == BatchPhase::Reset && !self.external_loading {
                    self.phase = BatchPhase::Idle;
                }
            }
            Decision::InitialLoad { end } => {
                self.relayout(end, Visibility::Hidden, Recompute::Reuse)?;
                self.phase = self.settling_phase(BatchPhase::InitialLoad);
            }
            Decision::Extend { end } => {
                self.relayout(end, Visibility::Hidden, Recompute::Reuse)?;
                self.waiting_on_next_batch = false;
                self.state.all_elements_viewed = false;
                self.phase = self.settling_phase(BatchPhase::Extending);
            }
            Decision::RequestUpstream => {
                mdebug!(total_elements = self.state.total_elements, "requesting next batch");
                self.waiting_on_next_batch = true;
                self.phase = BatchPhase::AwaitingUpstream;
                return Ok(Effects {
                    request_next_batch: true,
                    ..Effects::default()
                });
            }
            Decision::AllViewed => {
                self.state.loading = false;
                self.state.all_elements_viewed = true;
                self.phase = BatchPhase::AllViewed;
            }
        }
        Ok(Effects::default())
    }

    fn settling_phase(&self, phase: BatchPhase) -> BatchPhase {
        if self.state.loading {
            phase
        } else {
            BatchPhase::Idle
        }
    }

    fn close_batch(&mut self) -> Result<Effects, GalleryError> {
        self.relayout(self.state.total_elements, Visibility::Visible, Recompute::New)?;
        self.state.loading = false;
        self.phase = BatchPhase::Idle;
        mdebug!(
            total_elements = self.state.total_elements,
            height = self.state.height,
            "batch closed"
        );
        self.notify_layout();
        Ok(Effects {
            layout_complete: true,
            ..Effects::default()
        })
    }

    fn apply_resize(&mut self, size: ContainerSize) -> Result<Effects, GalleryError> {
        if !self.mounted || size.width == self.geometry.container_width {
            return Ok(Effects::default());
        }

        let mut effects = Effects::default();
        if self.options.adjust_scroll && size.height > 0 {
            // Keep the reader at the same relative position within the gallery.
            let scroll = self.measure.scroll_offset() as u128;
            let scaled = scroll * self.state.height as u128 / size.height as u128;
            effects.scroll_to = Some(scaled.min(u64::MAX as u128) as u64);
        }

        self.geometry = Geometry::for_container(
            size.width,
            self.options.column_width,
            self.options.max_columns,
        );
        mdebug!(
            width = size.width,
            columns = self.geometry.columns,
            "apply_resize"
        );
        self.relayout(self.state.total_elements, Visibility::Visible, Recompute::Full)?;
        // A resize never opens a batch; one that is still settling stays open.
        self.state.loading = !self.pending.is_empty();
        Ok(effects)
    }

    fn relayout(
        &mut self,
        end: usize,
        visibility: Visibility,
        recompute: Recompute,
    ) -> Result<(), GalleryError> {
        if !self.mounted {
            return Err(GalleryError::ContainerUnavailable);
        }
        let stream_len = self.stream.len();
        if stream_len < self.state.total_elements {
            return Err(GalleryError::StreamInvalid {
                index: stream_len,
                len: stream_len,
            });
        }

        let out = layout::layout(
            &self.options,
            self.geometry,
            LayoutRequest {
                end,
                stream_len,
                prior: &self.state.computed_styles,
                visibility,
                recompute,
            },
            &self.measure,
        );

        let end = out.styles.len();
        if self.state.total_elements < end {
            self.pending.open(self.state.total_elements..end);
            self.state.loading = true;
        }
        self.state.total_elements = end;
        self.state.computed_styles = out.styles;
        self.state.height = out.height;
        self.column_heights = out.column_heights;
        self.tracker.grow(end);
        Ok(())
    }

    fn reset(&mut self) {
        mdebug!(previous_total = self.state.total_elements, "stream key changed, resetting");
        self.state = GalleryState::default();
        self.column_heights = ColumnHeights::new(self.geometry.columns);
        self.pending.clear();
        self.tracker.clear();
        self.waiting_on_next_batch = false;
        self.max_data_reached = false;
        self.phase = BatchPhase::Reset;
    }

    fn notify_layout(&self) {
        if let Some(cb) = &self.options.on_layout {
            cb(&LayoutUpdate {
                height: self.state.height,
                width: self.geometry.container_width,
                computed_styles: &self.state.computed_styles,
            });
        }
    }
}
