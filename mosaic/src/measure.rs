use alloc::vec::Vec;

/// The host-side source of geometry the layout engine cannot know on its own.
///
/// The engine never reaches into a rendering tree; it only consumes what this trait reports.
pub trait Measure {
    /// The current width of the gallery container, or `None` if it does not exist yet.
    fn container_width(&self) -> Option<u32>;

    /// The rendered height of item `index`, or `None` before its first paint.
    fn rendered_height(&self, index: usize) -> Option<u32>;

    /// The current vertical scroll position of the viewport.
    fn scroll_offset(&self) -> u64 {
        0
    }
}

impl<M: Measure + ?Sized> Measure for &M {
    fn container_width(&self) -> Option<u32> {
        (**self).container_width()
    }

    fn rendered_height(&self, index: usize) -> Option<u32> {
        (**self).rendered_height(index)
    }

    fn scroll_offset(&self) -> u64 {
        (**self).scroll_offset()
    }
}

/// A plain in-memory [`Measure`] implementation that adapters feed after each paint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeasurementCache {
    container_width: Option<u32>,
    heights: Vec<Option<u32>>,
    scroll_offset: u64,
}

impl MeasurementCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container_width(container_width: u32) -> Self {
        Self {
            container_width: Some(container_width),
            ..Self::default()
        }
    }

    pub fn set_container_width(&mut self, width: Option<u32>) {
        self.container_width = width;
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        self.scroll_offset = offset;
    }

    pub fn set_height(&mut self, index: usize, height: u32) {
        if self.heights.len() <= index {
            self.heights.resize(index + 1, None);
        }
        self.heights[index] = Some(height);
    }

    /// Records heights for a run of items, e.g. after a frame painted a whole batch.
    pub fn set_heights(&mut self, heights: impl IntoIterator<Item = (usize, u32)>) {
        for (index, height) in heights {
            self.set_height(index, height);
        }
    }

    pub fn measured_len(&self) -> usize {
        self.heights.iter().filter(|h| h.is_some()).count()
    }

    /// Forgets every item height (the container width is kept).
    pub fn clear_heights(&mut self) {
        self.heights.clear();
    }
}

impl Measure for MeasurementCache {
    fn container_width(&self) -> Option<u32> {
        self.container_width
    }

    fn rendered_height(&self, index: usize) -> Option<u32> {
        self.heights.get(index).copied().flatten()
    }

    fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }
}
