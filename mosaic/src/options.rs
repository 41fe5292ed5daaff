use alloc::sync::Arc;

use crate::{ConfigError, LayoutUpdate};

/// A callback fired every time a batch closes and the gallery settles.
pub type OnLayoutCallback = Arc<dyn Fn(&LayoutUpdate<'_>) + Send + Sync>;

/// Configuration for [`crate::Gallery`].
///
/// This type is designed to be cheap to clone: the callback is stored in an `Arc` so hosts can
/// tweak a field and call `Gallery::set_options` without reallocating it.
pub struct GalleryOptions {
    /// How many items a window extension adds at once.
    pub load_batch_size: usize,
    /// Upper bound on the number of columns, regardless of container width.
    pub max_columns: usize,
    /// Target column width used to derive the column count.
    pub column_width: u32,
    /// Height assumed for items that have not been measured yet (packing only).
    pub default_child_height: u32,
    /// Horizontal space taken from interior columns.
    pub column_margin: u32,
    /// Vertical space between stacked items in a column.
    pub row_margin: u32,
    /// Place item `i` in column `i % columns` instead of the shortest column.
    pub strict_order: bool,
    /// Rescale the scroll position when a resize changes the gallery height.
    pub adjust_scroll: bool,
    /// Cool-down applied to container resize signals before relaying out.
    pub resize_debounce_ms: u64,
    /// Optional callback fired when a batch closes.
    pub on_layout: Option<OnLayoutCallback>,
}

impl Clone for GalleryOptions {
    fn clone(&self) -> Self {
        Self {
            load_batch_size: self.load_batch_size,
            max_columns: self.max_columns,
            column_width: self.column_width,
            default_child_height: self.default_child_height,
            column_margin: self.column_margin,
            row_margin: self.row_margin,
            strict_order: self.strict_order,
            adjust_scroll: self.adjust_scroll,
            resize_debounce_ms: self.resize_debounce_ms,
            on_layout: self.on_layout.clone(),
        }
    }
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            load_batch_size: 25,
            max_columns: 8,
            column_width: 300,
            default_child_height: 300,
            column_margin: 5,
            row_margin: 5,
            strict_order: false,
            adjust_scroll: true,
            resize_debounce_ms: 500,
            on_layout: None,
        }
    }
}

impl GalleryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.load_batch_size == 0 {
            return Err(ConfigError::LoadBatchSize(self.load_batch_size));
        }
        if self.max_columns == 0 {
            return Err(ConfigError::MaxColumns(self.max_columns));
        }
        if self.column_width == 0 {
            return Err(ConfigError::ColumnWidth(self.column_width));
        }
        if self.default_child_height == 0 {
            return Err(ConfigError::DefaultChildHeight(self.default_child_height));
        }
        Ok(())
    }

    /// Whether switching from `self` to `other` invalidates the current layout.
    pub(crate) fn layout_differs(&self, other: &Self) -> bool {
        self.column_width != other.column_width
            || self.column_margin != other.column_margin
            || self.row_margin != other.row_margin
            || self.max_columns != other.max_columns
            || self.strict_order != other.strict_order
            || self.default_child_height != other.default_child_height
    }

    pub fn with_load_batch_size(mut self, load_batch_size: usize) -> Self {
        self.load_batch_size = load_batch_size;
        self
    }

    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = max_columns;
        self
    }

    pub fn with_column_width(mut self, column_width: u32) -> Self {
        self.column_width = column_width;
        self
    }

    pub fn with_default_child_height(mut self, default_child_height: u32) -> Self {
        self.default_child_height = default_child_height;
        self
    }

    pub fn with_margins(mut self, column_margin: u32, row_margin: u32) -> Self {
        self.column_margin = column_margin;
        self.row_margin = row_margin;
        self
    }

    pub fn with_strict_order(mut self, strict_order: bool) -> Self {
        self.strict_order = strict_order;
        self
    }

    pub fn with_adjust_scroll(mut self, adjust_scroll: bool) -> Self {
        self.adjust_scroll = adjust_scroll;
        self
    }

    pub fn with_resize_debounce_ms(mut self, delay_ms: u64) -> Self {
        self.resize_debounce_ms = delay_ms;
        self
    }

    pub fn with_on_layout(
        mut self,
        on_layout: Option<impl Fn(&LayoutUpdate<'_>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_layout = on_layout.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for GalleryOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GalleryOptions")
            .field("load_batch_size", &self.load_batch_size)
            .field("max_columns", &self.max_columns)
            .field("column_width", &self.column_width)
            .field("default_child_height", &self.default_child_height)
            .field("column_margin", &self.column_margin)
            .field("row_margin", &self.row_margin)
            .field("strict_order", &self.strict_order)
            .field("adjust_scroll", &self.adjust_scroll)
            .field("resize_debounce_ms", &self.resize_debounce_ms)
            .finish_non_exhaustive()
    }
}
