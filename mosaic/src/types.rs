use alloc::vec::Vec;

/// Whether a laid-out item should be painted.
///
/// Freshly placed items start out `Hidden` until their own rendering is acknowledged, so that a
/// half-measured batch never flashes on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

/// Which already-placed items get their visibility recalculated during a layout pass.
///
/// Geometry is always recomputed for every index; only visibility is subject to the policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Recompute {
    /// Every index receives the requested visibility.
    Full,
    /// Only the most recent batch (and anything new) receives the requested visibility.
    New,
    /// Indices that already have a style keep their visibility.
    #[default]
    Reuse,
}

impl Recompute {
    pub(crate) fn visibility_for(
        self,
        index: usize,
        prior: &[ElementStyle],
        load_batch_size: usize,
        fresh: Visibility,
    ) -> Visibility {
        let keep_below = match self {
            Self::Full => return fresh,
            Self::New => prior.len().saturating_sub(load_batch_size),
            Self::Reuse => prior.len(),
        };
        if index < keep_below {
            prior[index].visibility
        } else {
            fresh
        }
    }
}

/// The computed placement of a single item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementStyle {
    pub visibility: Visibility,
    pub width: u32,
    /// The rendered height, once the measurement source knows it.
    ///
    /// Unmeasured items are packed with `default_child_height`, but that estimate is never
    /// stored here.
    pub height: Option<u32>,
    pub top: u64,
    pub left: u32,
}

impl ElementStyle {
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }
}

/// Container-derived column geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub container_width: u32,
    pub columns: usize,
    pub column_width: u32,
}

impl Geometry {
    /// Derives the column count and per-column width for a container.
    ///
    /// `columns = min(round(container_width / column_width), max_columns)`, never less than one.
    pub fn for_container(container_width: u32, column_width: u32, max_columns: usize) -> Self {
        let fit = round_div(container_width as u64, column_width.max(1) as u64) as usize;
        let columns = fit.min(max_columns).max(1);
        let column_width = round_div(container_width as u64, columns as u64) as u32;
        Self {
            container_width,
            columns,
            column_width,
        }
    }
}

fn round_div(n: u64, d: u64) -> u64 {
    (n + d / 2) / d
}

/// The ordered item sequence a gallery lays out, tagged with a key identifying its source.
///
/// Changing the key invalidates every piece of layout state derived from the previous stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stream<T, K> {
    pub items: Vec<T>,
    pub key: K,
}

impl<T, K> Stream<T, K> {
    pub fn new(key: K, items: Vec<T>) -> Self {
        Self { items, key }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Payload of the layout-complete notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutUpdate<'a> {
    pub height: u64,
    pub width: u32,
    pub computed_styles: &'a [ElementStyle],
}

/// The eventual result of an upstream "give me more" request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOutcome<T> {
    Loaded { items: Vec<T>, exhausted: bool },
    /// Treated exactly like exhaustion: no further batches are requested.
    Failed,
}

/// Work the host must carry out after a gallery event.
#[must_use]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Effects {
    /// The coordinator entered `AwaitingUpstream`; ask upstream for the next batch.
    pub request_next_batch: bool,
    /// A batch closed and the layout-complete notification fired.
    pub layout_complete: bool,
    /// The viewport should be scrolled here to keep its content stable after a resize.
    pub scroll_to: Option<u64>,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
