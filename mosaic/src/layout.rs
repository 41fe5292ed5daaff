use alloc::vec::Vec;

use crate::columns::ColumnHeights;
use crate::{ElementStyle, Geometry, GalleryOptions, Measure, Recompute, Visibility};

/// Inputs of one layout pass that vary between calls.
#[derive(Clone, Copy, Debug)]
pub struct LayoutRequest<'a> {
    /// One past the last index to place; clamped to `stream_len`.
    pub end: usize,
    pub stream_len: usize,
    /// Styles produced by the previous pass (their visibility may be kept).
    pub prior: &'a [ElementStyle],
    /// Visibility handed to indices the recompute policy refreshes.
    pub visibility: Visibility,
    pub recompute: Recompute,
}

/// Output of a layout pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub styles: Vec<ElementStyle>,
    pub column_heights: ColumnHeights,
    pub height: u64,
}

/// Packs items `0..end` into columns, top to bottom.
///
/// Each index sees the column heights left behind by every lower index. Non-strict placement
/// drops the item into the shortest column; strict placement round-robins. The pass is pure:
/// identical inputs yield identical styles.
pub fn layout<M: Measure + ?Sized>(
    options: &GalleryOptions,
    geometry: Geometry,
    request: LayoutRequest<'_>,
    measure: &M,
) -> Layout {
    let end = request.end.min(request.stream_len);
    let columns = geometry.columns.max(1);
    let column_width = geometry.column_width;
    let mut heights = ColumnHeights::new(columns);
    let mut styles = Vec::with_capacity(end);

    mtrace!(
        end,
        columns,
        column_width,
        recompute = ?request.recompute,
        "layout"
    );

    for index in 0..end {
        let column = if options.strict_order {
            index % columns
        } else {
            heights.shortest().unwrap_or(0)
        };

        let column_height = heights.get(column);
        let top = if column_height > 0 {
            column_height.saturating_add(options.row_margin as u64)
        } else {
            column_height
        };
        let is_leftmost = column == 0;
        let is_edge = is_leftmost || column == columns - 1;
        let width = if is_edge {
            column_width
        } else {
            column_width.saturating_sub(options.column_margin)
        };
        let left = (column as u32)
            .saturating_mul(column_width)
            .saturating_add(if is_leftmost { 0 } else { options.column_margin });

        let height = measure.rendered_height(index);
        let visibility = request.recompute.visibility_for(
            index,
            request.prior,
            options.load_batch_size,
            request.visibility,
        );

        styles.push(ElementStyle {
            visibility,
            width,
            height,
            top,
            left,
        });
        heights.set(
            column,
            top.saturating_add(height.unwrap_or(options.default_child_height) as u64),
        );
    }

    let height = heights.max();
    Layout {
        styles,
        column_heights: heights,
        height,
    }
}
