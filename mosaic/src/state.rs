use alloc::vec::Vec;

use crate::ElementStyle;

/// A snapshot of everything a host needs to render the gallery.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GalleryState {
    /// Number of items in the rendered window.
    pub total_elements: usize,
    /// One style per rendered item (`computed_styles.len() == total_elements`).
    pub computed_styles: Vec<ElementStyle>,
    /// A batch is open and waiting for its items to acknowledge their first render.
    pub loading: bool,
    /// Height of the tallest column.
    pub height: u64,
    pub all_elements_viewed: bool,
}

impl GalleryState {
    pub fn is_empty(&self) -> bool {
        self.total_elements == 0
    }
}
