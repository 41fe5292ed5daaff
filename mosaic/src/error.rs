/// An invalid [`crate::GalleryOptions`] value.
///
/// A gallery never runs with an invalid configuration: construction and `set_options` reject it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("load_batch_size must be a positive integer, not {0}")]
    LoadBatchSize(usize),
    #[error("max_columns must be a positive integer, not {0}")]
    MaxColumns(usize),
    #[error("column_width must be positive, not {0}")]
    ColumnWidth(u32),
    #[error("default_child_height must be positive, not {0}")]
    DefaultChildHeight(u32),
}

/// A contract breach by one of the gallery's collaborators.
///
/// None of these are recoverable at runtime; the failing operation is aborted before any layout
/// state is touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GalleryError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("gallery container is not available for measurement")]
    ContainerUnavailable,
    #[error("index {index} is not a rendered item (rendered items: {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(
        "stream has no item at index {index} (stream length: {len}); the stream is no longer valid"
    )]
    StreamInvalid { index: usize, len: usize },
}
