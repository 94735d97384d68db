use thiserror::Error;

use crate::num_trait::DataType;

/// Errors raised by buffers, layouts, views and archives.
///
/// Coordinates carried by the out-of-range variants are always expressed in the
/// units of the buffer that rejected the call: logical elements for a
/// `ScaledBuffer`, storage units for the storage it wraps.
#[derive(Debug, Error)]
pub enum Error {
    #[error("index {index} out of bounds for buffer of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("window [{index}, {index} + {size}) out of bounds for buffer of length {len}")]
    WindowOutOfBounds { index: usize, size: usize, len: usize },

    #[error("layout scale must be positive")]
    InvalidScale,

    #[error("storage length {len} is not a multiple of layout scale {scale}")]
    PartialElement { len: usize, scale: usize },

    #[error("buffer is read-only")]
    ReadOnly,

    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("data type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch { expected: DataType, found: DataType },

    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    #[error("entry `{0}` not found in archive")]
    EntryNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Rejects `index` unless it addresses an element of a buffer of length `len`.
pub(crate) fn check_index(index: usize, len: usize) -> Result<(), Error> {
    if index < len {
        Ok(())
    } else {
        Err(Error::IndexOutOfBounds { index, len })
    }
}

/// Rejects the window `[index, index + size)` unless it lies within `[0, len]`.
pub(crate) fn check_window(index: usize, size: usize, len: usize) -> Result<(), Error> {
    match index.checked_add(size) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::WindowOutOfBounds { index, size, len }),
    }
}
