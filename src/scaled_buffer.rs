use std::{fmt, sync::Arc};

use tracing::{debug, trace};

use crate::{
    data_buffer::DataBuffer,
    data_layout::DataLayout,
    error::{check_index, check_window, Error},
    Result,
};

/// A buffer of logical values backed by a buffer of storage items.
///
/// Each value occupies `scale` consecutive storage items, as defined by the layout.
/// Every coordinate accepted here is a logical one; it is multiplied by `scale`
/// exactly once before reaching the storage. Windows share the storage and the
/// layout of the view they come from.
pub struct ScaledBuffer<S, L> {
    storage: S,
    layout: Arc<L>,
    scale: usize,
}

impl<S, L> ScaledBuffer<S, L>
where
    S: DataBuffer,
    L: DataLayout<S>,
{
    /// Wraps `storage` so that it is read and written through `layout`.
    ///
    /// Fails if the layout scale is zero or if `storage` ends in the middle of a value.
    pub fn new(storage: S, layout: L) -> Result<Self> {
        Self::with_shared_layout(storage, Arc::new(layout))
    }

    pub fn with_shared_layout(storage: S, layout: Arc<L>) -> Result<Self> {
        let scale = layout.scale();
        if scale == 0 {
            debug!("Rejecting layout with zero scale");
            return Err(Error::InvalidScale);
        }
        if storage.len() % scale != 0 {
            debug!("Storage length {} is not a multiple of scale {}", storage.len(), scale);
            return Err(Error::PartialElement { len: storage.len(), scale });
        }
        Ok(ScaledBuffer { storage, layout, scale })
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // Only called with windows already checked against the logical length.
    fn wrap(&self, storage: S) -> Self {
        ScaledBuffer { storage, layout: Arc::clone(&self.layout), scale: self.scale }
    }
}

impl<S: Clone, L> Clone for ScaledBuffer<S, L> {
    fn clone(&self) -> Self {
        ScaledBuffer {
            storage: self.storage.clone(),
            layout: Arc::clone(&self.layout),
            scale: self.scale,
        }
    }
}

impl<S: fmt::Debug, L: fmt::Debug> fmt::Debug for ScaledBuffer<S, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaledBuffer")
            .field("storage", &self.storage)
            .field("layout", &self.layout)
            .field("scale", &self.scale)
            .finish()
    }
}

impl<S, L> DataBuffer for ScaledBuffer<S, L>
where
    S: DataBuffer,
    L: DataLayout<S>,
{
    type Item = L::Value;

    fn len(&self) -> usize {
        self.storage.len() / self.scale
    }

    fn is_read_only(&self) -> bool {
        self.storage.is_read_only()
    }

    fn get(&self, index: usize) -> Result<L::Value> {
        check_index(index, self.len())?;
        self.layout.read_element(&self.storage, index * self.scale)
    }

    fn set(&self, index: usize, value: L::Value) -> Result<()> {
        if self.is_read_only() {
            return Err(Error::ReadOnly);
        }
        check_index(index, self.len())?;
        self.layout.write_element(&self.storage, index * self.scale, value)
    }

    fn offset(&self, index: usize) -> Result<Self> {
        check_window(index, 0, self.len())?;
        trace!("offset({}) -> storage offset {}", index, index * self.scale);
        Ok(self.wrap(self.storage.offset(index * self.scale)?))
    }

    fn narrow(&self, size: usize) -> Result<Self> {
        check_window(0, size, self.len())?;
        trace!("narrow({}) -> storage narrow {}", size, size * self.scale);
        Ok(self.wrap(self.storage.narrow(size * self.scale)?))
    }

    fn slice(&self, index: usize, size: usize) -> Result<Self> {
        check_window(index, size, self.len())?;
        trace!(
            "slice({}, {}) -> storage slice ({}, {})",
            index,
            size,
            index * self.scale,
            size * self.scale
        );
        Ok(self.wrap(self.storage.slice(index * self.scale, size * self.scale)?))
    }

    fn read(&self, index: usize, dst: &mut [L::Value]) -> Result<()> {
        check_window(index, dst.len(), self.len())?;
        for (k, slot) in dst.iter_mut().enumerate() {
            *slot = self.layout.read_element(&self.storage, (index + k) * self.scale)?;
        }
        Ok(())
    }

    fn write(&self, index: usize, src: &[L::Value]) -> Result<()> {
        if self.is_read_only() {
            return Err(Error::ReadOnly);
        }
        check_window(index, src.len(), self.len())?;
        for (k, value) in src.iter().enumerate() {
            self.layout.write_element(&self.storage, (index + k) * self.scale, *value)?;
        }
        Ok(())
    }
}
