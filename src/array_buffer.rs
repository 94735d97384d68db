use std::{fmt, sync::Arc};

use parking_lot::RwLock;

use crate::{
    data_buffer::DataBuffer,
    error::{check_index, check_window, Error},
    Result,
};

/// Heap-backed buffer whose windows share one reference-counted allocation.
///
/// Cloning or windowing never copies items. Writes take a short exclusive lock
/// on the whole allocation, so windows can be handed to other threads freely;
/// ordering between concurrent writers is up to the caller.
pub struct ArrayDataBuffer<S> {
    storage: Arc<RwLock<Vec<S>>>,
    start: usize,
    len: usize,
    read_only: bool,
}

impl<S> ArrayDataBuffer<S>
where
    S: Copy + Default + Send + Sync,
{
    /// Allocates `len` items initialised to `S::default()`.
    pub fn new(len: usize) -> Self {
        Self::from_vec(vec![S::default(); len])
    }
}

impl<S> ArrayDataBuffer<S>
where
    S: Copy + Send + Sync,
{
    pub fn from_vec(items: Vec<S>) -> Self {
        let len = items.len();
        ArrayDataBuffer { storage: Arc::new(RwLock::new(items)), start: 0, len, read_only: false }
    }

    /// Same window over the same storage, rejecting writes.
    pub fn as_read_only(&self) -> Self {
        ArrayDataBuffer { read_only: true, ..self.clone() }
    }

    /// Whether both buffers share one allocation, regardless of their windows.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    fn window(&self, index: usize, size: usize) -> Self {
        ArrayDataBuffer { start: self.start + index, len: size, ..self.clone() }
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            Err(Error::ReadOnly)
        } else {
            Ok(())
        }
    }
}

impl<S> Clone for ArrayDataBuffer<S> {
    fn clone(&self) -> Self {
        ArrayDataBuffer {
            storage: Arc::clone(&self.storage),
            start: self.start,
            len: self.len,
            read_only: self.read_only,
        }
    }
}

impl<S> fmt::Debug for ArrayDataBuffer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayDataBuffer")
            .field("start", &self.start)
            .field("len", &self.len)
            .field("read_only", &self.read_only)
            .finish()
    }
}

impl<S> DataBuffer for ArrayDataBuffer<S>
where
    S: Copy + Send + Sync,
{
    type Item = S;

    fn len(&self) -> usize {
        self.len
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn get(&self, index: usize) -> Result<S> {
        check_index(index, self.len)?;
        Ok(self.storage.read()[self.start + index])
    }

    fn set(&self, index: usize, value: S) -> Result<()> {
        self.check_writable()?;
        check_index(index, self.len)?;
        self.storage.write()[self.start + index] = value;
        Ok(())
    }

    fn offset(&self, index: usize) -> Result<Self> {
        check_window(index, 0, self.len)?;
        Ok(self.window(index, self.len - index))
    }

    fn narrow(&self, size: usize) -> Result<Self> {
        check_window(0, size, self.len)?;
        Ok(self.window(0, size))
    }

    fn slice(&self, index: usize, size: usize) -> Result<Self> {
        check_window(index, size, self.len)?;
        Ok(self.window(index, size))
    }

    fn read(&self, index: usize, dst: &mut [S]) -> Result<()> {
        check_window(index, dst.len(), self.len)?;
        let from = self.start + index;
        dst.copy_from_slice(&self.storage.read()[from..from + dst.len()]);
        Ok(())
    }

    fn write(&self, index: usize, src: &[S]) -> Result<()> {
        self.check_writable()?;
        check_window(index, src.len(), self.len)?;
        let from = self.start + index;
        self.storage.write()[from..from + src.len()].copy_from_slice(src);
        Ok(())
    }

    fn to_vec(&self) -> Result<Vec<S>> {
        Ok(self.storage.read()[self.start..self.start + self.len].to_vec())
    }
}
