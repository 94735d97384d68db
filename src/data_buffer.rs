use crate::{
    error::{check_window, Error},
    Result,
};

/// A fixed-length sequence of items addressed by zero-based position.
///
/// Windows returned by [`offset`](DataBuffer::offset), [`narrow`](DataBuffer::narrow)
/// and [`slice`](DataBuffer::slice) share the backing storage of the buffer they come
/// from: a write through one window is visible through every other window covering
/// the same positions. Windows are independent values, so narrowing one never
/// affects another.
///
/// Implementations check every coordinate before touching storage. A call that
/// fails leaves the storage unchanged.
pub trait DataBuffer: Clone + Send + Sync {
    type Item: Copy + Send + Sync;

    /// Number of items visible through this buffer.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether writes through this buffer are rejected.
    fn is_read_only(&self) -> bool;

    /// Item at `index`. Fails with `IndexOutOfBounds` unless `index < len()`.
    fn get(&self, index: usize) -> Result<Self::Item>;

    /// Replaces the item at `index`. Fails with `ReadOnly` on read-only buffers and
    /// with `IndexOutOfBounds` unless `index < len()`; nothing is written on failure.
    fn set(&self, index: usize, value: Self::Item) -> Result<()>;

    /// Window starting at `index` and running to the end of this buffer.
    fn offset(&self, index: usize) -> Result<Self>;

    /// Window over the first `size` items of this buffer.
    fn narrow(&self, size: usize) -> Result<Self>;

    /// Window over `size` items starting at `index`.
    fn slice(&self, index: usize, size: usize) -> Result<Self>;

    /// Copies `dst.len()` items starting at `index` into `dst`.
    fn read(&self, index: usize, dst: &mut [Self::Item]) -> Result<()>;

    /// Copies all of `src` into this buffer starting at `index`.
    fn write(&self, index: usize, src: &[Self::Item]) -> Result<()>;

    /// Copies the first `size` items of this buffer into the start of `dst`.
    fn copy_to<D>(&self, dst: &D, size: usize) -> Result<()>
    where
        D: DataBuffer<Item = Self::Item>,
    {
        check_window(0, size, self.len())?;
        check_window(0, size, dst.len())?;
        if dst.is_read_only() {
            return Err(Error::ReadOnly);
        }
        let items = self.narrow(size)?.to_vec()?;
        dst.write(0, &items)
    }

    fn to_vec(&self) -> Result<Vec<Self::Item>> {
        let mut items = Vec::with_capacity(self.len());
        for index in 0..self.len() {
            items.push(self.get(index)?);
        }
        Ok(items)
    }

    /// True when both buffers have the same length and equal items at every position.
    fn content_eq<O>(&self, other: &O) -> Result<bool>
    where
        O: DataBuffer<Item = Self::Item>,
        Self::Item: PartialEq,
    {
        if self.len() != other.len() {
            return Ok(false);
        }
        for index in 0..self.len() {
            if self.get(index)? != other.get(index)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
