use std::{fmt, marker::PhantomData, mem::size_of};

use bytemuck::Pod;
use half::{bf16, f16};

use crate::{data_buffer::DataBuffer, Result};

/// Converts between one logical value and a run of `scale` storage items.
///
/// Layouts hold no mutable state; one instance may back any number of views
/// used concurrently. `index` is a storage coordinate: the position of the first
/// item of the run inside `buffer`.
pub trait DataLayout<S: DataBuffer>: Send + Sync {
    type Value: Copy + Send + Sync;

    /// Number of storage items composing one value. Must be positive.
    fn scale(&self) -> usize;

    fn read_element(&self, buffer: &S, index: usize) -> Result<Self::Value>;

    fn write_element(&self, buffer: &S, index: usize, value: Self::Value) -> Result<()>;
}

/// Any plain-old-data value stored as its native-endian bytes.
pub struct PodLayout<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> PodLayout<T> {
    pub fn new() -> Self {
        PodLayout { _marker: PhantomData }
    }
}

impl<T> Default for PodLayout<T> {
    fn default() -> Self {
        PodLayout::new()
    }
}

impl<T> Clone for PodLayout<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PodLayout<T> {}

impl<T> fmt::Debug for PodLayout<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PodLayout<{}>", std::any::type_name::<T>())
    }
}

impl<S, T> DataLayout<S> for PodLayout<T>
where
    S: DataBuffer<Item = u8>,
    T: Pod + Send + Sync,
{
    type Value = T;

    fn scale(&self) -> usize {
        size_of::<T>()
    }

    fn read_element(&self, buffer: &S, index: usize) -> Result<T> {
        let mut value = T::zeroed();
        buffer.read(index, bytemuck::bytes_of_mut(&mut value))?;
        Ok(value)
    }

    fn write_element(&self, buffer: &S, index: usize, value: T) -> Result<()> {
        buffer.write(index, bytemuck::bytes_of(&value))
    }
}

/// Groups `N` consecutive storage items into one fixed-size array value,
/// e.g. interleaved complex numbers as `[f32; 2]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayLayout<const N: usize>;

impl<S, const N: usize> DataLayout<S> for ArrayLayout<N>
where
    S: DataBuffer,
    S::Item: Default,
{
    type Value = [S::Item; N];

    fn scale(&self) -> usize {
        N
    }

    fn read_element(&self, buffer: &S, index: usize) -> Result<[S::Item; N]> {
        let mut value = [<S::Item as Default>::default(); N];
        buffer.read(index, &mut value)?;
        Ok(value)
    }

    fn write_element(&self, buffer: &S, index: usize, value: [S::Item; N]) -> Result<()> {
        buffer.write(index, &value)
    }
}

/// Booleans stored one per byte. Any non-zero byte reads as `true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolLayout;

impl<S> DataLayout<S> for BoolLayout
where
    S: DataBuffer<Item = u8>,
{
    type Value = bool;

    fn scale(&self) -> usize {
        1
    }

    fn read_element(&self, buffer: &S, index: usize) -> Result<bool> {
        Ok(buffer.get(index)? != 0)
    }

    fn write_element(&self, buffer: &S, index: usize, value: bool) -> Result<()> {
        buffer.set(index, value as u8)
    }
}

/// `f32` values stored as IEEE 754 half precision bit patterns.
///
/// Writes round to the nearest representable half; values outside its range
/// become infinities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Float16Layout;

impl<S> DataLayout<S> for Float16Layout
where
    S: DataBuffer<Item = u16>,
{
    type Value = f32;

    fn scale(&self) -> usize {
        1
    }

    fn read_element(&self, buffer: &S, index: usize) -> Result<f32> {
        Ok(f16::from_bits(buffer.get(index)?).to_f32())
    }

    fn write_element(&self, buffer: &S, index: usize, value: f32) -> Result<()> {
        buffer.set(index, f16::from_f32(value).to_bits())
    }
}

/// `f32` values stored as bfloat16 bit patterns (the upper half of an `f32`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BFloat16Layout;

impl<S> DataLayout<S> for BFloat16Layout
where
    S: DataBuffer<Item = u16>,
{
    type Value = f32;

    fn scale(&self) -> usize {
        1
    }

    fn read_element(&self, buffer: &S, index: usize) -> Result<f32> {
        Ok(bf16::from_bits(buffer.get(index)?).to_f32())
    }

    fn write_element(&self, buffer: &S, index: usize, value: f32) -> Result<()> {
        buffer.set(index, bf16::from_f32(value).to_bits())
    }
}
