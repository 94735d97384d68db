use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncSeek, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::{
    archive_metadata::{ArchiveEntry, ArchiveMetadata},
    constants::{MAGIC_BYTES, VERSION},
    num_trait::{DataType, Num},
    DataBuffer, Error, Result,
};

/// Bytes of one buffer ready to be archived, tagged with its element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveData {
    data_type: DataType,
    bytes: Bytes,
}

impl ArchiveData {
    /// Snapshots the visible items of `buffer` in native byte order.
    pub fn from_buffer<B>(buffer: &B) -> Result<Self>
    where
        B: DataBuffer,
        B::Item: Num,
    {
        let items = buffer.to_vec()?;
        let bytes = Bytes::copy_from_slice(bytemuck::cast_slice::<B::Item, u8>(&items));
        Ok(ArchiveData { data_type: <B::Item as Num>::data_type(), bytes })
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / self.data_type.byte_width()
    }
}

// Define a trait for writing storage buffers to a destination.
pub trait BufferArchiveWrite {
    /// Writes every `(name, data)` pair as one archive entry, in iteration order.
    ///
    /// # Arguments
    /// * `buffers` - Pairs of a unique entry name and the data stored under it.
    ///
    /// # Returns
    /// The metadata written to the archive, `InvalidArchive` when two names
    /// collide (nothing is written then), or an I/O error from the destination.
    async fn write_buffers<'a>(
        &mut self,
        buffers: impl IntoIterator<Item = (&'a str, ArchiveData)>,
    ) -> Result<ArchiveMetadata>;
}

/// Implements `BufferArchiveWrite` for any destination that supports async writes and seeks.
pub struct BufferArchiveWriter<W>
where
    W: AsyncWrite + AsyncSeek + Unpin,
{
    writer: W,
}

impl<W> BufferArchiveWriter<W>
where
    W: AsyncWrite + AsyncSeek + Unpin,
{
    /// Creates a new `BufferArchiveWriter`.
    ///
    /// # Arguments
    /// * `writer` - An object that implements `AsyncWrite` and `AsyncSeek`.
    pub fn new(writer: W) -> Self {
        BufferArchiveWriter { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> BufferArchiveWrite for BufferArchiveWriter<W>
where
    W: AsyncWrite + AsyncSeek + Unpin,
{
    /// Format: magic bytes | entry data | metadata | metadata size | magic bytes.
    async fn write_buffers<'a>(
        &mut self,
        buffers: impl IntoIterator<Item = (&'a str, ArchiveData)>,
    ) -> Result<ArchiveMetadata> {
        let pending: Vec<_> = buffers.into_iter().collect();

        // Metadata is built before anything is written so that a rejected
        // entry set leaves the destination untouched.
        let mut entries = Vec::with_capacity(pending.len());
        let mut current_offset = MAGIC_BYTES.len() as u64;
        for (name, data) in pending.iter() {
            let data_size = data.bytes.len() as u64;
            entries.push(ArchiveEntry::new(name, data.data_type, current_offset, data_size));
            current_offset += data_size;
        }
        let metadata = ArchiveMetadata::new(VERSION, entries)?;

        let mut metadata_buf = BytesMut::new();
        metadata.encode(&mut metadata_buf)?;
        let metadata_size = u32::try_from(metadata_buf.len()).map_err(|_| {
            Error::InvalidArchive(format!("metadata of {} bytes is too large", metadata_buf.len()))
        })?;

        // Leading magic, then entry data in the order the offsets were assigned.
        self.writer.write_all(MAGIC_BYTES).await?;
        for (name, data) in pending.iter() {
            debug!("Writing entry `{}` ({} bytes)", name, data.bytes.len());
            self.writer.write_all(&data.bytes).await?;
        }
        // Metadata, its size and the closing magic form the tail of the file.
        self.writer.write_all(&metadata_buf).await?;
        self.writer.write_all(&metadata_size.to_le_bytes()).await?;
        self.writer.write_all(MAGIC_BYTES).await?;
        self.writer.flush().await?;
        debug!("Wrote archive with {} entries", metadata.entries().len());
        Ok(metadata)
    }
}
