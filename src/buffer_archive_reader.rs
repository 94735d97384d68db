use std::io::SeekFrom;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};
use tracing::debug;

use crate::{
    archive_metadata::ArchiveEntry,
    constants::{MAGIC_BYTES, TRAILER_SIZE},
    Error, Result,
};

/// Trait for reading archive metadata and entry data from an async source.
pub trait BufferArchiveRead {
    /// Reads the size of the metadata section from the end of the archive.
    ///
    /// # Returns
    /// The metadata size in bytes, or `InvalidArchive` when the file is shorter
    /// than its markers, the trailing magic is wrong, or the size runs past the
    /// leading magic.
    async fn get_metadata_size(&mut self) -> Result<usize>;

    /// Offset at which the metadata section starts, which is also where entry
    /// data must end.
    ///
    /// # Returns
    /// The offset in bytes, with the same failures as `get_metadata_size`.
    async fn get_metadata_offset(&mut self) -> Result<u64>;

    /// Reads the metadata section into the start of `buf`.
    /// Both magic markers are verified first.
    ///
    /// # Arguments
    /// * `buf` - Destination holding at least `get_metadata_size()` bytes.
    ///
    /// # Returns
    /// `Ok(())` on success, `LengthMismatch` when `buf` is too small, or
    /// `InvalidArchive` when the file is not a well-formed archive.
    async fn read_metadata(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Reads the data of one entry into the start of `buf`.
    ///
    /// # Arguments
    /// * `entry` - The metadata entry whose data range is read.
    /// * `buf` - Destination holding at least `entry.data_size()` bytes.
    ///
    /// # Returns
    /// `Ok(())` on success, `LengthMismatch` when `buf` is too small, or an I/O
    /// error when the range cannot be read.
    async fn read_entry_data(&mut self, entry: &ArchiveEntry, buf: &mut [u8]) -> Result<()>;
}

/// Implements `BufferArchiveRead` for any source that supports async reads and seeks.
pub struct BufferArchiveReader<R>
where
    R: AsyncRead + AsyncSeek,
{
    reader: R,
}

impl<R> BufferArchiveReader<R>
where
    R: AsyncRead + AsyncSeek,
{
    /// Creates a new `BufferArchiveReader`.
    ///
    /// # Arguments
    /// * `reader` - An object that implements `AsyncRead` and `AsyncSeek`.
    pub fn new(reader: R) -> Self {
        BufferArchiveReader { reader }
    }
}

impl<R> BufferArchiveRead for BufferArchiveReader<R>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    async fn get_metadata_size(&mut self) -> Result<usize> {
        let file_len = self.reader.seek(SeekFrom::End(0)).await?;
        let markers = (MAGIC_BYTES.len() + TRAILER_SIZE) as u64;
        if file_len < markers {
            return Err(Error::InvalidArchive(format!("file of {} bytes is too short", file_len)));
        }

        // [metadata_size (4 bytes)][magic_bytes (4 bytes)] close the archive.
        self.reader.seek(SeekFrom::End(-(TRAILER_SIZE as i64))).await?;
        let mut trailer = [0u8; TRAILER_SIZE];
        self.reader.read_exact(&mut trailer).await?;
        if &trailer[4..] != MAGIC_BYTES {
            return Err(Error::InvalidArchive("invalid trailing magic bytes".to_string()));
        }

        // The metadata must fit between the leading magic and the trailer.
        let metadata_size = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
        if u64::from(metadata_size) > file_len - markers {
            return Err(Error::InvalidArchive(format!(
                "metadata size {} exceeds file of {} bytes",
                metadata_size, file_len
            )));
        }
        Ok(metadata_size as usize)
    }

    async fn get_metadata_offset(&mut self) -> Result<u64> {
        let metadata_size = self.get_metadata_size().await?;
        let file_len = self.reader.seek(SeekFrom::End(0)).await?;
        Ok(file_len - (metadata_size + TRAILER_SIZE) as u64)
    }

    async fn read_metadata(&mut self, buf: &mut [u8]) -> Result<()> {
        // Verify the leading magic bytes.
        self.reader.seek(SeekFrom::Start(0)).await?;
        let mut magic_buf = [0u8; 4];
        self.reader.read_exact(&mut magic_buf).await?;
        if &magic_buf != MAGIC_BYTES {
            return Err(Error::InvalidArchive("invalid leading magic bytes".to_string()));
        }

        let metadata_size = self.get_metadata_size().await?;
        if buf.len() < metadata_size {
            return Err(Error::LengthMismatch { expected: metadata_size, found: buf.len() });
        }

        // Metadata sits right before the trailer.
        let start = -((metadata_size + TRAILER_SIZE) as i64);
        let position = self.reader.seek(SeekFrom::End(start)).await?;
        self.reader.read_exact(&mut buf[..metadata_size]).await?;
        debug!("Read {} bytes of metadata at offset {}", metadata_size, position);
        Ok(())
    }

    async fn read_entry_data(&mut self, entry: &ArchiveEntry, buf: &mut [u8]) -> Result<()> {
        let size = entry.data_size() as usize;
        if buf.len() < size {
            return Err(Error::LengthMismatch { expected: size, found: buf.len() });
        }
        self.reader.seek(SeekFrom::Start(entry.data_offset())).await?;
        self.reader.read_exact(&mut buf[..size]).await?;
        debug!("Read entry `{}` ({} bytes)", entry.name(), size);
        Ok(())
    }
}
