use std::path::Path;

use bytes::{Bytes, BytesMut};
use tokio::{
    fs::File,
    sync::{Mutex, OnceCell},
};
use tracing::{debug, warn};

use crate::{
    archive_metadata::{ArchiveEntry, ArchiveMetadata},
    buffer_archive_reader::{BufferArchiveRead, BufferArchiveReader},
    constants::VERSION,
    num_trait::Num,
    BytesDataBuffer, Error, PodLayout, Result, ScaledBuffer,
};

/// Typed view over an archived buffer, backed by the bytes loaded from disk.
pub type ArchivedBuffer<T> = ScaledBuffer<BytesDataBuffer, PodLayout<T>>;

/// Named storage buffers persisted in an archive file.
///
/// Metadata is read on first use and cached. Entry data is loaded on each
/// request into one shared allocation and exposed without further copies.
pub struct BufferArchive {
    metadata: OnceCell<ArchiveMetadata>,
    reader: Mutex<BufferArchiveReader<File>>,
}

impl BufferArchive {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening buffer archive {}", path.display());
        let file = File::open(path).await?;
        let reader = BufferArchiveReader::new(file);
        Ok(BufferArchive { metadata: OnceCell::new(), reader: Mutex::new(reader) })
    }

    pub async fn metadata(&self) -> Result<&ArchiveMetadata> {
        self.metadata.get_or_try_init(|| self.load_metadata()).await
    }

    async fn load_metadata(&self) -> Result<ArchiveMetadata> {
        let mut reader = self.reader.lock().await;
        let metadata_size = reader.get_metadata_size().await?;
        let metadata_offset = reader.get_metadata_offset().await?;
        let mut buf = BytesMut::zeroed(metadata_size);
        reader.read_metadata(&mut buf).await?;
        let metadata = ArchiveMetadata::decode(buf.freeze())?;

        // Entry data has to end before the metadata section begins.
        for entry in metadata.entries() {
            let end = entry.data_offset().saturating_add(entry.data_size());
            if end > metadata_offset {
                return Err(Error::InvalidArchive(format!(
                    "entry `{}` ends at {} past the data section ending at {}",
                    entry.name(),
                    end,
                    metadata_offset
                )));
            }
        }
        if metadata.version() != VERSION {
            warn!("Archive written by version {}, reading with {}", metadata.version(), VERSION);
        }
        debug!("Loaded metadata with {} entries", metadata.entries().len());
        Ok(metadata)
    }

    pub async fn entries(&self) -> Result<&[ArchiveEntry]> {
        Ok(self.metadata().await?.entries())
    }

    pub async fn entry(&self, name: &str) -> Result<&ArchiveEntry> {
        self.metadata().await?.entry(name).ok_or_else(|| Error::EntryNotFound(name.to_string()))
    }

    /// Raw bytes of an entry, whatever its element type.
    pub async fn get_bytes(&self, name: &str) -> Result<BytesDataBuffer> {
        let entry = self.entry(name).await?;
        let bytes = self.read_entry(entry).await?;
        Ok(BytesDataBuffer::new(bytes))
    }

    /// An entry viewed as values of `T`. The entry must have been written with `T` items.
    pub async fn get_buffer<T: Num>(&self, name: &str) -> Result<ArchivedBuffer<T>> {
        let entry = self.entry(name).await?;
        if entry.data_type() != T::data_type() {
            return Err(Error::TypeMismatch { expected: T::data_type(), found: entry.data_type() });
        }
        let bytes = self.read_entry(entry).await?;
        ScaledBuffer::new(BytesDataBuffer::new(bytes), PodLayout::new())
    }

    async fn read_entry(&self, entry: &ArchiveEntry) -> Result<Bytes> {
        let mut buf = BytesMut::zeroed(entry.data_size() as usize);
        self.reader.lock().await.read_entry_data(entry, &mut buf).await?;
        Ok(buf.freeze())
    }
}
