mod archive_metadata;
mod array_buffer;
mod buffer_archive;
mod buffer_archive_reader;
mod buffer_archive_writer;
mod bytes_buffer;
mod constants;
mod data_buffer;
mod data_layout;
mod error;
mod num_trait;
mod scaled_buffer;
mod utils;

pub use archive_metadata::{ArchiveEntry, ArchiveMetadata};
pub use array_buffer::ArrayDataBuffer;
pub use buffer_archive::{ArchivedBuffer, BufferArchive};
pub use buffer_archive_reader::{BufferArchiveRead, BufferArchiveReader};
pub use buffer_archive_writer::{ArchiveData, BufferArchiveWrite, BufferArchiveWriter};
pub use bytes_buffer::BytesDataBuffer;
pub use constants::{MAGIC_BYTES, VERSION};
pub use data_buffer::DataBuffer;
pub use data_layout::{
    ArrayLayout, BFloat16Layout, BoolLayout, DataLayout, Float16Layout, PodLayout,
};
pub use error::Error;
pub use num_trait::{DataType, Num};
pub use scaled_buffer::ScaledBuffer;

pub type Result<T> = std::result::Result<T, Error>;
