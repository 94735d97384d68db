/// Marks both ends of an archive file.
pub const MAGIC_BYTES: &[u8; 4] = b"SBUF";

/// Written into archive metadata; readers log a mismatch but still accept the file.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// magic bytes + metadata size trailer
pub(crate) const TRAILER_SIZE: usize = 8;
