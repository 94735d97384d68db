use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{constants::MAGIC_BYTES, num_trait::DataType, utils::entry_id, Error, Result};

/// Location and element type of one buffer stored in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    id: u64,
    name: String,
    data_type: DataType,
    data_offset: u64,
    data_size: u64,
}

impl ArchiveEntry {
    pub fn new(name: &str, data_type: DataType, data_offset: u64, data_size: u64) -> Self {
        ArchiveEntry { id: entry_id(name), name: name.to_string(), data_type, data_offset, data_size }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    /// Size of the stored data in bytes.
    pub fn data_size(&self) -> u64 {
        self.data_size
    }

    /// Number of elements of `data_type` stored in the entry.
    pub fn len(&self) -> usize {
        self.data_size as usize / self.data_type.byte_width()
    }
}

/// Table of contents written at the end of an archive.
///
/// Layout, all integers little endian:
/// `version_len: u16 | version | entry_count: u32 | entries`, each entry being
/// `id: u64 | name_len: u16 | name | data_type: u8 | data_offset: u64 | data_size: u64`.
/// Entries are kept sorted by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMetadata {
    version: String,
    entries: Vec<ArchiveEntry>,
}

impl ArchiveMetadata {
    /// Builds the table, rejecting two entries that map to the same id.
    pub fn new(version: &str, mut entries: Vec<ArchiveEntry>) -> Result<Self> {
        entries.sort_by_key(|entry| entry.id);
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(Error::InvalidArchive(format!(
                "entries `{}` and `{}` share id {:#x}",
                pair[0].name, pair[1].name, pair[0].id
            )));
        }
        Ok(ArchiveMetadata { version: version.to_string(), entries })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&ArchiveEntry> {
        let id = entry_id(name);
        self.entries
            .binary_search_by_key(&id, |entry| entry.id)
            .ok()
            .map(|position| &self.entries[position])
            .filter(|entry| entry.name == name)
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_str(buf, &self.version)?;
        buf.put_u32_le(self.entries.len() as u32);
        for entry in &self.entries {
            buf.put_u64_le(entry.id);
            put_str(buf, &entry.name)?;
            buf.put_u8(entry.data_type.code());
            buf.put_u64_le(entry.data_offset);
            buf.put_u64_le(entry.data_size);
        }
        Ok(())
    }

    pub fn decode(mut buf: Bytes) -> Result<Self> {
        let version = get_str(&mut buf)?;
        ensure_remaining(&buf, 4)?;
        let count = buf.get_u32_le() as usize;
        let mut entries = Vec::with_capacity(count.min(buf.remaining()));
        for _ in 0..count {
            ensure_remaining(&buf, 8)?;
            let id = buf.get_u64_le();
            let name = get_str(&mut buf)?;
            ensure_remaining(&buf, 17)?;
            let code = buf.get_u8();
            let data_type = DataType::from_code(code)
                .ok_or_else(|| Error::InvalidArchive(format!("unknown data type code {}", code)))?;
            let data_offset = buf.get_u64_le();
            let data_size = buf.get_u64_le();

            if id != entry_id(&name) {
                return Err(Error::InvalidArchive(format!("entry `{}` has a mismatched id", name)));
            }
            if data_offset < MAGIC_BYTES.len() as u64 || data_offset.checked_add(data_size).is_none()
            {
                return Err(Error::InvalidArchive(format!(
                    "entry `{}` has an invalid data range",
                    name
                )));
            }
            if data_size % data_type.byte_width() as u64 != 0 {
                return Err(Error::InvalidArchive(format!(
                    "entry `{}` size {} is not a multiple of {:?}",
                    name, data_size, data_type
                )));
            }
            entries.push(ArchiveEntry { id, name, data_type, data_offset, data_size });
        }
        if buf.has_remaining() {
            return Err(Error::InvalidArchive("trailing bytes after metadata".to_string()));
        }
        ArchiveMetadata::new(&version, entries)
    }
}

fn put_str(buf: &mut BytesMut, value: &str) -> Result<()> {
    let len = u16::try_from(value.len())
        .map_err(|_| Error::InvalidArchive(format!("string of {} bytes is too long", value.len())))?;
    buf.put_u16_le(len);
    buf.put_slice(value.as_bytes());
    Ok(())
}

fn get_str(buf: &mut Bytes) -> Result<String> {
    ensure_remaining(buf, 2)?;
    let len = buf.get_u16_le() as usize;
    ensure_remaining(buf, len)?;
    let raw = buf.split_to(len);
    String::from_utf8(raw.to_vec())
        .map_err(|_| Error::InvalidArchive("string is not valid UTF-8".to_string()))
}

fn ensure_remaining(buf: &Bytes, needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        return Err(Error::InvalidArchive("metadata is truncated".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArchiveMetadata {
        ArchiveMetadata::new("1.0", vec![
            ArchiveEntry::new("weights", DataType::Float32, 4, 16),
            ArchiveEntry::new("mask", DataType::UInt8, 20, 3),
        ])
        .unwrap()
    }

    #[test]
    fn test_encode_decode() {
        let metadata = sample();
        let mut buf = BytesMut::new();
        metadata.encode(&mut buf).unwrap();
        let decoded = ArchiveMetadata::decode(buf.freeze()).unwrap();
        assert_eq!(decoded, metadata);
        assert_eq!(decoded.version(), "1.0");
    }

    #[test]
    fn test_entry_lookup() {
        let metadata = sample();
        let weights = metadata.entry("weights").unwrap();
        assert_eq!(weights.data_type(), DataType::Float32);
        assert_eq!(weights.len(), 4);
        assert_eq!(metadata.entry("mask").unwrap().len(), 3);
        assert!(metadata.entry("bias").is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = ArchiveMetadata::new("1.0", vec![
            ArchiveEntry::new("a", DataType::Int8, 4, 1),
            ArchiveEntry::new("a", DataType::Int8, 5, 1),
        ]);
        assert!(matches!(result, Err(Error::InvalidArchive(_))));
    }

    #[test]
    fn test_truncated_metadata() {
        let mut buf = BytesMut::new();
        sample().encode(&mut buf).unwrap();
        let truncated = buf.freeze().slice(..20);
        assert!(matches!(ArchiveMetadata::decode(truncated), Err(Error::InvalidArchive(_))));
    }

    #[test]
    fn test_invalid_entries_rejected() {
        let bad_size = ArchiveMetadata::new("1.0", vec![ArchiveEntry::new(
            "x",
            DataType::Float64,
            4,
            12,
        )])
        .unwrap();
        let mut buf = BytesMut::new();
        bad_size.encode(&mut buf).unwrap();
        assert!(matches!(ArchiveMetadata::decode(buf.freeze()), Err(Error::InvalidArchive(_))));

        let bad_offset =
            ArchiveMetadata::new("1.0", vec![ArchiveEntry::new("x", DataType::Int8, 0, 1)])
                .unwrap();
        let mut buf = BytesMut::new();
        bad_offset.encode(&mut buf).unwrap();
        assert!(matches!(ArchiveMetadata::decode(buf.freeze()), Err(Error::InvalidArchive(_))));
    }
}
