use bytes::Bytes;

use crate::{
    data_buffer::DataBuffer,
    error::{check_index, check_window, Error},
    Result,
};

/// Read-only byte storage backed by [`Bytes`].
///
/// Windows are `Bytes::slice` calls, so they share the underlying allocation
/// (typically a region loaded from an archive) without copying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytesDataBuffer {
    bytes: Bytes,
}

impl BytesDataBuffer {
    pub fn new(bytes: Bytes) -> Self {
        BytesDataBuffer { bytes }
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl From<Bytes> for BytesDataBuffer {
    fn from(bytes: Bytes) -> Self {
        BytesDataBuffer::new(bytes)
    }
}

impl From<Vec<u8>> for BytesDataBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        BytesDataBuffer::new(Bytes::from(bytes))
    }
}

impl DataBuffer for BytesDataBuffer {
    type Item = u8;

    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn get(&self, index: usize) -> Result<u8> {
        check_index(index, self.bytes.len())?;
        Ok(self.bytes[index])
    }

    fn set(&self, _index: usize, _value: u8) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn offset(&self, index: usize) -> Result<Self> {
        check_window(index, 0, self.bytes.len())?;
        Ok(BytesDataBuffer { bytes: self.bytes.slice(index..) })
    }

    fn narrow(&self, size: usize) -> Result<Self> {
        check_window(0, size, self.bytes.len())?;
        Ok(BytesDataBuffer { bytes: self.bytes.slice(..size) })
    }

    fn slice(&self, index: usize, size: usize) -> Result<Self> {
        check_window(index, size, self.bytes.len())?;
        Ok(BytesDataBuffer { bytes: self.bytes.slice(index..index + size) })
    }

    fn read(&self, index: usize, dst: &mut [u8]) -> Result<()> {
        check_window(index, dst.len(), self.bytes.len())?;
        dst.copy_from_slice(&self.bytes[index..index + dst.len()]);
        Ok(())
    }

    fn write(&self, _index: usize, _src: &[u8]) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_do_not_copy() {
        let buffer = BytesDataBuffer::from(vec![10u8, 20, 30, 40, 50]);
        let window = buffer.slice(1, 3).unwrap();
        assert_eq!(window.to_vec().unwrap(), vec![20, 30, 40]);
        assert_eq!(window.as_bytes().as_ptr(), buffer.as_bytes()[1..].as_ptr());

        assert_eq!(buffer.offset(3).unwrap().to_vec().unwrap(), vec![40, 50]);
        assert_eq!(buffer.narrow(2).unwrap().to_vec().unwrap(), vec![10, 20]);
        assert!(buffer.offset(5).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_bounds() {
        let buffer = BytesDataBuffer::from(vec![1u8, 2, 3, 4]);
        assert!(matches!(buffer.get(4), Err(Error::IndexOutOfBounds { index: 4, len: 4 })));
        assert!(buffer.offset(5).is_err());
        assert!(buffer.narrow(5).is_err());
        assert!(buffer.slice(2, 3).is_err());
        let mut dst = [0u8; 2];
        assert!(buffer.read(3, &mut dst).is_err());
        buffer.read(2, &mut dst).unwrap();
        assert_eq!(dst, [3, 4]);
    }

    #[test]
    fn test_rejects_writes() {
        let buffer = BytesDataBuffer::from(vec![1u8, 2]);
        assert!(buffer.is_read_only());
        assert!(matches!(buffer.set(0, 5), Err(Error::ReadOnly)));
        assert!(matches!(buffer.write(0, &[5]), Err(Error::ReadOnly)));
        assert_eq!(buffer.get(0).unwrap(), 1);
    }
}
