// Container writer for synthesizing test inputs.
//
// Produces the same record framing the scanner reads, with values encoded
// the way the container stores each scalar type. The declared size is
// written as the absolute end offset of the last record so that every
// record falls inside the scan bound.

use super::header::SIZE_FIELD_LEN;
use super::varint;

/// Trailer varint written after the size field (`ff ff ff 07`).
pub const DEFAULT_RESERVED: u64 = 0x00FF_FFFF;

/// Incrementally builds a container buffer.
#[derive(Debug, Clone)]
pub struct ContainerBuilder {
    buf: Vec<u8>,
    header_len: usize,
    declared_size: Option<u32>,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    /// Start a container with the size-then-varint prelude.
    pub fn new() -> Self {
        let mut buf = vec![0u8; SIZE_FIELD_LEN];
        varint::push_u64(&mut buf, DEFAULT_RESERVED);
        Self {
            header_len: buf.len(),
            buf,
            declared_size: None,
        }
    }

    /// Start a container with a fixed-length, zero-filled prelude.
    pub fn with_fixed_header(len: usize) -> Self {
        let header_len = len.max(SIZE_FIELD_LEN);
        Self {
            buf: vec![0u8; header_len],
            header_len,
            declared_size: None,
        }
    }

    /// Override the declared size instead of deriving it on `finish`.
    pub fn declared_size(mut self, size: u32) -> Self {
        self.declared_size = Some(size);
        self
    }

    /// Current length of the buffer, i.e. the offset of the next record.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True until the first record is appended.
    pub fn is_empty(&self) -> bool {
        self.buf.len() == self.header_len
    }

    /// Append a raw record. An empty `value` is written as a tombstone.
    pub fn put_raw(&mut self, key: &str, value: &[u8]) -> &mut Self {
        varint::push_u64(&mut self.buf, key.len() as u64);
        self.buf.extend_from_slice(key.as_bytes());
        varint::push_u64(&mut self.buf, value.len() as u64);
        self.buf.extend_from_slice(value);
        self
    }

    /// Append a tombstone for `key`.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.put_raw(key, &[])
    }

    pub fn put_bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.put_raw(key, &[u8::from(value)])
    }

    pub fn put_i32(&mut self, key: &str, value: i32) -> &mut Self {
        self.put_i64(key, i64::from(value))
    }

    pub fn put_u32(&mut self, key: &str, value: u32) -> &mut Self {
        self.put_u64(key, u64::from(value))
    }

    pub fn put_i64(&mut self, key: &str, value: i64) -> &mut Self {
        self.put_u64(key, value as u64)
    }

    pub fn put_u64(&mut self, key: &str, value: u64) -> &mut Self {
        let mut encoded = Vec::with_capacity(varint::MAX_VARINT_LEN);
        varint::push_u64(&mut encoded, value);
        self.put_raw(key, &encoded)
    }

    pub fn put_f64(&mut self, key: &str, value: f64) -> &mut Self {
        self.put_raw(key, &value.to_le_bytes())
    }

    /// Append a length-delimited byte string value.
    pub fn put_bytes(&mut self, key: &str, value: &[u8]) -> &mut Self {
        let mut encoded = Vec::with_capacity(value.len() + varint::MAX_VARINT_LEN);
        varint::push_u64(&mut encoded, value.len() as u64);
        encoded.extend_from_slice(value);
        self.put_raw(key, &encoded)
    }

    pub fn put_str(&mut self, key: &str, value: &str) -> &mut Self {
        self.put_bytes(key, value.as_bytes())
    }

    /// Append the zero-length-key end marker.
    pub fn end_marker(&mut self) -> &mut Self {
        self.buf.push(0x00);
        self
    }

    /// Write the declared size and return the buffer.
    pub fn finish(&self) -> Vec<u8> {
        let mut out = self.buf.clone();
        let size = self
            .declared_size
            .unwrap_or_else(|| u32::try_from(out.len()).unwrap_or(u32::MAX));
        out[..SIZE_FIELD_LEN].copy_from_slice(&size.to_le_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::header::read_header;
    use crate::container::scanner::scan;

    #[test]
    fn built_container_scans_back() {
        let mut builder = ContainerBuilder::new();
        builder
            .put_i32("n", -1)
            .put_str("s", "hi")
            .put_bool("b", true)
            .remove("n")
            .put_f64("f", 1.5);
        let buf = builder.finish();

        let header = read_header(&buf).unwrap();
        assert_eq!(header.declared_size as usize, buf.len());
        assert_eq!(header.reserved, Some(DEFAULT_RESERVED));

        let store = scan(&buf, &header);
        assert_eq!(store.get("n").unwrap().len(), 1);
        assert_eq!(store.get("n").unwrap()[0].len(), varint::MAX_VARINT_LEN);
        assert_eq!(store.get("s").unwrap(), &[vec![0x02u8, b'h', b'i']]);
        assert_eq!(store.get("b").unwrap(), &[vec![0x01u8]]);
        assert_eq!(store.get("f").unwrap(), &[1.5f64.to_le_bytes().to_vec()]);
    }

    #[test]
    fn explicit_declared_size() {
        let mut builder = ContainerBuilder::new().declared_size(0);
        builder.put_u32("k", 7).end_marker();
        let buf = builder.finish();
        assert_eq!(&buf[..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn fixed_header_prelude() {
        let mut builder = ContainerBuilder::with_fixed_header(8);
        assert!(builder.is_empty());
        builder.put_u64("k", 1);
        assert_eq!(builder.len(), 8 + 4);
    }
}
