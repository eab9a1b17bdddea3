//! Wire framing helpers

use crate::ProtocolVersion;
use cqlkit_diagnostics::{CQL0201, CQL0202, CqlError, Result};
use cqlkit_types::NativeType;

/// Copy `bytes` into a fixed-width array, failing on any other length
pub fn fixed<const N: usize>(bytes: &[u8], native: NativeType) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| {
        CqlError::invalid_type(
            CQL0201,
            format!(
                "invalid {native} value, expecting {N} bytes but got {}",
                bytes.len()
            ),
        )
    })
}

/// Sequential reader over composite value bytes
pub struct Reader<'a> {
    bytes: &'a [u8],
    version: ProtocolVersion,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8], version: ProtocolVersion) -> Self {
        Self { bytes, version }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.bytes.len() < len {
            return Err(CqlError::invalid_type(
                CQL0201,
                format!(
                    "truncated value, expecting {len} more bytes but got {}",
                    self.bytes.len()
                ),
            ));
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }

    fn read_i32(&mut self) -> Result<i32> {
        let head = self.take(4)?;
        Ok(i32::from_be_bytes([head[0], head[1], head[2], head[3]]))
    }

    /// Element count or length, sized per protocol version
    pub fn read_size(&mut self) -> Result<usize> {
        if self.version.uses_short_sizes() {
            let head = self.take(2)?;
            Ok(usize::from(u16::from_be_bytes([head[0], head[1]])))
        } else {
            let size = self.read_i32()?;
            usize::try_from(size).map_err(|_| {
                CqlError::invalid_type(CQL0202, format!("negative collection size {size}"))
            })
        }
    }

    /// Collection element; a negative V3+ length stands for `NULL`
    pub fn read_element(&mut self) -> Result<Option<&'a [u8]>> {
        if self.version.uses_short_sizes() {
            let len = self.read_size()?;
            return self.take(len).map(Some);
        }
        self.read_component()
    }

    /// Tuple or user type component, always framed with a signed 32-bit length
    pub fn read_component(&mut self) -> Result<Option<&'a [u8]>> {
        let len = self.read_i32()?;
        match usize::try_from(len) {
            Ok(len) => self.take(len).map(Some),
            Err(_) => Ok(None),
        }
    }

    pub fn finish(self) -> Result<()> {
        if self.bytes.is_empty() {
            Ok(())
        } else {
            Err(CqlError::invalid_type(
                CQL0201,
                format!("{} unexpected trailing bytes", self.bytes.len()),
            ))
        }
    }
}

/// Append an element count or length, sized per protocol version
pub fn write_size(out: &mut Vec<u8>, size: usize, version: ProtocolVersion) -> Result<()> {
    if version.uses_short_sizes() {
        let size = u16::try_from(size).map_err(|_| too_large(size, version))?;
        out.extend_from_slice(&size.to_be_bytes());
    } else {
        let size = i32::try_from(size).map_err(|_| too_large(size, version))?;
        out.extend_from_slice(&size.to_be_bytes());
    }
    Ok(())
}

/// Append a length-prefixed collection element
pub fn write_element(out: &mut Vec<u8>, bytes: &[u8], version: ProtocolVersion) -> Result<()> {
    write_size(out, bytes.len(), version)?;
    out.extend_from_slice(bytes);
    Ok(())
}

/// Append a tuple or user type component, `-1` for `NULL`
pub fn write_component(out: &mut Vec<u8>, bytes: Option<&[u8]>) -> Result<()> {
    match bytes {
        Some(bytes) => write_element(out, bytes, ProtocolVersion::V4),
        None => {
            out.extend_from_slice(&(-1i32).to_be_bytes());
            Ok(())
        }
    }
}

fn too_large(size: usize, version: ProtocolVersion) -> CqlError {
    CqlError::invalid_type(
        CQL0202,
        format!("size {size} cannot be encoded with protocol {version}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_and_long_sizes() {
        let mut short = Vec::new();
        write_element(&mut short, &[7], ProtocolVersion::V2).unwrap();
        assert_eq!(short, vec![0, 1, 7]);

        let mut long = Vec::new();
        write_element(&mut long, &[7], ProtocolVersion::V4).unwrap();
        assert_eq!(long, vec![0, 0, 0, 1, 7]);

        let mut reader = Reader::new(&long, ProtocolVersion::V4);
        assert_eq!(reader.read_element().unwrap(), Some(&[7u8][..]));
        reader.finish().unwrap();
    }

    #[test]
    fn test_null_component_and_truncation() {
        let mut out = Vec::new();
        write_component(&mut out, None).unwrap();
        let mut reader = Reader::new(&out, ProtocolVersion::V3);
        assert_eq!(reader.read_component().unwrap(), None);
        assert!(reader.is_empty());

        let mut reader = Reader::new(&[0, 0, 0, 5, 1], ProtocolVersion::V3);
        assert_eq!(reader.read_component().unwrap_err().code(), CQL0201);
    }

    #[test]
    fn test_fixed_width() {
        assert_eq!(fixed::<4>(&[0, 0, 0, 1], NativeType::Int).unwrap(), [0, 0, 0, 1]);
        assert_eq!(fixed::<4>(&[0, 1], NativeType::Int).unwrap_err().code(), CQL0201);
    }
}
