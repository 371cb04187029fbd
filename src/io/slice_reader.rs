use crate::error::DecodeError;

use super::{private, Read};

/// A [`Read`] over a borrowed byte slice.
#[derive(Debug)]
pub struct SliceReader<'s> {
    slice: &'s [u8],
}

impl<'s> SliceReader<'s> {
    /// Wrap a byte slice for sequential reading.
    pub fn new(slice: &'s [u8]) -> Self {
        Self { slice }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.slice.len()
    }
}

impl private::Sealed for SliceReader<'_> {}

impl Read for SliceReader<'_> {
    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let (&first, rest) = self
            .slice
            .split_first()
            .ok_or_else(|| DecodeError::Parse("unexpected end of stream".to_string()))?;
        self.slice = rest;
        Ok(first)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DecodeError> {
        if self.slice.len() < buf.len() {
            return Err(DecodeError::Parse(format!(
                "unexpected end of stream: wanted {} bytes, {} remaining",
                buf.len(),
                self.slice.len()
            )));
        }
        let (head, tail) = self.slice.split_at(buf.len());
        buf.copy_from_slice(head);
        self.slice = tail;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bytes_in_order() {
        let data = [1u8, 2, 3, 4];
        let mut r = SliceReader::new(&data);
        assert_eq!(r.read_u8().unwrap(), 1);
        let mut buf = [0u8; 2];
        r.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [2, 3]);
        assert_eq!(r.read_u8().unwrap(), 4);
        assert!(r.read_u8().is_err());
    }

    #[test]
    fn short_read_is_an_error_not_a_panic() {
        let data = [1u8];
        let mut r = SliceReader::new(&data);
        let mut buf = [0u8; 4];
        assert!(r.read_exact(&mut buf).is_err());
    }
}
