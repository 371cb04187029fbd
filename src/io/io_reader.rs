use std::io;

use crate::error::DecodeError;

use super::{private, Read};

/// A [`Read`] adapter over any [`std::io::Read`].
#[derive(Debug)]
pub struct IoReader<R> {
    inner: R,
}

impl<R: io::Read> IoReader<R> {
    /// Wrap an `io::Read` for sequential reading.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: io::Read> private::Sealed for IoReader<R> {}

impl<R: io::Read> Read for IoReader<R> {
    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DecodeError> {
        self.inner.read_exact(buf).map_err(|err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                DecodeError::Parse("unexpected end of stream".to_string())
            } else {
                DecodeError::Io(err)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_through_a_cursor() {
        let data = vec![1u8, 2, 3, 4];
        let mut r = IoReader::new(io::Cursor::new(data));
        assert_eq!(r.read_u8().unwrap(), 1);
        let bytes = r.read_vec(3).unwrap();
        assert_eq!(bytes, vec![2, 3, 4]);
        assert!(r.read_u8().is_err());
    }
}
