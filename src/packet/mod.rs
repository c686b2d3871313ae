//! Codec payload descriptors.

mod error;
pub use error::PacketError;

mod vp9;
pub use vp9::{LayerIndices, Vp9Descriptor, MAX_SPATIAL_LAYERS};

/// Byte cursor over a payload. Provides get_u8 and get_u16 over some buffer
/// of bytes, tracking the offset.
pub(crate) trait BitRead {
    fn remaining(&self) -> usize;
    fn get_offset(&self) -> usize;
    fn get_u8(&mut self) -> Option<u8>;
    fn get_u16(&mut self) -> Option<u16>;
    fn consume(&mut self, bytes: usize) -> Option<()>;
}

impl BitRead for (&[u8], usize) {
    #[inline(always)]
    fn remaining(&self) -> usize {
        self.0.len().saturating_sub(self.1)
    }

    #[inline(always)]
    fn get_offset(&self) -> usize {
        self.1
    }

    #[inline(always)]
    fn get_u8(&mut self) -> Option<u8> {
        let n = *self.0.get(self.1)?;
        self.1 += 1;
        Some(n)
    }

    fn get_u16(&mut self) -> Option<u16> {
        if self.remaining() < 2 {
            return None;
        }
        Some(u16::from_be_bytes([self.get_u8()?, self.get_u8()?]))
    }

    fn consume(&mut self, bytes: usize) -> Option<()> {
        if self.remaining() < bytes {
            return None;
        }
        self.1 += bytes;
        Some(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn read_past_end() {
        let mut r = (&[0x01_u8, 0x02, 0x03][..], 0);
        assert_eq!(r.get_u16(), Some(0x0102));
        assert_eq!(r.get_offset(), 2);
        assert_eq!(r.get_u16(), None);
        assert_eq!(r.get_offset(), 2);
        assert_eq!(r.get_u8(), Some(0x03));
        assert_eq!(r.get_u8(), None);
        assert_eq!(r.consume(1), None);
        assert_eq!(r.remaining(), 0);
    }
}
