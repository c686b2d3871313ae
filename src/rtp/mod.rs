//! RTP level types shared by the reader.

mod id;
pub use id::Pt;

mod mtime;
pub use mtime::{Frequency, MediaTime};

mod timing;
pub use timing::{StreamEpoch, TimingConverter};

/// The parts of a received RTP packet the reader needs.
///
/// Header parsing happens upstream. The payload borrows the caller's buffer
/// and starts with the codec payload descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtpPacket<'a> {
    /// RTP timestamp.
    pub timestamp: u32,
    /// RTP sequence number.
    pub seq_no: u16,
    /// Marker bit. For video the last packet of a frame.
    pub marker: bool,
    /// Payload, including the payload descriptor.
    pub payload: &'a [u8],
}

impl<'a> RtpPacket<'a> {
    /// Create from already parsed header fields.
    pub fn new(timestamp: u32, seq_no: u16, marker: bool, payload: &'a [u8]) -> Self {
        RtpPacket {
            timestamp,
            seq_no,
            marker,
            payload,
        }
    }
}
