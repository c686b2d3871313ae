//! Sans I/O reassembly of VP9 video frames from RTP packets.
//!
//! A [`Vp9Reader`] takes the RTP packets of one VP9 stream, as received from
//! an RTSP/RTP session, strips the VP9 payload descriptors (RFC 8585) and
//! writes each complete frame as a [`Sample`][sink::Sample] with a
//! presentation time in microseconds to a [`TrackSink`][sink::TrackSink].
//!
//! The reader does no network talking and has no internal threads or timers.
//! All operations happen from calls of the public API.
//!
//! # Usage
//!
//! ```
//! use vp9_reader::format::PayloadFormat;
//! use vp9_reader::rtp::RtpPacket;
//! use vp9_reader::sink::MemorySink;
//! use vp9_reader::Vp9Reader;
//!
//! // From the session negotiation.
//! let format = PayloadFormat::from_sdp("a=rtpmap:98 VP9/90000", None).unwrap();
//!
//! let mut reader = Vp9Reader::new(format).unwrap();
//! reader.create_tracks(MemorySink::new(), 0.into());
//!
//! // From RTP-Info of the RTSP PLAY response.
//! reader.on_receiving_first_packet(2599168056, 40289);
//!
//! // Two packets, the first with the start of frame bit set in the
//! // descriptor, the second with the RTP marker.
//! let packets: [(u32, u16, bool, &[u8]); 2] = [
//!     (2599168056, 40289, false, &[0x08, 0x00, 0x01, 0x02]),
//!     (2599168056, 40290, true, &[0x00, 0x03, 0x04]),
//! ];
//!
//! for (ts, seq, marker, payload) in packets {
//!     reader.consume(RtpPacket::new(ts, seq, marker, payload)).unwrap();
//! }
//!
//! let sink = reader.sink().unwrap();
//! let sample = &sink.tracks()[0].samples[0];
//! assert_eq!(sample.data, vec![0, 1, 2, 3, 4]);
//! assert_eq!(sample.time_us, 0);
//! ```
//!
//! # Frame boundaries
//!
//! A frame is every packet sharing one RTP timestamp, starting at a packet
//! whose descriptor has the start of frame bit. It is complete at the RTP
//! marker bit, or when a packet starts a frame with another timestamp. Packets
//! that arrive without an open frame for their timestamp are dropped, which
//! means a lost first packet loses the whole frame.
//!
//! # Timing
//!
//! Time zero is the RTP timestamp given to
//! [`Vp9Reader::on_receiving_first_packet`]. Timestamps are read modulo 2^32
//! as signed 32 bit distances from it and converted at the 90kHz VP9 clock,
//! truncating toward zero.
//!
//! # Logging
//!
//! The crate logs through [`tracing`](https://docs.rs/tracing). It installs
//! no subscriber.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

use thiserror::Error;

#[macro_use]
mod macros;

pub mod config;
pub mod format;
pub mod packet;
pub mod reader;
pub mod rtp;
pub mod sink;

pub use config::ReaderConfig;
pub use reader::{ReaderStats, Vp9Reader, VP9_CLOCK_RATE};

use format::Codec;

/// Errors returned by the reader.
///
/// Malformed packets are not errors. They are dropped and counted in
/// [`ReaderStats::malformed`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReaderError {
    /// A packet was consumed before [`Vp9Reader::on_receiving_first_packet`].
    #[error("Stream epoch is not set")]
    UninitializedEpoch,

    /// A packet was consumed before [`Vp9Reader::create_tracks`].
    #[error("No track created")]
    NoTrack,

    /// The payload format is not VP9.
    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(Codec),
}

/// Errors for all parts of the crate.
pub mod error {
    pub use crate::format::FormatError;
    pub use crate::packet::PacketError;
    pub use crate::ReaderError;
}
