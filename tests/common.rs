#![allow(unused)]
use std::sync::Once;

use vp9_reader::format::{Codec, PayloadFormat};
use vp9_reader::rtp::{Frequency, RtpPacket};
use vp9_reader::sink::{MemorySink, MemoryTrack};
use vp9_reader::{ReaderError, Vp9Reader};

pub const TRACK: u32 = 1;

pub const T1: u32 = 2599168056;
pub const T2: u32 = 2599168344;

/// A packet as captured, owning its payload.
#[derive(Debug, Clone)]
pub struct TestPacket {
    pub timestamp: u32,
    pub seq_no: u16,
    pub marker: bool,
    pub payload: Vec<u8>,
}

impl TestPacket {
    pub fn new(timestamp: u32, seq_no: u16, marker: bool, payload: &[u8]) -> Self {
        TestPacket {
            timestamp,
            seq_no,
            marker,
            payload: payload.to_vec(),
        }
    }

    pub fn as_rtp(&self) -> RtpPacket<'_> {
        RtpPacket::new(self.timestamp, self.seq_no, self.marker, &self.payload)
    }
}

// Two frames of two packets each. The first packet of a frame has the start
// of frame bit in the descriptor, the last has the RTP marker.
pub fn frame1_fragment1() -> TestPacket {
    TestPacket::new(
        T1,
        40289,
        false,
        &[
            0x08, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A,
        ],
    )
}

pub fn frame1_fragment2() -> TestPacket {
    TestPacket::new(T1, 40290, true, &[0x00, 0x0B, 0x0C, 0x0D, 0x0E])
}

pub fn frame2_fragment1() -> TestPacket {
    TestPacket::new(
        T2,
        40291,
        false,
        &[
            0x08, 0x0D, 0x0C, 0x0B, 0x0A, 0x09, 0x08, 0x07, 0x06, 0x05, 0x04,
        ],
    )
}

pub fn frame2_fragment2() -> TestPacket {
    TestPacket::new(T2, 40292, true, &[0x00, 0x03, 0x02, 0x01, 0x00])
}

pub fn frame1_data() -> Vec<u8> {
    (0x00..=0x0E).collect()
}

pub fn frame2_data() -> Vec<u8> {
    vec![
        0x0D, 0x0C, 0x0B, 0x0A, 0x09, 0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, 0x00,
    ]
}

/// The format as negotiated by a typical RTSP server, declaring a clock rate
/// that VP9 does not use.
pub fn declared_format() -> PayloadFormat {
    PayloadFormat::new(Codec::Vp9, 98.into(), Frequency::FORTY_EIGHT_KHZ)
}

/// Reader with a track created and the epoch at the first packet of frame 1.
pub fn primed_reader() -> Vp9Reader<MemorySink> {
    let mut reader = Vp9Reader::new(declared_format()).expect("VP9 reader");
    reader.create_tracks(MemorySink::new(), TRACK.into());
    let first = frame1_fragment1();
    reader.on_receiving_first_packet(first.timestamp, first.seq_no);
    reader
}

pub fn consume_all(
    reader: &mut Vp9Reader<MemorySink>,
    packets: &[TestPacket],
) -> Result<(), ReaderError> {
    for p in packets {
        reader.consume(p.as_rtp())?;
    }
    Ok(())
}

pub fn track(reader: &Vp9Reader<MemorySink>) -> &MemoryTrack {
    reader
        .sink()
        .and_then(|s| s.track(TRACK.into()))
        .expect("registered track")
}

pub fn init_log() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    static START: Once = Once::new();

    START.call_once(|| {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(env_filter)
            .init();
    });
}
