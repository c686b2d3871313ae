//! Reassembly of VP9 frames from RTP packets.

use serde::{Deserialize, Serialize};

use crate::config::ReaderConfig;
use crate::format::PayloadFormat;
use crate::packet::Vp9Descriptor;
use crate::rtp::{Frequency, RtpPacket, StreamEpoch, TimingConverter};
use crate::sink::{Sample, SampleFlags, TrackHandle, TrackId, TrackSink};
use crate::ReaderError;

mod assembler;
use assembler::{Fragment, Frame, FrameAssembler};

/// The RTP clock of VP9, fixed by RFC 8585.
pub const VP9_CLOCK_RATE: Frequency = Frequency::NINETY_KHZ;

/// Counters of a [`Vp9Reader`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderStats {
    /// Packets handed to [`Vp9Reader::consume`] once the reader was ready.
    pub packets: u64,
    /// Packets that did not belong to any open frame.
    pub discarded: u64,
    /// Packets with a payload descriptor that failed to parse.
    pub malformed: u64,
    /// Samples written to the sink.
    pub samples: u64,
    /// Samples closed by the start of a later frame instead of a marker.
    pub superseded: u64,
}

/// Turns the RTP packets of one VP9 stream into frame samples.
///
/// The reader is sans-IO. The caller feeds it packets in arrival order and
/// completed frames are written to the [`TrackSink`] handed to
/// [`Vp9Reader::create_tracks`].
///
/// ```
/// use vp9_reader::format::PayloadFormat;
/// use vp9_reader::rtp::RtpPacket;
/// use vp9_reader::sink::MemorySink;
/// use vp9_reader::Vp9Reader;
///
/// let mut reader = Vp9Reader::new(PayloadFormat::vp9(98.into())).unwrap();
/// reader.create_tracks(MemorySink::new(), 0.into());
/// reader.on_receiving_first_packet(1000, 1);
///
/// reader.consume(RtpPacket::new(1000, 1, false, &[0x08, 1, 2])).unwrap();
/// reader.consume(RtpPacket::new(1000, 2, true, &[0x00, 3])).unwrap();
///
/// let sink = reader.into_sink().unwrap();
/// assert_eq!(sink.tracks()[0].samples[0].data, vec![1, 2, 3]);
/// ```
#[derive(Debug)]
pub struct Vp9Reader<S> {
    format: PayloadFormat,
    clock_rate: Frequency,
    start_offset_us: i64,
    timing: Option<TimingConverter>,
    track: Option<(S, TrackHandle)>,
    assembler: FrameAssembler,
    resolution_known: bool,
    stats: ReaderStats,
}

impl<S> Vp9Reader<S> {
    /// Create a reader with the default [`ReaderConfig`].
    pub fn new(format: PayloadFormat) -> Result<Self, ReaderError> {
        ReaderConfig::new().build(format)
    }

    pub(crate) fn new_with_config(config: ReaderConfig, format: PayloadFormat) -> Self {
        Vp9Reader {
            format,
            clock_rate: config.clock_rate(),
            start_offset_us: config.start_offset_us(),
            timing: None,
            track: None,
            assembler: FrameAssembler::new(),
            resolution_known: false,
            stats: ReaderStats::default(),
        }
    }

    /// The payload format, including any resolution discovered in-band.
    pub fn format(&self) -> &PayloadFormat {
        &self.format
    }

    /// The stream epoch, once set.
    pub fn epoch(&self) -> Option<StreamEpoch> {
        self.timing.map(|t| t.epoch())
    }

    /// Counters since creation.
    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    /// The sink given to [`Vp9Reader::create_tracks`].
    pub fn sink(&self) -> Option<&S> {
        self.track.as_ref().map(|(s, _)| s)
    }

    /// Mutable access to the sink.
    pub fn sink_mut(&mut self) -> Option<&mut S> {
        self.track.as_mut().map(|(s, _)| s)
    }

    /// Take the sink out, dropping the reader and any open frame.
    pub fn into_sink(self) -> Option<S> {
        self.track.map(|(s, _)| s)
    }

    /// Set the time zero of the stream.
    ///
    /// The values come from out-of-band signaling, such as RTSP `RTP-Info`,
    /// for the first packet that will be consumed. Only the first call has
    /// effect.
    pub fn on_receiving_first_packet(&mut self, rtp_time: u32, seq_no: u16) {
        if let Some(t) = &self.timing {
            warn!(
                "Stream epoch already set to {:?}, ignore {} {}",
                t.epoch(),
                rtp_time,
                seq_no
            );
            return;
        }

        let epoch = StreamEpoch { rtp_time, seq_no };
        debug!("Stream epoch {:?}", epoch);

        let timing = TimingConverter::new(epoch, self.clock_rate)
            .with_start_offset(self.start_offset_us);
        self.timing = Some(timing);
    }

    /// Restart timing after a seek.
    ///
    /// Drops the open frame, if any, without emitting it. The next frame is
    /// expected at `next_rtp_time` and is presented at `time_us`.
    pub fn seek(&mut self, next_rtp_time: u32, time_us: i64) {
        if self.assembler.open_rtp_time().is_some() {
            debug!("Drop open frame of {} bytes on seek", self.assembler.buffered());
        }
        self.assembler.reset();

        let seq_no = self.epoch().map(|e| e.seq_no).unwrap_or(0);
        let epoch = StreamEpoch {
            rtp_time: next_rtp_time,
            seq_no,
        };
        debug!("Seek to {} at {:?}", time_us, epoch);

        self.start_offset_us = time_us;
        let timing = TimingConverter::new(epoch, self.clock_rate).with_start_offset(time_us);
        self.timing = Some(timing);
    }
}

impl<S: TrackSink> Vp9Reader<S> {
    /// Register the stream's format with `sink` and keep the sink for
    /// output. Only the first call has effect.
    pub fn create_tracks(&mut self, mut sink: S, id: TrackId) {
        if self.track.is_some() {
            warn!("Track already created, ignore {}", id);
            return;
        }

        let handle = sink.register(id, &self.format);
        debug!("Registered track {} as {}", id, handle);
        self.track = Some((sink, handle));
    }

    /// Handle one RTP packet.
    ///
    /// Malformed payloads and packets that belong to no open frame are
    /// dropped without error. One packet can complete up to two samples.
    pub fn consume(&mut self, packet: RtpPacket<'_>) -> Result<(), ReaderError> {
        if self.timing.is_none() {
            return Err(ReaderError::UninitializedEpoch);
        }
        if self.track.is_none() {
            return Err(ReaderError::NoTrack);
        }

        self.stats.packets += 1;

        let desc = match Vp9Descriptor::parse(packet.payload) {
            Ok(v) => v,
            Err(e) => {
                debug!("Drop malformed packet {}: {}", packet.seq_no, e);
                self.stats.malformed += 1;
                return Ok(());
            }
        };

        let Some(data) = packet.payload.get(desc.header_len..) else {
            debug!("Drop packet {} with descriptor past end", packet.seq_no);
            self.stats.malformed += 1;
            return Ok(());
        };

        if desc.is_start() {
            self.discover_resolution(&desc);
        }

        let pushed = self.assembler.push(Fragment {
            rtp_time: packet.timestamp,
            is_start: desc.is_start(),
            marker: packet.marker,
            data,
        });

        if pushed.discarded {
            trace!("Discard packet {} of {}", packet.seq_no, packet.timestamp);
            self.stats.discarded += 1;
        }

        if let Some(frame) = pushed.superseded {
            self.stats.superseded += 1;
            self.emit(frame);
        }

        if let Some(frame) = pushed.completed {
            self.emit(frame);
        }

        Ok(())
    }

    /// Emit the open frame, if any, even though its last packet was not seen.
    ///
    /// Returns whether a sample was written.
    pub fn flush(&mut self) -> bool {
        if self.track.is_none() || self.timing.is_none() {
            return false;
        }

        match self.assembler.take() {
            Some(frame) => {
                debug!("Flush open frame {}", frame.rtp_time);
                self.emit(frame);
                true
            }
            None => false,
        }
    }

    fn discover_resolution(&mut self, desc: &Vp9Descriptor) {
        if self.resolution_known {
            return;
        }

        let Some((width, height)) = desc.resolution() else {
            return;
        };
        self.resolution_known = true;

        if self.format.resolution() == Some((width, height)) {
            return;
        }

        debug!("Resolution {}x{}", width, height);
        self.format.width = Some(width);
        self.format.height = Some(height);

        if let Some((sink, handle)) = &mut self.track {
            sink.format(*handle, &self.format);
        }
    }

    fn emit(&mut self, frame: Frame) {
        let (Some(timing), Some((sink, handle))) = (&self.timing, &mut self.track) else {
            return;
        };

        let sample = Sample {
            time_us: timing.to_time_us(frame.rtp_time),
            rtp_time: frame.rtp_time,
            data: frame.data,
            flags: SampleFlags::KEY,
        };

        trace!(
            "Emit sample {} at {}us, {} bytes",
            sample.rtp_time,
            sample.time_us,
            sample.data.len()
        );

        sink.write_sample(*handle, sample);
        self.stats.samples += 1;
    }
}
