//! Downstream output of completed samples.

use std::ops::BitOr;

use crate::format::PayloadFormat;

num_id!(
    /// Caller chosen id of a track.
    TrackId,
    u32
);

num_id!(
    /// Handle a [`TrackSink`] gives out for a registered track.
    TrackHandle,
    usize
);

/// Flags of an emitted sample.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleFlags(u8);

impl SampleFlags {
    /// No flags.
    pub const NONE: SampleFlags = SampleFlags(0);

    /// The sample is decodable without earlier samples.
    pub const KEY: SampleFlags = SampleFlags(1);

    /// Whether [`SampleFlags::KEY`] is set.
    pub fn is_key(&self) -> bool {
        self.0 & Self::KEY.0 != 0
    }
}

impl BitOr for SampleFlags {
    type Output = SampleFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        SampleFlags(self.0 | rhs.0)
    }
}

/// A complete access unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Frame data with all payload descriptors stripped.
    pub data: Vec<u8>,
    /// Presentation time in microseconds.
    pub time_us: i64,
    /// The RTP timestamp shared by all packets of the frame.
    pub rtp_time: u32,
    /// Sample flags.
    pub flags: SampleFlags,
}

/// Receiver of formats and samples, typically a demuxer output.
///
/// A sink is append-only and accepts every well-formed sample.
pub trait TrackSink {
    /// Declare a new track and its format.
    fn register(&mut self, id: TrackId, format: &PayloadFormat) -> TrackHandle;

    /// The format of a registered track changed.
    fn format(&mut self, track: TrackHandle, format: &PayloadFormat);

    /// Append a sample to a track.
    fn write_sample(&mut self, track: TrackHandle, sample: Sample);
}

impl<T: TrackSink + ?Sized> TrackSink for &mut T {
    fn register(&mut self, id: TrackId, format: &PayloadFormat) -> TrackHandle {
        (**self).register(id, format)
    }

    fn format(&mut self, track: TrackHandle, format: &PayloadFormat) {
        (**self).format(track, format)
    }

    fn write_sample(&mut self, track: TrackHandle, sample: Sample) {
        (**self).write_sample(track, sample)
    }
}

/// Collects everything written to it in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    tracks: Vec<MemoryTrack>,
}

/// One track of a [`MemorySink`].
#[derive(Debug, Clone)]
pub struct MemoryTrack {
    /// Id the track was registered with.
    pub id: TrackId,
    /// Current format.
    pub format: PayloadFormat,
    /// Number of format changes after registration.
    pub format_changes: usize,
    /// Samples in the order written.
    pub samples: Vec<Sample>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// All registered tracks.
    pub fn tracks(&self) -> &[MemoryTrack] {
        &self.tracks
    }

    /// Track registered under `id`.
    pub fn track(&self, id: TrackId) -> Option<&MemoryTrack> {
        self.tracks.iter().find(|t| t.id == id)
    }
}

impl TrackSink for MemorySink {
    fn register(&mut self, id: TrackId, format: &PayloadFormat) -> TrackHandle {
        self.tracks.push(MemoryTrack {
            id,
            format: format.clone(),
            format_changes: 0,
            samples: vec![],
        });
        (self.tracks.len() - 1).into()
    }

    fn format(&mut self, track: TrackHandle, format: &PayloadFormat) {
        if let Some(t) = self.tracks.get_mut(*track) {
            t.format = format.clone();
            t.format_changes += 1;
        }
    }

    fn write_sample(&mut self, track: TrackHandle, sample: Sample) {
        if let Some(t) = self.tracks.get_mut(*track) {
            t.samples.push(sample);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn flags() {
        assert!(SampleFlags::KEY.is_key());
        assert!(!SampleFlags::NONE.is_key());
        assert!((SampleFlags::NONE | SampleFlags::KEY).is_key());
    }

    #[test]
    fn memory_sink_collects() {
        let mut sink = MemorySink::new();
        let format = PayloadFormat::vp9(98.into());

        let h = sink.register(7.into(), &format);
        sink.write_sample(
            h,
            Sample {
                data: vec![1, 2, 3],
                time_us: 0,
                rtp_time: 10,
                flags: SampleFlags::KEY,
            },
        );
        sink.format(h, &format.clone().with_resolution(640, 360));

        let t = sink.track(7.into()).unwrap();
        assert_eq!(t.samples.len(), 1);
        assert_eq!(t.samples[0].data, vec![1, 2, 3]);
        assert_eq!(t.format_changes, 1);
        assert_eq!(t.format.resolution(), Some((640, 360)));
        assert!(sink.track(8.into()).is_none());
    }
}
