use serde::{Deserialize, Serialize};

use super::{Frequency, MediaTime};

/// Reference RTP time and sequence number for time zero of a stream.
///
/// This is signaled out-of-band, typically in the RTSP `RTP-Info` header of
/// the PLAY response, and not taken from the first RTP packet seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamEpoch {
    /// RTP timestamp mapping to the start offset.
    pub rtp_time: u32,
    /// Sequence number of the first packet.
    pub seq_no: u16,
}

/// Maps 32 bit wrapping RTP timestamps to presentation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConverter {
    epoch: StreamEpoch,
    clock_rate: Frequency,
    start_offset_us: i64,
}

impl TimingConverter {
    /// Converter with time zero at `epoch`.
    pub fn new(epoch: StreamEpoch, clock_rate: Frequency) -> Self {
        TimingConverter {
            epoch,
            clock_rate,
            start_offset_us: 0,
        }
    }

    /// Make the epoch map to `start_offset_us` instead of zero.
    pub fn with_start_offset(mut self, start_offset_us: i64) -> Self {
        self.start_offset_us = start_offset_us;
        self
    }

    /// The epoch time zero is counted from.
    pub fn epoch(&self) -> StreamEpoch {
        self.epoch
    }

    /// RTP clock rate of the stream.
    pub fn clock_rate(&self) -> Frequency {
        self.clock_rate
    }

    /// Presentation time of the epoch.
    pub fn start_offset_us(&self) -> i64 {
        self.start_offset_us
    }

    /// Signed distance in RTP ticks from the epoch.
    ///
    /// The forward difference is taken modulo 2^32 and read as an `i32`, so
    /// a timestamp that wrapped past `u32::MAX` still counts as ahead, and
    /// one slightly before the epoch comes out negative.
    pub fn rtp_delta(&self, rtp_time: u32) -> i64 {
        rtp_time.wrapping_sub(self.epoch.rtp_time) as i32 as i64
    }

    /// Presentation time of `rtp_time` relative to the epoch.
    pub fn to_media_time(&self, rtp_time: u32) -> MediaTime {
        MediaTime::from_micros(self.to_time_us(rtp_time))
    }

    /// Presentation time in microseconds, truncated toward zero.
    ///
    /// Saturates at the bounds of `i64` for extreme start offsets.
    pub fn to_time_us(&self, rtp_time: u32) -> i64 {
        let delta = MediaTime::new(self.rtp_delta(rtp_time), self.clock_rate);
        self.start_offset_us.saturating_add(delta.as_micros())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn converter(rtp_time: u32, clock_rate: Frequency) -> TimingConverter {
        let epoch = StreamEpoch {
            rtp_time,
            seq_no: 40289,
        };
        TimingConverter::new(epoch, clock_rate)
    }

    #[test]
    fn epoch_is_zero() {
        let c = converter(2599168056, Frequency::NINETY_KHZ);
        assert_eq!(c.to_time_us(2599168056), 0);
    }

    #[test]
    fn ninety_khz_delta() {
        let c = converter(2599168056, Frequency::NINETY_KHZ);
        assert_eq!(c.to_time_us(2599168344), 3200);
    }

    #[test]
    fn forty_eight_khz_delta() {
        let c = converter(1000, Frequency::FORTY_EIGHT_KHZ);
        assert_eq!(c.to_time_us(1000 + 153_600), 3_200_000);
        assert_eq!(c.to_time_us(1000 + 48), 1000);
    }

    #[test]
    fn non_exact_division_truncates() {
        let c = converter(0, Frequency::NINETY_KHZ);
        // 1_000_000 / 90_000 = 11.1
        assert_eq!(c.to_time_us(1), 11);
        // 2 * 1_000_000 / 90_000 = 22.2
        assert_eq!(c.to_time_us(2), 22);
        // 8 * 1_000_000 / 90_000 = 88.8
        assert_eq!(c.to_time_us(8), 88);
    }

    #[test]
    fn wraps_around_u32() {
        let c = converter(u32::MAX - 44, Frequency::NINETY_KHZ);
        // 45 ticks to reach u32::MAX + 1, then 45 more.
        assert_eq!(c.rtp_delta(45), 90);
        assert_eq!(c.to_time_us(45), 1000);
    }

    #[test]
    fn before_epoch_is_negative() {
        let c = converter(10, Frequency::NINETY_KHZ);
        assert_eq!(c.rtp_delta(u32::MAX - 79), -90);
        assert_eq!(c.to_time_us(u32::MAX - 79), -1000);
    }

    #[test]
    fn start_offset_is_added() {
        let c = converter(500, Frequency::NINETY_KHZ).with_start_offset(5_000_000);
        assert_eq!(c.to_time_us(500), 5_000_000);
        assert_eq!(c.to_time_us(590), 5_001_000);
        assert_eq!(c.to_media_time(590).as_micros(), 5_001_000);
    }

    #[test]
    fn start_offset_saturates() {
        let c = converter(0, Frequency::NINETY_KHZ).with_start_offset(i64::MAX);
        assert_eq!(c.to_time_us(90), i64::MAX);
        assert_eq!(c.to_time_us(0), i64::MAX);

        let c = converter(90, Frequency::NINETY_KHZ).with_start_offset(i64::MIN);
        assert_eq!(c.to_time_us(0), i64::MIN);
        assert_eq!(c.to_media_time(0).as_micros(), i64::MIN);
    }

    #[test]
    fn conversion_is_deterministic() {
        let c = converter(123_456, Frequency::NINETY_KHZ);
        let a = c.to_time_us(987_654_321);
        let b = c.to_time_us(987_654_321);
        assert_eq!(a, b);
        assert_eq!(c, converter(123_456, Frequency::NINETY_KHZ));
    }
}
