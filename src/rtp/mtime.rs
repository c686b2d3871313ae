#![allow(missing_docs)]

use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroU32;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Clock frequency of a media time base, in Hz.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Frequency(NonZeroU32);

impl Frequency {
    /// Microsecond resolution.
    pub const MICROS: Frequency = Frequency::new_const(1_000_000);

    /// 48kHz, typical for audio and used by some RTSP servers for video.
    pub const FORTY_EIGHT_KHZ: Frequency = Frequency::new_const(48_000);

    /// 90kHz, the RTP clock of all video payload formats.
    pub const NINETY_KHZ: Frequency = Frequency::new_const(90_000);

    const fn new_const(hz: u32) -> Frequency {
        match NonZeroU32::new(hz) {
            Some(v) => Frequency(v),
            None => panic!("Frequency must be non-zero"),
        }
    }

    /// Create a frequency from Hz. `None` for 0.
    pub const fn from_hz(hz: u32) -> Option<Frequency> {
        match NonZeroU32::new(hz) {
            Some(v) => Some(Frequency(v)),
            None => None,
        }
    }

    /// The frequency in Hz.
    #[inline(always)]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.0)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Frequency {
    type Error = &'static str;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        Frequency::from_hz(hz).ok_or("frequency must be non-zero")
    }
}

impl From<Frequency> for u32 {
    fn from(v: Frequency) -> Self {
        v.get()
    }
}

/// Media time represented by a numerator / frequency.
///
/// The numerator is typically an RTP time offset. The frequency is the clock
/// rate of the media source (90kHz for video).
#[derive(Debug, Clone, Copy)]
pub struct MediaTime(i64, Frequency);

impl MediaTime {
    pub const fn new(numer: i64, frequency: Frequency) -> MediaTime {
        MediaTime(numer, frequency)
    }

    #[inline(always)]
    pub const fn numer(&self) -> i64 {
        self.0
    }

    #[inline(always)]
    pub const fn frequency(&self) -> Frequency {
        self.1
    }

    #[inline(always)]
    pub const fn from_micros(v: i64) -> MediaTime {
        MediaTime(v, Frequency::MICROS)
    }

    /// Microseconds, truncated toward zero.
    pub const fn as_micros(&self) -> i64 {
        self.rebase(Frequency::MICROS).numer()
    }

    /// Convert to another frequency. Integer division, truncating toward zero.
    #[inline(always)]
    pub const fn rebase(self, frequency: Frequency) -> MediaTime {
        if frequency.get() == self.1.get() {
            self
        } else {
            let numer = self.0 as i128 * frequency.get() as i128 / self.1.get() as i128;
            MediaTime::new(numer as i64, frequency)
        }
    }

    #[inline(always)]
    fn same_base(t0: MediaTime, t1: MediaTime) -> (MediaTime, MediaTime) {
        let max = t0.1.max(t1.1);
        (t0.rebase(max), t1.rebase(max))
    }
}

impl PartialEq for MediaTime {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        let (t0, t1) = MediaTime::same_base(*self, *other);
        t0.0 == t1.0
    }
}
impl Eq for MediaTime {}

impl PartialOrd for MediaTime {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MediaTime {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        let (t0, t1) = MediaTime::same_base(*self, *other);
        t0.0.cmp(&t1.0)
    }
}

impl Sub for MediaTime {
    type Output = MediaTime;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        let (t0, t1) = MediaTime::same_base(self, rhs);
        MediaTime::new(t0.0 - t1.0, t0.1)
    }
}

impl Add for MediaTime {
    type Output = MediaTime;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        let (t0, t1) = MediaTime::same_base(self, rhs);
        MediaTime::new(t0.0 + t1.0, t0.1)
    }
}
