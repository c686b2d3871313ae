//! Reader configuration.

use serde::{Deserialize, Serialize};

use crate::format::{Codec, PayloadFormat};
use crate::reader::{Vp9Reader, VP9_CLOCK_RATE};
use crate::rtp::Frequency;
use crate::ReaderError;

/// Customized config for creating a [`Vp9Reader`] instance.
///
/// ```
/// use vp9_reader::format::PayloadFormat;
/// use vp9_reader::sink::MemorySink;
/// use vp9_reader::{ReaderConfig, Vp9Reader};
///
/// let reader: Vp9Reader<MemorySink> = ReaderConfig::new()
///     .set_start_offset_us(1_000_000)
///     .build(PayloadFormat::vp9(98.into()))
///     .unwrap();
/// ```
///
/// Configs implement [`Clone`] to help create multiple readers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    clock_rate: Option<Frequency>,
    start_offset_us: i64,
}

impl ReaderConfig {
    /// Creates a new default config.
    pub fn new() -> Self {
        ReaderConfig::default()
    }

    /// Override the media clock used for timestamp conversion.
    ///
    /// VP9 over RTP always runs a 90kHz clock, whatever rate the payload
    /// format declares. Only set this for senders that do otherwise.
    ///
    /// ```
    /// # use vp9_reader::ReaderConfig;
    /// # use vp9_reader::rtp::Frequency;
    /// let config = ReaderConfig::new().set_clock_rate(Some(Frequency::FORTY_EIGHT_KHZ));
    ///
    /// assert_eq!(config.clock_rate(), Frequency::FORTY_EIGHT_KHZ);
    /// ```
    pub fn set_clock_rate(mut self, clock_rate: Option<Frequency>) -> Self {
        self.clock_rate = clock_rate;
        self
    }

    /// The clock used for timestamp conversion.
    ///
    /// Defaults to [`VP9_CLOCK_RATE`].
    pub fn clock_rate(&self) -> Frequency {
        self.clock_rate.unwrap_or(VP9_CLOCK_RATE)
    }

    /// Presentation time, in microseconds, of the stream epoch.
    ///
    /// Defaults to 0.
    pub fn set_start_offset_us(mut self, start_offset_us: i64) -> Self {
        self.start_offset_us = start_offset_us;
        self
    }

    /// The presentation time of the stream epoch.
    pub fn start_offset_us(&self) -> i64 {
        self.start_offset_us
    }

    /// Create a [`Vp9Reader`] for a negotiated payload format.
    ///
    /// Fails with [`ReaderError::UnsupportedCodec`] unless the format is VP9.
    pub fn build<S>(self, format: PayloadFormat) -> Result<Vp9Reader<S>, ReaderError> {
        if format.codec != Codec::Vp9 {
            return Err(ReaderError::UnsupportedCodec(format.codec));
        }

        Ok(Vp9Reader::new_with_config(self, format))
    }
}
