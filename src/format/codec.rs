use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::rtp::{Frequency, Pt};

use super::format_params::FormatParams;
use super::parser::{fmtp, rtpmap};
use super::FormatError;
use combine::Parser;

/// Known video codecs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum Codec {
    H264,
    H265,
    Vp8,
    Vp9,
    Av1,
    #[doc(hidden)]
    Unknown,
}

impl Codec {
    /// MIME type a track sink would register the codec as.
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            Codec::H264 => Some("video/avc"),
            Codec::H265 => Some("video/hevc"),
            Codec::Vp8 => Some("video/x-vnd.on2.vp8"),
            Codec::Vp9 => Some("video/x-vnd.on2.vp9"),
            Codec::Av1 => Some("video/av01"),
            Codec::Unknown => None,
        }
    }
}

impl<'a> From<&'a str> for Codec {
    fn from(v: &'a str) -> Self {
        let lc = v.to_ascii_lowercase();
        match &lc[..] {
            "h264" => Codec::H264,
            "h265" => Codec::H265,
            "vp8" => Codec::Vp8,
            "vp9" => Codec::Vp9,
            "av1" => Codec::Av1,
            _ => Codec::Unknown,
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::H264 => write!(f, "H264"),
            Codec::H265 => write!(f, "H265"),
            Codec::Vp8 => write!(f, "VP8"),
            Codec::Vp9 => write!(f, "VP9"),
            Codec::Av1 => write!(f, "AV1"),
            Codec::Unknown => write!(f, "unknown"),
        }
    }
}

/// Negotiated RTP payload format of a stream.
///
/// Constructed from session negotiation and read-only to the reader, except
/// for the resolution which the reader fills in once it is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadFormat {
    /// The codec carried.
    pub codec: Codec,

    /// RTP payload type number.
    pub pt: Pt,

    /// Clock rate declared for the payload type.
    pub clock_rate: Frequency,

    /// Format parameters (`a=fmtp`) as key/value.
    pub params: BTreeMap<String, String>,

    /// Frame width, when known.
    pub width: Option<u16>,

    /// Frame height, when known.
    pub height: Option<u16>,
}

impl PayloadFormat {
    /// Create a format without parameters.
    pub fn new(codec: Codec, pt: Pt, clock_rate: Frequency) -> Self {
        PayloadFormat {
            codec,
            pt,
            clock_rate,
            params: BTreeMap::new(),
            width: None,
            height: None,
        }
    }

    /// VP9 at the 90kHz RTP clock.
    pub fn vp9(pt: Pt) -> Self {
        PayloadFormat::new(Codec::Vp9, pt, Frequency::NINETY_KHZ)
    }

    /// Add a format parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set the resolution.
    pub fn with_resolution(mut self, width: u16, height: u16) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// The resolution, if both width and height are known.
    pub fn resolution(&self) -> Option<(u16, u16)> {
        Some((self.width?, self.height?))
    }

    /// MIME type of the codec.
    pub fn mime_type(&self) -> Option<&'static str> {
        self.codec.mime_type()
    }

    /// Typed view of the known format parameters.
    pub fn format_params(&self) -> FormatParams {
        FormatParams::from_params(&self.params)
    }

    /// Build a format from SDP attribute values.
    ///
    /// `rtpmap` is like `98 VP9/90000` and `fmtp` like `98 profile-id=0`, with
    /// or without the leading `a=rtpmap:`/`a=fmtp:`.
    ///
    /// ```
    /// # use vp9_reader::format::{Codec, PayloadFormat};
    /// let format =
    ///     PayloadFormat::from_sdp("a=rtpmap:98 VP9/90000", Some("98 profile-id=2")).unwrap();
    /// assert_eq!(format.codec, Codec::Vp9);
    /// assert_eq!(format.format_params().profile_id, Some(2));
    /// ```
    pub fn from_sdp(rtpmap_value: &str, fmtp_value: Option<&str>) -> Result<Self, FormatError> {
        let (map, _) = rtpmap().parse(rtpmap_value)?;

        let clock_rate = Frequency::from_hz(map.clock_rate)
            .ok_or(FormatError::InvalidClockRate(map.clock_rate))?;

        let mut format = PayloadFormat::new(map.encoding.as_str().into(), map.pt, clock_rate);

        if let Some(fmtp_value) = fmtp_value {
            let (f, _) = fmtp().parse(fmtp_value)?;

            if f.pt != map.pt {
                return Err(FormatError::PtMismatch {
                    rtpmap: map.pt,
                    fmtp: f.pt,
                });
            }

            format.params.extend(f.params);
        }

        Ok(format)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn codec_from_encoding_name() {
        assert_eq!(Codec::from("VP9"), Codec::Vp9);
        assert_eq!(Codec::from("vp9"), Codec::Vp9);
        assert_eq!(Codec::from("opus"), Codec::Unknown);
        assert_eq!(Codec::Vp9.to_string(), "VP9");
    }

    #[test]
    fn from_sdp_vp9() {
        let f = PayloadFormat::from_sdp("98 VP9/90000", Some("a=fmtp:98 profile-id=0;max-fr=30"))
            .unwrap();
        assert_eq!(f.codec, Codec::Vp9);
        assert_eq!(f.pt, 98.into());
        assert_eq!(f.clock_rate, Frequency::NINETY_KHZ);
        assert_eq!(f.params.get("max-fr").map(String::as_str), Some("30"));
        assert_eq!(f.mime_type(), Some("video/x-vnd.on2.vp9"));
    }

    #[test]
    fn from_sdp_fmtp_trailing_space() {
        let f = PayloadFormat::from_sdp("98 VP9/90000", Some("98 profile-id=0; ")).unwrap();
        assert_eq!(f.params.get("profile-id").map(String::as_str), Some("0"));
        assert_eq!(f.params.len(), 1);
    }

    #[test]
    fn from_sdp_zero_clock() {
        let err = PayloadFormat::from_sdp("98 VP9/0", None).unwrap_err();
        assert!(matches!(err, FormatError::InvalidClockRate(0)));
    }

    #[test]
    fn from_sdp_pt_mismatch() {
        let err = PayloadFormat::from_sdp("98 VP9/90000", Some("99 profile-id=0")).unwrap_err();
        assert!(matches!(err, FormatError::PtMismatch { .. }));
    }

    #[test]
    fn from_sdp_garbage() {
        let err = PayloadFormat::from_sdp("VP9", None).unwrap_err();
        assert!(matches!(err, FormatError::Parse(_)));
    }

    #[test]
    fn serde_round_trip() {
        let f = PayloadFormat::vp9(98.into())
            .with_param("profile-id", "0")
            .with_resolution(1280, 720);
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains("\"clock_rate\":90000"));
        let back: PayloadFormat = serde_json::from_str(&json).unwrap();
        assert_eq!(f, back);
    }
}
