//! Media formats and parameters

use combine::error::StringStreamError;
use thiserror::Error;

use crate::rtp::Pt;

mod codec;
mod format_params;
mod parser;

pub use codec::{Codec, PayloadFormat};
pub use format_params::FormatParams;

/// Errors building a [`PayloadFormat`] from SDP attributes.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The attribute value could not be parsed.
    #[error("format parse: {0}")]
    Parse(#[from] StringStreamError),

    /// Clock rate of 0.
    #[error("Invalid clock rate: {0}")]
    InvalidClockRate(u32),

    /// The fmtp line is for another payload type than the rtpmap.
    #[error("fmtp PT {fmtp} does not match rtpmap PT {rtpmap}")]
    PtMismatch {
        /// PT of the rtpmap.
        rtpmap: Pt,
        /// PT of the fmtp.
        fmtp: Pt,
    },
}
