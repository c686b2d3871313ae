use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Known VP9 format parameters ([RFC 8585 section 6][1]).
///
/// Values that fail to parse are treated as absent.
///
/// [1]: https://www.rfc-editor.org/rfc/rfc8585#section-6
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormatParams {
    /// VP9 profile id.
    ///
    /// * 0 - 8 bit 4:2:0
    /// * 1 - 8 bit 4:2:2, 4:4:0 and 4:4:4
    /// * 2 - 10 or 12 bit 4:2:0
    /// * 3 - 10 or 12 bit 4:2:2, 4:4:0 and 4:4:4
    pub profile_id: Option<u8>,

    /// Maximum frame rate in frames per second.
    pub max_fr: Option<u32>,

    /// Maximum frame size in macroblocks.
    pub max_fs: Option<u32>,
}

impl FormatParams {
    /// Pick out the known parameters from key/values.
    pub fn from_params(params: &BTreeMap<String, String>) -> Self {
        let mut p = FormatParams::default();

        for (k, v) in params {
            let v = v.trim();
            match k.as_str() {
                "profile-id" => p.profile_id = v.parse().ok(),
                "max-fr" => p.max_fr = v.parse().ok(),
                "max-fs" => p.max_fs = v.parse().ok(),
                _ => trace!("Ignore format param: {}={}", k, v),
            }
        }

        p
    }
}
