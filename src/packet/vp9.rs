use super::{BitRead, PacketError};

/// Max number of spatial layers described by a scalability structure.
pub const MAX_SPATIAL_LAYERS: usize = 3;

/// Max number of reference indices in flexible mode.
const MAX_VP9_REF_PICS: usize = 3;

/// Decoded VP9 RTP payload descriptor ([RFC 8585 section 4.2][1]).
///
/// ```text
///        0 1 2 3 4 5 6 7
///       +-+-+-+-+-+-+-+-+
///       |I|P|L|F|B|E|V|Z| (REQUIRED)
///       +-+-+-+-+-+-+-+-+
///  I:   |M| PICTURE ID  | (RECOMMENDED)
///       +-+-+-+-+-+-+-+-+
///  M:   | EXTENDED PID  | (RECOMMENDED)
///       +-+-+-+-+-+-+-+-+
///  L:   | tid |U| SID |D| (CONDITIONALLY RECOMMENDED)
///       +-+-+-+-+-+-+-+-+
///       |   tl0picidx   | (CONDITIONALLY REQUIRED, F=0 only)
///       +-+-+-+-+-+-+-+-+                             -\
///  P,F: | P_DIFF      |N| (CONDITIONALLY REQUIRED)    - up to 3 times
///       +-+-+-+-+-+-+-+-+                             -/
///  V:   | SS            |
///       | ..            |
///       +-+-+-+-+-+-+-+-+
/// ```
///
/// Only the B bit and the length of the descriptor drive frame assembly.
/// The optional fields are decoded because they have to be walked anyway.
///
/// [1]: https://www.rfc-editor.org/rfc/rfc8585#section-4.2
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Vp9Descriptor {
    /// P: inter-picture predicted frame.
    pub inter_predicted: bool,
    /// F: flexible mode.
    pub flexible: bool,
    /// B: start of a VP9 frame.
    pub start_of_frame: bool,
    /// E: end of a VP9 frame.
    pub end_of_frame: bool,
    /// Z: not a reference frame for upper spatial layers.
    pub not_upper_reference: bool,

    /// 7 or 15 bit picture ID, when I is set.
    pub picture_id: Option<u16>,

    /// Layer indices, when L is set.
    pub layers: Option<LayerIndices>,

    /// Reference indices (F=1, P=1).
    pub p_diff: Vec<u8>,

    /// Number of spatial layers from the scalability structure, when V is set.
    pub spatial_layers: Option<u8>,
    /// Frame width per spatial layer, from the scalability structure.
    pub width: [Option<u16>; MAX_SPATIAL_LAYERS],
    /// Frame height per spatial layer, from the scalability structure.
    pub height: [Option<u16>; MAX_SPATIAL_LAYERS],

    /// Number of descriptor bytes. Frame data starts at this offset.
    pub header_len: usize,
}

/// Layer indices of the descriptor.
///
/// ```text
///      +-+-+-+-+-+-+-+-+
/// L:   |  T  |U|  S  |D|
///      +-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LayerIndices {
    /// Temporal layer id.
    pub tid: u8,
    /// Switching up point.
    pub switching_up: bool,
    /// Spatial layer id.
    pub sid: u8,
    /// Inter-layer dependency used.
    pub inter_layer: bool,
    /// Temporal layer zero index. Only present in non-flexible mode.
    pub tl0_pic_idx: Option<u8>,
}

impl Vp9Descriptor {
    /// Parse the descriptor at the start of an RTP payload.
    pub fn parse(payload: &[u8]) -> Result<Vp9Descriptor, PacketError> {
        let mut reader = (payload, 0);
        let b = reader.get_u8().ok_or(PacketError::ShortPacket)?;

        let i = b & 0x80 != 0;
        let l = b & 0x20 != 0;
        let v = b & 0x02 != 0;

        let mut desc = Vp9Descriptor {
            inter_predicted: b & 0x40 != 0,
            flexible: b & 0x10 != 0,
            start_of_frame: b & 0x08 != 0,
            end_of_frame: b & 0x04 != 0,
            not_upper_reference: b & 0x01 != 0,
            ..Default::default()
        };

        if i {
            desc.parse_picture_id(&mut reader)?;
        }

        if l {
            desc.parse_layer_indices(&mut reader)?;
        }

        if desc.flexible && desc.inter_predicted {
            desc.parse_ref_indices(&mut reader)?;
        }

        if v {
            desc.parse_scalability_structure(&mut reader)?;
        }

        desc.header_len = reader.get_offset();

        Ok(desc)
    }

    /// Whether this payload begins a new VP9 frame.
    pub fn is_start(&self) -> bool {
        self.start_of_frame
    }

    /// The resolution of the highest spatial layer carried in the
    /// scalability structure, if any.
    pub fn resolution(&self) -> Option<(u16, u16)> {
        self.width
            .iter()
            .zip(self.height.iter())
            .rev()
            .find_map(|(w, h)| Some(((*w)?, (*h)?)))
    }

    // Picture ID:
    //
    //      +-+-+-+-+-+-+-+-+
    // I:   |M| PICTURE ID  |   M:0 => picture id is 7 bits.
    //      +-+-+-+-+-+-+-+-+   M:1 => picture id is 15 bits.
    // M:   | EXTENDED PID  |
    //      +-+-+-+-+-+-+-+-+
    //
    fn parse_picture_id(&mut self, reader: &mut dyn BitRead) -> Result<(), PacketError> {
        let b = reader.get_u8().ok_or(PacketError::ShortPacket)?;

        let pid = if b & 0x80 != 0 {
            let x = reader.get_u8().ok_or(PacketError::ShortPacket)?;
            (((b & 0x7f) as u16) << 8) | x as u16
        } else {
            (b & 0x7f) as u16
        };

        self.picture_id = Some(pid);

        Ok(())
    }

    // Layer indices, followed by TL0PICIDX in non-flexible mode.
    //
    //      +-+-+-+-+-+-+-+-+
    // L:   |  T  |U|  S  |D|
    //      +-+-+-+-+-+-+-+-+
    //      |   tl0picidx   |  (F=0)
    //      +-+-+-+-+-+-+-+-+
    //
    fn parse_layer_indices(&mut self, reader: &mut dyn BitRead) -> Result<(), PacketError> {
        let b = reader.get_u8().ok_or(PacketError::ShortPacket)?;

        let mut layers = LayerIndices {
            tid: b >> 5,
            switching_up: b & 0x10 != 0,
            sid: (b >> 1) & 0x7,
            inter_layer: b & 0x01 != 0,
            tl0_pic_idx: None,
        };

        if layers.sid as usize >= MAX_SPATIAL_LAYERS {
            return Err(PacketError::TooManySpatialLayers);
        }

        if !self.flexible {
            layers.tl0_pic_idx = Some(reader.get_u8().ok_or(PacketError::ShortPacket)?);
        }

        self.layers = Some(layers);

        Ok(())
    }

    // Reference indices:
    //
    //      +-+-+-+-+-+-+-+-+                P=1,F=1: At least one reference index
    // P,F: | P_DIFF      |N|  up to 3 times          has to be specified.
    //      +-+-+-+-+-+-+-+-+                    N=1: An additional P_DIFF follows
    //                                                current P_DIFF.
    //
    fn parse_ref_indices(&mut self, reader: &mut dyn BitRead) -> Result<(), PacketError> {
        loop {
            if self.p_diff.len() == MAX_VP9_REF_PICS {
                return Err(PacketError::TooManyPDiff);
            }

            let b = reader.get_u8().ok_or(PacketError::ShortPacket)?;
            self.p_diff.push(b >> 1);

            if b & 0x01 == 0 {
                return Ok(());
            }
        }
    }

    // Scalability structure (SS):
    //
    //      +-+-+-+-+-+-+-+-+
    // V:   | N_S |Y|G|-|-|-|
    //      +-+-+-+-+-+-+-+-+              -|
    // Y:   |     WIDTH     | (OPTIONAL)    .
    //      +               +               .
    //      |               | (OPTIONAL)    .
    //      +-+-+-+-+-+-+-+-+               . N_S + 1 times
    //      |     HEIGHT    | (OPTIONAL)    .
    //      +               +               .
    //      |               | (OPTIONAL)    .
    //      +-+-+-+-+-+-+-+-+              -|
    // G:   |      N_G      | (OPTIONAL)
    //      +-+-+-+-+-+-+-+-+                           -|
    // N_G: |  T  |U| R |-|-| (OPTIONAL)                 .
    //      +-+-+-+-+-+-+-+-+              -|            . N_G times
    //      |    P_DIFF     | (OPTIONAL)    . R times    .
    //      +-+-+-+-+-+-+-+-+              -|           -|
    //
    fn parse_scalability_structure(
        &mut self,
        reader: &mut dyn BitRead,
    ) -> Result<(), PacketError> {
        let b = reader.get_u8().ok_or(PacketError::ShortPacket)?;

        let ns = ((b >> 5) + 1) as usize;
        let y = b & 0x10 != 0;
        let g = b & 0x08 != 0;

        if ns > MAX_SPATIAL_LAYERS {
            return Err(PacketError::CorruptedPacket);
        }

        self.spatial_layers = Some(ns as u8);

        if y {
            if reader.remaining() < 4 * ns {
                return Err(PacketError::ShortPacket);
            }

            for i in 0..ns {
                self.width[i] = Some(reader.get_u16().ok_or(PacketError::ShortPacket)?);
                self.height[i] = Some(reader.get_u16().ok_or(PacketError::ShortPacket)?);
            }
        }

        let ng = if g {
            reader.get_u8().ok_or(PacketError::ShortPacket)?
        } else {
            0
        };

        // Picture group descriptions are not used, but must be skipped.
        for _ in 0..ng {
            let b = reader.get_u8().ok_or(PacketError::ShortPacket)?;
            let r = ((b >> 2) & 0x3) as usize;
            reader.consume(r).ok_or(PacketError::ShortPacket)?;
        }

        Ok(())
    }
}
