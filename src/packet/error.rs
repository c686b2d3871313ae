use thiserror::Error;

/// Errors arising when parsing an RTP payload descriptor.
///
/// All variants mean the payload is malformed. The reader drops such packets
/// without touching the frame under assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PacketError {
    /// The payload ended before the descriptor did.
    #[error("Packet is too short")]
    ShortPacket,

    /// Layer indices name a spatial layer we don't handle.
    #[error("Too many spatial layers")]
    TooManySpatialLayers,

    /// More reference indices than a VP9 picture can have.
    #[error("Too many P-Diff")]
    TooManyPDiff,

    /// Inconsistent scalability structure.
    #[error("VP9 corrupted packet")]
    CorruptedPacket,
}
