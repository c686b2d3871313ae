use std::mem;

/// One packet's contribution to a frame, descriptor already stripped.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fragment<'a> {
    pub rtp_time: u32,
    pub is_start: bool,
    pub marker: bool,
    pub data: &'a [u8],
}

/// A closed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    pub rtp_time: u32,
    pub data: Vec<u8>,
}

/// Outcome of pushing one fragment.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Pushed {
    /// A frame that was never terminated by a marker, closed because a new
    /// frame started.
    pub superseded: Option<Frame>,
    /// The frame closed by the marker of this fragment.
    pub completed: Option<Frame>,
    /// The fragment belonged to no open frame and was dropped.
    pub discarded: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
enum FrameState {
    #[default]
    Empty,
    Accumulating {
        rtp_time: u32,
        data: Vec<u8>,
    },
}

/// Groups fragments into frames using the start-of-frame bit, the marker
/// bit and the RTP timestamp.
///
/// ```text
/// state         timestamp   start   action
/// Empty         -           yes     open frame
/// Empty         -           no      discard
/// Accumulating  same        -       append
/// Accumulating  other       yes     emit open frame, open new frame
/// Accumulating  other       no      discard
/// ```
///
/// A marker on a fragment that was absorbed emits the open frame.
#[derive(Debug, Default)]
pub(crate) struct FrameAssembler {
    state: FrameState,
}

impl FrameAssembler {
    pub fn new() -> Self {
        FrameAssembler::default()
    }

    pub fn push(&mut self, frag: Fragment<'_>) -> Pushed {
        let mut pushed = Pushed::default();

        match &mut self.state {
            FrameState::Empty => {
                if !frag.is_start {
                    trace!("Discard continuation without open frame: {}", frag.rtp_time);
                    pushed.discarded = true;
                    return pushed;
                }
                self.open(frag);
            }

            FrameState::Accumulating { rtp_time, data } if *rtp_time == frag.rtp_time => {
                data.extend_from_slice(frag.data);
            }

            FrameState::Accumulating { rtp_time, .. } => {
                if !frag.is_start {
                    trace!(
                        "Discard fragment of {} while {} is open",
                        frag.rtp_time,
                        rtp_time
                    );
                    pushed.discarded = true;
                    return pushed;
                }

                debug!(
                    "Frame {} superseded by start of {} before its marker",
                    rtp_time, frag.rtp_time
                );
                pushed.superseded = self.take();
                self.open(frag);
            }
        }

        if frag.marker {
            pushed.completed = self.take();
        }

        pushed
    }

    /// Close the open frame, if any, regardless of marker.
    pub fn take(&mut self) -> Option<Frame> {
        match mem::take(&mut self.state) {
            FrameState::Empty => None,
            FrameState::Accumulating { rtp_time, data } => Some(Frame { rtp_time, data }),
        }
    }

    /// Drop the open frame without emitting it.
    pub fn reset(&mut self) {
        self.state = FrameState::Empty;
    }

    /// The RTP time of the open frame.
    pub fn open_rtp_time(&self) -> Option<u32> {
        match &self.state {
            FrameState::Empty => None,
            FrameState::Accumulating { rtp_time, .. } => Some(*rtp_time),
        }
    }

    /// Bytes buffered for the open frame.
    pub fn buffered(&self) -> usize {
        match &self.state {
            FrameState::Empty => 0,
            FrameState::Accumulating { data, .. } => data.len(),
        }
    }

    fn open(&mut self, frag: Fragment<'_>) {
        self.state = FrameState::Accumulating {
            rtp_time: frag.rtp_time,
            data: frag.data.to_vec(),
        };
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const T1: u32 = 2599168056;
    const T2: u32 = 2599168344;

    fn frag(rtp_time: u32, is_start: bool, marker: bool, data: &[u8]) -> Fragment<'_> {
        Fragment {
            rtp_time,
            is_start,
            marker,
            data,
        }
    }

    fn frame(rtp_time: u32, data: &[u8]) -> Option<Frame> {
        Some(Frame {
            rtp_time,
            data: data.to_vec(),
        })
    }

    #[test]
    fn empty_start_opens() {
        let mut a = FrameAssembler::new();
        assert_eq!(a.push(frag(T1, true, false, &[1, 2])), Pushed::default());
        assert_eq!(a.open_rtp_time(), Some(T1));
        assert_eq!(a.buffered(), 2);
    }

    #[test]
    fn empty_continuation_discarded() {
        let mut a = FrameAssembler::new();
        let p = a.push(frag(T1, false, true, &[1, 2]));
        assert!(p.discarded);
        assert_eq!(p.completed, None);
        assert_eq!(a.open_rtp_time(), None);
    }

    #[test]
    fn same_timestamp_appends_and_marker_completes() {
        let mut a = FrameAssembler::new();
        a.push(frag(T1, true, false, &[1, 2]));
        a.push(frag(T1, false, false, &[3]));
        let p = a.push(frag(T1, false, true, &[4, 5]));
        assert_eq!(p.completed, frame(T1, &[1, 2, 3, 4, 5]));
        assert_eq!(p.superseded, None);
        assert_eq!(a.open_rtp_time(), None);
    }

    #[test]
    fn start_bit_on_same_timestamp_appends() {
        // Spatial layers of one picture each carry a start bit.
        let mut a = FrameAssembler::new();
        a.push(frag(T1, true, false, &[1]));
        let p = a.push(frag(T1, true, true, &[2]));
        assert_eq!(p.completed, frame(T1, &[1, 2]));
    }

    #[test]
    fn other_timestamp_start_supersedes() {
        let mut a = FrameAssembler::new();
        a.push(frag(T1, true, false, &[1]));
        let p = a.push(frag(T2, true, false, &[2]));
        assert_eq!(p.superseded, frame(T1, &[1]));
        assert_eq!(p.completed, None);
        assert_eq!(a.open_rtp_time(), Some(T2));
        assert_eq!(a.buffered(), 1);
    }

    #[test]
    fn supersede_and_complete_in_one_push() {
        let mut a = FrameAssembler::new();
        a.push(frag(T1, true, false, &[1]));
        let p = a.push(frag(T2, true, true, &[2]));
        assert_eq!(p.superseded, frame(T1, &[1]));
        assert_eq!(p.completed, frame(T2, &[2]));
        assert_eq!(a.open_rtp_time(), None);
    }

    #[test]
    fn other_timestamp_continuation_discarded() {
        let mut a = FrameAssembler::new();
        a.push(frag(T2, true, false, &[2]));
        let p = a.push(frag(T1, false, true, &[9]));
        assert!(p.discarded);
        assert_eq!(p.completed, None);
        assert_eq!(a.open_rtp_time(), Some(T2));
        assert_eq!(a.buffered(), 1);
    }

    #[test]
    fn take_and_reset() {
        let mut a = FrameAssembler::new();
        assert_eq!(a.take(), None);
        a.push(frag(T1, true, false, &[1]));
        assert_eq!(a.take(), frame(T1, &[1]));
        assert_eq!(a.take(), None);

        a.push(frag(T1, true, false, &[1]));
        a.reset();
        assert_eq!(a.open_rtp_time(), None);
        assert_eq!(a.take(), None);
    }

    #[test]
    fn fresh_buffer_after_emit() {
        let mut a = FrameAssembler::new();
        a.push(frag(T1, true, true, &[1, 2, 3]));
        let p = a.push(frag(T1, true, true, &[4]));
        assert_eq!(p.completed, frame(T1, &[4]));
    }
}
