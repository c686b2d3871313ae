num_id!(
    /// RTP payload type.
    Pt,
    u8
);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pt_display_and_deref() {
        let pt: Pt = 98.into();
        assert_eq!(*pt, 98);
        assert_eq!(pt.to_string(), "98");
    }
}
