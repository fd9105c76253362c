//! Decrypted payload classification
//!
//! Routing used to be scattered size/name sniffing; it is now one closed
//! set of payload kinds and a single pure classification function, with
//! every magic length in the constants block below.

use crate::regulation::REGULATION_LEN;

/// Leading envelope dropped from every decrypted payload before
/// classification.
pub const ENVELOPE_LEN: usize = 0x296;

/// Content length of a gift (wondercard) payload.
pub const GIFT_CONTENT_LEN: usize = 0x310;

/// Content length of a cup regulation container payload.
pub const CUP_CONTAINER_LEN: usize = 0x4C0;

/// Expected length of each sub-record inside a regulation container.
pub const CONTAINER_RECORD_LEN: usize = REGULATION_LEN;

/// The source generation whose `regulation` entries carry containers.
pub const REGULATION_GENERATION: u32 = 7;

/// What a decrypted payload turned out to be.
///
/// Cup and regulation containers share the same binary layout; they are
/// distinct kinds because they are stored in different places downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// A gift record, handed to the external semantic decoder.
    Gift,
    /// A container of regulation sub-records from a cup entry.
    CupContainer,
    /// A container of regulation sub-records from a generation-7
    /// `regulation` entry.
    RegulationContainer,
    /// Nothing we recognize. Logged, never an error.
    Unrecognized,
}

/// Strip the envelope from a decrypted payload, if it is long enough to
/// carry one.
pub fn strip_envelope(decrypted: &[u8]) -> Option<&[u8]> {
    decrypted.get(ENVELOPE_LEN..)
}

/// Classify an envelope-stripped payload.
///
/// - exactly [`GIFT_CONTENT_LEN`] bytes is a gift;
/// - exactly [`CUP_CONTAINER_LEN`] bytes with `cup` in the entry name
///   (case-insensitive) is a cup container;
/// - `regulation` in the entry name is a regulation container, for
///   generation-7 sources only;
/// - anything else is unrecognized.
pub fn classify(content_len: usize, entry_name: &str, generation: u32) -> PayloadKind {
    if content_len == GIFT_CONTENT_LEN {
        return PayloadKind::Gift;
    }
    if content_len == CUP_CONTAINER_LEN && entry_name.to_uppercase().contains("CUP") {
        return PayloadKind::CupContainer;
    }
    if entry_name.contains("regulation") && generation == REGULATION_GENERATION {
        return PayloadKind::RegulationContainer;
    }
    PayloadKind::Unrecognized
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn gift_length_routes_to_gift_regardless_of_name() {
        assert_eq!(classify(GIFT_CONTENT_LEN, "anything", 6), PayloadKind::Gift);
        assert_eq!(classify(GIFT_CONTENT_LEN, "cup", 7), PayloadKind::Gift);
    }

    #[test]
    fn cup_requires_both_length_and_name_marker() {
        assert_eq!(
            classify(CUP_CONTAINER_LEN, "SpringCup2017", 6),
            PayloadKind::CupContainer
        );
        assert_eq!(
            classify(CUP_CONTAINER_LEN, "nothing", 6),
            PayloadKind::Unrecognized
        );
        assert_eq!(
            classify(CUP_CONTAINER_LEN - 1, "SpringCup2017", 6),
            PayloadKind::Unrecognized
        );
    }

    #[test]
    fn cup_marker_is_case_insensitive() {
        assert_eq!(
            classify(CUP_CONTAINER_LEN, "springCUP", 6),
            PayloadKind::CupContainer
        );
        assert_eq!(
            classify(CUP_CONTAINER_LEN, "SPRINGcup", 6),
            PayloadKind::CupContainer
        );
    }

    #[test]
    fn regulation_marker_is_generation_gated() {
        assert_eq!(
            classify(123, "regulation7_1", 7),
            PayloadKind::RegulationContainer
        );
        assert_eq!(classify(123, "regulation6_1", 6), PayloadKind::Unrecognized);
        // The regulation marker is exact-case, unlike the cup marker.
        assert_eq!(classify(123, "Regulation7_1", 7), PayloadKind::Unrecognized);
    }

    #[test]
    fn envelope_stripping() {
        let payload = vec![0u8; ENVELOPE_LEN + 4];
        assert_eq!(strip_envelope(&payload).map(<[u8]>::len), Some(4));

        let short = vec![0u8; ENVELOPE_LEN - 1];
        assert_eq!(strip_envelope(&short), None);
    }
}
