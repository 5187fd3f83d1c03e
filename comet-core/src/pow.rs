//! Proof-of-work scoring (NIP-13)
//!
//! An event's difficulty is the number of leading zero bits in its id.
//! The count is the network-wide comparison standard, so the bit
//! semantics here must not drift; the display helpers only exist so
//! every surface renders the same strings.

use crate::event::Tag;

/// Count the leading zero bits of a hex identifier.
///
/// Scans nibble by nibble: 4 bits per all-zero nibble, plus the leading
/// zeros inside the first non-zero nibble. A character that is not hex
/// stops the scan, so malformed input simply scores what was seen.
///
/// # Example
///
/// ```
/// use comet_core::leading_zero_bits;
///
/// assert_eq!(leading_zero_bits("00000000"), 32);
/// assert_eq!(leading_zero_bits("0000000f"), 28);
/// ```
pub fn leading_zero_bits(hex: &str) -> u32 {
    let mut count = 0;

    for c in hex.chars() {
        match c.to_digit(16) {
            Some(0) => count += 4,
            // Leading zeros within the 4 bits of the nibble
            Some(nibble) => {
                count += nibble.leading_zeros() - 28;
                break;
            }
            None => break,
        }
    }

    count
}

/// Extract the target difficulty declared in a `nonce` tag.
///
/// NIP-13 nonce tags are `["nonce", "<nonce>", "<target>"]`. Returns
/// `None` when no nonce tag has a third element or the target does not
/// parse; a declared target lets verifiers reject events that happened
/// to hash well but committed to less work.
pub fn declared_target(tags: &[Tag]) -> Option<u32> {
    let nonce_tag = tags
        .iter()
        .find(|tag| tag.name() == Some("nonce") && tag.0.len() >= 3)?;
    nonce_tag.get(2)?.parse().ok()
}

/// Format a difficulty for display.
///
/// From 20 bits up, the approximate work factor (`2^bits` hashes) is
/// appended with a K/M/B/T suffix so the number stays readable.
///
/// # Example
///
/// ```
/// use comet_core::format_difficulty;
///
/// assert_eq!(format_difficulty(0), "No PoW");
/// assert_eq!(format_difficulty(8), "8 bits");
/// assert_eq!(format_difficulty(20), "20 bits (1.0M hashes)");
/// ```
pub fn format_difficulty(bits: u32) -> String {
    if bits == 0 {
        return "No PoW".to_string();
    }

    if bits >= 20 {
        // Each additional bit doubles the work
        let work = 2f64.powi(bits as i32);

        let formatted = if work >= 1e12 {
            format!("{:.1}T", work / 1e12)
        } else if work >= 1e9 {
            format!("{:.1}B", work / 1e9)
        } else {
            format!("{:.1}M", work / 1e6)
        };

        return format!("{} bits ({} hashes)", bits, formatted);
    }

    format!("{} bits", bits)
}

/// Display tier for a difficulty value.
///
/// The thresholds are fixed UI constants shared with other clients on
/// the network, not protocol semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyTier {
    /// No work demonstrated.
    None,
    /// Below 10 bits.
    Low,
    /// 10 to 14 bits.
    Medium,
    /// 15 to 19 bits.
    High,
    /// 20 to 24 bits.
    VeryHigh,
    /// 25 bits and beyond.
    Extreme,
}

impl DifficultyTier {
    /// Tier for a leading-zero-bit count.
    pub fn of(bits: u32) -> Self {
        if bits == 0 {
            DifficultyTier::None
        } else if bits < 10 {
            DifficultyTier::Low
        } else if bits < 15 {
            DifficultyTier::Medium
        } else if bits < 20 {
            DifficultyTier::High
        } else if bits < 25 {
            DifficultyTier::VeryHigh
        } else {
            DifficultyTier::Extreme
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_zero_bits_reference_vectors() {
        assert_eq!(leading_zero_bits("00000000"), 32);
        assert_eq!(leading_zero_bits("0000000f"), 28);
        assert_eq!(
            leading_zero_bits("8000000000000000000000000000000000000000000000000000000000000000"),
            0
        );
        assert_eq!(
            leading_zero_bits("1000000000000000000000000000000000000000000000000000000000000000"),
            3
        );
    }

    #[test]
    fn test_leading_zero_bits_per_nibble() {
        assert_eq!(leading_zero_bits("f"), 0);
        assert_eq!(leading_zero_bits("8"), 0);
        assert_eq!(leading_zero_bits("7"), 1);
        assert_eq!(leading_zero_bits("4"), 1);
        assert_eq!(leading_zero_bits("3"), 2);
        assert_eq!(leading_zero_bits("2"), 2);
        assert_eq!(leading_zero_bits("1"), 3);
        assert_eq!(leading_zero_bits("01"), 7);
    }

    #[test]
    fn test_leading_zero_bits_degenerate_inputs() {
        assert_eq!(leading_zero_bits(""), 0);
        assert_eq!(leading_zero_bits("0000"), 16);
        // Non-hex stops the scan
        assert_eq!(leading_zero_bits("00zz"), 8);
    }

    #[test]
    fn test_declared_target() {
        let tags = vec![Tag::new(["nonce", "123", "16"])];
        assert_eq!(declared_target(&tags), Some(16));
    }

    #[test]
    fn test_declared_target_too_short() {
        let tags = vec![Tag::new(["nonce", "123"])];
        assert_eq!(declared_target(&tags), None);
    }

    #[test]
    fn test_declared_target_unparseable() {
        let tags = vec![Tag::new(["nonce", "123", "lots"])];
        assert_eq!(declared_target(&tags), None);
    }

    #[test]
    fn test_declared_target_skips_other_tags() {
        let tags = vec![
            Tag::new(["e", "abc"]),
            Tag::new(["nonce", "7", "21"]),
            Tag::new(["nonce", "8", "22"]),
        ];
        // First qualifying nonce tag wins
        assert_eq!(declared_target(&tags), Some(21));
    }

    #[test]
    fn test_declared_target_missing() {
        assert_eq!(declared_target(&[]), None);
        assert_eq!(declared_target(&[Tag::new(["e", "abc"])]), None);
    }

    #[test]
    fn test_format_difficulty() {
        assert_eq!(format_difficulty(0), "No PoW");
        assert_eq!(format_difficulty(1), "1 bits");
        assert_eq!(format_difficulty(8), "8 bits");
        assert_eq!(format_difficulty(19), "19 bits");
        assert_eq!(format_difficulty(20), "20 bits (1.0M hashes)");
        assert_eq!(format_difficulty(24), "24 bits (16.8M hashes)");
        assert_eq!(format_difficulty(30), "30 bits (1.1B hashes)");
        assert_eq!(format_difficulty(32), "32 bits (4.3B hashes)");
        assert_eq!(format_difficulty(40), "40 bits (1.1T hashes)");
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(DifficultyTier::of(0), DifficultyTier::None);
        assert_eq!(DifficultyTier::of(1), DifficultyTier::Low);
        assert_eq!(DifficultyTier::of(9), DifficultyTier::Low);
        assert_eq!(DifficultyTier::of(10), DifficultyTier::Medium);
        assert_eq!(DifficultyTier::of(14), DifficultyTier::Medium);
        assert_eq!(DifficultyTier::of(15), DifficultyTier::High);
        assert_eq!(DifficultyTier::of(19), DifficultyTier::High);
        assert_eq!(DifficultyTier::of(20), DifficultyTier::VeryHigh);
        assert_eq!(DifficultyTier::of(24), DifficultyTier::VeryHigh);
        assert_eq!(DifficultyTier::of(25), DifficultyTier::Extreme);
        assert_eq!(DifficultyTier::of(32), DifficultyTier::Extreme);
    }
}
