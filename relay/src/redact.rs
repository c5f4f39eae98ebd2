//! Masking of sensitive values before they reach the logs.

/// Secrets shorter than this are masked entirely.
const MIN_REVEAL_LEN: usize = 12;

/// Number of trailing characters kept for longer secrets.
const REVEAL_SUFFIX: usize = 4;

/// Mask a sensitive value, keeping its length.
///
/// Values of at least 12 characters keep their last 4 characters so two
/// secrets can be told apart in the logs; anything shorter is fully masked.
pub fn redact(value: &str) -> String {
    let len = value.chars().count();

    if len < MIN_REVEAL_LEN {
        return "*".repeat(len);
    }

    let suffix: String = value.chars().skip(len - REVEAL_SUFFIX).collect();
    format!("{}{}", "*".repeat(len - REVEAL_SUFFIX), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_values_fully_masked() {
        assert_eq!(redact(""), "");
        assert_eq!(redact("S"), "*");
        assert_eq!(redact("hunter2"), "*******");
    }

    #[test]
    fn test_long_values_keep_suffix() {
        assert_eq!(redact("abcdefghijklmnop"), "************mnop");
    }

    #[test]
    fn test_multibyte_values() {
        let masked = redact("pässwörd-ßecret");
        assert_eq!(masked.chars().count(), 15);
        assert!(masked.ends_with("cret"));
        assert!(!masked.contains("pässwörd"));
    }
}
