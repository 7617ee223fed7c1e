/// Shortest payload treated as a GTIN (GTIN-8)
pub const MIN_GTIN_LEN: usize = 8;

/// Outcome of a GTIN check-digit validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GtinCheck {
    /// The payload is not structurally a GTIN
    Invalid {
        /// What was wrong
        reason: String,
    },
    /// Check digit computed and compared with the last digit
    Checked {
        /// Expected check digit
        computed: u8,
        /// True when the payload's last digit matches
        valid: bool,
    },
}

impl GtinCheck {
    /// True for a checked payload whose check digit matches
    pub fn is_valid(&self) -> bool {
        matches!(self, GtinCheck::Checked { valid: true, .. })
    }
}

/// Mod-10 check digit over the data digits (check digit excluded).
///
/// Weights alternate 3, 1, 3, ... by position from the left: even positions
/// weigh 3, odd positions 1.
pub fn check_digit(data_digits: &[u8]) -> u8 {
    let sum: u32 = data_digits
        .iter()
        .enumerate()
        .map(|(i, &d)| d as u32 * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// Validate an EAN-13 / EAN-8 / UPC-A payload
pub fn validate(payload: &str) -> GtinCheck {
    if payload.len() < MIN_GTIN_LEN {
        return GtinCheck::Invalid {
            reason: format!("{} digits, at least {} required", payload.len(), MIN_GTIN_LEN),
        };
    }
    let Some(digits) = payload
        .bytes()
        .map(|b| b.is_ascii_digit().then(|| b - b'0'))
        .collect::<Option<Vec<u8>>>()
    else {
        return GtinCheck::Invalid {
            reason: "non-digit characters".to_string(),
        };
    };

    let (data, last) = digits.split_at(digits.len() - 1);
    let computed = check_digit(data);
    GtinCheck::Checked {
        computed,
        valid: computed == last[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upc_a_valid() {
        assert_eq!(
            validate("036000291452"),
            GtinCheck::Checked {
                computed: 2,
                valid: true
            }
        );
    }

    #[test]
    fn test_mutated_check_digit_invalid() {
        for d in (0..=9).filter(|d| *d != 2) {
            let payload = format!("03600029145{d}");
            let check = validate(&payload);
            assert!(!check.is_valid(), "{payload} should fail");
            assert_eq!(
                check,
                GtinCheck::Checked {
                    computed: 2,
                    valid: false
                }
            );
        }
    }

    #[test]
    fn test_ean8_valid() {
        assert!(validate("96385074").is_valid());
        assert!(!validate("96385075").is_valid());
    }

    #[test]
    fn test_thirteen_digits_weighted_from_the_left() {
        // 4*3 + 0 + 0*3 + 6 + 3*3 + 8 + 1*3 + 3 + 3*3 + 3 + 9*3 + 3 = 83
        assert_eq!(check_digit(&[4, 0, 0, 6, 3, 8, 1, 3, 3, 3, 9, 3]), 7);
        assert_eq!(
            validate("4006381333931"),
            GtinCheck::Checked {
                computed: 7,
                valid: false
            }
        );
        assert!(validate("4006381333937").is_valid());
    }

    #[test]
    fn test_structural_failures() {
        assert!(matches!(validate("1234567"), GtinCheck::Invalid { .. }));
        assert!(matches!(validate(""), GtinCheck::Invalid { .. }));
        assert!(matches!(validate("12345A78"), GtinCheck::Invalid { .. }));
    }
}
