//! GS1 mod-10 check digits.
//!
//! Digits are scanned right to left; positions at an even index (0-based,
//! counted from the right) weigh 3 and the rest weigh 1. The check digit is
//! whatever brings the weighted sum up to the next multiple of ten.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lengths that carry a trailing check digit: UPC-E, EAN-8, UPC-A, EAN-13.
pub const CHECKSUM_LENGTHS: [usize; 4] = [6, 8, 12, 13];

/// Compute the check digit for a run of digits.
///
/// Returns `None` if `digits` contains anything other than ASCII digits.
pub fn compute_check_digit(digits: &str) -> Option<u8> {
    // Weighted sum, kept mod 10.
    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let digit = c.to_digit(10)?;
        sum = (sum + if i % 2 == 0 { digit * 3 } else { digit }) % 10;
    }
    Some(((10 - sum) % 10) as u8)
}

/// Check the trailing digit of a 6, 8, 12 or 13 digit code.
///
/// Any other length, or any non-digit content, is simply not a valid
/// checksum and yields `false`.
pub fn is_valid_checksum(code: &str) -> bool {
    expected_check_digit(code).is_some_and(|expected| code.as_bytes()[code.len() - 1] - b'0' == expected)
}

/// The check digit `code` should end with, if it has a checksummed length.
pub fn expected_check_digit(code: &str) -> Option<u8> {
    if !CHECKSUM_LENGTHS.contains(&code.len()) || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    compute_check_digit(&code[..code.len() - 1])
}

/// Checksum verdict for a single code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecksumReport {
    pub barcode_no: String,
    pub valid_checksum: bool,
    /// Check digit the code should end with; absent for unsupported lengths.
    pub expected_check_digit: Option<u8>,
}

impl ChecksumReport {
    pub fn for_code(code: &str) -> Self {
        Self {
            barcode_no: code.to_string(),
            valid_checksum: is_valid_checksum(code),
            expected_check_digit: expected_check_digit(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Straightforward GS1 reference: pad to 18 digits and weigh from the left.
    fn reference_check_digit(body: &str) -> u8 {
        let padded = format!("{body:0>17}");
        let sum: u32 = padded
            .bytes()
            .enumerate()
            .map(|(i, b)| u32::from(b - b'0') * if i % 2 == 0 { 3 } else { 1 })
            .sum();
        ((10 - sum % 10) % 10) as u8
    }

    #[test]
    fn test_upc_a_example() {
        assert_eq!(compute_check_digit("03600029145"), Some(2));
        assert!(is_valid_checksum("036000291452"));
        assert!(!is_valid_checksum("036000291453"));
    }

    #[test]
    fn test_known_codes() {
        assert!(is_valid_checksum("4006381333931")); // EAN-13
        assert!(is_valid_checksum("96385074")); // EAN-8
        assert!(is_valid_checksum("123457")); // six digits, same weighting
        assert!(is_valid_checksum("0036000291452")); // zero-padded UPC-A
    }

    #[test]
    fn test_matches_reference() {
        let bodies = ["1", "12345", "9638507", "03600029145", "400638133393", "590123412345", "00000000000"];
        for body in bodies {
            assert_eq!(compute_check_digit(body), Some(reference_check_digit(body)), "body {body}");
        }
    }

    #[test]
    fn test_long_input() {
        // 1_000_001 nines: 500_001 weigh 3, 500_000 weigh 1, sum 18_000_027.
        let nines = "9".repeat(1_000_001);
        assert_eq!(compute_check_digit(&nines), Some(3));
    }

    #[test]
    fn test_deterministic() {
        let first = compute_check_digit("400638133393");
        for _ in 0..10 {
            assert_eq!(compute_check_digit("400638133393"), first);
        }
    }

    #[test]
    fn test_unsupported_lengths_are_invalid() {
        for code in ["", "1", "12345", "1234567", "123456789", "12345678901", "12345678901234"] {
            assert!(!is_valid_checksum(code), "length {}", code.len());
            assert_eq!(expected_check_digit(code), None);
        }
    }

    #[test]
    fn test_non_digits_are_invalid() {
        assert_eq!(compute_check_digit("12a4"), None);
        assert!(!is_valid_checksum("12345a"));
        assert!(!is_valid_checksum("03600029145x"));
        assert!(!is_valid_checksum("٠٣٦٠٠٠٢٩١٤٥٢"));
    }

    #[test]
    fn test_report() {
        let report = ChecksumReport::for_code("036000291453");
        assert!(!report.valid_checksum);
        assert_eq!(report.expected_check_digit, Some(2));

        let report = ChecksumReport::for_code("12345");
        assert!(!report.valid_checksum);
        assert_eq!(report.expected_check_digit, None);
    }
}
