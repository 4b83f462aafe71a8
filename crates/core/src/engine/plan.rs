//! Input validation and the ordered set of keys a lookup may try.

use crate::LookupError;

/// Length of a UPC-A code, the one format registered under two keys.
const UPC_A_LEN: usize = 12;

/// Reject anything that is not a non-empty run of ASCII digits.
pub(crate) fn validate(barcode_no: &str) -> Result<(), LookupError> {
    if barcode_no.is_empty() {
        return Err(LookupError::BarcodeNotProvided);
    }
    if !barcode_no.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LookupError::BarcodeNotNumeric);
    }
    Ok(())
}

/// Keys to try for one barcode, in order.
///
/// A 12-digit UPC-A code may be registered as-is or under its zero-padded
/// EAN-13 form, and the registry treats the two as distinct. The padded
/// form goes first; the original is the single permitted alternate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupPlan {
    pub primary: String,
    pub alternate: Option<String>,
}

impl LookupPlan {
    pub fn for_barcode(barcode_no: &str) -> Self {
        if barcode_no.len() == UPC_A_LEN {
            Self { primary: format!("0{barcode_no}"), alternate: Some(barcode_no.to_string()) }
        } else {
            Self { primary: barcode_no.to_string(), alternate: None }
        }
    }
}
