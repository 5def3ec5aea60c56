//! Tax-ID (NIP) cleaning, validation, and formatting
//!
//! Well-formedness (exactly ten digits) gates remote registry calls; the
//! checksum is advisory only, since ledgers legitimately hold foreign and
//! legacy identifiers that fail it.

use crate::constants::TAX_ID_LENGTH;

/// Strip everything that is not an ASCII digit.
///
/// # Examples
///
/// ```
/// use ledgerflow_domain::utils::tax_id::clean_tax_id;
///
/// assert_eq!(clean_tax_id("526-030-50-06"), "5260305006");
/// assert_eq!(clean_tax_id("PL 5260305006"), "5260305006");
/// assert_eq!(clean_tax_id(""), "");
/// ```
#[must_use]
pub fn clean_tax_id(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Whether the identifier has exactly ten digits after cleaning.
///
/// # Examples
///
/// ```
/// use ledgerflow_domain::utils::tax_id::is_well_formed_tax_id;
///
/// assert!(is_well_formed_tax_id("526-030-50-06"));
/// assert!(!is_well_formed_tax_id("123456789"));
/// assert!(!is_well_formed_tax_id("12345678901"));
/// ```
#[must_use]
pub fn is_well_formed_tax_id(raw: &str) -> bool {
    clean_tax_id(raw).len() == TAX_ID_LENGTH
}

/// Verify the control digit of a well-formed identifier.
///
/// Weighted sum of the first nine digits with weights
/// `[6, 5, 7, 2, 3, 4, 5, 6, 7]`, modulo 11 (a remainder of 10 counts as
/// 0), compared against the tenth digit. Returns `false` for anything
/// not well-formed.
///
/// # Examples
///
/// ```
/// use ledgerflow_domain::utils::tax_id::checksum_valid;
///
/// assert!(checksum_valid("526-030-50-06"));
/// assert!(!checksum_valid("5260305007"));
/// assert!(!checksum_valid("123"));
/// ```
#[must_use]
pub fn checksum_valid(raw: &str) -> bool {
    const WEIGHTS: [u32; 9] = [6, 5, 7, 2, 3, 4, 5, 6, 7];

    let clean = clean_tax_id(raw);
    if clean.len() != TAX_ID_LENGTH {
        return false;
    }

    let digits: Vec<u32> = clean.chars().filter_map(|c| c.to_digit(10)).collect();
    let sum: u32 = digits.iter().zip(WEIGHTS.iter()).map(|(d, w)| d * w).sum();
    let mut checksum = sum % 11;
    if checksum == 10 {
        checksum = 0;
    }

    checksum == digits[9]
}

/// Render the identifier as `XXX-XXX-XX-XX`.
///
/// Partial inputs get as many separators as their length allows, which
/// keeps the function usable for as-you-type display.
///
/// # Examples
///
/// ```
/// use ledgerflow_domain::utils::tax_id::format_tax_id;
///
/// assert_eq!(format_tax_id("5260305006"), "526-030-50-06");
/// assert_eq!(format_tax_id("52603"), "526-03");
/// ```
#[must_use]
pub fn format_tax_id(raw: &str) -> String {
    let clean = clean_tax_id(raw);
    match clean.len() {
        0..=3 => clean,
        4..=6 => format!("{}-{}", &clean[..3], &clean[3..]),
        7..=8 => format!("{}-{}-{}", &clean[..3], &clean[3..6], &clean[6..]),
        _ => {
            format!("{}-{}-{}-{}", &clean[..3], &clean[3..6], &clean[6..8], &clean[8..10])
        }
    }
}
