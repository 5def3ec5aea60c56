//! VAT rate-code table and invoice arithmetic
//!
//! The table is closed: the six codes below are everything the ledger
//! accepts, and unknown codes fail before any remote call.

use crate::errors::{LedgerFlowError, Result};
use crate::types::invoice::InvoiceLineItem;

/// A resolved VAT bracket: the fractional rate plus the provider's
/// internal rate identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VatRate {
    pub rate: f64,
    pub vendor_id: u32,
}

/// Resolve a rate code, matching case-insensitively after trimming.
///
/// `"zw"` (exempt) and `"np"` (not subject) are zero-rate codes with
/// distinct provider identifiers.
#[must_use]
pub fn rate_for_code(code: &str) -> Option<VatRate> {
    match code.trim().to_ascii_lowercase().as_str() {
        "23" => Some(VatRate { rate: 0.23, vendor_id: 222 }),
        "8" => Some(VatRate { rate: 0.08, vendor_id: 223 }),
        "5" => Some(VatRate { rate: 0.05, vendor_id: 224 }),
        "0" => Some(VatRate { rate: 0.0, vendor_id: 225 }),
        "zw" => Some(VatRate { rate: 0.0, vendor_id: 226 }),
        "np" => Some(VatRate { rate: 0.0, vendor_id: 227 }),
        _ => None,
    }
}

/// Gross amount of one line: quantity x net unit price x (1 + rate).
pub fn line_gross(line: &InvoiceLineItem) -> Result<f64> {
    let vat = rate_for_code(&line.vat_code).ok_or_else(|| {
        LedgerFlowError::InvalidLineItem(format!(
            "line '{}' has unknown VAT code '{}'",
            line.name, line.vat_code
        ))
    })?;
    Ok(line.quantity * line.unit_price_net * (1.0 + vat.rate))
}

/// Sum of line gross amounts at full precision; rounding happens only at
/// the point a payment amount is expressed.
pub fn total_gross(lines: &[InvoiceLineItem]) -> Result<f64> {
    let mut total = 0.0;
    for line in lines {
        total += line_gross(line)?;
    }
    Ok(total)
}

/// Round to two decimal places, for payment amounts on the wire.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, quantity: f64, price: f64, vat: &str) -> InvoiceLineItem {
        InvoiceLineItem {
            name: name.to_string(),
            quantity,
            unit: "szt.".to_string(),
            unit_price_net: price,
            vat_code: vat.to_string(),
        }
    }

    #[test]
    fn standard_rate_line_grosses_up() {
        let gross = line_gross(&line("Usluga", 1.0, 100.0, "23")).expect("known code");
        assert!((gross - 123.0).abs() < 1e-9);
    }

    #[test]
    fn exempt_codes_keep_net_amount() {
        let zw = line_gross(&line("Szkolenie", 2.0, 50.0, "zw")).expect("known code");
        assert!((zw - 100.0).abs() < 1e-9);

        let np = line_gross(&line("Eksport", 1.0, 75.0, "NP")).expect("case-insensitive");
        assert!((np - 75.0).abs() < 1e-9);
    }

    #[test]
    fn total_is_independent_of_line_order() {
        let a = line("A", 3.0, 19.99, "23");
        let b = line("B", 1.5, 200.0, "8");
        let c = line("C", 1.0, 0.01, "5");

        let forward = total_gross(&[a.clone(), b.clone(), c.clone()]).expect("all known");
        let backward = total_gross(&[c, b, a]).expect("all known");
        assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn unknown_code_fails_closed() {
        let err = total_gross(&[line("A", 1.0, 10.0, "19")]).unwrap_err();
        assert!(matches!(err, LedgerFlowError::InvalidLineItem(_)));
    }

    #[test]
    fn rounding_applies_only_at_the_edge() {
        let lines = [line("A", 1.0, 0.105, "0"), line("B", 1.0, 0.105, "0")];
        let total = total_gross(&lines).expect("known codes");
        // Full precision internally
        assert!((total - 0.21).abs() < 1e-12);
        assert!((round2(123.456) - 123.46).abs() < 1e-9);
        assert!((round2(0.005) - 0.01).abs() < 1e-9);
    }

    #[test]
    fn vendor_ids_follow_the_fixed_table() {
        assert_eq!(rate_for_code("23").unwrap().vendor_id, 222);
        assert_eq!(rate_for_code("8").unwrap().vendor_id, 223);
        assert_eq!(rate_for_code("5").unwrap().vendor_id, 224);
        assert_eq!(rate_for_code("0").unwrap().vendor_id, 225);
        assert_eq!(rate_for_code("zw").unwrap().vendor_id, 226);
        assert_eq!(rate_for_code("np").unwrap().vendor_id, 227);
    }
}
