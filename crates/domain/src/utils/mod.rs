//! Pure helper functions shared by every layer

pub mod tax_id;
pub mod vat;
