//! Invoice drafts, ledger responses, and workflow results

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DOCUMENT_TYPE, DEFAULT_LINE_UNIT};
use crate::errors::{LedgerFlowError, Result};
use crate::types::party::{PartyRecord, PartySource};

fn default_quantity() -> f64 {
    1.0
}

fn default_unit() -> String {
    DEFAULT_LINE_UNIT.to_string()
}

fn default_vat_code() -> String {
    "23".to_string()
}

/// One invoice line as supplied by the caller
///
/// Quantity, unit, and VAT code default to the common case (one piece at
/// the standard rate) so minimal requests stay minimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub unit_price_net: f64,
    #[serde(default = "default_vat_code")]
    pub vat_code: String,
}

impl InvoiceLineItem {
    /// Pre-flight validation; runs before any remote call.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerFlowError::InvalidLineItem("line item name is empty".to_string()));
        }
        if !(self.quantity > 0.0) {
            return Err(LedgerFlowError::InvalidLineItem(format!(
                "line '{}' has non-positive quantity {}",
                self.name, self.quantity
            )));
        }
        if !self.unit_price_net.is_finite() || self.unit_price_net < 0.0 {
            return Err(LedgerFlowError::InvalidLineItem(format!(
                "line '{}' has invalid unit price {}",
                self.name, self.unit_price_net
            )));
        }
        if crate::utils::vat::rate_for_code(&self.vat_code).is_none() {
            return Err(LedgerFlowError::InvalidLineItem(format!(
                "line '{}' has unknown VAT code '{}'",
                self.name, self.vat_code
            )));
        }
        Ok(())
    }
}

/// A fully assembled invoice, built once per workflow invocation
///
/// Never mutated after submission; a retried workflow builds a new draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub party: PartyRecord,
    pub lines: Vec<InvoiceLineItem>,
    pub issue_date: NaiveDate,
    pub sale_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub series_selector: Option<String>,
    #[serde(default)]
    pub paid: bool,
    pub document_type: String,
}

impl InvoiceDraft {
    /// Validates every line; the first bad line aborts.
    pub fn validate_lines(&self) -> Result<()> {
        if self.lines.is_empty() {
            return Err(LedgerFlowError::InvalidLineItem("invoice has no line items".to_string()));
        }
        for line in &self.lines {
            line.validate()?;
        }
        Ok(())
    }

    /// Sum of line gross amounts at full precision
    pub fn total_gross(&self) -> Result<f64> {
        crate::utils::vat::total_gross(&self.lines)
    }

    pub fn default_document_type() -> String {
        DEFAULT_DOCUMENT_TYPE.to_string()
    }
}

/// Payment state of a ledger invoice as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Paid,
    Unpaid,
    Unknown,
}

/// Normalized invoice as the ledger reports it after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerInvoice {
    pub id: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub already_paid: f64,
}

impl LedgerInvoice {
    /// Whether the provider already reflects full payment
    pub fn is_paid(&self) -> bool {
        self.total > 0.0 && self.already_paid + 1e-9 >= self.total
    }

    pub fn status(&self) -> InvoiceStatus {
        if self.total <= 0.0 {
            InvoiceStatus::Unknown
        } else if self.is_paid() {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::Unpaid
        }
    }
}

/// Outcome of one optional workflow step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StepOutcome {
    Skipped,
    Succeeded,
    Failed(String),
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Terminal result of a workflow run
///
/// Sub-statuses let callers tell "invoice exists but email failed" apart
/// from total failure. Document bytes never serialize; `document_size`
/// travels instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceResult {
    pub external_id: String,
    pub number: String,
    pub status: InvoiceStatus,
    pub total_gross: f64,
    pub party_source: PartySource,
    #[serde(default)]
    pub party_external_id: Option<String>,
    pub payment: StepOutcome,
    pub document: StepOutcome,
    pub email: StepOutcome,
    #[serde(default)]
    pub document_size: Option<usize>,
    #[serde(skip)]
    pub document_bytes: Option<Vec<u8>>,
}

impl InvoiceResult {
    /// Records a fetched document, keeping the serialized size in sync
    pub fn attach_document(&mut self, bytes: Vec<u8>) {
        self.document_size = Some(bytes.len());
        self.document_bytes = Some(bytes);
        self.document = StepOutcome::Succeeded;
    }
}
