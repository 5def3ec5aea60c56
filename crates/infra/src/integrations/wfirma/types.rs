//! Payload and response structs for the ledger API
//!
//! The provider serializes numbers inconsistently (`"total": "123.00"`
//! one day, `123.0` the next); [`StringOrNumber`] absorbs that at the
//! boundary so domain types stay strict.

use ledgerflow_domain::{
    clean_tax_id, InvoiceDraft, LedgerInvoice, PartyRecord, PartySource, TenantId,
};
use serde::{Deserialize, Serialize};

/// A JSON scalar that may arrive as either a string or a number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl StringOrNumber {
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Text(s) => s.trim().parse().ok(),
            Self::Number(n) => n.as_f64(),
        }
    }
}

/// Contractor entry as returned by `contractors/find` and `contractors/add`
#[derive(Debug, Clone, Deserialize)]
pub struct ContractorBody {
    #[serde(default)]
    pub id: Option<StringOrNumber>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nip: Option<StringOrNumber>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ContractorBody {
    /// Normalizes into the workflow's party record. `fallback_tax_id` is
    /// the cleaned id the lookup was keyed on, used when the entry omits
    /// its own.
    pub fn into_party(self, tenant: TenantId, fallback_tax_id: &str) -> PartyRecord {
        let tax_id = self
            .nip
            .map(|v| clean_tax_id(&v.as_text()))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| fallback_tax_id.to_string());

        PartyRecord {
            tenant,
            external_id: self.id.map(|v| v.as_text()),
            tax_id,
            name: self.name.unwrap_or_default(),
            street: self.street.unwrap_or_default(),
            zip_code: self.zip.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            email: self.email.filter(|e| !e.trim().is_empty()),
            source: PartySource::Ledger,
        }
    }
}

/// Contractor fields as `contractors/add` expects them
#[derive(Debug, Serialize)]
pub struct ContractorPayload<'a> {
    pub name: &'a str,
    pub altname: &'a str,
    pub nip: &'a str,
    // "custom" disables the provider's own tax-id validation
    pub tax_id_type: &'a str,
    pub street: &'a str,
    pub zip: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
}

impl<'a> ContractorPayload<'a> {
    pub fn from_party(party: &'a PartyRecord) -> Self {
        Self {
            name: &party.name,
            altname: &party.name,
            nip: &party.tax_id,
            tax_id_type: "custom",
            street: &party.street,
            zip: &party.zip_code,
            city: &party.city,
            country: &party.country,
            email: party.email.as_deref(),
        }
    }
}

/// Invoice entry as returned by `invoices/add`
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceBody {
    #[serde(default)]
    pub id: Option<StringOrNumber>,
    #[serde(default)]
    pub fullnumber: Option<String>,
    #[serde(default)]
    pub total: Option<StringOrNumber>,
    #[serde(default)]
    pub alreadypaid: Option<StringOrNumber>,
}

impl InvoiceBody {
    /// `None` when the entry carries no id, which means the provider did
    /// not actually create anything.
    pub fn into_invoice(self) -> Option<LedgerInvoice> {
        let id = self.id?.as_text();
        Some(LedgerInvoice {
            id,
            number: self.fullnumber.unwrap_or_default(),
            total: self.total.and_then(|v| v.as_f64()).unwrap_or(0.0),
            already_paid: self.alreadypaid.and_then(|v| v.as_f64()).unwrap_or(0.0),
        })
    }
}

/// One invoice line as `invoices/add` expects it
#[derive(Debug, Serialize)]
pub struct InvoiceContentPayload<'a> {
    pub name: &'a str,
    pub count: f64,
    pub unit: &'a str,
    pub price: f64,
    pub vat: &'a str,
}

#[derive(Debug, Serialize)]
pub struct InvoiceContents<'a> {
    pub invoicecontent: Vec<InvoiceContentPayload<'a>>,
}

/// Numeric series reference, sent only when the caller's selector is one
#[derive(Debug, Serialize)]
pub struct SeriesRef {
    pub id: i64,
}

/// Invoice fields as `invoices/add` expects them
#[derive(Debug, Serialize)]
pub struct InvoicePayload<'a> {
    pub contractor_id: i64,
    pub date: String,
    pub disposaldate: String,
    pub paymentdate: String,
    #[serde(rename = "type")]
    pub document_type: &'a str,
    pub invoicecontents: InvoiceContents<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesRef>,
}

impl<'a> InvoicePayload<'a> {
    pub fn from_draft(draft: &'a InvoiceDraft, contractor_id: i64) -> Self {
        let invoicecontent = draft
            .lines
            .iter()
            .map(|line| InvoiceContentPayload {
                name: &line.name,
                count: line.quantity,
                unit: &line.unit,
                price: line.unit_price_net,
                vat: &line.vat_code,
            })
            .collect();

        Self {
            contractor_id,
            date: draft.issue_date.to_string(),
            disposaldate: draft.sale_date.to_string(),
            paymentdate: draft.due_date.to_string(),
            document_type: &draft.document_type,
            invoicecontents: InvoiceContents { invoicecontent },
            paid: draft.paid.then_some(1),
            series: draft
                .series_selector
                .as_deref()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .map(|id| SeriesRef { id }),
        }
    }
}

/// Payment record as `payments/add` expects it
#[derive(Debug, Serialize)]
pub struct PaymentPayload {
    pub object_name: &'static str,
    pub object_id: i64,
    pub value: f64,
    pub date: String,
}
