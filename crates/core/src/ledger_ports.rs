//! Port interface for the external accounting ledger
//!
//! One trait per collaborator. Every method is a single remote
//! request/response pair with no local retry; the orchestrator decides
//! what each failure means.

use async_trait::async_trait;
use ledgerflow_domain::{InvoiceDraft, LedgerInvoice, PartyRecord, Result, TenantId};

/// Client for the accounting service's party and invoice operations
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Exact tax-ID lookup. `Ok(None)` is "no such party", not an error.
    async fn find_party(&self, tenant: &TenantId, tax_id: &str) -> Result<Option<PartyRecord>>;

    /// Creates a party. Not idempotent at the wire level; callers own
    /// the find-before-create discipline.
    async fn create_party(&self, tenant: &TenantId, party: &PartyRecord) -> Result<PartyRecord>;

    /// Submits an invoice draft, returning the ledger's view of it.
    async fn create_invoice(&self, tenant: &TenantId, draft: &InvoiceDraft)
        -> Result<LedgerInvoice>;

    /// Records a payment against an existing invoice.
    async fn mark_paid(&self, tenant: &TenantId, invoice_id: &str, amount: f64) -> Result<()>;

    /// Fetches the rendered invoice document (PDF bytes).
    async fn fetch_document(&self, tenant: &TenantId, invoice_id: &str) -> Result<Vec<u8>>;

    /// Asks the ledger to email the invoice to `recipient`.
    async fn send_email(
        &self,
        tenant: &TenantId,
        invoice_id: &str,
        recipient: &str,
        subject: Option<&str>,
        body: Option<&str>,
    ) -> Result<()>;
}
