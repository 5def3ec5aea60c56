//! Invoice workflow orchestrator - core business logic
//!
//! A linear state machine with fallback branches and no backward
//! transitions: authorization, party resolution, party persistence,
//! invoice submission, then the optional payment/document/email tail.
//! The orchestrator decides fatality; it never rewrites a component's
//! error into something else.

use std::sync::Arc;

use chrono::Utc;
use ledgerflow_domain::utils::tax_id::{checksum_valid, clean_tax_id, is_well_formed_tax_id};
use ledgerflow_domain::{
    InvoiceDraft, InvoiceResult, InvoiceStatus, LedgerFlowError, PartyRecord, Result, StepOutcome,
    TenantId, WorkflowRequest,
};
use tracing::{debug, info, warn};

use crate::auth::ports::AccessTokenProvider;
use crate::ledger_ports::LedgerClient;
use crate::registry_ports::RegistryLookup;

/// Drives one invoice-creation request from tax ID to delivered invoice
pub struct InvoiceWorkflowService {
    tokens: Arc<dyn AccessTokenProvider>,
    registry: Arc<dyn RegistryLookup>,
    ledger: Arc<dyn LedgerClient>,
}

impl InvoiceWorkflowService {
    pub fn new(
        tokens: Arc<dyn AccessTokenProvider>,
        registry: Arc<dyn RegistryLookup>,
        ledger: Arc<dyn LedgerClient>,
    ) -> Self {
        Self { tokens, registry, ledger }
    }

    /// Runs the workflow to completion.
    ///
    /// Line items are validated before anything touches the network.
    /// Payment marking and document fetch failures degrade the result;
    /// email failure is fatal only when email was requested.
    pub async fn run(&self, request: WorkflowRequest) -> Result<InvoiceResult> {
        let tenant = request.tenant.clone();

        // Pre-flight: reject malformed input before any remote call
        if request.lines.is_empty() {
            return Err(LedgerFlowError::InvalidLineItem(
                "invoice request has no line items".to_string(),
            ));
        }
        for line in &request.lines {
            line.validate()?;
        }

        // AuthAcquired
        self.tokens.access_token(&tenant).await?;
        debug!(tenant = %tenant, "authorization acquired");

        // PartyResolved
        let party = self.resolve_party(&request).await?;
        info!(tenant = %tenant, source = ?party.source, name = %party.name, "party resolved");

        // PartyPersisted
        let party = self.persist_party(&tenant, party).await?;

        // InvoiceSubmitted
        let (issue_date, sale_date, due_date) = request.resolve_dates(Utc::now().date_naive());
        let draft = InvoiceDraft {
            party: party.clone(),
            lines: request.lines.clone(),
            issue_date,
            sale_date,
            due_date,
            series_selector: request.series.clone(),
            paid: request.delivery.mark_paid,
            document_type: InvoiceDraft::default_document_type(),
        };
        let total_gross = draft.total_gross()?;

        let invoice = self.ledger.create_invoice(&tenant, &draft).await?;
        info!(
            tenant = %tenant,
            invoice_id = %invoice.id,
            number = %invoice.number,
            total = invoice.total,
            "invoice created"
        );

        let mut result = InvoiceResult {
            external_id: invoice.id.clone(),
            number: invoice.number.clone(),
            status: invoice.status(),
            total_gross,
            party_source: party.source,
            party_external_id: party.external_id.clone(),
            payment: StepOutcome::Skipped,
            document: StepOutcome::Skipped,
            email: StepOutcome::Skipped,
            document_size: None,
            document_bytes: None,
        };

        // PaymentFinalized (optional, reported not fatal)
        if request.delivery.mark_paid {
            if invoice.is_paid() {
                debug!(tenant = %tenant, invoice_id = %invoice.id, "submission already reflects payment");
                result.payment = StepOutcome::Succeeded;
                result.status = InvoiceStatus::Paid;
            } else {
                let amount = if invoice.total > 0.0 { invoice.total } else { total_gross };
                match self.ledger.mark_paid(&tenant, &invoice.id, amount).await {
                    Ok(()) => {
                        info!(tenant = %tenant, invoice_id = %invoice.id, amount, "invoice marked paid");
                        result.payment = StepOutcome::Succeeded;
                        result.status = InvoiceStatus::Paid;
                    }
                    Err(err) => {
                        warn!(tenant = %tenant, invoice_id = %invoice.id, error = %err, "payment marking failed");
                        result.payment = StepOutcome::Failed(err.to_string());
                    }
                }
            }
        }

        // DocumentRetrieved (always attempted, best-effort)
        match self.ledger.fetch_document(&tenant, &invoice.id).await {
            Ok(bytes) => {
                debug!(tenant = %tenant, invoice_id = %invoice.id, size = bytes.len(), "document fetched");
                result.attach_document(bytes);
            }
            Err(err) => {
                warn!(tenant = %tenant, invoice_id = %invoice.id, error = %err, "document fetch failed");
                result.document = StepOutcome::Failed(err.to_string());
            }
        }

        // EmailDispatched (optional, fatal because it was requested)
        if request.delivery.send_email {
            let recipient = request.delivery.email.clone().or_else(|| party.email.clone());
            let Some(recipient) = recipient else {
                return Err(LedgerFlowError::EmailDispatchFailed(format!(
                    "invoice {} created, but email was requested and no recipient address is known",
                    invoice.id
                )));
            };

            self.ledger
                .send_email(
                    &tenant,
                    &invoice.id,
                    &recipient,
                    request.delivery.email_subject.as_deref(),
                    request.delivery.email_body.as_deref(),
                )
                .await?;
            info!(tenant = %tenant, invoice_id = %invoice.id, "invoice emailed");
            result.email = StepOutcome::Succeeded;
        }

        info!(tenant = %tenant, invoice_id = %result.external_id, "workflow completed");
        Ok(result)
    }

    /// Resolution cascade: ledger match, then registry for well-formed
    /// tax IDs, then manual fields. Registry failures are recoverable
    /// here; exhaustion is `NoParty`.
    async fn resolve_party(&self, request: &WorkflowRequest) -> Result<PartyRecord> {
        let tenant = &request.tenant;
        let raw = request.tax_id.clone().unwrap_or_default();
        let clean = clean_tax_id(&raw);
        let mut registry_note = None;

        if is_well_formed_tax_id(&clean) {
            if !checksum_valid(&clean) {
                // Advisory only; foreign and legacy IDs fail this legitimately
                warn!(tenant = %tenant, tax_id = %clean, "tax id checksum mismatch");
            }

            if let Some(found) = self.ledger.find_party(tenant, &clean).await? {
                debug!(tenant = %tenant, tax_id = %clean, "party found in ledger");
                return Ok(found);
            }

            match self.registry.lookup(&clean).await {
                Ok(entities) => {
                    if let Some(entity) = entities.first() {
                        debug!(tenant = %tenant, tax_id = %clean, regon = %entity.regon, "registry match");
                        return Ok(PartyRecord::from_registry(tenant.clone(), &clean, entity));
                    }
                    debug!(tenant = %tenant, tax_id = %clean, "registry had no match");
                }
                Err(err) => {
                    warn!(tenant = %tenant, tax_id = %clean, error = %err, "registry lookup failed, trying manual fallback");
                    registry_note = Some(err.to_string());
                }
            }
        } else if !raw.trim().is_empty() {
            debug!(tenant = %tenant, tax_id = %raw, "tax id not well-formed, skipping remote lookups");
        }

        if let Some(manual) = &request.manual_party {
            if !manual.name.trim().is_empty() {
                debug!(tenant = %tenant, "synthesizing party from manual fields");
                return Ok(PartyRecord::from_manual(tenant.clone(), &clean, manual));
            }
        }

        let mut detail = format!("no party resolved for tax id '{raw}' and no manual fields given");
        if let Some(note) = registry_note {
            detail.push_str(&format!(" (registry: {note})"));
        }
        Err(LedgerFlowError::NoParty(detail))
    }

    /// Creates the party when resolution produced an unpersisted record.
    /// The lookup-before-create discipline already ran during resolution.
    async fn persist_party(&self, tenant: &TenantId, party: PartyRecord) -> Result<PartyRecord> {
        if party.is_persisted() {
            return Ok(party);
        }

        let created = self.ledger.create_party(tenant, &party).await?;
        info!(
            tenant = %tenant,
            party_id = created.external_id.as_deref().unwrap_or("?"),
            "party created in ledger"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use ledgerflow_domain::{
        InvoiceLineItem, LedgerInvoice, ManualParty, PartySource, RegistryEntity,
    };

    use super::*;

    struct MockTokens {
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AccessTokenProvider for MockTokens {
        async fn access_token(&self, _tenant: &TenantId) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(LedgerFlowError::AuthUnavailable("reauthorization required".to_string()))
            } else {
                Ok("at-test".to_string())
            }
        }
    }

    struct MockRegistry {
        entities: Vec<RegistryEntity>,
        error: Option<LedgerFlowError>,
        calls: AtomicUsize,
    }

    impl MockRegistry {
        fn empty() -> Self {
            Self { entities: Vec::new(), error: None, calls: AtomicUsize::new(0) }
        }

        fn with_entity(name: &str) -> Self {
            Self {
                entities: vec![RegistryEntity {
                    name: name.to_string(),
                    city: "Warszawa".to_string(),
                    zip_code: "00-001".to_string(),
                    street: "ul. Prosta".to_string(),
                    building_number: "1".to_string(),
                    regon: "012345678".to_string(),
                    ..RegistryEntity::default()
                }],
                error: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(error: LedgerFlowError) -> Self {
            Self { entities: Vec::new(), error: Some(error), calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl RegistryLookup for MockRegistry {
        async fn lookup(&self, _tax_id: &str) -> Result<Vec<RegistryEntity>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.error {
                Some(err) => Err(err.clone()),
                None => Ok(self.entities.clone()),
            }
        }
    }

    #[derive(Default)]
    struct MockLedger {
        parties: StdMutex<HashMap<String, PartyRecord>>,
        next_party_id: AtomicUsize,
        invoice_error: Option<LedgerFlowError>,
        mark_paid_fails: bool,
        document_fails: bool,
        email_fails: bool,
        invoice_already_paid: bool,
        find_calls: AtomicUsize,
        create_party_calls: AtomicUsize,
        create_invoice_calls: AtomicUsize,
        mark_paid_calls: AtomicUsize,
        fetch_document_calls: AtomicUsize,
        send_email_calls: AtomicUsize,
        last_email: StdMutex<Option<String>>,
    }

    impl MockLedger {
        fn with_party(self, tax_id: &str, name: &str, email: Option<&str>) -> Self {
            let record = PartyRecord {
                tenant: TenantId::default_tenant(),
                external_id: Some("C100".to_string()),
                tax_id: tax_id.to_string(),
                name: name.to_string(),
                street: String::new(),
                zip_code: String::new(),
                city: String::new(),
                country: "PL".to_string(),
                email: email.map(str::to_string),
                source: PartySource::Ledger,
            };
            self.parties.lock().unwrap().insert(tax_id.to_string(), record);
            self
        }
    }

    #[async_trait]
    impl LedgerClient for MockLedger {
        async fn find_party(
            &self,
            _tenant: &TenantId,
            tax_id: &str,
        ) -> Result<Option<PartyRecord>> {
            self.find_calls.fetch_add(1, Ordering::SeqCst);
            // Like the real client, reads synthesize the source: anything
            // returned by a ledger lookup is ledger-sourced.
            Ok(self.parties.lock().unwrap().get(tax_id).cloned().map(|mut party| {
                party.source = PartySource::Ledger;
                party
            }))
        }

        async fn create_party(
            &self,
            _tenant: &TenantId,
            party: &PartyRecord,
        ) -> Result<PartyRecord> {
            self.create_party_calls.fetch_add(1, Ordering::SeqCst);
            let id = self.next_party_id.fetch_add(1, Ordering::SeqCst) + 200;
            let mut created = party.clone();
            created.external_id = Some(format!("C{id}"));
            if !created.tax_id.is_empty() {
                self.parties.lock().unwrap().insert(created.tax_id.clone(), created.clone());
            }
            Ok(created)
        }

        async fn create_invoice(
            &self,
            _tenant: &TenantId,
            draft: &InvoiceDraft,
        ) -> Result<LedgerInvoice> {
            self.create_invoice_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = &self.invoice_error {
                return Err(err.clone());
            }
            let total = draft.total_gross().unwrap_or(0.0);
            Ok(LedgerInvoice {
                id: "501".to_string(),
                number: "FV 1/2025".to_string(),
                total,
                already_paid: if self.invoice_already_paid { total } else { 0.0 },
            })
        }

        async fn mark_paid(
            &self,
            _tenant: &TenantId,
            _invoice_id: &str,
            _amount: f64,
        ) -> Result<()> {
            self.mark_paid_calls.fetch_add(1, Ordering::SeqCst);
            if self.mark_paid_fails {
                Err(LedgerFlowError::PaymentFinalizeFailed("payment rejected".to_string()))
            } else {
                Ok(())
            }
        }

        async fn fetch_document(&self, _tenant: &TenantId, _invoice_id: &str) -> Result<Vec<u8>> {
            self.fetch_document_calls.fetch_add(1, Ordering::SeqCst);
            if self.document_fails {
                Err(LedgerFlowError::DocumentFetchFailed("renderer unavailable".to_string()))
            } else {
                Ok(b"%PDF-1.4 test".to_vec())
            }
        }

        async fn send_email(
            &self,
            _tenant: &TenantId,
            _invoice_id: &str,
            recipient: &str,
            _subject: Option<&str>,
            _body: Option<&str>,
        ) -> Result<()> {
            self.send_email_calls.fetch_add(1, Ordering::SeqCst);
            if self.email_fails {
                Err(LedgerFlowError::EmailDispatchFailed("smtp bounce".to_string()))
            } else {
                *self.last_email.lock().unwrap() = Some(recipient.to_string());
                Ok(())
            }
        }
    }

    fn service(
        tokens_fail: bool,
        registry: MockRegistry,
        ledger: MockLedger,
    ) -> (InvoiceWorkflowService, Arc<MockTokens>, Arc<MockRegistry>, Arc<MockLedger>) {
        let tokens = Arc::new(MockTokens { fail: tokens_fail, calls: AtomicUsize::new(0) });
        let registry = Arc::new(registry);
        let ledger = Arc::new(ledger);
        let service = InvoiceWorkflowService::new(
            tokens.clone() as Arc<dyn AccessTokenProvider>,
            registry.clone() as Arc<dyn RegistryLookup>,
            ledger.clone() as Arc<dyn LedgerClient>,
        );
        (service, tokens, registry, ledger)
    }

    fn line(net: f64, vat: &str) -> InvoiceLineItem {
        InvoiceLineItem {
            name: "Usluga programistyczna".to_string(),
            quantity: 1.0,
            unit: "szt.".to_string(),
            unit_price_net: net,
            vat_code: vat.to_string(),
        }
    }

    fn request(tax_id: Option<&str>) -> WorkflowRequest {
        WorkflowRequest {
            tenant: TenantId::default_tenant(),
            tax_id: tax_id.map(str::to_string),
            manual_party: None,
            lines: vec![line(100.0, "23")],
            issue_date: None,
            sale_date: None,
            due_date: None,
            series: None,
            delivery: Default::default(),
        }
    }

    /// Validates the full manual-fallback path for a tax ID unknown to
    /// both the ledger and the registry.
    ///
    /// Assertions:
    /// - Ensures the party is synthesized from manual fields and created
    /// - Confirms the gross total carries standard-rate VAT
    #[tokio::test]
    async fn unknown_everywhere_falls_back_to_manual_party() {
        let (service, _, registry, ledger) =
            service(false, MockRegistry::empty(), MockLedger::default());

        let mut req = request(Some("1234567890"));
        req.manual_party = Some(ManualParty { name: "Acme".to_string(), ..ManualParty::default() });

        let result = service.run(req).await.unwrap();

        assert_eq!(result.party_source, PartySource::Manual);
        assert!((result.total_gross - 123.0).abs() < 1e-9);
        assert_eq!(registry.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ledger.create_party_calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.status, InvoiceStatus::Unpaid);
    }

    /// Validates the idempotent path for a ledger-known tax ID.
    ///
    /// Assertions:
    /// - Ensures no registry call and no party creation happen
    /// - Confirms the document fetch still runs (always attempted)
    #[tokio::test]
    async fn ledger_known_party_skips_registry_and_creation() {
        let ledger = MockLedger::default().with_party("5260305006", "Known Sp. z o.o.", None);
        let (service, _, registry, ledger) = service(false, MockRegistry::empty(), ledger);

        let result = service.run(request(Some("526-030-50-06"))).await.unwrap();

        assert_eq!(result.party_source, PartySource::Ledger);
        assert_eq!(result.party_external_id.as_deref(), Some("C100"));
        assert_eq!(registry.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.create_party_calls.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.fetch_document_calls.load(Ordering::SeqCst), 1);
        assert!(result.document.is_succeeded());
        assert_eq!(result.document_size, Some(13));
    }

    #[tokio::test]
    async fn auth_failure_stops_before_any_resolution() {
        let (service, tokens, registry, ledger) =
            service(true, MockRegistry::empty(), MockLedger::default());

        let err = service.run(request(Some("5260305006"))).await.unwrap_err();

        assert!(matches!(err, LedgerFlowError::AuthUnavailable(_)));
        assert_eq!(tokens.calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.find_calls.load(Ordering::SeqCst), 0);
    }

    /// Validates that a failed payment marking degrades the result
    /// instead of failing the call.
    #[tokio::test]
    async fn mark_paid_failure_is_reported_not_fatal() {
        let ledger = MockLedger {
            mark_paid_fails: true,
            ..MockLedger::default()
        }
        .with_party("5260305006", "Known", None);
        let (service, _, _, ledger) = service(false, MockRegistry::empty(), ledger);

        let mut req = request(Some("5260305006"));
        req.delivery.mark_paid = true;

        let result = service.run(req).await.unwrap();

        assert_eq!(result.external_id, "501");
        assert!(result.payment.is_failed());
        assert_eq!(result.status, InvoiceStatus::Unpaid);
        assert_eq!(ledger.mark_paid_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn embedded_paid_state_skips_explicit_payment_call() {
        let ledger = MockLedger {
            invoice_already_paid: true,
            ..MockLedger::default()
        }
        .with_party("5260305006", "Known", None);
        let (service, _, _, ledger) = service(false, MockRegistry::empty(), ledger);

        let mut req = request(Some("5260305006"));
        req.delivery.mark_paid = true;

        let result = service.run(req).await.unwrap();

        assert!(result.payment.is_succeeded());
        assert_eq!(result.status, InvoiceStatus::Paid);
        assert_eq!(ledger.mark_paid_calls.load(Ordering::SeqCst), 0);
    }

    /// Validates the boundary rule: malformed tax IDs never reach the
    /// wire.
    #[tokio::test]
    async fn malformed_tax_id_makes_no_remote_lookup() {
        let (service, _, registry, ledger) =
            service(false, MockRegistry::empty(), MockLedger::default());

        let err = service.run(request(Some("123456789"))).await.unwrap_err();

        assert!(matches!(err, LedgerFlowError::NoParty(_)));
        assert_eq!(registry.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.find_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_tax_id_with_manual_fields_goes_manual() {
        let (service, _, registry, ledger) =
            service(false, MockRegistry::empty(), MockLedger::default());

        let mut req = request(Some("12345"));
        req.manual_party = Some(ManualParty { name: "Acme".to_string(), ..ManualParty::default() });

        let result = service.run(req).await.unwrap();

        assert_eq!(result.party_source, PartySource::Manual);
        assert_eq!(registry.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.find_calls.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.create_party_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausted_resolution_is_no_party() {
        let (service, _, registry, ledger) =
            service(false, MockRegistry::empty(), MockLedger::default());

        let err = service.run(request(Some("5260305006"))).await.unwrap_err();

        assert!(matches!(err, LedgerFlowError::NoParty(_)));
        assert_eq!(ledger.find_calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ledger.create_party_calls.load(Ordering::SeqCst), 0);
    }

    /// Validates registry synthesis plus the round-trip property: a
    /// persisted registry party is found by the next run.
    #[tokio::test]
    async fn registry_hit_persists_party_found_by_next_run() {
        let (service, _, registry, ledger) =
            service(false, MockRegistry::with_entity("Testowa Firma"), MockLedger::default());

        let first = service.run(request(Some("5260305006"))).await.unwrap();
        assert_eq!(first.party_source, PartySource::Registry);
        assert_eq!(ledger.create_party_calls.load(Ordering::SeqCst), 1);

        let second = service.run(request(Some("5260305006"))).await.unwrap();
        assert_eq!(second.party_source, PartySource::Ledger);
        // No duplicate creation on the second pass
        assert_eq!(ledger.create_party_calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn registry_failure_falls_back_to_manual() {
        let registry =
            MockRegistry::failing(LedgerFlowError::RegistryLogin("no session".to_string()));
        let (service, _, _, _) = service(false, registry, MockLedger::default());

        let mut req = request(Some("5260305006"));
        req.manual_party = Some(ManualParty { name: "Acme".to_string(), ..ManualParty::default() });

        let result = service.run(req).await.unwrap();
        assert_eq!(result.party_source, PartySource::Manual);
    }

    #[tokio::test]
    async fn registry_failure_without_manual_is_no_party() {
        let registry =
            MockRegistry::failing(LedgerFlowError::RegistryParse("bad payload".to_string()));
        let (service, _, _, _) = service(false, registry, MockLedger::default());

        let err = service.run(request(Some("5260305006"))).await.unwrap_err();

        match err {
            LedgerFlowError::NoParty(detail) => assert!(detail.contains("bad payload")),
            other => panic!("expected NoParty, got {other:?}"),
        }
    }

    /// Validates the pre-flight gate: invalid lines fail before the
    /// token provider is even consulted.
    #[tokio::test]
    async fn invalid_line_item_rejected_before_any_call() {
        let (service, tokens, _, ledger) =
            service(false, MockRegistry::empty(), MockLedger::default());

        let mut req = request(Some("5260305006"));
        req.lines = vec![line(100.0, "19")];

        let err = service.run(req).await.unwrap_err();

        assert!(matches!(err, LedgerFlowError::InvalidLineItem(_)));
        assert_eq!(tokens.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.find_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn requested_email_failure_is_fatal() {
        let ledger = MockLedger {
            email_fails: true,
            ..MockLedger::default()
        }
        .with_party("5260305006", "Known", None);
        let (service, _, _, ledger) = service(false, MockRegistry::empty(), ledger);

        let mut req = request(Some("5260305006"));
        req.delivery.send_email = true;
        req.delivery.email = Some("billing@known.example".to_string());

        let err = service.run(req).await.unwrap_err();

        assert!(matches!(err, LedgerFlowError::EmailDispatchFailed(_)));
        // The invoice itself was created before the email step
        assert_eq!(ledger.create_invoice_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn requested_email_without_recipient_is_fatal() {
        let ledger = MockLedger::default().with_party("5260305006", "Known", None);
        let (service, _, _, _) = service(false, MockRegistry::empty(), ledger);

        let mut req = request(Some("5260305006"));
        req.delivery.send_email = true;

        let err = service.run(req).await.unwrap_err();
        assert!(matches!(err, LedgerFlowError::EmailDispatchFailed(_)));
    }

    #[tokio::test]
    async fn email_recipient_falls_back_to_party_address() {
        let ledger = MockLedger::default().with_party(
            "5260305006",
            "Known",
            Some("accounts@known.example"),
        );
        let (service, _, _, ledger) = service(false, MockRegistry::empty(), ledger);

        let mut req = request(Some("5260305006"));
        req.delivery.send_email = true;

        let result = service.run(req).await.unwrap();

        assert!(result.email.is_succeeded());
        assert_eq!(
            ledger.last_email.lock().unwrap().as_deref(),
            Some("accounts@known.example")
        );
    }

    #[tokio::test]
    async fn document_fetch_failure_degrades_result() {
        let ledger = MockLedger {
            document_fails: true,
            ..MockLedger::default()
        }
        .with_party("5260305006", "Known", None);
        let (service, _, _, _) = service(false, MockRegistry::empty(), ledger);

        let result = service.run(request(Some("5260305006"))).await.unwrap();

        assert!(result.document.is_failed());
        assert_eq!(result.document_size, None);
        assert!(result.document_bytes.is_none());
    }

    #[tokio::test]
    async fn accounting_scheme_error_propagates_distinguished() {
        let ledger = MockLedger {
            invoice_error: Some(LedgerFlowError::AccountingSchemeMissing(
                "brak schematu ksiegowego".to_string(),
            )),
            ..MockLedger::default()
        }
        .with_party("5260305006", "Known", None);
        let (service, _, _, _) = service(false, MockRegistry::empty(), ledger);

        let err = service.run(request(Some("5260305006"))).await.unwrap_err();
        assert!(matches!(err, LedgerFlowError::AccountingSchemeMissing(_)));
    }
}
