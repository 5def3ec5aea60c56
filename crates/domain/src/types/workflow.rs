//! Workflow requests as callers submit them

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PAYMENT_DAYS;
use crate::types::invoice::InvoiceLineItem;
use crate::types::party::ManualParty;
use crate::types::tenant::TenantId;

/// Optional post-creation steps requested by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryOptions {
    /// Mark the invoice paid after creation
    #[serde(default)]
    pub mark_paid: bool,
    /// Email the invoice; fatal if requested and dispatch fails
    #[serde(default)]
    pub send_email: bool,
    /// Recipient override; falls back to the party's email
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_subject: Option<String>,
    #[serde(default)]
    pub email_body: Option<String>,
}

/// One invoice-creation request
///
/// `tax_id` drives the resolution cascade; `manual_party` is the last
/// fallback. Dates are optional and resolved against the current day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRequest {
    #[serde(default)]
    pub tenant: TenantId,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub manual_party: Option<ManualParty>,
    pub lines: Vec<InvoiceLineItem>,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub sale_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(flatten)]
    pub delivery: DeliveryOptions,
}

impl WorkflowRequest {
    /// Whether any party-resolution input exists at all
    pub fn has_party_inputs(&self) -> bool {
        self.tax_id.as_deref().is_some_and(|t| !t.trim().is_empty())
            || self.manual_party.as_ref().is_some_and(|m| !m.name.trim().is_empty())
    }

    /// Resolves issue/sale/due dates against `today`.
    ///
    /// Sale defaults to the issue date; due defaults to issue plus the
    /// standard payment term.
    pub fn resolve_dates(&self, today: NaiveDate) -> (NaiveDate, NaiveDate, NaiveDate) {
        let issue = self.issue_date.unwrap_or(today);
        let sale = self.sale_date.unwrap_or(issue);
        let due = self.due_date.unwrap_or(issue + Duration::days(DEFAULT_PAYMENT_DAYS));
        (issue, sale, due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_request() -> WorkflowRequest {
        serde_json::from_str(
            r#"{"tax_id":"5260305006","lines":[{"name":"Usluga","unit_price_net":100.0}]}"#,
        )
        .expect("request parses")
    }

    #[test]
    fn flat_json_fills_tenant_and_delivery_defaults() {
        let request = minimal_request();

        assert_eq!(request.tenant.as_str(), "default");
        assert!(!request.delivery.mark_paid);
        assert!(!request.delivery.send_email);
        assert!(request.has_party_inputs());
    }

    #[test]
    fn delivery_flags_parse_from_flat_body() {
        let request: WorkflowRequest = serde_json::from_str(
            r#"{
                "tenant": "acme",
                "tax_id": "5260305006",
                "lines": [{"name":"Usluga","unit_price_net":100.0}],
                "mark_paid": true,
                "send_email": true,
                "email": "billing@acme.example"
            }"#,
        )
        .expect("request parses");

        assert!(request.delivery.mark_paid);
        assert!(request.delivery.send_email);
        assert_eq!(request.delivery.email.as_deref(), Some("billing@acme.example"));
    }

    #[test]
    fn dates_default_relative_to_today() {
        let request = minimal_request();
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        let (issue, sale, due) = request.resolve_dates(today);
        assert_eq!(issue, today);
        assert_eq!(sale, today);
        assert_eq!(due, NaiveDate::from_ymd_opt(2025, 1, 22).unwrap());
    }

    #[test]
    fn explicit_dates_win_over_defaults() {
        let mut request = minimal_request();
        request.issue_date = NaiveDate::from_ymd_opt(2025, 2, 1);
        request.due_date = NaiveDate::from_ymd_opt(2025, 3, 1);

        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let (issue, sale, due) = request.resolve_dates(today);
        assert_eq!(issue, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(sale, issue);
        assert_eq!(due, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn blank_tax_id_alone_is_no_party_input() {
        let request: WorkflowRequest = serde_json::from_str(
            r#"{"tax_id":"  ","lines":[{"name":"Usluga","unit_price_net":100.0}]}"#,
        )
        .expect("request parses");

        assert!(!request.has_party_inputs());
    }
}
