//! Domain types and models

pub mod invoice;
pub mod party;
pub mod tenant;
pub mod token;
pub mod workflow;

pub use invoice::{
    InvoiceDraft, InvoiceLineItem, InvoiceResult, InvoiceStatus, LedgerInvoice, StepOutcome,
};
pub use party::{ManualParty, PartyRecord, PartySource, RegistryEntity};
pub use tenant::{CredentialProfile, TenantId};
pub use token::{RefreshExpiryTier, RefreshLease, TokenGrant, TokenRecord, TokenStatus};
pub use workflow::{DeliveryOptions, WorkflowRequest};
