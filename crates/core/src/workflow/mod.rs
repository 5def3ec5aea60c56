//! Invoice workflow orchestration

pub mod service;

pub use service::InvoiceWorkflowService;
