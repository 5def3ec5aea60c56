//! Business registry client (BIR 1.1 SOAP service)
//!
//! The registry speaks SOAP 1.2 with WS-Addressing headers and wraps its
//! payload twice: search responses may arrive as MTOM multipart, and the
//! entity list inside `DaneSzukajPodmiotyResult` is an XML document
//! escaped into text. [`envelope`] builds the request documents,
//! [`parser`] unwraps the response layers, [`client`] drives the
//! login-then-search exchange.

pub mod client;
pub mod envelope;
pub mod parser;

pub use client::GusClient;
