//! External service integrations

pub mod gus;

pub mod wfirma;
