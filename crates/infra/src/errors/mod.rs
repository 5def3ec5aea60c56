//! Error conversions from external crates into domain errors

pub mod conversions;

pub use conversions::InfraError;
