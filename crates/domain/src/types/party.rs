//! Billable parties and registry entities

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_COUNTRY;
use crate::types::tenant::TenantId;

/// Where a party record originated during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartySource {
    Ledger,
    Registry,
    Manual,
}

/// Canonical legal-entity record returned by the business registry
///
/// Field names mirror the registry's report columns; empty strings are
/// normal for optional columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntity {
    #[serde(default)]
    pub regon: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub commune: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub building_number: String,
    #[serde(default)]
    pub unit_number: String,
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub silo_id: String,
    #[serde(default)]
    pub post_city: String,
    #[serde(default)]
    pub krs: Option<String>,
}

impl RegistryEntity {
    /// Street line as the ledger expects it: street, building number,
    /// unit number separated by a slash when present.
    pub fn street_address(&self) -> String {
        let mut line = self.street.trim().to_string();
        let building = self.building_number.trim();
        if !building.is_empty() {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(building);
            let unit = self.unit_number.trim();
            if !unit.is_empty() {
                line.push('/');
                line.push_str(unit);
            }
        }
        line
    }
}

/// Manually supplied party fields, the last resolution fallback
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualParty {
    pub name: String,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A billable counterparty as the workflow tracks it
///
/// `external_id` stays `None` until the ledger persists the party, and is
/// assigned exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyRecord {
    pub tenant: TenantId,
    #[serde(default)]
    pub external_id: Option<String>,
    pub tax_id: String,
    pub name: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub email: Option<String>,
    pub source: PartySource,
}

impl PartyRecord {
    /// Synthesizes a record from the first registry hit
    pub fn from_registry(tenant: TenantId, tax_id: &str, entity: &RegistryEntity) -> Self {
        Self {
            tenant,
            external_id: None,
            tax_id: tax_id.to_string(),
            name: entity.name.trim().to_string(),
            street: entity.street_address(),
            zip_code: entity.zip_code.trim().to_string(),
            city: entity.city.trim().to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            email: None,
            source: PartySource::Registry,
        }
    }

    /// Synthesizes a record from caller-supplied fields
    pub fn from_manual(tenant: TenantId, tax_id: &str, manual: &ManualParty) -> Self {
        Self {
            tenant,
            external_id: None,
            tax_id: tax_id.to_string(),
            name: manual.name.trim().to_string(),
            street: manual.street.clone().unwrap_or_default(),
            zip_code: manual.zip_code.clone().unwrap_or_default(),
            city: manual.city.clone().unwrap_or_default(),
            country: manual.country.clone().unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            email: manual.email.clone(),
            source: PartySource::Manual,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.external_id.is_some()
    }
}
