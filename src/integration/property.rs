//! # Property Lookup
//!
//! Resolves a case's main property reference into a descriptor used to
//! enrich delivery metadata and the geotechnical notification. Absence of
//! a result is tolerated everywhere; the enrichment simply stays empty.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub object_identity: Option<Uuid>,
    pub municipality: Option<String>,
    pub designation: Option<String>,
    pub district: Option<String>,
}

impl PropertyDescriptor {
    /// Full property designation ("municipality designation"), with
    /// whichever parts are present.
    pub fn full_designation(&self) -> Option<String> {
        match (self.municipality.as_deref(), self.designation.as_deref()) {
            (Some(municipality), Some(designation)) => {
                Some(format!("{municipality} {designation}"))
            }
            (Some(single), None) | (None, Some(single)) => Some(single.to_string()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PropertyLookupError {
    #[error("property lookup transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait PropertyLookup: Send + Sync {
    /// Resolve a property reference; `Ok(None)` when the registry has no
    /// matching record.
    async fn by_reference(
        &self,
        property_reference: i64,
    ) -> Result<Option<PropertyDescriptor>, PropertyLookupError>;
}
