//! # Attachment Classification
//!
//! Maps the category codes used by the case export source onto the
//! archive's document classification. The mapping is an explicit lookup
//! table: every recognized code carries an archive classification letter
//! and a human-readable description, and every unrecognized code falls
//! back to [`AttachmentCategory::Attachment`], whose classification marks
//! the document as not publicly searchable in the archive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Document category as understood by the long-term archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentCategory {
    Application,
    Drawing,
    StructuralCalculation,
    GeotechnicalSurvey,
    TopographicSurvey,
    Decision,
    InspectionProtocol,
    Correspondence,
    /// Fallback for unrecognized codes. Classification "D" keeps these
    /// out of the public archive index.
    Attachment,
}

impl AttachmentCategory {
    /// Source-side category code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Application => "APPL",
            Self::Drawing => "DRAW",
            Self::StructuralCalculation => "STRUCT",
            Self::GeotechnicalSurvey => "GEO",
            Self::TopographicSurvey => "TOPO",
            Self::Decision => "DECIS",
            Self::InspectionProtocol => "PROT",
            Self::Correspondence => "CORR",
            Self::Attachment => "ATT",
        }
    }

    /// Archive-side classification letter.
    pub fn archive_classification(&self) -> &'static str {
        match self {
            Self::Application => "F",
            Self::Drawing => "F",
            Self::StructuralCalculation => "K",
            Self::GeotechnicalSurvey => "H",
            Self::TopographicSurvey => "H",
            Self::Decision => "A",
            Self::InspectionProtocol => "K",
            Self::Correspondence => "E",
            Self::Attachment => "D",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Application => "Application",
            Self::Drawing => "Drawing",
            Self::StructuralCalculation => "Structural calculation",
            Self::GeotechnicalSurvey => "Geotechnical survey",
            Self::TopographicSurvey => "Topographic survey",
            Self::Decision => "Decision",
            Self::InspectionProtocol => "Inspection protocol",
            Self::Correspondence => "Correspondence",
            Self::Attachment => "Attachment",
        }
    }

    /// Strict lookup; `None` for codes the table does not know.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "APPL" => Some(Self::Application),
            "DRAW" => Some(Self::Drawing),
            "STRUCT" => Some(Self::StructuralCalculation),
            "GEO" => Some(Self::GeotechnicalSurvey),
            "TOPO" => Some(Self::TopographicSurvey),
            "DECIS" => Some(Self::Decision),
            "PROT" => Some(Self::InspectionProtocol),
            "CORR" => Some(Self::Correspondence),
            "ATT" => Some(Self::Attachment),
            _ => None,
        }
    }

    /// Lookup with the defined fallback for unrecognized codes.
    pub fn resolve(code: &str) -> Self {
        Self::from_code(code).unwrap_or(Self::Attachment)
    }
}

impl fmt::Display for AttachmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(AttachmentCategory::resolve("GEO"), AttachmentCategory::GeotechnicalSurvey);
        assert_eq!(AttachmentCategory::resolve("DECIS"), AttachmentCategory::Decision);
    }

    #[test]
    fn unknown_codes_fall_back_to_attachment() {
        let category = AttachmentCategory::resolve("NO_SUCH_CODE");
        assert_eq!(category, AttachmentCategory::Attachment);
        assert_eq!(category.archive_classification(), "D");
    }

    #[test]
    fn strict_lookup_rejects_unknown_codes() {
        assert_eq!(AttachmentCategory::from_code("NO_SUCH_CODE"), None);
    }

    #[test]
    fn codes_round_trip_through_the_table() {
        for category in [
            AttachmentCategory::Application,
            AttachmentCategory::Drawing,
            AttachmentCategory::StructuralCalculation,
            AttachmentCategory::GeotechnicalSurvey,
            AttachmentCategory::TopographicSurvey,
            AttachmentCategory::Decision,
            AttachmentCategory::InspectionProtocol,
            AttachmentCategory::Correspondence,
            AttachmentCategory::Attachment,
        ] {
            assert_eq!(AttachmentCategory::from_code(category.code()), Some(category));
        }
    }
}
