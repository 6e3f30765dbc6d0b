use crate::error::SurveyPrintError;
use crate::fields::{lenient_number, null_as_default};
use crate::finding::Finding;
use crate::hazard::HazardRow;
use crate::model::{AreaRating, FindingsTally, ReportMetadata};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the report prints, as handed over by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportInput {
    #[serde(deserialize_with = "null_as_default", alias = "meta")]
    pub metadata: ReportMetadata,
    #[serde(deserialize_with = "null_as_default", alias = "photos")]
    pub findings: Vec<Finding>,
    #[serde(
        deserialize_with = "null_as_default",
        alias = "hazardRows",
        alias = "hazard_rows",
        alias = "defects"
    )]
    pub hazards: Vec<HazardRow>,
    #[serde(deserialize_with = "null_as_default", alias = "areaRatings")]
    pub area_ratings: BTreeMap<String, AreaRating>,
    #[serde(deserialize_with = "lenient_number", alias = "averageScore", alias = "avg_score")]
    pub average_score: Option<f64>,
    #[serde(
        deserialize_with = "null_as_default",
        alias = "findingsTally",
        alias = "findings_tally"
    )]
    pub tally: FindingsTally,
}

impl ReportInput {
    pub fn from_json_str(raw: &str) -> Result<Self, SurveyPrintError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_slice(raw: &[u8]) -> Result<Self, SurveyPrintError> {
        Ok(serde_json::from_slice(raw)?)
    }
}
