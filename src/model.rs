use crate::fields::{lenient_count, lenient_number, lenient_text, or_placeholder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportMetadata {
    #[serde(deserialize_with = "lenient_text", alias = "vesselName")]
    pub vessel_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub imo: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub flag: Option<String>,
    #[serde(deserialize_with = "lenient_text", alias = "callSign")]
    pub call_sign: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub weather: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_text", alias = "reportRef", alias = "report_reference")]
    pub report_ref: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub inspector: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient_text", alias = "overallRating")]
    pub overall_rating: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub score: Option<f64>,
}

impl ReportMetadata {
    /// Label/value pairs for the title-page particulars grid.
    pub fn particulars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Vessel", or_placeholder(self.vessel_name.as_deref())),
            ("IMO", or_placeholder(self.imo.as_deref())),
            ("Flag", or_placeholder(self.flag.as_deref())),
            ("Call sign", or_placeholder(self.call_sign.as_deref())),
            ("Date", or_placeholder(self.date.as_deref())),
            ("Location", or_placeholder(self.location.as_deref())),
            ("Weather", or_placeholder(self.weather.as_deref())),
            ("Inspector", or_placeholder(self.inspector.as_deref())),
            ("Report ref", or_placeholder(self.report_ref.as_deref())),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaRating {
    #[serde(deserialize_with = "lenient_number")]
    pub score: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub rating: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub remarks: Option<String>,
}

/// Counts computed by the caller, printed as-is next to the derived KPIs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindingsTally {
    #[serde(deserialize_with = "lenient_count")]
    pub fire: usize,
    #[serde(deserialize_with = "lenient_count")]
    pub trip: usize,
    #[serde(deserialize_with = "lenient_count")]
    pub rust: usize,
    #[serde(deserialize_with = "lenient_count")]
    pub attention: usize,
    #[serde(deserialize_with = "lenient_count", alias = "missingTimestamp", alias = "missing_timestamps")]
    pub missing_timestamp: usize,
}

impl FindingsTally {
    pub fn rows(&self) -> [(&'static str, usize); 5] {
        [
            ("Fire hazards", self.fire),
            ("Trip / fall hazards", self.trip),
            ("Rust", self.rust),
            ("Needs attention", self.attention),
            ("Missing timestamp", self.missing_timestamp),
        ]
    }
}

/// Score with one decimal, `-` when absent.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(value) if value.is_finite() => format!("{value:.1}"),
        _ => crate::fields::PLACEHOLDER.to_string(),
    }
}
