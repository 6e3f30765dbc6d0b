use crate::condition::ConditionLabel;
use crate::fields::{PLACEHOLDER, first_present, lenient_bool, lenient_text};
use crate::finding::RecommendationField;
use serde::{Deserialize, Serialize};

const RECOMMENDATION_PREFIXES: [&str; 3] = ["recs:", "recommendation:", "recommendations:"];

/// One row of the defects table, derived upstream or typed in by hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardRow {
    #[serde(deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text", alias = "photoId")]
    pub photo_id: Option<String>,
    #[serde(deserialize_with = "lenient_text", alias = "rawId")]
    pub raw_id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub area: Option<String>,
    #[serde(deserialize_with = "lenient_text", alias = "assignedTo")]
    pub assigned_to: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub deadline: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub condition: Option<String>,
    pub recommendations: Option<RecommendationField>,
    #[serde(deserialize_with = "lenient_text")]
    pub combined: Option<String>,
    #[serde(deserialize_with = "lenient_bool", alias = "isManual")]
    pub manual: bool,
}

impl HazardRow {
    /// Photo reference: `photo_id`, then `raw_id`, then `id`.
    pub fn photo_ref(&self) -> Option<&str> {
        first_present([
            self.photo_id.as_deref(),
            self.raw_id.as_deref(),
            self.id.as_deref(),
        ])
    }

    pub fn condition_label(&self) -> Option<ConditionLabel> {
        first_present([self.condition.as_deref()]).map(ConditionLabel::from_label)
    }

    fn structured_recommendations(&self) -> Option<String> {
        let lines = self.recommendations.as_ref()?.lines();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("; "))
        }
    }

    /// Recommendation line pulled out of the free-text `combined` block.
    pub fn combined_recommendation(&self) -> Option<String> {
        let combined = self.combined.as_deref()?;
        combined
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .find_map(strip_recommendation_prefix)
            .map(|rest| rest.trim().to_string())
    }

    /// Manual rows without structured recommendations read them from
    /// `combined`; everything else uses the structured field. `-` when
    /// neither yields text.
    pub fn recommendation_text(&self) -> String {
        let structured = self.structured_recommendations();
        let extracted = if self.manual && structured.is_none() {
            self.combined_recommendation()
        } else {
            None
        };
        extracted
            .filter(|text| !text.is_empty())
            .or(structured)
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }
}

fn strip_recommendation_prefix(line: &str) -> Option<&str> {
    RECOMMENDATION_PREFIXES.iter().find_map(|prefix| {
        let head = line.get(..prefix.len())?;
        if head.eq_ignore_ascii_case(prefix) {
            line.get(prefix.len()..)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn row(value: Value) -> HazardRow {
        serde_json::from_value(value).expect("hazard fixture")
    }

    #[test]
    fn manual_row_extracts_recs_line() {
        let r = row(json!({ "manual": true, "combined": "Area: Deck\nRecs: Repaint rail" }));
        assert_eq!(r.recommendation_text(), "Repaint rail");
    }

    #[test]
    fn prefix_match_is_case_insensitive_and_first_wins() {
        let r = row(json!({
            "isManual": true,
            "combined": "  \nRECOMMENDATIONS:  Replace hose \nrecommendation: later",
        }));
        assert_eq!(r.recommendation_text(), "Replace hose");

        let r = row(json!({ "manual": true, "combined": "Recommendation: Fit guard" }));
        assert_eq!(r.recommendation_text(), "Fit guard");
    }

    #[test]
    fn structured_field_beats_combined() {
        let r = row(json!({
            "manual": true,
            "recommendations": ["Weld", "Paint"],
            "combined": "Recs: ignored",
        }));
        assert_eq!(r.recommendation_text(), "Weld; Paint");
    }

    #[test]
    fn non_manual_rows_ignore_combined() {
        let r = row(json!({ "combined": "Recs: Repaint rail" }));
        assert_eq!(r.recommendation_text(), "-");
    }

    #[test]
    fn no_match_falls_back_to_placeholder() {
        let r = row(json!({ "manual": true, "combined": "Area: Deck\nNotes: none" }));
        assert_eq!(r.recommendation_text(), "-");
        let r = row(json!({ "manual": true }));
        assert_eq!(r.recommendation_text(), "-");
    }

    #[test]
    fn empty_structured_list_counts_as_missing() {
        let r = row(json!({
            "manual": true,
            "recommendations": [],
            "combined": "recs: Lash drums",
        }));
        assert_eq!(r.recommendation_text(), "Lash drums");
    }

    #[test]
    fn photo_reference_fallback_order() {
        assert_eq!(row(json!({ "photoId": "P1", "rawId": "R1", "id": "H1" })).photo_ref(), Some("P1"));
        assert_eq!(row(json!({ "photoId": "", "rawId": "R1", "id": "H1" })).photo_ref(), Some("R1"));
        assert_eq!(row(json!({ "id": 9 })).photo_ref(), Some("9"));
        assert_eq!(HazardRow::default().photo_ref(), None);
    }

    #[test]
    fn multibyte_lines_do_not_panic() {
        let r = row(json!({ "manual": true, "combined": "ré\nRecs: ok" }));
        assert_eq!(r.recommendation_text(), "ok");
    }
}
