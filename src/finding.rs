use crate::fields::{first_present, lenient_text, split_semicolon_list, value_text};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tag set by the classifier when a photo shows rust staining.
pub const RUST_STAIN_TAG: &str = "rust_stains";

/// Recommendation payload as it arrives: a list from the classifier, a
/// `;`-delimited string from manual edits, or anything else (ignored).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendationField {
    List(Vec<Value>),
    Text(String),
    Other(Value),
}

impl RecommendationField {
    pub fn as_list(&self) -> Option<Vec<String>> {
        match self {
            RecommendationField::List(items) => Some(
                items
                    .iter()
                    .map(|item| value_text(item).unwrap_or_default())
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RecommendationField::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Non-empty display lines, whatever the shape.
    pub fn lines(&self) -> Vec<String> {
        match self {
            RecommendationField::List(_) => self
                .as_list()
                .unwrap_or_default()
                .into_iter()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect(),
            RecommendationField::Text(text) => split_semicolon_list(text),
            RecommendationField::Other(_) => Vec::new(),
        }
    }
}

/// One inspected item (one photo). No field is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finding {
    #[serde(deserialize_with = "lenient_text", alias = "photoId")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub condition: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub condition_type: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub comment: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub comments: Option<String>,
    pub tags: Option<Value>,
    #[serde(deserialize_with = "lenient_text")]
    pub severity_level: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub priority: Option<String>,
    pub recommendations_high_severity_only: Option<RecommendationField>,
    pub recommendations: Option<RecommendationField>,
}

impl Finding {
    pub fn photo_id(&self) -> Option<&str> {
        first_present([self.id.as_deref()])
    }

    /// Trimmed location, `None` when blank.
    pub fn location_text(&self) -> Option<&str> {
        first_present([self.location.as_deref()])
    }

    /// Explicit classification: `condition` when present, else
    /// `condition_type`. Returned as supplied, blanks and padding included.
    pub fn condition_field(&self) -> Option<&str> {
        self.condition
            .as_deref()
            .or(self.condition_type.as_deref())
    }

    /// `comment`, then `comments`.
    pub fn comment_text(&self) -> Option<&str> {
        first_present([self.comment.as_deref(), self.comments.as_deref()])
    }

    /// `severity_level` when present, else `severity`. Untrimmed.
    pub fn severity_text(&self) -> Option<&str> {
        self.severity_level
            .as_deref()
            .or(self.severity.as_deref())
    }

    pub fn priority_text(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    /// Lookup order:
    /// 1. `recommendations_high_severity_only` when it is a list
    /// 2. `recommendations` when it is a list
    /// 3. `recommendations_high_severity_only` split on `;` when it is a string
    /// 4. empty
    pub fn recommendation_list(&self) -> Vec<String> {
        let high = self.recommendations_high_severity_only.as_ref();
        if let Some(list) = high.and_then(RecommendationField::as_list) {
            return list;
        }
        if let Some(list) = self
            .recommendations
            .as_ref()
            .and_then(RecommendationField::as_list)
        {
            return list;
        }
        high.and_then(RecommendationField::as_text)
            .map(split_semicolon_list)
            .unwrap_or_default()
    }

    /// Recommendation lines for display. Falls back to a free-text generic
    /// `recommendations` string, which the classification lookup ignores.
    pub fn recommendation_lines(&self) -> Vec<String> {
        let lines: Vec<String> = self
            .recommendation_list()
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        if !lines.is_empty() {
            return lines;
        }
        self.recommendations
            .as_ref()
            .and_then(RecommendationField::as_text)
            .map(split_semicolon_list)
            .unwrap_or_default()
    }

    /// Truthy value under `name` in the tag map.
    pub fn has_tag(&self, name: &str) -> bool {
        match &self.tags {
            Some(Value::Object(map)) => map.get(name).is_some_and(crate::fields::is_truthy),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn finding(value: Value) -> Finding {
        serde_json::from_value(value).expect("finding fixture")
    }

    #[test]
    fn string_recommendations_split_into_list() {
        let f = finding(json!({ "recommendations_high_severity_only": "Fix A; Fix B" }));
        assert_eq!(f.recommendation_list(), vec!["Fix A", "Fix B"]);
    }

    #[test]
    fn high_severity_list_beats_generic_list() {
        let f = finding(json!({
            "recommendations_high_severity_only": ["Weld plate"],
            "recommendations": ["Paint", "Inspect"],
        }));
        assert_eq!(f.recommendation_list(), vec!["Weld plate"]);
    }

    #[test]
    fn generic_list_beats_high_severity_string() {
        let f = finding(json!({
            "recommendations_high_severity_only": "Fix A",
            "recommendations": ["Paint"],
        }));
        assert_eq!(f.recommendation_list(), vec!["Paint"]);
    }

    #[test]
    fn generic_string_is_not_a_classification_signal() {
        let f = finding(json!({ "recommendations": "Paint; Inspect" }));
        assert!(f.recommendation_list().is_empty());
        assert_eq!(f.recommendation_lines(), vec!["Paint", "Inspect"]);
    }

    #[test]
    fn non_list_non_string_recommendations_are_ignored() {
        let f = finding(json!({ "recommendations_high_severity_only": 42 }));
        assert!(f.recommendation_list().is_empty());
    }

    #[test]
    fn field_fallbacks_prefer_primary_names() {
        let f = finding(json!({
            "condition_type": "trip_fall",
            "comments": "loose grating",
            "severity": "High",
            "id": 17,
        }));
        assert_eq!(f.condition_field(), Some("trip_fall"));
        assert_eq!(f.comment_text(), Some("loose grating"));
        assert_eq!(f.severity_text(), Some("High"));
        assert_eq!(f.photo_id(), Some("17"));

        let f = finding(json!({ "condition": "rust", "condition_type": "none" }));
        assert_eq!(f.condition_field(), Some("rust"));
    }

    #[test]
    fn severity_level_shadows_severity() {
        let f = finding(json!({ "severity_level": "low", "severity": "high" }));
        assert_eq!(f.severity_text(), Some("low"));

        let f = finding(json!({ "severity_level": "", "severity": "high" }));
        assert_eq!(f.severity_text(), Some(""));
    }

    #[test]
    fn explicit_condition_is_not_normalized() {
        let f = finding(json!({ "condition": " fire_hazard ", "condition_type": "none" }));
        assert_eq!(f.condition_field(), Some(" fire_hazard "));

        let f = finding(json!({ "condition": "", "condition_type": "trip_fall" }));
        assert_eq!(f.condition_field(), Some(""));

        let f = finding(json!({ "condition": null, "condition_type": "trip_fall" }));
        assert_eq!(f.condition_field(), Some("trip_fall"));
    }

    #[test]
    fn blank_location_is_absent() {
        assert_eq!(finding(json!({ "location": "   " })).location_text(), None);
        assert_eq!(finding(json!({ "location": " Deck " })).location_text(), Some("Deck"));
    }

    #[test]
    fn tags_tolerate_odd_shapes() {
        assert!(finding(json!({ "tags": { "rust_stains": true } })).has_tag(RUST_STAIN_TAG));
        assert!(!finding(json!({ "tags": { "rust_stains": false } })).has_tag(RUST_STAIN_TAG));
        assert!(!finding(json!({ "tags": ["rust_stains"] })).has_tag(RUST_STAIN_TAG));
        assert!(!Finding::default().has_tag(RUST_STAIN_TAG));
    }

    #[test]
    fn empty_object_deserializes() {
        let f = finding(json!({}));
        assert_eq!(f, Finding::default());
        assert!(f.recommendation_list().is_empty());
    }
}
