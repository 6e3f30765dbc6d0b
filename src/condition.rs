use crate::finding::{Finding, RUST_STAIN_TAG};
use std::fmt;

const HIGH_SEVERITIES: [&str; 2] = ["high", "extreme"];
const CRITICAL_PRIORITIES: [&str; 2] = ["immediate action required", "critical"];

/// Effective classification of a finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConditionLabel {
    FireHazard,
    TripFall,
    None,
    Rust,
    Attention,
    /// Explicit classifier value outside the canonical set, kept verbatim.
    Other(String),
}

impl ConditionLabel {
    pub fn from_label(raw: &str) -> Self {
        match raw {
            "fire_hazard" => ConditionLabel::FireHazard,
            "trip_fall" => ConditionLabel::TripFall,
            "none" => ConditionLabel::None,
            "rust" => ConditionLabel::Rust,
            "attention" => ConditionLabel::Attention,
            other => ConditionLabel::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConditionLabel::FireHazard => "fire_hazard",
            ConditionLabel::TripFall => "trip_fall",
            ConditionLabel::None => "none",
            ConditionLabel::Rust => "rust",
            ConditionLabel::Attention => "attention",
            ConditionLabel::Other(raw) => raw.as_str(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ConditionLabel::FireHazard => "Fire hazard",
            ConditionLabel::TripFall => "Trip / fall hazard",
            ConditionLabel::None => "No issue",
            ConditionLabel::Rust => "Rust",
            ConditionLabel::Attention => "Needs attention",
            ConditionLabel::Other(raw) => raw.as_str(),
        }
    }

    /// CSS modifier used for condition badges.
    pub fn css_class(&self) -> &'static str {
        match self {
            ConditionLabel::FireHazard => "cond-fire",
            ConditionLabel::TripFall => "cond-trip",
            ConditionLabel::None => "cond-none",
            ConditionLabel::Rust => "cond-rust",
            ConditionLabel::Attention => "cond-attention",
            ConditionLabel::Other(_) => "cond-other",
        }
    }
}

impl fmt::Display for ConditionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signals used when no explicit classification is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FallbackSignals {
    pub has_rust_tag: bool,
    pub has_recommendations: bool,
    pub is_high_severity: bool,
    pub is_critical_priority: bool,
}

impl FallbackSignals {
    pub fn from_finding(finding: &Finding) -> Self {
        Self {
            has_rust_tag: finding.has_tag(RUST_STAIN_TAG),
            has_recommendations: !finding.recommendation_list().is_empty(),
            is_high_severity: matches_any(finding.severity_text(), &HIGH_SEVERITIES),
            is_critical_priority: matches_any(finding.priority_text(), &CRITICAL_PRIORITIES),
        }
    }

    pub fn label(self) -> ConditionLabel {
        if self.has_rust_tag {
            ConditionLabel::Rust
        } else if self.has_recommendations || self.is_high_severity || self.is_critical_priority {
            ConditionLabel::Attention
        } else {
            ConditionLabel::None
        }
    }
}

fn matches_any(value: Option<&str>, candidates: &[&str]) -> bool {
    value.is_some_and(|value| {
        candidates
            .iter()
            .any(|candidate| value.eq_ignore_ascii_case(candidate))
    })
}

/// Explicit classification wins unless it is `none`; otherwise derive one
/// from rust tags, recommendations, severity and priority.
pub fn resolve_condition(finding: &Finding) -> ConditionLabel {
    match finding.condition_field() {
        Some(explicit) if explicit != "none" => {
            ConditionLabel::from_label(explicit)
        }
        _ => FallbackSignals::from_finding(finding).label(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn resolve(value: Value) -> ConditionLabel {
        let finding: Finding = serde_json::from_value(value).expect("finding fixture");
        resolve_condition(&finding)
    }

    #[test]
    fn explicit_condition_is_returned_unchanged() {
        assert_eq!(resolve(json!({ "condition": "fire_hazard" })), ConditionLabel::FireHazard);
        assert_eq!(
            resolve(json!({ "condition_type": "trip_fall", "tags": { "rust_stains": true } })),
            ConditionLabel::TripFall
        );
        let odd = resolve(json!({ "condition": "Corrosion-Heavy" }));
        assert_eq!(odd.as_str(), "Corrosion-Heavy");
    }

    #[test]
    fn explicit_values_only_fall_through_on_exact_none() {
        let capitalized = resolve(json!({ "condition": "None", "severity_level": "high" }));
        assert_eq!(capitalized.as_str(), "None");

        let padded = resolve(json!({ "condition": " fire_hazard " }));
        assert_eq!(padded.as_str(), " fire_hazard ");
        assert_ne!(padded, ConditionLabel::FireHazard);

        let blank = resolve(json!({ "condition": "", "tags": { "rust_stains": true } }));
        assert_eq!(blank.as_str(), "");
    }

    #[test]
    fn high_severity_matches_are_exact_apart_from_case() {
        assert_eq!(
            resolve(json!({ "severity_level": "low", "severity": "high" })),
            ConditionLabel::None
        );
        assert_eq!(resolve(json!({ "severity": " high " })), ConditionLabel::None);
    }

    #[test]
    fn explicit_none_falls_through_to_signals() {
        assert_eq!(
            resolve(json!({ "condition": "none", "severity_level": "HIGH" })),
            ConditionLabel::Attention
        );
    }

    #[test]
    fn rust_tag_wins_over_other_signals() {
        assert_eq!(
            resolve(json!({
                "tags": { "rust_stains": true },
                "severity": "extreme",
                "priority": "Critical",
                "recommendations": ["Replace"],
            })),
            ConditionLabel::Rust
        );
    }

    #[test]
    fn attention_signals() {
        assert_eq!(
            resolve(json!({ "recommendations_high_severity_only": "Fix A; Fix B" })),
            ConditionLabel::Attention
        );
        assert_eq!(resolve(json!({ "severity": "Extreme" })), ConditionLabel::Attention);
        assert_eq!(
            resolve(json!({ "priority": "Immediate Action Required" })),
            ConditionLabel::Attention
        );
        assert_eq!(resolve(json!({ "recommendations": ["Paint"] })), ConditionLabel::Attention);
    }

    #[test]
    fn quiet_findings_resolve_to_none() {
        assert_eq!(resolve(json!({})), ConditionLabel::None);
        assert_eq!(
            resolve(json!({
                "severity": "medium",
                "priority": "routine",
                "recommendations_high_severity_only": " ; ",
                "tags": { "rust_stains": false },
            })),
            ConditionLabel::None
        );
    }
}
